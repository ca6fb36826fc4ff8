//! PricingEngine: applies a supplier's discount cascade and then its
//! markup to a cost, yielding a sale price rounded to two decimal places.
//!
//! Ported from `original_source/motor_precios.py::calcular_precio_final`.

use crate::model::SupplierConfig;
use rust_decimal::{Decimal, RoundingStrategy};

/// `cost_net = cost * (1 - d1/100) * (1 - d2/100)`, `price = cost_net * (1 +
/// markup/100)`, rounded to 2dp with half-away-from-zero (see DESIGN.md for
/// why this rounding mode, not Decimal's default banker's rounding, is
/// required to match the spec's worked examples).
pub fn sale_price(cost: Decimal, config: &SupplierConfig) -> Decimal {
    let hundred = Decimal::from(100);
    let mut cost_net = cost;

    if config.discount1_pct > Decimal::ZERO {
        cost_net *= Decimal::ONE - (config.discount1_pct / hundred);
    }
    if config.discount2_pct > Decimal::ZERO {
        cost_net *= Decimal::ONE - (config.discount2_pct / hundred);
    }

    let price = cost_net * (Decimal::ONE + (config.markup_pct / hundred));
    price.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}
