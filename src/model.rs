//! Core data model: the untyped grid produced by readers, the typed rows
//! produced by the schema inferencer, and the documents persisted on disk.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Rectangular matrix of strings; rows indexed by source order. No header
/// row is assumed. Produced by readers, consumed by the schema inferencer,
/// immutable thereafter.
pub type RawGrid = Vec<Vec<String>>;

/// One cleaned, typed row belonging to a single supplier.
///
/// Invariants: `product` is non-empty after trimming (length > 1); `cost` is
/// strictly positive; `code` may be an empty string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedRow {
    pub code: String,
    pub product: String,
    pub cost: Decimal,
}

/// Ordered sequence of rows belonging to one supplier. The supplier name
/// itself lives in `Catalog`'s key, not here.
pub type SupplierTable = Vec<NormalizedRow>;

/// Per-supplier discount-cascade-then-markup configuration. All percentages
/// are non-negative; enforced at config load time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SupplierConfig {
    pub markup_pct: Decimal,
    pub discount1_pct: Decimal,
    pub discount2_pct: Decimal,
}

impl SupplierConfig {
    pub fn flat_markup(markup_pct: Decimal) -> Self {
        SupplierConfig {
            markup_pct,
            discount1_pct: Decimal::ZERO,
            discount2_pct: Decimal::ZERO,
        }
    }
}

/// A per-supplier margin entry in the config document: either a bare
/// markup percentage, or a full record with a discount cascade. Mirrors
/// `motor_precios.py::obtener_info_config`'s handling of `isinstance(raw,
/// dict)`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MarginEntry {
    Scalar(Decimal),
    Record {
        margen: Decimal,
        #[serde(default)]
        desc1: Decimal,
        #[serde(default)]
        desc2: Decimal,
    },
}

impl MarginEntry {
    pub fn to_supplier_config(&self) -> SupplierConfig {
        match self {
            MarginEntry::Scalar(markup) => SupplierConfig::flat_markup(*markup),
            MarginEntry::Record {
                margen,
                desc1,
                desc2,
            } => SupplierConfig {
                markup_pct: *margen,
                discount1_pct: *desc1,
                discount2_pct: *desc2,
            },
        }
    }
}

fn default_margin() -> Decimal {
    Decimal::from(20)
}

fn default_fuzzy_threshold() -> i32 {
    60
}

fn default_currency() -> String {
    "ARS".to_string()
}

/// The persisted global configuration document. Field names follow the
/// on-disk JSON shape from `EXTERNAL INTERFACES` verbatim (Spanish keys),
/// matching `original_source/motor_precios.py::_cargar_margenes`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GlobalConfig {
    #[serde(rename = "margenes_por_proveedor", default)]
    pub margenes_por_proveedor: HashMap<String, MarginEntry>,

    #[serde(rename = "margen_default", default = "default_margin")]
    pub margen_default: Decimal,

    #[serde(rename = "umbral_busqueda_fuzzy", default = "default_fuzzy_threshold")]
    pub umbral_busqueda_fuzzy: i32,

    #[serde(rename = "moneda", default = "default_currency")]
    pub moneda: String,

    #[serde(rename = "drive_folder_id", default)]
    pub drive_folder_id: String,
}

impl Default for GlobalConfig {
    fn default() -> Self {
        GlobalConfig {
            margenes_por_proveedor: HashMap::new(),
            margen_default: default_margin(),
            umbral_busqueda_fuzzy: default_fuzzy_threshold(),
            moneda: default_currency(),
            drive_folder_id: String::new(),
        }
    }
}

impl GlobalConfig {
    /// Resolves the effective config for a supplier: exact name match, else
    /// the global default (markup only, discounts = 0).
    pub fn config_for(&self, supplier: &str) -> SupplierConfig {
        match self.margenes_por_proveedor.get(supplier) {
            Some(entry) => entry.to_supplier_config(),
            None => SupplierConfig::flat_markup(self.margen_default),
        }
    }
}

/// Per-file override fixing column indices when automatic inference is
/// known to be wrong. Field names mirror the on-disk `<source>.json`
/// sibling document verbatim.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManualMapping {
    pub col_producto: usize,
    pub col_precio: usize,
    #[serde(default)]
    pub col_codigo: Option<usize>,
    #[serde(default)]
    pub skip_rows: usize,
}

/// One ranked search result. Transient: does not alias any row owned by the
/// Catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchHit {
    pub code: String,
    pub product: String,
    pub supplier: String,
    pub cost: Decimal,
    pub config_snapshot: SupplierConfig,
    pub sale_price: Decimal,
    pub score: u8,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn config_for_falls_back_to_default() {
        let cfg = GlobalConfig::default();
        let resolved = cfg.config_for("unknown-supplier");
        assert_eq!(resolved.markup_pct, dec!(20));
        assert_eq!(resolved.discount1_pct, Decimal::ZERO);
    }

    #[test]
    fn config_for_uses_scalar_margin_entry() {
        let mut cfg = GlobalConfig::default();
        cfg.margenes_por_proveedor
            .insert("ferreteria-sur".to_string(), MarginEntry::Scalar(dec!(35)));
        let resolved = cfg.config_for("ferreteria-sur");
        assert_eq!(resolved.markup_pct, dec!(35));
        assert_eq!(resolved.discount2_pct, Decimal::ZERO);
    }

    #[test]
    fn config_for_uses_record_margin_entry_with_discounts() {
        let mut cfg = GlobalConfig::default();
        cfg.margenes_por_proveedor.insert(
            "dfa".to_string(),
            MarginEntry::Record {
                margen: dec!(25),
                desc1: dec!(10),
                desc2: dec!(5),
            },
        );
        let resolved = cfg.config_for("dfa");
        assert_eq!(resolved.markup_pct, dec!(25));
        assert_eq!(resolved.discount1_pct, dec!(10));
        assert_eq!(resolved.discount2_pct, dec!(5));
    }

    #[test]
    fn global_config_roundtrips_through_json() {
        let json = r#"{
            "margenes_por_proveedor": {"acme": 15, "bravo": {"margen": 10, "desc1": 5, "desc2": 0}},
            "margen_default": 20,
            "umbral_busqueda_fuzzy": 60,
            "moneda": "ARS",
            "drive_folder_id": ""
        }"#;
        let cfg: GlobalConfig = serde_json::from_str(json).unwrap();
        assert_eq!(cfg.config_for("acme").markup_pct, dec!(15));
        assert_eq!(cfg.config_for("bravo").discount1_pct, dec!(5));

        let reserialized = serde_json::to_string(&cfg).unwrap();
        let roundtripped: GlobalConfig = serde_json::from_str(&reserialized).unwrap();
        assert_eq!(roundtripped.moneda, cfg.moneda);
        assert_eq!(roundtripped.margen_default, cfg.margen_default);
    }

    #[test]
    fn manual_mapping_defaults_skip_rows_to_zero() {
        let json = r#"{"col_producto": 1, "col_precio": 4}"#;
        let mapping: ManualMapping = serde_json::from_str(json).unwrap();
        assert_eq!(mapping.skip_rows, 0);
        assert_eq!(mapping.col_codigo, None);
    }
}
