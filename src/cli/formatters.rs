//! Output formatting for CLI display: a JSON path (machine-readable) and a
//! `tabled`-backed table path (human-readable), the same split the teacher
//! uses in `format_portfolio_json`/`format_portfolio_table`.

use crate::model::SearchHit;
use crate::utils;
use colored::Colorize;
use serde::Serialize;
use tabled::{
    settings::{object::Columns, Alignment, Style},
    Table, Tabled,
};

#[derive(Tabled)]
struct HitRow {
    #[tabled(rename = "Score")]
    score: String,
    #[tabled(rename = "Supplier")]
    supplier: String,
    #[tabled(rename = "Code")]
    code: String,
    #[tabled(rename = "Product")]
    product: String,
    #[tabled(rename = "Cost")]
    cost: String,
    #[tabled(rename = "Sale price")]
    sale_price: String,
}

#[derive(Serialize)]
struct JsonHit {
    score: u8,
    supplier: String,
    code: String,
    product: String,
    cost: String,
    sale_price: String,
}

pub fn format_search_json(hits: &[SearchHit]) -> String {
    let rows: Vec<JsonHit> = hits
        .iter()
        .map(|h| JsonHit {
            score: h.score,
            supplier: h.supplier.clone(),
            code: h.code.clone(),
            product: h.product.clone(),
            cost: h.cost.to_string(),
            sale_price: h.sale_price.to_string(),
        })
        .collect();
    serde_json::to_string_pretty(&rows)
        .unwrap_or_else(|e| format!(r#"{{"error": "JSON serialization failed: {e}"}}"#))
}

pub fn format_search_table(hits: &[SearchHit], currency_tag: &str) -> String {
    if hits.is_empty() {
        return format!("{}\n", "No matches found.".yellow());
    }

    let rows: Vec<HitRow> = hits
        .iter()
        .map(|h| HitRow {
            score: h.score.to_string(),
            supplier: h.supplier.clone(),
            code: h.code.clone(),
            product: h.product.clone(),
            cost: utils::format_currency(h.cost, currency_tag),
            sale_price: utils::format_currency(h.sale_price, currency_tag),
        })
        .collect();

    let mut table = Table::new(rows);
    table
        .with(Style::rounded())
        .modify(Columns::new(0..1), Alignment::right())
        .modify(Columns::new(4..6), Alignment::right());
    format!("{table}\n")
}

pub fn format_suppliers_table(suppliers: &[String]) -> String {
    if suppliers.is_empty() {
        return format!("{}\n", "No suppliers in the catalog.".yellow());
    }
    let mut out = format!("\n{} Suppliers ({})\n\n", "📦".cyan(), suppliers.len());
    for name in suppliers {
        out.push_str(&format!("  {name}\n"));
    }
    out
}

pub fn format_suppliers_json(suppliers: &[String]) -> String {
    serde_json::to_string_pretty(suppliers)
        .unwrap_or_else(|e| format!(r#"{{"error": "JSON serialization failed: {e}"}}"#))
}
