//! SearchIndex: two-phase query over the Catalog, exact substring first,
//! then a conditional fuzzy pass, ranked and truncated to `limit`.
//!
//! Grounded in `original_source/motor_precios.py::buscar_productos`: the
//! substring-first/fuzzy-fallback structure, the "fewer than 5 substring
//! hits and query longer than 3 chars" trigger, and the dedup-against-phase-1
//! rule are ported verbatim; the fuzzy scorer itself is `fuzzy::
//! partial_token_sort_ratio`.

use crate::catalog::Catalog;
use crate::fuzzy;
use crate::model::{GlobalConfig, SearchHit};
use crate::pricing;

const FUZZY_TRIGGER_MAX_HITS: usize = 5;
const FUZZY_MIN_QUERY_LEN: usize = 3;
const FUZZY_CANDIDATES_PER_SUPPLIER: usize = 5;

/// Runs a search across every supplier table in `catalog` (or just
/// `supplier`, if given), ranks hits by score descending, and truncates to
/// `limit`. Never fails; an empty catalog or empty query yields an empty
/// result.
pub fn search(
    catalog: &Catalog,
    config: &GlobalConfig,
    query: &str,
    limit: usize,
    supplier: Option<&str>,
) -> Vec<SearchHit> {
    if query.trim().is_empty() || limit == 0 {
        return Vec::new();
    }
    let query_lower = query.to_lowercase();

    let tables: Vec<(&String, &crate::model::SupplierTable)> = catalog
        .iter()
        .filter(|(name, _)| supplier.map(|s| s == name.as_str()).unwrap_or(true))
        .collect();

    let mut hits = substring_hits(&tables, &query_lower, config, limit);

    if hits.len() < FUZZY_TRIGGER_MAX_HITS && query.chars().count() > FUZZY_MIN_QUERY_LEN {
        let fuzzy = fuzzy_hits(&tables, &query_lower, config, &hits);
        hits.extend(fuzzy);
    }

    hits.sort_by(|a, b| b.score.cmp(&a.score));
    hits.truncate(limit);
    hits
}

fn substring_hits(
    tables: &[(&String, &crate::model::SupplierTable)],
    query_lower: &str,
    config: &GlobalConfig,
    limit: usize,
) -> Vec<SearchHit> {
    let mut hits = Vec::new();
    for (supplier_name, table) in tables {
        let mut per_supplier = 0usize;
        for row in table.iter() {
            if per_supplier >= limit {
                break;
            }
            let matches = row.product.to_lowercase().contains(query_lower)
                || row.code.to_lowercase().contains(query_lower);
            if !matches {
                continue;
            }
            let supplier_config = config.config_for(supplier_name);
            hits.push(SearchHit {
                code: row.code.clone(),
                product: row.product.clone(),
                supplier: (*supplier_name).clone(),
                cost: row.cost,
                config_snapshot: supplier_config,
                sale_price: pricing::sale_price(row.cost, &supplier_config),
                score: 100,
            });
            per_supplier += 1;
        }
    }
    hits
}

fn fuzzy_hits(
    tables: &[(&String, &crate::model::SupplierTable)],
    query_lower: &str,
    config: &GlobalConfig,
    existing: &[SearchHit],
) -> Vec<SearchHit> {
    let threshold = config.umbral_busqueda_fuzzy.clamp(0, 100) as u8;
    let mut hits = Vec::new();

    for (supplier_name, table) in tables {
        let products: Vec<String> = table.iter().map(|r| r.product.clone()).collect();
        if products.is_empty() {
            continue;
        }
        let top = fuzzy::top_matches(query_lower, &products, FUZZY_CANDIDATES_PER_SUPPLIER);
        for (idx, score) in top {
            if score < threshold {
                continue;
            }
            let row = &table[idx];
            let already_seen = existing
                .iter()
                .any(|h| h.supplier == **supplier_name && h.product == row.product);
            if already_seen {
                continue;
            }
            let supplier_config = config.config_for(supplier_name);
            hits.push(SearchHit {
                code: row.code.clone(),
                product: row.product.clone(),
                supplier: (*supplier_name).clone(),
                cost: row.cost,
                config_snapshot: supplier_config,
                sale_price: pricing::sale_price(row.cost, &supplier_config),
                score: score.min(99),
            });
        }
    }
    hits
}
