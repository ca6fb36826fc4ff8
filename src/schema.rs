//! SchemaInferencer: given a RawGrid, decides which column holds the
//! product description, which holds the price, and optionally which holds a
//! product code, or reports that the grid is not a price table at all.
//!
//! The density-scoring heuristics are a direct port of
//! `original_source/motor_precios.py::_procesar_dataframe_inteligente`'s
//! `es_numero_posible`/`tiene_decimales`/`es_producto`/`es_codigo` helpers,
//! kept as free, independently-testable functions. The column-selection
//! control flow mirrors the same function's two-column special case,
//! tie-break, and position-weighted code selection.

use crate::model::{ManualMapping, NormalizedRow, RawGrid, SupplierTable};
use crate::numeric;

const SAMPLE_CAP: usize = 200;

/// share of digits in the stripped token exceeds 0.5
fn score_cell_numeric(token: &str) -> bool {
    let t = token
        .trim()
        .replace('$', "")
        .replace("USD", "")
        .replace("EUR", "")
        .to_lowercase();
    if t.is_empty() || t == "nan" {
        return false;
    }
    let digits = t.chars().filter(|c| c.is_ascii_digit()).count();
    (digits as f64 / t.chars().count() as f64) > 0.5
}

fn score_cell_has_decimal(token: &str) -> bool {
    token.contains(',') || token.contains('.')
}

/// length >= 4 AND share of letters+whitespace > 0.6
fn score_cell_product(token: &str) -> bool {
    let t = token.trim();
    if t.chars().count() < 4 || t.eq_ignore_ascii_case("nan") {
        return false;
    }
    let letters = t.chars().filter(|c| c.is_alphabetic() || c.is_whitespace()).count();
    (letters as f64 / t.chars().count() as f64) > 0.6
}

/// 1 < length < 18 AND contains at least one digit
fn score_cell_code(token: &str) -> bool {
    let t = token.trim();
    if t.eq_ignore_ascii_case("nan") {
        return false;
    }
    let len = t.chars().count();
    len > 1 && len < 18 && t.chars().any(|c| c.is_ascii_digit())
}

#[derive(Debug, Clone, Copy, Default)]
struct ColumnScores {
    s_numeric: f64,
    s_decimal: f64,
    product_score: f64,
    code_score: f64,
}

fn sample_indices(total_rows: usize) -> Vec<usize> {
    if total_rows == 0 {
        return Vec::new();
    }
    let step = (total_rows / SAMPLE_CAP).max(1);
    (0..total_rows).step_by(step).collect()
}

fn score_column(grid: &RawGrid, col: usize, sample_rows: &[usize]) -> ColumnScores {
    let values: Vec<&str> = sample_rows
        .iter()
        .filter_map(|&r| grid[r].get(col).map(|s| s.as_str()))
        .collect();
    let total = values.len();
    if total == 0 {
        return ColumnScores::default();
    }

    let trimmed: Vec<String> = values.iter().map(|v| v.trim().to_string()).collect();
    let unique: std::collections::HashSet<&String> = trimmed.iter().collect();
    let ratio_unicidad = unique.len() as f64 / total as f64;
    let avg_len = trimmed.iter().map(|s| s.chars().count()).sum::<usize>() as f64 / total as f64;

    let hits_num = values.iter().filter(|v| score_cell_numeric(v)).count();
    let hits_dec = values
        .iter()
        .filter(|v| score_cell_numeric(v) && score_cell_has_decimal(v))
        .count();
    let hits_prod = values.iter().filter(|v| score_cell_product(v)).count();
    let hits_cod = values.iter().filter(|v| score_cell_code(v)).count();

    ColumnScores {
        s_numeric: hits_num as f64 / total as f64,
        s_decimal: hits_dec as f64 / total as f64,
        product_score: (hits_prod as f64 / total as f64) * avg_len,
        code_score: (hits_cod as f64 / total as f64) * ratio_unicidad,
    }
}

struct ColumnAssignment {
    product: usize,
    price: usize,
    code: Option<usize>,
}

fn infer_columns(grid: &RawGrid) -> Option<ColumnAssignment> {
    let total_rows = grid.len();
    if total_rows == 0 {
        return None;
    }
    let num_cols = grid.iter().map(|r| r.len()).max().unwrap_or(0);
    if num_cols == 0 {
        return None;
    }
    let sample_rows = sample_indices(total_rows);
    let scores: Vec<ColumnScores> = (0..num_cols)
        .map(|c| score_column(grid, c, &sample_rows))
        .collect();

    // Two-column special case.
    if num_cols == 2 {
        let s_prod_0 = scores[0].product_score;
        let s_prod_1 = scores[1].product_score;
        let s_prec_0 = scores[0].s_numeric;
        let s_prec_1 = scores[1].s_numeric;

        return if s_prec_1 > 0.3 && s_prod_0 > 0.3 {
            Some(ColumnAssignment {
                product: 0,
                price: 1,
                code: None,
            })
        } else if s_prec_0 > 0.3 && s_prod_1 > 0.3 {
            Some(ColumnAssignment {
                product: 1,
                price: 0,
                code: None,
            })
        } else {
            None
        };
    }

    // Price column: candidates with S_numeric > 0.10, leader by S_numeric,
    // leftmost column wins a tie.
    let mut candidates: Vec<usize> = (0..num_cols).filter(|&c| scores[c].s_numeric > 0.10).collect();
    if candidates.is_empty() {
        return None;
    }
    candidates.sort_by(|&a, &b| {
        scores[b]
            .s_numeric
            .partial_cmp(&scores[a].s_numeric)
            .unwrap()
    });
    let mut best = candidates[0];
    for &cand in &candidates[1..] {
        if (scores[best].s_numeric - scores[cand].s_numeric).abs() < 0.20 {
            if scores[cand].s_decimal > scores[best].s_decimal + 0.10 {
                best = cand;
            }
        } else {
            break;
        }
    }
    let price_col = best;

    // Product column: among remaining columns, restrict to product-score >
    // 0.50, pick the maximum (leftmost wins a tie).
    let mut best_product: Option<(usize, f64)> = None;
    for c in 0..num_cols {
        if c == price_col {
            continue;
        }
        let s = scores[c].product_score;
        if s > 0.50 {
            if best_product.map(|(_, best_s)| s > best_s).unwrap_or(true) {
                best_product = Some((c, s));
            }
        }
    }
    let product_col = best_product?.0;

    // Code column: among remaining columns with code-score > 0.05, prefer
    // those positioned before the product column (x2 weight), else x0.5.
    let mut best_code: Option<(usize, f64)> = None;
    for c in 0..num_cols {
        if c == price_col || c == product_col {
            continue;
        }
        if scores[c].code_score > 0.05 {
            let weighted = if c < product_col {
                scores[c].code_score * 2.0
            } else {
                scores[c].code_score * 0.5
            };
            if best_code.map(|(_, best_s)| weighted > best_s).unwrap_or(true) {
                best_code = Some((c, weighted));
            }
        }
    }

    Some(ColumnAssignment {
        product: product_col,
        price: price_col,
        code: best_code.map(|(c, _)| c),
    })
}

fn final_cleanup(rows: impl Iterator<Item = (String, String, String)>) -> SupplierTable {
    rows.filter_map(|(code, product, price_token)| {
        let cost = numeric::normalize(&price_token)?;
        let product = product.trim();
        if product.chars().count() <= 1 {
            return None;
        }
        let code = if code.trim().eq_ignore_ascii_case("nan") {
            String::new()
        } else {
            code.trim().to_string()
        };
        Some(NormalizedRow {
            code,
            product: product.to_string(),
            cost,
        })
    })
    .collect()
}

/// Returns `Some(columns)` with the header names used by the short-circuit
/// path, if this already looks like an extractor-produced labeled grid.
fn already_normalized_header(grid: &RawGrid) -> Option<(usize, usize, Option<usize>)> {
    let header = grid.first()?;
    let col_producto = header.iter().position(|h| h == "Producto")?;
    let col_precio = header.iter().position(|h| h == "Precio de Costo")?;
    let col_codigo = header.iter().position(|h| h == "Codigo");
    Some((col_producto, col_precio, col_codigo))
}

/// Infers (or applies a manual) schema mapping and runs FinalCleanup,
/// producing a `SupplierTable`. Returns an empty table when the grid is not
/// recognizable as a price table (the spec's `NotAPriceTable`).
pub fn infer(grid: &RawGrid, manual: Option<&ManualMapping>) -> SupplierTable {
    if grid.is_empty() {
        return SupplierTable::new();
    }

    if let Some((col_producto, col_precio, col_codigo)) = already_normalized_header(grid) {
        let rows = grid[1..].iter().map(|row| {
            let code = col_codigo
                .map(|c| row.get(c).cloned().unwrap_or_default())
                .unwrap_or_default();
            let product = row.get(col_producto).cloned().unwrap_or_default();
            let price = row.get(col_precio).cloned().unwrap_or_default();
            (code, product, price)
        });
        return final_cleanup(rows);
    }

    if let Some(mapping) = manual {
        let max_idx = grid.iter().map(|r| r.len()).max().unwrap_or(0);
        let in_range = mapping.col_producto < max_idx
            && mapping.col_precio < max_idx
            && mapping.col_codigo.map(|c| c < max_idx).unwrap_or(true);
        if in_range {
            let skip = mapping.skip_rows.min(grid.len());
            let rows = grid[skip..].iter().map(|row| {
                let code = mapping
                    .col_codigo
                    .map(|c| row.get(c).cloned().unwrap_or_default())
                    .unwrap_or_default();
                let product = row.get(mapping.col_producto).cloned().unwrap_or_default();
                let price = row.get(mapping.col_precio).cloned().unwrap_or_default();
                (code, product, price)
            });
            return final_cleanup(rows);
        }
        tracing::warn!(?mapping, "manual mapping out of range, falling back to automatic inference");
    }

    match infer_columns(grid) {
        Some(assignment) => {
            let rows = grid.iter().map(|row| {
                let code = assignment
                    .code
                    .map(|c| row.get(c).cloned().unwrap_or_default())
                    .unwrap_or_default();
                let product = row.get(assignment.product).cloned().unwrap_or_default();
                let price = row.get(assignment.price).cloned().unwrap_or_default();
                (code, product, price)
            });
            final_cleanup(rows)
        }
        None => SupplierTable::new(),
    }
}
