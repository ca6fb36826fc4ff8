//! PdfTableExtractor: reconstructs tabular data from PDFs using a layered
//! strategy (ruled detection, whitespace detection, line-regex salvage),
//! then merges the highest-yield result per file.
//!
//! Grounded in `original_source/motor_precios.py::_leer_pdf`/
//! `_leer_pdf_taller` for the control flow, keyword/noise-token lists (kept
//! verbatim, they are data, not prose), and the text-salvage regex shapes;
//! and in `importers/irpf_pdf.rs` for the Rust regex idiom (`once_cell`
//! compiled statics, `Regex::captures`).
//!
//! `pdf-extract` (the teacher's PDF dependency) surfaces flowed text, not
//! pdfplumber's glyph-ruling geometry, so "ruled" and "whitespace" detection
//! are both implemented as whitespace-run column splitting at different gap
//! widths: a wide-gap pass (>=4 spaces) approximating ruled/grid-aligned
//! tables, tried first, and a narrow-gap pass (>=2 spaces) tried only if the
//! wide pass finds nothing, mirroring the teacher's "try lines/grid, then
//! text strategy" fallback order without requiring glyph coordinates. This
//! is a documented, deliberate approximation (see DESIGN.md).

use crate::model::RawGrid;
use anyhow::{Context, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::Path;

const HEADER_KEYWORDS: &[&str] = &[
    "codigo",
    "descripcion",
    "descripción",
    "producto",
    "precio",
    "$ lista",
    "$lista",
    "lista",
    "costo",
    "art",
    "articulo",
    "artículo",
    "detalle",
    "importe",
    "p.lista",
    "p. lista",
    "cod",
    "code",
    "item",
    "ref",
    "referencia",
];

const TALLER_NOISE_TOKENS: &[&str] = &[
    "luis",
    "estela",
    "gmail",
    "hidrolavadoras",
    "lijadoras",
    "página",
    "precio",
    "ofert",
    "cod.",
    "o. c",
    "oferta",
];

const PRICE_PATTERN: &str = r"\d{1,3}(?:\.?\d{3})*(?:,\d{1,2})?";

static PATTERN_ALPHA_CODE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"^([A-Z]{{1,5}}\d{{2,8}}[A-Z]?)\s+(.+?)\s+({PRICE_PATTERN})(?:\s+.*)?$"
    ))
    .unwrap()
});

static PATTERN_NUMERIC_CODE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"^(\d{{3,10}})\s+(.+?)\s+({PRICE_PATTERN})(?:\s+.*)?$")).unwrap()
});

static PATTERN_NO_CODE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"^(.{{10,80}}?)\s{{2,}}({PRICE_PATTERN})(?:\s+.*)?$")).unwrap()
});

/// Reads a PDF file and returns the merged RawGrid. Never fails on
/// malformed pages; only fails if the PDF itself cannot be opened.
pub fn extract(path: &Path) -> Result<RawGrid> {
    let pages = pdf_extract::extract_text_by_pages(path)
        .with_context(|| format!("extracting text from {}", path.display()))?;
    Ok(extract_from_pages(path, &pages))
}

/// The pure, path-independent (besides the supplier fast-path check) core
/// of extraction, split out so end-to-end scenarios can be tested against
/// hand-built page texts without constructing real PDF bytes.
pub fn extract_from_pages(path: &Path, pages: &[String]) -> RawGrid {
    if path.to_string_lossy().to_uppercase().contains("EL TALLER") {
        return extract_taller(pages);
    }

    let mut accepted_tables: Vec<RawGrid> = Vec::new();
    let mut reference_col_count: usize = 0;

    for page_text in pages {
        for mut table in extract_tables_from_page(page_text) {
            let ncols = table.iter().map(|r| r.len()).max().unwrap_or(0);
            if ncols < 2 || table.is_empty() {
                continue;
            }
            table.retain(|row| row.iter().any(|c| !is_blankish(c)));
            if table.is_empty() {
                continue;
            }
            table.retain(|row| !is_repeated_header_row(row));
            table.retain(|row| !is_section_title_row(row, ncols));
            if table.is_empty() {
                continue;
            }

            if reference_col_count == 0 {
                reference_col_count = ncols;
            } else if (ncols as f64) < (reference_col_count as f64) * 0.5 {
                continue;
            }
            accepted_tables.push(table);
        }
    }

    let total_table_rows: usize = accepted_tables.iter().map(|t| t.len()).sum();
    let salvage_rows = salvage_text(pages);

    let merged = if salvage_rows.len() > total_table_rows {
        vec![salvage_rows]
    } else {
        let mut all = accepted_tables;
        if !salvage_rows.is_empty() {
            all.push(salvage_rows);
        }
        all
    };

    concat_normalize(merged)
}

fn extract_tables_from_page(text: &str) -> Vec<RawGrid> {
    let ruled = build_table_from_lines(text, 4);
    if !ruled.is_empty() {
        return vec![ruled];
    }
    let whitespace = build_table_from_lines(text, 2);
    if whitespace.is_empty() {
        Vec::new()
    } else {
        vec![whitespace]
    }
}

fn build_table_from_lines(text: &str, min_gap: usize) -> RawGrid {
    text.lines()
        .map(|line| split_on_wide_gaps(line, min_gap))
        .filter(|cols| cols.len() >= 2)
        .collect()
}

fn split_on_wide_gaps(line: &str, min_gap: usize) -> Vec<String> {
    let mut cols = Vec::new();
    let mut current = String::new();
    let mut space_run = 0usize;
    for ch in line.chars() {
        if ch == ' ' {
            space_run += 1;
            current.push(ch);
        } else {
            if space_run >= min_gap {
                cols.push(current.trim().to_string());
                current = String::new();
            }
            space_run = 0;
            current.push(ch);
        }
    }
    cols.push(current.trim().to_string());
    cols.retain(|c| !c.is_empty());
    cols
}

fn is_blankish(cell: &str) -> bool {
    let t = cell.trim();
    t.is_empty() || t.eq_ignore_ascii_case("none") || t.eq_ignore_ascii_case("nan")
}

fn is_repeated_header_row(row: &[String]) -> bool {
    let nonempty: Vec<&String> = row.iter().filter(|c| !is_blankish(c)).collect();
    if nonempty.is_empty() {
        return true;
    }
    let hits = nonempty
        .iter()
        .filter(|c| {
            let lower = c.to_lowercase();
            HEADER_KEYWORDS.iter().any(|kw| lower.contains(kw))
        })
        .count();
    (hits as f64 / nonempty.len() as f64) >= 0.5
}

fn is_section_title_row(row: &[String], ncols: usize) -> bool {
    let nonempty: Vec<&String> = row.iter().filter(|c| !is_blankish(c)).collect();
    if nonempty.len() != 1 || ncols < 3 {
        return false;
    }
    let text = nonempty[0].trim();
    text.chars().count() < 50 && !text.chars().any(|c| c.is_ascii_digit())
}

fn salvage_text(pages: &[String]) -> RawGrid {
    let mut rows = RawGrid::new();
    for page in pages {
        for line in page.lines() {
            if let Some(row) = salvage_line(line) {
                rows.push(vec![row.0, row.1, row.2]);
            }
        }
    }
    rows
}

fn salvage_line(line: &str) -> Option<(String, String, String)> {
    let line = line.trim();
    if line.chars().count() < 10 {
        return None;
    }

    if let Some(caps) = PATTERN_ALPHA_CODE.captures(line) {
        let code = caps[1].to_string();
        let desc = caps[2].trim().to_string();
        let price = caps[3].to_string();
        if price == "0" || desc.chars().count() < 3 {
            return None;
        }
        if price == "0,00" || price == "0,0" {
            return None;
        }
        return Some((code, desc, price));
    }

    if let Some(caps) = PATTERN_NUMERIC_CODE.captures(line) {
        let price = caps[3].to_string();
        if price == "0,00" || price == "0,0" || price == "0" {
            return None;
        }
        return Some((caps[1].to_string(), caps[2].trim().to_string(), price));
    }

    if let Some(caps) = PATTERN_NO_CODE.captures(line) {
        let desc = caps[1].trim().to_string();
        let price = caps[2].to_string();
        let desc_lower = desc.to_lowercase();
        if HEADER_KEYWORDS.iter().any(|kw| desc_lower.contains(kw)) {
            return None;
        }
        if desc.chars().count() < 5 || price == "0,00" || price == "0,0" || price == "0" {
            return None;
        }
        return Some((String::new(), desc, price));
    }

    None
}

fn extract_taller(pages: &[String]) -> RawGrid {
    let mut rows = RawGrid::new();
    for page in pages {
        for table in extract_tables_from_page(page) {
            for row in table {
                if row.len() < 2 {
                    continue;
                }
                let prod = row[0].replace('\n', " ").trim().to_string();
                let mut prec = row[1].replace('\n', " ").trim().to_string();

                if row.len() >= 3 {
                    let lacks_digit = !prec.chars().any(|c| c.is_ascii_digit());
                    let lacks_dollar = !prec.contains('$');
                    if lacks_digit || lacks_dollar {
                        prec = row[2].replace('\n', " ").trim().to_string();
                    }
                }

                if prod.chars().count() < 5 {
                    continue;
                }
                let prec_lower = prec.to_lowercase();
                if prec_lower.is_empty() || prec_lower == "none" || prec_lower == "nan" {
                    continue;
                }
                let prod_lower = prod.to_lowercase();
                if TALLER_NOISE_TOKENS.iter().any(|n| prod_lower.contains(n)) {
                    continue;
                }
                rows.push(vec![prod, prec]);
            }
        }
    }
    rows
}

fn concat_normalize(grids: Vec<RawGrid>) -> RawGrid {
    let max_cols = grids
        .iter()
        .flat_map(|g| g.iter())
        .map(|r| r.len())
        .max()
        .unwrap_or(0);
    let mut out = RawGrid::new();
    for grid in grids {
        for mut row in grid {
            while row.len() < max_cols {
                row.push(String::new());
            }
            out.push(row);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn fake_path() -> PathBuf {
        PathBuf::from("proveedores/acme.pdf")
    }

    #[test]
    fn header_row_repetition_is_removed() {
        let pages = vec![(0..150)
            .map(|i| {
                if i == 0 || i == 50 || i == 100 {
                    "Codigo          Descripcion              Precio".to_string()
                } else {
                    format!("X{i:04}        Llave de tubo modelo {i}        1.{:03},00", (i % 9) + 1)
                }
            })
            .collect::<Vec<_>>()
            .join("\n")];

        let grid = extract_from_pages(&fake_path(), &pages);
        let has_codigo_row = grid.iter().any(|row| {
            row.first()
                .map(|c| c.eq_ignore_ascii_case("codigo"))
                .unwrap_or(false)
        });
        assert!(!has_codigo_row);
        assert!(grid.len() >= 140);
    }

    #[test]
    fn text_salvage_supersedes_garbage_tables() {
        // Ruled/whitespace pass yields a tiny "cover page" table (few rows),
        // regex salvage yields many more product lines.
        let mut lines = vec!["   FERRETERIA ACME   CATALOGO 2026   ".to_string()];
        for i in 0..412 {
            lines.push(format!("COD{i:04} Producto de ferreteria numero {i} 1.234,56 extra"));
        }
        let page = lines.join("\n");

        let grid = extract_from_pages(&fake_path(), &[page]);
        assert_eq!(grid.len(), 412);
    }

    #[test]
    fn el_taller_fast_path_filters_noise_rows() {
        let pages = vec![
            "Martillo de bola grande     $ 1500\nOferta especial solo hoy     $ 200\nLuis Estela contacto gmail     $ 0"
                .to_string(),
        ];
        let path = PathBuf::from("proveedores/EL TALLER lista.pdf");
        let grid = extract_from_pages(&path, &pages);
        assert_eq!(grid.len(), 1);
        assert_eq!(grid[0][0], "Martillo de bola grande");
    }

    #[test]
    fn repeated_header_row_detection() {
        let row = vec![
            "Codigo".to_string(),
            "Descripcion".to_string(),
            "Precio".to_string(),
        ];
        assert!(is_repeated_header_row(&row));
    }

    #[test]
    fn section_title_row_detection() {
        let row = vec!["HERRAMIENTAS MANUALES".to_string(), String::new(), String::new()];
        assert!(is_section_title_row(&row, 3));
    }

    #[test]
    fn split_on_wide_gaps_requires_minimum_run() {
        let cols = split_on_wide_gaps("Martillo de bola     1500,00", 4);
        assert_eq!(cols, vec!["Martillo de bola", "1500,00"]);
    }
}
