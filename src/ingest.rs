//! FileIngestor: orchestrates reader -> inferencer -> normalizer -> cache
//! for a single file, and the parallel fork-join that runs this over an
//! entire input directory.
//!
//! Grounded in `original_source/motor_precios.py::cargar_catalogo` for the
//! per-file state machine (cache check, manual-mapping sidecar, dispatch by
//! extension); parallelism uses `rayon`'s fork-join data-parallel iterators
//! for independent per-file work, so no task reads another's intermediate
//! state.

use crate::model::{ManualMapping, SupplierTable};
use crate::readers::{self, FileKind};
use crate::schema;
use crate::{cache, model::RawGrid};
use rayon::prelude::*;
use std::path::{Path, PathBuf};

/// One file discovered in the input directory, ready to be ingested.
struct Candidate {
    path: PathBuf,
    kind: FileKind,
    supplier: String,
}

/// Lists eligible files directly inside `dir` (non-recursive, as the input
/// directory is specified to be flat). Skips the `cache/` subdirectory and
/// any `<file>.json` manual-mapping sidecars, which are not price lists.
fn discover(dir: &Path) -> Vec<Candidate> {
    let mut out = Vec::new();
    let Ok(entries) = std::fs::read_dir(dir) else {
        return out;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
            continue;
        };
        let Some(kind) = FileKind::from_extension(ext) else {
            continue;
        };
        let Some(supplier) = path.file_stem().and_then(|s| s.to_str()) else {
            continue;
        };
        out.push(Candidate {
            path: path.clone(),
            kind,
            supplier: supplier.to_string(),
        });
    }
    out
}

fn manual_mapping_for(path: &Path) -> Option<ManualMapping> {
    let sidecar = sidecar_path(path);
    let contents = std::fs::read_to_string(&sidecar).ok()?;
    match serde_json::from_str(&contents) {
        Ok(mapping) => Some(mapping),
        Err(err) => {
            tracing::warn!(path = %sidecar.display(), error = %err, "manual mapping sidecar parse error, ignoring");
            None
        }
    }
}

fn sidecar_path(path: &Path) -> PathBuf {
    let mut os = path.as_os_str().to_os_string();
    os.push(".json");
    PathBuf::from(os)
}

fn read_raw_grid(path: &Path, kind: FileKind) -> anyhow::Result<RawGrid> {
    match kind {
        FileKind::Workbook => readers::spreadsheet::read_workbook(path),
        FileKind::DelimitedText => readers::spreadsheet::read_delimited_text(path),
        FileKind::Pdf => readers::pdf::extract(path),
    }
}

/// Ingests a single file: cache check, optional manual mapping, read,
/// infer, best-effort cache write. Returns `None` if the file cannot be
/// read or does not contain a recognizable price table (logged, never
/// propagated - a single bad file must never abort the directory load).
fn ingest_one(candidate: &Candidate, cache_dir: &Path) -> Option<(String, SupplierTable)> {
    let source_mtime = std::fs::metadata(&candidate.path).and_then(|m| m.modified()).ok();

    if let Some(mtime) = source_mtime {
        if let Some(cached) = cache::load(cache_dir, &candidate.supplier, mtime) {
            tracing::debug!(supplier = %candidate.supplier, "cache hit");
            return Some((candidate.supplier.clone(), cached));
        }
    }

    let manual = manual_mapping_for(&candidate.path);

    let grid = match read_raw_grid(&candidate.path, candidate.kind) {
        Ok(grid) => grid,
        Err(err) => {
            tracing::warn!(path = %candidate.path.display(), error = %err, "read failure, skipping file");
            return None;
        }
    };

    let table = schema::infer(&grid, manual.as_ref());
    if table.is_empty() {
        tracing::info!(path = %candidate.path.display(), "not a price table, dropping from catalog");
        return None;
    }

    cache::store(cache_dir, &candidate.supplier, &table);
    Some((candidate.supplier.clone(), table))
}

/// Ingests every eligible file under `input_dir` in parallel (one rayon
/// task per file), and joins into a `(supplier, SupplierTable)` list.
/// Workers are independent; the caller is the only place results are
/// aggregated, as a fork-join barrier.
pub fn ingest_directory(input_dir: &Path) -> Vec<(String, SupplierTable)> {
    let cache_dir = input_dir.join("cache");
    let candidates = discover(input_dir);
    candidates
        .par_iter()
        .filter_map(|c| ingest_one(c, &cache_dir))
        .collect()
}
