//! Per-supplier cache of post-normalization `SupplierTable`s. The only
//! contract is mtime-newer-than-source means reuse. The serialization
//! format (`serde_json`, one file per supplier) is otherwise an
//! implementation detail, the cache is fully discardable.
//!
//! Cache reads and writes are best-effort by design: a cache miss or write
//! failure is logged and ingestion proceeds as if no cache existed.

use crate::model::SupplierTable;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

fn cache_file(cache_dir: &Path, supplier: &str) -> PathBuf {
    cache_dir.join(format!("{supplier}.json"))
}

/// Returns the cached table for `supplier` if its cache file exists and its
/// modification time is strictly newer than `source_mtime`. Any I/O or
/// deserialization failure is treated as a cache miss, not an error.
pub fn load(cache_dir: &Path, supplier: &str, source_mtime: SystemTime) -> Option<SupplierTable> {
    let path = cache_file(cache_dir, supplier);
    let metadata = std::fs::metadata(&path).ok()?;
    let cache_mtime = metadata.modified().ok()?;
    if cache_mtime <= source_mtime {
        return None;
    }
    let contents = std::fs::read_to_string(&path).ok()?;
    match serde_json::from_str(&contents) {
        Ok(table) => Some(table),
        Err(err) => {
            tracing::warn!(supplier, error = %err, "cache deserialization failed, ignoring cache");
            None
        }
    }
}

/// Best-effort cache write. Failures are logged and otherwise ignored,
/// ingestion must never fail because the cache directory is unwritable.
pub fn store(cache_dir: &Path, supplier: &str, table: &SupplierTable) {
    if let Err(err) = std::fs::create_dir_all(cache_dir) {
        tracing::warn!(supplier, error = %err, "could not create cache directory, skipping cache write");
        return;
    }
    let path = cache_file(cache_dir, supplier);
    match serde_json::to_string(table) {
        Ok(serialized) => {
            if let Err(err) = std::fs::write(&path, serialized) {
                tracing::warn!(supplier, error = %err, "cache write failed");
            }
        }
        Err(err) => {
            tracing::warn!(supplier, error = %err, "cache serialization failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::NormalizedRow;
    use rust_decimal_macros::dec;
    use std::time::Duration;

    fn sample_table() -> SupplierTable {
        vec![NormalizedRow {
            code: "C1".to_string(),
            product: "Martillo de bola".to_string(),
            cost: dec!(100),
        }]
    }

    #[test]
    fn missing_cache_is_a_miss() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load(dir.path(), "acme", SystemTime::now()).is_none());
    }

    #[test]
    fn store_then_load_with_newer_cache_hits() {
        let dir = tempfile::tempdir().unwrap();
        let table = sample_table();
        store(dir.path(), "acme", &table);

        let source_mtime = SystemTime::now() - Duration::from_secs(60);
        let loaded = load(dir.path(), "acme", source_mtime);
        assert_eq!(loaded, Some(table));
    }

    #[test]
    fn cache_older_than_source_is_a_miss() {
        let dir = tempfile::tempdir().unwrap();
        store(dir.path(), "acme", &sample_table());

        let source_mtime = SystemTime::now() + Duration::from_secs(60);
        assert!(load(dir.path(), "acme", source_mtime).is_none());
    }

    #[test]
    fn corrupted_cache_file_is_a_miss_not_a_panic() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("acme.json"), "not json").unwrap();
        let source_mtime = SystemTime::now() - Duration::from_secs(60);
        assert!(load(dir.path(), "acme", source_mtime).is_none());
    }
}
