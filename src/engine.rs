//! PriceEngine: the crate's public core API. Owns the input directory,
//! the `ConfigStore`, and the current `Catalog` snapshot; wires `ingest`,
//! `search`, and `pricing` together: ConfigStore -> FileIngestor (fan-out,
//! fork-join) -> Catalog, then Search/Pricing read the resulting snapshot.
//!
//! Catalog snapshots are swapped atomically behind a `RwLock<Arc<Catalog>>`:
//! `reload` builds a brand new `Catalog` off to the side and only then
//! replaces the lock's contents, so a search in flight during a reload
//! always sees one complete, self-consistent Catalog - never a
//! half-populated one.

use crate::catalog::Catalog;
use crate::config::ConfigStore;
use crate::ingest;
use crate::model::{GlobalConfig, SearchHit, SupplierConfig};
use crate::search;
use anyhow::Result;
use rust_decimal::Decimal;
use std::path::PathBuf;
use std::sync::{Arc, RwLock};

pub struct PriceEngine {
    input_dir: PathBuf,
    config_store: ConfigStore,
    config: RwLock<GlobalConfig>,
    catalog: RwLock<Arc<Catalog>>,
}

impl PriceEngine {
    /// Opens the engine against `input_dir` and `config_path`, loading the
    /// global config (falling back to built-in defaults on any error).
    /// Does not ingest any files yet - call `reload` for that.
    pub fn open(input_dir: impl Into<PathBuf>, config_path: impl Into<PathBuf>) -> Self {
        let config_store = ConfigStore::new(config_path);
        let config = config_store.load();
        PriceEngine {
            input_dir: input_dir.into(),
            config_store,
            config: RwLock::new(config),
            catalog: RwLock::new(Arc::new(Catalog::new())),
        }
    }

    /// Repopulates the Catalog from disk: runs the parallel FileIngestor
    /// over `input_dir`, then swaps the snapshot in one atomic write.
    /// Returns the number of suppliers successfully ingested.
    pub fn reload(&self) -> usize {
        let tables = ingest::ingest_directory(&self.input_dir);
        let mut catalog = Catalog::new();
        for (supplier, table) in tables {
            catalog.insert(supplier, table);
        }
        let count = catalog.list_suppliers().len();
        *self.catalog.write().expect("catalog lock poisoned") = Arc::new(catalog);
        count
    }

    fn snapshot(&self) -> Arc<Catalog> {
        Arc::clone(&self.catalog.read().expect("catalog lock poisoned"))
    }

    /// Two-phase substring/fuzzy search against the current snapshot.
    /// Never fails; returns an empty list for an empty catalog or query.
    pub fn search(&self, query: &str, limit: usize, supplier: Option<&str>) -> Vec<SearchHit> {
        let catalog = self.snapshot();
        let config = self.config.read().expect("config lock poisoned");
        search::search(&catalog, &config, query, limit, supplier)
    }

    pub fn list_suppliers(&self) -> Vec<String> {
        self.snapshot().list_suppliers()
    }

    pub fn total_products(&self) -> usize {
        self.snapshot().total_products()
    }

    pub fn config_for(&self, supplier: &str) -> SupplierConfig {
        self.config.read().expect("config lock poisoned").config_for(supplier)
    }

    pub fn global_config(&self) -> GlobalConfig {
        self.config.read().expect("config lock poisoned").clone()
    }

    /// Updates and persists a supplier's markup/discount cascade. Surfaced
    /// to callers (unlike ingestion errors): a config write failure is the
    /// one failure mode that must propagate.
    pub fn update_margin(
        &self,
        supplier: &str,
        markup_pct: Decimal,
        discount1_pct: Decimal,
        discount2_pct: Decimal,
    ) -> Result<()> {
        let mut config = self.config.write().expect("config lock poisoned");
        config.margenes_por_proveedor.insert(
            supplier.to_string(),
            crate::model::MarginEntry::Record {
                margen: markup_pct,
                desc1: discount1_pct,
                desc2: discount2_pct,
            },
        );
        self.config_store.save(&config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use std::io::Write;

    fn make_engine() -> (tempfile::TempDir, PriceEngine) {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("config.json");
        let engine = PriceEngine::open(dir.path(), config_path);
        (dir, engine)
    }

    #[test]
    fn reload_on_empty_directory_yields_empty_catalog() {
        let (_dir, engine) = make_engine();
        assert_eq!(engine.reload(), 0);
        assert_eq!(engine.total_products(), 0);
        assert!(engine.list_suppliers().is_empty());
    }

    #[test]
    fn reload_ingests_valid_supplier_file() {
        let (dir, engine) = make_engine();
        let mut file = std::fs::File::create(dir.path().join("acme.csv")).unwrap();
        writeln!(file, "Martillo de bola grande,1000,00").unwrap();
        writeln!(file, "Pinza universal profesional,500,00").unwrap();
        drop(file);

        assert_eq!(engine.reload(), 1);
        assert_eq!(engine.total_products(), 2);
        assert_eq!(engine.list_suppliers(), vec!["acme".to_string()]);
    }

    #[test]
    fn reload_idempotence_yields_equal_catalogs() {
        let (dir, engine) = make_engine();
        let mut file = std::fs::File::create(dir.path().join("acme.csv")).unwrap();
        writeln!(file, "Martillo de bola grande,1000,00").unwrap();
        drop(file);

        engine.reload();
        let first_total = engine.total_products();
        let first_suppliers = engine.list_suppliers();
        engine.reload();
        assert_eq!(engine.total_products(), first_total);
        assert_eq!(engine.list_suppliers(), first_suppliers);
    }

    #[test]
    fn update_margin_round_trips_through_reload() {
        let (_dir, engine) = make_engine();
        engine
            .update_margin("acme", dec!(35), dec!(10), dec!(5))
            .unwrap();
        engine.reload();
        let config = engine.config_for("acme");
        assert_eq!(config.markup_pct, dec!(35));
        assert_eq!(config.discount1_pct, dec!(10));
        assert_eq!(config.discount2_pct, dec!(5));
    }

    #[test]
    fn search_end_to_end_against_real_ingested_catalog() {
        let (dir, engine) = make_engine();
        let mut file = std::fs::File::create(dir.path().join("acme.csv")).unwrap();
        writeln!(file, "Martillo de bola grande,1000,00").unwrap();
        drop(file);
        engine.update_margin("acme", dec!(50), dec!(0), dec!(0)).unwrap();
        engine.reload();

        let hits = engine.search("martillo", 10, None);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].sale_price, dec!(1500.00));
    }
}
