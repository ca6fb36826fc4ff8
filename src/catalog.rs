//! Catalog: aggregates per-supplier normalized tables. Owned exclusively by
//! the `PriceEngine`; readers (search/pricing) observe a single consistent
//! snapshot, swapped atomically on reload (see `engine` module).

use crate::model::SupplierTable;
use std::collections::HashMap;

/// Mapping `supplier_name -> SupplierTable`. Keys are unique by
/// construction (one entry per ingested file).
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    tables: HashMap<String, SupplierTable>,
}

impl Catalog {
    pub fn new() -> Self {
        Catalog {
            tables: HashMap::new(),
        }
    }

    pub fn from_tables(tables: HashMap<String, SupplierTable>) -> Self {
        Catalog { tables }
    }

    pub fn insert(&mut self, supplier: String, table: SupplierTable) {
        self.tables.insert(supplier, table);
    }

    pub fn supplier_table(&self, supplier: &str) -> Option<&SupplierTable> {
        self.tables.get(supplier)
    }

    pub fn list_suppliers(&self) -> Vec<String> {
        let mut names: Vec<String> = self.tables.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn total_products(&self) -> usize {
        self.tables.values().map(|t| t.len()).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &SupplierTable)> {
        self.tables.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}
