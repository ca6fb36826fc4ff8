//! Command-line surface for the price engine: one process invocation maps
//! to one of the engine's published operations (`reload`, `search`,
//! `list_suppliers`, `total_products`, `update_margin`), plus a thin
//! `ingest` alias kept for discoverability.

pub mod formatters;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "precios")]
#[command(version, about = "Ferretería supplier price-list ingestion, catalog, and fuzzy search engine")]
#[command(long_about = "Ingests a directory of heterogeneous supplier price lists (spreadsheets, \
delimited text, PDFs), normalizes them into one queryable catalog, and exposes \
substring/fuzzy search plus per-supplier markup pricing.")]
pub struct Cli {
    /// Directory containing supplier files (.xlsx, .xls, .csv, .pdf)
    #[arg(short = 'd', long, global = true, default_value = ".")]
    pub input_dir: String,

    /// Path to the global config document (margins, fuzzy threshold, currency)
    #[arg(short = 'c', long, global = true, default_value = "config.json")]
    pub config: String,

    /// Emit machine-readable JSON instead of a formatted table
    #[arg(long, global = true)]
    pub json: bool,

    /// Disable ANSI colors in table output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Re-ingest the input directory and report how many suppliers loaded
    Reload,

    /// Search the catalog by product name or code (substring, then fuzzy)
    Search {
        /// Text to search for
        query: String,

        /// Maximum number of hits to return
        #[arg(short, long, default_value_t = 20)]
        limit: usize,

        /// Restrict the search to a single supplier
        #[arg(short, long)]
        supplier: Option<String>,
    },

    /// List every supplier currently in the catalog
    Suppliers,

    /// Print the total number of products across all suppliers
    Total,

    /// Update (and persist) a supplier's markup and discount cascade
    UpdateMargin {
        /// Supplier name (matches the ingested file's stem)
        supplier: String,

        /// Markup percentage applied after the discount cascade
        markup: String,

        /// First discount percentage (applied to cost)
        #[arg(default_value = "0")]
        discount1: String,

        /// Second discount percentage (applied after the first)
        #[arg(default_value = "0")]
        discount2: String,
    },
}
