//! ConfigStore: loads and persists the global markup/discount configuration
//! document.
//!
//! Grounded in `original_source/motor_precios.py::_cargar_margenes`/
//! `_guardar_margenes` for the defaults-on-missing-or-malformed behavior and
//! the write-then-replace atomicity; the atomic-write idiom itself (write to
//! a sibling temp file, then `rename`) follows the teacher's
//! `db::models`-adjacent persistence helpers' "never leave a half-written
//! file on disk" discipline.

use crate::model::GlobalConfig;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

pub struct ConfigStore {
    path: PathBuf,
}

impl ConfigStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        ConfigStore { path: path.into() }
    }

    /// Loads the config document. A missing file or a file that fails to
    /// parse never aborts startup: both cases log and fall back to
    /// `GlobalConfig::default()` (margin=20, fuzzy=60).
    pub fn load(&self) -> GlobalConfig {
        match std::fs::read_to_string(&self.path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(config) => config,
                Err(err) => {
                    tracing::warn!(path = %self.path.display(), error = %err, "config parse error, using defaults");
                    GlobalConfig::default()
                }
            },
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!(path = %self.path.display(), "no config file found, using defaults");
                GlobalConfig::default()
            }
            Err(err) => {
                tracing::warn!(path = %self.path.display(), error = %err, "config read error, using defaults");
                GlobalConfig::default()
            }
        }
    }

    /// Persists `config` atomically: serializes pretty-printed UTF-8 to a
    /// sibling temp file, then renames it over the destination. A crash or
    /// concurrent reader never observes a partially-written document.
    pub fn save(&self, config: &GlobalConfig) -> Result<()> {
        save_atomic(&self.path, config)
    }
}

fn save_atomic(path: &Path, config: &GlobalConfig) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("creating config directory {}", parent.display()))?;
        }
    }
    let serialized =
        serde_json::to_string_pretty(config).context("serializing global config")?;

    let tmp_path = path.with_extension("json.tmp");
    std::fs::write(&tmp_path, serialized)
        .with_context(|| format!("writing temp config file {}", tmp_path.display()))?;
    std::fs::rename(&tmp_path, path)
        .with_context(|| format!("replacing config file {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let store = ConfigStore::new(dir.path().join("no-such-config.json"));
        let config = store.load();
        assert_eq!(config.margen_default, dec!(20));
        assert_eq!(config.umbral_busqueda_fuzzy, 60);
    }

    #[test]
    fn malformed_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{ not valid json").unwrap();
        let store = ConfigStore::new(&path);
        let config = store.load();
        assert_eq!(config.margen_default, dec!(20));
    }

    #[test]
    fn save_then_load_roundtrips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        let store = ConfigStore::new(&path);

        let mut config = GlobalConfig::default();
        config.margen_default = dec!(25);
        config.moneda = "ARS".to_string();
        store.save(&config).unwrap();

        let reloaded = store.load();
        assert_eq!(reloaded.margen_default, dec!(25));
        assert_eq!(reloaded.moneda, "ARS");
    }

    #[test]
    fn save_leaves_no_temp_file_behind() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        let store = ConfigStore::new(&path);
        store.save(&GlobalConfig::default()).unwrap();
        assert!(!path.with_extension("json.tmp").exists());
        assert!(path.exists());
    }

    #[test]
    fn save_preserves_untouched_keys() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        let store = ConfigStore::new(&path);

        let mut config = GlobalConfig::default();
        config
            .margenes_por_proveedor
            .insert("acme".to_string(), crate::model::MarginEntry::Scalar(dec!(15)));
        store.save(&config).unwrap();

        let mut reloaded = store.load();
        reloaded.margen_default = dec!(30);
        store.save(&reloaded).unwrap();

        let final_config = store.load();
        assert_eq!(final_config.config_for("acme").markup_pct, dec!(15));
        assert_eq!(final_config.margen_default, dec!(30));
    }
}
