// src/settings/mod.rs
//
// Runtime configuration.
//
// Sources, in increasing priority:
// 1. Built-in defaults
// 2. config/catalogmix.toml (optional)
// 3. CATALOGMIX__* environment variables (e.g. CATALOGMIX__BREADCRUMB__MAX_DEPTH=8)

use std::path::{Path, PathBuf};

use config::{Config, Environment, File};
use serde::Deserialize;

use crate::error::AppResult;

pub const DEFAULT_CONFIG_FILE: &str = "config/catalogmix.toml";
const ENV_PREFIX: &str = "CATALOGMIX";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CatalogConfig {
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub documents: CollectionConfig,
    #[serde(default)]
    pub breadcrumb: BreadcrumbConfig,
    #[serde(default)]
    pub cascade: CascadeConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Database file; the platform data directory is used when unset
    #[serde(default)]
    pub path: Option<PathBuf>,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

/// Names the document collection backing the read model
#[derive(Debug, Clone, Deserialize)]
pub struct CollectionConfig {
    #[serde(default = "default_collection")]
    pub collection: String,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct BreadcrumbConfig {
    /// Maximum number of ancestors walked above a category
    #[serde(default = "default_breadcrumb_depth")]
    pub max_depth: usize,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct CascadeConfig {
    /// Maximum nesting of publish calls on one thread
    #[serde(default = "default_max_publish_depth")]
    pub max_publish_depth: usize,
    /// Number of publish records kept in the bus event log
    #[serde(default = "default_event_log_capacity")]
    pub event_log_capacity: usize,
}

fn default_max_connections() -> u32 {
    8
}

fn default_collection() -> String {
    "mix_categories".to_string()
}

fn default_breadcrumb_depth() -> usize {
    16
}

fn default_max_publish_depth() -> usize {
    256
}

fn default_event_log_capacity() -> usize {
    1024
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: None,
            max_connections: default_max_connections(),
        }
    }
}

impl Default for CollectionConfig {
    fn default() -> Self {
        Self {
            collection: default_collection(),
        }
    }
}

impl Default for BreadcrumbConfig {
    fn default() -> Self {
        Self {
            max_depth: default_breadcrumb_depth(),
        }
    }
}

impl Default for CascadeConfig {
    fn default() -> Self {
        Self {
            max_publish_depth: default_max_publish_depth(),
            event_log_capacity: default_event_log_capacity(),
        }
    }
}

impl CatalogConfig {
    /// Load from the default config file location and the environment
    pub fn load() -> AppResult<Self> {
        Self::load_from(Path::new(DEFAULT_CONFIG_FILE))
    }

    /// Load from a specific (optional) file and the environment
    pub fn load_from(path: &Path) -> AppResult<Self> {
        let settings = Config::builder()
            .add_source(File::from(path).required(false))
            .add_source(Environment::with_prefix(ENV_PREFIX).separator("__"))
            .build()?;

        let loaded: CatalogConfig = settings.try_deserialize()?;
        log::debug!("Loaded configuration: {:?}", loaded);
        Ok(loaded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = CatalogConfig::default();
        assert_eq!(config.documents.collection, "mix_categories");
        assert_eq!(config.breadcrumb.max_depth, 16);
        assert_eq!(config.cascade.max_publish_depth, 256);
        assert_eq!(config.database.max_connections, 8);
        assert!(config.database.path.is_none());
    }

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = CatalogConfig::load_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config.breadcrumb.max_depth, 16);
    }

    #[test]
    fn test_file_overrides_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalogmix.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "[documents]\ncollection = \"category_docs\"\n\n[breadcrumb]\nmax_depth = 4").unwrap();

        let config = CatalogConfig::load_from(&path).unwrap();
        assert_eq!(config.documents.collection, "category_docs");
        assert_eq!(config.breadcrumb.max_depth, 4);
        assert_eq!(config.cascade.event_log_capacity, 1024);
    }
}
