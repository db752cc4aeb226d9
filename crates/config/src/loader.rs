//! Catalog configuration loading
//!
//! This module reads the YAML catalog source from an explicit path or from
//! the `MODELS_YAML_PATH` environment variable. Loading happens once at
//! process start; the resulting configuration is immutable afterwards.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use common::error::{Error, Result};

use crate::schema::CatalogConfig;

/// Environment variable naming the catalog source when no explicit path is
/// given
pub const MODELS_YAML_ENV: &str = "MODELS_YAML_PATH";

/// Loads the catalog configuration from the given path, or from the
/// `MODELS_YAML_PATH` environment variable when no path is given
pub fn load_catalog_config(path: Option<&Path>) -> Result<CatalogConfig> {
    let path: PathBuf = match path {
        Some(p) => p.to_path_buf(),
        None => std::env::var(MODELS_YAML_ENV)
            .map(PathBuf::from)
            .map_err(|_| {
                Error::Config(format!(
                    "No catalog path given and {} is not set",
                    MODELS_YAML_ENV
                ))
            })?,
    };

    if !path.exists() {
        return Err(Error::Config(format!(
            "Catalog configuration file {} not found",
            path.display()
        )));
    }

    let text = fs::read_to_string(&path)?;
    let config = CatalogConfig::from_yaml(&text)?;

    info!(
        path = %path.display(),
        categories = config.models.len(),
        models = config.model_count(),
        "Loaded catalog configuration"
    );

    Ok(config)
}
