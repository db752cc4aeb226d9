//! Configuration management for the inference host
//!
//! This crate defines the declarative catalog schema and loads it from a
//! YAML source at process start. The parsed configuration is handed to the
//! registry, which builds its immutable catalog views from it.

pub mod loader;
pub mod schema;

// Re-export commonly used types
pub use loader::{load_catalog_config, MODELS_YAML_ENV};
pub use schema::{CatalogConfig, ModelEntry};
