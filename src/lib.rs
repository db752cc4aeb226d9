//! Main integration module for the inference host
//!
//! This module wires the configuration, catalog, class registry, probe, and
//! model registry into one explicitly owned service value. Nothing here is
//! global: tests and embedders construct as many isolated hosts as they
//! need, each with its own registry state.

pub mod simulated;

use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use config::load_catalog_config;
use model_registry::{
    Catalog, ClassRegistry, InferenceModel, ModelCapabilities, ModelFactory, ModelListing,
    ModelRegistry,
};
use vram_probe::VramProbe;

pub use simulated::{SimulatedDetector, SimulatedDetectorFactory};

/// The assembled inference host: catalog, class registry, and model
/// registry over one accelerator probe
pub struct InferenceHost {
    /// The VRAM-budgeted model registry
    registry: Arc<ModelRegistry>,
}

impl InferenceHost {
    /// Builds a host from the catalog configuration at the given path (or
    /// the `MODELS_YAML_PATH` environment variable) and the given probe
    pub fn new(config_path: Option<&Path>, probe: Arc<dyn VramProbe>) -> Result<Self> {
        let config = load_catalog_config(config_path)?;
        let catalog = Arc::new(Catalog::from_config(&config)?);
        let classes = Arc::new(ClassRegistry::new());

        info!(
            models = catalog.len(),
            default_footprint_mib = catalog.default_footprint_mib(),
            total_vram_mib = probe.total_mib(),
            "Inference host initialized"
        );

        Ok(Self {
            registry: Arc::new(ModelRegistry::new(catalog, classes, probe)),
        })
    }

    /// Initializes logging for the process
    pub fn init_logging() {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

        fmt().with_env_filter(filter).with_target(true).init();
    }

    /// Binds a concrete model implementation to a catalog class name
    pub fn register_class(
        &self,
        class_name: &str,
        factory: Arc<dyn ModelFactory>,
    ) -> ModelCapabilities {
        self.registry.register_class(class_name, factory)
    }

    /// Returns the named model's handle, loading it first if necessary
    pub async fn get_model(
        &self,
        name: &str,
        category: Option<&str>,
    ) -> common::Result<Arc<dyn InferenceModel>> {
        self.registry.get_model(name, category).await
    }

    /// Unloads the named model if it is loaded
    pub async fn unload_model(&self, name: &str) {
        self.registry.unload_model(name).await
    }

    /// Hands off from one model to another
    pub async fn switch_model(&self, old: &str, new: &str) -> common::Result<Arc<dyn InferenceModel>> {
        self.registry.switch_model(old, new).await
    }

    /// Lists catalog models, all categories or one
    pub fn list_models(&self, category: Option<&str>) -> common::Result<ModelListing> {
        self.registry.list_models(category)
    }

    /// Returns the underlying registry for collaborators that hold their
    /// own reference
    pub fn registry(&self) -> Arc<ModelRegistry> {
        self.registry.clone()
    }
}
