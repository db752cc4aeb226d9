//! Model registry for the inference host
//!
//! This crate provides the VRAM-budgeted model cache: a catalog of loadable
//! models built from configuration, a class registry mapping class names to
//! factories, and the registry core that lazily loads models, tracks their
//! declared footprints against the accelerator budget, and evicts loaded
//! models when a requested one would not fit.

pub mod catalog;
pub mod class_registry;
pub mod contract;
pub mod eviction;
pub mod registry;

// Re-export commonly used types
pub use catalog::{Catalog, ModelDescriptor, ModelListing};
pub use class_registry::ClassRegistry;
pub use contract::{InferenceModel, ModelCapabilities, ModelFactory};
pub use registry::ModelRegistry;
