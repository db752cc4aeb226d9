//! Class registry
//!
//! Maps class-name strings from the catalog to concrete model factories.
//! Populated at process start, may grow at runtime; entries are never
//! removed. Registration is permissive: a factory that declares incomplete
//! capabilities still registers, with a structured warning.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::{debug, warn};

use common::error::{Error, Result};

use crate::contract::{ModelCapabilities, ModelFactory};

/// Registry of model factories keyed by class name
#[derive(Default)]
pub struct ClassRegistry {
    /// Registered factories (class_name -> factory)
    factories: RwLock<HashMap<String, Arc<dyn ModelFactory>>>,
}

impl ClassRegistry {
    /// Creates an empty class registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a factory under the given class name
    ///
    /// Re-registering a name replaces the previous factory. When the
    /// factory declares incomplete capabilities a single warning is
    /// emitted, but registration proceeds; the returned capabilities let
    /// the caller observe the mismatch.
    pub fn register(&self, class_name: &str, factory: Arc<dyn ModelFactory>) -> ModelCapabilities {
        let capabilities = factory.capabilities();

        if !capabilities.is_complete() {
            warn!(
                class_name,
                implements_load = capabilities.implements_load,
                implements_unload = capabilities.implements_unload,
                "Registered class does not fully implement the model contract; \
                 load or unload calls on its instances may misbehave"
            );
        }

        self.factories
            .write()
            .insert(class_name.to_string(), factory);
        debug!(class_name, "Registered model class");

        capabilities
    }

    /// Resolves the factory registered under the given class name
    pub fn resolve(&self, class_name: &str) -> Result<Arc<dyn ModelFactory>> {
        self.factories
            .read()
            .get(class_name)
            .cloned()
            .ok_or_else(|| Error::UnknownClass(class_name.to_string()))
    }

    /// Returns the number of registered classes
    pub fn len(&self) -> usize {
        self.factories.read().len()
    }

    /// Returns true when no classes are registered
    pub fn is_empty(&self) -> bool {
        self.factories.read().is_empty()
    }
}
