//! Static model catalog
//!
//! The catalog is the read-mostly description of every loadable model,
//! built once from configuration at process start and immutable afterwards.
//! It maintains two views: a nested category -> name -> descriptor mapping
//! and a flat name -> descriptor mapping for unscoped lookups. Model names
//! are globally unique across categories; duplicates are rejected at build
//! time so the flat view can never shadow an entry.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use serde::Serialize;

use common::error::{Error, Result};
use common::types::{Mebibytes, ParamMap};
use config::CatalogConfig;

/// Immutable description of one loadable model
#[derive(Debug, Clone)]
pub struct ModelDescriptor {
    /// Unique model name, the cache key
    pub name: String,

    /// Grouping label
    pub category: String,

    /// Factory key into the class registry
    pub class_name: String,

    /// Opaque parameters passed to the factory
    pub constructor_args: ParamMap,

    /// Opaque parameters passed to the load operation
    pub loader_args: ParamMap,

    /// Declared footprint in MiB; None means the configured default applies
    pub footprint_mib: Option<Mebibytes>,
}

/// Result of a catalog listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ModelListing {
    /// Every category mapped to its model names
    All(BTreeMap<String, Vec<String>>),

    /// The model names of a single category
    Category(Vec<String>),
}

/// The static catalog of loadable models
#[derive(Debug)]
pub struct Catalog {
    /// Nested view: category -> name -> descriptor
    by_category: BTreeMap<String, BTreeMap<String, Arc<ModelDescriptor>>>,

    /// Flat view: name -> descriptor
    by_name: HashMap<String, Arc<ModelDescriptor>>,

    /// Footprint assumed for descriptors without a declared one
    default_footprint_mib: Mebibytes,
}

impl Catalog {
    /// Builds the catalog views from a validated configuration
    ///
    /// Fails with a configuration error when two categories declare the
    /// same model name.
    pub fn from_config(config: &CatalogConfig) -> Result<Self> {
        let mut by_category: BTreeMap<String, BTreeMap<String, Arc<ModelDescriptor>>> =
            BTreeMap::new();
        let mut by_name: HashMap<String, Arc<ModelDescriptor>> = HashMap::new();

        for (category, entries) in &config.models {
            let mut names: BTreeMap<String, Arc<ModelDescriptor>> = BTreeMap::new();

            for (name, entry) in entries {
                let descriptor = Arc::new(ModelDescriptor {
                    name: name.clone(),
                    category: category.clone(),
                    class_name: entry.class_name.clone(),
                    constructor_args: entry.constructor_args.clone(),
                    loader_args: entry.loader_args.clone(),
                    footprint_mib: entry.footprint_mib,
                });

                if let Some(previous) = by_name.insert(name.clone(), descriptor.clone()) {
                    return Err(Error::Config(format!(
                        "Duplicate model name '{}' in categories '{}' and '{}'",
                        name, previous.category, category
                    )));
                }

                names.insert(name.clone(), descriptor);
            }

            by_category.insert(category.clone(), names);
        }

        Ok(Self {
            by_category,
            by_name,
            default_footprint_mib: config.default_footprint_mib,
        })
    }

    /// Lists model names, either for one category or for all of them
    pub fn list_models(&self, category: Option<&str>) -> Result<ModelListing> {
        match category {
            None => {
                let all = self
                    .by_category
                    .iter()
                    .map(|(category, names)| (category.clone(), names.keys().cloned().collect()))
                    .collect();
                Ok(ModelListing::All(all))
            }
            Some(category) => {
                let names = self
                    .by_category
                    .get(category)
                    .ok_or_else(|| Error::UnknownCategory(category.to_string()))?;
                Ok(ModelListing::Category(names.keys().cloned().collect()))
            }
        }
    }

    /// Resolves a descriptor by name, optionally scoped to a category
    ///
    /// With a category, the name is looked up inside that category only;
    /// without one, the flat view answers.
    pub fn describe(&self, name: &str, category: Option<&str>) -> Result<Arc<ModelDescriptor>> {
        match category {
            Some(category) => {
                let names = self
                    .by_category
                    .get(category)
                    .ok_or_else(|| Error::UnknownCategory(category.to_string()))?;
                names
                    .get(name)
                    .cloned()
                    .ok_or_else(|| Error::UnknownModel(name.to_string()))
            }
            None => self
                .by_name
                .get(name)
                .cloned()
                .ok_or_else(|| Error::UnknownModel(name.to_string())),
        }
    }

    /// Returns the footprint to budget for a descriptor, applying the
    /// configured default when none is declared
    pub fn required_footprint(&self, descriptor: &ModelDescriptor) -> Mebibytes {
        descriptor.footprint_mib.unwrap_or(self.default_footprint_mib)
    }

    /// Returns the configured default footprint in MiB
    pub fn default_footprint_mib(&self) -> Mebibytes {
        self.default_footprint_mib
    }

    /// Returns the number of models in the catalog
    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    /// Returns true when the catalog holds no models
    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }
}
