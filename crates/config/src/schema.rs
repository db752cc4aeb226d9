//! Catalog configuration schema
//!
//! This module defines the serde representation of the YAML catalog source:
//! a default footprint budget plus categories of model entries, each naming
//! the implementing class and its construction/loading parameters.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use common::error::{Error, Result};
use common::types::{Mebibytes, ParamMap};

/// Default footprint assumed for entries that do not declare one, in MiB
pub const DEFAULT_FOOTPRINT_MIB: Mebibytes = 8192;

/// A single model entry in the catalog configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelEntry {
    /// Factory key into the class registry
    pub class_name: String,

    /// Opaque parameters passed to the factory when constructing the model
    #[serde(default)]
    pub constructor_args: ParamMap,

    /// Opaque parameters passed to the model's load operation
    #[serde(default)]
    pub loader_args: ParamMap,

    /// Declared accelerator-memory footprint in MiB; falls back to the
    /// configured default when absent
    #[serde(default)]
    pub footprint_mib: Option<Mebibytes>,
}

/// The full catalog configuration as read from the YAML source
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Footprint assumed for models without a declared one, in MiB
    #[serde(default = "default_footprint")]
    pub default_footprint_mib: Mebibytes,

    /// Categories mapped to their model entries, keyed by model name
    #[serde(default)]
    pub models: BTreeMap<String, BTreeMap<String, ModelEntry>>,
}

fn default_footprint() -> Mebibytes {
    DEFAULT_FOOTPRINT_MIB
}

impl CatalogConfig {
    /// Parses a catalog configuration from YAML text
    pub fn from_yaml(text: &str) -> Result<Self> {
        let config: CatalogConfig = serde_yaml::from_str(text)
            .map_err(|e| Error::Config(format!("Invalid catalog configuration: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Validates the parsed configuration
    ///
    /// Every entry must name a class, and model names must be unique across
    /// categories: the registry resolves unscoped lookups through a flat
    /// name view, so a duplicate would shadow an earlier entry.
    pub fn validate(&self) -> Result<()> {
        let mut seen: BTreeMap<&str, &str> = BTreeMap::new();

        for (category, entries) in &self.models {
            for (name, entry) in entries {
                if entry.class_name.is_empty() {
                    return Err(Error::Config(format!(
                        "Model '{}' in category '{}' has an empty class name",
                        name, category
                    )));
                }

                if let Some(previous) = seen.insert(name.as_str(), category.as_str()) {
                    return Err(Error::Config(format!(
                        "Duplicate model name '{}' in categories '{}' and '{}'",
                        name, previous, category
                    )));
                }
            }
        }

        Ok(())
    }

    /// Returns the total number of model entries across all categories
    pub fn model_count(&self) -> usize {
        self.models.values().map(|entries| entries.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
default_footprint_mib: 6144
models:
  detection:
    yolo-v8s:
      class_name: YoloDetector
      constructor_args:
        weights_path: weights/yolov8s.pt
        device: 0
      loader_args:
        half_precision: true
      footprint_mib: 4096
    yolo-v8n:
      class_name: YoloDetector
      constructor_args:
        weights_path: weights/yolov8n.pt
  segmentation:
    sam-base:
      class_name: SamSegmenter
      footprint_mib: 8192
"#;

    #[test]
    fn test_parse_sample() {
        let config = CatalogConfig::from_yaml(SAMPLE).unwrap();
        assert_eq!(config.default_footprint_mib, 6144);
        assert_eq!(config.model_count(), 3);

        let entry = &config.models["detection"]["yolo-v8s"];
        assert_eq!(entry.class_name, "YoloDetector");
        assert_eq!(entry.footprint_mib, Some(4096));
        assert_eq!(
            entry.constructor_args["weights_path"],
            serde_json::json!("weights/yolov8s.pt")
        );
        assert_eq!(entry.loader_args["half_precision"], serde_json::json!(true));

        // Undeclared footprint stays None; the registry applies the default
        let entry = &config.models["detection"]["yolo-v8n"];
        assert_eq!(entry.footprint_mib, None);
        assert!(entry.loader_args.is_empty());
    }

    #[test]
    fn test_default_footprint_applied_when_absent() {
        let config = CatalogConfig::from_yaml("models: {}").unwrap();
        assert_eq!(config.default_footprint_mib, DEFAULT_FOOTPRINT_MIB);
        assert_eq!(config.model_count(), 0);
    }

    #[test]
    fn test_duplicate_names_across_categories_rejected() {
        let text = r#"
models:
  detection:
    shared-name:
      class_name: YoloDetector
  segmentation:
    shared-name:
      class_name: SamSegmenter
"#;
        let err = CatalogConfig::from_yaml(text).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
        assert!(err.to_string().contains("Duplicate model name 'shared-name'"));
    }

    #[test]
    fn test_empty_class_name_rejected() {
        let text = r#"
models:
  detection:
    broken:
      class_name: ""
"#;
        let err = CatalogConfig::from_yaml(text).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_invalid_yaml_rejected() {
        let err = CatalogConfig::from_yaml("models: [not, a, mapping]").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }
}
