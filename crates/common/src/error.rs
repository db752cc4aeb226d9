//! Error types for the inference host
//!
//! This module defines the error taxonomy shared by every crate in the
//! workspace. Registry operations surface these directly to the caller;
//! nothing is retried internally.

use thiserror::Error;

/// Result type for inference host operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error type for inference host operations
#[derive(Error, Debug)]
pub enum Error {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Category not present in the catalog
    #[error("Unknown category: {0}")]
    UnknownCategory(String),

    /// Model name not present in the catalog under the given scope
    #[error("Unknown model: {0}")]
    UnknownModel(String),

    /// Class name not registered with the class registry
    #[error("Unknown class: {0}")]
    UnknownClass(String),

    /// The underlying model failed to acquire its resources
    #[error("Load error for model '{model}': {reason}")]
    Load {
        /// Name of the model that failed to load
        model: String,
        /// Description of the failure
        reason: String,
    },
}

impl Error {
    /// Builds a load error for the named model
    pub fn load(model: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::Load {
            model: model.into(),
            reason: reason.into(),
        }
    }

    /// Returns true if the error is an unknown-category error
    pub fn is_unknown_category(&self) -> bool {
        matches!(self, Error::UnknownCategory(_))
    }

    /// Returns true if the error is an unknown-model error
    pub fn is_unknown_model(&self) -> bool {
        matches!(self, Error::UnknownModel(_))
    }

    /// Returns true if the error is an unknown-class error
    pub fn is_unknown_class(&self) -> bool {
        matches!(self, Error::UnknownClass(_))
    }

    /// Returns true if the error is a load error
    pub fn is_load(&self) -> bool {
        matches!(self, Error::Load { .. })
    }
}
