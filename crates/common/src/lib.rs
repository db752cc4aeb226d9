//! Common utilities and types for the inference host
//!
//! This crate provides the error taxonomy and shared types used by the
//! catalog, probe, and registry crates.

pub mod error;
pub mod types;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::ParamMap;
