//! Common types for the inference host
//!
//! This module defines the shared representations for model parameters and
//! resource amounts used across the workspace.

use std::collections::HashMap;

use serde_json::Value;

/// Opaque key-value bag passed to model factories and load operations.
///
/// The registry never interprets these values; they flow from the catalog
/// configuration straight through to the model implementation.
pub type ParamMap = HashMap<String, Value>;

/// Resource units used throughout the workspace: mebibytes of accelerator
/// memory. Footprints, probe readings, and the default budget all share
/// this unit.
pub type Mebibytes = u64;

/// Formats a mebibyte amount for log output
pub fn format_mib(amount: Mebibytes) -> String {
    if amount >= 1024 && amount % 1024 == 0 {
        format!("{} GiB", amount / 1024)
    } else {
        format!("{} MiB", amount)
    }
}
