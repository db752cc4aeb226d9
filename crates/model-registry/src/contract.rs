//! Capability contract for loadable models
//!
//! Every model the registry can manage exposes a load and an unload
//! operation. Concrete implementations are selected at runtime through the
//! class registry's factory mapping, so the registry itself only ever sees
//! these traits.

use std::sync::Arc;

use async_trait::async_trait;

use common::error::Result;
use common::types::ParamMap;

/// The shape every loadable model must expose
///
/// Both operations may block for seconds (device allocation, weight
/// deserialization); the registry never calls them while holding its own
/// lock. `load` is called exactly once per instance, before any inference
/// use. After `unload` the instance is never reused; the registry constructs
/// a fresh one on the next request.
#[async_trait]
pub trait InferenceModel: Send + Sync {
    /// Acquires the device and memory resources the model needs
    async fn load(&self, args: &ParamMap) -> Result<()>;

    /// Releases every resource acquired by `load`
    async fn unload(&self) -> Result<()>;
}

/// Capability flags a factory declares for the instances it produces
///
/// A factory whose instances do not genuinely implement both operations
/// still registers, but the registry surfaces a warning and skips the
/// `unload` call on eviction for instances that declared it absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModelCapabilities {
    /// Whether produced instances have a working load operation
    pub implements_load: bool,

    /// Whether produced instances have a working unload operation
    pub implements_unload: bool,
}

impl ModelCapabilities {
    /// Capabilities of a fully conforming implementation
    pub fn full() -> Self {
        Self {
            implements_load: true,
            implements_unload: true,
        }
    }

    /// Returns true when both operations are implemented
    pub fn is_complete(&self) -> bool {
        self.implements_load && self.implements_unload
    }
}

impl Default for ModelCapabilities {
    fn default() -> Self {
        Self::full()
    }
}

/// Factory producing instances of one model class
pub trait ModelFactory: Send + Sync {
    /// Constructs an unloaded model instance from catalog constructor
    /// parameters
    fn build(&self, args: &ParamMap) -> Result<Arc<dyn InferenceModel>>;

    /// Declares the capabilities of produced instances
    fn capabilities(&self) -> ModelCapabilities {
        ModelCapabilities::full()
    }
}
