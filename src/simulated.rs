//! Simulated detector model
//!
//! A stand-in model implementation used by the demo binary to exercise the
//! registry without a real accelerator. Loading sleeps for a configurable
//! delay and flips a loaded flag; no detection algorithm lives here.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::info;

use common::error::{Error, Result};
use common::types::ParamMap;
use model_registry::{InferenceModel, ModelFactory};

/// Simulated detection model
pub struct SimulatedDetector {
    /// Path the weights would be read from
    weights_path: String,

    /// Device identifier the model would run on
    device: String,

    /// Whether load has run
    loaded: AtomicBool,
}

impl SimulatedDetector {
    /// Returns true when the model has been loaded
    pub fn is_loaded(&self) -> bool {
        self.loaded.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl InferenceModel for SimulatedDetector {
    async fn load(&self, args: &ParamMap) -> Result<()> {
        let delay_ms = args
            .get("load_delay_ms")
            .and_then(|v| v.as_u64())
            .unwrap_or(100);
        tokio::time::sleep(Duration::from_millis(delay_ms)).await;

        self.loaded.store(true, Ordering::SeqCst);
        info!(
            weights_path = %self.weights_path,
            device = %self.device,
            "Simulated detector loaded"
        );
        Ok(())
    }

    async fn unload(&self) -> Result<()> {
        self.loaded.store(false, Ordering::SeqCst);
        info!(weights_path = %self.weights_path, "Simulated detector unloaded");
        Ok(())
    }
}

/// Factory producing simulated detectors from catalog constructor args
pub struct SimulatedDetectorFactory;

impl ModelFactory for SimulatedDetectorFactory {
    fn build(&self, args: &ParamMap) -> Result<Arc<dyn InferenceModel>> {
        let weights_path = args
            .get("weights_path")
            .and_then(|v| v.as_str())
            .ok_or_else(|| {
                Error::Config("SimulatedDetector requires a 'weights_path' argument".to_string())
            })?
            .to_string();
        let device = args
            .get("device")
            .and_then(|v| v.as_str())
            .unwrap_or("cpu")
            .to_string();

        Ok(Arc::new(SimulatedDetector {
            weights_path,
            device,
            loaded: AtomicBool::new(false),
        }))
    }
}
