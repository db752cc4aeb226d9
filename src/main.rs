use std::path::Path;
use std::sync::Arc;

use anyhow::Result;

use inference_host::{InferenceHost, SimulatedDetectorFactory};
use model_registry::ModelListing;
use vram_probe::{ManualProbe, NullProbe, VramProbe};

#[tokio::main]
async fn main() -> Result<()> {
    InferenceHost::init_logging();

    println!("Starting inference host...");

    // A real deployment wires a device-backed probe here; the demo budget
    // comes from VRAM_BUDGET_MIB, or zero headroom without it
    let probe: Arc<dyn VramProbe> = match std::env::var("VRAM_BUDGET_MIB")
        .ok()
        .and_then(|v| v.parse::<u64>().ok())
    {
        Some(budget) => Arc::new(ManualProbe::new(budget)),
        None => Arc::new(NullProbe),
    };
    println!(
        "Accelerator budget: {} MiB total, {} MiB free",
        probe.total_mib(),
        probe.free_mib()
    );

    // Catalog path: MODELS_YAML_PATH when set, the bundled demo otherwise
    let config_path = Path::new("demos/models.yaml");
    let config_path = if std::env::var(config::MODELS_YAML_ENV).is_ok() {
        None
    } else {
        Some(config_path)
    };

    let host = InferenceHost::new(config_path, probe)?;

    // Bind concrete model implementations before any get_model call
    host.register_class("SimulatedDetector", Arc::new(SimulatedDetectorFactory));

    // Show the catalog
    match host.list_models(None)? {
        ModelListing::All(categories) => {
            println!("Catalog:");
            for (category, names) in &categories {
                println!("  {}: {}", category, names.join(", "));
            }
        }
        ModelListing::Category(names) => println!("Catalog: {}", names.join(", ")),
    }

    // Exercise the registry: load, cache-hit, switch, unload
    println!("\nLoading sim-detector-small...");
    host.get_model("sim-detector-small", Some("detection")).await?;

    println!("Requesting it again (cache hit)...");
    host.get_model("sim-detector-small", None).await?;

    println!("Switching to sim-detector-large...");
    host.switch_model("sim-detector-small", "sim-detector-large")
        .await?;

    println!(
        "Loaded models: {:?} ({} MiB budgeted)",
        host.registry().loaded_models(),
        host.registry().loaded_footprint_mib()
    );

    println!("Unloading everything...");
    host.unload_model("sim-detector-large").await;

    println!("Done.");
    Ok(())
}
