//! Registry core
//!
//! The stateful heart of the inference host: owns every loaded model
//! instance, decides admission against the accelerator budget, evicts by
//! the deterministic footprint-driven policy, and hands out shared handles
//! to callers.
//!
//! Locking discipline: registry bookkeeping lives behind a `parking_lot`
//! mutex that is never held across an await point. Admission — the headroom
//! read, victim selection, and removal of the victims from the loaded set —
//! happens inside one critical section, so a concurrent load can neither
//! race the selection nor re-load a claimed victim. The slow calls (`build`,
//! `load`, `unload`) all run outside that lock. A per-name async mutex
//! serializes loads of the same model, so concurrent requests for one
//! uncached name produce a single load.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::Mutex as AsyncMutex;
use tracing::{debug, info, warn};

use common::error::Result;
use common::types::{format_mib, Mebibytes};
use vram_probe::VramProbe;

use crate::catalog::{Catalog, ModelDescriptor, ModelListing};
use crate::class_registry::ClassRegistry;
use crate::contract::{InferenceModel, ModelCapabilities, ModelFactory};
use crate::eviction::{self, Candidate};

/// A model instance currently resident on the accelerator
struct LoadedInstance {
    /// Model name, matching its catalog descriptor
    name: String,

    /// The live handle satisfying the capability contract
    handle: Arc<dyn InferenceModel>,

    /// Budgeted footprint in MiB, resolved from the descriptor
    footprint_mib: Mebibytes,

    /// Capabilities declared by the factory that produced the instance
    capabilities: ModelCapabilities,

    /// Insertion sequence number, the eviction tie-break
    seq: u64,
}

/// Mutable registry state, guarded by one mutex
#[derive(Default)]
struct RegistryState {
    /// Loaded instances keyed by model name
    loaded: HashMap<String, LoadedInstance>,

    /// Per-name load locks for the loads currently in flight; entries are
    /// pruned once their load completes or fails
    load_locks: HashMap<String, Arc<AsyncMutex<()>>>,

    /// Next insertion sequence number
    next_seq: u64,
}

/// The VRAM-budgeted model cache
pub struct ModelRegistry {
    /// Static model catalog
    catalog: Arc<Catalog>,

    /// Class-name to factory mapping
    classes: Arc<ClassRegistry>,

    /// Accelerator memory probe
    probe: Arc<dyn VramProbe>,

    /// Mutable state; never locked across an await
    state: Mutex<RegistryState>,
}

/// How acquiring a per-name load lock ended
enum LockAcquire {
    /// The caller holds the current lock for the name and should load
    Held(Arc<AsyncMutex<()>>, tokio::sync::OwnedMutexGuard<()>),

    /// The model appeared while waiting; its handle is ready
    Cached(Arc<dyn InferenceModel>),

    /// The lock entry was pruned while waiting; take a fresh one
    Stale,
}

impl ModelRegistry {
    /// Creates a registry over the given catalog, class registry, and probe
    pub fn new(catalog: Arc<Catalog>, classes: Arc<ClassRegistry>, probe: Arc<dyn VramProbe>) -> Self {
        Self {
            catalog,
            classes,
            probe,
            state: Mutex::new(RegistryState::default()),
        }
    }

    /// Returns the loaded model's handle, loading it first if necessary
    ///
    /// A cached name returns its existing handle immediately, with no
    /// resource check. On a miss the catalog descriptor is resolved
    /// (optionally scoped to a category), headroom is read from the probe,
    /// and loaded models are evicted largest-footprint-first until the
    /// requested footprint fits. Admission is optimistic: if eviction
    /// cannot fully cover the deficit the load is attempted anyway and the
    /// shortfall is logged.
    pub async fn get_model(
        &self,
        name: &str,
        category: Option<&str>,
    ) -> Result<Arc<dyn InferenceModel>> {
        // Fast path: cache hit without touching the probe
        if let Some(handle) = self.cached_handle(name) {
            debug!(model = name, "Cache hit");
            return Ok(handle);
        }

        // Pure catalog read; unknown names and categories fail here,
        // before any registry state is created for them
        let descriptor = self.catalog.describe(name, category)?;
        let required = self.catalog.required_footprint(&descriptor);

        // Serialize loads of this name; whoever wins loads for everyone.
        // A pruned lock entry means the previous holder finished (or
        // failed) while we waited, so take a fresh one and re-check.
        let (load_lock, _load_guard) = loop {
            match self.acquire_load_lock(name).await {
                LockAcquire::Held(lock, guard) => break (lock, guard),
                LockAcquire::Cached(handle) => {
                    debug!(model = name, "Cache hit after waiting on in-flight load");
                    return Ok(handle);
                }
                LockAcquire::Stale => continue,
            }
        };

        let outcome = self.admit_and_load(name, &descriptor, required).await;

        // Drop this name's lock entry so failed or idle names leave no
        // state behind; queued waiters detect the pruned entry and retry
        {
            let mut state = self.state.lock();
            let ours = state
                .load_locks
                .get(name)
                .map_or(false, |current| Arc::ptr_eq(current, &load_lock));
            if ours {
                state.load_locks.remove(name);
            }
        }

        outcome
    }

    /// Creates or joins the per-name load lock and acquires it
    async fn acquire_load_lock(&self, name: &str) -> LockAcquire {
        let load_lock = {
            let mut state = self.state.lock();
            if let Some(instance) = state.loaded.get(name) {
                return LockAcquire::Cached(instance.handle.clone());
            }
            state
                .load_locks
                .entry(name.to_string())
                .or_insert_with(|| Arc::new(AsyncMutex::new(())))
                .clone()
        };

        let guard = load_lock.clone().lock_owned().await;

        let state = self.state.lock();
        if let Some(instance) = state.loaded.get(name) {
            return LockAcquire::Cached(instance.handle.clone());
        }
        let current = state
            .load_locks
            .get(name)
            .map_or(false, |l| Arc::ptr_eq(l, &load_lock));
        drop(state);

        if current {
            LockAcquire::Held(load_lock, guard)
        } else {
            LockAcquire::Stale
        }
    }

    /// Runs admission, eviction, construction, and load for one model;
    /// the caller holds the model's load lock
    async fn admit_and_load(
        &self,
        name: &str,
        descriptor: &ModelDescriptor,
        required: Mebibytes,
    ) -> Result<Arc<dyn InferenceModel>> {
        // Admission: headroom check, victim selection, and victim removal
        // form one critical section
        let victims: Vec<LoadedInstance> = {
            let mut state = self.state.lock();
            let free = self.probe.free_mib();

            if free >= required {
                Vec::new()
            } else {
                let deficit = required - free;
                let candidates: Vec<Candidate> = state
                    .loaded
                    .values()
                    .map(|instance| Candidate {
                        name: instance.name.clone(),
                        footprint_mib: instance.footprint_mib,
                        seq: instance.seq,
                    })
                    .collect();

                let plan = eviction::select_victims(candidates, deficit);
                if !plan.covers(deficit) {
                    warn!(
                        model = name,
                        deficit = %format_mib(deficit),
                        freed = %format_mib(plan.freed_mib),
                        "Eviction cannot fully cover the footprint deficit; \
                         attempting the load anyway"
                    );
                }

                plan.victims
                    .iter()
                    .filter_map(|victim| state.loaded.remove(victim))
                    .collect()
            }
        };

        let evicted = !victims.is_empty();
        for victim in victims {
            self.release_instance(victim).await;
        }
        if evicted {
            debug!(
                model = name,
                free = %format_mib(self.probe.free_mib()),
                "Headroom after eviction"
            );
        }

        let factory = self.classes.resolve(&descriptor.class_name)?;
        let capabilities = factory.capabilities();
        let handle = factory.build(&descriptor.constructor_args)?;

        info!(
            model = name,
            class = %descriptor.class_name,
            footprint = %format_mib(required),
            "Loading model"
        );
        handle.load(&descriptor.loader_args).await?;

        {
            let mut state = self.state.lock();
            let seq = state.next_seq;
            state.next_seq += 1;
            state.loaded.insert(
                name.to_string(),
                LoadedInstance {
                    name: name.to_string(),
                    handle: handle.clone(),
                    footprint_mib: required,
                    capabilities,
                    seq,
                },
            );
        }

        info!(model = name, "Model loaded");
        Ok(handle)
    }

    /// Unloads the named model if it is loaded; absent names are a no-op
    ///
    /// The bookkeeping entry is removed unconditionally, even when the
    /// instance's unload operation is absent or fails, so the slot can
    /// never dangle.
    pub async fn unload_model(&self, name: &str) {
        let instance = self.state.lock().loaded.remove(name);
        if let Some(instance) = instance {
            self.release_instance(instance).await;
        }
    }

    /// Hands off from one model to another
    ///
    /// Switching a name to itself is a plain `get_model` with no unload.
    /// Otherwise the old model is unloaded unconditionally and the new one
    /// loaded fresh; switching never preserves a cached entry for the new
    /// name's predecessor.
    pub async fn switch_model(&self, old: &str, new: &str) -> Result<Arc<dyn InferenceModel>> {
        if old == new {
            return self.get_model(old, None).await;
        }

        self.unload_model(old).await;
        self.get_model(new, None).await
    }

    /// Lists catalog models, delegating to the catalog
    pub fn list_models(&self, category: Option<&str>) -> Result<ModelListing> {
        self.catalog.list_models(category)
    }

    /// Registers a model class, delegating to the class registry
    pub fn register_class(
        &self,
        class_name: &str,
        factory: Arc<dyn ModelFactory>,
    ) -> ModelCapabilities {
        self.classes.register(class_name, factory)
    }

    /// Returns true when the named model is currently loaded
    pub fn is_loaded(&self, name: &str) -> bool {
        self.state.lock().loaded.contains_key(name)
    }

    /// Returns the names of the loaded models in insertion order
    pub fn loaded_models(&self) -> Vec<String> {
        let state = self.state.lock();
        let mut instances: Vec<(&u64, &String)> = state
            .loaded
            .values()
            .map(|instance| (&instance.seq, &instance.name))
            .collect();
        instances.sort();
        instances.into_iter().map(|(_, name)| name.clone()).collect()
    }

    /// Returns the summed footprint of every loaded model in MiB
    pub fn loaded_footprint_mib(&self) -> Mebibytes {
        self.state
            .lock()
            .loaded
            .values()
            .map(|instance| instance.footprint_mib)
            .sum()
    }

    /// Returns the number of loaded models
    pub fn loaded_count(&self) -> usize {
        self.state.lock().loaded.len()
    }

    fn cached_handle(&self, name: &str) -> Option<Arc<dyn InferenceModel>> {
        self.state
            .lock()
            .loaded
            .get(name)
            .map(|instance| instance.handle.clone())
    }

    /// Calls unload on a detached instance; the bookkeeping entry is
    /// already gone by the time this runs
    async fn release_instance(&self, instance: LoadedInstance) {
        if instance.capabilities.implements_unload {
            if let Err(e) = instance.handle.unload().await {
                warn!(
                    model = %instance.name,
                    error = %e,
                    "Unload failed; instance dropped from the registry regardless"
                );
            }
        } else {
            warn!(
                model = %instance.name,
                "Instance declares no unload operation; dropping it without one"
            );
        }

        info!(
            model = %instance.name,
            footprint = %format_mib(instance.footprint_mib),
            "Unloaded model"
        );
    }
}
