//! Accelerator memory probing for the inference host
//!
//! This crate defines the probe interface the registry consults before
//! admitting a model, plus two bundled implementations: a null probe for
//! hosts without an accelerator and a manual probe for fixed budgets and
//! tests. Deployments with a real device supply their own [`VramProbe`]
//! implementation backed by the vendor's management API.

use std::sync::atomic::{AtomicU64, Ordering};

use common::types::Mebibytes;

/// Read-only view of the accelerator's memory
///
/// Implementations never fail: a host without an accelerator reports zero
/// headroom rather than an error. Reads take no locks and have no side
/// effects, so the registry may call them at any point.
pub trait VramProbe: Send + Sync {
    /// Returns the currently free accelerator memory in MiB
    fn free_mib(&self) -> Mebibytes;

    /// Returns the total accelerator memory in MiB
    fn total_mib(&self) -> Mebibytes;
}

/// Probe for hosts without an accelerator: zero free, zero total
#[derive(Debug, Default)]
pub struct NullProbe;

impl VramProbe for NullProbe {
    fn free_mib(&self) -> Mebibytes {
        0
    }

    fn total_mib(&self) -> Mebibytes {
        0
    }
}

/// Probe with an externally managed free amount
///
/// Useful for CPU-only deployments that budget host memory by hand, and for
/// tests that need deterministic headroom. The embedder updates the free
/// amount as its view of the device changes.
#[derive(Debug)]
pub struct ManualProbe {
    total: Mebibytes,
    free: AtomicU64,
}

impl ManualProbe {
    /// Creates a manual probe with the given total capacity, initially all
    /// free
    pub fn new(total: Mebibytes) -> Self {
        Self {
            total,
            free: AtomicU64::new(total),
        }
    }

    /// Sets the currently free amount, clamped to the total capacity
    pub fn set_free(&self, free: Mebibytes) {
        self.free.store(free.min(self.total), Ordering::SeqCst);
    }

    /// Reduces the free amount by the given number of MiB, saturating at
    /// zero
    pub fn consume(&self, amount: Mebibytes) {
        let mut current = self.free.load(Ordering::SeqCst);
        loop {
            let next = current.saturating_sub(amount);
            match self
                .free
                .compare_exchange(current, next, Ordering::SeqCst, Ordering::SeqCst)
            {
                Ok(_) => return,
                Err(actual) => current = actual,
            }
        }
    }

    /// Returns the given number of MiB to the free pool, clamped to the
    /// total capacity
    pub fn release(&self, amount: Mebibytes) {
        let mut current = self.free.load(Ordering::SeqCst);
        loop {
            let next = (current + amount).min(self.total);
            match self
                .free
                .compare_exchange(current, next, Ordering::SeqCst, Ordering::SeqCst)
            {
                Ok(_) => return,
                Err(actual) => current = actual,
            }
        }
    }
}

impl VramProbe for ManualProbe {
    fn free_mib(&self) -> Mebibytes {
        self.free.load(Ordering::SeqCst)
    }

    fn total_mib(&self) -> Mebibytes {
        self.total
    }
}
