//! Eviction victim selection
//!
//! Given a footprint deficit, the selector picks currently loaded models to
//! unload: largest declared footprint first, ties broken by earliest
//! insertion, accumulating until the deficit is covered or the candidates
//! run out. Selection is pure; the registry core applies the plan.

use std::cmp::Reverse;

use common::types::Mebibytes;

/// A loaded model considered for eviction
#[derive(Debug, Clone)]
pub struct Candidate {
    /// Model name
    pub name: String,

    /// Budgeted footprint in MiB
    pub footprint_mib: Mebibytes,

    /// Insertion sequence number; lower means inserted earlier
    pub seq: u64,
}

/// The selector's output: victims in unload order plus the footprint their
/// eviction frees
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvictionPlan {
    /// Names of the models to unload, in order
    pub victims: Vec<String>,

    /// Total footprint freed by unloading every victim, in MiB
    pub freed_mib: Mebibytes,
}

impl EvictionPlan {
    /// Returns true when the plan frees at least the requested deficit
    pub fn covers(&self, deficit: Mebibytes) -> bool {
        self.freed_mib >= deficit
    }
}

/// Selects eviction victims to cover the given deficit
///
/// Candidates are ordered by footprint descending; equal footprints keep
/// their insertion order, so the earliest-inserted of a tie is evicted
/// first. The walk stops at the candidate that pushes the freed total to
/// the deficit, or when the candidates are exhausted. An exhausted list
/// that still under-covers the deficit is not an error here; the caller
/// decides what to do with a partial plan.
pub fn select_victims(mut candidates: Vec<Candidate>, deficit: Mebibytes) -> EvictionPlan {
    // Stable on the insertion sequence the candidates arrive with
    candidates.sort_by_key(|c| (Reverse(c.footprint_mib), c.seq));

    let mut victims = Vec::new();
    let mut freed_mib = 0;

    for candidate in candidates {
        if freed_mib >= deficit {
            break;
        }
        freed_mib += candidate.footprint_mib;
        victims.push(candidate.name);
    }

    EvictionPlan { victims, freed_mib }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidates(footprints: &[Mebibytes]) -> Vec<Candidate> {
        footprints
            .iter()
            .enumerate()
            .map(|(i, &footprint_mib)| Candidate {
                name: format!("model-{}", i),
                footprint_mib,
                seq: i as u64,
            })
            .collect()
    }

    #[test]
    fn test_largest_footprint_first() {
        // Footprints [10, 4, 4, 2] in insertion order, deficit 7: the
        // largest alone covers it
        let plan = select_victims(candidates(&[10, 4, 4, 2]), 7);
        assert_eq!(plan.victims, vec!["model-0"]);
        assert_eq!(plan.freed_mib, 10);
        assert!(plan.covers(7));
    }

    #[test]
    fn test_accumulates_until_covered() {
        let plan = select_victims(candidates(&[10, 4, 4, 2]), 12);
        assert_eq!(plan.victims, vec!["model-0", "model-1"]);
        assert_eq!(plan.freed_mib, 14);
    }

    #[test]
    fn test_tie_breaks_by_insertion_order() {
        // Two equal footprints: the earlier-inserted one is the victim
        let plan = select_victims(candidates(&[5, 5]), 5);
        assert_eq!(plan.victims, vec!["model-0"]);
    }

    #[test]
    fn test_tie_break_survives_larger_entries() {
        // Insertion order [3, 5, 5]; descending sort keeps the two fives
        // in insertion order behind nothing
        let plan = select_victims(candidates(&[3, 5, 5]), 10);
        assert_eq!(plan.victims, vec!["model-1", "model-2"]);
    }

    #[test]
    fn test_under_coverage_returns_partial_plan() {
        let plan = select_victims(candidates(&[4, 2]), 10);
        assert_eq!(plan.victims, vec!["model-0", "model-1"]);
        assert_eq!(plan.freed_mib, 6);
        assert!(!plan.covers(10));
    }

    #[test]
    fn test_no_candidates() {
        let plan = select_victims(Vec::new(), 8);
        assert!(plan.victims.is_empty());
        assert_eq!(plan.freed_mib, 0);
    }

    #[test]
    fn test_inclusive_threshold() {
        // The victim that exactly meets the deficit is included, and
        // nothing after it
        let plan = select_victims(candidates(&[4, 4]), 4);
        assert_eq!(plan.victims, vec!["model-0"]);
        assert_eq!(plan.freed_mib, 4);
    }
}
