// src/checker/latency.rs
// =============================================================================
// Picks out the outcomes that took longer than the accepted latency.
//
// This does not move anything: a slow OK link stays in the OK bucket and is
// also listed in the "slow" bucket built from it.
// =============================================================================

use super::probe::ProbeOutcome;

// Returns the outcomes whose elapsed time is strictly above `threshold_ms`,
// in their original order
pub fn exceeding(outcomes: &[ProbeOutcome], threshold_ms: u64) -> Vec<ProbeOutcome> {
    outcomes
        .iter()
        .filter(|outcome| outcome.elapsed_ms > threshold_ms)
        .cloned()
        .collect()
}
