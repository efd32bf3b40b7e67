// src/checker/mod.rs
// =============================================================================
// This module contains all link checking logic.
//
// Submodules:
// - probe: checks ONE link with a single HTTP GET and times it
// - coordinator: runs many probes in parallel, at most N at a time,
//   and sorts the outcomes into "ok" and "error"
// - latency: picks out the outcomes that took longer than allowed
// =============================================================================

mod coordinator;
mod latency;
mod probe;

pub use coordinator::{CheckResults, Coordinator};
pub use latency::exceeding;
pub use probe::{HttpProber, ProbeOutcome};
