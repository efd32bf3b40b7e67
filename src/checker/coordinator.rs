// src/checker/coordinator.rs
// =============================================================================
// Runs one probe per link, in parallel, with a hard ceiling on how many are
// in flight at the same time.
//
// How it works:
// 1. Every link gets its own tokio task (spawned onto the worker threads)
// 2. Before probing, a task must take a permit from a Semaphore with N
//    permits. The permit is a guard: it is returned when the task ends,
//    whether the probe succeeded, timed out or failed
// 3. The coordinator is the only place results are collected: it awaits the
//    tasks one by one as they finish and files each outcome into "ok"
//    (status 200) or "error" (everything else)
//
// Rust concepts:
// - Arc: shared ownership of the prober, gate and counters across tasks
// - Semaphore + OwnedSemaphorePermit: RAII admission control
// - JoinSet: a bag of tasks we can await in completion order
// - Atomics: lock-free progress counters readable from anywhere
// =============================================================================

use super::probe::{ProbeOutcome, Prober};
use crate::discovery::LinkRecord;
use futures::FutureExt;
use reqwest::StatusCode;
use std::panic::AssertUnwindSafe;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{error, info};

// Outcomes of a whole run, split by success
#[derive(Debug, Default, Clone)]
pub struct CheckResults {
    /// Outcomes with status exactly 200
    pub ok: Vec<ProbeOutcome>,
    /// Everything else, including the 408/500 sentinels
    pub error: Vec<ProbeOutcome>,
}

impl CheckResults {
    fn record(&mut self, outcome: ProbeOutcome) {
        if outcome.is_ok() {
            self.ok.push(outcome);
        } else {
            self.error.push(outcome);
        }
    }

    pub fn len(&self) -> usize {
        self.ok.len() + self.error.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// Completed-vs-total counters for the current run
#[derive(Debug, Default)]
pub struct Progress {
    completed: AtomicUsize,
    total: AtomicUsize,
}

impl Progress {
    pub fn completed(&self) -> usize {
        self.completed.load(Ordering::Acquire)
    }

    pub fn total(&self) -> usize {
        self.total.load(Ordering::Acquire)
    }

    fn start(&self, total: usize) {
        self.completed.store(0, Ordering::Release);
        self.total.store(total, Ordering::Release);
    }

    // Returns the new completed count
    fn tick(&self) -> usize {
        self.completed.fetch_add(1, Ordering::AcqRel) + 1
    }
}

pub struct Coordinator<P: Prober> {
    prober: Arc<P>,
    gate: Arc<Semaphore>,
    max_in_flight: usize,
    progress: Arc<Progress>,
}

impl<P: Prober> Coordinator<P> {
    // A ceiling of 0 would never admit anything, so it is raised to 1
    pub fn new(prober: Arc<P>, max_in_flight: usize) -> Self {
        let max_in_flight = max_in_flight.max(1);

        Coordinator {
            prober,
            gate: Arc::new(Semaphore::new(max_in_flight)),
            max_in_flight,
            progress: Arc::new(Progress::default()),
        }
    }

    /// Handle for observing progress while `run` is in progress
    pub fn progress(&self) -> Arc<Progress> {
        Arc::clone(&self.progress)
    }

    // Probes every link and waits for all of them
    //
    // Every link yields exactly one outcome. A slow or failing link never
    // cancels its siblings; the call returns only when all tasks are done.
    pub async fn run(&self, links: Vec<LinkRecord>) -> CheckResults {
        let total = links.len();
        self.progress.start(total);

        info!(total, max_in_flight = self.max_in_flight, "checking links");

        let mut tasks = JoinSet::new();
        for link in links {
            let prober = Arc::clone(&self.prober);
            let gate = Arc::clone(&self.gate);

            tasks.spawn(async move {
                // Held until this task ends, on every path
                let _permit = gate
                    .acquire_owned()
                    .await
                    .expect("admission gate is never closed");
                probe_guarded(prober.as_ref(), link).await
            });
        }

        let mut results = CheckResults::default();
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(outcome) => {
                    let completed = self.progress.tick();
                    info!(
                        url = %outcome.url,
                        status = outcome.status,
                        elapsed_ms = outcome.elapsed_ms,
                        "checked link {}/{}",
                        completed,
                        total
                    );
                    results.record(outcome);
                }
                // Only reachable if the runtime shuts down under us
                Err(e) => error!(error = %e, "probe task did not complete"),
            }
        }

        results
    }
}

// Runs one probe, turning a panic into a 500 outcome for the same URL
async fn probe_guarded<P: Prober>(prober: &P, link: LinkRecord) -> ProbeOutcome {
    let url = link.url.clone();

    match AssertUnwindSafe(prober.probe(link)).catch_unwind().await {
        Ok(outcome) => outcome,
        Err(_) => {
            error!(url = %url, "probe panicked");
            ProbeOutcome {
                url,
                status: StatusCode::INTERNAL_SERVER_ERROR.as_u16(),
                elapsed_ms: 0,
            }
        }
    }
}
