// src/report/mod.rs
// =============================================================================
// This module turns the outcomes of a run into a report file.
//
// A Report has four buckets:
// - links_ok / links_error: every outcome, split by status
// - the two "spend_more_than_max_time" buckets: the subset of each that took
//   longer than the accepted latency
//
// Submodules:
// - json: the report as one JSON object
// - csv:  the report as one row per outcome
//
// Both implement the ReportWriter trait; OutputFormat picks one at runtime.
// =============================================================================

mod csv;
mod json;

pub use self::csv::CsvReportWriter;
pub use self::json::JsonReportWriter;

use crate::checker::{exceeding, CheckResults, ProbeOutcome};
use crate::error::ReportError;
use serde::Serialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Report {
    pub links_ok: Vec<ProbeOutcome>,
    pub links_error: Vec<ProbeOutcome>,
    #[serde(rename = "links_ok_spend_more_than_max_time")]
    pub links_ok_slow: Vec<ProbeOutcome>,
    #[serde(rename = "links_error_spend_more_than_max_time")]
    pub links_error_slow: Vec<ProbeOutcome>,
}

impl Report {
    // Builds the report, deriving the slow buckets from the two main ones
    pub fn build(results: CheckResults, max_latency_ms: u64) -> Self {
        let links_ok_slow = exceeding(&results.ok, max_latency_ms);
        let links_error_slow = exceeding(&results.error, max_latency_ms);

        Report {
            links_ok: results.ok,
            links_error: results.error,
            links_ok_slow,
            links_error_slow,
        }
    }

    pub fn has_slow_links(&self) -> bool {
        !self.links_ok_slow.is_empty() || !self.links_error_slow.is_empty()
    }

    /// Slow OK outcomes first, then slow error outcomes
    pub fn slow_links(&self) -> impl Iterator<Item = &ProbeOutcome> {
        self.links_ok_slow.iter().chain(self.links_error_slow.iter())
    }
}

// Something that can persist a report
//
// `base_name` has no extension; each writer adds its own and returns the
// path it wrote.
pub trait ReportWriter {
    fn write(&self, base_name: &str, report: &Report) -> Result<PathBuf, ReportError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Json,
    Csv,
}

impl OutputFormat {
    pub fn writer(self) -> Box<dyn ReportWriter> {
        match self {
            OutputFormat::Json => Box::new(JsonReportWriter),
            OutputFormat::Csv => Box::new(CsvReportWriter),
        }
    }
}

// "<base_name>.<extension>"
fn output_path(base_name: &str, extension: &str) -> PathBuf {
    PathBuf::from(format!("{}.{}", base_name, extension))
}

fn write_file(path: &Path, contents: &[u8]) -> Result<(), ReportError> {
    std::fs::write(path, contents).map_err(|source| ReportError::Io {
        path: path.to_path_buf(),
        source,
    })
}
