// src/error.rs
// =============================================================================
// Typed errors for the parts of the program that can fail as a whole.
//
// Only three things can stop a run or a step of it:
// - ConfigError:    the command line describes an impossible run
// - DiscoveryError: we could not talk to the discovery API at all
// - ReportError:    the report file could not be produced
//
// Individual link failures are NOT errors here. A timeout or a refused
// connection becomes a status code (408/500) inside a ProbeOutcome.
//
// Rust concepts:
// - thiserror: derives std::error::Error and Display from attributes
// - #[from]: lets the ? operator convert a source error automatically
// =============================================================================

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("--{0} is required and cannot be empty")]
    MissingValue(&'static str),

    #[error("invalid target link '{url}': {source}")]
    InvalidTarget {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("if --country or --language is provided, both are required")]
    IncompleteLocale,

    #[error("--{0} must be greater than zero")]
    Zero(&'static str),
}

#[derive(Debug, Error)]
pub enum DiscoveryError {
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("error sending request to discovery API {endpoint}: {source}")]
    Transport {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },
}

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("error serializing report: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("error writing output file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
