// src/config.rs
// =============================================================================
// Run configuration: everything a single audit needs to know, decided once
// at startup and then only read.
//
// The CLI (src/cli.rs) is responsible for turning raw flags into a RunConfig.
// Every other module receives the pieces it needs by reference or by value.
// =============================================================================

use crate::error::ConfigError;
use crate::report::OutputFormat;
use serde::Serialize;

/// Discovery endpoint used when --api-url is not given
pub const DEFAULT_DISCOVERY_ENDPOINT: &str = "https://api.firecrawl.dev/v2/map";

/// Maximum number of probes that may be in flight at once
pub const MAX_IN_FLIGHT: usize = 10;

pub const DEFAULT_LIMIT: usize = 100;
pub const DEFAULT_TIMEOUT_SECS: u64 = 5;
pub const DEFAULT_MAX_LATENCY_MS: u64 = 5000;
pub const DEFAULT_OUTPUT_NAME: &str = "output";

// Country/language filter forwarded to the discovery API
//
// A locale is all-or-nothing: the API only gets a location block when both
// halves are present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Locale {
    pub country: String,
    pub language: String,
}

impl Locale {
    // Builds an optional locale from the two optional CLI values
    //
    // Empty strings count as "not provided", so `--country US --language ""`
    // is rejected the same way as `--country US` alone.
    pub fn from_parts(
        country: Option<String>,
        language: Option<String>,
    ) -> Result<Option<Locale>, ConfigError> {
        let country = country.filter(|c| !c.trim().is_empty());
        let language = language.filter(|l| !l.trim().is_empty());

        match (country, language) {
            (None, None) => Ok(None),
            (Some(country), Some(language)) => Ok(Some(Locale { country, language })),
            _ => Err(ConfigError::IncompleteLocale),
        }
    }
}

// The immutable configuration for one run
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub target_url: String,
    pub api_key: String,
    pub api_url: String,
    pub limit: usize,
    pub output_name: String,
    pub output_format: OutputFormat,
    pub timeout_secs: u64,
    pub max_latency_ms: u64,
    pub cache_bypass: bool,
    pub locale: Option<Locale>,
}
