// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// We use the "derive" API: the Cli struct below *is* the list of flags.
// clap handles parsing, --help and --version; into_config() then checks the
// combinations clap cannot express (empty strings, half a locale, zeros)
// and produces the RunConfig the rest of the program works with.
// =============================================================================

use crate::config::{
    Locale, RunConfig, DEFAULT_DISCOVERY_ENDPOINT, DEFAULT_LIMIT, DEFAULT_MAX_LATENCY_MS,
    DEFAULT_OUTPUT_NAME, DEFAULT_TIMEOUT_SECS,
};
use crate::error::ConfigError;
use crate::report::OutputFormat;
use clap::Parser;
use url::Url;

#[derive(Parser, Debug)]
#[command(
    name = "link-auditor",
    version = "0.1.0",
    about = "Discover a website's links and report the broken or slow ones",
    long_about = "link-auditor asks a discovery API for the URLs of a website, checks each one \
                  concurrently and writes a JSON or CSV report. It exits with code 1 when any \
                  link took longer than the accepted time, which makes it usable in CI."
)]
pub struct Cli {
    /// Website to audit (e.g., https://example.com)
    #[arg(long = "link")]
    pub link: String,

    /// API key for the discovery service
    #[arg(long = "api-key", env = "FIRECRAWL_API_KEY", hide_env_values = true)]
    pub api_key: String,

    /// Maximum number of links to discover
    #[arg(long, default_value_t = DEFAULT_LIMIT)]
    pub limit: usize,

    /// Append a timestamp query parameter to every URL to bypass caches
    #[arg(long = "disable-cache")]
    pub disable_cache: bool,

    /// Per-request timeout in seconds
    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout: u64,

    /// Output file name, without extension
    #[arg(long, default_value = DEFAULT_OUTPUT_NAME)]
    pub output: String,

    /// Output file format
    #[arg(long = "output-format", value_enum, default_value_t = OutputFormat::Json)]
    pub output_format: OutputFormat,

    /// Requests slower than this many milliseconds fail the run
    #[arg(long = "max-time-ms-accepted", default_value_t = DEFAULT_MAX_LATENCY_MS)]
    pub max_time_ms_accepted: u64,

    /// Country filter for discovery (requires --language)
    #[arg(long)]
    pub country: Option<String>,

    /// Language filter for discovery (requires --country)
    #[arg(long)]
    pub language: Option<String>,

    /// Discovery API endpoint
    #[arg(long = "api-url", default_value = DEFAULT_DISCOVERY_ENDPOINT, hide = true)]
    pub api_url: String,
}

impl Cli {
    // Validates the parsed flags and turns them into a RunConfig
    //
    // Nothing here touches the network: a bad combination is rejected
    // before any request is made.
    pub fn into_config(self) -> Result<RunConfig, ConfigError> {
        let target_url = self.link.trim().to_string();
        if target_url.is_empty() {
            return Err(ConfigError::MissingValue("link"));
        }
        Url::parse(&target_url).map_err(|source| ConfigError::InvalidTarget {
            url: target_url.clone(),
            source,
        })?;

        let api_key = self.api_key.trim().to_string();
        if api_key.is_empty() {
            return Err(ConfigError::MissingValue("api-key"));
        }

        if self.limit == 0 {
            return Err(ConfigError::Zero("limit"));
        }
        if self.timeout == 0 {
            return Err(ConfigError::Zero("timeout"));
        }

        let locale = Locale::from_parts(self.country, self.language)?;

        Ok(RunConfig {
            target_url,
            api_key,
            api_url: self.api_url,
            limit: self.limit,
            output_name: self.output,
            output_format: self.output_format,
            timeout_secs: self.timeout,
            max_latency_ms: self.max_time_ms_accepted,
            cache_bypass: self.disable_cache,
            locale,
        })
    }
}
