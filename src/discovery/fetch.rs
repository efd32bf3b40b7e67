// src/discovery/fetch.rs
// =============================================================================
// Fetches the list of links for a website from the discovery API.
//
// Request:
//   POST <endpoint>
//   Authorization: Bearer <api key>
//   {"url": "...", "sitemap": "include", "limit": 100, "location": {...}?}
//
// Response:
//   {"success": true, "links": [{"url": "...", "title": "...", "description": "..."}]}
//
// Rust concepts:
// - serde derive: request/response bodies are plain structs
// - skip_serializing_if: leave "location" out entirely when there is none
// - deserialize_with: treat `null` strings as empty strings
// =============================================================================

use crate::config::Locale;
use crate::error::DiscoveryError;
use reqwest::Client;
use serde::{Deserialize, Deserializer, Serialize};
use tracing::{debug, info, warn};

// One discovered URL plus whatever metadata the API knows about it
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LinkRecord {
    pub url: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub description: String,
}

#[cfg(test)]
impl LinkRecord {
    pub fn new(url: impl Into<String>) -> Self {
        LinkRecord {
            url: url.into(),
            title: String::new(),
            description: String::new(),
        }
    }
}

#[derive(Debug, Serialize)]
struct MapRequest<'a> {
    url: &'a str,
    sitemap: &'static str,
    limit: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    location: Option<&'a Locale>,
}

#[derive(Debug, Deserialize)]
struct MapResponse {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    links: Vec<LinkRecord>,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Option::unwrap_or_default)
}

// Client for the discovery API
//
// Holds its own reqwest Client; the probe side builds a separate one with a
// different timeout policy.
pub struct DiscoveryClient {
    client: Client,
    endpoint: String,
    api_key: String,
}

impl DiscoveryClient {
    pub fn new(endpoint: &str, api_key: &str) -> Result<Self, DiscoveryError> {
        let client = Client::builder().build().map_err(DiscoveryError::Client)?;

        Ok(DiscoveryClient {
            client,
            endpoint: endpoint.to_string(),
            api_key: api_key.to_string(),
        })
    }

    // Asks the API for up to `limit` links belonging to `target`
    //
    // Returns:
    //   Ok(links)  - possibly empty if the answer could not be parsed
    //   Err(_)     - the API could not be reached or the body not read
    pub async fn fetch(
        &self,
        target: &str,
        limit: usize,
        locale: Option<&Locale>,
    ) -> Result<Vec<LinkRecord>, DiscoveryError> {
        let payload = MapRequest {
            url: target,
            sitemap: "include",
            limit,
            location: locale,
        };

        info!(target_url = target, limit, endpoint = %self.endpoint, "requesting link list");

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()
            .await
            .map_err(|source| self.transport_error(source))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|source| self.transport_error(source))?;

        debug!(%status, bytes = body.len(), "discovery API answered");

        let links = parse_links(&body);
        for link in &links {
            debug!(url = %link.url, title = %link.title, description = %link.description, "discovered link");
        }

        Ok(links)
    }

    fn transport_error(&self, source: reqwest::Error) -> DiscoveryError {
        DiscoveryError::Transport {
            endpoint: self.endpoint.clone(),
            source,
        }
    }
}

// Parses the API body into link records
//
// Anything unparseable degrades to an empty list: there is simply nothing
// to check, which is reported but is not a reason to abort.
fn parse_links(body: &str) -> Vec<LinkRecord> {
    match serde_json::from_str::<MapResponse>(body) {
        Ok(response) => {
            if !response.success {
                warn!(
                    links = response.links.len(),
                    "discovery API reported success=false"
                );
            }
            response.links
        }
        Err(e) => {
            warn!(error = %e, "could not parse discovery API response, continuing with zero links");
            Vec::new()
        }
    }
}
