// src/checker/probe.rs
// =============================================================================
// This module checks if a single URL is alive by making one HTTP GET.
//
// Key functionality:
// - One GET per link, no retries
// - Optional cache busting: append ?v=<unix timestamp> to the URL
// - A hard deadline around the whole request
// - Every outcome is a status code plus how long it took:
//     response         -> the real HTTP status
//     deadline reached -> 408 (Request Timeout)
//     anything else    -> 500 (Internal Server Error)
//
// Rust concepts:
// - Traits: the Prober trait lets the coordinator run any kind of probe
// - async-trait: async functions inside a trait
// - tokio::time::timeout: wraps a future with a deadline
// =============================================================================

use crate::discovery::LinkRecord;
use async_trait::async_trait;
use chrono::Utc;
use reqwest::{Client, StatusCode};
use serde::Serialize;
use std::time::{Duration, Instant};
use tracing::debug;
use url::Url;

// URLs containing this are reported healthy without a request.
// It matches the text anywhere in the URL, not the scheme; kept for
// compatibility with existing reports.
const SECURE_PORT_MARKER: &str = ":443";

// The result of checking a single link
//
// Serialized as {"url": ..., "status": ..., "time_duration_ms": ...}
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProbeOutcome {
    /// The URL that was requested (including any cache-busting parameter)
    pub url: String,
    /// HTTP status, or 408/500 for timeouts and transport errors
    pub status: u16,
    /// Wall-clock time spent on the request
    #[serde(rename = "time_duration_ms")]
    pub elapsed_ms: u64,
}

impl ProbeOutcome {
    /// Only an exact 200 counts as OK
    pub fn is_ok(&self) -> bool {
        self.status == StatusCode::OK.as_u16()
    }
}

// Anything that can turn a link into an outcome
//
// The coordinator only knows about this trait, so it can be driven by the
// real HTTP prober or by a fake one in tests.
#[async_trait]
pub trait Prober: Send + Sync + 'static {
    async fn probe(&self, link: LinkRecord) -> ProbeOutcome;
}

// The real prober: one shared reqwest Client, read-only settings
pub struct HttpProber {
    client: Client,
    cache_bypass: bool,
    timeout: Duration,
}

impl HttpProber {
    pub fn new(cache_bypass: bool, timeout: Duration) -> reqwest::Result<Self> {
        // The deadline is applied per request in probe(); the client itself
        // has no timeout so the two can't race each other.
        let client = Client::builder().build()?;

        Ok(HttpProber {
            client,
            cache_bypass,
            timeout,
        })
    }
}

#[async_trait]
impl Prober for HttpProber {
    async fn probe(&self, link: LinkRecord) -> ProbeOutcome {
        if link.url.contains(SECURE_PORT_MARKER) {
            return ProbeOutcome {
                url: link.url,
                status: StatusCode::OK.as_u16(),
                elapsed_ms: 0,
            };
        }

        let url = if self.cache_bypass {
            cache_busted(&link.url, Utc::now().timestamp())
        } else {
            link.url
        };

        let started = Instant::now();
        let result = tokio::time::timeout(self.timeout, self.client.get(&url).send()).await;
        let elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);

        let status = match result {
            Ok(Ok(response)) => response.status(),
            Ok(Err(e)) if e.is_timeout() => StatusCode::REQUEST_TIMEOUT,
            Ok(Err(e)) => {
                debug!(url = %url, error = %e, "request failed");
                StatusCode::INTERNAL_SERVER_ERROR
            }
            Err(_) => StatusCode::REQUEST_TIMEOUT,
        };

        ProbeOutcome {
            url,
            status: status.as_u16(),
            elapsed_ms,
        }
    }
}

// Adds v=<timestamp> to the query so caches between us and the server see
// a new URL. Any fragment stays after the query.
fn cache_busted(url: &str, timestamp: i64) -> String {
    match Url::parse(url) {
        Ok(mut parsed) => {
            parsed
                .query_pairs_mut()
                .append_pair("v", &timestamp.to_string());
            parsed.into()
        }
        // Not a URL; the request will fail with 500 either way
        Err(_) => {
            let separator = if url.contains('?') { '&' } else { '?' };
            format!("{}{}v={}", url, separator, timestamp)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{closed_port, listener, mock_server};
    use mockito::Matcher;

    fn prober(cache_bypass: bool, timeout_secs: u64) -> HttpProber {
        HttpProber::new(cache_bypass, Duration::from_secs(timeout_secs)).unwrap()
    }

    #[test]
    fn test_cache_busted_url() {
        assert_eq!(cache_busted("http://x/y", 1700000000), "http://x/y?v=1700000000");
        assert_eq!(
            cache_busted("http://x/y?page=2", 1700000000),
            "http://x/y?page=2&v=1700000000"
        );
    }

    #[test]
    fn test_cache_busted_url_keeps_fragment_last() {
        assert_eq!(
            cache_busted("http://x/y#top", 1700000000),
            "http://x/y?v=1700000000#top"
        );
        assert_eq!(
            cache_busted("http://x/y#a?b", 1700000000),
            "http://x/y?v=1700000000#a?b"
        );
    }

    #[test]
    fn test_cache_busted_unparseable_url_falls_back() {
        assert_eq!(cache_busted("not a url", 1700000000), "not a url?v=1700000000");
    }

    #[test]
    fn test_outcome_is_ok_only_for_200() {
        let mut outcome = ProbeOutcome {
            url: "https://example.com".to_string(),
            status: 200,
            elapsed_ms: 10,
        };
        assert!(outcome.is_ok());

        outcome.status = 204;
        assert!(!outcome.is_ok());
    }

    #[test]
    fn test_outcome_json_field_names() {
        let outcome = ProbeOutcome {
            url: "https://example.com".to_string(),
            status: 404,
            elapsed_ms: 12,
        };
        assert_eq!(
            serde_json::to_value(&outcome).unwrap(),
            serde_json::json!({"url": "https://example.com", "status": 404, "time_duration_ms": 12})
        );
    }

    #[tokio::test]
    async fn test_secure_port_short_circuits() {
        // .invalid never resolves, so a real request would come back as 500
        let outcome = prober(true, 5)
            .probe(LinkRecord::new("https://unreachable.invalid:443/page"))
            .await;
        assert_eq!(outcome.status, 200);
        assert_eq!(outcome.elapsed_ms, 0);
        assert_eq!(outcome.url, "https://unreachable.invalid:443/page");
    }

    #[tokio::test]
    async fn test_status_codes_are_reported() {
        let mut server = mock_server().await;
        let _ok = server
            .mock("GET", "/ok")
            .with_status(200)
            .create_async()
            .await;
        let _missing = server
            .mock("GET", "/missing")
            .with_status(404)
            .create_async()
            .await;

        let prober = prober(false, 5);
        let ok = prober
            .probe(LinkRecord::new(format!("{}/ok", server.url())))
            .await;
        let missing = prober
            .probe(LinkRecord::new(format!("{}/missing", server.url())))
            .await;

        assert_eq!(ok.status, 200);
        assert_eq!(missing.status, 404);
        assert_eq!(missing.url, format!("{}/missing", server.url()));
    }

    #[tokio::test]
    async fn test_cache_bypass_adds_timestamp_query() {
        let mut server = mock_server().await;
        let mock = server
            .mock("GET", "/y")
            .match_query(Matcher::Regex(r"^v=\d+$".to_string()))
            .with_status(200)
            .create_async()
            .await;

        let outcome = prober(true, 5)
            .probe(LinkRecord::new(format!("{}/y", server.url())))
            .await;

        mock.assert_async().await;
        assert_eq!(outcome.status, 200);
        assert!(outcome.url.starts_with(&format!("{}/y?v=", server.url())));
    }

    #[tokio::test]
    async fn test_cache_bypass_with_fragment_reaches_server() {
        let mut server = mock_server().await;
        let busted = server
            .mock("GET", "/y")
            .match_query(Matcher::Regex(r"^v=\d+$".to_string()))
            .with_status(200)
            .expect(1)
            .create_async()
            .await;

        let outcome = prober(true, 5)
            .probe(LinkRecord::new(format!("{}/y#top", server.url())))
            .await;

        busted.assert_async().await;
        assert_eq!(outcome.status, 200);
        assert!(outcome.url.starts_with(&format!("{}/y?v=", server.url())));
        assert!(outcome.url.ends_with("#top"));
    }

    #[tokio::test]
    async fn test_silent_server_times_out_with_408() {
        // Accept connections but never answer
        let listener = listener().await;
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let mut held = Vec::new();
            while let Ok((socket, _)) = listener.accept().await {
                held.push(socket);
            }
        });

        let outcome = prober(false, 1)
            .probe(LinkRecord::new(format!("http://{}/slow", addr)))
            .await;

        assert_eq!(outcome.status, 408);
        assert!(outcome.elapsed_ms >= 1000, "elapsed {}", outcome.elapsed_ms);
        assert!(outcome.elapsed_ms < 3000, "elapsed {}", outcome.elapsed_ms);
    }

    #[tokio::test]
    async fn test_connection_refused_is_500() {
        let port = closed_port().await;

        let outcome = prober(false, 5)
            .probe(LinkRecord::new(format!("http://127.0.0.1:{}/", port)))
            .await;

        assert_eq!(outcome.status, 500);
    }
}
