// src/discovery/mod.rs
// =============================================================================
// This module turns a website into a list of URLs to check.
//
// We don't crawl the site ourselves: an external discovery API (Firecrawl's
// "map" endpoint by default) already knows how to combine sitemaps and
// crawling. We send it the target and get back link records.
//
// Failure modes are deliberately split:
// - Could not reach the API at all  -> DiscoveryError, the run stops
// - Got an answer we can't parse     -> empty list, the run continues
// =============================================================================

mod fetch;

pub use fetch::{DiscoveryClient, LinkRecord};
