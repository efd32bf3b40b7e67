// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Parse and validate command-line arguments
// 2. Ask the discovery API for the site's links
// 3. Check every link concurrently
// 4. Build the report and write it to a file
// 5. Exit with proper code:
//      0 = finished, nothing too slow
//      1 = invalid arguments, a link exceeded the accepted time, or a
//          fatal error (e.g. discovery API unreachable)
// =============================================================================

mod checker; // src/checker/ - probing, concurrency, latency
mod cli; // src/cli.rs - command-line parsing
mod config; // src/config.rs - run configuration
mod discovery; // src/discovery/ - discovery API client
mod error; // src/error.rs - typed errors
mod report; // src/report/ - JSON/CSV report files

#[cfg(test)]
mod test_support;

use anyhow::{Context, Result};
use checker::{Coordinator, HttpProber};
use clap::Parser;
use cli::Cli;
use config::{RunConfig, MAX_IN_FLIGHT};
use discovery::DiscoveryClient;
use report::Report;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    // Logs go to stderr; stdout is for the summary
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    std::process::exit(finish(run().await));
}

// Fatal errors exit with 1, the same code as a failed run
fn finish(result: Result<i32>) -> i32 {
    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            1
        }
    }
}

// Returns:
//   Ok(0) = run finished, no link exceeded the accepted time
//   Ok(1) = bad arguments, or at least one slow link
//   Err   = fatal error (main exits with 1)
async fn run() -> Result<i32> {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            // --help and --version also come through here
            let _ = e.print();
            return Ok(if e.use_stderr() { 1 } else { 0 });
        }
    };

    let config = match cli.into_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            eprintln!("Run with --help for usage.");
            return Ok(1);
        }
    };

    audit(&config).await
}

async fn audit(config: &RunConfig) -> Result<i32> {
    println!("🔍 Auditing website: {}", config.target_url);

    let discovery = DiscoveryClient::new(&config.api_url, &config.api_key)?;
    let links = discovery
        .fetch(&config.target_url, config.limit, config.locale.as_ref())
        .await
        .context("could not fetch the list of links")?;

    println!("📄 Discovered {} link(s)", links.len());

    let prober = HttpProber::new(config.cache_bypass, Duration::from_secs(config.timeout_secs))
        .context("failed to create HTTP client")?;
    let coordinator = Coordinator::new(Arc::new(prober), MAX_IN_FLIGHT);
    let progress = coordinator.progress();
    let results = coordinator.run(links).await;

    if results.is_empty() {
        println!("⚠️  No links to check");
    } else {
        println!("🌐 Checked {}/{} link(s)", progress.completed(), progress.total());
    }

    let report = Report::build(results, config.max_latency_ms);

    match config
        .output_format
        .writer()
        .write(&config.output_name, &report)
    {
        Ok(path) => info!(path = %path.display(), "report written"),
        Err(e) => error!(error = %e, "failed to write report"),
    }

    print_summary(&report);

    if report.has_slow_links() {
        print_slow_links(&report);
    } else {
        println!("All links checked successfully");
    }

    Ok(exit_code(&report))
}

// A link over the accepted time fails the run; nothing else in the report does
fn exit_code(report: &Report) -> i32 {
    if report.has_slow_links() {
        1
    } else {
        0
    }
}

fn print_summary(report: &Report) {
    println!();
    println!("📊 Summary:");
    println!("   ✅ OK: {}", report.links_ok.len());
    println!("   ❌ Error: {}", report.links_error.len());
    println!("   🐢 Slow: {}", report.links_ok_slow.len() + report.links_error_slow.len());
    println!("   📋 Total: {}", report.links_ok.len() + report.links_error.len());
    println!();
}

fn print_slow_links(report: &Report) {
    let banner = "@".repeat(52);
    println!("{}", banner);
    println!("{}", banner);
    println!("{}", banner);
    println!("Links spend more than max time accepted per request:");
    for link in report.slow_links() {
        println!(
            "Url: {} | Status: {} | Time duration: {} ms",
            link.url, link.status, link.elapsed_ms
        );
    }
}
