//! `crag` command-line entrypoint.
//!
//! `crag <question...>` runs one search and prints the result as JSON.
//! `crag --health` prints the health report.

use mimalloc::MiMalloc;

use crag::analysis::UserContext;
use crag::config::Config;
use crag::pipeline::build_live_pipeline;
use crag::tool::{HealthReport, SearchEngineHealth};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

const CLI_USER_ID: &str = "cli";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();

    let config = Config::from_env()?;
    config.validate()?;

    if args.iter().any(|arg| arg == "--health") {
        let search_engine = match build_live_pipeline(&config) {
            Ok(pipeline) => SearchEngineHealth::probe(&pipeline).await,
            Err(e) => {
                tracing::error!(error = %e, "Search engine unavailable");
                SearchEngineHealth::unavailable(e.to_string())
            }
        };
        let report = HealthReport::check(search_engine);
        println!("{}", serde_json::to_string_pretty(&report)?);
        if !report.is_healthy() {
            std::process::exit(1);
        }
        return Ok(());
    }

    let query = args.join(" ");
    if query.trim().is_empty() {
        anyhow::bail!("usage: crag <question> | crag --health");
    }

    let pipeline = build_live_pipeline(&config)?;
    let result = pipeline
        .search(&query, &UserContext::new(CLI_USER_ID), config.top_k)
        .await?;

    println!("{}", serde_json::to_string_pretty(&result)?);
    tracing::info!(
        metrics = ?pipeline.performance_metrics(),
        "Search finished"
    );
    Ok(())
}
