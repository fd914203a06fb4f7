#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! CLI entry point for the card catalog scraper.

use std::path::PathBuf;
use std::time::Instant;

use card_catalog_cache::store::FsBlobStore;
use card_catalog_cli_utils::IndicatifProgress;
use card_catalog_ingest::config::CatalogConfig;
use card_catalog_ingest::predicate::{AlwaysUpdate, NeverUpdate, UpdatePredicate};
use card_catalog_ingest::{PipelineProgress, interactive, open_cache, run_pipeline};
use card_catalog_scraper::http::HttpRenderer;
use clap::Parser;

#[derive(Parser)]
#[command(
    name = "card_catalog",
    about = "Scrape the card catalog into incremental JSON caches"
)]
struct Cli {
    /// TOML configuration file (defaults to the built-in configuration)
    #[arg(long)]
    config: Option<PathBuf>,
    /// Re-crawl the card list even if it is cached
    #[arg(long)]
    force_refresh: bool,
    /// Re-fetch every card, ignoring cached records
    #[arg(long)]
    refresh_records: bool,
    /// Directory holding the cache files
    #[arg(long)]
    cache_dir: Option<PathBuf>,
    /// Listing page to start crawling from
    #[arg(long)]
    start_url: Option<String>,
    /// Ask for run options before starting
    #[arg(long)]
    interactive: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let multi = card_catalog_cli_utils::init_logger();
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => CatalogConfig::load(path)?,
        None => CatalogConfig::embedded()?,
    };
    if cli.force_refresh {
        config.force_refresh = true;
    }
    if let Some(dir) = cli.cache_dir {
        config.cache_dir = Some(dir);
    }
    if let Some(url) = cli.start_url {
        config.start_url = url;
    }

    let mut refresh_records = cli.refresh_records;
    if cli.interactive {
        config.start_url = interactive::prompt_start_url(&config)?;
        let choices = interactive::prompt_run_choices(&config, refresh_records)?;
        refresh_records = interactive::apply_choices(&mut config, choices);
    }

    let predicate: &dyn UpdatePredicate = if refresh_records {
        &AlwaysUpdate
    } else {
        &NeverUpdate
    };

    let cache_dir = config.cache_dir();
    log::info!("Using cache directory {}", cache_dir.display());
    let cache = open_cache(&config, FsBlobStore::new(cache_dir));
    let mut renderer = HttpRenderer::new(&config.renderer_config())?;

    let progress = PipelineProgress {
        crawl: IndicatifProgress::crawl_spinner(&multi, "Crawling card list"),
        fetch: IndicatifProgress::fetch_bar(&multi, "Fetching cards"),
    };

    let start = Instant::now();
    let outcome = run_pipeline(&config, &mut renderer, &cache, predicate, progress)
        .await
        .inspect_err(|e| log::error!("Run failed: {e}"))?;
    let elapsed = start.elapsed();

    let report = outcome.records;
    if let Some(failure) = report.aborted {
        log::error!(
            "Stopped at {} after {:.1}s; {} record(s) saved",
            failure.link,
            elapsed.as_secs_f64(),
            report.records.len()
        );
        return Err(failure.error.into());
    }

    log::info!(
        "Done in {:.1}s: {} links, {} records",
        elapsed.as_secs_f64(),
        outcome.index.len(),
        report.records.len()
    );

    Ok(())
}
