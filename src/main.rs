use anyhow::{Context, Result};
use outgassing::{export, fetch, fetch::HttpPageFetcher, logging, process, Config};
use reqwest::Client;
use tokio::time::Instant;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // ─── 1) init logging ─────────────────────────────────────────────
    logging::init("info");
    let start = Instant::now();
    info!("startup");

    // ─── 2) configuration ────────────────────────────────────────────
    let config = Config::load()?;
    info!(
        base_url = %config.base_url,
        output_dir = %config.output_dir.display(),
        "config loaded"
    );

    // ─── 3) scrape every page into one table ─────────────────────────
    let client = Client::builder()
        .user_agent(config.user_agent.as_str())
        .build()
        .context("building HTTP client")?;
    let fetcher = HttpPageFetcher::new(client, &config.base_url)?;
    let dataset = fetch::fetch_all(&fetcher).await?;
    info!(rows = dataset.num_rows(), "scrape complete");

    // ─── 4) dedupe, classify, normalize, reorder ─────────────────────
    let table = process::finalize(dataset)?;

    // ─── 5) export ───────────────────────────────────────────────────
    let written = export::write_all(&table, &config.output_dir, &config.file_stem)?;
    for path in &written {
        info!(path = %path.display(), "wrote");
    }

    info!(
        rows = table.num_rows(),
        elapsed = ?start.elapsed(),
        "pipeline complete"
    );
    Ok(())
}
