// src/fetch/paginate.rs

use anyhow::{anyhow, bail, Context, Result};
use arrow::{compute::concat_batches, record_batch::RecordBatch};
use tracing::{info, instrument};

use super::PageFetcher;
use crate::process::{extract::extract_table, shape::shape_table};

/// Fetch pages 1, 2, 3, … until a page carries no data table, shaping each
/// page as it arrives, and return every shaped row in fetch order.
///
/// A transport or shaping fault on any page aborts the whole scrape.
#[instrument(level = "info", skip(fetcher))]
pub async fn fetch_all<F: PageFetcher>(fetcher: &F) -> Result<RecordBatch> {
    let mut pages: Vec<RecordBatch> = Vec::new();
    let mut page: u32 = 1;

    loop {
        // 1) one request, awaited before the next is issued
        let html = fetcher
            .fetch_page(page)
            .await
            .with_context(|| format!("fetching page {}", page))?;

        // 2) a missing table is the only end-of-data signal
        let Some(raw) = extract_table(&html).with_context(|| format!("parsing page {}", page))?
        else {
            info!(page, "no data table found; end of scrape");
            break;
        };

        // 3) rename, cast, derive RML
        let shaped = shape_table(&raw).with_context(|| format!("shaping page {}", page))?;
        info!(page, rows = shaped.num_rows(), "scraped page");

        if let Some(first) = pages.first() {
            if first.schema() != shaped.schema() {
                bail!("page {} columns differ from page 1", page);
            }
        }
        pages.push(shaped);
        page += 1;
    }

    let schema = pages
        .first()
        .map(RecordBatch::schema)
        .ok_or_else(|| anyhow!("no data table found on page 1"))?;
    concat_batches(&schema, &pages).context("concatenating scraped pages")
}
