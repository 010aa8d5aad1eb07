// src/process/extract.rs

use anyhow::{anyhow, Result};
use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};
use tracing::trace;

use super::raw_table::RawTable;
use super::utils::clean_cell;

/// A page without this substring has no data: the end-of-scrape signal.
pub const TABLE_MARKER: &str = "<table";

static TABLE: Lazy<Selector> =
    Lazy::new(|| Selector::parse("table").expect("table selector should parse"));
static HEAD_CELLS: Lazy<Selector> =
    Lazy::new(|| Selector::parse("thead th").expect("header selector should parse"));
static ROWS: Lazy<Selector> = Lazy::new(|| Selector::parse("tr").expect("row selector should parse"));
static TH: Lazy<Selector> = Lazy::new(|| Selector::parse("th").expect("th selector should parse"));
static TD: Lazy<Selector> = Lazy::new(|| Selector::parse("td").expect("td selector should parse"));
static CELLS: Lazy<Selector> =
    Lazy::new(|| Selector::parse("th, td").expect("cell selector should parse"));

/// Parse the first `<table>` of `html` into a [`RawTable`].
///
/// Returns `Ok(None)` when the markup has no table marker at all. Headers come
/// from `thead th`, or from the first all-`th` row when the table has no head.
/// Body rows are padded with `None` or truncated to the header width.
pub fn extract_table(html: &str) -> Result<Option<RawTable>> {
    if !html.contains(TABLE_MARKER) {
        return Ok(None);
    }

    let doc = Html::parse_document(html);
    let table = doc
        .select(&TABLE)
        .next()
        .ok_or_else(|| anyhow!("page mentions a table but none could be parsed"))?;

    let mut headers: Vec<String> = header_labels(table.select(&HEAD_CELLS));
    let mut rows = Vec::new();

    for tr in table.select(&ROWS) {
        if tr.select(&TD).next().is_none() {
            if headers.is_empty() {
                headers = header_labels(tr.select(&TH));
            }
            continue;
        }
        let mut row: Vec<Option<String>> = tr.select(&CELLS).map(cell_text).collect();
        row.resize(headers.len(), None);
        rows.push(row);
    }

    trace!(columns = headers.len(), rows = rows.len(), "extracted table");
    Ok(Some(RawTable { headers, rows }))
}

fn cell_text(cell: ElementRef<'_>) -> Option<String> {
    clean_cell(&cell.text().collect::<String>())
}

fn header_labels<'a>(cells: impl Iterator<Item = ElementRef<'a>>) -> Vec<String> {
    cells
        .enumerate()
        .map(|(i, th)| cell_text(th).unwrap_or_else(|| format!("Unnamed: {}", i)))
        .collect()
}
