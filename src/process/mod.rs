// src/process/mod.rs

use anyhow::{Context, Result};
use arrow::record_batch::RecordBatch;
use tracing::{info, instrument};

pub mod classify;
pub mod columns;
pub mod dedupe;
pub mod extract;
pub mod normalize;
pub mod order;
pub mod raw_table;
pub mod shape;
pub mod utils;

pub use raw_table::RawTable;

/// Turn the concatenated scrape into the final table:
/// dedupe → classify → normalize `Application` → reorder columns.
#[instrument(level = "info", skip(dataset), fields(rows = dataset.num_rows()))]
pub fn finalize(dataset: RecordBatch) -> Result<RecordBatch> {
    // 1) exact-duplicate rows
    let (deduped, removed) = dedupe::dedupe(&dataset).context("removing duplicate rows")?;
    info!(
        removed,
        remaining = deduped.num_rows(),
        "removed duplicate rows"
    );

    // 2) SpaceX_Classification
    let classified = classify::classify_batch(&deduped).context("classifying rows")?;

    // 3) Application clean-up
    let before = normalize::unique_count(&classified, columns::APPLICATION)?;
    let normalized = normalize::normalize_batch(&classified).context("normalizing Application")?;
    let after = normalize::unique_count(&normalized, columns::APPLICATION)?;
    info!(before, after, "normalized Application column (unique values)");

    // 4) priority columns first
    let table = order::reorder_columns(&normalized)?;

    for (classification, count) in classify::value_counts(&table)? {
        info!(%classification, count, "summary by SpaceX_Classification");
    }
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::init_test_logging;
    use arrow::array::AsArray;

    fn page(rows: &[[&str; 8]]) -> RawTable {
        RawTable {
            headers: ["Mfr.", "Material", "TML %", "WVR", "CVCM", "Application", "Year", "Data Ref"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            rows: rows
                .iter()
                .map(|r| r.iter().map(|c| utils::clean_cell(c)).collect())
                .collect(),
        }
    }

    #[test]
    fn end_to_end_on_shaped_pages() -> Result<()> {
        init_test_logging();
        let first = shape::shape_table(&page(&[
            ["3M", "TAPE 1", "0.90", "0.10", "0.01", "2 SIDE TAPE", "1995", "R1"],
            ["", "FOAM", "4.10", "", "0.02", "", "1988.0", "R2"],
        ]))?;
        let second = shape::shape_table(&page(&[
            ["3M", "TAPE 1", "0.90", "0.10", "0.01", "2 SIDE TAPE", "1995", "R1"],
            ["Dow", "GREASE", "", "", "", "lube", "", "R3"],
        ]))?;
        let dataset = arrow::compute::concat_batches(&first.schema(), &[first, second])?;

        let table = finalize(dataset)?;

        let schema = table.schema();
        let names: Vec<&str> = schema.fields().iter().map(|f| f.name().as_str()).collect();
        assert_eq!(
            names,
            vec![
                "Material",
                "Application",
                "TML_Pct",
                "WVR_Pct",
                "CVCM_Pct",
                "RML_Pct",
                "Year",
                "SpaceX_Classification",
                "Data_Ref",
                "Manufacturer",
                "Raw_Application",
            ]
        );
        assert_eq!(table.num_rows(), 3);

        let text = |name: &str| -> Vec<Option<String>> {
            table
                .column_by_name(name)
                .unwrap()
                .as_string::<i32>()
                .iter()
                .map(|v| v.map(str::to_string))
                .collect()
        };
        assert_eq!(
            text("Application"),
            vec![Some("Tape, Double-Sided".into()), None, Some("Lubricant".into())]
        );
        assert_eq!(
            text("Raw_Application"),
            vec![Some("2 Side Tape".into()), None, Some("Lube".into())]
        );
        assert_eq!(
            text("SpaceX_Classification"),
            vec![
                Some("Pass".into()),
                Some("Rationale Code B (up to 0.25 sq-in)".into()),
                Some("Fail".into()),
            ]
        );
        Ok(())
    }
}
