// src/process/dedupe.rs

use anyhow::Result;
use arrow::{
    array::UInt32Array,
    compute::take_record_batch,
    record_batch::RecordBatch,
    row::{RowConverter, SortField},
};
use std::collections::HashSet;

/// Drop rows identical to an earlier row across every column (null equals
/// null), keeping first occurrences in their original order.
///
/// Returns the surviving rows and how many were removed.
pub fn dedupe(batch: &RecordBatch) -> Result<(RecordBatch, usize)> {
    let fields = batch
        .schema()
        .fields()
        .iter()
        .map(|f| SortField::new(f.data_type().clone()))
        .collect();
    let converter = RowConverter::new(fields)?;
    let rows = converter.convert_columns(batch.columns())?;

    let mut seen = HashSet::with_capacity(rows.num_rows());
    let keep: Vec<u32> = (0..rows.num_rows())
        .filter(|&i| seen.insert(rows.row(i)))
        .map(|i| i as u32)
        .collect();

    let removed = batch.num_rows() - keep.len();
    if removed == 0 {
        return Ok((batch.clone(), 0));
    }
    let kept = take_record_batch(batch, &UInt32Array::from(keep))?;
    Ok((kept, removed))
}
