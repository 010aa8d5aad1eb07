// src/export/xlsx.rs

use anyhow::{Context, Result};
use arrow::{
    array::{Array, AsArray},
    datatypes::{DataType, Decimal128Type, UInt16Type},
    record_batch::RecordBatch,
    util::display::{ArrayFormatter, FormatOptions},
};
use rust_xlsxwriter::{Format, Workbook, Worksheet};
use std::path::Path;

pub const SHEET_NAME: &str = "Outgassing";

/// One worksheet: bold header row frozen on top, decimals and years as
/// numbers, everything else as text. Null cells stay empty.
pub fn write_xlsx(batch: &RecordBatch, path: &Path) -> Result<()> {
    let mut workbook = Workbook::new();
    let bold = Format::new().set_bold();

    let sheet = workbook.add_worksheet();
    sheet.set_name(SHEET_NAME)?;

    for (col, field) in batch.schema().fields().iter().enumerate() {
        let col = u16::try_from(col).context("too many columns for a worksheet")?;
        sheet.write_string_with_format(0, col, field.name(), &bold)?;
    }
    for (col, array) in batch.columns().iter().enumerate() {
        let col = u16::try_from(col).context("too many columns for a worksheet")?;
        write_column(sheet, col, array.as_ref())
            .with_context(|| format!("writing column {}", col))?;
    }
    sheet.set_freeze_panes(1, 0)?;

    workbook
        .save(path)
        .with_context(|| format!("saving {}", path.display()))?;
    Ok(())
}

fn write_column(sheet: &mut Worksheet, col: u16, array: &dyn Array) -> Result<()> {
    match array.data_type() {
        DataType::Decimal128(_, scale) => {
            let divisor = 10f64.powi(i32::from(*scale));
            for (i, value) in array.as_primitive::<Decimal128Type>().iter().enumerate() {
                if let Some(v) = value {
                    sheet.write_number(sheet_row(i)?, col, v as f64 / divisor)?;
                }
            }
        }
        DataType::UInt16 => {
            for (i, value) in array.as_primitive::<UInt16Type>().iter().enumerate() {
                if let Some(v) = value {
                    sheet.write_number(sheet_row(i)?, col, f64::from(v))?;
                }
            }
        }
        DataType::Utf8 => {
            for (i, value) in array.as_string::<i32>().iter().enumerate() {
                if let Some(v) = value {
                    sheet.write_string(sheet_row(i)?, col, v)?;
                }
            }
        }
        _ => {
            let formatter = ArrayFormatter::try_new(array, &FormatOptions::default())?;
            for i in 0..array.len() {
                if array.is_valid(i) {
                    sheet.write_string(sheet_row(i)?, col, &formatter.value(i).to_string())?;
                }
            }
        }
    }
    Ok(())
}

// data starts below the header
fn sheet_row(idx: usize) -> Result<u32> {
    u32::try_from(idx + 1).context("too many rows for a worksheet")
}

#[cfg(test)]
mod tests {
    use super::*;
    use arrow::{
        array::{ArrayRef, BooleanArray, StringArray},
        datatypes::{Field, Schema},
    };
    use std::sync::Arc;
    use tempfile::tempdir;

    #[test]
    fn writes_a_zip_container() -> Result<()> {
        let columns: Vec<ArrayRef> = vec![
            Arc::new(StringArray::from(vec![Some("Adhesive"), None])),
            Arc::new(BooleanArray::from(vec![Some(true), None])),
        ];
        let schema = Schema::new(vec![
            Field::new("Application", DataType::Utf8, true),
            Field::new("Flag", DataType::Boolean, true),
        ]);
        let batch = RecordBatch::try_new(Arc::new(schema), columns)?;

        let dir = tempdir()?;
        let path = dir.path().join("t.xlsx");
        write_xlsx(&batch, &path)?;

        let bytes = std::fs::read(&path)?;
        assert!(bytes.starts_with(b"PK"));
        Ok(())
    }

    #[test]
    fn rows_are_offset_by_header() -> Result<()> {
        assert_eq!(sheet_row(0)?, 1);
        assert_eq!(sheet_row(41)?, 42);
        Ok(())
    }
}
