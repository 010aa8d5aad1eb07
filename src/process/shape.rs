// src/process/shape.rs

use anyhow::{bail, Context, Result};
use arrow::{
    array::{Array, ArrayRef, AsArray, Decimal128Array, StringArray, UInt16Array},
    compute::{cast_with_options, CastOptions},
    datatypes::{DataType, Decimal128Type, Field, Schema},
    record_batch::RecordBatch,
};
use std::sync::Arc;

use super::columns::{CVCM_PCT, HEADER_RENAMES, REQUIRED, RML_PCT, TML_PCT, WVR_PCT, YEAR};
use super::raw_table::RawTable;

pub const PCT_PRECISION: u8 = 10;
pub const PCT_SCALE: i8 = 4;
/// Exact decimal type of every `*_Pct` column.
pub const PCT_TYPE: DataType = DataType::Decimal128(PCT_PRECISION, PCT_SCALE);

/// Source header → shaped column name.
pub fn rename_header(header: &str) -> String {
    let renamed = HEADER_RENAMES
        .iter()
        .find(|(from, _)| *from == header)
        .map_or(header, |(_, to)| *to);
    renamed.trim().replace(' ', "_")
}

/// Turn one scraped page into a typed batch: renamed headers, decimal
/// percentages, integer `Year`, plus the derived `RML_Pct` as last column.
///
/// Non-numeric text in a typed column is an error, not a null.
pub fn shape_table(raw: &RawTable) -> Result<RecordBatch> {
    let names: Vec<String> = raw.headers.iter().map(|h| rename_header(h)).collect();
    for required in REQUIRED {
        if !names.iter().any(|n| n == required) {
            bail!("required column {} missing from table (headers: {:?})", required, raw.headers);
        }
    }

    let mut fields = Vec::with_capacity(names.len() + 1);
    let mut columns: Vec<ArrayRef> = Vec::with_capacity(names.len() + 1);

    for (idx, name) in names.iter().enumerate() {
        let strings: StringArray = raw.column(idx).collect();
        let array: ArrayRef = match name.as_str() {
            TML_PCT | WVR_PCT | CVCM_PCT => {
                Arc::new(parse_pct(&strings).with_context(|| format!("column {}", name))?)
            }
            YEAR => Arc::new(parse_year(&strings).with_context(|| format!("column {}", name))?),
            _ => Arc::new(strings),
        };
        fields.push(Field::new(name.as_str(), array.data_type().clone(), true));
        columns.push(array);
    }

    let rml = recoverable_mass_loss(
        pct_column(&names, &columns, TML_PCT),
        pct_column(&names, &columns, WVR_PCT),
    )?;

    fields.push(Field::new(RML_PCT, PCT_TYPE, true));
    columns.push(Arc::new(rml));

    RecordBatch::try_new(Arc::new(Schema::new(fields)), columns).map_err(Into::into)
}

fn pct_column<'a>(names: &[String], columns: &'a [ArrayRef], name: &str) -> &'a Decimal128Array {
    let idx = names
        .iter()
        .position(|n| n == name)
        .expect("required columns are checked before casting");
    columns[idx].as_primitive::<Decimal128Type>()
}

/// Parse percentage text into exact decimals; `None` stays `None`.
pub fn parse_pct(strings: &StringArray) -> Result<Decimal128Array> {
    let options = CastOptions {
        safe: false,
        ..Default::default()
    };
    let cast = cast_with_options(strings, &PCT_TYPE, &options)?;
    Ok(cast.as_primitive::<Decimal128Type>().clone())
}

/// Parse `Year` through `f64` so stray fractions like `1998.0` truncate.
pub fn parse_year(strings: &StringArray) -> Result<UInt16Array> {
    strings
        .iter()
        .map(|opt| opt.map(year_from_str).transpose())
        .collect()
}

fn year_from_str(s: &str) -> Result<u16> {
    let value: f64 = s.parse().with_context(|| format!("invalid year {:?}", s))?;
    let whole = value.trunc();
    if !(0.0..=f64::from(u16::MAX)).contains(&whole) {
        bail!("year {:?} out of range", s);
    }
    Ok(whole as u16)
}

/// `RML = TML - WVR`, with a missing WVR counted as zero. Null only where TML is null.
pub fn recoverable_mass_loss(tml: &Decimal128Array, wvr: &Decimal128Array) -> Result<Decimal128Array> {
    let rml: Decimal128Array = tml
        .iter()
        .zip(wvr.iter())
        .map(|(tml, wvr)| tml.map(|t| t - wvr.unwrap_or(0)))
        .collect();
    Ok(rml.with_precision_and_scale(PCT_PRECISION, PCT_SCALE)?)
}
