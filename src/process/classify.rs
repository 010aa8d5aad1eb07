// src/process/classify.rs

use anyhow::{anyhow, bail, Context, Result};
use arrow::{
    array::{ArrayRef, AsArray, Decimal128Array, StringArray},
    datatypes::{DataType, Decimal128Type, Field, Schema},
    record_batch::RecordBatch,
};
use std::{collections::HashMap, fmt, sync::Arc};

use super::columns::{CLASSIFICATION, CVCM_PCT, RML_PCT};
use super::shape::{PCT_SCALE, PCT_TYPE};

/// Outgassing screening result for one material.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Classification {
    Pass,
    RationaleCodeA,
    RationaleCodeB,
    Fail,
}

impl Classification {
    pub fn as_str(&self) -> &'static str {
        match self {
            Classification::Pass => "Pass",
            Classification::RationaleCodeA => "Rationale Code A (up to 2 sq-in)",
            Classification::RationaleCodeB => "Rationale Code B (up to 0.25 sq-in)",
            Classification::Fail => "Fail",
        }
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 1.0 % in `PCT_SCALE` fixed point.
const ONE_PCT: i128 = 10_i128.pow(PCT_SCALE as u32);
const RML_PASS_MAX: i128 = ONE_PCT;
const RML_CODE_A_MAX: i128 = 3 * ONE_PCT;
const CVCM_MAX: i128 = ONE_PCT / 10;

type Predicate = fn(Option<i128>, Option<i128>) -> bool;

/// `(rml, cvcm)` rules, tried top to bottom. A row matching none is `Fail`.
///
/// Rule 3 overlaps the first two; only its position keeps it from
/// swallowing rows they already claimed.
pub const DECISION_LIST: [(Predicate, Classification); 3] = [
    (pass_rule, Classification::Pass),
    (code_a_rule, Classification::RationaleCodeA),
    (code_b_rule, Classification::RationaleCodeB),
];

// RPUG V10 Rev 2024-09, Table 5-5.
fn pass_rule(rml: Option<i128>, cvcm: Option<i128>) -> bool {
    at_most(rml, RML_PASS_MAX) && at_most(cvcm, CVCM_MAX)
}

// RPUG V10 Rev 2024-09, Table 6-7.
fn code_a_rule(rml: Option<i128>, cvcm: Option<i128>) -> bool {
    at_most(rml, RML_CODE_A_MAX) && at_most(cvcm, CVCM_MAX)
}

// RPUG V10 Rev 2024-09, Table 6-7.
fn code_b_rule(rml: Option<i128>, cvcm: Option<i128>) -> bool {
    above(rml, RML_CODE_A_MAX) || above(cvcm, CVCM_MAX)
}

// Comparisons against a missing value never match.
fn at_most(value: Option<i128>, limit: i128) -> bool {
    matches!(value, Some(v) if v <= limit)
}

fn above(value: Option<i128>, limit: i128) -> bool {
    matches!(value, Some(v) if v > limit)
}

/// Classify one row from its RML and CVCM percentages (fixed point, `PCT_SCALE`).
pub fn classify(rml: Option<i128>, cvcm: Option<i128>) -> Classification {
    DECISION_LIST
        .iter()
        .find(|(rule, _)| rule(rml, cvcm))
        .map_or(Classification::Fail, |(_, class)| *class)
}

/// Append `SpaceX_Classification` computed from `RML_Pct` and `CVCM_Pct`.
pub fn classify_batch(batch: &RecordBatch) -> Result<RecordBatch> {
    let rml = pct_column(batch, RML_PCT)?;
    let cvcm = pct_column(batch, CVCM_PCT)?;

    let labels: StringArray = rml
        .iter()
        .zip(cvcm.iter())
        .map(|(rml, cvcm)| Some(classify(rml, cvcm).as_str()))
        .collect();

    let schema = batch.schema();
    let mut fields: Vec<Field> = schema.fields().iter().map(|f| f.as_ref().clone()).collect();
    fields.push(Field::new(CLASSIFICATION, DataType::Utf8, false));
    let mut columns: Vec<ArrayRef> = batch.columns().to_vec();
    columns.push(Arc::new(labels));

    RecordBatch::try_new(Arc::new(Schema::new(fields)), columns).map_err(Into::into)
}

fn pct_column<'a>(batch: &'a RecordBatch, name: &str) -> Result<&'a Decimal128Array> {
    let column = batch
        .column_by_name(name)
        .ok_or_else(|| anyhow!("column {} missing", name))?;
    match column.data_type() {
        DataType::Decimal128(_, scale) if *scale == PCT_SCALE => {
            Ok(column.as_primitive::<Decimal128Type>())
        }
        other => bail!("column {} has type {}, expected {}", name, other, PCT_TYPE),
    }
}

/// Row count per classification label, most frequent first (ties by label).
pub fn value_counts(batch: &RecordBatch) -> Result<Vec<(String, usize)>> {
    let labels = batch
        .column_by_name(CLASSIFICATION)
        .ok_or_else(|| anyhow!("column {} missing", CLASSIFICATION))?
        .as_string_opt::<i32>()
        .with_context(|| format!("column {} is not text", CLASSIFICATION))?;

    let mut counts: HashMap<&str, usize> = HashMap::new();
    for label in labels.iter().flatten() {
        *counts.entry(label).or_default() += 1;
    }
    let mut counts: Vec<(String, usize)> =
        counts.into_iter().map(|(label, n)| (label.to_string(), n)).collect();
    counts.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    Ok(counts)
}
