// src/process/order.rs

use anyhow::{Context, Result};
use arrow::record_batch::RecordBatch;
use std::{collections::HashSet, hash::Hash};

use super::columns::{
    APPLICATION, CLASSIFICATION, CVCM_PCT, DATA_REF, MANUFACTURER, MATERIAL, RML_PCT, TML_PCT,
    WVR_PCT, YEAR,
};

/// Columns that lead the final table, in this order, when present.
pub const PRIORITY_COLUMNS: [&str; 10] = [
    MATERIAL,
    APPLICATION,
    TML_PCT,
    WVR_PCT,
    CVCM_PCT,
    RML_PCT,
    YEAR,
    CLASSIFICATION,
    DATA_REF,
    MANUFACTURER,
];

/// Insertion-ordered set: a sequence plus a membership index.
#[derive(Debug, Clone)]
pub struct OrderedSet<T> {
    items: Vec<T>,
    seen: HashSet<T>,
}

impl<T: Eq + Hash + Clone> OrderedSet<T> {
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            seen: HashSet::new(),
        }
    }

    /// Append `item` unless already present. Returns whether it was added.
    pub fn insert(&mut self, item: T) -> bool {
        if self.seen.insert(item.clone()) {
            self.items.push(item);
            true
        } else {
            false
        }
    }

    pub fn contains(&self, item: &T) -> bool {
        self.seen.contains(item)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    pub fn into_vec(self) -> Vec<T> {
        self.items
    }
}

impl<T: Eq + Hash + Clone> Default for OrderedSet<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Eq + Hash + Clone> Extend<T> for OrderedSet<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for item in iter {
            self.insert(item);
        }
    }
}

impl<T: Eq + Hash + Clone> FromIterator<T> for OrderedSet<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut set = Self::new();
        set.extend(iter);
        set
    }
}

/// Present priority columns in priority order, then every other present
/// column in encounter order. No name appears twice.
pub fn order_columns<'a>(present: &[&'a str]) -> Vec<&'a str> {
    let available: OrderedSet<&'a str> = present.iter().copied().collect();
    let mut ordered: OrderedSet<&'a str> = PRIORITY_COLUMNS
        .iter()
        .copied()
        .filter(|name| available.contains(name))
        .collect();
    ordered.extend(available.into_vec());
    ordered.into_vec()
}

/// Project `batch` onto [`order_columns`] of its schema.
pub fn reorder_columns(batch: &RecordBatch) -> Result<RecordBatch> {
    let schema = batch.schema();
    let present: Vec<&str> = schema.fields().iter().map(|f| f.name().as_str()).collect();
    let indices = order_columns(&present)
        .into_iter()
        .map(|name| schema.index_of(name))
        .collect::<std::result::Result<Vec<_>, _>>()?;
    batch
        .project(&indices)
        .context("projecting columns into final order")
}
