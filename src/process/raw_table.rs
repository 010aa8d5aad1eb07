/// One page's data table exactly as scraped: original header labels and
/// string cells, with blank cells already collapsed to `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawTable {
    pub headers: Vec<String>,
    /// Row-major; every row has `headers.len()` cells.
    pub rows: Vec<Vec<Option<String>>>,
}

impl RawTable {
    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }

    /// Cells of the column at `idx`, top to bottom.
    pub fn column(&self, idx: usize) -> impl Iterator<Item = Option<&str>> + '_ {
        self.rows
            .iter()
            .map(move |row| row.get(idx).and_then(|cell| cell.as_deref()))
    }
}
