/// Rows of string cells as they came out of the tokenizer
///
/// Row 0 is only a *candidate* header: it is offered to header keyword
/// matching but never sampled for content and never bound as data. Rows may
/// have different widths, so every access goes through [`RawGrid::cell`] or
/// [`cell_at`], which return `""` for missing cells.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawGrid {
    rows: Vec<Vec<String>>,
}

impl RawGrid {
    pub fn new(rows: Vec<Vec<String>>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// First row, if any
    pub fn header(&self) -> Option<&[String]> {
        self.rows.first().map(|row| row.as_slice())
    }

    /// All rows after the header row
    pub fn data_rows(&self) -> &[Vec<String>] {
        self.rows.get(1..).unwrap_or(&[])
    }

    /// First `size` data rows, used to bound the cost of content scoring
    pub fn sample(&self, size: usize) -> &[Vec<String>] {
        let data = self.data_rows();
        &data[..size.min(data.len())]
    }

    /// Cell text at (row, column), `""` when absent
    pub fn cell(&self, row: usize, column: usize) -> &str {
        self.rows
            .get(row)
            .map(|cells| cell_at(cells, Some(column)))
            .unwrap_or("")
    }

    /// Widest row in the grid
    pub fn column_count(&self) -> usize {
        self.rows.iter().map(Vec::len).max().unwrap_or(0)
    }
}

/// Defensive lookup of an optional column in a row
///
/// `None` (role unresolved) and out-of-range indices both yield `""`.
pub fn cell_at(row: &[String], column: Option<usize>) -> &str {
    column
        .and_then(|index| row.get(index))
        .map(String::as_str)
        .unwrap_or("")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(rows: &[&[&str]]) -> RawGrid {
        RawGrid::new(
            rows.iter()
                .map(|row| row.iter().map(|cell| cell.to_string()).collect())
                .collect(),
        )
    }

    #[test]
    fn test_header_and_data_rows() {
        let g = grid(&[&["Name", "Email"], &["Jane", "jane@x.com"], &["Joe"]]);
        assert_eq!(g.header().unwrap(), &["Name".to_string(), "Email".to_string()]);
        assert_eq!(g.data_rows().len(), 2);
        assert_eq!(g.column_count(), 2);
    }

    #[test]
    fn test_empty_grid_has_no_data_rows() {
        let g = RawGrid::default();
        assert!(g.header().is_none());
        assert!(g.data_rows().is_empty());
        assert!(g.sample(10).is_empty());
        assert_eq!(g.column_count(), 0);
    }

    #[test]
    fn test_sample_is_bounded() {
        let g = grid(&[&["h"], &["1"], &["2"], &["3"]]);
        assert_eq!(g.sample(2).len(), 2);
        assert_eq!(g.sample(50).len(), 3);
    }

    #[test]
    fn test_ragged_rows_read_as_empty() {
        let g = grid(&[&["a", "b", "c"], &["only"]]);
        assert_eq!(g.cell(1, 0), "only");
        assert_eq!(g.cell(1, 2), "");
        assert_eq!(g.cell(7, 0), "");
        assert_eq!(cell_at(&g.rows()[1], None), "");
    }
}
