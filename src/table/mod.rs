//! In-memory tabular data.
//!
//! A [`Table`] is a header row plus an ordered list of records. Every record
//! has exactly one cell per column; that invariant is checked once when the
//! table is parsed and preserved by every mutation afterwards (cells can be
//! overwritten, rows are never added or removed).

use std::collections::HashSet;

use crate::error::ParseError;

/// Column shown read-only as the record's title.
pub const TITLE_COLUMN: &str = "Title";
/// Column shown read-only as the record's multi-line abstract.
pub const ABSTRACT_COLUMN: &str = "Abstract";
/// Columns that are always displayed but never editable.
pub const READ_ONLY_COLUMNS: [&str; 2] = [TITLE_COLUMN, ABSTRACT_COLUMN];

/// Returns true if `name` is one of the display-only columns.
pub fn is_read_only(name: &str) -> bool {
    READ_ONLY_COLUMNS.contains(&name)
}

/// A loaded table of string cells.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    /// Parse comma-separated bytes. The first line is the header.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError`] when the bytes are not valid UTF-8 CSV, when a
    /// record's field count differs from the header's, when there is no
    /// header at all, or when two columns share a name.
    pub fn from_csv_bytes(bytes: &[u8]) -> Result<Self, ParseError> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(false)
            .from_reader(bytes);

        let headers: Vec<String> = reader.headers()?.iter().map(str::to_owned).collect();
        if headers.is_empty() {
            return Err(ParseError::MissingHeader);
        }
        let mut seen = HashSet::with_capacity(headers.len());
        for name in &headers {
            if !seen.insert(name.as_str()) {
                return Err(ParseError::DuplicateColumn(name.clone()));
            }
        }

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record?;
            rows.push(record.iter().map(str::to_owned).collect());
        }

        Ok(Self { headers, rows })
    }

    /// Serialize the full table, header first, in load order.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the CSV writer fails.
    pub fn to_csv_bytes(&self) -> std::io::Result<Vec<u8>> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.write_record(&self.headers)?;
        for row in &self.rows {
            writer.write_record(row)?;
        }
        writer.into_inner().map_err(csv::IntoInnerError::into_error)
    }

    /// Column names in order.
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of a column by name.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    /// Borrow a record by zero-based row index.
    pub fn record(&self, row: usize) -> Option<Record<'_>> {
        self.rows.get(row).map(|values| Record {
            headers: &self.headers,
            values,
        })
    }

    /// Cell value at a zero-based row and a column name.
    pub fn cell(&self, row: usize, column: &str) -> Option<&str> {
        let col = self.column_index(column)?;
        self.rows.get(row).map(|r| r[col].as_str())
    }

    /// Overwrite a cell. Returns false if the row or column does not exist.
    pub fn set_cell(&mut self, row: usize, column: &str, value: impl Into<String>) -> bool {
        let Some(col) = self.column_index(column) else {
            return false;
        };
        let Some(cells) = self.rows.get_mut(row) else {
            return false;
        };
        cells[col] = value.into();
        true
    }
}

/// A borrowed view of one table row.
#[derive(Debug, Clone, Copy)]
pub struct Record<'a> {
    headers: &'a [String],
    values: &'a [String],
}

impl<'a> Record<'a> {
    /// Cell value for a column name.
    pub fn get(self, column: &str) -> Option<&'a str> {
        self.headers
            .iter()
            .position(|h| h == column)
            .map(|i| self.values[i].as_str())
    }

    /// `(column, value)` pairs in column order.
    pub fn iter(self) -> impl Iterator<Item = (&'a str, &'a str)> {
        let Self { headers, values } = self;
        headers
            .iter()
            .map(String::as_str)
            .zip(values.iter().map(String::as_str))
    }

    pub const fn len(&self) -> usize {
        self.values.len()
    }

    pub const fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAPERS: &str = "Title,Abstract,Year\n\
                          Alpha,First abstract,2001\n\
                          Beta,\"Second, with comma\",2002\n\
                          Gamma,,2003\n";

    #[test]
    fn test_parse_reads_header_and_rows() {
        let table = Table::from_csv_bytes(PAPERS.as_bytes()).unwrap();
        assert_eq!(table.headers(), ["Title", "Abstract", "Year"]);
        assert_eq!(table.row_count(), 3);
        assert_eq!(table.cell(1, "Abstract"), Some("Second, with comma"));
        assert_eq!(table.cell(2, "Abstract"), Some(""));
    }

    #[test]
    fn test_parse_header_only_is_empty_table() {
        let table = Table::from_csv_bytes(b"Title,Year\n").unwrap();
        assert!(table.is_empty());
        assert!(table.record(0).is_none());
    }

    #[test]
    fn test_parse_rejects_unequal_row_lengths() {
        let err = Table::from_csv_bytes(b"Title,Year\nAlpha,2001,extra\n").unwrap_err();
        assert!(matches!(err, ParseError::Csv(_)));
    }

    #[test]
    fn test_parse_rejects_invalid_utf8() {
        let err = Table::from_csv_bytes(b"Title,Year\n\xff\xfe,2001\n").unwrap_err();
        assert!(matches!(err, ParseError::Csv(_)));
    }

    #[test]
    fn test_parse_rejects_empty_input() {
        let err = Table::from_csv_bytes(b"").unwrap_err();
        assert!(matches!(err, ParseError::MissingHeader));
    }

    #[test]
    fn test_parse_rejects_duplicate_columns() {
        let err = Table::from_csv_bytes(b"Year,Year\n1,2\n").unwrap_err();
        assert!(matches!(err, ParseError::DuplicateColumn(ref c) if c == "Year"));
    }

    #[test]
    fn test_set_cell_overwrites_only_target() {
        let mut table = Table::from_csv_bytes(PAPERS.as_bytes()).unwrap();
        assert!(table.set_cell(0, "Year", "2020"));
        assert_eq!(table.cell(0, "Year"), Some("2020"));
        assert_eq!(table.cell(1, "Year"), Some("2002"));
        assert_eq!(table.cell(0, "Title"), Some("Alpha"));
    }

    #[test]
    fn test_set_cell_unknown_target_is_rejected() {
        let mut table = Table::from_csv_bytes(PAPERS.as_bytes()).unwrap();
        assert!(!table.set_cell(0, "Venue", "x"));
        assert!(!table.set_cell(9, "Year", "x"));
    }

    #[test]
    fn test_record_iterates_in_column_order() {
        let table = Table::from_csv_bytes(PAPERS.as_bytes()).unwrap();
        let record = table.record(0).unwrap();
        let pairs: Vec<_> = record.iter().collect();
        assert_eq!(
            pairs,
            [("Title", "Alpha"), ("Abstract", "First abstract"), ("Year", "2001")]
        );
        assert_eq!(record.get("Year"), Some("2001"));
        assert_eq!(record.get("Venue"), None);
    }

    #[test]
    fn test_export_quotes_cells_with_commas() {
        let table = Table::from_csv_bytes(PAPERS.as_bytes()).unwrap();
        let out = String::from_utf8(table.to_csv_bytes().unwrap()).unwrap();
        assert!(out.starts_with("Title,Abstract,Year\n"));
        assert!(out.contains("\"Second, with comma\""));
    }

    #[test]
    fn test_read_only_columns() {
        assert!(is_read_only("Title"));
        assert!(is_read_only("Abstract"));
        assert!(!is_read_only("title"));
        assert!(!is_read_only("Year"));
    }
}
