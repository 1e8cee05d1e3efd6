//! The record editor session.
//!
//! A [`Session`] owns everything one user works on: the loaded [`Table`],
//! the active editable-field set and the cursor. All operations are plain
//! `&mut self` methods; hosts that serve several users at once keep one
//! session per user in a [`SessionRegistry`].
//!
//! The cursor is 1-based. It is `0` only when no record exists (nothing
//! loaded, or a table with a header and no rows).

mod registry;

pub use registry::{SessionKey, SessionRegistry};

use std::borrow::Borrow;
use std::collections::HashMap;
use std::hash::Hash;
use std::path::Path;

use tracing::{debug, info};

use crate::error::{FieldRejection, SessionError};
use crate::table::{Record, Table, is_read_only};

/// Default file name used when exporting.
pub const DEFAULT_EXPORT_NAME: &str = "updated_data.csv";

/// Informational outcomes reported back to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// A table replaced the previous session state.
    Loaded { rows: usize, columns: usize },
    /// `next` was requested on the last record.
    EndOfData,
    /// Edited values were written into the current record.
    Saved { record: usize, fields_written: usize },
    /// The table was written out.
    Exported { rows: usize },
}

impl std::fmt::Display for Notice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Loaded { rows, columns } => {
                write!(f, "Loaded {rows} records with {columns} columns")
            }
            Self::EndOfData => f.write_str("End of data reached"),
            Self::Saved { record: 0, .. } => f.write_str("No record to save"),
            Self::Saved { record, .. } => write!(f, "Record {record} saved"),
            Self::Exported { rows } => write!(f, "Exported {rows} records"),
        }
    }
}

/// State of a single editing session.
#[derive(Debug, Default)]
pub struct Session {
    table: Option<Table>,
    editable: Vec<String>,
    cursor: usize,
    dirty: bool,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse `bytes` and replace the whole session state with the result.
    ///
    /// The cursor moves to the first record and the editable set is
    /// cleared. On failure nothing changes.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Parse`] for malformed input.
    pub fn load(&mut self, bytes: &[u8]) -> Result<Notice, SessionError> {
        let table = Table::from_csv_bytes(bytes)?;
        let notice = Notice::Loaded {
            rows: table.row_count(),
            columns: table.headers().len(),
        };
        self.cursor = usize::from(!table.is_empty());
        self.table = Some(table);
        self.editable.clear();
        self.dirty = false;
        info!(rows = self.row_count(), "table loaded");
        Ok(notice)
    }

    /// Whether a table has been loaded.
    pub const fn is_loaded(&self) -> bool {
        self.table.is_some()
    }

    pub const fn table(&self) -> Option<&Table> {
        self.table.as_ref()
    }

    /// Columns offered for selection: every column except the read-only ones.
    pub fn candidate_fields(&self) -> Vec<&str> {
        self.table.as_ref().map_or_else(Vec::new, |t| {
            t.headers()
                .iter()
                .map(String::as_str)
                .filter(|name| !is_read_only(name))
                .collect()
        })
    }

    /// The active editable set, in column order.
    pub fn editable_fields(&self) -> &[String] {
        &self.editable
    }

    pub fn is_editable(&self, name: &str) -> bool {
        self.editable.iter().any(|f| f == name)
    }

    /// Replace the active editable set.
    ///
    /// Duplicates are ignored and the stored order follows the table's
    /// column order.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::InvalidField`] if a name is not a loaded
    /// column or is read-only. The previous selection is kept.
    pub fn set_editable_fields<I, S>(&mut self, names: I) -> Result<(), SessionError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let requested: Vec<String> = names.into_iter().map(|n| n.as_ref().to_owned()).collect();
        for name in &requested {
            if is_read_only(name) {
                return Err(SessionError::invalid_field(name, FieldRejection::ReadOnly));
            }
            if !self.table.as_ref().is_some_and(|t| t.has_column(name)) {
                return Err(SessionError::invalid_field(
                    name,
                    FieldRejection::UnknownColumn,
                ));
            }
        }

        self.editable = self.table.as_ref().map_or_else(Vec::new, |t| {
            t.headers()
                .iter()
                .filter(|h| requested.contains(h))
                .cloned()
                .collect()
        });
        debug!(fields = ?self.editable, "editable fields selected");
        Ok(())
    }

    /// Current 1-based record index, `0` when there is no record.
    pub const fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn row_count(&self) -> usize {
        self.table.as_ref().map_or(0, Table::row_count)
    }

    /// The record under the cursor.
    pub fn current_record(&self) -> Option<Record<'_>> {
        let row = self.cursor.checked_sub(1)?;
        self.table.as_ref()?.record(row)
    }

    /// Move to the next record.
    ///
    /// Returns [`Notice::EndOfData`] (and leaves the cursor alone) when
    /// already on the last record.
    pub fn next(&mut self) -> Option<Notice> {
        if self.cursor < self.row_count() {
            self.cursor += 1;
            debug!(cursor = self.cursor, "moved to next record");
            None
        } else {
            debug!(cursor = self.cursor, "next at end of data");
            Some(Notice::EndOfData)
        }
    }

    /// Move to the previous record. Silent no-op on the first record.
    ///
    /// Returns whether the cursor moved.
    pub fn previous(&mut self) -> bool {
        if self.cursor > 1 {
            self.cursor -= 1;
            debug!(cursor = self.cursor, "moved to previous record");
            true
        } else {
            false
        }
    }

    /// Write edited values into the record under the cursor.
    ///
    /// Only fields in the active editable set are written; anything else in
    /// `values` is ignored, and an editable field missing from `values`
    /// keeps its cell. With an empty editable set this is a no-op that still
    /// confirms.
    pub fn submit<K, V>(&mut self, values: &HashMap<K, V>) -> Notice
    where
        K: Borrow<str> + Eq + Hash,
        V: AsRef<str>,
    {
        let record = self.cursor;
        let mut fields_written = 0;
        if let (Some(row), Some(table)) = (record.checked_sub(1), self.table.as_mut()) {
            for field in &self.editable {
                let Some(value) = values.get(field.as_str()) else {
                    continue;
                };
                let value = value.as_ref();
                if table.cell(row, field) != Some(value) {
                    self.dirty = true;
                }
                if table.set_cell(row, field, value) {
                    fields_written += 1;
                }
            }
        }
        info!(record, fields_written, "record submitted");
        Notice::Saved {
            record,
            fields_written,
        }
    }

    /// Whether any cell changed since the last load or export.
    pub const fn has_unexported_changes(&self) -> bool {
        self.dirty
    }

    /// Serialize the whole table in the load format.
    ///
    /// Returns empty bytes when nothing is loaded.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Export`] if the CSV writer fails.
    pub fn export(&self) -> Result<Vec<u8>, SessionError> {
        let Some(table) = &self.table else {
            return Ok(Vec::new());
        };
        table
            .to_csv_bytes()
            .map_err(|err| SessionError::export("<memory>", err))
    }

    /// Export the table to `path`.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Export`] if serializing or writing fails.
    pub fn export_to(&mut self, path: &Path) -> Result<Notice, SessionError> {
        let bytes = self.export()?;
        std::fs::write(path, bytes).map_err(|err| SessionError::export(path, err))?;
        self.dirty = false;
        info!(path = %path.display(), rows = self.row_count(), "table exported");
        Ok(Notice::Exported {
            rows: self.row_count(),
        })
    }
}
