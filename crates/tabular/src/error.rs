//! Table Error Types

use std::path::PathBuf;
use thiserror::Error;

/// Errors while reading or slicing a delimited table
#[derive(Debug, Error)]
pub enum TableError {
    /// File could not be opened
    #[error("Failed to open {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Delimiter cannot be used as a single-byte separator
    #[error("Delimiter {0:?} is not a single ASCII character")]
    Delimiter(char),

    /// Text is not valid delimited data
    #[error("Malformed delimited text: {0}")]
    Csv(#[from] csv::Error),

    /// Row width differs from the header width
    #[error("Row {row}: expected {expected} cells, got {actual}")]
    Ragged {
        row: usize,
        expected: usize,
        actual: usize,
    },

    /// Cell could not be parsed as a number
    #[error("Row {row}, column '{column}': '{value}' is not a number")]
    NotNumeric {
        row: usize,
        column: String,
        value: String,
    },

    /// Named column is absent
    #[error("Column '{0}' not found")]
    MissingColumn(String),

    /// Positional column index is beyond the table width
    #[error("Column index {index} out of range for table with {columns} columns")]
    ColumnIndex { index: usize, columns: usize },

    /// Row range is empty or beyond the table length
    #[error("Row range {start}..{end} is invalid for table with {rows} rows")]
    RowRange {
        start: usize,
        end: usize,
        rows: usize,
    },
}
