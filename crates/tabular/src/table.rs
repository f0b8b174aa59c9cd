//! Rectangular Table of Raw Cells

use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::ReaderBuilder;
use ndarray::Array2;
use tracing::debug;

use crate::TableError;

/// Header row plus rectangular rows of raw string cells
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CsvTable {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

/// Byte form of a configured delimiter character
pub fn delimiter_byte(delimiter: char) -> Result<u8, TableError> {
    if delimiter.is_ascii() {
        Ok(delimiter as u8)
    } else {
        Err(TableError::Delimiter(delimiter))
    }
}

/// Read a delimited file whose first row is the header
pub fn read_delimited(path: &Path, delimiter: u8) -> Result<CsvTable, TableError> {
    let file = File::open(path).map_err(|source| TableError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let table = CsvTable::from_reader(file, delimiter)?;
    debug!(
        "Read {}: {} rows x {} columns",
        path.display(),
        table.n_rows(),
        table.n_columns()
    );
    Ok(table)
}

impl CsvTable {
    /// Create a table, checking every row against the header width
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Result<Self, TableError> {
        if let Some((row, cells)) = rows
            .iter()
            .enumerate()
            .find(|(_, cells)| cells.len() != headers.len())
        {
            return Err(TableError::Ragged {
                row,
                expected: headers.len(),
                actual: cells.len(),
            });
        }
        Ok(Self { headers, rows })
    }

    /// Parse delimited text from any reader; the first record is the header
    pub fn from_reader<R: Read>(reader: R, delimiter: u8) -> Result<Self, TableError> {
        let mut reader = ReaderBuilder::new()
            .delimiter(delimiter)
            .has_headers(true)
            .from_reader(reader);

        let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record?;
            rows.push(record.iter().map(str::to_string).collect());
        }

        Self::new(headers, rows)
    }

    /// Column names
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Raw cells, row-major
    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    /// Number of data rows (header excluded)
    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    /// Number of columns
    pub fn n_columns(&self) -> usize {
        self.headers.len()
    }

    /// Keep only the columns at or after `start`.
    ///
    /// A `start` at or past the width yields a zero-column table with the
    /// same number of rows.
    pub fn select_columns_from(&self, start: usize) -> Self {
        let start = start.min(self.n_columns());
        Self {
            headers: self.headers[start..].to_vec(),
            rows: self.rows.iter().map(|row| row[start..].to_vec()).collect(),
        }
    }

    /// Remove the columns at the given positions
    pub fn drop_columns(&self, indices: &[usize]) -> Result<Self, TableError> {
        let columns = self.n_columns();
        if let Some(&index) = indices.iter().find(|&&i| i >= columns) {
            return Err(TableError::ColumnIndex { index, columns });
        }

        let keep: Vec<usize> = (0..columns).filter(|i| !indices.contains(i)).collect();
        let pick = |cells: &[String]| -> Vec<String> {
            keep.iter().map(|&i| cells[i].clone()).collect()
        };

        Ok(Self {
            headers: pick(&self.headers),
            rows: self.rows.iter().map(|row| pick(row)).collect(),
        })
    }

    /// Rows `[start, end)`, renumbered from zero.
    ///
    /// Out-of-bounds ranges are rejected rather than truncated.
    pub fn slice_rows(&self, start: usize, end: usize) -> Result<Self, TableError> {
        if start >= end || end > self.n_rows() {
            return Err(TableError::RowRange {
                start,
                end,
                rows: self.n_rows(),
            });
        }
        Ok(Self {
            headers: self.headers.clone(),
            rows: self.rows[start..end].to_vec(),
        })
    }

    /// Position of the first column with the given name
    pub fn column_index(&self, name: &str) -> Result<usize, TableError> {
        self.headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| TableError::MissingColumn(name.to_string()))
    }

    /// Numeric values of a named column
    pub fn column_f64(&self, name: &str) -> Result<Vec<f64>, TableError> {
        let col = self.column_index(name)?;
        self.rows
            .iter()
            .enumerate()
            .map(|(row, cells)| parse_cell(&cells[col], row, name))
            .collect()
    }

    /// All cells as a `(rows, columns)` matrix
    pub fn to_array(&self) -> Result<Array2<f64>, TableError> {
        let mut values = Array2::zeros((self.n_rows(), self.n_columns()));
        for ((row, col), value) in values.indexed_iter_mut() {
            *value = parse_cell(&self.rows[row][col], row, &self.headers[col])?;
        }
        Ok(values)
    }
}

/// Empty cells are missing values and read as NaN
fn parse_cell(cell: &str, row: usize, column: &str) -> Result<f64, TableError> {
    let trimmed = cell.trim();
    if trimmed.is_empty() {
        return Ok(f64::NAN);
    }
    trimmed.parse::<f64>().map_err(|_| TableError::NotNumeric {
        row,
        column: column.to_string(),
        value: cell.to_string(),
    })
}
