//! Label Preparation
//!
//! Extracts the YMRS score column for a row range, scales it, and provides
//! the inverse and reshape steps needed around model training.

mod labels;
mod schema;

pub use labels::{get_y_labels, labels_from_table, reshape_y, unscale_y, LabelVector};
pub use schema::{LabelSchema, RowRange};

use normalizer::ScalerError;
use std::path::PathBuf;
use tabular::TableError;
use thiserror::Error;

/// Errors during label preparation
#[derive(Debug, Error)]
pub enum LabelError {
    #[error("Failed to parse label file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: TableError,
    },
    #[error("Invalid label table: {0}")]
    Table(#[source] TableError),
    #[error("Label column '{0}' not found")]
    MissingColumn(String),
    #[error("Cannot drop column {index}: label file has {columns} columns")]
    DropIndex { index: usize, columns: usize },
    #[error("Row range {start}..{end} is invalid for label file with {rows} rows")]
    RowRange {
        start: usize,
        end: usize,
        rows: usize,
    },
    #[error("Scaler error: {0}")]
    Scaler(#[from] ScalerError),
    #[error("Invalid label shape: {0}")]
    Shape(String),
    #[error("Delimiter {0:?} is not a single ASCII character")]
    Delimiter(char),
}
