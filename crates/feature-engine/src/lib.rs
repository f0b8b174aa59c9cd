//! Feature Engineering Engine
//!
//! Turns a directory of per-sample feature files into scaled tables and a
//! single `(1, rows, features)` array for sequence models.

mod features;
mod modality;
mod reshape;
mod source;

pub use features::{
    prepare_x_data, select_features, FeatureSample, FeatureSet, FeatureSetBuilder, FeatureTable,
};
pub use modality::{Modality, ModalityConfig};
pub use reshape::{reshape_x, reshape_x_array};
pub use source::{FileList, FileSource, SortedDirectory};

use normalizer::ScalerError;
use std::path::PathBuf;
use tabular::TableError;
use thiserror::Error;

/// Errors during feature preparation
#[derive(Debug, Error)]
pub enum FeatureError {
    #[error("Failed to list feature files in {path}: {source}")]
    Listing {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: TableError,
    },
    #[error("Failed to scale {path}: {source}")]
    Scaler {
        path: PathBuf,
        #[source]
        source: ScalerError,
    },
    #[error("{path} has {actual} feature columns, expected {expected}")]
    ColumnMismatch {
        path: PathBuf,
        expected: usize,
        actual: usize,
    },
    #[error("Invalid feature shape: {0}")]
    Shape(String),
    #[error("Delimiter {0:?} is not a single ASCII character")]
    Delimiter(char),
}
