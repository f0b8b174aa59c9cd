//! Feature Set Assembly

use std::path::{Path, PathBuf};

use ndarray::{concatenate, Array2, ArrayView2, Axis};
use normalizer::{FittedScaler, ScalerKind};
use tabular::{delimiter_byte, read_delimited, CsvTable};
use tracing::{debug, info, warn};

use crate::source::{FileSource, SortedDirectory};
use crate::{FeatureError, ModalityConfig};

/// Keep only the columns at or after `columns_start`.
///
/// Audio files carry 2 leading metadata columns, visual files 5. An offset
/// at or past the width gives a zero-column table, not an error.
pub fn select_features(table: &CsvTable, columns_start: usize) -> CsvTable {
    if columns_start >= table.n_columns() {
        warn!(
            "Feature offset {} leaves no columns out of {}",
            columns_start,
            table.n_columns()
        );
    }
    table.select_columns_from(columns_start)
}

/// Numeric feature matrix for one sample
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureTable {
    /// Feature column names
    pub columns: Vec<String>,
    /// Values, one row per observation
    pub values: Array2<f64>,
}

impl FeatureTable {
    /// Number of observations
    pub fn n_rows(&self) -> usize {
        self.values.nrows()
    }

    /// Number of feature columns
    pub fn n_features(&self) -> usize {
        self.values.ncols()
    }
}

/// One loaded feature file
#[derive(Debug, Clone)]
pub struct FeatureSample {
    /// File the table was read from
    pub source: PathBuf,
    /// Scaled feature values
    pub table: FeatureTable,
    /// Parameters fitted on this file alone
    pub scaler: FittedScaler,
}

/// Ordered collection of scaled feature tables for one modality
#[derive(Debug, Clone, Default)]
pub struct FeatureSet {
    samples: Vec<FeatureSample>,
}

impl FeatureSet {
    /// Append a sample, enforcing a common feature width
    pub fn push(&mut self, sample: FeatureSample) -> Result<(), FeatureError> {
        if let Some(expected) = self.n_features() {
            let actual = sample.table.n_features();
            if actual != expected {
                return Err(FeatureError::ColumnMismatch {
                    path: sample.source,
                    expected,
                    actual,
                });
            }
        }
        self.samples.push(sample);
        Ok(())
    }

    /// Loaded samples in collection order
    pub fn samples(&self) -> &[FeatureSample] {
        &self.samples
    }

    /// Scaled tables in collection order
    pub fn tables(&self) -> impl Iterator<Item = &FeatureTable> {
        self.samples.iter().map(|s| &s.table)
    }

    /// Number of samples
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Whether nothing was collected
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Common feature width, `None` when empty
    pub fn n_features(&self) -> Option<usize> {
        self.samples.first().map(|s| s.table.n_features())
    }

    /// Observations across all samples
    pub fn total_rows(&self) -> usize {
        self.tables().map(FeatureTable::n_rows).sum()
    }

    /// All tables stacked vertically into `(total_rows, features)`
    pub fn stack(&self) -> Result<Array2<f64>, FeatureError> {
        if self.is_empty() {
            return Err(FeatureError::Shape("no feature tables to stack".to_string()));
        }
        let views: Vec<ArrayView2<'_, f64>> = self.tables().map(|t| t.values.view()).collect();
        concatenate(Axis(0), &views).map_err(|e| FeatureError::Shape(e.to_string()))
    }
}

/// Builds a [`FeatureSet`] from a directory of per-sample files
pub struct FeatureSetBuilder {
    /// File layout
    modality: ModalityConfig,
    /// Scaler fitted per file
    scaler: ScalerKind,
    /// Directory listing
    source: Box<dyn FileSource>,
}

impl FeatureSetBuilder {
    /// Create a builder that lists directories in file-name order
    pub fn new(modality: ModalityConfig, scaler: ScalerKind) -> Self {
        info!(
            "Creating feature set builder: delimiter={:?}, columns_start={}, scaler={:?}",
            modality.delimiter, modality.columns_start, scaler
        );
        Self {
            modality,
            scaler,
            source: Box::new(SortedDirectory),
        }
    }

    /// Replace the directory listing
    pub fn with_source(mut self, source: impl FileSource + 'static) -> Self {
        self.source = Box::new(source);
        self
    }

    /// Load, select, and scale every file the source lists for `dir`.
    ///
    /// Stops at the first file that fails to parse, scale, or match the
    /// feature width of the files before it.
    pub fn build(&self, dir: &Path) -> Result<FeatureSet, FeatureError> {
        let delimiter = delimiter_byte(self.modality.delimiter)
            .map_err(|_| FeatureError::Delimiter(self.modality.delimiter))?;
        let files = self.source.list(dir).map_err(|source| FeatureError::Listing {
            path: dir.to_path_buf(),
            source,
        })?;

        debug!("Found {} feature files in {}", files.len(), dir.display());

        let mut set = FeatureSet::default();
        for path in files {
            let sample = self.load_file(path, delimiter)?;
            set.push(sample)?;
        }

        info!(
            "Built feature set from {}: {} files, {} rows, {:?} features",
            dir.display(),
            set.len(),
            set.total_rows(),
            set.n_features()
        );
        Ok(set)
    }

    fn load_file(&self, path: PathBuf, delimiter: u8) -> Result<FeatureSample, FeatureError> {
        let parsed = |source| FeatureError::Parse {
            path: path.clone(),
            source,
        };

        let raw = read_delimited(&path, delimiter).map_err(parsed)?;
        let selected = select_features(&raw, self.modality.columns_start);
        let values = selected.to_array().map_err(parsed)?;

        let (scaled, scaler) =
            self.scaler
                .fit_transform(values.view())
                .map_err(|source| FeatureError::Scaler {
                    path: path.clone(),
                    source,
                })?;

        debug!(
            "Loaded {}: {} rows x {} features",
            path.display(),
            scaled.nrows(),
            scaled.ncols()
        );

        Ok(FeatureSample {
            source: path,
            table: FeatureTable {
                columns: selected.headers().to_vec(),
                values: scaled,
            },
            scaler,
        })
    }
}

/// Build a feature set from `dir` with files taken in file-name order
pub fn prepare_x_data(
    dir: &Path,
    delimiter: char,
    columns_start: usize,
    scaler: ScalerKind,
) -> Result<FeatureSet, FeatureError> {
    let modality = ModalityConfig {
        delimiter,
        columns_start,
    };
    FeatureSetBuilder::new(modality, scaler).build(dir)
}
