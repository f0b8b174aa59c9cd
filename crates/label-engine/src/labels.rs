//! Label Extraction and Reshaping

use std::path::Path;

use ndarray::{Array2, Array3, ArrayBase, ArrayView2, Data, Dimension};
use normalizer::{FittedScaler, ScalerKind};
use tabular::{delimiter_byte, read_delimited, CsvTable, TableError};
use tracing::{debug, info};

use crate::{LabelError, LabelSchema};

/// Scaled label column and the parameters that produced it
#[derive(Debug, Clone)]
pub struct LabelVector {
    /// Scaled scores, shape `(rows, 1)`
    pub values: Array2<f64>,
    /// Fit used for `values`; required to recover raw scores
    pub scaler: FittedScaler,
}

impl LabelVector {
    /// Number of labels
    pub fn len(&self) -> usize {
        self.values.nrows()
    }

    /// True when no rows were selected
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Scores in original units
    pub fn unscaled(&self) -> Result<Array2<f64>, LabelError> {
        unscale_y(self.values.view(), &self.scaler)
    }
}

/// Read the label file and return rows `[start, end)` of the label column,
/// scaled with a fresh fit.
///
/// The schema's positional columns are dropped before the label column is
/// looked up by name, so a label sitting at a dropped position is missing.
pub fn get_y_labels(
    path: &Path,
    start: usize,
    end: usize,
    scaler: &ScalerKind,
    schema: &LabelSchema,
) -> Result<LabelVector, LabelError> {
    let delimiter =
        delimiter_byte(schema.delimiter).map_err(|_| LabelError::Delimiter(schema.delimiter))?;
    let table = read_delimited(path, delimiter).map_err(|source| LabelError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    let labels = labels_from_table(&table, start, end, scaler, schema).map_err(|e| match e {
        LabelError::Table(source) => LabelError::Parse {
            path: path.to_path_buf(),
            source,
        },
        other => other,
    })?;

    info!(
        "Extracted {} '{}' labels from {} (rows {}..{})",
        labels.len(),
        schema.label_column,
        path.display(),
        start,
        end
    );
    Ok(labels)
}

/// [`get_y_labels`] over an already-parsed table
pub fn labels_from_table(
    table: &CsvTable,
    start: usize,
    end: usize,
    scaler: &ScalerKind,
    schema: &LabelSchema,
) -> Result<LabelVector, LabelError> {
    let kept = table.drop_columns(&schema.drop_columns).map_err(table_error)?;
    let rows = kept.slice_rows(start, end).map_err(table_error)?;
    let raw = rows.column_f64(&schema.label_column).map_err(table_error)?;

    let column = Array2::from_shape_vec((raw.len(), 1), raw)
        .map_err(|e| LabelError::Shape(e.to_string()))?;
    let (values, scaler) = scaler.fit_transform(column.view())?;

    debug!(
        "Label scaler fitted: center={:?}, spread={:?}",
        scaler.center(),
        scaler.spread()
    );

    Ok(LabelVector { values, scaler })
}

fn table_error(err: TableError) -> LabelError {
    match err {
        TableError::MissingColumn(name) => LabelError::MissingColumn(name),
        TableError::ColumnIndex { index, columns } => LabelError::DropIndex { index, columns },
        TableError::RowRange { start, end, rows } => LabelError::RowRange { start, end, rows },
        source => LabelError::Table(source),
    }
}

/// Map scaled labels back to raw scores with the scaler that produced them
pub fn unscale_y(
    scaled: ArrayView2<'_, f64>,
    scaler: &FittedScaler,
) -> Result<Array2<f64>, LabelError> {
    Ok(scaler.inverse_transform(scaled)?)
}

/// Row-major reshape into `(n_samples, timesteps, features)`.
///
/// The product of the three sizes must equal the number of labels.
pub fn reshape_y<S, D>(
    labels: &ArrayBase<S, D>,
    n_samples: usize,
    timesteps: usize,
    features: usize,
) -> Result<Array3<f64>, LabelError>
where
    S: Data<Elem = f64>,
    D: Dimension,
{
    let target = n_samples
        .checked_mul(timesteps)
        .and_then(|n| n.checked_mul(features));
    if target != Some(labels.len()) {
        return Err(LabelError::Shape(format!(
            "cannot reshape {} labels into ({}, {}, {})",
            labels.len(),
            n_samples,
            timesteps,
            features
        )));
    }

    Array3::from_shape_vec(
        (n_samples, timesteps, features),
        labels.iter().copied().collect(),
    )
    .map_err(|e| LabelError::Shape(e.to_string()))
}
