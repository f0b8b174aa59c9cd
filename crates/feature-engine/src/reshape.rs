//! Model Input Reshaping

use ndarray::{Array3, ArrayViewD};
use tracing::debug;

use crate::{FeatureError, FeatureSet};

/// Stack every table of the set and fold it into `(1, total_rows, features)`.
///
/// The single leading axis is one batch holding all samples back to back.
pub fn reshape_x(set: &FeatureSet) -> Result<Array3<f64>, FeatureError> {
    let stacked = set.stack()?;
    reshape_x_array(stacked.view().into_dyn())
}

/// Fold an already-stacked array into `(1, N, F)`.
///
/// `N` is the input's leading dimension and `F` absorbs the remaining axes,
/// in row-major order.
pub fn reshape_x_array(data: ArrayViewD<'_, f64>) -> Result<Array3<f64>, FeatureError> {
    let leading = match data.shape().first() {
        Some(&n) if n > 0 => n,
        Some(_) => {
            return Err(FeatureError::Shape(format!(
                "cannot infer feature axis for input of shape {:?}",
                data.shape()
            )))
        }
        None => {
            return Err(FeatureError::Shape(
                "cannot reshape a zero-dimensional input".to_string(),
            ))
        }
    };
    let features = data.len() / leading;

    debug!(
        "Reshaping {:?} into (1, {}, {})",
        data.shape(),
        leading,
        features
    );

    Array3::from_shape_vec((1, leading, features), data.iter().copied().collect())
        .map_err(|e| FeatureError::Shape(e.to_string()))
}
