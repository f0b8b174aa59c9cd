//! Scaler Error Types

use thiserror::Error;

/// Errors while fitting or applying a scaler
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ScalerError {
    /// Nothing to fit on
    #[error("Cannot fit scaler on {rows} rows")]
    EmptyInput { rows: usize },

    /// Input width does not match the fitted parameters
    #[error("Scaler was fitted on {expected} features, input has {actual}")]
    FeatureMismatch { expected: usize, actual: usize },

    /// Min-max target range is empty or inverted
    #[error("Invalid feature range [{min}, {max}]")]
    InvalidRange { min: f64, max: f64 },
}
