//! Data Normalization
//!
//! Column-wise scaling for feature and label matrices. A [`ScalerKind`] is
//! configuration only; every fit returns a new [`FittedScaler`] holding the
//! parameters needed to transform and invert.

mod error;
mod scaler;

pub use error::ScalerError;
pub use scaler::{FittedScaler, ScalerKind};
