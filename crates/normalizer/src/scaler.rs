//! Column-wise Scalers

use std::cmp::Ordering;

use ndarray::{Array2, ArrayView2, Axis};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::ScalerError;

/// Normalization method
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum ScalerKind {
    /// Min-max normalization onto `feature_range` (default `[0, 1]`)
    MinMax {
        #[serde(default = "unit_range")]
        feature_range: (f64, f64),
    },
    /// Z-score normalization (population standard deviation)
    Standard,
}

fn unit_range() -> (f64, f64) {
    (0.0, 1.0)
}

impl Default for ScalerKind {
    fn default() -> Self {
        Self::min_max()
    }
}

impl ScalerKind {
    /// Min-max onto `[0, 1]`
    pub fn min_max() -> Self {
        Self::MinMax {
            feature_range: unit_range(),
        }
    }

    /// Fit per-column parameters on `data` (rows are samples).
    ///
    /// NaN cells are ignored. Constant columns get a unit spread so they map
    /// to the lower bound (min-max) or zero (z-score) instead of dividing by
    /// zero.
    pub fn fit(&self, data: ArrayView2<'_, f64>) -> Result<FittedScaler, ScalerError> {
        let (rows, columns) = data.dim();
        if rows == 0 {
            return Err(ScalerError::EmptyInput { rows });
        }
        if let Self::MinMax {
            feature_range: (min, max),
        } = *self
        {
            if min.partial_cmp(&max) != Some(Ordering::Less) {
                return Err(ScalerError::InvalidRange { min, max });
            }
        }

        let mut center = Vec::with_capacity(columns);
        let mut spread = Vec::with_capacity(columns);

        for (i, col) in data.axis_iter(Axis(1)).enumerate() {
            let observed: Vec<f64> = col.iter().copied().filter(|v| !v.is_nan()).collect();
            if observed.is_empty() {
                warn!("Column {} has no observed values; leaving it unscaled", i);
                center.push(0.0);
                spread.push(1.0);
                continue;
            }

            let (c, s) = match self {
                Self::MinMax { .. } => {
                    let lo = observed.iter().copied().fold(f64::INFINITY, f64::min);
                    let hi = observed.iter().copied().fold(f64::NEG_INFINITY, f64::max);
                    (lo, hi - lo)
                }
                Self::Standard => {
                    let n = observed.len() as f64;
                    let mean = observed.iter().sum::<f64>() / n;
                    let variance = observed.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
                    (mean, variance.sqrt())
                }
            };

            if s == 0.0 {
                debug!("Column {} is constant", i);
            }
            center.push(c);
            spread.push(if s == 0.0 { 1.0 } else { s });
        }

        debug!("Fitted {:?} scaler on {} rows x {} columns", self, rows, columns);

        Ok(FittedScaler {
            kind: *self,
            center,
            spread,
            n_samples_seen: rows,
        })
    }

    /// Fit on `data` and return the transformed copy with its parameters
    pub fn fit_transform(
        &self,
        data: ArrayView2<'_, f64>,
    ) -> Result<(Array2<f64>, FittedScaler), ScalerError> {
        let fitted = self.fit(data)?;
        let scaled = fitted.transform(data)?;
        Ok((scaled, fitted))
    }
}

/// Parameters produced by one fit.
///
/// Each column is mapped as `(x - center) / spread * width + low`, where
/// `low` and `width` come from the target range (`0` and `1` for z-score).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FittedScaler {
    kind: ScalerKind,
    center: Vec<f64>,
    spread: Vec<f64>,
    n_samples_seen: usize,
}

impl FittedScaler {
    /// Method this scaler was fitted with
    pub fn kind(&self) -> ScalerKind {
        self.kind
    }

    /// Per-column minimum (min-max) or mean (z-score)
    pub fn center(&self) -> &[f64] {
        &self.center
    }

    /// Per-column range (min-max) or standard deviation (z-score)
    pub fn spread(&self) -> &[f64] {
        &self.spread
    }

    /// Number of columns fitted
    pub fn n_features(&self) -> usize {
        self.center.len()
    }

    /// Number of rows the fit saw
    pub fn n_samples_seen(&self) -> usize {
        self.n_samples_seen
    }

    fn target(&self) -> (f64, f64) {
        match self.kind {
            ScalerKind::MinMax {
                feature_range: (min, max),
            } => (min, max - min),
            ScalerKind::Standard => (0.0, 1.0),
        }
    }

    fn check_width(&self, data: &ArrayView2<'_, f64>) -> Result<(), ScalerError> {
        if data.ncols() != self.n_features() {
            return Err(ScalerError::FeatureMismatch {
                expected: self.n_features(),
                actual: data.ncols(),
            });
        }
        Ok(())
    }

    /// Scale `data` with the fitted parameters
    pub fn transform(&self, data: ArrayView2<'_, f64>) -> Result<Array2<f64>, ScalerError> {
        self.check_width(&data)?;
        let (low, width) = self.target();

        let mut result = data.to_owned();
        for (i, mut col) in result.axis_iter_mut(Axis(1)).enumerate() {
            let (c, s) = (self.center[i], self.spread[i]);
            col.mapv_inplace(|v| (v - c) / s * width + low);
        }
        Ok(result)
    }

    /// Map scaled values back to the original units
    pub fn inverse_transform(&self, data: ArrayView2<'_, f64>) -> Result<Array2<f64>, ScalerError> {
        self.check_width(&data)?;
        let (low, width) = self.target();

        let mut result = data.to_owned();
        for (i, mut col) in result.axis_iter_mut(Axis(1)).enumerate() {
            let (c, s) = (self.center[i], self.spread[i]);
            col.mapv_inplace(|v| (v - low) / width * s + c);
        }
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{array, Array2};
    use proptest::prelude::*;

    #[test]
    fn test_minmax_normalization() {
        let data = array![[0.0, 10.0], [50.0, 20.0], [100.0, 30.0]];
        let (scaled, fitted) = ScalerKind::min_max().fit_transform(data.view()).unwrap();

        assert_eq!(fitted.center(), &[0.0, 10.0]);
        assert_eq!(fitted.spread(), &[100.0, 20.0]);
        assert!((scaled[[1, 0]] - 0.5).abs() < 1e-12);
        assert!((scaled[[2, 1]] - 1.0).abs() < 1e-12);
        assert!((scaled[[0, 1]]).abs() < 1e-12);
    }

    #[test]
    fn test_minmax_custom_range() {
        let kind = ScalerKind::MinMax {
            feature_range: (-1.0, 1.0),
        };
        let data = array![[2.0], [4.0], [6.0]];
        let (scaled, _) = kind.fit_transform(data.view()).unwrap();
        assert_eq!(scaled, array![[-1.0], [0.0], [1.0]]);
    }

    #[test]
    fn test_zscore_normalization() {
        let data = array![[2.0], [4.0], [4.0], [4.0], [5.0], [5.0], [7.0], [9.0]];
        let (scaled, fitted) = ScalerKind::Standard.fit_transform(data.view()).unwrap();

        assert!((fitted.center()[0] - 5.0).abs() < 1e-12);
        assert!((fitted.spread()[0] - 2.0).abs() < 1e-12);
        let mean = scaled.sum() / scaled.len() as f64;
        assert!(mean.abs() < 1e-12);
        assert!((scaled[[7, 0]] - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_constant_column() {
        let data = array![[3.0, 1.0], [3.0, 2.0]];
        let (scaled, fitted) = ScalerKind::min_max().fit_transform(data.view()).unwrap();
        assert_eq!(fitted.spread()[0], 1.0);
        assert_eq!(scaled.column(0).to_vec(), vec![0.0, 0.0]);

        let (scaled, _) = ScalerKind::Standard.fit_transform(data.view()).unwrap();
        assert_eq!(scaled.column(0).to_vec(), vec![0.0, 0.0]);
    }

    #[test]
    fn test_nan_cells_are_ignored_by_fit() {
        let data = array![[0.0], [f64::NAN], [10.0]];
        let (scaled, fitted) = ScalerKind::min_max().fit_transform(data.view()).unwrap();
        assert_eq!(fitted.spread(), &[10.0]);
        assert!(scaled[[1, 0]].is_nan());
        assert_eq!(scaled[[2, 0]], 1.0);
    }

    #[test]
    fn test_fit_errors() {
        let empty = Array2::<f64>::zeros((0, 3));
        assert_eq!(
            ScalerKind::min_max().fit(empty.view()),
            Err(ScalerError::EmptyInput { rows: 0 })
        );

        let inverted = ScalerKind::MinMax {
            feature_range: (1.0, 0.0),
        };
        assert!(matches!(
            inverted.fit(array![[1.0]].view()),
            Err(ScalerError::InvalidRange { .. })
        ));

        let undefined = ScalerKind::MinMax {
            feature_range: (f64::NAN, 1.0),
        };
        assert!(matches!(
            undefined.fit(array![[1.0]].view()),
            Err(ScalerError::InvalidRange { .. })
        ));
    }

    #[test]
    fn test_zero_column_fit() {
        let data = Array2::<f64>::zeros((4, 0));
        let (scaled, fitted) = ScalerKind::min_max().fit_transform(data.view()).unwrap();
        assert_eq!(fitted.n_features(), 0);
        assert_eq!(scaled.dim(), (4, 0));
    }

    #[test]
    fn test_inverse_requires_matching_width() {
        let fitted = ScalerKind::min_max().fit(array![[1.0], [2.0]].view()).unwrap();
        let err = fitted.inverse_transform(array![[0.5, 0.5]].view()).unwrap_err();
        assert_eq!(err, ScalerError::FeatureMismatch { expected: 1, actual: 2 });
    }

    #[test]
    fn test_refit_does_not_touch_previous_parameters() {
        let kind = ScalerKind::min_max();
        let first = kind.fit(array![[0.0], [10.0]].view()).unwrap();
        let second = kind.fit(array![[100.0], [300.0]].view()).unwrap();

        assert_eq!(first.center(), &[0.0]);
        assert_eq!(second.center(), &[100.0]);
        let restored = first.inverse_transform(array![[0.5]].view()).unwrap();
        assert_eq!(restored[[0, 0]], 5.0);
    }

    #[test]
    fn test_kind_from_config_text() {
        let kind: ScalerKind = serde_json::from_str(r#"{"method":"min_max"}"#).unwrap();
        assert_eq!(kind, ScalerKind::min_max());
        let kind: ScalerKind = serde_json::from_str(r#"{"method":"standard"}"#).unwrap();
        assert_eq!(kind, ScalerKind::Standard);
    }

    fn arb_column() -> impl Strategy<Value = Vec<f64>> {
        prop::collection::vec(-1.0e6f64..1.0e6, 1..64)
    }

    proptest! {
        #[test]
        fn prop_inverse_restores_values(values in arb_column(), standard in any::<bool>()) {
            let kind = if standard { ScalerKind::Standard } else { ScalerKind::min_max() };
            let data = Array2::from_shape_vec((values.len(), 1), values.clone()).unwrap();

            let (scaled, fitted) = kind.fit_transform(data.view()).unwrap();
            let restored = fitted.inverse_transform(scaled.view()).unwrap();

            let magnitude = values.iter().fold(1.0f64, |m, v| m.max(v.abs()));
            for (orig, back) in values.iter().zip(restored.iter()) {
                prop_assert!((orig - back).abs() <= 1e-9 * magnitude,
                    "{} restored as {}", orig, back);
            }
        }

        #[test]
        fn prop_minmax_stays_in_range(values in arb_column()) {
            let data = Array2::from_shape_vec((values.len(), 1), values).unwrap();
            let (scaled, _) = ScalerKind::min_max().fit_transform(data.view()).unwrap();
            for v in scaled.iter() {
                prop_assert!(*v >= -1e-12 && *v <= 1.0 + 1e-12);
            }
        }
    }
}
