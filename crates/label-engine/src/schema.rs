//! Label File Layout

use serde::{Deserialize, Serialize};

/// Column layout of the label file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LabelSchema {
    /// Field separator
    pub delimiter: char,
    /// Positional columns removed before the label is looked up
    pub drop_columns: Vec<usize>,
    /// Name of the score column
    pub label_column: String,
}

impl Default for LabelSchema {
    fn default() -> Self {
        Self {
            delimiter: ',',
            drop_columns: vec![1, 2, 3, 6],
            label_column: "Total_YMRS".to_string(),
        }
    }
}

/// Half-open row range `[start, end)` of the label file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowRange {
    pub start: usize,
    pub end: usize,
}

impl RowRange {
    /// Rows used for training
    pub const TRAIN: Self = Self { start: 0, end: 60 };
    /// Rows held out for prediction
    pub const PREDICT: Self = Self {
        start: 60,
        end: 164,
    };

    /// Rows `[start, end)`; bounds are checked when the range is applied
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Number of rows covered, zero if inverted
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// True when the range covers no rows
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
