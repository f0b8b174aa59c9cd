//! Modality Presets

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Measurement type of a feature directory
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Modality {
    /// Acoustic descriptors, `;`-delimited, name and frame time leading
    Audio,
    /// Facial action descriptors, `,`-delimited, five bookkeeping columns leading
    Visual,
}

impl Modality {
    /// File layout for this modality
    pub fn config(self) -> ModalityConfig {
        match self {
            Self::Audio => ModalityConfig::audio(),
            Self::Visual => ModalityConfig::visual(),
        }
    }
}

impl fmt::Display for Modality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Audio => write!(f, "audio"),
            Self::Visual => write!(f, "visual"),
        }
    }
}

impl FromStr for Modality {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "audio" => Ok(Self::Audio),
            "visual" | "video" => Ok(Self::Visual),
            other => Err(format!("unknown modality '{other}' (expected audio or visual)")),
        }
    }
}

/// Layout of the feature files of one modality
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModalityConfig {
    /// Field separator
    pub delimiter: char,
    /// Number of leading metadata columns to drop
    pub columns_start: usize,
}

impl ModalityConfig {
    /// `;`-separated, first 2 columns are metadata
    pub fn audio() -> Self {
        Self {
            delimiter: ';',
            columns_start: 2,
        }
    }

    /// `,`-separated, first 5 columns are metadata
    pub fn visual() -> Self {
        Self {
            delimiter: ',',
            columns_start: 5,
        }
    }
}
