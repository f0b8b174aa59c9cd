//! Preparation Configuration
//!
//! Values come from the built-in defaults, then an optional TOML file, then
//! `PREP_`-prefixed environment variables (`PREP_LABELS__PATH=labels.csv`).

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use config::{Config, Environment, File};
use feature_engine::{Modality, ModalityConfig};
use label_engine::{LabelSchema, RowRange};
use normalizer::ScalerKind;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Feature directory of one modality with optional layout overrides
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// Directory holding one file per sample
    pub dir: Option<PathBuf>,
    /// Overrides the modality's delimiter
    pub delimiter: Option<char>,
    /// Overrides the modality's metadata width
    pub columns_start: Option<usize>,
}

impl SourceConfig {
    /// Modality preset with any overrides applied
    pub fn layout(&self, modality: Modality) -> ModalityConfig {
        let preset = modality.config();
        ModalityConfig {
            delimiter: self.delimiter.unwrap_or(preset.delimiter),
            columns_start: self.columns_start.unwrap_or(preset.columns_start),
        }
    }
}

/// Label file location and layout
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LabelsConfig {
    /// Label file
    pub path: Option<PathBuf>,
    /// Column layout
    pub schema: LabelSchema,
}

/// Full preparation configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PrepConfig {
    pub audio: SourceConfig,
    pub visual: SourceConfig,
    pub labels: LabelsConfig,
    /// Label rows used for training
    pub train: RowRange,
    /// Label rows held out for prediction
    pub predict: RowRange,
    /// Scaler fitted per feature file and per label split
    pub scaler: ScalerKind,
}

impl Default for PrepConfig {
    fn default() -> Self {
        Self {
            audio: SourceConfig::default(),
            visual: SourceConfig::default(),
            labels: LabelsConfig::default(),
            train: RowRange::TRAIN,
            predict: RowRange::PREDICT,
            scaler: ScalerKind::default(),
        }
    }
}

impl PrepConfig {
    /// Load from an optional TOML file plus `PREP_*` environment overrides
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(File::from(path).required(true));
        }
        builder = builder.add_source(
            Environment::with_prefix("PREP")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder.build().context("reading configuration")?;
        let config: Self = settings
            .try_deserialize()
            .context("invalid configuration")?;

        debug!("Loaded configuration: {:?}", config);
        Ok(config)
    }

    /// Settings for one modality
    pub fn source(&self, modality: Modality) -> &SourceConfig {
        match modality {
            Modality::Audio => &self.audio,
            Modality::Visual => &self.visual,
        }
    }
}
