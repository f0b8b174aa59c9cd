//! Straight-line Preparation Runs

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use feature_engine::{reshape_x, FeatureSetBuilder, Modality};
use label_engine::{get_y_labels, reshape_y, RowRange};
use ndarray::Array2;
use serde::Serialize;
use tracing::info;

use crate::PrepConfig;

/// Shape of one loaded feature file
#[derive(Debug, Clone, Serialize)]
pub struct FileSummary {
    pub path: PathBuf,
    pub rows: usize,
    pub features: usize,
}

/// Result of preparing one modality
#[derive(Debug, Clone, Serialize)]
pub struct FeatureSummary {
    pub modality: Modality,
    pub dir: PathBuf,
    pub files: Vec<FileSummary>,
    /// Shape of the model input array
    pub reshaped: [usize; 3],
}

/// Result of preparing one label split
#[derive(Debug, Clone, Serialize)]
pub struct LabelSummary {
    pub path: PathBuf,
    pub range: RowRange,
    pub rows: usize,
    pub scaled_min: f64,
    pub scaled_max: f64,
    /// Smallest score after inverting the scaler
    pub raw_min: f64,
    /// Largest score after inverting the scaler
    pub raw_max: f64,
    /// Shape of the model target array
    pub reshaped: [usize; 3],
}

/// Result of a full run
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub audio: FeatureSummary,
    pub visual: FeatureSummary,
    pub train: LabelSummary,
    pub predict: LabelSummary,
}

/// Build, scale, and reshape the feature files of one modality
pub fn prepare_features(
    config: &PrepConfig,
    modality: Modality,
    dir: &Path,
) -> Result<FeatureSummary> {
    let layout = config.source(modality).layout(modality);
    let set = FeatureSetBuilder::new(layout, config.scaler)
        .build(dir)
        .with_context(|| format!("preparing {modality} features from {}", dir.display()))?;
    let shaped = reshape_x(&set).with_context(|| format!("reshaping {modality} features"))?;

    let files = set
        .samples()
        .iter()
        .map(|s| FileSummary {
            path: s.source.clone(),
            rows: s.table.n_rows(),
            features: s.table.n_features(),
        })
        .collect();

    let (batch, steps, features) = shaped.dim();
    Ok(FeatureSummary {
        modality,
        dir: dir.to_path_buf(),
        files,
        reshaped: [batch, steps, features],
    })
}

/// Extract, scale, and reshape one split of the label file into `(rows, 1, 1)`
pub fn prepare_labels(config: &PrepConfig, path: &Path, range: RowRange) -> Result<LabelSummary> {
    let labels = get_y_labels(
        path,
        range.start,
        range.end,
        &config.scaler,
        &config.labels.schema,
    )
    .with_context(|| format!("extracting labels {}..{}", range.start, range.end))?;

    let raw = labels.unscaled().context("unscaling labels")?;
    let shaped = reshape_y(&labels.values, labels.len(), 1, 1).context("reshaping labels")?;

    let (scaled_min, scaled_max) = min_max(&labels.values);
    let (raw_min, raw_max) = min_max(&raw);
    let (n, t, f) = shaped.dim();

    Ok(LabelSummary {
        path: path.to_path_buf(),
        range,
        rows: labels.len(),
        scaled_min,
        scaled_max,
        raw_min,
        raw_max,
        reshaped: [n, t, f],
    })
}

fn min_max(values: &Array2<f64>) -> (f64, f64) {
    values
        .iter()
        .filter(|v| !v.is_nan())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        })
}

/// Both modalities, then the train and prediction label splits
pub fn run_all(config: &PrepConfig) -> Result<RunSummary> {
    let audio_dir = config
        .audio
        .dir
        .as_deref()
        .context("audio.dir is not configured")?;
    let visual_dir = config
        .visual
        .dir
        .as_deref()
        .context("visual.dir is not configured")?;
    let labels_path = config
        .labels
        .path
        .as_deref()
        .context("labels.path is not configured")?;

    let audio = prepare_features(config, Modality::Audio, audio_dir)?;
    let visual = prepare_features(config, Modality::Visual, visual_dir)?;
    let train = prepare_labels(config, labels_path, config.train)?;
    let predict = prepare_labels(config, labels_path, config.predict)?;

    info!(
        "Preparation finished: audio {:?}, visual {:?}, train {:?}, predict {:?}",
        audio.reshaped, visual.reshaped, train.reshaped, predict.reshaped
    );

    Ok(RunSummary {
        audio,
        visual,
        train,
        predict,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fmt::Write as _;
    use std::fs;

    fn write_feature_dirs(root: &Path) -> (PathBuf, PathBuf) {
        let audio = root.join("audio");
        let visual = root.join("visual");
        fs::create_dir(&audio).unwrap();
        fs::create_dir(&visual).unwrap();

        for s in 0..3 {
            let mut text = String::from("name;frameTime;pcm;mfcc1;mfcc2\n");
            for r in 0..10 {
                writeln!(text, "'unknown';{r};{};{};{}", r + s, r * 2, r * 3).unwrap();
            }
            fs::write(audio.join(format!("subject_{s}.csv")), text).unwrap();

            let mut text = String::from("frame,face_id,timestamp,confidence,success,AU01_r\n");
            for r in 0..4 {
                writeln!(text, "{r},0,{r},0.9,1,{}", r + s).unwrap();
            }
            fs::write(visual.join(format!("subject_{s}.csv")), text).unwrap();
        }
        (audio, visual)
    }

    fn write_labels(root: &Path, rows: usize) -> PathBuf {
        let mut text = String::from("id,a,b,c,Total_YMRS,d,e\n");
        for r in 0..rows {
            writeln!(text, "{r},x,y,z,{},0,w", r % 40).unwrap();
        }
        let path = root.join("labels.csv");
        fs::write(&path, text).unwrap();
        path
    }

    #[test]
    fn test_prepare_features() {
        let root = tempfile::tempdir().unwrap();
        let (audio, _) = write_feature_dirs(root.path());

        let summary = prepare_features(&PrepConfig::default(), Modality::Audio, &audio).unwrap();
        assert_eq!(summary.files.len(), 3);
        assert!(summary.files.iter().all(|f| f.rows == 10 && f.features == 3));
        assert_eq!(summary.reshaped, [1, 30, 3]);
    }

    #[test]
    fn test_prepare_labels() {
        let root = tempfile::tempdir().unwrap();
        let labels = write_labels(root.path(), 164);

        let summary = prepare_labels(&PrepConfig::default(), &labels, RowRange::TRAIN).unwrap();
        assert_eq!(summary.rows, 60);
        assert_eq!(summary.reshaped, [60, 1, 1]);
        assert_eq!((summary.scaled_min, summary.scaled_max), (0.0, 1.0));
        assert!((summary.raw_max - 39.0).abs() < 1e-9);
    }

    #[test]
    fn test_run_all() {
        let root = tempfile::tempdir().unwrap();
        let (audio, visual) = write_feature_dirs(root.path());
        let labels = write_labels(root.path(), 164);

        let mut config = PrepConfig::default();
        config.audio.dir = Some(audio);
        config.visual.dir = Some(visual);
        config.labels.path = Some(labels);

        let summary = run_all(&config).unwrap();
        assert_eq!(summary.visual.reshaped, [1, 12, 1]);
        assert_eq!(summary.predict.rows, 104);

        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["audio"]["modality"], "audio");
        assert_eq!(json["train"]["range"]["end"], 60);
    }

    #[test]
    fn test_run_all_requires_paths() {
        let err = run_all(&PrepConfig::default()).unwrap_err();
        assert!(err.to_string().contains("audio.dir"));
    }

    #[test]
    fn test_short_label_file_fails() {
        let root = tempfile::tempdir().unwrap();
        let labels = write_labels(root.path(), 100);

        let err = prepare_labels(&PrepConfig::default(), &labels, RowRange::PREDICT).unwrap_err();
        let cause = err.downcast_ref::<label_engine::LabelError>().unwrap();
        assert!(matches!(cause, label_engine::LabelError::RowRange { rows: 100, .. }));
    }
}
