//! YMRS Preparation Driver
//!
//! Loads configuration, installs logging, and runs the feature and label
//! transforms in sequence for the command-line tool.

pub mod settings;
pub mod pipeline;

pub use settings::{LabelsConfig, PrepConfig, SourceConfig};
pub use pipeline::{
    prepare_features, prepare_labels, run_all, FeatureSummary, FileSummary, LabelSummary,
    RunSummary,
};

use tracing::Level;
use tracing_subscriber::FmtSubscriber;

/// Initialize logging on stderr; `verbose` enables debug output
pub fn init_logging(verbose: bool) -> Result<(), tracing::subscriber::SetGlobalDefaultError> {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
}
