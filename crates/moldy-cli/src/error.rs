use moldy::engine::error::ConversionError;
use moldy::engine::measure::MeasureError;
use moldy::workflows::batch::BatchError;
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Conversion(#[from] ConversionError),

    #[error(transparent)]
    Batch(#[from] BatchError),

    #[error(transparent)]
    Measure(#[from] MeasureError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to parse file '{path}': {source}", path = path.display())]
    FileParsing {
        path: PathBuf,
        #[source]
        source: anyhow::Error,
    },

    #[error("Failed to write file '{path}': {source}", path = path.display())]
    FileWriting {
        path: PathBuf,
        #[source]
        source: anyhow::Error,
    },

    #[error("Cannot tell the format of '{path}' (expected a .zmat or .xyz extension)", path = path.display())]
    UnsupportedFormat { path: PathBuf },

    #[error("{failed} of {total} frame(s) failed the round-trip check")]
    RoundTrip { failed: usize, total: usize },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid argument: {0}")]
    Argument(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
