use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced by the CLI; interactive input never produces one.
#[derive(Debug, Error)]
pub enum GlobeError {
    #[error("i/o error: {0}")]
    Io(#[from] io::Error),
    #[error("failed to read flights from {path}: {source}")]
    FlightsRead { path: PathBuf, source: io::Error },
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("flight {index} has an invalid color {color:?}")]
    FlightColor { index: usize, color: String },
    #[error("malformed override {0:?}, expected key=value")]
    Override(String),
    #[error("unknown setting {0:?}")]
    UnknownSetting(String),
}
