//! Errors of the beam selection environment.
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while building or stepping a
/// [`BeamSelectionEnv`](crate::BeamSelectionEnv).
///
/// Construction fails with `Config`, `DataSource` or `DataFormat`.
/// `InvalidAction` and `InvalidState` are raised by `step` and leave the
/// episode untouched; recover with a fresh `reset`.
#[derive(Error, Debug)]
pub enum BeamEnvError {
    /// Invalid configuration value.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The data source could not be opened or read.
    #[error("Cannot read data source {path:?}: {source}")]
    DataSource {
        /// Path of the data source.
        path: PathBuf,

        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// The data source was readable but its content is not a beam dataset.
    #[error("Data format error: {0}")]
    DataFormat(String),

    /// The action is not a beam index.
    #[error("Invalid action {action}, expected a beam index in [0, {num_beams})")]
    InvalidAction {
        /// Given action.
        action: usize,

        /// Number of beams.
        num_beams: usize,
    },

    /// The environment is not in a state that accepts the call.
    #[error("Invalid state: {0}")]
    InvalidState(String),
}
