use std::{io, path::PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BuildError {
    #[error("required build asset is missing or unreadable: {}", .path.display())]
    MissingAsset { path: PathBuf },

    #[error("cannot determine branch and commit for {}: {reason}", .root.display())]
    VcsMetadata { root: PathBuf, reason: String },

    #[error("build of {image} failed with exit code {exit_code}")]
    BuildEngine { image: String, exit_code: i32 },

    #[error("invalid value {value:?} for {name}: {reason}")]
    InvalidConfig {
        name: String,
        value: String,
        reason: String,
    },

    #[error("could not launch build engine `{program}`")]
    EngineUnavailable {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("build of {image} interrupted by signal {signal}")]
    Interrupted { image: String, signal: i32 },

    #[error("could not install signal handlers")]
    SignalHandler {
        #[source]
        source: io::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("terminal output error: {0}")]
    Terminal(#[from] crossterm::ErrorKind),
}

pub type Result<T, E = BuildError> = std::result::Result<T, E>;
