use std::path::PathBuf;
use std::process::ExitStatus;

use thiserror::Error;

/// Errors raised by the pipeline. Every variant is fatal: the driver never
/// retries, it unwinds to `main` which logs the error and exits nonzero.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid glob pattern: {0}")]
    Pattern(#[from] glob::PatternError),

    #[error("unreadable path while globbing: {0}")]
    Glob(#[from] glob::GlobError),

    #[error("could not parse config file: {0}")]
    Config(#[from] toml::de::Error),

    #[error("found no fastq files from glob \"{glob}\"")]
    NoInputFiles { glob: String },

    #[error("found no forward reads from glob \"{glob}\"")]
    NoForwardReads { glob: String },

    #[error("no orientation marker (_[0R][12]) in file name \"{name}\"")]
    NoOrientationMarker { name: String },

    #[error("cannot combine an empty list of file names")]
    EmptyCombineInput,

    #[error("no output files in directory {dir:?}")]
    EmptyStageOutput { dir: PathBuf },

    #[error("could not launch command \"{command}\"")]
    CommandLaunch {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("command \"{command}\" failed with {status}; captured output:\n{output}")]
    CommandFailed {
        command: String,
        status: ExitStatus,
        output: String,
    },

    #[error("malformed record {index} in {file:?}: {detail}")]
    MalformedRecord {
        file: PathBuf,
        index: usize,
        detail: String,
    },
}

pub type Result<T> = std::result::Result<T, PipelineError>;
