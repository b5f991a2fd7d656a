//! Errors surfaced by the command line tool.

use std::io;
use std::path::PathBuf;

use follow_algebra_executor::ExecutorError;
use thiserror::Error;

/// Anything that makes a run exit with failure.
#[derive(Error, Debug)]
pub enum CliError {
    /// An expression was given but no graph to evaluate it against.
    #[error("no social graph given; pass --graph <snapshot.json>")]
    MissingGraph,

    /// The snapshot file could not be opened.
    #[error("cannot read graph snapshot {}: {source}", path.display())]
    Snapshot {
        /// Path as given on the command line.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },

    /// The snapshot file is not a valid graph document.
    #[error("invalid graph snapshot {}: {source}", path.display())]
    Json {
        /// Path as given on the command line.
        path: PathBuf,
        /// Underlying decode failure.
        #[source]
        source: serde_json::Error,
    },

    /// Parsing, fetching or evaluation failed.
    #[error(transparent)]
    Executor(#[from] ExecutorError),

    /// Writing results failed.
    #[error("cannot write output: {0}")]
    Output(#[from] io::Error),
}
