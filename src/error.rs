use std::{io, path::PathBuf};

use thiserror::Error;

/// Failures raised while turning a source file into a [`crate::data::Dataset`].
///
/// The recommendation engine itself has no error type; everything here is
/// reported before analysis starts.
#[derive(Error, Debug)]
pub enum IngestionError {
    #[error("Opening input file {path:?}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Reading CSV data: {0}")]
    Csv(#[from] csv::Error),

    #[error("Unknown encoding '{0}'")]
    UnknownEncoding(String),

    #[error("Failed to decode header {index} with encoding {encoding}")]
    UndecodableHeader { index: usize, encoding: &'static str },

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}
