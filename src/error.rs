//! Fatal errors of a single extraction.

use std::path::PathBuf;

use thiserror::Error;

use crate::parser::ParseFailure;

/// An error that prevents any result document from being produced.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("cannot read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Parsing failed for {}: {failure}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        failure: ParseFailure,
    },
}

impl ExtractError {
    /// Whether the failure happened after one repair-and-retry.
    pub fn repair_attempted(&self) -> bool {
        match self {
            ExtractError::Parse { failure, .. } => failure.repair_attempted,
            ExtractError::Io { .. } => false,
        }
    }
}
