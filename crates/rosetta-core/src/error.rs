//! Error taxonomy shared by the catalog, the cloner and the wizard

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by the core
///
/// `Validation` is the only recoverable variant: the wizard turns it into an
/// inline annotation on the active stage. Everything else aborts the session.
#[derive(Debug, Error)]
pub enum RosettaError {
    /// The catalog is malformed or internally inconsistent
    #[error("configuration error: {0}")]
    Configuration(String),

    /// User input failed a local precondition
    #[error("{0}")]
    Validation(String),

    /// Network failure or non-success response from a remote endpoint
    #[error("failed to fetch {url}: {reason}")]
    RemoteFetch { url: String, reason: String },

    /// Local filesystem failure while reading the catalog or writing a clone
    #[error("{}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Ctrl+C arrived while a clone was running
    #[error("interrupted")]
    Interrupted,
}

impl RosettaError {
    pub(crate) fn remote(url: impl Into<String>, reason: impl ToString) -> Self {
        Self::RemoteFetch {
            url: url.into(),
            reason: reason.to_string(),
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Whether the wizard may re-prompt instead of aborting
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}
