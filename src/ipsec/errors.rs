//! Error types for configuration resolution
// (c) 2024 Ross Younger

use std::path::PathBuf;

use super::Configuration;

/// A glob pattern could not be parsed
#[derive(Debug, thiserror::Error)]
#[error("invalid glob pattern `{pattern}`")]
pub struct GlobSyntaxError {
    /// The pattern as written
    pub pattern: String,
    #[source]
    source: glob::PatternError,
}

impl GlobSyntaxError {
    pub(crate) fn new(pattern: &str, source: glob::PatternError) -> Self {
        Self {
            pattern: pattern.to_owned(),
            source,
        }
    }
}

/// A queued configuration file could not be read.
///
/// Reading stops at the first such failure. The connections gathered up to that point
/// are still available from [`ReadError::partial`].
#[derive(Debug, thiserror::Error)]
#[error("unable to read configuration file {}", .path.display())]
pub struct ReadError {
    /// The file which could not be read
    pub path: PathBuf,
    #[source]
    source: std::io::Error,
    partial: Configuration,
}

impl ReadError {
    pub(crate) fn new(path: PathBuf, source: std::io::Error, partial: Configuration) -> Self {
        Self {
            path,
            source,
            partial,
        }
    }

    /// The configuration as far as it was resolved before the failure
    #[must_use]
    pub fn partial(&self) -> &Configuration {
        &self.partial
    }

    /// Consumes the error, returning the partial configuration
    #[must_use]
    pub fn into_partial(self) -> Configuration {
        self.partial
    }
}

/// Failure to resolve the top-level configuration path
#[derive(Debug, thiserror::Error)]
pub enum RootError {
    /// The configured path is not a valid glob pattern
    #[error(transparent)]
    Pattern(#[from] GlobSyntaxError),
    /// One of the matched files could not be read
    #[error("unable to read configuration fragment {}", .path.display())]
    Read {
        /// The fragment which failed
        path: PathBuf,
        /// Underlying cause
        #[source]
        source: std::io::Error,
    },
}
