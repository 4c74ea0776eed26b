//! # Configuration Errors
//!
//! Errors raised while resolving where schemas and entity files live.
//! Every variant here is fatal for a run: without a schema path or an
//! entity directory nothing can be validated.

use thiserror::Error;

/// Error resolving validator configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// No `.paper/` directory or `paperkit` marker file above the start directory,
    /// and a default path was needed.
    #[error("could not find PaperKit project root (.paper/ directory) from {start}")]
    ProjectRootNotFound {
        /// Directory the upward search started from.
        start: String,
    },

    /// A document format name was not recognised.
    #[error("unknown document format '{0}' (expected 'yaml' or 'frontmatter')")]
    UnknownFormat(String),

    /// IO error while probing the filesystem.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
