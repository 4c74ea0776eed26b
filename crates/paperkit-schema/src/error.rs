//! # Error Types
//!
//! Two families, matching how far a failure reaches:
//!
//! - [`SchemaError`] is fatal for the whole run. Without a schema no entity
//!   can be checked.
//! - [`LoadError`] belongs to one entity. It is reported, counted as a
//!   failure, and the run moves on.
//!
//! Schema violations and structural mismatches are not errors at all: they
//! are collected into a [`ValidationResult`](crate::ValidationResult).

use thiserror::Error;

/// Failure to obtain a usable schema.
#[derive(Error, Debug)]
pub enum SchemaError {
    /// The schema file does not exist.
    #[error("schema file not found: {path}")]
    NotFound {
        /// Path that was looked up.
        path: String,
    },

    /// The schema file is not valid JSON.
    #[error("invalid JSON in schema file {path}: {reason}")]
    Parse {
        /// Path of the schema file.
        path: String,
        /// Parser message.
        reason: String,
    },

    /// The schema is JSON but not a valid draft-07 schema.
    #[error("failed to compile schema {path}: {reason}")]
    Compile {
        /// Path of the schema file.
        path: String,
        /// Compiler message.
        reason: String,
    },

    /// IO error reading the schema.
    #[error("io error reading schema {path}: {source}")]
    Io {
        /// Path of the schema file.
        path: String,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },
}

/// Failure to load one entity document.
#[derive(Error, Debug)]
pub enum LoadError {
    /// The entity file does not exist.
    #[error("file not found: {path}")]
    NotFound {
        /// Path that was looked up.
        path: String,
    },

    /// The file is not valid YAML.
    #[error("invalid YAML in {path}{}: {reason}", location_suffix(.line, .column))]
    Parse {
        /// Path of the entity file.
        path: String,
        /// 1-based line of the syntax error, when known.
        line: Option<usize>,
        /// 1-based column of the syntax error, when known.
        column: Option<usize>,
        /// Parser message.
        reason: String,
    },

    /// The YAML parsed, but its top level is not a mapping.
    #[error("{path}: top level is {found}, expected a mapping")]
    NotAMapping {
        /// Path of the entity file.
        path: String,
        /// What was found instead (e.g. `"a sequence"`).
        found: &'static str,
    },

    /// The YAML uses constructs with no JSON equivalent.
    #[error("{path}: cannot convert YAML to JSON: {reason}")]
    Conversion {
        /// Path of the entity file.
        path: String,
        /// Conversion message.
        reason: String,
    },

    /// Any other IO error.
    #[error("cannot read {path}: {source}")]
    Io {
        /// Path of the entity file.
        path: String,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },
}

fn location_suffix(line: &Option<usize>, column: &Option<usize>) -> String {
    match (*line, *column) {
        (Some(l), Some(c)) => format!(" (line {l}, column {c})"),
        (Some(l), None) => format!(" (line {l})"),
        _ => String::new(),
    }
}
