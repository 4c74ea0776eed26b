//! # paperkit-core — Foundational Types for PaperKit Validation
//!
//! Defines the vocabulary shared by the schema engine and the CLI: which
//! kinds of entity exist, how their documents are stored on disk, where a
//! PaperKit project keeps them, and how command-line flags and environment
//! variables override those defaults.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `paperkit-*` crates (this is the leaf of the DAG).
//! - Configuration is resolved once into an immutable [`EntityConfig`] and
//!   passed explicitly. Nothing here reads global state except
//!   [`process_env`] and [`locate_project_root`], which callers invoke at
//!   process start.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod config;
pub mod error;
pub mod kind;

pub use config::{
    find_project_root, locate_project_root, process_env, EntityConfig, EntityOverrides,
    ProjectLayout,
};
pub use error::ConfigError;
pub use kind::{DocumentFormat, EntityKind};
