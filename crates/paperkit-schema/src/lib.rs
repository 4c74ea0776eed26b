//! # paperkit-schema — Schema Validation Engine
//!
//! Validates PaperKit entity definitions (agents, workflows, tools,
//! commands) stored as YAML files or as YAML frontmatter in markdown,
//! against draft-07 JSON Schemas.
//!
//! ## Pipeline
//!
//! [`discovery`] picks the files, [`document`] loads each one, [`validator`]
//! checks it against the compiled [`schema`], and [`report`] turns the
//! results into text and an exit code. [`engine`] wires these together for
//! one entity kind, driven by a [`paperkit_core::EntityConfig`]:
//!
//! - [`validate_kind`] — load the schema and validate every entity.
//!
//! ## Integrity Checks
//!
//! [`manifest`] checks `.paper/_cfg` manifests and IDE mirrors for the
//! aggregate run; [`registry`] checks the `.copilot/` system registry.
//! Both report through [`checks::CheckSection`].
//!
//! ## Crate Policy
//!
//! - Depends only on `paperkit-core` internally.
//! - Nothing is written to disk. Validation never mutates a document.
//! - A missing or broken schema is the only fatal error; every per-entity
//!   problem is recorded and the run continues.

pub mod checks;
pub mod discovery;
pub mod document;
pub mod engine;
pub mod error;
pub mod manifest;
pub mod registry;
pub mod report;
pub mod schema;
pub mod validator;

pub use checks::{CheckItem, CheckSection, Mark};
pub use discovery::{entity_stem, find_targets, find_targets_in, Discovery};
pub use document::{extract_frontmatter, DocumentSource, EntityDocument};
pub use engine::{run_with_schema, validate_kind};
pub use error::{LoadError, SchemaError};
pub use manifest::{check_ide_sync, check_manifests, render_ide_sync};
pub use registry::{validate_registry, RegistryReport};
pub use report::{
    render_report, render_section, EntityOutcome, EntityReport, ExitPolicy, RunSummary,
};
pub use schema::{load_schema, Schema, Violation, ROOT_PATH};
pub use validator::{check_schema, validate, Finding, FindingKind, ValidationResult};
