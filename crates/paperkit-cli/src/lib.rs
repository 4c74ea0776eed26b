//! # paperkit-cli — CLI Tool for PaperKit Validation
//!
//! Provides the `paperkit-validate` command-line interface.
//!
//! ## Subcommands
//!
//! - `paperkit-validate agents` — agent definitions against `agent-schema.json`.
//! - `paperkit-validate workflows` — workflow definitions.
//! - `paperkit-validate tools` — tool definitions.
//! - `paperkit-validate commands` — slash-command definitions.
//! - `paperkit-validate all` — every `.paper/` tree, manifests and IDE mirrors.
//! - `paperkit-validate registry` — the `.copilot/` system registry.
//!
//! ## Exit Codes
//!
//! `0` when everything passed (or `--lenient` was given), `1` when anything
//! failed validation, `2` when the run could not start: no project root, or
//! a schema that is missing or broken.
//!
//! ```bash
//! paperkit-validate agents --agent paper-writer -v
//! paperkit-validate tools --tools-dir ./tools --schema ./tool-schema.json
//! paperkit-validate all --ide-sync
//! ```

pub mod aggregate;
pub mod entities;
pub mod registry;

use std::path::{Path, PathBuf};

use anyhow::Result;
use paperkit_core::ConfigError;
use paperkit_schema::ExitPolicy;

/// Process-wide settings shared by every subcommand, built once in `main`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunContext {
    /// Resolved project root, if one was found.
    pub project_root: Option<PathBuf>,
    /// Show schema locations and passing checks.
    pub verbose: bool,
    /// How failures map to the exit code.
    pub policy: ExitPolicy,
}

impl RunContext {
    /// The project root, or [`ConfigError::ProjectRootNotFound`].
    pub fn require_root(&self) -> Result<&Path> {
        match &self.project_root {
            Some(root) => Ok(root),
            None => {
                let start = std::env::current_dir()
                    .map(|d| d.display().to_string())
                    .unwrap_or_else(|_| ".".to_string());
                Err(ConfigError::ProjectRootNotFound { start }.into())
            }
        }
    }
}

/// Resolve a path that may be relative to the project root.
///
/// Absolute paths are returned as-is. A relative path that exists under the
/// project root resolves there; otherwise it stays relative to the current
/// directory.
pub fn resolve_path(path: &Path, project_root: Option<&Path>) -> PathBuf {
    if path.is_absolute() {
        return path.to_path_buf();
    }
    match project_root.map(|root| root.join(path)) {
        Some(candidate) if candidate.exists() => candidate,
        _ => path.to_path_buf(),
    }
}
