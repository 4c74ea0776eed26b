//! # Registry Subcommand
//!
//! Checks the `.copilot/` system registry: required files, YAML syntax, and
//! the agent, command and workflow indexes.

use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::Args;

use paperkit_core::ProjectLayout;
use paperkit_schema::validate_registry;

use crate::{resolve_path, RunContext};

/// Arguments for `paperkit-validate registry`.
#[derive(Args, Debug, Default)]
pub struct RegistryArgs {
    /// Registry directory (default: <project root>/.copilot).
    #[arg(long, value_name = "PATH")]
    pub copilot_dir: Option<PathBuf>,
}

/// Execute the registry subcommand.
///
/// Returns exit code: 0 on success, 1 on any failed check. A registry
/// directory that does not exist is returned as an error.
pub fn run_registry(args: &RegistryArgs, ctx: &RunContext) -> Result<u8> {
    let dir = match &args.copilot_dir {
        Some(dir) => resolve_path(dir, ctx.project_root.as_deref()),
        None => ProjectLayout::new(ctx.require_root()?).registry_dir(),
    };

    if !dir.is_dir() {
        bail!("registry directory not found: {}", dir.display());
    }

    let report = validate_registry(&dir);
    print!("{}", report.render());

    tracing::info!(
        passed = report.passed(),
        failed = report.failed(),
        "registry validation finished"
    );
    Ok(ctx.policy.exit_code(report.failed()))
}
