//! # All Subcommand
//!
//! Validates a whole PaperKit project in one pass: agent personas, workflow
//! and tool definitions from every `.paper/` tree, the `_cfg` manifests, and
//! the IDE mirror files generated from the personas.

use anyhow::{Context, Result};
use clap::Args;

use paperkit_core::{EntityConfig, EntityKind, ProjectLayout};
use paperkit_schema::{
    check_ide_sync, check_manifests, render_ide_sync, render_section, validate_kind,
};

use crate::RunContext;

/// Arguments for `paperkit-validate all`.
#[derive(Args, Debug, Default)]
pub struct AllArgs {
    /// Only validate agent definitions.
    #[arg(long)]
    pub agents_only: bool,

    /// Only validate workflow definitions.
    #[arg(long)]
    pub workflows_only: bool,

    /// Only validate tool definitions.
    #[arg(long)]
    pub tools_only: bool,

    /// Check IDE file synchronization.
    #[arg(long)]
    pub ide_sync: bool,
}

impl AllArgs {
    fn full_run(&self) -> bool {
        !(self.agents_only || self.workflows_only || self.tools_only || self.ide_sync)
    }

    /// Commands have no `.paper/` tree of their own and are never part of
    /// the aggregate run.
    fn includes(&self, kind: EntityKind) -> bool {
        match kind {
            EntityKind::Agent => self.full_run() || self.agents_only,
            EntityKind::Workflow => self.full_run() || self.workflows_only,
            EntityKind::Tool => self.full_run() || self.tools_only,
            EntityKind::Command => false,
        }
    }
}

/// Running pass/fail tally across sections.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
struct Totals {
    passed: usize,
    failed: usize,
}

/// Execute the all subcommand.
///
/// Returns exit code: 0 on success, 1 if any section failed. A missing
/// project root or schema is returned as an error.
pub fn run_all(args: &AllArgs, ctx: &RunContext) -> Result<u8> {
    let root = ctx.require_root()?;
    let layout = ProjectLayout::new(root);

    println!("🔍 PaperKit Schema Validator");
    println!("   Project: {}", root.display());

    let mut totals = Totals::default();

    for kind in [EntityKind::Agent, EntityKind::Workflow, EntityKind::Tool] {
        if !args.includes(kind) {
            continue;
        }
        let config = EntityConfig::aggregate(kind, &layout);
        let summary = validate_kind(&config, None)
            .with_context(|| format!("cannot validate {}", kind.plural()))?;
        print!("{}", render_section(&summary, ctx.verbose));
        totals.passed += summary.passed();
        totals.failed += summary.failed();
    }

    if args.full_run() {
        let manifests = check_manifests(&layout);
        print!("{}", manifests.render_compact(true));
        totals.passed += manifests.passed();
        totals.failed += manifests.failed();
    }

    if args.full_run() || args.ide_sync {
        let sync = check_ide_sync(&layout);
        print!("{}", render_ide_sync(&sync, ctx.verbose));
        totals.passed += sync.passed();
        totals.failed += sync.failed();
    }

    let rule = "=".repeat(40);
    println!("\n{rule}\nSummary\n{rule}");
    println!("  Passed: {}", totals.passed);
    println!("  Failed: {}", totals.failed);
    if totals.failed > 0 {
        println!("\n⚠ Validation completed with errors");
    } else {
        println!("\n✓ All validations passed");
    }

    tracing::info!(passed = totals.passed, failed = totals.failed, "project validation finished");
    Ok(ctx.policy.exit_code(totals.failed))
}
