//! # Entity Subcommands
//!
//! `agents`, `workflows`, `tools` and `commands` share one shape: an
//! optional entity name, a schema override, a directory override and a
//! document format. Each has its own argument struct so the flag names read
//! naturally (`--agent`, `--agents-dir`), and all of them run through
//! [`run_entities`].

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use paperkit_core::{process_env, DocumentFormat, EntityConfig, EntityKind, EntityOverrides};
use paperkit_schema::{render_report, validate_kind};

use crate::{resolve_path, RunContext};

/// What every entity subcommand provides to the shared runner.
pub trait EntityCommand {
    /// Kind of entity this subcommand validates.
    const KIND: EntityKind;

    /// Specific entity to validate, by file stem.
    fn name(&self) -> Option<&str>;

    /// Flag overrides for schema, directory and format.
    fn overrides(&self) -> EntityOverrides;
}

/// Arguments for `paperkit-validate agents`.
#[derive(Args, Debug, Default)]
pub struct AgentsArgs {
    /// Validate only this agent (file name without extension).
    #[arg(long, value_name = "NAME")]
    pub agent: Option<String>,

    /// JSON Schema file (default: .paper/_cfg/schemas/agent-schema.json).
    #[arg(long, value_name = "PATH")]
    pub schema: Option<PathBuf>,

    /// Directory of agent definitions (default: .paper/_cfg/agents).
    #[arg(long, value_name = "PATH")]
    pub agents_dir: Option<PathBuf>,

    /// How definitions are stored: yaml or frontmatter.
    #[arg(long, value_name = "FORMAT")]
    pub format: Option<DocumentFormat>,
}

/// Arguments for `paperkit-validate workflows`.
#[derive(Args, Debug, Default)]
pub struct WorkflowsArgs {
    /// Validate only this workflow (file name without extension).
    #[arg(long, value_name = "NAME")]
    pub workflow: Option<String>,

    /// JSON Schema file (default: .paper/_cfg/schemas/workflow-schema.json).
    #[arg(long, value_name = "PATH")]
    pub schema: Option<PathBuf>,

    /// Directory of workflow definitions (default: .paper/_cfg/workflows).
    #[arg(long, value_name = "PATH")]
    pub workflows_dir: Option<PathBuf>,

    /// How definitions are stored: yaml or frontmatter.
    #[arg(long, value_name = "FORMAT")]
    pub format: Option<DocumentFormat>,
}

/// Arguments for `paperkit-validate tools`.
#[derive(Args, Debug, Default)]
pub struct ToolsArgs {
    /// Validate only this tool (file name without extension).
    #[arg(long, value_name = "NAME")]
    pub tool: Option<String>,

    /// JSON Schema file (default: .paper/_cfg/schemas/tool-schema.json).
    #[arg(long, value_name = "PATH")]
    pub schema: Option<PathBuf>,

    /// Directory of tool definitions (default: .paper/_cfg/tools).
    #[arg(long, value_name = "PATH")]
    pub tools_dir: Option<PathBuf>,

    /// How definitions are stored: yaml or frontmatter.
    #[arg(long, value_name = "FORMAT")]
    pub format: Option<DocumentFormat>,
}

/// Arguments for `paperkit-validate commands`.
#[derive(Args, Debug, Default)]
pub struct CommandsArgs {
    /// Validate only this command (file name without extension).
    #[arg(long, value_name = "NAME")]
    pub command: Option<String>,

    /// JSON Schema file (default: .paper/_cfg/schemas/command-schema.json).
    #[arg(long, value_name = "PATH")]
    pub schema: Option<PathBuf>,

    /// Directory of command definitions (default: .paper/_cfg/commands).
    #[arg(long, value_name = "PATH")]
    pub commands_dir: Option<PathBuf>,

    /// How definitions are stored: yaml or frontmatter.
    #[arg(long, value_name = "FORMAT")]
    pub format: Option<DocumentFormat>,
}

macro_rules! entity_command {
    ($args:ty, $kind:expr, $name:ident, $dir:ident) => {
        impl EntityCommand for $args {
            const KIND: EntityKind = $kind;

            fn name(&self) -> Option<&str> {
                self.$name.as_deref()
            }

            fn overrides(&self) -> EntityOverrides {
                EntityOverrides {
                    schema: self.schema.clone(),
                    dir: self.$dir.clone(),
                    format: self.format,
                }
            }
        }
    };
}

entity_command!(AgentsArgs, EntityKind::Agent, agent, agents_dir);
entity_command!(WorkflowsArgs, EntityKind::Workflow, workflow, workflows_dir);
entity_command!(ToolsArgs, EntityKind::Tool, tool, tools_dir);
entity_command!(CommandsArgs, EntityKind::Command, command, commands_dir);

/// Execute an entity subcommand.
///
/// Returns exit code: 0 on success, 1 on validation failure. Configuration
/// and schema problems are returned as errors.
pub fn run_entities<C: EntityCommand>(args: &C, ctx: &RunContext) -> Result<u8> {
    let kind = C::KIND;
    let root = ctx.project_root.as_deref();

    let mut overrides = args.overrides();
    overrides.schema = overrides.schema.map(|p| resolve_path(&p, root));
    overrides.dir = overrides.dir.map(|p| resolve_path(&p, root));

    let config = EntityConfig::resolve(kind, root, &overrides, process_env)
        .with_context(|| format!("cannot resolve {} configuration", kind.label()))?;

    let summary = validate_kind(&config, args.name())
        .with_context(|| format!("cannot validate {}", kind.plural()))?;

    print!("{}", render_report(&summary, ctx.verbose));

    tracing::info!(
        kind = %kind,
        passed = summary.passed(),
        failed = summary.failed(),
        errors = summary.error_count(),
        "validation finished"
    );

    if summary.total() == 0 {
        return Ok(ctx.policy.empty_run_code());
    }
    Ok(ctx.policy.exit_code(summary.failed()))
}
