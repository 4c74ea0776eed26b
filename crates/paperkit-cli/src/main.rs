//! # paperkit-validate entry point
//!
//! Parses command-line arguments, sets up diagnostics, resolves the project
//! root once, and dispatches to subcommand handlers.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use paperkit_cli::aggregate::{run_all, AllArgs};
use paperkit_cli::entities::{
    run_entities, AgentsArgs, CommandsArgs, ToolsArgs, WorkflowsArgs,
};
use paperkit_cli::registry::{run_registry, RegistryArgs};
use paperkit_cli::RunContext;
use paperkit_core::locate_project_root;
use paperkit_schema::ExitPolicy;

/// Exit code for runs that could not start.
const EXIT_FATAL: u8 = 2;

/// PaperKit definition validator
///
/// Validates agent, workflow, tool and command definitions against their
/// JSON Schemas, plus project manifests, IDE mirrors and the system registry.
#[derive(Parser, Debug)]
#[command(name = "paperkit-validate", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Exit non-zero on any failure (the default).
    #[arg(long, global = true)]
    ci: bool,

    /// Report failures but exit zero.
    #[arg(long, global = true, conflicts_with = "ci")]
    lenient: bool,

    /// Project root (default: nearest directory above CWD with .paper/).
    #[arg(long, global = true, value_name = "PATH")]
    project_root: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Validate agent definitions.
    Agents(AgentsArgs),

    /// Validate workflow definitions.
    Workflows(WorkflowsArgs),

    /// Validate tool definitions.
    Tools(ToolsArgs),

    /// Validate slash-command definitions.
    Commands(CommandsArgs),

    /// Validate the whole project: definitions, manifests and IDE mirrors.
    All(AllArgs),

    /// Validate the .copilot/ system registry.
    Registry(RegistryArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // -v flags win; without them RUST_LOG applies, defaulting to warnings.
    let filter = match cli.verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!("paperkit-validate v{} starting", env!("CARGO_PKG_VERSION"));

    let project_root = match locate_project_root(cli.project_root.as_deref()) {
        Ok(root) => {
            tracing::debug!(project_root = %root.display(), "resolved project root");
            Some(root)
        }
        Err(e) => {
            tracing::debug!(error = %e, "no project root");
            None
        }
    };

    let ctx = RunContext {
        project_root,
        verbose: cli.verbose > 0,
        policy: ExitPolicy::from_flags(cli.ci, cli.lenient),
    };

    let result = match cli.command {
        Commands::Agents(args) => run_entities(&args, &ctx),
        Commands::Workflows(args) => run_entities(&args, &ctx),
        Commands::Tools(args) => run_entities(&args, &ctx),
        Commands::Commands(args) => run_entities(&args, &ctx),
        Commands::All(args) => run_all(&args, &ctx),
        Commands::Registry(args) => run_registry(&args, &ctx),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::from(EXIT_FATAL)
        }
    }
}
