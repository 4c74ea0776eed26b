//! # Entity Kinds and Document Formats
//!
//! A PaperKit project registers four kinds of entity. Each kind has its own
//! JSON Schema, its own directory and its own pair of environment overrides,
//! but all of them go through the same validation engine.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// The kind of entity a definition file describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    /// An agent persona definition.
    Agent,
    /// A multi-step workflow definition.
    Workflow,
    /// A tool (script) definition.
    Tool,
    /// A slash-command definition.
    Command,
}

impl EntityKind {
    /// Every kind, in the order the aggregate validator reports them.
    pub const ALL: [EntityKind; 4] = [
        EntityKind::Agent,
        EntityKind::Workflow,
        EntityKind::Tool,
        EntityKind::Command,
    ];

    /// Singular lowercase label, e.g. `"agent"`.
    pub fn label(self) -> &'static str {
        match self {
            Self::Agent => "agent",
            Self::Workflow => "workflow",
            Self::Tool => "tool",
            Self::Command => "command",
        }
    }

    /// Plural lowercase label, e.g. `"agents"`. Also the default directory name.
    pub fn plural(self) -> &'static str {
        match self {
            Self::Agent => "agents",
            Self::Workflow => "workflows",
            Self::Tool => "tools",
            Self::Command => "commands",
        }
    }

    /// Capitalised label for report headings, e.g. `"Agent"`.
    pub fn title(self) -> &'static str {
        match self {
            Self::Agent => "Agent",
            Self::Workflow => "Workflow",
            Self::Tool => "Tool",
            Self::Command => "Command",
        }
    }

    /// File name of the kind's schema under `.paper/_cfg/schemas/`.
    pub fn schema_file_name(self) -> &'static str {
        match self {
            Self::Agent => "agent-schema.json",
            Self::Workflow => "workflow-schema.json",
            Self::Tool => "tool-schema.json",
            Self::Command => "command-schema.json",
        }
    }

    /// Environment variables that override the schema path, in priority order.
    ///
    /// Agents also honour the unqualified `PAPERKIT_SCHEMA_PATH`, which
    /// predates the per-kind variables.
    pub fn schema_env_vars(self) -> &'static [&'static str] {
        match self {
            Self::Agent => &["PAPERKIT_AGENT_SCHEMA_PATH", "PAPERKIT_SCHEMA_PATH"],
            Self::Workflow => &["PAPERKIT_WORKFLOW_SCHEMA_PATH"],
            Self::Tool => &["PAPERKIT_TOOL_SCHEMA_PATH"],
            Self::Command => &["PAPERKIT_COMMAND_SCHEMA_PATH"],
        }
    }

    /// Environment variable that overrides the entity directory.
    pub fn dir_env_var(self) -> &'static str {
        match self {
            Self::Agent => "PAPERKIT_AGENTS_DIR",
            Self::Workflow => "PAPERKIT_WORKFLOWS_DIR",
            Self::Tool => "PAPERKIT_TOOLS_DIR",
            Self::Command => "PAPERKIT_COMMANDS_DIR",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// How an entity's metadata is stored on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentFormat {
    /// The whole file is a YAML mapping (`*.yaml`).
    Yaml,
    /// A markdown file whose metadata is a YAML block between `---` lines (`*.md`).
    Frontmatter,
}

impl DocumentFormat {
    /// File extension (with leading dot) that discovery matches for this format.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Yaml => ".yaml",
            Self::Frontmatter => ".md",
        }
    }
}

impl fmt::Display for DocumentFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Yaml => f.write_str("yaml"),
            Self::Frontmatter => f.write_str("frontmatter"),
        }
    }
}

impl FromStr for DocumentFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "yaml" | "yml" => Ok(Self::Yaml),
            "frontmatter" | "md" | "markdown" => Ok(Self::Frontmatter),
            _ => Err(ConfigError::UnknownFormat(s.to_string())),
        }
    }
}
