//! # System Registry Checks
//!
//! The `.copilot/` registry indexes agents, commands and workflows by id and
//! points at their spec files. These checks confirm the registry is complete
//! and self-consistent:
//!
//! 1. every required file exists;
//! 2. every `*.yaml` file under the registry parses;
//! 3. the agent, command and workflow indexes have the expected shape and
//!    their spec files exist.
//!
//! Spec file paths are resolved relative to the registry directory.

use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::checks::{CheckItem, CheckSection};
use crate::document::load_yaml_value;
use crate::error::LoadError;

/// Files a complete registry must contain, relative to its directory.
pub const REQUIRED_FILES: [&str; 12] = [
    "agents.yaml",
    "commands.yaml",
    "workflows.yaml",
    "config/settings.yaml",
    "config/consent.yaml",
    "tools/tools.yaml",
    "memory/paper-metadata.yaml",
    "memory/research-index.yaml",
    "memory/section-status.yaml",
    "memory/working-reference.md",
    "memory/revision-log.md",
    "README.md",
];

/// Agent categories `agents.yaml` must define.
pub const AGENT_CATEGORIES: [&str; 3] = ["core", "specialist", "system"];

const AGENT_FIELDS: [&str; 3] = ["name", "description", "spec-file"];
const COMMAND_FIELDS: [&str; 3] = ["id", "display-name", "agent"];

/// All registry check sections, in report order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryReport {
    /// Directory that was checked.
    pub registry_dir: PathBuf,
    /// One section per check family, in run order.
    pub sections: Vec<CheckSection>,
}

impl RegistryReport {
    /// Passing checks across all sections.
    pub fn passed(&self) -> usize {
        self.sections.iter().map(CheckSection::passed).sum()
    }

    /// Failing checks across all sections.
    pub fn failed(&self) -> usize {
        self.sections.iter().map(CheckSection::failed).sum()
    }

    /// Full text report: a banner, every section, and the grand summary.
    pub fn render(&self) -> String {
        let rule = "=".repeat(60);
        let mut out = format!(
            "\n{rule}\n {} System Validation\n{rule}\n",
            self.registry_dir.display()
        );
        for section in &self.sections {
            out.push_str(&section.render_boxed());
        }
        out.push_str(&format!(
            "\n{rule}\n SUMMARY\n{rule}\n  Total: {} passed, {} failed\n\n",
            self.passed(),
            self.failed()
        ));
        if self.failed() > 0 {
            out.push_str("  Validation FAILED\n");
        } else {
            out.push_str("  Validation PASSED\n");
        }
        out
    }
}

/// Run every registry check over `registry_dir`.
pub fn validate_registry(registry_dir: &Path) -> RegistryReport {
    tracing::info!(dir = %registry_dir.display(), "validating system registry");
    RegistryReport {
        registry_dir: registry_dir.to_path_buf(),
        sections: vec![
            check_required_files(registry_dir),
            check_yaml_syntax(registry_dir),
            check_agent_registry(registry_dir),
            check_command_registry(registry_dir),
            check_workflow_registry(registry_dir),
        ],
    }
}

/// Every entry of [`REQUIRED_FILES`] exists.
pub fn check_required_files(registry_dir: &Path) -> CheckSection {
    let mut section = CheckSection::new("Required Files");
    for file in REQUIRED_FILES {
        if registry_dir.join(file).exists() {
            section.push(CheckItem::pass(file));
        } else {
            section.push(CheckItem::fail(file, "File not found"));
        }
    }
    section
}

/// Every `*.yaml` file under the registry, recursively, parses.
pub fn check_yaml_syntax(registry_dir: &Path) -> CheckSection {
    let mut section = CheckSection::new("YAML Syntax");
    for path in find_yaml_files(registry_dir) {
        let shown = path
            .strip_prefix(registry_dir)
            .unwrap_or(&path)
            .display()
            .to_string();
        match load_yaml_value(&path) {
            Ok(_) => section.push(CheckItem::pass(shown)),
            Err(e) => section.push(CheckItem::fail(shown, registry_load_reason(&e))),
        }
    }
    section
}

/// `agents.yaml` defines every category and each agent is complete.
pub fn check_agent_registry(registry_dir: &Path) -> CheckSection {
    let mut section = CheckSection::new("Agent Registry");
    let data = match load_yaml_value(&registry_dir.join("agents.yaml")) {
        Ok(data) => data,
        Err(e) => {
            section.push(CheckItem::fail("agents.yaml", registry_load_reason(&e)));
            return section;
        }
    };

    let agents = data.get("agents");
    for category in AGENT_CATEGORIES {
        let members = match agents.and_then(|a| a.get(category)) {
            Some(members) => members,
            None => {
                section.push(CheckItem::fail(
                    format!("{category} section"),
                    format!("Missing {category} section in agents.yaml"),
                ));
                continue;
            }
        };
        let Some(members) = members.as_object() else {
            section.push(CheckItem::fail(
                format!("{category} section"),
                format!("{category} section is not a mapping of agents"),
            ));
            continue;
        };

        for (agent_id, agent) in members {
            let subject = format!("Agent: {agent_id}");
            section.push(check_entry(
                registry_dir,
                subject,
                agent,
                &AGENT_FIELDS,
                "spec-file",
                "Invalid agent definition",
            ));
        }
    }
    section
}

/// `commands.yaml` groups list complete commands.
pub fn check_command_registry(registry_dir: &Path) -> CheckSection {
    let mut section = CheckSection::new("Command Registry");
    let data = match load_yaml_value(&registry_dir.join("commands.yaml")) {
        Ok(data) => data,
        Err(e) => {
            section.push(CheckItem::fail("commands.yaml", registry_load_reason(&e)));
            return section;
        }
    };

    let groups = data
        .get("groups")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default();
    for group in groups {
        let commands = group
            .get("commands")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or_default();
        for command in commands {
            let cmd_id = command
                .get("id")
                .and_then(Value::as_str)
                .unwrap_or("unknown");
            section.push(check_entry(
                registry_dir,
                format!("Command: {cmd_id}"),
                command,
                &COMMAND_FIELDS,
                "spec-file",
                "Invalid command definition",
            ));
        }
    }
    section
}

/// `workflows.yaml` entries are mappings whose `file` exists.
pub fn check_workflow_registry(registry_dir: &Path) -> CheckSection {
    let mut section = CheckSection::new("Workflow Registry");
    let data = match load_yaml_value(&registry_dir.join("workflows.yaml")) {
        Ok(data) => data,
        Err(e) => {
            section.push(CheckItem::fail("workflows.yaml", registry_load_reason(&e)));
            return section;
        }
    };

    if let Some(workflows) = data.get("workflows").and_then(Value::as_object) {
        for (wf_id, workflow) in workflows {
            section.push(check_entry(
                registry_dir,
                format!("Workflow: {wf_id}"),
                workflow,
                &[],
                "file",
                "Invalid workflow definition",
            ));
        }
    }
    section
}

/// Shape check shared by the three indexes: a mapping with `required`
/// fields whose optional `file_field` names an existing file.
fn check_entry(
    registry_dir: &Path,
    subject: String,
    entry: &Value,
    required: &[&str],
    file_field: &str,
    invalid_reason: &str,
) -> CheckItem {
    let Some(entry) = entry.as_object() else {
        return CheckItem::fail(subject, invalid_reason);
    };

    let missing: Vec<&str> = required
        .iter()
        .copied()
        .filter(|f| !entry.contains_key(*f))
        .collect();
    if !missing.is_empty() {
        return CheckItem::fail(subject, format!("Missing fields: {}", missing.join(", ")));
    }

    match entry.get(file_field).and_then(Value::as_str) {
        Some(file) if !file.is_empty() && !registry_dir.join(file).exists() => {
            CheckItem::fail(subject, format!("Spec file not found: {file}"))
        }
        _ => CheckItem::pass(subject),
    }
}

fn registry_load_reason(error: &LoadError) -> String {
    match error {
        LoadError::NotFound { .. } => "File not found".to_string(),
        LoadError::Parse { .. } => format!("YAML syntax error: {error}"),
        other => other.to_string(),
    }
}

/// Recursively collect `*.yaml` files under `dir`, sorted.
fn find_yaml_files(dir: &Path) -> Vec<PathBuf> {
    let mut results = Vec::new();
    walk_for_yaml(dir, &mut results);
    results.sort();
    results
}

fn walk_for_yaml(dir: &Path, acc: &mut Vec<PathBuf>) {
    let entries = match std::fs::read_dir(dir) {
        Ok(e) => e,
        Err(e) => {
            tracing::warn!(
                dir = %dir.display(),
                error = %e,
                "failed to read directory during registry walk"
            );
            return;
        }
    };
    for entry in entries {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                tracing::warn!(dir = %dir.display(), error = %e, "failed to read directory entry");
                continue;
            }
        };
        let path = entry.path();
        if path.is_dir() {
            walk_for_yaml(&path, acc);
        } else if path.extension().and_then(|ext| ext.to_str()) == Some("yaml") {
            acc.push(path);
        }
    }
}
