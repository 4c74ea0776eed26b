//! # Manifest and IDE Sync Checks
//!
//! Part of the aggregate run. Manifests under `.paper/_cfg/` list what a
//! project installs; IDE mirrors (`.github/agents/`, `.codex/prompts/`) must
//! hold one generated file per agent persona.

use paperkit_core::{EntityKind, ProjectLayout};
use serde_json::Value;

use crate::checks::{CheckItem, CheckSection};
use crate::discovery::{entity_stem, find_targets_in};
use crate::document::load_yaml_value;

/// Manifest file names and the top-level keys each must carry.
pub const MANIFESTS: [(&str, &[&str]); 3] = [
    ("agent-manifest.yaml", &["agents"]),
    ("workflow-manifest.yaml", &["workflows"]),
    ("tool-manifest.yaml", &["tools"]),
];

const PERSONA_PREFIX: &str = "paper-";

/// Check every manifest exists, parses, and has its required keys.
pub fn check_manifests(layout: &ProjectLayout) -> CheckSection {
    let mut section = CheckSection::new("Validating Manifests");

    for (file_name, required) in MANIFESTS {
        let path = layout.manifest_path(file_name);
        if !path.exists() {
            section.push(CheckItem::warn(file_name, "Not found"));
            continue;
        }

        let data = match load_yaml_value(&path) {
            Ok(data) => data,
            Err(e) => {
                section.push(CheckItem::fail(file_name, e.to_string()));
                continue;
            }
        };

        let missing: Vec<&str> = required
            .iter()
            .copied()
            .filter(|key| data.get(key).is_none())
            .collect();
        if !missing.is_empty() {
            section.push(CheckItem::fail(
                file_name,
                format!("Missing keys: {}", missing.join(", ")),
            ));
            continue;
        }

        let count = required
            .first()
            .and_then(|key| data.get(key))
            .map(item_count)
            .unwrap_or(0);
        section.push(CheckItem::pass(format!("{file_name} ({count} items)")));
    }

    section
}

fn item_count(value: &Value) -> usize {
    match value {
        Value::Array(items) => items.len(),
        Value::Object(map) => map.len(),
        _ => 0,
    }
}

/// Agent persona names with any `paper-` prefix removed, in discovery order.
pub fn persona_names(layout: &ProjectLayout) -> Vec<String> {
    let dirs = layout.aggregate_dirs(EntityKind::Agent);
    let extension = layout.aggregate_format(EntityKind::Agent).extension();
    find_targets_in(&dirs, extension, None)
        .targets
        .iter()
        .map(|path| {
            let stem = entity_stem(path);
            stem.strip_prefix(PERSONA_PREFIX)
                .map(str::to_string)
                .unwrap_or(stem)
        })
        .collect()
}

/// Check that every agent persona has its Copilot and Codex mirror.
///
/// A missing mirror directory means that IDE is not installed; it is
/// noted, not failed.
pub fn check_ide_sync(layout: &ProjectLayout) -> CheckSection {
    let mut section = CheckSection::new("Checking IDE File Sync");
    let names = persona_names(layout);

    let mirrors = [
        (
            "Copilot",
            layout.copilot_agents_dir(),
            ".agent.md",
            ".github/agents/",
        ),
        ("Codex", layout.codex_prompts_dir(), ".md", ".codex/prompts/"),
    ];

    for (ide, dir, suffix, shown) in mirrors {
        if !dir.is_dir() {
            section.notice(format!("{shown} directory not found ({ide} not installed)"));
            continue;
        }
        for name in &names {
            let file_name = format!("{PERSONA_PREFIX}{name}{suffix}");
            if dir.join(&file_name).exists() {
                section.push(CheckItem::pass(format!("{ide}: {file_name}")));
            } else {
                tracing::debug!(ide, file = %file_name, "IDE mirror missing");
                section.push(CheckItem::fail(format!("{ide}: Missing {file_name}"), ""));
            }
        }
    }

    section
}

/// Compact rendering of the IDE sync section: passes only when verbose,
/// plus a one-line confirmation when everything is in sync.
pub fn render_ide_sync(section: &CheckSection, verbose: bool) -> String {
    let mut out = section.render_compact(verbose);
    if section.passed() > 0 && section.failed() == 0 {
        out.push_str(&format!("✓ All {} IDE files in sync\n", section.passed()));
    }
    out
}
