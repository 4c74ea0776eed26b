//! # Validation Engine
//!
//! One engine serves every entity kind. It is parameterised entirely by an
//! [`EntityConfig`]: which schema, which directories, which document format.
//!
//! Control flow per run: discovery, then for each file load, validate and
//! record. Per-entity failures are recorded and the run continues; only a
//! schema that cannot be loaded stops it.

use paperkit_core::EntityConfig;

use crate::discovery::{entity_stem, find_targets_in};
use crate::document::DocumentSource;
use crate::error::SchemaError;
use crate::report::{EntityOutcome, EntityReport, RunSummary};
use crate::schema::{load_schema, Schema};
use crate::validator::{check_schema, validate};

/// Load the configured schema and validate every discovered entity.
///
/// # Errors
///
/// Returns [`SchemaError`] if the schema is missing, malformed or does not
/// compile. Entity-level problems are never errors; they are in the summary.
pub fn validate_kind(
    config: &EntityConfig,
    specific_name: Option<&str>,
) -> Result<RunSummary, SchemaError> {
    let schema = load_schema(&config.schema_path)?;
    Ok(run_with_schema(config, &schema, specific_name))
}

/// Validate every discovered entity against an already-loaded schema.
pub fn run_with_schema(
    config: &EntityConfig,
    schema: &Schema,
    specific_name: Option<&str>,
) -> RunSummary {
    for dir in &config.entity_dirs {
        if !dir.is_dir() {
            tracing::warn!(kind = %config.kind, dir = %dir.display(), "entity directory does not exist");
        }
    }

    let extension = config.format.extension();
    let discovery = find_targets_in(&config.entity_dirs, extension, specific_name);
    let mut summary = RunSummary::new(config.kind, schema.path());

    if let Some(name) = discovery.not_found {
        tracing::warn!(kind = %config.kind, name = %name, "requested entity not found");
        let file = config
            .entity_dirs
            .first()
            .map(|dir| dir.join(format!("{name}{extension}")))
            .unwrap_or_default();
        summary.push(EntityReport {
            id: name,
            file,
            outcome: EntityOutcome::NotFound,
        });
        return summary;
    }

    for path in discovery.targets {
        let id = entity_stem(&path);
        tracing::info!(kind = %config.kind, entity = %id, "validating");

        let source = DocumentSource::new(config.format, &path);
        tracing::debug!(entity = %id, file = %source.path().display(), "loading");

        let outcome = match source.load() {
            Ok(Some(document)) => {
                let result = if config.structural_rules {
                    validate(&document, schema, &id, &config.reference_root)
                } else {
                    check_schema(&document, schema)
                };
                tracing::debug!(entity = %id, errors = result.error_count(), "validated");
                EntityOutcome::Validated(result)
            }
            Ok(None) => {
                tracing::warn!(file = %path.display(), "no YAML frontmatter found");
                EntityOutcome::MissingMetadata
            }
            Err(e) => {
                tracing::warn!(file = %path.display(), error = %e, "failed to load entity");
                EntityOutcome::LoadFailed(e.to_string())
            }
        };

        summary.push(EntityReport {
            id,
            file: path,
            outcome,
        });
    }

    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::{Path, PathBuf};

    use paperkit_core::{DocumentFormat, EntityKind};

    const TOOL_SCHEMA: &str = r#"{
        "$schema": "http://json-schema.org/draft-07/schema#",
        "type": "object",
        "required": ["name", "description"],
        "properties": {
            "name": { "type": "string" },
            "description": { "type": "string" }
        }
    }"#;

    fn config(root: &Path, dir: PathBuf, format: DocumentFormat) -> EntityConfig {
        EntityConfig {
            kind: EntityKind::Tool,
            schema_path: root.join("tool-schema.json"),
            entity_dirs: vec![dir],
            format,
            reference_root: root.to_path_buf(),
            structural_rules: true,
        }
    }

    fn setup() -> (tempfile::TempDir, EntityConfig) {
        let root = tempfile::tempdir().unwrap();
        std::fs::write(root.path().join("tool-schema.json"), TOOL_SCHEMA).unwrap();
        let tools = root.path().join("tools");
        std::fs::create_dir_all(&tools).unwrap();
        let cfg = config(root.path(), tools, DocumentFormat::Yaml);
        (root, cfg)
    }

    fn write(cfg: &EntityConfig, file: &str, content: &str) {
        std::fs::write(cfg.entity_dirs[0].join(file), content).unwrap();
    }

    #[test]
    fn all_valid_entities_pass() {
        let (_root, cfg) = setup();
        write(&cfg, "lint.yaml", "name: lint\ndescription: Lints.\n");
        write(&cfg, "fmt.yaml", "name: fmt\ndescription: Formats.\n");

        let summary = validate_kind(&cfg, None).unwrap();
        assert_eq!(summary.total(), 2);
        assert!(summary.is_success());
        let ids: Vec<&str> = summary.results().iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["fmt", "lint"]);
    }

    #[test]
    fn unparsable_file_fails_alone() {
        let (_root, cfg) = setup();
        write(&cfg, "a.yaml", "name: a\ndescription: ok\n");
        write(&cfg, "b.yaml", "name: [unclosed\n");
        write(&cfg, "c.yaml", "name: c\ndescription: ok\n");

        let summary = validate_kind(&cfg, None).unwrap();
        assert_eq!(summary.passed(), 2);
        assert_eq!(summary.failed(), 1);
        assert_eq!(summary.error_count(), 1);
        assert!(matches!(
            summary.results()[1].outcome,
            EntityOutcome::LoadFailed(_)
        ));
    }

    #[test]
    fn missing_schema_is_fatal() {
        let (root, mut cfg) = setup();
        cfg.schema_path = root.path().join("absent.json");
        assert!(matches!(
            validate_kind(&cfg, None).unwrap_err(),
            SchemaError::NotFound { .. }
        ));
    }

    #[test]
    fn specific_missing_entity_is_one_failure() {
        let (_root, cfg) = setup();
        write(&cfg, "lint.yaml", "name: lint\ndescription: Lints.\n");
        let summary = validate_kind(&cfg, Some("ghost")).unwrap();
        assert_eq!(summary.total(), 1);
        assert_eq!(summary.results()[0].outcome, EntityOutcome::NotFound);
    }

    #[test]
    fn frontmatter_without_block_is_missing_metadata() {
        let root = tempfile::tempdir().unwrap();
        std::fs::write(root.path().join("tool-schema.json"), TOOL_SCHEMA).unwrap();
        let dir = root.path().join("agents");
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("writer.md"), "# Writer\n\nNo metadata.\n").unwrap();
        std::fs::write(
            dir.join("editor.md"),
            "---\nname: editor\ndescription: Edits.\n---\n# Editor\n",
        )
        .unwrap();

        let cfg = config(root.path(), dir, DocumentFormat::Frontmatter);
        let summary = validate_kind(&cfg, None).unwrap();
        assert_eq!(summary.passed(), 1);
        assert_eq!(summary.results()[1].outcome, EntityOutcome::MissingMetadata);
    }

    #[test]
    fn schema_only_runs_ignore_name_mismatch() {
        let (_root, mut cfg) = setup();
        write(&cfg, "lint.yaml", "name: linter\ndescription: Lints.\n");
        assert!(!validate_kind(&cfg, None).unwrap().is_success());

        cfg.structural_rules = false;
        assert!(validate_kind(&cfg, None).unwrap().is_success());
    }

    #[test]
    fn missing_directory_is_an_empty_run() {
        let (root, mut cfg) = setup();
        cfg.entity_dirs = vec![root.path().join("nowhere")];
        let summary = validate_kind(&cfg, None).unwrap();
        assert_eq!(summary.total(), 0);
    }
}
