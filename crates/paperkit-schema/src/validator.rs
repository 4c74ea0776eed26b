//! # Validator
//!
//! Checks one loaded entity document against its kind's schema and against
//! two structural rules every PaperKit entity obeys:
//!
//! 1. the `name` field equals the file name without its extension;
//! 2. a non-empty `path` field points at a file that exists under the
//!    reference root.
//!
//! Schema findings come first, ordered by property path; structural
//! findings follow. [`validate`] is pure apart from the existence probe for
//! `path` and never mutates its inputs.

use std::fmt;
use std::path::Path;

use serde_json::Value;

use crate::document::EntityDocument;
use crate::schema::{Schema, Violation};

/// Where a finding came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FindingKind {
    /// Produced by the JSON Schema engine.
    SchemaViolation,
    /// Produced by a name or path consistency rule.
    StructuralMismatch,
}

/// One problem found in a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Finding {
    /// Dot-joined property path, or `(root)`.
    pub path: String,
    /// Human-readable description.
    pub message: String,
    /// Schema keyword location, for schema violations.
    pub schema_path: Option<String>,
    /// Branch errors behind a failed `anyOf`/`oneOf`.
    pub context: Vec<String>,
    /// Which check produced it.
    pub kind: FindingKind,
}

impl Finding {
    fn structural(path: &str, message: String) -> Self {
        Self {
            path: path.to_string(),
            message,
            schema_path: None,
            context: Vec::new(),
            kind: FindingKind::StructuralMismatch,
        }
    }
}

impl From<Violation> for Finding {
    fn from(v: Violation) -> Self {
        Self {
            path: v.property_path(),
            message: v.message,
            schema_path: Some(v.schema_path),
            context: v.context,
            kind: FindingKind::SchemaViolation,
        }
    }
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.path, self.message)
    }
}

/// Outcome of validating one document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationResult {
    findings: Vec<Finding>,
}

impl ValidationResult {
    /// Build a result from already-ordered findings.
    pub fn from_findings(findings: Vec<Finding>) -> Self {
        Self { findings }
    }

    /// True when nothing was found.
    pub fn is_valid(&self) -> bool {
        self.findings.is_empty()
    }

    /// All findings, schema violations first.
    pub fn findings(&self) -> &[Finding] {
        &self.findings
    }

    /// Number of findings.
    pub fn error_count(&self) -> usize {
        self.findings.len()
    }

    /// Findings produced by structural rules only.
    pub fn structural_findings(&self) -> impl Iterator<Item = &Finding> {
        self.findings
            .iter()
            .filter(|f| f.kind == FindingKind::StructuralMismatch)
    }
}

/// Validate `document` against `schema` only.
pub fn check_schema(document: &EntityDocument, schema: &Schema) -> ValidationResult {
    ValidationResult::from_findings(schema_findings(document, schema))
}

/// Validate `document` against `schema` and the structural rules.
///
/// `expected_name` is the entity's file stem. `reference_root` is the
/// directory a `path` field is resolved against.
pub fn validate(
    document: &EntityDocument,
    schema: &Schema,
    expected_name: &str,
    reference_root: &Path,
) -> ValidationResult {
    let mut findings = schema_findings(document, schema);

    // Only a string can match the stem; `7` in `7.yaml` is still a mismatch.
    let name = document.get("name");
    if !matches!(name, Some(Value::String(s)) if s == expected_name) {
        let shown = match name {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Null) | None => String::new(),
            Some(other) => other.to_string(),
        };
        findings.push(Finding::structural(
            "name",
            format!("Name '{shown}' doesn't match filename '{expected_name}'"),
        ));
    }

    if let Some(referenced) = document.get_str("path").filter(|p| !p.is_empty()) {
        if !reference_root.join(referenced).exists() {
            findings.push(Finding::structural(
                "path",
                format!("Referenced file does not exist: {referenced}"),
            ));
        }
    }

    ValidationResult::from_findings(findings)
}

fn schema_findings(document: &EntityDocument, schema: &Schema) -> Vec<Finding> {
    schema
        .violations(document.as_value())
        .into_iter()
        .map(Finding::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn tool_schema() -> Schema {
        Schema::compile(
            json!({
                "type": "object",
                "required": ["name", "description"],
                "properties": {
                    "name": { "type": "string" },
                    "description": { "type": "string" },
                    "path": { "type": "string" }
                }
            }),
            "tool-schema.json",
        )
        .unwrap()
    }

    fn doc(value: Value) -> EntityDocument {
        match value {
            Value::Object(map) => EntityDocument::new(map),
            _ => panic!("test documents must be objects"),
        }
    }

    #[test]
    fn conforming_document_with_matching_name_is_valid() {
        let result = validate(
            &doc(json!({ "name": "lint", "description": "Lints." })),
            &tool_schema(),
            "lint",
            Path::new("."),
        );
        assert!(result.is_valid(), "{:?}", result.findings());
    }

    #[test]
    fn name_mismatch_names_both_values() {
        let result = validate(
            &doc(json!({ "name": "linter", "description": "Lints." })),
            &tool_schema(),
            "lint",
            Path::new("."),
        );
        assert_eq!(result.error_count(), 1);
        let finding = &result.findings()[0];
        assert_eq!(finding.path, "name");
        assert_eq!(finding.kind, FindingKind::StructuralMismatch);
        assert!(finding.message.contains("'linter'"));
        assert!(finding.message.contains("'lint'"));
    }

    #[test]
    fn missing_name_yields_schema_and_structural_findings() {
        let result = validate(
            &doc(json!({ "description": "Lints." })),
            &tool_schema(),
            "lint",
            Path::new("."),
        );
        let kinds: Vec<FindingKind> = result.findings().iter().map(|f| f.kind).collect();
        assert_eq!(
            kinds,
            vec![FindingKind::SchemaViolation, FindingKind::StructuralMismatch]
        );
        assert_eq!(result.findings()[0].path, "(root)");
        assert_eq!(result.structural_findings().count(), 1);
        assert!(result.findings()[1].message.contains("Name ''"));
    }

    #[test]
    fn non_string_name_is_rendered_as_json() {
        let result = validate(
            &doc(json!({ "name": 7, "description": "x" })),
            &tool_schema(),
            "lint",
            Path::new("."),
        );
        assert!(result
            .structural_findings()
            .any(|f| f.message.contains("Name '7'")));
    }

    #[test]
    fn non_string_name_never_matches_its_stem() {
        for (name, stem) in [(json!(7), "7"), (json!(true), "true")] {
            let result = validate(
                &doc(json!({ "name": name, "description": "x" })),
                &tool_schema(),
                stem,
                Path::new("."),
            );
            let structural: Vec<_> = result.structural_findings().collect();
            assert_eq!(structural.len(), 1);
            assert_eq!(
                structural[0].message,
                format!("Name '{stem}' doesn't match filename '{stem}'")
            );
        }
    }

    #[test]
    fn referenced_path_is_checked_against_reference_root() {
        let root = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(root.path().join("scripts")).unwrap();
        std::fs::write(root.path().join("scripts/lint.sh"), b"#!/bin/sh\n").unwrap();

        let present = validate(
            &doc(json!({ "name": "lint", "description": "x", "path": "scripts/lint.sh" })),
            &tool_schema(),
            "lint",
            root.path(),
        );
        assert!(present.is_valid());

        let missing = validate(
            &doc(json!({ "name": "lint", "description": "x", "path": "scripts/gone.sh" })),
            &tool_schema(),
            "lint",
            root.path(),
        );
        assert_eq!(missing.error_count(), 1);
        assert_eq!(missing.findings()[0].path, "path");
        assert!(missing.findings()[0].message.contains("scripts/gone.sh"));
    }

    #[test]
    fn schema_only_check_skips_structural_rules() {
        let result = check_schema(
            &doc(json!({ "name": "linter", "description": "x", "path": "gone.sh" })),
            &tool_schema(),
        );
        assert!(result.is_valid());
    }

    #[test]
    fn empty_path_is_ignored() {
        let result = validate(
            &doc(json!({ "name": "lint", "description": "x", "path": "" })),
            &tool_schema(),
            "lint",
            Path::new("/definitely/not/here"),
        );
        assert!(result.is_valid());
    }

    #[test]
    fn schema_findings_keep_keyword_location() {
        let result = validate(
            &doc(json!({ "name": "lint", "description": 3 })),
            &tool_schema(),
            "lint",
            Path::new("."),
        );
        let finding = &result.findings()[0];
        assert_eq!(finding.path, "description");
        assert!(finding
            .schema_path
            .as_deref()
            .is_some_and(|p| p.ends_with("/type")));
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    fn name_schema() -> Schema {
        Schema::compile(
            json!({
                "type": "object",
                "required": ["name"],
                "properties": { "name": { "type": "string" } }
            }),
            "schema.json",
        )
        .unwrap()
    }

    fn named(name: &str) -> EntityDocument {
        let mut map = serde_json::Map::new();
        map.insert("name".into(), Value::String(name.into()));
        EntityDocument::new(map)
    }

    proptest! {
        /// A name equal to the file stem never produces findings.
        #[test]
        fn matching_name_is_valid(stem in "[a-z][a-z0-9-]{0,30}") {
            let result = validate(&named(&stem), &name_schema(), &stem, Path::new("."));
            prop_assert!(result.is_valid());
        }

        /// A name that differs from the stem yields exactly one structural
        /// finding naming both values.
        #[test]
        fn mismatched_name_is_one_structural_finding(
            stem in "[a-z][a-z0-9-]{0,20}",
            name in "[a-z][a-z0-9-]{0,20}",
        ) {
            prop_assume!(stem != name);
            let result = validate(&named(&name), &name_schema(), &stem, Path::new("."));
            prop_assert_eq!(result.error_count(), 1);
            let finding = &result.findings()[0];
            prop_assert_eq!(finding.kind, FindingKind::StructuralMismatch);
            let quoted_name = format!("'{}'", name);
            let quoted_stem = format!("'{}'", stem);
            prop_assert!(finding.message.contains(&quoted_name));
            prop_assert!(finding.message.contains(&quoted_stem));
        }
    }
}
