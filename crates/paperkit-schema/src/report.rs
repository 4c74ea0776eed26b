//! # Reporter
//!
//! Turns per-entity outcomes into the text a user reads and the exit code a
//! CI job sees. Rendering never reorders: entities appear exactly in the
//! order discovery produced them.
//!
//! Two layouts are rendered from the same [`RunSummary`]:
//!
//! - [`render_report`]: the standalone report of a single-kind run, with a
//!   heading, one status line per entity and a summary table.
//! - [`render_section`]: one compact section of the aggregate report.

use std::path::PathBuf;

use paperkit_core::EntityKind;

use crate::validator::{FindingKind, ValidationResult};

const RULE_WIDTH: usize = 70;
const SECTION_RULE_WIDTH: usize = 40;
const NAME_COLUMN_WIDTH: usize = 25;
/// Minimum label column of the summary block; widened for long kind names.
const SUMMARY_LABEL_WIDTH: usize = 16;

/// What happened to one entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntityOutcome {
    /// The document loaded and was checked.
    Validated(ValidationResult),
    /// The document could not be loaded; never reached the validator.
    LoadFailed(String),
    /// Markdown without a frontmatter block.
    MissingMetadata,
    /// A specifically requested entity does not exist.
    NotFound,
}

impl EntityOutcome {
    /// True only for a validated document with no findings.
    pub fn is_pass(&self) -> bool {
        matches!(self, Self::Validated(result) if result.is_valid())
    }

    /// Errors this outcome contributes to the run total. Anything that did
    /// not reach the validator counts as one.
    pub fn error_count(&self) -> usize {
        match self {
            Self::Validated(result) => result.error_count(),
            Self::LoadFailed(_) | Self::MissingMetadata | Self::NotFound => 1,
        }
    }
}

/// One entity's identifier and outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityReport {
    /// File stem; what `name` must equal.
    pub id: String,
    /// File the entity was read from (or would have been).
    pub file: PathBuf,
    /// Result for this entity.
    pub outcome: EntityOutcome,
}

impl EntityReport {
    /// File name for compact listings, falling back to the identifier.
    pub fn file_name(&self) -> String {
        self.file
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.id.clone())
    }
}

/// Results of one run over one entity kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    kind: EntityKind,
    schema_path: PathBuf,
    results: Vec<EntityReport>,
}

impl RunSummary {
    /// Start an empty summary.
    pub fn new(kind: EntityKind, schema_path: impl Into<PathBuf>) -> Self {
        Self {
            kind,
            schema_path: schema_path.into(),
            results: Vec::new(),
        }
    }

    /// Append one entity's outcome.
    pub fn push(&mut self, report: EntityReport) {
        self.results.push(report);
    }

    /// Entity kind this run covered.
    pub fn kind(&self) -> EntityKind {
        self.kind
    }

    /// Schema the run validated against.
    pub fn schema_path(&self) -> &std::path::Path {
        &self.schema_path
    }

    /// Per-entity results in discovery order.
    pub fn results(&self) -> &[EntityReport] {
        &self.results
    }

    /// Number of entities that passed.
    pub fn passed(&self) -> usize {
        self.results.iter().filter(|r| r.outcome.is_pass()).count()
    }

    /// Number of entities that failed for any reason.
    pub fn failed(&self) -> usize {
        self.total() - self.passed()
    }

    /// Number of entities considered.
    pub fn total(&self) -> usize {
        self.results.len()
    }

    /// Sum of all errors across entities.
    pub fn error_count(&self) -> usize {
        self.results
            .iter()
            .filter(|r| !r.outcome.is_pass())
            .map(|r| r.outcome.error_count())
            .sum()
    }

    /// True when nothing failed.
    pub fn is_success(&self) -> bool {
        self.failed() == 0
    }
}

/// How failures map to the process exit code.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ExitPolicy {
    /// Any failure exits `1`.
    #[default]
    Strict,
    /// Failures are reported but the process exits `0`.
    Lenient,
}

impl ExitPolicy {
    /// Pick the policy from the `--ci` / `--lenient` flags. `--ci` only
    /// restates the default.
    pub fn from_flags(ci: bool, lenient: bool) -> Self {
        if lenient && !ci {
            Self::Lenient
        } else {
            Self::Strict
        }
    }

    /// Exit code for a run with `failed` failures.
    pub fn exit_code(self, failed: usize) -> u8 {
        match self {
            Self::Strict if failed > 0 => 1,
            _ => 0,
        }
    }

    /// Exit code when discovery found nothing to validate.
    pub fn empty_run_code(self) -> u8 {
        match self {
            Self::Strict => 1,
            Self::Lenient => 0,
        }
    }
}

/// Render the standalone report of a single-kind run.
///
/// `verbose` adds the schema file line and, under each schema finding, the
/// branch errors of a failed `anyOf`/`oneOf` and the location of the schema
/// keyword that rejected it.
pub fn render_report(summary: &RunSummary, verbose: bool) -> String {
    let kind = summary.kind();
    let rule = "=".repeat(RULE_WIDTH);
    let mut lines = vec![format!("{} Schema Validation", kind.title()), rule.clone()];

    if verbose {
        lines.push(String::new());
        lines.push(format!(
            "Loading schema from: {}",
            summary.schema_path().display()
        ));
    }

    if summary.total() == 0 {
        lines.push(String::new());
        lines.push(format!("No {} files found to validate", kind.label()));
        return finish(lines);
    }

    lines.push(String::new());
    lines.push(format!(
        "Validating {} {}(s)...",
        summary.total(),
        kind.label()
    ));
    lines.push(String::new());

    for report in summary.results() {
        let (icon, status) = match &report.outcome {
            EntityOutcome::Validated(r) if r.is_valid() => ("✓", "VALID"),
            EntityOutcome::Validated(_) | EntityOutcome::LoadFailed(_) => ("✗", "INVALID"),
            EntityOutcome::MissingMetadata => ("⚠", "NO FRONTMATTER"),
            EntityOutcome::NotFound => ("✗", "NOT FOUND"),
        };
        lines.push(format!(
            "{icon} {:width$} {status}",
            report.id,
            width = NAME_COLUMN_WIDTH
        ));

        if report.outcome.is_pass() {
            continue;
        }
        detail_lines(&mut lines, kind, report, verbose);
        lines.push(String::new());
    }

    lines.push(rule);
    lines.push(String::new());
    lines.push("Validation Summary:".to_string());
    let total_label = format!("Total {}:", kind.plural());
    let width = SUMMARY_LABEL_WIDTH.max(total_label.len() + 1);
    for (label, count) in [
        (total_label.as_str(), summary.total()),
        ("Valid:", summary.passed()),
        ("Invalid:", summary.failed()),
        ("Total errors:", summary.error_count()),
    ] {
        lines.push(format!("  {label:width$}{count}"));
    }
    lines.push(String::new());

    if summary.is_success() {
        lines.push(format!("✓ All {} validated successfully", kind.plural()));
    } else {
        lines.push(format!(
            "⚠ Validation failed with {} invalid {}(s)",
            summary.failed(),
            kind.label()
        ));
    }
    finish(lines)
}

/// Render one section of the aggregate report.
pub fn render_section(summary: &RunSummary, verbose: bool) -> String {
    let kind = summary.kind();
    let mut lines = vec![
        String::new(),
        format!("📋 Validating {} Definitions", kind.title()),
        "-".repeat(SECTION_RULE_WIDTH),
    ];

    for report in summary.results() {
        let file_name = report.file_name();
        match &report.outcome {
            EntityOutcome::Validated(r) if r.is_valid() => lines.push(format!("✓ {file_name}")),
            EntityOutcome::MissingMetadata => {
                lines.push(format!("⚠ {file_name}: No YAML frontmatter found"));
            }
            _ => {
                lines.push(format!("✗ {file_name}"));
                detail_lines(&mut lines, kind, report, verbose);
            }
        }
    }

    if summary.total() == 0 {
        lines.push(format!("  No {} files found", kind.label()));
    }
    finish(lines)
}

fn detail_lines(lines: &mut Vec<String>, kind: EntityKind, report: &EntityReport, verbose: bool) {
    match &report.outcome {
        EntityOutcome::Validated(result) => {
            for finding in result.findings() {
                lines.push(format!("  {finding}"));
                if verbose && finding.kind == FindingKind::SchemaViolation {
                    for sub in &finding.context {
                        lines.push(format!("    → {sub}"));
                    }
                    if let Some(schema_path) = &finding.schema_path {
                        lines.push(format!("    → schema: {schema_path}"));
                    }
                }
            }
        }
        EntityOutcome::LoadFailed(reason) => lines.push(format!("  Failed to load: {reason}")),
        EntityOutcome::MissingMetadata => lines.push("  No YAML frontmatter found".to_string()),
        EntityOutcome::NotFound => {
            lines.push(format!("  {} '{}' not found", kind.title(), report.id));
        }
    }
}

fn finish(lines: Vec<String>) -> String {
    let mut out = lines.join("\n");
    out.push('\n');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validator::Finding;

    fn finding(path: &str, message: &str, kind: FindingKind) -> Finding {
        Finding {
            path: path.into(),
            message: message.into(),
            schema_path: (kind == FindingKind::SchemaViolation)
                .then(|| "/required".to_string()),
            context: Vec::new(),
            kind,
        }
    }

    fn entity(id: &str, outcome: EntityOutcome) -> EntityReport {
        EntityReport {
            id: id.into(),
            file: PathBuf::from(format!("/p/{id}.yaml")),
            outcome,
        }
    }

    fn mixed_summary() -> RunSummary {
        let mut summary = RunSummary::new(EntityKind::Agent, "/p/agent-schema.json");
        summary.push(entity("alpha", EntityOutcome::Validated(ValidationResult::default())));
        summary.push(entity(
            "beta",
            EntityOutcome::Validated(ValidationResult::from_findings(vec![
                finding("(root)", "\"description\" is a required property", FindingKind::SchemaViolation),
                finding("name", "Name 'b' doesn't match filename 'beta'", FindingKind::StructuralMismatch),
            ])),
        ));
        summary.push(entity("gamma", EntityOutcome::LoadFailed("invalid YAML".into())));
        summary
    }

    #[test]
    fn counts_follow_outcomes() {
        let summary = mixed_summary();
        assert_eq!(summary.total(), 3);
        assert_eq!(summary.passed(), 1);
        assert_eq!(summary.failed(), 2);
        assert_eq!(summary.error_count(), 3);
        assert!(!summary.is_success());
    }

    #[test]
    fn report_preserves_order_and_lists_errors() {
        let text = render_report(&mixed_summary(), false);
        let alpha = text.find("✓ alpha").unwrap();
        let beta = text.find("✗ beta").unwrap();
        let gamma = text.find("✗ gamma").unwrap();
        assert!(alpha < beta && beta < gamma);
        assert!(text.contains("  [(root)] \"description\" is a required property"));
        assert!(text.contains("  Failed to load: invalid YAML"));
        assert!(text.contains("Total agents:   3"));
        assert!(text.contains("Invalid:        2"));
        assert!(text.contains("Total errors:   3"));
        assert!(text.contains("⚠ Validation failed with 2 invalid agent(s)"));
        assert!(!text.contains("→ schema"));

        let mut workflows = RunSummary::new(EntityKind::Workflow, "/p/workflow-schema.json");
        workflows.push(entity("draft", EntityOutcome::Validated(ValidationResult::default())));
        let text = render_report(&workflows, false);
        assert!(text.contains("  Total workflows: 1"));
        assert!(text.contains("  Valid:           1"));
        assert!(text.contains("  Total errors:    0"));
    }

    #[test]
    fn verbose_report_shows_schema_locations() {
        let text = render_report(&mixed_summary(), true);
        assert!(text.contains("Loading schema from: /p/agent-schema.json"));
        assert!(text.contains("    → schema: /required"));
    }

    #[test]
    fn verbose_report_lists_branch_errors() {
        let mut trigger = finding(
            "trigger",
            "{\"evt\":1} is not valid under any of the schemas listed in the 'anyOf' keyword",
            FindingKind::SchemaViolation,
        );
        trigger.schema_path = Some("/properties/trigger/anyOf".into());
        trigger.context = vec![
            "{\"evt\":1} is not of type \"string\"".into(),
            "\"event\" is a required property".into(),
        ];
        let mut summary = RunSummary::new(EntityKind::Workflow, "/p/workflow-schema.json");
        summary.push(entity(
            "draft",
            EntityOutcome::Validated(ValidationResult::from_findings(vec![trigger])),
        ));

        let text = render_report(&summary, true);
        let string_branch = text.find("    → {\"evt\":1} is not of type \"string\"").unwrap();
        let event_branch = text.find("    → \"event\" is a required property").unwrap();
        let location = text.find("    → schema: /properties/trigger/anyOf").unwrap();
        assert!(string_branch < event_branch && event_branch < location);

        let quiet = render_report(&summary, false);
        assert!(!quiet.contains("\"event\" is a required property"));
    }

    #[test]
    fn empty_run_says_so() {
        let summary = RunSummary::new(EntityKind::Tool, "s.json");
        let text = render_report(&summary, false);
        assert!(text.contains("No tool files found to validate"));
        assert!(summary.is_success());
    }

    #[test]
    fn missing_metadata_and_not_found_count_as_failures() {
        let mut summary = RunSummary::new(EntityKind::Agent, "s.json");
        summary.push(entity("writer", EntityOutcome::MissingMetadata));
        summary.push(entity("ghost", EntityOutcome::NotFound));
        assert_eq!(summary.failed(), 2);
        assert_eq!(summary.error_count(), 2);

        let text = render_report(&summary, false);
        assert!(text.contains("⚠ writer"));
        assert!(text.contains("Agent 'ghost' not found"));
    }

    #[test]
    fn section_uses_file_names() {
        let text = render_section(&mixed_summary(), false);
        assert!(text.contains("📋 Validating Agent Definitions"));
        assert!(text.contains("✓ alpha.yaml"));
        assert!(text.contains("✗ gamma.yaml"));
    }

    #[test]
    fn exit_policy() {
        assert_eq!(ExitPolicy::from_flags(false, false), ExitPolicy::Strict);
        assert_eq!(ExitPolicy::from_flags(true, false), ExitPolicy::Strict);
        assert_eq!(ExitPolicy::from_flags(false, true), ExitPolicy::Lenient);
        assert_eq!(ExitPolicy::Strict.exit_code(0), 0);
        assert_eq!(ExitPolicy::Strict.exit_code(2), 1);
        assert_eq!(ExitPolicy::Lenient.exit_code(2), 0);
        assert_eq!(ExitPolicy::Strict.empty_run_code(), 1);
        assert_eq!(ExitPolicy::Lenient.empty_run_code(), 0);
    }
}
