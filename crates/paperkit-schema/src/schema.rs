//! # Schema Loader
//!
//! Loads one JSON Schema (draft-07) from disk and compiles it once. The
//! compiled [`Schema`] is immutable and shared read-only by every entity
//! validated in a run.
//!
//! ## `$ref` Resolution
//!
//! Entity schemas may reference sibling files (`"$ref": "common.json"`).
//! These are resolved from the directory the schema was loaded from. The
//! retriever never touches the network; a reference to a file that does not
//! exist fails schema compilation.
//!
//! ## Branch Detail
//!
//! A failed `anyOf` or `oneOf` only says that no branch matched. Each
//! branch is re-checked against the offending value on its own, and the
//! branch errors are kept as the violation's context.

use std::cmp::Ordering;
use std::fmt;
use std::path::{Path, PathBuf};

use jsonschema::error::ValidationErrorKind;
use jsonschema::{Retrieve, Uri, ValidationError, Validator};
use serde_json::Value;

use crate::error::SchemaError;

/// Path shown for violations that apply to the whole document.
pub const ROOT_PATH: &str = "(root)";

/// Resolves `$ref` URIs to schema files next to the loaded schema.
struct SiblingSchemaRetriever {
    base_dir: PathBuf,
}

impl Retrieve for SiblingSchemaRetriever {
    fn retrieve(
        &self,
        uri: &Uri<&str>,
    ) -> Result<Value, Box<dyn std::error::Error + Send + Sync>> {
        let uri_str = uri.as_str();
        let file_name = uri_str
            .split('#')
            .next()
            .and_then(|without_fragment| without_fragment.rsplit('/').next())
            .unwrap_or(uri_str);

        let candidate = self.base_dir.join(file_name);
        if !candidate.is_file() {
            return Err(format!(
                "cannot resolve $ref {uri_str}: {} does not exist",
                candidate.display()
            )
            .into());
        }

        tracing::debug!(uri = uri_str, file = %candidate.display(), "resolved schema reference");
        let content = std::fs::read_to_string(&candidate)?;
        Ok(serde_json::from_str(&content)?)
    }
}

/// A single schema violation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// Property names (and array indices) from the document root to the
    /// offending value. Empty for whole-document violations.
    pub segments: Vec<String>,
    /// JSON Pointer to the schema keyword that rejected the value.
    pub schema_path: String,
    /// Human-readable description.
    pub message: String,
    /// Errors from each rejected `anyOf`/`oneOf` branch, in branch order.
    pub context: Vec<String>,
}

impl Violation {
    /// Dot-joined property path, or [`ROOT_PATH`] at the top level.
    pub fn property_path(&self) -> String {
        if self.segments.is_empty() {
            ROOT_PATH.to_string()
        } else {
            self.segments.join(".")
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.property_path(), self.message)
    }
}

/// A loaded, compiled JSON Schema.
pub struct Schema {
    path: PathBuf,
    base_dir: PathBuf,
    document: Value,
    validator: Validator,
}

impl fmt::Debug for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Schema")
            .field("path", &self.path)
            .field("title", &self.title())
            .finish()
    }
}

impl Schema {
    /// Compile an already-parsed schema document.
    ///
    /// `path` is used for diagnostics and as the base for `$ref` resolution.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::Compile`] if `document` is not a valid draft-07
    /// schema or one of its references cannot be resolved.
    pub fn compile(document: Value, path: impl Into<PathBuf>) -> Result<Self, SchemaError> {
        let path = path.into();
        let base_dir = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));

        let validator =
            build_validator(&document, &base_dir).map_err(|e| SchemaError::Compile {
                path: path.display().to_string(),
                reason: e.to_string(),
            })?;

        Ok(Self {
            path,
            base_dir,
            document,
            validator,
        })
    }

    /// Path the schema was loaded from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The schema's `title`, if it declares one.
    pub fn title(&self) -> Option<&str> {
        self.document.get("title").and_then(Value::as_str)
    }

    /// Collect every violation of this schema by `instance`, ordered by
    /// property path. Violations sharing a path keep the engine's order.
    pub fn violations(&self, instance: &Value) -> Vec<Violation> {
        let mut violations: Vec<Violation> = self
            .validator
            .iter_errors(instance)
            .map(|e| Violation {
                segments: pointer_segments(&e.instance_path.to_string()),
                schema_path: e.schema_path.to_string(),
                message: e.to_string(),
                context: self.branch_context(&e, instance),
            })
            .collect();
        violations.sort_by(|a, b| compare_segments(&a.segments, &b.segments));
        violations
    }

    /// Errors from every branch of a failed `anyOf`/`oneOf`.
    ///
    /// Each branch is compiled as a copy of the whole schema whose `$ref`
    /// points at the branch, so `definitions` and sibling files still
    /// resolve. Draft-07 ignores every keyword next to `$ref`.
    fn branch_context(&self, error: &ValidationError<'_>, instance: &Value) -> Vec<String> {
        if !matches!(
            error.kind,
            ValidationErrorKind::AnyOf | ValidationErrorKind::OneOfNotValid
        ) {
            return Vec::new();
        }

        let keyword = error.schema_path.to_string();
        let (Some(Value::Array(branches)), Some(target), Value::Object(root)) = (
            self.document.pointer(&keyword),
            instance.pointer(&error.instance_path.to_string()),
            &self.document,
        ) else {
            // Keywords reached through `$ref` have no direct pointer.
            return Vec::new();
        };

        let mut context = Vec::new();
        for index in 0..branches.len() {
            let mut wrapper = root.clone();
            wrapper.insert("$ref".into(), Value::String(format!("#{keyword}/{index}")));
            match build_validator(&Value::Object(wrapper), &self.base_dir) {
                Ok(branch) => context.extend(branch.iter_errors(target).map(|e| e.to_string())),
                Err(e) => {
                    tracing::debug!(
                        keyword = %keyword,
                        index,
                        error = %e,
                        "cannot compile schema branch"
                    );
                    return Vec::new();
                }
            }
        }
        context
    }

    /// True if `instance` satisfies the schema.
    pub fn is_valid(&self, instance: &Value) -> bool {
        self.validator.is_valid(instance)
    }
}

/// Read and compile the schema at `path`.
///
/// # Errors
///
/// - [`SchemaError::NotFound`] if the file does not exist.
/// - [`SchemaError::Parse`] if it is not valid JSON.
/// - [`SchemaError::Compile`] if it is not a valid draft-07 schema.
pub fn load_schema(path: &Path) -> Result<Schema, SchemaError> {
    let content = std::fs::read_to_string(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => SchemaError::NotFound {
            path: path.display().to_string(),
        },
        _ => SchemaError::Io {
            path: path.display().to_string(),
            source: e,
        },
    })?;

    let document: Value = serde_json::from_str(&content).map_err(|e| SchemaError::Parse {
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;

    let schema = Schema::compile(document, path)?;
    tracing::info!(
        path = %path.display(),
        title = schema.title().unwrap_or("-"),
        "loaded schema"
    );
    Ok(schema)
}

fn build_validator(
    document: &Value,
    base_dir: &Path,
) -> Result<Validator, ValidationError<'static>> {
    let mut opts = jsonschema::options();
    opts.with_draft(jsonschema::Draft::Draft7);
    opts.with_retriever(SiblingSchemaRetriever {
        base_dir: base_dir.to_path_buf(),
    });
    opts.build(document)
}

/// Order paths segment by segment, comparing array indices numerically.
fn compare_segments(a: &[String], b: &[String]) -> Ordering {
    for (x, y) in a.iter().zip(b) {
        let ordering = match (x.parse::<usize>(), y.parse::<usize>()) {
            (Ok(x), Ok(y)) => x.cmp(&y),
            _ => x.cmp(y),
        };
        if ordering != Ordering::Equal {
            return ordering;
        }
    }
    a.len().cmp(&b.len())
}

/// Split a JSON Pointer (`/steps/0/name`) into unescaped segments.
fn pointer_segments(pointer: &str) -> Vec<String> {
    if pointer.is_empty() {
        return Vec::new();
    }
    pointer
        .split('/')
        .skip(1)
        .map(|s| s.replace("~1", "/").replace("~0", "~"))
        .collect()
}
