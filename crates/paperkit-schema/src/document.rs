//! # Target Loader
//!
//! Reads one entity definition from disk and turns it into a JSON mapping
//! the schema engine can check. Two storage shapes are supported, selected
//! by the entity kind's [`DocumentFormat`]:
//!
//! - plain YAML files, where the whole file is the mapping;
//! - markdown files carrying a YAML frontmatter block between two lines
//!   that read `---`.
//!
//! A markdown file without frontmatter is not a load error: it loads as
//! `Ok(None)` and is reported as missing metadata.

use std::path::{Path, PathBuf};

use paperkit_core::DocumentFormat;
use serde_json::{Map, Value};

use crate::error::LoadError;

/// Line that opens and closes a frontmatter block.
pub const FRONTMATTER_DELIMITER: &str = "---";

/// Where an entity document comes from and how to read it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentSource {
    /// The file is a YAML mapping.
    PlainYaml(PathBuf),
    /// The file is markdown with a YAML frontmatter block.
    FrontmatterMarkdown(PathBuf),
}

impl DocumentSource {
    /// Pick the loader variant for `format`.
    pub fn new(format: DocumentFormat, path: impl Into<PathBuf>) -> Self {
        match format {
            DocumentFormat::Yaml => Self::PlainYaml(path.into()),
            DocumentFormat::Frontmatter => Self::FrontmatterMarkdown(path.into()),
        }
    }

    /// Path of the underlying file.
    pub fn path(&self) -> &Path {
        match self {
            Self::PlainYaml(p) | Self::FrontmatterMarkdown(p) => p,
        }
    }

    /// Load the document.
    ///
    /// Returns `Ok(None)` only for markdown without a frontmatter block.
    ///
    /// # Errors
    ///
    /// See [`LoadError`]: missing file, YAML syntax error, non-mapping top
    /// level, or YAML that has no JSON equivalent.
    pub fn load(&self) -> Result<Option<EntityDocument>, LoadError> {
        match self {
            Self::PlainYaml(path) => load_yaml_document(path).map(Some),
            Self::FrontmatterMarkdown(path) => load_frontmatter_document(path),
        }
    }
}

/// One entity definition: a mapping of string keys to JSON values.
#[derive(Debug, Clone, PartialEq)]
pub struct EntityDocument {
    value: Value,
}

impl EntityDocument {
    /// Wrap a JSON object.
    pub fn new(map: Map<String, Value>) -> Self {
        Self {
            value: Value::Object(map),
        }
    }

    /// The document as a JSON value (always an object).
    pub fn as_value(&self) -> &Value {
        &self.value
    }

    /// Look up a top-level field.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.value.get(key)
    }

    /// Top-level field as a string, if present and a string.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_str)
    }
}

/// Load a plain YAML entity file.
///
/// # Errors
///
/// Returns [`LoadError::NotFound`] if the file is absent, [`LoadError::Parse`]
/// on malformed YAML and [`LoadError::NotAMapping`] if the top level is not
/// a mapping (an empty file counts as null).
pub fn load_yaml_document(path: &Path) -> Result<EntityDocument, LoadError> {
    let content = read_entity_file(path)?;
    parse_mapping(&content, path)
}

/// Load the frontmatter block of a markdown entity file.
///
/// # Errors
///
/// Same as [`load_yaml_document`], applied to the frontmatter block.
pub fn load_frontmatter_document(path: &Path) -> Result<Option<EntityDocument>, LoadError> {
    let content = read_entity_file(path)?;
    match extract_frontmatter(&content) {
        Some(block) => parse_mapping(block, path).map(Some),
        None => {
            tracing::debug!(path = %path.display(), "no frontmatter block");
            Ok(None)
        }
    }
}

/// Return the text between the opening `---` line and the next `---` line.
///
/// `None` when the first line is not a delimiter, when there is no closing
/// delimiter, or when the block holds only whitespace.
pub fn extract_frontmatter(content: &str) -> Option<&str> {
    let mut offset = 0usize;
    let mut lines = content.split_inclusive('\n');

    let first = lines.next()?;
    if first.trim() != FRONTMATTER_DELIMITER {
        return None;
    }
    offset += first.len();
    let start = offset;

    for line in lines {
        if line.trim() == FRONTMATTER_DELIMITER {
            let block = &content[start..offset];
            return if block.trim().is_empty() {
                None
            } else {
                Some(block)
            };
        }
        offset += line.len();
    }
    None
}

fn read_entity_file(path: &Path) -> Result<String, LoadError> {
    std::fs::read_to_string(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => LoadError::NotFound {
            path: path.display().to_string(),
        },
        _ => LoadError::Io {
            path: path.display().to_string(),
            source: e,
        },
    })
}

/// Load any YAML file as a JSON value, whatever its top level.
///
/// Used by registry checks, where an empty file is still valid YAML.
///
/// # Errors
///
/// [`LoadError::NotFound`], [`LoadError::Parse`] or [`LoadError::Conversion`].
pub fn load_yaml_value(path: &Path) -> Result<Value, LoadError> {
    let content = read_entity_file(path)?;
    parse_value(&content, path)
}

fn parse_mapping(content: &str, path: &Path) -> Result<EntityDocument, LoadError> {
    match parse_value(content, path)? {
        Value::Object(map) => Ok(EntityDocument::new(map)),
        other => Err(LoadError::NotAMapping {
            path: path.display().to_string(),
            found: json_type_name(&other),
        }),
    }
}

fn parse_value(content: &str, path: &Path) -> Result<Value, LoadError> {
    let yaml: serde_yaml::Value = serde_yaml::from_str(content).map_err(|e| {
        let location = e.location();
        LoadError::Parse {
            path: path.display().to_string(),
            line: location.as_ref().map(|l| l.line()),
            column: location.as_ref().map(|l| l.column()),
            reason: e.to_string(),
        }
    })?;

    yaml_to_json_value(&yaml).map_err(|reason| LoadError::Conversion {
        path: path.display().to_string(),
        reason,
    })
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "empty",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a sequence",
        Value::Object(_) => "a mapping",
    }
}

/// Convert a `serde_yaml::Value` to a `serde_json::Value`.
///
/// Entity definitions only use the JSON-compatible subset of YAML. Tags are
/// dropped; non-string scalar keys are stringified; anything else fails.
pub fn yaml_to_json_value(yaml: &serde_yaml::Value) -> Result<Value, String> {
    match yaml {
        serde_yaml::Value::Null => Ok(Value::Null),
        serde_yaml::Value::Bool(b) => Ok(Value::Bool(*b)),
        serde_yaml::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Ok(Value::Number(serde_json::Number::from(i)))
            } else if let Some(u) = n.as_u64() {
                Ok(Value::Number(serde_json::Number::from(u)))
            } else if let Some(f) = n.as_f64() {
                serde_json::Number::from_f64(f)
                    .map(Value::Number)
                    .ok_or_else(|| format!("cannot represent float {f} in JSON"))
            } else {
                Err(format!("unsupported YAML number: {n:?}"))
            }
        }
        serde_yaml::Value::String(s) => Ok(Value::String(s.clone())),
        serde_yaml::Value::Sequence(seq) => seq
            .iter()
            .map(yaml_to_json_value)
            .collect::<Result<Vec<_>, _>>()
            .map(Value::Array),
        serde_yaml::Value::Mapping(map) => {
            let mut json_map = Map::new();
            for (k, v) in map {
                let key = match k {
                    serde_yaml::Value::String(s) => s.clone(),
                    serde_yaml::Value::Number(n) => n.to_string(),
                    serde_yaml::Value::Bool(b) => b.to_string(),
                    other => return Err(format!("unsupported YAML map key: {other:?}")),
                };
                json_map.insert(key, yaml_to_json_value(v)?);
            }
            Ok(Value::Object(json_map))
        }
        serde_yaml::Value::Tagged(tagged) => yaml_to_json_value(&tagged.value),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frontmatter_between_delimiters() {
        let md = "---\nname: writer\ndescription: Drafts\n---\n# Writer\n\nBody text.\n";
        assert_eq!(
            extract_frontmatter(md),
            Some("name: writer\ndescription: Drafts\n")
        );
    }

    #[test]
    fn frontmatter_tolerates_crlf_and_trailing_space() {
        let md = "--- \r\nname: a\r\n---\r\nbody";
        assert_eq!(extract_frontmatter(md), Some("name: a\r\n"));
    }

    #[test]
    fn no_leading_delimiter_means_no_frontmatter() {
        assert_eq!(extract_frontmatter("# Title\n---\nname: a\n---\n"), None);
        assert_eq!(extract_frontmatter(""), None);
    }

    #[test]
    fn unterminated_or_empty_block_means_no_frontmatter() {
        assert_eq!(extract_frontmatter("---\nname: a\n"), None);
        assert_eq!(extract_frontmatter("---\n\n---\nbody"), None);
    }

    #[test]
    fn delimiter_must_be_whole_line() {
        let md = "---\nname: a\nnote: ----\n---\n";
        assert_eq!(extract_frontmatter(md), Some("name: a\nnote: ----\n"));
    }

    #[test]
    fn yaml_document_loads_as_mapping() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lint.yaml");
        std::fs::write(&path, "name: lint\nversion: 2\nenabled: true\ntags: [a, b]\n").unwrap();

        let doc = load_yaml_document(&path).unwrap();
        assert_eq!(doc.get_str("name"), Some("lint"));
        assert_eq!(doc.get("version"), Some(&Value::from(2)));
        assert_eq!(doc.get("tags").and_then(Value::as_array).map(Vec::len), Some(2));
    }

    #[test]
    fn malformed_yaml_reports_location() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.yaml");
        std::fs::write(&path, "name: [unclosed\n").unwrap();

        match load_yaml_document(&path).unwrap_err() {
            LoadError::Parse { line, .. } => assert!(line.is_some()),
            other => panic!("expected Parse, got {other}"),
        }
    }

    #[test]
    fn missing_file_is_not_found() {
        let err = load_yaml_document(Path::new("/nonexistent/paperkit/x.yaml")).unwrap_err();
        assert!(matches!(err, LoadError::NotFound { .. }));
    }

    #[test]
    fn non_mapping_top_level_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let list = dir.path().join("list.yaml");
        std::fs::write(&list, "- a\n- b\n").unwrap();
        assert!(matches!(
            load_yaml_document(&list).unwrap_err(),
            LoadError::NotAMapping { found: "a sequence", .. }
        ));

        let empty = dir.path().join("empty.yaml");
        std::fs::write(&empty, "").unwrap();
        assert!(matches!(
            load_yaml_document(&empty).unwrap_err(),
            LoadError::NotAMapping { found: "empty", .. }
        ));
    }

    #[test]
    fn source_variant_follows_format() {
        let dir = tempfile::tempdir().unwrap();
        let md = dir.path().join("paper-writer.md");
        std::fs::write(&md, "# No metadata here\n").unwrap();

        let source = DocumentSource::new(DocumentFormat::Frontmatter, &md);
        assert!(matches!(source, DocumentSource::FrontmatterMarkdown(_)));
        assert_eq!(source.load().unwrap(), None);

        std::fs::write(&md, "---\nname: paper-writer\n---\nBody\n").unwrap();
        let doc = source.load().unwrap().unwrap();
        assert_eq!(doc.get_str("name"), Some("paper-writer"));
    }

    #[test]
    fn yaml_keys_and_tags_convert() {
        let yaml: serde_yaml::Value = serde_yaml::from_str("1: one\ntrue: yes\nx: !custom 5\n").unwrap();
        let json = yaml_to_json_value(&yaml).unwrap();
        assert_eq!(json["1"], "one");
        assert_eq!(json["true"], "yes");
        assert_eq!(json["x"], 5);
    }
}
