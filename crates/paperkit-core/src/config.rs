//! # Configuration Resolution
//!
//! Works out, once per process, which schema file and which directories a
//! validation run should use. Precedence is command-line flag, then
//! environment variable, then the project default under `.paper/`.
//!
//! Environment lookups go through a caller-supplied function so resolution
//! stays deterministic under test; the binary passes [`process_env`].

use std::path::{Path, PathBuf};

use crate::error::ConfigError;
use crate::kind::{DocumentFormat, EntityKind};

/// Directory that marks a PaperKit project root.
pub const PAPER_DIR: &str = ".paper";

/// Launcher script that also marks a project root.
pub const ROOT_MARKER_FILE: &str = "paperkit";

/// Read an environment variable, treating empty values as unset.
pub fn process_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.is_empty())
}

/// Walk up from `start` looking for a directory containing `.paper/` or a
/// `paperkit` file.
pub fn find_project_root(start: &Path) -> Option<PathBuf> {
    let mut dir = start;
    loop {
        if dir.join(PAPER_DIR).is_dir() || dir.join(ROOT_MARKER_FILE).is_file() {
            return Some(dir.to_path_buf());
        }
        dir = dir.parent()?;
    }
}

/// Resolve the project root for this process.
///
/// An explicit root (from `--project-root`) is trusted as given. Otherwise
/// the search starts at the current directory.
///
/// # Errors
///
/// Returns [`ConfigError::ProjectRootNotFound`] when no marker is found, and
/// [`ConfigError::Io`] when the current directory cannot be read.
pub fn locate_project_root(explicit: Option<&Path>) -> Result<PathBuf, ConfigError> {
    if let Some(root) = explicit {
        return Ok(root.to_path_buf());
    }
    let cwd = std::env::current_dir()?;
    find_project_root(&cwd).ok_or_else(|| ConfigError::ProjectRootNotFound {
        start: cwd.display().to_string(),
    })
}

/// Well-known locations inside a PaperKit project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectLayout {
    root: PathBuf,
}

impl ProjectLayout {
    /// Wrap a resolved project root.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The project root itself.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// `.paper/_cfg`, home of schemas, manifests and per-kind registries.
    pub fn cfg_dir(&self) -> PathBuf {
        self.root.join(PAPER_DIR).join("_cfg")
    }

    /// Default schema path for `kind`.
    pub fn schema_path(&self, kind: EntityKind) -> PathBuf {
        self.cfg_dir().join("schemas").join(kind.schema_file_name())
    }

    /// Default directory for single-kind validation of `kind`.
    pub fn entity_dir(&self, kind: EntityKind) -> PathBuf {
        self.cfg_dir().join(kind.plural())
    }

    /// Directories the aggregate validator scans for `kind`, in report order.
    pub fn aggregate_dirs(&self, kind: EntityKind) -> Vec<PathBuf> {
        let paper = self.root.join(PAPER_DIR);
        match kind {
            EntityKind::Agent => vec![
                paper.join("core").join("agents"),
                paper.join("specialist").join("agents"),
            ],
            EntityKind::Workflow => vec![
                paper.join("core").join("workflows"),
                paper.join("specialist").join("workflows"),
                self.cfg_dir().join("workflows"),
            ],
            EntityKind::Tool | EntityKind::Command => vec![self.entity_dir(kind)],
        }
    }

    /// Document format the aggregate validator expects for `kind`.
    ///
    /// Agents in the aggregate tree are markdown personas with frontmatter;
    /// everything else is plain YAML.
    pub fn aggregate_format(&self, kind: EntityKind) -> DocumentFormat {
        match kind {
            EntityKind::Agent => DocumentFormat::Frontmatter,
            _ => DocumentFormat::Yaml,
        }
    }

    /// Path of a manifest file under `.paper/_cfg/`.
    pub fn manifest_path(&self, file_name: &str) -> PathBuf {
        self.cfg_dir().join(file_name)
    }

    /// Copilot agent mirror directory.
    pub fn copilot_agents_dir(&self) -> PathBuf {
        self.root.join(".github").join("agents")
    }

    /// Codex prompt mirror directory.
    pub fn codex_prompts_dir(&self) -> PathBuf {
        self.root.join(".codex").join("prompts")
    }

    /// Default system registry directory.
    pub fn registry_dir(&self) -> PathBuf {
        self.root.join(".copilot")
    }
}

/// Per-run overrides collected from the command line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntityOverrides {
    /// `--schema PATH`.
    pub schema: Option<PathBuf>,
    /// `--<entity>s-dir PATH`.
    pub dir: Option<PathBuf>,
    /// `--format yaml|frontmatter`.
    pub format: Option<DocumentFormat>,
}

/// Fully resolved, immutable configuration for validating one entity kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityConfig {
    /// Which kind of entity is being validated.
    pub kind: EntityKind,
    /// Schema every entity of this kind is checked against.
    pub schema_path: PathBuf,
    /// Directories scanned for entity files, in report order.
    pub entity_dirs: Vec<PathBuf>,
    /// How entity files are stored.
    pub format: DocumentFormat,
    /// Root that a document's `path` field is resolved against.
    pub reference_root: PathBuf,
    /// Apply the name-matches-file and referenced-path rules on top of the
    /// schema.
    pub structural_rules: bool,
}

impl EntityConfig {
    /// Resolve configuration for single-kind validation.
    ///
    /// `root` may be `None` when the caller could not find a project root;
    /// that is only an error if a default path is actually needed.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ProjectRootNotFound`] when neither a flag nor
    /// an environment variable supplies a path and there is no root to
    /// derive the default from.
    pub fn resolve<F>(
        kind: EntityKind,
        root: Option<&Path>,
        overrides: &EntityOverrides,
        env: F,
    ) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let layout = root.map(ProjectLayout::new);
        let missing_root = || ConfigError::ProjectRootNotFound {
            start: ".".to_string(),
        };

        let schema_path = match &overrides.schema {
            Some(path) => path.clone(),
            None => match kind.schema_env_vars().iter().find_map(|var| env(var)) {
                Some(value) => PathBuf::from(value),
                None => layout
                    .as_ref()
                    .map(|l| l.schema_path(kind))
                    .ok_or_else(missing_root)?,
            },
        };

        let entity_dir = match &overrides.dir {
            Some(path) => path.clone(),
            None => match env(kind.dir_env_var()) {
                Some(value) => PathBuf::from(value),
                None => layout
                    .as_ref()
                    .map(|l| l.entity_dir(kind))
                    .ok_or_else(missing_root)?,
            },
        };

        let reference_root = root.map(Path::to_path_buf).unwrap_or_else(|| PathBuf::from("."));

        tracing::debug!(
            kind = %kind,
            schema = %schema_path.display(),
            dir = %entity_dir.display(),
            "resolved entity configuration"
        );

        Ok(Self {
            kind,
            schema_path,
            entity_dirs: vec![entity_dir],
            format: overrides.format.unwrap_or(DocumentFormat::Yaml),
            reference_root,
            structural_rules: true,
        })
    }

    /// Configuration the aggregate validator uses for `kind`.
    ///
    /// Aggregate runs ignore environment overrides: they always describe
    /// the project tree as laid out on disk. Only the schema is checked;
    /// persona files are named after their install target, not their `name`.
    pub fn aggregate(kind: EntityKind, layout: &ProjectLayout) -> Self {
        Self {
            kind,
            schema_path: layout.schema_path(kind),
            entity_dirs: layout.aggregate_dirs(kind),
            format: layout.aggregate_format(kind),
            reference_root: layout.root().to_path_buf(),
            structural_rules: false,
        }
    }
}
