//! # Discovery
//!
//! Finds the entity files a run should validate. Only files directly inside
//! a directory are considered (no recursion), and results are sorted by file
//! name so every run visits entities in the same order.

use std::path::{Path, PathBuf};

/// Files selected for validation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Discovery {
    /// Entity files, in validation order.
    pub targets: Vec<PathBuf>,
    /// Set when a specific entity was requested and does not exist.
    pub not_found: Option<String>,
}

impl Discovery {
    /// True when nothing was selected.
    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }
}

/// Find entity files with `extension` (e.g. `".yaml"`) in `directory`.
///
/// With `specific_name`, returns exactly `<directory>/<name><extension>` if
/// it exists, otherwise no targets and a "not found" notice.
pub fn find_targets(directory: &Path, extension: &str, specific_name: Option<&str>) -> Discovery {
    find_targets_in(std::slice::from_ref(&directory.to_path_buf()), extension, specific_name)
}

/// [`find_targets`] over several directories.
///
/// Each directory's files are sorted on their own and appended in directory
/// order. A specific name resolves to the first directory that has it.
pub fn find_targets_in(
    directories: &[PathBuf],
    extension: &str,
    specific_name: Option<&str>,
) -> Discovery {
    if let Some(name) = specific_name {
        let file_name = format!("{name}{extension}");
        return match directories
            .iter()
            .map(|dir| dir.join(&file_name))
            .find(|candidate| candidate.is_file())
        {
            Some(path) => Discovery {
                targets: vec![path],
                not_found: None,
            },
            None => Discovery {
                targets: Vec::new(),
                not_found: Some(name.to_string()),
            },
        };
    }

    let mut targets = Vec::new();
    for dir in directories {
        targets.extend(list_directory(dir, extension));
    }
    Discovery {
        targets,
        not_found: None,
    }
}

/// File name without its final extension; the entity's expected `name`.
pub fn entity_stem(path: &Path) -> String {
    path.file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or_default()
        .to_string()
}

fn list_directory(dir: &Path, extension: &str) -> Vec<PathBuf> {
    let entries = match std::fs::read_dir(dir) {
        Ok(e) => e,
        Err(e) => {
            tracing::debug!(dir = %dir.display(), error = %e, "skipping unreadable directory");
            return Vec::new();
        }
    };

    let mut files: Vec<PathBuf> = entries
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry.path()),
            Err(e) => {
                tracing::warn!(dir = %dir.display(), error = %e, "failed to read directory entry");
                None
            }
        })
        .filter(|path| path.is_file())
        .filter(|path| {
            path.file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.len() > extension.len() && n.ends_with(extension))
        })
        .collect();

    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    tracing::debug!(dir = %dir.display(), count = files.len(), "discovered entity files");
    files
}
