use crate::i18n::I18n;
use anyhow::{Context, Result};
use std::fs::{self, OpenOptions};
use std::path::{Component, Path, PathBuf};
use tracing::{debug, info};

/// Content used when a resource file is empty or not a PHP array file.
pub const EMPTY_RESOURCE: &str = "<?php\n\n return [ \n];";

const RESOURCE_EXTENSION: &str = "php";

/// A translation resource: the comma-split fragments of its `return [...]` body.
#[derive(Debug, Clone)]
pub struct ResourceFile {
    pub path: PathBuf,
    pub entries: Vec<String>,
    /// Raw text as read from disk.
    pub source: String,
}

impl ResourceFile {
    pub fn load(path: &Path, i18n: &I18n) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| i18n.t_format("error_read_file", &[&path.display().to_string()]))?;
        let resource = Self::from_content(path, content);
        debug!(path = %path.display(), fragments = resource.entries.len(), "loaded resource");
        Ok(resource)
    }

    pub fn from_content(path: &Path, source: String) -> Self {
        Self {
            path: path.to_path_buf(),
            entries: parse_fragments(&source),
            source,
        }
    }

    /// Substring check for `'key'` across all fragments; an empty key never matches.
    pub fn contains_key(&self, key: &str) -> bool {
        if key.is_empty() {
            return false;
        }
        let quoted = format!("'{}'", key);
        self.entries.iter().any(|entry| entry.contains(&quoted))
    }

    pub fn append_entry(&mut self, key: &str, value: &str) {
        self.entries.push(format!("\t'{}' => '{}',", key, value));
    }

    /// Parsed fragments are re-joined with the commas the split removed, so
    /// prior text comes back byte for byte. Appended fragments carry their own
    /// trailing comma and are concatenated as-is.
    pub fn render(&self) -> String {
        let split = self
            .entries
            .iter()
            .position(|entry| entry.contains(','))
            .unwrap_or(self.entries.len());
        let (existing, appended) = self.entries.split_at(split);
        format!(
            "<?php\n\n return [{}{}\n];",
            existing.join(","),
            appended.concat()
        )
    }

    pub fn save(&self, i18n: &I18n) -> Result<()> {
        fs::write(&self.path, self.render())
            .with_context(|| i18n.t_format("error_write_file", &[&self.path.display().to_string()]))?;
        info!(path = %self.path.display(), "resource written");
        Ok(())
    }
}

/// A resource needs the PHP opener, the `return [` header and a closing bracket.
pub fn is_valid_resource(content: &str) -> bool {
    !content.is_empty()
        && content.contains("<?php")
        && content.contains("return [")
        && content.contains(']')
}

/// Split the text between the first `[` and the last `]` on every comma.
///
/// There is no quoting awareness: a value holding a literal comma comes back
/// as two fragments.
pub fn parse_fragments(content: &str) -> Vec<String> {
    let content = if is_valid_resource(content) {
        content
    } else {
        EMPTY_RESOURCE
    };

    let open = content.find('[').map(|i| i + 1).unwrap_or(0);
    let close = content.rfind(']').unwrap_or(content.len());
    let (start, end) = if close < open { (close, open) } else { (open, close) };

    content[start..end].split(',').map(str::to_string).collect()
}

/// `root/subfolder/<file_name>.php`, normalized. Leading separators on the
/// subfolder are ignored so `/lang/en/` stays inside the workspace.
pub fn resolve_resource_path(root: &Path, subfolder: &str, file_name: &str) -> PathBuf {
    let relative = subfolder.trim_start_matches(&['/', '\\'][..]);
    normalize_path(&root.join(relative).join(format!("{}.{}", file_name, RESOURCE_EXTENSION)))
}

/// Resolve the resource path, creating the folder and an empty file when missing.
pub fn prepare_resource_path(
    root: &Path,
    subfolder: &str,
    file_name: &str,
    i18n: &I18n,
) -> Result<PathBuf> {
    let path = resolve_resource_path(root, subfolder, file_name);
    let dir = path.parent().unwrap_or(root).to_path_buf();

    fs::create_dir_all(&dir)
        .with_context(|| i18n.t_format("error_create_directory", &[&dir.display().to_string()]))?;
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| i18n.t_format("error_create_directory", &[&path.display().to_string()]))?;

    debug!(path = %path.display(), "resource path prepared");
    Ok(path)
}

/// Lexical normalization: drops `.` and folds `..` without touching the filesystem.
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if matches!(out.components().next_back(), Some(Component::Normal(_))) {
                    out.pop();
                } else if !out.has_root() {
                    out.push("..");
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}
