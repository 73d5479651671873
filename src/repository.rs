use crate::error::{RankingError, Result};
use crate::types::tool::ToolRecord;
use sha2::{Digest, Sha256};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedRecord {
    pub path: PathBuf,
    pub reason: String,
}

/// Tool records loaded from one data directory.
#[derive(Debug, Clone)]
pub struct ToolCatalog {
    pub tools: Vec<ToolRecord>,
    pub skipped: Vec<SkippedRecord>,
    /// sha256 over every accepted file's relative path and bytes, in load order.
    pub digest: String,
}

impl ToolCatalog {
    pub fn has_skipped(&self) -> bool {
        !self.skipped.is_empty()
    }
}

/// Loads every `*.json` tool record under `root`.
///
/// Hidden entries and the `exclude` directories are not descended into.
/// Unreadable or malformed records and duplicate tool ids are skipped, never fatal.
pub fn load_tools(root: &Path, exclude: &[PathBuf]) -> Result<ToolCatalog> {
    if !root.is_dir() {
        return Err(RankingError::PathNotFound(root.display().to_string()));
    }

    let mut tools = Vec::new();
    let mut skipped = Vec::new();
    let mut seen_ids = HashSet::new();
    let mut hasher = Sha256::new();

    let exclude = exclude
        .iter()
        .map(|dir| resolve(dir))
        .collect::<Vec<_>>();
    let walker = WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| {
            entry.depth() == 0
                || !(is_hidden(entry) || is_excluded(entry, &exclude))
        });

    for entry in walker {
        let entry = entry.map_err(|e| RankingError::Io(e.into()))?;
        if !entry.file_type().is_file()
            || entry.path().extension().and_then(|ext| ext.to_str()) != Some("json")
        {
            continue;
        }

        let path = entry.path();
        let bytes = match std::fs::read(path) {
            Ok(bytes) => bytes,
            Err(err) => {
                skip(&mut skipped, path, format!("unreadable: {err}"));
                continue;
            }
        };
        let record: ToolRecord = match serde_json::from_slice(&bytes) {
            Ok(record) => record,
            Err(err) => {
                skip(&mut skipped, path, format!("malformed record: {err}"));
                continue;
            }
        };
        if record.tool_id().trim().is_empty() {
            skip(&mut skipped, path, "empty tool_id".to_string());
            continue;
        }
        if !seen_ids.insert(record.tool_id().to_string()) {
            skip(
                &mut skipped,
                path,
                format!("duplicate tool_id: {}", record.tool_id()),
            );
            continue;
        }

        let relative = path.strip_prefix(root).unwrap_or(path);
        hasher.update(relative.to_string_lossy().as_bytes());
        hasher.update(&bytes);
        tools.push(record);
    }

    tracing::info!(
        root = %root.display(),
        loaded = tools.len(),
        skipped = skipped.len(),
        "loaded tool catalog"
    );

    let digest = hasher.finalize();
    Ok(ToolCatalog {
        tools,
        skipped,
        digest: format!("{digest:x}"),
    })
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry
        .file_name()
        .to_str()
        .map(|name| name.starts_with('.'))
        .unwrap_or(false)
}

/// Canonical form of `path`, or `path` itself when it does not exist yet.
fn resolve(path: &Path) -> PathBuf {
    std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}

fn is_excluded(entry: &DirEntry, exclude: &[PathBuf]) -> bool {
    if exclude.is_empty() || !entry.file_type().is_dir() {
        return false;
    }
    let path = resolve(entry.path());
    exclude.iter().any(|dir| *dir == path)
}

fn skip(skipped: &mut Vec<SkippedRecord>, path: &Path, reason: String) {
    tracing::warn!(path = %path.display(), %reason, "skipping tool record");
    skipped.push(SkippedRecord {
        path: path.to_path_buf(),
        reason,
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write(dir: &Path, name: &str, body: &str) {
        let path = dir.join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("parent dir should create");
        }
        fs::write(path, body).expect("record should write");
    }

    #[test]
    fn load_tools_rejects_missing_directory() {
        let dir = TempDir::new().expect("temp dir should be created");
        let err = load_tools(&dir.path().join("nope"), &[]).expect_err("missing dir should fail");
        assert!(err.to_string().contains("path does not exist"));
    }

    #[test]
    fn load_tools_reads_nested_records_in_name_order() {
        let dir = TempDir::new().expect("temp dir should be created");
        write(dir.path(), "b.json", r#"{"tool_id":"b","name":"B"}"#);
        write(dir.path(), "nested/a.json", r#"{"tool_id":"a","name":"A"}"#);
        write(dir.path(), "notes.txt", "ignored");

        let catalog = load_tools(dir.path(), &[]).expect("load should succeed");
        let ids = catalog
            .tools
            .iter()
            .map(|tool| tool.tool_id())
            .collect::<Vec<_>>();
        assert_eq!(ids, vec!["b", "a"]);
        assert!(!catalog.has_skipped());
        assert_eq!(catalog.digest.len(), 64);
    }

    #[test]
    fn load_tools_skips_malformed_and_duplicate_records() {
        let dir = TempDir::new().expect("temp dir should be created");
        write(dir.path(), "a.json", r#"{"tool_id":"a","name":"A"}"#);
        write(dir.path(), "b.json", r#"{"tool_id":"a","name":"Again"}"#);
        write(dir.path(), "c.json", "{ not json");
        write(dir.path(), "d.json", r#"{"tool_id":"  ","name":"Blank"}"#);

        let catalog = load_tools(dir.path(), &[]).expect("load should succeed");
        assert_eq!(catalog.tools.len(), 1);
        assert_eq!(catalog.skipped.len(), 3);
        assert!(catalog.skipped[0].reason.contains("duplicate tool_id: a"));
        assert!(catalog.skipped[1].reason.contains("malformed record"));
        assert!(catalog.skipped[2].reason.contains("empty tool_id"));
    }

    #[test]
    fn load_tools_ignores_hidden_and_excluded_directories() {
        let dir = TempDir::new().expect("temp dir should be created");
        write(dir.path(), "a.json", r#"{"tool_id":"a","name":"A"}"#);
        write(dir.path(), ".toolrank/snapshots/rankings-2025-10.json", "{}");
        write(dir.path(), "out/rankings-2025-11.json", "{}");

        let catalog =
            load_tools(dir.path(), &[dir.path().join("out")]).expect("load should succeed");
        assert_eq!(catalog.tools.len(), 1);
        assert!(!catalog.has_skipped());
    }

    #[test]
    fn load_tools_matches_excluded_directory_however_it_is_spelled() {
        let dir = TempDir::new().expect("temp dir should be created");
        write(dir.path(), "a.json", r#"{"tool_id":"a","name":"A"}"#);
        write(dir.path(), "nested/b.json", r#"{"tool_id":"b","name":"B"}"#);
        write(dir.path(), "out/rankings-2025-11.json", "{}");

        let spelled = dir.path().join("nested").join("..").join(".").join("out");
        let catalog = load_tools(dir.path(), &[spelled]).expect("load should succeed");
        assert_eq!(catalog.tools.len(), 2);
        assert!(!catalog.has_skipped());
    }

    #[test]
    fn digest_changes_with_record_content() {
        let dir = TempDir::new().expect("temp dir should be created");
        write(dir.path(), "a.json", r#"{"tool_id":"a","name":"A"}"#);
        let first = load_tools(dir.path(), &[]).expect("load should succeed").digest;

        write(dir.path(), "a.json", r#"{"tool_id":"a","name":"A","github_stars":5}"#);
        let second = load_tools(dir.path(), &[]).expect("load should succeed").digest;
        assert_ne!(first, second);
    }
}
