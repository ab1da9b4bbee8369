//! Sidebar maintenance inside the site configuration.
//!
//! The site configuration is a JSON document with the sidebar at a
//! configurable pointer (`/themeConfig/sidebar` by default):
//!
//! ```json
//! {
//!   "themeConfig": {
//!     "sidebar": {
//!       "/snippets/": ["shell.md", "git.md"],
//!       "/replies/": ["thanks.md"]
//!     }
//!   }
//! }
//! ```
//!
//! Authors reorder entries by hand. A rewrite keeps their order for files
//! that still exist, drops removed files, and appends new ones in listing
//! order. Keys the build does not track are left alone, as is every other
//! part of the document; the file is re-serialized pretty-printed.
//!
//! When the pointer does not resolve to an object the file is not touched
//! and the step reports a warning.

use crate::config::DocdexConfig;
use crate::naming;
use crate::scan::{self, ScanError};
use crate::types::StepOutput;
use serde_json::Value;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SidebarError {
    #[error(transparent)]
    Scan(#[from] ScanError),
    #[error("failed to read site config {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("site config {} is not valid JSON: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to write site config {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("JSON encoding failed: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Ordered folder key → ordered file names.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SidebarMap {
    entries: Vec<(String, Vec<String>)>,
}

impl SidebarMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read a sidebar object. Entries that are not arrays, and array items
    /// that are not strings, carry no ordering and are skipped.
    pub fn from_json(value: &Value) -> Self {
        let mut map = Self::new();
        if let Some(object) = value.as_object() {
            for (key, files) in object {
                if let Some(items) = files.as_array() {
                    let names = items
                        .iter()
                        .filter_map(|item| item.as_str().map(String::from))
                        .collect();
                    map.insert(key.clone(), names);
                }
            }
        }
        map
    }

    pub fn get(&self, key: &str) -> Option<&[String]> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, files)| files.as_slice())
    }

    /// Replace an entry in place, or append it.
    pub fn insert(&mut self, key: String, files: Vec<String>) {
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => *existing = files,
            None => self.entries.push((key, files)),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Merge the current listing into a prior manual ordering.
///
/// - files in `prior` that are still present keep their relative order
/// - files only in `current` follow, in `current` order
/// - files no longer present are dropped
pub fn merge_order(prior: &[String], current: &[String]) -> Vec<String> {
    let present: HashSet<&str> = current.iter().map(String::as_str).collect();
    let mut seen: HashSet<&str> = HashSet::new();
    let mut merged = Vec::with_capacity(current.len());

    for name in prior.iter().chain(current) {
        if present.contains(name.as_str()) && seen.insert(name.as_str()) {
            merged.push(name.clone());
        }
    }
    merged
}

/// Result of a rewrite.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RewriteOutcome {
    /// The file was rewritten; holds the tracked entries written.
    Updated(SidebarMap),
    /// The pointer did not resolve to an object; the file is unchanged.
    BlockNotFound,
}

fn config_path(root: &Path, config: &DocdexConfig) -> PathBuf {
    root.join(&config.sidebar.config_file)
}

fn load_document(path: &Path) -> Result<Value, SidebarError> {
    let text = fs::read_to_string(path).map_err(|source| SidebarError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| SidebarError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// The sidebar as currently stored, or `None` when the pointer is missing.
pub fn read_sidebar(root: &Path, config: &DocdexConfig) -> Result<Option<SidebarMap>, SidebarError> {
    let doc = load_document(&config_path(root, config))?;
    Ok(doc
        .pointer(&config.sidebar.pointer)
        .filter(|v| v.is_object())
        .map(SidebarMap::from_json))
}

/// Current entries for `folders`, ordered against `prior`.
pub fn compute(
    root: &Path,
    folders: &[String],
    prior: &SidebarMap,
    index_file: &str,
) -> Result<SidebarMap, ScanError> {
    let mut map = SidebarMap::new();
    for folder in folders {
        let key = naming::sidebar_key(folder);
        let current = scan::list_section(root, folder, index_file)?;
        let merged = merge_order(prior.get(&key).unwrap_or_default(), &current);
        map.insert(key, merged);
    }
    Ok(map)
}

/// Recompute the tracked entries and write them into the site config.
pub fn rewrite(root: &Path, folders: &[String], config: &DocdexConfig) -> Result<RewriteOutcome, SidebarError> {
    let path = config_path(root, config);
    let mut doc = load_document(&path)?;

    let Some(sidebar) = doc
        .pointer_mut(&config.sidebar.pointer)
        .and_then(Value::as_object_mut)
    else {
        return Ok(RewriteOutcome::BlockNotFound);
    };

    let prior = SidebarMap::from_json(&Value::Object(sidebar.clone()));
    let updated = compute(root, folders, &prior, &config.content.index_file)?;
    for (key, files) in updated.iter() {
        sidebar.insert(key.to_string(), Value::from(files.to_vec()));
    }

    let mut text = serde_json::to_string_pretty(&doc)?;
    text.push('\n');
    fs::write(&path, text).map_err(|source| SidebarError::Write {
        path: path.clone(),
        source,
    })?;
    Ok(RewriteOutcome::Updated(updated))
}

pub fn run(root: &Path, folders: &[String], config: &DocdexConfig) -> Result<StepOutput, SidebarError> {
    let mut output = StepOutput::default();
    match rewrite(root, folders, config)? {
        RewriteOutcome::Updated(_) => output.written.push(PathBuf::from(&config.sidebar.config_file)),
        RewriteOutcome::BlockNotFound => output.warn(format!(
            "no sidebar object at '{}' in {}; left unchanged",
            config.sidebar.pointer, config.sidebar.config_file
        )),
    }
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::*;
    use tempfile::TempDir;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn merge_appends_new_files() {
        let merged = merge_order(&names(&["a", "b"]), &names(&["a", "b", "c"]));
        assert_eq!(merged, names(&["a", "b", "c"]));
    }

    #[test]
    fn merge_drops_removed_files() {
        let merged = merge_order(&names(&["a", "b"]), &names(&["b", "c"]));
        assert_eq!(merged, names(&["b", "c"]));
    }

    #[test]
    fn merge_keeps_manual_order() {
        let merged = merge_order(&names(&["c", "a"]), &names(&["a", "b", "c"]));
        assert_eq!(merged, names(&["c", "a", "b"]));
    }

    #[test]
    fn merge_without_prior_uses_listing() {
        let merged = merge_order(&[], &names(&["b", "a"]));
        assert_eq!(merged, names(&["b", "a"]));
    }

    #[test]
    fn merge_collapses_duplicates() {
        let merged = merge_order(&names(&["a", "a"]), &names(&["a"]));
        assert_eq!(merged, names(&["a"]));
    }

    #[test]
    fn sidebar_map_insert_replaces_in_place() {
        let mut map = SidebarMap::new();
        map.insert("/a/".into(), names(&["1"]));
        map.insert("/b/".into(), names(&["2"]));
        map.insert("/a/".into(), names(&["3"]));
        let keys: Vec<&str> = map.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["/a/", "/b/"]);
        assert_eq!(map.get("/a/"), Some(&names(&["3"])[..]));
    }

    #[test]
    fn from_json_skips_non_arrays() {
        let value = serde_json::json!({
            "/a/": ["x.md", 3, "y.md"],
            "/": "auto",
        });
        let map = SidebarMap::from_json(&value);
        assert_eq!(map.len(), 1);
        assert_eq!(map.get("/a/"), Some(&names(&["x.md", "y.md"])[..]));
    }

    #[test]
    fn rewrite_preserves_order_and_appends() {
        let tmp = TempDir::new().unwrap();
        for f in ["a.md", "b.md", "c.md"] {
            write_file(tmp.path(), &format!("snippets/{f}"), "# x\n");
        }
        write_site_config(tmp.path(), &[("/snippets/", &["b.md", "a.md", "gone.md"])]);
        let config = test_config(&[], &["snippets"]);

        let outcome = rewrite(tmp.path(), &config.sections.sidebar, &config).unwrap();
        let RewriteOutcome::Updated(map) = outcome else {
            panic!("expected update");
        };
        assert_eq!(map.get("/snippets/"), Some(&names(&["b.md", "a.md", "c.md"])[..]));

        let stored = read_sidebar(tmp.path(), &config).unwrap().unwrap();
        assert_eq!(stored.get("/snippets/"), map.get("/snippets/"));
    }

    #[test]
    fn rewrite_keeps_untracked_keys_and_other_settings() {
        let tmp = TempDir::new().unwrap();
        write_file(tmp.path(), "snippets/a.md", "# a\n");
        write_site_config(tmp.path(), &[("/legacy/", &["old.md"]), ("/snippets/", &[])]);
        let config = test_config(&[], &["snippets"]);

        rewrite(tmp.path(), &config.sections.sidebar, &config).unwrap();
        let doc: Value = serde_json::from_str(&read_file(tmp.path(), ".vuepress/config.json")).unwrap();
        assert_eq!(doc["title"], "Docs");
        assert_eq!(doc["themeConfig"]["nav"][0]["text"], "Home");
        assert_eq!(doc["themeConfig"]["sidebar"]["/legacy/"], serde_json::json!(["old.md"]));

        let keys: Vec<&String> = doc["themeConfig"]["sidebar"].as_object().unwrap().keys().collect();
        assert_eq!(keys, vec!["/legacy/", "/snippets/"]);
    }

    #[test]
    fn rewrite_adds_new_tracked_keys_at_end() {
        let tmp = TempDir::new().unwrap();
        write_file(tmp.path(), "b/x.md", "# x\n");
        write_file(tmp.path(), "a/y.md", "# y\n");
        write_site_config(tmp.path(), &[("/b/", &["x.md"])]);
        let config = test_config(&[], &["a", "b"]);

        rewrite(tmp.path(), &config.sections.sidebar, &config).unwrap();
        let stored = read_sidebar(tmp.path(), &config).unwrap().unwrap();
        let keys: Vec<&str> = stored.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["/b/", "/a/"]);
    }

    #[test]
    fn missing_block_leaves_file_untouched() {
        let tmp = TempDir::new().unwrap();
        write_file(tmp.path(), "snippets/a.md", "# a\n");
        let original = "{\"title\": \"Docs\", \"themeConfig\": {}}";
        write_file(tmp.path(), ".vuepress/config.json", original);
        let config = test_config(&[], &["snippets"]);

        let outcome = rewrite(tmp.path(), &config.sections.sidebar, &config).unwrap();
        assert_eq!(outcome, RewriteOutcome::BlockNotFound);
        assert_eq!(read_file(tmp.path(), ".vuepress/config.json"), original);

        let output = run(tmp.path(), &config.sections.sidebar, &config).unwrap();
        assert!(output.written.is_empty());
        assert_eq!(output.warnings.len(), 1);
    }

    #[test]
    fn invalid_json_is_error_with_path() {
        let tmp = TempDir::new().unwrap();
        write_file(tmp.path(), ".vuepress/config.json", "module.exports = {}");
        let config = test_config(&[], &[]);

        let err = rewrite(tmp.path(), &[], &config).unwrap_err();
        assert!(matches!(err, SidebarError::Parse { .. }));
        assert!(err.to_string().contains("config.json"));
    }

    #[test]
    fn missing_section_folder_is_error() {
        let tmp = TempDir::new().unwrap();
        write_site_config(tmp.path(), &[]);
        let config = test_config(&[], &["replies"]);

        let err = rewrite(tmp.path(), &config.sections.sidebar, &config).unwrap_err();
        assert!(matches!(err, SidebarError::Scan(ScanError::MissingDirectory(_))));
    }

    #[test]
    fn rewrite_is_idempotent() {
        let tmp = TempDir::new().unwrap();
        write_file(tmp.path(), "snippets/a.md", "# a\n");
        write_file(tmp.path(), "snippets/b.md", "# b\n");
        write_site_config(tmp.path(), &[("/snippets/", &["b.md"])]);
        let config = test_config(&[], &["snippets"]);

        rewrite(tmp.path(), &config.sections.sidebar, &config).unwrap();
        let first = read_file(tmp.path(), ".vuepress/config.json");
        rewrite(tmp.path(), &config.sections.sidebar, &config).unwrap();
        assert_eq!(read_file(tmp.path(), ".vuepress/config.json"), first);
    }
}
