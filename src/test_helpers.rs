//! Shared test utilities for building throwaway content trees.
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let tmp = TempDir::new().unwrap();
//! write_file(tmp.path(), "snippets/git.md", &doc(&["git"], Some("/git.png"), "# Git"));
//! write_site_config(tmp.path(), &[("/snippets/", &["git.md"])]);
//! ```

use crate::config::{DocdexConfig, TagDefinition};
use crate::scan::ContentFile;
use std::fs;
use std::path::Path;

/// Write `contents` to `root/rel`, creating parent directories.
pub fn write_file(root: &Path, rel: &str, contents: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, contents).unwrap();
}

/// Read `root/rel` to a string. Panics with the path on failure.
pub fn read_file(root: &Path, rel: &str) -> String {
    fs::read_to_string(root.join(rel)).unwrap_or_else(|e| panic!("read {rel}: {e}"))
}

/// A markdown document with a frontmatter block.
pub fn doc(tags: &[&str], cover: Option<&str>, body: &str) -> String {
    let mut out = String::from("---\n");
    out.push_str(&format!("tags: [{}]\n", tags.join(", ")));
    if let Some(cover) = cover {
        out.push_str(&format!("cover: {cover}\n"));
    }
    out.push_str("---\n\n");
    out.push_str(body);
    out.push('\n');
    out
}

/// Write `.vuepress/config.json` with the given sidebar entries.
pub fn write_site_config(root: &Path, sidebar: &[(&str, &[&str])]) {
    let mut entries = serde_json::Map::new();
    for (key, files) in sidebar {
        entries.insert(key.to_string(), serde_json::json!(files));
    }
    let config = serde_json::json!({
        "title": "Docs",
        "themeConfig": {
            "nav": [{ "text": "Home", "link": "/" }],
            "sidebar": entries,
        },
    });
    write_file(
        root,
        ".vuepress/config.json",
        &serde_json::to_string_pretty(&config).unwrap(),
    );
}

/// Config with the given tags and folders, theme step disabled.
pub fn test_config(tags: &[&str], folders: &[&str]) -> DocdexConfig {
    let mut config = DocdexConfig::default();
    config.tags.definitions = tags
        .iter()
        .map(|t| TagDefinition::new(t, &format!("All about {t}.")))
        .collect();
    config.sections.readme = folders.iter().map(|f| f.to_string()).collect();
    config.sections.sidebar = folders.iter().map(|f| f.to_string()).collect();
    config.theme.enabled = false;
    config
}

/// Relative paths of scanned files, in order.
pub fn paths(files: &[ContentFile]) -> Vec<&str> {
    files.iter().map(|f| f.path.as_str()).collect()
}

/// Find a scanned file by path. Panics if not found.
pub fn find_file<'a>(files: &'a [ContentFile], path: &str) -> &'a ContentFile {
    files.iter().find(|f| f.path == path).unwrap_or_else(|| {
        panic!("file '{path}' not found. Available: {:?}", paths(files))
    })
}
