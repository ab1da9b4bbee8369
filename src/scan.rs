//! Content discovery and frontmatter extraction.
//!
//! The first thing every step does: find the markdown files it works on and
//! read their metadata. Nothing is cached between steps; each one calls back
//! in here and sees the filesystem as it is at that moment.
//!
//! ## Directory Structure
//!
//! ```text
//! docs/                        # Content root
//! ├── docdex.toml              # Build configuration (optional)
//! ├── README.md                # Ignored everywhere by default
//! ├── .vuepress/               # Hidden: never scanned
//! │   └── config.json
//! ├── snippets/                # Section (tracked in config)
//! │   ├── README.md            # Generated index page
//! │   ├── git-aliases.md
//! │   └── shell.md
//! └── tags/                    # Generated tag pages
//! ```
//!
//! ## Ordering
//!
//! Both [`scan`] and [`list_section`] return entries sorted by file name, so
//! every derived page comes out identical for identical input.

use crate::config::ContentConfig;
use crate::frontmatter::{self, Frontmatter, FrontmatterBlock};
use crate::naming;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::{DirEntry, WalkDir};

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("walk error: {0}")]
    Walk(#[from] walkdir::Error),
    #[error("expected content directory is missing: {}", .0.display())]
    MissingDirectory(PathBuf),
}

/// How a file's frontmatter block looked when it was read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MetadataStatus {
    Absent,
    Parsed,
    Malformed(String),
}

/// A markdown file under the content root.
#[derive(Debug, Clone)]
pub struct ContentFile {
    /// Path relative to the content root, `/`-separated.
    pub path: String,
    /// Raw file contents.
    pub text: String,
    /// Parsed metadata; empty when the block is absent or malformed.
    pub frontmatter: Frontmatter,
    pub status: MetadataStatus,
}

impl ContentFile {
    /// Build a record from text already in memory.
    pub fn from_text(path: impl Into<String>, text: String) -> Self {
        let (frontmatter, status) = match frontmatter::parse(&text) {
            FrontmatterBlock::Absent => (Frontmatter::default(), MetadataStatus::Absent),
            FrontmatterBlock::Parsed(fm) => (fm, MetadataStatus::Parsed),
            FrontmatterBlock::Malformed(msg) => {
                (Frontmatter::default(), MetadataStatus::Malformed(msg))
            }
        };
        Self {
            path: path.into(),
            text,
            frontmatter,
            status,
        }
    }

    /// Read a file relative to `root`.
    pub fn read(root: &Path, rel_path: &str) -> Result<Self, ScanError> {
        let full = root.join(rel_path);
        let text = fs::read_to_string(&full).map_err(|source| ScanError::Read {
            path: full.clone(),
            source,
        })?;
        let file = Self::from_text(rel_path, text);
        if let MetadataStatus::Malformed(msg) = &file.status {
            tracing::warn!(path = %file.path, "malformed frontmatter, treating as empty: {msg}");
        }
        Ok(file)
    }

    pub fn has_cover(&self) -> bool {
        self.frontmatter.cover.is_some()
    }

    /// File name without directories.
    pub fn file_name(&self) -> &str {
        self.path.rsplit('/').next().unwrap_or(&self.path)
    }
}

/// Scan every markdown file under `root`.
///
/// Skips hidden entries and anything whose basename is in `config.ignore`;
/// ignored directories are not descended into.
pub fn scan(root: &Path, config: &ContentConfig) -> Result<Vec<ContentFile>, ScanError> {
    if !root.is_dir() {
        return Err(ScanError::MissingDirectory(root.to_path_buf()));
    }

    let mut files = Vec::new();
    let walker = WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !is_ignored(e, config));

    for entry in walker {
        let entry = entry?;
        if !entry.file_type().is_file() || !is_markdown(entry.path()) {
            continue;
        }
        let rel = entry
            .path()
            .strip_prefix(root)
            .map(naming::to_slash)
            .unwrap_or_else(|_| naming::to_slash(entry.path()));
        tracing::debug!(path = %rel, "scanning");
        files.push(ContentFile::read(root, &rel)?);
    }

    Ok(files)
}

fn is_ignored(entry: &DirEntry, config: &ContentConfig) -> bool {
    let name = entry.file_name().to_string_lossy();
    name.starts_with('.') || config.ignore.iter().any(|ignored| *ignored == name)
}

fn is_markdown(path: &Path) -> bool {
    path.extension()
        .is_some_and(|e| e.eq_ignore_ascii_case("md"))
}

/// Markdown file names directly inside a section folder, minus its index page.
///
/// A missing folder means the content tree and the config disagree, which
/// is reported as [`ScanError::MissingDirectory`].
pub fn list_section(root: &Path, folder: &str, index_file: &str) -> Result<Vec<String>, ScanError> {
    let dir = root.join(folder);
    if !dir.is_dir() {
        return Err(ScanError::MissingDirectory(dir));
    }

    let entries = fs::read_dir(&dir).map_err(|source| ScanError::Read {
        path: dir.clone(),
        source,
    })?;

    let mut names = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|source| ScanError::Read {
            path: dir.clone(),
            source,
        })?;
        let path = entry.path();
        let name = entry.file_name().to_string_lossy().to_string();
        if path.is_file() && is_markdown(&path) && name != index_file && !name.starts_with('.') {
            names.push(name);
        }
    }

    names.sort();
    Ok(names)
}

/// Read every listed file of a section, in listing order.
pub fn read_section(root: &Path, folder: &str, index_file: &str) -> Result<Vec<ContentFile>, ScanError> {
    list_section(root, folder, index_file)?
        .iter()
        .map(|name| ContentFile::read(root, &format!("{}/{}", folder.trim_matches('/'), name)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::*;
    use tempfile::TempDir;

    #[test]
    fn scan_finds_markdown_recursively() {
        let tmp = TempDir::new().unwrap();
        write_file(tmp.path(), "snippets/git.md", "# Git\n");
        write_file(tmp.path(), "snippets/deep/nested.md", "# Nested\n");
        write_file(tmp.path(), "top.md", "# Top\n");
        write_file(tmp.path(), "snippets/image.png", "not markdown");

        let files = scan(tmp.path(), &ContentConfig::default()).unwrap();
        assert_eq!(
            paths(&files),
            vec!["snippets/deep/nested.md", "snippets/git.md", "top.md"]
        );
    }

    #[test]
    fn scan_skips_ignored_and_hidden() {
        let tmp = TempDir::new().unwrap();
        write_file(tmp.path(), "README.md", "# Root\n");
        write_file(tmp.path(), "snippets/README.md", "# Index\n");
        write_file(tmp.path(), ".vuepress/theme.md", "# Theme\n");
        write_file(tmp.path(), "node_modules/pkg/readme.md", "# Pkg\n");
        write_file(tmp.path(), "snippets/kept.md", "# Kept\n");

        let files = scan(tmp.path(), &ContentConfig::default()).unwrap();
        assert_eq!(paths(&files), vec!["snippets/kept.md"]);
    }

    #[test]
    fn scan_uses_configured_ignore_set() {
        let tmp = TempDir::new().unwrap();
        write_file(tmp.path(), "drafts/wip.md", "# WIP\n");
        write_file(tmp.path(), "README.md", "# Root\n");

        let config = ContentConfig {
            ignore: vec!["drafts".to_string()],
            ..ContentConfig::default()
        };
        let files = scan(tmp.path(), &config).unwrap();
        assert_eq!(paths(&files), vec!["README.md"]);
    }

    #[test]
    fn file_without_frontmatter_has_empty_metadata() {
        let tmp = TempDir::new().unwrap();
        write_file(tmp.path(), "plain.md", "# Plain\n\nNo metadata here.\n");

        let files = scan(tmp.path(), &ContentConfig::default()).unwrap();
        assert_eq!(files[0].status, MetadataStatus::Absent);
        assert!(files[0].frontmatter.tags.is_empty());
        assert!(!files[0].has_cover());
    }

    #[test]
    fn malformed_frontmatter_does_not_fail_scan() {
        let tmp = TempDir::new().unwrap();
        write_file(tmp.path(), "bad.md", "---\ntags: [oops\n---\n# Bad\n");
        write_file(tmp.path(), "good.md", &doc(&["rust"], None, "# Good"));

        let files = scan(tmp.path(), &ContentConfig::default()).unwrap();
        let bad = find_file(&files, "bad.md");
        assert!(matches!(bad.status, MetadataStatus::Malformed(_)));
        assert!(bad.frontmatter.tags.is_empty());
        assert!(find_file(&files, "good.md").frontmatter.has_tag("rust"));
    }

    #[test]
    fn scan_missing_root_is_error() {
        let tmp = TempDir::new().unwrap();
        let result = scan(&tmp.path().join("nope"), &ContentConfig::default());
        assert!(matches!(result, Err(ScanError::MissingDirectory(_))));
    }

    #[test]
    fn scan_order_is_stable() {
        let tmp = TempDir::new().unwrap();
        for name in ["c.md", "a.md", "b.md"] {
            write_file(tmp.path(), name, "x");
        }
        let first = paths(&scan(tmp.path(), &ContentConfig::default()).unwrap())
            .into_iter()
            .map(String::from)
            .collect::<Vec<_>>();
        assert_eq!(first, vec!["a.md", "b.md", "c.md"]);
    }

    // =========================================================================
    // Section listing
    // =========================================================================

    #[test]
    fn list_section_excludes_index_and_non_markdown() {
        let tmp = TempDir::new().unwrap();
        write_file(tmp.path(), "snippets/README.md", "index");
        write_file(tmp.path(), "snippets/b.md", "b");
        write_file(tmp.path(), "snippets/a.md", "a");
        write_file(tmp.path(), "snippets/cover.png", "png");
        write_file(tmp.path(), "snippets/sub/c.md", "c");

        let names = list_section(tmp.path(), "snippets", "README.md").unwrap();
        assert_eq!(names, vec!["a.md", "b.md"]);
    }

    #[test]
    fn list_section_missing_directory_names_path() {
        let tmp = TempDir::new().unwrap();
        let err = list_section(tmp.path(), "replies", "README.md").unwrap_err();
        assert!(matches!(err, ScanError::MissingDirectory(ref p) if p.ends_with("replies")));
        assert!(err.to_string().contains("replies"));
    }

    #[test]
    fn read_section_paths_include_folder() {
        let tmp = TempDir::new().unwrap();
        write_file(tmp.path(), "snippets/a.md", &doc(&[], Some("/a.png"), "# A"));

        let files = read_section(tmp.path(), "snippets", "README.md").unwrap();
        assert_eq!(files[0].path, "snippets/a.md");
        assert_eq!(files[0].file_name(), "a.md");
        assert!(files[0].has_cover());
    }
}
