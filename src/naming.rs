//! Display names and site links derived from content paths.
//!
//! Everything generated for the site refers to content by path:
//! - `snippets/git-aliases.md` → link `/snippets/git-aliases.html`
//! - `snippets` → section title `Snippets`
//! - `git-aliases.md` → fallback heading `git-aliases`

use std::path::Path;

/// Upper-case the first character, leave the rest alone.
///
/// - `"rust"` → `"Rust"`
/// - `"config-files"` → `"Config-files"`
/// - `""` → `""`
pub fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Site-absolute link to the page built from a content file.
///
/// `path` is relative to the content root and may use either separator.
/// Only a trailing `.md` is swapped for `.html`.
pub fn page_link(path: &str) -> String {
    let normalized = path.replace('\\', "/");
    let trimmed = normalized.trim_start_matches('/');
    let html = match strip_markdown_extension(trimmed) {
        Some(stem) => format!("{stem}.html"),
        None => trimmed.to_string(),
    };
    format!("/{html}")
}

/// Sidebar key for a section folder: `snippets` → `/snippets/`.
pub fn sidebar_key(folder: &str) -> String {
    format!("/{}/", folder.trim_matches('/'))
}

/// Relative path with forward slashes, whatever the host separator.
pub fn to_slash(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

/// File name without its `.md` extension, used when a page has no heading.
pub fn display_stem(file_name: &str) -> &str {
    strip_markdown_extension(file_name).unwrap_or(file_name)
}

/// `name` without a trailing `.md` in any letter case.
fn strip_markdown_extension(name: &str) -> Option<&str> {
    let (stem, ext) = name.split_at_checked(name.len().checked_sub(3)?)?;
    ext.eq_ignore_ascii_case(".md").then_some(stem)
}
