//! Build configuration module.
//!
//! Handles loading, validating, and merging `docdex.toml`. Stock defaults are
//! overridden by the file in the content root; every step receives the
//! resolved [`DocdexConfig`] instead of reading process-wide constants.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [content]
//! ignore = ["README.md", "node_modules"]  # Basenames skipped at any depth
//! index_file = "README.md"                # Per-folder index page
//!
//! [tags]
//! dir = "tags"
//! page_class = "sidebar-metacard-container"
//!
//! [[tags.definitions]]
//! name = "rust"
//! description = "Notes about Rust."
//!
//! [sections]
//! readme = ["config-files", "snippets", "replies"]
//! sidebar = ["config-files", "tags", "snippets", "replies"]
//! local_only = []                         # Dropped when $CI is set
//! page_class = "no-sidebar-metacard-container"
//!
//! [sidebar]
//! config_file = ".vuepress/config.json"
//! pointer = "/themeConfig/sidebar"
//!
//! [all_docs]
//! output = "all/README.md"
//! exclude = ["tags", "all"]
//! heading_shift = 2
//! separator = "________"
//! toc_directive = "[[toc]]"
//! description = "All docs on one page."
//! author = ""
//! sidebar_depth = 4
//!
//! [theme]
//! enabled = true
//! accent_color = "#3880ff"
//! icon_color = "#020814"                  # Must be a hex color
//! override_file = ".vuepress/override.styl"
//! svg_icon = ".vuepress/public/images/icon-svg.svg"
//! png_icon = ".vuepress/public/images/icon.png"
//! manifest = ".vuepress/public/pwa/manifest.json"
//! ```
//!
//! Config files are sparse: override just the values you want. Unknown keys
//! are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use thiserror::Error;

/// File name looked up in the content root.
pub const CONFIG_FILE: &str = "docdex.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Resolved build configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DocdexConfig {
    /// Which content files the scanner considers.
    pub content: ContentConfig,
    /// Tag definitions and tag page layout.
    pub tags: TagsConfig,
    /// Tracked top-level folders.
    pub sections: SectionsConfig,
    /// Location of the sidebar inside the site configuration.
    pub sidebar: SidebarConfig,
    /// Combined "All Docs" page.
    pub all_docs: AllDocsConfig,
    /// Accent color and icon assets.
    pub theme: ThemeConfig,
}

impl DocdexConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.content.index_file.trim().is_empty() {
            return Err(ConfigError::Validation(
                "content.index_file must not be empty".into(),
            ));
        }
        if self.all_docs.heading_shift > 5 {
            return Err(ConfigError::Validation(
                "all_docs.heading_shift must be 0-5".into(),
            ));
        }
        let mut seen = HashSet::new();
        for tag in &self.tags.definitions {
            if tag.name.trim().is_empty() {
                return Err(ConfigError::Validation(
                    "tags.definitions entries need a name".into(),
                ));
            }
            if !seen.insert(tag.name.as_str()) {
                return Err(ConfigError::Validation(format!(
                    "tag '{}' is defined twice",
                    tag.name
                )));
            }
        }
        if !is_hex_color(&self.theme.icon_color) {
            return Err(ConfigError::Validation(format!(
                "theme.icon_color must be a hex color, got '{}'",
                self.theme.icon_color
            )));
        }
        Ok(())
    }

    /// Folders that get a generated index page.
    ///
    /// `local_only` folders are appended unless running under CI.
    pub fn readme_sections(&self, ci: bool) -> Vec<String> {
        with_local(&self.sections.readme, &self.sections.local_only, ci)
    }

    /// Folders tracked in the sidebar, in sidebar order.
    pub fn sidebar_sections(&self, ci: bool) -> Vec<String> {
        with_local(&self.sections.sidebar, &self.sections.local_only, ci)
    }
}

fn with_local(base: &[String], local: &[String], ci: bool) -> Vec<String> {
    let mut folders = base.to_vec();
    if !ci {
        for folder in local {
            if !folders.contains(folder) {
                folders.push(folder.clone());
            }
        }
    }
    folders
}

/// `#rgb` or `#rrggbb`.
fn is_hex_color(value: &str) -> bool {
    value
        .strip_prefix('#')
        .is_some_and(|hex| matches!(hex.len(), 3 | 6) && hex.chars().all(|c| c.is_ascii_hexdigit()))
}

/// Scanner settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ContentConfig {
    /// File or directory basenames skipped at any depth.
    /// Hidden entries (leading `.`) are always skipped.
    pub ignore: Vec<String>,
    /// Index page inside each folder, never listed as content.
    pub index_file: String,
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            ignore: vec!["README.md".to_string(), "node_modules".to_string()],
            index_file: "README.md".to_string(),
        }
    }
}

/// A tag users may put in frontmatter, with the blurb shown on its page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TagDefinition {
    pub name: String,
    pub description: String,
}

impl TagDefinition {
    pub fn new(name: &str, description: &str) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
        }
    }
}

/// Tag pages.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TagsConfig {
    /// Output folder for tag pages, relative to the content root.
    pub dir: String,
    /// `pageClass` written into every tag page's frontmatter.
    pub page_class: String,
    /// Known tags, in the order they are listed on the tag directory page.
    pub definitions: Vec<TagDefinition>,
}

impl Default for TagsConfig {
    fn default() -> Self {
        Self {
            dir: "tags".to_string(),
            page_class: "sidebar-metacard-container".to_string(),
            definitions: Vec::new(),
        }
    }
}

/// Tracked top-level folders.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SectionsConfig {
    pub readme: Vec<String>,
    pub sidebar: Vec<String>,
    /// Folders that only exist on authors' machines.
    pub local_only: Vec<String>,
    /// `pageClass` written into generated section index pages.
    pub page_class: String,
}

impl Default for SectionsConfig {
    fn default() -> Self {
        Self {
            readme: vec![
                "config-files".to_string(),
                "snippets".to_string(),
                "replies".to_string(),
            ],
            sidebar: vec![
                "config-files".to_string(),
                "tags".to_string(),
                "snippets".to_string(),
                "replies".to_string(),
            ],
            local_only: Vec::new(),
            page_class: "no-sidebar-metacard-container".to_string(),
        }
    }
}

/// Where the sidebar lives in the site configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SidebarConfig {
    /// JSON site configuration, relative to the content root.
    pub config_file: String,
    /// JSON pointer (RFC 6901) to the sidebar object.
    pub pointer: String,
}

impl Default for SidebarConfig {
    fn default() -> Self {
        Self {
            config_file: ".vuepress/config.json".to_string(),
            pointer: "/themeConfig/sidebar".to_string(),
        }
    }
}

/// Combined "All Docs" page.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AllDocsConfig {
    /// Output page, relative to the content root.
    pub output: String,
    /// Sidebar folders left out of the combined page.
    pub exclude: Vec<String>,
    /// Levels added to every heading of an embedded file.
    pub heading_shift: u8,
    /// Line written after every embedded file.
    pub separator: String,
    /// Inline directive removed from embedded files.
    pub toc_directive: String,
    pub description: String,
    pub author: String,
    pub sidebar_depth: u32,
}

impl Default for AllDocsConfig {
    fn default() -> Self {
        Self {
            output: "all/README.md".to_string(),
            exclude: vec!["tags".to_string(), "all".to_string()],
            heading_shift: 2,
            separator: "________".to_string(),
            toc_directive: "[[toc]]".to_string(),
            description: "All docs on one page.".to_string(),
            author: String::new(),
            sidebar_depth: 4,
        }
    }
}

/// Accent color and icon assets. Paths are relative to the content root.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ThemeConfig {
    pub enabled: bool,
    /// Any CSS color; written to the stylesheet and PWA manifest.
    pub accent_color: String,
    /// Hex color used for every `fill` in the vector icon.
    pub icon_color: String,
    pub override_file: String,
    pub svg_icon: String,
    pub png_icon: String,
    pub manifest: String,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            accent_color: "#3880ff".to_string(),
            icon_color: "#020814".to_string(),
            override_file: ".vuepress/override.styl".to_string(),
            svg_icon: ".vuepress/public/images/icon-svg.svg".to_string(),
            png_icon: ".vuepress/public/images/icon.png".to_string(),
            manifest: ".vuepress/public/pwa/manifest.json".to_string(),
        }
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(DocdexConfig::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely, so an array
///   such as `sections.readme` is replaced, never concatenated.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load `docdex.toml` from a directory as a raw TOML value.
///
/// Returns `Ok(None)` if the file does not exist.
pub fn load_raw_config(root: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = root.join(CONFIG_FILE);
    if !config_path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&config_path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<DocdexConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: DocdexConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from `docdex.toml` in the content root.
pub fn load_config(root: &Path) -> Result<DocdexConfig, ConfigError> {
    resolve_config(stock_defaults_value(), load_raw_config(root)?)
}

/// Returns a fully-commented stock `docdex.toml`.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# docdex configuration
# ====================
# All settings are optional. Values shown below are the defaults.
# Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Content scanning
# ---------------------------------------------------------------------------
[content]
# File or directory names skipped at any depth. Hidden entries are always skipped.
ignore = ["README.md", "node_modules"]

# Index page inside each folder. Generated for sections, never listed as content.
index_file = "README.md"

# ---------------------------------------------------------------------------
# Tag pages
# ---------------------------------------------------------------------------
[tags]
# Folder receiving one page per tag plus a directory page.
dir = "tags"
page_class = "sidebar-metacard-container"

# Only tags defined here get a page. Repeat the block for every tag:
#
# [[tags.definitions]]
# name = "rust"
# description = "Notes about Rust."

# ---------------------------------------------------------------------------
# Sections
# ---------------------------------------------------------------------------
[sections]
# Folders that get a generated index page.
readme = ["config-files", "snippets", "replies"]

# Folders tracked in the sidebar, in order.
sidebar = ["config-files", "tags", "snippets", "replies"]

# Folders added to both lists unless the CI environment variable is set.
local_only = []

page_class = "no-sidebar-metacard-container"

# ---------------------------------------------------------------------------
# Sidebar
# ---------------------------------------------------------------------------
[sidebar]
# JSON site configuration holding the sidebar.
config_file = ".vuepress/config.json"

# JSON pointer to the sidebar object inside that file.
pointer = "/themeConfig/sidebar"

# ---------------------------------------------------------------------------
# Combined page
# ---------------------------------------------------------------------------
[all_docs]
output = "all/README.md"
exclude = ["tags", "all"]

# Levels added to every heading of an embedded file (0-5).
heading_shift = 2

separator = "________"
toc_directive = "[[toc]]"
description = "All docs on one page."
author = ""
sidebar_depth = 4

# ---------------------------------------------------------------------------
# Theme colors
# ---------------------------------------------------------------------------
[theme]
enabled = true
accent_color = "#3880ff"

# Must be a hex color (#rgb or #rrggbb).
icon_color = "#020814"

override_file = ".vuepress/override.styl"
svg_icon = ".vuepress/public/images/icon-svg.svg"
png_icon = ".vuepress/public/images/icon.png"
manifest = ".vuepress/public/pwa/manifest.json"
"##
}
