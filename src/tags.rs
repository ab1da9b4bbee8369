//! Tag pages.
//!
//! Every configured tag gets `<tags.dir>/<tag>.md`, listing the content files
//! that declare it, and `<tags.dir>/README.md` lists all tags:
//!
//! ```text
//! tags/
//! ├── README.md     # <Tag name="…"> for every definition, in config order
//! ├── go.md
//! └── rust.md       # one card per file tagged `rust`, covered files first
//! ```
//!
//! Only configured tags get pages. Tags used in content without a definition
//! are reported by [`undefined_tags`] and otherwise ignored.

use crate::cards;
use crate::config::{ContentConfig, TagDefinition, TagsConfig};
use crate::frontmatter;
use crate::naming;
use crate::scan::{self, ContentFile, ScanError};
use crate::types::{GeneratedPage, StepOutput, WriteError};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TagsError {
    #[error(transparent)]
    Scan(#[from] ScanError),
    #[error(transparent)]
    Write(#[from] WriteError),
    #[error("frontmatter encoding failed: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct TagPageMeta<'a> {
    page_class: &'a str,
    description: &'a str,
}

/// Files declaring `tag`, covered files first, otherwise in input order.
pub fn files_for_tag<'a>(files: &'a [ContentFile], tag: &str) -> Vec<&'a ContentFile> {
    let mut selected: Vec<&ContentFile> = files
        .iter()
        .filter(|f| f.frontmatter.has_tag(tag))
        .collect();
    cards::sort_cover_first(&mut selected, |f| f.has_cover());
    selected
}

/// Render the page for one tag.
pub fn render_tag_page(
    tag: &TagDefinition,
    files: &[&ContentFile],
    config: &TagsConfig,
) -> Result<String, TagsError> {
    let mut page = frontmatter::render(&TagPageMeta {
        page_class: &config.page_class,
        description: &tag.description,
    })?;
    page.push('\n');
    page.push_str(&format!("# {}\n\n", naming::capitalize(&tag.name)));
    page.push_str("<Header/>\n\n");
    page.push_str(&cards::render_card_list(files));
    Ok(page)
}

/// Render the tag directory page.
pub fn render_directory(config: &TagsConfig) -> String {
    let mut page = String::from("# Tags\n\n<div class=\"tags-container\">\n\n");
    for tag in &config.definitions {
        page.push_str(&cards::render_tag_chip(&tag.name));
        page.push('\n');
    }
    page.push_str("</div>\n");
    page
}

/// All tag pages plus the directory page, for already-scanned files.
pub fn build(files: &[ContentFile], config: &TagsConfig) -> Result<Vec<GeneratedPage>, TagsError> {
    let dir = PathBuf::from(&config.dir);
    let mut pages = Vec::with_capacity(config.definitions.len() + 1);

    for tag in &config.definitions {
        let tagged = files_for_tag(files, &tag.name);
        let contents = render_tag_page(tag, &tagged, config)?;
        pages.push(GeneratedPage::new(dir.join(format!("{}.md", tag.name)), contents));
    }

    pages.push(GeneratedPage::new(dir.join("README.md"), render_directory(config)));
    Ok(pages)
}

/// Tags used in content that have no definition, with the files using them.
pub fn undefined_tags(files: &[ContentFile], config: &TagsConfig) -> BTreeMap<String, Vec<String>> {
    let mut undefined: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for file in files {
        for tag in &file.frontmatter.tags {
            if !config.definitions.iter().any(|d| d.name == *tag) {
                undefined.entry(tag.clone()).or_default().push(file.path.clone());
            }
        }
    }
    undefined
}

/// Scan the content tree and write every tag page.
pub fn run(root: &Path, content: &ContentConfig, config: &TagsConfig) -> Result<StepOutput, TagsError> {
    let files = scan::scan(root, content)?;
    let mut output = StepOutput::default();

    for (tag, users) in undefined_tags(&files, config) {
        output.warn(format!("tag '{tag}' has no definition (used by {})", users.join(", ")));
    }

    let pages = build(&files, config)?;
    output.write_all(root, &pages)?;
    Ok(output)
}
