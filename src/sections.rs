//! Section index pages.
//!
//! Each tracked folder gets its index file regenerated as a card grid of
//! the folder's pages:
//!
//! ```text
//! ---
//! pageClass: no-sidebar-metacard-container
//! sidebar: false
//! ---
//!
//! # Snippets
//!
//! <div class="tags-container">
//! ...
//! ```

use crate::cards;
use crate::config::DocdexConfig;
use crate::frontmatter;
use crate::naming;
use crate::scan::{self, ContentFile, ScanError};
use crate::types::{GeneratedPage, StepOutput, WriteError};
use serde::Serialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SectionError {
    #[error(transparent)]
    Scan(#[from] ScanError),
    #[error(transparent)]
    Write(#[from] WriteError),
    #[error("frontmatter encoding failed: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SectionPageMeta<'a> {
    page_class: &'a str,
    sidebar: bool,
}

/// Render the index page for `folder` from its files, in listing order.
pub fn render_index(folder: &str, files: &[ContentFile], page_class: &str) -> Result<String, SectionError> {
    let mut ordered: Vec<&ContentFile> = files.iter().collect();
    cards::sort_cover_first(&mut ordered, |f| f.has_cover());

    let mut page = frontmatter::render(&SectionPageMeta {
        page_class,
        sidebar: false,
    })?;
    page.push('\n');
    page.push_str(&format!("# {}\n\n", naming::capitalize(folder)));
    page.push_str(&cards::render_card_list(&ordered));
    Ok(page)
}

/// Build the index page of one section folder.
pub fn build(root: &Path, folder: &str, config: &DocdexConfig) -> Result<GeneratedPage, SectionError> {
    let index_file = &config.content.index_file;
    let files = scan::read_section(root, folder, index_file)?;
    let contents = render_index(folder, &files, &config.sections.page_class)?;
    Ok(GeneratedPage::new(PathBuf::from(folder).join(index_file), contents))
}

/// Write the index page of every folder in `folders`.
///
/// Stops at the first folder that fails; the pipeline reports it.
pub fn run(root: &Path, folders: &[String], config: &DocdexConfig) -> Result<StepOutput, SectionError> {
    let mut output = StepOutput::default();
    for folder in folders {
        let page = build(root, folder, config)?;
        output.write_all(root, std::slice::from_ref(&page))?;
    }
    Ok(output)
}
