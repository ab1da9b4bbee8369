//! The combined "All Docs" page.
//!
//! Every page of every included section, concatenated in sidebar order under
//! one document:
//!
//! ```text
//! ---
//! description: All docs on one page.
//! tags: []
//! sidebarDepth: 4
//! ---
//!
//! # All Docs
//!
//! ## Snippets
//!
//! ### Git aliases          ← was `# Git aliases` in snippets/git.md
//! ...
//!
//! ________
//! ```
//!
//! Each embedded file loses its frontmatter and table-of-contents directive,
//! has its headings pushed down by `heading_shift` levels so they nest under
//! the section heading, and gets a heading named after the file if it does
//! not open with one.
//!
//! Heading levels are rewritten from the parsed event stream, so `#` inside
//! code blocks or inline text is never touched. Only the marker of each
//! heading changes; the rest of the source is copied through verbatim.

use crate::config::{AllDocsConfig, DocdexConfig};
use crate::frontmatter;
use crate::naming;
use crate::scan::{ContentFile, ScanError};
use crate::sidebar::{self, SidebarError, SidebarMap};
use crate::types::{GeneratedPage, StepOutput, WriteError};
use pulldown_cmark::{Event, HeadingLevel, Parser, Tag};
use serde::Serialize;
use std::path::Path;
use thiserror::Error;

const MAX_HEADING_LEVEL: usize = 6;

#[derive(Error, Debug)]
pub enum AllDocsError {
    #[error(transparent)]
    Scan(#[from] ScanError),
    #[error(transparent)]
    Sidebar(#[from] SidebarError),
    #[error(transparent)]
    Write(#[from] WriteError),
    #[error("frontmatter encoding failed: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AllDocsMeta<'a> {
    description: &'a str,
    #[serde(skip_serializing_if = "is_blank")]
    author: &'a str,
    tags: Vec<String>,
    sidebar_depth: u32,
}

fn is_blank(value: &&str) -> bool {
    value.trim().is_empty()
}

fn level_number(level: HeadingLevel) -> usize {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}

/// Push every heading down by `shift` levels, clamped at level 6.
///
/// ATX headings keep their text and gain `#`s; setext headings are rewritten
/// as ATX since an underline cannot express levels past 2.
pub fn shift_headings(markdown: &str, shift: u8) -> String {
    if shift == 0 {
        return markdown.to_string();
    }

    let mut out = String::with_capacity(markdown.len() + 32);
    let mut cursor = 0;
    for (event, range) in Parser::new(markdown).into_offset_iter() {
        let Event::Start(Tag::Heading { level, .. }) = event else {
            continue;
        };
        let target = (level_number(level) + usize::from(shift)).min(MAX_HEADING_LEVEL);
        let source = &markdown[range.clone()];
        let Some(rewritten) = rewrite_heading(source, target) else {
            continue;
        };
        out.push_str(&markdown[cursor..range.start]);
        out.push_str(&rewritten);
        cursor = range.end;
    }
    out.push_str(&markdown[cursor..]);
    out
}

/// Rewrite one heading's source at a new level.
///
/// Returns `None` for shapes that cannot be rewritten in place, such as a
/// setext heading inside a block quote; those keep their level.
fn rewrite_heading(source: &str, level: usize) -> Option<String> {
    let hashes = "#".repeat(level);
    if let Some(setext) = rewrite_setext(source, &hashes) {
        return Some(setext);
    }

    let body = source.trim_start_matches(' ');
    let indent = &source[..source.len() - body.len()];
    let rest = atx_text(body)?;
    Some(format!("{indent}{hashes}{rest}"))
}

/// Text after an ATX opening run: 1-6 `#` then a space, tab or line end.
fn atx_text(line: &str) -> Option<&str> {
    let rest = line.trim_start_matches('#');
    let run = line.len() - rest.len();
    let opens = (1..=MAX_HEADING_LEVEL).contains(&run)
        && rest.chars().next().is_none_or(|c| matches!(c, ' ' | '\t' | '\r' | '\n'));
    opens.then_some(rest)
}

/// A setext heading as ATX, or `None` when `source` has no underline.
fn rewrite_setext(source: &str, hashes: &str) -> Option<String> {
    let content = source.trim_end_matches(['\r', '\n']);
    let lines: Vec<&str> = content.lines().collect();
    let (underline, text_lines) = lines.split_last()?;
    let underline = underline.trim();
    let is_underline = !underline.is_empty()
        && (underline.chars().all(|c| c == '=') || underline.chars().all(|c| c == '-'));
    if !is_underline
        || text_lines.is_empty()
        || text_lines.iter().any(|l| l.trim_start().starts_with('>'))
    {
        return None;
    }

    let text = text_lines
        .iter()
        .map(|l| l.trim())
        .collect::<Vec<_>>()
        .join(" ");
    let newline = &source[content.len()..];
    Some(format!("{hashes} {text}{newline}"))
}

/// Whether the first block of the document is a heading.
pub fn starts_with_heading(markdown: &str) -> bool {
    matches!(
        Parser::new(markdown).next(),
        Some(Event::Start(Tag::Heading { .. }))
    )
}

/// Drop leading blank lines and trailing whitespace, end with one newline.
fn tidy(text: &str) -> String {
    let mut start = 0;
    for line in text.split_inclusive('\n') {
        if !line.trim().is_empty() {
            break;
        }
        start += line.len();
    }
    let mut out = text[start..].trim_end().to_string();
    out.push('\n');
    out
}

/// Turn one content file into its combined-page entry.
pub fn transform(file: &ContentFile, config: &AllDocsConfig) -> String {
    let body = frontmatter::strip(&file.text);
    let body = if config.toc_directive.is_empty() {
        body.to_string()
    } else {
        body.replace(&config.toc_directive, "")
    };

    let shifted = shift_headings(&body, config.heading_shift);
    let mut entry = tidy(&shifted);

    if !starts_with_heading(&entry) {
        let level = (1 + usize::from(config.heading_shift)).min(MAX_HEADING_LEVEL);
        let title = naming::display_stem(file.file_name());
        entry = format!("{} {}\n\n{}", "#".repeat(level), title, entry);
    }

    if let Some(description) = &file.frontmatter.description {
        let label = maud::html! { (description) }.into_string();
        entry = entry.replace("<Header/>", &format!("<Header label=\"{label}\" />"));
    }

    entry
}

/// Render the whole page from sections already in sidebar order.
pub fn render(sections: &[(String, Vec<ContentFile>)], config: &AllDocsConfig) -> Result<String, AllDocsError> {
    let mut page = frontmatter::render(&AllDocsMeta {
        description: &config.description,
        author: &config.author,
        tags: Vec::new(),
        sidebar_depth: config.sidebar_depth,
    })?;
    page.push_str("\n# All Docs\n");

    for (folder, files) in sections {
        page.push_str(&format!("\n## {}\n\n", naming::capitalize(folder)));
        for file in files {
            page.push_str(&transform(file, config));
            page.push('\n');
            page.push_str(&config.separator);
            page.push_str("\n\n");
        }
    }

    let mut page = page.trim_end().to_string();
    page.push('\n');
    Ok(page)
}

/// Sidebar folders that belong on the combined page.
pub fn included_sections(folders: &[String], config: &AllDocsConfig) -> Vec<String> {
    folders
        .iter()
        .filter(|f| !config.exclude.contains(f))
        .cloned()
        .collect()
}

/// Read each included section's files in sidebar order.
pub fn collect_sections(
    root: &Path,
    folders: &[String],
    order: &SidebarMap,
    config: &DocdexConfig,
) -> Result<Vec<(String, Vec<ContentFile>)>, AllDocsError> {
    let included = included_sections(folders, &config.all_docs);
    let ordered = sidebar::compute(root, &included, order, &config.content.index_file)?;

    let mut sections = Vec::with_capacity(included.len());
    for folder in included {
        let key = naming::sidebar_key(&folder);
        let files = ordered
            .get(&key)
            .unwrap_or_default()
            .iter()
            .map(|name| ContentFile::read(root, &format!("{}/{}", folder.trim_matches('/'), name)))
            .collect::<Result<Vec<_>, _>>()?;
        sections.push((folder, files));
    }
    Ok(sections)
}

/// Build the combined page using `order` for file order within sections.
pub fn build(
    root: &Path,
    folders: &[String],
    order: &SidebarMap,
    config: &DocdexConfig,
) -> Result<GeneratedPage, AllDocsError> {
    let sections = collect_sections(root, folders, order, config)?;
    let contents = render(&sections, &config.all_docs)?;
    Ok(GeneratedPage::new(&config.all_docs.output, contents))
}

/// Build and write the combined page, ordering files by the stored sidebar.
pub fn run(root: &Path, folders: &[String], config: &DocdexConfig) -> Result<StepOutput, AllDocsError> {
    let mut output = StepOutput::default();
    let order = match sidebar::read_sidebar(root, config)? {
        Some(order) => order,
        None => {
            output.warn(format!(
                "no sidebar object at '{}'; using directory order",
                config.sidebar.pointer
            ));
            SidebarMap::new()
        }
    };

    let page = build(root, folders, &order, config)?;
    output.write_all(root, std::slice::from_ref(&page))?;
    Ok(output)
}
