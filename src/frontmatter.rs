//! YAML frontmatter blocks at the top of content files.
//!
//! A block starts on the very first line with `---` and ends at the next line
//! that is exactly `---`:
//!
//! ```text
//! ---
//! tags: [go, rust]
//! cover: /images/cover.png
//! description: Building a CLI
//! ---
//!
//! # Body starts here
//! ```
//!
//! Only `tags`, `cover`, and `description` are read; other keys are ignored.
//! A missing or unparseable block is never an error: callers get empty
//! metadata and decide whether to warn.

use serde::{Deserialize, Deserializer, Serialize, de};
use serde_yaml::Value;
use std::collections::BTreeSet;

const DELIMITER: &str = "---";

/// Metadata the generators care about.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Frontmatter {
    #[serde(deserialize_with = "tag_set")]
    pub tags: BTreeSet<String>,
    pub cover: Option<String>,
    pub description: Option<String>,
}

impl Frontmatter {
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.contains(tag)
    }
}

/// Outcome of looking for a frontmatter block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FrontmatterBlock {
    Absent,
    Parsed(Frontmatter),
    /// The block exists but is not valid YAML for [`Frontmatter`].
    Malformed(String),
}

impl FrontmatterBlock {
    /// The parsed metadata, or empty metadata when absent or malformed.
    pub fn into_frontmatter(self) -> Frontmatter {
        match self {
            FrontmatterBlock::Parsed(fm) => fm,
            FrontmatterBlock::Absent | FrontmatterBlock::Malformed(_) => Frontmatter::default(),
        }
    }
}

/// `tags: rust` and `tags: [go, rust]` are both accepted; `tags:` is empty.
///
/// Numbers and booleans count as tags by their text (`2021`). List items
/// that are not scalars are skipped; a mapping is an error.
fn tag_set<'de, D>(deserializer: D) -> Result<BTreeSet<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(BTreeSet::new()),
        Value::Sequence(items) => Ok(items.iter().filter_map(scalar_text).collect()),
        scalar => scalar_text(&scalar)
            .map(|tag| BTreeSet::from([tag]))
            .ok_or_else(|| de::Error::custom("tags must be a string or a list")),
    }
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Split a document into its raw frontmatter block and the remaining body.
///
/// Returns `(None, text)` when the document does not open with a complete
/// block.
pub fn split(text: &str) -> (Option<&str>, &str) {
    let text_start = text.strip_prefix('\u{feff}').unwrap_or(text);
    let Some(after_open) = strip_delimiter_line(text_start) else {
        return (None, text);
    };

    let mut offset = 0;
    for line in after_open.split_inclusive('\n') {
        if line.trim_end_matches(['\r', '\n']) == DELIMITER {
            let yaml = &after_open[..offset];
            let body = &after_open[offset + line.len()..];
            return (Some(yaml), body);
        }
        offset += line.len();
    }
    (None, text)
}

/// Strip an opening `---` line, returning the rest.
fn strip_delimiter_line(text: &str) -> Option<&str> {
    let rest = text.strip_prefix(DELIMITER)?;
    if let Some(rest) = rest.strip_prefix("\r\n") {
        Some(rest)
    } else {
        rest.strip_prefix('\n')
    }
}

/// Parse the frontmatter block of a document.
pub fn parse(text: &str) -> FrontmatterBlock {
    match split(text) {
        (None, _) => FrontmatterBlock::Absent,
        (Some(yaml), _) if yaml.trim().is_empty() => {
            FrontmatterBlock::Parsed(Frontmatter::default())
        }
        (Some(yaml), _) => match serde_yaml::from_str::<Frontmatter>(yaml) {
            Ok(fm) => FrontmatterBlock::Parsed(fm),
            Err(e) => FrontmatterBlock::Malformed(e.to_string()),
        },
    }
}

/// The document without its frontmatter block.
pub fn strip(text: &str) -> &str {
    split(text).1
}

/// Render `meta` as a delimited block, ready to start a generated page.
pub fn render<T: Serialize>(meta: &T) -> Result<String, serde_yaml::Error> {
    let yaml = serde_yaml::to_string(meta)?;
    Ok(format!("{DELIMITER}\n{yaml}{DELIMITER}\n"))
}
