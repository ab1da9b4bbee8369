//! # docdex
//!
//! Build helper for markdown documentation sites. Run it over a content tree
//! before the site generator and it rewrites the derived pages:
//!
//! ```text
//! docs/
//! ├── docdex.toml            # Optional config, merged over stock defaults
//! ├── .vuepress/config.json  # Site config; sidebar rewritten in place
//! ├── snippets/
//! │   ├── README.md          ← section index (card grid)
//! │   └── git.md             # tags: [git], cover: /git.png
//! ├── tags/
//! │   ├── README.md          ← tag directory
//! │   └── git.md             ← one card per file tagged `git`
//! └── all/README.md          ← every page on one page
//! ```
//!
//! # Pipeline
//!
//! ```text
//! 1. Tags       frontmatter tags  →  tags/<tag>.md, tags/README.md
//! 2. Sections   folder listings   →  <folder>/README.md
//! 3. Sidebar    folder listings   →  site config sidebar entries
//! 4. All Docs   sidebar order     →  all/README.md
//! 5. Theme      accent colors     →  stylesheet, icons, PWA manifest
//! ```
//!
//! Each step reads the filesystem fresh and writes whole files, so running
//! the pipeline twice on unchanged input produces identical output.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`scan`] | Finds content files and reads their frontmatter |
//! | [`frontmatter`] | Splits, parses and renders YAML frontmatter blocks |
//! | [`tags`] | Tag pages and the tag directory |
//! | [`sections`] | Section index pages |
//! | [`sidebar`] | Sidebar entries in the JSON site config |
//! | [`alldocs`] | The combined page, with heading levels shifted |
//! | [`theme`] | Accent color, recolored icon, PNG render, manifest |
//! | [`cards`] | Card markup shared by tag and section pages |
//! | [`pipeline`] | Step ordering, collect-and-report failures, content check |
//! | [`config`] | `docdex.toml` loading, validation and merging |
//! | [`naming`] | Links, sidebar keys and display names from paths |
//! | [`types`] | Generated pages and per-step results |
//! | [`output`] | CLI output formatting |

pub mod alldocs;
pub mod cards;
pub mod config;
pub mod frontmatter;
pub mod naming;
pub mod output;
pub mod pipeline;
pub mod scan;
pub mod sections;
pub mod sidebar;
pub mod tags;
pub mod theme;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
