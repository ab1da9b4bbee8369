//! Runs the generator steps in order and collects their results.
//!
//! ```text
//! tags → sections → sidebar → all-docs → theme
//! ```
//!
//! The sidebar is rewritten before the combined page so the page follows the
//! updated order. A failed step does not stop later steps; every failure ends
//! up in the [`BuildReport`] and the caller decides the exit status.

use crate::alldocs::{self, AllDocsError};
use crate::config::DocdexConfig;
use crate::scan::{self, MetadataStatus, ScanError};
use crate::sections::{self, SectionError};
use crate::sidebar::{self, SidebarError};
use crate::tags::{self, TagsError};
use crate::theme::{self, ThemeError};
use crate::types::StepOutput;
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Tags,
    Sections,
    Sidebar,
    AllDocs,
    Theme,
}

impl Step {
    pub const ALL: [Step; 5] = [
        Step::Tags,
        Step::Sections,
        Step::Sidebar,
        Step::AllDocs,
        Step::Theme,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Step::Tags => "Tags",
            Step::Sections => "Sections",
            Step::Sidebar => "Sidebar",
            Step::AllDocs => "All Docs",
            Step::Theme => "Theme",
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Error, Debug)]
pub enum StepError {
    #[error(transparent)]
    Tags(#[from] TagsError),
    #[error(transparent)]
    Sections(#[from] SectionError),
    #[error(transparent)]
    Sidebar(#[from] SidebarError),
    #[error(transparent)]
    AllDocs(#[from] AllDocsError),
    #[error(transparent)]
    Theme(#[from] ThemeError),
}

#[derive(Debug)]
pub struct StepResult {
    pub step: Step,
    pub outcome: Result<StepOutput, StepError>,
}

/// Outcome of every step that ran, in run order.
#[derive(Debug, Default)]
pub struct BuildReport {
    pub steps: Vec<StepResult>,
}

impl BuildReport {
    pub fn failures(&self) -> impl Iterator<Item = (Step, &StepError)> {
        self.steps
            .iter()
            .filter_map(|r| r.outcome.as_ref().err().map(|e| (r.step, e)))
    }

    pub fn is_success(&self) -> bool {
        self.failures().next().is_none()
    }

    pub fn warning_count(&self) -> usize {
        self.steps
            .iter()
            .filter_map(|r| r.outcome.as_ref().ok())
            .map(|o| o.warnings.len())
            .sum()
    }
}

/// Run one step against the content tree at `root`.
///
/// `ci` drops the `local_only` folders from the section lists.
pub fn run_step(root: &Path, config: &DocdexConfig, ci: bool, step: Step) -> Result<StepOutput, StepError> {
    let output = match step {
        Step::Tags => tags::run(root, &config.content, &config.tags)?,
        Step::Sections => sections::run(root, &config.readme_sections(ci), config)?,
        Step::Sidebar => sidebar::run(root, &config.sidebar_sections(ci), config)?,
        Step::AllDocs => alldocs::run(root, &config.sidebar_sections(ci), config)?,
        Step::Theme => theme::apply(root, &config.theme)?,
    };
    Ok(output)
}

/// Steps a full build runs; the theme step only when enabled.
pub fn build_steps(config: &DocdexConfig) -> Vec<Step> {
    Step::ALL
        .into_iter()
        .filter(|s| *s != Step::Theme || config.theme.enabled)
        .collect()
}

/// Run `steps` in order, logging each failure and carrying on.
pub fn run_steps(root: &Path, config: &DocdexConfig, ci: bool, steps: &[Step]) -> BuildReport {
    let mut report = BuildReport::default();
    for &step in steps {
        tracing::debug!(%step, "running step");
        let outcome = run_step(root, config, ci, step);
        if let Err(e) = &outcome {
            tracing::error!(%step, "step failed: {e}");
        }
        report.steps.push(StepResult { step, outcome });
    }
    report
}

/// The full build.
pub fn run(root: &Path, config: &DocdexConfig, ci: bool) -> BuildReport {
    run_steps(root, config, ci, &build_steps(config))
}

/// Content problems found without writing anything.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct CheckReport {
    pub files: usize,
    /// `(path, parser message)` for every unreadable frontmatter block.
    pub malformed: Vec<(String, String)>,
    pub undefined_tags: BTreeMap<String, Vec<String>>,
}

impl CheckReport {
    pub fn is_clean(&self) -> bool {
        self.malformed.is_empty() && self.undefined_tags.is_empty()
    }
}

/// Scan the content tree and report malformed frontmatter and unknown tags.
pub fn check(root: &Path, config: &DocdexConfig) -> Result<CheckReport, ScanError> {
    let files = scan::scan(root, &config.content)?;
    let malformed = files
        .iter()
        .filter_map(|f| match &f.status {
            MetadataStatus::Malformed(msg) => Some((f.path.clone(), msg.clone())),
            _ => None,
        })
        .collect();
    Ok(CheckReport {
        files: files.len(),
        malformed,
        undefined_tags: tags::undefined_tags(&files, &config.tags),
    })
}
