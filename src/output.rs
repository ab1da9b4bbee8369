//! CLI output formatting for the build steps.
//!
//! # Information-First Display
//!
//! Each step is listed by name, followed by the files it wrote as positional
//! entries. Warnings and failures sit under the step that produced them, so
//! the output reads as an inventory of what changed in the content tree.
//!
//! # Output Format
//!
//! ## Build
//!
//! ```text
//! Tags
//!     001 tags/rust.md
//!     002 tags/README.md
//!     Warning: tag 'zig' has no definition (used by snippets/a.md)
//! Sidebar
//!     Failed: expected content directory is missing: docs/replies
//!
//! 2 steps, 2 files written, 1 warning, 1 failed
//! ```
//!
//! ## Check
//!
//! ```text
//! Content (12 files)
//! Malformed frontmatter
//!     001 snippets/bad.md
//!         tags: did not find expected ',' or ']'
//! Undefined tags
//!     001 zig
//!         Used by: snippets/a.md, replies/b.md
//! ```
//!
//! # Architecture
//!
//! Each report has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure: no I/O, no side effects.

use crate::naming;
use crate::pipeline::{BuildReport, CheckReport, StepError, StepResult};
use crate::types::StepOutput;

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn plural(n: usize, word: &str) -> String {
    if n == 1 {
        format!("{n} {word}")
    } else {
        format!("{n} {word}s")
    }
}

// ============================================================================
// Build output
// ============================================================================

/// Format one step: its name, the files it wrote, then warnings.
pub fn format_step_output(step: &str, outcome: &Result<StepOutput, StepError>) -> Vec<String> {
    let mut lines = vec![step.to_string()];
    match outcome {
        Ok(output) => {
            for (i, path) in output.written.iter().enumerate() {
                lines.push(format!(
                    "{}{} {}",
                    indent(1),
                    format_index(i + 1),
                    naming::to_slash(path)
                ));
            }
            if output.written.is_empty() {
                lines.push(format!("{}(nothing written)", indent(1)));
            }
            for warning in &output.warnings {
                lines.push(format!("{}Warning: {}", indent(1), warning));
            }
        }
        Err(e) => lines.push(format!("{}Failed: {}", indent(1), e)),
    }
    lines
}

/// Format a whole build: every step, then a summary line.
pub fn format_build_report(report: &BuildReport) -> Vec<String> {
    let mut lines = Vec::new();
    for StepResult { step, outcome } in &report.steps {
        lines.extend(format_step_output(step.name(), outcome));
    }

    let written: usize = report
        .steps
        .iter()
        .filter_map(|r| r.outcome.as_ref().ok())
        .map(|o| o.written.len())
        .sum();
    let failed = report.failures().count();

    lines.push(String::new());
    let mut summary = format!(
        "{}, {} written, {}",
        plural(report.steps.len(), "step"),
        plural(written, "file"),
        plural(report.warning_count(), "warning")
    );
    if failed > 0 {
        summary.push_str(&format!(", {failed} failed"));
    }
    lines.push(summary);
    lines
}

/// Print build output to stdout.
pub fn print_build_report(report: &BuildReport) {
    for line in format_build_report(report) {
        println!("{}", line);
    }
}

// ============================================================================
// Check output
// ============================================================================

/// Format a content check.
pub fn format_check_report(report: &CheckReport) -> Vec<String> {
    let mut lines = vec![format!("Content ({})", plural(report.files, "file"))];

    if !report.malformed.is_empty() {
        lines.push("Malformed frontmatter".to_string());
        for (i, (path, message)) in report.malformed.iter().enumerate() {
            lines.push(format!("{}{} {}", indent(1), format_index(i + 1), path));
            lines.push(format!("{}{}", indent(2), message.trim()));
        }
    }

    if !report.undefined_tags.is_empty() {
        lines.push("Undefined tags".to_string());
        for (i, (tag, users)) in report.undefined_tags.iter().enumerate() {
            lines.push(format!("{}{} {}", indent(1), format_index(i + 1), tag));
            lines.push(format!("{}Used by: {}", indent(2), users.join(", ")));
        }
    }

    lines
}

/// Print check output to stdout.
pub fn print_check_report(report: &CheckReport) {
    for line in format_check_report(report) {
        println!("{}", line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::Step;
    use crate::scan::ScanError;
    use crate::sections::SectionError;
    use std::collections::BTreeMap;
    use std::path::PathBuf;

    fn written(paths: &[&str]) -> StepOutput {
        StepOutput {
            written: paths.iter().map(PathBuf::from).collect(),
            warnings: Vec::new(),
        }
    }

    fn missing(path: &str) -> StepError {
        StepError::Sections(SectionError::Scan(ScanError::MissingDirectory(PathBuf::from(path))))
    }

    #[test]
    fn format_index_pads() {
        assert_eq!(format_index(1), "001");
        assert_eq!(format_index(42), "042");
        assert_eq!(format_index(100), "100");
    }

    #[test]
    fn indent_levels() {
        assert_eq!(indent(0), "");
        assert_eq!(indent(2), "        ");
    }

    #[test]
    fn step_lists_written_files() {
        let lines = format_step_output("Tags", &Ok(written(&["tags/rust.md", "tags/README.md"])));
        assert_eq!(
            lines,
            vec!["Tags", "    001 tags/rust.md", "    002 tags/README.md"]
        );
    }

    #[test]
    fn step_with_warnings_and_nothing_written() {
        let mut output = StepOutput::default();
        output.warnings.push("no sidebar object".to_string());
        let lines = format_step_output("Sidebar", &Ok(output));
        assert_eq!(
            lines,
            vec!["Sidebar", "    (nothing written)", "    Warning: no sidebar object"]
        );
    }

    #[test]
    fn failed_step_shows_error() {
        let lines = format_step_output("Sections", &Err(missing("docs/replies")));
        assert_eq!(lines.len(), 2);
        assert!(lines[1].starts_with("    Failed: "));
        assert!(lines[1].contains("docs/replies"));
    }

    #[test]
    fn build_summary_counts() {
        let report = BuildReport {
            steps: vec![
                StepResult {
                    step: Step::Tags,
                    outcome: Ok(written(&["tags/a.md"])),
                },
                StepResult {
                    step: Step::Sections,
                    outcome: Err(missing("x")),
                },
            ],
        };
        let lines = format_build_report(&report);
        assert_eq!(lines.last().unwrap(), "2 steps, 1 file written, 0 warnings, 1 failed");
        assert!(lines.contains(&"Sections".to_string()));
    }

    #[test]
    fn build_summary_without_failures() {
        let report = BuildReport {
            steps: vec![StepResult {
                step: Step::AllDocs,
                outcome: Ok(written(&["all/README.md"])),
            }],
        };
        let lines = format_build_report(&report);
        assert_eq!(lines[0], "All Docs");
        assert_eq!(lines.last().unwrap(), "1 step, 1 file written, 0 warnings");
    }

    #[test]
    fn check_report_sections() {
        let report = CheckReport {
            files: 3,
            malformed: vec![("a.md".to_string(), "bad yaml\n".to_string())],
            undefined_tags: BTreeMap::from([(
                "zig".to_string(),
                vec!["a.md".to_string(), "b.md".to_string()],
            )]),
        };
        assert_eq!(
            format_check_report(&report),
            vec![
                "Content (3 files)",
                "Malformed frontmatter",
                "    001 a.md",
                "        bad yaml",
                "Undefined tags",
                "    001 zig",
                "        Used by: a.md, b.md",
            ]
        );
    }

    #[test]
    fn clean_check_is_one_line() {
        let report = CheckReport {
            files: 1,
            ..CheckReport::default()
        };
        assert_eq!(format_check_report(&report), vec!["Content (1 file)"]);
    }
}
