//! Output helpers for the docatl CLI.
//!
//! All user-facing progress goes to stderr through an injected writer so
//! command functions stay testable without capturing the real stream.

use camino::Utf8Path;
use std::io::Write;

/// Write a single line to the given stderr writer, ignoring write
/// failures (output is best-effort).
pub fn write_stderr_line(stderr: &mut dyn Write, message: impl std::fmt::Display) {
    if writeln!(stderr, "{message}").is_err() {
        // Best-effort logging; ignore write failures.
    }
}

/// Message printed after a successful `docatl build`.
#[must_use]
pub fn build_success_message(artifact: &Utf8Path) -> String {
    format!(
        "Successfully built documentation, stored at: {artifact}\n\
         Push documentation with: `docatl push {artifact}`"
    )
}

/// Message printed after a successful publish.
#[must_use]
pub fn push_success_message(project: &str, version: &str) -> String {
    format!("Successfully pushed documentation version {version} to project {project}")
}

/// Message printed after each successfully applied tag.
#[must_use]
pub fn tag_success_message(project: &str, version: &str, tag: &str) -> String {
    format!("Successfully tagged version {version} of project {project} as {tag}")
}
