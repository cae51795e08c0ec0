//! Resolution of the push target into a documentation source.
//!
//! A `docatl push` argument is either a directory to package or a
//! pre-built artifact to read metadata from. The branch is taken once,
//! here, so the packaging and extraction code never inspects path types
//! themselves.

use crate::error::{DocatlError, Result};
use camino::{Utf8Path, Utf8PathBuf};

/// The two kinds of documentation input a push can start from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocsSource {
    /// A documentation directory that must be packaged first.
    Directory(Utf8PathBuf),
    /// An existing artifact that may carry embedded metadata.
    Artifact(Utf8PathBuf),
}

impl DocsSource {
    /// Classify a push target path, resolving it against the caller's
    /// working directory first.
    ///
    /// # Errors
    ///
    /// Returns [`DocatlError::InvalidInput`] when the path does not
    /// exist, and [`DocatlError::Io`] when the working directory cannot
    /// be determined.
    pub fn classify(path: &Utf8Path) -> Result<Self> {
        let resolved = resolve_path(path)?;
        if resolved.is_dir() {
            Ok(Self::Directory(resolved))
        } else if resolved.is_file() {
            Ok(Self::Artifact(resolved))
        } else {
            Err(DocatlError::invalid_input(format!(
                "documentation path '{resolved}' does not exist"
            )))
        }
    }

    /// The resolved filesystem path of the source.
    #[must_use]
    pub fn path(&self) -> &Utf8Path {
        match self {
            Self::Directory(path) | Self::Artifact(path) => path,
        }
    }
}

/// Resolve a possibly relative path against the current working
/// directory. Relative inputs are interpreted from where the user
/// invoked the tool, never from any internal state.
///
/// # Errors
///
/// Returns [`DocatlError::Io`] if the working directory is unavailable
/// and [`DocatlError::InvalidInput`] if it is not valid UTF-8.
pub fn resolve_path(path: &Utf8Path) -> Result<Utf8PathBuf> {
    if path.is_absolute() {
        return Ok(path.to_owned());
    }
    let cwd = std::env::current_dir()?;
    let cwd = Utf8PathBuf::try_from(cwd).map_err(|e| {
        DocatlError::invalid_input(format!("current directory is not valid UTF-8: {e}"))
    })?;
    Ok(cwd.join(path))
}
