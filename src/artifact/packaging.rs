//! Artifact packaging for documentation directories.
//!
//! Builds a ZIP artifact from the direct children of a documentation
//! directory, flattened at the archive root (no synthetic top-level
//! folder), and embeds a metadata record at the reserved path when the
//! project and version are known.

use crate::artifact::metadata::{BuildMetadata, METADATA_FILE_NAME};
use crate::error::{DocatlError, Result};
use crate::source::resolve_path;
use camino::{Utf8Path, Utf8PathBuf};
use std::fs;
use std::path::PathBuf;
use walkdir::WalkDir;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// One entry of the artifact, before archiving.
#[derive(Debug)]
struct ArchiveMember {
    /// Source path on disk.
    source: PathBuf,
    /// Member path inside the archive, relative to the archive root.
    name: String,
    /// Whether this entry is a directory marker.
    is_dir: bool,
}

/// Package a documentation directory into an artifact in the current
/// working directory, overwriting any existing file of the same name.
///
/// # Errors
///
/// Returns [`DocatlError::InvalidInput`] when `docs_dir` is not a
/// directory, [`DocatlError::Io`] on filesystem failures, and
/// [`DocatlError::Archive`] when the archive cannot be written.
pub fn build(docs_dir: &Utf8Path, meta: &BuildMetadata) -> Result<Utf8PathBuf> {
    let output_dir = resolve_path(Utf8Path::new("."))?;
    build_in(docs_dir, meta, &output_dir)
}

/// Package a documentation directory into an artifact under
/// `output_dir`.
///
/// The archive contains exactly the direct children of `docs_dir`
/// (subdirectories recursed with paths relative to `docs_dir`), plus
/// the metadata member when [`BuildMetadata::should_embed`] holds. The
/// metadata record is staged in a temporary directory that is removed
/// once the build completes or fails.
///
/// # Errors
///
/// Same failure modes as [`build`].
pub fn build_in(
    docs_dir: &Utf8Path,
    meta: &BuildMetadata,
    output_dir: &Utf8Path,
) -> Result<Utf8PathBuf> {
    let docs_dir = resolve_path(docs_dir)?;
    if !docs_dir.is_dir() {
        return Err(DocatlError::invalid_input(format!(
            "the documentation path '{docs_dir}' must be a directory"
        )));
    }

    let mut members = collect_members(&docs_dir)?;

    // Holds the staged metadata file until the archive is written.
    let mut _metadata_dir = None;
    if meta.should_embed() {
        // The embedded record owns the reserved name; a source child
        // that collides with it would make extraction ambiguous.
        members.retain(|member| member.name != METADATA_FILE_NAME);

        let temp_dir = tempfile::Builder::new().prefix("docatl-").tempdir()?;
        let metadata_path = temp_dir.path().join(METADATA_FILE_NAME);
        fs::write(&metadata_path, meta.encode()?)?;
        members.push(ArchiveMember {
            source: metadata_path,
            name: METADATA_FILE_NAME.to_owned(),
            is_dir: false,
        });
        _metadata_dir = Some(temp_dir);
    }

    let artifact_path = output_dir.join(artifact_file_name(&docs_dir, meta));
    log::debug!(
        "archiving {} member(s) from {docs_dir} into {artifact_path}",
        members.len()
    );
    write_archive(&artifact_path, &members)?;
    Ok(artifact_path)
}

/// Deterministic artifact naming policy, based only on the source
/// directory and metadata.
///
/// # Examples
///
/// ```
/// use camino::Utf8Path;
/// use docatl::artifact::metadata::BuildMetadata;
/// use docatl::artifact::packaging::artifact_file_name;
///
/// let meta = BuildMetadata {
///     project: "myproject".to_owned(),
///     version: "1.0.0".to_owned(),
///     ..BuildMetadata::default()
/// };
/// let name = artifact_file_name(Utf8Path::new("/srv/docs"), &meta);
/// assert_eq!(name, "docs_myproject_1.0.0.zip");
/// ```
#[must_use]
pub fn artifact_file_name(docs_dir: &Utf8Path, meta: &BuildMetadata) -> String {
    // A version without a project falls back to the bare directory name.
    if meta.project.is_empty() {
        return format!("{}.zip", docs_dir.file_name().unwrap_or("docs"));
    }
    if meta.version.is_empty() {
        return format!("docs_{}.zip", meta.project);
    }
    format!("docs_{}_{}.zip", meta.project, meta.version)
}

/// Enumerate the direct children of the documentation directory,
/// recursing into subdirectories with archive paths relative to
/// `docs_dir`. Entries are sorted by name so repeated builds produce
/// member-for-member identical archives.
fn collect_members(docs_dir: &Utf8Path) -> Result<Vec<ArchiveMember>> {
    let mut children = fs::read_dir(docs_dir)?.collect::<std::io::Result<Vec<_>>>()?;
    children.sort_by_key(std::fs::DirEntry::file_name);

    let mut members = Vec::new();
    for child in children {
        let file_type = child.file_type()?;
        if file_type.is_dir() {
            collect_subtree(docs_dir, &child.path(), &mut members)?;
        } else {
            let file_name = child.file_name();
            let name = utf8_member_name(std::path::Path::new(&file_name))?;
            members.push(ArchiveMember {
                source: child.path(),
                name,
                is_dir: false,
            });
        }
    }
    Ok(members)
}

/// Walk one top-level subdirectory, appending every entry (including
/// the subdirectory itself, so empty directories survive).
fn collect_subtree(
    docs_dir: &Utf8Path,
    subtree: &std::path::Path,
    members: &mut Vec<ArchiveMember>,
) -> Result<()> {
    for entry in WalkDir::new(subtree).sort_by_file_name() {
        let entry = entry.map_err(std::io::Error::from)?;
        let relative = entry
            .path()
            .strip_prefix(docs_dir.as_std_path())
            .map_err(|e| {
                DocatlError::invalid_input(format!(
                    "cannot relativize '{}': {e}",
                    entry.path().display()
                ))
            })?;
        let name = utf8_member_name(relative)?;
        members.push(ArchiveMember {
            source: entry.path().to_path_buf(),
            name,
            is_dir: entry.file_type().is_dir(),
        });
    }
    Ok(())
}

/// Reject member names that are not valid UTF-8; ZIP member paths are
/// stored as text.
fn utf8_member_name(relative: &std::path::Path) -> Result<String> {
    relative.to_str().map(str::to_owned).ok_or_else(|| {
        DocatlError::invalid_input(format!(
            "documentation file name '{}' is not valid UTF-8",
            relative.display()
        ))
    })
}

/// Write the member set into a ZIP archive at `artifact_path`.
fn write_archive(artifact_path: &Utf8Path, members: &[ArchiveMember]) -> Result<()> {
    let file = fs::File::create(artifact_path)?;
    let mut writer = ZipWriter::new(file);
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    for member in members {
        if member.is_dir {
            writer.add_directory(member.name.as_str(), options)?;
        } else {
            writer.start_file(member.name.as_str(), options)?;
            let mut source = fs::File::open(&member.source)?;
            std::io::copy(&mut source, &mut writer)?;
        }
    }

    writer.finish()?;
    Ok(())
}

#[cfg(test)]
#[path = "packaging_tests.rs"]
mod tests;
