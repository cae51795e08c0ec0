//! Metadata recovery from existing documentation artifacts.
//!
//! Not every artifact was built by `docatl build`, so a missing
//! metadata member is normal and yields the zero-value record rather
//! than an error.

use crate::artifact::metadata::{BuildMetadata, METADATA_FILE_NAME};
use crate::error::Result;
use camino::Utf8Path;
use std::fs;
use std::io::Read;
use zip::ZipArchive;
use zip::result::ZipError;

/// Read the embedded metadata record from an artifact.
///
/// # Errors
///
/// Returns [`DocatlError::Io`](crate::error::DocatlError::Io) or
/// [`DocatlError::Archive`](crate::error::DocatlError::Archive) when
/// the artifact cannot be opened or the member cannot be fully read,
/// and [`DocatlError::Format`](crate::error::DocatlError::Format) when
/// a present member fails to decode.
pub fn extract_metadata(artifact_path: &Utf8Path) -> Result<BuildMetadata> {
    let file = fs::File::open(artifact_path)?;
    let mut archive = ZipArchive::new(file)?;

    let mut member = match archive.by_name(METADATA_FILE_NAME) {
        Ok(member) => member,
        Err(ZipError::FileNotFound) => return Ok(BuildMetadata::default()),
        Err(other) => return Err(other.into()),
    };

    let mut contents = String::new();
    member.read_to_string(&mut contents)?;
    log::trace!("found metadata member in {artifact_path}");
    BuildMetadata::decode(&contents)
}
