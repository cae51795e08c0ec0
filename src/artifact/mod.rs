//! Documentation artifact domain: metadata schema, packaging, and
//! inspection.
//!
//! An artifact is a plain ZIP archive of a documentation tree, carrying
//! at most one metadata record at a reserved path so that a later
//! `docatl push` can recover the project, version, and target host the
//! artifact was built for.
//!
//! # Sub-modules
//!
//! - [`metadata`] — the `BuildMetadata` record and its YAML codec.
//! - [`packaging`] — archive creation from a documentation directory.
//! - [`extraction`] — metadata recovery from an existing artifact.

pub mod extraction;
pub mod metadata;
pub mod packaging;
