//! docatl library.
//!
//! This crate provides the core functionality for packaging
//! documentation trees into distributable artifacts and publishing them
//! to a docat server. It is used by the `docatl` CLI binary and can be
//! consumed programmatically for testing or custom publishing
//! workflows.
//!
//! # Modules
//!
//! - [`artifact`] - Artifact metadata, packaging, and inspection
//! - [`cli`] - Command-line argument definitions
//! - [`client`] - Synchronous HTTP client for the docat REST surface
//! - [`config`] - Flag/environment/config-file settings resolution
//! - [`error`] - Semantic error types with recovery hints
//! - [`output`] - Stderr output helpers and user-facing messages
//! - [`source`] - Push-target classification (directory vs. artifact)

pub mod artifact;
pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod output;
pub mod source;

#[cfg(any(test, feature = "test-support"))]
pub mod test_utils;
