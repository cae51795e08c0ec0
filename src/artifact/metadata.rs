//! Metadata record embedded in documentation artifacts.
//!
//! The record is a small YAML document with the keys `host`, `project`,
//! and `version`, stored inside the archive at the reserved path
//! [`METADATA_FILE_NAME`]. Empty fields are omitted on encode and
//! default to the empty string on decode; unknown keys are ignored for
//! forward compatibility.

use crate::error::{DocatlError, Result};
use serde::{Deserialize, Serialize};

/// Reserved in-archive path of the metadata member.
pub const METADATA_FILE_NAME: &str = ".docatl.meta.yaml";

/// The (host, project, version) triple describing where and what an
/// artifact is meant to be published as.
///
/// # Examples
///
/// ```
/// use docatl::artifact::metadata::BuildMetadata;
///
/// let meta = BuildMetadata {
///     project: "myproject".to_owned(),
///     version: "1.0.0".to_owned(),
///     ..BuildMetadata::default()
/// };
/// assert!(meta.should_embed());
///
/// let decoded = BuildMetadata::decode(&meta.encode().unwrap()).unwrap();
/// assert_eq!(decoded, meta);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildMetadata {
    /// Base URL of the docat server the artifact targets.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub host: String,
    /// Name of the docat project.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub project: String,
    /// Version of the documentation.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub version: String,
}

impl BuildMetadata {
    /// A record is only worth embedding when both project and version
    /// are known; anything less cannot drive a later push.
    #[must_use]
    pub fn should_embed(&self) -> bool {
        !self.project.is_empty() && !self.version.is_empty()
    }

    /// Serialize the record to its YAML wire form.
    ///
    /// # Errors
    ///
    /// Returns [`DocatlError::Format`] if YAML serialization fails.
    pub fn encode(&self) -> Result<String> {
        serde_yaml::to_string(self).map_err(|e| DocatlError::Format {
            reason: format!("cannot serialize metadata record: {e}"),
        })
    }

    /// Decode a record from its YAML wire form.
    ///
    /// An empty document decodes to the all-empty record, matching the
    /// treatment of a missing metadata member.
    ///
    /// # Errors
    ///
    /// Returns [`DocatlError::Format`] if the document is not valid YAML
    /// or does not match the record shape.
    pub fn decode(text: &str) -> Result<Self> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(text).map_err(|e| DocatlError::Format {
            reason: format!("cannot read metadata file contents as YAML: {e}"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::full("docs.example.com", "myproject", "1.0.0")]
    #[case::no_host("", "myproject", "1.0.0")]
    #[case::dotted_version("", "p", "2024.10.01-rc1")]
    fn encode_decode_round_trips(#[case] host: &str, #[case] project: &str, #[case] version: &str) {
        let meta = BuildMetadata {
            host: host.to_owned(),
            project: project.to_owned(),
            version: version.to_owned(),
        };
        let encoded = meta.encode().expect("encode");
        let decoded = BuildMetadata::decode(&encoded).expect("decode");
        assert_eq!(decoded, meta);
    }

    #[test]
    fn empty_fields_are_omitted_on_encode() {
        let meta = BuildMetadata {
            project: "myproject".to_owned(),
            version: "1.0.0".to_owned(),
            ..BuildMetadata::default()
        };
        let encoded = meta.encode().expect("encode");
        assert!(!encoded.contains("host"));
        assert!(encoded.contains("project: myproject"));
        assert!(encoded.contains("version: 1.0.0"));
    }

    #[test]
    fn decode_defaults_missing_fields_to_empty() {
        let decoded = BuildMetadata::decode("project: myproject\n").expect("decode");
        assert_eq!(decoded.project, "myproject");
        assert_eq!(decoded.version, "");
        assert_eq!(decoded.host, "");
    }

    #[test]
    fn decode_ignores_unknown_fields() {
        let decoded =
            BuildMetadata::decode("project: p\nversion: '1.0'\nchecksum: abc\n").expect("decode");
        assert_eq!(decoded.project, "p");
        assert_eq!(decoded.version, "1.0");
    }

    #[rstest]
    #[case::empty("")]
    #[case::whitespace("   \n\n")]
    fn decode_treats_empty_document_as_zero_record(#[case] text: &str) {
        let decoded = BuildMetadata::decode(text).expect("decode");
        assert_eq!(decoded, BuildMetadata::default());
    }

    #[test]
    fn decode_rejects_malformed_yaml() {
        let result = BuildMetadata::decode("project: [unterminated\n");
        assert!(matches!(result, Err(DocatlError::Format { .. })));
    }

    #[rstest]
    #[case::both("p", "1.0", true)]
    #[case::project_only("p", "", false)]
    #[case::version_only("", "1.0", false)]
    #[case::neither("", "", false)]
    fn should_embed_requires_project_and_version(
        #[case] project: &str,
        #[case] version: &str,
        #[case] expected: bool,
    ) {
        let meta = BuildMetadata {
            project: project.to_owned(),
            version: version.to_owned(),
            ..BuildMetadata::default()
        };
        assert_eq!(meta.should_embed(), expected);
    }
}
