//! Configuration resolution for the CLI shell.
//!
//! Host and API key come from three layers, highest precedence first:
//! command-line flags, `DOCATL_*` environment variables, and a
//! `.docatl.yaml` config file (explicit `--config` path, else the
//! working directory, else the home directory). The core never touches
//! this module; it receives already-resolved values.

use crate::error::{DocatlError, Result};
use crate::source::resolve_path;
use camino::{Utf8Path, Utf8PathBuf};
use serde::{Deserialize, Serialize};

/// Default config file name, looked up in cwd and the home directory.
pub const CONFIG_FILE_NAME: &str = ".docatl.yaml";

/// Environment variable overriding the server host.
pub const ENV_HOST: &str = "DOCATL_HOST";

/// Environment variable overriding the API key.
pub const ENV_API_KEY: &str = "DOCATL_API_KEY";

/// On-disk shape of `.docatl.yaml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigFile {
    /// docat server base URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
    /// Credential token for write operations.
    #[serde(rename = "api-key", default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
}

/// Values taken from command-line flags, overriding everything else.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    /// `--host` flag.
    pub host: Option<String>,
    /// `--api-key` flag.
    pub api_key: Option<String>,
    /// `--config` flag.
    pub config: Option<Utf8PathBuf>,
}

/// Fully resolved settings handed to command execution.
#[derive(Debug, Clone, Default)]
pub struct Settings {
    /// Resolved server host, if any layer supplied one.
    pub host: Option<String>,
    /// Resolved API key, if any layer supplied one.
    pub api_key: Option<String>,
    /// The config file path that was (or would be) used; also the
    /// target for `docatl claim --save`.
    pub config_path: Utf8PathBuf,
}

impl Settings {
    /// Resolve settings from flags, environment, and config file.
    ///
    /// # Errors
    ///
    /// Returns [`DocatlError::Config`] when a config file exists but
    /// cannot be parsed, and [`DocatlError::Io`] when the working
    /// directory is unavailable.
    pub fn resolve(overrides: &Overrides) -> Result<Self> {
        let config_path = match &overrides.config {
            Some(path) => resolve_path(path)?,
            None => default_config_path()?,
        };
        let file = if config_path.is_file() {
            load_config(&config_path)?
        } else {
            ConfigFile::default()
        };

        Ok(Self {
            host: first_of(overrides.host.clone(), env_value(ENV_HOST), file.host),
            api_key: first_of(
                overrides.api_key.clone(),
                env_value(ENV_API_KEY),
                file.api_key,
            ),
            config_path,
        })
    }

    /// The host, required for every remote operation.
    ///
    /// # Errors
    ///
    /// Returns [`DocatlError::InvalidInput`] with a recovery hint when
    /// no layer supplied a host.
    pub fn require_host(&self) -> Result<&str> {
        self.host.as_deref().ok_or_else(missing_host_error)
    }
}

/// The error every remote operation reports when no layer supplied a
/// host.
#[must_use]
pub fn missing_host_error() -> DocatlError {
    DocatlError::invalid_input(
        "host setting is missing; either use `--host <host>`, `DOCATL_HOST=<host>`, \
         or a config file with the `host:` field",
    )
}

/// Parse a config file.
///
/// # Errors
///
/// Returns [`DocatlError::Config`] when the file cannot be read or is
/// not valid YAML.
pub fn load_config(path: &Utf8Path) -> Result<ConfigFile> {
    let contents = std::fs::read_to_string(path).map_err(|e| DocatlError::Config {
        path: path.to_owned(),
        reason: e.to_string(),
    })?;
    serde_yaml::from_str(&contents).map_err(|e| DocatlError::Config {
        path: path.to_owned(),
        reason: e.to_string(),
    })
}

/// Write a config file, overwriting any existing one.
///
/// # Errors
///
/// Returns [`DocatlError::Config`] on serialization failure and
/// [`DocatlError::Io`] on write failure.
pub fn write_config(path: &Utf8Path, config: &ConfigFile) -> Result<()> {
    let document = serde_yaml::to_string(config).map_err(|e| DocatlError::Config {
        path: path.to_owned(),
        reason: e.to_string(),
    })?;
    std::fs::write(path, document)?;
    Ok(())
}

/// Layered lookup: flag beats environment beats config file. Empty
/// strings count as absent on every layer.
fn first_of(flag: Option<String>, env: Option<String>, file: Option<String>) -> Option<String> {
    non_empty(flag)
        .or_else(|| non_empty(env))
        .or_else(|| non_empty(file))
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

fn env_value(name: &str) -> Option<String> {
    std::env::var(name).ok()
}

/// The cwd config file when present, else the home-directory one when
/// present, else the cwd path (as the default write target).
fn default_config_path() -> Result<Utf8PathBuf> {
    let cwd_candidate = resolve_path(Utf8Path::new(CONFIG_FILE_NAME))?;
    if cwd_candidate.is_file() {
        return Ok(cwd_candidate);
    }
    if let Some(home_candidate) = home_config_path() {
        if home_candidate.is_file() {
            return Ok(home_candidate);
        }
    }
    Ok(cwd_candidate)
}

fn home_config_path() -> Option<Utf8PathBuf> {
    let dirs = directories_next::BaseDirs::new()?;
    let home = Utf8PathBuf::try_from(dirs.home_dir().to_path_buf()).ok()?;
    Some(home.join(CONFIG_FILE_NAME))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn without_docatl_env<T>(body: impl FnOnce() -> T) -> T {
        temp_env::with_vars(
            [(ENV_HOST, None::<&str>), (ENV_API_KEY, None::<&str>)],
            body,
        )
    }

    #[rstest]
    #[case::flag_wins(Some("flag"), Some("env"), Some("file"), Some("flag"))]
    #[case::env_beats_file(None, Some("env"), Some("file"), Some("env"))]
    #[case::file_as_fallback(None, None, Some("file"), Some("file"))]
    #[case::empty_flag_is_absent(Some(""), Some("env"), None, Some("env"))]
    #[case::nothing(None, None, None, None)]
    fn first_of_layering(
        #[case] flag: Option<&str>,
        #[case] env: Option<&str>,
        #[case] file: Option<&str>,
        #[case] expected: Option<&str>,
    ) {
        let result = first_of(
            flag.map(str::to_owned),
            env.map(str::to_owned),
            file.map(str::to_owned),
        );
        assert_eq!(result.as_deref(), expected);
    }

    #[test]
    fn config_file_round_trips_with_kebab_case_key() {
        let temp = tempfile::tempdir().expect("temp dir");
        let path =
            Utf8PathBuf::try_from(temp.path().join(CONFIG_FILE_NAME)).expect("utf-8 temp path");
        let config = ConfigFile {
            host: Some("https://docs.example.com".to_owned()),
            api_key: Some("secret".to_owned()),
        };

        write_config(&path, &config).expect("write config");
        let written = std::fs::read_to_string(&path).expect("read back");
        assert!(written.contains("api-key: secret"));

        let loaded = load_config(&path).expect("load config");
        assert_eq!(loaded, config);
    }

    #[test]
    fn resolve_reads_explicit_config_file() {
        let temp = tempfile::tempdir().expect("temp dir");
        let path =
            Utf8PathBuf::try_from(temp.path().join(CONFIG_FILE_NAME)).expect("utf-8 temp path");
        write_config(
            &path,
            &ConfigFile {
                host: Some("https://from-file".to_owned()),
                api_key: None,
            },
        )
        .expect("write config");

        let settings = without_docatl_env(|| {
            Settings::resolve(&Overrides {
                config: Some(path.clone()),
                ..Overrides::default()
            })
        })
        .expect("resolve");
        assert_eq!(settings.host.as_deref(), Some("https://from-file"));
        assert_eq!(settings.api_key, None);
        assert_eq!(settings.config_path, path);
    }

    #[test]
    fn flag_overrides_config_file() {
        let temp = tempfile::tempdir().expect("temp dir");
        let path =
            Utf8PathBuf::try_from(temp.path().join(CONFIG_FILE_NAME)).expect("utf-8 temp path");
        write_config(
            &path,
            &ConfigFile {
                host: Some("https://from-file".to_owned()),
                api_key: None,
            },
        )
        .expect("write config");

        let settings = without_docatl_env(|| {
            Settings::resolve(&Overrides {
                host: Some("https://from-flag".to_owned()),
                config: Some(path),
                ..Overrides::default()
            })
        })
        .expect("resolve");
        assert_eq!(settings.host.as_deref(), Some("https://from-flag"));
    }

    #[test]
    fn environment_overrides_config_file() {
        let temp = tempfile::tempdir().expect("temp dir");
        let path =
            Utf8PathBuf::try_from(temp.path().join(CONFIG_FILE_NAME)).expect("utf-8 temp path");
        write_config(
            &path,
            &ConfigFile {
                host: Some("https://from-file".to_owned()),
                api_key: Some("file-key".to_owned()),
            },
        )
        .expect("write config");

        let settings = temp_env::with_vars(
            [
                (ENV_HOST, Some("https://from-env")),
                (ENV_API_KEY, None::<&str>),
            ],
            || {
                Settings::resolve(&Overrides {
                    config: Some(path),
                    ..Overrides::default()
                })
            },
        )
        .expect("resolve");
        assert_eq!(settings.host.as_deref(), Some("https://from-env"));
        assert_eq!(settings.api_key.as_deref(), Some("file-key"));
    }

    #[test]
    fn malformed_config_file_is_a_config_error() {
        let temp = tempfile::tempdir().expect("temp dir");
        let path =
            Utf8PathBuf::try_from(temp.path().join(CONFIG_FILE_NAME)).expect("utf-8 temp path");
        std::fs::write(&path, "host: [unterminated\n").expect("write config");

        let result = without_docatl_env(|| {
            Settings::resolve(&Overrides {
                config: Some(path),
                ..Overrides::default()
            })
        });
        assert!(matches!(result, Err(DocatlError::Config { .. })));
    }

    #[test]
    fn require_host_hints_at_all_three_layers() {
        let settings = Settings::default();
        let err = settings.require_host().expect_err("host should be missing");
        let msg = err.to_string();
        assert!(msg.contains("--host"));
        assert!(msg.contains(ENV_HOST));
        assert!(msg.contains("host:"));
    }
}
