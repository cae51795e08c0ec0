//! CLI argument definitions for docatl.
//!
//! This module defines the command-line interface using clap. It is
//! separated from the main entrypoint to keep the binary focused on
//! orchestration.

use crate::config::Overrides;
use camino::Utf8PathBuf;
use clap::{Args, Parser, Subcommand};

/// Manage docat documentation easily.
#[derive(Parser, Debug)]
#[command(name = "docatl")]
#[command(version, about = "Manage docat documentation easily")]
#[command(long_about = concat!(
    "docatl - manage docat documentation, easily.\n\n",
    "Upload documentation:\n\n",
    "\tdocatl push ./docs.zip myproject 1.0.0 -t latest\n\n",
    "Upload documentation to a specific docat server:\n\n",
    "\tdocatl push --host localhost:8000 ./docs.zip myproject 1.0.0 -t latest\n",
))]
#[command(after_help = concat!(
    "CONFIGURATION:\n",
    "  The host and API key resolve from --host/--api-key flags, the\n",
    "  DOCATL_HOST and DOCATL_API_KEY environment variables, or a\n",
    "  .docatl.yaml file in the working or home directory, in that order.\n\n",
    "EXAMPLES:\n",
    "  Package a documentation directory:\n",
    "    $ docatl build docs/ -p myproject -v 1.0.0\n\n",
    "  Push a pre-built artifact, letting embedded metadata fill the gaps:\n",
    "    $ docatl push docs_myproject_1.0.0.zip\n\n",
    "  Claim a project and store the token:\n",
    "    $ docatl claim myproject --save\n",
))]
pub struct Cli {
    /// docat server base URL (e.g. <https://docat.company.com:8000>).
    #[arg(long, global = true, value_name = "URL")]
    pub host: Option<String>,

    /// docat API key for write operations.
    #[arg(long = "api-key", global = true, value_name = "KEY")]
    pub api_key: Option<String>,

    /// Config file path [default: .docatl.yaml in cwd or home].
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<Utf8PathBuf>,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// The flag-level settings layer.
    #[must_use]
    pub fn overrides(&self) -> Overrides {
        Overrides {
            host: self.host.clone(),
            api_key: self.api_key.clone(),
            config: self.config.clone(),
        }
    }
}

/// Available subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Build a documentation artifact to push to a docat server.
    Build(BuildArgs),

    /// Push documentation to a docat server.
    Push(PushArgs),

    /// Tag an existing documentation version on a docat server.
    Tag(TagArgs),

    /// Delete documentation from a docat server.
    Delete(VersionArgs),

    /// Claim a docat project.
    Claim(ClaimArgs),

    /// Rename a project.
    Rename(RenameArgs),

    /// Hide a project version from the version select and search index.
    Hide(VersionArgs),

    /// Show a previously hidden project version again.
    Show(VersionArgs),

    /// Force re-creation of the search index.
    UpdateIndex,

    /// Push an icon for a project.
    PushIcon(PushIconArgs),
}

/// Arguments for `docatl build`.
#[derive(Args, Debug, Clone)]
pub struct BuildArgs {
    /// Documentation directory to package.
    #[arg(value_name = "DOCS")]
    pub docs: Utf8PathBuf,

    /// Name of the docat project.
    #[arg(short, long, value_name = "NAME")]
    pub project: Option<String>,

    /// Version of this documentation.
    #[arg(short = 'v', long, value_name = "VERSION")]
    pub version: Option<String>,
}

/// Arguments for `docatl push`.
#[derive(Args, Debug, Clone)]
pub struct PushArgs {
    /// Documentation directory or pre-built artifact.
    #[arg(value_name = "DOCS")]
    pub docs: Utf8PathBuf,

    /// Name of the docat project [default: from embedded metadata].
    #[arg(value_name = "PROJECT")]
    pub project: Option<String>,

    /// Version of this documentation [default: from embedded metadata].
    #[arg(value_name = "VERSION")]
    pub version: Option<String>,

    /// Additional tag for this version (can be repeated).
    #[arg(short = 't', long = "tag", value_name = "TAG")]
    pub tags: Vec<String>,
}

/// Arguments for `docatl tag`.
#[derive(Args, Debug, Clone)]
pub struct TagArgs {
    /// Name of the docat project.
    #[arg(value_name = "PROJECT")]
    pub project: String,

    /// Version to tag.
    #[arg(value_name = "VERSION")]
    pub version: String,

    /// Tags to apply, in order.
    #[arg(value_name = "TAG", required = true, num_args = 1..)]
    pub tags: Vec<String>,
}

/// A (project, version) pair for delete/hide/show.
#[derive(Args, Debug, Clone)]
pub struct VersionArgs {
    /// Name of the docat project.
    #[arg(value_name = "PROJECT")]
    pub project: String,

    /// Version of the documentation.
    #[arg(value_name = "VERSION")]
    pub version: String,
}

/// Arguments for `docatl claim`.
#[derive(Args, Debug, Clone)]
pub struct ClaimArgs {
    /// Name of the docat project.
    #[arg(value_name = "PROJECT")]
    pub project: String,

    /// Store the claimed token in the config file.
    #[arg(long)]
    pub save: bool,
}

/// Arguments for `docatl rename`.
#[derive(Args, Debug, Clone)]
pub struct RenameArgs {
    /// Current project name.
    #[arg(value_name = "PROJECT")]
    pub project: String,

    /// New project name.
    #[arg(value_name = "NEW_NAME")]
    pub new_name: String,
}

/// Arguments for `docatl push-icon`.
#[derive(Args, Debug, Clone)]
pub struct PushIconArgs {
    /// Name of the docat project.
    #[arg(value_name = "PROJECT")]
    pub project: String,

    /// Path to the icon file.
    #[arg(value_name = "ICON_PATH")]
    pub icon: Utf8PathBuf,
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod tests;
