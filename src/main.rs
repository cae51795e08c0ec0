//! docatl CLI entrypoint.
//!
//! This binary resolves settings from flags, environment, and config
//! file, then dispatches to the packaging, inspection, and remote
//! client code. Every failure is printed to stderr and maps to exit
//! code 1.

use camino::Utf8PathBuf;
use clap::Parser;
use docatl::artifact::extraction::extract_metadata;
use docatl::artifact::metadata::BuildMetadata;
use docatl::artifact::packaging;
use docatl::cli::{BuildArgs, ClaimArgs, Cli, Command, PushArgs};
use docatl::client::DocatClient;
use docatl::config::{ConfigFile, Settings, missing_host_error, write_config};
use docatl::error::{DocatlError, Result};
use docatl::output::{
    build_success_message, push_success_message, tag_success_message, write_stderr_line,
};
use docatl::source::DocsSource;
use std::io::Write;

fn main() {
    let cli = Cli::parse();
    let mut stderr = std::io::stderr();
    let run_result = run(&cli, &mut stderr);
    let exit_code = exit_code_for_run_result(run_result, &mut stderr);
    if exit_code != 0 {
        std::process::exit(exit_code);
    }
}

fn run(cli: &Cli, stderr: &mut dyn Write) -> Result<()> {
    let settings = Settings::resolve(&cli.overrides())?;

    match &cli.command {
        Command::Build(args) => run_build(args, &settings, stderr),
        Command::Push(args) => run_push(args, &settings, stderr),
        Command::Tag(args) => {
            let client = client_for(&settings)?;
            apply_tags(&client, &args.project, &args.version, &args.tags, stderr)
        }
        Command::Delete(args) => {
            let client = client_for(&settings)?;
            client.delete(&args.project, &args.version)?;
            write_stderr_line(
                stderr,
                format!(
                    "Successfully deleted version {} of project {}",
                    args.version, args.project
                ),
            );
            Ok(())
        }
        Command::Claim(args) => run_claim(args, &settings, stderr),
        Command::Rename(args) => {
            let client = client_for(&settings)?;
            client.rename(&args.project, &args.new_name)?;
            write_stderr_line(
                stderr,
                format!(
                    "Successfully renamed project {} to {}",
                    args.project, args.new_name
                ),
            );
            Ok(())
        }
        Command::Hide(args) => {
            let client = client_for(&settings)?;
            client.set_visibility(&args.project, &args.version, true)?;
            write_stderr_line(
                stderr,
                format!(
                    "Successfully hid version {} of project {}",
                    args.version, args.project
                ),
            );
            Ok(())
        }
        Command::Show(args) => {
            let client = client_for(&settings)?;
            client.set_visibility(&args.project, &args.version, false)?;
            write_stderr_line(
                stderr,
                format!(
                    "Successfully made version {} of project {} visible again",
                    args.version, args.project
                ),
            );
            Ok(())
        }
        Command::UpdateIndex => {
            let client = client_for(&settings)?;
            client.update_index()?;
            write_stderr_line(stderr, "Successfully updated search index");
            Ok(())
        }
        Command::PushIcon(args) => {
            let client = client_for(&settings)?;
            client.push_icon(&args.project, &args.icon)?;
            write_stderr_line(
                stderr,
                format!(
                    "Successfully pushed icon {} for project {}",
                    args.icon, args.project
                ),
            );
            Ok(())
        }
    }
}

/// Build a client for the resolved settings; remote operations cannot
/// proceed without a host.
fn client_for(settings: &Settings) -> Result<DocatClient> {
    let host = settings.require_host()?;
    Ok(DocatClient::new(
        host,
        settings.api_key.clone().unwrap_or_default(),
    ))
}

fn run_build(args: &BuildArgs, settings: &Settings, stderr: &mut dyn Write) -> Result<()> {
    let meta = BuildMetadata {
        // The host is embedded whenever known so a later push can
        // target the right server without flags.
        host: settings.host.clone().unwrap_or_default(),
        project: args.project.clone().unwrap_or_default(),
        version: args.version.clone().unwrap_or_default(),
    };
    let artifact = packaging::build(&args.docs, &meta)?;
    write_stderr_line(stderr, build_success_message(&artifact));
    Ok(())
}

fn run_push(args: &PushArgs, settings: &Settings, stderr: &mut dyn Write) -> Result<()> {
    let target = resolve_push_target(args, settings)?;
    let client = DocatClient::new(
        target.host.as_str(),
        settings.api_key.clone().unwrap_or_default(),
    );

    client.publish(&target.project, &target.version, &target.artifact)?;
    write_stderr_line(
        stderr,
        push_success_message(&target.project, &target.version),
    );

    apply_tags(&client, &target.project, &target.version, &args.tags, stderr)
}

fn run_claim(args: &ClaimArgs, settings: &Settings, stderr: &mut dyn Write) -> Result<()> {
    let client = client_for(settings)?;
    let claim = client.claim(&args.project)?;
    write_stderr_line(
        stderr,
        format!(
            "Successfully claimed project {}. Store and use the following token: {}",
            args.project, claim.token
        ),
    );

    if args.save {
        let config = ConfigFile {
            host: settings.host.clone(),
            api_key: Some(claim.token),
        };
        write_config(&settings.config_path, &config)?;
        write_stderr_line(
            stderr,
            format!("Stored claim token in {}", settings.config_path),
        );
    }
    Ok(())
}

/// Everything a publish needs, after the inspect-or-build branch and
/// metadata precedence rules have been applied.
struct PushTarget {
    artifact: Utf8PathBuf,
    host: String,
    project: String,
    version: String,
}

/// Resolve the push argument into an artifact plus publish coordinates.
/// Explicitly supplied values win; metadata embedded in an existing
/// artifact fills the gaps.
fn resolve_push_target(args: &PushArgs, settings: &Settings) -> Result<PushTarget> {
    let (artifact, embedded) = match DocsSource::classify(&args.docs)? {
        DocsSource::Directory(dir) => {
            let meta = BuildMetadata {
                host: settings.host.clone().unwrap_or_default(),
                project: args.project.clone().unwrap_or_default(),
                version: args.version.clone().unwrap_or_default(),
            };
            let artifact = packaging::build(&dir, &meta)?;
            (artifact, meta)
        }
        DocsSource::Artifact(path) => {
            let embedded = extract_metadata(&path)?;
            (path, embedded)
        }
    };

    let project = pick(args.project.as_deref(), &embedded.project).ok_or_else(|| {
        DocatlError::invalid_input(
            "project is required; pass it on the command line or embed it with `docatl build`",
        )
    })?;
    let version = pick(args.version.as_deref(), &embedded.version).ok_or_else(|| {
        DocatlError::invalid_input(
            "version is required; pass it on the command line or embed it with `docatl build`",
        )
    })?;
    let host = pick(settings.host.as_deref(), &embedded.host).ok_or_else(missing_host_error)?;

    Ok(PushTarget {
        artifact,
        host,
        project,
        version,
    })
}

/// Explicit value first, embedded metadata second; empty counts as
/// absent on both sides.
fn pick(explicit: Option<&str>, embedded: &str) -> Option<String> {
    explicit
        .filter(|value| !value.is_empty())
        .map(str::to_owned)
        .or_else(|| (!embedded.is_empty()).then(|| embedded.to_owned()))
}

/// Apply tags strictly in order. The first failure aborts the remaining
/// tags; already applied tags stay in place on the server.
fn apply_tags(
    client: &DocatClient,
    project: &str,
    version: &str,
    tags: &[String],
    stderr: &mut dyn Write,
) -> Result<()> {
    for tag in tags {
        client.tag(project, version, tag)?;
        write_stderr_line(stderr, tag_success_message(project, version, tag));
    }
    Ok(())
}

fn exit_code_for_run_result(result: Result<()>, stderr: &mut dyn Write) -> i32 {
    match result {
        Ok(()) => 0,
        Err(err) => {
            write_stderr_line(stderr, err);
            1
        }
    }
}
