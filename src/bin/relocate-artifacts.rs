//! relocate-artifacts - collect release executables and drop build trees
//!
//! Looks for `*/target/release` next to the release directory, moves the
//! executables it finds there into the release directory and deletes each
//! `target` directory afterwards.

use anyhow::{Context, Result};
use clap::Parser;
use cli_tools::{cli, output, relocate};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "relocate-artifacts")]
#[command(about = "Move built executables into the release directory and remove target/ trees")]
#[command(version)]
struct Cli {
    /// Release directory (default: the directory holding this executable).
    /// Builds are searched for in its parent.
    #[arg(long, value_name = "DIR")]
    release_dir: Option<PathBuf>,
}

fn default_release_dir() -> Result<PathBuf> {
    let exe = std::env::current_exe().context("cannot locate running executable")?;
    exe.parent()
        .map(PathBuf::from)
        .context("executable has no parent directory")
}

fn run(cli: Cli) -> Result<()> {
    let release_dir = match cli.release_dir {
        Some(dir) => dir,
        None => default_release_dir()?,
    };
    let release_dir = std::path::absolute(&release_dir)
        .with_context(|| format!("cannot resolve {}", release_dir.display()))?;
    let search_root = release_dir
        .parent()
        .map(PathBuf::from)
        .context("release directory has no parent")?;

    output::field("release", &release_dir.display().to_string());
    output::field("search", &search_root.display().to_string());

    let report = relocate::relocate(&search_root, &release_dir)?;

    let failures = report
        .projects
        .iter()
        .filter(|p| p.cleanup_error.is_some())
        .count();
    output::done(&format!(
        "Moved {} file(s) from {} build(s)",
        report.moved_count(),
        report.projects.len()
    ));
    if failures > 0 {
        output::warn(&format!("{} target director(ies) could not be removed", failures));
    }
    Ok(())
}

fn main() -> ExitCode {
    let cli = cli::parse::<Cli>();
    cli::finish(run(cli))
}
