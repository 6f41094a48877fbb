//! dl-latest-rs - download the latest release of a repository for this platform
//!
//! Usage:
//!   dl-latest-rs <base_url> <target_dir>
//!
//! Fetches `<base_url>/releases/latest/download/<repo>-<platform>.zip`,
//! extracts it into the target directory and marks the files executable.

use anyhow::{Context, Result};
use clap::Parser;
use cli_tools::release::{self, Platform};
use cli_tools::unpack::UnpackOptions;
use cli_tools::{cli, http, interrupt};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "dl-latest-rs")]
#[command(about = "Download and extract the latest release asset for this platform")]
#[command(version)]
struct Cli {
    /// Repository URL, e.g. https://github.com/owner/repo
    base_url: String,

    /// Directory to extract the release into
    target_dir: PathBuf,

    /// Download timeout in seconds
    #[arg(long, env = http::TIMEOUT_ENV, value_name = "SECS")]
    timeout: Option<u64>,
}

fn run(cli: Cli) -> Result<()> {
    let platform = Platform::current()?;
    let _interrupt = interrupt::install().context("cannot install interrupt handler")?;

    let options = UnpackOptions {
        timeout: cli.timeout.map(http::clamp_timeout).unwrap_or_else(http::default_timeout),
        show_listing: true,
        temp_root: None,
    };

    release::download_latest(&cli.base_url, &cli.target_dir, platform, &options)
        .with_context(|| format!("cannot fetch latest release of {}", cli.base_url))?;
    Ok(())
}

fn main() -> ExitCode {
    let cli = cli::parse::<Cli>();
    cli::finish(run(cli))
}
