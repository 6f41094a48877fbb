//! dlunzip - download an archive and extract it into a directory
//!
//! Usage:
//!   dlunzip <url> [target_dir]
//!
//! The target directory (default `.`) is emptied and replaced with the
//! archive contents only after the download and extraction succeed.

use anyhow::{Context, Result};
use clap::Parser;
use cli_tools::unpack::{self, UnpackOptions};
use cli_tools::{cli, http, interrupt};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "dlunzip")]
#[command(about = "Download an archive and extract it into a directory")]
#[command(version)]
struct Cli {
    /// Archive URL (http or https)
    url: String,

    /// Directory whose contents are replaced by the archive contents
    #[arg(default_value = ".")]
    target_dir: PathBuf,

    /// Download timeout in seconds
    #[arg(long, env = http::TIMEOUT_ENV, value_name = "SECS")]
    timeout: Option<u64>,

    /// Don't print the directory listing when done
    #[arg(short, long)]
    quiet: bool,
}

fn run(cli: Cli) -> Result<()> {
    let _interrupt = interrupt::install().context("cannot install interrupt handler")?;

    let options = UnpackOptions {
        timeout: cli.timeout.map(http::clamp_timeout).unwrap_or_else(http::default_timeout),
        show_listing: !cli.quiet,
        temp_root: None,
    };

    unpack::fetch_and_extract(&cli.url, &cli.target_dir, &options)
        .with_context(|| format!("dlunzip {} failed", cli.url))?;
    Ok(())
}

fn main() -> ExitCode {
    let cli = cli::parse::<Cli>();
    cli::finish(run(cli))
}
