//! dq - strip one pair of surrounding double quotes from stdin
//!
//! One trailing line ending is dropped first; the result is written to
//! stdout without a newline.

use anyhow::{Context, Result};
use clap::Parser;
use cli_tools::{cli, text};
use std::io::{Read, Write};
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "dq")]
#[command(about = "Remove surrounding double quotes from stdin")]
#[command(version)]
struct Cli {}

fn run() -> Result<()> {
    let mut input = String::new();
    std::io::stdin()
        .read_to_string(&mut input)
        .context("cannot read stdin")?;

    let mut stdout = std::io::stdout().lock();
    stdout
        .write_all(text::strip_quotes(text::trim_line_ending(&input)).as_bytes())
        .context("cannot write stdout")?;
    stdout.flush().context("cannot write stdout")?;
    Ok(())
}

fn main() -> ExitCode {
    let _cli = cli::parse::<Cli>();
    cli::finish(run())
}
