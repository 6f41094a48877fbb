//! tee - copy stdin to stdout and to files

use anyhow::Result;
use clap::Parser;
use cli_tools::cli;
use cli_tools::tee::Tee;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "tee")]
#[command(about = "Copy stdin to stdout and to each FILE")]
#[command(version)]
struct Cli {
    /// Append to the files instead of overwriting them
    #[arg(short, long)]
    append: bool,

    /// Files to write
    files: Vec<PathBuf>,
}

fn run(cli: Cli) -> Result<()> {
    let mut tee = Tee::new(Box::new(std::io::stdout()));
    for file in &cli.files {
        tee.add_file(file, cli.append)?;
    }
    tee.copy_lines(std::io::stdin().lock())?;
    Ok(())
}

fn main() -> ExitCode {
    let cli = cli::parse::<Cli>();
    cli::finish(run(cli))
}
