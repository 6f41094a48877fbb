//! kv-splitter - split delimited lists such as PATH or cookie strings
//!
//! Reads stdin, splits it into items and prints them one per line (or with a
//! custom separator). Items may be split into key and value.
//!
//! Examples:
//!   echo "$PATH" | kv-splitter -p path -i :
//!   pbpaste | kv-splitter -p cookies

use anyhow::{Context, Result};
use clap::Parser;
use cli_tools::text::{self, SplitConfig};
use cli_tools::{cli, output};
use std::io::Read;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "kv-splitter")]
#[command(about = "Split and format delimited key/value lists read from stdin")]
#[command(version)]
struct Cli {
    /// Preset: path or cookies (explicit options are ignored when set)
    #[arg(short, long)]
    pattern: Option<String>,

    /// Item separator
    #[arg(short = 'i', long, default_value = ";")]
    item_separator: String,

    /// Key/value separator (items are not split when omitted)
    #[arg(short = 'k', long)]
    kv_separator: Option<String>,

    /// Replacement between items (escapes: \n \t \r \\)
    #[arg(short = 'I', long, default_value = "\\n")]
    item_replacement: String,

    /// Replacement between key and value (escapes: \n \t \r \\)
    #[arg(short = 'K', long, default_value = "\\t")]
    kv_replacement: String,
}

impl Cli {
    fn split_config(&self) -> SplitConfig {
        if let Some(pattern) = &self.pattern {
            if let Some(preset) = SplitConfig::from_preset(pattern) {
                return preset;
            }
            output::warn(&format!(
                "unknown pattern '{}', using explicit options",
                pattern
            ));
        }

        SplitConfig {
            item_separator: text::unescape(&self.item_separator),
            kv_separator: self.kv_separator.as_deref().map(text::unescape),
            item_replacement: text::unescape(&self.item_replacement),
            kv_replacement: text::unescape(&self.kv_replacement),
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = cli.split_config();

    let mut input = String::new();
    std::io::stdin()
        .read_to_string(&mut input)
        .context("cannot read stdin")?;

    println!("{}", text::split_items(input.trim(), &config));
    Ok(())
}

fn main() -> ExitCode {
    let cli = cli::parse::<Cli>();
    cli::finish(run(cli))
}
