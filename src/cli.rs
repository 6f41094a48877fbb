//! Shared front-end plumbing for the binaries.

use crate::output;
use clap::Parser;
use std::process::ExitCode;

/// Parse the command line, exiting on `--help`/`--version` (status 0) or a
/// usage error (status 1).
pub fn parse<P: Parser>() -> P {
    match P::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            std::process::exit(usage_exit_status(&e));
        }
    }
}

/// Exit status for a clap parse error: 0 for help and version output,
/// 1 for anything else.
pub fn usage_exit_status(e: &clap::Error) -> i32 {
    if e.use_stderr() { 1 } else { 0 }
}

/// Turn a command's result into the process exit code, printing the error
/// chain on failure.
pub fn finish(result: anyhow::Result<()>) -> ExitCode {
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            output::error(&format!("{:#}", e));
            ExitCode::FAILURE
        }
    }
}
