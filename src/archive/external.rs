//! Extraction through external tools (`7z`, `unrar`).

use super::Format;
use crate::error::{Error, Result};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

/// An external extraction tool looked up on `PATH`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExternalTool {
    SevenZip,
    Unrar,
}

impl ExternalTool {
    /// Binary name searched on `PATH`.
    pub fn binary(&self) -> &'static str {
        match self {
            Self::SevenZip => "7z",
            Self::Unrar => "unrar",
        }
    }

    /// Command-line arguments that extract `archive` into `dest`.
    pub fn args(&self, archive: &Path, dest: &Path) -> Vec<OsString> {
        match self {
            Self::SevenZip => {
                let mut out = OsString::from("-o");
                out.push(dest.as_os_str());
                vec!["x".into(), archive.as_os_str().to_owned(), out]
            }
            Self::Unrar => {
                // unrar treats a trailing separator as "extract into this directory".
                let mut dir = dest.as_os_str().to_owned();
                dir.push(std::path::MAIN_SEPARATOR_STR);
                vec!["x".into(), archive.as_os_str().to_owned(), dir]
            }
        }
    }
}

/// Locate the tool needed for `format` on `PATH`.
pub fn find_tool(tool: ExternalTool, format: Format) -> Result<PathBuf> {
    which::which(tool.binary()).map_err(|_| Error::ToolNotFound {
        tool: tool.binary(),
        format: format.name(),
    })
}

/// Run `binary` to extract `archive` into `dest`.
///
/// The tool's own output streams to the terminal.
pub(super) fn run(tool: ExternalTool, binary: &Path, archive: &Path, dest: &Path) -> Result<()> {
    let status = Command::new(binary)
        .args(tool.args(archive, dest))
        .stdin(Stdio::inherit())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .status()
        .map_err(|e| Error::io(format!("failed to execute {}", tool.binary()), e))?;

    if !status.success() {
        return Err(Error::ToolFailed {
            tool: tool.binary(),
            code: status.code(),
        });
    }

    Ok(())
}
