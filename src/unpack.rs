//! Fetch-and-extract pipeline behind `dlunzip`.
//!
//! Downloads an archive into a private temporary directory, extracts it
//! there, and only then replaces the contents of the target directory. A
//! failure before the final move leaves the target untouched.

use crate::archive::{self, Format};
use crate::error::{Error, IoContext, Result};
use crate::fs_utils;
use crate::http;
use crate::interrupt::CleanupGuard;
use crate::output;
use crate::url;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Knobs for a fetch-and-extract run.
#[derive(Debug, Clone)]
pub struct UnpackOptions {
    /// Download timeout
    pub timeout: Duration,
    /// Print the target directory listing when done
    pub show_listing: bool,
    /// Where the temporary workspace is created (system temp dir if unset)
    pub temp_root: Option<PathBuf>,
}

impl Default for UnpackOptions {
    fn default() -> Self {
        Self {
            timeout: http::default_timeout(),
            show_listing: true,
            temp_root: None,
        }
    }
}

/// What a successful run did.
#[derive(Debug, Clone)]
pub struct UnpackReport {
    pub filename: String,
    pub format: Format,
    pub bytes: u64,
    pub target: PathBuf,
    /// Top-level entries moved into the target, sorted
    pub entries: Vec<String>,
}

/// A validated download: filename and format known, tool present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Plan {
    pub url: String,
    pub filename: String,
    pub format: Format,
}

/// Check everything that can be checked without touching the network or the
/// target directory.
pub fn plan(url: &str) -> Result<Plan> {
    url::validate_download_url(url)?;

    let filename = url::extract_filename(url).ok_or_else(|| Error::NoFilename(url.to_string()))?;
    let format =
        Format::detect(&filename).ok_or_else(|| Error::UnsupportedFormat(filename.clone()))?;
    archive::check_tool(format)?;

    Ok(Plan {
        url: url.to_string(),
        filename,
        format,
    })
}

/// Download `url`, extract it, and replace the contents of `target` with the
/// extracted files.
pub fn fetch_and_extract(url: &str, target: &Path, options: &UnpackOptions) -> Result<UnpackReport> {
    let plan = plan(url)?;
    output::field("target", &target.display().to_string());

    let mut builder = tempfile::Builder::new();
    let prefix = format!("dlunzip_{}_", std::process::id());
    builder.prefix(&prefix);
    let workspace = match &options.temp_root {
        Some(root) => builder.tempdir_in(root),
        None => builder.tempdir(),
    }
    .io_context(|| "cannot create temporary directory")?;
    let cleanup = CleanupGuard::new(workspace.path());

    let archive_path = workspace.path().join(&plan.filename);
    let extract_dir = workspace.path().join("extracted");

    output::step(&format!("Downloading {}", plan.url));
    let bytes = http::download(&plan.url, &archive_path, options.timeout)?;
    output::note(&format!("downloaded {} ({} bytes)", plan.filename, bytes));

    output::step(&format!("Extracting {} ({})", plan.filename, plan.format));
    archive::extract(&archive_path, &extract_dir, &plan.filename, plan.format)?;

    if fs_utils::is_empty_dir(&extract_dir)? {
        return Err(Error::EmptyArchive);
    }

    output::note(&format!("clearing {}", target.display()));
    fs_utils::clear_dir(target)?;

    output::note(&format!("moving files to {}", target.display()));
    let entries = fs_utils::move_dir_contents(&extract_dir, target)?;

    workspace
        .close()
        .io_context(|| "cannot remove temporary directory")?;
    drop(cleanup);

    output::done(&format!("Extracted to {}", target.display()));
    if options.show_listing {
        print_listing(target)?;
    }

    Ok(UnpackReport {
        filename: plan.filename,
        format: plan.format,
        bytes,
        target: target.to_path_buf(),
        entries,
    })
}

/// Print the contents of `dir` with sizes.
pub fn print_listing(dir: &Path) -> Result<()> {
    output::heading("Contents:");
    for entry in fs_utils::list_dir(dir)? {
        output::list_item(&entry.size_label(), &entry.name, entry.is_dir);
    }
    Ok(())
}
