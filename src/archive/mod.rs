//! Archive format detection and extraction
//!
//! Formats are picked by matching the filename suffix against a fixed table.
//! Most formats are extracted with native Rust libraries; `.7z` and `.rar`
//! need the `7z` and `unrar` tools on `PATH`.

mod external;
mod stream;
mod tarball;
mod zipfile;

pub use external::{find_tool, ExternalTool};

use crate::error::{Error, IoContext, Result};
use crate::progress;
use std::fmt;
use std::path::Path;

/// A supported archive format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Zip,
    TarGz,
    TarBz2,
    TarXz,
    TarZst,
    Tar,
    Gz,
    Bz2,
    Xz,
    Zst,
    SevenZip,
    Rar,
}

/// Suffix table, checked in order. Compound tar suffixes must come before
/// their single-stream counterparts.
const SUFFIXES: &[(&str, Format)] = &[
    (".zip", Format::Zip),
    (".tar.gz", Format::TarGz),
    (".tgz", Format::TarGz),
    (".tar.bz2", Format::TarBz2),
    (".tbz2", Format::TarBz2),
    (".tar.xz", Format::TarXz),
    (".txz", Format::TarXz),
    (".tar.zst", Format::TarZst),
    (".tzst", Format::TarZst),
    (".tar", Format::Tar),
    (".gz", Format::Gz),
    (".bz2", Format::Bz2),
    (".xz", Format::Xz),
    (".zst", Format::Zst),
    (".7z", Format::SevenZip),
    (".rar", Format::Rar),
];

impl Format {
    /// Detect the archive format from a filename extension (case-insensitive).
    pub fn detect(filename: &str) -> Option<Format> {
        let lower = filename.to_lowercase();
        SUFFIXES
            .iter()
            .find(|(suffix, _)| lower.ends_with(suffix))
            .map(|(_, format)| *format)
    }

    /// Canonical short name, e.g. `tar.gz`.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Zip => "zip",
            Self::TarGz => "tar.gz",
            Self::TarBz2 => "tar.bz2",
            Self::TarXz => "tar.xz",
            Self::TarZst => "tar.zst",
            Self::Tar => "tar",
            Self::Gz => "gz",
            Self::Bz2 => "bz2",
            Self::Xz => "xz",
            Self::Zst => "zst",
            Self::SevenZip => "7z",
            Self::Rar => "rar",
        }
    }

    /// External tool this format is extracted with, if any.
    pub fn external_tool(&self) -> Option<ExternalTool> {
        match self {
            Self::SevenZip => Some(ExternalTool::SevenZip),
            Self::Rar => Some(ExternalTool::Unrar),
            _ => None,
        }
    }

    /// True for formats that wrap a single compressed file rather than a tree.
    pub fn is_single_stream(&self) -> bool {
        matches!(self, Self::Gz | Self::Bz2 | Self::Xz | Self::Zst)
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Name of the file produced by a single-stream format: the archive name
/// minus its compression suffix.
pub fn single_stream_output_name(filename: &str, format: Format) -> String {
    let suffix_len = format.name().len() + 1;
    let stem = if filename.len() > suffix_len && filename.is_char_boundary(filename.len() - suffix_len)
    {
        &filename[..filename.len() - suffix_len]
    } else {
        ""
    };

    if stem.is_empty() || stem == "." || stem == ".." {
        "download".to_string()
    } else {
        stem.to_string()
    }
}

/// Make sure the tool needed for `format` is installed.
///
/// Returns `Ok(())` for formats extracted natively.
pub fn check_tool(format: Format) -> Result<()> {
    if let Some(tool) = format.external_tool() {
        find_tool(tool, format)?;
    }
    Ok(())
}

/// Extract `archive_path` into `dest` using the given format.
///
/// `filename` is the original archive name; single-stream formats use it to
/// name their output.
pub fn extract(archive_path: &Path, dest: &Path, filename: &str, format: Format) -> Result<()> {
    std::fs::create_dir_all(dest)
        .io_context(|| format!("cannot create directory {}", dest.display()))?;

    if let Some(tool) = format.external_tool() {
        // External tools draw their own output; no spinner.
        let binary = find_tool(tool, format)?;
        return external::run(tool, &binary, archive_path, dest);
    }

    progress::with_spinner(&format!("extracting {}", filename), || match format {
        Format::Zip => zipfile::extract_zip(archive_path, dest),
        Format::TarGz => tarball::extract_tar_gz(archive_path, dest),
        Format::TarBz2 => tarball::extract_tar_bz2(archive_path, dest),
        Format::TarXz => tarball::extract_tar_xz(archive_path, dest),
        Format::TarZst => tarball::extract_tar_zst(archive_path, dest),
        Format::Tar => tarball::extract_tar_plain(archive_path, dest),
        Format::Gz | Format::Bz2 | Format::Xz | Format::Zst => {
            let output = dest.join(single_stream_output_name(filename, format));
            stream::decompress(archive_path, &output, format)
        }
        Format::SevenZip | Format::Rar => Err(Error::UnsupportedFormat(filename.to_string())),
    })
}
