//! Latest-release downloads for the host platform (`dl-latest-rs`).
//!
//! A repository URL such as `https://github.com/org/cli-tools` maps to the
//! asset `cli-tools-<platform>.zip` of its latest release.

use crate::error::{Error, Result};
use crate::fs_utils;
use crate::output;
use crate::unpack::{self, UnpackOptions, UnpackReport};
use crate::url;
use std::fmt;
use std::path::Path;

/// Operating systems that release assets are published for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Linux,
    Windows,
    MacOs,
}

impl Platform {
    /// Platform of the running binary.
    pub fn current() -> Result<Platform> {
        Self::from_os(std::env::consts::OS)
    }

    /// Map an OS name as reported by `std::env::consts::OS`.
    pub fn from_os(os: &str) -> Result<Platform> {
        match os {
            "linux" => Ok(Self::Linux),
            "windows" => Ok(Self::Windows),
            "macos" => Ok(Self::MacOs),
            other => Err(Error::UnsupportedPlatform(other.to_string())),
        }
    }

    /// Suffix appended to the repository name to form the asset name.
    pub fn asset_suffix(&self) -> &'static str {
        match self {
            Self::Linux => "-linux.zip",
            Self::Windows => "-windows.zip",
            Self::MacOs => "-macos.zip",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Linux => "Linux",
            Self::Windows => "Windows",
            Self::MacOs => "macOS",
        })
    }
}

/// Build the latest-release asset URL for `base_url` on `platform`.
///
/// # Example
/// ```
/// use cli_tools::release::{release_download_url, Platform};
/// assert_eq!(
///     release_download_url("https://example.com/org/cli-tools", Platform::Linux).unwrap(),
///     "https://example.com/org/cli-tools/releases/latest/download/cli-tools-linux.zip"
/// );
/// ```
pub fn release_download_url(base_url: &str, platform: Platform) -> Result<String> {
    let repo = repo_name(base_url)?;

    Ok(format!(
        "{}/releases/latest/download/{}{}",
        base_url.trim_end_matches('/'),
        repo,
        platform.asset_suffix()
    ))
}

/// Repository name: the last path segment of `base_url`.
pub fn repo_name(base_url: &str) -> Result<String> {
    url::extract_repo_name(base_url).ok_or_else(|| Error::NoRepoName(base_url.to_string()))
}

/// Download and extract the latest release asset of `base_url` into
/// `target`, then mark every extracted file executable.
pub fn download_latest(
    base_url: &str,
    target: &Path,
    platform: Platform,
    options: &UnpackOptions,
) -> Result<UnpackReport> {
    let download_url = release_download_url(base_url, platform)?;

    output::field("platform", &platform.to_string());
    output::field("url", &download_url);

    let report = unpack::fetch_and_extract(&download_url, target, options)?;

    output::step("Marking files executable");
    let changes = fs_utils::make_executable(target)?;
    if platform == Platform::Windows {
        output::note("Windows has no execute bit; files are runnable as-is");
    }
    for change in &changes {
        let name = change
            .path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        output::file_status(&name, change.error.as_deref());
    }

    Ok(report)
}
