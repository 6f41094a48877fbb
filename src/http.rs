//! HTTP download helpers
//!
//! Streams a URL to a file on disk with a progress bar.
//!
//! ## Timeout
//!
//! Set `CLI_TOOLS_HTTP_TIMEOUT` (seconds) to change the download timeout:
//! ```bash
//! export CLI_TOOLS_HTTP_TIMEOUT=600
//! ```

use crate::error::{Error, IoContext, Result};
use crate::progress::Progress;
use std::io::{Read, Write};
use std::path::Path;
use std::sync::OnceLock;
use std::time::Duration;

/// Environment variable overriding the download timeout
pub const TIMEOUT_ENV: &str = "CLI_TOOLS_HTTP_TIMEOUT";

/// Default download timeout in seconds
const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 300;

/// Allowed timeout range in seconds
const MIN_TIMEOUT_SECS: u64 = 5;
const MAX_TIMEOUT_SECS: u64 = 3600;

const USER_AGENT: &str = concat!("cli-tools/", env!("CARGO_PKG_VERSION"));

/// Clamp a timeout to the supported range.
pub fn clamp_timeout(secs: u64) -> Duration {
    Duration::from_secs(secs.clamp(MIN_TIMEOUT_SECS, MAX_TIMEOUT_SECS))
}

/// Get the HTTP timeout from the environment or use the default.
/// Cached (only reads the env var once).
pub fn default_timeout() -> Duration {
    static TIMEOUT: OnceLock<Duration> = OnceLock::new();
    *TIMEOUT.get_or_init(|| {
        let secs = std::env::var(TIMEOUT_ENV)
            .ok()
            .and_then(|s| s.trim().parse::<u64>().ok())
            .unwrap_or(DEFAULT_HTTP_TIMEOUT_SECS);
        clamp_timeout(secs)
    })
}

/// Download `url` into `dest`, returning the number of bytes written.
///
/// Shows a spinner that upgrades to a byte bar when the server sends
/// `Content-Length`.
pub fn download(url: &str, dest: &Path, timeout: Duration) -> Result<u64> {
    let filename = dest
        .file_name()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "download".to_string());

    let progress = Progress::spinner(&format!("downloading {}", filename));

    let response = ureq::get(url)
        .timeout(timeout)
        .set("User-Agent", USER_AGENT)
        .call()
        .map_err(|e| match e {
            ureq::Error::Status(status, _) => Error::HttpStatus {
                url: url.to_string(),
                status,
            },
            ureq::Error::Transport(t) => Error::Download(t.to_string()),
        })?;

    if let Some(len) = response
        .header("content-length")
        .and_then(|s| s.parse().ok())
    {
        progress.set_total(len);
    }

    let mut file = std::fs::File::create(dest)
        .io_context(|| format!("cannot create {}", dest.display()))?;

    let mut reader = response.into_reader();
    let mut buffer = [0u8; 8192];
    let mut total_bytes = 0u64;

    loop {
        let bytes_read = reader
            .read(&mut buffer)
            .map_err(|e| Error::Download(format!("read error: {}", e)))?;

        if bytes_read == 0 {
            break;
        }

        file.write_all(&buffer[..bytes_read])
            .io_context(|| format!("write error for {}", dest.display()))?;

        total_bytes += bytes_read as u64;
        progress.set_position(total_bytes);
    }

    file.flush()
        .io_context(|| format!("write error for {}", dest.display()))?;

    Ok(total_bytes)
}
