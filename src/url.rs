//! URL helpers: scheme checks, archive filenames and repository names.
//!
//! URLs are handled as plain strings. Only the pieces the tools need are
//! parsed: the scheme prefix and the last path segment.

use crate::error::{Error, Result};

/// Schemes the downloader accepts.
pub const DOWNLOAD_SCHEMES: &[&str] = &["http://", "https://"];

/// Check that `url` starts with one of [`DOWNLOAD_SCHEMES`] (case-insensitive).
pub fn validate_download_url(url: &str) -> Result<()> {
    let has_scheme = DOWNLOAD_SCHEMES.iter().any(|scheme| {
        url.get(..scheme.len())
            .is_some_and(|head| head.eq_ignore_ascii_case(scheme))
    });
    if has_scheme {
        return Ok(());
    }

    Err(Error::InvalidUrl {
        url: url.to_string(),
        allowed: DOWNLOAD_SCHEMES.join(", "),
    })
}

/// Strip the query string and fragment from a URL.
fn strip_query(url: &str) -> &str {
    let clean = url.split('#').next().unwrap_or(url);
    clean.split('?').next().unwrap_or(clean)
}

/// Return the URL path component (everything after `scheme://host`).
fn url_path(url: &str) -> &str {
    let clean = strip_query(url);
    match clean.find("://") {
        Some(pos) => {
            let after_scheme = &clean[pos + 3..];
            after_scheme
                .find('/')
                .map(|slash| &after_scheme[slash..])
                .unwrap_or("")
        }
        None => clean,
    }
}

/// Extract the filename (last path segment) from a URL.
///
/// Returns `None` when the path is empty or ends with `/`.
///
/// # Example
/// ```
/// use cli_tools::url::extract_filename;
/// assert_eq!(extract_filename("https://example.com/foo-1.0.tar.gz").as_deref(), Some("foo-1.0.tar.gz"));
/// assert_eq!(extract_filename("https://example.com/file.zip?v=1").as_deref(), Some("file.zip"));
/// assert_eq!(extract_filename("https://example.com/"), None);
/// ```
pub fn extract_filename(url: &str) -> Option<String> {
    url_path(url)
        .rsplit('/')
        .next()
        .filter(|s| !s.is_empty() && *s != "." && *s != "..")
        .map(sanitize_filename)
}

/// Sanitize a filename for safe filesystem use.
///
/// Replaces characters that are invalid on common filesystems.
pub fn sanitize_filename(name: &str) -> String {
    let sanitized: String = name
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' | '\0' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();

    sanitized.trim().to_string()
}

/// Extract the repository name from a repository URL.
///
/// Trailing slashes are ignored.
///
/// # Example
/// ```
/// use cli_tools::url::extract_repo_name;
/// assert_eq!(extract_repo_name("https://github.com/org/cli-tools/").as_deref(), Some("cli-tools"));
/// ```
pub fn extract_repo_name(url: &str) -> Option<String> {
    let clean = strip_query(url).trim_end_matches('/');
    let path = url_path(clean);
    path.rsplit('/')
        .next()
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}
