//! Small command-line helpers.
//!
//! Each binary in `src/bin/` is a thin clap front end over one entry point in
//! this library:
//!
//! - `dlunzip <url> [target_dir]` - [`unpack::fetch_and_extract`]
//! - `dl-latest-rs <base_url> <target_dir>` - [`release::download_latest`]
//! - `dq` - [`text::strip_quotes`] over stdin
//! - `relocate-artifacts` - [`relocate::relocate`]
//! - `kv-splitter` - [`text::split_items`]
//! - `tee [-a] [FILE...]` - [`tee::Tee`]
//!
//! # Supported archives
//!
//! Detected from the downloaded filename (case-insensitive):
//!
//! - `.zip`, `.tar`, `.tar.gz`/`.tgz`, `.tar.bz2`/`.tbz2`, `.tar.xz`/`.txz`,
//!   `.tar.zst`/`.tzst` - extracted natively
//! - `.gz`, `.bz2`, `.xz`, `.zst` - decompressed to a single file
//! - `.7z`, `.rar` - extracted with `7z` / `unrar` from `PATH`
//!
//! # Environment
//!
//! - `CLI_TOOLS_HTTP_TIMEOUT` - download timeout in seconds (default 300)

pub mod archive;
pub mod cli;
pub mod error;
pub mod fs_utils;
pub mod http;
pub mod interrupt;
pub mod output;
pub mod progress;
pub mod release;
pub mod relocate;
pub mod tee;
pub mod text;
pub mod unpack;
pub mod url;

pub use error::{Error, Result};
