//! Zip extraction.

use crate::error::{Error, IoContext, Result};
use std::fs::File;
use std::io::{Read, Seek};
use std::path::Path;

fn zip_error(what: &str, e: zip::result::ZipError) -> Error {
    Error::Archive(format!("zip {}: {}", what, e))
}

/// Extract a zip archive into `dest`.
///
/// Entries whose names would land outside `dest` are skipped. Unix modes
/// stored in the archive are restored where possible.
pub(super) fn extract_zip(archive_path: &Path, dest: &Path) -> Result<()> {
    let file = File::open(archive_path)
        .io_context(|| format!("cannot open {}", archive_path.display()))?;
    let mut archive = zip::ZipArchive::new(file).map_err(|e| zip_error("read error", e))?;

    for index in 0..archive.len() {
        extract_entry(&mut archive, index, dest)?;
    }
    Ok(())
}

fn extract_entry<R: Read + Seek>(
    archive: &mut zip::ZipArchive<R>,
    index: usize,
    dest: &Path,
) -> Result<()> {
    let mut entry = archive
        .by_index(index)
        .map_err(|e| zip_error("entry error", e))?;

    let Some(rel) = entry.enclosed_name() else {
        return Ok(());
    };
    let out = dest.join(rel);

    if entry.is_dir() {
        return std::fs::create_dir_all(&out)
            .io_context(|| format!("cannot create directory {}", out.display()));
    }

    if let Some(parent) = out.parent() {
        std::fs::create_dir_all(parent)
            .io_context(|| format!("cannot create directory {}", parent.display()))?;
    }

    let mut writer =
        File::create(&out).io_context(|| format!("cannot create {}", out.display()))?;
    std::io::copy(&mut entry, &mut writer)
        .io_context(|| format!("cannot write {}", out.display()))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        if let Some(mode) = entry.unix_mode() {
            // Best effort; the content is already in place.
            let _ = std::fs::set_permissions(&out, std::fs::Permissions::from_mode(mode));
        }
    }

    Ok(())
}
