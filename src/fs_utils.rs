//! Common filesystem utilities
//!
//! Directory clearing, moves that work across filesystems, listings and
//! permission changes shared by the tools.

use crate::error::{Error, IoContext, Result};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Remove everything inside `dir`, keeping `dir` itself.
///
/// A missing directory is not an error.
pub fn clear_dir(dir: &Path) -> Result<()> {
    if !dir.exists() {
        return Ok(());
    }

    for entry in std::fs::read_dir(dir).io_context(|| format!("cannot read {}", dir.display()))? {
        let entry = entry.io_context(|| format!("cannot read {}", dir.display()))?;
        remove_path(&entry.path())?;
    }

    Ok(())
}

/// Remove a file, symlink or directory tree.
pub fn remove_path(path: &Path) -> Result<()> {
    let md = std::fs::symlink_metadata(path)
        .io_context(|| format!("cannot stat {}", path.display()))?;

    let result = if md.is_dir() {
        std::fs::remove_dir_all(path)
    } else {
        std::fs::remove_file(path)
    };
    result.io_context(|| format!("cannot remove {}", path.display()))
}

/// Move a file or directory, falling back to copy-then-delete when a rename
/// is not possible (e.g. across filesystems).
pub fn move_path(src: &Path, dest: &Path) -> Result<()> {
    if std::fs::rename(src, dest).is_ok() {
        return Ok(());
    }

    copy_recursive(src, dest)?;
    remove_path(src)
}

/// Copy a file, symlink or directory tree from `src` to `dest`.
fn copy_recursive(src: &Path, dest: &Path) -> Result<()> {
    for entry in WalkDir::new(src) {
        let entry = entry.map_err(|e| {
            Error::io(
                format!("cannot walk {}", src.display()),
                e.into_io_error()
                    .unwrap_or_else(|| std::io::Error::other("filesystem loop")),
            )
        })?;

        let rel = entry.path().strip_prefix(src).unwrap_or(Path::new(""));
        let target = if rel.as_os_str().is_empty() {
            dest.to_path_buf()
        } else {
            dest.join(rel)
        };
        let file_type = entry.file_type();

        if file_type.is_dir() {
            std::fs::create_dir_all(&target)
                .io_context(|| format!("cannot create directory {}", target.display()))?;
        } else if file_type.is_symlink() {
            copy_symlink(entry.path(), &target)?;
        } else {
            std::fs::copy(entry.path(), &target).io_context(|| {
                format!(
                    "copy failed: {} -> {}",
                    entry.path().display(),
                    target.display()
                )
            })?;
        }
    }

    Ok(())
}

#[cfg(unix)]
fn copy_symlink(src: &Path, dest: &Path) -> Result<()> {
    let link = std::fs::read_link(src).io_context(|| format!("cannot read link {}", src.display()))?;
    std::os::unix::fs::symlink(&link, dest)
        .io_context(|| format!("cannot create symlink {}", dest.display()))
}

#[cfg(not(unix))]
fn copy_symlink(src: &Path, dest: &Path) -> Result<()> {
    std::fs::copy(src, dest)
        .map(|_| ())
        .io_context(|| format!("copy failed: {} -> {}", src.display(), dest.display()))
}

/// Move every top-level entry of `src_dir` into `dest_dir`, creating
/// `dest_dir` if needed. Returns the moved entry names, sorted.
pub fn move_dir_contents(src_dir: &Path, dest_dir: &Path) -> Result<Vec<String>> {
    std::fs::create_dir_all(dest_dir)
        .io_context(|| format!("cannot create directory {}", dest_dir.display()))?;

    let mut moved = Vec::new();
    for entry in
        std::fs::read_dir(src_dir).io_context(|| format!("cannot read {}", src_dir.display()))?
    {
        let entry = entry.io_context(|| format!("cannot read {}", src_dir.display()))?;
        let name = entry.file_name();
        move_path(&entry.path(), &dest_dir.join(&name))?;
        moved.push(name.to_string_lossy().to_string());
    }

    moved.sort();
    Ok(moved)
}

/// True if `dir` has no entries. A directory that cannot be read is an error.
pub fn is_empty_dir(dir: &Path) -> Result<bool> {
    let mut entries =
        std::fs::read_dir(dir).io_context(|| format!("cannot read {}", dir.display()))?;
    Ok(entries.next().is_none())
}

/// One entry of a directory listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListEntry {
    pub name: String,
    pub is_dir: bool,
    pub size: u64,
}

impl ListEntry {
    /// Size column: thousands-separated byte count, or `<DIR>`.
    pub fn size_label(&self) -> String {
        if self.is_dir {
            "<DIR>".to_string()
        } else {
            group_thousands(self.size)
        }
    }
}

/// List the direct children of `dir`, sorted by name.
pub fn list_dir(dir: &Path) -> Result<Vec<ListEntry>> {
    let mut entries = Vec::new();
    for entry in std::fs::read_dir(dir).io_context(|| format!("cannot read {}", dir.display()))? {
        let entry = entry.io_context(|| format!("cannot read {}", dir.display()))?;
        let md = entry
            .metadata()
            .io_context(|| format!("cannot stat {}", entry.path().display()))?;
        entries.push(ListEntry {
            name: entry.file_name().to_string_lossy().to_string(),
            is_dir: md.is_dir(),
            size: if md.is_file() { md.len() } else { 0 },
        });
    }

    entries.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(entries)
}

/// Format a number with `,` thousands separators.
pub fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Result of marking one file executable.
#[derive(Debug)]
pub struct ModeChange {
    pub path: PathBuf,
    pub error: Option<String>,
}

/// Add the owner execute bit to every regular file under `dir`.
///
/// Per-file failures are reported in the result rather than aborting.
#[cfg(unix)]
pub fn make_executable(dir: &Path) -> Result<Vec<ModeChange>> {
    use std::os::unix::fs::PermissionsExt;

    if !dir.is_dir() {
        return Err(Error::MissingTarget(dir.to_path_buf()));
    }

    let mut changes = Vec::new();
    for entry in WalkDir::new(dir).sort_by_file_name() {
        let Ok(entry) = entry else { continue };
        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.path().to_path_buf();
        let result = std::fs::metadata(&path).and_then(|md| {
            let mode = md.permissions().mode() | 0o100;
            std::fs::set_permissions(&path, std::fs::Permissions::from_mode(mode))
        });
        changes.push(ModeChange {
            path,
            error: result.err().map(|e| e.to_string()),
        });
    }

    Ok(changes)
}

/// Windows has no execute bit; every file is reported unchanged.
#[cfg(not(unix))]
pub fn make_executable(dir: &Path) -> Result<Vec<ModeChange>> {
    if !dir.is_dir() {
        return Err(Error::MissingTarget(dir.to_path_buf()));
    }

    Ok(WalkDir::new(dir)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| ModeChange {
            path: e.path().to_path_buf(),
            error: None,
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clear_dir_keeps_dir() {
        let temp = tempfile::tempdir().unwrap();
        let dir = temp.path().join("target");
        std::fs::create_dir_all(dir.join("sub/deeper")).unwrap();
        std::fs::write(dir.join("a.txt"), "a").unwrap();
        std::fs::write(dir.join("sub/b.txt"), "b").unwrap();

        clear_dir(&dir).unwrap();

        assert!(dir.is_dir());
        assert!(is_empty_dir(&dir).unwrap());
    }

    #[test]
    fn test_is_empty_dir_unreadable_is_error() {
        let temp = tempfile::tempdir().unwrap();
        assert!(!is_empty_dir(temp.path().parent().unwrap()).unwrap());
        assert!(is_empty_dir(temp.path()).unwrap());

        let err = is_empty_dir(&temp.path().join("missing")).unwrap_err();
        assert!(err.to_string().contains("missing"), "got: {err}");

        let file = temp.path().join("plain.txt");
        std::fs::write(&file, "x").unwrap();
        assert!(is_empty_dir(&file).is_err());
    }

    #[test]
    fn test_clear_dir_missing_is_ok() {
        let temp = tempfile::tempdir().unwrap();
        assert!(clear_dir(&temp.path().join("nope")).is_ok());
    }

    #[test]
    fn test_move_dir_contents() {
        let temp = tempfile::tempdir().unwrap();
        let src = temp.path().join("src");
        let dest = temp.path().join("dest/nested");
        std::fs::create_dir_all(src.join("pkg")).unwrap();
        std::fs::write(src.join("pkg/file.txt"), "x").unwrap();
        std::fs::write(src.join("README"), "r").unwrap();

        let moved = move_dir_contents(&src, &dest).unwrap();

        assert_eq!(moved, vec!["README".to_string(), "pkg".to_string()]);
        assert_eq!(std::fs::read_to_string(dest.join("pkg/file.txt")).unwrap(), "x");
        assert!(is_empty_dir(&src).unwrap());
    }

    #[test]
    fn test_copy_recursive_then_remove() {
        let temp = tempfile::tempdir().unwrap();
        let src = temp.path().join("tree");
        std::fs::create_dir_all(src.join("a/b")).unwrap();
        std::fs::write(src.join("a/b/c.txt"), "deep").unwrap();
        let dest = temp.path().join("copy");

        copy_recursive(&src, &dest).unwrap();
        remove_path(&src).unwrap();

        assert!(!src.exists());
        assert_eq!(std::fs::read_to_string(dest.join("a/b/c.txt")).unwrap(), "deep");
    }

    #[test]
    fn test_move_path_single_file_overwrites() {
        let temp = tempfile::tempdir().unwrap();
        let src = temp.path().join("new.bin");
        let dest = temp.path().join("old.bin");
        std::fs::write(&src, "new").unwrap();
        std::fs::write(&dest, "old").unwrap();

        move_path(&src, &dest).unwrap();

        assert!(!src.exists());
        assert_eq!(std::fs::read_to_string(&dest).unwrap(), "new");
    }

    #[test]
    fn test_list_dir_sorted_with_sizes() {
        let temp = tempfile::tempdir().unwrap();
        std::fs::create_dir(temp.path().join("b-dir")).unwrap();
        std::fs::write(temp.path().join("a.txt"), vec![0u8; 1234]).unwrap();

        let entries = list_dir(temp.path()).unwrap();

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].name, "a.txt");
        assert_eq!(entries[0].size_label(), "1,234");
        assert!(entries[1].is_dir);
        assert_eq!(entries[1].size_label(), "<DIR>");
    }

    #[test]
    fn test_group_thousands() {
        assert_eq!(group_thousands(0), "0");
        assert_eq!(group_thousands(999), "999");
        assert_eq!(group_thousands(1000), "1,000");
        assert_eq!(group_thousands(1234567), "1,234,567");
    }

    #[cfg(unix)]
    #[test]
    fn test_make_executable_sets_user_bit() {
        use std::os::unix::fs::PermissionsExt;

        let temp = tempfile::tempdir().unwrap();
        std::fs::create_dir(temp.path().join("bin")).unwrap();
        let file = temp.path().join("bin/tool");
        std::fs::write(&file, "#!/bin/sh\n").unwrap();
        std::fs::set_permissions(&file, std::fs::Permissions::from_mode(0o644)).unwrap();

        let changes = make_executable(temp.path()).unwrap();

        assert_eq!(changes.len(), 1);
        assert!(changes[0].error.is_none());
        let mode = std::fs::metadata(&file).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o744);
    }

    #[test]
    fn test_make_executable_missing_dir() {
        let temp = tempfile::tempdir().unwrap();
        let err = make_executable(&temp.path().join("missing")).unwrap_err();
        assert!(matches!(err, Error::MissingTarget(_)));
    }
}
