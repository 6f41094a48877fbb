//! Move built executables out of `*/target/release` into a release directory
//! and delete the build trees they came from (`relocate-artifacts`).

use crate::error::{Error, IoContext, Result};
use crate::fs_utils;
use crate::output;
use std::path::{Path, PathBuf};

/// What happened to one `<project>/target` tree.
#[derive(Debug, Clone)]
pub struct ProjectReport {
    /// The `target/release` directory that was scanned
    pub release_build: PathBuf,
    /// File names moved into the release directory, sorted
    pub moved: Vec<String>,
    /// `None` when `target` was removed, otherwise the failure message
    pub cleanup_error: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct RelocateReport {
    pub projects: Vec<ProjectReport>,
}

impl RelocateReport {
    pub fn moved_count(&self) -> usize {
        self.projects.iter().map(|p| p.moved.len()).sum()
    }
}

/// Whether `path` looks like a compiled executable worth keeping.
///
/// `.exe` files qualify everywhere. On Unix, extension-less regular files
/// with any execute bit qualify too.
pub fn is_artifact(path: &Path) -> bool {
    let Ok(md) = std::fs::symlink_metadata(path) else {
        return false;
    };
    if !md.is_file() {
        return false;
    }

    match path.extension() {
        Some(ext) => ext.eq_ignore_ascii_case("exe"),
        None => has_exec_bit(&md),
    }
}

#[cfg(unix)]
fn has_exec_bit(md: &std::fs::Metadata) -> bool {
    use std::os::unix::fs::PermissionsExt;
    md.permissions().mode() & 0o111 != 0
}

#[cfg(not(unix))]
fn has_exec_bit(_md: &std::fs::Metadata) -> bool {
    false
}

/// Find every `<search_root>/*/target/release` directory, sorted.
pub fn find_release_builds(search_root: &Path) -> Result<Vec<PathBuf>> {
    let root = glob::Pattern::escape(&search_root.to_string_lossy());
    let pattern = format!("{}/*/target/release", root);

    let paths = glob::glob(&pattern)
        .map_err(|e| Error::io(format!("bad search pattern {}", pattern), std::io::Error::other(e)))?;

    let mut dirs: Vec<PathBuf> = paths.filter_map(|p| p.ok()).filter(|p| p.is_dir()).collect();
    dirs.sort();
    Ok(dirs)
}

/// Relocate executables from every build under `search_root` into
/// `release_dir`, then remove each build's `target` directory.
pub fn relocate(search_root: &Path, release_dir: &Path) -> Result<RelocateReport> {
    std::fs::create_dir_all(release_dir)
        .io_context(|| format!("cannot create {}", release_dir.display()))?;

    let mut report = RelocateReport::default();

    for release_build in find_release_builds(search_root)? {
        output::step(&format!("Processing {}", release_build.display()));

        let mut artifacts: Vec<PathBuf> = std::fs::read_dir(&release_build)
            .io_context(|| format!("cannot read {}", release_build.display()))?
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .filter(|p| is_artifact(p))
            .collect();
        artifacts.sort();

        let mut moved = Vec::new();
        for artifact in artifacts {
            let Some(name) = artifact.file_name() else {
                continue;
            };
            let dest = release_dir.join(name);
            if dest.symlink_metadata().is_ok() {
                fs_utils::remove_path(&dest)?;
            }
            fs_utils::move_path(&artifact, &dest)?;

            let name = name.to_string_lossy().to_string();
            output::note(&format!("moved {} -> {}", name, release_dir.display()));
            moved.push(name);
        }

        // release_build is <project>/target/release
        let cleanup_error = match release_build.parent() {
            Some(target) => match std::fs::remove_dir_all(target) {
                Ok(()) => {
                    output::note(&format!("removed {}", target.display()));
                    None
                }
                Err(e) => {
                    let message = format!("cannot remove {}: {}", target.display(), e);
                    output::warn(&message);
                    Some(message)
                }
            },
            None => None,
        };

        report.projects.push(ProjectReport {
            release_build,
            moved,
            cleanup_error,
        });
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write_exec(path: &Path) {
        fs::write(path, b"\x7fELF").unwrap();
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(path, fs::Permissions::from_mode(0o755)).unwrap();
        }
    }

    fn project(root: &Path, name: &str) -> PathBuf {
        let release = root.join(name).join("target").join("release");
        fs::create_dir_all(release.join("deps")).unwrap();
        fs::write(release.join("deps").join("lib.rlib"), b"rlib").unwrap();
        fs::write(release.join(format!("{}.d", name)), b"deps").unwrap();
        release
    }

    #[test]
    fn test_is_artifact_exe() {
        let temp = tempfile::tempdir().unwrap();
        let exe = temp.path().join("tool.exe");
        fs::write(&exe, b"MZ").unwrap();
        assert!(is_artifact(&exe));

        let upper = temp.path().join("TOOL.EXE");
        fs::write(&upper, b"MZ").unwrap();
        assert!(is_artifact(&upper));
    }

    #[test]
    fn test_is_artifact_rejects_build_leftovers() {
        let temp = tempfile::tempdir().unwrap();
        let dep = temp.path().join("tool.d");
        fs::write(&dep, b"deps").unwrap();
        assert!(!is_artifact(&dep));
        assert!(!is_artifact(temp.path()));
        assert!(!is_artifact(&temp.path().join("missing.exe")));
    }

    #[cfg(unix)]
    #[test]
    fn test_is_artifact_unix_executable() {
        let temp = tempfile::tempdir().unwrap();
        let bin = temp.path().join("tool");
        write_exec(&bin);
        assert!(is_artifact(&bin));

        let plain = temp.path().join("notes");
        fs::write(&plain, b"text").unwrap();
        assert!(!is_artifact(&plain));
    }

    #[test]
    fn test_find_release_builds() {
        let temp = tempfile::tempdir().unwrap();
        project(temp.path(), "beta");
        project(temp.path(), "alpha");
        fs::create_dir_all(temp.path().join("gamma").join("target").join("debug")).unwrap();

        let found = find_release_builds(temp.path()).unwrap();
        assert_eq!(
            found,
            vec![
                temp.path().join("alpha/target/release"),
                temp.path().join("beta/target/release"),
            ]
        );
    }

    #[test]
    fn test_relocate_moves_exe_and_removes_target() {
        let temp = tempfile::tempdir().unwrap();
        let release_dir = temp.path().join("release");
        let build = project(temp.path(), "dq");
        fs::write(build.join("dq.exe"), b"new").unwrap();

        fs::create_dir_all(&release_dir).unwrap();
        fs::write(release_dir.join("dq.exe"), b"old").unwrap();

        let report = relocate(temp.path(), &release_dir).unwrap();

        assert_eq!(report.projects.len(), 1);
        assert_eq!(report.projects[0].moved, vec!["dq.exe".to_string()]);
        assert!(report.projects[0].cleanup_error.is_none());
        assert_eq!(fs::read(release_dir.join("dq.exe")).unwrap(), b"new");
        assert!(!temp.path().join("dq").join("target").exists());
        assert!(temp.path().join("dq").exists());
    }

    #[cfg(unix)]
    #[test]
    fn test_relocate_unix_binaries() {
        let temp = tempfile::tempdir().unwrap();
        let release_dir = temp.path().join("release");
        let a = project(temp.path(), "tee");
        let b = project(temp.path(), "kv-splitter");
        write_exec(&a.join("tee"));
        write_exec(&b.join("kv-splitter"));

        let report = relocate(temp.path(), &release_dir).unwrap();

        assert_eq!(report.moved_count(), 2);
        assert!(release_dir.join("tee").is_file());
        assert!(release_dir.join("kv-splitter").is_file());
        assert!(!release_dir.join("tee.d").exists());
    }

    #[test]
    fn test_relocate_nothing_to_do() {
        let temp = tempfile::tempdir().unwrap();
        let release_dir = temp.path().join("release");

        let report = relocate(temp.path(), &release_dir).unwrap();

        assert!(report.projects.is_empty());
        assert!(release_dir.is_dir());
    }
}
