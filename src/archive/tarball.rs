//! Tar extraction over any of the supported decompressors.
//!
//! Entries are unpacked one at a time. Before an entry touches the disk its
//! path, every directory it passes through, and any link target are checked
//! against the destination.

use crate::error::{Error, IoContext, Result};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Component, Path, PathBuf};

fn unsafe_entry(what: &str, path: &Path) -> Error {
    Error::Archive(format!("tar entry {}: {}", what, path.display()))
}

/// Resolve `.` and `..` without touching the filesystem.
///
/// `..` above a relative start is kept, so the result still fails a prefix
/// check against the destination.
fn resolve_lexically(path: &Path) -> PathBuf {
    let mut parts: Vec<Component<'_>> = Vec::new();

    for comp in path.components() {
        match comp {
            Component::CurDir => {}
            Component::ParentDir => match parts.last() {
                Some(Component::Normal(_)) => {
                    parts.pop();
                }
                Some(Component::RootDir | Component::Prefix(_)) => {}
                _ => parts.push(comp),
            },
            Component::Prefix(_) => {
                parts.clear();
                parts.push(comp);
            }
            _ => parts.push(comp),
        }
    }

    parts.iter().collect()
}

/// Entry paths must be relative and stay below the archive root.
fn check_entry_path(path: &Path) -> Result<()> {
    let escapes = path
        .components()
        .any(|c| matches!(c, Component::ParentDir | Component::RootDir | Component::Prefix(_)));
    if escapes {
        return Err(unsafe_entry("has unsafe path", path));
    }
    Ok(())
}

/// Fail if any existing component of `path` below `dest` is a symlink, so
/// nothing is written through a link planted by an earlier entry.
fn check_no_symlinks(dest: &Path, path: &Path) -> Result<()> {
    let rel = path
        .strip_prefix(dest)
        .map_err(|_| unsafe_entry("resolves outside the destination", path))?;

    let mut cur = dest.to_path_buf();
    for comp in rel.components() {
        cur.push(comp);
        let is_link = std::fs::symlink_metadata(&cur)
            .map(|md| md.file_type().is_symlink())
            .unwrap_or(false);
        if is_link {
            return Err(unsafe_entry("would be written through symlink", &cur));
        }
    }
    Ok(())
}

/// Link targets must be relative and resolve inside `dest`.
fn check_link_target(dest: &Path, entry_path: &Path, target: &Path) -> Result<()> {
    if target.has_root() || target.is_absolute() {
        return Err(unsafe_entry("has unsafe link target (absolute)", target));
    }

    let base = entry_path.parent().unwrap_or(dest);
    let resolved = resolve_lexically(&base.join(target));
    if !resolved.starts_with(resolve_lexically(dest)) {
        return Err(Error::Archive(format!(
            "tar entry has unsafe link target (escapes destination): {} -> {}",
            entry_path.display(),
            target.display()
        )));
    }
    Ok(())
}

/// Hard link targets name an earlier entry, relative to the archive root.
/// Returns the path inside `dest` to link from.
fn check_hard_link_target(dest: &Path, target: &Path) -> Result<PathBuf> {
    check_entry_path(target)
        .map_err(|_| unsafe_entry("has unsafe link target (outside archive root)", target))?;

    let source = dest.join(target);
    if !resolve_lexically(&source).starts_with(resolve_lexically(dest)) {
        return Err(unsafe_entry("has unsafe link target (escapes destination)", target));
    }
    check_no_symlinks(dest, &source)?;
    Ok(source)
}

/// Unpack a tar stream into `dest`.
fn unpack_stream<R: Read>(reader: R, dest: &Path) -> Result<()> {
    let mut archive = tar::Archive::new(reader);
    archive.set_preserve_permissions(true);

    let entries = archive
        .entries()
        .map_err(|e| Error::Archive(format!("tar read error: {}", e)))?;

    for entry in entries {
        let mut entry = entry.map_err(|e| Error::Archive(format!("tar read error: {}", e)))?;
        let rel = entry
            .path()
            .map_err(|e| Error::Archive(format!("tar entry has bad path: {}", e)))?
            .into_owned();

        check_entry_path(&rel)?;
        // "" and "./" entries name the archive root itself
        if rel.components().all(|c| c == Component::CurDir) {
            continue;
        }

        let out = dest.join(&rel);
        check_no_symlinks(dest, &out)?;

        let kind = entry.header().entry_type();
        let link_target = if kind.is_symlink() || kind.is_hard_link() {
            let target = entry
                .link_name()
                .map_err(|e| Error::Archive(format!("tar entry has bad link target: {}", e)))?
                .ok_or_else(|| unsafe_entry("is a link without a target", &rel))?
                .into_owned();
            Some(target)
        } else {
            None
        };

        if let Some(parent) = out.parent() {
            std::fs::create_dir_all(parent)
                .io_context(|| format!("cannot create directory {}", parent.display()))?;
        }

        match link_target {
            // Hard link names are relative to the archive root, not the entry.
            Some(target) if kind.is_hard_link() => {
                let source = check_hard_link_target(dest, &target)?;
                if out.symlink_metadata().is_ok() {
                    std::fs::remove_file(&out)
                        .io_context(|| format!("cannot replace {}", out.display()))?;
                }
                std::fs::hard_link(&source, &out).io_context(|| {
                    format!("cannot link {} to {}", out.display(), source.display())
                })?;
                continue;
            }
            Some(target) => check_link_target(dest, &out, &target)?,
            None => {}
        }

        entry
            .unpack(&out)
            .map_err(|e| Error::Archive(format!("cannot unpack {}: {}", rel.display(), e)))?;
    }

    Ok(())
}

fn open(archive_path: &Path) -> Result<BufReader<File>> {
    File::open(archive_path)
        .map(BufReader::new)
        .io_context(|| format!("cannot open {}", archive_path.display()))
}

pub(super) fn extract_tar_gz(archive_path: &Path, dest: &Path) -> Result<()> {
    unpack_stream(flate2::read::GzDecoder::new(open(archive_path)?), dest)
}

pub(super) fn extract_tar_xz(archive_path: &Path, dest: &Path) -> Result<()> {
    unpack_stream(xz2::read::XzDecoder::new(open(archive_path)?), dest)
}

pub(super) fn extract_tar_bz2(archive_path: &Path, dest: &Path) -> Result<()> {
    unpack_stream(bzip2::read::BzDecoder::new(open(archive_path)?), dest)
}

pub(super) fn extract_tar_zst(archive_path: &Path, dest: &Path) -> Result<()> {
    let decoder = zstd::stream::read::Decoder::new(open(archive_path)?)
        .map_err(|e| Error::Archive(format!("zstd init error: {}", e)))?;
    unpack_stream(decoder, dest)
}

pub(super) fn extract_tar_plain(archive_path: &Path, dest: &Path) -> Result<()> {
    unpack_stream(open(archive_path)?, dest)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    /// In-memory tar builder for fixtures.
    struct Fixture(tar::Builder<Vec<u8>>);

    impl Fixture {
        fn new() -> Self {
            Self(tar::Builder::new(Vec::new()))
        }

        fn file(mut self, name: &str, content: &str) -> Self {
            let mut header = tar::Header::new_gnu();
            header.set_size(content.len() as u64);
            header.set_mode(0o644);
            header.set_cksum();
            self.0.append_data(&mut header, name, content.as_bytes()).unwrap();
            self
        }

        fn link(mut self, kind: tar::EntryType, name: &str, target: &str) -> Self {
            let mut header = tar::Header::new_gnu();
            header.set_entry_type(kind);
            header.set_size(0);
            header.set_mode(0o777);
            self.0.append_link(&mut header, name, target).unwrap();
            self
        }

        /// A regular file whose name bypasses the builder's own path checks.
        fn raw_file(mut self, name: &[u8], content: &str) -> Self {
            let mut header = tar::Header::new_gnu();
            header.as_old_mut().name[..name.len()].copy_from_slice(name);
            header.set_size(content.len() as u64);
            header.set_mode(0o644);
            header.set_cksum();
            self.0.append(&header, content.as_bytes()).unwrap();
            self
        }

        fn bytes(self) -> Vec<u8> {
            self.0.into_inner().unwrap()
        }
    }

    fn read(dir: &Path, rel: &str) -> String {
        std::fs::read_to_string(dir.join(rel)).unwrap()
    }

    #[test]
    fn test_extract_tar_gz() {
        let temp_dir = tempfile::tempdir().unwrap();
        let archive_path = temp_dir.path().join("site.tar.gz");
        let dest = temp_dir.path().join("out");

        let mut gz = flate2::write::GzEncoder::new(
            File::create(&archive_path).unwrap(),
            flate2::Compression::default(),
        );
        gz.write_all(&Fixture::new().file("index.html", "<p>hi</p>").bytes())
            .unwrap();
        gz.finish().unwrap();

        extract_tar_gz(&archive_path, &dest).unwrap();
        assert_eq!(read(&dest, "index.html"), "<p>hi</p>");
    }

    #[test]
    fn test_extract_tar_bz2_nested() {
        let temp_dir = tempfile::tempdir().unwrap();
        let archive_path = temp_dir.path().join("tree.tar.bz2");
        let dest = temp_dir.path().join("out");

        let mut bz = bzip2::write::BzEncoder::new(
            File::create(&archive_path).unwrap(),
            bzip2::Compression::default(),
        );
        bz.write_all(&Fixture::new().file("docs/api/v1.md", "v1").bytes())
            .unwrap();
        bz.finish().unwrap();

        extract_tar_bz2(&archive_path, &dest).unwrap();
        assert_eq!(read(&dest, "docs/api/v1.md"), "v1");
    }

    #[test]
    fn test_extract_tar_xz_and_zst() {
        let temp_dir = tempfile::tempdir().unwrap();
        let tarball = Fixture::new()
            .file("a.txt", "a")
            .file("b/c.txt", "c")
            .bytes();

        let xz_path = temp_dir.path().join("t.tar.xz");
        let mut xz = xz2::write::XzEncoder::new(File::create(&xz_path).unwrap(), 6);
        xz.write_all(&tarball).unwrap();
        xz.finish().unwrap();

        let zst_path = temp_dir.path().join("t.tar.zst");
        std::fs::write(&zst_path, zstd::encode_all(&tarball[..], 0).unwrap()).unwrap();

        let xz_out = temp_dir.path().join("xz");
        let zst_out = temp_dir.path().join("zst");
        extract_tar_xz(&xz_path, &xz_out).unwrap();
        extract_tar_zst(&zst_path, &zst_out).unwrap();

        for out in [&xz_out, &zst_out] {
            assert_eq!(read(out, "a.txt"), "a");
            assert_eq!(read(out, "b/c.txt"), "c");
        }
    }

    #[test]
    fn test_extract_plain_tar_with_relative_symlink() {
        let temp_dir = tempfile::tempdir().unwrap();
        let archive_path = temp_dir.path().join("links.tar");
        let dest = temp_dir.path().join("out");

        let tarball = Fixture::new()
            .file("bin/tool-1.0", "real")
            .link(tar::EntryType::Symlink, "bin/tool", "tool-1.0")
            .bytes();
        std::fs::write(&archive_path, tarball).unwrap();

        extract_tar_plain(&archive_path, &dest).unwrap();
        assert_eq!(read(&dest, "bin/tool"), "real");
    }

    #[test]
    fn test_rejects_parent_dir_entry() {
        let temp_dir = tempfile::tempdir().unwrap();
        let archive_path = temp_dir.path().join("evil.tar");
        let dest = temp_dir.path().join("out");

        std::fs::write(
            &archive_path,
            Fixture::new().raw_file(b"../escaped", "pwned").bytes(),
        )
        .unwrap();

        let err = extract_tar_plain(&archive_path, &dest).unwrap_err();
        assert!(err.to_string().contains("unsafe path"), "got: {err}");
        assert!(!temp_dir.path().join("escaped").exists());
    }

    #[test]
    fn test_rejects_absolute_symlink() {
        let temp_dir = tempfile::tempdir().unwrap();
        let archive_path = temp_dir.path().join("escape.tar");
        let dest = temp_dir.path().join("out");

        let tarball = Fixture::new()
            .link(tar::EntryType::Symlink, "a", "/")
            .file("a/evil.txt", "pwned")
            .bytes();
        std::fs::write(&archive_path, tarball).unwrap();

        let err = extract_tar_plain(&archive_path, &dest).unwrap_err();
        assert!(err.to_string().contains("unsafe link target"), "got: {err}");
        assert!(!dest.join("a/evil.txt").exists());
    }

    #[test]
    fn test_rejects_symlink_escaping_dest() {
        let temp_dir = tempfile::tempdir().unwrap();
        let archive_path = temp_dir.path().join("escape.tar");
        let dest = temp_dir.path().join("out");

        let tarball = Fixture::new()
            .link(tar::EntryType::Symlink, "up", "../../outside")
            .bytes();
        std::fs::write(&archive_path, tarball).unwrap();

        let err = extract_tar_plain(&archive_path, &dest).unwrap_err();
        assert!(err.to_string().contains("escapes destination"), "got: {err}");
    }

    #[test]
    fn test_rejects_hardlink_outside_dest() {
        let temp_dir = tempfile::tempdir().unwrap();
        let archive_path = temp_dir.path().join("hardlink.tar");
        let dest = temp_dir.path().join("out");

        let tarball = Fixture::new()
            .link(tar::EntryType::Link, "hl", "/etc/passwd")
            .bytes();
        std::fs::write(&archive_path, tarball).unwrap();

        let err = extract_tar_plain(&archive_path, &dest).unwrap_err();
        assert!(err.to_string().contains("unsafe link target"), "got: {err}");
    }

    #[test]
    fn test_extract_hard_link_relative_to_archive_root() {
        let temp_dir = tempfile::tempdir().unwrap();
        let archive_path = temp_dir.path().join("hardlinks.tar");
        let dest = temp_dir.path().join("out");

        let tarball = Fixture::new()
            .file("pkg/bin/tool-1.0", "real")
            .link(tar::EntryType::Link, "pkg/bin/tool", "pkg/bin/tool-1.0")
            .bytes();
        std::fs::write(&archive_path, tarball).unwrap();

        extract_tar_plain(&archive_path, &dest).unwrap();
        assert_eq!(read(&dest, "pkg/bin/tool"), "real");
        assert_eq!(read(&dest, "pkg/bin/tool-1.0"), "real");
    }

    #[test]
    fn test_hard_link_never_resolves_against_working_dir() {
        let temp_dir = tempfile::tempdir().unwrap();
        let archive_path = temp_dir.path().join("leak.tar");
        let dest = temp_dir.path().join("out");

        // A file that exists only in the working directory, not in `dest`
        let name = format!("cli_tools_link_source_{}.txt", std::process::id());
        let outside = std::env::current_dir().unwrap().join(&name);
        std::fs::write(&outside, "SECRET").unwrap();

        let tarball = Fixture::new()
            .link(tar::EntryType::Link, "x/y/leak", &name)
            .bytes();
        std::fs::write(&archive_path, tarball).unwrap();

        let result = extract_tar_plain(&archive_path, &dest);
        std::fs::remove_file(&outside).unwrap();

        assert!(result.is_err());
        assert!(!dest.join("x/y/leak").exists());
    }

    #[test]
    fn test_rejects_hard_link_climbing_out_of_root() {
        let temp_dir = tempfile::tempdir().unwrap();
        let archive_path = temp_dir.path().join("climb.tar");
        let dest = temp_dir.path().join("out");
        std::fs::write(temp_dir.path().join("sibling.txt"), "outside").unwrap();

        let tarball = Fixture::new()
            .link(tar::EntryType::Link, "a/leak", "a/../../sibling.txt")
            .bytes();
        std::fs::write(&archive_path, tarball).unwrap();

        let err = extract_tar_plain(&archive_path, &dest).unwrap_err();
        assert!(err.to_string().contains("unsafe link target"), "got: {err}");
        assert!(!dest.join("a/leak").exists());
    }

    #[test]
    fn test_resolve_lexically() {
        assert_eq!(resolve_lexically(Path::new("/a/b/../c/./d")), PathBuf::from("/a/c/d"));
        assert_eq!(resolve_lexically(Path::new("/../x")), PathBuf::from("/x"));
        assert_eq!(resolve_lexically(Path::new("a/../../b")), PathBuf::from("../b"));
    }
}
