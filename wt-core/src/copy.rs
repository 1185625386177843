//! Copy policies applied to freshly created worktrees.

use crate::constants::DIR_MODE;
use anyhow::{Context, Result};
use std::{
    fs::{self, File, OpenOptions},
    io,
    path::{Path, PathBuf},
    sync::Mutex,
};
use walkdir::WalkDir;

pub trait Filesystem: Send + Sync {
    /// Copy each `items` entry (file or directory) from `src` to `dst`. Missing items are skipped.
    fn copy_named_items(&self, src: &Path, dst: &Path, items: &[&str]) -> Result<()>;

    /// Copy every regular file under `src` whose basename is in `basenames` to the same
    /// relative path under `dst`
    fn copy_matching_basenames(&self, src: &Path, dst: &Path, basenames: &[&str]) -> Result<()>;
}

/// Copies on the real filesystem
#[derive(Debug, Default, Clone, Copy)]
pub struct OsFilesystem {
    /// Also print walk warnings to stderr (non-interactive commands only)
    pub echo_warnings: bool,
}

impl OsFilesystem {
    pub fn new(echo_warnings: bool) -> Self {
        Self { echo_warnings }
    }

    fn warn(&self, err: &walkdir::Error) {
        let path = err
            .path()
            .map_or_else(String::new, |p| format!("{}: ", p.display()));
        log::warn!("skipping {path}{err}");
        if self.echo_warnings {
            eprintln!("warning: skipping {path}{err}");
        }
    }

    /// Recursively copy `src` into `dst`, creating directories with [`DIR_MODE`]
    pub fn copy_dir_recursive(&self, src: &Path, dst: &Path) -> Result<()> {
        for entry in WalkDir::new(src) {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    self.warn(&err);
                    continue;
                }
            };
            let Ok(relative) = entry.path().strip_prefix(src) else {
                continue;
            };
            let target = dst.join(relative);
            let file_type = entry.file_type();

            if file_type.is_dir() {
                create_dir(&target)?;
            } else if file_type.is_symlink() {
                copy_symlink(entry.path(), &target)?;
            } else {
                copy_file_preserving_mode(entry.path(), &target)?;
            }
        }
        Ok(())
    }
}

impl Filesystem for OsFilesystem {
    fn copy_named_items(&self, src: &Path, dst: &Path, items: &[&str]) -> Result<()> {
        for name in items {
            let source = src.join(name);
            let Ok(metadata) = fs::metadata(&source) else {
                continue;
            };
            let target = dst.join(name);
            if metadata.is_dir() {
                log::info!("copying directory {}", source.display());
                self.copy_dir_recursive(&source, &target)?;
            } else if metadata.is_file() {
                log::info!("copying {}", source.display());
                copy_file_preserving_mode(&source, &target)?;
            }
        }
        Ok(())
    }

    fn copy_matching_basenames(&self, src: &Path, dst: &Path, basenames: &[&str]) -> Result<()> {
        for entry in WalkDir::new(src) {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    self.warn(&err);
                    continue;
                }
            };
            if !entry.file_type().is_file() {
                continue;
            }
            let name = entry.file_name().to_string_lossy();
            if !basenames.iter().any(|b| *b == name) {
                continue;
            }
            let Ok(relative) = entry.path().strip_prefix(src) else {
                continue;
            };
            let target = dst.join(relative);
            if let Some(parent) = target.parent() {
                create_dir(parent)?;
            }
            log::info!("copying {}", relative.display());
            copy_file_preserving_mode(entry.path(), &target)?;
        }
        Ok(())
    }
}

/// Copy contents of `src` over `dst` and give `dst` the permissions of `src`
pub fn copy_file_preserving_mode(src: &Path, dst: &Path) -> Result<()> {
    let mut reader =
        File::open(src).with_context(|| format!("Failed to open {}", src.display()))?;
    let permissions = reader
        .metadata()
        .with_context(|| format!("Failed to stat {}", src.display()))?
        .permissions();
    // A read-only file left by an earlier pass cannot be opened for writing
    if fs::symlink_metadata(dst).is_ok_and(|meta| !meta.is_dir()) {
        fs::remove_file(dst).with_context(|| format!("Failed to replace {}", dst.display()))?;
    }
    let mut writer = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(dst)
        .with_context(|| format!("Failed to create {}", dst.display()))?;
    io::copy(&mut reader, &mut writer)
        .with_context(|| format!("Failed to copy {} to {}", src.display(), dst.display()))?;
    fs::set_permissions(dst, permissions)
        .with_context(|| format!("Failed to set permissions on {}", dst.display()))?;
    Ok(())
}

#[cfg(unix)]
fn create_dir(path: &Path) -> Result<()> {
    use std::os::unix::fs::DirBuilderExt;
    fs::DirBuilder::new()
        .recursive(true)
        .mode(DIR_MODE)
        .create(path)
        .with_context(|| format!("Failed to create directory {}", path.display()))
}

#[cfg(not(unix))]
fn create_dir(path: &Path) -> Result<()> {
    let _ = DIR_MODE;
    fs::create_dir_all(path)
        .with_context(|| format!("Failed to create directory {}", path.display()))
}

#[cfg(unix)]
fn copy_symlink(src: &Path, dst: &Path) -> Result<()> {
    let link = fs::read_link(src).with_context(|| format!("Failed to read {}", src.display()))?;
    if fs::symlink_metadata(dst).is_ok() {
        fs::remove_file(dst).with_context(|| format!("Failed to replace {}", dst.display()))?;
    }
    std::os::unix::fs::symlink(&link, dst)
        .with_context(|| format!("Failed to link {}", dst.display()))
}

#[cfg(not(unix))]
fn copy_symlink(src: &Path, dst: &Path) -> Result<()> {
    copy_file_preserving_mode(src, dst)
}

/// Copy requests recorded by [`MockFilesystem`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CopyCall {
    NamedItems {
        src: PathBuf,
        dst: PathBuf,
        items: Vec<String>,
    },
    MatchingBasenames {
        src: PathBuf,
        dst: PathBuf,
        basenames: Vec<String>,
    },
}

#[derive(Default)]
pub struct MockFilesystem {
    pub calls: Mutex<Vec<CopyCall>>,
    /// Error returned (once) by the next copy request
    pub fail_with: Mutex<Option<String>>,
}

impl MockFilesystem {
    pub fn recorded_calls(&self) -> Vec<CopyCall> {
        self.calls.lock().unwrap().clone()
    }

    fn result(&self) -> Result<()> {
        match self.fail_with.lock().unwrap().take() {
            Some(msg) => Err(anyhow::anyhow!(msg)),
            None => Ok(()),
        }
    }
}

impl Filesystem for MockFilesystem {
    fn copy_named_items(&self, src: &Path, dst: &Path, items: &[&str]) -> Result<()> {
        self.calls.lock().unwrap().push(CopyCall::NamedItems {
            src: src.to_path_buf(),
            dst: dst.to_path_buf(),
            items: items.iter().map(|s| (*s).to_string()).collect(),
        });
        self.result()
    }

    fn copy_matching_basenames(&self, src: &Path, dst: &Path, basenames: &[&str]) -> Result<()> {
        self.calls.lock().unwrap().push(CopyCall::MatchingBasenames {
            src: src.to_path_buf(),
            dst: dst.to_path_buf(),
            basenames: basenames.iter().map(|s| (*s).to_string()).collect(),
        });
        self.result()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{CONFIG_ITEMS, CONFIG_RECURSIVE_BASENAMES};
    use tempfile::tempdir;

    fn write(path: &Path, contents: &str) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, contents).unwrap();
    }

    #[test]
    fn test_named_items_copies_files_and_skips_missing() {
        let src = tempdir().unwrap();
        let dst = tempdir().unwrap();
        write(&src.path().join(".env"), "KEY=1\n");
        write(&src.path().join("CLAUDE.md"), "# notes");

        OsFilesystem::default()
            .copy_named_items(src.path(), dst.path(), &[".env", "AGENTS.md", "CLAUDE.md"])
            .unwrap();

        assert_eq!(fs::read_to_string(dst.path().join(".env")).unwrap(), "KEY=1\n");
        assert_eq!(
            fs::read_to_string(dst.path().join("CLAUDE.md")).unwrap(),
            "# notes"
        );
        assert!(!dst.path().join("AGENTS.md").exists());
    }

    #[test]
    fn test_named_items_copies_directory_tree() {
        let src = tempdir().unwrap();
        let dst = tempdir().unwrap();
        write(&src.path().join("node_modules/pkg/index.js"), "module.exports = 1;");
        write(&src.path().join("node_modules/pkg/lib/util.js"), "util");
        fs::create_dir_all(src.path().join("node_modules/empty")).unwrap();

        OsFilesystem::default()
            .copy_named_items(src.path(), dst.path(), &["node_modules"])
            .unwrap();

        let copied = dst.path().join("node_modules");
        assert_eq!(
            fs::read_to_string(copied.join("pkg/index.js")).unwrap(),
            "module.exports = 1;"
        );
        assert_eq!(fs::read_to_string(copied.join("pkg/lib/util.js")).unwrap(), "util");
        assert!(copied.join("empty").is_dir());
    }

    #[test]
    fn test_copy_overwrites_existing_destination() {
        let src = tempdir().unwrap();
        let dst = tempdir().unwrap();
        write(&src.path().join(".env"), "NEW=1");
        write(&dst.path().join(".env"), "OLD=0 and a much longer line");

        OsFilesystem::default()
            .copy_named_items(src.path(), dst.path(), &[".env"])
            .unwrap();

        assert_eq!(fs::read_to_string(dst.path().join(".env")).unwrap(), "NEW=1");
    }

    #[cfg(unix)]
    #[test]
    fn test_file_mode_preserved_and_dirs_0755() {
        use std::os::unix::fs::PermissionsExt;

        let src = tempdir().unwrap();
        let dst = tempdir().unwrap();
        let script = src.path().join("node_modules/.bin/tool");
        write(&script, "#!/bin/sh\n");
        fs::set_permissions(&script, fs::Permissions::from_mode(0o750)).unwrap();

        OsFilesystem::default()
            .copy_named_items(src.path(), dst.path(), &["node_modules"])
            .unwrap();

        let copied = dst.path().join("node_modules/.bin/tool");
        let mode = fs::metadata(&copied).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, 0o750);

        let dir_mode = fs::metadata(dst.path().join("node_modules/.bin"))
            .unwrap()
            .permissions()
            .mode()
            & 0o777;
        // umask can only clear bits
        assert_eq!(dir_mode & !0o755, 0);
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinks_recreated() {
        let src = tempdir().unwrap();
        let dst = tempdir().unwrap();
        write(&src.path().join("node_modules/pkg/cli.js"), "cli");
        fs::create_dir_all(src.path().join("node_modules/.bin")).unwrap();
        std::os::unix::fs::symlink("../pkg/cli.js", src.path().join("node_modules/.bin/pkg"))
            .unwrap();

        OsFilesystem::default()
            .copy_named_items(src.path(), dst.path(), &["node_modules"])
            .unwrap();

        let link = dst.path().join("node_modules/.bin/pkg");
        assert_eq!(fs::read_link(&link).unwrap(), PathBuf::from("../pkg/cli.js"));
        assert_eq!(fs::read_to_string(&link).unwrap(), "cli");
    }

    #[cfg(unix)]
    #[test]
    fn test_read_only_file_copied_by_both_passes() {
        use std::os::unix::fs::PermissionsExt;

        let src = tempdir().unwrap();
        let dst = tempdir().unwrap();
        let source = src.path().join(".env");
        write(&source, "FIRST=1");
        fs::set_permissions(&source, fs::Permissions::from_mode(0o400)).unwrap();

        let fs_ops = OsFilesystem::default();
        fs_ops.copy_named_items(src.path(), dst.path(), CONFIG_ITEMS).unwrap();

        // A hard link to the first copy must keep the old contents once the file is replaced
        let first_copy = dst.path().join(".env.first");
        fs::hard_link(dst.path().join(".env"), &first_copy).unwrap();
        fs::set_permissions(&source, fs::Permissions::from_mode(0o600)).unwrap();
        fs::write(&source, "SECOND=2").unwrap();
        fs::set_permissions(&source, fs::Permissions::from_mode(0o400)).unwrap();

        fs_ops
            .copy_matching_basenames(src.path(), dst.path(), CONFIG_RECURSIVE_BASENAMES)
            .unwrap();

        let copied = dst.path().join(".env");
        assert_eq!(fs::read_to_string(&copied).unwrap(), "SECOND=2");
        assert_eq!(fs::read_to_string(&first_copy).unwrap(), "FIRST=1");
        assert_eq!(fs::metadata(&copied).unwrap().permissions().mode() & 0o777, 0o400);
    }

    #[test]
    fn test_matching_basenames_at_every_depth() {
        let src = tempdir().unwrap();
        let dst = tempdir().unwrap();
        write(&src.path().join(".env"), "ROOT=1");
        write(&src.path().join("backend/.env"), "BACKEND=1");
        write(&src.path().join("services/api/.env"), "API=1");
        write(&src.path().join("services/api/.env.example"), "EXAMPLE=1");
        write(&src.path().join("services/api/main.rs"), "fn main() {}");

        OsFilesystem::default()
            .copy_matching_basenames(src.path(), dst.path(), &[".env"])
            .unwrap();

        for (rel, contents) in [
            (".env", "ROOT=1"),
            ("backend/.env", "BACKEND=1"),
            ("services/api/.env", "API=1"),
        ] {
            assert_eq!(
                fs::read(dst.path().join(rel)).unwrap(),
                fs::read(src.path().join(rel)).unwrap(),
                "{rel} should match"
            );
            assert_eq!(fs::read_to_string(dst.path().join(rel)).unwrap(), contents);
        }
        assert!(!dst.path().join("services/api/.env.example").exists());
        assert!(!dst.path().join("services/api/main.rs").exists());
    }

    #[test]
    fn test_matching_basenames_ignores_directories_with_matching_name() {
        let src = tempdir().unwrap();
        let dst = tempdir().unwrap();
        write(&src.path().join("weird/.env/inner.txt"), "x");

        OsFilesystem::default()
            .copy_matching_basenames(src.path(), dst.path(), &[".env"])
            .unwrap();

        assert!(!dst.path().join("weird").exists());
    }

    #[test]
    fn test_missing_source_root_is_not_an_error() {
        let dst = tempdir().unwrap();
        let missing = dst.path().join("does-not-exist");

        let fs_impl = OsFilesystem::default();
        fs_impl
            .copy_matching_basenames(&missing, dst.path(), &[".env"])
            .unwrap();
        fs_impl
            .copy_named_items(&missing, dst.path(), &[".env"])
            .unwrap();
    }

    #[test]
    fn test_mock_records_and_fails_once() {
        let mock = MockFilesystem::default();
        *mock.fail_with.lock().unwrap() = Some("disk full".to_string());

        let err = mock
            .copy_named_items(Path::new("/a"), Path::new("/b"), &[".env"])
            .unwrap_err();
        assert_eq!(err.to_string(), "disk full");
        mock.copy_matching_basenames(Path::new("/a"), Path::new("/b"), &[".env"])
            .unwrap();
        assert_eq!(mock.recorded_calls().len(), 2);
    }
}
