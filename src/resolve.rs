use anyhow::{Context, Result};
use include_dir::{Dir, DirEntry, include_dir};
use path_absolutize::Absolutize;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::error::ScaffoldError;

/// Template location relative to the directory holding the executable.
pub const BUNDLED_TEMPLATE_DIR: &[&str] = &["templates", "base"];

/// Template compiled into the binary, used when nothing is installed on disk.
static EMBEDDED_TEMPLATE: Dir = include_dir!("$CARGO_MANIFEST_DIR/templates/base");

/// A template tree on disk, kept alive for the length of a run.
#[derive(Debug)]
pub enum TemplateRoot {
    /// An installed or user-supplied directory.
    Directory(PathBuf),
    /// The embedded template written out to a scratch directory.
    Embedded(tempfile::TempDir),
}

impl TemplateRoot {
    pub fn path(&self) -> &Path {
        match self {
            Self::Directory(path) => path,
            Self::Embedded(dir) => dir.path(),
        }
    }

    pub fn is_embedded(&self) -> bool {
        matches!(self, Self::Embedded(_))
    }
}

/// Resolve the user-supplied target against `cwd`.
///
/// Resolution is lexical: `.` and `..` are folded, symlinks are left alone,
/// and the target does not have to exist yet.
pub fn resolve_destination(cwd: &Path, target: &Path) -> Result<PathBuf> {
    let resolved = target
        .absolutize_from(cwd)
        .with_context(|| format!("cannot resolve target path: {}", target.display()))?;
    Ok(resolved.into_owned())
}

/// Bundled template root for an executable installed at `exe`.
pub fn template_root_from_exe(exe: &Path) -> PathBuf {
    let mut root = exe
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));
    for part in BUNDLED_TEMPLATE_DIR {
        root.push(part);
    }
    root
}

/// Bundled template root for the running executable.
pub fn bundled_template_root() -> Result<PathBuf> {
    let exe = std::env::current_exe().context("cannot locate the running executable")?;
    // Follow an installed symlink back to the real install directory.
    let exe = exe.canonicalize().unwrap_or(exe);
    Ok(template_root_from_exe(&exe))
}

/// Write the embedded template into a fresh scratch directory.
pub fn extract_embedded_template() -> Result<tempfile::TempDir, ScaffoldError> {
    let dir = tempfile::Builder::new()
        .prefix("acf-sparc-template-")
        .tempdir()
        .map_err(|err| ScaffoldError::io(std::env::temp_dir(), err))?;
    write_embedded(&EMBEDDED_TEMPLATE, dir.path()).map_err(|err| ScaffoldError::io(dir.path(), err))?;
    Ok(dir)
}

fn write_embedded(dir: &Dir<'_>, base: &Path) -> io::Result<()> {
    for entry in dir.entries() {
        let out_path = base.join(entry.path());
        match entry {
            DirEntry::Dir(sub) => {
                fs::create_dir_all(&out_path)?;
                write_embedded(sub, base)?;
            }
            DirEntry::File(file) => {
                if let Some(parent) = out_path.parent() {
                    fs::create_dir_all(parent)?;
                }
                fs::write(&out_path, file.contents())?;
            }
        }
    }
    Ok(())
}

/// Pick the template root.
///
/// An explicit override must be a directory. Otherwise a template installed
/// next to the executable wins, falling back to the embedded copy.
pub fn locate_template_root(cwd: &Path, override_root: Option<&Path>) -> Result<TemplateRoot> {
    let root = match override_root {
        Some(path) => {
            let root = resolve_destination(cwd, path)?;
            if !root.is_dir() {
                return Err(ScaffoldError::TemplateMissing { path: root }.into());
            }
            TemplateRoot::Directory(root)
        }
        None => {
            let installed = bundled_template_root()?;
            if installed.is_dir() {
                TemplateRoot::Directory(installed)
            } else {
                TemplateRoot::Embedded(extract_embedded_template()?)
            }
        }
    };
    tracing::debug!(
        template = %root.path().display(),
        embedded = root.is_embedded(),
        "located template root"
    );
    Ok(root)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn omitted_target_is_cwd() {
        let cwd = Path::new("/work/here");
        let dest = resolve_destination(cwd, Path::new(".")).unwrap();
        assert_eq!(dest, PathBuf::from("/work/here"));
    }

    #[test]
    fn relative_target_joins_cwd() {
        let cwd = Path::new("/work/here");
        assert_eq!(
            resolve_destination(cwd, Path::new("foo")).unwrap(),
            PathBuf::from("/work/here/foo")
        );
        assert_eq!(
            resolve_destination(cwd, Path::new("../other/./bar")).unwrap(),
            PathBuf::from("/work/other/bar")
        );
    }

    #[test]
    fn absolute_target_ignores_cwd() {
        let cwd = Path::new("/work/here");
        assert_eq!(
            resolve_destination(cwd, Path::new("/srv/app")).unwrap(),
            PathBuf::from("/srv/app")
        );
    }

    #[test]
    fn bundled_templates_sit_next_to_executable() {
        let root = template_root_from_exe(Path::new("/opt/acf/bin/acf-sparc"));
        assert_eq!(root, PathBuf::from("/opt/acf/bin/templates/base"));
    }

    #[test]
    fn missing_override_is_template_missing() {
        let dir = tempfile::tempdir().unwrap();
        let err = locate_template_root(dir.path(), Some(Path::new("absent"))).unwrap_err();
        match err.downcast_ref::<ScaffoldError>() {
            Some(ScaffoldError::TemplateMissing { path }) => {
                assert_eq!(path, &dir.path().join("absent"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn embedded_template_carries_sentinel_and_modes() {
        let dir = extract_embedded_template().unwrap();
        assert!(dir.path().join(".roo/rules/core.md").is_file());
        assert!(dir.path().join(".roomodes").is_file());
    }

    #[test]
    fn existing_override_is_used_as_is() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("tpl")).unwrap();
        let root = locate_template_root(dir.path(), Some(Path::new("tpl"))).unwrap();
        assert!(!root.is_embedded());
        assert_eq!(root.path(), dir.path().join("tpl"));
    }

    #[test]
    fn file_override_is_not_a_template() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("tpl"), "x").unwrap();
        assert!(locate_template_root(dir.path(), Some(Path::new("tpl"))).is_err());
    }
}
