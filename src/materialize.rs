//! Non-overwriting copy of a template tree into a destination.
//!
//! Every template entry is classified against whatever already sits at the
//! same relative path in the destination (see [`EntryAction`]). Existing files
//! are never modified; existing directories are merged.

use std::fs::{self, File, OpenOptions};
use std::io::{self, ErrorKind};
use std::path::{Path, PathBuf};

use filetime::FileTime;
use tracing::{debug, info};
use walkdir::WalkDir;

use crate::error::ScaffoldError;
use crate::events::Event;
use crate::model::{MaterializeReport, ScaffoldOptions};
use crate::reporter::Reporter;

/// Decision for one template entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryAction {
    /// Template directory, nothing at the destination.
    CreateDir,
    /// Template directory, destination directory already present.
    MergeDir,
    /// Template file, nothing at the destination.
    CopyFile,
    /// Template file, destination file (or link) already present.
    SkipFile,
    /// One side is a directory and the other is not.
    Conflict,
}

/// Kind of entry found at a destination path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Existing {
    Absent,
    Dir,
    Other,
}

fn existing_at(path: &Path) -> io::Result<Existing> {
    match fs::symlink_metadata(path) {
        Ok(meta) if meta.is_dir() => Ok(Existing::Dir),
        // A link to a directory merges like the directory itself.
        Ok(meta) if meta.file_type().is_symlink() && path.is_dir() => Ok(Existing::Dir),
        Ok(_) => Ok(Existing::Other),
        Err(err) if err.kind() == ErrorKind::NotFound => Ok(Existing::Absent),
        Err(err) => Err(err),
    }
}

/// Classify a template entry against the destination path it maps to.
pub fn classify(source_is_dir: bool, dst: &Path) -> io::Result<EntryAction> {
    let action = match (source_is_dir, existing_at(dst)?) {
        (true, Existing::Absent) => EntryAction::CreateDir,
        (true, Existing::Dir) => EntryAction::MergeDir,
        (false, Existing::Absent) => EntryAction::CopyFile,
        (false, Existing::Other) => EntryAction::SkipFile,
        (true, Existing::Other) | (false, Existing::Dir) => EntryAction::Conflict,
    };
    Ok(action)
}

/// Copy `options.template_root` into `options.destination`.
///
/// Directories are created before their children and siblings are visited
/// in file-name order. The first failure aborts the run and leaves whatever
/// was already copied in place.
pub fn materialize(
    options: &ScaffoldOptions,
    reporter: &mut Reporter,
) -> Result<MaterializeReport, ScaffoldError> {
    let source = options.template_root.as_path();
    let destination = options.destination.as_path();

    if !source.is_dir() {
        return Err(ScaffoldError::TemplateMissing {
            path: source.to_path_buf(),
        });
    }
    check_not_nested(source, destination)?;

    let mut report = MaterializeReport::default();
    let walker = WalkDir::new(source)
        .follow_links(true)
        .sort_by_file_name();

    for entry in walker {
        let entry = entry.map_err(|err| {
            let path = err
                .path()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| source.to_path_buf());
            ScaffoldError::io(path, io::Error::from(err))
        })?;
        let rel_path = entry
            .path()
            .strip_prefix(source)
            .map(Path::to_path_buf)
            .unwrap_or_default();
        let target_path = destination.join(&rel_path);
        let event_path = if rel_path.as_os_str().is_empty() {
            PathBuf::from(".")
        } else {
            rel_path
        };

        let source_is_dir = entry.file_type().is_dir();
        let action =
            classify(source_is_dir, &target_path).map_err(|err| ScaffoldError::io(&target_path, err))?;
        debug!(path = %event_path.display(), ?action, "classified template entry");

        match action {
            EntryAction::CreateDir => {
                if !options.dry_run {
                    // The root may need missing parents; nested dirs follow their parent.
                    fs::create_dir_all(&target_path)
                        .map_err(|err| ScaffoldError::io(&target_path, err))?;
                }
                report.dirs_created += 1;
                reporter.record(Event::DirCreated { path: event_path });
            }
            EntryAction::MergeDir => {
                report.dirs_merged += 1;
                reporter.record(Event::DirMerged { path: event_path });
            }
            EntryAction::CopyFile => {
                let copied = if options.dry_run {
                    let meta = entry
                        .metadata()
                        .map_err(|err| ScaffoldError::io(entry.path(), io::Error::from(err)))?;
                    Some(meta.len())
                } else {
                    copy_new_file(entry.path(), &target_path, options.preserve_timestamps)?
                };
                match copied {
                    Some(bytes) => {
                        report.files_copied += 1;
                        report.bytes_copied += bytes;
                        reporter.record(Event::FileCopied {
                            path: event_path,
                            bytes,
                        });
                    }
                    None => {
                        report.files_skipped += 1;
                        reporter.record(Event::FileSkipped { path: event_path });
                    }
                }
            }
            EntryAction::SkipFile => {
                report.files_skipped += 1;
                reporter.record(Event::FileSkipped { path: event_path });
            }
            EntryAction::Conflict => {
                return Err(ScaffoldError::Conflict { path: target_path });
            }
        }
    }

    info!(
        destination = %destination.display(),
        files_copied = report.files_copied,
        files_skipped = report.files_skipped,
        dry_run = options.dry_run,
        "materialized template"
    );
    Ok(report)
}

/// Refuse destinations inside the template tree; the walk would see its own output.
fn check_not_nested(source: &Path, destination: &Path) -> Result<(), ScaffoldError> {
    let source_real = source
        .canonicalize()
        .map_err(|err| ScaffoldError::io(source, err))?;
    let destination_real = nearest_existing_ancestor(destination)
        .and_then(|(existing, rest)| existing.canonicalize().ok().map(|real| real.join(rest)))
        .unwrap_or_else(|| destination.to_path_buf());
    if destination_real.starts_with(&source_real) {
        return Err(ScaffoldError::NestedDestination {
            destination: destination.to_path_buf(),
            template: source.to_path_buf(),
        });
    }
    Ok(())
}

/// Split `path` into its deepest existing ancestor and the remaining suffix.
fn nearest_existing_ancestor(path: &Path) -> Option<(&Path, PathBuf)> {
    let existing = path.ancestors().find(|p| p.exists())?;
    let rest = path.strip_prefix(existing).ok()?.to_path_buf();
    Some((existing, rest))
}

/// Copy `src` to `dst` unless `dst` exists.
///
/// Returns `None` when the destination appeared after classification; the
/// exclusive create keeps it untouched either way.
fn copy_new_file(
    src: &Path,
    dst: &Path,
    preserve_timestamps: bool,
) -> Result<Option<u64>, ScaffoldError> {
    let mut reader = File::open(src).map_err(|err| ScaffoldError::io(src, err))?;
    let meta = reader.metadata().map_err(|err| ScaffoldError::io(src, err))?;

    let mut writer = match OpenOptions::new().write(true).create_new(true).open(dst) {
        Ok(file) => file,
        Err(err) if err.kind() == ErrorKind::AlreadyExists => return Ok(None),
        Err(err) => return Err(ScaffoldError::io(dst, err)),
    };
    let bytes = io::copy(&mut reader, &mut writer).map_err(|err| ScaffoldError::io(dst, err))?;
    writer
        .set_permissions(meta.permissions())
        .map_err(|err| ScaffoldError::io(dst, err))?;
    drop(writer);

    if preserve_timestamps {
        let atime = FileTime::from_last_access_time(&meta);
        let mtime = FileTime::from_last_modification_time(&meta);
        filetime::set_file_times(dst, atime, mtime).map_err(|err| ScaffoldError::io(dst, err))?;
    }
    Ok(Some(bytes))
}
