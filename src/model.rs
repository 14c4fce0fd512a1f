use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Fully resolved inputs of one scaffold run.
#[derive(Debug, Clone)]
pub struct ScaffoldOptions {
    /// Absolute directory to materialize into.
    pub destination: PathBuf,
    /// Absolute root of the template tree.
    pub template_root: PathBuf,
    /// Classify entries but write nothing.
    pub dry_run: bool,
    /// Copy access and modification times from template files.
    pub preserve_timestamps: bool,
}

impl ScaffoldOptions {
    pub fn new(destination: impl Into<PathBuf>, template_root: impl Into<PathBuf>) -> Self {
        Self {
            destination: destination.into(),
            template_root: template_root.into(),
            dry_run: false,
            preserve_timestamps: false,
        }
    }
}

/// What a materialization did (or, in a dry run, would do).
///
/// Directory counters include the destination root itself.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct MaterializeReport {
    pub dirs_created: u64,
    pub dirs_merged: u64,
    pub files_copied: u64,
    pub files_skipped: u64,
    pub bytes_copied: u64,
}
