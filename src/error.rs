use std::path::PathBuf;
use thiserror::Error;

use crate::exit_codes::exit;

/// Failures that end a scaffold run.
#[derive(Debug, Error)]
pub enum ScaffoldError {
    /// The destination already carries the sentinel marker.
    #[error("project already contains {sentinel}: {}", destination.display())]
    AlreadyInitialized {
        destination: PathBuf,
        sentinel: String,
    },
    /// The template tree is missing or is not a directory.
    #[error("template directory not found: {}", path.display())]
    TemplateMissing { path: PathBuf },
    /// The destination lies inside the template tree.
    #[error("destination {} is inside the template directory {}", destination.display(), template.display())]
    NestedDestination {
        destination: PathBuf,
        template: PathBuf,
    },
    /// Source and destination disagree on the entry type at this path.
    #[error("cannot merge template entry into {}: one is a directory and the other is not", path.display())]
    Conflict { path: PathBuf },
    #[error("i/o failure at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ScaffoldError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Exit status reported for this failure.
    pub fn exit_code(&self) -> i32 {
        exit::FAILURE
    }

    /// One-line message shown to the user when the run aborts.
    pub fn user_message(&self) -> String {
        match self {
            Self::AlreadyInitialized { sentinel, .. } => {
                format!("Project already contains {sentinel}; aborting.")
            }
            Self::TemplateMissing { path } => format!(
                "Template directory not found at {}; is acf-sparc installed correctly?",
                path.display()
            ),
            Self::NestedDestination { .. } => format!("Refusing to scaffold: {self}."),
            Self::Conflict { .. } | Self::Io { .. } => {
                format!("Scaffold failed: {self}. The destination may be partially populated.")
            }
        }
    }

    /// Whether the destination may have been partially written.
    pub fn may_have_written(&self) -> bool {
        matches!(self, Self::Conflict { .. } | Self::Io { .. })
    }
}
