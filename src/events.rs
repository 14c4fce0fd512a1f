use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::ScaffoldError;
use crate::model::MaterializeReport;

/// Structured event emitted during a scaffold run.
///
/// Entry paths are relative to the destination; `.` is the destination itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    ScaffoldStarted {
        run_id: uuid::Uuid,
        started_at: DateTime<Utc>,
        destination: PathBuf,
        template: PathBuf,
        dry_run: bool,
    },
    DirCreated {
        path: PathBuf,
    },
    DirMerged {
        path: PathBuf,
    },
    FileCopied {
        path: PathBuf,
        bytes: u64,
    },
    FileSkipped {
        path: PathBuf,
    },
    ScaffoldCompleted {
        run_id: uuid::Uuid,
        destination: PathBuf,
        dry_run: bool,
        #[serde(flatten)]
        report: MaterializeReport,
        elapsed_ms: u64,
    },
    ScaffoldAborted {
        run_id: uuid::Uuid,
        reason: AbortReason,
        message: String,
        /// The destination may hold a partial copy.
        partial: bool,
    },
}

/// Machine-readable cause of an aborted run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum AbortReason {
    AlreadyInitialized,
    TemplateMissing,
    NestedDestination,
    Conflict,
    Io,
}

impl From<&ScaffoldError> for AbortReason {
    fn from(err: &ScaffoldError) -> Self {
        match err {
            ScaffoldError::AlreadyInitialized { .. } => Self::AlreadyInitialized,
            ScaffoldError::TemplateMissing { .. } => Self::TemplateMissing,
            ScaffoldError::NestedDestination { .. } => Self::NestedDestination,
            ScaffoldError::Conflict { .. } => Self::Conflict,
            ScaffoldError::Io { .. } => Self::Io,
        }
    }
}

/// Generate JSON Schema for the event stream.
pub fn generate_schema() -> String {
    let schema = schemars::schema_for!(Event);
    serde_json::to_string_pretty(&schema).expect("failed to serialize schema")
}
