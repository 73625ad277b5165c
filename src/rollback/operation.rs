//! The unit of journaling and undo.

use std::fmt;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::mover::MoveOutcome;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationKind {
    Move,
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OperationKind::Move => f.write_str("move"),
        }
    }
}

/// Where an operation currently lives in the undo/redo lifecycle.
/// Persisted with each journal record so the stacks can be rebuilt after a
/// process restart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OpState {
    /// Live: on the undo stack if the outcome committed, audit-only otherwise.
    Recorded,
    /// Reversed: on the redo stack.
    Undone,
    /// Invalidated by a newer recorded operation; audit-only.
    Superseded,
}

/// A single recorded filesystem action.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Operation {
    pub kind: OperationKind,
    pub source_path: PathBuf,
    pub destination_path: PathBuf,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backup_path: Option<PathBuf>,
    pub outcome: MoveOutcome,
    pub state: OpState,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} '{}' -> '{}' [{}]",
            self.timestamp.format("%Y-%m-%d %H:%M:%S"),
            self.kind,
            self.source_path.display(),
            self.destination_path.display(),
            self.outcome,
        )?;
        if let Some(ref b) = self.backup_path {
            write!(f, " (backup: {})", b.display())?;
        }
        Ok(())
    }
}
