//! Undo/redo facade over the journal.
//!
//! The manager exclusively owns the in-memory stacks and the journal handle.
//! It performs no filesystem action when recording; undo and redo replay
//! moves through the same transfer machinery the forward path uses.
//!
//! Stacks are index stacks into the append-ordered history, so the journal
//! stays a single ordered collection of records while an operation still
//! lives on exactly one stack (or neither) at any instant.

use std::path::Path;

use chrono::Utc;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::errors::TidyMoveError;
use crate::mover::{MoveOutcome, MoveReport, transfer};
use crate::rollback::{Operation, OperationKind, OpState, RollbackJournal};

pub struct RollbackManager {
    config: Config,
    journal: RollbackJournal,
    /// Every attempt in append order; the on-disk journal mirrors this.
    history: Vec<Operation>,
    /// Indices into `history`, most recent last.
    undo: Vec<usize>,
    redo: Vec<usize>,
}

impl RollbackManager {
    /// Open the journal and rebuild both stacks from it.
    ///
    /// Undone records form a recency suffix of the committed sequence (undo
    /// always pops the newest), so pushing them in reverse append order
    /// reproduces the redo stack exactly.
    pub fn open(config: &Config) -> Result<Self, TidyMoveError> {
        let journal = RollbackJournal::open(config.journal_path());
        let history = journal.load()?;

        let undo: Vec<usize> = history
            .iter()
            .enumerate()
            .filter(|(_, op)| op.state == OpState::Recorded && op.outcome == MoveOutcome::Committed)
            .map(|(i, _)| i)
            .collect();
        let mut redo: Vec<usize> = history
            .iter()
            .enumerate()
            .filter(|(_, op)| op.state == OpState::Undone)
            .map(|(i, _)| i)
            .collect();
        redo.reverse();

        debug!(
            journal = %journal.path().display(),
            records = history.len(),
            undo = undo.len(),
            redo = redo.len(),
            "rollback manager opened"
        );

        Ok(Self {
            config: config.clone(),
            journal,
            history,
            undo,
            redo,
        })
    }

    /// Record an attempted operation after the filesystem action ran.
    ///
    /// Appends to the journal unconditionally (audit trail); pushes onto the
    /// undo stack only when the attempt committed, so undo can never reverse
    /// a move that never happened. Any pending redo entries are superseded:
    /// redoing them would replay an action the new one has overtaken.
    pub fn record_operation(&mut self, kind: OperationKind, report: &MoveReport) {
        for &i in &self.redo {
            self.history[i].state = OpState::Superseded;
        }
        self.redo.clear();

        let op = Operation {
            kind,
            source_path: report.source.clone(),
            destination_path: report.destination.clone(),
            timestamp: Utc::now(),
            backup_path: report.backup_path.clone(),
            outcome: report.outcome,
            state: OpState::Recorded,
        };
        debug!(operation = %op, "recording operation");
        self.history.push(op);

        if report.outcome == MoveOutcome::Committed {
            self.undo.push(self.history.len() - 1);
        }

        self.persist();
    }

    /// Reverse the most recent committed operation (destination → source).
    /// Returns `false` when the stack is empty or the inverse move fails;
    /// a failed operation stays on the undo stack.
    pub fn undo_last_operation(&mut self) -> bool {
        let Some(&idx) = self.undo.last() else {
            debug!("undo requested but stack is empty");
            return false;
        };
        let op = self.history[idx].clone();

        let report =
            transfer::transfer_file(&self.config, &op.destination_path, &op.source_path);
        if !report.committed() {
            warn!(operation = %op, outcome = %report.outcome, "undo failed; operation kept on undo stack");
            return false;
        }

        self.undo.pop();
        self.history[idx].state = OpState::Undone;
        self.redo.push(idx);
        self.persist();
        info!(operation = %op, "operation undone");
        true
    }

    /// Re-apply the most recently undone operation (source → destination).
    pub fn redo_last_undone(&mut self) -> bool {
        let Some(&idx) = self.redo.last() else {
            debug!("redo requested but stack is empty");
            return false;
        };
        let op = self.history[idx].clone();

        let report =
            transfer::transfer_file(&self.config, &op.source_path, &op.destination_path);
        if !report.committed() {
            warn!(operation = %op, outcome = %report.outcome, "redo failed; operation kept on redo stack");
            return false;
        }

        self.redo.pop();
        self.history[idx].state = OpState::Recorded;
        self.undo.push(idx);
        self.persist();
        info!(operation = %op, "operation redone");
        true
    }

    /// Empty both stacks and truncate the journal. Idempotent.
    pub fn clear(&mut self) {
        self.history.clear();
        self.undo.clear();
        self.redo.clear();
        if let Err(e) = self.journal.clear() {
            warn!(code = e.code(), error = %e, "failed to truncate journal");
        }
    }

    /// Ordered audit view of every recorded attempt.
    pub fn operations(&self) -> &[Operation] {
        &self.history
    }

    pub fn undo_depth(&self) -> usize {
        self.undo.len()
    }

    pub fn redo_depth(&self) -> usize {
        self.redo.len()
    }

    pub fn journal_path(&self) -> &Path {
        self.journal.path()
    }

    fn persist(&self) {
        if let Err(e) = self.journal.rewrite(&self.history) {
            warn!(code = e.code(), error = %e, "journal write failed; in-memory state is ahead of disk");
        }
    }
}
