//! The transformation session: current table, pristine original, action log,
//! and the per-action undo stack.
//!
//! Every wrapper follows the same shape: snapshot the current table, run the
//! pure interpreter, swap the result in, append a described + timestamped
//! log entry, and emit an event. The undo stack and the action log stay
//! parallel at all times, and replaying the log over the original always
//! reproduces the current table.

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};

use rowforge_engine::{
    apply, replay_states, Action, CaseMode, FilterCondition, MathOp, Row, SortDirection, Table,
    TypeTarget,
};

use crate::error::SessionError;
use crate::events::{EventCallback, SessionEvent};

/// One applied action as recorded in the log. The timestamp is metadata
/// attached at application time; replay ignores it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppliedAction {
    pub action: Action,
    pub description: String,
    pub timestamp: DateTime<Utc>,
}

/// Direction for single-step column moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveDirection {
    Left,
    Right,
}

/// State owner for one loaded dataset.
///
/// `original` has exactly one writer (`load_new_data`/`reset`); `current`
/// is only ever replaced through the wrappers below. Presentation code
/// reads through the accessors and never mutates.
#[derive(Default)]
pub struct Session {
    original: Table,
    current: Table,
    dataset_name: Option<String>,
    log: Vec<AppliedAction>,
    undo_stack: Vec<Table>,
    on_event: Option<EventCallback>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install the notification side-channel.
    pub fn set_event_callback(&mut self, callback: EventCallback) {
        self.on_event = Some(callback);
    }

    fn emit(&mut self, event: SessionEvent) {
        if let Some(ref mut callback) = self.on_event {
            callback(event);
        }
    }

    // ------------------------------------------------------------------
    // Read surface
    // ------------------------------------------------------------------

    pub fn columns(&self) -> &[String] {
        &self.current.columns
    }

    pub fn rows(&self) -> &[Row] {
        &self.current.rows
    }

    pub fn current(&self) -> &Table {
        &self.current
    }

    pub fn original(&self) -> &Table {
        &self.original
    }

    pub fn actions(&self) -> &[AppliedAction] {
        &self.log
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn dataset_name(&self) -> Option<&str> {
        self.dataset_name.as_deref()
    }

    pub fn is_loaded(&self) -> bool {
        !self.original.is_empty()
    }

    // ------------------------------------------------------------------
    // Lifecycle
    // ------------------------------------------------------------------

    /// Replace the workspace with a freshly parsed dataset. `original` and
    /// `current` start identical; log and undo stack are cleared.
    pub fn load_new_data(&mut self, rows: Vec<Row>, columns: Vec<String>, name: &str) {
        let table = Table::new(columns, rows);
        self.original = table.clone();
        self.current = table;
        self.dataset_name = Some(name.to_string());
        self.log.clear();
        self.undo_stack.clear();
        self.emit(SessionEvent::DataLoaded {
            name: name.to_string(),
            rows: self.current.row_count(),
            columns: self.current.column_count(),
        });
    }

    /// Clear everything.
    pub fn reset(&mut self) {
        self.original = Table::empty();
        self.current = Table::empty();
        self.dataset_name = None;
        self.log.clear();
        self.undo_stack.clear();
        self.emit(SessionEvent::WorkspaceReset);
    }

    // ------------------------------------------------------------------
    // History
    // ------------------------------------------------------------------

    /// Undo the most recent action. No-op when the log is empty.
    pub fn undo_last(&mut self) {
        let Some(snapshot) = self.undo_stack.pop() else {
            return;
        };
        self.current = snapshot;
        self.log.pop();
        self.emit(SessionEvent::Undone);
    }

    /// Remove one action from history.
    ///
    /// Deleting the last action is a plain undo. Deleting an earlier one
    /// invalidates every later snapshot, so the table and the undo stack
    /// are both rebuilt by replaying the remaining log over the pristine
    /// original — never by patching the current table in place.
    pub fn delete_action(&mut self, index: usize) -> Result<(), SessionError> {
        let len = self.log.len();
        if index >= len {
            return Err(SessionError::NoSuchAction { index, len });
        }
        if index + 1 == len {
            self.undo_last();
            return Ok(());
        }
        if self.original.is_empty() {
            return Err(SessionError::OriginalMissing);
        }

        self.log.remove(index);
        let actions: Vec<Action> = self.log.iter().map(|a| a.action.clone()).collect();
        let (current, states) = replay_states(&self.original, &actions);
        self.current = current;
        self.undo_stack = states;
        self.emit(SessionEvent::Recomputed { actions: actions.len() });
        Ok(())
    }

    // ------------------------------------------------------------------
    // Core apply path
    // ------------------------------------------------------------------

    fn apply_action(&mut self, action: Action) {
        let description = action.describe();
        let rows_before = self.current.row_count();

        self.undo_stack.push(self.current.clone());
        self.current = apply(&self.current, &action);
        self.log.push(AppliedAction {
            action,
            description: description.clone(),
            timestamp: Utc::now(),
        });

        let rows_after = self.current.row_count();
        self.emit(SessionEvent::ActionApplied {
            description,
            rows_before,
            rows_after,
        });
    }

    // ------------------------------------------------------------------
    // Transformations (one wrapper per action kind)
    // ------------------------------------------------------------------

    pub fn drop_column(&mut self, col: &str) {
        self.apply_action(Action::DropColumn { col: col.to_string() });
    }

    pub fn rename_column(&mut self, col: &str, new_name: &str) {
        self.apply_action(Action::Rename {
            col: col.to_string(),
            new_name: new_name.to_string(),
        });
    }

    pub fn trim_text(&mut self, col: &str) {
        self.apply_action(Action::Trim { col: col.to_string() });
    }

    pub fn fill_down(&mut self, col: &str) {
        self.apply_action(Action::FillDown { col: col.to_string() });
    }

    pub fn fill_nulls(&mut self, col: &str, value: &str) {
        self.apply_action(Action::FillNulls {
            col: col.to_string(),
            value: value.to_string(),
        });
    }

    pub fn remove_duplicates(&mut self) {
        self.apply_action(Action::DropDuplicates);
    }

    pub fn smart_clean(&mut self) {
        self.apply_action(Action::SmartClean);
    }

    pub fn add_index_column(&mut self) {
        self.apply_action(Action::AddIndex);
    }

    pub fn remove_top_rows(&mut self, count: usize) {
        self.apply_action(Action::DropTopRows { count });
    }

    pub fn clean_symbols(&mut self, col: &str) {
        self.apply_action(Action::CleanSymbols { col: col.to_string() });
    }

    pub fn change_case(&mut self, col: &str, mode: CaseMode) {
        self.apply_action(Action::CaseChange {
            col: col.to_string(),
            mode,
        });
    }

    pub fn apply_math(&mut self, col1: &str, col2: &str, op: MathOp, target: &str) {
        self.apply_action(Action::CalcMath {
            col1: col1.to_string(),
            col2: col2.to_string(),
            op,
            target: target.to_string(),
        });
    }

    pub fn sort_by(&mut self, col: &str, direction: SortDirection) {
        self.apply_action(Action::Sort {
            col: col.to_string(),
            direction,
        });
    }

    pub fn duplicate_column(&mut self, col: &str) {
        self.apply_action(Action::Duplicate { col: col.to_string() });
    }

    /// Move the column at `from` to position `to`. Out-of-range indices are
    /// ignored rather than logged as a no-op action.
    pub fn reorder_columns(&mut self, from: usize, to: usize) {
        let len = self.current.column_count();
        if from >= len || to >= len || from == to {
            return;
        }
        let mut new_order = self.current.columns.clone();
        let moved = new_order.remove(from);
        new_order.insert(to, moved);
        self.apply_action(Action::ReorderColumns { new_order });
    }

    /// Move a named column one step left or right.
    pub fn move_column(&mut self, col: &str, direction: MoveDirection) {
        let Some(idx) = self.current.columns.iter().position(|c| c == col) else {
            return;
        };
        let target = match direction {
            MoveDirection::Left => idx.checked_sub(1),
            MoveDirection::Right => (idx + 1 < self.current.column_count()).then_some(idx + 1),
        };
        if let Some(to) = target {
            self.reorder_columns(idx, to);
        }
    }

    pub fn change_type(&mut self, col: &str, target: TypeTarget) {
        self.apply_action(Action::ChangeType {
            col: col.to_string(),
            target,
        });
    }

    pub fn filter(&mut self, col: &str, condition: FilterCondition, value: &str) {
        self.apply_action(Action::Filter {
            col: col.to_string(),
            condition,
            value: value.to_string(),
        });
    }

    pub fn replace(&mut self, col: &str, find: &str, replace: &str) {
        self.apply_action(Action::Replace {
            col: col.to_string(),
            find: find.to_string(),
            replace: replace.to_string(),
        });
    }

    pub fn split(&mut self, col: &str, delimiter: &str) {
        self.apply_action(Action::Split {
            col: col.to_string(),
            delimiter: delimiter.to_string(),
        });
    }

    pub fn merge(&mut self, col1: &str, col2: &str, separator: &str) {
        self.apply_action(Action::MergeColumns {
            col1: col1.to_string(),
            col2: col2.to_string(),
            separator: separator.to_string(),
        });
    }

    /// Extract the first regex match per cell. An invalid pattern is still
    /// logged (the interpreter absorbs it as a no-op) but raises a warning
    /// event so the user learns why nothing changed.
    pub fn regex_extract(&mut self, col: &str, pattern: &str) {
        if let Err(err) = Regex::new(pattern) {
            self.emit(SessionEvent::Warning(format!(
                "invalid pattern for regex extract: {err}"
            )));
        }
        self.apply_action(Action::RegexExtract {
            col: col.to_string(),
            pattern: pattern.to_string(),
        });
    }

    /// Read row 0 as the new header row and drop it. Logged like any other
    /// action; replay reproduces it because replay always starts from the
    /// original's physical row 0.
    pub fn promote_headers(&mut self) {
        if self.current.rows.is_empty() {
            return;
        }
        self.apply_action(Action::PromoteHeaders);
    }
}
