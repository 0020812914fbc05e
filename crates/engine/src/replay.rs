//! Batch replay: fold the interpreter over an action log.
//!
//! Replay always starts from a pristine original table and never mutates it.
//! With a closed action enum the interpreter is total, so a fold cannot fail
//! mid-way and there is no partially-applied table to leak: the one genuine
//! failure mode (recomputing without the original) is a session-level error.

use crate::action::Action;
use crate::interpreter::apply;
use crate::table::Table;

/// Apply `actions` left-to-right starting from `original`.
pub fn replay(original: &Table, actions: &[Action]) -> Table {
    actions
        .iter()
        .fold(original.clone(), |table, action| apply(&table, action))
}

/// Replay while recording the table state *before* each step.
///
/// The pre-states line up index-for-index with `actions`, which is exactly
/// the shape of a per-action undo stack — used to rebuild one after a
/// historical edit rewrites the log.
pub fn replay_states(original: &Table, actions: &[Action]) -> (Table, Vec<Table>) {
    let mut states = Vec::with_capacity(actions.len());
    let mut current = original.clone();
    for action in actions {
        states.push(current.clone());
        current = apply(&current, action);
    }
    (current, states)
}
