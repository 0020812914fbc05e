//! `rowforge-engine` — Tabular transformation engine.
//!
//! Pure engine crate: receives an in-memory table plus declarative actions,
//! returns transformed tables. No IO, no UI, no session state.

pub mod action;
pub mod interpreter;
pub mod replay;
pub mod table;
pub mod value;

pub use action::{Action, CaseMode, FilterCondition, MathOp, SortDirection, TypeTarget};
pub use interpreter::apply;
pub use replay::{replay, replay_states};
pub use table::{Row, Table};
pub use value::Value;
