//! `rowforge-session` — Transformation session layer.
//!
//! Owns the live table, the pristine original, the action log, and the undo
//! stack. Every user-facing transformation goes through here; the engine
//! crate stays pure underneath.

pub mod error;
pub mod events;
pub mod session;

pub use error::SessionError;
pub use events::{EventCallback, EventCollector, SessionEvent};
pub use session::{AppliedAction, MoveDirection, Session};
