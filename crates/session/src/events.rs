//! Event types for session change notifications.
//!
//! The presentation layer subscribes to these to drive toasts, history
//! panels, and grid refreshes without polling. Notification is a side
//! effect only — engine correctness never depends on an event being seen.

/// Events emitted by a [`crate::Session`] as operations complete.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    /// A dataset replaced the workspace contents.
    DataLoaded {
        name: String,
        rows: usize,
        columns: usize,
    },

    /// One transformation was applied and appended to the log.
    ActionApplied {
        description: String,
        rows_before: usize,
        rows_after: usize,
    },

    /// The last action was undone.
    Undone,

    /// The table was rebuilt from the original after a history rewrite.
    Recomputed {
        /// Number of actions replayed.
        actions: usize,
    },

    /// The workspace was cleared.
    WorkspaceReset,

    /// Non-fatal diagnostic (invalid regex pattern, etc.).
    Warning(String),
}

/// Callback type for receiving session events.
pub type EventCallback = Box<dyn FnMut(SessionEvent) + Send>;

/// Simple event collector for testing.
#[derive(Default)]
pub struct EventCollector {
    events: Vec<SessionEvent>,
}

impl EventCollector {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn push(&mut self, event: SessionEvent) {
        self.events.push(event);
    }

    pub fn events(&self) -> &[SessionEvent] {
        &self.events
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Filter to only Warning events.
    pub fn warnings(&self) -> Vec<&str> {
        self.events
            .iter()
            .filter_map(|e| match e {
                SessionEvent::Warning(msg) => Some(msg.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Descriptions of ActionApplied events, in order.
    pub fn applied_descriptions(&self) -> Vec<&str> {
        self.events
            .iter()
            .filter_map(|e| match e {
                SessionEvent::ActionApplied { description, .. } => Some(description.as_str()),
                _ => None,
            })
            .collect()
    }
}
