//! Event lifecycle status state machine.
//!
//! An event accepts registrations only while `Active`. Executives may
//! toggle registration open and closed; cancellation and completion are
//! terminal.

use crate::domain::foundation::StateMachine;
use serde::{Deserialize, Serialize};

/// Lifecycle status of a published event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventStatus {
    /// Registrations are open.
    Active,

    /// Registrations are paused. Can be reopened.
    Closed,

    /// Event was called off. Terminal.
    Cancelled,

    /// Event took place. Terminal.
    Completed,
}

impl EventStatus {
    /// Returns true if new registrations are accepted in this state.
    pub fn accepts_registrations(&self) -> bool {
        matches!(self, EventStatus::Active)
    }

    /// Returns the other side of the open/closed toggle, if applicable.
    pub fn toggled(&self) -> Option<EventStatus> {
        match self {
            EventStatus::Active => Some(EventStatus::Closed),
            EventStatus::Closed => Some(EventStatus::Active),
            _ => None,
        }
    }
}

impl StateMachine for EventStatus {
    fn can_transition_to(&self, target: &Self) -> bool {
        use EventStatus::*;
        matches!(
            (self, target),
            // Open/closed toggle
            (Active, Closed)
                | (Closed, Active)
            // Terminal transitions from either live state
                | (Active, Cancelled)
                | (Closed, Cancelled)
                | (Active, Completed)
                | (Closed, Completed)
        )
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use EventStatus::*;
        match self {
            Active => vec![Closed, Cancelled, Completed],
            Closed => vec![Active, Cancelled, Completed],
            Cancelled => vec![],
            Completed => vec![],
        }
    }
}

impl std::fmt::Display for EventStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            EventStatus::Active => "active",
            EventStatus::Closed => "closed",
            EventStatus::Cancelled => "cancelled",
            EventStatus::Completed => "completed",
        };
        write!(f, "{}", s)
    }
}
