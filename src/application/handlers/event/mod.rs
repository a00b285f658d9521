//! Event catalog command handlers.

mod create_event;
mod delete_event;
mod transition_event;
mod update_event;

pub use create_event::{CreateEventCommand, CreateEventHandler};
pub use delete_event::{DeleteEventCommand, DeleteEventHandler};
pub use transition_event::{TransitionEventCommand, TransitionEventHandler};
pub use update_event::{EventEdits, UpdateEventCommand, UpdateEventHandler};

use thiserror::Error;

use crate::domain::event::EventStatus;
use crate::domain::foundation::{DomainError, ErrorCode, EventId, ValidationError};

/// Errors from event catalog commands.
#[derive(Debug, Clone, Error)]
pub enum EventCommandError {
    #[error("Event {event_id} not found")]
    NotFound { event_id: EventId },

    #[error("Only executives may {action}")]
    Forbidden { action: &'static str },

    #[error("Event {event_id} must be closed or cancelled before deletion")]
    StillAcceptingRegistrations { event_id: EventId },

    #[error("Cannot transition event from {from} to {to}")]
    InvalidTransition { from: EventStatus, to: EventStatus },

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Storage(#[from] DomainError),
}

impl EventCommandError {
    /// Maps the variant to its wire-level error code.
    pub fn code(&self) -> ErrorCode {
        match self {
            EventCommandError::NotFound { .. } => ErrorCode::EventNotFound,
            EventCommandError::Forbidden { .. } => ErrorCode::Forbidden,
            EventCommandError::StillAcceptingRegistrations { .. } => {
                ErrorCode::InvalidStateTransition
            }
            EventCommandError::InvalidTransition { .. } => ErrorCode::InvalidStateTransition,
            EventCommandError::Validation(_) => ErrorCode::ValidationFailed,
            EventCommandError::Storage(e) => e.code,
        }
    }
}
