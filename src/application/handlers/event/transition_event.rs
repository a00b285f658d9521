//! TransitionEventHandler - Command handler for lifecycle transitions.

use std::sync::Arc;

use tracing::info;

use crate::domain::event::{Event, EventStatus};
use crate::domain::foundation::{EventId, StateMachine, Timestamp};
use crate::ports::{EventStore, UserProfile};

use super::EventCommandError;

/// Command to move an event to another lifecycle state.
#[derive(Debug, Clone)]
pub struct TransitionEventCommand {
    pub actor: UserProfile,
    pub event_id: EventId,
    pub target: EventStatus,
}

/// Handler for event lifecycle transitions.
///
/// The status state machine is authoritative: open/closed toggles both
/// ways, cancellation and completion are terminal. Closing an event
/// stops new registrations only; captured registrations stay untouched.
pub struct TransitionEventHandler {
    store: Arc<dyn EventStore>,
}

impl TransitionEventHandler {
    pub fn new(store: Arc<dyn EventStore>) -> Self {
        Self { store }
    }

    pub async fn handle(&self, cmd: TransitionEventCommand) -> Result<Event, EventCommandError> {
        if !cmd.actor.role.is_executive() {
            return Err(EventCommandError::Forbidden {
                action: "change event lifecycle state",
            });
        }

        let mut event = self
            .store
            .find(cmd.event_id)
            .await?
            .ok_or(EventCommandError::NotFound {
                event_id: cmd.event_id,
            })?;

        let from = event.status;
        event.status = from.transition_to(cmd.target).map_err(|_| {
            EventCommandError::InvalidTransition {
                from,
                to: cmd.target,
            }
        })?;
        event.updated_at = Timestamp::now();

        self.store.update(&event).await?;

        info!(
            event_id = %event.id,
            from = %from,
            to = %event.status,
            "Event lifecycle transition"
        );

        Ok(event)
    }
}
