//! DeleteEventHandler - Command handler for removing catalog entries.

use std::sync::Arc;

use tracing::info;

use crate::domain::foundation::EventId;
use crate::ports::{EventStore, UserProfile};

use super::EventCommandError;

/// Command to remove an event from the catalog.
#[derive(Debug, Clone)]
pub struct DeleteEventCommand {
    pub actor: UserProfile,
    pub event_id: EventId,
}

/// Handler for catalog deletions.
///
/// Deletion is gated on the lifecycle state: an event still accepting
/// registrations must be closed or cancelled first, so nobody can pay
/// into an event that is about to disappear.
pub struct DeleteEventHandler {
    store: Arc<dyn EventStore>,
}

impl DeleteEventHandler {
    pub fn new(store: Arc<dyn EventStore>) -> Self {
        Self { store }
    }

    pub async fn handle(&self, cmd: DeleteEventCommand) -> Result<(), EventCommandError> {
        if !cmd.actor.role.is_executive() {
            return Err(EventCommandError::Forbidden {
                action: "delete events",
            });
        }

        let event = self
            .store
            .find(cmd.event_id)
            .await?
            .ok_or(EventCommandError::NotFound {
                event_id: cmd.event_id,
            })?;

        if event.accepts_registrations() {
            return Err(EventCommandError::StillAcceptingRegistrations {
                event_id: event.id,
            });
        }

        self.store.delete(event.id).await?;

        info!(event_id = %event.id, "Event deleted from catalog");

        Ok(())
    }
}
