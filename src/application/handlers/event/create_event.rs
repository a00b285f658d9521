//! CreateEventHandler - Command handler for publishing a new event.

use std::sync::Arc;

use tracing::info;

use crate::domain::event::{Event, EventCategory, Participation};
use crate::domain::foundation::{EventId, Money};
use crate::ports::{EventStore, UserProfile};

use super::EventCommandError;

/// Command to publish a new event to the catalog.
#[derive(Debug, Clone)]
pub struct CreateEventCommand {
    pub actor: UserProfile,
    pub title: String,
    pub description: String,
    pub category: EventCategory,
    pub date: chrono::NaiveDate,
    pub time: chrono::NaiveTime,
    pub location: String,
    pub base_price: Money,
    pub max_slots: u32,
    pub participation: Participation,
}

/// Handler for publishing new events.
///
/// Catalog writes are an executive capability; the new event starts
/// active and accepting registrations immediately.
pub struct CreateEventHandler {
    store: Arc<dyn EventStore>,
}

impl CreateEventHandler {
    pub fn new(store: Arc<dyn EventStore>) -> Self {
        Self { store }
    }

    pub async fn handle(&self, cmd: CreateEventCommand) -> Result<Event, EventCommandError> {
        if !cmd.actor.role.is_executive() {
            return Err(EventCommandError::Forbidden {
                action: "create events",
            });
        }

        let event = Event::new(
            EventId::new(),
            cmd.title,
            cmd.description,
            cmd.category,
            cmd.date,
            cmd.time,
            cmd.location,
            cmd.base_price,
            cmd.max_slots,
            cmd.participation,
        )?;

        self.store.insert(&event).await?;

        info!(
            event_id = %event.id,
            title = %event.title,
            "Event published"
        );

        Ok(event)
    }
}
