//! UpdateEventHandler - Command handler for editing catalog details.

use std::sync::Arc;

use tracing::info;

use crate::domain::event::{Event, EventCategory, Participation};
use crate::domain::foundation::{EventId, Money, Timestamp, ValidationError};
use crate::ports::{EventStore, UserProfile};

use super::EventCommandError;

/// Catalog fields an executive may edit after publication.
///
/// Lifecycle state is not editable here; that goes through the
/// transition handler so the state machine stays authoritative.
#[derive(Debug, Clone, Default)]
pub struct EventEdits {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<EventCategory>,
    pub date: Option<chrono::NaiveDate>,
    pub time: Option<chrono::NaiveTime>,
    pub location: Option<String>,
    pub base_price: Option<Money>,
    pub max_slots: Option<u32>,
    pub participation: Option<Participation>,
}

/// Command to edit an event's catalog details.
#[derive(Debug, Clone)]
pub struct UpdateEventCommand {
    pub actor: UserProfile,
    pub event_id: EventId,
    pub edits: EventEdits,
}

/// Handler for catalog edits.
///
/// Price edits apply to future attempts only; quotes already captured
/// keep the amount they were captured at.
pub struct UpdateEventHandler {
    store: Arc<dyn EventStore>,
}

impl UpdateEventHandler {
    pub fn new(store: Arc<dyn EventStore>) -> Self {
        Self { store }
    }

    pub async fn handle(&self, cmd: UpdateEventCommand) -> Result<Event, EventCommandError> {
        if !cmd.actor.role.is_executive() {
            return Err(EventCommandError::Forbidden {
                action: "edit events",
            });
        }

        let mut event = self
            .store
            .find(cmd.event_id)
            .await?
            .ok_or(EventCommandError::NotFound {
                event_id: cmd.event_id,
            })?;

        apply_edits(&mut event, cmd.edits)?;
        event.updated_at = Timestamp::now();

        self.store.update(&event).await?;

        info!(event_id = %event.id, "Event details updated");

        Ok(event)
    }
}

fn apply_edits(event: &mut Event, edits: EventEdits) -> Result<(), ValidationError> {
    if let Some(title) = edits.title {
        if title.trim().is_empty() {
            return Err(ValidationError::empty_field("title"));
        }
        event.title = title;
    }
    if let Some(description) = edits.description {
        event.description = description;
    }
    if let Some(category) = edits.category {
        event.category = category;
    }
    if let Some(date) = edits.date {
        event.date = date;
    }
    if let Some(time) = edits.time {
        event.time = time;
    }
    if let Some(location) = edits.location {
        if location.trim().is_empty() {
            return Err(ValidationError::empty_field("location"));
        }
        event.location = location;
    }
    if let Some(base_price) = edits.base_price {
        event.base_price = base_price;
    }
    if let Some(max_slots) = edits.max_slots {
        if max_slots == 0 {
            return Err(ValidationError::out_of_range("max_slots", 1, i32::MAX, 0));
        }
        event.max_slots = max_slots;
    }
    if let Some(participation) = edits.participation {
        event.participation = participation;
    }
    Ok(())
}
