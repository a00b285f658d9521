//! Event catalog storage port.

use async_trait::async_trait;

use crate::domain::event::Event;
use crate::domain::foundation::{DomainError, EventId};

/// Storage port for the event catalog.
///
/// The catalog itself is a plain CRUD collaborator; all admissibility
/// rules live in the registration core. Implementations must never
/// physically remove an event that registrations still reference.
#[async_trait]
pub trait EventStore: Send + Sync {
    /// All events ordered by date, soonest first.
    async fn list(&self) -> Result<Vec<Event>, DomainError>;

    /// Find an event by id. Returns `None` if not found.
    async fn find(&self, id: EventId) -> Result<Option<Event>, DomainError>;

    /// Insert a new event.
    async fn insert(&self, event: &Event) -> Result<(), DomainError>;

    /// Update an existing event (lifecycle state, capacity, price edits).
    ///
    /// # Errors
    ///
    /// - `EventNotFound` if the event does not exist
    async fn update(&self, event: &Event) -> Result<(), DomainError>;

    /// Delete an event. Callers gate this on the lifecycle state.
    async fn delete(&self, id: EventId) -> Result<(), DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    // Trait object safety test
    #[test]
    fn event_store_is_object_safe() {
        fn _accepts_dyn(_store: &dyn EventStore) {}
    }
}
