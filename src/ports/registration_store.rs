//! Registration storage port.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::event::Event;
use crate::domain::foundation::{DomainError, EventId};
use crate::domain::registration::RegistrationRecord;

/// Errors from registration writes.
///
/// `Duplicate` is the authoritative duplicate rejection: the storage
/// layer's uniqueness constraint on (event id, lowercased email) fired.
/// The advisory pre-check in the duplicate guard can miss a racing
/// attempt; this cannot.
#[derive(Debug, Clone, Error)]
pub enum RegistrationStoreError {
    #[error("{email} is already registered for this event")]
    Duplicate { email: String },

    #[error(transparent)]
    Storage(#[from] DomainError),
}

/// Storage port for registration rows.
///
/// Implementations must enforce a uniqueness constraint on
/// (event id, lowercased email) - it is the only serialization point for
/// concurrent attempts on the same identity.
#[async_trait]
pub trait RegistrationStore: Send + Sync {
    /// Insert one individual registration row.
    async fn insert(&self, row: &RegistrationRecord) -> Result<(), RegistrationStoreError>;

    /// Insert all rows of one team registration atomically: either every
    /// row becomes visible or none does. A duplicate on any member must
    /// roll back the whole team.
    async fn insert_team(&self, rows: &[RegistrationRecord])
        -> Result<(), RegistrationStoreError>;

    /// Find a registration by event and normalized email.
    async fn find(
        &self,
        event_id: EventId,
        email: &str,
    ) -> Result<Option<RegistrationRecord>, DomainError>;

    /// Completed-registration count for the capacity display: distinct
    /// teams for group events, individual rows otherwise.
    async fn count_completed(&self, event: &Event) -> Result<u64, DomainError>;
}
