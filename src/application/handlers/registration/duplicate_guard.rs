//! Advisory duplicate pre-check.

use std::sync::Arc;

use crate::domain::foundation::EventId;
use crate::domain::registration::RegistrationError;
use crate::ports::RegistrationStore;

/// Pre-payment duplicate check against existing registrations.
///
/// This runs before any money moves so the common duplicate case fails
/// fast with a clear message. It is advisory only: two racing attempts
/// can both pass it, and the storage uniqueness constraint on
/// (event id, email) remains the authoritative rejection at write time.
pub struct DuplicateGuard {
    registrations: Arc<dyn RegistrationStore>,
}

impl DuplicateGuard {
    pub fn new(registrations: Arc<dyn RegistrationStore>) -> Self {
        Self { registrations }
    }

    /// Rejects the attempt if any of `emails` is already registered for
    /// the event. Emails must already be normalized (lowercased).
    pub async fn check(
        &self,
        event_id: EventId,
        emails: &[String],
    ) -> Result<(), RegistrationError> {
        for email in emails {
            if self.registrations.find(event_id, email).await?.is_some() {
                return Err(RegistrationError::AlreadyRegistered {
                    event_id,
                    email: email.clone(),
                });
            }
        }
        Ok(())
    }
}
