//! Tracing-based registration notifier.

use async_trait::async_trait;
use tracing::info;

use crate::domain::foundation::DomainError;
use crate::domain::registration::CommittedRegistration;
use crate::ports::RegistrationNotifier;

/// Notifier that records committed registrations in the log.
///
/// The deployment has no push channel to clients; the frontend reloads
/// its lists after a successful registration, so a structured log line
/// is all the follow-up this side needs.
#[derive(Debug, Default)]
pub struct LogNotifier;

impl LogNotifier {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl RegistrationNotifier for LogNotifier {
    async fn registration_committed(
        &self,
        committed: &CommittedRegistration,
    ) -> Result<(), DomainError> {
        info!(
            event_id = %committed.event_id(),
            contact = %committed.contact_email(),
            amount = %committed.amount_paid(),
            team = matches!(committed, CommittedRegistration::Team(_)),
            "Registration confirmed"
        );
        Ok(())
    }
}
