//! Committed-registration notification port.

use async_trait::async_trait;

use crate::domain::foundation::DomainError;
use crate::domain::registration::CommittedRegistration;

/// Port notified after a registration settles.
///
/// Callers use this to invalidate cached lists or counts; the core never
/// reloads anything itself after a write. Notification failures must not
/// fail the registration - the row is already durable.
#[async_trait]
pub trait RegistrationNotifier: Send + Sync {
    async fn registration_committed(
        &self,
        committed: &CommittedRegistration,
    ) -> Result<(), DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    // Trait object safety test
    #[test]
    fn registration_notifier_is_object_safe() {
        fn _accepts_dyn(_notifier: &dyn RegistrationNotifier) {}
    }
}
