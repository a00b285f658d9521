//! Registration error taxonomy.
//!
//! Every variant carries enough context (event id, email, attempt id) for
//! support-desk reconciliation.

use thiserror::Error;

use crate::domain::foundation::{AttemptId, DomainError, ErrorCode, EventId};
use crate::domain::pricing::PricingError;

/// Errors from the registration flow, validation through settlement.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RegistrationError {
    #[error("Event {event_id} not found")]
    EventNotFound { event_id: EventId },

    #[error("Registration is currently closed for event {event_id}")]
    EventClosed { event_id: EventId },

    #[error("This event requires {expected} registration")]
    ParticipationMismatch { expected: &'static str },

    #[error("Team must have between {min} and {max} members including the leader, got {actual}")]
    TeamSize { min: u32, max: u32, actual: u32 },

    #[error("Team members cannot share an email address: {email}")]
    DuplicateTeamEmail { email: String },

    #[error("Missing required field '{field}' for {participant}")]
    MissingField { participant: String, field: String },

    #[error("{email} is already registered for event {event_id}")]
    AlreadyRegistered { event_id: EventId, email: String },

    #[error(transparent)]
    Pricing(#[from] PricingError),

    #[error("Payment capture failed: {reason}")]
    CaptureFailed { reason: String, retryable: bool },

    #[error("Payment was cancelled before capture")]
    CaptureCancelled,

    #[error(
        "Payment {payment_id} was captured for attempt {attempt_id} on event {event_id} \
         ({email}) but the registration was not saved: {reason}"
    )]
    Reconciliation {
        attempt_id: AttemptId,
        event_id: EventId,
        email: String,
        payment_id: String,
        reason: String,
    },

    #[error("Registration write failed: {reason}")]
    Write { reason: String },

    #[error("Unknown or expired registration attempt {attempt_id}")]
    UnknownAttempt { attempt_id: AttemptId },
}

impl RegistrationError {
    /// Maps the variant to its wire-level error code.
    pub fn code(&self) -> ErrorCode {
        match self {
            RegistrationError::EventNotFound { .. } => ErrorCode::EventNotFound,
            RegistrationError::EventClosed { .. } => ErrorCode::EventClosed,
            RegistrationError::ParticipationMismatch { .. } => ErrorCode::ValidationFailed,
            RegistrationError::TeamSize { .. } => ErrorCode::InvalidTeamSize,
            RegistrationError::DuplicateTeamEmail { .. } => ErrorCode::DuplicateTeamEmail,
            RegistrationError::MissingField { .. } => ErrorCode::MissingField,
            RegistrationError::AlreadyRegistered { .. } => ErrorCode::AlreadyRegistered,
            RegistrationError::Pricing(_) => ErrorCode::InvalidPrice,
            RegistrationError::CaptureFailed { .. } => ErrorCode::PaymentFailed,
            RegistrationError::CaptureCancelled => ErrorCode::PaymentCancelled,
            RegistrationError::Reconciliation { .. } => ErrorCode::ReconciliationRequired,
            RegistrationError::Write { .. } => ErrorCode::DatabaseError,
            RegistrationError::UnknownAttempt { .. } => ErrorCode::RegistrationNotFound,
        }
    }

    /// True when the user may simply retry the whole flow.
    ///
    /// Validation and pre-check failures are corrected locally; payment
    /// failures before capture moved no money. A reconciliation failure is
    /// never retryable: money was taken, retrying could double-charge.
    pub fn is_retryable(&self) -> bool {
        match self {
            RegistrationError::CaptureFailed { retryable, .. } => *retryable,
            RegistrationError::CaptureCancelled | RegistrationError::Write { .. } => true,
            _ => false,
        }
    }

    /// True for errors that require manual support follow-up.
    pub fn requires_manual_follow_up(&self) -> bool {
        matches!(self, RegistrationError::Reconciliation { .. })
    }
}

impl From<DomainError> for RegistrationError {
    fn from(err: DomainError) -> Self {
        RegistrationError::Write {
            reason: err.message,
        }
    }
}
