//! Error types for the domain layer.

use std::collections::HashMap;
use std::error::Error;
use std::fmt;
use thiserror::Error;

/// Errors that occur during value object construction and state changes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Field '{field}' cannot be empty")]
    EmptyField { field: String },

    #[error("Field '{field}' must be between {min} and {max}, got {actual}")]
    OutOfRange {
        field: String,
        min: i32,
        max: i32,
        actual: i32,
    },

    #[error("Field '{field}' has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

impl ValidationError {
    /// Creates an empty field validation error.
    pub fn empty_field(field: impl Into<String>) -> Self {
        ValidationError::EmptyField { field: field.into() }
    }

    /// Creates an out of range validation error.
    pub fn out_of_range(field: impl Into<String>, min: i32, max: i32, actual: i32) -> Self {
        ValidationError::OutOfRange {
            field: field.into(),
            min,
            max,
            actual,
        }
    }

    /// Creates an invalid format validation error.
    pub fn invalid_format(field: impl Into<String>, reason: impl Into<String>) -> Self {
        ValidationError::InvalidFormat {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// Error codes organized by category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Validation errors
    ValidationFailed,
    InvalidPrice,

    // Not found errors
    EventNotFound,
    RegistrationNotFound,

    // Registration admissibility
    EventClosed,
    InvalidTeamSize,
    DuplicateTeamEmail,
    MissingField,
    AlreadyRegistered,

    // Payment errors
    PaymentFailed,
    PaymentCancelled,
    ReconciliationRequired,

    // State errors
    InvalidStateTransition,

    // Authorization errors
    Forbidden,

    // Infrastructure errors
    DatabaseError,
    GatewayError,
    InternalError,
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorCode::ValidationFailed => "VALIDATION_FAILED",
            ErrorCode::InvalidPrice => "INVALID_PRICE",
            ErrorCode::EventNotFound => "EVENT_NOT_FOUND",
            ErrorCode::RegistrationNotFound => "REGISTRATION_NOT_FOUND",
            ErrorCode::EventClosed => "EVENT_CLOSED",
            ErrorCode::InvalidTeamSize => "INVALID_TEAM_SIZE",
            ErrorCode::DuplicateTeamEmail => "DUPLICATE_TEAM_EMAIL",
            ErrorCode::MissingField => "MISSING_FIELD",
            ErrorCode::AlreadyRegistered => "ALREADY_REGISTERED",
            ErrorCode::PaymentFailed => "PAYMENT_FAILED",
            ErrorCode::PaymentCancelled => "PAYMENT_CANCELLED",
            ErrorCode::ReconciliationRequired => "RECONCILIATION_REQUIRED",
            ErrorCode::InvalidStateTransition => "INVALID_STATE_TRANSITION",
            ErrorCode::Forbidden => "FORBIDDEN",
            ErrorCode::DatabaseError => "DATABASE_ERROR",
            ErrorCode::GatewayError => "GATEWAY_ERROR",
            ErrorCode::InternalError => "INTERNAL_ERROR",
        };
        write!(f, "{}", s)
    }
}

/// Standard domain error with code, message, and optional details.
#[derive(Debug, Clone)]
pub struct DomainError {
    pub code: ErrorCode,
    pub message: String,
    pub details: HashMap<String, String>,
}

impl DomainError {
    /// Creates a new domain error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: HashMap::new(),
        }
    }

    /// Creates a validation error for a specific field.
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: ErrorCode::ValidationFailed,
            message: message.into(),
            details: HashMap::new(),
        }
        .with_detail("field", field.into())
    }

    /// Adds a detail to the error.
    pub fn with_detail(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.details.insert(key.into(), value.into());
        self
    }
}

impl fmt::Display for DomainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl Error for DomainError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_error_empty_field_displays_correctly() {
        let err = ValidationError::empty_field("email");
        assert_eq!(format!("{}", err), "Field 'email' cannot be empty");
    }

    #[test]
    fn validation_error_out_of_range_displays_correctly() {
        let err = ValidationError::out_of_range("team_size", 2, 5, 7);
        assert_eq!(
            format!("{}", err),
            "Field 'team_size' must be between 2 and 5, got 7"
        );
    }

    #[test]
    fn domain_error_displays_code_and_message() {
        let err = DomainError::new(ErrorCode::EventNotFound, "Event not found");
        assert_eq!(format!("{}", err), "[EVENT_NOT_FOUND] Event not found");
    }

    #[test]
    fn domain_error_with_detail_adds_detail() {
        let err = DomainError::new(ErrorCode::AlreadyRegistered, "Already registered")
            .with_detail("event_id", "abc")
            .with_detail("email", "x@y.z");

        assert_eq!(err.details.get("event_id"), Some(&"abc".to_string()));
        assert_eq!(err.details.get("email"), Some(&"x@y.z".to_string()));
    }

    #[test]
    fn error_code_display_formats_correctly() {
        assert_eq!(format!("{}", ErrorCode::EventClosed), "EVENT_CLOSED");
        assert_eq!(
            format!("{}", ErrorCode::ReconciliationRequired),
            "RECONCILIATION_REQUIRED"
        );
    }
}
