//! Foundation module - shared domain primitives.
//!
//! Contains identifiers, value objects, enums, and error types that form
//! the vocabulary of the club events domain.

mod errors;
mod ids;
mod money;
mod role;
mod state_machine;
mod timestamp;

pub use errors::{DomainError, ErrorCode, ValidationError};
pub use ids::{AttemptId, EventId, RegistrationId, TeamRegistrationId};
pub use money::{InvalidPriceError, Money};
pub use role::RoleTier;
pub use state_machine::StateMachine;
pub use timestamp::Timestamp;
