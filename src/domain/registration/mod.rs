//! Registration domain - attempts, validation, records, payment phases.

mod attempt;
mod errors;
mod payment_phase;
mod record;
mod validator;

pub use attempt::{AttemptDetails, Participant, RegistrationAttempt, ValidatedAttempt};
pub use errors::RegistrationError;
pub use payment_phase::{PaymentPhase, PaymentProof};
pub use record::{
    CommittedRegistration, PaymentStatus, RegistrationRecord, TeamRegistrationRecord,
};
pub use validator::RegistrationValidator;
