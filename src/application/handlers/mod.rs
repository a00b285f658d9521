//! Command and query handlers, one per file.
//!
//! Handlers hold `Arc<dyn Port>` collaborators and orchestrate domain
//! logic; they own no business rules beyond sequencing and capability
//! checks.

pub mod event;
pub mod registration;
