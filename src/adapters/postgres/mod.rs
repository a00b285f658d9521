//! PostgreSQL adapters for the storage ports.

mod event_store;
mod registration_store;

pub use event_store::PostgresEventStore;
pub use registration_store::PostgresRegistrationStore;
