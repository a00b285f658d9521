//! Domain layer - events, pricing, and registration.

pub mod event;
pub mod foundation;
pub mod pricing;
pub mod registration;
