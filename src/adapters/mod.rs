//! Adapters - implementations of the ports.
//!
//! - `postgres` - sqlx-backed event catalog and registration storage
//! - `razorpay` - real gateway client plus the offline fallback
//! - `identity` - forwarded-header identity resolution
//! - `notify` - tracing-based registration notifier
//! - `http` - axum routes and DTOs

pub mod http;
pub mod identity;
pub mod notify;
pub mod postgres;
pub mod razorpay;
