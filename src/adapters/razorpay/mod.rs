//! Razorpay gateway adapter and the offline fallback.

mod gateway;
mod offline_gateway;

pub use gateway::{RazorpayConfig, RazorpayGateway};
pub use offline_gateway::OfflineGateway;
