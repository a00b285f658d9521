//! Pricing domain - per-role discounted quotes.

mod engine;
mod quote;

pub use engine::{DiscountTable, PricingEngine, PricingError};
pub use quote::PricingQuote;
