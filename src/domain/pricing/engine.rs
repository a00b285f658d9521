//! Pricing engine.
//!
//! Pure quote computation: no storage, no clock, safe to call repeatedly
//! for the same attempt.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::foundation::{InvalidPriceError, Money, RoleTier};

use super::PricingQuote;

/// Errors from quote computation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PricingError {
    #[error(transparent)]
    InvalidPrice(#[from] InvalidPriceError),

    #[error("A quote must cover at least one participant")]
    NoParticipants,
}

/// Discount rate per role tier, as a fraction of the original total.
///
/// The defaults match club policy (guests pay full price, members 30% off,
/// executives 50% off); deployments may construct their own table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscountTable {
    pub guest: Decimal,
    pub regular_member: Decimal,
    pub executive_member: Decimal,
}

impl DiscountTable {
    /// Looks up the discount rate for a role tier.
    pub fn rate_for(&self, role: RoleTier) -> Decimal {
        match role {
            RoleTier::Guest => self.guest,
            RoleTier::RegularMember => self.regular_member,
            RoleTier::ExecutiveMember => self.executive_member,
        }
    }
}

impl Default for DiscountTable {
    fn default() -> Self {
        Self {
            guest: Decimal::ZERO,
            regular_member: Decimal::new(30, 2),
            executive_member: Decimal::new(50, 2),
        }
    }
}

/// Computes itemized quotes from a discount table.
#[derive(Debug, Clone, Default)]
pub struct PricingEngine {
    discounts: DiscountTable,
}

impl PricingEngine {
    /// Creates an engine with a custom discount table.
    pub fn new(discounts: DiscountTable) -> Self {
        Self { discounts }
    }

    /// Quotes a registration attempt.
    ///
    /// `participant_count` is 1 for individual attempts and the full team
    /// size (leader included) for group attempts.
    ///
    /// # Errors
    ///
    /// - `NoParticipants` if `participant_count` is zero
    pub fn quote(
        &self,
        base_price: Money,
        role: RoleTier,
        participant_count: u32,
    ) -> Result<PricingQuote, PricingError> {
        if participant_count == 0 {
            return Err(PricingError::NoParticipants);
        }

        let rate = self.discounts.rate_for(role);
        let original_total = base_price.times(participant_count);
        let discount_amount = original_total.at_rate(rate);
        let final_total = original_total.minus(discount_amount);

        Ok(PricingQuote {
            base_price,
            role,
            discount_rate: rate,
            participant_count,
            original_total,
            discount_amount,
            final_total,
        })
    }
}
