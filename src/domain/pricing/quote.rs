//! Itemized pricing quote for one registration attempt.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::foundation::{Money, RoleTier};

/// Itemized amount for a registration attempt.
///
/// Transient: computed per attempt, carried through payment, never
/// persisted as its own record. The discount applies to every team
/// member's share, not only the registering leader.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingQuote {
    /// Per-participant base price in major units.
    pub base_price: Money,

    /// Role tier the rate was looked up for.
    pub role: RoleTier,

    /// Fraction of the original total removed (0 to 1).
    pub discount_rate: Decimal,

    /// People covered by this quote: 1, or the full team size.
    pub participant_count: u32,

    /// `base_price × participant_count`, exact.
    pub original_total: Money,

    /// `original_total × discount_rate`, rounded half-up to the paise.
    ///
    /// Rounding happens here, once, at the total. The final total is then
    /// an exact difference, so the quote identity holds to the paise.
    pub discount_amount: Money,

    /// `original_total − discount_amount`.
    pub final_total: Money,
}

impl PricingQuote {
    /// Checks the quote identity: `final == original − discount`.
    pub fn balances(&self) -> bool {
        self.original_total.minus(self.discount_amount) == self.final_total
    }
}
