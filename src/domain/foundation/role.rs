//! Role tier definitions.
//!
//! The tier a person holds at registration time decides their discount rate
//! and whether they may manage the event catalog.

use serde::{Deserialize, Serialize};

/// Role of the person making a request.
///
/// Determines the discount applied by the pricing engine and gates
/// organizer-only operations (event creation, lifecycle transitions).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoleTier {
    /// No club account. Pays full price.
    Guest,

    /// Regular club member.
    RegularMember,

    /// Club executive. Organizes events and gets the deepest discount.
    ExecutiveMember,
}

impl RoleTier {
    /// Returns true if this tier may manage the event catalog.
    pub fn is_executive(&self) -> bool {
        matches!(self, RoleTier::ExecutiveMember)
    }

    /// Returns true if this tier is any kind of club member.
    pub fn is_member(&self) -> bool {
        !matches!(self, RoleTier::Guest)
    }

    /// Returns the display name for this tier.
    pub fn display_name(&self) -> &'static str {
        match self {
            RoleTier::Guest => "Guest",
            RoleTier::RegularMember => "Member",
            RoleTier::ExecutiveMember => "Executive",
        }
    }
}

impl std::fmt::Display for RoleTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}
