//! Identity collaborator port.
//!
//! Token verification happens upstream (the club SSO proxy); this side
//! only ever sees forwarded identity claims. The core reads the role
//! tier and contact details from the resolved profile and nothing else.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, RoleTier};

/// Unverified identity claims forwarded with a request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdentityClaims {
    pub role: Option<String>,
    pub name: Option<String>,
    pub email: Option<String>,
}

impl IdentityClaims {
    pub fn anonymous() -> Self {
        Self::default()
    }
}

/// The current user as seen by the registration core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserProfile {
    pub role: RoleTier,
    pub display_name: String,
    pub email: String,
}

impl UserProfile {
    /// An anonymous visitor.
    pub fn guest() -> Self {
        Self {
            role: RoleTier::Guest,
            display_name: "Guest".to_string(),
            email: String::new(),
        }
    }
}

/// Port resolving forwarded claims into a profile.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Profile for the request's claims; absent or unrecognized claims
    /// resolve to `UserProfile::guest()`.
    async fn resolve(&self, claims: IdentityClaims) -> Result<UserProfile, DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    // Trait object safety test
    #[test]
    fn identity_provider_is_object_safe() {
        fn _accepts_dyn(_provider: &dyn IdentityProvider) {}
    }

    #[test]
    fn guest_profile_has_guest_role() {
        assert_eq!(UserProfile::guest().role, RoleTier::Guest);
    }

    #[test]
    fn anonymous_claims_are_empty() {
        assert_eq!(IdentityClaims::anonymous(), IdentityClaims::default());
    }
}
