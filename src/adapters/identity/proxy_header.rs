//! Identity provider for forwarded auth-proxy headers.
//!
//! Deployments sit behind the club SSO proxy, which authenticates the
//! member and forwards their role and contact details as request
//! headers. Those arrive here as claims; anything missing or
//! unrecognized resolves to a guest.

use async_trait::async_trait;
use tracing::debug;

use crate::domain::foundation::{DomainError, RoleTier};
use crate::ports::{IdentityClaims, IdentityProvider, UserProfile};

/// Resolves forwarded proxy headers into a profile.
#[derive(Debug, Default)]
pub struct ProxyHeaderIdentity;

impl ProxyHeaderIdentity {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl IdentityProvider for ProxyHeaderIdentity {
    async fn resolve(&self, claims: IdentityClaims) -> Result<UserProfile, DomainError> {
        let role = match claims.role.as_deref() {
            Some("regular_member") => RoleTier::RegularMember,
            Some("executive_member") => RoleTier::ExecutiveMember,
            Some("guest") | None => RoleTier::Guest,
            Some(other) => {
                debug!(role = other, "Unrecognized role claim, treating as guest");
                RoleTier::Guest
            }
        };

        if role == RoleTier::Guest && claims.email.is_none() {
            return Ok(UserProfile::guest());
        }

        Ok(UserProfile {
            role,
            display_name: claims.name.unwrap_or_else(|| "Guest".to_string()),
            email: claims.email.unwrap_or_default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_claims_resolve_to_guest() {
        let identity = ProxyHeaderIdentity::new();
        let profile = identity.resolve(IdentityClaims::anonymous()).await.unwrap();
        assert_eq!(profile, UserProfile::guest());
    }

    #[tokio::test]
    async fn executive_claims_resolve_to_executive() {
        let identity = ProxyHeaderIdentity::new();
        let profile = identity
            .resolve(IdentityClaims {
                role: Some("executive_member".to_string()),
                name: Some("Priya".to_string()),
                email: Some("priya@club.edu".to_string()),
            })
            .await
            .unwrap();

        assert_eq!(profile.role, RoleTier::ExecutiveMember);
        assert_eq!(profile.display_name, "Priya");
    }

    #[tokio::test]
    async fn unknown_role_claim_is_a_guest() {
        let identity = ProxyHeaderIdentity::new();
        let profile = identity
            .resolve(IdentityClaims {
                role: Some("superadmin".to_string()),
                name: Some("Mallory".to_string()),
                email: Some("mallory@club.edu".to_string()),
            })
            .await
            .unwrap();

        assert_eq!(profile.role, RoleTier::Guest);
    }
}
