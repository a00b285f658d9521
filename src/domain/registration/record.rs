//! Persisted registration records.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{
    EventId, Money, RegistrationId, RoleTier, TeamRegistrationId, Timestamp,
};

use super::Participant;

/// Payment status of a registration row.
///
/// Rows written by this service are born `Completed`: nothing durable
/// exists before capture. `Pending` only appears in rows seeded outside
/// the flow (the storage default).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Pending,
    Completed,
}

/// One persisted registration row.
///
/// Individual registrations are a single row; team registrations are one
/// row per person, linked by `team_registration_id` with exactly one row
/// flagged as leader.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegistrationRecord {
    pub id: RegistrationId,
    pub event_id: EventId,
    pub participant: Participant,

    /// Role tier at the time of registration.
    pub role: RoleTier,

    pub payment_status: PaymentStatus,
    pub amount_paid: Money,
    pub payment_id: Option<String>,
    pub order_id: Option<String>,

    pub team_registration_id: Option<TeamRegistrationId>,
    pub team_name: Option<String>,
    pub is_team_leader: bool,

    pub created_at: Timestamp,
}

/// All rows of one team's registration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamRegistrationRecord {
    pub team_registration_id: TeamRegistrationId,
    pub team_name: String,
    pub members: Vec<RegistrationRecord>,
}

impl TeamRegistrationRecord {
    /// The leader's row.
    pub fn leader(&self) -> Option<&RegistrationRecord> {
        self.members.iter().find(|m| m.is_team_leader)
    }

    pub fn size(&self) -> usize {
        self.members.len()
    }
}

/// Result of a committed registration, individual or team.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum CommittedRegistration {
    Individual(RegistrationRecord),
    Team(TeamRegistrationRecord),
}

impl CommittedRegistration {
    pub fn event_id(&self) -> EventId {
        match self {
            CommittedRegistration::Individual(r) => r.event_id,
            CommittedRegistration::Team(t) => t.members[0].event_id,
        }
    }

    /// Email of the registering person (the leader for teams).
    pub fn contact_email(&self) -> &str {
        match self {
            CommittedRegistration::Individual(r) => &r.participant.email,
            CommittedRegistration::Team(t) => t
                .leader()
                .map(|l| l.participant.email.as_str())
                .unwrap_or_default(),
        }
    }

    /// Total amount captured for this registration.
    pub fn amount_paid(&self) -> Money {
        match self {
            CommittedRegistration::Individual(r) => r.amount_paid,
            // The leader row carries the full captured amount.
            CommittedRegistration::Team(t) => {
                t.leader().map(|l| l.amount_paid).unwrap_or_default()
            }
        }
    }
}
