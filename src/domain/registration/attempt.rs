//! Registration attempt types.
//!
//! An attempt is what the form submits; a `ValidatedAttempt` is what the
//! validator hands to the payment orchestrator: normalized participants
//! plus the computed quote.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{AttemptId, EventId, RoleTier};
use crate::domain::pricing::PricingQuote;

/// One person on a registration, leader or member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub student_id: String,

    #[serde(default)]
    pub year: Option<String>,
    #[serde(default)]
    pub department: Option<String>,
    #[serde(default)]
    pub dietary_restrictions: Option<String>,
    #[serde(default)]
    pub emergency_contact: Option<String>,
    #[serde(default)]
    pub emergency_phone: Option<String>,
}

impl Participant {
    /// Returns a copy with whitespace trimmed and the email lowercased.
    ///
    /// The lowercased email is what the duplicate checks and the storage
    /// uniqueness constraint operate on.
    pub fn normalized(&self) -> Self {
        Self {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_lowercase(),
            phone: self.phone.trim().to_string(),
            student_id: self.student_id.trim().to_string(),
            year: self.year.clone(),
            department: self.department.clone(),
            dietary_restrictions: self.dietary_restrictions.clone(),
            emergency_contact: self.emergency_contact.clone(),
            emergency_phone: self.emergency_phone.clone(),
        }
    }

    /// Fields that must not be blank, paired with their names.
    pub fn required_fields(&self) -> [(&'static str, &str); 4] {
        [
            ("name", self.name.as_str()),
            ("email", self.email.as_str()),
            ("phone", self.phone.as_str()),
            ("student_id", self.student_id.as_str()),
        ]
    }
}

/// Individual or team shape of an attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum AttemptDetails {
    Individual { participant: Participant },

    /// `members` excludes the registering leader.
    Team {
        team_name: String,
        leader: Participant,
        members: Vec<Participant>,
    },
}

/// An incoming registration request, before validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrationAttempt {
    pub event_id: EventId,

    /// Role tier of the registering user at this moment, supplied by the
    /// identity collaborator. The same discount applies to the whole team.
    pub role: RoleTier,

    pub details: AttemptDetails,
}

impl RegistrationAttempt {
    /// Total people covered by this attempt, leader included.
    pub fn participant_count(&self) -> u32 {
        match &self.details {
            AttemptDetails::Individual { .. } => 1,
            AttemptDetails::Team { members, .. } => members.len() as u32 + 1,
        }
    }
}

/// An attempt that passed validation, ready for payment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidatedAttempt {
    pub attempt_id: AttemptId,
    pub event_id: EventId,
    pub role: RoleTier,

    /// Normalized participants; for teams the leader is first.
    pub participants: Vec<Participant>,

    /// Team name for group attempts, `None` for individual ones.
    pub team_name: Option<String>,

    pub quote: PricingQuote,
}

impl ValidatedAttempt {
    pub fn is_team(&self) -> bool {
        self.team_name.is_some()
    }

    /// The registering person: the sole participant, or the team leader.
    pub fn contact(&self) -> &Participant {
        &self.participants[0]
    }

    /// Normalized emails of everyone on the attempt.
    pub fn emails(&self) -> Vec<String> {
        self.participants.iter().map(|p| p.email.clone()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn participant(email: &str) -> Participant {
        Participant {
            name: "  Asha Rao ".to_string(),
            email: email.to_string(),
            phone: "9876543210".to_string(),
            student_id: "CS21B042".to_string(),
            year: None,
            department: None,
            dietary_restrictions: None,
            emergency_contact: None,
            emergency_phone: None,
        }
    }

    #[test]
    fn normalization_trims_and_lowercases_email() {
        let p = participant(" Asha.Rao@Club.EDU ").normalized();
        assert_eq!(p.email, "asha.rao@club.edu");
        assert_eq!(p.name, "Asha Rao");
    }

    #[test]
    fn individual_attempt_counts_one() {
        let attempt = RegistrationAttempt {
            event_id: EventId::new(),
            role: RoleTier::Guest,
            details: AttemptDetails::Individual {
                participant: participant("a@club.edu"),
            },
        };
        assert_eq!(attempt.participant_count(), 1);
    }

    #[test]
    fn team_attempt_counts_the_leader() {
        let attempt = RegistrationAttempt {
            event_id: EventId::new(),
            role: RoleTier::RegularMember,
            details: AttemptDetails::Team {
                team_name: "Nullpointers".to_string(),
                leader: participant("lead@club.edu"),
                members: vec![participant("m1@club.edu"), participant("m2@club.edu")],
            },
        };
        assert_eq!(attempt.participant_count(), 3);
    }
}
