//! Registration validator.
//!
//! Pure admissibility check for an attempt against a snapshot of the
//! event: lifecycle state, team-size bounds, intra-attempt duplicate
//! emails, and required identity fields. No I/O; callers supply the
//! current event and re-check state again at write time.

use std::collections::HashSet;

use crate::domain::event::Event;
use crate::domain::foundation::AttemptId;
use crate::domain::pricing::PricingEngine;

use super::{AttemptDetails, Participant, RegistrationAttempt, RegistrationError, ValidatedAttempt};

/// Validates attempts and attaches the computed quote.
#[derive(Debug, Clone, Default)]
pub struct RegistrationValidator {
    pricing: PricingEngine,
}

impl RegistrationValidator {
    pub fn new(pricing: PricingEngine) -> Self {
        Self { pricing }
    }

    /// Checks an attempt against the event snapshot.
    ///
    /// On success the returned `ValidatedAttempt` carries the normalized
    /// participant list (leader first for teams) and the pricing quote.
    pub fn validate(
        &self,
        event: &Event,
        attempt: &RegistrationAttempt,
    ) -> Result<ValidatedAttempt, RegistrationError> {
        if !event.accepts_registrations() {
            return Err(RegistrationError::EventClosed { event_id: event.id });
        }

        let (participants, team_name) = match (&attempt.details, event.participation.team_bounds())
        {
            (AttemptDetails::Individual { participant }, None) => {
                (vec![participant.normalized()], None)
            }
            (AttemptDetails::Team { team_name, leader, members }, Some(bounds)) => {
                if team_name.trim().is_empty() {
                    return Err(RegistrationError::MissingField {
                        participant: "team".to_string(),
                        field: "team_name".to_string(),
                    });
                }

                // The registering leader is not listed among `members`.
                let team_size = members.len() as u32 + 1;
                if !bounds.admits(team_size) {
                    return Err(RegistrationError::TeamSize {
                        min: bounds.min,
                        max: bounds.max,
                        actual: team_size,
                    });
                }

                let mut participants = Vec::with_capacity(members.len() + 1);
                participants.push(leader.normalized());
                participants.extend(members.iter().map(Participant::normalized));
                (participants, Some(team_name.trim().to_string()))
            }
            (AttemptDetails::Individual { .. }, Some(_)) => {
                return Err(RegistrationError::ParticipationMismatch { expected: "team" });
            }
            (AttemptDetails::Team { .. }, None) => {
                return Err(RegistrationError::ParticipationMismatch {
                    expected: "individual",
                });
            }
        };

        for (index, participant) in participants.iter().enumerate() {
            for (field, value) in participant.required_fields() {
                if value.is_empty() {
                    return Err(RegistrationError::MissingField {
                        participant: participant_label(index, team_name.is_some()),
                        field: field.to_string(),
                    });
                }
            }
        }

        // Emails are already lowercased, so this is case-insensitive.
        let mut seen = HashSet::new();
        for participant in &participants {
            if !seen.insert(participant.email.clone()) {
                return Err(RegistrationError::DuplicateTeamEmail {
                    email: participant.email.clone(),
                });
            }
        }

        let quote =
            self.pricing
                .quote(event.base_price, attempt.role, participants.len() as u32)?;

        Ok(ValidatedAttempt {
            attempt_id: AttemptId::new(),
            event_id: event.id,
            role: attempt.role,
            participants,
            team_name,
            quote,
        })
    }
}

fn participant_label(index: usize, is_team: bool) -> String {
    match (index, is_team) {
        (_, false) => "participant".to_string(),
        (0, true) => "team leader".to_string(),
        (i, true) => format!("team member {}", i),
    }
}
