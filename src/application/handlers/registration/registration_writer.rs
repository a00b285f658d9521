//! Registration writer.
//!
//! Persists a validated, paid-for attempt. Runs after capture, so every
//! failure path here leaves money captured with no record; callers wrap
//! those into reconciliation errors.

use std::sync::Arc;

use tracing::info;

use crate::domain::foundation::{Money, RegistrationId, TeamRegistrationId, Timestamp};
use crate::domain::registration::{
    CommittedRegistration, PaymentProof, PaymentStatus, RegistrationError, RegistrationRecord,
    TeamRegistrationRecord, ValidatedAttempt,
};
use crate::ports::{EventStore, RegistrationStore, RegistrationStoreError};

/// Commits registration rows for captured payments.
pub struct RegistrationWriter {
    events: Arc<dyn EventStore>,
    registrations: Arc<dyn RegistrationStore>,
}

impl RegistrationWriter {
    pub fn new(events: Arc<dyn EventStore>, registrations: Arc<dyn RegistrationStore>) -> Self {
        Self {
            events,
            registrations,
        }
    }

    /// Writes the registration rows for a captured attempt.
    ///
    /// The event's lifecycle state is re-checked here, at write time:
    /// validation ran before the capture UI was open and an admin may
    /// have closed the event in between. Team rows go in atomically with
    /// the full captured amount on the leader row and zero on members,
    /// so summing `amount_paid` never double-counts a team.
    pub async fn commit(
        &self,
        validated: &ValidatedAttempt,
        proof: &PaymentProof,
    ) -> Result<CommittedRegistration, RegistrationError> {
        let event = self
            .events
            .find(validated.event_id)
            .await?
            .ok_or(RegistrationError::EventNotFound {
                event_id: validated.event_id,
            })?;

        if !event.accepts_registrations() {
            return Err(RegistrationError::EventClosed { event_id: event.id });
        }

        let committed = if validated.is_team() {
            let team = self.team_rows(validated, proof);
            self.registrations
                .insert_team(&team.members)
                .await
                .map_err(|e| store_error(validated, e))?;
            CommittedRegistration::Team(team)
        } else {
            let row = self.individual_row(validated, proof);
            self.registrations
                .insert(&row)
                .await
                .map_err(|e| store_error(validated, e))?;
            CommittedRegistration::Individual(row)
        };

        info!(
            event_id = %validated.event_id,
            attempt_id = %validated.attempt_id,
            payment_id = %proof.payment_id,
            team = validated.is_team(),
            "Registration committed"
        );

        Ok(committed)
    }

    fn individual_row(
        &self,
        validated: &ValidatedAttempt,
        proof: &PaymentProof,
    ) -> RegistrationRecord {
        RegistrationRecord {
            id: RegistrationId::new(),
            event_id: validated.event_id,
            participant: validated.contact().clone(),
            role: validated.role,
            payment_status: PaymentStatus::Completed,
            amount_paid: proof.amount,
            payment_id: Some(proof.payment_id.clone()),
            order_id: Some(proof.order_id.clone()),
            team_registration_id: None,
            team_name: None,
            is_team_leader: false,
            created_at: Timestamp::now(),
        }
    }

    fn team_rows(
        &self,
        validated: &ValidatedAttempt,
        proof: &PaymentProof,
    ) -> TeamRegistrationRecord {
        let team_id = TeamRegistrationId::new();
        let team_name = validated.team_name.clone().unwrap_or_default();
        let now = Timestamp::now();

        let members = validated
            .participants
            .iter()
            .enumerate()
            .map(|(index, participant)| {
                let is_leader = index == 0;
                RegistrationRecord {
                    id: RegistrationId::new(),
                    event_id: validated.event_id,
                    participant: participant.clone(),
                    role: validated.role,
                    payment_status: PaymentStatus::Completed,
                    amount_paid: if is_leader { proof.amount } else { Money::zero() },
                    payment_id: is_leader.then(|| proof.payment_id.clone()),
                    order_id: is_leader.then(|| proof.order_id.clone()),
                    team_registration_id: Some(team_id),
                    team_name: Some(team_name.clone()),
                    is_team_leader: is_leader,
                    created_at: now,
                }
            })
            .collect();

        TeamRegistrationRecord {
            team_registration_id: team_id,
            team_name,
            members,
        }
    }
}

fn store_error(validated: &ValidatedAttempt, err: RegistrationStoreError) -> RegistrationError {
    match err {
        RegistrationStoreError::Duplicate { email } => RegistrationError::AlreadyRegistered {
            event_id: validated.event_id,
            email,
        },
        RegistrationStoreError::Storage(e) => RegistrationError::Write { reason: e.message },
    }
}
