//! HTTP DTOs for the events and registrations API.
//!
//! These types define the JSON request/response structure and are the
//! boundary between HTTP and the application layer.

use chrono::{NaiveDate, NaiveTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::application::handlers::registration::{
    RegistrationCount, RegistrationOutcome, StartedRegistration,
};
use crate::domain::event::{Event, EventCategory, EventStatus, Participation};
use crate::domain::pricing::PricingQuote;
use crate::domain::registration::{AttemptDetails, CommittedRegistration};
use crate::ports::CheckoutDescriptor;

// ════════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// Team-size fields for group events.
#[derive(Debug, Clone, Deserialize)]
pub struct ParticipationRequest {
    /// "individual" or "group".
    pub mode: String,
    #[serde(default)]
    pub min_team_size: Option<u32>,
    #[serde(default)]
    pub max_team_size: Option<u32>,
}

/// Request to publish a new event.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateEventRequest {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub category: EventCategory,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub location: String,
    /// Price per participant in major units.
    pub base_price: Decimal,
    pub max_slots: u32,
    pub participation: ParticipationRequest,
}

/// Request to edit an event. Absent fields are left untouched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateEventRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub category: Option<EventCategory>,
    #[serde(default)]
    pub date: Option<NaiveDate>,
    #[serde(default)]
    pub time: Option<NaiveTime>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub base_price: Option<Decimal>,
    #[serde(default)]
    pub max_slots: Option<u32>,
    #[serde(default)]
    pub participation: Option<ParticipationRequest>,
}

/// Request to move an event to another lifecycle state.
#[derive(Debug, Clone, Deserialize)]
pub struct TransitionEventRequest {
    pub target: EventStatus,
}

/// Request to start a registration attempt.
///
/// The shape is tagged by `type`: "individual" carries a `participant`,
/// "team" carries `team_name`, `leader` and `members`.
#[derive(Debug, Clone, Deserialize)]
pub struct StartRegistrationRequest {
    #[serde(flatten)]
    pub details: AttemptDetails,
}

/// The capture UI's result, posted back by the client.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum CompleteRegistrationRequest {
    Success {
        payment_id: String,
        order_id: String,
        signature: String,
    },
    Failure {
        #[serde(default)]
        reason: String,
    },
    Cancelled,
}

// ════════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// Event details for API responses.
#[derive(Debug, Clone, Serialize)]
pub struct EventResponse {
    pub id: String,
    pub title: String,
    pub description: String,
    pub category: EventCategory,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub location: String,
    pub base_price: String,
    pub max_slots: u32,
    pub participation_mode: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_team_size: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_team_size: Option<u32>,
    pub status: EventStatus,
    pub accepts_registrations: bool,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Event> for EventResponse {
    fn from(event: Event) -> Self {
        let (mode, min, max) = match event.participation {
            Participation::Individual => ("individual", None, None),
            Participation::Group(bounds) => ("group", Some(bounds.min), Some(bounds.max)),
        };
        Self {
            id: event.id.to_string(),
            title: event.title,
            description: event.description,
            category: event.category,
            date: event.date,
            time: event.time,
            location: event.location,
            base_price: event.base_price.amount().to_string(),
            max_slots: event.max_slots,
            participation_mode: mode.to_string(),
            min_team_size: min,
            max_team_size: max,
            status: event.status,
            accepts_registrations: event.status.accepts_registrations(),
            created_at: event.created_at.as_datetime().to_rfc3339(),
            updated_at: event.updated_at.as_datetime().to_rfc3339(),
        }
    }
}

/// Response for the event list.
#[derive(Debug, Clone, Serialize)]
pub struct EventListResponse {
    pub events: Vec<EventResponse>,
}

/// Itemized quote for API responses.
#[derive(Debug, Clone, Serialize)]
pub struct QuoteResponse {
    pub base_price: String,
    pub discount_rate: Decimal,
    pub participant_count: u32,
    pub original_total: String,
    pub discount_amount: String,
    pub final_total: String,
}

impl From<&PricingQuote> for QuoteResponse {
    fn from(quote: &PricingQuote) -> Self {
        Self {
            base_price: quote.base_price.amount().to_string(),
            discount_rate: quote.discount_rate,
            participant_count: quote.participant_count,
            original_total: quote.original_total.amount().to_string(),
            discount_amount: quote.discount_amount.amount().to_string(),
            final_total: quote.final_total.amount().to_string(),
        }
    }
}

/// Response after starting a registration attempt.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum StartRegistrationResponse {
    /// The client must open the capture UI with `checkout` and post the
    /// result to the completion endpoint.
    AwaitingCapture {
        attempt_id: String,
        quote: QuoteResponse,
        checkout: CheckoutDescriptor,
    },

    /// Offline capture; the registration is already settled.
    Completed { registration: OutcomeResponse },
}

impl From<StartedRegistration> for StartRegistrationResponse {
    fn from(started: StartedRegistration) -> Self {
        match started {
            StartedRegistration::AwaitingCapture {
                attempt_id,
                quote,
                checkout,
            } => StartRegistrationResponse::AwaitingCapture {
                attempt_id: attempt_id.to_string(),
                quote: QuoteResponse::from(&quote),
                checkout,
            },
            StartedRegistration::Completed(outcome) => StartRegistrationResponse::Completed {
                registration: OutcomeResponse::from(outcome),
            },
        }
    }
}

/// A settled registration for API responses.
#[derive(Debug, Clone, Serialize)]
pub struct OutcomeResponse {
    pub attempt_id: String,
    pub event_id: String,
    pub contact_email: String,
    pub amount_paid: String,
    pub quote: QuoteResponse,
    pub offline: bool,
    pub team: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub team_name: Option<String>,
    pub participant_count: u32,
}

impl From<RegistrationOutcome> for OutcomeResponse {
    fn from(outcome: RegistrationOutcome) -> Self {
        let (team, team_name, participant_count) = match &outcome.committed {
            CommittedRegistration::Individual(_) => (false, None, 1),
            CommittedRegistration::Team(t) => {
                (true, Some(t.team_name.clone()), t.size() as u32)
            }
        };
        Self {
            attempt_id: outcome.attempt_id.to_string(),
            event_id: outcome.committed.event_id().to_string(),
            contact_email: outcome.committed.contact_email().to_string(),
            amount_paid: outcome.committed.amount_paid().amount().to_string(),
            quote: QuoteResponse::from(&outcome.quote),
            offline: outcome.offline,
            team,
            team_name,
            participant_count,
        }
    }
}

/// Response for the capacity display.
#[derive(Debug, Clone, Serialize)]
pub struct RegistrationCountResponse {
    pub event_id: String,
    pub registered: u64,
    pub max_slots: u32,
    pub slot_label: &'static str,
    pub is_full: bool,
}

impl From<RegistrationCount> for RegistrationCountResponse {
    fn from(count: RegistrationCount) -> Self {
        Self {
            event_id: count.event_id.to_string(),
            registered: count.registered,
            max_slots: count.max_slots,
            slot_label: count.slot_label,
            is_full: count.is_full(),
        }
    }
}

/// Standard error response for API errors.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Error code for programmatic handling.
    pub error_code: String,
    /// Human-readable error message.
    pub message: String,
    /// True when the client may retry the same flow.
    pub retryable: bool,
}

impl ErrorResponse {
    pub fn new(error_code: impl Into<String>, message: impl Into<String>, retryable: bool) -> Self {
        Self {
            error_code: error_code.into(),
            message: message.into(),
            retryable,
        }
    }
}
