//! HTTP handlers for the events and registrations API.
//!
//! These connect axum routes to the application layer handlers.

use std::sync::Arc;

use axum::async_trait;
use axum::extract::{Json, Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;

use crate::application::handlers::event::{
    CreateEventCommand, CreateEventHandler, DeleteEventCommand, DeleteEventHandler,
    EventCommandError, EventEdits, TransitionEventCommand, TransitionEventHandler,
    UpdateEventCommand, UpdateEventHandler,
};
use crate::application::handlers::registration::{
    CaptureCallback, DuplicateGuard, GetRegistrationCountHandler, GetRegistrationCountQuery,
    PaymentOrchestrator, RegisterForEventCommand, RegisterForEventHandler, RegistrationWriter,
};
use crate::domain::event::{Participation, TeamSizeBounds};
use crate::domain::foundation::{AttemptId, ErrorCode, EventId, Money};
use crate::domain::registration::{RegistrationAttempt, RegistrationError, RegistrationValidator};
use crate::ports::{
    CapturedPayment, EventStore, IdentityClaims, IdentityProvider, PaymentGateway,
    RegistrationNotifier, RegistrationStore, UserProfile,
};

use super::dto::{
    CompleteRegistrationRequest, CreateEventRequest, ErrorResponse, EventListResponse,
    EventResponse, OutcomeResponse, ParticipationRequest, RegistrationCountResponse,
    StartRegistrationRequest, StartRegistrationResponse, TransitionEventRequest,
    UpdateEventRequest,
};

// ════════════════════════════════════════════════════════════════════════════════
// Application State
// ════════════════════════════════════════════════════════════════════════════════

/// Shared application state containing all dependencies.
///
/// Cloned per request; everything inside is Arc-wrapped. The
/// registration flow handler is shared rather than built per request
/// because it holds the pending capture attempts.
#[derive(Clone)]
pub struct AppState {
    pub events: Arc<dyn EventStore>,
    pub registrations: Arc<dyn RegistrationStore>,
    pub identity: Arc<dyn IdentityProvider>,
    register: Arc<RegisterForEventHandler>,
}

impl AppState {
    pub fn new(
        events: Arc<dyn EventStore>,
        registrations: Arc<dyn RegistrationStore>,
        identity: Arc<dyn IdentityProvider>,
        gateway: Arc<dyn PaymentGateway>,
        notifier: Arc<dyn RegistrationNotifier>,
        currency: impl Into<String>,
        capture_timeout_secs: i64,
    ) -> Self {
        let register = Arc::new(RegisterForEventHandler::new(
            events.clone(),
            RegistrationValidator::default(),
            DuplicateGuard::new(registrations.clone()),
            PaymentOrchestrator::new(gateway, currency),
            RegistrationWriter::new(events.clone(), registrations.clone()),
            notifier,
            capture_timeout_secs,
        ));
        Self {
            events,
            registrations,
            identity,
            register,
        }
    }

    fn create_event_handler(&self) -> CreateEventHandler {
        CreateEventHandler::new(self.events.clone())
    }

    fn update_event_handler(&self) -> UpdateEventHandler {
        UpdateEventHandler::new(self.events.clone())
    }

    fn transition_event_handler(&self) -> TransitionEventHandler {
        TransitionEventHandler::new(self.events.clone())
    }

    fn delete_event_handler(&self) -> DeleteEventHandler {
        DeleteEventHandler::new(self.events.clone())
    }

    fn count_handler(&self) -> GetRegistrationCountHandler {
        GetRegistrationCountHandler::new(self.events.clone(), self.registrations.clone())
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Identity Extraction
// ════════════════════════════════════════════════════════════════════════════════

/// Identity claims forwarded by the SSO proxy.
///
/// Extraction never fails: requests without claims are guests.
pub struct ForwardedClaims(pub IdentityClaims);

#[async_trait]
impl<S> axum::extract::FromRequestParts<S> for ForwardedClaims
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(
        parts: &mut axum::http::request::Parts,
        _state: &S,
    ) -> Result<Self, Self::Rejection> {
        let header = |name: &str| {
            parts
                .headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(|s| s.to_string())
        };
        Ok(ForwardedClaims(IdentityClaims {
            role: header("x-member-role"),
            name: header("x-member-name"),
            email: header("x-member-email"),
        }))
    }
}

async fn resolve_actor(state: &AppState, claims: ForwardedClaims) -> Result<UserProfile, ApiError> {
    state
        .identity
        .resolve(claims.0)
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))
}

// ════════════════════════════════════════════════════════════════════════════════
// Event Endpoints
// ════════════════════════════════════════════════════════════════════════════════

/// GET /api/events - List the catalog, soonest first.
pub async fn list_events(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let events = state
        .events
        .list()
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))?;

    Ok(Json(EventListResponse {
        events: events.into_iter().map(EventResponse::from).collect(),
    }))
}

/// GET /api/events/:id - Event details.
pub async fn get_event(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let event_id = parse_event_id(&id)?;
    let event = state
        .events
        .find(event_id)
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))?
        .ok_or(ApiError::NotFound("Event not found"))?;

    Ok(Json(EventResponse::from(event)))
}

/// POST /api/events - Publish a new event (executive only).
pub async fn create_event(
    State(state): State<AppState>,
    claims: ForwardedClaims,
    Json(request): Json<CreateEventRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let actor = resolve_actor(&state, claims).await?;

    let event = state
        .create_event_handler()
        .handle(CreateEventCommand {
            actor,
            title: request.title,
            description: request.description,
            category: request.category,
            date: request.date,
            time: request.time,
            location: request.location,
            base_price: parse_price(request.base_price)?,
            max_slots: request.max_slots,
            participation: parse_participation(&request.participation)?,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(EventResponse::from(event))))
}

/// PUT /api/events/:id - Edit an event (executive only).
pub async fn update_event(
    State(state): State<AppState>,
    claims: ForwardedClaims,
    Path(id): Path<String>,
    Json(request): Json<UpdateEventRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let actor = resolve_actor(&state, claims).await?;
    let event_id = parse_event_id(&id)?;

    let edits = EventEdits {
        title: request.title,
        description: request.description,
        category: request.category,
        date: request.date,
        time: request.time,
        location: request.location,
        base_price: request.base_price.map(parse_price).transpose()?,
        max_slots: request.max_slots,
        participation: request
            .participation
            .as_ref()
            .map(parse_participation)
            .transpose()?,
    };

    let event = state
        .update_event_handler()
        .handle(UpdateEventCommand {
            actor,
            event_id,
            edits,
        })
        .await?;

    Ok(Json(EventResponse::from(event)))
}

/// POST /api/events/:id/transition - Lifecycle transition (executive only).
pub async fn transition_event(
    State(state): State<AppState>,
    claims: ForwardedClaims,
    Path(id): Path<String>,
    Json(request): Json<TransitionEventRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let actor = resolve_actor(&state, claims).await?;
    let event_id = parse_event_id(&id)?;

    let event = state
        .transition_event_handler()
        .handle(TransitionEventCommand {
            actor,
            event_id,
            target: request.target,
        })
        .await?;

    Ok(Json(EventResponse::from(event)))
}

/// DELETE /api/events/:id - Remove an event (executive only).
pub async fn delete_event(
    State(state): State<AppState>,
    claims: ForwardedClaims,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let actor = resolve_actor(&state, claims).await?;
    let event_id = parse_event_id(&id)?;

    state
        .delete_event_handler()
        .handle(DeleteEventCommand { actor, event_id })
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

// ════════════════════════════════════════════════════════════════════════════════
// Registration Endpoints
// ════════════════════════════════════════════════════════════════════════════════

/// GET /api/events/:id/registrations/count - Capacity display.
pub async fn get_registration_count(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let event_id = parse_event_id(&id)?;

    let count = state
        .count_handler()
        .handle(GetRegistrationCountQuery { event_id })
        .await?;

    Ok(Json(RegistrationCountResponse::from(count)))
}

/// POST /api/events/:id/registrations - Start a registration attempt.
pub async fn start_registration(
    State(state): State<AppState>,
    claims: ForwardedClaims,
    Path(id): Path<String>,
    Json(request): Json<StartRegistrationRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let actor = resolve_actor(&state, claims).await?;
    let event_id = parse_event_id(&id)?;

    let started = state
        .register
        .start(RegisterForEventCommand {
            attempt: RegistrationAttempt {
                event_id,
                role: actor.role,
                details: request.details,
            },
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(StartRegistrationResponse::from(started)),
    ))
}

/// POST /api/registrations/:attempt_id/complete - Capture callback.
pub async fn complete_registration(
    State(state): State<AppState>,
    Path(attempt_id): Path<String>,
    Json(request): Json<CompleteRegistrationRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let attempt_id: AttemptId = attempt_id
        .parse()
        .map_err(|_| ApiError::BadRequest("Invalid attempt id".to_string()))?;

    let callback = match request {
        CompleteRegistrationRequest::Success {
            payment_id,
            order_id,
            signature,
        } => CaptureCallback::Success(CapturedPayment {
            payment_id,
            order_id,
            signature,
        }),
        CompleteRegistrationRequest::Failure { reason } => CaptureCallback::Failure { reason },
        CompleteRegistrationRequest::Cancelled => CaptureCallback::Cancelled,
    };

    let outcome = state.register.complete(attempt_id, callback).await?;

    Ok(Json(OutcomeResponse::from(outcome)))
}

// ════════════════════════════════════════════════════════════════════════════════
// Request Parsing
// ════════════════════════════════════════════════════════════════════════════════

fn parse_event_id(id: &str) -> Result<EventId, ApiError> {
    id.parse()
        .map_err(|_| ApiError::BadRequest("Invalid event id".to_string()))
}

fn parse_price(value: rust_decimal::Decimal) -> Result<Money, ApiError> {
    Money::new(value).map_err(|e| ApiError::BadRequest(e.to_string()))
}

fn parse_participation(request: &ParticipationRequest) -> Result<Participation, ApiError> {
    match request.mode.as_str() {
        "individual" => Ok(Participation::Individual),
        "group" => {
            let min = request.min_team_size.unwrap_or(1);
            let max = request.max_team_size.unwrap_or(min);
            let bounds =
                TeamSizeBounds::new(min, max).map_err(|e| ApiError::BadRequest(e.to_string()))?;
            Ok(Participation::Group(bounds))
        }
        other => Err(ApiError::BadRequest(format!(
            "Unknown participation mode: {}",
            other
        ))),
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Error Mapping
// ════════════════════════════════════════════════════════════════════════════════

/// API-level error wrapper for everything a handler can fail with.
#[derive(Debug)]
pub enum ApiError {
    Event(EventCommandError),
    Registration(RegistrationError),
    BadRequest(String),
    NotFound(&'static str),
    Internal(String),
}

impl From<EventCommandError> for ApiError {
    fn from(err: EventCommandError) -> Self {
        ApiError::Event(err)
    }
}

impl From<RegistrationError> for ApiError {
    fn from(err: RegistrationError) -> Self {
        ApiError::Registration(err)
    }
}

fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::ValidationFailed
        | ErrorCode::InvalidPrice
        | ErrorCode::InvalidTeamSize
        | ErrorCode::DuplicateTeamEmail
        | ErrorCode::MissingField => StatusCode::BAD_REQUEST,
        ErrorCode::EventNotFound | ErrorCode::RegistrationNotFound => StatusCode::NOT_FOUND,
        ErrorCode::EventClosed
        | ErrorCode::AlreadyRegistered
        | ErrorCode::InvalidStateTransition => StatusCode::CONFLICT,
        ErrorCode::Forbidden => StatusCode::FORBIDDEN,
        ErrorCode::PaymentFailed | ErrorCode::PaymentCancelled => StatusCode::PAYMENT_REQUIRED,
        ErrorCode::ReconciliationRequired
        | ErrorCode::DatabaseError
        | ErrorCode::GatewayError
        | ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let (status, body) = match self {
            ApiError::Event(err) => (
                status_for(err.code()),
                ErrorResponse::new(err.code().to_string(), err.to_string(), false),
            ),
            ApiError::Registration(err) => (
                status_for(err.code()),
                ErrorResponse::new(err.code().to_string(), err.to_string(), err.is_retryable()),
            ),
            ApiError::BadRequest(message) => (
                StatusCode::BAD_REQUEST,
                ErrorResponse::new(ErrorCode::ValidationFailed.to_string(), message, false),
            ),
            ApiError::NotFound(message) => (
                StatusCode::NOT_FOUND,
                ErrorResponse::new(ErrorCode::EventNotFound.to_string(), message, false),
            ),
            ApiError::Internal(message) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorResponse::new(ErrorCode::InternalError.to_string(), message, false),
            ),
        };
        (status, Json(body)).into_response()
    }
}
