//! PostgreSQL implementation of EventStore.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::event::{Event, EventCategory, EventStatus, Participation, TeamSizeBounds};
use crate::domain::foundation::{DomainError, ErrorCode, EventId, Money, Timestamp};
use crate::ports::EventStore;

/// PostgreSQL implementation of the EventStore port.
pub struct PostgresEventStore {
    pool: PgPool,
}

impl PostgresEventStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Database row representation of an event.
#[derive(Debug, sqlx::FromRow)]
struct EventRow {
    id: Uuid,
    title: String,
    description: String,
    category: String,
    event_date: NaiveDate,
    event_time: NaiveTime,
    location: String,
    base_price: Decimal,
    max_slots: i32,
    participation_mode: String,
    min_team_size: Option<i32>,
    max_team_size: Option<i32>,
    status: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<EventRow> for Event {
    type Error = DomainError;

    fn try_from(row: EventRow) -> Result<Self, Self::Error> {
        let participation = match row.participation_mode.as_str() {
            "individual" => Participation::Individual,
            "group" => {
                let min = row.min_team_size.unwrap_or(1) as u32;
                let max = row.max_team_size.unwrap_or(min as i32) as u32;
                Participation::Group(TeamSizeBounds::new(min, max).map_err(|e| {
                    DomainError::new(
                        ErrorCode::DatabaseError,
                        format!("Invalid team bounds on event {}: {}", row.id, e),
                    )
                })?)
            }
            other => {
                return Err(DomainError::new(
                    ErrorCode::DatabaseError,
                    format!("Invalid participation mode: {}", other),
                ))
            }
        };

        Ok(Event {
            id: EventId::from_uuid(row.id),
            title: row.title,
            description: row.description,
            category: parse_category(&row.category)?,
            date: row.event_date,
            time: row.event_time,
            location: row.location,
            base_price: Money::new(row.base_price).map_err(|e| {
                DomainError::new(
                    ErrorCode::DatabaseError,
                    format!("Invalid base price on event {}: {}", row.id, e),
                )
            })?,
            max_slots: row.max_slots as u32,
            participation,
            status: parse_status(&row.status)?,
            created_at: Timestamp::from_datetime(row.created_at),
            updated_at: Timestamp::from_datetime(row.updated_at),
        })
    }
}

fn parse_category(s: &str) -> Result<EventCategory, DomainError> {
    match s {
        "workshop" => Ok(EventCategory::Workshop),
        "competition" => Ok(EventCategory::Competition),
        "meetup" => Ok(EventCategory::Meetup),
        "seminar" => Ok(EventCategory::Seminar),
        _ => Err(DomainError::new(
            ErrorCode::DatabaseError,
            format!("Invalid category value: {}", s),
        )),
    }
}

fn parse_status(s: &str) -> Result<EventStatus, DomainError> {
    match s {
        "active" => Ok(EventStatus::Active),
        "closed" => Ok(EventStatus::Closed),
        "cancelled" => Ok(EventStatus::Cancelled),
        "completed" => Ok(EventStatus::Completed),
        _ => Err(DomainError::new(
            ErrorCode::DatabaseError,
            format!("Invalid status value: {}", s),
        )),
    }
}

fn category_to_string(category: &EventCategory) -> &'static str {
    match category {
        EventCategory::Workshop => "workshop",
        EventCategory::Competition => "competition",
        EventCategory::Meetup => "meetup",
        EventCategory::Seminar => "seminar",
    }
}

fn participation_columns(participation: &Participation) -> (&'static str, Option<i32>, Option<i32>) {
    match participation {
        Participation::Individual => ("individual", None, None),
        Participation::Group(bounds) => {
            ("group", Some(bounds.min as i32), Some(bounds.max as i32))
        }
    }
}

const SELECT_EVENT: &str = r#"
    SELECT id, title, description, category, event_date, event_time, location,
           base_price, max_slots, participation_mode, min_team_size, max_team_size,
           status, created_at, updated_at
    FROM events
"#;

#[async_trait]
impl EventStore for PostgresEventStore {
    async fn list(&self) -> Result<Vec<Event>, DomainError> {
        let rows: Vec<EventRow> =
            sqlx::query_as(&format!("{} ORDER BY event_date ASC, event_time ASC", SELECT_EVENT))
                .fetch_all(&self.pool)
                .await
                .map_err(|e| {
                    DomainError::new(
                        ErrorCode::DatabaseError,
                        format!("Failed to list events: {}", e),
                    )
                })?;

        rows.into_iter().map(Event::try_from).collect()
    }

    async fn find(&self, id: EventId) -> Result<Option<Event>, DomainError> {
        let row: Option<EventRow> = sqlx::query_as(&format!("{} WHERE id = $1", SELECT_EVENT))
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                DomainError::new(
                    ErrorCode::DatabaseError,
                    format!("Failed to find event: {}", e),
                )
            })?;

        row.map(Event::try_from).transpose()
    }

    async fn insert(&self, event: &Event) -> Result<(), DomainError> {
        let (mode, min_size, max_size) = participation_columns(&event.participation);

        sqlx::query(
            r#"
            INSERT INTO events (
                id, title, description, category, event_date, event_time, location,
                base_price, max_slots, participation_mode, min_team_size, max_team_size,
                status, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
            "#,
        )
        .bind(event.id.as_uuid())
        .bind(&event.title)
        .bind(&event.description)
        .bind(category_to_string(&event.category))
        .bind(event.date)
        .bind(event.time)
        .bind(&event.location)
        .bind(event.base_price.amount())
        .bind(event.max_slots as i32)
        .bind(mode)
        .bind(min_size)
        .bind(max_size)
        .bind(event.status.to_string())
        .bind(event.created_at.as_datetime())
        .bind(event.updated_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to insert event: {}", e),
            )
        })?;

        Ok(())
    }

    async fn update(&self, event: &Event) -> Result<(), DomainError> {
        let (mode, min_size, max_size) = participation_columns(&event.participation);

        let result = sqlx::query(
            r#"
            UPDATE events SET
                title = $2,
                description = $3,
                category = $4,
                event_date = $5,
                event_time = $6,
                location = $7,
                base_price = $8,
                max_slots = $9,
                participation_mode = $10,
                min_team_size = $11,
                max_team_size = $12,
                status = $13,
                updated_at = $14
            WHERE id = $1
            "#,
        )
        .bind(event.id.as_uuid())
        .bind(&event.title)
        .bind(&event.description)
        .bind(category_to_string(&event.category))
        .bind(event.date)
        .bind(event.time)
        .bind(&event.location)
        .bind(event.base_price.amount())
        .bind(event.max_slots as i32)
        .bind(mode)
        .bind(min_size)
        .bind(max_size)
        .bind(event.status.to_string())
        .bind(event.updated_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to update event: {}", e),
            )
        })?;

        if result.rows_affected() == 0 {
            return Err(DomainError::new(ErrorCode::EventNotFound, "Event not found"));
        }

        Ok(())
    }

    async fn delete(&self, id: EventId) -> Result<(), DomainError> {
        let result = sqlx::query("DELETE FROM events WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(|e| {
                DomainError::new(
                    ErrorCode::DatabaseError,
                    format!("Failed to delete event: {}", e),
                )
            })?;

        if result.rows_affected() == 0 {
            return Err(DomainError::new(ErrorCode::EventNotFound, "Event not found"));
        }

        Ok(())
    }
}
