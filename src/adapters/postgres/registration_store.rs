//! PostgreSQL implementation of RegistrationStore.
//!
//! Owns the authoritative duplicate rejection: a unique index on
//! (event_id, lower(email)) turns racing inserts for the same identity
//! into exactly one winner.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::domain::event::Event;
use crate::domain::foundation::{
    DomainError, ErrorCode, EventId, Money, RegistrationId, RoleTier, TeamRegistrationId,
    Timestamp,
};
use crate::domain::registration::{Participant, PaymentStatus, RegistrationRecord};
use crate::ports::{RegistrationStore, RegistrationStoreError};

const UNIQUE_EMAIL_INDEX: &str = "registrations_event_email_unique";

/// PostgreSQL implementation of the RegistrationStore port.
pub struct PostgresRegistrationStore {
    pool: PgPool,
}

impl PostgresRegistrationStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn insert_row(
        tx: &mut Transaction<'_, Postgres>,
        row: &RegistrationRecord,
    ) -> Result<(), RegistrationStoreError> {
        sqlx::query(
            r#"
            INSERT INTO registrations (
                id, event_id, name, email, phone, student_id,
                year, department, dietary_restrictions, emergency_contact, emergency_phone,
                role, payment_status, amount_paid, payment_id, order_id,
                team_registration_id, team_name, is_team_leader, created_at
            ) VALUES (
                $1, $2, $3, $4, $5, $6, $7, $8, $9, $10,
                $11, $12, $13, $14, $15, $16, $17, $18, $19, $20
            )
            "#,
        )
        .bind(row.id.as_uuid())
        .bind(row.event_id.as_uuid())
        .bind(&row.participant.name)
        .bind(&row.participant.email)
        .bind(&row.participant.phone)
        .bind(&row.participant.student_id)
        .bind(&row.participant.year)
        .bind(&row.participant.department)
        .bind(&row.participant.dietary_restrictions)
        .bind(&row.participant.emergency_contact)
        .bind(&row.participant.emergency_phone)
        .bind(role_to_string(&row.role))
        .bind(payment_status_to_string(&row.payment_status))
        .bind(row.amount_paid.amount())
        .bind(&row.payment_id)
        .bind(&row.order_id)
        .bind(row.team_registration_id.map(|t| *t.as_uuid()))
        .bind(&row.team_name)
        .bind(row.is_team_leader)
        .bind(row.created_at.as_datetime())
        .execute(&mut **tx)
        .await
        .map_err(|e| map_insert_error(e, &row.participant.email))?;

        Ok(())
    }
}

fn map_insert_error(err: sqlx::Error, email: &str) -> RegistrationStoreError {
    if let sqlx::Error::Database(db_err) = &err {
        let unique_hit = db_err.constraint() == Some(UNIQUE_EMAIL_INDEX)
            || db_err.code().as_deref() == Some("23505");
        if unique_hit {
            return RegistrationStoreError::Duplicate {
                email: email.to_string(),
            };
        }
    }
    RegistrationStoreError::Storage(DomainError::new(
        ErrorCode::DatabaseError,
        format!("Failed to insert registration: {}", err),
    ))
}

/// Database row representation of a registration.
#[derive(Debug, sqlx::FromRow)]
struct RegistrationRow {
    id: Uuid,
    event_id: Uuid,
    name: String,
    email: String,
    phone: String,
    student_id: String,
    year: Option<String>,
    department: Option<String>,
    dietary_restrictions: Option<String>,
    emergency_contact: Option<String>,
    emergency_phone: Option<String>,
    role: String,
    payment_status: String,
    amount_paid: Decimal,
    payment_id: Option<String>,
    order_id: Option<String>,
    team_registration_id: Option<Uuid>,
    team_name: Option<String>,
    is_team_leader: bool,
    created_at: DateTime<Utc>,
}

impl TryFrom<RegistrationRow> for RegistrationRecord {
    type Error = DomainError;

    fn try_from(row: RegistrationRow) -> Result<Self, Self::Error> {
        Ok(RegistrationRecord {
            id: RegistrationId::from_uuid(row.id),
            event_id: EventId::from_uuid(row.event_id),
            participant: Participant {
                name: row.name,
                email: row.email,
                phone: row.phone,
                student_id: row.student_id,
                year: row.year,
                department: row.department,
                dietary_restrictions: row.dietary_restrictions,
                emergency_contact: row.emergency_contact,
                emergency_phone: row.emergency_phone,
            },
            role: parse_role(&row.role)?,
            payment_status: parse_payment_status(&row.payment_status)?,
            amount_paid: Money::new(row.amount_paid).map_err(|e| {
                DomainError::new(
                    ErrorCode::DatabaseError,
                    format!("Invalid amount on registration {}: {}", row.id, e),
                )
            })?,
            payment_id: row.payment_id,
            order_id: row.order_id,
            team_registration_id: row.team_registration_id.map(TeamRegistrationId::from_uuid),
            team_name: row.team_name,
            is_team_leader: row.is_team_leader,
            created_at: Timestamp::from_datetime(row.created_at),
        })
    }
}

fn parse_role(s: &str) -> Result<RoleTier, DomainError> {
    match s {
        "guest" => Ok(RoleTier::Guest),
        "regular_member" => Ok(RoleTier::RegularMember),
        "executive_member" => Ok(RoleTier::ExecutiveMember),
        _ => Err(DomainError::new(
            ErrorCode::DatabaseError,
            format!("Invalid role value: {}", s),
        )),
    }
}

fn role_to_string(role: &RoleTier) -> &'static str {
    match role {
        RoleTier::Guest => "guest",
        RoleTier::RegularMember => "regular_member",
        RoleTier::ExecutiveMember => "executive_member",
    }
}

fn parse_payment_status(s: &str) -> Result<PaymentStatus, DomainError> {
    match s {
        "pending" => Ok(PaymentStatus::Pending),
        "completed" => Ok(PaymentStatus::Completed),
        _ => Err(DomainError::new(
            ErrorCode::DatabaseError,
            format!("Invalid payment status value: {}", s),
        )),
    }
}

fn payment_status_to_string(status: &PaymentStatus) -> &'static str {
    match status {
        PaymentStatus::Pending => "pending",
        PaymentStatus::Completed => "completed",
    }
}

#[async_trait]
impl RegistrationStore for PostgresRegistrationStore {
    async fn insert(&self, row: &RegistrationRecord) -> Result<(), RegistrationStoreError> {
        let mut tx = self.pool.begin().await.map_err(begin_error)?;
        Self::insert_row(&mut tx, row).await?;
        tx.commit().await.map_err(commit_error)?;
        Ok(())
    }

    async fn insert_team(
        &self,
        rows: &[RegistrationRecord],
    ) -> Result<(), RegistrationStoreError> {
        let mut tx = self.pool.begin().await.map_err(begin_error)?;
        for row in rows {
            // Any failure drops the transaction, rolling back every row.
            Self::insert_row(&mut tx, row).await?;
        }
        tx.commit().await.map_err(commit_error)?;
        Ok(())
    }

    async fn find(
        &self,
        event_id: EventId,
        email: &str,
    ) -> Result<Option<RegistrationRecord>, DomainError> {
        let row: Option<RegistrationRow> = sqlx::query_as(
            r#"
            SELECT id, event_id, name, email, phone, student_id,
                   year, department, dietary_restrictions, emergency_contact, emergency_phone,
                   role, payment_status, amount_paid, payment_id, order_id,
                   team_registration_id, team_name, is_team_leader, created_at
            FROM registrations
            WHERE event_id = $1 AND lower(email) = lower($2)
            "#,
        )
        .bind(event_id.as_uuid())
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to find registration: {}", e),
            )
        })?;

        row.map(RegistrationRecord::try_from).transpose()
    }

    async fn count_completed(&self, event: &Event) -> Result<u64, DomainError> {
        let count: i64 = if event.participation.is_group() {
            sqlx::query_scalar(
                r#"
                SELECT COUNT(DISTINCT team_registration_id)
                FROM registrations
                WHERE event_id = $1 AND payment_status = 'completed'
                "#,
            )
            .bind(event.id.as_uuid())
            .fetch_one(&self.pool)
            .await
        } else {
            sqlx::query_scalar(
                r#"
                SELECT COUNT(*)
                FROM registrations
                WHERE event_id = $1 AND payment_status = 'completed'
                "#,
            )
            .bind(event.id.as_uuid())
            .fetch_one(&self.pool)
            .await
        }
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to count registrations: {}", e),
            )
        })?;

        Ok(count.max(0) as u64)
    }
}

fn begin_error(err: sqlx::Error) -> RegistrationStoreError {
    RegistrationStoreError::Storage(DomainError::new(
        ErrorCode::DatabaseError,
        format!("Failed to begin transaction: {}", err),
    ))
}

fn commit_error(err: sqlx::Error) -> RegistrationStoreError {
    RegistrationStoreError::Storage(DomainError::new(
        ErrorCode::DatabaseError,
        format!("Failed to commit transaction: {}", err),
    ))
}
