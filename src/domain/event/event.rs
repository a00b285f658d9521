//! Event aggregate.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::domain::foundation::{EventId, Money, Timestamp, ValidationError};

use super::{EventCategory, EventStatus};

/// Allowed team size for a group event, leader included.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamSizeBounds {
    pub min: u32,
    pub max: u32,
}

impl TeamSizeBounds {
    /// Creates bounds, enforcing `1 ≤ min ≤ max`.
    pub fn new(min: u32, max: u32) -> Result<Self, ValidationError> {
        if min == 0 {
            return Err(ValidationError::out_of_range("min_team_size", 1, max as i32, 0));
        }
        if min > max {
            return Err(ValidationError::invalid_format(
                "max_team_size",
                format!("Maximum team size {} cannot be less than minimum {}", max, min),
            ));
        }
        Ok(Self { min, max })
    }

    /// Returns true if a team of `size` people fits these bounds.
    pub fn admits(&self, size: u32) -> bool {
        self.min <= size && size <= self.max
    }
}

/// Whether a registration is for one person or a team.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum Participation {
    Individual,
    Group(TeamSizeBounds),
}

impl Participation {
    pub fn is_group(&self) -> bool {
        matches!(self, Participation::Group(_))
    }

    pub fn team_bounds(&self) -> Option<TeamSizeBounds> {
        match self {
            Participation::Individual => None,
            Participation::Group(bounds) => Some(*bounds),
        }
    }
}

/// A published club event.
///
/// `max_slots` counts individual participants, or teams for group events.
/// It is advisory: the count endpoint surfaces it to the UI, but slot
/// exhaustion never blocks a write (see DESIGN.md).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: EventId,
    pub title: String,
    pub description: String,
    pub category: EventCategory,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub location: String,
    pub base_price: Money,
    pub max_slots: u32,
    pub participation: Participation,
    pub status: EventStatus,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Event {
    /// Creates a new active event, validating catalog invariants.
    ///
    /// Price non-negativity is guaranteed by `Money`; group team-size
    /// bounds are guaranteed by `TeamSizeBounds`.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: EventId,
        title: impl Into<String>,
        description: impl Into<String>,
        category: EventCategory,
        date: NaiveDate,
        time: NaiveTime,
        location: impl Into<String>,
        base_price: Money,
        max_slots: u32,
        participation: Participation,
    ) -> Result<Self, ValidationError> {
        let title = title.into();
        let location = location.into();

        if title.trim().is_empty() {
            return Err(ValidationError::empty_field("title"));
        }
        if location.trim().is_empty() {
            return Err(ValidationError::empty_field("location"));
        }
        if max_slots == 0 {
            return Err(ValidationError::out_of_range(
                "max_slots",
                1,
                i32::MAX,
                0,
            ));
        }

        let now = Timestamp::now();
        Ok(Self {
            id,
            title,
            description: description.into(),
            category,
            date,
            time,
            location,
            base_price,
            max_slots,
            participation,
            status: EventStatus::Active,
            created_at: now,
            updated_at: now,
        })
    }

    /// Returns true if new registrations are accepted right now.
    pub fn accepts_registrations(&self) -> bool {
        self.status.accepts_registrations()
    }

    /// Label for the slot counter shown next to `max_slots`.
    pub fn slot_label(&self) -> &'static str {
        if self.participation.is_group() {
            "teams"
        } else {
            "participants"
        }
    }
}
