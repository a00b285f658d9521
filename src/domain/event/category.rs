//! Event category.

use serde::{Deserialize, Serialize};

/// Kind of event shown in the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventCategory {
    Workshop,
    Competition,
    Meetup,
    Seminar,
}

impl EventCategory {
    pub fn display_name(&self) -> &'static str {
        match self {
            EventCategory::Workshop => "Workshop",
            EventCategory::Competition => "Competition",
            EventCategory::Meetup => "Meetup",
            EventCategory::Seminar => "Seminar",
        }
    }
}

impl std::fmt::Display for EventCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}
