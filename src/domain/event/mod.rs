//! Event domain - the published catalog entry and its lifecycle.

mod category;
mod event;
mod status;

pub use category::EventCategory;
pub use event::{Event, Participation, TeamSizeBounds};
pub use status::EventStatus;
