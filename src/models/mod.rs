// file: src/models/mod.rs

pub mod event;
pub mod schedule;
pub mod settings;

// Flattened so callers can write `lookaway::Settings` or `crate::models::Phase`.
pub use event::{Delivery, FocusRequest, Phase, SchedulerEvent};
pub use schedule::WeeklySchedule;
pub use settings::{Setting, Settings, Theme, DEFAULT_BREAK_MESSAGE};
