// lookaway library
// Eye-break scheduling core, persistence and the real-time driver

pub mod config;
pub mod database;
pub mod error;
pub mod messages;
pub mod models;
pub mod monitor;
pub mod notifications;
pub mod scheduler;
pub mod utils;

// Re-export commonly used types
pub use database::{Database, MemoryStore, PrefKey, SettingsStore, SqliteStore};
pub use error::{AppError, AppResult};
pub use messages::Command;
pub use models::*;
pub use monitor::run_scheduler;
pub use notifications::{DesktopNotifier, NotificationSink};
pub use scheduler::{BreakScheduler, Clock, LocalClock};
#[doc(hidden)]
pub use scheduler::FixedClock;
