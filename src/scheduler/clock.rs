use chrono::{Datelike, Local, Weekday};
use std::sync::{Arc, Mutex, PoisonError};

/// Source of the current weekday for schedule checks.
pub trait Clock: Send {
    fn weekday(&self) -> Weekday;
}

/// Local wall-clock day of week.
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalClock;

impl Clock for LocalClock {
    fn weekday(&self) -> Weekday {
        Local::now().weekday()
    }
}

/// Weekday that only changes when told to. Clones share the same day.
/// Meant for tests and simulations.
#[doc(hidden)]
#[derive(Debug, Clone)]
pub struct FixedClock {
    day: Arc<Mutex<Weekday>>,
}

impl FixedClock {
    pub fn new(day: Weekday) -> Self {
        Self {
            day: Arc::new(Mutex::new(day)),
        }
    }

    pub fn set(&self, day: Weekday) {
        let mut guard = self.day.lock().unwrap_or_else(PoisonError::into_inner);
        *guard = day;
    }
}

impl Clock for FixedClock {
    fn weekday(&self) -> Weekday {
        *self.day.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
