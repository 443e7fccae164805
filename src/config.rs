//! Configuration validation module
//!
//! Range checks for user-supplied settings and the location of the
//! settings database. The scheduler itself trusts whatever it is given;
//! validation happens where settings enter the process.

use crate::error::{AppError, AppResult};
use crate::models::Settings;
use log::info;
use std::collections::HashSet;
use std::env;
use std::ops::RangeInclusive;
use std::path::PathBuf;

pub const WORK_INTERVAL_RANGE: RangeInclusive<u64> = 60..=120 * 60;
pub const BREAK_DURATION_RANGE: RangeInclusive<u64> = 10..=300;
pub const FOCUS_DURATION_RANGE: RangeInclusive<u64> = 15 * 60..=180 * 60;
pub const FOCUS_COOLDOWN_MINUTES_RANGE: RangeInclusive<u32> = 5..=120;

/// Overrides the database location, mainly for tests and portable installs.
pub const DB_PATH_ENV: &str = "LOOKAWAY_DB_PATH";

/// Validates settings coming from the user before they reach the scheduler
///
/// # Returns
///
/// * `Ok(())` - every value is inside its allowed range
/// * `Err(AppError::InvalidInput)` - naming the first offending field
///
pub fn validate_settings(settings: &Settings) -> AppResult<()> {
    check_range("work interval", settings.work_interval, &WORK_INTERVAL_RANGE)?;
    check_range("break duration", settings.break_duration, &BREAK_DURATION_RANGE)?;
    check_range("focus duration", settings.focus_duration, &FOCUS_DURATION_RANGE)?;

    if settings.focus_cooldown_enabled
        && !FOCUS_COOLDOWN_MINUTES_RANGE.contains(&settings.focus_cooldown_minutes)
    {
        return Err(AppError::invalid_input(format!(
            "focus cooldown must be between {} and {} minutes, got {}",
            FOCUS_COOLDOWN_MINUTES_RANGE.start(),
            FOCUS_COOLDOWN_MINUTES_RANGE.end(),
            settings.focus_cooldown_minutes
        )));
    }

    let mut seen = HashSet::new();
    for minutes in &settings.notification_timing {
        if *minutes == 0 {
            return Err(AppError::invalid_input("notification timing must be positive"));
        }
        if !seen.insert(*minutes) {
            return Err(AppError::invalid_input(format!(
                "notification timing {} listed twice",
                minutes
            )));
        }
    }

    if settings.break_message.trim().is_empty() {
        return Err(AppError::invalid_input("break message must not be empty"));
    }

    Ok(())
}

fn check_range(name: &str, value: u64, range: &RangeInclusive<u64>) -> AppResult<()> {
    if range.contains(&value) {
        Ok(())
    } else {
        Err(AppError::invalid_input(format!(
            "{} must be between {}s and {}s, got {}s",
            name,
            range.start(),
            range.end(),
            value
        )))
    }
}

/// Resolves where the settings database lives.
pub fn database_path() -> AppResult<PathBuf> {
    if let Ok(path) = env::var(DB_PATH_ENV) {
        if !path.trim().is_empty() {
            info!("Using database path from {}", DB_PATH_ENV);
            return Ok(PathBuf::from(path));
        }
    }

    let data_dir = dirs::data_dir()
        .ok_or_else(|| AppError::config("no user data directory available"))?;
    Ok(data_dir.join("lookaway").join("lookaway.db"))
}
