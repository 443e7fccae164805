// file: src/database/settings.rs
use super::store::{PrefKey, SettingsStore};
use crate::models::{Setting, Settings, Theme, WeeklySchedule};
use anyhow::Result;
use log::warn;
use sqlx::SqlitePool;

pub async fn load_all(pool: &SqlitePool) -> Result<Vec<Setting>> {
    let settings = sqlx::query_as::<_, Setting>("SELECT key, value FROM settings")
        .fetch_all(pool)
        .await?;
    Ok(settings)
}

pub async fn upsert(pool: &SqlitePool, key: &str, value: &str) -> Result<()> {
    sqlx::query(
        "INSERT INTO settings (key, value, updated_at) VALUES (?, ?, CURRENT_TIMESTAMP)
         ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = CURRENT_TIMESTAMP",
    )
    .bind(key)
    .bind(value)
    .execute(pool)
    .await?;
    Ok(())
}

/// Reads the scheduler settings, keeping defaults for anything missing or
/// unreadable. Durations only apply when positive and the timing list only
/// when non-empty.
pub fn load_settings(store: &dyn SettingsStore) -> Settings {
    let mut settings = Settings::default();

    if let Some(secs) = parse_seconds(store, PrefKey::WorkInterval) {
        settings.work_interval = secs;
    }
    if let Some(secs) = parse_seconds(store, PrefKey::BreakDuration) {
        settings.break_duration = secs;
    }
    if let Some(secs) = parse_seconds(store, PrefKey::FocusDuration) {
        settings.focus_duration = secs;
    }
    if let Some(message) = store.get(PrefKey::BreakMessage) {
        settings.break_message = message;
    }
    if let Some(enabled) = parse_bool(store, PrefKey::NotificationsEnabled) {
        settings.notifications_enabled = enabled;
    }
    if let Some(enabled) = parse_bool(store, PrefKey::UseSystemNotifications) {
        settings.use_system_notifications = enabled;
    }
    if let Some(raw) = store.get(PrefKey::NotificationTiming) {
        match serde_json::from_str::<Vec<u32>>(&raw) {
            Ok(timing) if !timing.is_empty() => settings.notification_timing = timing,
            Ok(_) => {}
            Err(e) => warn!("Ignoring unreadable notificationTiming '{}': {}", raw, e),
        }
    }
    if let Some(raw) = store.get(PrefKey::CurrentTheme) {
        match Theme::parse(&raw) {
            Some(theme) => settings.theme = theme,
            None => warn!("Ignoring unknown theme '{}'", raw),
        }
    }
    if let Some(enabled) = parse_bool(store, PrefKey::FocusCooldownEnabled) {
        settings.focus_cooldown_enabled = enabled;
    }
    if let Some(raw) = store.get(PrefKey::FocusCooldownMinutes) {
        // Older builds stored the slider value as a float.
        match raw.parse::<f64>() {
            Ok(minutes) if minutes > 0.0 => settings.focus_cooldown_minutes = minutes as u32,
            _ => warn!("Ignoring invalid focusCooldownMinutes '{}'", raw),
        }
    }

    settings.normalize_timing();
    settings
}

pub fn load_schedule(store: &dyn SettingsStore) -> WeeklySchedule {
    let mut schedule = WeeklySchedule::default();
    let flag = |key: PrefKey, current: bool| parse_bool(store, key).unwrap_or(current);

    schedule.enabled = flag(PrefKey::ScheduleEnabled, schedule.enabled);
    schedule.monday = flag(PrefKey::MondayEnabled, schedule.monday);
    schedule.tuesday = flag(PrefKey::TuesdayEnabled, schedule.tuesday);
    schedule.wednesday = flag(PrefKey::WednesdayEnabled, schedule.wednesday);
    schedule.thursday = flag(PrefKey::ThursdayEnabled, schedule.thursday);
    schedule.friday = flag(PrefKey::FridayEnabled, schedule.friday);
    schedule.saturday = flag(PrefKey::SaturdayEnabled, schedule.saturday);
    schedule.sunday = flag(PrefKey::SundayEnabled, schedule.sunday);
    schedule
}

pub fn save_settings(store: &mut dyn SettingsStore, settings: &Settings) {
    let timing = serde_json::to_string(&settings.notification_timing)
        .unwrap_or_else(|_| "[]".to_string());

    let updates = vec![
        (PrefKey::WorkInterval, settings.work_interval.to_string()),
        (PrefKey::BreakDuration, settings.break_duration.to_string()),
        (PrefKey::FocusDuration, settings.focus_duration.to_string()),
        (PrefKey::BreakMessage, settings.break_message.clone()),
        (PrefKey::NotificationsEnabled, settings.notifications_enabled.to_string()),
        (PrefKey::UseSystemNotifications, settings.use_system_notifications.to_string()),
        (PrefKey::NotificationTiming, timing),
        (PrefKey::CurrentTheme, settings.theme.as_str().to_string()),
        (PrefKey::FocusCooldownEnabled, settings.focus_cooldown_enabled.to_string()),
        (PrefKey::FocusCooldownMinutes, settings.focus_cooldown_minutes.to_string()),
    ];

    for (key, value) in updates {
        store.set(key, value);
    }
}

pub fn save_schedule(store: &mut dyn SettingsStore, schedule: &WeeklySchedule) {
    let updates = [
        (PrefKey::ScheduleEnabled, schedule.enabled),
        (PrefKey::MondayEnabled, schedule.monday),
        (PrefKey::TuesdayEnabled, schedule.tuesday),
        (PrefKey::WednesdayEnabled, schedule.wednesday),
        (PrefKey::ThursdayEnabled, schedule.thursday),
        (PrefKey::FridayEnabled, schedule.friday),
        (PrefKey::SaturdayEnabled, schedule.saturday),
        (PrefKey::SundayEnabled, schedule.sunday),
    ];

    for (key, value) in updates {
        store.set(key, value.to_string());
    }
}

fn parse_seconds(store: &dyn SettingsStore, key: PrefKey) -> Option<u64> {
    let raw = store.get(key)?;
    match raw.trim().parse::<f64>() {
        Ok(secs) if secs >= 1.0 => Some(secs as u64),
        _ => {
            warn!("Ignoring invalid {} '{}'", key.as_str(), raw);
            None
        }
    }
}

fn parse_bool(store: &dyn SettingsStore, key: PrefKey) -> Option<bool> {
    let raw = store.get(key)?;
    match raw.trim() {
        "true" | "1" => Some(true),
        "false" | "0" => Some(false),
        _ => {
            warn!("Ignoring invalid {} '{}'", key.as_str(), raw);
            None
        }
    }
}
