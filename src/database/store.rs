// file: src/database/store.rs
//! Key-value preference storage handed to the scheduler.
//!
//! Reads are served from memory. `SqliteStore` queues writes to a
//! background task so setters on the scheduler never wait on disk.

use super::{settings, Database};
use anyhow::Result;
use log::{debug, error, info};
use sqlx::SqlitePool;
use std::collections::HashMap;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrefKey {
    WorkInterval,
    BreakDuration,
    FocusDuration,
    NotificationsEnabled,
    UseSystemNotifications,
    NotificationTiming,
    BreakMessage,
    CurrentTheme,
    FocusCooldownEnabled,
    FocusCooldownMinutes,
    ScheduleEnabled,
    MondayEnabled,
    TuesdayEnabled,
    WednesdayEnabled,
    ThursdayEnabled,
    FridayEnabled,
    SaturdayEnabled,
    SundayEnabled,
}

impl PrefKey {
    pub const ALL: [PrefKey; 18] = [
        PrefKey::WorkInterval,
        PrefKey::BreakDuration,
        PrefKey::FocusDuration,
        PrefKey::NotificationsEnabled,
        PrefKey::UseSystemNotifications,
        PrefKey::NotificationTiming,
        PrefKey::BreakMessage,
        PrefKey::CurrentTheme,
        PrefKey::FocusCooldownEnabled,
        PrefKey::FocusCooldownMinutes,
        PrefKey::ScheduleEnabled,
        PrefKey::MondayEnabled,
        PrefKey::TuesdayEnabled,
        PrefKey::WednesdayEnabled,
        PrefKey::ThursdayEnabled,
        PrefKey::FridayEnabled,
        PrefKey::SaturdayEnabled,
        PrefKey::SundayEnabled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PrefKey::WorkInterval => "workInterval",
            PrefKey::BreakDuration => "breakDuration",
            PrefKey::FocusDuration => "focusDuration",
            PrefKey::NotificationsEnabled => "notificationsEnabled",
            PrefKey::UseSystemNotifications => "useSystemNotifications",
            PrefKey::NotificationTiming => "notificationTiming",
            PrefKey::BreakMessage => "breakMessage",
            PrefKey::CurrentTheme => "currentTheme",
            PrefKey::FocusCooldownEnabled => "focusCooldownEnabled",
            PrefKey::FocusCooldownMinutes => "focusCooldownMinutes",
            PrefKey::ScheduleEnabled => "scheduleEnabled",
            PrefKey::MondayEnabled => "mondayEnabled",
            PrefKey::TuesdayEnabled => "tuesdayEnabled",
            PrefKey::WednesdayEnabled => "wednesdayEnabled",
            PrefKey::ThursdayEnabled => "thursdayEnabled",
            PrefKey::FridayEnabled => "fridayEnabled",
            PrefKey::SaturdayEnabled => "saturdayEnabled",
            PrefKey::SundayEnabled => "sundayEnabled",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|candidate| candidate.as_str() == key)
    }
}

pub trait SettingsStore: Send {
    fn get(&self, key: PrefKey) -> Option<String>;
    fn set(&mut self, key: PrefKey, value: String);
}

#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    values: HashMap<PrefKey, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl SettingsStore for MemoryStore {
    fn get(&self, key: PrefKey) -> Option<String> {
        self.values.get(&key).cloned()
    }

    fn set(&mut self, key: PrefKey, value: String) {
        self.values.insert(key, value);
    }
}

/// SQLite-backed store with an in-memory cache and write-behind persistence.
pub struct SqliteStore {
    cache: HashMap<PrefKey, String>,
    writes: UnboundedSender<(PrefKey, String)>,
}

impl SqliteStore {
    /// Loads every stored preference and starts the writer task.
    ///
    /// The writer exits once the store is dropped and all queued writes
    /// are flushed; await the returned handle before closing the pool.
    pub async fn open(db: &Database) -> Result<(Self, JoinHandle<()>)> {
        let rows = settings::load_all(&db.pool).await?;

        let mut cache = HashMap::new();
        for row in rows {
            match PrefKey::from_key(&row.key) {
                Some(key) => {
                    cache.insert(key, row.value);
                }
                None => debug!("Ignoring unknown setting key '{}'", row.key),
            }
        }
        info!("Loaded {} stored preferences", cache.len());

        let (writes, rx) = mpsc::unbounded_channel();
        let writer = tokio::spawn(write_behind(db.pool.clone(), rx));

        Ok((Self { cache, writes }, writer))
    }
}

impl SettingsStore for SqliteStore {
    fn get(&self, key: PrefKey) -> Option<String> {
        self.cache.get(&key).cloned()
    }

    fn set(&mut self, key: PrefKey, value: String) {
        if self.cache.get(&key) == Some(&value) {
            return;
        }
        self.cache.insert(key, value.clone());
        if self.writes.send((key, value)).is_err() {
            error!("Settings writer stopped; '{}' kept in memory only", key.as_str());
        }
    }
}

async fn write_behind(pool: SqlitePool, mut rx: UnboundedReceiver<(PrefKey, String)>) {
    while let Some((key, value)) = rx.recv().await {
        if let Err(e) = settings::upsert(&pool, key.as_str(), &value).await {
            error!("Failed to persist setting '{}': {}", key.as_str(), e);
        }
    }
    debug!("Settings writer drained");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pref_key_names_are_unique() {
        let mut names: Vec<&str> = PrefKey::ALL.iter().map(|key| key.as_str()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), PrefKey::ALL.len());
    }

    #[test]
    fn test_pref_key_lookup() {
        assert_eq!(PrefKey::from_key("workInterval"), Some(PrefKey::WorkInterval));
        assert_eq!(PrefKey::from_key("sundayEnabled"), Some(PrefKey::SundayEnabled));
        assert_eq!(PrefKey::from_key("launchAtLogin"), None);
    }

    #[test]
    fn test_memory_store_get_set() {
        let mut store = MemoryStore::new();
        assert!(store.is_empty());
        assert_eq!(store.get(PrefKey::BreakMessage), None);

        store.set(PrefKey::BreakMessage, "Look away".to_string());
        store.set(PrefKey::BreakMessage, "Blink".to_string());

        assert_eq!(store.get(PrefKey::BreakMessage).as_deref(), Some("Blink"));
        assert_eq!(store.len(), 1);
    }
}
