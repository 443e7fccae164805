// file: src/models/settings.rs
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

pub const DEFAULT_BREAK_MESSAGE: &str = "Time for a break!";

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Setting {
    pub key: String,
    pub value: String,
}

/// Appearance of the settings window. Break overlays ignore it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Theme {
    #[default]
    System,
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::System => "System",
            Theme::Light => "Light",
            Theme::Dark => "Dark",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().trim_matches('"') {
            "System" => Some(Theme::System),
            "Light" => Some(Theme::Light),
            "Dark" => Some(Theme::Dark),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    pub work_interval: u64,  // seconds
    pub break_duration: u64, // seconds
    pub focus_duration: u64, // seconds
    pub break_message: String,
    pub notifications_enabled: bool,
    pub use_system_notifications: bool,
    pub notification_timing: Vec<u32>, // minutes before the break
    pub theme: Theme,
    pub focus_cooldown_enabled: bool,
    pub focus_cooldown_minutes: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            work_interval: 20 * 60,
            break_duration: 20,
            focus_duration: 60 * 60,
            break_message: DEFAULT_BREAK_MESSAGE.to_string(),
            notifications_enabled: true,
            use_system_notifications: true,
            notification_timing: vec![5, 2, 1],
            theme: Theme::System,
            focus_cooldown_enabled: false,
            focus_cooldown_minutes: 30,
        }
    }
}

impl Settings {
    pub fn focus_cooldown_secs(&self) -> u64 {
        u64::from(self.focus_cooldown_minutes) * 60
    }

    /// Drops zero offsets and duplicates, largest offset first.
    pub fn normalize_timing(&mut self) {
        let mut timing: Vec<u32> = self
            .notification_timing
            .iter()
            .copied()
            .filter(|minutes| *minutes > 0)
            .collect();
        timing.sort_unstable_by(|a, b| b.cmp(a));
        timing.dedup();
        self.notification_timing = timing;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_default() {
        let settings = Settings::default();
        assert_eq!(settings.work_interval, 1200);
        assert_eq!(settings.break_duration, 20);
        assert_eq!(settings.focus_duration, 3600);
        assert_eq!(settings.break_message, "Time for a break!");
        assert!(settings.notifications_enabled);
        assert!(settings.use_system_notifications);
        assert_eq!(settings.notification_timing, vec![5, 2, 1]);
        assert_eq!(settings.theme, Theme::System);
        assert!(!settings.focus_cooldown_enabled);
        assert_eq!(settings.focus_cooldown_minutes, 30);
        assert_eq!(settings.focus_cooldown_secs(), 1800);
    }

    #[test]
    fn test_normalize_timing() {
        let mut settings = Settings {
            notification_timing: vec![1, 0, 5, 2, 5, 1],
            ..Settings::default()
        };
        settings.normalize_timing();
        assert_eq!(settings.notification_timing, vec![5, 2, 1]);
    }

    #[test]
    fn test_theme_round_trip_names() {
        for theme in [Theme::System, Theme::Light, Theme::Dark] {
            assert_eq!(Theme::parse(theme.as_str()), Some(theme));
        }
        assert_eq!(Theme::parse("\"Dark\""), Some(Theme::Dark));
        assert_eq!(Theme::parse("Sepia"), None);
    }
}
