// file: src/models/event.rs
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Phase {
    #[default]
    Working,
    OnBreak,
    FocusActive,
}

/// Where a pre-break warning should be shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Delivery {
    /// OS notification center.
    System,
    /// Floating indicator drawn by the presentation layer.
    InApp,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum SchedulerEvent {
    TimeUpdate { remaining_secs: u64 },
    BreakUpdate { remaining_secs: u64 },
    FocusUpdate { remaining_secs: u64 },
    BreakStarted { duration_secs: u64, message: String },
    BreakEnded,
    Warning { minutes: u32, delivery: Delivery },
    CountdownTick { remaining_secs: u64 },
    FocusChanged { active: bool },
    FocusDenied { cooldown_remaining_secs: u64 },
    SettingsChanged,
}

/// Outcome of asking the scheduler to enter Focus Mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusRequest {
    Started,
    /// Not in the Working phase (on break or already focusing).
    Ignored,
    CoolingDown { remaining_secs: u64 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_serializes_with_type_tag() {
        let event = SchedulerEvent::Warning {
            minutes: 5,
            delivery: Delivery::InApp,
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "warning");
        assert_eq!(json["minutes"], 5);
        assert_eq!(json["delivery"], "inApp");
    }

    #[test]
    fn test_default_phase_is_working() {
        assert_eq!(Phase::default(), Phase::Working);
    }
}
