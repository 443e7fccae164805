use crate::models::{Settings, WeeklySchedule};

/// Requests from the presentation layer, applied by the scheduler driver
/// between ticks.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Start a break right away
    TriggerBreak,
    StartFocus,
    EndFocus,
    ToggleFocus,
    /// Replace all settings; rejected if out of range
    UpdateSettings(Settings),
    UpdateSchedule(WeeklySchedule),
}
