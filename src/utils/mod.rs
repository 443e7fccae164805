use crate::models::Phase;

pub mod logging;

/// Formats seconds as `m:ss`, minutes unbounded.
pub fn format_countdown(secs: u64) -> String {
    format!("{}:{:02}", secs / 60, secs % 60)
}

pub fn next_break_line(remaining_work_secs: u64) -> String {
    format!("Next break in: {}", format_countdown(remaining_work_secs))
}

pub fn focus_line(phase: Phase, remaining_focus_secs: u64) -> String {
    if phase == Phase::FocusActive {
        format!("Focus Mode: {} left", format_countdown(remaining_focus_secs))
    } else {
        "Focus Mode: Off".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_countdown() {
        assert_eq!(format_countdown(0), "0:00");
        assert_eq!(format_countdown(59), "0:59");
        assert_eq!(format_countdown(1200), "20:00");
        assert_eq!(format_countdown(3661), "61:01");
    }

    #[test]
    fn test_menu_lines() {
        assert_eq!(next_break_line(754), "Next break in: 12:34");
        assert_eq!(focus_line(Phase::FocusActive, 3599), "Focus Mode: 59:59 left");
        assert_eq!(focus_line(Phase::OnBreak, 10), "Focus Mode: Off");
    }
}
