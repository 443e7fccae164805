use crate::error::{AppError, AppResult};
use log::debug;
use notify_rust::{Notification, Timeout};

pub const APP_NAME: &str = "lookaway";

/// Something that can put a message in front of the user.
#[cfg_attr(test, mockall::automock)]
pub trait NotificationSink: Send + Sync {
    fn deliver(&self, title: &str, body: &str) -> AppResult<()>;
}

/// Sends through the desktop notification service.
#[derive(Debug, Default, Clone, Copy)]
pub struct DesktopNotifier;

impl NotificationSink for DesktopNotifier {
    fn deliver(&self, title: &str, body: &str) -> AppResult<()> {
        debug!("Showing notification: {}", title);
        Notification::new()
            .summary(title)
            .body(body)
            .appname(APP_NAME)
            .timeout(Timeout::Milliseconds(5000))
            .show()
            .map(|_| ())
            .map_err(|e| AppError::notification(e.to_string()))
    }
}

pub fn warning_title() -> &'static str {
    "Break Coming Soon"
}

pub fn warning_body(minutes: u32) -> String {
    let unit = if minutes == 1 { "minute" } else { "minutes" };
    format!("Your eye break will start in {} {}", minutes, unit)
}
