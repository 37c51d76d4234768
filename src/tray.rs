//! Tray icon state with flip suppression.
//!
//! Maps incoming statuses onto a good/bad icon and holds the icon for a
//! minimum time after each change so the tray does not flicker.

use crate::{constants::DEFAULT_TRAY_STICK_MS, notify::PostureStatus};
use log::debug;
use serde::{Deserialize, Serialize};

/// Icon shown in the system tray
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TrayIcon {
    #[default]
    Good,
    Bad,
}

/// Tray icon state machine
#[derive(Debug, Clone)]
pub struct TrayIndicator {
    stick_ms: u64,
    icon: TrayIcon,
    last_change_ms: Option<u64>,
    tooltip: String,
}

impl Default for TrayIndicator {
    fn default() -> Self {
        Self::new(DEFAULT_TRAY_STICK_MS)
    }
}

impl TrayIndicator {
    #[must_use]
    pub fn new(stick_ms: u64) -> Self {
        Self {
            stick_ms,
            icon: TrayIcon::Good,
            last_change_ms: None,
            tooltip: String::from("Stretch reminders active"),
        }
    }

    #[must_use]
    pub fn icon(&self) -> TrayIcon {
        self.icon
    }

    #[must_use]
    pub fn tooltip(&self) -> &str {
        &self.tooltip
    }

    /// Apply a status at `now_ms`; returns whether the icon changed.
    ///
    /// Reminders and session end leave the icon alone. The tooltip follows
    /// the icon, so a suppressed change keeps the previous text.
    pub fn apply(&mut self, status: PostureStatus, now_ms: u64) -> bool {
        let wanted = match status {
            PostureStatus::StretchReminder | PostureStatus::SessionEnded => return false,
            s if s.is_bad() => TrayIcon::Bad,
            _ => TrayIcon::Good,
        };

        if wanted == self.icon {
            self.tooltip = format!("Posture Status: {status}");
            return false;
        }
        if let Some(last) = self.last_change_ms {
            if now_ms.saturating_sub(last) < self.stick_ms {
                debug!("Tray change to {:?} suppressed", wanted);
                return false;
            }
        }

        self.icon = wanted;
        self.last_change_ms = Some(now_ms);
        self.tooltip = format!("Posture Status: {status}");
        true
    }
}
