//! Status values pushed to the desktop shell.
//!
//! Sends are fire-and-forget: sinks get no way to report failure back to
//! the monitor and nothing is retried.

use crate::smoothing::WindowStatus;
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Status value understood by the notification sink
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PostureStatus {
    GoodPosture,
    BadPosture,
    BadPostureAlert,
    StretchReminder,
    PoorPostureOverTime,
    /// Single-frame status label; sinks and the tray treat it as bad
    NeedsAttention,
    SessionEnded,
}

impl PostureStatus {
    /// Wire string for the shell
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::GoodPosture => "Good Posture",
            Self::BadPosture => "Bad Posture",
            Self::BadPostureAlert => "Bad Posture Alert",
            Self::StretchReminder => "Stretch Reminder",
            Self::PoorPostureOverTime => "Poor Posture Detected Over Time",
            Self::NeedsAttention => "Posture Needs Attention",
            Self::SessionEnded => "Session Ended",
        }
    }

    /// Whether the tray should show the bad-posture icon for this status
    #[must_use]
    pub const fn is_bad(self) -> bool {
        matches!(
            self,
            Self::BadPosture | Self::BadPostureAlert | Self::PoorPostureOverTime | Self::NeedsAttention
        )
    }
}

impl fmt::Display for PostureStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<WindowStatus> for PostureStatus {
    fn from(status: WindowStatus) -> Self {
        match status {
            WindowStatus::Good => Self::GoodPosture,
            WindowStatus::PoorOverTime => Self::PoorPostureOverTime,
        }
    }
}

/// Receiver of status notifications
pub trait NotificationSink {
    /// Deliver a status; must not block the caller
    fn notify(&mut self, status: PostureStatus);
}

/// Sink that writes every status to the log
#[derive(Debug, Default)]
pub struct LogSink;

impl NotificationSink for LogSink {
    fn notify(&mut self, status: PostureStatus) {
        if status.is_bad() {
            warn!("Notification: {}", status);
        } else {
            info!("Notification: {}", status);
        }
    }
}

/// Sink that keeps every status it receives
#[derive(Debug, Default, Clone)]
pub struct RecordingSink {
    received: Vec<PostureStatus>,
}

impl RecordingSink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything received so far, oldest first
    #[must_use]
    pub fn received(&self) -> &[PostureStatus] {
        &self.received
    }

    /// How many times `status` was received
    #[must_use]
    pub fn count(&self, status: PostureStatus) -> usize {
        self.received.iter().filter(|&&s| s == status).count()
    }
}

impl NotificationSink for RecordingSink {
    fn notify(&mut self, status: PostureStatus) {
        self.received.push(status);
    }
}

impl<S: NotificationSink + ?Sized> NotificationSink for Box<S> {
    fn notify(&mut self, status: PostureStatus) {
        (**self).notify(status);
    }
}
