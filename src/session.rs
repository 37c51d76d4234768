//! Session-wide posture statistics.
//!
//! A [`SessionTracker`] lives for one monitoring session. It is fed the
//! per-interval frame verdicts (to open and close bad-posture streaks) and
//! a roughly 1 Hz tick (to recompute totals and fire timed reminders).
//! All timestamps are caller-supplied milliseconds.

use crate::{
    constants::{DEFAULT_STRETCH_REMINDER_SECS, DEFAULT_SUSTAINED_BAD_SECS, PERFECT_SCORE},
    notify::{NotificationSink, PostureStatus},
    posture::FrameVerdict,
    utils::{format_duration, percentage},
};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Direction of the live posture score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Trend {
    Improving,
    Declining,
    #[default]
    Stable,
}

/// Read-only snapshot of session statistics
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionStats {
    pub total_elapsed_ms: u64,
    pub good_posture_ms: u64,
    /// Closed streaks plus the currently open one
    pub bad_posture_ms: u64,
    /// Age of the open streak, zero when posture is good
    pub current_bad_duration_ms: u64,
    pub current_bad_streak_start_ms: Option<u64>,
    pub longest_bad_streak_ms: u64,
    /// Number of streaks opened
    pub break_count: u32,
    /// Share of session time spent in good posture
    pub average_score_pct: u32,
    /// Score of the latest verdict
    pub current_score: u32,
    pub trend: Trend,
}

impl Default for SessionStats {
    fn default() -> Self {
        Self {
            total_elapsed_ms: 0,
            good_posture_ms: 0,
            bad_posture_ms: 0,
            current_bad_duration_ms: 0,
            current_bad_streak_start_ms: None,
            longest_bad_streak_ms: 0,
            break_count: 0,
            average_score_pct: PERFECT_SCORE,
            current_score: PERFECT_SCORE,
            trend: Trend::Stable,
        }
    }
}

impl SessionStats {
    /// One-line human summary
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "session {} | good {} | bad {} | breaks {} | longest streak {} | score {}%",
            format_duration(self.total_elapsed_ms),
            format_duration(self.good_posture_ms),
            format_duration(self.bad_posture_ms),
            self.break_count,
            format_duration(self.longest_bad_streak_ms),
            self.average_score_pct,
        )
    }
}

/// Stateful aggregator of posture over a monitoring session
#[derive(Debug, Clone)]
pub struct SessionTracker {
    reminder_interval_ms: u64,
    sustained_bad_ms: u64,
    session_start_ms: u64,
    streak_start_ms: Option<u64>,
    closed_bad_ms: u64,
    streak_alerted: bool,
    reminders_sent: u64,
    stats: SessionStats,
}

impl SessionTracker {
    /// Start a session at `now_ms` with the default reminder timings
    #[must_use]
    pub fn new(now_ms: u64) -> Self {
        Self::with_timings(
            now_ms,
            DEFAULT_STRETCH_REMINDER_SECS * 1000,
            DEFAULT_SUSTAINED_BAD_SECS * 1000,
        )
    }

    /// Start a session with explicit reminder and sustained-alert periods
    #[must_use]
    pub fn with_timings(now_ms: u64, reminder_interval_ms: u64, sustained_bad_ms: u64) -> Self {
        Self {
            reminder_interval_ms,
            sustained_bad_ms,
            session_start_ms: now_ms,
            streak_start_ms: None,
            closed_bad_ms: 0,
            streak_alerted: false,
            reminders_sent: 0,
            stats: SessionStats::default(),
        }
    }

    /// Latest statistics snapshot
    #[must_use]
    pub fn stats(&self) -> &SessionStats {
        &self.stats
    }

    /// Whether a bad-posture streak is open
    #[must_use]
    pub fn in_bad_streak(&self) -> bool {
        self.streak_start_ms.is_some()
    }

    /// Feed one per-interval verdict
    pub fn record_verdict(&mut self, verdict: &FrameVerdict, now_ms: u64, sink: &mut dyn NotificationSink) {
        let score = verdict.score();
        self.stats.trend = match score.cmp(&self.stats.current_score) {
            Ordering::Greater => Trend::Improving,
            Ordering::Less => Trend::Declining,
            Ordering::Equal => Trend::Stable,
        };
        self.stats.current_score = score;

        match (verdict.is_bad(), self.streak_start_ms) {
            (true, None) => {
                self.streak_start_ms = Some(now_ms);
                self.streak_alerted = false;
                self.stats.break_count += 1;
                debug!("Bad posture streak opened at {} ms", now_ms);
                sink.notify(PostureStatus::BadPosture);
            }
            (false, Some(start)) => {
                let duration = now_ms.saturating_sub(start);
                self.closed_bad_ms += duration;
                self.stats.longest_bad_streak_ms = self.stats.longest_bad_streak_ms.max(duration);
                self.streak_start_ms = None;
                self.streak_alerted = false;
                debug!("Bad posture streak closed after {}", format_duration(duration));
                sink.notify(PostureStatus::GoodPosture);
            }
            _ => {}
        }

        self.refresh(now_ms);
    }

    /// Periodic update: recompute totals and fire timed notifications
    pub fn tick(&mut self, now_ms: u64, sink: &mut dyn NotificationSink) {
        self.refresh(now_ms);

        if self.reminder_interval_ms > 0 {
            let due = self.stats.total_elapsed_ms / self.reminder_interval_ms;
            if due > self.reminders_sent {
                self.reminders_sent = due;
                info!("Stretch reminder after {}", format_duration(self.stats.total_elapsed_ms));
                sink.notify(PostureStatus::StretchReminder);
            }
        }

        if self.streak_start_ms.is_some()
            && !self.streak_alerted
            && self.stats.current_bad_duration_ms > self.sustained_bad_ms
        {
            self.streak_alerted = true;
            info!(
                "Sustained bad posture for {}",
                format_duration(self.stats.current_bad_duration_ms)
            );
            sink.notify(PostureStatus::BadPostureAlert);
        }
    }

    /// Return to the initial state with the session starting at `now_ms`
    pub fn reset(&mut self, now_ms: u64) {
        info!("Session statistics reset");
        *self = Self::with_timings(now_ms, self.reminder_interval_ms, self.sustained_bad_ms);
    }

    fn refresh(&mut self, now_ms: u64) {
        let total = now_ms.saturating_sub(self.session_start_ms);
        let open = self.streak_start_ms.map_or(0, |start| now_ms.saturating_sub(start));
        let bad = (self.closed_bad_ms + open).min(total);

        self.stats.total_elapsed_ms = total;
        self.stats.current_bad_duration_ms = open;
        self.stats.current_bad_streak_start_ms = self.streak_start_ms;
        self.stats.bad_posture_ms = bad;
        self.stats.good_posture_ms = total - bad;
        self.stats.average_score_pct = percentage(self.stats.good_posture_ms, total, PERFECT_SCORE);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        notify::RecordingSink,
        posture::{FrameStatus, Issue, IssueKind, Measurements},
    };

    fn good() -> FrameVerdict {
        FrameVerdict {
            status: FrameStatus::Good,
            issues: Vec::new(),
            measurements: Measurements::default(),
        }
    }

    fn bad(severity: f64) -> FrameVerdict {
        FrameVerdict {
            status: FrameStatus::NeedsAttention,
            issues: vec![Issue {
                kind: IssueKind::ForwardHead,
                severity,
                message: String::new(),
                measurements_text: String::new(),
            }],
            measurements: Measurements::default(),
        }
    }

    #[test]
    fn test_initial_stats() {
        let mut session = SessionTracker::new(1_000);
        let mut sink = RecordingSink::new();
        session.tick(1_000, &mut sink);
        assert_eq!(session.stats().average_score_pct, 100);
        assert_eq!(session.stats().total_elapsed_ms, 0);
        assert!(sink.received().is_empty());
    }

    #[test]
    fn test_streak_lifecycle() {
        let mut session = SessionTracker::new(0);
        let mut sink = RecordingSink::new();

        session.record_verdict(&bad(8.0), 0, &mut sink);
        assert!(session.in_bad_streak());
        assert_eq!(session.stats().break_count, 1);

        // Staying bad does not open another streak
        session.record_verdict(&bad(8.0), 2_000, &mut sink);
        assert_eq!(session.stats().break_count, 1);

        session.record_verdict(&good(), 5_000, &mut sink);
        let stats = session.stats();
        assert!(stats.longest_bad_streak_ms >= 5_000);
        assert_eq!(stats.current_bad_streak_start_ms, None);
        assert_eq!(stats.bad_posture_ms, 5_000);
        assert_eq!(
            sink.received(),
            &[PostureStatus::BadPosture, PostureStatus::GoodPosture]
        );
    }

    #[test]
    fn test_score_and_trend() {
        let mut session = SessionTracker::new(0);
        let mut sink = RecordingSink::new();

        session.record_verdict(&bad(30.0), 1_000, &mut sink);
        assert_eq!(session.stats().current_score, 70);
        assert_eq!(session.stats().trend, Trend::Declining);

        session.record_verdict(&bad(10.0), 2_000, &mut sink);
        assert_eq!(session.stats().trend, Trend::Improving);

        session.record_verdict(&bad(10.0), 3_000, &mut sink);
        assert_eq!(session.stats().trend, Trend::Stable);

        session.record_verdict(&bad(250.0), 4_000, &mut sink);
        assert_eq!(session.stats().current_score, 0);
    }

    #[test]
    fn test_average_score() {
        let mut session = SessionTracker::new(0);
        let mut sink = RecordingSink::new();
        session.record_verdict(&bad(1.0), 0, &mut sink);
        session.record_verdict(&good(), 1_000, &mut sink);
        session.tick(4_000, &mut sink);
        assert_eq!(session.stats().good_posture_ms, 3_000);
        assert_eq!(session.stats().average_score_pct, 75);
    }

    #[test]
    fn test_stretch_reminder_every_interval() {
        let mut session = SessionTracker::with_timings(0, 10_000, 60_000);
        let mut sink = RecordingSink::new();
        for t in (0..=35_000).step_by(1_000) {
            session.tick(t, &mut sink);
        }
        assert_eq!(sink.count(PostureStatus::StretchReminder), 3);
    }

    #[test]
    fn test_sustained_alert_rearms_per_streak() {
        let mut session = SessionTracker::with_timings(0, 1_000_000, 3_000);
        let mut sink = RecordingSink::new();

        session.record_verdict(&bad(5.0), 0, &mut sink);
        for t in (1_000..=10_000).step_by(1_000) {
            session.tick(t, &mut sink);
        }
        assert_eq!(sink.count(PostureStatus::BadPostureAlert), 1);

        session.record_verdict(&good(), 11_000, &mut sink);
        session.record_verdict(&bad(5.0), 12_000, &mut sink);
        for t in (13_000..=20_000).step_by(1_000) {
            session.tick(t, &mut sink);
        }
        assert_eq!(sink.count(PostureStatus::BadPostureAlert), 2);
    }

    #[test]
    fn test_reset() {
        let mut session = SessionTracker::new(0);
        let mut sink = RecordingSink::new();
        session.record_verdict(&bad(5.0), 0, &mut sink);
        session.tick(10_000, &mut sink);

        session.reset(20_000);
        assert!(!session.in_bad_streak());
        assert_eq!(session.stats(), &SessionStats::default());

        session.tick(21_000, &mut sink);
        assert_eq!(session.stats().total_elapsed_ms, 1_000);
        assert_eq!(session.stats().good_posture_ms, 1_000);
    }
}
