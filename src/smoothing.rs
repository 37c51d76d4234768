//! Time-windowed smoothing of per-frame posture verdicts.
//!
//! Verdicts are sampled into a bounded [`SampleWindow`] at a fixed cadence.
//! [`SampleWindow::aggregate`] averages the measurements, promotes issues
//! that appear in more than a fixed fraction of the samples, and then
//! empties the window. Consecutive aggregated verdicts never share samples.

use crate::{
    constants::{DEFAULT_PERSISTENCE_RATIO, DEFAULT_WINDOW_CAPACITY},
    posture::{FrameVerdict, IssueKind, Measurements},
};
use serde::{Deserialize, Serialize};
use std::{collections::VecDeque, fmt};

/// Status label of an aggregated window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WindowStatus {
    /// No persistent issues
    Good,
    /// At least one issue persisted through the window
    PoorOverTime,
}

impl fmt::Display for WindowStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Good => f.write_str("Good Posture"),
            Self::PoorOverTime => f.write_str("Poor Posture Detected Over Time"),
        }
    }
}

/// An issue that persisted through most of a window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersistentIssue {
    pub kind: IssueKind,
    /// Mean severity over the samples where the issue occurred
    pub severity_avg: f64,
    pub message: String,
    /// Samples containing the issue
    pub occurrences: usize,
    /// Samples in the window
    pub samples: usize,
}

impl PersistentIssue {
    /// Occurrence summary, e.g. `"Persistent issue (22/30 samples)"`
    #[must_use]
    pub fn occurrence_text(&self) -> String {
        format!("Persistent issue ({}/{} samples)", self.occurrences, self.samples)
    }
}

/// Smoothed verdict over one window of samples
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregatedVerdict {
    pub status: WindowStatus,
    pub issues: Vec<PersistentIssue>,
    pub measurements: Measurements,
    /// Number of samples that were aggregated
    pub sample_count: usize,
}

impl AggregatedVerdict {
    fn empty() -> Self {
        Self {
            status: WindowStatus::Good,
            issues: Vec::new(),
            measurements: Measurements::default(),
            sample_count: 0,
        }
    }
}

struct IssueTally {
    kind: IssueKind,
    count: usize,
    severity_sum: f64,
    message: String,
}

/// Bounded FIFO of sampled frame verdicts
#[derive(Debug, Clone)]
pub struct SampleWindow {
    capacity: usize,
    persistence_ratio: f64,
    samples: VecDeque<FrameVerdict>,
}

impl Default for SampleWindow {
    fn default() -> Self {
        Self::new(DEFAULT_WINDOW_CAPACITY, DEFAULT_PERSISTENCE_RATIO)
    }
}

impl SampleWindow {
    /// Create a window holding at most `capacity` samples.
    ///
    /// An issue is promoted when it occurs in more than
    /// `len * persistence_ratio` samples.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero or the ratio is outside `[0, 1)`.
    #[must_use]
    pub fn new(capacity: usize, persistence_ratio: f64) -> Self {
        assert!(capacity > 0, "Window capacity must be greater than 0");
        assert!(
            (0.0..1.0).contains(&persistence_ratio),
            "Persistence ratio must be in [0, 1)"
        );
        Self {
            capacity,
            persistence_ratio,
            samples: VecDeque::with_capacity(capacity),
        }
    }

    /// Append a sample, evicting the oldest when over capacity
    pub fn submit(&mut self, verdict: FrameVerdict) {
        self.samples.push_back(verdict);
        while self.samples.len() > self.capacity {
            self.samples.pop_front();
        }
    }

    /// Number of buffered samples
    #[must_use]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Whether no samples are buffered
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Whether the window holds `capacity` samples
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.samples.len() >= self.capacity
    }

    /// Maximum number of samples
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Drop all buffered samples
    pub fn clear(&mut self) {
        self.samples.clear();
    }

    /// Aggregate the buffered samples and empty the window.
    ///
    /// An empty window yields a `Good` verdict with zeroed measurements.
    #[allow(clippy::cast_precision_loss)] // sample counts are tiny
    pub fn aggregate(&mut self) -> AggregatedVerdict {
        if self.samples.is_empty() {
            return AggregatedVerdict::empty();
        }

        let n = self.samples.len();
        let mut sum = Measurements::default();
        let mut tallies: Vec<IssueTally> = Vec::new();

        for sample in &self.samples {
            let m = &sample.measurements;
            sum.spine_angle_deg += m.spine_angle_deg;
            sum.forward_lean += m.forward_lean;
            sum.shoulder_roll += m.shoulder_roll;
            sum.nose_to_shoulder_dist += m.nose_to_shoulder_dist;
            sum.shoulder_height_diff += m.shoulder_height_diff;
            sum.neck_angle_deg += m.neck_angle_deg;

            for issue in &sample.issues {
                match tallies.iter_mut().find(|t| t.kind == issue.kind) {
                    Some(tally) => {
                        tally.count += 1;
                        tally.severity_sum += issue.severity;
                    }
                    None => tallies.push(IssueTally {
                        kind: issue.kind,
                        count: 1,
                        severity_sum: issue.severity,
                        message: issue.message.clone(),
                    }),
                }
            }
        }

        let len = n as f64;
        let measurements = Measurements {
            spine_angle_deg: sum.spine_angle_deg / len,
            forward_lean: sum.forward_lean / len,
            shoulder_roll: sum.shoulder_roll / len,
            nose_to_shoulder_dist: sum.nose_to_shoulder_dist / len,
            shoulder_height_diff: sum.shoulder_height_diff / len,
            neck_angle_deg: sum.neck_angle_deg / len,
        }
        .rounded();

        let threshold = len * self.persistence_ratio;
        let issues: Vec<PersistentIssue> = tallies
            .into_iter()
            .filter(|t| t.count as f64 > threshold)
            .map(|t| PersistentIssue {
                kind: t.kind,
                severity_avg: t.severity_sum / t.count as f64,
                message: t.message,
                occurrences: t.count,
                samples: n,
            })
            .collect();

        self.samples.clear();

        AggregatedVerdict {
            status: if issues.is_empty() {
                WindowStatus::Good
            } else {
                WindowStatus::PoorOverTime
            },
            issues,
            measurements,
            sample_count: n,
        }
    }
}

/// Lets one sample through per interval of wall-clock time
#[derive(Debug, Clone)]
pub struct SampleGate {
    interval_ms: u64,
    last_sample_ms: Option<u64>,
}

impl SampleGate {
    #[must_use]
    pub fn new(interval_ms: u64) -> Self {
        Self {
            interval_ms,
            last_sample_ms: None,
        }
    }

    /// Whether a sample is due at `now_ms`; marks it taken when it is
    pub fn try_take(&mut self, now_ms: u64) -> bool {
        let due = self
            .last_sample_ms
            .map_or(true, |last| now_ms.saturating_sub(last) >= self.interval_ms);
        if due {
            self.last_sample_ms = Some(now_ms);
        }
        due
    }

    pub fn reset(&mut self) {
        self.last_sample_ms = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::posture::{FrameStatus, Issue};

    fn verdict(kinds: &[IssueKind]) -> FrameVerdict {
        FrameVerdict {
            status: if kinds.is_empty() {
                FrameStatus::Good
            } else {
                FrameStatus::NeedsAttention
            },
            issues: kinds
                .iter()
                .map(|&kind| Issue {
                    kind,
                    severity: 2.0,
                    message: kind.label().to_string(),
                    measurements_text: String::new(),
                })
                .collect(),
            measurements: Measurements::default(),
        }
    }

    #[test]
    fn test_empty_window_is_good() {
        let mut window = SampleWindow::default();
        let agg = window.aggregate();
        assert_eq!(agg.status, WindowStatus::Good);
        assert!(agg.issues.is_empty());
        assert_eq!(agg.sample_count, 0);
        assert!(!agg.measurements.spine_angle_deg.is_nan());
    }

    #[test]
    fn test_evicts_oldest() {
        let mut window = SampleWindow::new(3, 0.7);
        window.submit(verdict(&[IssueKind::Slouching]));
        for _ in 0..3 {
            window.submit(verdict(&[]));
        }
        assert_eq!(window.len(), 3);
        // The slouching sample was evicted
        assert!(window.aggregate().issues.is_empty());
    }

    #[test]
    fn test_aggregate_flushes() {
        let mut window = SampleWindow::default();
        window.submit(verdict(&[IssueKind::ForwardHead]));
        let agg = window.aggregate();
        assert_eq!(agg.status, WindowStatus::PoorOverTime);
        assert_eq!(agg.issues[0].occurrence_text(), "Persistent issue (1/1 samples)");
        assert!(window.is_empty());
    }

    #[test]
    fn test_averages_measurements() {
        let mut window = SampleWindow::default();
        let mut a = verdict(&[]);
        a.measurements.forward_lean = 0.01;
        a.measurements.neck_angle_deg = 10.0;
        let mut b = verdict(&[]);
        b.measurements.forward_lean = 0.02;
        b.measurements.neck_angle_deg = 11.0;
        window.submit(a);
        window.submit(b);

        let agg = window.aggregate();
        assert!((agg.measurements.forward_lean - 0.015).abs() < 1e-9);
        assert!((agg.measurements.neck_angle_deg - 10.5).abs() < 1e-9);
    }

    #[test]
    fn test_sample_gate() {
        let mut gate = SampleGate::new(1000);
        assert!(gate.try_take(0));
        assert!(!gate.try_take(500));
        assert!(!gate.try_take(999));
        assert!(gate.try_take(1000));
        assert!(!gate.try_take(1999));
        assert!(gate.try_take(2500));
        gate.reset();
        assert!(gate.try_take(2600));
    }
}
