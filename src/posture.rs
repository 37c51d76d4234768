//! Per-frame posture classification.
//!
//! [`classify`] applies a fixed battery of geometric rules to one frame of
//! body landmarks and produces a [`FrameVerdict`]: the list of detected
//! issues plus the raw measurements that fed them. It has no state, so the
//! same frame always yields the same verdict.

use crate::{
    constants::{
        FORWARD_HEAD_SEVERITY, FORWARD_HEAD_THRESHOLD, FORWARD_LEAN_SEVERITY_SCALE, FORWARD_LEAN_THRESHOLD,
        IDEAL_NOSE_TO_SHOULDER_DIST, LEFT_EAR, LEFT_HIP, LEFT_SHOULDER, NECK_TILT_SEVERITY_DIVISOR,
        NECK_TILT_THRESHOLD_DEG, NOSE, RIGHT_EAR, RIGHT_HIP, RIGHT_SHOULDER, SHOULDER_HEIGHT_DIFF_THRESHOLD,
        SHOULDER_HEIGHT_SEVERITY_SCALE, SHOULDER_ROLL_SEVERITY_SCALE, SHOULDER_ROLL_THRESHOLD,
        SLOUCH_SEVERITY_SCALE, SPINE_ANGLE_SEVERITY_DIVISOR, SPINE_ANGLE_THRESHOLD_DEG, SPINE_REFERENCE_OFFSET,
    },
    geometry::angle_signed,
    landmarks::{Landmark, PoseFrame},
    utils::round_to,
};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of posture problem detected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum IssueKind {
    /// One shoulder noticeably higher than the other
    UnevenShoulders,
    /// Shoulders ahead of the hips in depth
    ForwardHead,
    /// Nose drifted sideways from the shoulder midpoint
    Slouching,
    /// Ears spread wide relative to the shoulder midpoint
    ExtremeNeckTilt,
    /// Spine off vertical or strong forward lean
    SlouchingForwardLean,
    /// Shoulders rolled forward of the hips
    RoundedShoulders,
}

impl IssueKind {
    /// Human readable label
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::UnevenShoulders => "Uneven Shoulders",
            Self::ForwardHead => "Forward head",
            Self::Slouching => "Slouching",
            Self::ExtremeNeckTilt => "Extreme Neck Tilt",
            Self::SlouchingForwardLean => "Slouching/Forward Lean",
            Self::RoundedShoulders => "Rounded Shoulders",
        }
    }
}

impl fmt::Display for IssueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One detected posture problem
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Issue {
    /// What was detected
    pub kind: IssueKind,
    /// Unclamped severity, higher is worse
    pub severity: f64,
    /// Corrective advice
    pub message: String,
    /// Measurement behind the detection, formatted for display
    pub measurements_text: String,
}

impl Issue {
    fn new(kind: IssueKind, severity: f64, message: &str, measurements_text: String) -> Self {
        Self {
            kind,
            severity,
            message: message.to_string(),
            measurements_text,
        }
    }

    /// Severity rounded and capped for an "X/10" badge.
    ///
    /// The stored severity is left untouched.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)] // clamped to 0..=10
    pub fn display_severity(&self) -> u8 {
        self.severity.round().clamp(0.0, 10.0) as u8
    }
}

/// Raw posture measurements of one frame or averaged over a window
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Measurements {
    /// Spine deviation from vertical (degrees)
    pub spine_angle_deg: f64,
    /// Shoulder midpoint depth minus hip midpoint depth
    pub forward_lean: f64,
    /// Mean shoulder depth minus hip midpoint depth
    pub shoulder_roll: f64,
    /// Horizontal nose offset from the shoulder midpoint
    pub nose_to_shoulder_dist: f64,
    /// Vertical difference between the shoulders
    pub shoulder_height_diff: f64,
    /// Angle subtended by the ears at the shoulder midpoint (degrees)
    pub neck_angle_deg: f64,
}

impl Measurements {
    /// Round to display precision: angles to 1 decimal, distances to 3
    #[must_use]
    pub fn rounded(self) -> Self {
        Self {
            spine_angle_deg: round_to(self.spine_angle_deg, 1),
            forward_lean: round_to(self.forward_lean, 3),
            shoulder_roll: round_to(self.shoulder_roll, 3),
            nose_to_shoulder_dist: round_to(self.nose_to_shoulder_dist, 3),
            shoulder_height_diff: round_to(self.shoulder_height_diff, 3),
            neck_angle_deg: round_to(self.neck_angle_deg, 1),
        }
    }
}

/// Status label of a single frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FrameStatus {
    /// No issues
    Good,
    /// At least one issue
    NeedsAttention,
}

impl fmt::Display for FrameStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Good => f.write_str("Good Posture"),
            Self::NeedsAttention => f.write_str("Posture Needs Attention"),
        }
    }
}

/// Classifier output for one frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameVerdict {
    pub status: FrameStatus,
    pub issues: Vec<Issue>,
    pub measurements: Measurements,
}

impl FrameVerdict {
    /// Whether any issue was detected
    #[must_use]
    pub fn is_bad(&self) -> bool {
        !self.issues.is_empty()
    }

    /// Instant posture score: `100 - Σ severity`, floored at zero
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)] // clamped to 0..=100
    pub fn score(&self) -> u32 {
        let total: f64 = self.issues.iter().map(|i| i.severity).sum();
        (100.0 - total).clamp(0.0, 100.0).round() as u32
    }
}

struct Required<'a> {
    nose: &'a Landmark,
    left_shoulder: &'a Landmark,
    right_shoulder: &'a Landmark,
    left_hip: &'a Landmark,
    right_hip: &'a Landmark,
    left_ear: &'a Landmark,
    right_ear: &'a Landmark,
}

impl<'a> Required<'a> {
    fn from_frame(frame: &'a PoseFrame) -> Option<Self> {
        Some(Self {
            nose: frame.get(NOSE)?,
            left_shoulder: frame.get(LEFT_SHOULDER)?,
            right_shoulder: frame.get(RIGHT_SHOULDER)?,
            left_hip: frame.get(LEFT_HIP)?,
            right_hip: frame.get(RIGHT_HIP)?,
            left_ear: frame.get(LEFT_EAR)?,
            right_ear: frame.get(RIGHT_EAR)?,
        })
    }
}

/// Classify the posture in one frame.
///
/// Returns `None` when any of nose, ears, shoulders or hips is missing.
#[must_use]
pub fn classify(frame: &PoseFrame) -> Option<FrameVerdict> {
    let lm = Required::from_frame(frame)?;
    let mut issues = Vec::new();

    let shoulder_mid = lm.left_shoulder.midpoint(lm.right_shoulder);
    let hip_mid = lm.left_hip.midpoint(lm.right_hip);

    let shoulder_height_diff = (lm.left_shoulder.y - lm.right_shoulder.y).abs();
    if shoulder_height_diff > SHOULDER_HEIGHT_DIFF_THRESHOLD {
        issues.push(Issue::new(
            IssueKind::UnevenShoulders,
            shoulder_height_diff * SHOULDER_HEIGHT_SEVERITY_SCALE,
            "Level your shoulders",
            format!("Height difference: {shoulder_height_diff:.3}"),
        ));
    }

    let forward_lean = shoulder_mid.z - hip_mid.z;
    if forward_lean > FORWARD_HEAD_THRESHOLD {
        issues.push(Issue::new(
            IssueKind::ForwardHead,
            FORWARD_HEAD_SEVERITY,
            "Straighten your back, pull shoulders back",
            format!("Forward lean: {forward_lean:.3}"),
        ));
    }

    let nose_to_shoulder_dist = (lm.nose.x - shoulder_mid.x).abs();
    let nose_excess = nose_to_shoulder_dist - IDEAL_NOSE_TO_SHOULDER_DIST;
    if nose_excess > 0.0 {
        issues.push(Issue::new(
            IssueKind::Slouching,
            nose_excess * SLOUCH_SEVERITY_SCALE,
            "Chin back slightly",
            format!("Head forward by: {nose_excess:.3}"),
        ));
    }

    let neck_angle = angle_signed(lm.left_ear, &shoulder_mid, lm.right_ear);
    if neck_angle > NECK_TILT_THRESHOLD_DEG {
        issues.push(Issue::new(
            IssueKind::ExtremeNeckTilt,
            (neck_angle - NECK_TILT_THRESHOLD_DEG) / NECK_TILT_SEVERITY_DIVISOR,
            "Try raising your screen height",
            format!("Tilt angle: {neck_angle:.1}°"),
        ));
    }

    // Reference point straight above the hips
    let vertical = Landmark::new(hip_mid.x, hip_mid.y - SPINE_REFERENCE_OFFSET, hip_mid.z);
    let spine_angle = angle_signed(&shoulder_mid, &hip_mid, &vertical);

    // Overlaps with the forward head rule on the same depth signal
    if spine_angle > SPINE_ANGLE_THRESHOLD_DEG || forward_lean > FORWARD_LEAN_THRESHOLD {
        let message = if spine_angle > SPINE_ANGLE_THRESHOLD_DEG {
            "Straighten your spine"
        } else {
            "Pull shoulders back"
        };
        issues.push(Issue::new(
            IssueKind::SlouchingForwardLean,
            (spine_angle / SPINE_ANGLE_SEVERITY_DIVISOR).max(forward_lean * FORWARD_LEAN_SEVERITY_SCALE),
            message,
            format!("Spine angle: {spine_angle:.1}°, Forward lean: {forward_lean:.3}"),
        ));
    }

    let shoulder_roll = (lm.left_shoulder.z + lm.right_shoulder.z) / 2.0 - hip_mid.z;
    if shoulder_roll > SHOULDER_ROLL_THRESHOLD {
        issues.push(Issue::new(
            IssueKind::RoundedShoulders,
            shoulder_roll * SHOULDER_ROLL_SEVERITY_SCALE,
            "Pull shoulders back and down",
            format!("Shoulder roll: {shoulder_roll:.3}"),
        ));
    }

    let status = if issues.is_empty() {
        FrameStatus::Good
    } else {
        FrameStatus::NeedsAttention
    };

    Some(FrameVerdict {
        status,
        issues,
        measurements: Measurements {
            spine_angle_deg: spine_angle,
            forward_lean,
            shoulder_roll,
            nose_to_shoulder_dist,
            shoulder_height_diff,
            neck_angle_deg: neck_angle,
        }
        .rounded(),
    })
}
