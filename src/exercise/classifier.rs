use crate::{
    constants::{
        ELBOW_STRAIGHT_DEG, LEFT_ELBOW, LEFT_SHOULDER, LEFT_WRIST, NOSE, OVERHEAD_MARGIN, RIGHT_ELBOW,
        RIGHT_SHOULDER, RIGHT_WRIST, SHOULDER_LEVEL_BAND, WIDE_ARMS_RATIO,
    },
    geometry::{angle_unsigned, distance_2d},
    landmarks::{Landmark, PoseFrame},
};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of stretch being performed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum StretchKind {
    #[default]
    None,
    /// Both straight arms above the head
    Overhead,
    /// Both straight arms out to the sides at shoulder height
    Lateral,
}

impl fmt::Display for StretchKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => f.write_str("none"),
            Self::Overhead => f.write_str("overhead"),
            Self::Lateral => f.write_str("T-pose"),
        }
    }
}

/// Classification of one frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StretchReading {
    pub stretching: bool,
    pub kind: StretchKind,
    pub message: String,
}

impl StretchReading {
    fn idle(message: &str) -> Self {
        Self {
            stretching: false,
            kind: StretchKind::None,
            message: message.to_string(),
        }
    }

    fn stretch(kind: StretchKind, message: &str) -> Self {
        Self {
            stretching: true,
            kind,
            message: message.to_string(),
        }
    }

    /// Whether the reading was produced without the required landmarks
    #[must_use]
    pub fn is_missing_landmarks(&self) -> bool {
        self.message == MISSING_LANDMARKS
    }
}

const MISSING_LANDMARKS: &str = "Missing landmarks";

struct Arm<'a> {
    shoulder: &'a Landmark,
    elbow: &'a Landmark,
    wrist: &'a Landmark,
}

impl<'a> Arm<'a> {
    fn from_frame(frame: &'a PoseFrame, shoulder: usize, elbow: usize, wrist: usize) -> Option<Self> {
        Some(Self {
            shoulder: frame.get(shoulder)?,
            elbow: frame.get(elbow)?,
            wrist: frame.get(wrist)?,
        })
    }

    fn is_straight(&self) -> bool {
        angle_unsigned(self.shoulder, self.elbow, self.wrist) > ELBOW_STRAIGHT_DEG
    }

    fn wrist_overhead(&self, nose: &Landmark) -> bool {
        // Image y grows downward
        self.wrist.y < nose.y - OVERHEAD_MARGIN
    }

    fn wrist_at_shoulder_level(&self) -> bool {
        (self.wrist.y - self.shoulder.y).abs() < SHOULDER_LEVEL_BAND
    }
}

/// Classify the arm stretch in one frame.
///
/// Overhead is checked before lateral and wins when both hold. Frames
/// without nose, shoulders, elbows and wrists give a non-stretching
/// "missing landmarks" reading.
#[must_use]
pub fn classify(frame: &PoseFrame) -> StretchReading {
    let parts = (
        frame.get(NOSE),
        Arm::from_frame(frame, LEFT_SHOULDER, LEFT_ELBOW, LEFT_WRIST),
        Arm::from_frame(frame, RIGHT_SHOULDER, RIGHT_ELBOW, RIGHT_WRIST),
    );
    let (Some(nose), Some(left), Some(right)) = parts else {
        return StretchReading::idle(MISSING_LANDMARKS);
    };

    let elbows_straight = left.is_straight() && right.is_straight();

    if elbows_straight && left.wrist_overhead(nose) && right.wrist_overhead(nose) {
        return StretchReading::stretch(StretchKind::Overhead, "Overhead stretch detected, hold it");
    }

    let wrist_span = distance_2d(left.wrist, right.wrist);
    let shoulder_span = distance_2d(left.shoulder, right.shoulder);
    let wrists_wide = wrist_span > WIDE_ARMS_RATIO * shoulder_span;

    if elbows_straight && left.wrist_at_shoulder_level() && right.wrist_at_shoulder_level() && wrists_wide {
        return StretchReading::stretch(StretchKind::Lateral, "T-pose stretch detected, hold it");
    }

    StretchReading::idle("Raise both arms overhead or out to the sides")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::NUM_BODY_LANDMARKS;

    fn base() -> Vec<Landmark> {
        let mut points = vec![Landmark::new(0.5, 0.5, 0.0); NUM_BODY_LANDMARKS];
        points[NOSE] = Landmark::new(0.5, 0.3, 0.0);
        points[LEFT_SHOULDER] = Landmark::new(0.4, 0.45, 0.0);
        points[RIGHT_SHOULDER] = Landmark::new(0.6, 0.45, 0.0);
        points
    }

    fn overhead() -> Vec<Landmark> {
        let mut points = base();
        points[LEFT_ELBOW] = Landmark::new(0.4, 0.3, 0.0);
        points[LEFT_WRIST] = Landmark::new(0.4, 0.15, 0.0);
        points[RIGHT_ELBOW] = Landmark::new(0.6, 0.3, 0.0);
        points[RIGHT_WRIST] = Landmark::new(0.6, 0.15, 0.0);
        points
    }

    fn t_pose() -> Vec<Landmark> {
        let mut points = base();
        points[LEFT_ELBOW] = Landmark::new(0.3, 0.45, 0.0);
        points[LEFT_WRIST] = Landmark::new(0.2, 0.46, 0.0);
        points[RIGHT_ELBOW] = Landmark::new(0.7, 0.45, 0.0);
        points[RIGHT_WRIST] = Landmark::new(0.8, 0.46, 0.0);
        points
    }

    #[test]
    fn test_overhead() {
        let reading = classify(&PoseFrame::new(overhead()));
        assert!(reading.stretching);
        assert_eq!(reading.kind, StretchKind::Overhead);
    }

    #[test]
    fn test_lateral() {
        let reading = classify(&PoseFrame::new(t_pose()));
        assert!(reading.stretching);
        assert_eq!(reading.kind, StretchKind::Lateral);
    }

    #[test]
    fn test_narrow_t_pose_is_not_lateral() {
        let mut points = t_pose();
        // Wrist span 0.3 is below 1.6 * shoulder span 0.2
        points[LEFT_ELBOW] = Landmark::new(0.375, 0.45, 0.0);
        points[LEFT_WRIST] = Landmark::new(0.35, 0.45, 0.0);
        points[RIGHT_ELBOW] = Landmark::new(0.625, 0.45, 0.0);
        points[RIGHT_WRIST] = Landmark::new(0.65, 0.45, 0.0);
        assert!(!classify(&PoseFrame::new(points)).stretching);
    }

    #[test]
    fn test_bent_elbow_is_not_stretching() {
        let mut points = overhead();
        points[LEFT_ELBOW] = Landmark::new(0.3, 0.3, 0.0);
        let reading = classify(&PoseFrame::new(points));
        assert!(!reading.stretching);
        assert_eq!(reading.kind, StretchKind::None);
        assert!(!reading.is_missing_landmarks());
    }

    #[test]
    fn test_missing_landmarks() {
        let mut points = overhead();
        points.truncate(LEFT_WRIST);
        let reading = classify(&PoseFrame::new(points));
        assert!(!reading.stretching);
        assert!(reading.is_missing_landmarks());
    }
}
