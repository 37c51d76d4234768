//! Body landmark types consumed from the external pose model.
//!
//! A [`PoseFrame`] holds the landmarks of one detected body in normalized
//! image coordinates: `x` and `y` in `[0, 1]` relative to the frame size
//! (y grows downward), `z` a relative depth estimate.

use crate::constants::{MIN_VISIBILITY, NUM_BODY_LANDMARKS};
use serde::{Deserialize, Serialize};

/// A single tracked anatomical point
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Landmark {
    /// Horizontal position (0 = left edge, 1 = right edge)
    pub x: f64,
    /// Vertical position (0 = top edge, 1 = bottom edge)
    pub y: f64,
    /// Relative depth, smaller is closer to the camera
    #[serde(default)]
    pub z: f64,
    /// Detector confidence in `[0, 1]`
    #[serde(default = "default_visibility")]
    pub visibility: f64,
}

fn default_visibility() -> f64 {
    1.0
}

impl Landmark {
    /// Create a fully visible landmark
    #[must_use]
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self {
            x,
            y,
            z,
            visibility: 1.0,
        }
    }

    /// Set the detector confidence
    #[must_use]
    pub const fn with_visibility(mut self, visibility: f64) -> Self {
        self.visibility = visibility;
        self
    }

    /// Whether the point passes the drawing confidence gate
    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.visibility >= MIN_VISIBILITY
    }

    fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }

    /// Elementwise mean of two landmarks
    #[must_use]
    pub fn midpoint(&self, other: &Self) -> Self {
        Self {
            x: (self.x + other.x) / 2.0,
            y: (self.y + other.y) / 2.0,
            z: (self.z + other.z) / 2.0,
            visibility: self.visibility.min(other.visibility),
        }
    }
}

/// Skeleton connections between landmark indices
pub const SKELETON_CONNECTIONS: [(usize, usize); 22] = [
    (11, 12), (11, 23), (12, 24), (23, 24),
    (11, 13), (13, 15), (15, 17), (15, 19), (15, 21),
    (12, 14), (14, 16), (16, 18), (16, 20), (16, 22),
    (23, 25), (25, 27), (27, 29), (29, 31),
    (24, 26), (26, 28), (28, 30), (30, 32),
];

/// Landmarks of one detected body in one video frame
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PoseFrame {
    points: Vec<Landmark>,
}

impl PoseFrame {
    /// Wrap the landmark array produced by the pose model.
    ///
    /// Points beyond the 33rd are dropped.
    #[must_use]
    pub fn new(mut points: Vec<Landmark>) -> Self {
        points.truncate(NUM_BODY_LANDMARKS);
        Self { points }
    }

    /// Landmark at `index`, or `None` when it was not supplied or is not finite
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Landmark> {
        self.points.get(index).filter(|p| p.is_finite())
    }

    /// All supplied points in model order
    #[must_use]
    pub fn landmarks(&self) -> &[Landmark] {
        &self.points
    }

    /// Number of supplied points
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether no points were supplied
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Skeleton segments whose endpoints are both visible
    pub fn skeleton_segments(&self) -> impl Iterator<Item = (&Landmark, &Landmark)> + '_ {
        SKELETON_CONNECTIONS.iter().filter_map(move |&(a, b)| {
            let pa = self.get(a)?;
            let pb = self.get(b)?;
            (pa.is_visible() && pb.is_visible()).then_some((pa, pb))
        })
    }
}
