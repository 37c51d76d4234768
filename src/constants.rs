//! Constants used throughout the application

/// Number of landmarks produced per detected body
pub const NUM_BODY_LANDMARKS: usize = 33;

/// Landmark indices
pub const NOSE: usize = 0;
pub const LEFT_EAR: usize = 7;
pub const RIGHT_EAR: usize = 8;
pub const LEFT_SHOULDER: usize = 11;
pub const RIGHT_SHOULDER: usize = 12;
pub const LEFT_ELBOW: usize = 13;
pub const RIGHT_ELBOW: usize = 14;
pub const LEFT_WRIST: usize = 15;
pub const RIGHT_WRIST: usize = 16;
pub const LEFT_HIP: usize = 23;
pub const RIGHT_HIP: usize = 24;

/// Minimum visibility for a landmark to be drawn
pub const MIN_VISIBILITY: f64 = 0.5;

/// Numeric precision epsilon for vector lengths
pub const EPSILON: f64 = 1e-6;

/// Posture rule: shoulder height difference threshold and severity scale
pub const SHOULDER_HEIGHT_DIFF_THRESHOLD: f64 = 0.08;
pub const SHOULDER_HEIGHT_SEVERITY_SCALE: f64 = 15.0;

/// Posture rule: forward head lean threshold and fixed severity
pub const FORWARD_HEAD_THRESHOLD: f64 = 0.005;
pub const FORWARD_HEAD_SEVERITY: f64 = 8.0;

/// Posture rule: ideal horizontal nose offset from the shoulder midpoint
pub const IDEAL_NOSE_TO_SHOULDER_DIST: f64 = 0.05;
pub const SLOUCH_SEVERITY_SCALE: f64 = 15.0;

/// Posture rule: neck tilt angle threshold (degrees) and severity divisor
pub const NECK_TILT_THRESHOLD_DEG: f64 = 35.0;
pub const NECK_TILT_SEVERITY_DIVISOR: f64 = 10.0;

/// Posture rule: spine angle / forward lean combined check
pub const SPINE_ANGLE_THRESHOLD_DEG: f64 = 15.0;
pub const SPINE_ANGLE_SEVERITY_DIVISOR: f64 = 15.0;
pub const FORWARD_LEAN_THRESHOLD: f64 = 0.1;
pub const FORWARD_LEAN_SEVERITY_SCALE: f64 = 10.0;

/// Vertical offset of the spine reference point above the hip midpoint
pub const SPINE_REFERENCE_OFFSET: f64 = 0.5;

/// Posture rule: rounded shoulder threshold and severity scale
pub const SHOULDER_ROLL_THRESHOLD: f64 = 0.08;
pub const SHOULDER_ROLL_SEVERITY_SCALE: f64 = 10.0;

/// Exercise rule: minimum elbow angle for a straight arm (degrees)
pub const ELBOW_STRAIGHT_DEG: f64 = 160.0;

/// Exercise rule: wrists must be this far above the nose
pub const OVERHEAD_MARGIN: f64 = 0.02;

/// Exercise rule: maximum vertical wrist/shoulder offset for a T-pose
pub const SHOULDER_LEVEL_BAND: f64 = 0.08;

/// Exercise rule: wrist span must exceed shoulder span by this factor
pub const WIDE_ARMS_RATIO: f64 = 1.6;

/// Default sample interval for the smoothing window (ms)
pub const DEFAULT_CHECK_INTERVAL_MS: u64 = 1000;

/// Default smoothing window capacity
pub const DEFAULT_WINDOW_CAPACITY: usize = 30;

/// Default fraction of samples an issue must exceed to persist
pub const DEFAULT_PERSISTENCE_RATIO: f64 = 0.7;

/// Default periodic stretch reminder (s)
pub const DEFAULT_STRETCH_REMINDER_SECS: u64 = 60;

/// Default open-streak age that raises a sustained alert (s)
pub const DEFAULT_SUSTAINED_BAD_SECS: u64 = 30;

/// Default startup wait for the pose source (ms)
pub const DEFAULT_STARTUP_TIMEOUT_MS: u64 = 10_000;

/// Default tray stickiness (ms)
pub const DEFAULT_TRAY_STICK_MS: u64 = 4000;

/// Score assumed when no session time has elapsed
pub const PERFECT_SCORE: u32 = 100;
