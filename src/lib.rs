//! Posture and stretch-exercise monitoring from body landmarks.
//!
//! This library turns the per-frame output of an external body pose model
//! (33 normalized landmarks per detected person) into posture feedback:
//! - Geometric rules classify each frame's posture or arm stretch
//! - A fill-then-flush window smooths posture verdicts over time
//! - A session tracker accumulates good/bad time, streaks and reminders
//! - A hold tracker counts completed stretch repetitions
//!
//! The pipeline consists of:
//! 1. [`posture::classify`] or [`exercise::classify`] on every frame
//! 2. Sampling once per interval into [`smoothing::SampleWindow`]
//! 3. [`session::SessionTracker`] / [`exercise::ExerciseTracker`] updates
//! 4. Status values delivered to a [`notify::NotificationSink`]
//!
//! # Examples
//!
//! ## Classifying a Frame
//!
//! ```
//! use posture_monitor::{landmarks::{Landmark, PoseFrame}, posture};
//!
//! let mut points = vec![Landmark::new(0.5, 0.5, 0.0); 33];
//! points[0] = Landmark::new(0.5, 0.2, 0.0);   // nose
//! points[7] = Landmark::new(0.49, 0.15, 0.0); // left ear
//! points[8] = Landmark::new(0.51, 0.15, 0.0); // right ear
//! points[11] = Landmark::new(0.4, 0.4, 0.0);  // left shoulder
//! points[12] = Landmark::new(0.6, 0.5, 0.0);  // right shoulder
//! points[23] = Landmark::new(0.42, 0.8, 0.0); // left hip
//! points[24] = Landmark::new(0.58, 0.8, 0.0); // right hip
//!
//! let verdict = posture::classify(&PoseFrame::new(points)).unwrap();
//! for issue in &verdict.issues {
//!     println!("{}: {} ({})", issue.kind, issue.message, issue.measurements_text);
//! }
//! ```
//!
//! ## Running a Session
//!
//! ```no_run
//! use posture_monitor::{
//!     config::Config,
//!     monitor::{JsonlPoseSource, Monitor},
//!     notify::LogSink,
//! };
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config::default();
//! let mut source = JsonlPoseSource::open("session.jsonl")?;
//! let mut monitor = Monitor::new(&config, LogSink, 0)?;
//! monitor.run(&mut source)?;
//! println!("{}", monitor.stats().summary());
//! # Ok(())
//! # }
//! ```

/// Body landmark types
pub mod landmarks;

/// Angle and distance primitives
pub mod geometry;

/// Per-frame posture rules
pub mod posture;

/// Arm-stretch classification and repetition tracking
pub mod exercise;

/// Fill-then-flush smoothing window
pub mod smoothing;

/// Session statistics and timed reminders
pub mod session;

/// Notification status values and sinks
pub mod notify;

/// Tray icon state
pub mod tray;

/// Monitoring session orchestration
pub mod monitor;

/// Rounding and formatting helpers
pub mod utils;

/// Error types and result handling
pub mod error;

/// Constants used throughout the application
pub mod constants;

/// Configuration management
pub mod config;

pub use error::{Error, Result};
