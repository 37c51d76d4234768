//! Arm-stretch exercise detection.
//!
//! [`classifier`] inspects one frame for an overhead or lateral (T-pose)
//! stretch. [`tracker`] turns the stream of per-interval readings into
//! holds and completed repetitions.

/// Per-frame stretch classification
pub mod classifier;

/// Hold and repetition state machine
pub mod tracker;

pub use classifier::{classify, StretchKind, StretchReading};
pub use tracker::{CompletedRep, ExerciseState, ExerciseTracker};
