use super::classifier::{StretchKind, StretchReading};
use log::{debug, info};
use serde::{Deserialize, Serialize};

/// Read-only view of the exercise tracker
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ExerciseState {
    pub is_holding: bool,
    pub hold_start_ms: Option<u64>,
    /// Age of the current hold
    pub hold_ms: u64,
    pub completed_reps: u32,
    pub current_kind: StretchKind,
    /// Duration of the most recently completed hold
    pub last_hold_ms: u64,
    pub last_message: String,
}

/// A repetition finished on a holding to idle transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompletedRep {
    /// Repetition number, starting at 1
    pub rep: u32,
    pub kind: StretchKind,
    pub hold_ms: u64,
}

/// Two-state (idle / holding) stretch repetition counter
#[derive(Debug, Clone, Default)]
pub struct ExerciseTracker {
    state: ExerciseState,
}

impl ExerciseTracker {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn state(&self) -> &ExerciseState {
        &self.state
    }

    /// Feed one per-interval reading.
    ///
    /// Returns the finished repetition when a hold ends.
    pub fn update(&mut self, reading: &StretchReading, now_ms: u64) -> Option<CompletedRep> {
        let state = &mut self.state;

        match (state.hold_start_ms, reading.stretching) {
            (None, true) => {
                state.is_holding = true;
                state.hold_start_ms = Some(now_ms);
                state.hold_ms = 0;
                state.current_kind = reading.kind;
                state.last_message = reading.message.clone();
                debug!("Started {} hold at {} ms", reading.kind, now_ms);
                None
            }
            (Some(start), true) => {
                state.hold_ms = now_ms.saturating_sub(start);
                state.current_kind = reading.kind;
                #[allow(clippy::cast_precision_loss)]
                let secs = state.hold_ms as f64 / 1000.0;
                state.last_message = format!("Holding {} stretch: {secs:.1}s", reading.kind);
                None
            }
            (Some(start), false) => {
                let hold_ms = now_ms.saturating_sub(start);
                let kind = state.current_kind;
                state.completed_reps += 1;
                state.last_hold_ms = hold_ms;
                #[allow(clippy::cast_precision_loss)]
                let secs = hold_ms as f64 / 1000.0;
                state.last_message = format!("Rep {} complete: held {secs:.1}s", state.completed_reps);
                state.is_holding = false;
                state.hold_start_ms = None;
                state.hold_ms = 0;
                state.current_kind = StretchKind::None;
                info!("{}", state.last_message);

                Some(CompletedRep {
                    rep: state.completed_reps,
                    kind,
                    hold_ms,
                })
            }
            (None, false) => {
                state.last_message = reading.message.clone();
                None
            }
        }
    }

    /// Return to idle and zero the repetition count
    pub fn reset(&mut self) {
        self.state = ExerciseState::default();
    }
}
