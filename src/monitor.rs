//! Monitoring session orchestration.
//!
//! A [`Monitor`] owns every piece of per-session state (sample gate,
//! smoothing window, session statistics, exercise tracker, tray icon) and
//! the notification sink. Frames arrive through [`Monitor::process_frame`]
//! at render rate; [`Monitor::tick`] drives the coarse 1 Hz updates.

use crate::{
    config::{Config, Mode},
    exercise::{self, ExerciseState, ExerciseTracker, StretchReading},
    landmarks::PoseFrame,
    notify::{NotificationSink, PostureStatus},
    posture::{self, FrameVerdict},
    session::{SessionStats, SessionTracker},
    smoothing::{AggregatedVerdict, SampleGate, SampleWindow},
    tray::TrayIndicator,
    Error, Result,
};
use log::{debug, info, warn};
use serde::Deserialize;
use std::{
    fs::File,
    io::{BufRead, BufReader},
    path::Path,
    thread,
    time::{Duration, Instant},
};

/// Interval of the coarse session tick (ms)
pub const TICK_INTERVAL_MS: u64 = 1000;

const READY_POLL: Duration = Duration::from_millis(10);

/// One frame from a pose source
#[derive(Debug, Clone, PartialEq)]
pub struct TimedFrame {
    /// Capture time (ms)
    pub t_ms: u64,
    /// Detected body, `None` when nobody was detected
    pub landmarks: Option<PoseFrame>,
}

/// Producer of pose frames (camera plus pose model, or a recording)
pub trait PoseSource {
    /// Whether the source can deliver frames
    fn is_ready(&mut self) -> bool;

    /// Next frame, or `None` at end of stream
    fn next_frame(&mut self) -> Result<Option<TimedFrame>>;
}

#[derive(Deserialize)]
struct RecordedFrame {
    t_ms: u64,
    #[serde(default)]
    landmarks: Option<PoseFrame>,
}

/// Pose source reading one JSON object per line:
/// `{"t_ms": 1000, "landmarks": [{"x":..,"y":..,"z":..,"visibility":..}, ...]}`
pub struct JsonlPoseSource<R> {
    reader: R,
    line_no: usize,
}

impl JsonlPoseSource<BufReader<File>> {
    /// Open a recording file
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)
            .map_err(|e| Error::SourceError(format!("Cannot open {}: {e}", path.display())))?;
        info!("Opened pose recording: {}", path.display());
        Ok(Self::new(BufReader::new(file)))
    }
}

impl<R: BufRead> JsonlPoseSource<R> {
    pub fn new(reader: R) -> Self {
        Self { reader, line_no: 0 }
    }
}

impl<R: BufRead> PoseSource for JsonlPoseSource<R> {
    fn is_ready(&mut self) -> bool {
        true
    }

    fn next_frame(&mut self) -> Result<Option<TimedFrame>> {
        let mut line = String::new();
        loop {
            line.clear();
            if self.reader.read_line(&mut line)? == 0 {
                return Ok(None);
            }
            self.line_no += 1;
            if !line.trim().is_empty() {
                break;
            }
        }

        let recorded: RecordedFrame = serde_json::from_str(&line)
            .map_err(|e| Error::FrameParse(format!("line {}: {e}", self.line_no)))?;

        Ok(Some(TimedFrame {
            t_ms: recorded.t_ms,
            landmarks: recorded.landmarks,
        }))
    }
}

/// Block until `source` is ready or `timeout` elapses
pub fn wait_until_ready(source: &mut dyn PoseSource, timeout: Duration) -> Result<()> {
    let start = Instant::now();
    loop {
        if source.is_ready() {
            return Ok(());
        }
        if start.elapsed() >= timeout {
            #[allow(clippy::cast_possible_truncation)] // timeouts are seconds, not centuries
            return Err(Error::StartupTimeout(timeout.as_millis() as u64));
        }
        thread::sleep(READY_POLL);
    }
}

/// Lifecycle state of the monitor
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MonitorState {
    Idle,
    Running,
    Stopped,
    /// Startup failed; the session never ran
    Failed(String),
}

/// Forwards statuses to the sink while keeping the tray icon in step
struct Dispatch<'a, S> {
    sink: &'a mut S,
    tray: &'a mut TrayIndicator,
    now_ms: u64,
}

impl<S: NotificationSink> NotificationSink for Dispatch<'_, S> {
    fn notify(&mut self, status: PostureStatus) {
        if self.tray.apply(status, self.now_ms) {
            debug!("Tray icon now {:?}", self.tray.icon());
        }
        self.sink.notify(status);
    }
}

/// One monitoring session
pub struct Monitor<S> {
    mode: Mode,
    startup_timeout: Duration,
    state: MonitorState,
    gate: SampleGate,
    window: SampleWindow,
    session: SessionTracker,
    exercise: ExerciseTracker,
    tray: TrayIndicator,
    sink: S,
    last_verdict: Option<FrameVerdict>,
    last_aggregated: Option<AggregatedVerdict>,
    last_stretch: Option<StretchReading>,
}

impl<S: NotificationSink> Monitor<S> {
    /// Create a monitor whose session starts at `now_ms`
    pub fn new(config: &Config, sink: S, now_ms: u64) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            mode: config.monitor.mode,
            startup_timeout: Duration::from_millis(config.monitor.startup_timeout_ms),
            state: MonitorState::Idle,
            gate: SampleGate::new(config.smoothing.check_interval_ms),
            window: SampleWindow::new(config.smoothing.window_capacity, config.smoothing.persistence_ratio),
            session: SessionTracker::with_timings(
                now_ms,
                config.session.stretch_reminder_secs * 1000,
                config.session.sustained_bad_secs * 1000,
            ),
            exercise: ExerciseTracker::new(),
            tray: TrayIndicator::new(config.tray.stick_ms),
            sink,
            last_verdict: None,
            last_aggregated: None,
            last_stretch: None,
        })
    }

    /// Wait for the source and begin monitoring.
    ///
    /// A source that is not ready within the startup timeout fails the
    /// session; there is no retry.
    pub fn start(&mut self, source: &mut dyn PoseSource) -> Result<()> {
        info!("Starting {:?} monitoring", self.mode);
        match wait_until_ready(source, self.startup_timeout) {
            Ok(()) => {
                self.state = MonitorState::Running;
                Ok(())
            }
            Err(e) => {
                warn!("Monitoring failed to start: {}", e);
                self.state = MonitorState::Failed(e.to_string());
                Err(e)
            }
        }
    }

    /// Handle one frame. Frames without a detection are ignored.
    pub fn process_frame(&mut self, landmarks: Option<&PoseFrame>, now_ms: u64) {
        if self.state != MonitorState::Running {
            return;
        }
        let Some(frame) = landmarks else {
            return;
        };

        match self.mode {
            Mode::Posture => self.process_posture(frame, now_ms),
            Mode::Exercise => self.process_exercise(frame, now_ms),
        }
    }

    fn process_posture(&mut self, frame: &PoseFrame, now_ms: u64) {
        let Some(verdict) = posture::classify(frame) else {
            debug!("Posture landmarks missing at {} ms", now_ms);
            return;
        };

        if self.gate.try_take(now_ms) {
            let mut dispatch = Dispatch {
                sink: &mut self.sink,
                tray: &mut self.tray,
                now_ms,
            };
            self.session.record_verdict(&verdict, now_ms, &mut dispatch);
            self.window.submit(verdict.clone());

            if self.window.is_full() {
                let aggregated = self.window.aggregate();
                info!(
                    "{} over {} samples ({} persistent issues)",
                    aggregated.status,
                    aggregated.sample_count,
                    aggregated.issues.len()
                );
                dispatch.notify(aggregated.status.into());
                self.last_aggregated = Some(aggregated);
            }
        }

        self.last_verdict = Some(verdict);
    }

    fn process_exercise(&mut self, frame: &PoseFrame, now_ms: u64) {
        let reading = exercise::classify(frame);

        if self.gate.try_take(now_ms) {
            if let Some(rep) = self.exercise.update(&reading, now_ms) {
                debug!("Completed {:?} rep {} ({} ms)", rep.kind, rep.rep, rep.hold_ms);
            }
        }

        self.last_stretch = Some(reading);
    }

    /// Coarse periodic update of session statistics and reminders
    pub fn tick(&mut self, now_ms: u64) {
        if self.state != MonitorState::Running {
            return;
        }
        let mut dispatch = Dispatch {
            sink: &mut self.sink,
            tray: &mut self.tray,
            now_ms,
        };
        self.session.tick(now_ms, &mut dispatch);
    }

    /// Halt monitoring. Session state is kept until [`Monitor::reset`].
    pub fn stop(&mut self, now_ms: u64) {
        if self.state != MonitorState::Running {
            return;
        }
        self.state = MonitorState::Stopped;
        self.gate.reset();
        info!("Monitoring stopped: {}", self.session.stats().summary());
        let mut dispatch = Dispatch {
            sink: &mut self.sink,
            tray: &mut self.tray,
            now_ms,
        };
        dispatch.notify(PostureStatus::SessionEnded);
    }

    /// Discard all session state and start counting again from `now_ms`
    pub fn reset(&mut self, now_ms: u64) {
        self.session.reset(now_ms);
        self.exercise.reset();
        self.window.clear();
        self.gate.reset();
        self.last_verdict = None;
        self.last_aggregated = None;
        self.last_stretch = None;
    }

    /// Drive the monitor from `source` until it is exhausted.
    ///
    /// Frame timestamps act as the clock: the session restarts at the first
    /// frame's timestamp and ticks once per [`TICK_INTERVAL_MS`] of stream time.
    pub fn run(&mut self, source: &mut dyn PoseSource) -> Result<()> {
        self.start(source)?;

        let mut last_tick: Option<u64> = None;
        let mut last_t = 0;
        while let Some(frame) = source.next_frame()? {
            if last_tick.is_none() {
                debug!("Stream clock starts at {} ms", frame.t_ms);
                self.session.reset(frame.t_ms);
            }
            last_t = frame.t_ms;
            self.process_frame(frame.landmarks.as_ref(), frame.t_ms);

            if last_tick.map_or(true, |t| frame.t_ms.saturating_sub(t) >= TICK_INTERVAL_MS) {
                self.tick(frame.t_ms);
                last_tick = Some(frame.t_ms);
            }
        }

        self.tick(last_t);
        self.stop(last_t);
        Ok(())
    }

    #[must_use]
    pub fn mode(&self) -> Mode {
        self.mode
    }

    #[must_use]
    pub fn state(&self) -> &MonitorState {
        &self.state
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.state == MonitorState::Running
    }

    #[must_use]
    pub fn stats(&self) -> &SessionStats {
        self.session.stats()
    }

    #[must_use]
    pub fn exercise_state(&self) -> &ExerciseState {
        self.exercise.state()
    }

    /// Most recent per-frame posture verdict
    #[must_use]
    pub fn last_verdict(&self) -> Option<&FrameVerdict> {
        self.last_verdict.as_ref()
    }

    /// Most recent aggregated window verdict
    #[must_use]
    pub fn last_aggregated(&self) -> Option<&AggregatedVerdict> {
        self.last_aggregated.as_ref()
    }

    /// Most recent stretch reading
    #[must_use]
    pub fn last_stretch(&self) -> Option<&StretchReading> {
        self.last_stretch.as_ref()
    }

    /// Samples waiting in the smoothing window
    #[must_use]
    pub fn pending_samples(&self) -> usize {
        self.window.len()
    }

    #[must_use]
    pub fn tray(&self) -> &TrayIndicator {
        &self.tray
    }

    #[must_use]
    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::RecordingSink;
    use std::io::Cursor;

    struct NeverReady;

    impl PoseSource for NeverReady {
        fn is_ready(&mut self) -> bool {
            false
        }

        fn next_frame(&mut self) -> Result<Option<TimedFrame>> {
            Ok(None)
        }
    }

    #[test]
    fn test_startup_timeout() {
        let mut config = Config::default();
        config.monitor.startup_timeout_ms = 30;
        let mut monitor = Monitor::new(&config, RecordingSink::new(), 0).unwrap();

        let err = monitor.start(&mut NeverReady).unwrap_err();
        assert!(matches!(err, Error::StartupTimeout(30)));
        assert!(matches!(monitor.state(), MonitorState::Failed(_)));

        // Frames are ignored when the session never started
        monitor.process_frame(Some(&PoseFrame::default()), 0);
        assert_eq!(monitor.pending_samples(), 0);
    }

    #[test]
    fn test_jsonl_source() {
        let data = "{\"t_ms\": 0, \"landmarks\": null}\n\n{\"t_ms\": 33, \"landmarks\": [{\"x\":0.5,\"y\":0.5}]}\n";
        let mut source = JsonlPoseSource::new(Cursor::new(data));

        let first = source.next_frame().unwrap().unwrap();
        assert_eq!(first.t_ms, 0);
        assert!(first.landmarks.is_none());

        let second = source.next_frame().unwrap().unwrap();
        assert_eq!(second.landmarks.unwrap().len(), 1);

        assert!(source.next_frame().unwrap().is_none());
    }

    #[test]
    fn test_jsonl_source_bad_line() {
        let mut source = JsonlPoseSource::new(Cursor::new("{\"t_ms\": \"soon\"}\n"));
        assert!(matches!(source.next_frame(), Err(Error::FrameParse(_))));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut config = Config::default();
        config.smoothing.window_capacity = 0;
        assert!(Monitor::new(&config, RecordingSink::new(), 0).is_err());
    }
}
