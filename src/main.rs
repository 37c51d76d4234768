//! Posture monitor: replays a recorded landmark stream through a monitoring session.

use anyhow::{Context, Result};
use clap::Parser;
use log::{info, warn};
use posture_monitor::{
    config::{Config, Mode, EXAMPLE_CONFIG},
    monitor::{JsonlPoseSource, Monitor},
    notify::{LogSink, NotificationSink, PostureStatus, RecordingSink},
};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Recorded landmark stream (one JSON frame per line)
    #[arg(short, long, required_unless_present = "print_config")]
    input: Option<String>,

    /// Classifier to run (posture, exercise)
    #[arg(short, long)]
    mode: Option<String>,

    /// Path to configuration file (YAML format)
    #[arg(short = 'C', long)]
    config: Option<String>,

    /// Enable debug output
    #[arg(short, long)]
    debug: bool,

    /// Print an example configuration and exit
    #[arg(long)]
    print_config: bool,
}

/// Logs each status and keeps a copy for the summary
#[derive(Default)]
struct ReportingSink {
    log: LogSink,
    record: RecordingSink,
}

impl NotificationSink for ReportingSink {
    fn notify(&mut self, status: PostureStatus) {
        self.log.notify(status);
        self.record.notify(status);
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    if args.debug {
        env_logger::init_from_env(env_logger::Env::new().default_filter_or("debug"));
    } else {
        env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));
    }

    if args.print_config {
        print!("{EXAMPLE_CONFIG}");
        return Ok(());
    }

    info!("Posture Monitor");

    let mut config = if let Some(config_path) = &args.config {
        info!("Loading configuration from: {}", config_path);
        match Config::from_file(config_path) {
            Ok(cfg) => cfg,
            Err(e) => {
                warn!("Failed to load config file: {}. Using defaults.", e);
                Config::default()
            }
        }
    } else {
        Config::default()
    };

    if let Some(mode) = &args.mode {
        config.monitor.mode = match mode.parse::<Mode>() {
            Ok(mode) => mode,
            Err(e) => {
                warn!("{}. Using posture.", e);
                Mode::Posture
            }
        };
    }

    let input = args.input.context("--input is required")?;
    let mut source = JsonlPoseSource::open(&input)?;
    let mut monitor = Monitor::new(&config, ReportingSink::default(), 0)?;
    monitor
        .run(&mut source)
        .with_context(|| format!("Failed to replay {input}"))?;

    match monitor.mode() {
        Mode::Posture => {
            if let Some(aggregated) = monitor.last_aggregated() {
                info!("Last window: {}", aggregated.status);
                for issue in &aggregated.issues {
                    info!(
                        "  {} (severity {:.1}): {} [{}]",
                        issue.kind,
                        issue.severity_avg,
                        issue.message,
                        issue.occurrence_text()
                    );
                }
            }
            info!("{}", monitor.stats().summary());
        }
        Mode::Exercise => {
            let state = monitor.exercise_state();
            info!("Completed reps: {} ({})", state.completed_reps, state.last_message);
        }
    }

    let sink = monitor.into_sink();
    info!("{} notifications sent", sink.record.received().len());

    Ok(())
}
