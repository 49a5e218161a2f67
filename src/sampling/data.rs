//! Data structures for sampling runs.

use crate::device::DeviceReply;
use crate::sampling::config::RunConfig;
use chrono::{DateTime, Local};
use serde::Serialize;
use std::fmt;
use std::time::Duration;

/// One successfully parsed measurement.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Sample {
    /// 1-based position among valid samples
    pub sequence: u32,
    /// Parsed measurement value
    pub value: f64,
    /// Nominal time since the run started, `(iteration + 1) * interval`
    pub elapsed: Duration,
    /// Wall-clock time the reply was received
    pub captured_at: DateTime<Local>,
}

impl Sample {
    /// Elapsed time as `HH:MM:SS`.
    pub fn elapsed_hms(&self) -> String {
        format_elapsed(self.elapsed)
    }

    /// Capture time as `HH:MM:SS`.
    pub fn captured_hms(&self) -> String {
        self.captured_at.format("%H:%M:%S").to_string()
    }
}

/// Format a duration as `HH:MM:SS`. Hours are not wrapped at 24.
pub fn format_elapsed(elapsed: Duration) -> String {
    let secs = elapsed.as_secs();
    format!("{:02}:{:02}:{:02}", secs / 3600, (secs % 3600) / 60, secs % 60)
}

/// Result object of one sampling run.
///
/// Built fresh for every run; nothing carries over between runs.
#[derive(Debug, Clone, Serialize)]
pub struct SamplingRun {
    config: RunConfig,
    started_at: DateTime<Local>,
    samples: Vec<Sample>,
    sum: f64,
    attempted: u64,
    cancelled: bool,
}

impl SamplingRun {
    pub fn new(config: RunConfig) -> Self {
        Self {
            config,
            started_at: Local::now(),
            samples: Vec::new(),
            sum: 0.0,
            attempted: 0,
            cancelled: false,
        }
    }

    /// Record a parsed value and return the sample it produced.
    pub fn record(&mut self, value: f64, elapsed: Duration, captured_at: DateTime<Local>) -> &Sample {
        self.attempted += 1;
        self.sum += value;
        let sequence = self.samples.len() as u32 + 1;
        self.samples.push(Sample {
            sequence,
            value,
            elapsed,
            captured_at,
        });
        &self.samples[self.samples.len() - 1]
    }

    /// Record an iteration whose reply did not parse.
    pub fn record_failure(&mut self) {
        self.attempted += 1;
    }

    pub fn mark_cancelled(&mut self) {
        self.cancelled = true;
    }

    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    pub fn started_at(&self) -> DateTime<Local> {
        self.started_at
    }

    /// Valid samples in capture order.
    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    /// Iterations performed, valid or not.
    pub fn attempted(&self) -> u64 {
        self.attempted
    }

    pub fn valid_count(&self) -> usize {
        self.samples.len()
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }

    /// Mean of the valid samples, `None` when there are none.
    pub fn average(&self) -> Option<f64> {
        if self.samples.is_empty() {
            None
        } else {
            Some(self.sum / self.samples.len() as f64)
        }
    }
}

/// Progress notifications streamed while a run is in flight.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ProgressEvent {
    /// Run accepted and about to start
    Started { iterations: u64, config: RunConfig },
    /// A reply parsed into a sample
    Sample(Sample),
    /// A reply did not parse; `iteration` is 1-based
    ParseFailure { iteration: u64, reply: DeviceReply },
    /// Run stopped early on request
    Cancelled { attempted: u64 },
    /// Run finished with at least one valid sample
    Completed { average: f64, count: usize },
    /// Run finished without a single valid sample
    NoValidSamples,
}

/// Message shown when a run produced nothing usable.
pub const NO_VALID_SAMPLES_MESSAGE: &str = "No valid measurements could be obtained.";

impl fmt::Display for ProgressEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProgressEvent::Started { iterations, config } => write!(
                f,
                "Total time: {} min, interval: {} s ({} measurements)",
                config.total_minutes, config.interval_secs, iterations
            ),
            ProgressEvent::Sample(sample) => write!(
                f,
                "Measurement {}: value = {:.2}, elapsed = {}, time = {}",
                sample.sequence,
                sample.value,
                sample.elapsed_hms(),
                sample.captured_hms()
            ),
            ProgressEvent::ParseFailure { iteration, reply } => {
                write!(f, "Error reading the value at iteration {}: {}", iteration, reply)
            }
            ProgressEvent::Cancelled { attempted } => {
                write!(f, "Sampling cancelled after {} iterations", attempted)
            }
            ProgressEvent::Completed { average, .. } => write!(f, "Average: {:.2}", average),
            ProgressEvent::NoValidSamples => f.write_str(NO_VALID_SAMPLES_MESSAGE),
        }
    }
}
