//! Timed measurement loop.

use crate::device::{Command, DeviceLink};
use crate::error::Result;
use crate::sampling::config::RunConfig;
use crate::sampling::data::{ProgressEvent, SamplingRun};
use chrono::Local;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, info, warn};

/// Shared stop request for a sampling run.
///
/// Checked once at the top of every iteration, so a run stops at most one
/// interval after the flag is raised.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Repeatedly measures through a device link at a fixed cadence.
///
/// Iterations run strictly one after another; the pause between them is the
/// only await point besides the device call itself.
#[derive(Debug, Clone, Copy)]
pub struct IntervalSampler {
    command: Command,
}

impl Default for IntervalSampler {
    fn default() -> Self {
        Self {
            command: Command::ReadTemperature,
        }
    }
}

impl IntervalSampler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Command issued on every iteration.
    pub fn command(&self) -> Command {
        self.command
    }

    /// Execute one run.
    ///
    /// Fails with [`SensorError::NotConfigured`](crate::SensorError::NotConfigured)
    /// before touching the device when the duration or interval is zero.
    /// Unparsable replies are reported on `progress` and skipped. Transport
    /// errors abort the run.
    pub async fn run<L: DeviceLink>(
        &self,
        link: &mut L,
        config: &RunConfig,
        progress: &UnboundedSender<ProgressEvent>,
        cancel: &CancelFlag,
    ) -> Result<SamplingRun> {
        config.validate()?;

        let iterations = config.iterations();
        let interval = config.interval();
        let mut run = SamplingRun::new(*config);

        info!(
            "Starting sampling run: {} min, {} s interval, {} iterations",
            config.total_minutes, config.interval_secs, iterations
        );
        notify(progress, ProgressEvent::Started {
            iterations,
            config: *config,
        });

        for i in 0..iterations {
            if cancel.is_cancelled() {
                info!("Sampling cancelled after {} iterations", i);
                run.mark_cancelled();
                notify(progress, ProgressEvent::Cancelled { attempted: i });
                break;
            }

            let reply = link.send(self.command).await?;
            let captured_at = Local::now();
            let elapsed = nominal_elapsed(config.interval_secs, i);

            match reply.value() {
                Some(value) => {
                    let sample = run.record(value, elapsed, captured_at).clone();
                    debug!(sequence = sample.sequence, value, "sample captured");
                    notify(progress, ProgressEvent::Sample(sample));
                }
                None => {
                    run.record_failure();
                    warn!("Unparsable reply at iteration {}: {}", i + 1, reply);
                    notify(progress, ProgressEvent::ParseFailure {
                        iteration: i + 1,
                        reply,
                    });
                }
            }

            if i + 1 < iterations {
                tokio::time::sleep(interval).await;
            }
        }

        match run.average() {
            Some(average) => {
                info!(
                    "Sampling finished: {} valid of {} attempted, average {:.2}",
                    run.valid_count(),
                    run.attempted(),
                    average
                );
                notify(progress, ProgressEvent::Completed {
                    average,
                    count: run.valid_count(),
                });
            }
            None => {
                warn!("Sampling finished without valid measurements");
                notify(progress, ProgressEvent::NoValidSamples);
            }
        }

        Ok(run)
    }
}

/// Time from the start of the run to the end of iteration `index` (0-based).
fn nominal_elapsed(interval_secs: u32, index: u64) -> Duration {
    Duration::from_secs(u64::from(interval_secs).saturating_mul(index.saturating_add(1)))
}

// A listener that went away must not stop the run.
fn notify(progress: &UnboundedSender<ProgressEvent>, event: ProgressEvent) {
    let _ = progress.send(event);
}
