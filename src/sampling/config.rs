//! Sampling run configuration.

use crate::error::{Result, SensorError};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Total duration and cadence of one sampling run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunConfig {
    /// Total run length in minutes
    pub total_minutes: u32,
    /// Pause between measurements in seconds
    pub interval_secs: u32,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            total_minutes: crate::DEFAULT_TOTAL_MINUTES,
            interval_secs: crate::DEFAULT_INTERVAL_SECS,
        }
    }
}

impl RunConfig {
    pub fn new(total_minutes: u32, interval_secs: u32) -> Self {
        Self {
            total_minutes,
            interval_secs,
        }
    }

    /// Set the total run length.
    pub fn with_total_minutes(mut self, minutes: u32) -> Self {
        self.total_minutes = minutes;
        self
    }

    /// Set the measurement interval.
    pub fn with_interval_secs(mut self, secs: u32) -> Self {
        self.interval_secs = secs;
        self
    }

    /// Reject configurations that would divide by zero.
    pub fn validate(&self) -> Result<()> {
        if self.total_minutes == 0 || self.interval_secs == 0 {
            return Err(SensorError::NotConfigured);
        }
        Ok(())
    }

    /// Number of measurement attempts, `floor(total_seconds / interval)`.
    ///
    /// Zero for an unconfigured run.
    pub fn iterations(&self) -> u64 {
        if self.interval_secs == 0 {
            return 0;
        }
        self.total_seconds() / u64::from(self.interval_secs)
    }

    pub fn total_seconds(&self) -> u64 {
        u64::from(self.total_minutes) * 60
    }

    pub fn interval(&self) -> Duration {
        Duration::from_secs(u64::from(self.interval_secs))
    }
}
