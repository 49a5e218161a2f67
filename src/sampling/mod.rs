//! Interval sampling: measure at a fixed cadence, then average.
//!
//! A run issues the temperature command `floor(total / interval)` times,
//! keeps every reply that parses as a number, and streams progress through
//! an unbounded channel so a front end can echo it as it happens.

pub mod config;
pub mod data;
pub mod sampler;

// Re-export commonly used items
pub use config::RunConfig;
pub use data::{format_elapsed, ProgressEvent, Sample, SamplingRun, NO_VALID_SAMPLES_MESSAGE};
pub use sampler::{CancelFlag, IntervalSampler};
