//! # sensorlink - Serial Sensor Sampling Console
//!
//! Drives a serial-connected microcontroller that switches a few actuators
//! and samples a temperature sensor, runs timed measurement series with a
//! spreadsheet report at the end, and hosts a small HTTP API that stores
//! readings pushed by other sensor nodes.
//!
//! ## Features
//!
//! - **Device link**: fixed command vocabulary over a serial port, one line back
//! - **Interval sampling**: measure every N seconds for M minutes, then average
//! - **Reports**: `.xlsx` or `.csv` table with a trailing average row
//! - **Control console**: menu-driven front end with live progress
//! - **Ingestion API**: store readings and query ranges and aggregates
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use sensorlink::{CancelFlag, IntervalSampler, Report, ReportFormat, RunConfig, SimulatedLink};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut link = SimulatedLink::new();
//!     let (tx, _rx) = tokio::sync::mpsc::unbounded_channel();
//!
//!     let run = IntervalSampler::new()
//!         .run(&mut link, &RunConfig::new(1, 30), &tx, &CancelFlag::new())
//!         .await?;
//!
//!     if let Some(report) = Report::from_run(&run) {
//!         report.write_to_dir(std::path::Path::new("."), ReportFormat::Xlsx)?;
//!     }
//!     Ok(())
//! }
//! ```

pub mod control;
pub mod device;
pub mod error;
pub mod report;
pub mod sampling;
pub mod web;

// Re-export public API
pub use control::{run_console, ControlState, ControlSurface, MenuAction};
pub use device::{
    Command, DeviceHandle, DeviceLink, DeviceReply, ScriptedLink, SerialConfig, SerialLink,
    SimulatedLink,
};
pub use error::{Result, SensorError};
pub use report::{Report, ReportFormat};
pub use sampling::{CancelFlag, IntervalSampler, ProgressEvent, RunConfig, Sample, SamplingRun};
pub use web::{start_web_server, ReadingStore, WebConfig};

/// Baud rate the firmware listens on
pub const DEFAULT_BAUD_RATE: u32 = 9600;

/// Default total sampling time in minutes
pub const DEFAULT_TOTAL_MINUTES: u32 = 5;

/// Default interval between measurements in seconds
pub const DEFAULT_INTERVAL_SECS: u32 = 30;

/// The default ingestion API port
pub const DEFAULT_WEB_PORT: u16 = 8000;
