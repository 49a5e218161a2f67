//! Error handling for the sensorlink crate.

/// A specialized `Result` type for sensorlink operations.
pub type Result<T> = std::result::Result<T, SensorError>;

/// The main error type for device, sampling, report and web operations.
#[derive(Debug, thiserror::Error)]
pub enum SensorError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serial port could not be opened or queried
    #[error("Serial port error: {0}")]
    Serial(#[from] serialport::Error),

    /// Sampling was requested with a zero duration or interval
    #[error("Please configure the total duration and the measurement interval first.")]
    NotConfigured,

    /// Input did not name a known device command
    #[error("Unknown device command: {0}")]
    UnknownCommand(String),

    /// Input did not match a menu option
    #[error("Unknown menu option: {0}. Type 'help' to show the menu.")]
    UnknownOption(String),

    /// Device link failure
    #[error("Device error: {0}")]
    Device(String),

    /// Report could not be built or written
    #[error("Report error: {0}")]
    Report(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Web server error
    #[error("Web server error: {0}")]
    WebServer(String),

    /// Background task panicked or was cancelled
    #[error("Task error: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl SensorError {
    /// Create a new device error
    pub fn device_error(msg: impl Into<String>) -> Self {
        Self::Device(msg.into())
    }

    /// Create a new report error
    pub fn report_error(msg: impl Into<String>) -> Self {
        Self::Report(msg.into())
    }

    /// Create a new configuration error
    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a new web server error
    pub fn web_server_error(msg: impl Into<String>) -> Self {
        Self::WebServer(msg.into())
    }
}

impl From<rust_xlsxwriter::XlsxError> for SensorError {
    fn from(err: rust_xlsxwriter::XlsxError) -> Self {
        Self::Report(err.to_string())
    }
}

impl From<csv::Error> for SensorError {
    fn from(err: csv::Error) -> Self {
        Self::Report(err.to_string())
    }
}
