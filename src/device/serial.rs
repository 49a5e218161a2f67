//! Serial transport to the microcontroller.

use crate::device::command::Command;
use crate::device::link::{DeviceLink, DeviceReply};
use crate::error::{Result, SensorError};
use serde::{Deserialize, Serialize};
use serialport::{SerialPort, SerialPortInfo, SerialPortType};
use std::io::{BufRead, BufReader, Write};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::{debug, info};

/// Configuration for the serial connection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SerialConfig {
    /// Port path, e.g. `/dev/ttyACM0` or `COM3`
    pub port: String,
    /// Baud rate the firmware listens on
    pub baud_rate: u32,
    /// Upper bound on a single blocking read, in milliseconds
    pub read_timeout_ms: u64,
    /// How long to let the device answer before reading, in milliseconds
    pub response_grace_ms: u64,
    /// Pause after opening the port while the board resets, in milliseconds
    pub settle_delay_ms: u64,
}

impl Default for SerialConfig {
    fn default() -> Self {
        Self {
            port: "/dev/ttyACM0".to_string(),
            baud_rate: crate::DEFAULT_BAUD_RATE,
            read_timeout_ms: 1000,
            response_grace_ms: 1000,
            settle_delay_ms: 2000,
        }
    }
}

impl SerialConfig {
    /// Create a configuration for the given port with default timings.
    pub fn new(port: impl Into<String>) -> Self {
        Self {
            port: port.into(),
            ..Default::default()
        }
    }

    /// Set the baud rate.
    pub fn with_baud_rate(mut self, baud_rate: u32) -> Self {
        self.baud_rate = baud_rate;
        self
    }

    /// Set the response grace period.
    pub fn with_response_grace_ms(mut self, grace_ms: u64) -> Self {
        self.response_grace_ms = grace_ms;
        self
    }

    /// Set the post-open settle delay.
    pub fn with_settle_delay_ms(mut self, delay_ms: u64) -> Self {
        self.settle_delay_ms = delay_ms;
        self
    }

    pub fn response_grace(&self) -> Duration {
        Duration::from_millis(self.response_grace_ms)
    }
}

type SharedPort = Arc<Mutex<BufReader<Box<dyn SerialPort>>>>;

/// Device link over a serial port.
///
/// The port is opened once; failing to open it is fatal for the caller.
/// Blocking port I/O runs on tokio's blocking pool.
pub struct SerialLink {
    port: SharedPort,
    name: String,
    grace: Duration,
}

impl SerialLink {
    /// Open the port and wait for the board to come out of reset.
    pub async fn open(config: &SerialConfig) -> Result<Self> {
        let port = serialport::new(&config.port, config.baud_rate)
            .timeout(Duration::from_millis(config.read_timeout_ms))
            .flow_control(serialport::FlowControl::None)
            .open()?;

        info!(
            "Opened serial port {} at {} baud",
            config.port, config.baud_rate
        );

        tokio::time::sleep(Duration::from_millis(config.settle_delay_ms)).await;

        Ok(Self {
            port: Arc::new(Mutex::new(BufReader::new(port))),
            name: config.port.clone(),
            grace: config.response_grace(),
        })
    }

    /// Name of the underlying port.
    pub fn port_name(&self) -> &str {
        &self.name
    }
}

impl DeviceLink for SerialLink {
    async fn send(&mut self, command: Command) -> Result<DeviceReply> {
        debug!(port = %self.name, command = command.wire(), "writing command");

        let port = Arc::clone(&self.port);
        let wire = command.wire_line();
        tokio::task::spawn_blocking(move || write_command(&port, wire.as_bytes())).await??;

        tokio::time::sleep(self.grace).await;

        let port = Arc::clone(&self.port);
        let reply = tokio::task::spawn_blocking(move || read_reply(&port)).await??;

        debug!(port = %self.name, reply = %reply, "device replied");
        Ok(reply)
    }
}

fn write_command(port: &SharedPort, bytes: &[u8]) -> Result<()> {
    let mut reader = port
        .lock()
        .map_err(|_| SensorError::device_error("serial port lock poisoned"))?;
    let port = reader.get_mut();
    port.write_all(bytes)?;
    port.flush()?;
    Ok(())
}

/// Attempt exactly one line read if anything is waiting.
fn read_reply(port: &SharedPort) -> Result<DeviceReply> {
    let mut reader = port
        .lock()
        .map_err(|_| SensorError::device_error("serial port lock poisoned"))?;

    if reader.buffer().is_empty() && reader.get_ref().bytes_to_read()? == 0 {
        return Ok(DeviceReply::AwaitingResponse);
    }

    let mut line = Vec::new();
    match reader.read_until(b'\n', &mut line) {
        Ok(_) => {}
        // A partial line is still a reply.
        Err(e) if e.kind() == std::io::ErrorKind::TimedOut => {}
        Err(e) => return Err(e.into()),
    }

    if line.is_empty() {
        Ok(DeviceReply::AwaitingResponse)
    } else {
        Ok(DeviceReply::from_line(&String::from_utf8_lossy(&line)))
    }
}

/// Enumerate serial ports visible to the host.
pub fn list_ports() -> Result<Vec<SerialPortInfo>> {
    Ok(serialport::available_ports()?)
}

/// One-line description of a port for listings.
pub fn describe_port(info: &SerialPortInfo) -> String {
    match &info.port_type {
        SerialPortType::UsbPort(usb) => {
            let product = usb
                .product
                .as_deref()
                .or(usb.manufacturer.as_deref())
                .unwrap_or("unknown device");
            format!(
                "{} - USB {} (VID: 0x{:04x}, PID: 0x{:04x})",
                info.port_name, product, usb.vid, usb.pid
            )
        }
        SerialPortType::PciPort => format!("{} - PCI", info.port_name),
        SerialPortType::BluetoothPort => format!("{} - Bluetooth", info.port_name),
        SerialPortType::Unknown => format!("{} - unknown", info.port_name),
    }
}
