//! Command/reply transport to the microcontroller.
//!
//! The firmware understands a small fixed vocabulary of newline-terminated
//! commands and answers each with at most one line. [`DeviceLink`] captures
//! that contract; [`SerialLink`] speaks it over a serial port while
//! [`SimulatedLink`] and [`ScriptedLink`] stand in for the board.

pub mod command;
pub mod link;
pub mod serial;
pub mod simulated;

// Re-export commonly used items
pub use command::Command;
pub use link::{DeviceLink, DeviceReply, AWAITING_RESPONSE};
pub use serial::{describe_port, list_ports, SerialConfig, SerialLink};
pub use simulated::{ScriptedLink, SimulatedLink};

use crate::error::Result;

/// A link chosen at runtime.
pub enum DeviceHandle {
    Serial(SerialLink),
    Simulated(SimulatedLink),
}

impl DeviceHandle {
    /// Open the serial port, or build a simulated device when `simulate` is set.
    pub async fn connect(config: &SerialConfig, simulate: bool) -> Result<Self> {
        if simulate {
            tracing::info!("Using simulated device");
            Ok(DeviceHandle::Simulated(SimulatedLink::new()))
        } else {
            Ok(DeviceHandle::Serial(SerialLink::open(config).await?))
        }
    }
}

impl DeviceLink for DeviceHandle {
    async fn send(&mut self, command: Command) -> Result<DeviceReply> {
        match self {
            DeviceHandle::Serial(link) => link.send(command).await,
            DeviceHandle::Simulated(link) => link.send(command).await,
        }
    }
}
