//! The command/reply contract shared by every device transport.

use crate::device::command::Command;
use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Text reported when the device did not answer within the grace period.
pub const AWAITING_RESPONSE: &str = "Command sent, awaiting response from device...";

/// A single reply from the device.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DeviceReply {
    /// One line of text with trailing whitespace stripped
    Line(String),
    /// Nothing arrived within the grace period
    AwaitingResponse,
}

impl DeviceReply {
    /// Build a reply from a raw line as read off the wire.
    pub fn from_line(raw: &str) -> Self {
        DeviceReply::Line(raw.trim_end().to_string())
    }

    /// Interpret the reply as a numeric measurement.
    ///
    /// The placeholder and non-finite numbers are not measurements.
    pub fn value(&self) -> Option<f64> {
        match self {
            DeviceReply::Line(line) => line
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|value| value.is_finite()),
            DeviceReply::AwaitingResponse => None,
        }
    }

    /// Reply text as shown to the user.
    pub fn text(&self) -> &str {
        match self {
            DeviceReply::Line(line) => line,
            DeviceReply::AwaitingResponse => AWAITING_RESPONSE,
        }
    }
}

impl fmt::Display for DeviceReply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.text())
    }
}

/// Transport to the microcontroller.
///
/// A link sends one command and waits briefly for one line back. There is
/// no retry: if nothing arrives the reply is [`DeviceReply::AwaitingResponse`].
/// Errors are reserved for a broken transport.
pub trait DeviceLink {
    /// Send a command and collect the device's reply.
    fn send(
        &mut self,
        command: Command,
    ) -> impl std::future::Future<Output = Result<DeviceReply>> + Send;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_line_strips_trailing_whitespace() {
        assert_eq!(
            DeviceReply::from_line("23.50\r\n"),
            DeviceReply::Line("23.50".to_string())
        );
    }

    #[test]
    fn test_value_parsing() {
        assert_eq!(DeviceReply::from_line("23.5\r\n").value(), Some(23.5));
        assert_eq!(DeviceReply::from_line(" -4").value(), Some(-4.0));
        assert_eq!(DeviceReply::from_line("LED on").value(), None);
        assert_eq!(DeviceReply::from_line("").value(), None);
        assert_eq!(DeviceReply::from_line("NaN").value(), None);
        assert_eq!(DeviceReply::from_line("inf").value(), None);
    }

    #[test]
    fn test_awaiting_response_is_not_a_measurement() {
        let reply = DeviceReply::AwaitingResponse;
        assert_eq!(reply.value(), None);
        assert_eq!(reply.to_string(), AWAITING_RESPONSE);
    }
}
