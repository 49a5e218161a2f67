//! Device command vocabulary.

use crate::error::SensorError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A command understood by the microcontroller firmware.
///
/// Each variant maps to a fixed, case-sensitive wire string. The firmware
/// expects the wire string followed by a newline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Command {
    /// Switch the primary LED on
    LedOn,
    /// Switch the primary LED off
    LedOff,
    /// Sample the temperature sensor
    ReadTemperature,
    /// Switch the RGB LED on
    RgbLedOn,
    /// Switch the RGB LED off
    RgbLedOff,
    /// Enable the sound level meter
    SoundMeterOn,
    /// Disable the sound level meter
    SoundMeterOff,
}

impl Command {
    /// Every command, in menu order.
    pub const ALL: [Command; 7] = [
        Command::LedOn,
        Command::LedOff,
        Command::ReadTemperature,
        Command::RgbLedOn,
        Command::RgbLedOff,
        Command::SoundMeterOn,
        Command::SoundMeterOff,
    ];

    /// The string the firmware matches on.
    pub fn wire(&self) -> &'static str {
        match self {
            Command::LedOn => "modo1",
            Command::LedOff => "modo2",
            Command::ReadTemperature => "modo3",
            Command::RgbLedOn => "modo4",
            Command::RgbLedOff => "modo5",
            Command::SoundMeterOn => "modo6",
            Command::SoundMeterOff => "modo7",
        }
    }

    /// Newline-terminated wire form.
    pub fn wire_line(&self) -> String {
        format!("{}\n", self.wire())
    }

    /// Kebab-case name used on the command line.
    pub fn name(&self) -> &'static str {
        match self {
            Command::LedOn => "led-on",
            Command::LedOff => "led-off",
            Command::ReadTemperature => "read-temperature",
            Command::RgbLedOn => "rgb-led-on",
            Command::RgbLedOff => "rgb-led-off",
            Command::SoundMeterOn => "sound-meter-on",
            Command::SoundMeterOff => "sound-meter-off",
        }
    }

    /// Human readable label for echoing replies.
    pub fn label(&self) -> &'static str {
        match self {
            Command::LedOn => "Turn LED on",
            Command::LedOff => "Turn LED off",
            Command::ReadTemperature => "Read temperature",
            Command::RgbLedOn => "Turn RGB LED on",
            Command::RgbLedOff => "Turn RGB LED off",
            Command::SoundMeterOn => "Sound meter on",
            Command::SoundMeterOff => "Sound meter off",
        }
    }

    /// Whether the command changes actuator state on the device.
    pub fn is_actuator(&self) -> bool {
        !matches!(self, Command::ReadTemperature)
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Command {
    type Err = SensorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Command::ALL
            .into_iter()
            .find(|cmd| cmd.name() == s || cmd.wire() == s)
            .ok_or_else(|| SensorError::UnknownCommand(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_strings_are_distinct() {
        let mut wires: Vec<_> = Command::ALL.iter().map(|c| c.wire()).collect();
        wires.sort_unstable();
        wires.dedup();
        assert_eq!(wires.len(), Command::ALL.len());
    }

    #[test]
    fn test_wire_line_is_newline_terminated() {
        assert_eq!(Command::ReadTemperature.wire_line(), "modo3\n");
        assert_eq!(Command::SoundMeterOff.wire_line(), "modo7\n");
    }

    #[test]
    fn test_parse_by_name_or_wire() {
        assert_eq!("led-on".parse::<Command>().unwrap(), Command::LedOn);
        assert_eq!("modo5".parse::<Command>().unwrap(), Command::RgbLedOff);
        assert_eq!(" read-temperature\n".parse::<Command>().unwrap(), Command::ReadTemperature);
    }

    #[test]
    fn test_parse_is_case_sensitive() {
        assert!(matches!(
            "MODO1".parse::<Command>(),
            Err(SensorError::UnknownCommand(_))
        ));
        assert!("blink".parse::<Command>().is_err());
    }

    #[test]
    fn test_only_read_temperature_is_a_measurement() {
        let measurements: Vec<_> = Command::ALL.iter().filter(|c| !c.is_actuator()).collect();
        assert_eq!(measurements, vec![&Command::ReadTemperature]);
    }
}
