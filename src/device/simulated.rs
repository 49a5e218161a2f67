//! Hardware-free device links.

use crate::device::command::Command;
use crate::device::link::{DeviceLink, DeviceReply};
use crate::error::Result;
use std::collections::VecDeque;
use tracing::debug;

/// Emulates the firmware without a board attached.
///
/// Actuator commands are acknowledged the way the sketch does, and the
/// temperature drifts slowly around a base value. With a dropout period
/// set, every n-th temperature read answers with garbage.
#[derive(Debug, Clone)]
pub struct SimulatedLink {
    base_celsius: f64,
    reads: u64,
    dropout_every: Option<u64>,
    led: bool,
    rgb_led: bool,
    sound_meter: bool,
}

impl Default for SimulatedLink {
    fn default() -> Self {
        Self {
            base_celsius: 22.5,
            reads: 0,
            dropout_every: None,
            led: false,
            rgb_led: false,
            sound_meter: false,
        }
    }
}

impl SimulatedLink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Center the simulated temperature on `celsius`.
    pub fn with_base_celsius(mut self, celsius: f64) -> Self {
        self.base_celsius = celsius;
        self
    }

    /// Answer every `every`-th temperature read with an unparsable line.
    pub fn with_dropout_every(mut self, every: u64) -> Self {
        self.dropout_every = (every > 0).then_some(every);
        self
    }

    pub fn led(&self) -> bool {
        self.led
    }

    pub fn rgb_led(&self) -> bool {
        self.rgb_led
    }

    pub fn sound_meter(&self) -> bool {
        self.sound_meter
    }

    fn respond(&mut self, command: Command) -> DeviceReply {
        let line = match command {
            Command::LedOn => {
                self.led = true;
                "LED ON".to_string()
            }
            Command::LedOff => {
                self.led = false;
                "LED OFF".to_string()
            }
            Command::RgbLedOn => {
                self.rgb_led = true;
                "RGB LED ON".to_string()
            }
            Command::RgbLedOff => {
                self.rgb_led = false;
                "RGB LED OFF".to_string()
            }
            Command::SoundMeterOn => {
                self.sound_meter = true;
                "Sound meter ON".to_string()
            }
            Command::SoundMeterOff => {
                self.sound_meter = false;
                "Sound meter OFF".to_string()
            }
            Command::ReadTemperature => {
                self.reads += 1;
                match self.dropout_every {
                    Some(every) if self.reads % every == 0 => "ERR sensor".to_string(),
                    _ => {
                        let drift = (self.reads as f64 * 0.7).sin() * 0.5;
                        format!("{:.2}", self.base_celsius + drift)
                    }
                }
            }
        };
        DeviceReply::Line(line)
    }
}

impl DeviceLink for SimulatedLink {
    async fn send(&mut self, command: Command) -> Result<DeviceReply> {
        let reply = self.respond(command);
        debug!(command = command.wire(), reply = %reply, "simulated device replied");
        Ok(reply)
    }
}

/// Replays canned replies in order and records every command sent.
///
/// Once the script runs dry every further command gets
/// [`DeviceReply::AwaitingResponse`].
#[derive(Debug, Clone, Default)]
pub struct ScriptedLink {
    replies: VecDeque<DeviceReply>,
    sent: Vec<Command>,
}

impl ScriptedLink {
    /// Script raw reply lines.
    pub fn new<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::from_replies(lines.into_iter().map(|line| DeviceReply::from_line(line.as_ref())))
    }

    /// Script arbitrary replies, including timeouts.
    pub fn from_replies(replies: impl IntoIterator<Item = DeviceReply>) -> Self {
        Self {
            replies: replies.into_iter().collect(),
            sent: Vec::new(),
        }
    }

    /// Commands sent so far, oldest first.
    pub fn sent(&self) -> &[Command] {
        &self.sent
    }

    /// Replies not yet consumed.
    pub fn remaining(&self) -> usize {
        self.replies.len()
    }
}

impl DeviceLink for ScriptedLink {
    async fn send(&mut self, command: Command) -> Result<DeviceReply> {
        self.sent.push(command);
        Ok(self
            .replies
            .pop_front()
            .unwrap_or(DeviceReply::AwaitingResponse))
    }
}
