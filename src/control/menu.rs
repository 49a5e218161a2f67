//! Menu state and user selections.

use crate::error::SensorError;
use crate::sampling::RunConfig;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Step for the total-duration buttons, in minutes.
pub const DURATION_STEP_MINUTES: u32 = 1;
/// Step for the interval buttons, in seconds.
pub const INTERVAL_STEP_SECS: u32 = 10;

/// Main menu as shown to the user.
pub const MENU_TEXT: &str = "\
Select an option:
  1) Turn LED on
  2) Turn LED off
  3) Measure temperature now
  4) Measure temperature over an interval
  5) Toggle sound meter
  6) Turn RGB LED on
  7) Turn RGB LED off
  +min / -min   adjust total time by 1 minute
  +int / -int   adjust interval by 10 seconds
  settings      show the interval settings
  help          show this menu
  quit          stop";

/// A user selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    LedOn,
    LedOff,
    MeasureNow,
    IntervalRun,
    ToggleSoundMeter,
    RgbLedOn,
    RgbLedOff,
    IncreaseDuration,
    DecreaseDuration,
    IncreaseInterval,
    DecreaseInterval,
    ShowSettings,
    Help,
    Quit,
}

impl FromStr for MenuAction {
    type Err = SensorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let action = match s.trim().to_ascii_lowercase().as_str() {
            "1" | "led-on" => MenuAction::LedOn,
            "2" | "led-off" => MenuAction::LedOff,
            "3" | "measure" => MenuAction::MeasureNow,
            "4" | "run" | "interval" => MenuAction::IntervalRun,
            "5" | "sound" => MenuAction::ToggleSoundMeter,
            "6" | "rgb-on" => MenuAction::RgbLedOn,
            "7" | "rgb-off" => MenuAction::RgbLedOff,
            "+min" => MenuAction::IncreaseDuration,
            "-min" => MenuAction::DecreaseDuration,
            "+int" => MenuAction::IncreaseInterval,
            "-int" => MenuAction::DecreaseInterval,
            "s" | "settings" => MenuAction::ShowSettings,
            "h" | "?" | "help" | "menu" => MenuAction::Help,
            "q" | "quit" | "exit" | "stop" => MenuAction::Quit,
            other => return Err(SensorError::UnknownOption(other.to_string())),
        };
        Ok(action)
    }
}

/// State the menu carries between selections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ControlState {
    pub run_config: RunConfig,
    pub sound_meter_active: bool,
}

impl ControlState {
    pub fn new(run_config: RunConfig) -> Self {
        Self {
            run_config,
            sound_meter_active: false,
        }
    }

    pub fn increase_duration(&mut self) {
        self.run_config.total_minutes = self
            .run_config
            .total_minutes
            .saturating_add(DURATION_STEP_MINUTES);
    }

    /// Never goes below one minute.
    pub fn decrease_duration(&mut self) {
        if self.run_config.total_minutes > DURATION_STEP_MINUTES {
            self.run_config.total_minutes -= DURATION_STEP_MINUTES;
        }
    }

    pub fn increase_interval(&mut self) {
        self.run_config.interval_secs = self
            .run_config
            .interval_secs
            .saturating_add(INTERVAL_STEP_SECS);
    }

    /// Steps down only while above ten seconds, so 15 s lands on 5 s.
    pub fn decrease_interval(&mut self) {
        if self.run_config.interval_secs > INTERVAL_STEP_SECS {
            self.run_config.interval_secs -= INTERVAL_STEP_SECS;
        }
    }

    /// Flip the sound meter and return the new state.
    pub fn toggle_sound_meter(&mut self) -> bool {
        self.sound_meter_active = !self.sound_meter_active;
        self.sound_meter_active
    }

    pub fn settings_line(&self) -> String {
        format!(
            "Total time: {} min, interval: {} s",
            self.run_config.total_minutes, self.run_config.interval_secs
        )
    }
}
