//! Dispatches menu selections to the device, sampler and report emitter.

use crate::control::menu::{ControlState, MenuAction, MENU_TEXT};
use crate::device::{Command, DeviceLink};
use crate::error::Result;
use crate::report::{Report, ReportFormat};
use crate::sampling::{CancelFlag, IntervalSampler};
use std::io::Write;
use std::path::{Path, PathBuf};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::mpsc;
use tracing::{error, info, warn};

/// Whether the surface keeps serving after an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Text front end driving one device.
///
/// Every message meant for the user goes to `out`. Interval runs stream
/// their progress there as it happens and finish by writing the report file.
pub struct ControlSurface<L, W> {
    link: L,
    out: W,
    state: ControlState,
    sampler: IntervalSampler,
    report_dir: PathBuf,
    report_format: ReportFormat,
    watch_interrupt: bool,
}

impl<L: DeviceLink, W: Write> ControlSurface<L, W> {
    pub fn new(link: L, out: W) -> Self {
        Self {
            link,
            out,
            state: ControlState::default(),
            sampler: IntervalSampler::new(),
            report_dir: PathBuf::from("."),
            report_format: ReportFormat::default(),
            watch_interrupt: false,
        }
    }

    /// Start from the given menu state.
    pub fn with_state(mut self, state: ControlState) -> Self {
        self.state = state;
        self
    }

    /// Directory receiving report files.
    pub fn with_report_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.report_dir = dir.into();
        self
    }

    pub fn with_report_format(mut self, format: ReportFormat) -> Self {
        self.report_format = format;
        self
    }

    /// Cancel interval runs on Ctrl-C instead of leaving the signal alone.
    pub fn with_interrupt_watch(mut self, watch: bool) -> Self {
        self.watch_interrupt = watch;
        self
    }

    pub fn state(&self) -> &ControlState {
        &self.state
    }

    pub fn link(&self) -> &L {
        &self.link
    }

    pub fn output(&self) -> &W {
        &self.out
    }

    pub fn report_dir(&self) -> &Path {
        &self.report_dir
    }

    /// Write one line to the user.
    pub fn say(&mut self, message: &str) -> Result<()> {
        writeln!(self.out, "{}", message)?;
        Ok(())
    }

    pub fn show_menu(&mut self) -> Result<()> {
        self.say(MENU_TEXT)
    }

    /// Carry out one selection.
    pub async fn handle(&mut self, action: MenuAction) -> Result<Flow> {
        info!("Menu action {:?}", action);

        match action {
            MenuAction::LedOn => self.actuate(Command::LedOn).await?,
            MenuAction::LedOff => self.actuate(Command::LedOff).await?,
            MenuAction::RgbLedOn => self.actuate(Command::RgbLedOn).await?,
            MenuAction::RgbLedOff => self.actuate(Command::RgbLedOff).await?,
            MenuAction::MeasureNow => {
                let reply = self.link.send(Command::ReadTemperature).await?;
                self.say(&format!("Temperature: {} °C", reply))?;
            }
            MenuAction::ToggleSoundMeter => {
                let active = self.state.toggle_sound_meter();
                let command = if active {
                    Command::SoundMeterOn
                } else {
                    Command::SoundMeterOff
                };
                let reply = self.link.send(command).await?;
                let status = if active { "enabled" } else { "disabled" };
                info!("Sound meter {}", status);
                self.say(&format!("Sound meter {}: {}", status, reply))?;
            }
            MenuAction::IntervalRun => {
                self.interval_run().await?;
            }
            MenuAction::IncreaseDuration => {
                self.state.increase_duration();
                self.show_settings()?;
            }
            MenuAction::DecreaseDuration => {
                self.state.decrease_duration();
                self.show_settings()?;
            }
            MenuAction::IncreaseInterval => {
                self.state.increase_interval();
                self.show_settings()?;
            }
            MenuAction::DecreaseInterval => {
                self.state.decrease_interval();
                self.show_settings()?;
            }
            MenuAction::ShowSettings => self.show_settings()?,
            MenuAction::Help => self.show_menu()?,
            MenuAction::Quit => {
                self.say("Stopping. Goodbye!")?;
                return Ok(Flow::Quit);
            }
        }

        Ok(Flow::Continue)
    }

    async fn actuate(&mut self, command: Command) -> Result<()> {
        let reply = self.link.send(command).await?;
        self.say(&format!("{}: {}", command.label(), reply))
    }

    fn show_settings(&mut self) -> Result<()> {
        let line = self.state.settings_line();
        self.say(&line)
    }

    /// Run with the current settings, watching for Ctrl-C when enabled.
    pub async fn interval_run(&mut self) -> Result<Option<PathBuf>> {
        let cancel = CancelFlag::new();
        let watcher = self.watch_interrupt.then(|| {
            let cancel = cancel.clone();
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    cancel.cancel();
                }
            })
        });

        let result = self.run_interval(&cancel).await;

        if let Some(watcher) = watcher {
            watcher.abort();
        }
        result
    }

    /// Sample with the current settings, echo progress and write the report.
    ///
    /// Returns the report path, or `None` when no report was produced
    /// (unconfigured run or no valid samples).
    pub async fn run_interval(&mut self, cancel: &CancelFlag) -> Result<Option<PathBuf>> {
        let config = self.state.run_config;
        if let Err(e) = config.validate() {
            self.say(&e.to_string())?;
            return Ok(None);
        }

        let (tx, mut rx) = mpsc::unbounded_channel();
        let sampler = self.sampler;
        let link = &mut self.link;
        let out = &mut self.out;

        let sampling = async move {
            let result = sampler.run(link, &config, &tx, cancel).await;
            drop(tx);
            result
        };
        // Keep draining after a failed write so the run is never held up.
        let echo = async {
            let mut failure = None;
            while let Some(event) = rx.recv().await {
                if failure.is_none() {
                    if let Err(e) = writeln!(out, "{}", event) {
                        failure = Some(e);
                    }
                }
            }
            failure
        };

        let (run, echo_failure) = tokio::join!(sampling, echo);
        let run = run.map_err(|e| {
            error!("Sampling run aborted: {}", e);
            e
        })?;
        if let Some(e) = echo_failure {
            warn!("Progress output failed, run continued: {}", e);
        }

        match Report::from_run(&run) {
            Some(report) => {
                let path = report.write_to_dir(&self.report_dir, self.report_format)?;
                self.say(&format!("Report saved: {}", path.display()))?;
                Ok(Some(path))
            }
            None => Ok(None),
        }
    }
}

/// Read selections line by line until input ends or the user quits.
///
/// A failed action is reported and the menu stays up. With the interrupt
/// watch enabled, Ctrl-C at the menu quits.
pub async fn run_console<L, W, R>(surface: &mut ControlSurface<L, W>, input: R) -> Result<()>
where
    L: DeviceLink,
    W: Write,
    R: AsyncBufRead + Unpin,
{
    surface.say("Hello! I control the sensor board.")?;
    surface.show_menu()?;

    let mut lines = input.lines();
    loop {
        let next = if surface.watch_interrupt {
            tokio::select! {
                line = lines.next_line() => line?,
                _ = tokio::signal::ctrl_c() => {
                    info!("Interrupted at the menu");
                    surface.handle(MenuAction::Quit).await?;
                    break;
                }
            }
        } else {
            lines.next_line().await?
        };

        let Some(line) = next else { break };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let action = match line.parse::<MenuAction>() {
            Ok(action) => action,
            Err(e) => {
                surface.say(&e.to_string())?;
                continue;
            }
        };

        match surface.handle(action).await {
            Ok(Flow::Quit) => break,
            Ok(Flow::Continue) => {}
            Err(e) => {
                error!("Menu action {:?} failed: {}", action, e);
                surface.say(&e.to_string())?;
            }
        }
        if action == MenuAction::IntervalRun {
            surface.show_menu()?;
        }
    }

    Ok(())
}
