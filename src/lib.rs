//! # TSL-550 Driver
//!
//! `tsl550` is a driver for Santec TSL-550 series tunable laser sources.
//! It speaks the instrument's line-oriented ASCII protocol over any
//! `Read + Write` stream and provides high-level access to output
//! parameters (wavelength, frequency, optical power) and to wavelength or
//! frequency sweeps in their continuous, stepwise, one-way, two-way,
//! free-running and externally triggered variants.

extern crate log;

pub mod base;
mod cmds;
mod internals;
mod protocol;
pub mod types;

pub use crate::base::{Channel, Error, Message, Response, Result};
pub use crate::protocol::Tsl550HostProtocol;

// Re-export the sweep vocabulary for convenience.
pub use crate::types::{PowerControl, SweepMode, SweepOptions, SweepStatus};

use crate::cmds::*;
use crate::internals::*;
use log::trace;
use std::io::{Read, Write};
use std::time::Duration;

/// Represents a connection to and control interface for a TSL-550 tunable
/// laser.
///
/// This struct provides methods to tune the laser, set its optical power,
/// program and run sweeps, and query sweep progress. It owns the serial
/// channel exclusively for the lifetime of the connection and mirrors the
/// emission and power-regulation state it has commanded.
///
/// All operations are synchronous request/response: each issues exactly one
/// command and blocks for the matching response line before returning. The
/// mirrored state is a best-effort cache of what was commanded, not a
/// read-back of the hardware; after a transport fault, re-query
/// [`sweep_status`](Tsl550Device::sweep_status) before trusting it.
#[derive(Debug)]
pub struct Tsl550Device<T: ?Sized> {
    channel: Channel<Tsl550HostProtocol, T>,
    timeout: Duration,
    diode_on: bool,
    power_control: PowerControl,
}

/// The derived low-level timing parameter of a sweep: continuous sweeps are
/// described by a speed, stepwise sweeps by a per-step dwell time.
#[derive(Debug, Clone, Copy, PartialEq)]
enum SweepTiming {
    /// Continuous sweep speed in nm/s.
    Speed(f64),
    /// Dwell time per step in seconds.
    StepTime(f64),
}

/// Derives the timing parameter the instrument needs from the high-level
/// sweep intent.
///
/// A two-way sweep covers the range up and back within the same duration,
/// so continuous sweeps run at twice the one-way speed and stepwise sweeps
/// dwell half as long per step. Zero distance, step size, or duration would
/// divide to a non-finite value and is rejected before anything reaches the
/// wire.
fn derive_sweep_timing(
    start: f64,
    stop: f64,
    duration: f64,
    options: &SweepOptions,
) -> Result<SweepTiming> {
    let distance = (stop - start).abs();
    if !(distance > 0.0) || !distance.is_finite() {
        return Err(Error::DegenerateSweepRange {
            description: format!("sweep from {} to {} covers no distance", start, stop),
        });
    }
    if !(duration > 0.0) || !duration.is_finite() {
        return Err(Error::DegenerateSweepRange {
            description: format!("sweep duration must be positive, got {}", duration),
        });
    }

    if options.continuous {
        let mut speed = distance / duration;
        if options.twoway {
            speed *= 2.0;
        }
        Ok(SweepTiming::Speed(speed))
    } else {
        if !(options.step_size > 0.0) || !options.step_size.is_finite() {
            return Err(Error::DegenerateSweepRange {
                description: format!("step size must be positive, got {}", options.step_size),
            });
        }
        let steps = distance / options.step_size;
        let mut step_time = duration / steps;
        if options.twoway {
            step_time /= 2.0;
        }
        Ok(SweepTiming::StepTime(step_time))
    }
}

impl<T: ?Sized> Tsl550Device<T>
where
    T: Read + Write,
{
    /// Constructs a `Tsl550Device` over an existing `Channel` and brings the
    /// instrument to the driver's known initial state.
    ///
    /// Initialization forces emission off before anything else, switches to
    /// automatic power regulation, and programs the default sweep mode, so
    /// the mirrored session state matches the device regardless of what a
    /// previous user left behind.
    ///
    /// # Arguments
    ///
    /// * `channel` - A `Channel` configured with `Tsl550HostProtocol` and
    ///   connected to the instrument's communication stream.
    pub fn new(channel: Channel<Tsl550HostProtocol, T>) -> Result<Tsl550Device<T>> {
        let mut device = Tsl550Device {
            channel,
            timeout: TSL_DEFAULT_TIMEOUT,
            diode_on: false,
            power_control: PowerControl::Auto,
        };
        device.initialize()?;
        Ok(device)
    }

    /// Constructs a `Tsl550Device` directly from a communication stream.
    ///
    /// # Example
    /// ```ignore
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let serial_port = serialport::new("/dev/ttyUSB0", 9600)
    ///     .timeout(std::time::Duration::from_millis(10))
    ///     .open()?;
    /// let mut laser = tsl550::Tsl550Device::with_stream(serial_port)?;
    /// laser.set_wavelength(1550.0)?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn with_stream(stream: Box<T>) -> Result<Tsl550Device<T>> {
        Tsl550Device::new(Channel::new(Tsl550HostProtocol::new(), stream))
    }

    /// Constructs a `Tsl550Device` from a stream, using a non-default
    /// terminator sequence (e.g. `"\r\n"` if the instrument is configured
    /// that way).
    pub fn with_stream_and_terminator(stream: Box<T>, terminator: &str) -> Result<Tsl550Device<T>> {
        let protocol = Tsl550HostProtocol::with_terminator(terminator)?;
        Tsl550Device::new(Channel::new(protocol, stream))
    }

    fn initialize(&mut self) -> Result<()> {
        trace!("Initializing TSL-550 session");
        // emission must never be left ambiguous: force it off first
        self.off()?;
        self.power_auto()?;
        self.set_sweep_mode(&SweepMode::default())?;
        Ok(())
    }

    /// Returns the deadline applied to each command/response exchange.
    pub fn response_timeout(&self) -> Duration {
        self.timeout
    }

    /// Sets the deadline applied to each command/response exchange.
    ///
    /// Exceeding it fails the operation with [`Error::OperationTimeout`];
    /// the instrument may or may not have acted on the command, so re-query
    /// [`sweep_status`](Tsl550Device::sweep_status) before continuing.
    pub fn set_response_timeout(&mut self, timeout: Duration) {
        self.timeout = timeout;
    }

    fn command(&mut self, mnemonic: &str) -> Result<Response> {
        self.channel.invoke(&Message::new(mnemonic), self.timeout)
    }

    fn command_with_payload(&mut self, mnemonic: &str, payload: &str) -> Result<Response> {
        self.channel
            .invoke(&Message::with_payload(mnemonic, payload), self.timeout)
    }

    /// Generic set-or-query for a scalar instrument parameter: formats the
    /// value with the parameter's fixed precision (or sends the bare
    /// mnemonic as a query) and parses the response as a float.
    fn set_var(&mut self, cmd: &ScalarCommand, val: Option<f64>) -> Result<f64> {
        let response = match val {
            Some(value) => {
                let payload = format!("{:.*}", cmd.precision, value);
                self.command_with_payload(cmd.mnemonic, &payload)?
            }
            None => self.command(cmd.mnemonic)?,
        };
        response.parse_f64()
    }

    /// Turn on the laser diode.
    pub fn on(&mut self) -> Result<()> {
        trace!("Enabling laser emission");
        self.diode_on = true;
        self.command(TSL_CMD_DIODE_ON)?;
        Ok(())
    }

    /// Turn off the laser diode.
    pub fn off(&mut self) -> Result<()> {
        trace!("Disabling laser emission");
        self.diode_on = false;
        self.command(TSL_CMD_DIODE_OFF)?;
        Ok(())
    }

    /// Returns the mirrored emission state (`true` after [`on`](Tsl550Device::on)).
    pub fn is_on(&self) -> bool {
        self.diode_on
    }

    /// Turn on automatic power control.
    pub fn power_auto(&mut self) -> Result<()> {
        trace!("Switching to automatic power control");
        self.power_control = PowerControl::Auto;
        self.command(TSL_CMD_POWER_AUTO)?;
        Ok(())
    }

    /// Turn on manual power control.
    pub fn power_manual(&mut self) -> Result<()> {
        trace!("Switching to manual power control");
        self.power_control = PowerControl::Manual;
        self.command(TSL_CMD_POWER_MANUAL)?;
        Ok(())
    }

    /// Returns the mirrored power regulation regime.
    pub fn power_control(&self) -> PowerControl {
        self.power_control
    }

    /// Queries the current wavelength in nm.
    pub fn wavelength(&mut self) -> Result<f64> {
        self.set_var(&TSL_CMD_WAVELENGTH, None)
    }

    /// Tunes the laser to a new wavelength in nm and returns the echoed value.
    pub fn set_wavelength(&mut self, nm: f64) -> Result<f64> {
        self.set_var(&TSL_CMD_WAVELENGTH, Some(nm))
    }

    /// Queries the current frequency in THz.
    pub fn frequency(&mut self) -> Result<f64> {
        self.set_var(&TSL_CMD_FREQUENCY, None)
    }

    /// Tunes the laser to a new frequency in THz and returns the echoed value.
    pub fn set_frequency(&mut self, thz: f64) -> Result<f64> {
        self.set_var(&TSL_CMD_FREQUENCY, Some(thz))
    }

    /// Queries the optical output power in mW.
    pub fn power_mw(&mut self) -> Result<f64> {
        self.set_var(&TSL_CMD_POWER_MW, None)
    }

    /// Sets the optical output power in mW.
    pub fn set_power_mw(&mut self, mw: f64) -> Result<f64> {
        self.set_var(&TSL_CMD_POWER_MW, Some(mw))
    }

    /// Queries the optical output power in dBm.
    pub fn power_dbm(&mut self) -> Result<f64> {
        self.set_var(&TSL_CMD_POWER_DBM, None)
    }

    /// Sets the optical output power in dBm.
    pub fn set_power_dbm(&mut self, dbm: f64) -> Result<f64> {
        self.set_var(&TSL_CMD_POWER_DBM, Some(dbm))
    }

    /// Queries the continuous sweep speed in nm/s.
    pub fn sweep_speed(&mut self) -> Result<f64> {
        self.set_var(&TSL_CMD_SWEEP_SPEED, None)
    }

    /// Sets the continuous sweep speed in nm/s.
    pub fn set_sweep_speed(&mut self, nm_per_s: f64) -> Result<f64> {
        self.set_var(&TSL_CMD_SWEEP_SPEED, Some(nm_per_s))
    }

    /// Queries the stepwise sweep step size in nm.
    pub fn sweep_step_wavelength(&mut self) -> Result<f64> {
        self.set_var(&TSL_CMD_SWEEP_STEP_WAVELENGTH, None)
    }

    /// Sets the stepwise sweep step size in nm.
    pub fn set_sweep_step_wavelength(&mut self, nm: f64) -> Result<f64> {
        self.set_var(&TSL_CMD_SWEEP_STEP_WAVELENGTH, Some(nm))
    }

    /// Queries the stepwise sweep step size in THz (constant-frequency-step mode).
    pub fn sweep_step_frequency(&mut self) -> Result<f64> {
        self.set_var(&TSL_CMD_SWEEP_STEP_FREQUENCY, None)
    }

    /// Sets the stepwise sweep step size in THz (constant-frequency-step mode).
    pub fn set_sweep_step_frequency(&mut self, thz: f64) -> Result<f64> {
        self.set_var(&TSL_CMD_SWEEP_STEP_FREQUENCY, Some(thz))
    }

    /// Queries the dwell time per step in seconds.
    pub fn sweep_step_time(&mut self) -> Result<f64> {
        self.set_var(&TSL_CMD_SWEEP_STEP_TIME, None)
    }

    /// Sets the dwell time per step in seconds.
    pub fn set_sweep_step_time(&mut self, seconds: f64) -> Result<f64> {
        self.set_var(&TSL_CMD_SWEEP_STEP_TIME, Some(seconds))
    }

    /// Queries the delay between consecutive sweeps in seconds.
    pub fn sweep_delay(&mut self) -> Result<f64> {
        self.set_var(&TSL_CMD_SWEEP_DELAY, None)
    }

    /// Sets the delay between consecutive sweeps in seconds.
    pub fn set_sweep_delay(&mut self, seconds: f64) -> Result<f64> {
        self.set_var(&TSL_CMD_SWEEP_DELAY, Some(seconds))
    }

    pub fn sweep_start_wavelength(&mut self) -> Result<f64> {
        self.set_var(&TSL_CMD_SWEEP_START_WAVELENGTH, None)
    }

    pub fn set_sweep_start_wavelength(&mut self, nm: f64) -> Result<f64> {
        self.set_var(&TSL_CMD_SWEEP_START_WAVELENGTH, Some(nm))
    }

    pub fn sweep_end_wavelength(&mut self) -> Result<f64> {
        self.set_var(&TSL_CMD_SWEEP_END_WAVELENGTH, None)
    }

    pub fn set_sweep_end_wavelength(&mut self, nm: f64) -> Result<f64> {
        self.set_var(&TSL_CMD_SWEEP_END_WAVELENGTH, Some(nm))
    }

    pub fn sweep_start_frequency(&mut self) -> Result<f64> {
        self.set_var(&TSL_CMD_SWEEP_START_FREQUENCY, None)
    }

    pub fn set_sweep_start_frequency(&mut self, thz: f64) -> Result<f64> {
        self.set_var(&TSL_CMD_SWEEP_START_FREQUENCY, Some(thz))
    }

    pub fn sweep_end_frequency(&mut self) -> Result<f64> {
        self.set_var(&TSL_CMD_SWEEP_END_FREQUENCY, None)
    }

    pub fn set_sweep_end_frequency(&mut self, thz: f64) -> Result<f64> {
        self.set_var(&TSL_CMD_SWEEP_END_FREQUENCY, Some(thz))
    }

    /// Queries the current sweep mode and decodes it through the mode table.
    pub fn sweep_mode(&mut self) -> Result<SweepMode> {
        let response = self.command(TSL_CMD_SWEEP_MODE)?;
        SweepMode::from_code(response.parse_code()?)
    }

    /// Programs the sweep mode.
    ///
    /// Fails with [`Error::InvalidSweepConfiguration`] without sending
    /// anything when the mode combines continuous operation with constant
    /// frequency steps.
    pub fn set_sweep_mode(&mut self, mode: &SweepMode) -> Result<()> {
        let code = mode.code()?;
        trace!("Programming sweep mode {:?} as code {}", mode, code);
        self.command_with_payload(TSL_CMD_SWEEP_MODE, &code.to_string())?;
        Ok(())
    }

    /// Sweeps the output wavelength between two bounds.
    ///
    /// Programs the bounds and the inter-sweep delay, derives the timing
    /// (speed for continuous sweeps, per-step dwell time for stepwise
    /// sweeps), programs the mode, turns the diode on if the session
    /// believes it is off, and starts the sweep.
    ///
    /// On failure the instrument may be left partially programmed;
    /// re-synchronize via [`sweep_mode`](Tsl550Device::sweep_mode) and
    /// [`sweep_status`](Tsl550Device::sweep_status) before retrying.
    ///
    /// # Arguments
    ///
    /// * `start` - Starting wavelength in nm.
    /// * `stop` - Ending wavelength in nm.
    /// * `duration` - Time for one sweep cycle in seconds.
    /// * `options` - Repeat count, delay, step size, and mode axes.
    pub fn sweep_wavelength(
        &mut self,
        start: f64,
        stop: f64,
        duration: f64,
        options: &SweepOptions,
    ) -> Result<()> {
        trace!(
            "Sweeping wavelength {} -> {} nm over {} s",
            start,
            stop,
            duration
        );
        self.set_sweep_start_wavelength(start)?;
        self.set_sweep_end_wavelength(stop)?;
        self.program_sweep(start, stop, duration, options, false)
    }

    /// Sweeps the output frequency between two bounds.
    ///
    /// Frequency sweeps step in constant frequency increments, which the
    /// instrument only supports in stepwise operation: requesting a
    /// continuous frequency sweep fails with
    /// [`Error::InvalidSweepConfiguration`] at the mode-programming step.
    ///
    /// # Arguments
    ///
    /// * `start` - Starting frequency in THz.
    /// * `stop` - Ending frequency in THz.
    /// * `duration` - Time for one sweep cycle in seconds.
    /// * `options` - Repeat count, delay, step size, and mode axes.
    pub fn sweep_frequency(
        &mut self,
        start: f64,
        stop: f64,
        duration: f64,
        options: &SweepOptions,
    ) -> Result<()> {
        trace!(
            "Sweeping frequency {} -> {} THz over {} s",
            start,
            stop,
            duration
        );
        self.set_sweep_start_frequency(start)?;
        self.set_sweep_end_frequency(stop)?;
        self.program_sweep(start, stop, duration, options, true)
    }

    fn program_sweep(
        &mut self,
        start: f64,
        stop: f64,
        duration: f64,
        options: &SweepOptions,
        const_freq_step: bool,
    ) -> Result<()> {
        self.set_sweep_delay(options.delay)?;

        match derive_sweep_timing(start, stop, duration, options)? {
            SweepTiming::Speed(speed) => {
                trace!("Derived continuous sweep speed {} nm/s", speed);
                self.set_sweep_speed(speed)?;
            }
            SweepTiming::StepTime(step_time) => {
                trace!("Derived per-step dwell time {} s", step_time);
                self.set_sweep_step_time(step_time)?;
            }
        }

        self.set_sweep_mode(&SweepMode {
            continuous: options.continuous,
            twoway: options.twoway,
            trigger: options.trigger,
            const_freq_step,
        })?;

        // a sweep cannot run with emission disabled
        if !self.diode_on {
            self.on()?;
        }

        self.sweep_start(options.repeats)
    }

    /// Programs the repeat count and starts sweeping between the bounds and
    /// mode already on the instrument.
    ///
    /// # Arguments
    ///
    /// * `repeats` - How many times to run the sweep.
    pub fn sweep_start(&mut self, repeats: u32) -> Result<()> {
        trace!("Starting sweep with {} repeat(s)", repeats);
        self.command_with_payload(TSL_CMD_SWEEP_COUNT, &repeats.to_string())?;
        self.command(TSL_CMD_SWEEP_START)?;
        Ok(())
    }

    /// Pauses the running sweep. Use [`sweep_resume`](Tsl550Device::sweep_resume) to resume.
    pub fn sweep_pause(&mut self) -> Result<()> {
        trace!("Pausing sweep");
        self.command(TSL_CMD_SWEEP_PAUSE)?;
        Ok(())
    }

    /// Resumes a paused sweep.
    pub fn sweep_resume(&mut self) -> Result<()> {
        trace!("Resuming sweep");
        self.command(TSL_CMD_SWEEP_RESUME)?;
        Ok(())
    }

    /// Prematurely quits the sweep.
    ///
    /// With `immediate` the sweep is paused first and stops at once,
    /// discarding the remainder of the current pass. Without it, a
    /// continuous sweep finishes the current pass before halting.
    pub fn sweep_stop(&mut self, immediate: bool) -> Result<()> {
        trace!("Stopping sweep (immediate: {})", immediate);
        if immediate {
            self.sweep_pause()?;
        }
        self.command(TSL_CMD_SWEEP_QUIT)?;
        Ok(())
    }

    /// Queries the condition of the sweeping function.
    ///
    /// [`SweepStatus::WaitingForTrigger`] means the sweep is armed on an
    /// external trigger that has not arrived; [`SweepStatus::Jumping`] means
    /// the laser is transitioning between one one-way sweep and the next
    /// repeat. A code outside 0-4 fails with
    /// [`Error::UnknownStatusCode`].
    pub fn sweep_status(&mut self) -> Result<SweepStatus> {
        let response = self.command(TSL_CMD_SWEEP_STATUS)?;
        SweepStatus::from_code(response.parse_code()?)
    }
}

#[cfg(feature = "serialport")]
impl Tsl550Device<dyn serialport::SerialPort> {
    /// Opens the serial port at the instrument's factory-default 9600 baud
    /// and initializes the laser.
    ///
    /// # Arguments
    ///
    /// * `path` - Serial port path (e.g. `/dev/ttyUSB0`, or `COM3` on Windows).
    pub fn open(path: &str) -> Result<Tsl550Device<dyn serialport::SerialPort>> {
        Tsl550Device::open_with_baud_rate(path, TSL_DEFAULT_BAUD_RATE)
    }

    /// Opens the serial port at a caller-supplied baud rate (settable on the
    /// instrument) and initializes the laser.
    ///
    /// The port is configured with a short read timeout; the per-exchange
    /// response deadline is enforced by the driver (see
    /// [`set_response_timeout`](Tsl550Device::set_response_timeout)).
    pub fn open_with_baud_rate(
        path: &str,
        baud_rate: u32,
    ) -> Result<Tsl550Device<dyn serialport::SerialPort>> {
        trace!("Opening serial port {} at {} baud", path, baud_rate);
        let port = serialport::new(path, baud_rate)
            .timeout(TSL_PORT_READ_TIMEOUT)
            .open()
            .map_err(|err| Error::IoError(err.into()))?;
        Tsl550Device::with_stream(port)
    }
}
