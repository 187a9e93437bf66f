use crate::base::{Error, Result};

/// Sweep operation mode along four independent axes.
///
/// - Continuous or stepwise:
///   the wavelength/frequency either varies smoothly at a fixed rate or
///   advances in discrete increments, dwelling at each.
/// - One-way or two-way:
///   a two-way sweep traverses the range forward then backward within the
///   same cycle.
/// - Free-running or armed on an external trigger.
/// - Distance-stepped (nm) or frequency-stepped (THz) increments; the
///   instrument only supports frequency-stepped increments in stepwise
///   operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SweepMode {
    /// Smooth sweep at a fixed rate instead of discrete steps.
    pub continuous: bool,

    /// Traverse the range forward then backward within one cycle.
    pub twoway: bool,

    /// Arm the sweep on an external trigger instead of starting immediately.
    pub trigger: bool,

    /// Step in constant frequency increments (stepwise operation only).
    pub const_freq_step: bool,
}

const fn mode(continuous: bool, twoway: bool, trigger: bool, const_freq_step: bool) -> SweepMode {
    SweepMode {
        continuous,
        twoway,
        trigger,
        const_freq_step,
    }
}

/// The instrument's `SM` code for each of the 12 supported mode tuples.
///
/// This table is the single authority for the mapping; both directions scan
/// it, so encode and decode cannot drift apart. The four tuples combining
/// `continuous` with `const_freq_step` are deliberately absent.
const SWEEP_MODE_TABLE: [(SweepMode, u8); 12] = [
    (mode(true, false, false, false), 1),
    (mode(true, true, false, false), 2),
    (mode(false, false, false, false), 3),
    (mode(false, true, false, false), 4),
    (mode(false, false, false, true), 5),
    (mode(false, true, false, true), 6),
    (mode(true, false, true, false), 7),
    (mode(true, true, true, false), 8),
    (mode(false, false, true, false), 9),
    (mode(false, true, true, false), 10),
    (mode(false, false, true, true), 11),
    (mode(false, true, true, true), 12),
];

impl SweepMode {
    /// Returns the instrument's integer code for this mode.
    ///
    /// Fails with [`Error::InvalidSweepConfiguration`] for the excluded
    /// combinations (constant frequency steps require stepwise operation).
    pub fn code(&self) -> Result<u8> {
        for (entry, code) in SWEEP_MODE_TABLE {
            if entry == *self {
                return Ok(code);
            }
        }

        Err(Error::InvalidSweepConfiguration {
            description: format!(
                "no mode code for continuous={} twoway={} trigger={} const_freq_step={}",
                self.continuous, self.twoway, self.trigger, self.const_freq_step
            ),
        })
    }

    /// Returns the mode tuple for an instrument code.
    ///
    /// An out-of-table code means the instrument speaks a different code set
    /// than this driver; it fails with [`Error::InvalidSweepConfiguration`]
    /// and is never mapped to a default.
    pub fn from_code(code: u8) -> Result<SweepMode> {
        for (entry, entry_code) in SWEEP_MODE_TABLE {
            if entry_code == code {
                return Ok(entry);
            }
        }

        Err(Error::InvalidSweepConfiguration {
            description: format!("unknown sweep mode code: {}", code),
        })
    }
}

impl Default for SweepMode {
    /// The power-on configuration this driver programs at connection time:
    /// continuous, two-way, free-running, distance-stepped (code 2).
    fn default() -> SweepMode {
        mode(true, true, false, false)
    }
}

/// Condition of the sweeping function as reported by the `SK` query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SweepStatus {
    /// No sweep is active.
    Off,
    /// A sweep is in progress.
    Running,
    /// The sweep is paused; resume continues it.
    Paused,
    /// The sweep is armed on an external trigger that has not arrived yet.
    WaitingForTrigger,
    /// The laser is transitioning between the end of one sweep and the
    /// start of the next repeat in one-way stepwise mode.
    Jumping,
}

impl SweepStatus {
    /// Decodes the instrument's numeric status code.
    ///
    /// Fails with [`Error::UnknownStatusCode`] for anything outside 0-4
    /// rather than guessing at a state.
    pub fn from_code(code: u8) -> Result<SweepStatus> {
        match code {
            0 => Ok(SweepStatus::Off),
            1 => Ok(SweepStatus::Running),
            2 => Ok(SweepStatus::Paused),
            3 => Ok(SweepStatus::WaitingForTrigger),
            4 => Ok(SweepStatus::Jumping),
            other => Err(Error::UnknownStatusCode(other)),
        }
    }
}

/// Optical power regulation regime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PowerControl {
    /// The instrument regulates output power automatically.
    Auto,
    /// Output power follows the manually programmed level.
    Manual,
}

/// Options for configuring a sweep operation.
///
/// `start`, `stop` and `duration` are passed to the sweep methods directly;
/// everything else about the sweep lives here with sensible defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct SweepOptions {
    /// How many times to run the sweep.
    pub repeats: u32,

    /// Delay between consecutive sweeps, in seconds.
    pub delay: f64,

    /// Sweep continuously at a derived speed instead of in discrete steps.
    pub continuous: bool,

    /// Step size for stepwise sweeps, in the units of the swept axis
    /// (nm or THz). Only used to derive the per-step dwell time.
    pub step_size: f64,

    /// Traverse the range forward then backward within each cycle.
    pub twoway: bool,

    /// Arm the sweep on an external trigger instead of starting at once.
    pub trigger: bool,
}

impl SweepOptions {
    /// Creates options for a stepwise sweep with the given step size.
    ///
    /// # Arguments
    ///
    /// * `step_size` - Step increment in the units of the swept axis.
    pub fn stepwise(step_size: f64) -> SweepOptions {
        SweepOptions {
            continuous: false,
            step_size,
            ..SweepOptions::default()
        }
    }

    /// Creates options for a sweep armed on an external trigger.
    pub fn triggered() -> SweepOptions {
        SweepOptions {
            trigger: true,
            ..SweepOptions::default()
        }
    }
}

impl Default for SweepOptions {
    /// Creates default `SweepOptions`: one repeat, no inter-sweep delay,
    /// continuous, two-way, free-running.
    fn default() -> SweepOptions {
        SweepOptions {
            repeats: 1,
            delay: 0.0,
            continuous: true,
            step_size: 1.0,
            twoway: true,
            trigger: false,
        }
    }
}
