// Action commands without an argument

/// Command mnemonic to enable the laser diode (start emission).
pub const TSL_CMD_DIODE_ON: &str = "LO";

/// Command mnemonic to disable the laser diode (stop emission).
pub const TSL_CMD_DIODE_OFF: &str = "LF";

/// Command mnemonic to switch to automatic optical power regulation.
pub const TSL_CMD_POWER_AUTO: &str = "AF";

/// Command mnemonic to switch to manual optical power regulation.
pub const TSL_CMD_POWER_MANUAL: &str = "AO";

/// Command mnemonic to start the programmed sweep.
pub const TSL_CMD_SWEEP_START: &str = "SG";

/// Command mnemonic to pause a running sweep.
pub const TSL_CMD_SWEEP_PAUSE: &str = "SP";

/// Command mnemonic to resume a paused sweep.
pub const TSL_CMD_SWEEP_RESUME: &str = "SR";

/// Command mnemonic to quit the sweep. In continuous mode the current pass
/// finishes first unless the sweep was paused beforehand.
pub const TSL_CMD_SWEEP_QUIT: &str = "SQ";

// Commands with an integer argument (set) or integer response (query)

/// Command mnemonic for the sweep mode code (set `SM<1..12>`, query `SM`).
pub const TSL_CMD_SWEEP_MODE: &str = "SM";

/// Command mnemonic for the number of sweep repeats (`SZ<n>`).
pub const TSL_CMD_SWEEP_COUNT: &str = "SZ";

/// Query mnemonic for the sweep execution status (returns an integer 0-4).
pub const TSL_CMD_SWEEP_STATUS: &str = "SK";

// Scalar parameters: mnemonic plus fixed decimal precision

/// A scalar instrument parameter addressed by mnemonic, whose argument and
/// response are a decimal number with a fixed number of fractional digits.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct ScalarCommand {
    /// The command mnemonic.
    pub mnemonic: &'static str,

    /// Number of fractional digits used when formatting a value to set.
    pub precision: usize,
}

/// Output wavelength in nanometers.
pub const TSL_CMD_WAVELENGTH: ScalarCommand = ScalarCommand {
    mnemonic: "WA",
    precision: 4,
};

/// Output frequency in terahertz.
pub const TSL_CMD_FREQUENCY: ScalarCommand = ScalarCommand {
    mnemonic: "FQ",
    precision: 5,
};

/// Optical output power in milliwatts.
pub const TSL_CMD_POWER_MW: ScalarCommand = ScalarCommand {
    mnemonic: "LP",
    precision: 2,
};

/// Optical output power in decibel-milliwatts.
pub const TSL_CMD_POWER_DBM: ScalarCommand = ScalarCommand {
    mnemonic: "OP",
    precision: 2,
};

/// Continuous sweep speed in nanometers per second.
pub const TSL_CMD_SWEEP_SPEED: ScalarCommand = ScalarCommand {
    mnemonic: "SN",
    precision: 1,
};

/// Stepwise sweep step size in nanometers.
pub const TSL_CMD_SWEEP_STEP_WAVELENGTH: ScalarCommand = ScalarCommand {
    mnemonic: "WW",
    precision: 4,
};

/// Stepwise sweep step size in terahertz (constant-frequency-step mode).
pub const TSL_CMD_SWEEP_STEP_FREQUENCY: ScalarCommand = ScalarCommand {
    mnemonic: "WF",
    precision: 5,
};

/// Dwell time per step in seconds for stepwise sweeps.
pub const TSL_CMD_SWEEP_STEP_TIME: ScalarCommand = ScalarCommand {
    mnemonic: "SB",
    precision: 2,
};

/// Delay between consecutive sweeps in seconds.
pub const TSL_CMD_SWEEP_DELAY: ScalarCommand = ScalarCommand {
    mnemonic: "SA",
    precision: 1,
};

/// Sweep start bound in nanometers.
pub const TSL_CMD_SWEEP_START_WAVELENGTH: ScalarCommand = ScalarCommand {
    mnemonic: "SS",
    precision: 4,
};

/// Sweep end bound in nanometers.
pub const TSL_CMD_SWEEP_END_WAVELENGTH: ScalarCommand = ScalarCommand {
    mnemonic: "SE",
    precision: 4,
};

/// Sweep start bound in terahertz.
pub const TSL_CMD_SWEEP_START_FREQUENCY: ScalarCommand = ScalarCommand {
    mnemonic: "FS",
    precision: 5,
};

/// Sweep end bound in terahertz.
pub const TSL_CMD_SWEEP_END_FREQUENCY: ScalarCommand = ScalarCommand {
    mnemonic: "FF",
    precision: 5,
};
