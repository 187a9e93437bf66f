use std::time::Duration;

/// Default deadline for waiting for a terminator-delimited response.
pub const TSL_DEFAULT_TIMEOUT: Duration = Duration::from_secs(1);

/// Factory-default baud rate of the instrument's serial interface.
#[cfg(feature = "serialport")]
pub const TSL_DEFAULT_BAUD_RATE: u32 = 9600;

/// Read timeout configured on an opened serial port. Short on purpose: the
/// channel polls the port and enforces the overall response deadline itself.
#[cfg(feature = "serialport")]
pub const TSL_PORT_READ_TIMEOUT: Duration = Duration::from_millis(10);
