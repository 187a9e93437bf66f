use std::error;
use std::fmt;
use std::io;

/// Represents errors that can occur while talking to the laser.
#[derive(Debug)]
pub enum Error {
    /// An I/O error occurred on the underlying stream (e.g., serial port).
    IoError(io::Error),

    /// No terminator-delimited response arrived before the deadline.
    ///
    /// The instrument's actual state is unknown after a timeout; callers
    /// should re-query the sweep status before issuing further commands.
    OperationTimeout,

    /// The byte stream violated the line protocol. Contains a description of the framing error.
    ProtocolError { description: String },

    /// A response line could not be parsed as the expected numeric payload.
    MalformedResponse { response: String },

    /// The sweep status query returned a code outside the known range.
    UnknownStatusCode(u8),

    /// A sweep mode tuple or code has no entry in the mode table.
    InvalidSweepConfiguration { description: String },

    /// Sweep parameters whose distance, step size, or duration is zero would
    /// derive a non-finite speed or step time.
    DegenerateSweepRange { description: String },

    /// The buffer provided is too small for command encoding.
    BufferTooSmall,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::IoError(err) => write!(f, "io error: {}", err),
            Error::OperationTimeout => write!(f, "operation timeout"),
            Error::ProtocolError { description } => write!(f, "protocol error: {}", description),
            Error::MalformedResponse { response } => {
                write!(f, "malformed response: {:?}", response)
            }
            Error::UnknownStatusCode(code) => write!(f, "unknown sweep status code: {}", code),
            Error::InvalidSweepConfiguration { description } => {
                write!(f, "invalid sweep configuration: {}", description)
            }
            Error::DegenerateSweepRange { description } => {
                write!(f, "degenerate sweep range: {}", description)
            }
            Error::BufferTooSmall => write!(f, "buffer is too small for command encoding"),
        }
    }
}

impl error::Error for Error {}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Error::IoError(err)
    }
}

/// A specialized `Result` type for TSL-550 operations.
pub type Result<T> = std::result::Result<T, Error>;
