use crate::base::error::{Error, Result};

/// Represents a command destined for the laser: an ASCII mnemonic plus an
/// optional ASCII argument appended directly after it.
#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    /// The command mnemonic (e.g. `"WA"` for wavelength).
    pub mnemonic: String,

    /// Optional argument text concatenated after the mnemonic. Empty for
    /// bare queries and action commands.
    pub payload: String,
}

impl Message {
    /// Creates a new message with a mnemonic and no argument (a query or an
    /// action command).
    ///
    /// # Arguments
    ///
    /// * `mnemonic` - The command mnemonic for the message.
    pub fn new(mnemonic: &str) -> Message {
        Message::with_payload(mnemonic, "")
    }

    /// Creates a new message with a mnemonic and argument text.
    ///
    /// # Arguments
    ///
    /// * `mnemonic` - The command mnemonic for the message.
    /// * `payload` - The pre-formatted argument text.
    #[inline]
    pub fn with_payload(mnemonic: &str, payload: &str) -> Message {
        Message {
            mnemonic: mnemonic.to_owned(),
            payload: payload.to_owned(),
        }
    }

    /// Returns the wire text of the command, without the terminator.
    pub fn text(&self) -> String {
        format!("{}{}", self.mnemonic, self.payload)
    }
}

/// One terminator-delimited line received from the laser, with the
/// terminator already stripped.
#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    text: String,
}

impl Response {
    /// Wraps a decoded line in a `Response`.
    pub fn new(text: String) -> Response {
        Response { text }
    }

    /// Returns the raw response text.
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Parses the response as a floating-point parameter value.
    ///
    /// Fails with [`Error::MalformedResponse`] when the payload is not a
    /// number, which indicates either line desynchronization or an
    /// instrument-side error report.
    pub fn parse_f64(&self) -> Result<f64> {
        self.text
            .trim()
            .parse::<f64>()
            .map_err(|_| Error::MalformedResponse {
                response: self.text.clone(),
            })
    }

    /// Parses the response as a small integer code (sweep mode or status).
    pub fn parse_code(&self) -> Result<u8> {
        self.text
            .trim()
            .parse::<u8>()
            .map_err(|_| Error::MalformedResponse {
                response: self.text.clone(),
            })
    }
}
