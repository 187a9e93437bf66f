use crate::base::{Error, Message, ProtocolDecoder, ProtocolEncoder, Response, Result};
use log::{error, trace};
use std::io::Write;

/// Default terminator closing every command and response line.
const TSL_DEFAULT_TERMINATOR: &str = "\r";

/// The implementation of the TSL-550 host communication protocol.
///
/// Commands and responses are 7-bit ASCII lines closed by a terminator
/// sequence (carriage return unless the instrument is configured
/// differently). This struct handles encoding commands (`Message` -> bytes)
/// and decoding responses (bytes -> `Response`) by accumulating bytes until
/// the terminator sequence is matched, tolerating the terminator arriving
/// split across reads.
#[derive(Debug, Clone, PartialEq)]
pub struct Tsl550HostProtocol {
    terminator: Vec<u8>,
    line: Vec<u8>,
    matched: usize,
}

impl Tsl550HostProtocol {
    /// Creates a new `Tsl550HostProtocol` using the carriage-return
    /// terminator the instrument ships with.
    pub fn new() -> Tsl550HostProtocol {
        Tsl550HostProtocol {
            terminator: TSL_DEFAULT_TERMINATOR.as_bytes().to_vec(),
            line: Vec::new(),
            matched: 0,
        }
    }

    /// Creates a `Tsl550HostProtocol` with a non-default terminator
    /// sequence, matching whatever the instrument's communication settings
    /// are (e.g. `"\r\n"`).
    ///
    /// Fails with [`Error::ProtocolError`] when `terminator` is empty or not
    /// ASCII, since no line could ever be framed with it.
    pub fn with_terminator(terminator: &str) -> Result<Tsl550HostProtocol> {
        if terminator.is_empty() || !terminator.is_ascii() {
            return Err(Error::ProtocolError {
                description: format!("unusable terminator sequence: {:?}", terminator),
            });
        }

        Ok(Tsl550HostProtocol {
            terminator: terminator.as_bytes().to_vec(),
            line: Vec::new(),
            matched: 0,
        })
    }

    /// Returns the terminator byte sequence in use.
    pub fn terminator(&self) -> &[u8] {
        &self.terminator
    }

    fn complete_line(&mut self) -> Result<Response> {
        let bytes = std::mem::take(&mut self.line);
        self.matched = 0;
        match String::from_utf8(bytes) {
            Ok(text) => {
                trace!("Decoded response line: {:?}", text);
                Ok(Response::new(text))
            }
            Err(err) => Err(Error::ProtocolError {
                description: format!("response is not valid ASCII: {}", err),
            }),
        }
    }
}

impl Default for Tsl550HostProtocol {
    fn default() -> Tsl550HostProtocol {
        Tsl550HostProtocol::new()
    }
}

impl ProtocolDecoder for Tsl550HostProtocol {
    /// Consumes bytes until the terminator sequence completes a line, then
    /// returns the line with the terminator stripped. Bytes after the
    /// terminator are left for the next call.
    fn decode(&mut self, buf: &[u8]) -> Result<(usize, Option<Response>)> {
        for (index, &byte) in buf.iter().enumerate() {
            if !byte.is_ascii() {
                error!("Non-ASCII byte {:#04x} in response stream", byte);
                self.reset_decoder();
                return Err(Error::ProtocolError {
                    description: format!("non-ASCII byte {:#04x} in response", byte),
                });
            }

            if byte == self.terminator[self.matched] {
                self.matched += 1;
                if self.matched == self.terminator.len() {
                    let response = self.complete_line()?;
                    return Ok((index + 1, Some(response)));
                }
            } else {
                // a broken partial terminator match belongs to the payload
                for matched_index in 0..self.matched {
                    let flushed = self.terminator[matched_index];
                    self.line.push(flushed);
                }
                if byte == self.terminator[0] {
                    self.matched = 1;
                } else {
                    self.matched = 0;
                    self.line.push(byte);
                }
            }
        }

        Ok((buf.len(), None))
    }

    fn reset_decoder(&mut self) {
        self.line.clear();
        self.matched = 0;
    }
}

impl ProtocolEncoder for Tsl550HostProtocol {
    /// Encodes a command as its ASCII text followed by the terminator.
    fn encode(&mut self, msg: &Message, bytes: &mut [u8]) -> Result<usize> {
        let text = msg.text();
        if !text.is_ascii() {
            return Err(Error::ProtocolError {
                description: format!("command is not ASCII: {:?}", text),
            });
        }

        let total = text.len() + self.terminator.len();
        if bytes.len() < total {
            return Err(Error::BufferTooSmall);
        }

        bytes[..text.len()].copy_from_slice(text.as_bytes());
        bytes[text.len()..total].copy_from_slice(&self.terminator);
        Ok(total)
    }

    fn estimate_encoded_size(&mut self, msg: &Message) -> Result<usize> {
        Ok(msg.text().len() + self.terminator.len())
    }

    /// Encodes a command `Message` and writes it in one piece to a `Write`
    /// target.
    fn write_to(&mut self, msg: &Message, dest: &mut impl Write) -> Result<usize> {
        let estimated_encoded_size = self.estimate_encoded_size(msg)?;
        let mut buf = vec![0; estimated_encoded_size];
        let encoded_size = self.encode(msg, &mut buf[0..estimated_encoded_size])?;
        trace!("Writing command bytes: {:?}", &buf[0..encoded_size]);
        match dest.write_all(&buf[0..encoded_size]) {
            Ok(()) => Ok(encoded_size),
            Err(err) => {
                error!("IO error during write_all: {}", err);
                Err(err.into())
            }
        }
    }

    fn reset_encoder(&mut self) {
        // stateless
    }
}

#[cfg(test)]
mod tests {
    use crate::base::{Error, Message, ProtocolDecoder, ProtocolEncoder, Result};
    use crate::protocol::Tsl550HostProtocol;

    fn encode<T: ProtocolEncoder>(protocol: &mut T, msg: &Message) -> Result<Vec<u8>> {
        let encoded_bytes = protocol.estimate_encoded_size(msg)?;
        let mut buf = vec![0; encoded_bytes];
        let encoded_bytes = protocol.encode(msg, &mut buf[0..encoded_bytes])?;
        buf.truncate(encoded_bytes);
        Ok(buf)
    }

    #[test]
    fn protocol_encode() {
        let mut protocol = Tsl550HostProtocol::new();

        assert_eq!(
            encode(&mut protocol, &Message::new("WA")).unwrap().as_slice(),
            b"WA\r"
        );

        assert_eq!(
            encode(&mut protocol, &Message::with_payload("WA", "1550.1234"))
                .unwrap()
                .as_slice(),
            b"WA1550.1234\r"
        );
    }

    #[test]
    fn protocol_encode_rejects_non_ascii() {
        let mut protocol = Tsl550HostProtocol::new();
        let result = encode(&mut protocol, &Message::with_payload("WA", "µ"));
        assert!(matches!(result, Err(Error::ProtocolError { .. })));
    }

    #[test]
    fn decode_strips_terminator() {
        let mut protocol = Tsl550HostProtocol::new();
        let (consumed, response) = protocol.decode(b"1550.1234\r").unwrap();
        assert_eq!(consumed, 10);
        assert_eq!(response.unwrap().as_str(), "1550.1234");
    }

    #[test]
    fn decode_leaves_bytes_after_the_terminator() {
        let mut protocol = Tsl550HostProtocol::new();
        let (consumed, response) = protocol.decode(b"0\r42").unwrap();
        assert_eq!(consumed, 2);
        assert_eq!(response.unwrap().as_str(), "0");

        let (consumed, response) = protocol.decode(b"42\r").unwrap();
        assert_eq!(consumed, 3);
        assert_eq!(response.unwrap().as_str(), "42");
    }

    #[test]
    fn decode_accumulates_across_reads() {
        let mut protocol = Tsl550HostProtocol::new();

        let (consumed, response) = protocol.decode(b"15").unwrap();
        assert_eq!(consumed, 2);
        assert!(response.is_none());

        let (consumed, response) = protocol.decode(b"50.0000\r").unwrap();
        assert_eq!(consumed, 8);
        assert_eq!(response.unwrap().as_str(), "1550.0000");
    }

    #[test]
    fn decode_empty_line() {
        let mut protocol = Tsl550HostProtocol::new();
        let (consumed, response) = protocol.decode(b"\r").unwrap();
        assert_eq!(consumed, 1);
        assert_eq!(response.unwrap().as_str(), "");
    }

    #[test]
    fn multi_byte_terminator_with_partial_match_in_payload() {
        let mut protocol = Tsl550HostProtocol::with_terminator("\r\n").unwrap();

        // the lone CR inside the payload must not end the line
        let (consumed, response) = protocol.decode(b"a\rb\r\n").unwrap();
        assert_eq!(consumed, 5);
        assert_eq!(response.unwrap().as_str(), "a\rb");

        // a broken match may itself start a new match
        let (_, response) = protocol.decode(b"x\r\r\n").unwrap();
        assert_eq!(response.unwrap().as_str(), "x\r");
    }

    #[test]
    fn multi_byte_terminator_split_across_reads() {
        let mut protocol = Tsl550HostProtocol::with_terminator("\r\n").unwrap();

        let (_, response) = protocol.decode(b"12.5\r").unwrap();
        assert!(response.is_none());

        let (consumed, response) = protocol.decode(b"\n").unwrap();
        assert_eq!(consumed, 1);
        assert_eq!(response.unwrap().as_str(), "12.5");
    }

    #[test]
    fn decode_rejects_non_ascii() {
        let mut protocol = Tsl550HostProtocol::new();
        let result = protocol.decode(&[b'1', 0x80, b'\r']);
        assert!(matches!(result, Err(Error::ProtocolError { .. })));
    }

    #[test]
    fn unusable_terminators_are_rejected() {
        assert!(matches!(
            Tsl550HostProtocol::with_terminator(""),
            Err(Error::ProtocolError { .. })
        ));
        assert!(matches!(
            Tsl550HostProtocol::with_terminator("µ"),
            Err(Error::ProtocolError { .. })
        ));
    }
}
