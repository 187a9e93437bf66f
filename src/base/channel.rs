use crate::base::error::{Error, Result};
use crate::base::message::{Message, Response};
use crate::base::ring_byte_buffer::RingByteBuffer;
use crate::base::traits::{ProtocolDecoder, ProtocolEncoder};
use log::{error, trace};
use std::io;
use std::time::{Duration, Instant};

const DEFAULT_CHANNEL_READ_BUFFER_SIZE: usize = 256;

/// Channel encodes commands and decodes response lines with a protocol, and
/// sends and receives the bytes via a stream.
///
/// The stream should be configured with a short read timeout (a few
/// milliseconds); `read_until` treats a stream timeout as "no bytes yet" and
/// enforces the overall deadline itself.
///
/// # Examples
/// ```ignore
/// let mut channel = Channel::new(
///     Tsl550HostProtocol::new(),
///     serial_port
/// );
///
/// channel.write(&Message::new("SG")).unwrap();
/// ```
#[derive(Debug)]
pub struct Channel<P, T: ?Sized> {
    protocol: P,
    stream: Box<T>,
    read_buffer: RingByteBuffer,
}

impl<P, T: ?Sized> Channel<P, T>
where
    P: ProtocolDecoder + ProtocolEncoder,
    T: io::Read + io::Write,
{
    /// Create a new `Channel` to exchange commands and responses.
    ///
    /// # Example
    /// ```ignore
    /// let channel = Channel::new(
    ///     Tsl550HostProtocol::new(),
    ///     serial_port
    /// );
    /// ```
    pub fn new(protocol: P, stream: Box<T>) -> Channel<P, T> {
        Channel::with_read_buffer_size(protocol, stream, DEFAULT_CHANNEL_READ_BUFFER_SIZE)
    }

    /// Create a new `Channel` with non-default ring buffer capacity.
    pub fn with_read_buffer_size(
        protocol: P,
        stream: Box<T>,
        read_buffer_size: usize,
    ) -> Channel<P, T> {
        trace!("Creating new Channel with buffer size {}", read_buffer_size);
        let mut chn = Channel {
            protocol,
            stream,
            read_buffer: RingByteBuffer::with_capacity(read_buffer_size),
        };

        chn.reset();
        chn
    }

    /// Reset the protocol encoder and decoder state.
    ///
    /// Usually called after a communication error, when any half-received
    /// line must be discarded before the next exchange.
    pub fn reset(&mut self) {
        trace!("Resetting Channel protocol encoder and decoder");
        self.protocol.reset_encoder();
        self.protocol.reset_decoder();
    }

    /// Write one command to the channel and flush the stream.
    pub fn write(&mut self, msg: &Message) -> Result<usize> {
        trace!("Channel write: {:?}", msg.text());
        let written = self.protocol.write_to(msg, &mut self.stream)?;
        self.stream.flush()?;
        Ok(written)
    }

    /// Read one response line, waiting at most `timeout`.
    ///
    /// Bytes already buffered are decoded first; the stream is then polled
    /// until a full line is framed or the deadline passes, in which case the
    /// call fails with [`Error::OperationTimeout`].
    pub fn read_until(&mut self, timeout: Duration) -> Result<Response> {
        trace!("Channel read_until with timeout {:?}", timeout);
        let deadline = Instant::now() + timeout;

        loop {
            while !self.read_buffer.is_empty() {
                let slice = self.read_buffer.current_read_slice();
                let (consumed, response) = match self.protocol.decode(slice) {
                    Ok(decoded) => decoded,
                    Err(err) => {
                        error!("Protocol decode error: {}", err);
                        self.protocol.reset_decoder();
                        return Err(err);
                    }
                };
                self.read_buffer.skip_bytes(consumed);

                if let Some(response) = response {
                    trace!("Channel decoded response: {:?}", response.as_str());
                    return Ok(response);
                }

                if consumed == 0 {
                    // decoder wants more data than is buffered
                    break;
                }
            }

            if Instant::now() >= deadline {
                trace!("Channel read_until deadline reached");
                return Err(Error::OperationTimeout);
            }

            match self.read_buffer.read_from(&mut self.stream) {
                Ok(0) => {
                    // nothing available yet, loop back to the deadline check
                }
                Ok(read) => {
                    trace!("Channel read {} bytes from stream", read);
                }
                Err(err) => {
                    error!("IO error reading from stream: {}", err);
                    return Err(err.into());
                }
            }
        }
    }

    /// Send a command and wait for its response line.
    ///
    /// This is the single request/response exchange every instrument
    /// operation is built from: exactly one write followed by one read.
    ///
    /// # Example
    /// ```ignore
    /// let resp = channel.invoke(&Message::new("WA"), Duration::from_secs(1));
    /// ```
    pub fn invoke(&mut self, request: &Message, timeout: Duration) -> Result<Response> {
        self.write(request)?;
        self.read_until(timeout)
    }
}
