use std::cmp::min;
use std::io::Read;

/// A fixed-capacity ring buffer sitting between the stream and the protocol
/// decoder.
///
/// Bytes pulled from the stream land at the tail; the decoder consumes from
/// the head via [`current_read_slice`](RingByteBuffer::current_read_slice)
/// and [`skip_bytes`](RingByteBuffer::skip_bytes). A read that wraps around
/// the end of the backing storage is exposed as two consecutive slices.
#[derive(Debug, Clone, PartialEq)]
pub struct RingByteBuffer {
    buf: Vec<u8>,
    head: usize,
    size: usize,
}

impl RingByteBuffer {
    /// Creates a new `RingByteBuffer` with the specified capacity.
    ///
    /// # Arguments
    ///
    /// * `capacity` - The maximum number of bytes the buffer can hold.
    pub fn with_capacity(capacity: usize) -> RingByteBuffer {
        RingByteBuffer {
            buf: vec![0; capacity],
            head: 0,
            size: 0,
        }
    }

    /// Returns the number of bytes currently stored in the buffer.
    pub fn len(&self) -> usize {
        self.size
    }

    /// Returns `true` if the buffer contains no bytes.
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Returns the amount of free space available in the buffer in bytes.
    pub fn free_space(&self) -> usize {
        self.buf.len() - self.size
    }

    fn tail(&self) -> usize {
        (self.head + self.size) % self.buf.len()
    }

    /// Returns the contiguous readable portion of the buffer starting at the
    /// head. When buffered data wraps around, a second call after skipping
    /// this slice yields the remainder.
    pub fn current_read_slice(&self) -> &[u8] {
        let end = min(self.head + self.size, self.buf.len());
        &self.buf[self.head..end]
    }

    /// Removes up to `bytes` bytes from the front of the readable data and
    /// returns how many were actually removed.
    ///
    /// # Arguments
    ///
    /// * `bytes` - The maximum number of bytes to skip.
    pub fn skip_bytes(&mut self, bytes: usize) -> usize {
        let skipped = min(self.size, bytes);
        self.head = (self.head + skipped) % self.buf.len();
        self.size -= skipped;
        skipped
    }

    fn current_write_slice(&mut self) -> &mut [u8] {
        let start = self.tail();
        let end = min(self.buf.len(), start + self.free_space());
        &mut self.buf[start..end]
    }

    fn mark_bytes_as_written(&mut self, bytes: usize) {
        self.size += min(self.free_space(), bytes);
    }

    fn partial_read_from(&mut self, upstream: &mut impl Read) -> std::io::Result<usize> {
        if self.current_write_slice().is_empty() {
            return Ok(0);
        }

        match upstream.read(self.current_write_slice()) {
            Ok(read) => {
                self.mark_bytes_as_written(read);
                Ok(read)
            }
            Err(err) if err.kind() == std::io::ErrorKind::TimedOut => Ok(0),
            Err(err) => Err(err),
        }
    }

    /// Fills the buffer from an upstream source, reading at most twice to
    /// cover the wrap-around point. A stream timeout counts as zero bytes
    /// read, not as an error; the caller owns the overall deadline.
    ///
    /// Returns the total number of bytes pulled from the upstream source.
    pub fn read_from(&mut self, upstream: &mut impl Read) -> std::io::Result<usize> {
        let read = self.partial_read_from(upstream)?;
        let wrapped = self.partial_read_from(upstream)?;
        Ok(read + wrapped)
    }
}

#[cfg(test)]
mod tests {
    use super::RingByteBuffer;
    use std::io::{self, Read};

    struct TimedOutReader;

    impl Read for TimedOutReader {
        fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::TimedOut, "no data"))
        }
    }

    #[test]
    fn fill_and_drain() {
        let mut buffer = RingByteBuffer::with_capacity(8);
        let mut src: &[u8] = b"abcdef";
        assert_eq!(buffer.read_from(&mut src).unwrap(), 6);
        assert_eq!(buffer.len(), 6);
        assert_eq!(buffer.current_read_slice(), b"abcdef");

        assert_eq!(buffer.skip_bytes(4), 4);
        assert_eq!(buffer.current_read_slice(), b"ef");
    }

    #[test]
    fn wrap_around_is_split_into_two_slices() {
        let mut buffer = RingByteBuffer::with_capacity(8);
        let mut src: &[u8] = b"abcdef";
        buffer.read_from(&mut src).unwrap();
        buffer.skip_bytes(4);

        let mut src: &[u8] = b"ghijk";
        assert_eq!(buffer.read_from(&mut src).unwrap(), 5);
        assert_eq!(buffer.len(), 7);

        // head sits at index 4, so the readable data wraps
        assert_eq!(buffer.current_read_slice(), b"efgh");
        buffer.skip_bytes(4);
        assert_eq!(buffer.current_read_slice(), b"ijk");
    }

    #[test]
    fn full_buffer_reads_zero() {
        let mut buffer = RingByteBuffer::with_capacity(4);
        let mut src: &[u8] = b"abcdef";
        assert_eq!(buffer.read_from(&mut src).unwrap(), 4);
        assert_eq!(buffer.free_space(), 0);
        assert_eq!(buffer.read_from(&mut src).unwrap(), 0);
    }

    #[test]
    fn stream_timeout_counts_as_zero_bytes() {
        let mut buffer = RingByteBuffer::with_capacity(4);
        assert_eq!(buffer.read_from(&mut TimedOutReader).unwrap(), 0);
        assert!(buffer.is_empty());
    }
}
