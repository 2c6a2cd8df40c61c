//! Sequential byte source with exact-read semantics.

use std::io::{self, Read};

use crate::SourceError;

/// Wraps any [`Read`] implementation and exposes the fixed-width big-endian
/// reads a binary decoder needs, together with a running count of bytes
/// consumed from the stream.
///
/// Every read either delivers the exact number of bytes requested or fails.
/// Short reads from the source are retried until the count is satisfied;
/// end-of-stream mid-request fails with [`SourceError::Truncated`]. Bytes
/// delivered by a partially satisfied request still count as consumed, so
/// [`consumed`](SourceReader::consumed) reports the precise stream position
/// even after a failure.
///
/// # Example
///
/// ```
/// use bytepack_buffers::SourceReader;
///
/// let data: &[u8] = &[0x01, 0x02, 0x03, 0x04];
/// let mut reader = SourceReader::new(data);
///
/// assert_eq!(reader.read_u8().unwrap(), 0x01);
/// assert_eq!(reader.read_u16().unwrap(), 0x0203);
/// assert_eq!(reader.consumed(), 3);
/// ```
pub struct SourceReader<R> {
    inner: R,
    consumed: usize,
}

impl<R: Read> SourceReader<R> {
    /// Creates a reader over the given source.
    pub fn new(inner: R) -> Self {
        Self { inner, consumed: 0 }
    }

    /// Total bytes consumed from the source since construction, including
    /// bytes delivered by a request that later failed.
    pub fn consumed(&self) -> usize {
        self.consumed
    }

    /// Consumes the reader, returning the underlying source.
    pub fn into_inner(self) -> R {
        self.inner
    }

    /// Fills `buf` completely or fails, counting whatever arrived.
    fn fill(&mut self, buf: &mut [u8]) -> Result<(), SourceError> {
        let mut filled = 0;
        while filled < buf.len() {
            match self.inner.read(&mut buf[filled..]) {
                Ok(0) => {
                    self.consumed += filled;
                    return Err(SourceError::Truncated {
                        missing: buf.len() - filled,
                    });
                }
                Ok(n) => filled += n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => {
                    self.consumed += filled;
                    return Err(SourceError::Io(e));
                }
            }
        }
        self.consumed += filled;
        Ok(())
    }

    /// Reads an unsigned 8-bit integer.
    #[inline]
    pub fn read_u8(&mut self) -> Result<u8, SourceError> {
        let mut b = [0u8; 1];
        self.fill(&mut b)?;
        Ok(b[0])
    }

    /// Reads a signed 8-bit integer.
    #[inline]
    pub fn read_i8(&mut self) -> Result<i8, SourceError> {
        Ok(self.read_u8()? as i8)
    }

    /// Reads an unsigned 16-bit integer (big-endian).
    #[inline]
    pub fn read_u16(&mut self) -> Result<u16, SourceError> {
        let mut b = [0u8; 2];
        self.fill(&mut b)?;
        Ok(u16::from_be_bytes(b))
    }

    /// Reads a signed 16-bit integer (big-endian).
    #[inline]
    pub fn read_i16(&mut self) -> Result<i16, SourceError> {
        let mut b = [0u8; 2];
        self.fill(&mut b)?;
        Ok(i16::from_be_bytes(b))
    }

    /// Reads an unsigned 32-bit integer (big-endian).
    #[inline]
    pub fn read_u32(&mut self) -> Result<u32, SourceError> {
        let mut b = [0u8; 4];
        self.fill(&mut b)?;
        Ok(u32::from_be_bytes(b))
    }

    /// Reads a signed 32-bit integer (big-endian).
    #[inline]
    pub fn read_i32(&mut self) -> Result<i32, SourceError> {
        let mut b = [0u8; 4];
        self.fill(&mut b)?;
        Ok(i32::from_be_bytes(b))
    }

    /// Reads an unsigned 64-bit integer (big-endian).
    #[inline]
    pub fn read_u64(&mut self) -> Result<u64, SourceError> {
        let mut b = [0u8; 8];
        self.fill(&mut b)?;
        Ok(u64::from_be_bytes(b))
    }

    /// Reads a signed 64-bit integer (big-endian).
    #[inline]
    pub fn read_i64(&mut self) -> Result<i64, SourceError> {
        let mut b = [0u8; 8];
        self.fill(&mut b)?;
        Ok(i64::from_be_bytes(b))
    }

    /// Reads a 32-bit float as its raw IEEE-754 bit pattern.
    #[inline]
    pub fn read_f32(&mut self) -> Result<f32, SourceError> {
        Ok(f32::from_bits(self.read_u32()?))
    }

    /// Reads a 64-bit float as its raw IEEE-754 bit pattern.
    #[inline]
    pub fn read_f64(&mut self) -> Result<f64, SourceError> {
        Ok(f64::from_bits(self.read_u64()?))
    }

    /// Reads exactly `len` raw bytes into a new vector.
    pub fn read_exact_vec(&mut self, len: usize) -> Result<Vec<u8>, SourceError> {
        let mut buf = vec![0u8; len];
        self.fill(&mut buf)?;
        Ok(buf)
    }
}
