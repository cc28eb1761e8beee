use byteorder::{LittleEndian, ReadBytesExt};
use std::io::{Read, Write};

use crate::error::{DrsError, Result};

/// Size of the scratch buffer used by [`ByteStream::copy_to`].
const COPY_BUFFER_SIZE: usize = 64 * 1024;

/// Forward-only reader that tracks its position within a source of known length.
///
/// Every read is checked against the bytes remaining before anything is
/// consumed, so a request past the end fails with [`DrsError::Truncated`]
/// and leaves the position untouched.
pub struct ByteStream<R: Read> {
    inner: R,
    position: u64,
    len: u64,
}

impl<'a> ByteStream<&'a [u8]> {
    /// Wrap an in-memory buffer.
    pub fn from_bytes(data: &'a [u8]) -> Self {
        Self::new(data, data.len() as u64)
    }
}

impl<R: Read> ByteStream<R> {
    /// Wrap `inner`, which must yield exactly `len` bytes.
    pub fn new(inner: R, len: u64) -> Self {
        Self {
            inner,
            position: 0,
            len,
        }
    }

    /// Bytes consumed so far.
    pub fn position(&self) -> u64 {
        self.position
    }

    /// Total length of the source.
    pub fn len(&self) -> u64 {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Bytes left before the end of the source.
    pub fn remaining(&self) -> u64 {
        self.len.saturating_sub(self.position)
    }

    fn ensure(&self, requested: u64) -> Result<()> {
        let remaining = self.remaining();
        if requested > remaining {
            return Err(DrsError::Truncated {
                requested,
                remaining,
            });
        }
        Ok(())
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        self.ensure(1)?;
        let value = self.inner.read_u8()?;
        self.position += 1;
        Ok(value)
    }

    /// Read a little-endian `u32`.
    pub fn read_u32(&mut self) -> Result<u32> {
        self.ensure(4)?;
        let value = self.inner.read_u32::<LittleEndian>()?;
        self.position += 4;
        Ok(value)
    }

    /// Read exactly `N` raw bytes.
    pub fn read_array<const N: usize>(&mut self) -> Result<[u8; N]> {
        self.ensure(N as u64)?;
        let mut buf = [0u8; N];
        self.inner.read_exact(&mut buf)?;
        self.position += N as u64;
        Ok(buf)
    }

    /// Read a fixed-length byte string of `n` bytes.
    pub fn read_fixed_string(&mut self, n: usize) -> Result<Vec<u8>> {
        self.ensure(n as u64)?;
        let mut buf = vec![0u8; n];
        self.inner.read_exact(&mut buf)?;
        self.position += n as u64;
        Ok(buf)
    }

    /// Discard the next `n` bytes.
    pub fn skip(&mut self, n: u64) -> Result<()> {
        self.ensure(n)?;
        let skipped = std::io::copy(&mut (&mut self.inner).take(n), &mut std::io::sink())?;
        self.position += skipped;
        if skipped < n {
            return Err(DrsError::Truncated {
                requested: n - skipped,
                remaining: 0,
            });
        }
        Ok(())
    }

    /// Copy the next `n` bytes into `writer`.
    ///
    /// The position is advanced chunk by chunk as bytes are read, so after a
    /// write error [`position`](Self::position) still tells the caller how
    /// much of the range was consumed. Errors from `writer` come back as
    /// [`DrsError::WriteFailed`].
    pub fn copy_to<W: Write>(&mut self, writer: &mut W, n: u64) -> Result<u64> {
        self.ensure(n)?;
        let mut buf = vec![0u8; COPY_BUFFER_SIZE.min(n as usize)];
        let mut left = n;
        while left > 0 {
            let chunk = COPY_BUFFER_SIZE.min(left as usize);
            self.inner.read_exact(&mut buf[..chunk])?;
            self.position += chunk as u64;
            left -= chunk as u64;
            writer
                .write_all(&buf[..chunk])
                .map_err(DrsError::WriteFailed)?;
        }
        Ok(n)
    }
}
