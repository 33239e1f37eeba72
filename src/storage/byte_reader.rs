//! Byte Reader
//!
//! Random-access reads over the store file, plus the little-endian integer
//! helpers used by every region of the format.

use std::io::{BufReader, ErrorKind, Read, Seek, SeekFrom};

use byteorder::{ByteOrder, LittleEndian};

use crate::error::{Result, StoreError};

/// Default buffer capacity when none is configured
const DEFAULT_CAPACITY: usize = 16 * 1024;

/// Buffered random-access reader with an explicit cursor
///
/// The source length is captured once at construction; the store file is
/// immutable for the lifetime of the reader.
pub struct ByteReader<R> {
    /// Buffered source
    inner: BufReader<R>,
    /// Absolute offset of the next byte to be read
    position: u64,
    /// Total source length in bytes
    len: u64,
    /// False after a failed read or seek: the source cursor may no longer
    /// sit at `position` and must be re-seeked absolutely before use
    in_sync: bool,
}

impl<R: Read + Seek> ByteReader<R> {
    /// Wrap a source with the default buffer capacity
    pub fn new(source: R) -> Result<Self> {
        Self::with_capacity(DEFAULT_CAPACITY, source)
    }

    /// Wrap a source with the given buffer capacity
    pub fn with_capacity(capacity: usize, mut source: R) -> Result<Self> {
        let len = source.seek(SeekFrom::End(0))?;
        source.seek(SeekFrom::Start(0))?;

        Ok(Self {
            inner: BufReader::with_capacity(capacity, source),
            position: 0,
            len,
            in_sync: true,
        })
    }

    /// Total length of the source in bytes
    pub fn len(&self) -> u64 {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Current cursor position
    pub fn position(&self) -> u64 {
        self.position
    }

    /// Move the cursor to an absolute offset
    ///
    /// Seeks that land inside the current buffer keep it. After a failed
    /// read or seek the buffer is discarded and the source is re-seeked.
    pub fn seek(&mut self, offset: u64) -> Result<()> {
        let moved = if self.in_sync {
            let delta = offset as i64 - self.position as i64;
            self.inner.seek_relative(delta)
        } else {
            self.inner.seek(SeekFrom::Start(offset)).map(|_| ())
        };

        if let Err(e) = moved {
            self.in_sync = false;
            return Err(StoreError::Io(e));
        }

        self.position = offset;
        self.in_sync = true;
        Ok(())
    }

    /// Read exactly `n` bytes at the cursor into a new buffer
    pub fn read_exact(&mut self, n: usize) -> Result<Vec<u8>> {
        let mut buf = vec![0u8; n];
        self.read_into(&mut buf)?;
        Ok(buf)
    }

    /// Fill `buf` completely from the cursor
    ///
    /// Fails with `TruncatedRead` (without consuming anything) if the source
    /// holds fewer than `buf.len()` bytes past the cursor.
    pub fn read_into(&mut self, buf: &mut [u8]) -> Result<()> {
        let available = self.len.saturating_sub(self.position);
        if buf.len() as u64 > available {
            return Err(StoreError::TruncatedRead {
                offset: self.position,
                wanted: buf.len(),
                available,
            });
        }

        if !self.in_sync {
            self.seek(self.position)?;
        }

        match self.inner.read_exact(buf) {
            Ok(()) => {
                self.position += buf.len() as u64;
                Ok(())
            }
            Err(e) => {
                // Part of `buf` may have been consumed from the source
                self.in_sync = false;
                tracing::debug!(
                    position = self.position,
                    error = %e,
                    "read failed, resyncing on next access"
                );

                if e.kind() == ErrorKind::UnexpectedEof {
                    Err(StoreError::TruncatedRead {
                        offset: self.position,
                        wanted: buf.len(),
                        available,
                    })
                } else {
                    Err(StoreError::Io(e))
                }
            }
        }
    }

    /// Read a single byte at the cursor
    pub fn read_u8(&mut self) -> Result<u8> {
        let mut byte = [0u8; 1];
        self.read_into(&mut byte)?;
        Ok(byte[0])
    }
}

// =============================================================================
// Little-endian decode helpers
//
// All of these read from `buf[at..]` and panic if fewer bytes than the field
// width remain; callers size their reads to the field layout first.
// =============================================================================

/// Decode a 2-byte unsigned integer
pub fn u16le(buf: &[u8], at: usize) -> u16 {
    LittleEndian::read_u16(&buf[at..])
}

/// Decode a 3-byte unsigned integer (entry lengths)
pub fn u24le(buf: &[u8], at: usize) -> u32 {
    LittleEndian::read_u24(&buf[at..])
}

/// Decode a 4-byte unsigned integer
pub fn u32le(buf: &[u8], at: usize) -> u32 {
    LittleEndian::read_u32(&buf[at..])
}

/// Decode a 4-byte signed integer (first-level row offsets)
pub fn i32le(buf: &[u8], at: usize) -> i32 {
    LittleEndian::read_i32(&buf[at..])
}

/// Decode a 5-byte unsigned integer (entry offsets, up to 1 TiB)
pub fn u40le(buf: &[u8], at: usize) -> u64 {
    LittleEndian::read_uint(&buf[at..], 5)
}
