//! Byte sources the chunk cursor walks over
//!
//! [`ChunkSource`] is the one capability the rest of the crate is written
//! against. It is implemented for in-memory buffers ([`SliceSource`], cursor is
//! an index) and for any seekable stream such as a [`std::fs::File`]
//! ([`StreamSource`], cursor is the stream position).
//!
//! All reads and skips are bounds-checked against the source length, so a
//! chunk that declares more bytes than remain fails with
//! [`Error::TruncatedChunk`] before anything is allocated.

use crate::error::{Error, Result};
use byteorder::{BigEndian, ByteOrder, ReadBytesExt};
use std::io::{Read, Seek, SeekFrom};

/// A positioned byte source that can be read and skipped forward
pub trait ChunkSource {
    /// Read a big-endian `u32` and advance by 4
    fn read_u32_be(&mut self) -> Result<u32>;

    /// Read exactly `n` bytes and advance by `n`
    fn read_bytes(&mut self, n: usize) -> Result<Vec<u8>>;

    /// Advance by `n` bytes without reading them
    fn skip(&mut self, n: u64) -> Result<()>;

    /// Current offset from the start of the source
    fn position(&self) -> u64;

    /// Total size of the source in bytes
    fn len(&self) -> u64;

    /// Move the cursor to an absolute offset (at most `len()`)
    fn seek_to(&mut self, position: u64) -> Result<()>;

    /// Bytes left between the cursor and the end
    fn remaining(&self) -> u64 {
        self.len().saturating_sub(self.position())
    }

    /// True once the cursor has reached the end of the source
    fn at_end(&self) -> bool {
        self.position() >= self.len()
    }

    /// True if the source holds no bytes at all
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Fail with [`Error::TruncatedChunk`] unless `n` more bytes are available
    fn ensure_remaining(&self, n: u64) -> Result<()> {
        if n > self.remaining() {
            return Err(Error::TruncatedChunk {
                offset: self.position(),
            });
        }
        Ok(())
    }
}

/// Chunk source over an in-memory byte slice
#[derive(Debug, Clone)]
pub struct SliceSource<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> SliceSource<'a> {
    /// Create a source positioned at the start of `data`
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// The whole underlying buffer
    pub fn data(&self) -> &'a [u8] {
        self.data
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8]> {
        self.ensure_remaining(n as u64)?;
        let bytes = &self.data[self.pos..self.pos + n];
        self.pos += n;
        Ok(bytes)
    }
}

impl ChunkSource for SliceSource<'_> {
    fn read_u32_be(&mut self) -> Result<u32> {
        Ok(BigEndian::read_u32(self.take(4)?))
    }

    fn read_bytes(&mut self, n: usize) -> Result<Vec<u8>> {
        Ok(self.take(n)?.to_vec())
    }

    fn skip(&mut self, n: u64) -> Result<()> {
        self.ensure_remaining(n)?;
        self.pos += n as usize;
        Ok(())
    }

    fn position(&self) -> u64 {
        self.pos as u64
    }

    fn len(&self) -> u64 {
        self.data.len() as u64
    }

    fn seek_to(&mut self, position: u64) -> Result<()> {
        if position > self.len() {
            return Err(Error::TruncatedChunk { offset: position });
        }
        self.pos = position as usize;
        Ok(())
    }
}

/// Chunk source over a seekable stream
///
/// The stream length is measured once on construction and the stream is
/// rewound to offset 0. The source borrows nothing beyond `R`; pass
/// `&mut File` to keep ownership of the handle with the caller.
#[derive(Debug)]
pub struct StreamSource<R: Read + Seek> {
    inner: R,
    pos: u64,
    len: u64,
}

impl<R: Read + Seek> StreamSource<R> {
    /// Wrap a stream, measuring its length and rewinding it to the start
    pub fn new(mut inner: R) -> Result<Self> {
        let len = inner.seek(SeekFrom::End(0))?;
        inner.seek(SeekFrom::Start(0))?;
        Ok(Self { inner, pos: 0, len })
    }

    /// Give back the wrapped stream
    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<R: Read + Seek> ChunkSource for StreamSource<R> {
    fn read_u32_be(&mut self) -> Result<u32> {
        self.ensure_remaining(4)?;
        let value = self.inner.read_u32::<BigEndian>()?;
        self.pos += 4;
        Ok(value)
    }

    fn read_bytes(&mut self, n: usize) -> Result<Vec<u8>> {
        self.ensure_remaining(n as u64)?;
        let mut buf = vec![0u8; n];
        self.inner.read_exact(&mut buf)?;
        self.pos += n as u64;
        Ok(buf)
    }

    fn skip(&mut self, n: u64) -> Result<()> {
        self.ensure_remaining(n)?;
        let offset = i64::try_from(n).map_err(|_| Error::TruncatedChunk { offset: self.pos })?;
        // relative seek keeps a BufReader's buffer
        self.inner.seek_relative(offset)?;
        self.pos += n;
        Ok(())
    }

    fn position(&self) -> u64 {
        self.pos
    }

    fn len(&self) -> u64 {
        self.len
    }

    fn seek_to(&mut self, position: u64) -> Result<()> {
        if position > self.len {
            return Err(Error::TruncatedChunk { offset: position });
        }
        self.pos = self.inner.seek(SeekFrom::Start(position))?;
        Ok(())
    }
}
