//! Test utilities for building PNG byte streams.
//!
//! No image fixtures are committed; tests assemble the PNGs they need from
//! raw chunks with [`PngBuilder`]:
//!
//! ```
//! use png_text_chunk::test_utils::*;
//!
//! let png = PngBuilder::new()
//!     .ihdr(1, 1)
//!     .text("Title", "hello")
//!     .iend()
//!     .build();
//! assert_eq!(&png[..8], b"\x89PNG\r\n\x1a\n");
//! ```
//!
//! [`write_temp_png`] puts such a stream on disk for path-based tests.

use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::{
    chunk::{crc32, ChunkType, PNG_SIGNATURE},
    text::{generate_chunk, TextVariant},
    Result,
};

/// Assembles a PNG stream chunk by chunk, with no validation
#[derive(Debug, Clone)]
pub struct PngBuilder {
    bytes: Vec<u8>,
}

impl Default for PngBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl PngBuilder {
    /// Start with the PNG signature
    pub fn new() -> Self {
        Self {
            bytes: PNG_SIGNATURE.to_vec(),
        }
    }

    /// Start with arbitrary leading bytes instead of the signature
    pub fn with_signature(signature: &[u8]) -> Self {
        Self {
            bytes: signature.to_vec(),
        }
    }

    /// Append a chunk with a correct CRC
    pub fn chunk(self, chunk_type: ChunkType, data: &[u8]) -> Self {
        let crc = crc32(&chunk_type, data);
        self.chunk_with_crc(chunk_type, data, crc)
    }

    /// Append a chunk with the given (possibly wrong) CRC
    pub fn chunk_with_crc(mut self, chunk_type: ChunkType, data: &[u8], crc: u32) -> Self {
        self.bytes
            .extend_from_slice(&(data.len() as u32).to_be_bytes());
        self.bytes.extend_from_slice(chunk_type.as_bytes());
        self.bytes.extend_from_slice(data);
        self.bytes.extend_from_slice(&crc.to_be_bytes());
        self
    }

    /// Append an IHDR for an 8-bit RGB image
    pub fn ihdr(self, width: u32, height: u32) -> Self {
        let mut data = Vec::with_capacity(13);
        data.extend_from_slice(&width.to_be_bytes());
        data.extend_from_slice(&height.to_be_bytes());
        data.extend_from_slice(&[
            0x08, // Bit depth: 8
            0x02, // Color type: RGB
            0x00, // Compression: deflate
            0x00, // Filter: adaptive
            0x00, // Interlace: none
        ]);
        self.chunk(ChunkType::IHDR, &data)
    }

    /// Append an opaque IDAT chunk
    pub fn idat(self, data: &[u8]) -> Self {
        self.chunk(ChunkType(*b"IDAT"), data)
    }

    /// Append a tEXt chunk
    ///
    /// # Panics
    /// If `key` is not a valid keyword.
    pub fn text(self, key: &str, value: &str) -> Self {
        self.text_chunk(key, value, TextVariant::Plain)
    }

    /// Append an uncompressed iTXt chunk
    ///
    /// # Panics
    /// If `key` is not a valid keyword.
    pub fn itext(self, key: &str, value: &str) -> Self {
        self.text_chunk(key, value, TextVariant::International)
    }

    fn text_chunk(mut self, key: &str, value: &str, variant: TextVariant) -> Self {
        let chunk = generate_chunk(key, value, variant).expect("valid keyword");
        self.bytes.extend_from_slice(&chunk);
        self
    }

    /// Append the IEND chunk
    pub fn iend(self) -> Self {
        self.chunk(ChunkType::IEND, &[])
    }

    /// Append raw bytes
    pub fn raw(mut self, bytes: &[u8]) -> Self {
        self.bytes.extend_from_slice(bytes);
        self
    }

    /// Finish and return the stream
    pub fn build(self) -> Vec<u8> {
        self.bytes
    }
}

/// Signature + IHDR (1x1) + IEND
pub fn minimal_png() -> Vec<u8> {
    PngBuilder::new().ihdr(1, 1).iend().build()
}

/// A PNG with IHDR, two tEXt chunks around an IDAT, an iTXt and IEND
pub fn sample_png() -> Vec<u8> {
    PngBuilder::new()
        .ihdr(4, 4)
        .text("Title", "Sample")
        .idat(&[0x78, 0xDA, 0x63, 0x60, 0x00, 0x00, 0x00, 0x02, 0x00, 0x01])
        .text("Author", "Nobody")
        .itext("Description", "Ünïcödé text")
        .iend()
        .build()
}

/// Write `bytes` to `file_name` inside `dir` and return the full path
pub fn write_temp_png(dir: &Path, file_name: &str, bytes: &[u8]) -> Result<PathBuf> {
    let path = dir.join(file_name);
    fs::write(&path, bytes)?;
    Ok(path)
}

/// Offsets of the first chunk of `chunk_type` in `png`, as
/// `(start, data_start, crc_start)`
pub fn locate_chunk(png: &[u8], chunk_type: ChunkType) -> Option<(usize, usize, usize)> {
    let mut offset = PNG_SIGNATURE.len();
    while offset + 8 <= png.len() {
        let length = u32::from_be_bytes(png[offset..offset + 4].try_into().ok()?) as usize;
        let data_start = offset + 8;
        let crc_start = data_start + length;
        if png[offset + 4..offset + 8] == chunk_type.0 {
            return Some((offset, data_start, crc_start));
        }
        offset = crc_start + 4;
    }
    None
}
