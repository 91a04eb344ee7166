//! PNG chunk framing: headers, CRCs and the chunk cursor

use crate::{
    error::{Error, Result},
    source::ChunkSource,
};
use byteorder::{BigEndian, WriteBytesExt};
use std::{fmt, io::Write};

/// PNG signature: 89 50 4E 47 0D 0A 1A 0A
pub const PNG_SIGNATURE: &[u8; 8] = b"\x89PNG\r\n\x1a\n";

/// Largest chunk length PNG allows (2^31 - 1)
pub const MAX_CHUNK_LENGTH: u32 = 0x7FFF_FFFF;

/// Bytes of framing around a chunk payload: length (4) + type (4) + CRC (4)
pub const CHUNK_OVERHEAD: u64 = 12;

/// A 4-byte chunk type tag
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChunkType(pub [u8; 4]);

impl ChunkType {
    pub const IHDR: Self = Self(*b"IHDR");
    pub const IEND: Self = Self(*b"IEND");
    pub const TEXT: Self = Self(*b"tEXt");
    pub const ITXT: Self = Self(*b"iTXt");
    pub const ZTXT: Self = Self(*b"zTXt");

    /// Raw tag bytes
    pub fn as_bytes(&self) -> &[u8; 4] {
        &self.0
    }

    /// True for the uncompressed textual chunk types this crate decodes
    pub fn is_text(&self) -> bool {
        *self == Self::TEXT || *self == Self::ITXT
    }
}

impl From<[u8; 4]> for ChunkType {
    fn from(tag: [u8; 4]) -> Self {
        Self(tag)
    }
}

impl fmt::Display for ChunkType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &b in &self.0 {
            let c = if b.is_ascii_graphic() { b as char } else { '.' };
            write!(f, "{}", c)?;
        }
        Ok(())
    }
}

impl fmt::Debug for ChunkType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ChunkType({})", self)
    }
}

/// Length and type of a chunk, as read from its first 8 bytes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkHeader {
    /// Payload byte count (excludes type and CRC)
    pub length: u32,
    /// Chunk type tag
    pub chunk_type: ChunkType,
}

impl ChunkHeader {
    /// Size of the whole chunk including its framing
    pub fn total_size(&self) -> u64 {
        self.length as u64 + CHUNK_OVERHEAD
    }
}

/// Read a chunk header at the cursor, advancing it by 8
///
/// The length is decoded in network byte order regardless of host.
pub fn read_header<S: ChunkSource>(source: &mut S) -> Result<ChunkHeader> {
    let offset = source.position();
    source.ensure_remaining(8)?;

    let length = source.read_u32_be()?;
    let mut tag = [0u8; 4];
    tag.copy_from_slice(&source.read_bytes(4)?);

    // Validate chunk length to prevent allocation attacks
    if length > MAX_CHUNK_LENGTH {
        return Err(Error::InvalidChunkLength { offset, length });
    }

    let header = ChunkHeader {
        length,
        chunk_type: ChunkType(tag),
    };
    log::trace!("chunk {} len={} at offset {}", header.chunk_type, length, offset);
    Ok(header)
}

/// Skip a chunk's payload and trailing CRC without validating either
pub fn skip_payload<S: ChunkSource>(source: &mut S, length: u32) -> Result<()> {
    source.skip(length as u64 + 4)
}

/// CRC32 over a chunk's type tag followed by its data
pub fn crc32(chunk_type: &ChunkType, data: &[u8]) -> u32 {
    let mut hasher = crc32fast::Hasher::new();
    hasher.update(chunk_type.as_bytes());
    hasher.update(data);
    hasher.finalize()
}

fn checked_length(size: usize) -> Result<u32> {
    match u32::try_from(size) {
        Ok(length) if length <= MAX_CHUNK_LENGTH => Ok(length),
        _ => Err(Error::DataTooLarge {
            size,
            max: MAX_CHUNK_LENGTH as usize,
        }),
    }
}

/// Write a complete chunk: length, type, data and CRC
///
/// Data above [`MAX_CHUNK_LENGTH`] fails with [`Error::DataTooLarge`] before
/// anything is written.
pub fn write_chunk<W: Write>(writer: &mut W, chunk_type: &ChunkType, data: &[u8]) -> Result<()> {
    let length = checked_length(data.len())?;

    writer.write_u32::<BigEndian>(length)?;
    writer.write_all(chunk_type.as_bytes())?;
    writer.write_all(data)?;
    writer.write_u32::<BigEndian>(crc32(chunk_type, data))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::SliceSource;

    const IHDR_DATA: [u8; 13] = [
        0x00, 0x00, 0x00, 0x01, // Width: 1
        0x00, 0x00, 0x00, 0x01, // Height: 1
        0x08, // Bit depth: 8
        0x02, // Color type: RGB
        0x00, // Compression: deflate
        0x00, // Filter: adaptive
        0x00, // Interlace: none
    ];

    #[test]
    fn test_crc_known_values() {
        assert_eq!(crc32(&ChunkType::IHDR, &IHDR_DATA), 0x9077_53DE);
        assert_eq!(crc32(&ChunkType::IEND, &[]), 0xAE42_6082);
    }

    #[test]
    fn test_write_chunk_framing() {
        let mut out = Vec::new();
        write_chunk(&mut out, &ChunkType::IEND, &[]).unwrap();
        assert_eq!(
            out,
            [0, 0, 0, 0, b'I', b'E', b'N', b'D', 0xAE, 0x42, 0x60, 0x82]
        );
    }

    #[test]
    fn test_oversized_data_is_rejected_by_writer() {
        assert_eq!(checked_length(0).unwrap(), 0);
        assert_eq!(checked_length(MAX_CHUNK_LENGTH as usize).unwrap(), MAX_CHUNK_LENGTH);
        assert!(matches!(
            checked_length(MAX_CHUNK_LENGTH as usize + 1),
            Err(Error::DataTooLarge { size, max })
                if size == MAX_CHUNK_LENGTH as usize + 1 && max == MAX_CHUNK_LENGTH as usize
        ));
    }

    #[test]
    fn test_read_header_is_big_endian() {
        let bytes = [0x00, 0x01, 0x02, 0x03, b't', b'E', b'X', b't'];
        let mut source = SliceSource::new(&bytes);
        let header = read_header(&mut source).unwrap();
        assert_eq!(header.length, 0x0001_0203);
        assert_eq!(header.chunk_type, ChunkType::TEXT);
        assert_eq!(source.position(), 8);
    }

    #[test]
    fn test_read_header_rejects_oversized_length() {
        let bytes = [0x80, 0x00, 0x00, 0x00, b'I', b'D', b'A', b'T'];
        let mut source = SliceSource::new(&bytes);
        assert!(matches!(
            read_header(&mut source),
            Err(Error::InvalidChunkLength {
                offset: 0,
                length: 0x8000_0000
            })
        ));
    }

    #[test]
    fn test_partial_header_is_truncation() {
        let bytes = [0x00, 0x00, 0x00, 0x00, b'I', b'E'];
        let mut source = SliceSource::new(&bytes);
        assert!(matches!(
            read_header(&mut source),
            Err(Error::TruncatedChunk { offset: 0 })
        ));
    }

    #[test]
    fn test_skip_payload_covers_crc() {
        let mut chunk = Vec::new();
        write_chunk(&mut chunk, &ChunkType::IHDR, &IHDR_DATA).unwrap();
        let mut source = SliceSource::new(&chunk);
        let header = read_header(&mut source).unwrap();
        skip_payload(&mut source, header.length).unwrap();
        assert!(source.at_end());
        assert_eq!(header.total_size(), chunk.len() as u64);
    }

    #[test]
    fn test_chunk_type_display() {
        assert_eq!(ChunkType::ITXT.to_string(), "iTXt");
        assert_eq!(ChunkType([0, b'a', 0xFF, b'b']).to_string(), ".a.b");
        assert!(ChunkType::TEXT.is_text());
        assert!(!ChunkType::ZTXT.is_text());
    }
}
