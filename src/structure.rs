//! Chunk layout of a PNG stream

use crate::{
    chunk::{read_header, skip_payload, ChunkHeader, ChunkType, PNG_SIGNATURE},
    error::{Error, Result},
    png_io::is_valid_png,
    source::ChunkSource,
};

/// One chunk found while walking a stream
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkInfo {
    /// Offset of the chunk's length field from the start of the stream
    pub offset: u64,
    /// Payload byte count
    pub length: u32,
    /// Chunk type tag
    pub chunk_type: ChunkType,
}

impl ChunkInfo {
    /// Size of the whole chunk including length, type and CRC
    pub fn total_size(&self) -> u64 {
        ChunkHeader {
            length: self.length,
            chunk_type: self.chunk_type,
        }
        .total_size()
    }

    /// Offset just past this chunk's CRC
    pub fn end_offset(&self) -> u64 {
        self.offset + self.total_size()
    }
}

/// Ordered list of the chunks in a PNG stream
///
/// Built by [`read_structure`] in a single pass without reading payloads or
/// checking CRCs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Structure {
    /// Chunks in stream order
    pub chunks: Vec<ChunkInfo>,

    /// Bytes covered by the signature and the walked chunks
    pub total_size: u64,

    /// Whether the walk stopped on an IEND chunk
    pub has_end: bool,
}

impl Structure {
    /// Chunk type tags in stream order
    pub fn chunk_types(&self) -> Vec<ChunkType> {
        self.chunks.iter().map(|c| c.chunk_type).collect()
    }

    /// The tEXt and iTXt chunks, in stream order
    pub fn text_chunks(&self) -> impl Iterator<Item = &ChunkInfo> {
        self.chunks.iter().filter(|c| c.chunk_type.is_text())
    }

    /// First chunk of the given type
    pub fn find(&self, chunk_type: ChunkType) -> Option<&ChunkInfo> {
        self.chunks.iter().find(|c| c.chunk_type == chunk_type)
    }
}

/// Walk every chunk header from offset 8 to IEND or end of stream
///
/// Fails with [`Error::SignatureNotFound`] on a bad signature and with
/// [`Error::TruncatedChunk`] when a chunk runs past the end.
pub fn read_structure<S: ChunkSource>(source: &mut S) -> Result<Structure> {
    if !is_valid_png(source) {
        return Err(Error::SignatureNotFound);
    }
    source.seek_to(PNG_SIGNATURE.len() as u64)?;

    let mut structure = Structure::default();

    while !source.at_end() {
        let offset = source.position();
        let header = read_header(source)?;
        skip_payload(source, header.length)?;

        structure.chunks.push(ChunkInfo {
            offset,
            length: header.length,
            chunk_type: header.chunk_type,
        });

        if header.chunk_type == ChunkType::IEND {
            structure.has_end = true;
            break;
        }
    }

    structure.total_size = source.position();
    log::debug!(
        "walked {} chunks over {} bytes (IEND: {})",
        structure.chunks.len(),
        structure.total_size,
        structure.has_end
    );
    Ok(structure)
}
