//! Error types for png-text-chunk

use std::io;

use crate::chunk::ChunkType;

/// Result type for png-text-chunk operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while walking, reading or writing PNG chunks
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The first 8 bytes are not the PNG signature
    #[error("PNG signature not found")]
    SignatureNotFound,

    /// The stream ended before an IHDR chunk was seen
    #[error("IHDR chunk not found")]
    HeaderNotFound,

    /// The stream ended without an IEND chunk (strict extraction only)
    #[error("PNG stream ended without an IEND chunk")]
    MissingEnd,

    /// A chunk runs past the end of the source
    #[error("Truncated chunk at offset {offset}")]
    TruncatedChunk { offset: u64 },

    /// A chunk declares a length above the PNG maximum of 2^31 - 1
    #[error("Invalid chunk length {length} at offset {offset}")]
    InvalidChunkLength { offset: u64, length: u32 },

    /// Chunk data to write exceeds the PNG maximum of 2^31 - 1 bytes
    #[error("Data too large: {size} bytes (max: {max})")]
    DataTooLarge { size: usize, max: usize },

    /// Stored CRC does not match the CRC recomputed over type + payload
    #[error("CRC mismatch in {chunk_type} chunk: computed {computed:#010x}, stored {stored:#010x}")]
    DataCorruption {
        chunk_type: ChunkType,
        computed: u32,
        stored: u32,
    },

    /// Textual chunk payload does not follow the tEXt/iTXt layout
    #[error("Malformed chunk at offset {offset}: {reason}")]
    MalformedChunk { offset: u64, reason: String },

    /// Keyword length outside 1..=79 bytes
    #[error("Invalid key length {len}: must be within 1..=79 bytes")]
    InvalidKey { len: usize },

    /// Keyword contains the NUL separator
    #[error("Key must not contain a NUL byte")]
    KeyContainsNul,

    /// Compressed iTXt payloads are not decoded
    #[error("Compressed iTXt chunk at offset {offset} is not supported")]
    UnsupportedCompression { offset: u64 },

    /// Splice position lies outside the byte sequence
    #[error("Insert position {position} is beyond sequence length {len}")]
    InvalidPosition { position: usize, len: usize },
}

impl Error {
    /// True for failures in the overall layout of the PNG stream
    ///
    /// These cover a missing signature, a missing IHDR or IEND, and chunks
    /// whose framing does not fit in the source.
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            Self::SignatureNotFound
                | Self::HeaderNotFound
                | Self::MissingEnd
                | Self::TruncatedChunk { .. }
                | Self::InvalidChunkLength { .. }
        )
    }

    pub(crate) fn malformed(offset: u64, reason: impl Into<String>) -> Self {
        Self::MalformedChunk {
            offset,
            reason: reason.into(),
        }
    }
}
