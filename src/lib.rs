//! Streaming reader and writer for PNG textual metadata chunks.
//!
//! This crate walks the chunk sequence of a PNG stream and supports two
//! operations: inserting `tEXt`/`iTXt` chunks immediately after `IHDR`, and
//! extracting every `tEXt`/`iTXt` entry already present.
//!
//! # Design Principles
//!
//! - **One walker, two sources**: the chunk cursor is written once against
//!   [`ChunkSource`] and runs over in-memory buffers ([`SliceSource`]) or
//!   seekable streams such as files ([`StreamSource`])
//! - **Integrity first**: every textual chunk read has its CRC32 verified; a
//!   mismatch is always an error
//! - **Opaque chunks stay opaque**: chunks other than `IHDR`, `IEND`, `tEXt`
//!   and `iTXt` are skipped without being read
//! - **No partial output**: insertion returns a complete new PNG or an error
//!
//! # Text Encoding
//!
//! `iTXt` text must be UTF-8. Keywords and `tEXt` text are decoded as UTF-8
//! when the bytes are valid UTF-8 and as ISO-8859-1 otherwise. The two
//! overlap: an ISO-8859-1 value whose bytes also form valid UTF-8 (such as
//! `C3 A9`, "Ã©") is returned as the UTF-8 reading ("é").
//!
//! # Quick Start
//!
//! ```
//! use png_text_chunk::{extract_text_from_bytes, insert_text_into_bytes, TextEntry};
//! # use png_text_chunk::test_utils::minimal_png;
//!
//! # fn main() -> png_text_chunk::Result<()> {
//! let png: Vec<u8> = minimal_png();
//!
//! let entries = [TextEntry::new("w", "100"), TextEntry::new("h", "50")];
//! let tagged = insert_text_into_bytes(&png, &entries, false)?;
//!
//! assert_eq!(extract_text_from_bytes(&tagged)?, entries);
//! # Ok(())
//! # }
//! ```
//!
//! # Streams and Options
//!
//! ```no_run
//! use png_text_chunk::{extract_text_with, ExtractOptions, StreamSource};
//! use std::fs::File;
//!
//! # fn main() -> png_text_chunk::Result<()> {
//! let mut source = StreamSource::new(File::open("image.png")?)?;
//! let strict = ExtractOptions::new().require_end();
//! for entry in extract_text_with(&mut source, &strict)? {
//!     println!("{}: {}", entry.key, entry.value);
//! }
//! # Ok(())
//! # }
//! ```

pub mod chunk;
mod error;
mod png_io;
pub mod source;
mod structure;
pub mod text;
mod updates;

pub use chunk::{
    crc32, read_header, skip_payload, ChunkHeader, ChunkType, MAX_CHUNK_LENGTH, PNG_SIGNATURE,
};
pub use error::{Error, Result};
#[cfg(feature = "memory-mapped")]
pub use png_io::extract_text_mmap;
pub use png_io::{
    extract_text, extract_text_from_bytes, extract_text_from_path, extract_text_with,
    insert_text, insert_text_from_path, insert_text_into_bytes, insert_text_with, is_valid_png,
};
pub use source::{ChunkSource, SliceSource, StreamSource};
pub use structure::{read_structure, ChunkInfo, Structure};
pub use text::{
    generate_chunk, insert_chunk, read_text_chunk, validate_key, TextEntry, TextVariant,
    MAX_KEY_LEN,
};
pub use updates::{ExtractOptions, InsertOptions};

// Test utilities - only compiled for tests or when explicitly enabled
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
