//! tEXt and iTXt chunk reading and writing
//!
//! Only the uncompressed forms are handled. Chunk layouts:
//!
//! ```text
//! tEXt: keyword \0 text
//! iTXt: keyword \0 compression_flag compression_method language_tag \0 translated_keyword \0 text
//! ```
//!
//! iTXt chunks written here always use flag 0, method 0 and empty language
//! tag / translated keyword, i.e. `keyword \0 00 00 00 00 text`.

use crate::{
    chunk::{crc32, write_chunk, ChunkHeader, ChunkType},
    error::{Error, Result},
    source::ChunkSource,
};

/// Longest keyword PNG permits, in bytes
pub const MAX_KEY_LEN: usize = 79;

/// A key/value pair carried by a textual chunk
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TextEntry {
    pub key: String,
    pub value: String,
}

impl TextEntry {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

impl<K: Into<String>, V: Into<String>> From<(K, V)> for TextEntry {
    fn from((key, value): (K, V)) -> Self {
        Self::new(key, value)
    }
}

/// Which textual chunk type to write
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TextVariant {
    /// `tEXt`
    #[default]
    Plain,
    /// `iTXt` (uncompressed, no language tag)
    International,
}

impl TextVariant {
    /// Pick `International` when `use_international` is set
    pub fn from_international(use_international: bool) -> Self {
        if use_international {
            Self::International
        } else {
            Self::Plain
        }
    }

    /// Chunk type tag written for this variant
    pub fn chunk_type(&self) -> ChunkType {
        match self {
            Self::Plain => ChunkType::TEXT,
            Self::International => ChunkType::ITXT,
        }
    }
}

/// Check a keyword is 1..=79 bytes with no NUL
pub fn validate_key(key: &str) -> Result<()> {
    if key.is_empty() || key.len() > MAX_KEY_LEN {
        return Err(Error::InvalidKey { len: key.len() });
    }
    if key.bytes().any(|b| b == 0) {
        return Err(Error::KeyContainsNul);
    }
    Ok(())
}

/// Read the payload and CRC of a textual chunk whose header was just read
///
/// The CRC is always verified; a mismatch is [`Error::DataCorruption`].
pub fn read_text_chunk<S: ChunkSource>(source: &mut S, header: &ChunkHeader) -> Result<TextEntry> {
    let offset = source.position();
    let data = source.read_bytes(header.length as usize)?;
    let stored = source.read_u32_be()?;

    let computed = crc32(&header.chunk_type, &data);
    if computed != stored {
        return Err(Error::DataCorruption {
            chunk_type: header.chunk_type,
            computed,
            stored,
        });
    }

    match header.chunk_type {
        ChunkType::TEXT => decode_text(&data, offset),
        ChunkType::ITXT => decode_international(&data, offset),
        other => Err(Error::malformed(
            offset,
            format!("{} is not a textual chunk", other),
        )),
    }
}

fn split_at_nul(data: &[u8], offset: u64, what: &str) -> Result<(usize, usize)> {
    data.iter()
        .position(|&b| b == 0)
        .map(|nul| (nul, nul + 1))
        .ok_or_else(|| Error::malformed(offset, format!("missing NUL after {}", what)))
}

fn decode_text(data: &[u8], offset: u64) -> Result<TextEntry> {
    let (key_end, value_start) = split_at_nul(data, offset, "keyword")?;
    Ok(TextEntry {
        key: decode_latin1_or_utf8(&data[..key_end]),
        value: decode_latin1_or_utf8(&data[value_start..]),
    })
}

fn decode_international(data: &[u8], offset: u64) -> Result<TextEntry> {
    let (key_end, rest_start) = split_at_nul(data, offset, "keyword")?;
    let key = decode_latin1_or_utf8(&data[..key_end]);

    let rest = &data[rest_start..];
    let [compression_flag, _compression_method, rest @ ..] = rest else {
        return Err(Error::malformed(offset, "missing iTXt compression fields"));
    };
    if *compression_flag != 0 {
        return Err(Error::UnsupportedCompression { offset });
    }

    let (_, translated_start) = split_at_nul(rest, offset, "language tag")?;
    let rest = &rest[translated_start..];
    let (_, text_start) = split_at_nul(rest, offset, "translated keyword")?;

    let value = String::from_utf8(rest[text_start..].to_vec())
        .map_err(|_| Error::malformed(offset, "iTXt text is not valid UTF-8"))?;

    Ok(TextEntry { key, value })
}

// tEXt is ISO-8859-1 on paper, but UTF-8 writers are common in practice.
// Bytes that happen to form valid UTF-8 are taken as UTF-8: Latin-1 "Ã©"
// (C3 A9) reads back as "é". Only invalid UTF-8 falls back to Latin-1.
fn decode_latin1_or_utf8(bytes: &[u8]) -> String {
    match std::str::from_utf8(bytes) {
        Ok(s) => s.to_owned(),
        Err(_) => bytes.iter().map(|&b| b as char).collect(),
    }
}

/// Serialize a key/value pair as a complete, independently valid chunk
pub fn generate_chunk(key: &str, value: &str, variant: TextVariant) -> Result<Vec<u8>> {
    validate_key(key)?;

    let mut data = Vec::with_capacity(key.len() + 5 + value.len());
    data.extend_from_slice(key.as_bytes());
    data.push(0);
    if variant == TextVariant::International {
        // flag, method, empty language tag, empty translated keyword
        data.extend_from_slice(&[0, 0, 0, 0]);
    }
    data.extend_from_slice(value.as_bytes());

    let mut chunk = Vec::with_capacity(data.len() + 12);
    write_chunk(&mut chunk, &variant.chunk_type(), &data)?;
    Ok(chunk)
}

/// Splice a generated chunk into `sequence` at `position`
///
/// Returns the position just past the inserted bytes so consecutive calls
/// lay chunks down contiguously.
pub fn insert_chunk(
    sequence: &mut Vec<u8>,
    position: usize,
    key: &str,
    value: &str,
    variant: TextVariant,
) -> Result<usize> {
    if position > sequence.len() {
        return Err(Error::InvalidPosition {
            position,
            len: sequence.len(),
        });
    }

    let chunk = generate_chunk(key, value, variant)?;
    let inserted = chunk.len();
    sequence.splice(position..position, chunk);
    Ok(position + inserted)
}
