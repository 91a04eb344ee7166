//! Insert and extract textual chunks in a PNG stream

use crate::{
    chunk::{read_header, skip_payload, ChunkType, PNG_SIGNATURE},
    error::{Error, Result},
    source::{ChunkSource, SliceSource, StreamSource},
    text::{insert_chunk, read_text_chunk, validate_key, TextEntry, TextVariant},
    updates::{ExtractOptions, InsertOptions},
};
use std::{fs::File, io::BufReader, path::Path};

/// Check the first 8 bytes against the PNG signature
///
/// The cursor is left at offset 0 afterwards, whatever the outcome. A short
/// source or a failed read counts as "not a PNG".
pub fn is_valid_png<S: ChunkSource>(source: &mut S) -> bool {
    let valid = match read_signature(source) {
        Ok(valid) => valid,
        Err(e) => {
            log::warn!("could not read PNG signature: {}", e);
            false
        }
    };
    if let Err(e) = source.seek_to(0) {
        log::warn!("could not rewind after signature check: {}", e);
    }
    valid
}

fn read_signature<S: ChunkSource>(source: &mut S) -> Result<bool> {
    source.seek_to(0)?;
    if source.remaining() < PNG_SIGNATURE.len() as u64 {
        return Ok(false);
    }
    Ok(source.read_bytes(PNG_SIGNATURE.len())? == PNG_SIGNATURE)
}

/// Validate (optionally) and park the cursor on the first chunk
fn begin_scan<S: ChunkSource>(source: &mut S, verify_signature: bool) -> Result<()> {
    if verify_signature && !is_valid_png(source) {
        return Err(Error::SignatureNotFound);
    }
    source.seek_to(PNG_SIGNATURE.len() as u64)
}

/// Offset just past the IHDR chunk's CRC
///
/// Expects the cursor on a chunk boundary. Chunks before IHDR are skipped.
fn find_insert_position<S: ChunkSource>(source: &mut S) -> Result<u64> {
    while !source.at_end() {
        let header = read_header(source)?;
        if header.chunk_type == ChunkType::IEND {
            break;
        }
        skip_payload(source, header.length)?;
        if header.chunk_type == ChunkType::IHDR {
            return Ok(source.position());
        }
    }
    Err(Error::HeaderNotFound)
}

/// Insert text entries right after IHDR, returning the complete new PNG
///
/// Entries keep their order. Nothing is returned on failure; the source is
/// only read.
pub fn insert_text_with<S: ChunkSource>(
    source: &mut S,
    entries: &[TextEntry],
    options: &InsertOptions,
) -> Result<Vec<u8>> {
    for entry in entries {
        validate_key(&entry.key)?;
    }

    begin_scan(source, options.verify_signature)?;
    let position = find_insert_position(source)?;
    log::debug!(
        "inserting {} {} chunk(s) at offset {}",
        entries.len(),
        options.variant.chunk_type(),
        position
    );

    // head | new chunks | tail
    source.seek_to(0)?;
    let mut output = source.read_bytes(position as usize)?;
    output.reserve(source.remaining() as usize);

    let mut cursor = output.len();
    for entry in entries {
        cursor = insert_chunk(&mut output, cursor, &entry.key, &entry.value, options.variant)?;
    }

    let tail = source.read_bytes(source.remaining() as usize)?;
    output.extend_from_slice(&tail);
    Ok(output)
}

/// Insert text entries right after IHDR as `tEXt` (or `iTXt` when
/// `use_international` is set)
pub fn insert_text<S: ChunkSource>(
    source: &mut S,
    entries: &[TextEntry],
    use_international: bool,
) -> Result<Vec<u8>> {
    let options = InsertOptions::new().variant(TextVariant::from_international(use_international));
    insert_text_with(source, entries, &options)
}

/// Collect every tEXt/iTXt entry in chunk order
///
/// Stops at IEND. Without [`ExtractOptions::require_end`], running off the
/// end of the stream is a soft stop.
pub fn extract_text_with<S: ChunkSource>(
    source: &mut S,
    options: &ExtractOptions,
) -> Result<Vec<TextEntry>> {
    begin_scan(source, options.verify_signature)?;

    let mut entries = Vec::new();
    loop {
        if source.at_end() {
            if options.require_end {
                return Err(Error::MissingEnd);
            }
            log::warn!(
                "PNG stream ended at offset {} without IEND",
                source.position()
            );
            break;
        }

        let header = read_header(source)?;
        match header.chunk_type {
            ChunkType::IEND => break,
            chunk_type if chunk_type.is_text() => {
                entries.push(read_text_chunk(source, &header)?);
            }
            _ => skip_payload(source, header.length)?,
        }
    }

    log::debug!("extracted {} text entries", entries.len());
    Ok(entries)
}

/// Collect every tEXt/iTXt entry in chunk order with default options
pub fn extract_text<S: ChunkSource>(source: &mut S) -> Result<Vec<TextEntry>> {
    extract_text_with(source, &ExtractOptions::default())
}

/// [`extract_text`] over an in-memory PNG
pub fn extract_text_from_bytes(data: &[u8]) -> Result<Vec<TextEntry>> {
    extract_text(&mut SliceSource::new(data))
}

/// [`insert_text`] over an in-memory PNG
pub fn insert_text_into_bytes(
    data: &[u8],
    entries: &[TextEntry],
    use_international: bool,
) -> Result<Vec<u8>> {
    insert_text(&mut SliceSource::new(data), entries, use_international)
}

/// [`extract_text`] over a PNG file, streamed from disk
pub fn extract_text_from_path<P: AsRef<Path>>(path: P) -> Result<Vec<TextEntry>> {
    let file = File::open(path)?;
    let mut source = StreamSource::new(BufReader::new(file))?;
    extract_text(&mut source)
}

/// [`insert_text`] over a PNG file, streamed from disk
///
/// The file is only read; the caller decides where the result is written.
pub fn insert_text_from_path<P: AsRef<Path>>(
    path: P,
    entries: &[TextEntry],
    use_international: bool,
) -> Result<Vec<u8>> {
    let file = File::open(path)?;
    let mut source = StreamSource::new(BufReader::new(file))?;
    insert_text(&mut source, entries, use_international)
}

/// [`extract_text`] over a memory-mapped PNG file
#[cfg(feature = "memory-mapped")]
pub fn extract_text_mmap<P: AsRef<Path>>(path: P) -> Result<Vec<TextEntry>> {
    let file = File::open(path)?;
    // SAFETY: the map is read-only and lives only for this call
    let mmap = unsafe { memmap2::Mmap::map(&file)? };
    extract_text(&mut SliceSource::new(&mmap))
}
