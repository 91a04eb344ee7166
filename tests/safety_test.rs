//! Safety tests - integrity checks and malformed input
//!
//! These tests verify that corrupted or hostile input is rejected with the
//! right error instead of yielding wrong data or panicking.

use png_text_chunk::{
    extract_text, extract_text_from_bytes, insert_text_into_bytes, test_utils::*, ChunkType,
    Error, SliceSource, StreamSource, TextEntry,
};
use rstest::rstest;
use std::io::Cursor;

#[rstest]
fn test_signature_gate(#[values(0, 1, 2, 3, 4, 5, 6, 7)] index: usize) {
    let png = sample_png();
    let kv = [TextEntry::new("k", "v")];

    for delta in 1..=255u8 {
        let mut mutated = png.clone();
        mutated[index] ^= delta;

        assert!(
            matches!(extract_text_from_bytes(&mutated), Err(Error::SignatureNotFound)),
            "extract accepted signature byte {} ^ {:#04x}",
            index,
            delta
        );
        let err = insert_text_into_bytes(&mutated, &kv, false).unwrap_err();
        assert!(matches!(err, Error::SignatureNotFound));
        assert!(err.is_structural());
    }
}

#[test]
fn test_crc_enforced_for_every_bit_of_text_chunk() {
    let png = PngBuilder::new()
        .ihdr(1, 1)
        .text("Key", "value")
        .iend()
        .build();
    let (_, data_start, crc_start) = locate_chunk(&png, ChunkType::TEXT).unwrap();

    // payload bytes and the 4 stored CRC bytes
    for byte in data_start..crc_start + 4 {
        for bit in 0..8 {
            let mut corrupted = png.clone();
            corrupted[byte] ^= 1 << bit;
            let result = extract_text_from_bytes(&corrupted);
            assert!(
                matches!(
                    result,
                    Err(Error::DataCorruption {
                        chunk_type: ChunkType::TEXT,
                        ..
                    })
                ),
                "byte {} bit {}: {:?}",
                byte,
                bit,
                result
            );
        }
    }
}

#[test]
fn test_crc_enforced_on_stream_source() {
    let png = sample_png();
    let (_, _, crc_start) = locate_chunk(&png, ChunkType::ITXT).unwrap();
    let mut corrupted = png;
    corrupted[crc_start] ^= 0x80;

    let mut source = StreamSource::new(Cursor::new(corrupted)).unwrap();
    match extract_text(&mut source) {
        Err(Error::DataCorruption {
            chunk_type,
            computed,
            stored,
        }) => {
            assert_eq!(chunk_type, ChunkType::ITXT);
            assert_eq!(computed ^ stored, 0x8000_0000);
        }
        other => panic!("expected DataCorruption, got {:?}", other),
    }
}

#[rstest]
#[case(0, false)]
#[case(1, true)]
#[case(79, true)]
#[case(80, false)]
fn test_key_bounds(#[case] key_len: usize, #[case] accepted: bool) {
    let png = minimal_png();
    let kv = [TextEntry::new("k".repeat(key_len), "value")];

    let result = insert_text_into_bytes(&png, &kv, false);
    if accepted {
        let out = result.expect("key within bounds");
        assert_eq!(extract_text_from_bytes(&out).unwrap(), kv);
    } else {
        assert!(matches!(result, Err(Error::InvalidKey { len }) if len == key_len));
    }
}

#[test]
fn test_missing_ihdr_is_structural() {
    let png = PngBuilder::new().idat(&[1, 2, 3]).iend().build();
    let err = insert_text_into_bytes(&png, &[TextEntry::new("k", "v")], false).unwrap_err();
    assert!(matches!(err, Error::HeaderNotFound));
    assert!(err.is_structural());
}

#[test]
fn test_truncated_chunk_is_rejected() {
    let png = sample_png();
    let (_, data_start, _) = locate_chunk(&png, ChunkType(*b"IDAT")).unwrap();
    let truncated = &png[..data_start + 3];

    assert!(matches!(
        extract_text_from_bytes(truncated),
        Err(Error::TruncatedChunk { .. })
    ));
    assert!(matches!(
        extract_text(&mut StreamSource::new(Cursor::new(truncated.to_vec())).unwrap()),
        Err(Error::TruncatedChunk { .. })
    ));
}

#[test]
fn test_oversized_text_length_does_not_allocate() {
    // tEXt header claiming ~2 GB with only a few bytes behind it
    let png = PngBuilder::new()
        .ihdr(1, 1)
        .raw(&[0x7F, 0xFF, 0xFF, 0xF0])
        .raw(b"tEXt")
        .raw(b"k\0v")
        .build();
    assert!(matches!(
        extract_text_from_bytes(&png),
        Err(Error::TruncatedChunk { .. })
    ));

    let png = PngBuilder::new()
        .ihdr(1, 1)
        .raw(&[0xFF, 0xFF, 0xFF, 0xFF])
        .raw(b"tEXt")
        .build();
    assert!(matches!(
        extract_text_from_bytes(&png),
        Err(Error::InvalidChunkLength { .. })
    ));
}

#[test]
fn test_text_without_separator_is_malformed() {
    let png = PngBuilder::new()
        .ihdr(1, 1)
        .chunk(ChunkType::TEXT, b"no-separator")
        .iend()
        .build();
    assert!(matches!(
        extract_text_from_bytes(&png),
        Err(Error::MalformedChunk { .. })
    ));
}

#[test]
fn test_garbage_after_signature_never_panics() {
    let mut seed = 0x2545_F491_u32;
    for len in 0..256 {
        let mut data = png_text_chunk::PNG_SIGNATURE.to_vec();
        for _ in 0..len {
            seed ^= seed << 13;
            seed ^= seed >> 17;
            seed ^= seed << 5;
            data.push(seed as u8);
        }
        let _ = extract_text_from_bytes(&data);
        let _ = insert_text_into_bytes(&data, &[TextEntry::new("k", "v")], true);
        let _ = png_text_chunk::read_structure(&mut SliceSource::new(&data));
    }
}
