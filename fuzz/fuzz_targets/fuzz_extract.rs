#![no_main]

use libfuzzer_sys::fuzz_target;
use png_text_chunk::{
    extract_text, extract_text_with, read_structure, ExtractOptions, SliceSource, StreamSource,
};
use std::io::Cursor;

fuzz_target!(|data: &[u8]| {
    // Any input must produce entries or an error, never a panic
    let from_slice = extract_text(&mut SliceSource::new(data));

    // Stream and slice walks must agree
    let mut stream = StreamSource::new(Cursor::new(data)).expect("in-memory stream");
    let from_stream = extract_text(&mut stream);
    assert_eq!(from_slice.is_ok(), from_stream.is_ok());
    if let (Ok(a), Ok(b)) = (&from_slice, &from_stream) {
        assert_eq!(a, b);
    }

    let lenient = ExtractOptions::new().skip_signature_check();
    let _ = extract_text_with(&mut SliceSource::new(data), &lenient);
    let _ = read_structure(&mut SliceSource::new(data));
});
