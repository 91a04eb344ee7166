#![no_main]

use libfuzzer_sys::fuzz_target;
use png_text_chunk::{extract_text_from_bytes, insert_text_into_bytes, TextEntry};

fuzz_target!(|data: &[u8]| {
    let entries = [
        TextEntry::new("Comment", "fuzz"),
        TextEntry::new("Software", "png-text-chunk"),
    ];

    for use_international in [false, true] {
        let Ok(out) = insert_text_into_bytes(data, &entries, use_international) else {
            continue;
        };

        // Chunks after IHDR may be corrupt, but if the walk succeeds the
        // inserted entries must read back intact and adjacent
        if let Ok(extracted) = extract_text_from_bytes(&out) {
            assert!(extracted.windows(entries.len()).any(|w| w == entries));
        }
    }
});
