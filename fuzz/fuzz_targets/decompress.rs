#![no_main]

// Feeds arbitrary bytes to every decompression entry point. None may panic, the first-pass
// buffer must respect the zip bomb cap, and all paths must agree with the streaming decoder.

use bufzstd::{
    decompress, decompress_batch, decompress_into, decompress_size_hint, Decoder,
    DecompressLimits,
};
use libfuzzer_sys::fuzz_target;
use std::io::Read;

/// Payloads expanding past this are skipped, as the fallback path is unbounded by design.
const MAX_OUTPUT: u64 = 16 * 1024 * 1024;

/// Drains `decoder`, or `None` if the stream is invalid or expands past [`MAX_OUTPUT`].
fn reference_decode(decoder: Option<Decoder<&[u8]>>) -> Option<Vec<u8>> {
    let mut output = Vec::new();
    decoder?
        .take(MAX_OUTPUT + 1)
        .read_to_end(&mut output)
        .ok()?;
    (output.len() as u64 <= MAX_OUTPUT).then_some(output)
}

fuzz_target!(|data: &[u8]| {
    let hint = decompress_size_hint(data);
    assert!(hint >= 1);
    assert!(hint <= DecompressLimits::DEFAULT.upper_bound(data.len()));

    // Small fixed destination; must never write out of bounds.
    let mut small = [0u8; 64];
    if let Ok(written) = decompress_into(&mut small, data) {
        assert!(written <= small.len());
    }

    if let Some(expected) = reference_decode(Decoder::new(data).ok()) {
        if let Ok(output) = decompress(Vec::new(), data) {
            assert_eq!(output, expected);
        }
    }

    if let Some(expected) = reference_decode(Decoder::magicless(data).ok()) {
        if let Ok(output) = decompress_batch(Vec::new(), data) {
            assert_eq!(output, expected);
        }
    }
});
