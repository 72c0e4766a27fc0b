#![no_main]

// Compresses arbitrary data at an arbitrary level and checks it decompresses to the same bytes,
// through both the standard and the batch paths.

use bufzstd::{
    compress_batch, compress_bound, compress_level, decompress, decompress_batch, CodecProfile,
    BEST_COMPRESSION, BEST_SPEED,
};
use libfuzzer_sys::{arbitrary, fuzz_target};
use std::sync::OnceLock;

#[derive(Clone, Debug, arbitrary::Arbitrary)]
pub struct Input {
    pub level: u8,
    pub pooled_capacity: u16,
    pub data: Vec<u8>,
}

static PROFILE: OnceLock<CodecProfile> = OnceLock::new();

fuzz_target!(|input: Input| {
    let span = (BEST_COMPRESSION - BEST_SPEED + 1) as u8;
    let level = BEST_SPEED + (input.level % span) as i32;
    let pooled = Vec::with_capacity(input.pooled_capacity as usize);

    let compressed = compress_level(pooled, &input.data, level).expect("compression failed");
    assert!(compressed.len() <= compress_bound(input.data.len()));
    let decompressed = decompress(Vec::new(), &compressed).expect("decompression failed");
    assert_eq!(decompressed, input.data);

    let profile = PROFILE.get_or_init(|| CodecProfile::batch().expect("batch profile"));
    match compress_batch(profile, &input.data) {
        Ok(compressed) if input.data.is_empty() => assert!(compressed.is_empty()),
        Ok(compressed) => {
            assert!(compressed.len() <= input.data.len());
            let decompressed = decompress_batch(Vec::new(), &compressed).expect("batch decode");
            assert_eq!(decompressed, input.data);
        }
        Err(err) => assert!(err.is_insufficient_destination()),
    }
});
