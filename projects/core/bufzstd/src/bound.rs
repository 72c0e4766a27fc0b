//! Buffer size estimation for compression and decompression.
//!
//! # Zip Bomb Defense
//!
//! A frame header may declare any decompressed size it likes. [`decompress_size_hint`] trusts
//! that declaration only up to `max(10 * src.len(), 1_000_000)` bytes, so the first decompression
//! attempt never allocates more than that. Payloads that genuinely expand further fail that attempt
//! with a too-small destination and are finished by the streaming decoder, which grows its output
//! as data actually arrives.
//!
//! For large payloads with a compression ratio above 10, either allocate the destination yourself
//! and pass it in, or raise the cap with [`DecompressLimits`].

use crate::bridge::{native_frame_content_size, FrameContentSize};

/// Inputs below this size get extra headroom in [`compress_bound`] (128 KiB).
pub const COMPRESS_BOUND_LOW_LIMIT: usize = 128 << 10;

/// Default floor of the decompression buffer cap.
pub const DECOMPRESS_SIZE_BUFFER_LIMIT: usize = 1000 * 1000;

/// Default multiple of the compressed size allowed for the decompression buffer.
pub const DECOMPRESS_EXPANSION_RATIO: usize = 10;

/// Smallest possible frame header (`ZSTD_FRAMEHEADERSIZE_MIN`). Part of the experimental API,
/// so hardcoded here.
pub const FRAME_HEADER_SIZE_MIN: usize = 2;

/// Returns the worst case size needed for a compression destination buffer, which can be used to
/// preallocate a destination or select a previously allocated buffer from a pool.
///
/// Mirrors `ZSTD_COMPRESSBOUND` from `zstd.h` exactly, for every size the native engine accepts.
/// Larger sizes saturate at `usize::MAX` rather than wrapping below the input size.
///
/// # Parameters
///
/// * `src_size`: Number of bytes to be compressed.
#[inline]
pub const fn compress_bound(src_size: usize) -> usize {
    let margin = if src_size < COMPRESS_BOUND_LOW_LIMIT {
        (COMPRESS_BOUND_LOW_LIMIT - src_size) >> 11
    } else {
        0
    };
    src_size.saturating_add(src_size >> 8).saturating_add(margin)
}

/// Returns how large a destination buffer [`decompress`](crate::decompress) should start with for
/// `src`, using the default [`DecompressLimits`].
///
/// This is the frame's declared content size when the header has one, but never more than
/// `max(10 * src.len(), 1_000_000)` and never less than 1.
#[inline]
pub fn decompress_size_hint(src: &[u8]) -> usize {
    DecompressLimits::DEFAULT.size_hint(src)
}

/// Reads the decompressed size declared by the header of the standard frame starting at `src`.
#[inline]
pub fn frame_content_size(src: &[u8]) -> FrameContentSize {
    native_frame_content_size(src)
}

/// Caps applied to decompression buffers sized from untrusted frame headers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DecompressLimits {
    /// The cap is never lower than this many bytes.
    pub min_buffer_limit: usize,
    /// The cap is at least this multiple of the compressed size.
    pub expansion_ratio: usize,
}

impl DecompressLimits {
    /// The default policy: `max(10 * src.len(), 1_000_000)`.
    pub const DEFAULT: Self = Self {
        min_buffer_limit: DECOMPRESS_SIZE_BUFFER_LIMIT,
        expansion_ratio: DECOMPRESS_EXPANSION_RATIO,
    };

    /// Creates the default policy.
    pub const fn new() -> Self {
        Self::DEFAULT
    }

    /// Sets the floor of the cap.
    pub const fn with_min_buffer_limit(mut self, min_buffer_limit: usize) -> Self {
        self.min_buffer_limit = min_buffer_limit;
        self
    }

    /// Sets the multiple of the compressed size allowed.
    pub const fn with_expansion_ratio(mut self, expansion_ratio: usize) -> Self {
        self.expansion_ratio = expansion_ratio;
        self
    }

    /// Largest first-pass buffer allowed for a compressed input of `src_len` bytes. At least 1.
    pub fn upper_bound(&self, src_len: usize) -> usize {
        src_len
            .saturating_mul(self.expansion_ratio)
            .max(self.min_buffer_limit)
            .max(1)
    }

    /// Destination size hint for `src`, trusting its frame header up to [`Self::upper_bound`].
    pub fn size_hint(&self, src: &[u8]) -> usize {
        let upper_bound = self.upper_bound(src.len());
        if src.len() < FRAME_HEADER_SIZE_MIN {
            return upper_bound;
        }

        let hint = match native_frame_content_size(src) {
            // The native call needs a non-empty destination to get a valid pointer.
            FrameContentSize::Known(0) => 1,
            FrameContentSize::Known(size) => usize::try_from(size).unwrap_or(usize::MAX),
            FrameContentSize::Unknown | FrameContentSize::Invalid => upper_bound,
        };

        hint.min(upper_bound)
    }
}

impl Default for DecompressLimits {
    fn default() -> Self {
        Self::DEFAULT
    }
}
