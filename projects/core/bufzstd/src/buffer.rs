//! Buffer-oriented compression and decompression.
//!
//! Every function that returns a `Vec<u8>` takes its destination by value. When the supplied
//! buffer has enough capacity for the worst case it is cleared and reused in place, so the
//! returned `Vec` shares its allocation; otherwise a new buffer of exactly the required size is
//! allocated and the supplied one is dropped. Pass `Vec::new()` when there is nothing to reuse.

use crate::bound::{compress_bound, DecompressLimits};
use crate::bridge::{
    native_batch_compress, native_compress, native_decompress, native_decompress_magicless,
    native_level_range, FrameFormat,
};
use crate::error::{classify, ZstdError, ZstdResult};
use crate::profile::CodecProfile;
use crate::stream::decompress_stream;
use crate::DEFAULT_COMPRESSION;
use core::mem::MaybeUninit;
use tracing::{debug, trace};
use zstd_sys::ZSTD_ErrorCode;

/// Returns an empty buffer with at least `required` bytes of capacity, reusing `dst` if it has
/// enough.
fn prepare_destination(mut dst: Vec<u8>, required: usize) -> Vec<u8> {
    if dst.capacity() >= required {
        trace!(capacity = dst.capacity(), required, "reusing destination buffer");
        dst.clear();
        dst
    } else {
        trace!(capacity = dst.capacity(), required, "allocating destination buffer");
        Vec::with_capacity(required)
    }
}

/// Marks the first `written` bytes of `dst`'s spare capacity as initialised.
///
/// # Safety
///
/// `dst` must be empty and the native engine must have written `written` bytes into its spare
/// capacity.
#[inline(always)]
unsafe fn commit(mut dst: Vec<u8>, written: usize) -> Vec<u8> {
    debug_assert!(written <= dst.capacity());
    dst.set_len(written);
    dst
}

/// Compresses `src` into a standard frame at [`DEFAULT_COMPRESSION`].
///
/// # Parameters
///
/// * `dst`: Buffer to reuse for the output, if it can hold [`compress_bound`] bytes.
/// * `src`: Data to compress. May be empty, which produces a valid empty frame.
pub fn compress(dst: Vec<u8>, src: &[u8]) -> ZstdResult<Vec<u8>> {
    compress_level(dst, src, DEFAULT_COMPRESSION)
}

/// Compresses `src` into a standard frame at the given level.
///
/// # Parameters
///
/// * `dst`: Buffer to reuse for the output, if it can hold [`compress_bound`] bytes.
/// * `src`: Data to compress.
/// * `level`: Compression level, e.g. [`BEST_SPEED`](crate::BEST_SPEED) to
///   [`BEST_COMPRESSION`](crate::BEST_COMPRESSION).
///
/// # Errors
///
/// A [`ZstdError::Codec`] named `"Parameter is out of bound"` if the linked engine does not
/// support `level`, or any other error it reports.
pub fn compress_level(dst: Vec<u8>, src: &[u8], level: i32) -> ZstdResult<Vec<u8>> {
    if !native_level_range().contains(&level) {
        return Err(ZstdError::from_error_code(
            ZSTD_ErrorCode::ZSTD_error_parameter_outOfBound,
        ));
    }

    let bound = compress_bound(src.len());
    let mut dst = prepare_destination(dst, bound);
    let written = classify(native_compress(
        &mut dst.spare_capacity_mut()[..bound],
        src,
        level,
    ))?;

    Ok(unsafe { commit(dst, written) })
}

/// Decompresses the standard frame(s) in `src`, using the default [`DecompressLimits`].
///
/// See [`decompress_with_limits`].
pub fn decompress(dst: Vec<u8>, src: &[u8]) -> ZstdResult<Vec<u8>> {
    decompress_with_limits(dst, src, &DecompressLimits::DEFAULT)
}

/// Decompresses the standard frame(s) in `src`.
///
/// The first attempt decompresses in one shot into a buffer sized by
/// [`DecompressLimits::size_hint`]. If that turns out too small, the payload is decompressed
/// again by the streaming decoder into a fresh buffer that grows as needed.
///
/// # Parameters
///
/// * `dst`: Buffer to reuse for the output. Its whole capacity is used if it is at least as
///   large as the hint.
/// * `src`: Compressed data.
/// * `limits`: Cap on the first-pass buffer.
///
/// # Errors
///
/// - [`ZstdError::EmptySource`] if `src` is empty.
/// - [`ZstdError::Codec`] if `src` is not valid compressed data.
/// - [`ZstdError::Io`] if the streaming decoder hits the end of `src` mid-frame.
pub fn decompress_with_limits(
    dst: Vec<u8>,
    src: &[u8],
    limits: &DecompressLimits,
) -> ZstdResult<Vec<u8>> {
    if src.is_empty() {
        return Err(ZstdError::EmptySource);
    }

    let hint = limits.size_hint(src);
    let mut dst = prepare_destination(dst, hint);
    match classify(native_decompress(dst.spare_capacity_mut(), src)) {
        Ok(written) => Ok(unsafe { commit(dst, written) }),
        Err(err) if err.is_insufficient_destination() => {
            debug!(
                src_len = src.len(),
                capacity = dst.capacity(),
                "destination too small, falling back to streaming decompression"
            );
            decompress_stream(src, FrameFormat::Standard)
        }
        Err(err) => Err(err),
    }
}

/// Decompresses the standard frame(s) in `src` into the start of `dst`, returning the number of
/// bytes written.
///
/// There is no fallback: if `dst` is too small, the result is an error for which
/// [`is_insufficient_destination_error`](crate::is_insufficient_destination_error) holds.
pub fn decompress_into(dst: &mut [u8], src: &[u8]) -> ZstdResult<usize> {
    // SAFETY: MaybeUninit<u8> has the same layout as u8, and the engine only writes
    // initialised bytes.
    let dst = unsafe { &mut *(dst as *mut [u8] as *mut [MaybeUninit<u8>]) };
    classify(native_decompress(dst, src))
}

/// Compresses `src` with the batch [`CodecProfile`].
///
/// The output is a magic-less frame without content size, checksum or dictionary ID, and is
/// never larger than `src`. Decompress it with [`decompress_batch`].
///
/// # Errors
///
/// An insufficient destination error if `src` does not shrink under the profile. The caller
/// should then store it uncompressed.
pub fn compress_batch(profile: &CodecProfile, src: &[u8]) -> ZstdResult<Vec<u8>> {
    if src.is_empty() {
        return Ok(Vec::new());
    }

    let mut dst = Vec::with_capacity(src.len());
    let written = classify(native_batch_compress(
        profile,
        &mut dst.spare_capacity_mut()[..src.len()],
        src,
    ))?;

    Ok(unsafe { commit(dst, written) })
}

/// Decompresses a frame produced by [`compress_batch`].
///
/// Batch frames do not declare their content size, so the first attempt always uses a buffer
/// of [`DecompressLimits::upper_bound`] bytes before falling back to streaming.
///
/// # Errors
///
/// Same as [`decompress`]. Standard frames are rejected as [`ZstdError::Codec`].
pub fn decompress_batch(dst: Vec<u8>, src: &[u8]) -> ZstdResult<Vec<u8>> {
    if src.is_empty() {
        return Err(ZstdError::EmptySource);
    }

    let hint = DecompressLimits::DEFAULT.upper_bound(src.len());
    let mut dst = prepare_destination(dst, hint);
    match classify(native_decompress_magicless(dst.spare_capacity_mut(), src)) {
        Ok(written) => Ok(unsafe { commit(dst, written) }),
        Err(err) if err.is_insufficient_destination() => {
            debug!(
                src_len = src.len(),
                capacity = dst.capacity(),
                "destination too small, falling back to streaming batch decompression"
            );
            decompress_stream(src, FrameFormat::Magicless)
        }
        Err(err) => Err(err),
    }
}
