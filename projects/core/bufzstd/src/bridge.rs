//! Call surface into the native ZStandard engine.
//!
//! Every function here returns the engine's raw status code; interpreting it is the job of
//! [`classify`](crate::error::classify). Two rules hold for every call:
//!
//! - An empty slice is passed as a null pointer with length zero, never as the dangling
//!   pointer `as_ptr()` returns for empty slices.
//! - Destinations are `MaybeUninit` so callers can hand over a `Vec`'s spare capacity. The
//!   engine only writes to destination memory, never reads it.

use crate::context::DecompressionContext;
use crate::profile::CodecProfile;
use core::ffi::{c_void, CStr};
use core::mem::MaybeUninit;
use core::ops::RangeInclusive;
use core::ptr;
use zstd_sys::ZSTD_dParameter::*;
use zstd_sys::ZSTD_format_e::*;
use zstd_sys::*;

/// Value of `ZSTD_CONTENTSIZE_UNKNOWN`.
pub const CONTENTSIZE_UNKNOWN: u64 = u64::MAX;

/// Value of `ZSTD_CONTENTSIZE_ERROR`.
pub const CONTENTSIZE_ERROR: u64 = u64::MAX - 1;

/// Decompressed size declared by a frame header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameContentSize {
    /// The header declares this many decompressed bytes. May be zero.
    Known(u64),
    /// The header does not carry a content size.
    Unknown,
    /// The input is not a valid frame, or is too short to contain a header.
    Invalid,
}

/// Frame layout expected by a decoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FrameFormat {
    /// Standard frames, starting with the magic number.
    #[default]
    Standard,
    /// Frames without the leading magic number, as written by the batch profile.
    Magicless,
}

impl FrameFormat {
    pub(crate) fn native(self) -> ZSTD_format_e {
        match self {
            Self::Standard => ZSTD_f_zstd1,
            Self::Magicless => ZSTD_f_zstd1_magicless,
        }
    }
}

#[inline(always)]
fn src_ptr(src: &[u8]) -> *const c_void {
    if src.is_empty() {
        ptr::null()
    } else {
        src.as_ptr() as *const c_void
    }
}

#[inline(always)]
fn dst_ptr(dst: &mut [MaybeUninit<u8>]) -> *mut c_void {
    if dst.is_empty() {
        ptr::null_mut()
    } else {
        dst.as_mut_ptr() as *mut c_void
    }
}

/// Compresses `src` into `dst` as a standard frame at the given level.
pub fn native_compress(dst: &mut [MaybeUninit<u8>], src: &[u8], level: i32) -> usize {
    unsafe { ZSTD_compress(dst_ptr(dst), dst.len(), src_ptr(src), src.len(), level) }
}

/// Decompresses the standard frame(s) in `src` into `dst`.
/// Fails with `dstSize_tooSmall` if `dst` cannot hold the whole output.
pub fn native_decompress(dst: &mut [MaybeUninit<u8>], src: &[u8]) -> usize {
    unsafe { ZSTD_decompress(dst_ptr(dst), dst.len(), src_ptr(src), src.len()) }
}

/// Compresses `src` into `dst` using the fixed batch [`CodecProfile`].
pub fn native_batch_compress(
    profile: &CodecProfile,
    dst: &mut [MaybeUninit<u8>],
    src: &[u8],
) -> usize {
    profile.with_context(|cctx| unsafe {
        ZSTD_compress2(
            cctx.as_mut_ptr(),
            dst_ptr(dst),
            dst.len(),
            src_ptr(src),
            src.len(),
        )
    })
}

/// Decompresses a magic-less frame, as produced by [`native_batch_compress`], into `dst`.
///
/// A short-lived decompression context is configured with the same format flag as the batch
/// profile; no other parameter affects decoding.
pub fn native_decompress_magicless(dst: &mut [MaybeUninit<u8>], src: &[u8]) -> usize {
    let Some(mut dctx) = DecompressionContext::new() else {
        return error_status(ZSTD_ErrorCode::ZSTD_error_memory_allocation);
    };

    let result = dctx.set_parameter(
        ZSTD_d_experimentalParam1, // zstd_d_format
        FrameFormat::Magicless.native() as i32,
    );
    if is_error(result) {
        return result;
    }

    unsafe {
        ZSTD_decompressDCtx(
            dctx.as_mut_ptr(),
            dst_ptr(dst),
            dst.len(),
            src_ptr(src),
            src.len(),
        )
    }
}

/// Reads the decompressed size declared in the header of the frame starting at `src`.
pub fn native_frame_content_size(src: &[u8]) -> FrameContentSize {
    match unsafe { ZSTD_getFrameContentSize(src_ptr(src), src.len()) } {
        CONTENTSIZE_UNKNOWN => FrameContentSize::Unknown,
        CONTENTSIZE_ERROR => FrameContentSize::Invalid,
        size => FrameContentSize::Known(size),
    }
}

/// Native `ZSTD_compressBound`. Returns an error status for sizes the engine cannot handle.
pub fn native_compress_bound(src_size: usize) -> usize {
    unsafe { ZSTD_compressBound(src_size) }
}

/// Compression levels accepted by the linked engine.
pub fn native_level_range() -> RangeInclusive<i32> {
    unsafe { ZSTD_minCLevel()..=ZSTD_maxCLevel() }
}

/// Native `ZSTD_isError`.
pub fn is_error(code: usize) -> bool {
    unsafe { ZSTD_isError(code) != 0 }
}

/// Native `ZSTD_getErrorName`: the diagnostic name for a status code.
pub fn error_name(code: usize) -> &'static str {
    // SAFETY: The engine returns pointers into a static string table.
    unsafe { static_str(ZSTD_getErrorName(code)) }
}

/// Native `ZSTD_getErrorCode`: the error enum for a status code.
pub fn error_code(code: usize) -> ZSTD_ErrorCode {
    unsafe { ZSTD_getErrorCode(code) }
}

/// Native `ZSTD_getErrorString`: the diagnostic name for an error enum.
pub fn error_code_name(code: ZSTD_ErrorCode) -> &'static str {
    // SAFETY: The engine returns pointers into a static string table.
    unsafe { static_str(ZSTD_getErrorString(code)) }
}

/// Encodes an error enum as the status code the engine would return for it.
pub fn error_status(code: ZSTD_ErrorCode) -> usize {
    (code as usize).wrapping_neg()
}

unsafe fn static_str(name: *const core::ffi::c_char) -> &'static str {
    if name.is_null() {
        return "Unspecified error code";
    }
    CStr::from_ptr(name)
        .to_str()
        .unwrap_or("Unspecified error code")
}
