//! Owning handles for native compression and decompression contexts.

use core::ptr::NonNull;
use zstd_sys::*;

/// Owns a `ZSTD_CCtx`, freeing it on drop.
#[derive(Debug)]
pub(crate) struct CompressionContext(NonNull<ZSTD_CCtx>);

// SAFETY: A ZSTD_CCtx has no thread affinity; it only must not be used from two threads at once,
// which `&mut self` on every accessor guarantees.
unsafe impl Send for CompressionContext {}

impl CompressionContext {
    /// Creates a new context, or `None` if the native allocation failed.
    pub fn new() -> Option<Self> {
        NonNull::new(unsafe { ZSTD_createCCtx() }).map(Self)
    }

    /// Sets a single advanced parameter, returning the raw native status code.
    pub fn set_parameter(&mut self, parameter: ZSTD_cParameter, value: i32) -> usize {
        unsafe { ZSTD_CCtx_setParameter(self.0.as_ptr(), parameter, value) }
    }

    #[inline(always)]
    pub fn as_mut_ptr(&mut self) -> *mut ZSTD_CCtx {
        self.0.as_ptr()
    }
}

impl Drop for CompressionContext {
    fn drop(&mut self) {
        unsafe { ZSTD_freeCCtx(self.0.as_ptr()) };
    }
}

/// Owns a `ZSTD_DCtx` (which doubles as a `ZSTD_DStream`), freeing it on drop.
#[derive(Debug)]
pub(crate) struct DecompressionContext(NonNull<ZSTD_DCtx>);

// SAFETY: See `CompressionContext`.
unsafe impl Send for DecompressionContext {}

impl DecompressionContext {
    /// Creates a new context, or `None` if the native allocation failed.
    pub fn new() -> Option<Self> {
        NonNull::new(unsafe { ZSTD_createDCtx() }).map(Self)
    }

    /// Sets a single advanced parameter, returning the raw native status code.
    pub fn set_parameter(&mut self, parameter: ZSTD_dParameter, value: i32) -> usize {
        unsafe { ZSTD_DCtx_setParameter(self.0.as_ptr(), parameter, value) }
    }

    #[inline(always)]
    pub fn as_mut_ptr(&mut self) -> *mut ZSTD_DCtx {
        self.0.as_ptr()
    }
}

impl Drop for DecompressionContext {
    fn drop(&mut self) {
        unsafe { ZSTD_freeDCtx(self.0.as_ptr()) };
    }
}
