//! The fixed parameter set used by batch compression.
//!
//! The batch profile trades generality for small, predictable output: maximum compression level,
//! no literal entropy coding, and a frame stripped of everything that is known out-of-band (magic
//! bytes, dictionary ID, checksum, content size).
//!
//! Build it once at startup with [`CodecProfile::batch`] and pass it by reference to every
//! [`compress_batch`](crate::compress_batch) call.

use crate::bridge::FrameFormat;
use crate::context::CompressionContext;
use crate::error::{classify, ZstdError};
use std::sync::{Mutex, PoisonError};
use thiserror::Error;
use tracing::debug;
use zstd_sys::ZSTD_cParameter::{self, *};

/// Compression level of the batch profile.
pub const BATCH_COMPRESSION_LEVEL: i32 = 22;

/// Target compressed block size of the batch profile (124 KiB).
pub const BATCH_TARGET_BLOCK_SIZE: i32 = 124 * 1024;

/// Window log of the batch profile (128 KiB window).
pub const BATCH_WINDOW_LOG: i32 = 17;

/// `ZSTD_ps_disable` from `ZSTD_ParamSwitch_e`.
const PARAM_SWITCH_DISABLE: i32 = 2;

/// Errors that can occur while building a [`CodecProfile`].
#[derive(Debug, Error)]
pub enum ProfileError {
    /// The native compression context could not be allocated.
    #[error("ZSTD_createCCtx() failed")]
    ContextAllocation,

    /// The native engine rejected one of the profile's parameters.
    #[error("failed to {step}: {source}")]
    Parameter {
        /// What was being configured.
        step: &'static str,
        /// Native error.
        #[source]
        source: ZstdError,
    },
}

/// A native compression context frozen to the batch parameter set.
///
/// The context is only touched through [`compress_batch`](crate::compress_batch), one call at a
/// time. Share one profile across threads by reference, or build one per thread to compress
/// batches in parallel.
#[derive(Debug)]
pub struct CodecProfile {
    context: Mutex<CompressionContext>,
}

impl CodecProfile {
    /// Creates the batch profile.
    ///
    /// # Errors
    ///
    /// - [`ProfileError::ContextAllocation`] if the native context cannot be allocated.
    /// - [`ProfileError::Parameter`] if the linked engine rejects a parameter, e.g. because it
    ///   was built without the experimental API.
    pub fn batch() -> Result<Self, ProfileError> {
        let mut context = CompressionContext::new().ok_or(ProfileError::ContextAllocation)?;

        let parameters: [(ZSTD_cParameter, i32, &'static str); 8] = [
            (
                ZSTD_c_compressionLevel,
                BATCH_COMPRESSION_LEVEL,
                "set compression level",
            ),
            (
                ZSTD_c_experimentalParam5, // zstd_c_literalCompressionMode
                PARAM_SWITCH_DISABLE,
                "disable literal compression",
            ),
            (
                ZSTD_c_targetCBlockSize,
                BATCH_TARGET_BLOCK_SIZE,
                "set target block size",
            ),
            (ZSTD_c_windowLog, BATCH_WINDOW_LOG, "set window log"),
            (ZSTD_c_dictIDFlag, 0, "disable dictionary ID"),
            (ZSTD_c_checksumFlag, 0, "disable checksum"),
            (
                ZSTD_c_experimentalParam2, // zstd_c_format
                FrameFormat::Magicless.native() as i32,
                "set magicless format",
            ),
            (ZSTD_c_contentSizeFlag, 0, "disable content size"),
        ];

        for (parameter, value, step) in parameters {
            classify(context.set_parameter(parameter, value))
                .map_err(|source| ProfileError::Parameter { step, source })?;
        }

        debug!(
            level = BATCH_COMPRESSION_LEVEL,
            window_log = BATCH_WINDOW_LOG,
            target_block_size = BATCH_TARGET_BLOCK_SIZE,
            "created batch compression profile"
        );
        Ok(Self {
            context: Mutex::new(context),
        })
    }

    /// Runs `f` with exclusive access to the native context.
    pub(crate) fn with_context<T>(&self, f: impl FnOnce(&mut CompressionContext) -> T) -> T {
        // ZSTD_compress2 starts a fresh session on every call, so a panic mid-call leaves
        // nothing behind worth poisoning over.
        let mut context = self.context.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut context)
    }
}
