//! Error types, and the classification of native status codes into them.

use crate::bridge::{error_code, error_code_name, error_name};
use std::io;
use thiserror::Error;
use zstd_sys::ZSTD_ErrorCode;

/// Result type for codec operations.
pub type ZstdResult<T> = Result<T, ZstdError>;

/// Largest error enum value; status codes within this distance of `usize::MAX` are errors.
const ERROR_MAX_CODE: usize = ZSTD_ErrorCode::ZSTD_error_maxCode as usize;

/// Errors returned by the compression and decompression APIs.
#[derive(Debug, Error)]
pub enum ZstdError {
    /// Decompression was requested on a zero-length input. Never reaches the native engine.
    #[error("Bytes slice is empty")]
    EmptySource,

    /// The destination buffer is smaller than the output.
    ///
    /// Check for this with [`ZstdError::is_insufficient_destination`] rather than the message.
    #[error("{name}")]
    InsufficientDestination {
        /// Native diagnostic name.
        name: &'static str,
    },

    /// Any other failure reported by the native engine.
    #[error("{name}")]
    Codec {
        /// Native error enum.
        code: ZSTD_ErrorCode,
        /// Native diagnostic name, e.g. `"Src size is incorrect"`.
        name: &'static str,
    },

    /// The streaming decoder failed for a reason outside the codec, e.g. a truncated stream.
    #[error("{0}")]
    Io(io::Error),
}

impl ZstdError {
    /// Creates the error the native engine would report for `code`.
    pub fn from_error_code(code: ZSTD_ErrorCode) -> Self {
        let name = error_code_name(code);
        match code {
            ZSTD_ErrorCode::ZSTD_error_dstSize_tooSmall => Self::InsufficientDestination { name },
            _ => Self::Codec { code, name },
        }
    }

    /// Whether this error means the destination buffer was too small.
    pub fn is_insufficient_destination(&self) -> bool {
        matches!(self, Self::InsufficientDestination { .. })
    }

    /// The native error enum, if this error came from the engine.
    pub fn code(&self) -> Option<ZSTD_ErrorCode> {
        match self {
            Self::InsufficientDestination { .. } => {
                Some(ZSTD_ErrorCode::ZSTD_error_dstSize_tooSmall)
            }
            Self::Codec { code, .. } => Some(*code),
            Self::EmptySource | Self::Io(_) => None,
        }
    }
}

/// Whether `err` means the destination buffer was too small.
#[inline]
pub fn is_insufficient_destination_error(err: &ZstdError) -> bool {
    err.is_insufficient_destination()
}

/// Whether a native status code encodes an error rather than a byte count.
///
/// Errors are encoded as `-(error enum)` in two's complement, so every code in the top
/// `ZSTD_error_maxCode - 1` values of `usize` is an error. Agrees with `ZSTD_isError`.
#[inline]
pub const fn is_error_code(code: usize) -> bool {
    code > ERROR_MAX_CODE.wrapping_neg()
}

/// Interprets a native status code: the byte count on success, otherwise the typed error.
pub fn classify(code: usize) -> ZstdResult<usize> {
    if !is_error_code(code) {
        return Ok(code);
    }

    let name = error_name(code);
    Err(match error_code(code) {
        ZSTD_ErrorCode::ZSTD_error_dstSize_tooSmall => ZstdError::InsufficientDestination { name },
        code => ZstdError::Codec { code, name },
    })
}

// Errors cross `io::Read` boundaries inside the streaming decoder; unwrap them on the way back
// so callers see the original codec error rather than an opaque I/O one.
impl From<io::Error> for ZstdError {
    fn from(err: io::Error) -> Self {
        match err.downcast::<ZstdError>() {
            Ok(inner) => inner,
            Err(err) => Self::Io(err),
        }
    }
}

impl From<ZstdError> for io::Error {
    fn from(err: ZstdError) -> Self {
        match err {
            ZstdError::Io(err) => err,
            other => io::Error::other(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bridge::{error_status, is_error};
    use crate::test_prelude::*;

    /// Reinterprets a signed status the way the C API does (`(size_t)-n`).
    fn status(code: isize) -> usize {
        code as usize
    }

    #[test]
    fn verdict_matches_native_around_the_sign_boundary() {
        for code in -105..=105 {
            let code = status(code);
            assert_eq!(
                classify(code).is_err(),
                is_error(code),
                "verdicts differ for {}",
                code as isize
            );
        }
    }

    #[test]
    fn verdict_matches_native_at_the_error_range_boundary() {
        let max = ERROR_MAX_CODE as isize;
        for code in [-max - 2, -max - 1, -max, -max + 1, isize::MIN, isize::MAX] {
            let code = status(code);
            assert_eq!(is_error_code(code), is_error(code), "{}", code as isize);
        }
    }

    #[rstest]
    #[case(0)]
    #[case(1)]
    #[case(4096)]
    #[case(usize::MAX >> 1)]
    fn byte_counts_pass_through(#[case] code: usize) {
        assert_eq!(classify(code).unwrap(), code);
    }

    #[test]
    fn destination_too_small_has_dedicated_kind() {
        let err = classify(error_status(ZSTD_ErrorCode::ZSTD_error_dstSize_tooSmall)).unwrap_err();
        assert!(is_insufficient_destination_error(&err));
        assert_eq!(err.to_string(), "Destination buffer is too small");
        assert!(matches!(
            err.code(),
            Some(ZSTD_ErrorCode::ZSTD_error_dstSize_tooSmall)
        ));
    }

    #[rstest]
    #[case(ZSTD_ErrorCode::ZSTD_error_srcSize_wrong, "Src size is incorrect")]
    #[case(ZSTD_ErrorCode::ZSTD_error_parameter_outOfBound, "Parameter is out of bound")]
    #[case(ZSTD_ErrorCode::ZSTD_error_GENERIC, "Error (generic)")]
    fn other_errors_carry_native_name(#[case] code: ZSTD_ErrorCode, #[case] name: &str) {
        let err = classify(error_status(code)).unwrap_err();
        assert!(!err.is_insufficient_destination());
        assert!(matches!(err, ZstdError::Codec { .. }));
        assert_eq!(err.to_string(), name);
    }

    #[test]
    fn from_error_code_matches_classify() {
        let code = ZSTD_ErrorCode::ZSTD_error_dstSize_tooSmall;
        assert!(ZstdError::from_error_code(code).is_insufficient_destination());

        let code = ZSTD_ErrorCode::ZSTD_error_srcSize_wrong;
        let err = ZstdError::from_error_code(code);
        assert_eq!(
            err.to_string(),
            classify(error_status(code)).unwrap_err().to_string()
        );
    }

    #[test]
    fn empty_source_has_no_native_code() {
        assert!(ZstdError::EmptySource.code().is_none());
        assert!(!ZstdError::EmptySource.is_insufficient_destination());
    }

    #[test]
    fn codec_errors_survive_an_io_round_trip() {
        let err: io::Error =
            ZstdError::from_error_code(ZSTD_ErrorCode::ZSTD_error_dstSize_tooSmall).into();
        let err: ZstdError = err.into();
        assert!(err.is_insufficient_destination());
    }

    #[test]
    fn plain_io_errors_stay_io() {
        let err: ZstdError = io::Error::new(io::ErrorKind::UnexpectedEof, "truncated").into();
        assert!(matches!(err, ZstdError::Io(_)));
        assert_eq!(err.to_string(), "truncated");
    }
}
