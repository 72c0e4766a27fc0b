#![doc = include_str!(concat!("../", core::env!("CARGO_PKG_README")))]
#![warn(missing_docs)]

pub mod bound;
pub mod bridge;
pub mod buffer;
pub(crate) mod context;
pub mod error;
pub mod profile;
pub mod stream;

pub use bound::*;
pub use bridge::{FrameContentSize, FrameFormat};
pub use buffer::*;
pub use error::{classify, is_insufficient_destination_error, ZstdError, ZstdResult};
pub use profile::{CodecProfile, ProfileError};
pub use stream::Decoder;

/// Fastest compression level.
pub const BEST_SPEED: i32 = 1;

/// Highest compression level offered for general use. The native engine goes up to 22, at a
/// steep memory cost.
pub const BEST_COMPRESSION: i32 = 20;

/// Level used by [`compress`].
pub const DEFAULT_COMPRESSION: i32 = 5;

/// Common test prelude for avoiding duplicate imports in test modules
#[cfg(test)]
pub(crate) mod test_prelude;
