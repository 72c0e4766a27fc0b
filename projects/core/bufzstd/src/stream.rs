//! Streaming decompression over any [`Read`] source.
//!
//! [`decompress`](crate::decompress) falls back to this when a one-shot decompression runs out of
//! destination space. Unlike the one-shot path, the output size is bounded only by the data
//! itself.

use crate::bridge::FrameFormat;
use crate::context::DecompressionContext;
use crate::error::{classify, ZstdError, ZstdResult};
use core::ffi::c_void;
use std::io::{self, Read};
use zstd_sys::ZSTD_dParameter::*;
use zstd_sys::*;

/// Decompresses a stream of one or more concatenated frames read from `R`.
///
/// The native stream is released when the decoder is dropped.
pub struct Decoder<R> {
    reader: R,
    context: DecompressionContext,
    /// Compressed bytes read from `reader`; `input[input_pos..input_len]` is not yet consumed.
    input: Box<[u8]>,
    input_pos: usize,
    input_len: usize,
    reader_exhausted: bool,
    /// True between frames, i.e. when ending the stream here loses no data.
    frame_complete: bool,
}

impl<R: Read> Decoder<R> {
    /// Creates a decoder for standard frames.
    pub fn new(reader: R) -> ZstdResult<Self> {
        Self::with_format(reader, FrameFormat::Standard)
    }

    /// Creates a decoder for magic-less frames, as produced by
    /// [`compress_batch`](crate::compress_batch).
    pub fn magicless(reader: R) -> ZstdResult<Self> {
        Self::with_format(reader, FrameFormat::Magicless)
    }

    /// Creates a decoder for frames of the given format.
    pub fn with_format(reader: R, format: FrameFormat) -> ZstdResult<Self> {
        let mut context = DecompressionContext::new().ok_or_else(|| {
            ZstdError::from_error_code(ZSTD_ErrorCode::ZSTD_error_memory_allocation)
        })?;
        classify(context.set_parameter(
            ZSTD_d_experimentalParam1, // zstd_d_format
            format.native() as i32,
        ))?;

        let input_size = unsafe { ZSTD_DStreamInSize() };
        Ok(Self {
            reader,
            context,
            input: vec![0u8; input_size].into_boxed_slice(),
            input_pos: 0,
            input_len: 0,
            reader_exhausted: false,
            frame_complete: true,
        })
    }

    /// Releases the native stream and returns the underlying reader.
    pub fn into_inner(self) -> R {
        self.reader
    }

    fn refill(&mut self) -> io::Result<()> {
        if self.input_pos < self.input_len || self.reader_exhausted {
            return Ok(());
        }

        self.input_pos = 0;
        self.input_len = loop {
            match self.reader.read(&mut self.input) {
                Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
                result => break result?,
            }
        };
        self.reader_exhausted = self.input_len == 0;
        Ok(())
    }
}

impl<R: Read> Read for Decoder<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }

        loop {
            self.refill()?;

            let mut input = ZSTD_inBuffer {
                // SAFETY: input_pos <= input_len <= input.len(), so this stays in bounds.
                src: unsafe { self.input.as_ptr().add(self.input_pos) } as *const c_void,
                size: self.input_len - self.input_pos,
                pos: 0,
            };
            let mut output = ZSTD_outBuffer {
                dst: buf.as_mut_ptr() as *mut c_void,
                size: buf.len(),
                pos: 0,
            };

            let remaining = classify(unsafe {
                ZSTD_decompressStream(self.context.as_mut_ptr(), &mut output, &mut input)
            })?;
            self.input_pos += input.pos;

            // 0 means a frame was fully decoded and flushed.
            if remaining == 0 {
                self.frame_complete = true;
            } else if input.pos > 0 || output.pos > 0 {
                self.frame_complete = false;
            }

            if output.pos > 0 {
                return Ok(output.pos);
            }

            if self.reader_exhausted && self.input_pos == self.input_len {
                return if self.frame_complete {
                    Ok(0)
                } else {
                    Err(io::Error::new(
                        io::ErrorKind::UnexpectedEof,
                        "compressed stream ended mid-frame",
                    ))
                };
            }
        }
    }
}

/// Decompresses all of `src` through a [`Decoder`] into a new buffer.
pub(crate) fn decompress_stream(src: &[u8], format: FrameFormat) -> ZstdResult<Vec<u8>> {
    let mut decoder = Decoder::with_format(src, format)?;
    let mut output = Vec::new();
    decoder.read_to_end(&mut output)?;
    Ok(output)
}
