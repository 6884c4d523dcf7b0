//! HPACK: Header Compression for HTTP/2 (RFC 7541)
//!
//! The decoder under test sits behind [`HeaderDecoder`], a narrow capability
//! interface of write, finalize and resize. [`HpackDecoder`] is the
//! implementation backed by `fluke-hpack`.
//!
//! `fluke-hpack` only decodes complete header blocks, so writes are
//! accumulated the way CONTINUATION frames are reassembled into one block,
//! and the actual decoding happens when the block is finalized.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use crate::error::{DecodeError, ErrorKind};
use fluke_hpack::decoder::{DecoderError, IntegerDecodingError, StringDecodingError};
use tracing::{trace, warn};

/// Default dynamic table size (RFC 7540 Section 6.5.2).
pub const DEFAULT_TABLE_SIZE: u32 = 4096;

/// Maximum accumulated header block size (256 KB).
/// Partial writes past this size fail instead of growing without bound.
pub const MAX_HEADER_BLOCK_SIZE: usize = 256 * 1024;

/// A decoded header field
#[derive(Debug, Clone, PartialEq)]
pub struct HeaderField {
    pub name: String,
    pub value: String,
}

impl HeaderField {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }

    fn from_octets(name: &[u8], value: &[u8]) -> Self {
        Self::new(
            String::from_utf8_lossy(name).into_owned(),
            String::from_utf8_lossy(value).into_owned(),
        )
    }
}

/// What the step machine needs from a decoder.
///
/// Decoded fields are appended to `out` in decode order.
pub trait HeaderDecoder {
    /// Feed the next bytes of the current header block.
    fn write(&mut self, bytes: &[u8], out: &mut Vec<HeaderField>) -> Result<(), DecodeError>;

    /// Signal that the current header block is complete.
    fn finalize(&mut self, out: &mut Vec<HeaderField>) -> Result<(), DecodeError>;

    /// Upper bound for dynamic table size updates found in later blocks.
    fn set_max_allowed_table_size(&mut self, size: u32);
}

/// HPACK decoder for the harness.
/// Wraps `fluke_hpack::Decoder` which maintains dynamic table state across blocks.
pub struct HpackDecoder {
    inner: fluke_hpack::Decoder<'static>,
    /// Bytes of the header block written so far
    pending_block: Vec<u8>,
    max_block_size: usize,
}

impl std::fmt::Debug for HpackDecoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HpackDecoder")
            .field("pending_block", &self.pending_block.len())
            .field("max_block_size", &self.max_block_size)
            .finish()
    }
}

impl Default for HpackDecoder {
    fn default() -> Self {
        Self::new(DEFAULT_TABLE_SIZE)
    }
}

impl HpackDecoder {
    /// Create a decoder whose dynamic table, and the maximum size updates may
    /// bring it to, are both `max_table_size`.
    pub fn new(max_table_size: u32) -> Self {
        let mut inner = fluke_hpack::Decoder::new();
        // The table size must be set before the allowed maximum, fluke-hpack
        // asserts the former never exceeds the latter.
        inner.set_max_table_size(max_table_size as usize);
        inner.set_max_allowed_table_size(max_table_size as usize);
        Self {
            inner,
            pending_block: Vec::new(),
            max_block_size: MAX_HEADER_BLOCK_SIZE,
        }
    }

    pub fn with_max_block_size(mut self, max_block_size: usize) -> Self {
        self.max_block_size = max_block_size;
        self
    }

    /// Bytes written since the last finalize.
    pub fn pending_len(&self) -> usize {
        self.pending_block.len()
    }
}

impl HeaderDecoder for HpackDecoder {
    fn write(&mut self, bytes: &[u8], _out: &mut Vec<HeaderField>) -> Result<(), DecodeError> {
        // Guard against unbounded header block accumulation
        let new_size = self.pending_block.len() + bytes.len();
        if new_size > self.max_block_size {
            self.pending_block.clear();
            return Err(DecodeError::new(
                ErrorKind::Big,
                format!(
                    "Header block too large ({} bytes, max {})",
                    new_size, self.max_block_size
                ),
            ));
        }
        self.pending_block.extend_from_slice(bytes);
        trace!(len = bytes.len(), pending = self.pending_block.len(), "write");
        Ok(())
    }

    fn finalize(&mut self, out: &mut Vec<HeaderField>) -> Result<(), DecodeError> {
        let block = std::mem::take(&mut self.pending_block);
        trace!(len = block.len(), "finalize");
        let inner = &mut self.inner;
        // fluke-hpack unwraps the integer of a size update, so a truncated or
        // overlong one panics instead of returning an error.
        let decoded = panic::catch_unwind(AssertUnwindSafe(|| {
            inner.decode_with_cb(&block, |name, value| {
                out.push(HeaderField::from_octets(&name, &value));
            })
        }));
        match decoded {
            Ok(result) => result.map_err(|e| {
                DecodeError::new(classify(&e), format!("HPACK decode error: {:?}", e))
            }),
            Err(payload) => {
                let reason = panic_message(payload.as_ref());
                warn!(reason, "decoder panicked on a size update");
                Err(DecodeError::new(
                    ErrorKind::Buf,
                    format!("HPACK decode error: malformed size update ({})", reason),
                ))
            }
        }
    }

    fn set_max_allowed_table_size(&mut self, size: u32) {
        trace!(size, "resize");
        self.inner.set_max_allowed_table_size(size as usize);
    }
}

/// Map a `fluke-hpack` error onto the harness error names.
pub fn classify(err: &DecoderError) -> ErrorKind {
    match err {
        DecoderError::HeaderIndexOutOfBounds => ErrorKind::Idx,
        DecoderError::IntegerDecodingError(e) => match e {
            IntegerDecodingError::NotEnoughOctets => ErrorKind::Buf,
            IntegerDecodingError::InvalidPrefix => ErrorKind::Arg,
            _ => ErrorKind::Int,
        },
        DecoderError::StringDecodingError(e) => match e {
            StringDecodingError::NotEnoughOctets => ErrorKind::Buf,
            _ => ErrorKind::Huf,
        },
        DecoderError::InvalidMaxDynamicSize => ErrorKind::Len,
        DecoderError::SizeUpdateAtEnd => ErrorKind::Upd,
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(s) = payload.downcast_ref::<&'static str>() {
        s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s
    } else {
        "unknown panic"
    }
}

// ============================================================================
// Tests
// ============================================================================
