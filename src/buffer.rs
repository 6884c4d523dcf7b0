//! Front-consuming view over the dump.

use crate::error::HarnessError;

/// A cursor over the dump bytes. Every slice handed out is a prefix of what
/// is left, so no byte is ever fed twice.
#[derive(Debug, Clone)]
pub struct InputBuffer<'a> {
    data: &'a [u8],
    offset: usize,
}

impl<'a> InputBuffer<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, offset: 0 }
    }

    /// Take the next `len` bytes.
    pub fn take(&mut self, len: usize) -> Result<&'a [u8], HarnessError> {
        let remaining = self.remaining();
        if len > remaining {
            return Err(HarnessError::BufferOverrun {
                requested: len,
                remaining,
            });
        }
        let slice = &self.data[self.offset..self.offset + len];
        self.offset += len;
        Ok(slice)
    }

    /// Take everything that is left. May be empty.
    pub fn take_rest(&mut self) -> &'a [u8] {
        let slice = &self.data[self.offset..];
        self.offset = self.data.len();
        slice
    }

    pub fn remaining(&self) -> usize {
        self.data.len() - self.offset
    }

    pub fn consumed(&self) -> usize {
        self.offset
    }

    pub fn is_exhausted(&self) -> bool {
        self.offset == self.data.len()
    }
}

// ============================================================================
// Tests
// ============================================================================
