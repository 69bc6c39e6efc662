//! Cross-chunk accumulation of a single field's bytes.
//!
//! Header, structured-data, and body fields may arrive split across
//! multiple `read` calls. `TokenBuffer` flattens the pieces so the state
//! machine always hands the handler (or itself) one contiguous slice per
//! completed field.

use crate::error::ProtoError;

/// Default cap on bytes accumulated for a single not-yet-flushed token.
pub const DEFAULT_CAP: usize = 64 * 1024;

/// Growable byte buffer with a capacity cap.
#[derive(Debug, Clone)]
pub struct TokenBuffer {
    buf: Vec<u8>,
    cap: usize,
}

impl Default for TokenBuffer {
    fn default() -> Self {
        Self::new(DEFAULT_CAP)
    }
}

impl TokenBuffer {
    /// Creates an empty buffer that rejects growth past `cap` bytes.
    #[must_use]
    pub fn new(cap: usize) -> Self {
        Self { buf: Vec::new(), cap }
    }

    /// Appends bytes to the buffer.
    ///
    /// # Errors
    ///
    /// Returns [`ProtoError::TokenTooLong`] if the append would exceed the
    /// configured cap. The buffer is left unchanged on failure.
    pub fn append(&mut self, bytes: &[u8]) -> Result<(), ProtoError> {
        if self.buf.len().saturating_add(bytes.len()) > self.cap {
            return Err(ProtoError::TokenTooLong { cap: self.cap });
        }
        self.buf.extend_from_slice(bytes);
        Ok(())
    }

    /// Appends a single byte. See [`TokenBuffer::append`].
    pub fn push(&mut self, byte: u8) -> Result<(), ProtoError> {
        self.append(&[byte])
    }

    /// Returns the accumulated content and empties the buffer.
    ///
    /// Returns an empty vector (not an error) if nothing was accumulated.
    pub fn take(&mut self) -> Vec<u8> {
        std::mem::take(&mut self.buf)
    }

    /// Discards accumulated content without returning it.
    pub fn clear(&mut self) {
        self.buf.clear();
    }

    /// True if no bytes are currently accumulated.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Number of bytes currently accumulated.
    #[must_use]
    pub fn len(&self) -> usize {
        self.buf.len()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn take_empties_and_returns_content() {
        let mut buf = TokenBuffer::default();
        buf.append(b"hello").unwrap();
        assert_eq!(buf.take(), b"hello".to_vec());
        assert!(buf.is_empty());
    }

    #[test]
    fn take_on_empty_buffer_returns_empty_slice() {
        let mut buf = TokenBuffer::default();
        assert_eq!(buf.take(), Vec::<u8>::new());
    }

    #[test]
    fn clear_discards_without_returning() {
        let mut buf = TokenBuffer::default();
        buf.append(b"abc").unwrap();
        buf.clear();
        assert!(buf.is_empty());
    }

    #[test]
    fn append_past_cap_fails_and_leaves_buffer_unchanged() {
        let mut buf = TokenBuffer::new(4);
        buf.append(b"ab").unwrap();
        let err = buf.append(b"abc").unwrap_err();
        assert_eq!(err, ProtoError::TokenTooLong { cap: 4 });
        assert_eq!(buf.len(), 2);
    }

    #[test]
    fn append_exactly_at_cap_succeeds() {
        let mut buf = TokenBuffer::new(4);
        buf.append(b"abcd").unwrap();
        assert_eq!(buf.len(), 4);
    }

    proptest! {
        #[test]
        fn sequential_appends_equal_one_shot_append(pieces in prop::collection::vec(prop::collection::vec(any::<u8>(), 0..16), 0..16)) {
            let mut piecewise = TokenBuffer::new(usize::MAX);
            for piece in &pieces {
                piecewise.append(piece).unwrap();
            }
            let flat: Vec<u8> = pieces.into_iter().flatten().collect();
            prop_assert_eq!(piecewise.take(), flat);
        }
    }
}
