//! The callback contract a [`crate::session::Session`] drives as it parses.

use syslog_proto::MessageHead;

/// Receives parsing events for one byte stream of syslog messages.
///
/// All methods default to a no-op, so an implementation only needs to
/// override the callbacks it cares about. Every method can fail; a
/// handler's error aborts the current `read()` call and latches the session
/// into [`crate::error::ErrorKind::HandlerFailed`].
pub trait Handler {
    /// The error type a callback may return.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Called once the first byte of a new message has been consumed.
    fn on_msg_begin(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }

    /// Called once, after structured data has been fully parsed (or found
    /// absent), with the complete header and structured-data map.
    fn on_msg_head(&mut self, head: &MessageHead) -> Result<(), Self::Error> {
        let _ = head;
        Ok(())
    }

    /// Called zero or more times with a contiguous run of message-body
    /// bytes. Never called with an empty slice.
    fn on_msg_part(&mut self, bytes: &[u8]) -> Result<(), Self::Error> {
        let _ = bytes;
        Ok(())
    }

    /// Called once a message is fully parsed. `message_length` is the total
    /// number of bytes consumed for this message, including any
    /// octet-count prefix and its separating space.
    fn on_msg_complete(&mut self, message_length: u64) -> Result<(), Self::Error> {
        let _ = message_length;
        Ok(())
    }
}
