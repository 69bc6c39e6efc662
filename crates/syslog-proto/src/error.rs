//! Error types for `syslog-proto`'s data structures.
//!
//! These are contract violations on the token buffer and message head, not
//! framing/grammar errors: those live in `syslog-core`, which wraps them
//! into its own `ErrorKind` table.

use thiserror::Error;

/// Errors raised by the token buffer and message head contracts.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProtoError {
    /// Token buffer would exceed its capacity cap.
    #[error("token exceeds buffer cap of {cap} bytes")]
    TokenTooLong {
        /// The configured cap that was hit.
        cap: usize,
    },

    /// An SD-ID was already used earlier in the same message.
    #[error("duplicate structured-data id: {}", String::from_utf8_lossy(id))]
    DuplicateSdId {
        /// The repeated SD-ID.
        id: Vec<u8>,
    },

    /// A structured-data value was set before a parameter name.
    #[error("structured-data value set without a preceding parameter name")]
    SdValueWithoutName,
}
