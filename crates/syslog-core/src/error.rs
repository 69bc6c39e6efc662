//! Error types surfaced by a parsing [`crate::session::Session`].
//!
//! One variant per named condition, a stable [`ErrorKind`] tag for callers
//! who want to `match` without depending on message text, and a `source()`
//! chain for the one variant that wraps a caller-supplied handler error.

use thiserror::Error;

use syslog_proto::ProtoError;

/// Errors a [`crate::session::Session`] can raise from `read()`.
#[derive(Error, Debug)]
pub enum ParsingError {
    /// More than 10 digits in an octet count, a non-digit in count position,
    /// or the value overflows a 32-bit length.
    #[error("octet count exceeds 10 digits or overflows a 32-bit length")]
    OctetCountTooLong,

    /// The octet-counted frame ran out before the body was reached.
    #[error("octet-counted frame ended before reaching the message body")]
    OctetCountTooShort,

    /// The declared octet count does not line up with the parsed message.
    #[error("declared octet count is inconsistent with the parsed message")]
    OctetCountMismatch,

    /// Non-digit inside `<…>`, an empty priority, or a value over 191.
    #[error("invalid priority value")]
    BadPriority,

    /// Non-digit version, an empty version, or an unsupported version.
    #[error("invalid or unsupported version")]
    BadVersion,

    /// Unexpected byte while parsing a header field.
    #[error("malformed header field")]
    MalformedHead,

    /// Unexpected byte in structured data, an empty name/id, or a duplicate
    /// SD-ID.
    #[error("malformed structured data")]
    MalformedSd,

    /// A token exceeded the buffer's capacity cap.
    #[error("token exceeds buffer capacity")]
    TokenTooLong,

    /// A handler callback returned an error.
    #[error("handler callback failed: {0}")]
    HandlerFailed(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// `read()` was called while the session is latched in an error state.
    #[error("read() called while the parser is latched in an error state")]
    ParserInError,
}

impl ParsingError {
    /// The stable, match-friendly tag for this error.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::OctetCountTooLong => ErrorKind::OctetCountTooLong,
            Self::OctetCountTooShort => ErrorKind::OctetCountTooShort,
            Self::OctetCountMismatch => ErrorKind::OctetCountMismatch,
            Self::BadPriority => ErrorKind::BadPriority,
            Self::BadVersion => ErrorKind::BadVersion,
            Self::MalformedHead => ErrorKind::MalformedHead,
            Self::MalformedSd => ErrorKind::MalformedSd,
            Self::TokenTooLong => ErrorKind::TokenTooLong,
            Self::HandlerFailed(_) => ErrorKind::HandlerFailed,
            Self::ParserInError => ErrorKind::ParserInError,
        }
    }
}

/// Stable identifier for an error kind, independent of the `Display` text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// See [`ParsingError::OctetCountTooLong`].
    OctetCountTooLong,
    /// See [`ParsingError::OctetCountTooShort`].
    OctetCountTooShort,
    /// See [`ParsingError::OctetCountMismatch`].
    OctetCountMismatch,
    /// See [`ParsingError::BadPriority`].
    BadPriority,
    /// See [`ParsingError::BadVersion`].
    BadVersion,
    /// See [`ParsingError::MalformedHead`].
    MalformedHead,
    /// See [`ParsingError::MalformedSd`].
    MalformedSd,
    /// See [`ParsingError::TokenTooLong`].
    TokenTooLong,
    /// See [`ParsingError::HandlerFailed`].
    HandlerFailed,
    /// See [`ParsingError::ParserInError`].
    ParserInError,
}

/// Converts a data-model contract violation into its parsing-error kind.
impl From<ProtoError> for ParsingError {
    fn from(err: ProtoError) -> Self {
        match err {
            ProtoError::TokenTooLong { .. } => Self::TokenTooLong,
            ProtoError::DuplicateSdId { .. } | ProtoError::SdValueWithoutName => Self::MalformedSd,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn proto_duplicate_sd_id_maps_to_malformed_sd() {
        let err: ParsingError = ProtoError::DuplicateSdId { id: b"origin".to_vec() }.into();
        assert_eq!(err.kind(), ErrorKind::MalformedSd);
    }

    #[test]
    fn proto_token_too_long_maps_to_token_too_long() {
        let err: ParsingError = ProtoError::TokenTooLong { cap: 64 }.into();
        assert_eq!(err.kind(), ErrorKind::TokenTooLong);
    }

    #[test]
    fn handler_failed_reports_source() {
        #[derive(Debug, Error)]
        #[error("boom")]
        struct Boom;

        let err = ParsingError::HandlerFailed(Box::new(Boom));
        assert_eq!(err.kind(), ErrorKind::HandlerFailed);
        assert!(std::error::Error::source(&err).is_some());
    }
}
