//! Wire-adjacent data types for RFC 5424 syslog messages.
//!
//! This crate holds small, total-contract data structures used by
//! `syslog-core`'s state machine: a cross-chunk token buffer and the
//! structured-data-bearing message head. It contains no parsing logic and
//! no framing knowledge, which lives in `syslog-core`.

pub mod error;
pub mod head;
pub mod token_buffer;

pub use error::ProtoError;
pub use head::{MessageHead, NILVALUE, SdParams};
pub use token_buffer::{DEFAULT_CAP, TokenBuffer};
