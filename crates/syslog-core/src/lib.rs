//! Incremental, chunk-boundary-independent parser for RFC 5424 syslog
//! messages.
//!
//! Feed bytes to a [`Session`] as they arrive, in whatever chunking the
//! transport happens to deliver them: one byte at a time or the whole
//! stream at once produce identical callback sequences. [`Handler`]
//! receives a callback per parsing milestone; [`ParsingError`] reports the
//! single failure mode, a grammar violation, with a stable [`ErrorKind`]
//! tag.

pub mod error;
pub mod handler;
mod session;
mod state;

pub use error::{ErrorKind, ParsingError};
pub use handler::Handler;
pub use session::Session;
pub use syslog_proto::{MessageHead, NILVALUE, SdParams};
