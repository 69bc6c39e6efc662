//! Binary-crate error type.

use thiserror::Error;

use syslog_core::ParsingError;

/// Errors the CLI driver can surface. Wraps the library's own error plus the
/// I/O failures that only come up once bytes have a file or stdin behind
/// them.
#[derive(Error, Debug)]
pub enum CliError {
    /// Reading the input file or stdin failed.
    #[error("failed to read input: {0}")]
    Io(#[source] std::io::Error),

    /// The parser itself rejected the input.
    #[error("parse failed: {0}")]
    Parse(#[source] ParsingError),
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<ParsingError> for CliError {
    fn from(err: ParsingError) -> Self {
        Self::Parse(err)
    }
}
