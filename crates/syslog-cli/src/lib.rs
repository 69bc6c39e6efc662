//! Driver logic for the `syslog-cli` binary.
//!
//! Feeds a byte source through a [`Session`] in fixed-size chunks and prints
//! each completed message to standard output. Kept separate from `main.rs` so
//! the driving logic is testable without going through argument parsing.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;

use std::io::Read;

pub use error::CliError;
use syslog_core::{Handler, MessageHead, Session};

/// Renders each completed message to standard output as it arrives.
///
/// Not meant for programmatic consumption; see `syslog-harness`'s
/// `RecordingHandler` for that.
#[derive(Debug, Default)]
struct PrintingHandler {
    body: Vec<u8>,
}

impl Handler for PrintingHandler {
    type Error = std::convert::Infallible;

    fn on_msg_part(&mut self, bytes: &[u8]) -> Result<(), Self::Error> {
        self.body.extend_from_slice(bytes);
        Ok(())
    }

    fn on_msg_head(&mut self, head: &MessageHead) -> Result<(), Self::Error> {
        self.body.clear();
        print_head(head);
        Ok(())
    }

    fn on_msg_complete(&mut self, message_length: u64) -> Result<(), Self::Error> {
        #[allow(clippy::print_stdout)]
        {
            println!("  body={:?} message_length={message_length}", String::from_utf8_lossy(&self.body));
        }
        Ok(())
    }
}

#[allow(clippy::print_stdout)]
fn print_head(head: &MessageHead) {
    print!(
        "pri={} ver={} ts={} host={} app={} proc={} msgid={}",
        head.priority,
        head.version,
        String::from_utf8_lossy(&head.timestamp),
        String::from_utf8_lossy(&head.hostname),
        String::from_utf8_lossy(&head.appname),
        String::from_utf8_lossy(&head.processid),
        String::from_utf8_lossy(&head.messageid),
    );
    for (id, params) in &head.sd {
        print!(" [{}", String::from_utf8_lossy(id));
        for (name, value) in params {
            print!(" {}={:?}", String::from_utf8_lossy(name), String::from_utf8_lossy(value));
        }
        print!("]");
    }
    println!();
}

/// Reads all of `source` in `chunk_size`-byte pieces, feeding each to a
/// fresh [`Session`] wrapping a [`PrintingHandler`].
///
/// Chunking the reads (rather than slurping the whole input up front) is
/// deliberate: it exercises the parser the same way a real streaming
/// transport would, rather than handing it one enormous buffer.
pub fn run(mut source: impl Read, chunk_size: usize) -> Result<(), CliError> {
    let mut session = Session::new(PrintingHandler::default());
    let mut buf = vec![0u8; chunk_size.max(1)];

    loop {
        let n = source.read(&mut buf)?;
        if n == 0 {
            break;
        }
        session.read(&buf[..n])?;
    }
    session.finish()?;

    Ok(())
}
