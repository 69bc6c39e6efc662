//! Test support for exercising `syslog-core` under arbitrary chunk splits.
//!
//! Not `#[cfg(test)]`-gated: both `syslog-core`'s own test suite and
//! downstream crates depend on this as an ordinary dev-dependency, the same
//! shape as the donor workspace's simulation harness being depended on by
//! the crate it exercises.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

use syslog_core::{Handler, MessageHead, Session};

/// Every callback a [`RecordingHandler`] observed, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// `on_msg_begin` fired.
    Begin,
    /// `on_msg_head` fired, with the parsed header.
    Head(MessageHead),
    /// `on_msg_part` fired, with the bytes it was given.
    Part(Vec<u8>),
    /// `on_msg_complete` fired, with the reported message length.
    Complete(u64),
}

/// A [`Handler`] that records every callback instead of acting on it.
///
/// Used by both property tests (comparing recordings across different
/// chunk splits of the same bytes) and example-based tests (asserting on
/// the recorded header/body/length of one message).
#[derive(Debug, Clone, Default)]
pub struct RecordingHandler {
    events: Vec<Event>,
}

impl RecordingHandler {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// All recorded events, in order.
    #[must_use]
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// The body of each completed message, in order, as the concatenation
    /// of that message's `Part` payloads.
    #[must_use]
    pub fn bodies(&self) -> Vec<Vec<u8>> {
        let mut bodies = Vec::new();
        let mut current = Vec::new();
        for event in &self.events {
            match event {
                Event::Part(bytes) => current.extend_from_slice(bytes),
                Event::Complete(_) => {
                    bodies.push(std::mem::take(&mut current));
                },
                Event::Begin | Event::Head(_) => {},
            }
        }
        bodies
    }

    /// How many times `on_msg_complete` fired.
    #[must_use]
    pub fn completed_count(&self) -> usize {
        self.events.iter().filter(|e| matches!(e, Event::Complete(_))).count()
    }
}

impl Handler for RecordingHandler {
    type Error = std::convert::Infallible;

    fn on_msg_begin(&mut self) -> Result<(), Self::Error> {
        self.events.push(Event::Begin);
        Ok(())
    }

    fn on_msg_head(&mut self, head: &MessageHead) -> Result<(), Self::Error> {
        self.events.push(Event::Head(head.clone()));
        Ok(())
    }

    fn on_msg_part(&mut self, bytes: &[u8]) -> Result<(), Self::Error> {
        self.events.push(Event::Part(bytes.to_vec()));
        Ok(())
    }

    fn on_msg_complete(&mut self, message_length: u64) -> Result<(), Self::Error> {
        self.events.push(Event::Complete(message_length));
        Ok(())
    }
}

/// Feeds `bytes` to `session` split at `offsets`, calling `read` once per
/// piece. `offsets` need not be sorted or bounded; it is clamped and
/// deduplicated into a valid partition of `bytes`.
pub fn feed_in_chunks<H: Handler>(
    session: &mut Session<H>,
    bytes: &[u8],
    offsets: &[usize],
) -> Result<(), syslog_core::ParsingError> {
    let mut cuts: Vec<usize> = offsets.iter().map(|&o| o.min(bytes.len())).collect();
    cuts.push(bytes.len());
    cuts.sort_unstable();
    cuts.dedup();

    let mut start = 0;
    for cut in cuts {
        if cut > start {
            session.read(&bytes[start..cut])?;
            start = cut;
        }
    }
    Ok(())
}

/// Feeds `bytes` to `session` exactly one byte per `read` call.
pub fn feed_one_byte_at_a_time<H: Handler>(
    session: &mut Session<H>,
    bytes: &[u8],
) -> Result<(), syslog_core::ParsingError> {
    for byte in bytes {
        session.read(std::slice::from_ref(byte))?;
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn feed_in_chunks_matches_single_read() {
        let bytes = b"<46>1 - - - - - - hello\n";

        let mut whole = Session::new(RecordingHandler::new());
        whole.read(bytes).unwrap();

        let mut chunked = Session::new(RecordingHandler::new());
        feed_in_chunks(&mut chunked, bytes, &[3, 10, 10, 100]).unwrap();

        assert_eq!(whole.into_handler().events(), chunked.into_handler().events());
    }

    #[test]
    fn feed_one_byte_at_a_time_matches_single_read() {
        let bytes = b"<46>1 - - - - - - hi\n";

        let mut whole = Session::new(RecordingHandler::new());
        whole.read(bytes).unwrap();

        let mut byte_wise = Session::new(RecordingHandler::new());
        feed_one_byte_at_a_time(&mut byte_wise, bytes).unwrap();

        assert_eq!(whole.into_handler().events(), byte_wise.into_handler().events());
    }

    proptest! {
        #[test]
        fn feed_in_chunks_is_equivalent_to_one_read_for_any_cut_points(cuts in prop::collection::vec(0usize..32, 0..8)) {
            let bytes = b"<46>1 - tohru - 6611 - [origin x=\"y\"] body here\n";

            let mut whole = Session::new(RecordingHandler::new());
            whole.read(bytes).unwrap();

            let mut chunked = Session::new(RecordingHandler::new());
            feed_in_chunks(&mut chunked, bytes, &cuts).unwrap();

            prop_assert_eq!(whole.into_handler().events(), chunked.into_handler().events());
        }
    }
}
