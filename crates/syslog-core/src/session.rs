//! Drives the per-byte state machine across arbitrarily chunked `read()`
//! calls and reports parsed messages to a [`Handler`].

use syslog_proto::{MessageHead, TokenBuffer};

use crate::error::ParsingError;
use crate::handler::Handler;
use crate::state::{HeadField, ParserState, State, is_field_byte, is_sd_name_byte};

/// An incremental parser for a stream of RFC 5424 syslog messages.
///
/// Feed it bytes with [`Session::read`] as they arrive, in any chunking.
/// Chunk boundaries never change the sequence of callbacks a [`Handler`]
/// observes: splitting the same bytes differently only changes how many
/// times `read()` is called, not what it reports.
pub struct Session<H: Handler> {
    parser: ParserState,
    head: MessageHead,
    token: TokenBuffer,
    handler: H,
    errored: bool,
}

impl<H: Handler> Session<H> {
    /// Creates a new session feeding parsed messages to `handler`.
    pub fn new(handler: H) -> Self {
        Self {
            parser: ParserState::new(),
            head: MessageHead::default(),
            token: TokenBuffer::default(),
            handler,
            errored: false,
        }
    }

    /// Returns the handler, consuming the session.
    pub fn into_handler(self) -> H {
        self.handler
    }

    /// Discards all in-progress parsing state and clears a latched error.
    ///
    /// Does not otherwise touch the handler; any messages it already
    /// observed remain observed.
    pub fn reset(&mut self) {
        self.parser.reset_for_new_message();
        self.head.reset();
        self.token.clear();
        self.errored = false;
    }

    /// Feeds `bytes` to the parser.
    ///
    /// # Errors
    ///
    /// Returns a [`ParsingError`] the moment the input is found to violate
    /// the grammar, or if the session was already latched in an error
    /// state from a previous call. Bytes before the failing byte have
    /// already produced their callbacks; the session must be [`reset`]
    /// before further calls to `read` will be accepted.
    ///
    /// [`reset`]: Session::reset
    pub fn read(&mut self, bytes: &[u8]) -> Result<(), ParsingError> {
        if self.errored {
            return Err(ParsingError::ParserInError);
        }
        for &byte in bytes {
            if let Err(err) = self.step(byte) {
                self.errored = true;
                tracing::warn!(kind = ?err.kind(), "syslog session latched into error state");
                return Err(err);
            }
        }
        Ok(())
    }

    /// Signals that no more bytes are coming.
    ///
    /// The only thing this can affect is a message whose declared octet
    /// count was exhausted by the very last byte handed to `read`: with
    /// nothing left to disambiguate a real frame boundary from a short
    /// count, that boundary is taken as legitimate and the message
    /// completes. Has no effect otherwise, including on a non-octet-counted
    /// message sitting in `MsgBody` with no trailing newline yet; see the
    /// scope decision on that case in DESIGN.md.
    ///
    /// # Errors
    ///
    /// Returns a [`ParsingError`] if the session was already latched in an
    /// error state, or if the handler itself fails while the deferred
    /// message is flushed.
    pub fn finish(&mut self) -> Result<(), ParsingError> {
        if self.errored {
            return Err(ParsingError::ParserInError);
        }
        if self.parser.state == State::AwaitFrameBoundary {
            if let Err(err) = self.complete_message() {
                self.errored = true;
                tracing::warn!(kind = ?err.kind(), "syslog session latched into error state");
                return Err(err);
            }
            self.parser.state = State::FrameStart;
        }
        Ok(())
    }

    fn step(&mut self, byte: u8) -> Result<(), ParsingError> {
        if self.parser.state == State::AwaitFrameBoundary {
            return self.resolve_frame_boundary(byte);
        }

        self.parser.total_consumed += 1;
        let remaining_before = self.parser.octets_remaining;

        self.dispatch(byte)?;

        if let Some(remaining) = remaining_before {
            let remaining = remaining.saturating_sub(1);
            self.parser.octets_remaining = Some(remaining);
            if remaining == 0 {
                self.enter_frame_boundary()?;
            }
        }
        Ok(())
    }

    fn dispatch(&mut self, byte: u8) -> Result<(), ParsingError> {
        let state = std::mem::replace(&mut self.parser.state, State::Error);
        let next_state = match state {
            State::FrameStart => self.on_frame_start(byte)?,
            State::OctetCount => self.on_octet_count(byte)?,
            State::HeadPriorityOpen => self.on_head_priority_open(byte)?,
            State::HeadPriority => self.on_head_priority(byte)?,
            State::HeadVersion => self.on_head_version(byte)?,
            State::AwaitField(field) => self.on_await_field(field, byte)?,
            State::InField(field) => self.on_in_field(field, byte)?,
            State::SdOrMsgAwait => self.on_sd_or_msg_await(byte)?,
            State::SdId => self.on_sd_id(byte)?,
            State::SdBeforeParam => self.on_sd_before_param(byte)?,
            State::SdParamName => self.on_sd_param_name(byte)?,
            State::SdValueOpen => self.on_sd_value_open(byte)?,
            State::SdValue { escape } => self.on_sd_value(byte, escape)?,
            State::SdAfterElement => self.on_sd_after_element(byte)?,
            State::BeforeBody => self.on_before_body(byte)?,
            State::MsgBody => self.on_msg_body(byte)?,
            State::AwaitFrameBoundary => return Err(ParsingError::ParserInError),
            State::Error => return Err(ParsingError::ParserInError),
        };
        self.parser.state = next_state;
        Ok(())
    }

    /// Called once `octets_remaining` reaches zero for an octet-counted
    /// message. Whether this is a real frame boundary is undecided until a
    /// byte beyond it is seen (`resolve_frame_boundary`) or the stream ends
    /// with nothing more to see (`finish`).
    fn enter_frame_boundary(&mut self) -> Result<(), ParsingError> {
        if !matches!(self.parser.state, State::MsgBody) {
            return Err(ParsingError::OctetCountTooShort);
        }
        self.parser.state = State::AwaitFrameBoundary;
        Ok(())
    }

    /// `byte` is the first byte seen after a pending frame boundary, from
    /// this `read` call or a later one. A real boundary is always followed
    /// by something that could start a new frame: a digit, `<`, or a
    /// tolerated leading space. Anything else means the declared count
    /// under-ran the real frame.
    fn resolve_frame_boundary(&mut self, byte: u8) -> Result<(), ParsingError> {
        let looks_like_new_frame = byte.is_ascii_digit() || byte == b'<' || byte == b' ';
        if !looks_like_new_frame {
            return Err(ParsingError::OctetCountMismatch);
        }
        self.complete_message()?;
        self.parser.state = State::FrameStart;
        self.step(byte)
    }

    fn complete_message(&mut self) -> Result<(), ParsingError> {
        let body = self.token.take();
        if !body.is_empty() {
            self.handler
                .on_msg_part(&body)
                .map_err(|e| ParsingError::HandlerFailed(Box::new(e)))?;
        }
        let message_length = self.parser.total_consumed;
        self.handler
            .on_msg_complete(message_length)
            .map_err(|e| ParsingError::HandlerFailed(Box::new(e)))?;
        tracing::debug!(message_length, "syslog message complete");
        self.head.reset();
        self.parser.reset_for_new_message();
        Ok(())
    }

    fn finish_head(&mut self) -> Result<(), ParsingError> {
        self.handler
            .on_msg_head(&self.head)
            .map_err(|e| ParsingError::HandlerFailed(Box::new(e)))
    }

    fn store_field(&mut self, field: HeadField, value: Vec<u8>) {
        match field {
            HeadField::Timestamp => self.head.timestamp = value,
            HeadField::Hostname => self.head.hostname = value,
            HeadField::Appname => self.head.appname = value,
            HeadField::Processid => self.head.processid = value,
            HeadField::Messageid => self.head.messageid = value,
        }
    }

    fn on_frame_start(&mut self, byte: u8) -> Result<State, ParsingError> {
        if byte == b' ' {
            return Ok(State::FrameStart);
        }
        self.handler
            .on_msg_begin()
            .map_err(|e| ParsingError::HandlerFailed(Box::new(e)))?;
        if byte.is_ascii_digit() {
            self.parser.is_octet_counted = true;
            self.parser.numeric_digits = 1;
            self.parser.numeric_accum = u64::from(byte - b'0');
            return Ok(State::OctetCount);
        }
        if byte == b'<' {
            return Ok(State::HeadPriority);
        }
        Err(ParsingError::MalformedHead)
    }

    fn on_octet_count(&mut self, byte: u8) -> Result<State, ParsingError> {
        if byte == b' ' {
            if self.parser.numeric_accum > u64::from(u32::MAX) {
                return Err(ParsingError::OctetCountTooLong);
            }
            self.parser.octets_remaining = Some(self.parser.numeric_accum as u32);
            self.parser.numeric_accum = 0;
            self.parser.numeric_digits = 0;
            return Ok(State::HeadPriorityOpen);
        }
        if !byte.is_ascii_digit() {
            return Err(ParsingError::OctetCountTooLong);
        }
        self.parser.numeric_digits += 1;
        if self.parser.numeric_digits > 10 {
            return Err(ParsingError::OctetCountTooLong);
        }
        self.parser.numeric_accum = self.parser.numeric_accum * 10 + u64::from(byte - b'0');
        Ok(State::OctetCount)
    }

    fn on_head_priority_open(&mut self, byte: u8) -> Result<State, ParsingError> {
        if byte == b' ' {
            return Ok(State::HeadPriorityOpen);
        }
        if byte == b'<' {
            return Ok(State::HeadPriority);
        }
        Err(ParsingError::MalformedHead)
    }

    fn on_head_priority(&mut self, byte: u8) -> Result<State, ParsingError> {
        if byte == b'>' {
            if self.parser.numeric_digits == 0 {
                return Err(ParsingError::BadPriority);
            }
            self.head.priority = self.parser.numeric_accum as u16;
            self.parser.numeric_accum = 0;
            self.parser.numeric_digits = 0;
            return Ok(State::HeadVersion);
        }
        if !byte.is_ascii_digit() {
            return Err(ParsingError::BadPriority);
        }
        self.parser.numeric_digits += 1;
        self.parser.numeric_accum = self.parser.numeric_accum * 10 + u64::from(byte - b'0');
        if self.parser.numeric_accum > 191 {
            return Err(ParsingError::BadPriority);
        }
        Ok(State::HeadPriority)
    }

    fn on_head_version(&mut self, byte: u8) -> Result<State, ParsingError> {
        if byte == b' ' {
            if self.parser.numeric_digits == 0 || self.parser.numeric_accum != 1 {
                return Err(ParsingError::BadVersion);
            }
            self.head.version = 1;
            self.parser.numeric_accum = 0;
            self.parser.numeric_digits = 0;
            return Ok(State::AwaitField(HeadField::Timestamp));
        }
        if !byte.is_ascii_digit() {
            return Err(ParsingError::BadVersion);
        }
        self.parser.numeric_digits += 1;
        self.parser.numeric_accum = self.parser.numeric_accum * 10 + u64::from(byte - b'0');
        if self.parser.numeric_accum > 1 {
            return Err(ParsingError::BadVersion);
        }
        Ok(State::HeadVersion)
    }

    fn on_await_field(&mut self, field: HeadField, byte: u8) -> Result<State, ParsingError> {
        if byte == b' ' {
            return Ok(State::AwaitField(field));
        }
        if !is_field_byte(byte) {
            return Err(ParsingError::MalformedHead);
        }
        self.token.push(byte).map_err(ParsingError::from)?;
        Ok(State::InField(field))
    }

    fn on_in_field(&mut self, field: HeadField, byte: u8) -> Result<State, ParsingError> {
        if byte == b' ' {
            let value = self.token.take();
            self.store_field(field, value);
            return Ok(match field.next() {
                Some(next_field) => State::AwaitField(next_field),
                None => State::SdOrMsgAwait,
            });
        }
        if !is_field_byte(byte) {
            return Err(ParsingError::MalformedHead);
        }
        self.token.push(byte).map_err(ParsingError::from)?;
        Ok(State::InField(field))
    }

    fn on_sd_or_msg_await(&mut self, byte: u8) -> Result<State, ParsingError> {
        if byte == b' ' {
            return Ok(State::SdOrMsgAwait);
        }
        if byte == b'-' {
            self.finish_head()?;
            return Ok(State::BeforeBody);
        }
        if byte == b'[' {
            return Ok(State::SdId);
        }
        self.finish_head()?;
        self.on_msg_body(byte)
    }

    fn on_sd_id(&mut self, byte: u8) -> Result<State, ParsingError> {
        if byte == b' ' || byte == b']' {
            if self.token.is_empty() {
                return Err(ParsingError::MalformedSd);
            }
            let id = self.token.take();
            self.head.begin_sd_element(id).map_err(ParsingError::from)?;
            return Ok(if byte == b']' { State::SdAfterElement } else { State::SdBeforeParam });
        }
        if !is_sd_name_byte(byte) {
            return Err(ParsingError::MalformedSd);
        }
        self.token.push(byte).map_err(ParsingError::from)?;
        Ok(State::SdId)
    }

    fn on_sd_before_param(&mut self, byte: u8) -> Result<State, ParsingError> {
        if byte == b' ' {
            return Ok(State::SdBeforeParam);
        }
        if byte == b']' {
            return Ok(State::SdAfterElement);
        }
        if !is_sd_name_byte(byte) {
            return Err(ParsingError::MalformedSd);
        }
        self.token.push(byte).map_err(ParsingError::from)?;
        Ok(State::SdParamName)
    }

    fn on_sd_param_name(&mut self, byte: u8) -> Result<State, ParsingError> {
        if byte == b'=' {
            if self.token.is_empty() {
                return Err(ParsingError::MalformedSd);
            }
            let name = self.token.take();
            self.head.set_sd_param(name);
            return Ok(State::SdValueOpen);
        }
        if !is_sd_name_byte(byte) {
            return Err(ParsingError::MalformedSd);
        }
        self.token.push(byte).map_err(ParsingError::from)?;
        Ok(State::SdParamName)
    }

    fn on_sd_value_open(&mut self, byte: u8) -> Result<State, ParsingError> {
        if byte == b'"' {
            return Ok(State::SdValue { escape: false });
        }
        Err(ParsingError::MalformedSd)
    }

    fn on_sd_value(&mut self, byte: u8, escape: bool) -> Result<State, ParsingError> {
        if escape {
            self.token.push(byte).map_err(ParsingError::from)?;
            return Ok(State::SdValue { escape: false });
        }
        if byte == b'\\' {
            return Ok(State::SdValue { escape: true });
        }
        if byte == b'"' {
            let value = self.token.take();
            self.head.set_sd_value(value).map_err(ParsingError::from)?;
            return Ok(State::SdBeforeParam);
        }
        self.token.push(byte).map_err(ParsingError::from)?;
        Ok(State::SdValue { escape: false })
    }

    fn on_sd_after_element(&mut self, byte: u8) -> Result<State, ParsingError> {
        if byte == b' ' {
            return Ok(State::SdAfterElement);
        }
        if byte == b'[' {
            return Ok(State::SdId);
        }
        self.finish_head()?;
        self.on_msg_body(byte)
    }

    fn on_before_body(&mut self, byte: u8) -> Result<State, ParsingError> {
        if byte == b' ' {
            return Ok(State::BeforeBody);
        }
        self.on_msg_body(byte)
    }

    fn on_msg_body(&mut self, byte: u8) -> Result<State, ParsingError> {
        self.token.push(byte).map_err(ParsingError::from)?;
        if !self.parser.is_octet_counted && byte == b'\n' {
            self.complete_message()?;
            return Ok(State::FrameStart);
        }
        Ok(State::MsgBody)
    }
}
