//! `MessageHead`: the parsed RFC 5424 header plus its structured-data map.

use indexmap::IndexMap;

use crate::error::ProtoError;

/// The single byte denoting an absent field.
pub const NILVALUE: &[u8] = b"-";

/// Parameters of one structured-data element, keyed by parameter name, in
/// the order they were first seen.
pub type SdParams = IndexMap<Vec<u8>, Vec<u8>>;

/// Parsed header fields and structured-data map for one syslog message.
///
/// `priority` and `version` are validated by the state machine (range and
/// supported-version checks produce `bad_priority`/`bad_version`); this type
/// only stores whatever it is told.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessageHead {
    /// `facility * 8 + severity`.
    pub priority: u16,
    /// Syslog protocol version; only `1` is currently supported.
    pub version: u16,
    /// NILVALUE (`-`) or a timestamp byte string.
    pub timestamp: Vec<u8>,
    /// NILVALUE or a hostname byte string.
    pub hostname: Vec<u8>,
    /// NILVALUE or an app-name byte string.
    pub appname: Vec<u8>,
    /// NILVALUE or a process-id byte string.
    pub processid: Vec<u8>,
    /// NILVALUE or a message-id byte string.
    pub messageid: Vec<u8>,
    /// Structured-data elements, keyed by SD-ID, in first-seen order.
    pub sd: IndexMap<Vec<u8>, SdParams>,

    current_sd_id: Option<Vec<u8>>,
    current_sd_param: Option<Vec<u8>>,
}

impl MessageHead {
    /// Clears all fields back to their empty/default state.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Inserts a new structured-data element, making it current.
    ///
    /// # Errors
    ///
    /// Returns [`ProtoError::DuplicateSdId`] if `id` was already used
    /// earlier in this message.
    pub fn begin_sd_element(&mut self, id: Vec<u8>) -> Result<(), ProtoError> {
        if self.sd.contains_key(&id) {
            return Err(ProtoError::DuplicateSdId { id });
        }
        self.sd.insert(id.clone(), IndexMap::new());
        self.current_sd_id = Some(id);
        self.current_sd_param = None;
        Ok(())
    }

    /// Marks `name` as the parameter awaiting a value. Must follow
    /// [`MessageHead::begin_sd_element`].
    pub fn set_sd_param(&mut self, name: Vec<u8>) {
        self.current_sd_param = Some(name);
    }

    /// Stores `value` under the current SD-ID and parameter name.
    ///
    /// A parameter name repeated within one element silently overwrites its
    /// earlier value at its original position, the same behavior as a plain
    /// map re-insert.
    ///
    /// # Errors
    ///
    /// Returns [`ProtoError::SdValueWithoutName`] if no parameter name is
    /// currently set (i.e. `set_sd_param` was not called since the last
    /// value, or no SD element is open).
    pub fn set_sd_value(&mut self, value: Vec<u8>) -> Result<(), ProtoError> {
        let sd_id = self.current_sd_id.as_ref().ok_or(ProtoError::SdValueWithoutName)?;
        let param = self.current_sd_param.take().ok_or(ProtoError::SdValueWithoutName)?;
        let params = self.sd.get_mut(sd_id).ok_or(ProtoError::SdValueWithoutName)?;
        params.insert(param, value);
        Ok(())
    }
}
