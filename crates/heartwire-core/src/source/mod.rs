//! Boundary between platform characteristic objects and the decoder.
//!
//! The decoder only needs the current value of a characteristic as bytes.
//! `CharacteristicSource` is that single capability; each platform object
//! implements it once. `NotificationSource` is a stream of such values, fed
//! by a log file or an in-memory queue.

mod hexlog;
mod memory;

pub use hexlog::HexLogSource;
pub use memory::MemorySource;

use thiserror::Error;

/// Anything that can hand out the raw value of a characteristic.
pub trait CharacteristicSource {
    /// Current value, or `None` when the platform object holds no value.
    fn get_value(&self) -> Option<&[u8]>;
}

impl CharacteristicSource for [u8] {
    fn get_value(&self) -> Option<&[u8]> {
        Some(self)
    }
}

impl CharacteristicSource for Vec<u8> {
    fn get_value(&self) -> Option<&[u8]> {
        Some(self.as_slice())
    }
}

impl CharacteristicSource for Option<Vec<u8>> {
    fn get_value(&self) -> Option<&[u8]> {
        self.as_deref()
    }
}

/// One characteristic notification with its arrival time in seconds.
#[derive(Debug, Clone, PartialEq)]
pub struct NotificationEvent {
    pub ts: Option<f64>,
    pub value: Option<Vec<u8>>,
}

impl CharacteristicSource for NotificationEvent {
    fn get_value(&self) -> Option<&[u8]> {
        self.value.as_deref()
    }
}

pub trait NotificationSource {
    fn next_notification(&mut self) -> Result<Option<NotificationEvent>, SourceError>;
}

/// Parse a single hex payload as written in a notification log.
///
/// # Examples
/// ```
/// use heartwire_core::parse_hex_payload;
///
/// assert_eq!(parse_hex_payload("0x00:4b").unwrap(), Some(vec![0x00, 0x4b]));
/// assert_eq!(parse_hex_payload("-").unwrap(), None);
/// assert!(parse_hex_payload("4").is_err());
/// ```
pub fn parse_hex_payload(token: &str) -> Result<Option<Vec<u8>>, SourceError> {
    hexlog::reader::decode_hex(token)
        .map_err(|err| SourceError::HexLog(format!("invalid hex payload '{token}': {err}")))
}

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("hex log parse error: {0}")]
    HexLog(String),
}

impl From<hexlog::error::HexLogError> for SourceError {
    fn from(value: hexlog::error::HexLogError) -> Self {
        match value {
            hexlog::error::HexLogError::Io(err) => SourceError::Io(err),
            other => SourceError::HexLog(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{CharacteristicSource, NotificationEvent};

    #[test]
    fn notification_exposes_value() {
        let event = NotificationEvent {
            ts: Some(1.0),
            value: Some(vec![0x00, 0x4b]),
        };
        assert_eq!(event.get_value(), Some(&[0x00, 0x4b][..]));

        let empty = NotificationEvent {
            ts: None,
            value: None,
        };
        assert_eq!(empty.get_value(), None);
    }
}
