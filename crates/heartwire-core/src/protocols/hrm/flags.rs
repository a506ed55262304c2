use serde::{Deserialize, Serialize};

use super::layout::{self, IntWidth};

/// Width of the heart-rate value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ValueFormat {
    #[serde(rename = "uint8")]
    UInt8,
    #[serde(rename = "uint16")]
    UInt16,
}

impl ValueFormat {
    pub fn width(self) -> IntWidth {
        match self {
            ValueFormat::UInt8 => IntWidth::U8,
            ValueFormat::UInt16 => IntWidth::U16,
        }
    }
}

/// Sensor contact status carried in bits 1-2.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SensorContact {
    Unsupported,
    NotDetected,
    Detected,
}

/// Decoded status byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Flags {
    pub raw: u8,
    pub value_format: ValueFormat,
    pub sensor_contact: SensorContact,
    pub energy_expended_present: bool,
    pub rr_interval_present: bool,
}

/// Interpret the leading status byte. Total: reserved bits are ignored.
///
/// # Examples
/// ```
/// use heartwire_core::{ValueFormat, parse_flags};
///
/// let flags = parse_flags(0x11);
/// assert_eq!(flags.value_format, ValueFormat::UInt16);
/// assert!(flags.rr_interval_present);
/// assert!(!flags.energy_expended_present);
/// ```
pub fn parse_flags(raw: u8) -> Flags {
    let value_format = if raw & layout::FLAG_VALUE_FORMAT_UINT16 != 0 {
        ValueFormat::UInt16
    } else {
        ValueFormat::UInt8
    };
    let sensor_contact = if raw & layout::FLAG_SENSOR_CONTACT_SUPPORTED == 0 {
        SensorContact::Unsupported
    } else if raw & layout::FLAG_SENSOR_CONTACT_DETECTED != 0 {
        SensorContact::Detected
    } else {
        SensorContact::NotDetected
    };

    Flags {
        raw,
        value_format,
        sensor_contact,
        energy_expended_present: raw & layout::FLAG_ENERGY_EXPENDED_PRESENT != 0,
        rr_interval_present: raw & layout::FLAG_RR_INTERVAL_PRESENT != 0,
    }
}
