use serde::{Deserialize, Serialize};

use super::error::HrmError;
use super::flags::{Flags, parse_flags};
use super::layout::{HrmField, compute_layout};
use super::reader::HrmReader;
use crate::source::CharacteristicSource;

/// One decoded Heart Rate Measurement notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedMeasurement {
    pub flags: Flags,
    pub heart_rate: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub energy_expended: Option<u16>,
    /// R-R intervals in buffer order, 1/1024 s units.
    #[serde(default)]
    pub rr_intervals: Vec<u16>,
}

/// Decode a Heart Rate Measurement value.
///
/// Returns `Ok(None)` for an empty payload. Fields are read at the offsets
/// produced by the layout; any field running past the end of the payload
/// fails the whole decode.
///
/// # Examples
/// ```
/// use heartwire_core::decode;
///
/// let measurement = decode(&[0x10, 0x4b, 0x00, 0x01, 0x00, 0x02])?.unwrap();
/// assert_eq!(measurement.heart_rate, 75);
/// assert_eq!(measurement.rr_intervals, vec![256, 512]);
/// # Ok::<(), heartwire_core::HrmError>(())
/// ```
pub fn decode(payload: &[u8]) -> Result<Option<ParsedMeasurement>, HrmError> {
    let reader = HrmReader::new(payload);
    let Some(raw_flags) = reader.first() else {
        return Ok(None);
    };

    let flags = parse_flags(raw_flags);
    let layout = compute_layout(&flags);

    let heart_rate = reader.read_uint(HrmField::HeartRate, layout.heart_rate)?;
    let energy_expended = layout
        .energy_expended
        .map(|span| reader.read_uint(HrmField::EnergyExpended, span))
        .transpose()?;
    let rr_intervals = match layout.rr_intervals {
        Some(span) => reader.read_u16_run(HrmField::RrIntervals, span)?,
        None => Vec::new(),
    };

    Ok(Some(ParsedMeasurement {
        flags,
        heart_rate,
        energy_expended,
        rr_intervals,
    }))
}

/// Decode whatever value the characteristic currently holds.
pub fn decode_source<S>(source: &S) -> Result<Option<ParsedMeasurement>, HrmError>
where
    S: CharacteristicSource + ?Sized,
{
    match source.get_value() {
        Some(value) => decode(value),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::{decode, decode_source};
    use crate::protocols::hrm::error::HrmError;
    use crate::protocols::hrm::flags::{SensorContact, ValueFormat};
    use crate::protocols::hrm::layout::HrmField;

    #[test]
    fn decode_uint8_heart_rate() {
        let parsed = decode(&[0x00, 0x4b]).unwrap().unwrap();
        assert_eq!(parsed.flags.value_format, ValueFormat::UInt8);
        assert_eq!(parsed.heart_rate, 75);
        assert_eq!(parsed.energy_expended, None);
        assert!(parsed.rr_intervals.is_empty());
    }

    #[test]
    fn decode_uint16_heart_rate() {
        let parsed = decode(&[0x01, 0x4b, 0x00]).unwrap().unwrap();
        assert_eq!(parsed.flags.value_format, ValueFormat::UInt16);
        assert_eq!(parsed.heart_rate, 75);
    }

    #[test]
    fn decode_uint16_uses_high_byte() {
        let parsed = decode(&[0x01, 0x2c, 0x01]).unwrap().unwrap();
        assert_eq!(parsed.heart_rate, 300);
    }

    #[test]
    fn energy_expended_shifts_rr_start() {
        let parsed = decode(&[0x08, 0x46, 0x10, 0x00]).unwrap().unwrap();
        assert_eq!(parsed.flags.value_format, ValueFormat::UInt8);
        assert_eq!(parsed.heart_rate, 70);
        assert_eq!(parsed.energy_expended, Some(16));
        assert!(parsed.rr_intervals.is_empty());

        let parsed = decode(&[0x18, 0x46, 0x10, 0x00, 0x00, 0x04]).unwrap().unwrap();
        assert_eq!(parsed.heart_rate, 70);
        assert_eq!(parsed.energy_expended, Some(16));
        assert_eq!(parsed.rr_intervals, vec![1024]);
    }

    #[test]
    fn energy_expended_with_uint16_heart_rate() {
        let parsed = decode(&[0x19, 0x46, 0x00, 0x10, 0x00, 0x00, 0x04]).unwrap().unwrap();
        assert_eq!(parsed.heart_rate, 70);
        assert_eq!(parsed.energy_expended, Some(16));
        assert_eq!(parsed.rr_intervals, vec![1024]);
    }

    #[test]
    fn bit0_selects_uint16_even_with_energy() {
        let err = decode(&[0x09, 0x46, 0x10, 0x00]).unwrap_err();
        assert_eq!(
            err,
            HrmError::MalformedPayload {
                field: HrmField::EnergyExpended,
                needed: 5,
                actual: 4,
            }
        );
    }

    #[test]
    fn decode_rr_intervals_in_order() {
        let parsed = decode(&[0x10, 0x4b, 0x00, 0x01, 0x00, 0x02]).unwrap().unwrap();
        assert_eq!(parsed.heart_rate, 75);
        assert_eq!(parsed.rr_intervals, vec![256, 512]);
    }

    #[test]
    fn trailing_rr_byte_is_dropped() {
        let parsed = decode(&[0x10, 0x4b, 0x00, 0x01, 0xff]).unwrap().unwrap();
        assert_eq!(parsed.rr_intervals, vec![256]);
    }

    #[test]
    fn rr_flag_without_intervals() {
        let parsed = decode(&[0x10, 0x4b]).unwrap().unwrap();
        assert!(parsed.flags.rr_interval_present);
        assert!(parsed.rr_intervals.is_empty());
    }

    #[test]
    fn empty_payload_is_none() {
        assert_eq!(decode(&[]).unwrap(), None);
    }

    #[test]
    fn short_uint16_heart_rate_is_malformed() {
        let err = decode(&[0x01, 0x4b]).unwrap_err();
        assert_eq!(
            err,
            HrmError::MalformedPayload {
                field: HrmField::HeartRate,
                needed: 3,
                actual: 2,
            }
        );
    }

    #[test]
    fn flags_only_is_malformed() {
        let err = decode(&[0x00]).unwrap_err();
        assert_eq!(err.field(), HrmField::HeartRate);
    }

    #[test]
    fn short_energy_expended_is_malformed() {
        let err = decode(&[0x18, 0x4b, 0x10]).unwrap_err();
        assert_eq!(
            err,
            HrmError::MalformedPayload {
                field: HrmField::EnergyExpended,
                needed: 4,
                actual: 3,
            }
        );
    }

    #[test]
    fn sensor_contact_bits_do_not_fail() {
        let parsed = decode(&[0xe6, 0x4b]).unwrap().unwrap();
        assert_eq!(parsed.flags.sensor_contact, SensorContact::Detected);
        assert_eq!(parsed.heart_rate, 75);
    }

    #[test]
    fn decode_is_repeatable() {
        let payload = [0x19, 0x46, 0x10, 0x00, 0x00, 0x04, 0x00, 0x08, 0x7f];
        assert_eq!(decode(&payload), decode(&payload));
    }

    #[test]
    fn decode_source_handles_absent_value() {
        let absent: Option<Vec<u8>> = None;
        assert_eq!(decode_source(&absent).unwrap(), None);

        let present = Some(vec![0x00, 0x48]);
        assert_eq!(decode_source(&present).unwrap().unwrap().heart_rate, 72);

        let slice: &[u8] = &[0x00, 0x49];
        assert_eq!(decode_source(slice).unwrap().unwrap().heart_rate, 73);
    }
}
