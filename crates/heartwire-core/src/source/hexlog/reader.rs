use super::error::HexLogError;
use super::layout;
use crate::source::NotificationEvent;

/// Parse one log line. Returns `Ok(None)` for blank and comment lines.
///
/// # Examples
/// This helper is part of an internal module, so the example is marked as
/// text example.
/// ```text
/// use heartwire_core::source::hexlog::reader::parse_line;
///
/// let event = parse_line(1, "12.5 10:4b:00:04").unwrap().unwrap();
/// assert_eq!(event.ts, Some(12.5));
/// assert_eq!(event.value, Some(vec![0x10, 0x4b, 0x00, 0x04]));
/// ```
pub fn parse_line(line: usize, text: &str) -> Result<Option<NotificationEvent>, HexLogError> {
    let trimmed = text.trim();
    if trimmed.is_empty() || trimmed.starts_with(layout::COMMENT_PREFIX) {
        return Ok(None);
    }

    let tokens: Vec<&str> = trimmed.split_whitespace().collect();
    let (ts, value) = match tokens.as_slice() {
        [value] => (None, *value),
        [ts, value] => (Some(parse_timestamp(line, ts)?), *value),
        _ => {
            return Err(HexLogError::TooManyFields {
                line,
                count: tokens.len(),
            });
        }
    };

    Ok(Some(NotificationEvent {
        ts,
        value: parse_value(line, value)?,
    }))
}

/// Timestamps are non-negative seconds.
pub fn parse_timestamp(line: usize, token: &str) -> Result<f64, HexLogError> {
    match token.parse::<f64>() {
        Ok(ts) if ts.is_finite() && ts >= 0.0 => Ok(ts),
        _ => Err(HexLogError::InvalidTimestamp {
            line,
            token: token.to_string(),
        }),
    }
}

/// Decode a hex payload; `-` stands for an absent value.
pub fn parse_value(line: usize, token: &str) -> Result<Option<Vec<u8>>, HexLogError> {
    decode_hex(token).map_err(|err| HexLogError::InvalidHex {
        line,
        token: token.to_string(),
        message: err.to_string(),
    })
}

/// Hex digits with an optional `0x` prefix and `:` byte separators.
pub fn decode_hex(token: &str) -> Result<Option<Vec<u8>>, hex::FromHexError> {
    if token == layout::ABSENT_MARKER {
        return Ok(None);
    }
    let digits = layout::HEX_PREFIXES
        .iter()
        .find_map(|prefix| token.strip_prefix(prefix))
        .unwrap_or(token);
    let digits: String = digits
        .chars()
        .filter(|c| *c != layout::BYTE_SEPARATOR)
        .collect();

    hex::decode(digits).map(Some)
}
