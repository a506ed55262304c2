use thiserror::Error;

use super::layout::HrmField;

/// Errors returned by Heart Rate Measurement decoding.
///
/// # Examples
/// ```
/// use heartwire_core::{HrmError, HrmField};
///
/// let err = HrmError::MalformedPayload {
///     field: HrmField::HeartRate,
///     needed: 3,
///     actual: 2,
/// };
/// assert!(err.to_string().contains("malformed payload"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HrmError {
    #[error("malformed payload: {field} needs {needed} bytes, got {actual}")]
    MalformedPayload {
        field: HrmField,
        needed: usize,
        actual: usize,
    },
}

impl HrmError {
    /// Field whose read failed.
    pub fn field(&self) -> HrmField {
        match self {
            HrmError::MalformedPayload { field, .. } => *field,
        }
    }
}
