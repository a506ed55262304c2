use super::error::HrmError;
use super::layout::{self, FieldSpan, HrmField, IntWidth, RrSpan};

pub struct HrmReader<'a> {
    payload: &'a [u8],
}

impl<'a> HrmReader<'a> {
    pub fn new(payload: &'a [u8]) -> Self {
        Self { payload }
    }

    /// Status byte, or `None` for an empty payload.
    pub fn first(&self) -> Option<u8> {
        self.payload.get(layout::FLAGS_OFFSET).copied()
    }

    pub fn require_len(&self, field: HrmField, needed: usize) -> Result<(), HrmError> {
        if self.payload.len() < needed {
            return Err(HrmError::MalformedPayload {
                field,
                needed,
                actual: self.payload.len(),
            });
        }
        Ok(())
    }

    pub fn read_u8(&self, field: HrmField, offset: usize) -> Result<u8, HrmError> {
        self.payload
            .get(offset)
            .copied()
            .ok_or(HrmError::MalformedPayload {
                field,
                needed: offset + 1,
                actual: self.payload.len(),
            })
    }

    pub fn read_u16_le(&self, field: HrmField, offset: usize) -> Result<u16, HrmError> {
        let bytes = self.read_slice(field, offset..offset + IntWidth::U16.bytes())?;
        Ok(u16::from_le_bytes([bytes[0], bytes[1]]))
    }

    /// Read an unsigned little-endian integer whose width comes from the layout.
    pub fn read_uint(&self, field: HrmField, span: FieldSpan) -> Result<u16, HrmError> {
        match span.width {
            IntWidth::U8 => self.read_u8(field, span.offset).map(u16::from),
            IntWidth::U16 => self.read_u16_le(field, span.offset),
        }
    }

    /// Read every complete R-R slot from `span.start` to the end of the payload.
    ///
    /// A single trailing byte that cannot fill a slot is dropped on purpose;
    /// do not turn it into an error.
    pub fn read_u16_run(&self, field: HrmField, span: RrSpan) -> Result<Vec<u16>, HrmError> {
        self.require_len(field, span.start)?;
        let tail = self.read_slice(field, span.start..self.payload.len())?;
        Ok(tail
            .chunks_exact(layout::RR_INTERVAL_WIDTH.bytes())
            .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
            .collect())
    }

    pub fn read_slice(
        &self,
        field: HrmField,
        range: std::ops::Range<usize>,
    ) -> Result<&'a [u8], HrmError> {
        self.payload
            .get(range.clone())
            .ok_or(HrmError::MalformedPayload {
                field,
                needed: range.end,
                actual: self.payload.len(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::HrmReader;
    use crate::protocols::hrm::error::HrmError;
    use crate::protocols::hrm::layout::{FieldSpan, HrmField, IntWidth, RrSpan};

    #[test]
    fn read_uint_respects_width() {
        let payload = [0x01, 0x4b, 0x01];
        let reader = HrmReader::new(&payload);
        let narrow = FieldSpan {
            offset: 1,
            width: IntWidth::U8,
        };
        let wide = FieldSpan {
            offset: 1,
            width: IntWidth::U16,
        };
        assert_eq!(reader.read_uint(HrmField::HeartRate, narrow).unwrap(), 0x4b);
        assert_eq!(reader.read_uint(HrmField::HeartRate, wide).unwrap(), 0x014b);
    }

    #[test]
    fn read_uint_past_end() {
        let payload = [0x01, 0x4b];
        let reader = HrmReader::new(&payload);
        let span = FieldSpan {
            offset: 1,
            width: IntWidth::U16,
        };
        let err = reader.read_uint(HrmField::HeartRate, span).unwrap_err();
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
    fn read_u16_run_drops_trailing_byte() {
        let payload = [0x10, 0x4b, 0x00, 0x01, 0xff];
        let reader = HrmReader::new(&payload);
        assert_eq!(
            reader
                .read_u16_run(HrmField::RrIntervals, RrSpan { start: 2 })
                .unwrap(),
            vec![0x0100]
        );
    }

    #[test]
    fn read_u16_run_empty_tail() {
        let payload = [0x10, 0x4b];
        let reader = HrmReader::new(&payload);
        assert!(
            reader
                .read_u16_run(HrmField::RrIntervals, RrSpan { start: 2 })
                .unwrap()
                .is_empty()
        );
    }

    #[test]
    fn read_u16_run_start_past_end() {
        let payload = [0x10];
        let reader = HrmReader::new(&payload);
        let err = reader
            .read_u16_run(HrmField::RrIntervals, RrSpan { start: 2 })
            .unwrap_err();
        assert!(matches!(err, HrmError::MalformedPayload { needed: 2, actual: 1, .. }));
    }
}
