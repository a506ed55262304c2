use std::fmt;

use super::flags::Flags;

pub const FLAGS_OFFSET: usize = 0;
pub const HEART_RATE_OFFSET: usize = FLAGS_OFFSET + 1;

pub const ENERGY_EXPENDED_WIDTH: IntWidth = IntWidth::U16;
pub const RR_INTERVAL_WIDTH: IntWidth = IntWidth::U16;

pub const FLAG_VALUE_FORMAT_UINT16: u8 = 1 << 0;
pub const FLAG_SENSOR_CONTACT_DETECTED: u8 = 1 << 1;
pub const FLAG_SENSOR_CONTACT_SUPPORTED: u8 = 1 << 2;
pub const FLAG_ENERGY_EXPENDED_PRESENT: u8 = 1 << 3;
pub const FLAG_RR_INTERVAL_PRESENT: u8 = 1 << 4;

/// R-R intervals are transmitted in units of 1/1024 second.
pub const RR_INTERVAL_UNITS_PER_SECOND: f64 = 1024.0;

/// Width of an unsigned little-endian integer field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IntWidth {
    U8,
    U16,
}

impl IntWidth {
    pub fn bytes(self) -> usize {
        match self {
            IntWidth::U8 => 1,
            IntWidth::U16 => 2,
        }
    }
}

/// Named fields of the measurement record, used in errors and reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum HrmField {
    Flags,
    HeartRate,
    EnergyExpended,
    RrIntervals,
}

impl HrmField {
    pub fn as_str(self) -> &'static str {
        match self {
            HrmField::Flags => "flags",
            HrmField::HeartRate => "heart_rate",
            HrmField::EnergyExpended => "energy_expended",
            HrmField::RrIntervals => "rr_intervals",
        }
    }
}

impl fmt::Display for HrmField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Byte position of a fixed-width field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpan {
    pub offset: usize,
    pub width: IntWidth,
}

impl FieldSpan {
    /// Exclusive end offset; the buffer must be at least this long.
    pub fn end(&self) -> usize {
        self.offset + self.width.bytes()
    }

    pub fn range(&self) -> std::ops::Range<usize> {
        self.offset..self.end()
    }
}

/// Start of the repeated R-R interval field, which runs to the end of the buffer.
///
/// Every element is `RR_INTERVAL_WIDTH` wide.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RrSpan {
    pub start: usize,
}

/// Field positions for one flags byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout {
    pub heart_rate: FieldSpan,
    pub energy_expended: Option<FieldSpan>,
    pub rr_intervals: Option<RrSpan>,
}

/// Running offset that only moves forward as fields are laid out.
struct OffsetCursor {
    offset: usize,
}

impl OffsetCursor {
    fn new(start: usize) -> Self {
        Self { offset: start }
    }

    fn take(&mut self, width: IntWidth) -> FieldSpan {
        let span = FieldSpan {
            offset: self.offset,
            width,
        };
        self.offset += width.bytes();
        span
    }

    fn position(&self) -> usize {
        self.offset
    }
}

/// Compute where each field lives for the given flags.
///
/// Every optional field starts where the previous one ended, so the offsets
/// are accumulated in declaration order rather than hard-coded.
///
/// # Examples
/// ```
/// use heartwire_core::{compute_layout, parse_flags};
///
/// let layout = compute_layout(&parse_flags(0x19));
/// assert_eq!(layout.heart_rate.width.bytes(), 2);
/// assert_eq!(layout.energy_expended.map(|span| span.offset), Some(3));
/// assert_eq!(layout.rr_intervals.map(|span| span.start), Some(5));
/// ```
pub fn compute_layout(flags: &Flags) -> Layout {
    let mut cursor = OffsetCursor::new(HEART_RATE_OFFSET);

    let heart_rate = cursor.take(flags.value_format.width());
    let energy_expended = flags
        .energy_expended_present
        .then(|| cursor.take(ENERGY_EXPENDED_WIDTH));
    let rr_intervals = flags.rr_interval_present.then(|| RrSpan {
        start: cursor.position(),
    });

    Layout {
        heart_rate,
        energy_expended,
        rr_intervals,
    }
}
