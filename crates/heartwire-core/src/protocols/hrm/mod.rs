//! Heart Rate Measurement (GATT characteristic 0x2A37) decoding.
//!
//! The first byte is a status byte whose bits select the heart-rate width
//! and which optional fields follow. Offsets are therefore computed, not
//! fixed: `layout` accumulates them field by field, `reader` performs
//! bounds-checked little-endian reads, and `parser` turns a buffer into a
//! `ParsedMeasurement` or a `MalformedPayload` error.
//!
//! Decoding is a pure function of one buffer; nothing is kept between calls.
//!
//! Version française (résumé):
//! Le premier octet (drapeaux) fixe la largeur de la fréquence cardiaque et la
//! présence des champs optionnels. Les positions sont calculées dans `layout`,
//! les lectures sûres dans `reader`.

pub mod error;
pub mod flags;
pub mod layout;
pub mod parser;
pub mod reader;

pub use error::HrmError;
pub use flags::{Flags, SensorContact, ValueFormat, parse_flags};
pub use layout::{FieldSpan, HrmField, IntWidth, Layout, RrSpan, compute_layout};
pub use parser::{ParsedMeasurement, decode, decode_source};
