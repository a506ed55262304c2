//! Text notification log source.
//!
//! One notification per line: an optional timestamp in seconds followed by
//! the characteristic value in hex, or `-` when the platform reported no
//! value. Blank lines and `#` comments are skipped.

pub mod error;
pub mod layout;
pub mod parser;
pub mod reader;

pub use parser::HexLogSource;
