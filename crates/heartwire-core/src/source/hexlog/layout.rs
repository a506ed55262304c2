pub const COMMENT_PREFIX: char = '#';
pub const ABSENT_MARKER: &str = "-";
pub const BYTE_SEPARATOR: char = ':';
pub const HEX_PREFIXES: [&str; 2] = ["0x", "0X"];
