use thiserror::Error;

#[derive(Debug, Error)]
pub enum HexLogError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("line {line}: invalid hex payload '{token}': {message}")]
    InvalidHex {
        line: usize,
        token: String,
        message: String,
    },
    #[error("line {line}: not valid UTF-8")]
    InvalidEncoding { line: usize },
    #[error("line {line}: invalid timestamp '{token}'")]
    InvalidTimestamp { line: usize, token: String },
    #[error("line {line}: expected at most 2 fields, got {count}")]
    TooManyFields { line: usize, count: usize },
}
