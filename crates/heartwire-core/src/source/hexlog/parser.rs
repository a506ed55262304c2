use std::fs::File;
use std::io::{BufRead, BufReader, ErrorKind, Lines};
use std::path::Path;

use crate::source::{NotificationEvent, NotificationSource, SourceError};

use super::error::HexLogError;
use super::reader::parse_line;

/// Notification source backed by a hex log.
pub struct HexLogSource<R = BufReader<File>> {
    lines: Lines<R>,
    line: usize,
}

impl HexLogSource {
    pub fn open(path: &Path) -> Result<Self, SourceError> {
        let file = File::open(path).map_err(SourceError::from)?;
        Ok(Self::from_reader(BufReader::new(file)))
    }
}

impl<R: BufRead> HexLogSource<R> {
    pub fn from_reader(reader: R) -> Self {
        Self {
            lines: reader.lines(),
            line: 0,
        }
    }
}

impl<R: BufRead> NotificationSource for HexLogSource<R> {
    fn next_notification(&mut self) -> Result<Option<NotificationEvent>, SourceError> {
        next_notification(&mut self.lines, &mut self.line).map_err(SourceError::from)
    }
}

fn next_notification<R: BufRead>(
    lines: &mut Lines<R>,
    line: &mut usize,
) -> Result<Option<NotificationEvent>, HexLogError> {
    for text in lines.by_ref() {
        *line += 1;
        let text = text.map_err(|err| match err.kind() {
            ErrorKind::InvalidData => HexLogError::InvalidEncoding { line: *line },
            _ => HexLogError::Io(err),
        })?;
        if let Some(event) = parse_line(*line, &text)? {
            return Ok(Some(event));
        }
    }
    Ok(None)
}
