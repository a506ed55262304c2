use std::collections::VecDeque;

use super::{NotificationEvent, NotificationSource, SourceError};

/// In-memory notification queue, drained in insertion order.
#[derive(Debug, Default, Clone)]
pub struct MemorySource {
    events: VecDeque<NotificationEvent>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, ts: Option<f64>, value: Option<Vec<u8>>) {
        self.events.push_back(NotificationEvent { ts, value });
    }
}

impl FromIterator<NotificationEvent> for MemorySource {
    fn from_iter<I: IntoIterator<Item = NotificationEvent>>(iter: I) -> Self {
        Self {
            events: iter.into_iter().collect(),
        }
    }
}

impl NotificationSource for MemorySource {
    fn next_notification(&mut self) -> Result<Option<NotificationEvent>, SourceError> {
        Ok(self.events.pop_front())
    }
}

#[cfg(test)]
mod tests {
    use super::MemorySource;
    use crate::source::NotificationSource;

    #[test]
    fn drains_in_order() {
        let mut source = MemorySource::new();
        source.push(Some(1.0), Some(vec![0x00, 0x40]));
        source.push(None, None);

        let first = source.next_notification().unwrap().unwrap();
        assert_eq!(first.ts, Some(1.0));
        let second = source.next_notification().unwrap().unwrap();
        assert_eq!(second.value, None);
        assert!(source.next_notification().unwrap().is_none());
    }
}
