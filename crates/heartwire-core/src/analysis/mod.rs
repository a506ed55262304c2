use std::path::Path;

use thiserror::Error;
use time::{OffsetDateTime, format_description::well_known::Rfc3339};

use crate::protocols::hrm::{SensorContact, decode_source};
use crate::source::{HexLogSource, NotificationEvent, NotificationSource, SourceError};
use crate::{DEFAULT_GENERATED_AT, InputInfo, Report, StreamSummary, make_stub_report};

mod heart_rate;
mod issues;
mod rr;

use heart_rate::{EnergyStats, HeartRateStats};
use issues::IssueStats;
use rr::RrStats;

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Source error: {0}")]
    Source(#[from] SourceError),
}

pub fn analyze_hexlog_file(path: &Path) -> Result<Report, AnalysisError> {
    let bytes = path.metadata()?.len();
    let source = HexLogSource::open(path)?;
    let input = InputInfo {
        path: path.display().to_string(),
        bytes,
    };
    analyze_source(input, source)
}

/// Drain `source`, decoding every notification into the report.
///
/// Malformed notifications are counted and dropped; only source errors abort.
pub fn analyze_source<S: NotificationSource>(
    input: InputInfo,
    mut source: S,
) -> Result<Report, AnalysisError> {
    let mut stream = StreamSummary {
        notifications_total: 0,
        decoded: 0,
        empty: 0,
        malformed: 0,
        contact_not_detected: 0,
        time_start: None,
        time_end: None,
    };
    let mut first_ts = None;
    let mut last_ts = None;
    let mut heart_rate = HeartRateStats::default();
    let mut energy = EnergyStats::default();
    let mut rr = RrStats::default();
    let mut issues = IssueStats::default();

    while let Some(event) = source.next_notification()? {
        stream.notifications_total += 1;
        let index = stream.notifications_total;
        update_ts_bounds(&mut first_ts, &mut last_ts, event.ts);

        match decode_source(&event) {
            Ok(Some(measurement)) => {
                tracing::trace!(
                    index,
                    heart_rate = measurement.heart_rate,
                    "decoded notification"
                );
                stream.decoded += 1;
                if measurement.flags.sensor_contact == SensorContact::NotDetected {
                    stream.contact_not_detected += 1;
                }
                heart_rate.add(&measurement);
                energy.add(&measurement);
                rr.add(&measurement);
            }
            Ok(None) => stream.empty += 1,
            Err(err) => {
                tracing::debug!(index, error = %err, "dropping malformed notification");
                stream.malformed += 1;
                issues.add(&err, example_context(index, &event));
            }
        }
    }

    tracing::debug!(
        notifications = stream.notifications_total,
        malformed = stream.malformed,
        "notification stream drained"
    );

    stream.time_start = ts_to_rfc3339(first_ts);
    stream.time_end = ts_to_rfc3339(last_ts);

    let mut report = make_stub_report(&input.path, input.bytes);
    report.generated_at = stream
        .time_end
        .clone()
        .or_else(|| stream.time_start.clone())
        .unwrap_or_else(|| DEFAULT_GENERATED_AT.to_string());
    report.stream = Some(stream);
    report.heart_rate = heart_rate.build_summary();
    report.rr_intervals = rr.build_summary();
    report.energy_expended = energy.build_summary();
    report.issues = issues.build_issues();
    Ok(report)
}

fn example_context(index: u64, event: &NotificationEvent) -> String {
    match ts_to_rfc3339(event.ts) {
        Some(ts) => format!("notification {index} @ {ts}"),
        None => format!("notification {index}"),
    }
}

fn update_ts_bounds(first: &mut Option<f64>, last: &mut Option<f64>, ts: Option<f64>) {
    let ts = match ts {
        Some(ts) => ts,
        None => return,
    };
    match first {
        None => *first = Some(ts),
        Some(existing) => {
            if ts < *existing {
                *first = Some(ts);
            }
        }
    }
    match last {
        None => *last = Some(ts),
        Some(existing) => {
            if ts > *existing {
                *last = Some(ts);
            }
        }
    }
}

fn ts_to_rfc3339(ts: Option<f64>) -> Option<String> {
    let ts = ts?;
    let nanos = (ts * 1_000_000_000.0) as i128;
    OffsetDateTime::from_unix_timestamp_nanos(nanos)
        .ok()
        .and_then(|dt| dt.format(&Rfc3339).ok())
}

#[cfg(test)]
mod tests {
    use super::{analyze_source, ts_to_rfc3339, update_ts_bounds};
    use crate::InputInfo;
    use crate::source::MemorySource;

    fn input() -> InputInfo {
        InputInfo {
            path: "memory".to_string(),
            bytes: 0,
        }
    }

    #[test]
    fn counts_decoded_empty_and_malformed() {
        let mut source = MemorySource::new();
        source.push(Some(10.0), Some(vec![0x04, 0x50]));
        source.push(Some(11.0), Some(vec![]));
        source.push(Some(12.0), None);
        source.push(Some(13.0), Some(vec![0x01, 0x50]));
        source.push(Some(14.0), Some(vec![0x16, 0x52, 0x00, 0x04]));

        let report = analyze_source(input(), source).unwrap();
        let stream = report.stream.as_ref().unwrap();
        assert_eq!(stream.notifications_total, 5);
        assert_eq!(stream.decoded, 2);
        assert_eq!(stream.empty, 2);
        assert_eq!(stream.malformed, 1);
        assert_eq!(stream.contact_not_detected, 1);
        assert_eq!(stream.time_start.as_deref(), Some("1970-01-01T00:00:10Z"));
        assert_eq!(report.generated_at, "1970-01-01T00:00:14Z");

        let heart_rate = report.heart_rate.as_ref().unwrap();
        assert_eq!(heart_rate.samples, 2);
        assert_eq!(heart_rate.last, 0x52);
        assert_eq!(report.rr_intervals.as_ref().unwrap().intervals_total, 1);
        assert!(report.energy_expended.is_none());

        assert_eq!(report.issues.len(), 1);
        assert_eq!(report.issues[0].id, "HRM-SHORT-HEART-RATE");
        assert_eq!(
            report.issues[0].examples,
            vec!["notification 4 @ 1970-01-01T00:00:13Z".to_string()]
        );
    }

    #[test]
    fn empty_stream_has_no_summaries() {
        let report = analyze_source(input(), MemorySource::new()).unwrap();
        assert_eq!(report.stream.as_ref().unwrap().notifications_total, 0);
        assert!(report.heart_rate.is_none());
        assert_eq!(report.generated_at, crate::DEFAULT_GENERATED_AT);
    }

    #[test]
    fn malformed_without_timestamp_uses_index_only() {
        let mut source = MemorySource::new();
        source.push(None, Some(vec![0x00]));
        let report = analyze_source(input(), source).unwrap();
        assert_eq!(report.issues[0].examples, vec!["notification 1".to_string()]);
    }

    #[test]
    fn ts_bounds_ignore_order() {
        let mut first = None;
        let mut last = None;
        for ts in [Some(5.0), None, Some(2.0), Some(9.0)] {
            update_ts_bounds(&mut first, &mut last, ts);
        }
        assert_eq!(first, Some(2.0));
        assert_eq!(last, Some(9.0));
    }

    #[test]
    fn rfc3339_formatting() {
        assert_eq!(ts_to_rfc3339(Some(0.0)).as_deref(), Some("1970-01-01T00:00:00Z"));
        assert_eq!(ts_to_rfc3339(None), None);
    }
}
