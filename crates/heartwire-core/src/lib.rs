//! Heartwire core library: Bluetooth Heart Rate Measurement decoding.
//!
//! This crate implements the pipeline used by the CLI: notification sources
//! hand raw characteristic values to the decoder (`protocols::hrm`, split
//! into layout/reader/parser), and the analysis layer aggregates decoded
//! measurements into a deterministic report. Decoding is byte-oriented and
//! side-effect free; all I/O is isolated in `source` modules.
//!
//! Invariants:
//! - Every field read is bounds-checked; a short buffer is an error, never a
//!   panic or a partially filled measurement.
//! - Decoding keeps no state between notifications.
//! - Report outputs are deterministic and stable across runs.
//!
//! Version française (résumé):
//! Cette crate décode la caractéristique GATT Heart Rate Measurement
//! (0x2A37) : sources -> décodeur (layout/reader/parser) -> rapport
//! déterministe. Les E/S restent dans `source`.
//!
//! # Examples
//! ```
//! use heartwire_core::decode;
//!
//! let measurement = decode(&[0x08, 0x46, 0x10, 0x00])?.expect("non-empty payload");
//! assert_eq!(measurement.heart_rate, 70);
//! assert_eq!(measurement.energy_expended, Some(16));
//! # Ok::<(), heartwire_core::HrmError>(())
//! ```

use serde::{Deserialize, Serialize};

mod analysis;
mod protocols;
mod source;

pub use analysis::{AnalysisError, analyze_hexlog_file, analyze_source};
pub use protocols::hrm::{
    FieldSpan, Flags, HrmError, HrmField, IntWidth, Layout, ParsedMeasurement, RrSpan,
    SensorContact, ValueFormat, compute_layout, decode, decode_source, parse_flags,
};
pub use source::{
    CharacteristicSource, HexLogSource, MemorySource, NotificationEvent, NotificationSource,
    SourceError, parse_hex_payload,
};

/// Current report schema version.
pub const REPORT_VERSION: u32 = 1;
/// Default timestamp used when no notification time is available.
pub const DEFAULT_GENERATED_AT: &str = "1970-01-01T00:00:00Z";

/// Aggregated analysis report for one notification stream.
///
/// # Examples
/// ```
/// use heartwire_core::make_stub_report;
///
/// let report = make_stub_report("session.hexlog", 123);
/// assert_eq!(report.report_version, heartwire_core::REPORT_VERSION);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    /// Report schema version (not the binary version).
    pub report_version: u32,
    /// Tool identification metadata.
    pub tool: ToolInfo,
    /// RFC3339 timestamp representing the report generation time.
    pub generated_at: String,

    /// Input log metadata.
    pub input: InputInfo,

    /// Stream counters (absent until a source has been drained).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stream: Option<StreamSummary>,
    /// Heart-rate statistics over decoded measurements.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub heart_rate: Option<HeartRateSummary>,
    /// R-R interval statistics, when any interval was reported.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rr_intervals: Option<RrSummary>,
    /// Energy expended values, when any measurement carried one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub energy_expended: Option<EnergySummary>,
    /// Malformed notifications grouped by issue ID, in stable order.
    pub issues: Vec<DecodeIssue>,
}

/// Tool metadata embedded in reports.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolInfo {
    /// Tool name (e.g., "heartwire").
    pub name: String,
    /// Tool version (semver).
    pub version: String,
}

/// Input metadata embedded in reports.
///
/// # Examples
/// ```
/// use heartwire_core::InputInfo;
///
/// let input = InputInfo {
///     path: "session.hexlog".to_string(),
///     bytes: 1024,
/// };
/// assert_eq!(input.bytes, 1024);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputInfo {
    /// Input path as provided to the analyzer.
    pub path: String,
    /// Input size in bytes.
    pub bytes: u64,
}

/// Notification counters for a stream.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StreamSummary {
    /// Notifications read from the source.
    pub notifications_total: u64,
    /// Notifications decoded into a measurement.
    pub decoded: u64,
    /// Notifications with an absent or zero-length value.
    pub empty: u64,
    /// Notifications dropped because a field ran past the end of the value.
    pub malformed: u64,
    /// Decoded measurements whose sensor reported no skin contact.
    pub contact_not_detected: u64,
    /// RFC3339 timestamp of the first notification (if known).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_start: Option<String>,
    /// RFC3339 timestamp of the last notification (if known).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_end: Option<String>,
}

/// Heart-rate statistics in beats per minute.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeartRateSummary {
    pub samples: u64,
    pub min: u16,
    pub max: u16,
    pub mean: f64,
    /// Value of the most recent measurement.
    pub last: u16,
}

/// R-R interval statistics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RrSummary {
    /// Number of intervals across all measurements.
    pub intervals_total: u64,
    /// Shortest interval in 1/1024 s units.
    pub min: u16,
    /// Longest interval in 1/1024 s units.
    pub max: u16,
    /// Mean interval in 1/1024 s units.
    pub mean: f64,
    /// Mean interval in milliseconds.
    pub mean_ms: f64,
}

/// Raw energy expended values, reported as transmitted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnergySummary {
    pub samples: u64,
    pub first: u16,
    pub last: u16,
}

/// Group of malformed notifications sharing the same cause.
///
/// # Examples
/// ```
/// use heartwire_core::DecodeIssue;
///
/// let issue = DecodeIssue {
///     id: "HRM-SHORT-HEART-RATE".to_string(),
///     field: "heart_rate".to_string(),
///     message: "heart_rate field extends past end of payload".to_string(),
///     count: 1,
///     examples: vec!["notification 4 @ 1970-01-01T00:00:04Z".to_string()],
/// };
/// assert_eq!(issue.count, 1);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecodeIssue {
    /// Stable issue identifier (e.g., `HRM-SHORT-ENERGY-EXPENDED`).
    pub id: String,
    /// Field whose read failed.
    pub field: String,
    /// Human-readable message explaining the issue.
    pub message: String,
    /// Number of notifications aggregated into this issue.
    pub count: u64,
    /// At most three example contexts, formatted as `notification N @ ts`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub examples: Vec<String>,
}

/// Build a stub report with base fields filled and empty aggregates.
///
/// # Examples
/// ```
/// use heartwire_core::make_stub_report;
///
/// let report = make_stub_report("session.hexlog", 123);
/// assert!(report.stream.is_none());
/// assert!(report.issues.is_empty());
/// ```
pub fn make_stub_report(input_path: &str, input_bytes: u64) -> Report {
    Report {
        report_version: REPORT_VERSION,
        tool: ToolInfo {
            name: "heartwire".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        },
        generated_at: DEFAULT_GENERATED_AT.to_string(),
        input: InputInfo {
            path: input_path.to_string(),
            bytes: input_bytes,
        },
        stream: None,
        heart_rate: None,
        rr_intervals: None,
        energy_expended: None,
        issues: vec![],
    }
}
