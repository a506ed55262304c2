use crate::RrSummary;
use crate::protocols::hrm::ParsedMeasurement;
use crate::protocols::hrm::layout::RR_INTERVAL_UNITS_PER_SECOND;

#[derive(Debug, Default, Clone)]
pub(crate) struct RrStats {
    intervals: u64,
    sum: u64,
    min: Option<u16>,
    max: Option<u16>,
}

impl RrStats {
    pub(crate) fn add(&mut self, measurement: &ParsedMeasurement) {
        for &interval in &measurement.rr_intervals {
            self.intervals += 1;
            self.sum += u64::from(interval);
            self.min = Some(self.min.map_or(interval, |min| min.min(interval)));
            self.max = Some(self.max.map_or(interval, |max| max.max(interval)));
        }
    }

    pub(crate) fn build_summary(&self) -> Option<RrSummary> {
        let min = self.min?;
        let max = self.max?;
        let mean = self.sum as f64 / self.intervals as f64;
        Some(RrSummary {
            intervals_total: self.intervals,
            min,
            max,
            mean,
            mean_ms: mean * 1000.0 / RR_INTERVAL_UNITS_PER_SECOND,
        })
    }
}
