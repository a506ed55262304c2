use crate::protocols::hrm::ParsedMeasurement;
use crate::{EnergySummary, HeartRateSummary};

#[derive(Debug, Default, Clone)]
pub(crate) struct HeartRateStats {
    samples: u64,
    sum: u64,
    min: Option<u16>,
    max: Option<u16>,
    last: Option<u16>,
}

impl HeartRateStats {
    pub(crate) fn add(&mut self, measurement: &ParsedMeasurement) {
        let value = measurement.heart_rate;
        self.samples += 1;
        self.sum += u64::from(value);
        self.min = Some(self.min.map_or(value, |min| min.min(value)));
        self.max = Some(self.max.map_or(value, |max| max.max(value)));
        self.last = Some(value);
    }

    pub(crate) fn build_summary(&self) -> Option<HeartRateSummary> {
        Some(HeartRateSummary {
            samples: self.samples,
            min: self.min?,
            max: self.max?,
            mean: self.sum as f64 / self.samples as f64,
            last: self.last?,
        })
    }
}

#[derive(Debug, Default, Clone)]
pub(crate) struct EnergyStats {
    samples: u64,
    first: Option<u16>,
    last: Option<u16>,
}

impl EnergyStats {
    pub(crate) fn add(&mut self, measurement: &ParsedMeasurement) {
        let Some(value) = measurement.energy_expended else {
            return;
        };
        self.samples += 1;
        if self.first.is_none() {
            self.first = Some(value);
        }
        self.last = Some(value);
    }

    pub(crate) fn build_summary(&self) -> Option<EnergySummary> {
        Some(EnergySummary {
            samples: self.samples,
            first: self.first?,
            last: self.last?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{EnergyStats, HeartRateStats};
    use crate::protocols::hrm::decode;

    #[test]
    fn heart_rate_summary_tracks_bounds_and_mean() {
        let mut stats = HeartRateStats::default();
        assert!(stats.build_summary().is_none());
        for payload in [[0x00u8, 60], [0x00, 90], [0x00, 75]] {
            stats.add(&decode(&payload).unwrap().unwrap());
        }
        let summary = stats.build_summary().unwrap();
        assert_eq!(summary.samples, 3);
        assert_eq!(summary.min, 60);
        assert_eq!(summary.max, 90);
        assert_eq!(summary.last, 75);
        assert!((summary.mean - 75.0).abs() < f64::EPSILON);
    }

    #[test]
    fn energy_summary_skips_measurements_without_energy() {
        let mut stats = EnergyStats::default();
        stats.add(&decode(&[0x00, 0x48]).unwrap().unwrap());
        assert!(stats.build_summary().is_none());

        stats.add(&decode(&[0x08, 0x48, 0x05, 0x00]).unwrap().unwrap());
        stats.add(&decode(&[0x08, 0x48, 0x09, 0x00]).unwrap().unwrap());
        let summary = stats.build_summary().unwrap();
        assert_eq!(summary.samples, 2);
        assert_eq!(summary.first, 5);
        assert_eq!(summary.last, 9);
    }
}
