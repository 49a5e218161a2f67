//! Request and response bodies for the ingestion API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A reading as submitted by a sensor node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewReading {
    /// Temperature in degrees Celsius
    pub temperature: f64,
    /// CO2 concentration in ppm
    #[serde(default)]
    pub co2: Option<u32>,
    /// Sound level in dB
    #[serde(default)]
    pub noise_db: Option<f64>,
    /// Illuminance in lux
    #[serde(default)]
    pub light_lux: Option<f64>,
    /// Capture time; the server stamps the reading when absent
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
}

/// A reading as held by the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredReading {
    pub id: Uuid,
    pub temperature: f64,
    pub co2: Option<u32>,
    pub noise_db: Option<f64>,
    pub light_lux: Option<f64>,
    pub timestamp: DateTime<Utc>,
}

impl StoredReading {
    /// Assign an id and fill in a missing timestamp with `now`.
    pub fn from_new(reading: NewReading, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            temperature: reading.temperature,
            co2: reading.co2,
            noise_db: reading.noise_db,
            light_lux: reading.light_lux,
            timestamp: reading.timestamp.unwrap_or(now),
        }
    }
}

/// Acknowledgement for an inserted reading.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InsertResponse {
    pub status: String,
    pub id: Uuid,
}

impl InsertResponse {
    pub fn inserted(id: Uuid) -> Self {
        Self {
            status: "Data inserted".to_string(),
            id,
        }
    }
}

/// Inclusive timestamp window; open ends are unbounded.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct TimeRange {
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
}

impl TimeRange {
    pub fn new(start: Option<DateTime<Utc>>, end: Option<DateTime<Utc>>) -> Self {
        Self { start, end }
    }

    /// A window whose start lies after its end.
    pub fn is_inverted(&self) -> bool {
        matches!((self.start, self.end), (Some(start), Some(end)) if start > end)
    }

    pub fn contains(&self, timestamp: DateTime<Utc>) -> bool {
        self.start.map_or(true, |start| timestamp >= start)
            && self.end.map_or(true, |end| timestamp <= end)
    }
}

/// Mean and maximum of one metric.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricStats {
    pub mean: f64,
    pub max: f64,
}

impl MetricStats {
    /// `None` when there are no values.
    pub fn from_values(values: impl IntoIterator<Item = f64>) -> Option<Self> {
        let mut count = 0usize;
        let mut sum = 0.0;
        let mut max = f64::NEG_INFINITY;
        for value in values {
            count += 1;
            sum += value;
            max = max.max(value);
        }
        (count > 0).then(|| Self {
            mean: sum / count as f64,
            max,
        })
    }
}

/// Aggregates over a time window. Metrics never reported are `null`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReadingStats {
    pub count: usize,
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
    pub temperature: Option<MetricStats>,
    pub co2: Option<MetricStats>,
    pub noise_db: Option<MetricStats>,
    pub light_lux: Option<MetricStats>,
}

impl ReadingStats {
    pub fn from_readings(readings: &[StoredReading], range: TimeRange) -> Self {
        Self {
            count: readings.len(),
            start: range.start,
            end: range.end,
            temperature: MetricStats::from_values(readings.iter().map(|r| r.temperature)),
            co2: MetricStats::from_values(readings.iter().filter_map(|r| r.co2.map(f64::from))),
            noise_db: MetricStats::from_values(readings.iter().filter_map(|r| r.noise_db)),
            light_lux: MetricStats::from_values(readings.iter().filter_map(|r| r.light_lux)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_missing_fields_default() {
        let reading: NewReading = serde_json::from_str(r#"{"temperature": 21.5}"#).unwrap();
        assert_eq!(reading.co2, None);
        assert_eq!(reading.timestamp, None);

        let now = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let stored = StoredReading::from_new(reading, now);
        assert_eq!(stored.timestamp, now);
    }

    #[test]
    fn test_time_range() {
        let t = |h| Utc.with_ymd_and_hms(2024, 5, 1, h, 0, 0).unwrap();
        let range = TimeRange::new(Some(t(10)), Some(t(12)));

        assert!(range.contains(t(10)));
        assert!(range.contains(t(12)));
        assert!(!range.contains(t(13)));
        assert!(!range.is_inverted());
        assert!(TimeRange::new(Some(t(12)), Some(t(10))).is_inverted());
        assert!(TimeRange::default().contains(t(0)));
    }

    #[test]
    fn test_metric_stats() {
        let stats = MetricStats::from_values([1.0, 2.0, 6.0]).unwrap();
        assert_eq!(stats.mean, 3.0);
        assert_eq!(stats.max, 6.0);
        assert!(MetricStats::from_values(std::iter::empty()).is_none());
    }
}
