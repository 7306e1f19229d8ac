//! Buckets a flat forecast into per-day summaries.

use chrono::{DateTime, NaiveDate, Utc};
use std::collections::{BTreeMap, HashMap};

use kiosk_core::{DayForecast, ForecastSample};

pub const DEFAULT_FORECAST_DAYS: usize = 4;

const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ForecastBucketer {
    days: usize,
}

impl Default for ForecastBucketer {
    fn default() -> Self {
        Self::new(DEFAULT_FORECAST_DAYS)
    }
}

impl ForecastBucketer {
    pub fn new(days: usize) -> Self {
        Self { days }
    }

    pub fn days(&self) -> usize {
        self.days
    }

    /// Summaries for the next `days` UTC dates, starting today.
    pub fn bucket(&self, samples: &[ForecastSample]) -> Vec<DayForecast> {
        self.bucket_at(samples, Utc::now().date_naive())
    }

    /// Same as [`bucket`](Self::bucket) with an explicit "today".
    pub fn bucket_at(&self, samples: &[ForecastSample], today: NaiveDate) -> Vec<DayForecast> {
        let today = today.format(DATE_FORMAT).to_string();

        // Zero-padded ISO dates sort chronologically.
        let mut buckets: BTreeMap<String, Vec<&ForecastSample>> = BTreeMap::new();
        for sample in samples {
            match date_key(sample.timestamp_seconds) {
                Some(date) => buckets.entry(date).or_default().push(sample),
                None => tracing::warn!(
                    "skipping forecast sample with out-of-range timestamp {}",
                    sample.timestamp_seconds
                ),
            }
        }

        buckets
            .into_iter()
            .filter(|(date, _)| *date >= today)
            .take(self.days)
            .filter_map(|(date, bucket)| summarize(date, &bucket))
            .collect()
    }
}

fn date_key(timestamp_seconds: i64) -> Option<String> {
    DateTime::<Utc>::from_timestamp(timestamp_seconds, 0)
        .map(|at| at.format(DATE_FORMAT).to_string())
}

fn summarize(date: String, bucket: &[&ForecastSample]) -> Option<DayForecast> {
    let first = bucket.first()?;
    let (temp_min, temp_max) = bucket.iter().fold(
        (first.temperature, first.temperature),
        |(min, max), sample| (min.min(sample.temperature), max.max(sample.temperature)),
    );
    Some(DayForecast {
        date,
        temp_min,
        temp_max,
        condition: dominant_condition(bucket),
    })
}

/// Most frequent label; on a tie the label that reached the top count first wins.
fn dominant_condition(bucket: &[&ForecastSample]) -> Option<String> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    let mut best: Option<(&str, usize)> = None;
    for sample in bucket {
        let label = sample.condition_label.as_str();
        let count = counts.entry(label).or_insert(0);
        *count += 1;
        if best.map_or(true, |(_, top)| *count > top) {
            best = Some((label, *count));
        }
    }
    best.map(|(label, _)| label.to_string())
}
