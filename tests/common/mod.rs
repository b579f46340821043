//! Shared test fixtures for integration tests.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Duration, FixedOffset};

use clean_charge::fuel::FuelType;
use clean_charge::horizon::TimeRange;
use clean_charge::model::{FuelShare, GenerationInterval};
use clean_charge::source::{IntervalSource, SourceError};
use clean_charge::timestamp::parse_timestamp;

/// Parses a feed timestamp, panicking on malformed fixtures.
pub fn ts(raw: &str) -> DateTime<FixedOffset> {
    parse_timestamp(raw).unwrap()
}

/// One 30-minute interval starting at `from` with the given shares.
pub fn interval(from: &str, mix: &[(FuelType, f64)]) -> GenerationInterval {
    let from = ts(from);
    GenerationInterval {
        from,
        to: from + Duration::minutes(30),
        generation_mix: mix
            .iter()
            .map(|&(fuel, percentage)| FuelShare { fuel, percentage })
            .collect(),
    }
}

/// Consecutive wind/gas intervals starting at `start`, one per wind share.
pub fn wind_series(start: &str, winds: &[f64]) -> Vec<GenerationInterval> {
    let first = ts(start);
    winds
        .iter()
        .enumerate()
        .map(|(i, &wind)| {
            let from = first + Duration::minutes(30 * i as i64);
            GenerationInterval {
                from,
                to: from + Duration::minutes(30),
                generation_mix: vec![
                    FuelShare { fuel: FuelType::Wind, percentage: wind },
                    FuelShare { fuel: FuelType::Gas, percentage: 100.0 - wind },
                ],
            }
        })
        .collect()
}

/// Returns the same intervals for every range and counts calls.
pub struct FixedSource {
    intervals: Vec<GenerationInterval>,
    calls: AtomicUsize,
}

impl FixedSource {
    pub fn new(intervals: Vec<GenerationInterval>) -> Self {
        Self {
            intervals,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl IntervalSource for FixedSource {
    async fn fetch_intervals(&self, _range: &TimeRange) -> Result<Vec<GenerationInterval>, SourceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.intervals.clone())
    }
}

/// Always fails as if the feed answered with the given HTTP status.
pub struct FailingSource(pub u16);

#[async_trait]
impl IntervalSource for FailingSource {
    async fn fetch_intervals(&self, _range: &TimeRange) -> Result<Vec<GenerationInterval>, SourceError> {
        Err(SourceError::Status {
            status: self.0,
            message: "unavailable".to_string(),
        })
    }
}
