//! Interval records from the feed and the summaries derived from them.

use std::fmt;

use chrono::{DateTime, FixedOffset, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::fuel::FuelType;
use crate::timestamp::format_timestamp;

/// One fuel's share within one interval.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FuelShare {
    pub fuel: FuelType,
    /// Share of generation in percent. Not validated against 0..=100.
    #[serde(rename = "perc")]
    pub percentage: f64,
}

/// One fixed 30-minute sample of the generation feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationInterval {
    /// Interval start.
    #[serde(with = "crate::timestamp")]
    pub from: DateTime<FixedOffset>,
    /// Interval end.
    #[serde(with = "crate::timestamp")]
    pub to: DateTime<FixedOffset>,
    #[serde(rename = "generationmix")]
    pub generation_mix: Vec<FuelShare>,
}

/// Average share of one fuel over a calendar day.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FuelAverage {
    pub fuel: FuelType,
    /// Mean percentage, rounded to two decimals.
    pub percentage: f64,
}

/// Generation mix averaged over one calendar day.
#[derive(Debug, Clone, PartialEq)]
pub struct DailyMixSummary {
    pub date: NaiveDate,
    /// Per-fuel averages, highest share first.
    pub metrics: Vec<FuelAverage>,
    /// Sum of clean-fuel averages, rounded to two decimals.
    pub clean_energy_percentage: f64,
}

impl fmt::Display for DailyMixSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} clean={:>6.2}% |", self.date, self.clean_energy_percentage)?;
        for metric in &self.metrics {
            write!(f, " {}={:.2}", metric.fuel, metric.percentage)?;
        }
        Ok(())
    }
}

/// Best contiguous charging window found in a search horizon.
#[derive(Debug, Clone, PartialEq)]
pub struct OptimalWindow {
    /// Start of the first interval in the window.
    pub start: DateTime<FixedOffset>,
    /// End of the last interval in the window.
    pub end: DateTime<FixedOffset>,
    /// Mean clean share across the window, rounded to two decimals.
    pub average_clean_percentage: f64,
}

impl fmt::Display for OptimalWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} -> {} clean={:.2}%",
            format_timestamp(&self.start),
            format_timestamp(&self.end),
            self.average_clean_percentage
        )
    }
}

/// Rounds to two decimals, half up.
///
/// # Examples
///
/// ```
/// use clean_charge::model::round2;
///
/// assert_eq!(round2(33.335), 33.34);
/// assert_eq!(round2(100.0 / 3.0), 33.33);
/// ```
pub fn round2(value: f64) -> f64 {
    (value * 100.0 + 0.5).floor() / 100.0
}
