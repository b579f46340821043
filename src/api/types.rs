//! API request and response types.
//!
//! Field names are camelCase to match the front-end contract.

use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::fuel::FuelType;
use crate::model::{DailyMixSummary, FuelAverage, OptimalWindow};

/// One day of the generation mix.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyMixRecord {
    /// Calendar date, `YYYY-MM-DD`.
    pub date: NaiveDate,
    /// Per-fuel averages, highest share first.
    pub metrics: Vec<FuelMetric>,
    pub clean_energy_percentage: f64,
}

#[derive(Debug, Serialize)]
pub struct FuelMetric {
    pub fuel: FuelType,
    pub percentage: f64,
}

impl From<&FuelAverage> for FuelMetric {
    fn from(m: &FuelAverage) -> Self {
        Self {
            fuel: m.fuel,
            percentage: m.percentage,
        }
    }
}

impl From<&DailyMixSummary> for DailyMixRecord {
    fn from(s: &DailyMixSummary) -> Self {
        Self {
            date: s.date,
            metrics: s.metrics.iter().map(FuelMetric::from).collect(),
            clean_energy_percentage: s.clean_energy_percentage,
        }
    }
}

/// Best charging window, timestamps in the feed's own format.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OptimalWindowRecord {
    #[serde(with = "crate::timestamp")]
    pub start_date_time: DateTime<FixedOffset>,
    #[serde(with = "crate::timestamp")]
    pub end_date_time: DateTime<FixedOffset>,
    /// Mean clean share across the window.
    pub percentage: f64,
}

impl From<&OptimalWindow> for OptimalWindowRecord {
    fn from(w: &OptimalWindow) -> Self {
        Self {
            start_date_time: w.start,
            end_date_time: w.end,
            percentage: w.average_clean_percentage,
        }
    }
}

/// `POST /optimal-charging` body.
///
/// Signed so that negative input reaches validation instead of failing
/// deserialization.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChargingRequest {
    pub number_of_hours: i64,
}

/// Error body returned for every non-2xx response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    /// When the error was produced, UTC.
    pub timestamp: DateTime<Utc>,
    pub status_code: u16,
    /// Status category, e.g. `"Bad Request"`.
    pub error: String,
    /// Generic client-facing message.
    pub message: String,
}

impl ErrorResponse {
    pub fn new(status_code: u16, error: &str, message: &str) -> Self {
        Self {
            timestamp: Utc::now(),
            status_code,
            error: error.to_string(),
            message: message.to_string(),
        }
    }
}
