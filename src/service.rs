//! Request orchestration: time range, fetch, compute.

use std::sync::Arc;

use chrono::{DateTime, FixedOffset, Local};
use tracing::{info, warn};

use crate::config::AppConfig;
use crate::error::EnergyError;
use crate::horizon::{TimeRange, generation_mix_horizon, search_horizon};
use crate::mix::summarize_days;
use crate::model::{DailyMixSummary, GenerationInterval, OptimalWindow};
use crate::source::{IntervalSource, SourceError};
use crate::window::find_best_window;

/// Shortest charging duration accepted, in hours.
pub const MIN_CHARGING_HOURS: u32 = 1;
/// Longest charging duration accepted, in hours.
pub const MAX_CHARGING_HOURS: u32 = 6;
/// Feed intervals per hour.
pub const INTERVALS_PER_HOUR: usize = 2;

/// Answers mix and charging-window requests from an injected interval source.
///
/// Holds no mutable state; share it behind an `Arc`.
pub struct EnergyService {
    source: Arc<dyn IntervalSource>,
    generation_mix_days: u32,
    search_window_hours: u32,
    clock: fn() -> DateTime<FixedOffset>,
}

fn local_now() -> DateTime<FixedOffset> {
    Local::now().fixed_offset()
}

impl EnergyService {
    /// Creates a service reading the wall clock in the local time zone.
    ///
    /// # Arguments
    ///
    /// * `source` - Where intervals are fetched from
    /// * `generation_mix_days` - Days summarized by [`Self::generation_mix`]
    /// * `search_window_hours` - Rolling horizon searched by [`Self::optimal_window`]
    pub fn new(source: Arc<dyn IntervalSource>, generation_mix_days: u32, search_window_hours: u32) -> Self {
        Self {
            source,
            generation_mix_days,
            search_window_hours,
            clock: local_now,
        }
    }

    pub fn from_config(source: Arc<dyn IntervalSource>, cfg: &AppConfig) -> Self {
        Self::new(
            source,
            cfg.generation_mix.days,
            cfg.optimization.search_window_hours,
        )
    }

    /// Replaces the clock used by the wall-clock entry points.
    #[must_use]
    pub fn with_clock(mut self, clock: fn() -> DateTime<FixedOffset>) -> Self {
        self.clock = clock;
        self
    }

    /// Daily mix summaries from today through the configured horizon.
    ///
    /// # Errors
    ///
    /// Returns `UpstreamUnavailable` if the source fails or returns nothing.
    pub async fn generation_mix(&self) -> Result<Vec<DailyMixSummary>, EnergyError> {
        self.generation_mix_at((self.clock)()).await
    }

    /// Daily mix summaries as of `now`; "today" is `now`'s date in its offset.
    ///
    /// # Errors
    ///
    /// Returns `UpstreamUnavailable` if the source fails or returns nothing.
    pub async fn generation_mix_at(&self, now: DateTime<FixedOffset>) -> Result<Vec<DailyMixSummary>, EnergyError> {
        let today = now.date_naive();
        let range = generation_mix_horizon(today, *now.offset(), self.generation_mix_days);
        let intervals = self.fetch(&range).await?;

        let summaries = summarize_days(&intervals, self.generation_mix_days, today);
        info!(%today, days = summaries.len(), "Computed generation mix");
        Ok(summaries)
    }

    /// Cleanest window of `hours` hours in the search horizon starting now.
    ///
    /// # Errors
    ///
    /// See [`Self::optimal_window_at`].
    pub async fn optimal_window(&self, hours: u32) -> Result<OptimalWindow, EnergyError> {
        self.optimal_window_at(hours, (self.clock)()).await
    }

    /// Cleanest window of `hours` hours in the search horizon starting after `now`.
    ///
    /// # Errors
    ///
    /// * `InvalidRequest` if `hours` is outside `1..=6`
    /// * `UpstreamUnavailable` if the source fails or returns nothing
    /// * `InsufficientData` if the feed is shorter than the window
    pub async fn optimal_window_at(&self, hours: u32, now: DateTime<FixedOffset>) -> Result<OptimalWindow, EnergyError> {
        validate_hours(hours)?;
        let range = search_horizon(now, self.search_window_hours);
        let intervals = self.fetch(&range).await?;

        let window = find_best_window(&intervals, window_size(hours))?;
        info!(
            hours,
            start = %window.start,
            end = %window.end,
            percentage = window.average_clean_percentage,
            "Found optimal charging window"
        );
        Ok(window)
    }

    async fn fetch(&self, range: &TimeRange) -> Result<Vec<GenerationInterval>, EnergyError> {
        let intervals = self.source.fetch_intervals(range).await.inspect_err(|e| {
            warn!(from = %range.from, to = %range.to, error = %e, "Interval fetch failed");
        })?;
        if intervals.is_empty() {
            warn!(from = %range.from, to = %range.to, "Interval source returned no data");
            return Err(SourceError::EmptyResponse.into());
        }
        Ok(intervals)
    }
}

/// Rejects charging durations outside `MIN_CHARGING_HOURS..=MAX_CHARGING_HOURS`.
///
/// # Errors
///
/// Returns `InvalidRequest` describing the accepted range.
pub fn validate_hours(hours: u32) -> Result<(), EnergyError> {
    if (MIN_CHARGING_HOURS..=MAX_CHARGING_HOURS).contains(&hours) {
        Ok(())
    } else {
        Err(EnergyError::InvalidRequest(format!(
            "number of hours must be between {MIN_CHARGING_HOURS} and {MAX_CHARGING_HOURS}, got {hours}"
        )))
    }
}

/// Window length in intervals for a charging duration in hours.
pub fn window_size(hours: u32) -> usize {
    hours as usize * INTERVALS_PER_HOUR
}
