//! Daily generation-mix summaries.

use std::collections::BTreeMap;

use chrono::{Days, NaiveDate};
use tracing::{debug, trace};

use crate::fuel::FuelType;
use crate::model::{DailyMixSummary, FuelAverage, GenerationInterval, round2};

/// Running mean of one fuel's percentage.
#[derive(Debug, Default, Clone, Copy)]
struct MeanAccumulator {
    sum: f64,
    count: u32,
}

impl MeanAccumulator {
    fn push(&mut self, value: f64) {
        self.sum += value;
        self.count += 1;
    }

    fn mean(self) -> f64 {
        self.sum / f64::from(self.count)
    }
}

/// Summarizes the feed into one record per calendar day, oldest first.
///
/// Intervals are assigned to the date of their start timestamp in their own
/// offset. Intervals starting before `today` are dropped: a feed requested from
/// midnight usually leads with yesterday's 23:30–00:00 slot. Dates on or after
/// `today + horizon_days` are dropped as well.
///
/// A fuel's daily mean only counts the intervals that report it. The clean
/// percentage sums the unrounded means of clean fuels, treating absent ones as
/// zero.
///
/// # Arguments
///
/// * `intervals` - Feed intervals, in any order
/// * `horizon_days` - Number of days, starting with `today`, to report
/// * `today` - First calendar date to report
///
/// # Returns
///
/// Summaries in ascending date order; empty if nothing falls in the horizon.
pub fn summarize_days(
    intervals: &[GenerationInterval],
    horizon_days: u32,
    today: NaiveDate,
) -> Vec<DailyMixSummary> {
    let end = today.checked_add_days(Days::new(u64::from(horizon_days)));
    let mut days: BTreeMap<NaiveDate, BTreeMap<FuelType, MeanAccumulator>> = BTreeMap::new();

    for interval in intervals {
        let date = interval.from.date_naive();
        if date < today || end.is_some_and(|end| date >= end) {
            trace!(from = %interval.from, "Skipping interval outside the day horizon");
            continue;
        }
        let fuels = days.entry(date).or_default();
        for share in &interval.generation_mix {
            fuels.entry(share.fuel).or_default().push(share.percentage);
        }
    }

    debug!(days = days.len(), intervals = intervals.len(), "Grouped intervals by day");
    days.into_iter()
        .map(|(date, fuels)| summarize_day(date, &fuels))
        .collect()
}

fn summarize_day(date: NaiveDate, fuels: &BTreeMap<FuelType, MeanAccumulator>) -> DailyMixSummary {
    let mut means: Vec<(FuelType, f64)> = fuels.iter().map(|(&fuel, acc)| (fuel, acc.mean())).collect();

    let clean: f64 = means
        .iter()
        .filter(|(fuel, _)| fuel.is_clean())
        .map(|(_, mean)| mean)
        .sum();

    // Stable, so equal means stay in fuel declaration order.
    means.sort_by(|a, b| b.1.total_cmp(&a.1));

    DailyMixSummary {
        date,
        metrics: means
            .into_iter()
            .map(|(fuel, mean)| FuelAverage {
                fuel,
                percentage: round2(mean),
            })
            .collect(),
        clean_energy_percentage: round2(clean),
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::model::FuelShare;
    use crate::timestamp::parse_timestamp;

    fn interval(from: &str, to: &str, mix: &[(FuelType, f64)]) -> GenerationInterval {
        GenerationInterval {
            from: parse_timestamp(from).unwrap(),
            to: parse_timestamp(to).unwrap(),
            generation_mix: mix
                .iter()
                .map(|&(fuel, percentage)| FuelShare { fuel, percentage })
                .collect(),
        }
    }

    fn date(raw: &str) -> NaiveDate {
        raw.parse().unwrap()
    }

    #[test]
    fn averages_two_intervals_of_one_day() {
        let intervals = vec![
            interval(
                "2025-12-19T00:00+01:00",
                "2025-12-19T00:30+01:00",
                &[(FuelType::Wind, 60.0), (FuelType::Gas, 40.0)],
            ),
            interval(
                "2025-12-19T00:30+01:00",
                "2025-12-19T01:00+01:00",
                &[(FuelType::Wind, 80.0), (FuelType::Gas, 20.0)],
            ),
        ];

        let days = summarize_days(&intervals, 3, date("2025-12-19"));

        assert_eq!(days.len(), 1);
        assert_eq!(days[0].date, date("2025-12-19"));
        assert_eq!(
            days[0].metrics,
            vec![
                FuelAverage { fuel: FuelType::Wind, percentage: 70.0 },
                FuelAverage { fuel: FuelType::Gas, percentage: 30.0 },
            ]
        );
        assert_eq!(days[0].clean_energy_percentage, 70.0);
    }

    #[test]
    fn drops_intervals_from_before_today() {
        let intervals = vec![
            interval("2025-12-18T23:30Z", "2025-12-19T00:00Z", &[(FuelType::Coal, 100.0)]),
            interval("2025-12-19T00:00Z", "2025-12-19T00:30Z", &[(FuelType::Wind, 50.0)]),
            interval("2025-12-19T00:30Z", "2025-12-19T01:00Z", &[(FuelType::Wind, 70.0)]),
        ];

        let days = summarize_days(&intervals, 3, date("2025-12-19"));

        assert_eq!(days.len(), 1);
        assert_eq!(days[0].date, date("2025-12-19"));
        assert!(days[0].metrics.iter().all(|m| m.fuel != FuelType::Coal));
        assert_eq!(days[0].clean_energy_percentage, 60.0);
    }

    #[test]
    fn uses_the_intervals_own_offset_for_the_date() {
        // 23:30Z on the 18th is already the 19th at +01:00.
        let intervals = vec![interval(
            "2025-12-19T00:30+01:00",
            "2025-12-19T01:00+01:00",
            &[(FuelType::Solar, 10.0)],
        )];
        let days = summarize_days(&intervals, 1, date("2025-12-19"));
        assert_eq!(days.len(), 1);
    }

    #[test]
    fn groups_days_in_ascending_order() {
        let intervals = vec![
            interval("2025-12-21T00:00Z", "2025-12-21T00:30Z", &[(FuelType::Wind, 10.0)]),
            interval("2025-12-19T00:00Z", "2025-12-19T00:30Z", &[(FuelType::Wind, 30.0)]),
            interval("2025-12-20T12:00Z", "2025-12-20T12:30Z", &[(FuelType::Wind, 20.0)]),
        ];

        let days = summarize_days(&intervals, 3, date("2025-12-19"));

        let dates: Vec<NaiveDate> = days.iter().map(|d| d.date).collect();
        assert_eq!(dates, vec![date("2025-12-19"), date("2025-12-20"), date("2025-12-21")]);
    }

    #[test]
    fn drops_dates_past_the_horizon() {
        let intervals = vec![
            interval("2025-12-19T23:30Z", "2025-12-20T00:00Z", &[(FuelType::Wind, 10.0)]),
            interval("2025-12-20T00:00Z", "2025-12-20T00:30Z", &[(FuelType::Wind, 30.0)]),
        ];
        let days = summarize_days(&intervals, 1, date("2025-12-19"));
        assert_eq!(days.len(), 1);
        assert!(summarize_days(&intervals, 0, date("2025-12-19")).is_empty());
    }

    #[test]
    fn absent_fuel_is_not_averaged_as_zero() {
        let intervals = vec![
            interval(
                "2025-12-19T00:00Z",
                "2025-12-19T00:30Z",
                &[(FuelType::Nuclear, 20.0), (FuelType::Gas, 80.0)],
            ),
            interval("2025-12-19T00:30Z", "2025-12-19T01:00Z", &[(FuelType::Gas, 100.0)]),
        ];

        let days = summarize_days(&intervals, 3, date("2025-12-19"));

        let nuclear = days[0].metrics.iter().find(|m| m.fuel == FuelType::Nuclear);
        assert_eq!(nuclear.map(|m| m.percentage), Some(20.0));
        assert_eq!(days[0].clean_energy_percentage, 20.0);
    }

    #[test]
    fn ties_keep_fuel_declaration_order() {
        let intervals = vec![interval(
            "2025-12-19T00:00Z",
            "2025-12-19T00:30Z",
            &[(FuelType::Solar, 25.0), (FuelType::Gas, 25.0), (FuelType::Wind, 50.0)],
        )];

        let days = summarize_days(&intervals, 3, date("2025-12-19"));

        let order: Vec<FuelType> = days[0].metrics.iter().map(|m| m.fuel).collect();
        assert_eq!(order, vec![FuelType::Wind, FuelType::Gas, FuelType::Solar]);
    }

    #[test]
    fn clean_percentage_is_rounded_after_summing() {
        let mix = [(FuelType::Wind, 100.0 / 3.0), (FuelType::Hydro, 100.0 / 3.0)];
        let intervals = vec![interval("2025-12-19T00:00Z", "2025-12-19T00:30Z", &mix)];

        let days = summarize_days(&intervals, 3, date("2025-12-19"));

        assert_eq!(days[0].clean_energy_percentage, 66.67);
        assert_relative_eq!(days[0].metrics[0].percentage, 33.33);
    }

    #[test]
    fn empty_after_filtering_is_empty() {
        let intervals = vec![interval("2025-12-18T12:00Z", "2025-12-18T12:30Z", &[(FuelType::Wind, 50.0)])];
        assert!(summarize_days(&intervals, 3, date("2025-12-19")).is_empty());
        assert!(summarize_days(&[], 3, date("2025-12-19")).is_empty());
    }

    #[test]
    fn summarizing_twice_gives_the_same_result() {
        let intervals = vec![
            interval("2025-12-19T00:00Z", "2025-12-19T00:30Z", &[(FuelType::Wind, 61.3), (FuelType::Gas, 38.7)]),
            interval("2025-12-20T00:00Z", "2025-12-20T00:30Z", &[(FuelType::Biomass, 12.0), (FuelType::Imports, 8.0)]),
        ];
        let first = summarize_days(&intervals, 3, date("2025-12-19"));
        let second = summarize_days(&intervals, 3, date("2025-12-19"));
        assert_eq!(first, second);
    }
}
