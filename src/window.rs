//! Search for the cleanest contiguous charging window.

use tracing::debug;

use crate::error::EnergyError;
use crate::fuel::clean_share;
use crate::model::{GenerationInterval, OptimalWindow, round2};

/// Finds the run of `window_size` consecutive intervals with the highest total
/// clean share.
///
/// Every window sum is computed from scratch so equal windows compare exactly
/// equal; the earliest of equally clean windows wins.
///
/// # Arguments
///
/// * `intervals` - Contiguous, chronologically ordered 30-minute intervals
/// * `window_size` - Window length in intervals (two per hour)
///
/// # Errors
///
/// * `InvalidRequest` if `window_size` is zero
/// * `InsufficientData` if there are fewer intervals than `window_size`
/// * `NoWindowFound` if no candidate start exists
///
/// # Examples
///
/// ```
/// use clean_charge::fuel::FuelType;
/// use clean_charge::model::{FuelShare, GenerationInterval};
/// use clean_charge::timestamp::parse_timestamp;
/// use clean_charge::window::find_best_window;
///
/// let slot = |from: &str, to: &str, wind: f64| GenerationInterval {
///     from: parse_timestamp(from).unwrap(),
///     to: parse_timestamp(to).unwrap(),
///     generation_mix: vec![FuelShare { fuel: FuelType::Wind, percentage: wind }],
/// };
/// let intervals = [
///     slot("2025-12-19T00:00Z", "2025-12-19T00:30Z", 20.0),
///     slot("2025-12-19T00:30Z", "2025-12-19T01:00Z", 60.0),
///     slot("2025-12-19T01:00Z", "2025-12-19T01:30Z", 40.0),
/// ];
///
/// let best = find_best_window(&intervals, 2).unwrap();
/// assert_eq!(best.start, intervals[1].from);
/// assert_eq!(best.average_clean_percentage, 50.0);
/// ```
pub fn find_best_window(
    intervals: &[GenerationInterval],
    window_size: usize,
) -> Result<OptimalWindow, EnergyError> {
    if window_size == 0 {
        return Err(EnergyError::InvalidRequest(
            "window must span at least one interval".to_string(),
        ));
    }
    if intervals.len() < window_size {
        return Err(EnergyError::InsufficientData {
            available: intervals.len(),
            required: window_size,
        });
    }

    let shares: Vec<f64> = intervals.iter().map(clean_share).collect();
    let best = shares
        .windows(window_size)
        .map(|window| window.iter().sum::<f64>())
        .enumerate()
        .fold(None, |best: Option<(usize, f64)>, (start, sum)| match best {
            Some((_, best_sum)) if sum <= best_sum => best,
            _ => Some((start, sum)),
        });

    let (start, sum) = best.ok_or(EnergyError::NoWindowFound)?;
    debug!(start, window_size, sum, "Selected charging window");

    Ok(OptimalWindow {
        start: intervals[start].from,
        end: intervals[start + window_size - 1].to,
        average_clean_percentage: round2(sum / window_size as f64),
    })
}
