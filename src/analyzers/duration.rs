use chrono::TimeDelta;

use crate::analyzers::types::DurationStats;
use crate::analyzers::utility::mean_duration;
use crate::loader::Dataset;

/// Total and mean trip duration, where each trip lasts `end - start`.
///
/// Negative or zero durations are summed as they are.
pub fn duration_stats(dataset: &Dataset) -> DurationStats {
    let total = dataset
        .trips
        .iter()
        .map(|t| t.end_time - t.start_time)
        .fold(TimeDelta::zero(), |acc, d| acc + d);

    DurationStats {
        trips: dataset.len(),
        total,
        mean: mean_duration(total, dataset.len()),
    }
}
