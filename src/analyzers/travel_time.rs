use chrono::Timelike;

use crate::analyzers::types::TimeStats;
use crate::analyzers::utility::mode;
use crate::loader::Dataset;

/// Most common month, weekday and start hour across the dataset.
pub fn time_stats(dataset: &Dataset) -> TimeStats {
    TimeStats {
        month: mode(dataset.trips.iter().map(|t| t.month)),
        day_of_week: mode(dataset.trips.iter().map(|t| t.day_of_week)),
        start_hour: mode(dataset.trips.iter().map(|t| t.start_time.hour())),
    }
}
