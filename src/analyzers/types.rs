//! Report types produced by the aggregators.

use chrono::{TimeDelta, Weekday};

/// A most-frequent value together with how many times it occurred.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Popular<T> {
    pub value: T,
    pub count: usize,
}

/// Most frequent times of travel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeStats {
    pub month: Option<Popular<u32>>,
    pub day_of_week: Option<Popular<Weekday>>,
    pub start_hour: Option<Popular<u32>>,
}

/// Most popular stations and trip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StationStats {
    pub start_station: Option<Popular<String>>,
    pub end_station: Option<Popular<String>>,
    pub trip: Option<Popular<(String, String)>>,
}

/// Total and mean travel time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DurationStats {
    pub trips: usize,
    pub total: TimeDelta,
    /// `None` when there are no trips to average.
    pub mean: Option<TimeDelta>,
}

/// Either a computed value or a marker that the dataset cannot provide it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Availability<T> {
    Available(T),
    Unavailable,
}

impl<T> Availability<T> {
    pub fn is_available(&self) -> bool {
        matches!(self, Availability::Available(_))
    }

    pub fn available(&self) -> Option<&T> {
        match self {
            Availability::Available(v) => Some(v),
            Availability::Unavailable => None,
        }
    }
}

/// Birth-year extremes and mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BirthYearStats {
    pub earliest: i32,
    pub most_recent: i32,
    pub most_common: i32,
}

/// Rider demographics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserStats {
    /// Count per user type, most frequent first.
    pub user_types: Vec<(String, usize)>,
    pub genders: Availability<Vec<(String, usize)>>,
    pub birth_years: Availability<BirthYearStats>,
}
