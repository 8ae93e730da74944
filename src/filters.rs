//! Filter selections accepted by the interactive prompts.
//!
//! Every value is parsed case-insensitively against a fixed enumeration;
//! anything else is rejected so the caller can ask again.

use std::fmt;
use std::str::FromStr;

use anyhow::{Result, bail};
use chrono::Weekday;

/// Months that have trip data, in calendar order.
pub const MONTHS: [&str; 6] = ["january", "february", "march", "april", "may", "june"];

/// Weekday names in the order chrono numbers them from Monday.
pub const DAYS: [&str; 7] = [
    "monday",
    "tuesday",
    "wednesday",
    "thursday",
    "friday",
    "saturday",
    "sunday",
];

/// A city with a bundled trip file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum City {
    Chicago,
    NewYorkCity,
    Washington,
}

impl City {
    pub const ALL: [City; 3] = [City::Chicago, City::NewYorkCity, City::Washington];

    /// Lower-case name as typed at the prompt.
    pub fn name(self) -> &'static str {
        match self {
            City::Chicago => "chicago",
            City::NewYorkCity => "new york city",
            City::Washington => "washington",
        }
    }

    /// CSV file holding this city's trips.
    pub fn file_name(self) -> &'static str {
        match self {
            City::Chicago => "chicago.csv",
            City::NewYorkCity => "new_york_city.csv",
            City::Washington => "washington.csv",
        }
    }
}

impl FromStr for City {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().to_lowercase();
        match City::ALL.into_iter().find(|c| c.name() == wanted) {
            Some(city) => Ok(city),
            None => bail!("unknown city '{wanted}'"),
        }
    }
}

impl fmt::Display for City {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Month restriction: everything, or a single month between january and june.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonthFilter {
    All,
    /// 1-based month number, always within `1..=6`.
    Month(u32),
}

impl FromStr for MonthFilter {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().to_lowercase();
        if wanted == "all" {
            return Ok(MonthFilter::All);
        }
        match MONTHS.iter().position(|m| *m == wanted) {
            Some(idx) => Ok(MonthFilter::Month(idx as u32 + 1)),
            None => bail!("unknown month '{wanted}'"),
        }
    }
}

impl fmt::Display for MonthFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MonthFilter::All => f.write_str("all"),
            MonthFilter::Month(m) => f.write_str(month_name(*m).unwrap_or("?")),
        }
    }
}

/// Weekday restriction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayFilter {
    All,
    Day(Weekday),
}

impl FromStr for DayFilter {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().to_lowercase();
        if wanted == "all" {
            return Ok(DayFilter::All);
        }
        match DAYS.iter().position(|d| *d == wanted) {
            Some(idx) => Ok(DayFilter::Day(weekday_from_monday(idx))),
            None => bail!("unknown day '{wanted}'"),
        }
    }
}

impl fmt::Display for DayFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DayFilter::All => f.write_str("all"),
            DayFilter::Day(d) => f.write_str(weekday_name(*d)),
        }
    }
}

/// What the user asked to look at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    pub city: City,
    pub month: MonthFilter,
    pub day: DayFilter,
}

/// Title-case weekday name, e.g. `"Monday"`.
pub fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

/// Title-case month name for any calendar month.
pub fn month_name(month: u32) -> Option<&'static str> {
    const NAMES: [&str; 12] = [
        "January",
        "February",
        "March",
        "April",
        "May",
        "June",
        "July",
        "August",
        "September",
        "October",
        "November",
        "December",
    ];
    NAMES.get(month.checked_sub(1)? as usize).copied()
}

fn weekday_from_monday(idx: usize) -> Weekday {
    match idx {
        0 => Weekday::Mon,
        1 => Weekday::Tue,
        2 => Weekday::Wed,
        3 => Weekday::Thu,
        4 => Weekday::Fri,
        5 => Weekday::Sat,
        _ => Weekday::Sun,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_city_parse_is_case_insensitive() {
        assert_eq!("Chicago".parse::<City>().unwrap(), City::Chicago);
        assert_eq!("NEW YORK CITY".parse::<City>().unwrap(), City::NewYorkCity);
        assert_eq!(" washington ".parse::<City>().unwrap(), City::Washington);
    }

    #[test]
    fn test_city_rejects_unknown() {
        assert!("boston".parse::<City>().is_err());
        assert!("".parse::<City>().is_err());
    }

    #[test]
    fn test_city_file_names() {
        assert_eq!(City::Chicago.file_name(), "chicago.csv");
        assert_eq!(City::NewYorkCity.file_name(), "new_york_city.csv");
        assert_eq!(City::Washington.file_name(), "washington.csv");
    }

    #[test]
    fn test_month_filter_parse() {
        assert_eq!("all".parse::<MonthFilter>().unwrap(), MonthFilter::All);
        assert_eq!("January".parse::<MonthFilter>().unwrap(), MonthFilter::Month(1));
        assert_eq!("june".parse::<MonthFilter>().unwrap(), MonthFilter::Month(6));
    }

    #[test]
    fn test_month_filter_rejects_second_half_of_year() {
        assert!("july".parse::<MonthFilter>().is_err());
        assert!("december".parse::<MonthFilter>().is_err());
        assert!("1".parse::<MonthFilter>().is_err());
    }

    #[test]
    fn test_day_filter_parse() {
        assert_eq!("ALL".parse::<DayFilter>().unwrap(), DayFilter::All);
        assert_eq!(
            "monday".parse::<DayFilter>().unwrap(),
            DayFilter::Day(Weekday::Mon)
        );
        assert_eq!(
            "SuNdAy".parse::<DayFilter>().unwrap(),
            DayFilter::Day(Weekday::Sun)
        );
        assert!("funday".parse::<DayFilter>().is_err());
    }

    #[test]
    fn test_display_uses_title_case() {
        assert_eq!(DayFilter::Day(Weekday::Wed).to_string(), "Wednesday");
        assert_eq!(MonthFilter::Month(3).to_string(), "March");
        assert_eq!(MonthFilter::All.to_string(), "all");
    }

    #[test]
    fn test_month_name_bounds() {
        assert_eq!(month_name(0), None);
        assert_eq!(month_name(12), Some("December"));
        assert_eq!(month_name(13), None);
    }
}
