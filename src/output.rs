//! Human-readable rendering of statistics reports and raw trip rows.

use std::io::Write;
use std::time::Duration;

use anyhow::Result;
use chrono::TimeDelta;
use csv::WriterBuilder;
use tracing::debug;

use crate::analyzers::types::{
    Availability, DurationStats, Popular, StationStats, TimeStats, UserStats,
};
use crate::analyzers::utility::total_nanos;
use crate::filters::{month_name, weekday_name};
use crate::loader::Dataset;

/// Printed after every report.
pub const SEPARATOR: &str = "----------------------------------------";

/// Rows shown per page of raw data.
pub const RAW_PAGE_SIZE: usize = 5;

const NO_TRIPS: &str = "no trips match the selected filters";

const NANOS_PER_DAY: i128 = 86_400 * 1_000_000_000;

/// Opens a report block.
pub fn write_heading<W: Write>(out: &mut W, heading: &str) -> Result<()> {
    writeln!(out, "\n{heading}\n")?;
    Ok(())
}

/// Closes a report block with its timing and the separator line.
pub fn write_elapsed<W: Write>(out: &mut W, heading: &str, elapsed: Duration) -> Result<()> {
    debug!(heading, elapsed_ms = elapsed.as_millis() as u64, "Report computed");
    writeln!(out, "\nThis took {} seconds.", elapsed.as_secs_f64())?;
    writeln!(out, "{SEPARATOR}")?;
    Ok(())
}

pub fn render_time_stats<W: Write>(out: &mut W, stats: &TimeStats) -> Result<()> {
    let month = stats
        .month
        .as_ref()
        .map(|p| month_name(p.value).unwrap_or("?").to_string());
    let day = stats
        .day_of_week
        .as_ref()
        .map(|p| weekday_name(p.value).to_string());
    let hour = stats.start_hour.as_ref().map(|p| format!("{:02}:00", p.value));

    writeln!(out, "The most common month: {}", or_none(month))?;
    writeln!(out, "The most common day: {}", or_none(day))?;
    writeln!(out, "The most common start hour: {}", or_none(hour))?;
    Ok(())
}

pub fn render_station_stats<W: Write>(out: &mut W, stats: &StationStats) -> Result<()> {
    writeln!(
        out,
        "The most commonly used start station: {}",
        popular(stats.start_station.as_ref(), |v| v.clone())
    )?;
    writeln!(
        out,
        "The most commonly used end station: {}",
        popular(stats.end_station.as_ref(), |v| v.clone())
    )?;
    writeln!(
        out,
        "The most frequent combination of start station and end station trip: {}",
        popular(stats.trip.as_ref(), |(from, to)| format!("{from} -> {to}"))
    )?;
    Ok(())
}

pub fn render_duration_stats<W: Write>(out: &mut W, stats: &DurationStats) -> Result<()> {
    writeln!(out, "Trips: {}", stats.trips)?;
    writeln!(out, "Total travel time: {}", format_duration(stats.total))?;
    writeln!(
        out,
        "Mean travel time: {}",
        or_none(stats.mean.map(format_duration))
    )?;
    Ok(())
}

pub fn render_user_stats<W: Write>(out: &mut W, stats: &UserStats) -> Result<()> {
    writeln!(out, "Counts of user types:")?;
    write_counts(out, &stats.user_types)?;

    match &stats.genders {
        Availability::Available(counts) => {
            writeln!(out, "Counts of gender:")?;
            write_counts(out, counts)?;
        }
        Availability::Unavailable => {
            writeln!(out, "The dataset does not have info about gender")?;
        }
    }

    match &stats.birth_years {
        Availability::Available(years) => {
            writeln!(out, "Earliest year of birth: {}", years.earliest)?;
            writeln!(out, "Most recent year of birth: {}", years.most_recent)?;
            writeln!(out, "Most common year of birth: {}", years.most_common)?;
        }
        Availability::Unavailable => {
            writeln!(out, "The dataset does not have info about birth year")?;
        }
    }
    Ok(())
}

fn write_counts<W: Write>(out: &mut W, counts: &[(String, usize)]) -> Result<()> {
    if counts.is_empty() {
        writeln!(out, "  (none)")?;
    }
    for (label, count) in counts {
        writeln!(out, "  {label}: {count}")?;
    }
    Ok(())
}

/// Formats a duration as `D days HH:MM:SS[.ffffff[fff]]`.
///
/// The fraction is printed in microseconds, or in nanoseconds when the value
/// is not a whole number of microseconds. Negative values borrow whole days,
/// so minus ten seconds is `-1 days +23:59:50`.
pub fn format_duration(d: TimeDelta) -> String {
    let total = total_nanos(d);
    let days = total.div_euclid(NANOS_PER_DAY);
    let rest = total.rem_euclid(NANOS_PER_DAY);

    let secs = rest / 1_000_000_000;
    let nanos = rest % 1_000_000_000;
    let (hours, minutes, seconds) = (secs / 3_600, secs % 3_600 / 60, secs % 60);

    let sign = if days < 0 { "+" } else { "" };
    let fraction = if nanos == 0 {
        String::new()
    } else if nanos % 1_000 == 0 {
        format!(".{:06}", nanos / 1_000)
    } else {
        format!(".{nanos:09}")
    };
    format!("{days} days {sign}{hours:02}:{minutes:02}:{seconds:02}{fraction}")
}

/// Renders rows `start..start + RAW_PAGE_SIZE` as CSV, with the derived
/// `month` and `day_of_week` columns appended.
///
/// Returns `None` once `start` is past the last row.
pub fn render_raw_page(dataset: &Dataset, start: usize) -> Result<Option<String>> {
    if start >= dataset.len() {
        return Ok(None);
    }
    let end = (start + RAW_PAGE_SIZE).min(dataset.len());

    let mut writer = WriterBuilder::new().has_headers(false).from_writer(Vec::new());

    let mut header: Vec<&str> = dataset.headers.iter().collect();
    header.extend(["month", "day_of_week"]);
    writer.write_record(&header)?;

    for trip in &dataset.trips[start..end] {
        let month = trip.month.to_string();
        let mut row: Vec<&str> = trip.raw.iter().collect();
        row.push(&month);
        row.push(weekday_name(trip.day_of_week));
        writer.write_record(&row)?;
    }

    let bytes = writer.into_inner().map_err(|e| anyhow::anyhow!("{}", e.error()))?;
    Ok(Some(String::from_utf8(bytes)?))
}

fn popular<T>(value: Option<&Popular<T>>, show: impl Fn(&T) -> String) -> String {
    match value {
        Some(p) => format!("{} ({} trips)", show(&p.value), p.count),
        None => NO_TRIPS.to_string(),
    }
}

fn or_none(value: Option<String>) -> String {
    value.unwrap_or_else(|| NO_TRIPS.to_string())
}
