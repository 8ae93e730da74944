use anyhow::{Context, Result, bail};
use tracing::warn;

use crate::analyzers::types::{Availability, BirthYearStats, UserStats};
use crate::analyzers::utility::{mode, sorted_counts};
use crate::loader::Dataset;

/// User type breakdown plus gender and birth-year statistics where the city records them.
///
/// Never fails: a city file without the relevant column, or a birth year that
/// cannot be read, yields [`Availability::Unavailable`] for that part.
pub fn user_stats(dataset: &Dataset) -> UserStats {
    let user_types = sorted_counts(
        dataset
            .trips
            .iter()
            .filter_map(|t| t.user_type.clone()),
    );

    let genders = if dataset.has_gender {
        Availability::Available(sorted_counts(
            dataset.trips.iter().filter_map(|t| t.gender.clone()),
        ))
    } else {
        Availability::Unavailable
    };

    let birth_years = match birth_year_stats(dataset) {
        Ok(stats) => Availability::Available(stats),
        Err(e) => {
            warn!(error = %format!("{e:#}"), "Birth year statistics unavailable");
            Availability::Unavailable
        }
    };

    UserStats {
        user_types,
        genders,
        birth_years,
    }
}

fn birth_year_stats(dataset: &Dataset) -> Result<BirthYearStats> {
    if !dataset.has_birth_year {
        bail!("dataset has no Birth Year column");
    }

    let years = dataset
        .trips
        .iter()
        .filter_map(|t| t.birth_year.as_deref())
        .map(parse_birth_year)
        .collect::<Result<Vec<i32>>>()?;

    let earliest = years.iter().copied().min().context("no birth years recorded")?;
    let most_recent = years.iter().copied().max().context("no birth years recorded")?;
    let most_common = mode(years.iter().copied())
        .context("no birth years recorded")?
        .value;

    Ok(BirthYearStats {
        earliest,
        most_recent,
        most_common,
    })
}

/// Reads a year written either as an integer or as a float such as `1989.0`.
fn parse_birth_year(raw: &str) -> Result<i32> {
    let raw = raw.trim();
    if let Ok(year) = raw.parse::<i32>() {
        return Ok(year);
    }
    let value: f64 = raw
        .parse()
        .with_context(|| format!("unreadable birth year '{raw}'"))?;
    if value.fract() != 0.0 || !value.is_finite() {
        bail!("birth year '{raw}' is not a whole number");
    }
    Ok(value as i32)
}
