use std::collections::HashMap;
use std::hash::Hash;

use chrono::TimeDelta;

use crate::analyzers::types::Popular;

/// Tallies values, keeping them in the order they were first seen.
pub fn value_counts<T, I>(values: I) -> Vec<(T, usize)>
where
    T: Eq + Hash + Clone,
    I: IntoIterator<Item = T>,
{
    let mut slots: HashMap<T, usize> = HashMap::new();
    let mut counts: Vec<(T, usize)> = Vec::new();

    for value in values {
        match slots.get(&value) {
            Some(&slot) => counts[slot].1 += 1,
            None => {
                slots.insert(value.clone(), counts.len());
                counts.push((value, 1));
            }
        }
    }

    counts
}

/// Same as [`value_counts`] but sorted by descending count.
///
/// The sort is stable, so equal counts stay in first-seen order.
pub fn sorted_counts<T, I>(values: I) -> Vec<(T, usize)>
where
    T: Eq + Hash + Clone,
    I: IntoIterator<Item = T>,
{
    let mut counts = value_counts(values);
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
}

/// Most frequent value. On a tie, the value seen first wins.
/// Returns `None` for empty input.
pub fn mode<T, I>(values: I) -> Option<Popular<T>>
where
    T: Eq + Hash + Clone,
    I: IntoIterator<Item = T>,
{
    let mut best: Option<(T, usize)> = None;
    for (value, count) in value_counts(values) {
        if best.as_ref().is_none_or(|(_, top)| count > *top) {
            best = Some((value, count));
        }
    }
    best.map(|(value, count)| Popular { value, count })
}

const NANOS_PER_SEC: i128 = 1_000_000_000;

/// Exact length of `d` in nanoseconds.
pub fn total_nanos(d: TimeDelta) -> i128 {
    i128::from(d.num_seconds()) * NANOS_PER_SEC + i128::from(d.subsec_nanos())
}

/// Arithmetic mean of a total spread over `n` items, to nanosecond precision.
/// Returns `None` when `n` is zero.
pub fn mean_duration(total: TimeDelta, n: usize) -> Option<TimeDelta> {
    if n == 0 {
        return None;
    }
    // |mean| <= |total|, so the seconds part always fits back into a TimeDelta.
    let mean = total_nanos(total) / n as i128;
    let secs = mean.div_euclid(NANOS_PER_SEC) as i64;
    let nanos = mean.rem_euclid(NANOS_PER_SEC) as i64;
    Some(TimeDelta::seconds(secs) + TimeDelta::nanoseconds(nanos))
}
