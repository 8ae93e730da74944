//! CSV loader for bikeshare trip files.
//!
//! Reads one city's file, parses the start and end timestamps, derives the
//! calendar fields used for filtering and applies the month/day selection.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result, bail};
use chrono::{Datelike, NaiveDateTime, Weekday};
use csv::StringRecord;
use serde::Deserialize;
use tracing::{debug, info};

use crate::filters::{DayFilter, MonthFilter, Selection};

const REQUIRED_COLUMNS: [&str; 5] = [
    "Start Time",
    "End Time",
    "Start Station",
    "End Station",
    "User Type",
];
const GENDER_COLUMN: &str = "Gender";
const BIRTH_YEAR_COLUMN: &str = "Birth Year";

const TIMESTAMP_FORMATS: [&str; 5] = [
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
];

/// Columns as they appear in the city files.
#[derive(Debug, Deserialize)]
struct TripRow {
    #[serde(rename = "Start Time")]
    start_time: String,
    #[serde(rename = "End Time")]
    end_time: String,
    #[serde(rename = "Start Station")]
    start_station: String,
    #[serde(rename = "End Station")]
    end_station: String,
    #[serde(rename = "User Type", default)]
    user_type: Option<String>,
    #[serde(rename = "Gender", default)]
    gender: Option<String>,
    #[serde(rename = "Birth Year", default)]
    birth_year: Option<String>,
}

/// One bike trip with its derived calendar fields.
#[derive(Debug, Clone)]
pub struct Trip {
    pub start_time: NaiveDateTime,
    pub end_time: NaiveDateTime,
    pub start_station: String,
    pub end_station: String,
    pub user_type: Option<String>,
    pub gender: Option<String>,
    /// Left as text; the user aggregator decides how to read it.
    pub birth_year: Option<String>,
    pub month: u32,
    pub day_of_week: Weekday,
    /// The untouched CSV row, shown when the user pages through raw data.
    pub raw: StringRecord,
}

/// Trips for one city in file order.
#[derive(Debug, Clone)]
pub struct Dataset {
    pub headers: StringRecord,
    pub trips: Vec<Trip>,
    pub has_gender: bool,
    pub has_birth_year: bool,
}

impl Dataset {
    /// Parses a whole CSV document.
    ///
    /// # Errors
    ///
    /// Fails when a required column is missing, a row is malformed or a
    /// timestamp cannot be parsed.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut rdr = csv::Reader::from_reader(reader);
        let headers = rdr.headers().context("reading CSV headers")?.clone();

        for column in REQUIRED_COLUMNS {
            if !headers.iter().any(|h| h == column) {
                bail!("CSV missing '{column}' column");
            }
        }
        let has_gender = headers.iter().any(|h| h == GENDER_COLUMN);
        let has_birth_year = headers.iter().any(|h| h == BIRTH_YEAR_COLUMN);

        let mut trips = Vec::new();
        for (idx, result) in rdr.records().enumerate() {
            let row_no = idx + 1;
            let record = result.with_context(|| format!("CSV row {row_no}"))?;
            let row: TripRow = record
                .deserialize(Some(&headers))
                .with_context(|| format!("CSV row {row_no}"))?;

            let start_time = parse_timestamp(&row.start_time)
                .with_context(|| format!("CSV row {row_no}: bad Start Time"))?;
            let end_time = parse_timestamp(&row.end_time)
                .with_context(|| format!("CSV row {row_no}: bad End Time"))?;

            trips.push(Trip {
                start_time,
                end_time,
                start_station: row.start_station,
                end_station: row.end_station,
                user_type: row.user_type,
                gender: row.gender,
                birth_year: row.birth_year,
                month: start_time.month(),
                day_of_week: start_time.weekday(),
                raw: record,
            });
        }

        debug!(rows = trips.len(), has_gender, has_birth_year, "CSV parsed");

        Ok(Self {
            headers,
            trips,
            has_gender,
            has_birth_year,
        })
    }

    /// Returns a new dataset holding only the trips that match both filters.
    pub fn filter(&self, month: MonthFilter, day: DayFilter) -> Dataset {
        let trips = self
            .trips
            .iter()
            .filter(|t| match month {
                MonthFilter::All => true,
                MonthFilter::Month(m) => t.month == m,
            })
            .filter(|t| match day {
                DayFilter::All => true,
                DayFilter::Day(d) => t.day_of_week == d,
            })
            .cloned()
            .collect();

        Dataset {
            headers: self.headers.clone(),
            trips,
            has_gender: self.has_gender,
            has_birth_year: self.has_birth_year,
        }
    }

    pub fn len(&self) -> usize {
        self.trips.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trips.is_empty()
    }
}

/// Loads the selected city's file from `data_dir` and applies the selection's filters.
#[tracing::instrument(skip(data_dir, selection), fields(city = %selection.city, month = %selection.month, day = %selection.day))]
pub fn load_data(data_dir: &Path, selection: &Selection) -> Result<Dataset> {
    let path = data_dir.join(selection.city.file_name());
    let file =
        File::open(&path).with_context(|| format!("opening trip data {}", path.display()))?;

    let dataset =
        Dataset::from_reader(file).with_context(|| format!("loading {}", path.display()))?;
    let filtered = dataset.filter(selection.month, selection.day);

    info!(
        total = dataset.len(),
        kept = filtered.len(),
        "Trip data loaded"
    );
    Ok(filtered)
}

/// Parses a trip timestamp in any of the layouts seen in the city files.
pub fn parse_timestamp(value: &str) -> Result<NaiveDateTime> {
    let value = value.trim();
    TIMESTAMP_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
        .with_context(|| format!("unrecognised timestamp '{value}'"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    const SAMPLE: &str = "\
,Start Time,End Time,Trip Duration,Start Station,End Station,User Type,Gender,Birth Year
1,2017-01-01 00:07:57,2017-01-01 00:20:53,776,Canal St,Clark St,Subscriber,Male,1992.0
2,2017-01-02 08:00:00,2017-01-02 08:10:00,600,Canal St,State St,Customer,,
3,2017-02-06 17:30:00,2017-02-06 17:45:00,900,State St,Canal St,Subscriber,Female,1985.0
";

    #[test]
    fn test_from_reader_parses_rows_and_derives_fields() {
        let ds = Dataset::from_reader(SAMPLE.as_bytes()).unwrap();

        assert_eq!(ds.len(), 3);
        assert!(ds.has_gender);
        assert!(ds.has_birth_year);

        let first = &ds.trips[0];
        assert_eq!(first.start_station, "Canal St");
        assert_eq!(first.month, 1);
        assert_eq!(first.day_of_week, Weekday::Sun);
        assert_eq!(first.start_time.hour(), 0);
        assert_eq!(first.birth_year.as_deref(), Some("1992.0"));
        assert_eq!(first.raw.get(0), Some("1"));
    }

    #[test]
    fn test_blank_optional_cells_are_none() {
        let ds = Dataset::from_reader(SAMPLE.as_bytes()).unwrap();
        assert_eq!(ds.trips[1].gender, None);
        assert_eq!(ds.trips[1].birth_year, None);
    }

    #[test]
    fn test_missing_optional_columns() {
        let csv = "\
Start Time,End Time,Start Station,End Station,User Type
2017-03-01 10:00:00,2017-03-01 10:05:00,A,B,Subscriber
";
        let ds = Dataset::from_reader(csv.as_bytes()).unwrap();
        assert!(!ds.has_gender);
        assert!(!ds.has_birth_year);
        assert_eq!(ds.trips[0].birth_year, None);
    }

    #[test]
    fn test_missing_required_column_fails() {
        let csv = "Start Time,Start Station,End Station,User Type\n";
        let err = Dataset::from_reader(csv.as_bytes()).unwrap_err();
        assert!(err.to_string().contains("End Time"));
    }

    #[test]
    fn test_bad_timestamp_fails_with_row_number() {
        let csv = "\
Start Time,End Time,Start Station,End Station,User Type
2017-03-01 10:00:00,2017-03-01 10:05:00,A,B,Subscriber
yesterday,2017-03-01 10:05:00,A,B,Subscriber
";
        let err = Dataset::from_reader(csv.as_bytes()).unwrap_err();
        assert!(format!("{err:#}").contains("CSV row 2"));
    }

    #[test]
    fn test_filter_by_month() {
        let ds = Dataset::from_reader(SAMPLE.as_bytes()).unwrap();
        let jan = ds.filter(MonthFilter::Month(1), DayFilter::All);
        let feb = ds.filter(MonthFilter::Month(2), DayFilter::All);

        assert_eq!(jan.len(), 2);
        assert_eq!(feb.len(), 1);
        assert!(jan.trips.iter().all(|t| t.month == 1));
        // source untouched
        assert_eq!(ds.len(), 3);
    }

    #[test]
    fn test_filter_by_day() {
        let ds = Dataset::from_reader(SAMPLE.as_bytes()).unwrap();
        let mondays = ds.filter(MonthFilter::All, DayFilter::Day(Weekday::Mon));
        assert_eq!(mondays.len(), 2);
        assert!(mondays.trips.iter().all(|t| t.day_of_week == Weekday::Mon));

        let jan_mondays = ds.filter(MonthFilter::Month(1), DayFilter::Day(Weekday::Mon));
        assert_eq!(jan_mondays.len(), 1);
    }

    #[test]
    fn test_parse_timestamp_layouts() {
        assert!(parse_timestamp("2017-06-23 15:09:32").is_ok());
        assert!(parse_timestamp("2017-06-23 15:09:32.123").is_ok());
        assert!(parse_timestamp("2017-06-23T15:09:32").is_ok());
        assert!(parse_timestamp("6/23/2017 15:09").is_ok());
        assert!(parse_timestamp("not a date").is_err());
    }
}
