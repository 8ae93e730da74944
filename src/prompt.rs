//! Interactive driver: asks for a selection, prints every report, offers raw
//! rows and loops until the user declines to restart.

use std::io::{BufRead, Write};
use std::path::Path;
use std::str::FromStr;
use std::time::Instant;

use anyhow::{Result, bail};
use tracing::{debug, info};

use crate::analyzers::{duration_stats, station_stats, time_stats, user_stats};
use crate::filters::{City, DayFilter, MonthFilter, Selection};
use crate::loader::{Dataset, load_data};
use crate::output::{
    RAW_PAGE_SIZE, SEPARATOR, render_duration_stats, render_raw_page, render_station_stats,
    render_time_stats, render_user_stats, write_elapsed, write_heading,
};

const CITY_PROMPT: &str =
    "Which city do you want to analyze? Please choose from Chicago, New York City and Washington: ";
const MONTH_PROMPT: &str = "Please select which month (all, january, february, ... , june): ";
const DAY_PROMPT: &str = "Please select which day of week (all, monday, tuesday, ... sunday): ";

/// One interactive session bound to an input and an output stream.
pub struct Session<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Session<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Consumes the session and hands back the output stream.
    pub fn into_output(self) -> W {
        self.output
    }

    /// Runs explore → report → raw rows → restart until the user stops.
    pub fn run(&mut self, data_dir: &Path) -> Result<()> {
        writeln!(self.output, "Hello! Let's explore some US bikeshare data!")?;
        loop {
            let selection = self.ask_selection()?;
            let dataset = load_data(data_dir, &selection)?;

            self.print_statistics(&dataset)?;
            self.page_raw_data(&dataset)?;

            if !self.ask_yes("Would you like to restart? Enter yes or no.")? {
                info!("Session finished");
                return Ok(());
            }
        }
    }

    /// Asks for city, month and day, in that order.
    pub fn ask_selection(&mut self) -> Result<Selection> {
        let city: City = self.ask_until_valid(CITY_PROMPT)?;
        let month: MonthFilter = self.ask_until_valid(MONTH_PROMPT)?;
        let day: DayFilter = self.ask_until_valid(DAY_PROMPT)?;
        writeln!(self.output, "{SEPARATOR}")?;

        let selection = Selection { city, month, day };
        info!(city = %city, month = %month, day = %day, "Filters selected");
        Ok(selection)
    }

    /// Prints the four reports in order, each timed from computation to print.
    pub fn print_statistics(&mut self, dataset: &Dataset) -> Result<()> {
        const TIME: &str = "Calculating The Most Frequent Times of Travel...";
        const STATION: &str = "Calculating The Most Popular Stations and Trip...";
        const DURATION: &str = "Calculating Trip Duration...";
        const USER: &str = "Calculating User Stats...";

        write_heading(&mut self.output, TIME)?;
        let started = Instant::now();
        render_time_stats(&mut self.output, &time_stats(dataset))?;
        write_elapsed(&mut self.output, TIME, started.elapsed())?;

        write_heading(&mut self.output, STATION)?;
        let started = Instant::now();
        render_station_stats(&mut self.output, &station_stats(dataset))?;
        write_elapsed(&mut self.output, STATION, started.elapsed())?;

        write_heading(&mut self.output, DURATION)?;
        let started = Instant::now();
        render_duration_stats(&mut self.output, &duration_stats(dataset))?;
        write_elapsed(&mut self.output, DURATION, started.elapsed())?;

        write_heading(&mut self.output, USER)?;
        let started = Instant::now();
        render_user_stats(&mut self.output, &user_stats(dataset))?;
        write_elapsed(&mut self.output, USER, started.elapsed())?;

        Ok(())
    }

    /// Shows raw rows a page at a time for as long as the user says yes.
    pub fn page_raw_data(&mut self, dataset: &Dataset) -> Result<()> {
        let mut start = 0;
        let mut question = "Do you want to see the raw data? Enter yes or no.";

        while self.ask_yes(question)? {
            match render_raw_page(dataset, start)? {
                Some(page) => write!(self.output, "{page}")?,
                None => {
                    writeln!(self.output, "\nNo more rows to show.")?;
                    break;
                }
            }
            start += RAW_PAGE_SIZE;
            question = "Do you want to see more data? Enter yes or no.";
        }
        Ok(())
    }

    fn ask_until_valid<T: FromStr>(&mut self, prompt: &str) -> Result<T> {
        loop {
            let answer = self.ask(prompt)?;
            match answer.parse::<T>() {
                Ok(value) => return Ok(value),
                Err(_) => {
                    debug!(answer = %answer, "Rejected input");
                    writeln!(self.output, "\n{answer} does not exist in the database.")?;
                }
            }
        }
    }

    fn ask_yes(&mut self, question: &str) -> Result<bool> {
        Ok(self.ask(&format!("{question}\n"))? == "yes")
    }

    /// Prints `prompt` and returns the trimmed, lower-cased reply.
    fn ask(&mut self, prompt: &str) -> Result<String> {
        write!(self.output, "\n{prompt}")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            bail!("input closed before an answer was given");
        }
        Ok(line.trim().to_lowercase())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Weekday;
    use std::io::Cursor;

    fn session(input: &str) -> Session<Cursor<Vec<u8>>, Vec<u8>> {
        Session::new(Cursor::new(input.as_bytes().to_vec()), Vec::new())
    }

    #[test]
    fn test_ask_selection() {
        let mut s = session("Chicago\nMarch\nFriday\n");
        let selection = s.ask_selection().unwrap();
        assert_eq!(
            selection,
            Selection {
                city: City::Chicago,
                month: MonthFilter::Month(3),
                day: DayFilter::Day(Weekday::Fri),
            }
        );
    }

    #[test]
    fn test_invalid_city_is_reprompted() {
        let mut s = session("boston\nWASHINGTON\nall\nall\n");
        let selection = s.ask_selection().unwrap();
        assert_eq!(selection.city, City::Washington);

        let out = String::from_utf8(s.into_output()).unwrap();
        assert!(out.contains("boston does not exist in the database."));
        assert_eq!(out.matches(CITY_PROMPT).count(), 2);
        assert_eq!(out.matches(MONTH_PROMPT).count(), 1);
    }

    #[test]
    fn test_invalid_month_and_day_are_reprompted() {
        let mut s = session("chicago\njuly\nall\nsomeday\nsunday\n");
        let selection = s.ask_selection().unwrap();
        assert_eq!(selection.month, MonthFilter::All);
        assert_eq!(selection.day, DayFilter::Day(Weekday::Sun));

        let out = String::from_utf8(s.into_output()).unwrap();
        assert!(out.contains("july does not exist in the database."));
        assert!(out.contains("someday does not exist in the database."));
    }

    #[test]
    fn test_closed_input_is_an_error() {
        let mut s = session("boston\n");
        assert!(s.ask_selection().is_err());
    }

    fn sample_dataset(rows: usize) -> Dataset {
        let mut csv = String::from("Start Time,End Time,Start Station,End Station,User Type\n");
        for i in 0..rows {
            csv.push_str(&format!(
                "2017-01-01 09:{i:02}:00,2017-01-01 09:{:02}:00,A,B,Subscriber\n",
                i + 1
            ));
        }
        Dataset::from_reader(csv.as_bytes()).unwrap()
    }

    #[test]
    fn test_page_raw_data_stops_on_no() {
        let ds = sample_dataset(12);
        let mut s = session("yes\nYes\nno\n");
        s.page_raw_data(&ds).unwrap();

        let out = String::from_utf8(s.into_output()).unwrap();
        assert!(out.contains("09:00:00"));
        assert!(out.contains("09:09:00,2017"));
        assert!(!out.contains("09:10:00,2017"));
        assert_eq!(out.matches("see more data").count(), 2);
    }

    #[test]
    fn test_page_raw_data_runs_out_of_rows() {
        let ds = sample_dataset(3);
        let mut s = session("yes\nyes\n");
        s.page_raw_data(&ds).unwrap();

        let out = String::from_utf8(s.into_output()).unwrap();
        assert!(out.contains("No more rows to show."));
    }

    #[test]
    fn test_print_statistics_prints_all_reports() {
        let ds = sample_dataset(2);
        let mut s = session("");
        s.print_statistics(&ds).unwrap();

        let out = String::from_utf8(s.into_output()).unwrap();
        assert!(out.contains("Most Frequent Times of Travel"));
        assert!(out.contains("Most Popular Stations and Trip"));
        assert!(out.contains("Total travel time: 0 days 00:02:00"));
        assert!(out.contains("does not have info about birth year"));
        assert_eq!(out.matches("This took").count(), 4);
    }
}
