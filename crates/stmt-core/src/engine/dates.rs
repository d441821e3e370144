//! Date cursor: expands "DD MON" tokens to full dates across a document.

use chrono::NaiveDate;

use crate::patterns::{DATE_TOKEN, DATE_TOKEN_WITH_YEAR};

/// Tracks the calendar year and last-seen month while dates are
/// consumed in document order, so that yearless "DD MON" tokens can be
/// expanded, including the Dec→Jan rollover. State only moves forward;
/// it is never rolled back within one document.
#[derive(Debug, Clone)]
pub struct DateCursor {
    current_year: i32,
    last_month: Option<u32>,
}

impl DateCursor {
    pub fn new(start_year: i32) -> Self {
        Self {
            current_year: start_year,
            last_month: None,
        }
    }

    pub fn current_year(&self) -> i32 {
        self.current_year
    }

    /// Parse a date token of shape "DD MON" or "DD MON YYYY".
    ///
    /// Year-bearing tokens set the cursor year directly. Yearless
    /// tokens roll the year forward when the month is numerically below
    /// the last-seen month. Malformed tokens return None without
    /// touching the cursor.
    pub fn parse(&mut self, token: &str) -> Option<NaiveDate> {
        let token = token.trim();

        let (day, month, year) = if let Some(caps) = DATE_TOKEN_WITH_YEAR.captures(token) {
            let day: u32 = caps[1].parse().ok()?;
            let month = month_number(&caps[2])?;
            let year: i32 = caps[3].parse().ok()?;
            (day, month, year)
        } else if let Some(caps) = DATE_TOKEN.captures(token) {
            let day: u32 = caps[1].parse().ok()?;
            let month = month_number(&caps[2])?;
            let year = match self.last_month {
                Some(last) if month < last => self.current_year + 1,
                _ => self.current_year,
            };
            (day, month, year)
        } else {
            return None;
        };

        let date = NaiveDate::from_ymd_opt(year, month, day)?;
        self.current_year = year;
        self.last_month = Some(month);
        Some(date)
    }
}

/// Month number from the first three letters of a month name.
/// "Sept" is tolerated alongside "Sep".
fn month_number(name: &str) -> Option<u32> {
    let lower = name.to_lowercase();
    let key = if lower.starts_with("sept") { "sep" } else { lower.get(..3)? };
    match key {
        "jan" => Some(1),
        "feb" => Some(2),
        "mar" => Some(3),
        "apr" => Some(4),
        "may" => Some(5),
        "jun" => Some(6),
        "jul" => Some(7),
        "aug" => Some(8),
        "sep" => Some(9),
        "oct" => Some(10),
        "nov" => Some(11),
        "dec" => Some(12),
        _ => None,
    }
}
