//! Booking date/time combination.
//!
//! The quote form collects a calendar date plus a 12-hour clock. Venue
//! times are timezone-naive, so the fields are read as UTC wall-clock and
//! no local offset is applied.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::CommerceError;

/// Half of the 12-hour clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Period {
    #[serde(rename = "AM")]
    Am,
    #[serde(rename = "PM")]
    Pm,
}

impl Period {
    pub fn as_str(&self) -> &'static str {
        match self {
            Period::Am => "AM",
            Period::Pm => "PM",
        }
    }
}

impl FromStr for Period {
    type Err = CommerceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "AM" => Ok(Period::Am),
            "PM" => Ok(Period::Pm),
            other => Err(CommerceError::InvalidTime(format!(
                "period must be AM or PM, got {other:?}"
            ))),
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Combine a `YYYY-MM-DD` date and a 12-hour clock reading into a UTC instant.
///
/// 12 AM is midnight and 12 PM is noon.
pub fn combine(
    date: &str,
    hour12: u32,
    minute: u32,
    period: Period,
) -> Result<DateTime<Utc>, CommerceError> {
    let day = NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d")
        .map_err(|e| CommerceError::InvalidDate(format!("{date:?}: {e}")))?;

    if !(1..=12).contains(&hour12) {
        return Err(CommerceError::InvalidTime(format!(
            "hour must be 1-12, got {hour12}"
        )));
    }
    if minute > 59 {
        return Err(CommerceError::InvalidTime(format!(
            "minute must be 0-59, got {minute}"
        )));
    }

    let hour24 = match (hour12, period) {
        (12, Period::Am) => 0,
        (12, Period::Pm) => 12,
        (h, Period::Am) => h,
        (h, Period::Pm) => h + 12,
    };

    let time = NaiveTime::from_hms_opt(hour24, minute, 0)
        .ok_or_else(|| CommerceError::InvalidTime(format!("{hour24}:{minute:02}")))?;

    Ok(day.and_time(time).and_utc())
}

/// One date/time group of the quote form, as raw strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeFields {
    pub date: String,
    pub hour: String,
    pub minute: String,
    pub period: String,
}

impl TimeFields {
    pub fn new(
        date: impl Into<String>,
        hour: impl Into<String>,
        minute: impl Into<String>,
        period: impl Into<String>,
    ) -> Self {
        Self {
            date: date.into(),
            hour: hour.into(),
            minute: minute.into(),
            period: period.into(),
        }
    }

    /// Parse every field strictly and combine.
    pub fn to_utc(&self) -> Result<DateTime<Utc>, CommerceError> {
        let hour = parse_clock(&self.hour, "hour")?;
        let minute = parse_clock(&self.minute, "minute")?;
        let period: Period = self.period.parse()?;
        combine(&self.date, hour, minute, period)
    }
}

fn parse_clock(raw: &str, what: &str) -> Result<u32, CommerceError> {
    raw.trim()
        .parse()
        .map_err(|_| CommerceError::InvalidTime(format!("{what} is not a number: {raw:?}")))
}
