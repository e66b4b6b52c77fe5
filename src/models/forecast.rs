//! Forecast request parameters and assembled forecast data

use crate::{Result, TripcastError};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Hourly variables offered by the short-range forecast, in display order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ForecastVariable {
    Temperature,
    Showers,
    CloudCover,
}

impl ForecastVariable {
    /// Name of the variable in Open-Meteo query strings and responses
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            ForecastVariable::Temperature => "temperature_2m",
            ForecastVariable::Showers => "showers",
            ForecastVariable::CloudCover => "cloudcover",
        }
    }

    #[must_use]
    pub const fn all() -> &'static [ForecastVariable] {
        &[
            ForecastVariable::Temperature,
            ForecastVariable::Showers,
            ForecastVariable::CloudCover,
        ]
    }
}

impl fmt::Display for ForecastVariable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Number of forecast days, always within what the forecast endpoint serves
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ForecastDays(u32);

impl ForecastDays {
    pub const MIN: u32 = 1;
    pub const MAX: u32 = 16;

    pub fn new(days: u32) -> Result<Self> {
        if (Self::MIN..=Self::MAX).contains(&days) {
            Ok(Self(days))
        } else {
            Err(TripcastError::validation(format!(
                "You can choose only from {} to {} days (got {days})",
                Self::MIN,
                Self::MAX
            )))
        }
    }

    /// Parse raw prompt input such as `"5"`
    pub fn parse(input: &str) -> Result<Self> {
        let days = input.trim().parse::<u32>().map_err(|_| {
            TripcastError::validation(format!("'{}' is not a number of days", input.trim()))
        })?;
        Self::new(days)
    }

    #[must_use]
    pub fn get(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for ForecastDays {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Inclusive range of calendar dates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    #[must_use]
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// Range covering one day
    #[must_use]
    pub fn single(date: NaiveDate) -> Self {
        Self::new(date, date)
    }

    /// Start date as `YYYY-MM-DD`, the key historical series are labeled from
    #[must_use]
    pub fn key(&self) -> String {
        self.start.format("%Y-%m-%d").to_string()
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} .. {}",
            self.start.format("%Y-%m-%d"),
            self.end.format("%Y-%m-%d")
        )
    }
}

/// One named variable over time, in the order the API returned it.
///
/// A `None` value is a gap reported by the API as `null`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastSeries {
    pub label: String,
    pub points: Vec<(String, Option<f64>)>,
}

impl ForecastSeries {
    #[must_use]
    pub fn new(label: impl Into<String>, points: Vec<(String, Option<f64>)>) -> Self {
        Self {
            label: label.into(),
            points,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Smallest and largest value, ignoring gaps
    #[must_use]
    pub fn value_bounds(&self) -> Option<(f64, f64)> {
        self.points
            .iter()
            .filter_map(|(_, value)| *value)
            .fold(None, |acc, v| match acc {
                None => Some((v, v)),
                Some((min, max)) => Some((min.min(v), max.max(v))),
            })
    }
}

/// Daily aggregates for one location and one date
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetailedForecastRecord {
    pub date: NaiveDate,
    pub weather_code: Option<u8>,
    pub temperature_max: Option<f64>,
    pub temperature_min: Option<f64>,
    pub rain_sum: Option<f64>,
    pub showers_sum: Option<f64>,
    pub wind_speed_max: Option<f64>,
}

impl DetailedForecastRecord {
    /// Whether any rain or showers are expected that day
    #[must_use]
    pub fn has_precipitation(&self) -> bool {
        self.rain_sum.is_some_and(|v| v > 0.0) || self.showers_sum.is_some_and(|v| v > 0.0)
    }
}
