//! Trip stops, as read from the route file and after enrichment

use super::{Coordinate, DetailedForecastRecord};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One planned location and date of an itinerary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TripStop {
    #[serde(rename = "City")]
    pub city: String,
    #[serde(rename = "Street")]
    pub street: String,
    #[serde(rename = "Date")]
    pub date: NaiveDate,
}

/// Stops in itinerary order
pub type TripTable = Vec<TripStop>;

/// A stop together with its position and the forecast for its date
#[derive(Debug, Clone, PartialEq)]
pub struct EnrichedStop {
    pub stop: TripStop,
    pub coordinate: Coordinate,
    pub forecast: DetailedForecastRecord,
}

/// Flat CSV representation of an [`EnrichedStop`]
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct EnrichedRow {
    #[serde(rename = "City")]
    pub city: String,
    #[serde(rename = "Street")]
    pub street: String,
    #[serde(rename = "Date")]
    pub date: NaiveDate,
    #[serde(rename = "Latitude")]
    pub latitude: f64,
    #[serde(rename = "Longitude")]
    pub longitude: f64,
    #[serde(rename = "Weathercode")]
    pub weather_code: Option<u8>,
    #[serde(rename = "Temp_max")]
    pub temperature_max: Option<f64>,
    #[serde(rename = "Temp_min")]
    pub temperature_min: Option<f64>,
    #[serde(rename = "Rain_sum")]
    pub rain_sum: Option<f64>,
    #[serde(rename = "Shower_sum")]
    pub showers_sum: Option<f64>,
    #[serde(rename = "Wind_speed_max")]
    pub wind_speed_max: Option<f64>,
}

impl From<&EnrichedStop> for EnrichedRow {
    fn from(enriched: &EnrichedStop) -> Self {
        Self {
            city: enriched.stop.city.clone(),
            street: enriched.stop.street.clone(),
            date: enriched.stop.date,
            latitude: enriched.coordinate.latitude(),
            longitude: enriched.coordinate.longitude(),
            weather_code: enriched.forecast.weather_code,
            temperature_max: enriched.forecast.temperature_max,
            temperature_min: enriched.forecast.temperature_min,
            rain_sum: enriched.forecast.rain_sum,
            showers_sum: enriched.forecast.showers_sum,
            wind_speed_max: enriched.forecast.wind_speed_max,
        }
    }
}

/// Result of the trip pipeline, one entry per input stop, same order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EnrichedTripTable {
    pub stops: Vec<EnrichedStop>,
}

impl EnrichedTripTable {
    #[must_use]
    pub fn len(&self) -> usize {
        self.stops.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.stops.is_empty()
    }

    /// Map center: midpoint of the first and last stop
    #[must_use]
    pub fn center(&self) -> Option<(f64, f64)> {
        let first = self.stops.first()?;
        let last = self.stops.last()?;
        Some(first.coordinate.midpoint(&last.coordinate))
    }

    pub fn rows(&self) -> impl Iterator<Item = EnrichedRow> + '_ {
        self.stops.iter().map(EnrichedRow::from)
    }
}

fn cell<T: fmt::Display>(value: Option<T>) -> String {
    value.map_or_else(|| "-".to_string(), |v| v.to_string())
}

impl fmt::Display for EnrichedTripTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{:<3} {:<16} {:<16} {:<10} {:>8} {:>8} {:>5} {:>8} {:>8} {:>8} {:>10} {:>14}",
            "#",
            "City",
            "Street",
            "Date",
            "Latitude",
            "Longitude",
            "Code",
            "Temp_max",
            "Temp_min",
            "Rain_sum",
            "Shower_sum",
            "Wind_speed_max"
        )?;
        for (index, row) in self.rows().enumerate() {
            writeln!(
                f,
                "{:<3} {:<16} {:<16} {:<10} {:>8} {:>8} {:>5} {:>8} {:>8} {:>8} {:>10} {:>14}",
                index + 1,
                row.city,
                row.street,
                row.date.format("%Y-%m-%d").to_string(),
                row.latitude,
                row.longitude,
                cell(row.weather_code),
                cell(row.temperature_max),
                cell(row.temperature_min),
                cell(row.rain_sum),
                cell(row.showers_sum),
                cell(row.wind_speed_max)
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn enriched(city: &str, lat: f64, lon: f64) -> EnrichedStop {
        let date = NaiveDate::from_ymd_opt(2024, 7, 1).unwrap();
        EnrichedStop {
            stop: TripStop {
                city: city.to_string(),
                street: "Rynek".to_string(),
                date,
            },
            coordinate: Coordinate::new(lat, lon),
            forecast: DetailedForecastRecord {
                date,
                weather_code: Some(61),
                temperature_max: Some(24.1),
                temperature_min: Some(13.0),
                rain_sum: Some(2.5),
                showers_sum: None,
                wind_speed_max: Some(11.3),
            },
        }
    }

    #[test]
    fn test_center_uses_first_and_last() {
        let table = EnrichedTripTable {
            stops: vec![
                enriched("Wroclaw", 51.0, 17.0),
                enriched("Opole", 60.0, 30.0),
                enriched("Krakow", 50.0, 20.0),
            ],
        };
        assert_eq!(table.center(), Some((50.5, 18.5)));
        assert_eq!(EnrichedTripTable::default().center(), None);
    }

    #[test]
    fn test_row_flattening() {
        let row = EnrichedRow::from(&enriched("Wroclaw", 51.107, 17.038));
        assert_eq!(row.city, "Wroclaw");
        assert_eq!(row.latitude, 51.11);
        assert_eq!(row.weather_code, Some(61));
        assert_eq!(row.showers_sum, None);
    }

    #[test]
    fn test_table_display_marks_missing_values() {
        let table = EnrichedTripTable {
            stops: vec![enriched("Wroclaw", 51.0, 17.0)],
        };
        let rendered = table.to_string();
        assert!(rendered.lines().next().unwrap().contains("Shower_sum"));
        assert!(rendered.contains("Wroclaw"));
        assert!(rendered.contains(" - "));
    }
}
