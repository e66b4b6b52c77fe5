//! Interactive trip map as a standalone Leaflet page

use super::escape_html;
use crate::models::openmeteo::weather_code_to_description;
use crate::models::{DetailedForecastRecord, EnrichedStop, EnrichedTripTable};
use crate::{Result, TripcastError};
use serde::Serialize;
use std::fmt::Display;
use std::fs;
use std::path::Path;
use tracing::info;

pub const MAP_ZOOM: u8 = 7;

const LEAFLET_VERSION: &str = "1.9.4";

/// Marker color of a stop: red when any precipitation is forecast
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkerColor {
    Red,
    Blue,
}

impl MarkerColor {
    #[must_use]
    pub fn for_forecast(forecast: &DetailedForecastRecord) -> Self {
        if forecast.has_precipitation() {
            MarkerColor::Red
        } else {
            MarkerColor::Blue
        }
    }
}

#[derive(Debug, Serialize)]
struct Marker {
    number: usize,
    lat: f64,
    lon: f64,
    color: MarkerColor,
    popup: String,
}

fn field<T: Display>(value: Option<T>) -> String {
    value.map_or_else(|| "n/a".to_string(), |v| v.to_string())
}

/// Popup body listing the stop and all six forecast fields
#[must_use]
pub fn popup_html(enriched: &EnrichedStop) -> String {
    let forecast = &enriched.forecast;
    let weather = forecast.weather_code.map_or_else(
        || "n/a".to_string(),
        |code| format!("{code} ({})", weather_code_to_description(code)),
    );

    [
        ("City", enriched.stop.city.clone()),
        ("Date", enriched.stop.date.format("%Y-%m-%d").to_string()),
        ("Weathercode", weather),
        ("Temp_max", field(forecast.temperature_max)),
        ("Temp_min", field(forecast.temperature_min)),
        ("Rain_sum", field(forecast.rain_sum)),
        ("Shower_sum", field(forecast.showers_sum)),
        ("Wind_speed_max", field(forecast.wind_speed_max)),
    ]
    .iter()
    .map(|(name, value)| format!("{name}: {}<br>", escape_html(value)))
    .collect()
}

/// Full HTML document for the trip, centered between first and last stop
pub fn render_map_html(table: &EnrichedTripTable) -> Result<String> {
    let (center_lat, center_lon) = table
        .center()
        .ok_or_else(|| TripcastError::render("Trip has no stops to draw"))?;

    let markers: Vec<Marker> = table
        .stops
        .iter()
        .enumerate()
        .map(|(index, enriched)| Marker {
            number: index + 1,
            lat: enriched.coordinate.latitude(),
            lon: enriched.coordinate.longitude(),
            color: MarkerColor::for_forecast(&enriched.forecast),
            popup: popup_html(enriched),
        })
        .collect();

    // "</" must not appear inside the inline script
    let markers_json = serde_json::to_string(&markers)
        .map_err(|e| TripcastError::render(e.to_string()))?
        .replace("</", "<\\/");

    Ok(format!(
        r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1.0">
<title>Trip weather forecast</title>
<link rel="stylesheet" href="https://unpkg.com/leaflet@{LEAFLET_VERSION}/dist/leaflet.css">
<script src="https://unpkg.com/leaflet@{LEAFLET_VERSION}/dist/leaflet.js"></script>
<style>
html, body, #map {{ height: 100%; margin: 0; }}
.stop-marker {{ border-radius: 50%; color: #fff; font: bold 13px sans-serif; text-align: center; line-height: 26px; border: 2px solid #fff; box-shadow: 0 0 3px #333; }}
.stop-marker.red {{ background: #d63e2a; }}
.stop-marker.blue {{ background: #38aadd; }}
</style>
</head>
<body>
<div id="map"></div>
<script>
var map = L.map("map").setView([{center_lat}, {center_lon}], {MAP_ZOOM});
L.tileLayer("https://{{s}}.tile.openstreetmap.org/{{z}}/{{x}}/{{y}}.png", {{
  maxZoom: 18,
  attribution: "&copy; OpenStreetMap contributors"
}}).addTo(map);
var markers = {markers_json};
markers.forEach(function (m) {{
  var icon = L.divIcon({{
    className: "stop-marker " + m.color,
    html: String(m.number),
    iconSize: [26, 26]
  }});
  L.marker([m.lat, m.lon], {{ icon: icon }}).bindPopup(m.popup).addTo(map);
}});
</script>
</body>
</html>
"#
    ))
}

/// Render the trip map and write it to `path`
pub fn save_map(table: &EnrichedTripTable, path: impl AsRef<Path>) -> Result<()> {
    let html = render_map_html(table)?;
    fs::write(path.as_ref(), html)?;
    info!("Map saved to {}", path.as_ref().display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Coordinate, TripStop};
    use chrono::NaiveDate;
    use rstest::rstest;

    fn record(rain: Option<f64>, showers: Option<f64>) -> DetailedForecastRecord {
        DetailedForecastRecord {
            date: NaiveDate::from_ymd_opt(2024, 7, 1).unwrap(),
            weather_code: Some(2),
            temperature_max: Some(25.3),
            temperature_min: Some(14.8),
            rain_sum: rain,
            showers_sum: showers,
            wind_speed_max: Some(12.0),
        }
    }

    fn stop(city: &str, lat: f64, lon: f64, forecast: DetailedForecastRecord) -> EnrichedStop {
        EnrichedStop {
            stop: TripStop {
                city: city.to_string(),
                street: "Rynek".to_string(),
                date: forecast.date,
            },
            coordinate: Coordinate::new(lat, lon),
            forecast,
        }
    }

    #[rstest]
    #[case(Some(0.0), Some(0.0), MarkerColor::Blue)]
    #[case(Some(0.1), Some(0.0), MarkerColor::Red)]
    #[case(Some(0.0), Some(3.5), MarkerColor::Red)]
    #[case(None, Some(0.0), MarkerColor::Blue)]
    fn test_marker_color(
        #[case] rain: Option<f64>,
        #[case] showers: Option<f64>,
        #[case] expected: MarkerColor,
    ) {
        assert_eq!(MarkerColor::for_forecast(&record(rain, showers)), expected);
    }

    #[test]
    fn test_popup_lists_all_fields() {
        let popup = popup_html(&stop("Wroclaw", 51.11, 17.04, record(Some(0.0), None)));
        for name in [
            "City: Wroclaw",
            "Date: 2024-07-01",
            "Weathercode: 2 (Partly cloudy)",
            "Temp_max: 25.3",
            "Temp_min: 14.8",
            "Rain_sum: 0",
            "Shower_sum: n/a",
            "Wind_speed_max: 12",
        ] {
            assert!(popup.contains(name), "missing {name} in {popup}");
        }
    }

    #[test]
    fn test_popup_escapes_city() {
        let popup = popup_html(&stop("<b>Opole</b>", 50.67, 17.93, record(None, None)));
        assert!(popup.contains("City: &lt;b&gt;Opole&lt;/b&gt;<br>"));
    }

    #[test]
    fn test_map_document() {
        let table = EnrichedTripTable {
            stops: vec![
                stop("Wroclaw", 51.0, 17.0, record(Some(0.0), Some(0.0))),
                stop("Krakow", 50.0, 20.0, record(Some(1.0), Some(0.0))),
            ],
        };
        let html = render_map_html(&table).unwrap();
        assert!(html.contains("setView([50.5, 18.5], 7)"));
        assert!(html.contains(r#""number":1,"lat":51.0,"lon":17.0,"color":"blue""#));
        assert!(html.contains(r#""number":2,"lat":50.0,"lon":20.0,"color":"red""#));
    }

    #[test]
    fn test_empty_trip_has_no_map() {
        assert!(render_map_html(&EnrichedTripTable::default()).is_err());
    }

    #[test]
    fn test_save_map() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("map.html");
        let table = EnrichedTripTable {
            stops: vec![stop("Wroclaw", 51.0, 17.0, record(None, None))],
        };
        save_map(&table, &path).unwrap();
        let written = fs::read_to_string(&path).unwrap();
        assert!(written.starts_with("<!DOCTYPE html>"));
    }
}
