//! Wire types of the geocoding and Open-Meteo endpoints
//!
//! Responses arrive as raw `serde_json::Value` from the HTTP client and are
//! converted with `serde_json::from_value` once a caller needs typed access.

use serde::Deserialize;
use std::collections::HashMap;

/// One candidate of a geocoding search
#[derive(Debug, Deserialize)]
pub struct GeocodeCandidate {
    pub lat: Degrees,
    pub lon: Degrees,
    pub display_name: Option<String>,
}

/// The geocoder sends degrees as strings; accept numbers too
#[derive(Debug, Deserialize, Clone)]
#[serde(untagged)]
pub enum Degrees {
    Number(f64),
    Text(String),
}

impl Degrees {
    #[must_use]
    pub fn value(&self) -> Option<f64> {
        match self {
            Degrees::Number(v) => Some(*v),
            Degrees::Text(s) => s.trim().parse().ok(),
        }
    }
}

/// Response of an `hourly=` request
#[derive(Debug, Deserialize)]
pub struct HourlyResponse {
    pub hourly: HourlyData,
}

/// Parallel arrays: `time` plus one array per requested variable
#[derive(Debug, Deserialize)]
pub struct HourlyData {
    pub time: Vec<String>,
    #[serde(flatten)]
    pub values: HashMap<String, Vec<Option<f64>>>,
}

/// Response of a `daily=` request
#[derive(Debug, Deserialize)]
pub struct DailyResponse {
    pub daily: DailyData,
}

/// Daily weather data from Open-Meteo
#[derive(Debug, Deserialize)]
pub struct DailyData {
    pub time: Vec<String>,
    #[serde(rename = "weathercode", alias = "weather_code")]
    pub weather_code: Vec<Option<u8>>,
    #[serde(rename = "temperature_2m_max")]
    pub temperature_max: Vec<Option<f64>>,
    #[serde(rename = "temperature_2m_min")]
    pub temperature_min: Vec<Option<f64>>,
    pub rain_sum: Vec<Option<f64>>,
    #[serde(rename = "showers_sum")]
    pub showers_sum: Vec<Option<f64>>,
    #[serde(rename = "windspeed_10m_max", alias = "wind_speed_10m_max")]
    pub wind_speed_max: Vec<Option<f64>>,
}

/// Convert Open-Meteo weather code to human-readable description
#[must_use]
pub fn weather_code_to_description(code: u8) -> &'static str {
    match code {
        0 => "Clear sky",
        1 => "Mainly clear",
        2 => "Partly cloudy",
        3 => "Overcast",
        45 => "Fog",
        48 => "Depositing rime fog",
        51 => "Light drizzle",
        53 => "Moderate drizzle",
        55 => "Dense drizzle",
        56 => "Light freezing drizzle",
        57 => "Dense freezing drizzle",
        61 => "Slight rain",
        63 => "Moderate rain",
        65 => "Heavy rain",
        66 => "Light freezing rain",
        67 => "Heavy freezing rain",
        71 => "Slight snow fall",
        73 => "Moderate snow fall",
        75 => "Heavy snow fall",
        77 => "Snow grains",
        80 => "Slight rain showers",
        81 => "Moderate rain showers",
        82 => "Violent rain showers",
        85 => "Slight snow showers",
        86 => "Heavy snow showers",
        95 => "Thunderstorm",
        96 => "Thunderstorm with slight hail",
        99 => "Thunderstorm with heavy hail",
        _ => "Unknown",
    }
}
