//! `tripcast` - weather forecasts, year-over-year comparisons and trip maps
//!
//! This library resolves locations, requests forecasts from Open-Meteo,
//! assembles them into chartable series or per-stop trip records, and
//! renders charts and maps.

pub mod cli;
pub mod config;
pub mod dataset;
pub mod error;
pub mod flows;
pub mod forecast;
pub mod geocoding;
pub mod http;
pub mod logging;
pub mod menu;
pub mod models;
pub mod render;
pub mod trip;

// Re-export core types for public API
pub use config::TripcastConfig;
pub use error::{FetchError, TripcastError};
pub use flows::{App, AssumeYes, Confirmation, Outcome};
pub use forecast::ForecastRequest;
pub use geocoding::Geocoder;
pub use http::{HttpClient, JsonFetcher};
pub use models::{Coordinate, DetailedForecastRecord, EnrichedTripTable, ForecastSeries, TripTable};
pub use trip::TripPipeline;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, TripcastError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
