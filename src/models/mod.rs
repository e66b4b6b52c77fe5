//! Data models for the tripcast application
//!
//! This module contains the core domain models organized by concern:
//! - Location: rounded coordinates produced by geocoding
//! - Forecast: forecast variables, date ranges, series and daily records
//! - Trip: trip stops before and after enrichment
//! - Openmeteo: wire types of the geocoding and weather endpoints

pub mod forecast;
pub mod location;
pub mod openmeteo;
pub mod trip;

// Re-export all public types for convenient access
pub use forecast::{DateRange, DetailedForecastRecord, ForecastDays, ForecastSeries, ForecastVariable};
pub use location::Coordinate;
pub use trip::{EnrichedStop, EnrichedTripTable, TripStop, TripTable};
