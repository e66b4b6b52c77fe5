//! Coordinate model

use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of fractional digits kept for latitude and longitude
pub const COORDINATE_PRECISION: u32 = 2;

/// Geographic position, rounded once at creation and never changed afterwards
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct Coordinate {
    latitude: f64,
    longitude: f64,
}

impl Coordinate {
    /// Create a coordinate, rounding both components to 2 decimal places.
    /// Exact ties go to the even digit.
    #[must_use]
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude: round_to(latitude, COORDINATE_PRECISION),
            longitude: round_to(longitude, COORDINATE_PRECISION),
        }
    }

    #[must_use]
    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    #[must_use]
    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    /// Point halfway between `self` and `other`, used to center the trip map
    #[must_use]
    pub fn midpoint(&self, other: &Coordinate) -> (f64, f64) {
        (
            (self.latitude + other.latitude) / 2.0,
            (self.longitude + other.longitude) / 2.0,
        )
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} : {}", self.latitude, self.longitude)
    }
}

fn round_to(value: f64, precision: u32) -> f64 {
    let multiplier = 10_f64.powi(i32::try_from(precision).unwrap_or(2));
    (value * multiplier).round_ties_even() / multiplier
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coordinate_is_rounded() {
        let coordinate = Coordinate::new(51.107_883, 17.038_538);
        assert_eq!(coordinate.latitude(), 51.11);
        assert_eq!(coordinate.longitude(), 17.04);
    }

    #[test]
    fn test_negative_coordinates() {
        let coordinate = Coordinate::new(-33.868_82, -151.209_295);
        assert_eq!(coordinate.latitude(), -33.87);
        assert_eq!(coordinate.longitude(), -151.21);
    }

    #[test]
    fn test_ties_round_to_even() {
        let coordinate = Coordinate::new(51.125, 16.375);
        assert_eq!(coordinate.latitude(), 51.12);
        assert_eq!(coordinate.longitude(), 16.38);
        assert_eq!(Coordinate::new(-0.125, 0.5).latitude(), -0.12);
    }

    #[test]
    fn test_midpoint() {
        let first = Coordinate::new(50.0, 16.0);
        let last = Coordinate::new(52.0, 21.0);
        assert_eq!(first.midpoint(&last), (51.0, 18.5));
    }

    #[test]
    fn test_display() {
        assert_eq!(Coordinate::new(51.11, 17.04).to_string(), "51.11 : 17.04");
    }
}
