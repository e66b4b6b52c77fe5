//! Location Resolution Module
//!
//! Turns a city and street into a rounded [`Coordinate`] using the
//! geocoding search endpoint.

use crate::http::JsonFetcher;
use crate::models::Coordinate;
use crate::models::openmeteo::GeocodeCandidate;
use crate::{Result, TripcastError};
use serde_json::Value;
use tracing::{debug, info};

/// Service for resolving a city/street pair
pub struct Geocoder<'a> {
    fetcher: &'a dyn JsonFetcher,
    base_url: &'a str,
}

impl<'a> Geocoder<'a> {
    pub fn new(fetcher: &'a dyn JsonFetcher, base_url: &'a str) -> Self {
        Self { fetcher, base_url }
    }

    /// Search URL for a city and street
    #[must_use]
    pub fn search_url(&self, city: &str, street: &str) -> String {
        format!(
            "{}/search?city={}&street={}",
            self.base_url.trim_end_matches('/'),
            urlencoding::encode(city),
            urlencoding::encode(street)
        )
    }

    /// Resolve `city`/`street` using the first candidate of the search.
    ///
    /// An empty result, or no result at all, is [`TripcastError::LocationNotFound`].
    /// Only a fatal request failure is returned as a fetch error.
    pub fn locate(&self, city: &str, street: &str) -> Result<Coordinate> {
        info!("Api call for coordinates of {city}, {street}");

        let not_found = || TripcastError::LocationNotFound {
            city: city.to_string(),
            street: street.to_string(),
        };

        let response = match self.fetcher.get_json(&self.search_url(city, street)) {
            Ok(response) => response,
            Err(e) if e.is_recoverable() => return Err(not_found()),
            Err(e) => return Err(e.into()),
        };

        let first = match response {
            Value::Array(candidates) => candidates.into_iter().next().ok_or_else(not_found)?,
            _ => return Err(not_found()),
        };

        let candidate: GeocodeCandidate = serde_json::from_value(first).map_err(|e| {
            debug!("Unusable geocoding candidate: {e}");
            not_found()
        })?;

        let (Some(lat), Some(lon)) = (candidate.lat.value(), candidate.lon.value()) else {
            return Err(not_found());
        };

        let coordinate = Coordinate::new(lat, lon);
        debug!(
            "Found {} at {coordinate}",
            candidate.display_name.as_deref().unwrap_or(city)
        );

        Ok(coordinate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FetchError;
    use serde_json::json;
    use std::cell::RefCell;

    struct Canned {
        response: std::result::Result<Value, FetchError>,
        urls: RefCell<Vec<String>>,
    }

    impl Canned {
        fn new(response: std::result::Result<Value, FetchError>) -> Self {
            Self {
                response,
                urls: RefCell::new(Vec::new()),
            }
        }
    }

    impl JsonFetcher for Canned {
        fn get_json(&self, url: &str) -> std::result::Result<Value, FetchError> {
            self.urls.borrow_mut().push(url.to_string());
            self.response.clone()
        }
    }

    #[test]
    fn test_locate_rounds_first_candidate() {
        let fetcher = Canned::new(Ok(json!([
            {"lat": "51.1078852", "lon": "17.0385376", "display_name": "Wroclaw"},
            {"lat": "10.0", "lon": "10.0"}
        ])));
        let geocoder = Geocoder::new(&fetcher, "https://geo.test");

        let coordinate = geocoder.locate("Wroclaw", "Fabryczna").unwrap();
        assert_eq!(coordinate, Coordinate::new(51.11, 17.04));
        assert_eq!(
            fetcher.urls.borrow().as_slice(),
            ["https://geo.test/search?city=Wroclaw&street=Fabryczna"]
        );
    }

    #[test]
    fn test_search_url_is_encoded() {
        let fetcher = Canned::new(Ok(json!([])));
        let geocoder = Geocoder::new(&fetcher, "https://geo.test/");
        assert_eq!(
            geocoder.search_url("Zielona Góra", "Plac Bohaterów"),
            "https://geo.test/search?city=Zielona%20G%C3%B3ra&street=Plac%20Bohater%C3%B3w"
        );
    }

    #[test]
    fn test_empty_response_is_not_found() {
        let fetcher = Canned::new(Ok(json!([])));
        let err = Geocoder::new(&fetcher, "https://geo.test")
            .locate("Atlantis", "Main")
            .unwrap_err();
        assert!(matches!(err, TripcastError::LocationNotFound { .. }));
        assert_eq!(fetcher.urls.borrow().len(), 1);
    }

    #[test]
    fn test_sentinel_is_not_found() {
        let fetcher = Canned::new(Err(FetchError::Connection("refused".into())));
        let err = Geocoder::new(&fetcher, "https://geo.test")
            .locate("Wroclaw", "Fabryczna")
            .unwrap_err();
        assert!(matches!(err, TripcastError::LocationNotFound { .. }));
    }

    #[test]
    fn test_fatal_failure_propagates() {
        let fetcher = Canned::new(Err(FetchError::Fatal("timed out".into())));
        let err = Geocoder::new(&fetcher, "https://geo.test")
            .locate("Wroclaw", "Fabryczna")
            .unwrap_err();
        assert!(matches!(err, TripcastError::Fetch(FetchError::Fatal(_))));
    }

    #[test]
    fn test_object_response_is_not_found() {
        let fetcher = Canned::new(Ok(json!({"error": "Invalid API key"})));
        let err = Geocoder::new(&fetcher, "https://geo.test")
            .locate("Wroclaw", "Fabryczna")
            .unwrap_err();
        assert!(matches!(err, TripcastError::LocationNotFound { .. }));
    }
}
