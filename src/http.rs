//! Blocking JSON-over-HTTP client
//!
//! Every network call in the application goes through [`JsonFetcher::get_json`].
//! Failures are classified into [`FetchError`] and logged exactly once, here.

use crate::error::FetchError;
use crate::{Result, TripcastError};
use reqwest::Url;
use reqwest::blocking::Client;
use serde_json::Value;
use std::time::{Duration, Instant};
use tracing::{debug, error, instrument, warn};

/// Fixed per-request timeout
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Something that can turn a URL into a parsed JSON document
pub trait JsonFetcher {
    fn get_json(&self, url: &str) -> std::result::Result<Value, FetchError>;
}

/// `reqwest` backed fetcher.
///
/// Certificate verification is disabled: the public weather endpoints are
/// reached from networks with intercepting proxies.
pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .danger_accept_invalid_certs(true)
            .user_agent(concat!("tripcast/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| TripcastError::config(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self { client })
    }

    fn fetch(&self, url: &str) -> std::result::Result<Value, FetchError> {
        let url = Url::parse(url).map_err(|e| FetchError::InvalidUrl(format!("{url}: {e}")))?;

        let response = self.client.get(url).send().map_err(classify)?;
        let status = response.status();
        let body = response.text().map_err(classify)?;

        let value: Value =
            serde_json::from_str(&body).map_err(|e| FetchError::Decode(e.to_string()))?;

        if !status.is_success() {
            // Open-Meteo explains rejected parameters as {"error": true, "reason": "..."}
            if let Some(reason) = value.get("reason").and_then(Value::as_str) {
                return Err(FetchError::Api {
                    status: status.as_u16(),
                    reason: reason.to_string(),
                });
            }
        }

        Ok(value)
    }
}

impl JsonFetcher for HttpClient {
    #[instrument(level = "debug", skip(self))]
    fn get_json(&self, url: &str) -> std::result::Result<Value, FetchError> {
        let start = Instant::now();
        let result = self.fetch(url);

        match &result {
            Ok(_) => debug!("Request finished in {:.3}s", start.elapsed().as_secs_f64()),
            Err(e) => report(e),
        }

        result
    }
}

fn classify(err: reqwest::Error) -> FetchError {
    if err.is_redirect() {
        FetchError::TooManyRedirects
    } else if err.is_connect() {
        FetchError::Connection(err.to_string())
    } else if err.is_builder() {
        FetchError::InvalidUrl(err.to_string())
    } else {
        FetchError::Fatal(err.to_string())
    }
}

fn report(err: &FetchError) {
    match err {
        FetchError::TooManyRedirects => warn!("Error: Too many redirects."),
        FetchError::Decode(detail) => {
            warn!(%detail, "Error: Could not decode the text into json")
        }
        FetchError::Connection(detail) => {
            warn!(%detail, "Error: A Connection error occurred.")
        }
        FetchError::InvalidUrl(detail) => {
            warn!(%detail, "Error: The URL provided was somehow invalid.")
        }
        FetchError::Api { status, reason } => {
            warn!(status, %reason, "Error: The weather service rejected the request.")
        }
        FetchError::Fatal(detail) => error!(%detail, "Fatal error: App will be closed"),
    }
}
