//! User-facing flows
//!
//! Each flow validates its input, plans, asks for confirmation before the
//! slow network work, then executes and writes its artifact.

use crate::config::TripcastConfig;
use crate::dataset::{historical_series, short_range_series};
use crate::geocoding::Geocoder;
use crate::http::JsonFetcher;
use crate::models::ForecastDays;
use crate::render::{chart_title, render_chart, save_map};
use crate::trip::{TripPipeline, read_trip_table, write_enriched_csv};
use crate::{Result, TripcastError};
use chrono::{Local, NaiveDate};
use std::path::PathBuf;
use tracing::info;

/// Asked once per flow, between planning and execution
pub trait Confirmation {
    /// `true` to proceed, `false` to abort
    fn confirm(&self) -> Result<bool>;
}

/// Always proceeds, for non-interactive runs
pub struct AssumeYes;

impl Confirmation for AssumeYes {
    fn confirm(&self) -> Result<bool> {
        Ok(true)
    }
}

/// How a flow ended when it did not fail
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Completed,
    Aborted,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForecastParams {
    pub city: String,
    pub street: String,
    pub days: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryParams {
    pub city: String,
    pub street: String,
    pub days: u32,
    pub years: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TripParams {
    pub input: PathBuf,
    pub map: PathBuf,
}

/// Everything a flow needs: where to fetch from, settings, and who to ask
pub struct App<'a> {
    fetcher: &'a dyn JsonFetcher,
    config: &'a TripcastConfig,
    confirmation: &'a dyn Confirmation,
    today: NaiveDate,
}

impl<'a> App<'a> {
    pub fn new(
        fetcher: &'a dyn JsonFetcher,
        config: &'a TripcastConfig,
        confirmation: &'a dyn Confirmation,
    ) -> Self {
        Self {
            fetcher,
            config,
            confirmation,
            today: Local::now().date_naive(),
        }
    }

    /// Use `today` as the start of the historical comparison
    #[must_use]
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = today;
        self
    }

    #[must_use]
    pub fn config(&self) -> &TripcastConfig {
        self.config
    }

    fn geocoder(&self) -> Geocoder<'_> {
        Geocoder::new(self.fetcher, &self.config.endpoints.geocode_url)
    }

    fn confirmed(&self) -> Result<bool> {
        let proceed = self.confirmation.confirm()?;
        if !proceed {
            info!("Execution aborted");
        }
        Ok(proceed)
    }

    /// Temperature, showers and cloud cover for the next days, as one chart
    pub fn forecast(&self, params: &ForecastParams) -> Result<Outcome> {
        let days = ForecastDays::new(params.days)?;

        info!("Api call for city coordinates");
        let coordinate = self.geocoder().locate(&params.city, &params.street)?;
        info!(
            "{days} days forecast will be prepared for city: {} and street: {} - coordinates: {coordinate}",
            params.city, params.street
        );

        if !self.confirmed()? {
            return Ok(Outcome::Aborted);
        }

        let series = short_range_series(self.fetcher, &self.config.endpoints, coordinate, days)?;
        render_chart(
            &self.config.output.chart_file,
            &chart_title(days, &params.city),
            &series,
        )?;
        info!("Please check the chart in {}", self.config.output.chart_file);

        Ok(Outcome::Completed)
    }

    /// Temperature forecast overlaid on the same days of previous years
    pub fn history(&self, params: &HistoryParams) -> Result<Outcome> {
        let days = ForecastDays::new(params.days)?;
        if params.years == 0 {
            return Err(TripcastError::validation("Number of years must be at least 1"));
        }

        let coordinate = self.geocoder().locate(&params.city, &params.street)?;
        info!(
            "{days} days forecast (compared with last {} years) will be prepared for city: {} and street: {} - coordinates: {coordinate}",
            params.years, params.city, params.street
        );

        if !self.confirmed()? {
            return Ok(Outcome::Aborted);
        }

        let series = historical_series(
            self.fetcher,
            &self.config.endpoints,
            coordinate,
            self.today,
            days,
            params.years,
        )?;
        render_chart(
            &self.config.output.chart_file,
            &chart_title(days, &params.city),
            &series,
        )?;
        info!("Please check the chart in {}", self.config.output.chart_file);

        Ok(Outcome::Completed)
    }

    /// Forecast for every stop of the trip file, drawn on a map
    pub fn trip(&self, params: &TripParams) -> Result<Outcome> {
        let table = read_trip_table(&params.input)?;
        info!(
            "Weather for {} trip stops will be fetched from {}",
            table.len(),
            params.input.display()
        );

        if !self.confirmed()? {
            return Ok(Outcome::Aborted);
        }

        let pipeline = TripPipeline::new(
            self.fetcher,
            &self.config.endpoints,
            &self.config.defaults.timezone,
        );
        let enriched = pipeline.run(table)?;

        info!("Current trip table:\n{enriched}");
        write_enriched_csv(&enriched, &self.config.output.enriched_file)?;
        save_map(&enriched, &params.map)?;
        info!("Please open {} in a browser", params.map.display());

        Ok(Outcome::Completed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FetchError;
    use serde_json::Value;
    use std::cell::Cell;

    struct NoNetwork {
        calls: Cell<usize>,
    }

    impl JsonFetcher for NoNetwork {
        fn get_json(&self, _url: &str) -> std::result::Result<Value, FetchError> {
            self.calls.set(self.calls.get() + 1);
            Ok(serde_json::json!([{"lat": "51.1", "lon": "17.03"}]))
        }
    }

    struct Decline;

    impl Confirmation for Decline {
        fn confirm(&self) -> Result<bool> {
            Ok(false)
        }
    }

    fn params(days: u32) -> ForecastParams {
        ForecastParams {
            city: "Wroclaw".into(),
            street: "Fabryczna".into(),
            days,
        }
    }

    #[test]
    fn test_invalid_days_fail_before_any_request() {
        let fetcher = NoNetwork { calls: Cell::new(0) };
        let config = TripcastConfig::default();
        let app = App::new(&fetcher, &config, &AssumeYes);

        for days in [0, 17, 20] {
            let err = app.forecast(&params(days)).unwrap_err();
            assert!(matches!(err, TripcastError::Validation { .. }));
        }
        assert_eq!(fetcher.calls.get(), 0);
    }

    #[test]
    fn test_declined_forecast_only_geocodes() {
        let fetcher = NoNetwork { calls: Cell::new(0) };
        let config = TripcastConfig::default();
        let app = App::new(&fetcher, &config, &Decline);

        assert_eq!(app.forecast(&params(5)).unwrap(), Outcome::Aborted);
        assert_eq!(fetcher.calls.get(), 1);
    }

    #[test]
    fn test_history_rejects_zero_years() {
        let fetcher = NoNetwork { calls: Cell::new(0) };
        let config = TripcastConfig::default();
        let app = App::new(&fetcher, &config, &AssumeYes);

        let err = app
            .history(&HistoryParams {
                city: "Wroclaw".into(),
                street: "Fabryczna".into(),
                days: 5,
                years: 0,
            })
            .unwrap_err();
        assert!(matches!(err, TripcastError::Validation { .. }));
        assert_eq!(fetcher.calls.get(), 0);
    }

    #[test]
    fn test_history_stops_on_impossible_date() {
        let fetcher = NoNetwork { calls: Cell::new(0) };
        let config = TripcastConfig::default();
        let app = App::new(&fetcher, &config, &AssumeYes)
            .with_today(NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());

        let err = app
            .history(&HistoryParams {
                city: "Wroclaw".into(),
                street: "Fabryczna".into(),
                days: 1,
                years: 1,
            })
            .unwrap_err();
        assert!(matches!(err, TripcastError::InvalidDate { year: 2023, .. }));
    }
}
