//! Trip pipeline
//!
//! Reads the itinerary, resolves and forecasts every stop strictly in order,
//! and produces the enriched table the map is drawn from.

use crate::config::EndpointsConfig;
use crate::dataset::detailed_record;
use crate::forecast::ForecastRequest;
use crate::geocoding::Geocoder;
use crate::http::JsonFetcher;
use crate::models::trip::EnrichedRow;
use crate::models::{DateRange, EnrichedStop, EnrichedTripTable, TripStop, TripTable};
use crate::{Result, TripcastError};
use std::io;
use std::path::Path;
use tracing::{error, info};

/// Read the `City,Street,Date` itinerary.
///
/// Each failure is logged here with one line and returned as
/// [`TripcastError::TripInput`].
pub fn read_trip_table(path: impl AsRef<Path>) -> Result<TripTable> {
    let path = path.as_ref();
    let fail = |message: &str| {
        error!("{message}");
        TripcastError::trip_input(message)
    };

    let mut reader = match csv::Reader::from_path(path) {
        Ok(reader) => reader,
        Err(e) => {
            return Err(match e.kind() {
                csv::ErrorKind::Io(io_err) if io_err.kind() == io::ErrorKind::NotFound => {
                    fail("File not found.")
                }
                _ => fail("Some other exception"),
            });
        }
    };

    let mut table = TripTable::new();
    for record in reader.deserialize::<TripStop>() {
        match record {
            Ok(stop) => table.push(stop),
            Err(e) if e.is_io_error() => return Err(fail("Some other exception")),
            Err(e) => {
                info!("Rejected row in {}: {e}", path.display());
                return Err(fail("Parse error"));
            }
        }
    }

    if table.is_empty() {
        return Err(fail("No data"));
    }

    info!("Read {} trip stops from {}", table.len(), path.display());
    Ok(table)
}

/// Write the enriched table as CSV
pub fn write_enriched_csv(table: &EnrichedTripTable, path: impl AsRef<Path>) -> Result<()> {
    let mut writer = csv::Writer::from_path(path.as_ref())
        .map_err(|e| TripcastError::render(format!("{}: {e}", path.as_ref().display())))?;

    for row in table.rows() {
        writer
            .serialize::<EnrichedRow>(row)
            .map_err(|e| TripcastError::render(e.to_string()))?;
    }
    writer.flush()?;
    Ok(())
}

/// Geocodes and forecasts each stop of a trip
pub struct TripPipeline<'a> {
    fetcher: &'a dyn JsonFetcher,
    endpoints: &'a EndpointsConfig,
    timezone: &'a str,
}

impl<'a> TripPipeline<'a> {
    pub fn new(fetcher: &'a dyn JsonFetcher, endpoints: &'a EndpointsConfig, timezone: &'a str) -> Self {
        Self {
            fetcher,
            endpoints,
            timezone,
        }
    }

    /// Enrich every stop in order. The first failing stop aborts the whole run.
    pub fn run(&self, table: TripTable) -> Result<EnrichedTripTable> {
        let geocoder = Geocoder::new(self.fetcher, &self.endpoints.geocode_url);
        let mut enriched = EnrichedTripTable {
            stops: Vec::with_capacity(table.len()),
        };

        for (index, stop) in table.into_iter().enumerate() {
            info!(
                "Stop {}: {}, {} on {}",
                index + 1,
                stop.city,
                stop.street,
                stop.date
            );

            let coordinate = geocoder.locate(&stop.city, &stop.street)?;

            let response = ForecastRequest::Detailed {
                coordinate,
                range: DateRange::single(stop.date),
                timezone: self.timezone.to_string(),
            }
            .fetch(self.fetcher, self.endpoints)?;
            let forecast = detailed_record(&response, stop.date)?;

            enriched.stops.push(EnrichedStop {
                stop,
                coordinate,
                forecast,
            });
        }

        Ok(enriched)
    }
}
