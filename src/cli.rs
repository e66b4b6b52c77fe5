use crate::config::TripcastConfig;
use crate::flows::{ForecastParams, HistoryParams, TripParams};
use clap::builder::{Styles, styling::AnsiColor};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

const ABOUT: &str = "Weather forecast and trip planning tool";

const LONG_ABOUT: &str = "
Weather forecast and trip planning tool backed by Open-Meteo.

Without a command an interactive menu is shown. Charts are written as SVG and the trip map as an
HTML page that can be opened in any browser.
";

const STYLES: Styles = Styles::styled()
    .header(AnsiColor::Yellow.on_default())
    .usage(AnsiColor::Green.on_default())
    .literal(AnsiColor::Green.on_default())
    .placeholder(AnsiColor::Green.on_default());

#[derive(Parser, Debug)]
#[command(name = "tripcast", version, styles = STYLES, about = ABOUT, long_about = LONG_ABOUT)]
pub struct Cli {
    /// Configuration file (TOML)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Run without asking for confirmation
    #[arg(short, long, global = true)]
    pub yes: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Temperature, showers and cloud cover for the next days
    Forecast {
        #[arg(long)]
        city: Option<String>,
        #[arg(long)]
        street: Option<String>,
        /// Number of days, 1 to 16
        #[arg(long)]
        days: Option<u32>,
    },

    /// Temperature forecast compared with previous years
    History {
        #[arg(long)]
        city: Option<String>,
        #[arg(long)]
        street: Option<String>,
        /// Number of days, 1 to 16
        #[arg(long)]
        days: Option<u32>,
        /// Number of past years to compare with
        #[arg(long)]
        years: Option<u32>,
    },

    /// Forecast for every stop of a trip file, drawn on a map
    Trip {
        /// CSV with City,Street,Date columns
        #[arg(long)]
        input: Option<PathBuf>,
        /// Where to write the HTML map
        #[arg(long)]
        map: Option<PathBuf>,
    },
}

/// A command with every omitted argument filled from configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolved {
    Forecast(ForecastParams),
    History(HistoryParams),
    Trip(TripParams),
}

impl Command {
    #[must_use]
    pub fn resolve(self, config: &TripcastConfig) -> Resolved {
        let defaults = &config.defaults;
        match self {
            Command::Forecast { city, street, days } => Resolved::Forecast(ForecastParams {
                city: city.unwrap_or_else(|| defaults.city.clone()),
                street: street.unwrap_or_else(|| defaults.street.clone()),
                days: days.unwrap_or(defaults.forecast_days),
            }),
            Command::History {
                city,
                street,
                days,
                years,
            } => Resolved::History(HistoryParams {
                city: city.unwrap_or_else(|| defaults.city.clone()),
                street: street.unwrap_or_else(|| defaults.street.clone()),
                days: days.unwrap_or(defaults.forecast_days),
                years: years.unwrap_or(defaults.history_years),
            }),
            Command::Trip { input, map } => Resolved::Trip(TripParams {
                input: input.unwrap_or_else(|| PathBuf::from(&config.output.trip_file)),
                map: map.unwrap_or_else(|| PathBuf::from(&config.output.map_file)),
            }),
        }
    }
}
