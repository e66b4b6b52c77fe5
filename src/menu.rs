//! Interactive text menu and prompts

use crate::config::DefaultsConfig;
use crate::flows::{App, Confirmation, ForecastParams, HistoryParams, Outcome, TripParams};
use crate::{Result, TripcastError};
use inquire::error::InquireError;
use inquire::{CustomType, Select, Text};
use std::fmt;
use std::path::PathBuf;
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuOption {
    DetailedForecast,
    HistoricalComparison,
    Trip,
    Exit,
}

impl MenuOption {
    #[must_use]
    pub fn all() -> [MenuOption; 4] {
        [
            MenuOption::DetailedForecast,
            MenuOption::HistoricalComparison,
            MenuOption::Trip,
            MenuOption::Exit,
        ]
    }

    #[must_use]
    pub fn number(&self) -> u8 {
        match self {
            MenuOption::DetailedForecast => 1,
            MenuOption::HistoricalComparison => 2,
            MenuOption::Trip => 3,
            MenuOption::Exit => 4,
        }
    }

    #[must_use]
    pub fn description(&self) -> &'static str {
        match self {
            MenuOption::DetailedForecast => "Check detailed forecast for particular location",
            MenuOption::HistoricalComparison => "Check temperature forecast with historical data",
            MenuOption::Trip => "Check weather forecast for your trip",
            MenuOption::Exit => "Exit",
        }
    }
}

impl fmt::Display for MenuOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ---------> {}", self.number(), self.description())
    }
}

fn prompt_err(err: InquireError) -> TripcastError {
    TripcastError::prompt(err.to_string())
}

fn is_cancel(err: &InquireError) -> bool {
    matches!(
        err,
        InquireError::OperationCanceled | InquireError::OperationInterrupted
    )
}

/// Answer to the run/abort question
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAnswer {
    Run,
    Abort,
}

/// `r` runs, `q` aborts, anything else asks again
#[must_use]
pub fn parse_key(input: &str) -> Option<KeyAnswer> {
    match input.trim().to_lowercase().as_str() {
        "r" => Some(KeyAnswer::Run),
        "q" => Some(KeyAnswer::Abort),
        _ => None,
    }
}

/// Asks on the terminal until the user types `r` or `q`
pub struct KeyPrompt;

impl Confirmation for KeyPrompt {
    fn confirm(&self) -> Result<bool> {
        loop {
            let input = match Text::new(r#"Type "r" to RUN or "q" to ABORT and press ENTER:"#).prompt() {
                Ok(input) => input,
                Err(e) if is_cancel(&e) => return Ok(false),
                Err(e) => return Err(prompt_err(e)),
            };

            match parse_key(&input) {
                Some(KeyAnswer::Run) => {
                    info!("You pressed 'r' - to proceed the execution");
                    return Ok(true);
                }
                Some(KeyAnswer::Abort) => {
                    info!("You pressed 'q' - to abort the execution");
                    return Ok(false);
                }
                None => info!("Wrong key, please try again"),
            }
        }
    }
}

fn ask_text(message: &str, default: &str) -> Result<String> {
    Text::new(message)
        .with_default(default)
        .prompt()
        .map_err(prompt_err)
}

fn ask_number(message: &str, default: u32) -> Result<u32> {
    CustomType::<u32>::new(message)
        .with_default(default)
        .with_error_message("Please enter a number")
        .prompt()
        .map_err(prompt_err)
}

fn ask_location(defaults: &DefaultsConfig) -> Result<(String, String)> {
    let city = ask_text("Enter city:", &defaults.city)?;
    let street = ask_text("Enter street:", &defaults.street)?;
    Ok((city, street))
}

fn ask_forecast(defaults: &DefaultsConfig) -> Result<ForecastParams> {
    let (city, street) = ask_location(defaults)?;
    let days = ask_number("Enter number of days (max 16):", defaults.forecast_days)?;
    Ok(ForecastParams { city, street, days })
}

fn ask_history(defaults: &DefaultsConfig) -> Result<HistoryParams> {
    let (city, street) = ask_location(defaults)?;
    let days = ask_number("Enter number of days (max 16):", defaults.forecast_days)?;
    let years = ask_number("Enter number of years (history):", defaults.history_years)?;
    Ok(HistoryParams {
        city,
        street,
        days,
        years,
    })
}

/// Banner and numbered options, shown every time the menu comes back
#[must_use]
pub fn start_menu_lines() -> Vec<String> {
    let mut lines = vec![format!("Weather Forecast Tool ver. {}", crate::VERSION)];
    lines.extend(MenuOption::all().iter().map(ToString::to_string));
    lines
}

fn print_start_menu() {
    for line in start_menu_lines() {
        info!("{line}");
    }
}

fn choose_option() -> Result<MenuOption> {
    match Select::new("Enter your choice:", MenuOption::all().to_vec())
        .with_page_size(4)
        .prompt()
    {
        Ok(option) => Ok(option),
        Err(e) if is_cancel(&e) => Ok(MenuOption::Exit),
        Err(e) => Err(prompt_err(e)),
    }
}

/// Show the menu until the user exits, aborts a flow, or a flow fails
pub fn run(app: &App<'_>) -> Result<()> {
    let config = app.config();

    loop {
        print_start_menu();
        let option = choose_option()?;
        let outcome = match option {
            MenuOption::DetailedForecast => app.forecast(&ask_forecast(&config.defaults)?)?,
            MenuOption::HistoricalComparison => app.history(&ask_history(&config.defaults)?)?,
            MenuOption::Trip => app.trip(&TripParams {
                input: PathBuf::from(&config.output.trip_file),
                map: PathBuf::from(&config.output.map_file),
            })?,
            MenuOption::Exit => {
                info!("You pressed option 4 to close app..");
                info!("Closing app...");
                return Ok(());
            }
        };

        if outcome == Outcome::Aborted {
            return Ok(());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("r", Some(KeyAnswer::Run))]
    #[case("R", Some(KeyAnswer::Run))]
    #[case(" q\n", Some(KeyAnswer::Abort))]
    #[case("Q", Some(KeyAnswer::Abort))]
    #[case("y", None)]
    #[case("", None)]
    fn test_parse_key(#[case] input: &str, #[case] expected: Option<KeyAnswer>) {
        assert_eq!(parse_key(input), expected);
    }

    #[test]
    fn test_start_menu_shows_banner_then_options() {
        let lines = start_menu_lines();
        assert_eq!(lines.len(), 5);
        assert!(lines[0].starts_with("Weather Forecast Tool ver. "));
        assert_eq!(lines[1], "1 ---------> Check detailed forecast for particular location");
        assert_eq!(lines[4], "4 ---------> Exit");
    }

    #[test]
    fn test_menu_lists_four_options_in_order() {
        let numbers: Vec<u8> = MenuOption::all().iter().map(MenuOption::number).collect();
        assert_eq!(numbers, vec![1, 2, 3, 4]);
        assert_eq!(
            MenuOption::Trip.to_string(),
            "3 ---------> Check weather forecast for your trip"
        );
    }
}
