use clap::Parser;
use std::process::ExitCode;
use tracing::{debug, error, info};
use tripcast::cli::{Cli, Resolved};
use tripcast::flows::{App, AssumeYes, Confirmation};
use tripcast::menu::{self, KeyPrompt};
use tripcast::{HttpClient, TripcastConfig, TripcastError, logging};

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match TripcastConfig::load_from_path(cli.config.clone()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration error: {e:#}");
            return ExitCode::FAILURE;
        }
    };

    match logging::init(&config.logging) {
        Ok(Some(path)) => debug!("Logging to {}", path.display()),
        Ok(None) => {}
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::FAILURE;
        }
    }

    match run(cli, &config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            report(&e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli, config: &TripcastConfig) -> anyhow::Result<()> {
    let client = HttpClient::new()?;
    let confirmation: Box<dyn Confirmation> = if cli.yes {
        Box::new(AssumeYes)
    } else {
        Box::new(KeyPrompt)
    };
    let app = App::new(&client, config, confirmation.as_ref());

    let Some(command) = cli.command else {
        menu::run(&app)?;
        return Ok(());
    };

    let outcome = match command.resolve(config) {
        Resolved::Forecast(params) => app.forecast(&params)?,
        Resolved::History(params) => app.history(&params)?,
        Resolved::Trip(params) => app.trip(&params)?,
    };
    info!("Finished: {outcome:?}");

    Ok(())
}

/// Log a failure once; failures already logged where they happened are skipped
fn report(err: &anyhow::Error) {
    match err.downcast_ref::<TripcastError>() {
        Some(e) if e.already_reported() => debug!("{e}"),
        Some(e) => {
            error!("{}", e.user_message());
            debug!("{e}");
        }
        None => error!("{err:#}"),
    }
}
