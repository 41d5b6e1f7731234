use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use tokio::sync::watch;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use departures_server::adif::AdifPortal;
use departures_server::cli::{Cli, run_lookup};
use departures_server::config::ServerConfig;
use departures_server::registry::Registry;
use departures_server::schedule::ScheduleFetcher;
use departures_server::web::{AppState, create_router};

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Logs go to stderr so a one-off lookup's board is alone on stdout.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = ServerConfig::from_env()?;

    let registry = match &config.stations_file {
        Some(path) => Registry::from_json_file(path)?,
        None => Registry::builtin(),
    };
    info!(
        stations = registry.stations().count(),
        traffic_types = registry.traffic_types().count(),
        "registry loaded"
    );

    let registry = Arc::new(registry);

    if let Some((station_code, traffic_key)) = cli.lookup() {
        let fetcher = ScheduleFetcher::new(
            AdifPortal::new(config.adif.clone()),
            registry,
            config.fetch.clone(),
        );
        return Ok(match run_lookup(&fetcher, station_code, traffic_key).await {
            Ok(report) => {
                print!("{report}");
                ExitCode::SUCCESS
            }
            Err(reason) => {
                eprintln!("{reason}");
                ExitCode::FAILURE
            }
        });
    }

    // Flipped on Ctrl-C so fetches waiting to retry give up instead of
    // holding up shutdown.
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let fetcher = ScheduleFetcher::new(
        AdifPortal::new(config.adif.clone()),
        registry,
        config.fetch.clone(),
    )
    .with_shutdown(shutdown_rx);

    let app = create_router(AppState::new(fetcher));

    let listener = tokio::net::TcpListener::bind(config.bind).await?;
    info!(
        addr = %config.bind,
        portal = %config.adif.base_url,
        max_retries = config.fetch.max_retries,
        delay_secs = config.fetch.delay.as_secs(),
        max_wait_secs = config.fetch.max_total_delay().as_secs(),
        "Adif departures server listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(shutdown_tx))
        .await?;

    info!("server stopped");
    Ok(ExitCode::SUCCESS)
}

async fn shutdown_signal(shutdown: watch::Sender<bool>) {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "failed to listen for Ctrl-C, running until killed");
        std::future::pending::<()>().await;
    }
    info!("shutting down");
    shutdown.send_replace(true);
}
