//! Command-line interface.
//!
//! By default the binary serves HTTP. Given both `--station` and `--traffic`
//! it looks up a single board, prints it and exits.

use std::fmt::Write as _;

use clap::Parser;

use crate::registry::{Registry, StationEntry, TrafficType};
use crate::schedule::{FetchOutcome, Portal, ScheduleFetcher};

/// Next departures from Adif stations
#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// station code to look up once instead of serving, e.g. 13106 for Llodio
    #[arg(long, requires = "traffic")]
    pub station: Option<String>,

    /// traffic type key for the one-off lookup, e.g. 2 for Cercanías
    #[arg(long, requires = "station")]
    pub traffic: Option<String>,
}

impl Cli {
    /// Station code and traffic key, when a one-off lookup was asked for.
    pub fn lookup(&self) -> Option<(&str, &str)> {
        self.station.as_deref().zip(self.traffic.as_deref())
    }
}

/// Fetch one board and render it for the terminal.
///
/// `Err` holds the rendered reason no board could be shown.
pub async fn run_lookup<P: Portal>(
    fetcher: &ScheduleFetcher<P>,
    station_code: &str,
    traffic_key: &str,
) -> Result<String, String> {
    let registry = fetcher.registry();
    let station = registry
        .resolve_station(station_code)
        .map_err(|e| format!("{e}. Known stations: {}", station_choices(registry)))?;
    let traffic = registry
        .resolve_traffic(traffic_key)
        .map_err(|e| format!("{e}. Choose one of: {}", traffic_choices(registry)))?;

    let outcome = fetcher.fetch_schedule(station, &traffic.value).await;
    render_outcome(&outcome, station, traffic)
}

/// Text shown for a fetch outcome.
pub fn render_outcome(
    outcome: &FetchOutcome,
    station: &StationEntry,
    traffic: &TrafficType,
) -> Result<String, String> {
    match outcome {
        FetchOutcome::Success(departures) => {
            let mut out = format!(
                "Departures from {} ({}), {}:\n",
                station.display_name(),
                station.code,
                traffic.name
            );
            for d in departures {
                let _ = writeln!(
                    out,
                    "  {:<7} {:<28} platform {:<3} train {}",
                    d.hora, d.estacion, d.via, d.tren
                );
            }
            Ok(out)
        }
        FetchOutcome::EmptySuccess => Ok(format!(
            "No departures found for {} and traffic type '{}'. \
             There may be no trains scheduled right now for these criteria.\n",
            station.display_name(),
            traffic.name
        )),
        FetchOutcome::Failure(e) => Err(format!("Could not get departures: {e}")),
    }
}

fn station_choices(registry: &Registry) -> String {
    registry
        .stations()
        .map(|s| format!("{} {}", s.code, s.display_name()))
        .collect::<Vec<_>>()
        .join(", ")
}

fn traffic_choices(registry: &Registry) -> String {
    registry
        .traffic_types()
        .map(|t| format!("{} {}", t.key, t.name))
        .collect::<Vec<_>>()
        .join(", ")
}
