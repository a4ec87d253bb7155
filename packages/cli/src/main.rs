#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Command-line dashboard for freezing-road accident hotspots.
//!
//! `show` prints the dashboard for one selection, `years` lists the
//! selectable years and `serve` starts the HTTP API. Without a subcommand
//! the user is guided through the selections interactively.
//!
//! Uses `indicatif-log-bridge` (via [`freezing_zones_cli_utils::init_logger`])
//! to route `log` output through `indicatif::MultiProgress` so that log
//! lines and the fetch spinner never fight for the terminal.

mod interactive;
mod render;

use clap::{Parser, Subcommand};
use freezing_zones_analytics_models::RegionFilter;
use freezing_zones_cli_utils::{IndicatifProgress, MultiProgress};
use freezing_zones_dashboard::{Dashboard, DashboardOutcome, FilterState};
use freezing_zones_source::SourceError;
use freezing_zones_source::source_def::SourceDefinition;
use freezing_zones_zone_models::Year;

#[derive(Parser)]
#[command(name = "freezing_zones", about = "Freezing-road accident hotspot dashboard")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the dashboard for a year and region selection
    Show {
        /// 4-digit year (defaults to the newest supported year)
        #[arg(long)]
        year: Option<String>,
        /// Province name, or "all"
        #[arg(long, default_value = "all")]
        province: String,
        /// Full province/district name (e.g. "경기 고양시"), or "all"
        #[arg(long, default_value = "all")]
        district: String,
        /// Print the render model as JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// List the years that can be queried
    Years,
    /// Start the HTTP API server
    Serve,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let multi = freezing_zones_cli_utils::init_logger();
    let cli = Cli::parse();

    let Some(command) = cli.command else {
        return interactive::run(&multi).await;
    };

    match command {
        Commands::Years => {
            for year in SourceDefinition::embedded()?.supported_years() {
                println!("{year}");
            }
        }
        Commands::Show {
            year,
            province,
            district,
            json,
        } => {
            let mut dashboard = Dashboard::from_env()?;
            let year = match year {
                Some(raw) => dashboard.parse_year(&raw)?,
                None => newest_year(&dashboard)?,
            };
            let filter = FilterState {
                year,
                province: RegionFilter::from(province),
                district: RegionFilter::from(district),
            };

            let outcome = match load_view(&mut dashboard, &filter, &multi).await {
                Ok(outcome) => outcome,
                Err(e) => {
                    eprintln!("{}", render::render_load_failure(year));
                    return Err(e.into());
                }
            };

            if json {
                println!("{}", serde_json::to_string_pretty(&outcome)?);
            } else {
                match &outcome {
                    DashboardOutcome::NoData { year } => println!("{}", render::render_no_data(*year)),
                    DashboardOutcome::Ready(view) => println!("{}", render::render_view(view)),
                }
            }
        }
        Commands::Serve => run_server(false).await?,
    }

    Ok(())
}

/// Runs the dashboard pipeline behind a fetch spinner.
///
/// The spinner is cleared on every path, including cache hits where the
/// session never touches it.
async fn load_view(
    dashboard: &mut Dashboard,
    filter: &FilterState,
    multi: &MultiProgress,
) -> Result<DashboardOutcome, SourceError> {
    let progress =
        IndicatifProgress::fetch_spinner(multi, &format!("Loading {} data...", filter.year));
    let outcome = dashboard.view(filter, progress.as_ref()).await;
    progress.finish_and_clear();
    outcome
}

fn newest_year(dashboard: &Dashboard) -> Result<Year, SourceError> {
    dashboard
        .supported_years()
        .first()
        .copied()
        .ok_or_else(|| SourceError::Config {
            message: "no supported years configured".to_string(),
        })
}

/// Starts the API server on its own actix system.
///
/// The server uses actix-web's runtime, so it runs in a blocking task to
/// avoid nesting tokio runtimes.
async fn run_server(interactive: bool) -> Result<(), Box<dyn std::error::Error>> {
    tokio::task::spawn_blocking(move || {
        actix_web::rt::System::new().block_on(async move {
            if interactive {
                freezing_zones_server::interactive::run().await
            } else {
                freezing_zones_server::run_server().await
            }
        })
    })
    .await??;
    Ok(())
}
