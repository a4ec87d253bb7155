//! Interactive mode for the CLI.
//!
//! Walks the user through year, province and district selection, renders
//! the dashboard, and loops until they quit. Province options come from
//! the loaded year; district options depend on the chosen province.

use dialoguer::Select;
use freezing_zones_analytics_models::RegionFilter;
use freezing_zones_cli_utils::MultiProgress;
use freezing_zones_dashboard::{Dashboard, DashboardOutcome, DashboardView, FilterState};

use crate::{load_view, render};

/// Top-level tool selection.
enum Tool {
    Explore,
    Server,
}

impl Tool {
    const ALL: &[Self] = &[Self::Explore, Self::Server];

    #[must_use]
    const fn label(&self) -> &'static str {
        match self {
            Self::Explore => "Explore the dashboard",
            Self::Server => "Start server",
        }
    }
}

/// What to do after a dashboard has been shown.
enum NextStep {
    ChangeFilters,
    Refresh,
    Quit,
}

impl NextStep {
    const ALL: &[Self] = &[Self::ChangeFilters, Self::Refresh, Self::Quit];

    #[must_use]
    const fn label(&self) -> &'static str {
        match self {
            Self::ChangeFilters => "Change selection",
            Self::Refresh => "Refetch this year",
            Self::Quit => "Quit",
        }
    }
}

/// Runs the interactive session.
///
/// # Errors
///
/// Returns an error if a prompt fails or the dashboard cannot be
/// configured. Upstream load failures are reported and the session
/// continues.
pub async fn run(multi: &MultiProgress) -> Result<(), Box<dyn std::error::Error>> {
    println!("Freezing Zones Dashboard");
    println!();

    let labels: Vec<&str> = Tool::ALL.iter().map(Tool::label).collect();
    let idx = Select::new()
        .with_prompt("What would you like to do?")
        .items(&labels)
        .default(0)
        .interact()?;

    match Tool::ALL[idx] {
        Tool::Explore => explore(multi).await,
        Tool::Server => crate::run_server(true).await,
    }
}

async fn explore(multi: &MultiProgress) -> Result<(), Box<dyn std::error::Error>> {
    let mut dashboard = Dashboard::from_env()?;
    let years = dashboard.supported_years();
    let year_labels: Vec<String> = years.iter().map(ToString::to_string).collect();
    let mut year_idx = 0;

    loop {
        year_idx = Select::new()
            .with_prompt("Year")
            .items(&year_labels)
            .default(year_idx)
            .interact()?;
        let year = years[year_idx];

        match choose_and_render(&mut dashboard, FilterState::for_year(year), multi).await? {
            Some(view) => println!("\n{}\n", render::render_view(&view)),
            None => println!(),
        }

        let steps: Vec<&str> = NextStep::ALL.iter().map(NextStep::label).collect();
        let step = Select::new()
            .with_prompt("Next")
            .items(&steps)
            .default(0)
            .interact()?;

        match NextStep::ALL[step] {
            NextStep::ChangeFilters => {}
            NextStep::Refresh => {
                dashboard.refresh(year);
                log::info!("Dropped cached data for {year}");
            }
            NextStep::Quit => return Ok(()),
        }
    }
}

/// Prompts for province and district within `filter.year` and returns the
/// final view, or `None` if the year has nothing to show.
async fn choose_and_render(
    dashboard: &mut Dashboard,
    mut filter: FilterState,
    multi: &MultiProgress,
) -> Result<Option<DashboardView>, Box<dyn std::error::Error>> {
    let Some(view) = load_or_report(dashboard, &filter, multi).await else {
        return Ok(None);
    };

    filter.province = select_region("Province", &view.province_options)?;

    let view = match load_or_report(dashboard, &filter, multi).await {
        Some(view) => view,
        None => return Ok(None),
    };

    if view.district_options.len() > 1 {
        filter.district = select_region("District", &view.district_options)?;
        return Ok(load_or_report(dashboard, &filter, multi).await);
    }

    Ok(Some(view))
}

async fn load_or_report(
    dashboard: &mut Dashboard,
    filter: &FilterState,
    multi: &MultiProgress,
) -> Option<DashboardView> {
    match load_view(dashboard, filter, multi).await {
        Ok(DashboardOutcome::Ready(view)) => Some(*view),
        Ok(DashboardOutcome::NoData { year }) => {
            println!("{}", render::render_no_data(year));
            None
        }
        Err(e) => {
            log::error!("Failed to load {}: {e}", filter.year);
            println!("{}", render::render_load_failure(filter.year));
            None
        }
    }
}

fn select_region(
    prompt: &str,
    options: &[RegionFilter],
) -> Result<RegionFilter, dialoguer::Error> {
    let labels: Vec<String> = options.iter().map(ToString::to_string).collect();
    let idx = Select::new()
        .with_prompt(prompt)
        .items(&labels)
        .default(0)
        .interact()?;
    Ok(options[idx].clone())
}
