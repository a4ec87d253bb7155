//! HTTP handler functions for the freezing-zones API.

use actix_web::{HttpResponse, web};
use freezing_zones_analytics_models::RegionFilter;
use freezing_zones_dashboard::FilterState;
use freezing_zones_server_models::{ApiError, ApiHealth, ApiYears, DashboardQueryParams};
use freezing_zones_source::progress::NullProgress;

use crate::AppState;

/// `GET /api/health`
pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(ApiHealth {
        healthy: true,
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// `GET /api/years`
///
/// Lists the years the year selector offers, newest first.
pub async fn years(state: web::Data<AppState>) -> HttpResponse {
    let years: Vec<String> = state
        .dashboard
        .lock()
        .await
        .supported_years()
        .iter()
        .map(ToString::to_string)
        .collect();

    HttpResponse::Ok().json(ApiYears {
        default_year: years.first().cloned(),
        years,
    })
}

/// `GET /api/dashboard`
///
/// Runs the dashboard pipeline for the requested year and region filters.
/// Answers `400` for an unusable year and `502` when the upstream load
/// fails.
pub async fn dashboard(
    state: web::Data<AppState>,
    params: web::Query<DashboardQueryParams>,
) -> HttpResponse {
    let mut dashboard = state.dashboard.lock().await;

    let year = match params.year.as_deref() {
        Some(raw) => match dashboard.parse_year(raw) {
            Ok(year) => year,
            Err(e) => return HttpResponse::BadRequest().json(ApiError::new(e)),
        },
        None => match dashboard.supported_years().first() {
            Some(&year) => year,
            None => {
                return HttpResponse::InternalServerError()
                    .json(ApiError::new("No supported years configured"));
            }
        },
    };

    let filter = FilterState {
        year,
        province: params
            .province
            .as_deref()
            .map(RegionFilter::from)
            .unwrap_or_default(),
        district: params
            .district
            .as_deref()
            .map(RegionFilter::from)
            .unwrap_or_default(),
    };

    if params.refresh {
        dashboard.refresh(year);
    }

    match dashboard.view(&filter, &NullProgress).await {
        Ok(outcome) => HttpResponse::Ok().json(outcome),
        Err(e) => {
            log::error!("Failed to load freezing zones for {year}: {e}");
            HttpResponse::BadGateway().json(ApiError::new(format!(
                "No data available for {year}: upstream request failed"
            )))
        }
    }
}
