#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Actix-Web API server for the freezing-zones dashboard.
//!
//! Serves the dashboard render model as JSON so a web frontend can draw
//! the map, ranked table and charts. The server owns a single
//! [`Dashboard`] whose session cache is shared by every request.

mod handlers;
pub mod interactive;

use actix_cors::Cors;
use actix_web::{App, HttpServer, middleware, web};
use freezing_zones_dashboard::Dashboard;
use tokio::sync::Mutex;

/// Shared application state.
pub struct AppState {
    /// Dashboard pipeline and its session cache. Requests take turns;
    /// loads are idempotent reads, so serializing them is sufficient.
    pub dashboard: Mutex<Dashboard>,
}

impl AppState {
    /// Wraps a dashboard for sharing across workers.
    #[must_use]
    pub fn new(dashboard: Dashboard) -> Self {
        Self {
            dashboard: Mutex::new(dashboard),
        }
    }
}

/// Registers the `/api` routes.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .route("/health", web::get().to(handlers::health))
            .route("/years", web::get().to(handlers::years))
            .route("/dashboard", web::get().to(handlers::dashboard)),
    );
}

/// Starts the freezing-zones API server.
///
/// Builds a [`Dashboard`] from the environment and serves it on
/// `BIND_ADDR:PORT` (default `127.0.0.1:8080`). This is a regular async
/// function; the caller is responsible for providing the async runtime
/// (e.g. via `#[actix_web::main]`).
///
/// # Errors
///
/// Returns an `std::io::Result` error if the dashboard cannot be
/// configured, or if the HTTP server fails to bind or encounters a
/// runtime error.
#[allow(clippy::future_not_send)]
pub async fn run_server() -> std::io::Result<()> {
    pretty_env_logger::try_init_custom_env("RUST_LOG").ok();

    log::info!("Configuring upstream source...");
    let dashboard = Dashboard::from_env().map_err(std::io::Error::other)?;
    let state = web::Data::new(AppState::new(dashboard));

    let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "127.0.0.1".to_string());
    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(8080);

    log::info!("Starting server on {bind_addr}:{port}");

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .app_data(state.clone())
            .configure(configure)
    })
    .bind((bind_addr, port))?
    .run()
    .await
}
