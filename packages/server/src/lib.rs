#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Actix-Web API server for the quake map dashboard.
//!
//! Exposes the aggregated earthquake summary and a full dashboard render
//! (chart configs, marker `GeoJSON`, viewport) as JSON. Every request
//! reads the backend feed afresh.

mod handlers;
pub mod interactive;

use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{App, HttpServer, middleware, web};
use quake_map_client::EarthquakeFeed;
use quake_map_dashboard::{DashboardConfig, http_feed};

pub use handlers::ApiDashboard;

/// Shared application state.
pub struct AppState {
    /// Where earthquakes are read from.
    pub feed: Arc<dyn EarthquakeFeed>,
    /// Loaded configuration.
    pub config: DashboardConfig,
}

/// Registers the `/api` routes.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .route("/health", web::get().to(handlers::health))
            .route("/summary", web::get().to(handlers::summary))
            .route("/dashboard", web::get().to(handlers::dashboard)),
    );
}

/// Starts the server against the HTTP backend named in `config`.
///
/// This is a regular async function; the caller provides the runtime
/// (e.g. via `#[actix_web::main]`).
///
/// # Errors
///
/// Returns an `std::io::Result` error if the HTTP client cannot be built,
/// or the server fails to bind or encounters a runtime error.
#[allow(clippy::future_not_send)]
pub async fn run_server(config: DashboardConfig) -> std::io::Result<()> {
    let feed = http_feed(&config).map_err(std::io::Error::other)?;
    log::info!("Reading earthquakes from {}", feed.describe());
    run_with_feed(config, Arc::new(feed)).await
}

/// Starts the server reading earthquakes from `feed`.
///
/// # Errors
///
/// Returns an `std::io::Result` error if the server fails to bind or
/// encounters a runtime error.
#[allow(clippy::future_not_send)]
pub async fn run_with_feed(
    config: DashboardConfig,
    feed: Arc<dyn EarthquakeFeed>,
) -> std::io::Result<()> {
    let bind_addr = config.server.bind_addr.clone();
    let port = config.server.port;
    let state = web::Data::new(AppState { feed, config });

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
