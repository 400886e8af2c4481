#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Standalone entry point for the quake map API server.
//!
//! Reads configuration from the file named by `QUAKE_MAP_CONFIG` (if set)
//! plus environment overrides, then serves until interrupted.

use quake_map_dashboard::DashboardConfig;

#[actix_web::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init_custom_env("RUST_LOG");

    let config = DashboardConfig::load(None)?;
    quake_map_server::run_server(config).await?;

    Ok(())
}
