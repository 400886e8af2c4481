//! Interactive mode for the server.
//!
//! Prompts the user for the backend URL, bind address and port before
//! starting the server.

use dialoguer::{Confirm, Input};
use quake_map_dashboard::DashboardConfig;

/// Runs the server in interactive mode, prompting for configuration.
///
/// Each prompt defaults to the value already in `config`; answers
/// override it before delegating to [`super::run_server`].
///
/// # Errors
///
/// Returns an `std::io::Result` error if the underlying server fails to
/// start.
#[allow(clippy::future_not_send)]
pub async fn run(mut config: DashboardConfig) -> std::io::Result<()> {
    println!("Quake Map Server");
    println!();

    config.backend.url = Input::new()
        .with_prompt("Earthquake backend URL")
        .default(config.backend.url.clone())
        .interact_text()
        .unwrap_or_else(|_| config.backend.url.clone());

    config.server.bind_addr = Input::new()
        .with_prompt("Bind address")
        .default(config.server.bind_addr.clone())
        .interact_text()
        .unwrap_or_else(|_| config.server.bind_addr.clone());

    config.server.port = Input::new()
        .with_prompt("Port")
        .default(config.server.port)
        .interact_text()
        .unwrap_or(config.server.port);

    let addr = format!("{}:{}", config.server.bind_addr, config.server.port);
    if !Confirm::new()
        .with_prompt(format!("Start server on {addr}?"))
        .default(true)
        .interact()
        .unwrap_or(true)
    {
        println!("Cancelled.");
        return Ok(());
    }

    super::run_server(config).await
}
