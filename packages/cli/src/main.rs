#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Command-line entry point for the quake map dashboard.
//!
//! Prints the aggregated summary, renders a dashboard snapshot to disk,
//! runs the demo alert, or starts the API server. Without a subcommand
//! the user picks one interactively.
//!
//! Uses `indicatif-log-bridge` (via [`quake_map_cli_utils::init_logger`])
//! so that log lines and the loading spinner never fight for the terminal.

mod terminal;

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use dialoguer::{Confirm, Input, Select};
use quake_map_alert::{AlertBus, DemoAlertSource};
use quake_map_analytics::{aggregate, aggregate_strict};
use quake_map_cli_utils::{LoadingSpinner, MultiProgress};
use quake_map_client::{EarthquakeFeed, JsonFileFeed};
use quake_map_dashboard::{Dashboard, DashboardConfig, http_feed, scroll_up};
use quake_map_server::ApiDashboard;

use crate::terminal::TerminalPage;

#[derive(Parser)]
#[command(name = "quake_map", about = "Earthquake dashboard tools")]
struct Cli {
    /// Config file overriding the built-in defaults
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the aggregated magnitude, monthly and regional summaries
    Summary {
        /// Fail if any record is malformed instead of skipping it
        #[arg(long)]
        strict: bool,
        /// Read records from a JSON file instead of the backend
        #[arg(long)]
        input: Option<PathBuf>,
    },
    /// Render the dashboard and write the snapshot as JSON
    Render {
        /// Output file
        #[arg(long)]
        out: PathBuf,
        /// Read records from a JSON file instead of the backend
        #[arg(long)]
        input: Option<PathBuf>,
    },
    /// Load the dashboard and wait for the demo earthquake alert
    Alerts {
        /// Read records from a JSON file instead of the backend
        #[arg(long)]
        input: Option<PathBuf>,
    },
    /// Start the API server
    Serve,
}

/// Interactive tool selection.
enum Tool {
    Summary,
    Render,
    Alerts,
    Serve,
}

impl Tool {
    const ALL: &[Self] = &[Self::Summary, Self::Render, Self::Alerts, Self::Serve];

    #[must_use]
    const fn label(&self) -> &'static str {
        match self {
            Self::Summary => "Print earthquake summary",
            Self::Render => "Render dashboard snapshot",
            Self::Alerts => "Run alert demo",
            Self::Serve => "Start server",
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let multi = quake_map_cli_utils::init_logger();
    let cli = Cli::parse();
    let config = DashboardConfig::load(cli.config.as_deref())?;
    let interactive = cli.command.is_none();

    let command = match cli.command {
        Some(command) => command,
        None => prompt_command()?,
    };

    match command {
        Commands::Summary { strict, input } => {
            summary(&multi, &config, input.as_deref(), strict).await?;
        }
        Commands::Render { out, input } => render(&multi, &config, input.as_deref(), &out).await?,
        Commands::Alerts { input } => alerts(&multi, &config, input.as_deref()).await?,
        Commands::Serve => {
            // The server uses actix-web's runtime, so we need to run it
            // in a blocking task to avoid nesting tokio runtimes.
            tokio::task::spawn_blocking(move || {
                let system = actix_web::rt::System::new();
                if interactive {
                    system.block_on(quake_map_server::interactive::run(config))
                } else {
                    system.block_on(quake_map_server::run_server(config))
                }
            })
            .await??;
        }
    }

    Ok(())
}

fn prompt_command() -> Result<Commands, Box<dyn std::error::Error>> {
    println!("Quake Map");
    println!();

    let labels: Vec<&str> = Tool::ALL.iter().map(Tool::label).collect();
    let idx = Select::new()
        .with_prompt("What would you like to do?")
        .items(&labels)
        .default(0)
        .interact()?;

    Ok(match Tool::ALL[idx] {
        Tool::Summary => Commands::Summary {
            strict: Confirm::new()
                .with_prompt("Reject the batch on malformed records?")
                .default(false)
                .interact()?,
            input: None,
        },
        Tool::Render => Commands::Render {
            out: PathBuf::from(
                Input::<String>::new()
                    .with_prompt("Output file")
                    .default("data/dashboard.json".to_string())
                    .interact_text()?,
            ),
            input: None,
        },
        Tool::Alerts => Commands::Alerts { input: None },
        Tool::Serve => Commands::Serve,
    })
}

/// Reads from `input` when given, otherwise from the configured backend.
fn open_feed(
    config: &DashboardConfig,
    input: Option<&Path>,
) -> Result<Box<dyn EarthquakeFeed>, Box<dyn std::error::Error>> {
    Ok(match input {
        Some(path) => Box::new(JsonFileFeed::new(path)),
        None => Box::new(http_feed(config)?),
    })
}

async fn summary(
    multi: &MultiProgress,
    config: &DashboardConfig,
    input: Option<&Path>,
    strict: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let feed = open_feed(config, input)?;

    let spinner = LoadingSpinner::start(multi, &format!("Fetching {}", feed.describe()));
    let records = match feed.fetch_earthquakes().await {
        Ok(records) => {
            spinner.finish(&format!("Loaded {} earthquakes", records.len()));
            records
        }
        Err(e) => {
            spinner.finish_and_clear();
            return Err(e.into());
        }
    };

    let summary = if strict {
        aggregate_strict(&records)?
    } else {
        aggregate(&records)
    };

    if summary.skipped_count() > 0 {
        log::warn!("{} malformed records skipped", summary.skipped_count());
    }

    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}

async fn render(
    multi: &MultiProgress,
    config: &DashboardConfig,
    input: Option<&Path>,
    out: &Path,
) -> Result<(), Box<dyn std::error::Error>> {
    let feed = open_feed(config, input)?;
    let mut page = TerminalPage::new(multi, config.map_view());
    let report = Dashboard::new().load(&mut page, feed.as_ref()).await;

    if let Some(error) = &report.error {
        return Err(format!("Error fetching earthquake data: {error}").into());
    }

    let body = ApiDashboard {
        page: page.page().snapshot(),
        report,
    };

    if let Some(parent) = out.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(out, serde_json::to_string_pretty(&body)?)?;

    log::info!("Dashboard snapshot written to {}", out.display());
    Ok(())
}

/// What the user does with a shown alert.
enum AlertAction {
    ViewDetails,
    Close,
}

impl AlertAction {
    const ALL: &[Self] = &[Self::ViewDetails, Self::Close];

    #[must_use]
    const fn label(&self) -> &'static str {
        match self {
            Self::ViewDetails => "View details",
            Self::Close => "Close",
        }
    }
}

async fn alerts(
    multi: &MultiProgress,
    config: &DashboardConfig,
    input: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let Some(delay) = config.demo_alert_delay() else {
        println!("Demo alerts are disabled (alerts.demo = false).");
        return Ok(());
    };

    let feed = open_feed(config, input)?;
    let mut page = TerminalPage::new(multi, config.map_view());
    let mut dashboard = Dashboard::new();
    let report = dashboard.load(&mut page, feed.as_ref()).await;
    if let Some(error) = &report.error {
        log::warn!("Dashboard loaded without data: {error}");
    }

    let bus = AlertBus::new();
    let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
    let _subscription = bus.subscribe(move |event| {
        tx.send(event.clone()).ok();
    });
    tokio::spawn(DemoAlertSource::new(delay).run(bus));

    let spinner = LoadingSpinner::start(multi, "Waiting for earthquake alerts...");
    let event = rx.recv().await;
    spinner.finish_and_clear();
    let Some(event) = event else {
        return Ok(());
    };

    if !dashboard.show_alert(&mut page, event.clone())? {
        return Ok(());
    }

    println!();
    println!("New Earthquake Alert");
    println!("  Location:  {}", event.location);
    println!("  Magnitude: {}", event.magnitude);
    println!("  Time:      {}", event.time);
    println!();

    let labels: Vec<&str> = AlertAction::ALL.iter().map(AlertAction::label).collect();
    let idx = Select::new()
        .with_prompt("Alert")
        .items(&labels)
        .default(0)
        .interact()?;

    match AlertAction::ALL[idx] {
        AlertAction::ViewDetails => {
            if let Some(url) = dashboard.view_alert_details(&mut page)? {
                println!("Details: {url}");
            }
        }
        AlertAction::Close => dashboard.dismiss_alert(&mut page)?,
    }

    scroll_up(&mut page)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serve_subcommand_skips_the_menu() {
        let cli = Cli::try_parse_from(["quake_map", "serve"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::Serve)));
    }

    #[test]
    fn no_subcommand_falls_back_to_the_menu() {
        let cli = Cli::try_parse_from(["quake_map", "--config", "quake.toml"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.config, Some(PathBuf::from("quake.toml")));
    }

    #[test]
    fn render_requires_output_path() {
        assert!(Cli::try_parse_from(["quake_map", "render"]).is_err());
        let cli = Cli::try_parse_from(["quake_map", "render", "--out", "dash.json"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::Render { .. })));
    }
}
