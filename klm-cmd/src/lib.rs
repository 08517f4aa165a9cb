//! Command implementations for the Kootenay Lake monitor CLI.
//!
//! `lake` scrapes and records the current levels and rebuilds the lake page,
//! `chart` redraws the chart from history, and `report` adds the weather,
//! writes the combined report and emails it.

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use clap::Subcommand;
use klm_lake::scrape::{LakeClient, Unavailable};
use log::{info, warn};

pub mod config;
pub mod lake;
pub mod notify;
pub mod report;
pub mod store;

pub use config::{Config, ConfigArgs};

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Scrape lake levels, append them to the history, redraw the chart and lake page
    Lake,

    /// Redraw the chart from the stored history
    Chart,

    /// Fetch the weather, run the lake pipeline, write index.html and email it
    Report,
}

/// Current time in the configured zone.
pub fn now_in(timezone: Tz) -> DateTime<Tz> {
    Utc::now().with_timezone(&timezone)
}

fn unavailable(error: klm_lake::LakeError) -> Unavailable {
    warn!("✗ Could not build lake page client: {error}");
    Unavailable(error.to_string())
}

pub async fn run(command: Command, config: Config) -> anyhow::Result<()> {
    let now = now_in(config.timezone);
    info!("Kootenay Lake monitor: {command:?} at {}", now.format("%Y-%m-%d %H:%M %Z"));
    match command {
        Command::Lake => {
            match LakeClient::new(&config.lake_url) {
                Ok(source) => lake::run_lake_at(&config, &source, now).await,
                Err(e) => lake::run_lake_at(&config, &unavailable(e), now).await,
            };
            Ok(())
        }
        Command::Chart => {
            lake::run_chart_at(&config, now).await?;
            Ok(())
        }
        Command::Report => {
            let weather = report::fetch_weather(&config).await?;
            match LakeClient::new(&config.lake_url) {
                Ok(source) => report::run_report_at(&config, weather, &source, now).await,
                Err(e) => report::run_report_at(&config, weather, &unavailable(e), now).await,
            };
            Ok(())
        }
    }
}
