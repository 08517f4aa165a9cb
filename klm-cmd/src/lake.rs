//! The lake pipeline: scrape, append, chart, page.
//!
//! No step here fails the run. Each one logs its outcome and the next step
//! works with whatever the earlier ones produced.

use crate::config::Config;
use crate::store::HistoryStore;
use chrono::{DateTime, Datelike};
use chrono_tz::Tz;
use klm_chart::{find_font, render_chart, ChartError, ChartOptions};
use klm_data::ChartData;
use klm_lake::scrape::{scrape_observation, LakeSource};
use klm_lake::Observation;
use klm_report::{render_lake_page, write_document, CHART_FILE, LAKE_PAGE_FILE};
use klm_store::{HistoryLog, TabularStore};
use log::{info, warn};
use std::fs;
use std::io;
use std::path::PathBuf;

/// What a lake run produced.
#[derive(Debug, Default)]
pub struct LakeOutcome {
    /// `None` when the page could not be fetched.
    pub observation: Option<Observation>,
    pub appended: bool,
    /// Size of the chart written this run.
    pub chart_bytes: Option<u64>,
    pub page: Option<PathBuf>,
}

impl LakeOutcome {
    /// The observation if any field group matched.
    pub fn lake_data(&self) -> Option<&Observation> {
        self.observation.as_ref().filter(|o| !o.is_empty())
    }
}

pub fn chart_path(config: &Config) -> PathBuf {
    config.output_dir.join(CHART_FILE)
}

/// Delete the previous run's chart before the history is touched.
fn remove_stale_chart(config: &Config) {
    let path = chart_path(config);
    match fs::remove_file(&path) {
        Ok(()) => info!("→ Removed previous chart {}", path.display()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => warn!("✗ Could not remove {}: {e}", path.display()),
    }
}

async fn scrape<S: LakeSource>(source: &S, now: &DateTime<Tz>) -> Option<Observation> {
    info!("→ Fetching lake levels");
    match scrape_observation(source, now.naive_local()).await {
        Ok(observation) => {
            if observation.is_empty() {
                warn!("✗ Lake page fetched but no readings matched");
            } else {
                info!("✓ Lake page: {} of 4 readings found", observation.group_count());
            }
            Some(observation)
        }
        Err(e) => {
            warn!("✗ Could not fetch lake page: {e}");
            None
        }
    }
}

async fn append<S: TabularStore>(log: &HistoryLog<S>, observation: &Observation) -> bool {
    match log.append(&observation.to_history_row()).await {
        Ok(outcome) => {
            if outcome.header_written {
                info!("✓ Wrote history header");
            }
            info!("✓ Appended observation to history");
            true
        }
        Err(e) => {
            warn!("✗ Could not append to history: {e}");
            false
        }
    }
}

/// Read the history and draw the chart. `None` when no chart was written.
pub async fn build_chart<S: TabularStore>(
    config: &Config,
    log: &HistoryLog<S>,
    reference_year: i32,
) -> Option<u64> {
    info!("→ Building chart");
    let table = match log.read_all().await {
        Ok(Some(table)) => table,
        Ok(None) => {
            info!("→ Not enough history, no chart");
            return None;
        }
        Err(e) => {
            warn!("✗ Could not read history: {e}");
            return None;
        }
    };

    let data = match ChartData::from_history(&table, reference_year) {
        Ok(data) => data,
        Err(e) => {
            warn!("✗ {e}");
            return None;
        }
    };

    let options = ChartOptions {
        font: find_font(config.chart_font.as_deref()),
        ..ChartOptions::default()
    };
    match render_chart(&data, &chart_path(config), &options) {
        Ok(bytes) => {
            info!("✓ Chart written with {} year line(s)", data.overlays.len());
            Some(bytes)
        }
        Err(ChartError::NoLines) => {
            info!("→ No year has two days of data, no chart");
            None
        }
        Err(e) => {
            warn!("✗ Chart failed: {e}");
            None
        }
    }
}

fn write_lake_page(config: &Config, observation: Option<&Observation>, now: &DateTime<Tz>) -> Option<PathBuf> {
    let path = config.output_dir.join(LAKE_PAGE_FILE);
    match write_document(&path, &render_lake_page(observation, now)) {
        Ok(()) => {
            info!("✓ Lake page written to {}", path.display());
            Some(path)
        }
        Err(e) => {
            warn!("✗ Could not write {}: {e}", path.display());
            None
        }
    }
}

/// Run the whole lake pipeline at `now`.
pub async fn run_lake_at<S: LakeSource>(
    config: &Config,
    source: &S,
    now: DateTime<Tz>,
) -> LakeOutcome {
    let mut outcome = LakeOutcome {
        observation: scrape(source, &now).await,
        ..LakeOutcome::default()
    };

    remove_stale_chart(config);
    match HistoryStore::open(&config.history).await {
        Ok(store) => {
            let log = HistoryLog::new(store);
            match outcome.lake_data() {
                Some(observation) => outcome.appended = append(&log, observation).await,
                None => info!("→ Nothing to append"),
            }
            outcome.chart_bytes = build_chart(config, &log, now.year()).await;
        }
        Err(e) => warn!("✗ History unavailable, skipping append and chart: {e}"),
    }

    outcome.page = write_lake_page(config, outcome.lake_data(), &now);
    outcome
}

/// Rebuild the chart from stored history only.
pub async fn run_chart_at(config: &Config, now: DateTime<Tz>) -> anyhow::Result<u64> {
    remove_stale_chart(config);
    let store = HistoryStore::open(&config.history).await?;
    build_chart(config, &HistoryLog::new(store), now.year())
        .await
        .ok_or_else(|| anyhow::anyhow!("no chart was produced"))
}
