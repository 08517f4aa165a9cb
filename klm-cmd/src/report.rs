//! The combined weather and lake report.

use crate::config::Config;
use crate::lake::{chart_path, run_lake_at, LakeOutcome};
use crate::notify::{Mailer, CHART_CONTENT_ID};
use anyhow::Context;
use chrono::DateTime;
use chrono_tz::Tz;
use klm_lake::scrape::LakeSource;
use klm_lake::weather::{WeatherClient, WeatherReport};
use klm_report::{render_report, write_document, CHART_FILE, REPORT_FILE};
use log::{info, warn};

pub async fn fetch_weather(config: &Config) -> anyhow::Result<WeatherReport> {
    info!("→ Fetching weather");
    let client = WeatherClient::new(
        config.weather_api_key.as_deref(),
        config.latitude,
        config.longitude,
    )?;
    let report = client.fetch_report().await.context("weather fetch failed")?;
    info!("✓ Weather for {}", report.timezone);
    Ok(report)
}

async fn email_report(
    config: &Config,
    weather: &WeatherReport,
    lake: &LakeOutcome,
    now: &DateTime<Tz>,
) -> anyhow::Result<()> {
    let Some(mailer) = Mailer::from_config(&config.mail)? else {
        info!("→ Email not configured, skipping");
        return Ok(());
    };
    // attach the chart only when this run produced it
    let chart = match lake.chart_bytes {
        Some(_) => std::fs::read(chart_path(config)).ok(),
        None => None,
    };
    let chart_src = if chart.is_some() {
        format!("cid:{CHART_CONTENT_ID}")
    } else {
        CHART_FILE.to_string()
    };
    let html = render_report(weather, lake.lake_data(), &chart_src, now);
    let subject = format!(
        "Birchdale Weather & Lake Report - {}",
        now.format("%B %d, %Y")
    );
    let message = mailer.build_message(&subject, html, chart)?;
    mailer.send(message).await
}

/// Weather first (fatal on failure), then the lake pipeline, the report
/// page and the email.
pub async fn run_report_at<S: LakeSource>(
    config: &Config,
    weather: WeatherReport,
    source: &S,
    now: DateTime<Tz>,
) -> LakeOutcome {
    let lake = run_lake_at(config, source, now).await;

    let path = config.output_dir.join(REPORT_FILE);
    let html = render_report(&weather, lake.lake_data(), CHART_FILE, &now);
    match write_document(&path, &html) {
        Ok(()) => info!("✓ Report written to {}", path.display()),
        Err(e) => warn!("✗ Could not write {}: {e}", path.display()),
    }

    match email_report(config, &weather, &lake, &now).await {
        Ok(()) => {}
        Err(e) => warn!("✗ Email failed: {e:#}"),
    }
    lake
}
