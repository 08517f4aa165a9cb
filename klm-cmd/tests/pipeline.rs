//! End-to-end runs of the lake and report pipelines against a local CSV
//! history and a saved copy of the lake page.

use chrono::{DateTime, TimeZone};
use chrono_tz::Tz;
use klm_cmd::config::{Config, HistorySource};
use klm_cmd::lake::{run_chart_at, run_lake_at};
use klm_cmd::report::run_report_at;
use klm_lake::scrape::{LakeSource, StaticPage, Unavailable};
use klm_lake::weather::WeatherReport;
use klm_lake::LakeError;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const PAGE: &str = include_str!("fixtures/lakes.html");

struct FailingSource;

impl LakeSource for FailingSource {
    async fn fetch_document(&self) -> klm_lake::Result<String> {
        Err(LakeError::HttpStatus {
            url: "https://lake.invalid/lakes.jsp".to_string(),
            status: 503,
        })
    }
}

fn config(dir: &Path) -> Config {
    Config {
        history: HistorySource::Csv(dir.join("history.csv")),
        output_dir: dir.join("public"),
        ..Config::default()
    }
}

fn at(day: u32) -> DateTime<Tz> {
    chrono_tz::America::Vancouver
        .with_ymd_and_hms(2026, 6, day, 8, 0, 0)
        .unwrap()
}

fn history_lines(dir: &Path) -> Vec<String> {
    fs::read_to_string(dir.join("history.csv"))
        .unwrap_or_default()
        .lines()
        .map(str::to_string)
        .collect()
}

fn weather() -> WeatherReport {
    serde_json::from_value(serde_json::json!({
        "lat": 50.04, "lon": -116.89, "timezone": "America/Vancouver",
        "timezone_offset": -25200,
        "current": {"dt": 1781449200, "temp": 16.0, "feels_like": 15.1, "humidity": 60,
                    "wind_speed": 1.5, "wind_deg": 90,
                    "weather": [{"main": "Clear", "description": "clear sky"}]},
        "hourly": [],
        "daily": []
    }))
    .unwrap()
}

#[tokio::test]
async fn test_first_run_records_without_chart() {
    let dir = TempDir::new().unwrap();
    let config = config(dir.path());

    let outcome = run_lake_at(&config, &StaticPage(PAGE.to_string()), at(14)).await;
    assert!(outcome.appended);
    assert_eq!(outcome.lake_data().map(|o| o.group_count()), Some(4));
    // one day of data is not a line
    assert!(outcome.chart_bytes.is_none());
    assert!(!config.output_dir.join("lake_chart.png").exists());

    let lines = history_lines(dir.path());
    assert_eq!(lines.len(), 2);
    assert!(lines[0].starts_with("Scrape Time"));
    assert!(lines[1].starts_with("2026-06-14 08:00:00,1745.32,531.97"));

    let page = fs::read_to_string(config.output_dir.join("lake.html")).unwrap();
    assert!(page.contains("1745.32"));
}

#[tokio::test]
async fn test_second_day_draws_chart() {
    let dir = TempDir::new().unwrap();
    let config = config(dir.path());
    let source = StaticPage(PAGE.to_string());

    run_lake_at(&config, &source, at(14)).await;
    let outcome = run_lake_at(&config, &source, at(15)).await;

    assert!(outcome.appended);
    assert_eq!(history_lines(dir.path()).len(), 3);
    assert!(outcome.chart_bytes.is_some_and(|n| n > 0));

    let png = fs::read(config.output_dir.join("lake_chart.png")).unwrap();
    assert_eq!(&png[..8], &klm_chart::PNG_SIGNATURE);

    let rebuilt = run_chart_at(&config, at(15)).await.unwrap();
    assert!(rebuilt > 0);
}

#[tokio::test]
async fn test_unmatched_page_appends_nothing() {
    let dir = TempDir::new().unwrap();
    let config = config(dir.path());

    let page = StaticPage("<html><body>Site maintenance</body></html>".to_string());
    let outcome = run_lake_at(&config, &page, at(14)).await;

    assert!(outcome.observation.is_some());
    assert!(outcome.lake_data().is_none());
    assert!(!outcome.appended);
    assert!(history_lines(dir.path()).is_empty());

    let html = fs::read_to_string(config.output_dir.join("lake.html")).unwrap();
    assert!(!html.contains("1745.32"));
}

#[tokio::test]
async fn test_failed_fetch_still_writes_page() {
    let dir = TempDir::new().unwrap();
    let config = config(dir.path());

    run_lake_at(&config, &StaticPage(PAGE.to_string()), at(14)).await;
    let outcome = run_lake_at(&config, &FailingSource, at(15)).await;

    assert!(outcome.observation.is_none());
    assert!(!outcome.appended);
    assert_eq!(history_lines(dir.path()).len(), 2);
    assert!(outcome.page.is_some());
}

fn plant_old_chart(config: &Config) {
    fs::create_dir_all(&config.output_dir).unwrap();
    let mut old = klm_chart::PNG_SIGNATURE.to_vec();
    old.extend_from_slice(b"OLD CHART");
    fs::write(config.output_dir.join("lake_chart.png"), old).unwrap();
}

#[tokio::test]
async fn test_old_chart_removed_when_history_is_empty() {
    let dir = TempDir::new().unwrap();
    let config = config(dir.path());
    plant_old_chart(&config);

    let page = StaticPage("<html><body>Site maintenance</body></html>".to_string());
    let outcome = run_lake_at(&config, &page, at(14)).await;

    assert!(outcome.chart_bytes.is_none());
    assert!(!config.output_dir.join("lake_chart.png").exists());
}

#[tokio::test]
async fn test_old_chart_removed_when_history_unavailable() {
    let dir = TempDir::new().unwrap();
    let config = Config {
        history: HistorySource::Sheet {
            spreadsheet_id: "sheet".to_string(),
            sheet_name: "Lake Level Data".to_string(),
            credentials_file: dir.path().join("missing.json"),
            credentials_json: None,
        },
        ..config(dir.path())
    };
    plant_old_chart(&config);

    let outcome = run_lake_at(&config, &StaticPage(PAGE.to_string()), at(14)).await;

    assert!(!outcome.appended);
    assert!(!config.output_dir.join("lake_chart.png").exists());
    assert!(outcome.page.is_some());
    assert!(run_chart_at(&config, at(14)).await.is_err());
}

#[tokio::test]
async fn test_chart_command_needs_history() {
    let dir = TempDir::new().unwrap();
    assert!(run_chart_at(&config(dir.path()), at(14)).await.is_err());
}

#[tokio::test]
async fn test_report_without_lake_data() {
    let dir = TempDir::new().unwrap();
    let config = config(dir.path());

    let outcome = run_report_at(&config, weather(), &FailingSource, at(14)).await;
    assert!(outcome.lake_data().is_none());

    let html = fs::read_to_string(config.output_dir.join("index.html")).unwrap();
    assert!(html.contains("N/A"));
    assert!(html.contains("lake_chart.png"));
    assert!(config.output_dir.join("lake.html").exists());
}

#[tokio::test]
async fn test_report_when_lake_source_unavailable() {
    let dir = TempDir::new().unwrap();
    let config = config(dir.path());

    let source = Unavailable("client build failed".to_string());
    let outcome = run_report_at(&config, weather(), &source, at(14)).await;
    assert!(outcome.observation.is_none());

    let html = fs::read_to_string(config.output_dir.join("index.html")).unwrap();
    assert!(html.contains("N/A"));
    assert!(config.output_dir.join("lake.html").exists());
}

#[tokio::test]
async fn test_report_with_lake_data() {
    let dir = TempDir::new().unwrap();
    let config = config(dir.path());

    let outcome = run_report_at(&config, weather(), &StaticPage(PAGE.to_string()), at(14)).await;
    assert!(outcome.appended);

    let html = fs::read_to_string(config.output_dir.join("index.html")).unwrap();
    assert!(html.contains("1745.32"));
    assert!(html.contains("45000"));
}
