//! Coercion of raw history rows and same-day grouping.

use crate::error::{DataError, Result};
use chrono::NaiveDate;
use klm_lake::history::{column, HistoryTable, HEADER};
use klm_utils::dates::parse_scrape_date;
use std::collections::BTreeMap;

/// One history row with its cells coerced. Unparseable cells are `None`.
#[derive(Debug, Clone, PartialEq)]
pub struct LogRecord {
    pub date: Option<NaiveDate>,
    pub level: Option<f64>,
    pub forecast_level: Option<f64>,
    pub forecast_date: Option<String>,
}

/// At most one per calendar date.
#[derive(Debug, Clone, PartialEq)]
pub struct DailyPoint {
    pub date: NaiveDate,
    /// Mean of the day's level readings, in feet.
    pub level: f64,
    /// Last forecast level seen that day, in row order.
    pub forecast_level: Option<f64>,
    /// Last forecast date text seen that day, in row order.
    pub forecast_date: Option<String>,
}

/// Parse a numeric cell; blanks and junk are missing.
pub fn parse_number(cell: &str) -> Option<f64> {
    cell.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

fn non_blank(cell: &str) -> Option<String> {
    let trimmed = cell.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Coerce every data row of the table.
///
/// The scrape time and level columns are required. Forecast columns are
/// optional, historical imports do not carry them.
pub fn coerce_records(table: &HistoryTable) -> Result<Vec<LogRecord>> {
    let time_idx = table
        .column_index(HEADER[column::SCRAPE_TIME])
        .ok_or_else(|| DataError::MissingColumn(HEADER[column::SCRAPE_TIME].to_string()))?;
    let level_idx = table
        .level_column()
        .ok_or_else(|| DataError::MissingColumn(HEADER[column::QUEENS_BAY_FT].to_string()))?;
    let forecast_level_idx = table.column_index(HEADER[column::FORECAST_LEVEL]);
    let forecast_date_idx = table.column_index(HEADER[column::FORECAST_DATE]);

    fn cell(row: &[String], idx: usize) -> &str {
        row.get(idx).map(String::as_str).unwrap_or("")
    }

    Ok(table
        .rows
        .iter()
        .map(|row| LogRecord {
            date: parse_scrape_date(cell(row, time_idx)),
            level: parse_number(cell(row, level_idx)),
            forecast_level: forecast_level_idx.and_then(|i| parse_number(cell(row, i))),
            forecast_date: forecast_date_idx.and_then(|i| non_blank(cell(row, i))),
        })
        .collect())
}

#[derive(Default)]
struct DayAccumulator {
    sum: f64,
    count: usize,
    forecast_level: Option<f64>,
    forecast_date: Option<String>,
}

/// Collapse records into one point per date, sorted by date.
///
/// Levels are averaged, forecast values keep the last non-missing one in
/// record order, and dates without a level reading are dropped.
pub fn group_by_day(records: &[LogRecord]) -> Vec<DailyPoint> {
    let mut days: BTreeMap<NaiveDate, DayAccumulator> = BTreeMap::new();
    for record in records {
        let Some(date) = record.date else {
            continue;
        };
        let acc = days.entry(date).or_default();
        if let Some(level) = record.level {
            acc.sum += level;
            acc.count += 1;
        }
        if record.forecast_level.is_some() {
            acc.forecast_level = record.forecast_level;
        }
        if record.forecast_date.is_some() {
            acc.forecast_date = record.forecast_date.clone();
        }
    }

    days.into_iter()
        .filter(|(_, acc)| acc.count > 0)
        .map(|(date, acc)| DailyPoint {
            date,
            level: acc.sum / acc.count as f64,
            forecast_level: acc.forecast_level,
            forecast_date: acc.forecast_date,
        })
        .collect()
}
