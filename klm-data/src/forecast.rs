//! Forecast markers from the raw (ungrouped) history.

use crate::daily::LogRecord;
use chrono::{Datelike, NaiveDate};
use klm_utils::dates::{parse_forecast_date, project_onto_year};
use std::collections::HashSet;

/// Date texts this short are placeholders, not dates.
const MIN_DATE_TEXT_LEN: usize = 4;

/// A yearless date this many days before its scrape is next year's.
const ROLLOVER_DAYS: i64 = 180;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ForecastMarker {
    /// The forecast target date as published.
    pub date: NaiveDate,
    /// `date` on the reference-year calendar.
    pub plot_date: NaiveDate,
    pub level: f64,
}

/// One marker per distinct `(date, level)`, in first-seen order.
///
/// Date text without a year takes the year of the row it was scraped in,
/// or the following year when that would put it well before the scrape.
pub fn forecast_markers(records: &[LogRecord], reference_year: i32) -> Vec<ForecastMarker> {
    let mut seen: HashSet<(NaiveDate, u64)> = HashSet::new();
    let mut markers = Vec::new();
    for record in records {
        let (Some(level), Some(text)) = (record.forecast_level, record.forecast_date.as_deref())
        else {
            continue;
        };
        if text.trim().chars().count() < MIN_DATE_TEXT_LEN {
            continue;
        }
        let Some(date) = resolve_date(text, record.date, reference_year) else {
            log::debug!("Unparseable forecast date '{text}'");
            continue;
        };
        if !seen.insert((date, level.to_bits())) {
            continue;
        }
        markers.push(ForecastMarker {
            date,
            plot_date: project_onto_year(&date, reference_year),
            level,
        });
    }
    markers
}

fn resolve_date(text: &str, scraped: Option<NaiveDate>, fallback_year: i32) -> Option<NaiveDate> {
    let Some(scraped) = scraped else {
        return parse_forecast_date(text, fallback_year);
    };
    let date = parse_forecast_date(text, scraped.year())?;
    if (scraped - date).num_days() > ROLLOVER_DAYS {
        // only a text without its own year changes with the default year
        if let Some(next) = parse_forecast_date(text, scraped.year() + 1) {
            if next != date {
                return Some(next);
            }
        }
    }
    Some(date)
}
