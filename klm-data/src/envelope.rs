//! Historical min/max band per calendar day.

use crate::daily::DailyPoint;
use chrono::{Datelike, NaiveDate};
use klm_utils::dates::project_onto_year;
use std::collections::BTreeMap;
use std::ops::RangeInclusive;

/// Years that contribute to the band.
pub const ENVELOPE_YEARS: RangeInclusive<i32> = 1991..=2024;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnvelopePoint {
    /// Day on the reference-year calendar.
    pub date: NaiveDate,
    pub min: f64,
    pub max: f64,
}

/// Min and max level for each month-day across [`ENVELOPE_YEARS`], on the
/// reference-year calendar and sorted by date.
pub fn historical_envelope(daily: &[DailyPoint], reference_year: i32) -> Vec<EnvelopePoint> {
    let mut band: BTreeMap<NaiveDate, (f64, f64)> = BTreeMap::new();
    for point in daily
        .iter()
        .filter(|p| ENVELOPE_YEARS.contains(&p.date.year()))
    {
        let date = project_onto_year(&point.date, reference_year);
        band.entry(date)
            .and_modify(|(min, max)| {
                *min = min.min(point.level);
                *max = max.max(point.level);
            })
            .or_insert((point.level, point.level));
    }
    band.into_iter()
        .map(|(date, (min, max))| EnvelopePoint { date, min, max })
        .collect()
}
