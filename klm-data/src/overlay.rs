//! Year-over-year overlays on a shared reference calendar.

use crate::daily::DailyPoint;
use chrono::{Datelike, NaiveDate};
use klm_utils::dates::project_onto_year;

/// Highest-water years on record.
pub const HIGHEST_YEARS: [i32; 2] = [2012, 2018];
/// Lowest-water years on record.
pub const LOWEST_YEARS: [i32; 2] = [2008, 2002];
pub const RECENT_YEARS: [i32; 5] = [2020, 2021, 2022, 2023, 2024];

/// A line needs two points to be drawn.
pub const MIN_LINE_POINTS: usize = 2;

/// Which group a plotted year belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum YearKind {
    Highest,
    Lowest,
    Recent,
    Current,
}

/// One year of daily levels, re-dated onto the reference year.
#[derive(Debug, Clone, PartialEq)]
pub struct YearOverlay {
    pub year: i32,
    pub kind: YearKind,
    /// `(reference-year date, level)` sorted by date.
    pub points: Vec<(NaiveDate, f64)>,
}

/// The years to plot, in drawing order. The current year always comes last
/// so it lands on top, even when it is also one of the fixed years.
pub fn reference_years(current_year: i32) -> Vec<(i32, YearKind)> {
    let fixed = HIGHEST_YEARS
        .iter()
        .map(|y| (*y, YearKind::Highest))
        .chain(LOWEST_YEARS.iter().map(|y| (*y, YearKind::Lowest)))
        .chain(RECENT_YEARS.iter().map(|y| (*y, YearKind::Recent)));

    let mut years: Vec<(i32, YearKind)> = fixed.filter(|(y, _)| *y != current_year).collect();
    years.push((current_year, YearKind::Current));
    years
}

/// Project the points of `year` onto `reference_year`.
pub fn overlay_year(daily: &[DailyPoint], year: i32, reference_year: i32) -> Vec<(NaiveDate, f64)> {
    let mut points: Vec<(NaiveDate, f64)> = daily
        .iter()
        .filter(|p| p.date.year() == year)
        .map(|p| (project_onto_year(&p.date, reference_year), p.level))
        .collect();
    // stable: a projected Feb 29 stays after the real Feb 28
    points.sort_by_key(|(date, _)| *date);
    points
}

/// Overlays for every reference year with enough points to draw a line.
pub fn year_overlays(daily: &[DailyPoint], reference_year: i32) -> Vec<YearOverlay> {
    reference_years(reference_year)
        .into_iter()
        .filter_map(|(year, kind)| {
            let points = overlay_year(daily, year, reference_year);
            if points.len() < MIN_LINE_POINTS {
                log::debug!("Skipping {year}: {} point(s)", points.len());
                return None;
            }
            Some(YearOverlay { year, kind, points })
        })
        .collect()
}
