//! Turns the raw lake history into the series the chart draws.
//!
//! Rows are coerced ([`daily::coerce_records`]), grouped to one point per
//! day, then split into per-year overlays on the reference-year calendar.
//! The envelope band comes from the daily points and the forecast markers
//! from the raw rows.

pub mod daily;
pub mod envelope;
pub mod error;
pub mod forecast;
pub mod overlay;

pub use daily::{DailyPoint, LogRecord};
pub use envelope::EnvelopePoint;
pub use error::{DataError, Result};
pub use forecast::ForecastMarker;
pub use overlay::{YearKind, YearOverlay};

use klm_lake::HistoryTable;
use log::info;

/// Everything needed to draw one chart.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartData {
    pub reference_year: i32,
    pub overlays: Vec<YearOverlay>,
    pub envelope: Vec<EnvelopePoint>,
    pub markers: Vec<ForecastMarker>,
}

impl ChartData {
    /// Prepare chart series from the history, projected onto `reference_year`.
    pub fn from_history(table: &HistoryTable, reference_year: i32) -> Result<Self> {
        let records = daily::coerce_records(table)?;
        let daily = daily::group_by_day(&records);
        let (Some(first), Some(last)) = (daily.first(), daily.last()) else {
            return Err(DataError::NoLevelData);
        };
        info!(
            "Processed {} daily points, {} to {}",
            daily.len(),
            first.date,
            last.date
        );

        let overlays = overlay::year_overlays(&daily, reference_year);
        let envelope = envelope::historical_envelope(&daily, reference_year);
        let markers = forecast::forecast_markers(&records, reference_year);
        info!(
            "{} year line(s), {} band day(s), {} forecast marker(s)",
            overlays.len(),
            envelope.len(),
            markers.len()
        );

        Ok(ChartData {
            reference_year,
            overlays,
            envelope,
            markers,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use klm_lake::history::header_cells;

    fn history(rows: &[[&str; 3]]) -> HistoryTable {
        // Scrape Time, Queen's Bay (ft), ..., Forecast Level (8), Forecast Date (10)
        let mut raw = vec![header_cells()];
        for [time, level, forecast] in rows {
            let mut row = vec![String::new(); 14];
            row[0] = time.to_string();
            row[1] = level.to_string();
            if !forecast.is_empty() {
                row[8] = "1748.0".to_string();
                row[10] = forecast.to_string();
            }
            raw.push(row);
        }
        HistoryTable::from_raw(raw).unwrap()
    }

    #[test]
    fn test_single_row_has_no_lines() {
        let table = history(&[["2026-11-01 08:00:00", "1745.32", "November 21"]]);
        let data = ChartData::from_history(&table, 2026).unwrap();
        assert!(data.overlays.is_empty());
        assert_eq!(data.markers.len(), 1);
    }

    #[test]
    fn test_two_dates_plot_two_points() {
        let table = history(&[
            ["2026-11-01 08:00:00", "1745.25", "November 21"],
            ["2026-11-01 20:00:00", "1745.75", "November 21"],
            ["2026-11-02 08:00:00", "1746.00", ""],
        ]);
        let data = ChartData::from_history(&table, 2026).unwrap();
        assert_eq!(data.overlays.len(), 1);
        assert_eq!(data.overlays[0].points.len(), 2);
        assert_eq!(data.markers.len(), 1);
        let levels: Vec<f64> = data.overlays[0].points.iter().map(|p| p.1).collect();
        assert_eq!(levels, vec![1745.5, 1746.0]);
    }

    #[test]
    fn test_no_levels_is_an_error() {
        let table = history(&[["2026-11-01 08:00:00", "", "November 21"]]);
        assert_eq!(
            ChartData::from_history(&table, 2026),
            Err(DataError::NoLevelData)
        );
    }
}
