//! The fixed 14-column layout of the lake history log.
//!
//! The log is append-only: row 0 is the header (written once, on the first
//! append) and every following row is one scrape event in chronological order.

/// Number of columns in the history log (A through N).
pub const COLUMN_COUNT: usize = 14;

/// Header row written on the first append to an empty log.
pub const HEADER: [&str; COLUMN_COUNT] = [
    "Scrape Time",
    "Queen's Bay (ft)",
    "Queen's Bay (m)",
    "Queen's Bay Updated",
    "Nelson (ft)",
    "Nelson (m)",
    "Nelson Updated",
    "Forecast Trend",
    "Forecast Level",
    "Forecast Location",
    "Forecast Date",
    "Discharge (cfs)",
    "Discharge Location",
    "Discharge Date",
];

/// Column names from historical imports that stored the Queen's Bay level
/// (in feet, despite the name) under a different header.
pub const LEGACY_LEVEL_COLUMN: &str = "level_meters";

/// Column positions within a [`HistoryRow`].
pub mod column {
    pub const SCRAPE_TIME: usize = 0;
    pub const QUEENS_BAY_FT: usize = 1;
    pub const QUEENS_BAY_M: usize = 2;
    pub const QUEENS_BAY_UPDATED: usize = 3;
    pub const NELSON_FT: usize = 4;
    pub const NELSON_M: usize = 5;
    pub const NELSON_UPDATED: usize = 6;
    pub const FORECAST_TREND: usize = 7;
    pub const FORECAST_LEVEL: usize = 8;
    pub const FORECAST_LOCATION: usize = 9;
    pub const FORECAST_DATE: usize = 10;
    pub const DISCHARGE_CFS: usize = 11;
    pub const DISCHARGE_LOCATION: usize = 12;
    pub const DISCHARGE_DATE: usize = 13;
}

/// The header as owned strings, the shape the stores write.
pub fn header_cells() -> Vec<String> {
    HEADER.iter().map(|h| h.to_string()).collect()
}

/// One persisted line of the log: a flattened, stringified observation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryRow(Vec<String>);

impl HistoryRow {
    /// Build a row from cells, padding short rows with empty cells.
    ///
    /// The spreadsheet API drops trailing empty cells when reading, so rows
    /// coming back from a store are routinely shorter than the header.
    pub fn from_cells(mut cells: Vec<String>) -> Self {
        if cells.len() < COLUMN_COUNT {
            cells.resize(COLUMN_COUNT, String::new());
        }
        HistoryRow(cells)
    }

    pub fn cells(&self) -> &[String] {
        &self.0
    }

    /// The cell at `index`, or `""` when the row is shorter.
    pub fn get(&self, index: usize) -> &str {
        self.0.get(index).map(String::as_str).unwrap_or("")
    }
}

/// The whole log as read back from a store: the header plus data rows.
///
/// Column lookups go through the header so that logs with extra or legacy
/// columns still resolve.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryTable {
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl HistoryTable {
    /// Split raw store rows into header and data rows.
    ///
    /// Returns `None` when there is no data row (empty table or header only).
    pub fn from_raw(mut raw: Vec<Vec<String>>) -> Option<Self> {
        if raw.len() < 2 {
            return None;
        }
        let header = raw.remove(0);
        let width = header.len();
        let rows = raw
            .into_iter()
            .map(|mut row| {
                if row.len() < width {
                    row.resize(width, String::new());
                }
                row
            })
            .collect();
        Some(HistoryTable { header, rows })
    }

    /// Number of data rows (the header is not counted).
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of a column by its header text.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.header.iter().position(|h| h.trim() == name)
    }

    /// Position of the Queen's Bay level column, falling back to the legacy
    /// import column.
    pub fn level_column(&self) -> Option<usize> {
        self.column_index(HEADER[column::QUEENS_BAY_FT])
            .or_else(|| self.column_index(LEGACY_LEVEL_COLUMN))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(rows: &[&[&str]]) -> Vec<Vec<String>> {
        rows.iter()
            .map(|r| r.iter().map(|c| c.to_string()).collect())
            .collect()
    }

    #[test]
    fn test_short_rows_are_padded() {
        let row = HistoryRow::from_cells(vec!["2025-06-14 06:00:00".into(), "1745.32".into()]);
        assert_eq!(row.cells().len(), COLUMN_COUNT);
        assert_eq!(row.get(column::QUEENS_BAY_FT), "1745.32");
        assert_eq!(row.get(column::DISCHARGE_DATE), "");
    }

    #[test]
    fn test_table_requires_a_data_row() {
        assert!(HistoryTable::from_raw(vec![]).is_none());
        assert!(HistoryTable::from_raw(vec![header_cells()]).is_none());

        let table =
            HistoryTable::from_raw(raw(&[&HEADER, &["2025-06-14 06:00:00", "1745.32"]])).unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.rows[0].len(), COLUMN_COUNT);
    }

    #[test]
    fn test_level_column_lookup() {
        let table =
            HistoryTable::from_raw(raw(&[&HEADER, &["2025-06-14 06:00:00", "1745.32"]])).unwrap();
        assert_eq!(table.level_column(), Some(column::QUEENS_BAY_FT));

        let legacy = HistoryTable::from_raw(raw(&[
            &["Scrape Time", "level_meters"],
            &["2012-06-01", "1750.1"],
        ]))
        .unwrap();
        assert_eq!(legacy.level_column(), Some(1));
        assert_eq!(legacy.rows[0], vec!["2012-06-01", "1750.1"]);

        let neither =
            HistoryTable::from_raw(raw(&[&["Scrape Time", "other"], &["2012-06-01", "x"]]))
                .unwrap();
        assert_eq!(neither.level_column(), None);
    }
}
