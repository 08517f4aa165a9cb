//! Append-only history of lake observations.
//!
//! The log is a table of string rows whose first row is the header. Rows
//! are appended and never rewritten. [`TabularStore`] is the seam between
//! the log and where the table lives: a Google Sheet in production or a
//! local CSV file.

pub mod csv_sheet;
pub mod error;
pub mod google;

pub use csv_sheet::CsvSheet;
pub use error::{Result, StoreError};
pub use google::{GoogleSheet, ServiceAccountKey};

use klm_lake::history::{header_cells, HistoryRow, HistoryTable};
use log::{info, warn};

/// A table of string rows that can only grow at the bottom.
#[allow(async_fn_in_trait)]
pub trait TabularStore {
    /// The first row, or `None` when the table is empty.
    async fn first_row(&self) -> Result<Option<Vec<String>>>;

    /// Every row, header included.
    async fn all_rows(&self) -> Result<Vec<Vec<String>>>;

    /// Insert rows after the last populated row.
    async fn append_rows(&self, rows: &[Vec<String>]) -> Result<()>;
}

/// What an append did to the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AppendOutcome {
    pub header_written: bool,
}

pub struct HistoryLog<S> {
    store: S,
}

impl<S: TabularStore> HistoryLog<S> {
    pub fn new(store: S) -> Self {
        HistoryLog { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Append one row, writing the header first if the table is empty.
    pub async fn append(&self, row: &HistoryRow) -> Result<AppendOutcome> {
        let header_written = match self.store.first_row().await? {
            Some(first) if first.iter().any(|cell| !cell.is_empty()) => false,
            _ => {
                info!("History is empty, writing header");
                self.store.append_rows(&[header_cells()]).await?;
                true
            }
        };
        self.store.append_rows(&[row.cells().to_vec()]).await?;
        Ok(AppendOutcome { header_written })
    }

    /// Read the whole log. `None` when it holds no data rows.
    pub async fn read_all(&self) -> Result<Option<HistoryTable>> {
        let rows = self.store.all_rows().await?;
        let count = rows.len();
        let table = HistoryTable::from_raw(rows);
        match &table {
            Some(t) => info!("Loaded {} history rows", t.len()),
            None => warn!("History has {} row(s), no data to chart", count),
        }
        Ok(table)
    }
}
