//! Opening the configured history backend.

use crate::config::HistorySource;
use klm_store::{CsvSheet, GoogleSheet, ServiceAccountKey, TabularStore};
use log::info;

/// Either history backend behind one type.
pub enum HistoryStore {
    Csv(CsvSheet),
    Sheet(GoogleSheet),
}

impl HistoryStore {
    /// Open the backend. For the spreadsheet this loads the key and
    /// authenticates, so it fails on missing or bad credentials.
    pub async fn open(source: &HistorySource) -> klm_store::Result<Self> {
        match source {
            HistorySource::Csv(path) => {
                let sheet = CsvSheet::new(path);
                info!("Using local history {}", sheet.path().display());
                Ok(HistoryStore::Csv(sheet))
            }
            HistorySource::Sheet {
                spreadsheet_id,
                sheet_name,
                credentials_file,
                credentials_json,
            } => {
                let key = ServiceAccountKey::load(credentials_file, credentials_json.as_deref())?;
                let sheet = GoogleSheet::connect(&key, spreadsheet_id, sheet_name).await?;
                Ok(HistoryStore::Sheet(sheet))
            }
        }
    }
}

impl TabularStore for HistoryStore {
    async fn first_row(&self) -> klm_store::Result<Option<Vec<String>>> {
        match self {
            HistoryStore::Csv(s) => s.first_row().await,
            HistoryStore::Sheet(s) => s.first_row().await,
        }
    }

    async fn all_rows(&self) -> klm_store::Result<Vec<Vec<String>>> {
        match self {
            HistoryStore::Csv(s) => s.all_rows().await,
            HistoryStore::Sheet(s) => s.all_rows().await,
        }
    }

    async fn append_rows(&self, rows: &[Vec<String>]) -> klm_store::Result<()> {
        match self {
            HistoryStore::Csv(s) => s.append_rows(rows).await,
            HistoryStore::Sheet(s) => s.append_rows(rows).await,
        }
    }
}
