//! A local CSV file standing in for the spreadsheet.
//!
//! Same shape as the sheet: no implicit header, rows of strings, appends
//! go to the end of the file and earlier rows are never rewritten.

use crate::error::Result;
use crate::TabularStore;
use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct CsvSheet {
    path: PathBuf,
}

impl CsvSheet {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        CsvSheet {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_records(&self, limit: Option<usize>) -> Result<Vec<Vec<String>>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_path(&self.path)?;

        let mut rows = Vec::new();
        for result in rdr.records() {
            let record = result?;
            // a blank line reads as a single empty field
            if record.iter().all(|field| field.is_empty()) {
                continue;
            }
            rows.push(record.iter().map(|field| field.to_string()).collect());
            if limit.is_some_and(|n| rows.len() >= n) {
                break;
            }
        }
        Ok(rows)
    }
}

impl TabularStore for CsvSheet {
    async fn first_row(&self) -> Result<Option<Vec<String>>> {
        Ok(self.read_records(Some(1))?.into_iter().next())
    }

    async fn all_rows(&self) -> Result<Vec<Vec<String>>> {
        self.read_records(None)
    }

    async fn append_rows(&self, rows: &[Vec<String>]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        let mut wtr = csv::WriterBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_writer(file);
        for row in rows {
            wtr.write_record(row)?;
        }
        wtr.flush()?;
        Ok(())
    }
}
