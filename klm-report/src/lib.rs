//! Static HTML documents: the lake page and the combined weather report.
//!
//! Documents are rebuilt from fixed templates on every run and written over
//! the previous file in full.

pub mod lake_page;
pub mod report;

pub use lake_page::render_lake_page;
pub use report::render_report;

use chrono::DateTime;
use chrono_tz::Tz;
use log::info;
use std::fs;
use std::io;
use std::path::Path;

/// Placeholder for a value the scrape did not produce.
pub const NOT_AVAILABLE: &str = "N/A";

pub const CHART_FILE: &str = "lake_chart.png";
pub const LAKE_PAGE_FILE: &str = "lake.html";
pub const REPORT_FILE: &str = "index.html";

/// Footer timestamp, e.g. `June 14, 2025 at 06:00 AM PDT`.
pub fn format_update_time(time: &DateTime<Tz>) -> String {
    time.format("%B %d, %Y at %I:%M %p %Z").to_string()
}

/// Replace `path` with `contents`, creating missing parent directories.
pub fn write_document(path: &Path, contents: &str) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    fs::write(path, contents)?;
    info!("Wrote {} ({} bytes)", path.display(), contents.len());
    Ok(())
}
