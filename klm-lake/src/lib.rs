//! Core types and upstream clients for the Kootenay Lake monitor.
//!
//! - [`observation`] / [`history`]: one scrape event and its persisted row
//! - [`extract`]: pattern extraction from the FortisBC lake page
//! - [`weather`]: the OpenWeather One Call report
//! - `scrape` (feature `api`): fetching the lake page

pub mod error;
pub mod extract;
pub mod history;
pub mod observation;
#[cfg(feature = "api")]
pub mod scrape;
pub mod weather;

pub use error::{LakeError, Result};
pub use history::{HistoryRow, HistoryTable};
pub use observation::Observation;
