use crate::history::{HistoryRow, COLUMN_COUNT};
use chrono::NaiveDateTime;
use klm_utils::dates::format_scrape_time;
use serde::{Deserialize, Serialize};

/// A gauge reading as printed on the lake page, e.g.
/// `Nelson: 1745.32 feet (531.95 meters) as of June 14, 2025 6:00 AM`.
///
/// Values are kept as the literal page text; consumers coerce.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GaugeReading {
    pub feet: String,
    pub meters: String,
    pub updated: String,
}

/// The published lake level forecast, e.g.
/// `Kootenay Lake is forecast to rise to 1748.0 at Queens Bay by November 21`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelForecast {
    /// `rise` or `fall`, as written on the page.
    pub trend: String,
    pub level_feet: String,
    pub location: String,
    pub date_text: String,
}

/// Average daily Kootenay River discharge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Discharge {
    pub cfs: String,
    pub location: String,
    pub date_text: String,
}

/// One scrape event.
///
/// Each field group is all-or-nothing: a group is `Some` only when its whole
/// pattern matched. An `Observation` is built once per run, written as a
/// single [`HistoryRow`] and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub timestamp: NaiveDateTime,
    pub queens_bay: Option<GaugeReading>,
    pub nelson: Option<GaugeReading>,
    pub forecast: Option<LevelForecast>,
    pub discharge: Option<Discharge>,
}

impl Observation {
    /// An observation with no field groups.
    pub fn empty(timestamp: NaiveDateTime) -> Self {
        Observation {
            timestamp,
            queens_bay: None,
            nelson: None,
            forecast: None,
            discharge: None,
        }
    }

    /// Returns true if no pattern matched.
    pub fn is_empty(&self) -> bool {
        self.queens_bay.is_none()
            && self.nelson.is_none()
            && self.forecast.is_none()
            && self.discharge.is_none()
    }

    /// Number of field groups present (0-4).
    pub fn group_count(&self) -> usize {
        [
            self.queens_bay.is_some(),
            self.nelson.is_some(),
            self.forecast.is_some(),
            self.discharge.is_some(),
        ]
        .iter()
        .filter(|present| **present)
        .count()
    }

    /// Flatten into the fixed 14-column log layout. Absent groups leave
    /// their columns empty.
    pub fn to_history_row(&self) -> HistoryRow {
        let mut cells: Vec<String> = Vec::with_capacity(COLUMN_COUNT);
        cells.push(format_scrape_time(&self.timestamp));

        for gauge in [&self.queens_bay, &self.nelson] {
            match gauge {
                Some(g) => cells.extend([g.feet.clone(), g.meters.clone(), g.updated.clone()]),
                None => cells.extend(std::iter::repeat_n(String::new(), 3)),
            }
        }

        match &self.forecast {
            Some(f) => cells.extend([
                f.trend.clone(),
                f.level_feet.clone(),
                f.location.clone(),
                f.date_text.clone(),
            ]),
            None => cells.extend(std::iter::repeat_n(String::new(), 4)),
        }

        match &self.discharge {
            Some(d) => cells.extend([d.cfs.clone(), d.location.clone(), d.date_text.clone()]),
            None => cells.extend(std::iter::repeat_n(String::new(), 3)),
        }

        HistoryRow::from_cells(cells)
    }
}
