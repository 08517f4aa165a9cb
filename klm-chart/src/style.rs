//! Colours, widths and fixed reference values for the lake chart.

use klm_data::YearKind;
use plotters::style::RGBColor;

pub const CHART_SIZE: (u32, u32) = (1600, 900);

pub const TITLE: &str = "KOOTENAY LAKE LEVELS";
pub const Y_DESCRIPTION: &str = "daily elevation (feet) @ Queens Bay";
pub const X_LABEL_FORMAT: &str = "%d-%b";

/// Fixed y-axis range in feet.
pub const Y_RANGE: (f64, f64) = (1737.0, 1755.0);

pub const FLOOD_LEVEL: f64 = 1752.0;
pub const FLOOD_LABEL: &str = "Flood Level (1752 ft)";
pub const FLOOD_COLOR: RGBColor = RGBColor(0xFF, 0x00, 0x00);

pub const TREATY_MAX: f64 = 1745.0;
pub const TREATY_LABEL: &str = "Treaty Max (Nelson)";
pub const TREATY_COLOR: RGBColor = RGBColor(0x8B, 0x00, 0x00);

pub const RECORD_HIGH_NOTE: &str =
    "Record High since Duncan Dam completed 1967 >> 1754.24 ft in 1974";

pub const BAND_LABEL: &str = "Historical Range (1991-2024)";
pub const BAND_COLOR: RGBColor = RGBColor(0xCC, 0xCC, 0xCC);

pub const FORECAST_LABEL: &str = "Fortis Forecast";
pub const MARKER_SIZE: i32 = 10;

/// Line colour for a plotted year.
pub fn year_color(year: i32, kind: YearKind) -> RGBColor {
    if kind == YearKind::Current {
        return RGBColor(0xFF, 0x00, 0x00);
    }
    match year {
        2012 => RGBColor(0x00, 0xFF, 0x00),
        2018 => RGBColor(0x90, 0xEE, 0x90),
        2008 => RGBColor(0xFF, 0xA5, 0x00),
        2002 => RGBColor(0xFF, 0xD7, 0x00),
        2020 => RGBColor(0x00, 0xBF, 0xFF),
        2021 => RGBColor(0x1E, 0x90, 0xFF),
        2022 => RGBColor(0x00, 0x00, 0xFF),
        2023 => RGBColor(0x80, 0x80, 0x80),
        2024 => RGBColor(0xFF, 0x00, 0xFF),
        _ => RGBColor(0x00, 0x00, 0x00),
    }
}

/// Stroke width in pixels.
pub fn year_width(year: i32, kind: YearKind) -> u32 {
    match (kind, year) {
        (YearKind::Current, _) => 6,
        (YearKind::Highest, 2012) => 5,
        (YearKind::Highest, _) | (YearKind::Lowest, _) => 4,
        (YearKind::Recent, _) => 3,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_current_year_is_red_and_thickest() {
        assert_eq!(year_color(2024, YearKind::Current), RGBColor(255, 0, 0));
        assert_eq!(year_color(2024, YearKind::Recent), RGBColor(255, 0, 255));
        let widths = [
            year_width(2012, YearKind::Highest),
            year_width(2002, YearKind::Lowest),
            year_width(2021, YearKind::Recent),
        ];
        assert!(widths.iter().all(|w| *w < year_width(2026, YearKind::Current)));
    }
}
