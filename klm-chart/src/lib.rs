//! PNG rendering of the year-over-year lake level chart.

pub mod error;
pub mod style;

pub use error::{ChartError, Result};

use chrono::{Datelike, NaiveDate};
use klm_data::{ChartData, YearOverlay};
use log::{info, warn};
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::series::DashedLineSeries;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use plotters::style::FontStyle;
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};
use style::*;

const FONT_FAMILY: &str = "sans-serif";

/// The 8-byte signature every PNG file starts with.
pub const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', b'\r', b'\n', 0x1A, b'\n'];

/// Font files tried when none is configured.
pub const DEFAULT_FONT_PATHS: [&str; 4] = [
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
];

#[derive(Debug, Clone)]
pub struct ChartOptions {
    pub size: (u32, u32),
    /// TrueType font for all text. Without one the chart has no text.
    pub font: Option<PathBuf>,
}

impl Default for ChartOptions {
    fn default() -> Self {
        ChartOptions {
            size: CHART_SIZE,
            font: None,
        }
    }
}

/// The configured font if given, else the first default font that exists.
pub fn find_font(configured: Option<&Path>) -> Option<PathBuf> {
    match configured {
        Some(path) => Some(path.to_path_buf()),
        None => DEFAULT_FONT_PATHS
            .iter()
            .map(PathBuf::from)
            .find(|p| p.exists()),
    }
}

/// Register the font file under the family the chart draws with.
fn register_font(path: &Path) -> bool {
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) => {
            warn!("Cannot read font {}: {}", path.display(), e);
            return false;
        }
    };
    // plotters keeps registered fonts for the life of the process
    let bytes: &'static [u8] = Box::leak(bytes.into_boxed_slice());
    match plotters::style::register_font(FONT_FAMILY, FontStyle::Normal, bytes) {
        Ok(()) => true,
        Err(_) => {
            warn!("{} is not a usable TrueType font", path.display());
            false
        }
    }
}

/// Draw the chart to `path` and verify the result.
///
/// Any file already at `path` is removed first, so a failed render never
/// leaves a stale image behind. Returns the size of the written file.
pub fn render_chart(data: &ChartData, path: &Path, options: &ChartOptions) -> Result<u64> {
    if path.exists() {
        fs::remove_file(path)?;
    }
    if data.overlays.is_empty() {
        return Err(ChartError::NoLines);
    }
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let with_text = match &options.font {
        Some(font) => register_font(font),
        None => false,
    };
    if !with_text {
        warn!("No font available, drawing chart without text");
    }

    {
        let root = BitMapBackend::new(path, options.size).into_drawing_area();
        draw(&root, data, with_text).map_err(|e| ChartError::Draw(e.to_string()))?;
        root.present().map_err(|e| ChartError::Draw(e.to_string()))?;
    }

    let bytes = verify_png(path)?;
    info!("Chart saved to {} ({} bytes)", path.display(), bytes);
    Ok(bytes)
}

/// Check that `path` exists, is non-empty and starts with the PNG signature.
pub fn verify_png(path: &Path) -> Result<u64> {
    let fail = |reason: &str| ChartError::Verify {
        path: path.to_path_buf(),
        reason: reason.to_string(),
    };
    let metadata = fs::metadata(path).map_err(|_| fail("file was not created"))?;
    if metadata.len() == 0 {
        return Err(fail("file is empty"));
    }
    let mut head = [0u8; 8];
    fs::File::open(path)?
        .read_exact(&mut head)
        .map_err(|_| fail("file is truncated"))?;
    if head != PNG_SIGNATURE {
        return Err(fail("missing PNG signature"));
    }
    Ok(metadata.len())
}

fn year_bounds(year: i32) -> (NaiveDate, NaiveDate) {
    let start = NaiveDate::from_ymd_opt(year, 1, 1).unwrap_or(NaiveDate::MIN);
    let end = NaiveDate::from_ymd_opt(year, 12, 31).unwrap_or(NaiveDate::MAX);
    (start, end)
}

fn overlay_style(overlay: &YearOverlay) -> ShapeStyle {
    year_color(overlay.year, overlay.kind).stroke_width(year_width(overlay.year, overlay.kind))
}

/// Draw every chart element onto `root`.
pub fn draw<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    data: &ChartData,
    with_text: bool,
) -> DrawResult<(), DB> {
    root.fill(&WHITE)?;

    let (start, end) = year_bounds(data.reference_year);
    let x_range: RangedDate<NaiveDate> = (start..end).into();
    let y_range = Y_RANGE.0..Y_RANGE.1;

    let mut builder = ChartBuilder::on(root);
    builder.margin(20i32);
    if with_text {
        builder
            .caption(TITLE, (FONT_FAMILY, 40))
            .x_label_area_size(50u32)
            .y_label_area_size(80u32);
    }
    let mut chart = builder.build_cartesian_2d(x_range, y_range)?;

    if with_text {
        chart
            .configure_mesh()
            .x_labels(12_usize)
            .y_labels(10_usize)
            .x_label_formatter(&|d: &NaiveDate| d.format(X_LABEL_FORMAT).to_string())
            .y_desc(Y_DESCRIPTION)
            .label_style((FONT_FAMILY, 16))
            .axis_desc_style((FONT_FAMILY, 20))
            .light_line_style(BLACK.mix(0.05))
            .draw()?;
    }

    // historical band, below everything else
    if !data.envelope.is_empty() {
        let band_style = BAND_COLOR.mix(0.5).filled();
        let outline: Vec<(NaiveDate, f64)> = data
            .envelope
            .iter()
            .map(|p| (p.date, p.max))
            .chain(data.envelope.iter().rev().map(|p| (p.date, p.min)))
            .collect();
        chart
            .draw_series(std::iter::once(Polygon::new(outline, band_style)))?
            .label(BAND_LABEL)
            .legend(move |(x, y)| Rectangle::new([(x, y - 6), (x + 20, y + 6)], band_style));
    }

    // reference lines
    let flood_style = FLOOD_COLOR.mix(0.7).stroke_width(3);
    chart
        .draw_series(DashedLineSeries::new(
            vec![(start, FLOOD_LEVEL), (end, FLOOD_LEVEL)],
            12,
            8,
            flood_style,
        ))?
        .label(FLOOD_LABEL)
        .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], flood_style));

    let treaty_style = TREATY_COLOR.mix(0.7).stroke_width(3);
    chart
        .draw_series(DashedLineSeries::new(
            vec![(start, TREATY_MAX), (end, TREATY_MAX)],
            3,
            5,
            treaty_style,
        ))?
        .label(TREATY_LABEL)
        .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], treaty_style));

    // year lines, current year last so it lands on top
    for overlay in &data.overlays {
        let line_style = overlay_style(overlay);
        chart
            .draw_series(LineSeries::new(overlay.points.iter().copied(), line_style))?
            .label(overlay.year.to_string())
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], line_style));
    }

    // forecast markers, one legend entry for all of them
    if !data.markers.is_empty() {
        chart
            .draw_series(data.markers.iter().map(|m| {
                TriangleMarker::new((m.plot_date, m.level), MARKER_SIZE, BLACK.filled())
            }))?
            .label(FORECAST_LABEL)
            .legend(|(x, y)| TriangleMarker::new((x + 10, y), MARKER_SIZE / 2, BLACK.filled()));
    }

    if !with_text {
        return Ok(());
    }

    for marker in &data.markers {
        let value_style = TextStyle::from((FONT_FAMILY, 14))
            .color(&BLACK)
            .pos(Pos::new(HPos::Center, VPos::Bottom));
        let date_style = TextStyle::from((FONT_FAMILY, 13))
            .color(&BLACK)
            .pos(Pos::new(HPos::Center, VPos::Top));
        chart.draw_series([
            Text::new(
                format!("{:.1} ft", marker.level),
                (marker.plot_date, marker.level + 0.45),
                value_style,
            ),
            Text::new(
                format!("{} {}", marker.date.format("%b"), marker.date.day()),
                (marker.plot_date, marker.level - 0.35),
                date_style,
            ),
        ])?;
    }

    let note_style = TextStyle::from((FONT_FAMILY, 16))
        .color(&BLACK)
        .pos(Pos::new(HPos::Right, VPos::Top));
    chart.draw_series(std::iter::once(Text::new(
        RECORD_HIGH_NOTE,
        (end, Y_RANGE.1 - 0.2),
        note_style,
    )))?;

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperLeft)
        .label_font((FONT_FAMILY, 16))
        .background_style(WHITE.mix(0.95))
        .border_style(BLACK)
        .draw()?;

    Ok(())
}
