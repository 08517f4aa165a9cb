//! Pattern extraction of lake readings from the FortisBC lake level page.
//!
//! The page is reduced to its visible text first, then four independent,
//! case-insensitive patterns are searched. Each pattern yields either all of
//! its captures or nothing; a miss is an absent group, not an error.

use crate::observation::{Discharge, GaugeReading, LevelForecast, Observation};
use chrono::NaiveDateTime;
use regex::{Captures, Regex};
use std::sync::LazyLock;

static SCRIPT_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<script\b.*?</script\s*>").expect("script pattern"));
static STYLE_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<style\b.*?</style\s*>").expect("style pattern"));
static COMMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<!--.*?-->").expect("comment pattern"));
static TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").expect("tag pattern"));

static QUEENS_BAY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)Queen['’]s\s*Bay:?\s*(\d+\.\d+)\s*feet\s*\((\d+\.\d+)\s*meters\)\s*as of\s*([^\n]+)",
    )
    .expect("queen's bay pattern")
});
static NELSON: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)Nelson:?\s*(\d+\.\d+)\s*feet\s*\((\d+\.\d+)\s*meters\)\s*as of\s*([^\n]+)")
        .expect("nelson pattern")
});
static FORECAST: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?is)Lake level forecast[^:]*:\s*Kootenay Lake is forecast to\s+(\w+)\s+to\s+(\d+\.\d+)\s+at\s+(Queens?\s*Bay|Nelson)\s+by\s+([^\n.]+)",
    )
    .expect("forecast pattern")
});
static DISCHARGE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)Average Daily Kootenay River Discharge at ([^f]+?)\s+for\s+([^:]+):\s*(\d+)\s*cfs",
    )
    .expect("discharge pattern")
});

/// Reduce an HTML document to the text a reader would see.
///
/// Script, style and comment blocks are dropped, remaining tags are removed
/// without inserting separators, and entities are decoded. Line breaks in
/// the source are kept since the `as of ...` captures stop at a newline.
pub fn visible_text(document: &str) -> String {
    let without_scripts = SCRIPT_BLOCK.replace_all(document, "");
    let without_styles = STYLE_BLOCK.replace_all(&without_scripts, "");
    let without_comments = COMMENT.replace_all(&without_styles, "");
    let without_tags = TAG.replace_all(&without_comments, "");
    html_escape::decode_html_entities(&without_tags).replace('\u{a0}', " ")
}

fn capture(caps: &Captures, index: usize) -> Option<String> {
    caps.get(index).map(|m| m.as_str().trim().to_string())
}

/// Queen's Bay gauge: feet, meters and the "as of" text.
pub fn extract_queens_bay(text: &str) -> Option<GaugeReading> {
    extract_gauge(&QUEENS_BAY, text)
}

/// Nelson gauge: feet, meters and the "as of" text.
pub fn extract_nelson(text: &str) -> Option<GaugeReading> {
    extract_gauge(&NELSON, text)
}

fn extract_gauge(pattern: &Regex, text: &str) -> Option<GaugeReading> {
    let caps = pattern.captures(text)?;
    Some(GaugeReading {
        feet: capture(&caps, 1)?,
        meters: capture(&caps, 2)?,
        updated: capture(&caps, 3)?,
    })
}

/// The published lake level forecast.
pub fn extract_forecast(text: &str) -> Option<LevelForecast> {
    let caps = FORECAST.captures(text)?;
    Some(LevelForecast {
        trend: capture(&caps, 1)?,
        level_feet: capture(&caps, 2)?,
        location: capture(&caps, 3)?,
        date_text: capture(&caps, 4)?,
    })
}

/// Average daily Kootenay River discharge.
pub fn extract_discharge(text: &str) -> Option<Discharge> {
    let caps = DISCHARGE.captures(text)?;
    Some(Discharge {
        location: capture(&caps, 1)?,
        date_text: capture(&caps, 2)?,
        cfs: capture(&caps, 3)?,
    })
}

/// Build an observation from a raw lake page document.
pub fn extract_observation(document: &str, timestamp: NaiveDateTime) -> Observation {
    let text = visible_text(document);
    Observation {
        timestamp,
        queens_bay: extract_queens_bay(&text),
        nelson: extract_nelson(&text),
        forecast: extract_forecast(&text),
        discharge: extract_discharge(&text),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    const PAGE: &str = r#"<html><head><title>Lake Levels</title>
<style>.x { color: red; }</style>
<script>var nelson = "Nelson: 1.00 feet (0.30 meters) as of never";</script>
</head><body>
<h2>Kootenay Lake</h2>
<p>Queen&rsquo;s Bay: 1745.32 feet (531.97 meters) as of June 14, 2025 6:00 AM
</p>
<p>Nelson: <b>1745.10</b> feet (531.91 meters) as of June 14, 2025 6:00 AM
</p>
<p><strong>Lake level forecast for the coming weeks:</strong>
Kootenay Lake is forecast to rise to 1748.0 at Queens Bay by November 21.
</p>
<p>Average Daily Kootenay River Discharge at Corra Linn Dam for June 13, 2025: 45000 cfs</p>
</body></html>"#;

    fn timestamp() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 6, 14)
            .unwrap()
            .and_hms_opt(6, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_visible_text() {
        let text = visible_text(PAGE);
        assert!(!text.contains("<p>"));
        assert!(!text.contains("color: red"));
        assert!(!text.contains("as of never"));
        assert!(text.contains("Queen’s Bay: 1745.32 feet"));
        assert!(text.contains("Nelson: 1745.10 feet"));
    }

    #[test]
    fn test_decode_entities() {
        assert_eq!(visible_text("Queen&#8217;s &amp; Co&#x21;"), "Queen’s & Co!");
        assert_eq!(visible_text("&bogus; stays"), "&bogus; stays");
        assert_eq!(visible_text("Caf&eacute;&hellip;"), "Café…");
        assert_eq!(visible_text("1745.32&nbsp;feet"), "1745.32 feet");
    }

    #[test]
    fn test_all_groups_extracted() {
        let obs = extract_observation(PAGE, timestamp());
        assert_eq!(obs.group_count(), 4);

        let queens = obs.queens_bay.unwrap();
        assert_eq!(queens.feet, "1745.32");
        assert_eq!(queens.meters, "531.97");
        assert_eq!(queens.updated, "June 14, 2025 6:00 AM");

        let nelson = obs.nelson.unwrap();
        assert_eq!(nelson.feet, "1745.10");
        assert_eq!(nelson.meters, "531.91");

        let forecast = obs.forecast.unwrap();
        assert_eq!(forecast.trend, "rise");
        assert_eq!(forecast.level_feet, "1748.0");
        assert_eq!(forecast.location, "Queens Bay");
        assert_eq!(forecast.date_text, "November 21");

        let discharge = obs.discharge.unwrap();
        assert_eq!(discharge.cfs, "45000");
        assert_eq!(discharge.location, "Corra Linn Dam");
        assert_eq!(discharge.date_text, "June 13, 2025");
    }

    #[test]
    fn test_missing_pattern_only_drops_its_group() {
        let page = PAGE.replace("Average Daily", "Weekly");
        let obs = extract_observation(&page, timestamp());
        assert!(obs.discharge.is_none());
        assert!(obs.queens_bay.is_some());
        assert!(obs.nelson.is_some());
        assert!(obs.forecast.is_some());

        let page = PAGE.replace("Lake level forecast", "Outlook");
        let obs = extract_observation(&page, timestamp());
        assert!(obs.forecast.is_none());
        assert_eq!(obs.group_count(), 3);
    }

    #[test]
    fn test_partial_match_is_absent() {
        // meters missing: the whole gauge group is dropped
        let obs = extract_observation("Nelson: 1745.10 feet as of today\n", timestamp());
        assert!(obs.nelson.is_none());
        assert!(obs.is_empty());
    }

    #[test]
    fn test_case_insensitive_and_plain_apostrophe() {
        let text = "QUEEN'S BAY 1744.90 FEET (531.85 METERS) AS OF June 1\n";
        let queens = extract_queens_bay(text).unwrap();
        assert_eq!(queens.feet, "1744.90");
        assert_eq!(queens.updated, "June 1");
    }

    #[test]
    fn test_forecast_fall_at_nelson() {
        let text = "Lake Level Forecast:\n\nKootenay Lake is forecast to fall to 1739.5 at Nelson by March 3\nMore text";
        let forecast = extract_forecast(text).unwrap();
        assert_eq!(forecast.trend, "fall");
        assert_eq!(forecast.level_feet, "1739.5");
        assert_eq!(forecast.location, "Nelson");
        assert_eq!(forecast.date_text, "March 3");
    }

    #[test]
    fn test_empty_document() {
        let obs = extract_observation("", timestamp());
        assert!(obs.is_empty());
        assert_eq!(obs.timestamp, timestamp());
    }
}
