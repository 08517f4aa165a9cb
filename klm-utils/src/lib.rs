//! Shared utility functions for Kootenay Lake Monitor crates.

/// Date utility functions
pub mod dates {
    use chrono::{Datelike, NaiveDate, NaiveDateTime};

    /// Format used for the `Scrape Time` column of the history log.
    pub const SCRAPE_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

    const DATE_TIME_FORMATS: [&str; 6] = [
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%d %H:%M",
        "%Y-%m-%dT%H:%M:%S",
        "%m/%d/%Y %H:%M:%S",
        "%m/%d/%Y %H:%M",
        "%Y/%m/%d %H:%M:%S",
    ];

    const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%m/%d/%Y", "%Y/%m/%d"];

    const MONTH_PREFIXES: [&str; 12] = [
        "jan", "feb", "mar", "apr", "may", "jun", "jul", "aug", "sep", "oct", "nov", "dec",
    ];

    /// Format a scrape instant the way it is stored in the history log.
    pub fn format_scrape_time(timestamp: &NaiveDateTime) -> String {
        timestamp.format(SCRAPE_TIME_FORMAT).to_string()
    }

    /// Parse a `Scrape Time` cell into its calendar date.
    ///
    /// Accepts the log's own format plus the looser shapes that appear in
    /// hand-imported historical rows (date only, US month/day order).
    /// Returns `None` for anything else; callers treat that as missing.
    pub fn parse_scrape_date(s: &str) -> Option<NaiveDate> {
        let s = s.trim();
        if s.is_empty() {
            return None;
        }
        DATE_TIME_FORMATS
            .iter()
            .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
            .map(|dt| dt.date())
            .or_else(|| {
                DATE_FORMATS
                    .iter()
                    .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
            })
    }

    /// Parse free-form forecast date text such as `November 21`, `Nov 21st`
    /// or `June 3, 2024`.
    ///
    /// Text without a year is placed in `default_year`. ISO `YYYY-MM-DD` is
    /// accepted as well. Feb 29 without a year in a non-leap `default_year`
    /// becomes Feb 28.
    pub fn parse_forecast_date(text: &str, default_year: i32) -> Option<NaiveDate> {
        let cleaned = text.trim().trim_end_matches(['.', ',', ';']);
        if let Ok(date) = NaiveDate::parse_from_str(cleaned, "%Y-%m-%d") {
            return Some(date);
        }

        let tokens: Vec<&str> = cleaned
            .split(|c: char| c.is_whitespace() || c == ',')
            .filter(|t| !t.is_empty())
            .collect();
        if tokens.len() < 2 || tokens.len() > 3 {
            return None;
        }

        let month = parse_month_name(tokens[0])?;
        let day = parse_day(tokens[1])?;
        let year = match tokens.get(2) {
            Some(y) if y.len() == 4 => y.parse::<i32>().ok()?,
            Some(_) => return None,
            None => default_year,
        };

        NaiveDate::from_ymd_opt(year, month, day).or_else(|| {
            if (month, day) == (2, 29) {
                NaiveDate::from_ymd_opt(year, 2, 28)
            } else {
                None
            }
        })
    }

    /// Re-date `date` onto `year`, keeping month and day.
    ///
    /// Feb 29 projected onto a non-leap year lands on Feb 28.
    pub fn project_onto_year(date: &NaiveDate, year: i32) -> NaiveDate {
        date.with_year(year).unwrap_or_else(|| {
            // only Feb 29 can fail to exist in the target year
            NaiveDate::from_ymd_opt(year, 2, 28).unwrap_or(*date)
        })
    }

    fn parse_month_name(token: &str) -> Option<u32> {
        let lowered = token.to_lowercase();
        if lowered.len() < 3 || !lowered.chars().all(|c| c.is_ascii_alphabetic()) {
            return None;
        }
        MONTH_PREFIXES
            .iter()
            .position(|prefix| lowered.starts_with(prefix))
            .map(|index| index as u32 + 1)
    }

    fn parse_day(token: &str) -> Option<u32> {
        let lowered = token.to_lowercase();
        let digits = lowered
            .trim_end_matches("st")
            .trim_end_matches("nd")
            .trim_end_matches("rd")
            .trim_end_matches("th");
        digits.parse::<u32>().ok().filter(|d| (1..=31).contains(d))
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use chrono::NaiveDate;

        #[test]
        fn test_parse_scrape_date() {
            let expected = NaiveDate::from_ymd_opt(2025, 6, 14).unwrap();
            assert_eq!(parse_scrape_date("2025-06-14 06:00:12"), Some(expected));
            assert_eq!(parse_scrape_date("2025-06-14"), Some(expected));
            assert_eq!(parse_scrape_date("06/14/2025"), Some(expected));
            assert_eq!(parse_scrape_date(" 2025-06-14 06:00 "), Some(expected));
            assert_eq!(parse_scrape_date("yesterday"), None);
            assert_eq!(parse_scrape_date(""), None);
        }

        #[test]
        fn test_parse_forecast_date() {
            let nov21 = NaiveDate::from_ymd_opt(2025, 11, 21).unwrap();
            assert_eq!(parse_forecast_date("November 21", 2025), Some(nov21));
            assert_eq!(parse_forecast_date("Nov 21st", 2025), Some(nov21));
            assert_eq!(parse_forecast_date("november 21, 2025", 1999), Some(nov21));
            assert_eq!(parse_forecast_date("2025-11-21", 1999), Some(nov21));
            assert_eq!(parse_forecast_date("soon", 2025), None);
            assert_eq!(parse_forecast_date("November", 2025), None);
            assert_eq!(parse_forecast_date("Smarch 3", 2025), None);
        }

        #[test]
        fn test_parse_forecast_date_feb_29() {
            assert_eq!(
                parse_forecast_date("February 29", 2025),
                NaiveDate::from_ymd_opt(2025, 2, 28)
            );
            assert_eq!(
                parse_forecast_date("February 29", 2024),
                NaiveDate::from_ymd_opt(2024, 2, 29)
            );
        }

        #[test]
        fn test_project_onto_year() {
            let feb29 = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
            assert_eq!(
                project_onto_year(&feb29, 2025),
                NaiveDate::from_ymd_opt(2025, 2, 28).unwrap()
            );
            assert_eq!(
                project_onto_year(&feb29, 2028),
                NaiveDate::from_ymd_opt(2028, 2, 29).unwrap()
            );
            let jul4 = NaiveDate::from_ymd_opt(2012, 7, 4).unwrap();
            assert_eq!(
                project_onto_year(&jul4, 2025),
                NaiveDate::from_ymd_opt(2025, 7, 4).unwrap()
            );
        }

        #[test]
        fn test_format_scrape_time() {
            let ts = NaiveDate::from_ymd_opt(2025, 1, 2)
                .unwrap()
                .and_hms_opt(3, 4, 5)
                .unwrap();
            assert_eq!(format_scrape_time(&ts), "2025-01-02 03:04:05");
        }
    }
}

/// Text helpers for the HTML templates
pub mod text {
    /// Escape text for interpolation into HTML element content or
    /// double-quoted attribute values.
    pub fn escape_html(s: &str) -> String {
        let mut out = String::with_capacity(s.len());
        for c in s.chars() {
            match c {
                '&' => out.push_str("&amp;"),
                '<' => out.push_str("&lt;"),
                '>' => out.push_str("&gt;"),
                '"' => out.push_str("&quot;"),
                '\'' => out.push_str("&#39;"),
                _ => out.push(c),
            }
        }
        out
    }

    /// Upper-case the first letter of every word, lower-case the rest.
    pub fn title_case(s: &str) -> String {
        s.split(' ')
            .map(|word| {
                let mut chars = word.chars();
                match chars.next() {
                    Some(first) => first
                        .to_uppercase()
                        .chain(chars.flat_map(|c| c.to_lowercase()))
                        .collect(),
                    None => String::new(),
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_escape_html() {
            assert_eq!(
                escape_html(r#"<b>"Queen's" & co</b>"#),
                "&lt;b&gt;&quot;Queen&#39;s&quot; &amp; co&lt;/b&gt;"
            );
            assert_eq!(escape_html("1745.32"), "1745.32");
        }

        #[test]
        fn test_title_case() {
            assert_eq!(title_case("rise"), "Rise");
            assert_eq!(title_case("FALL"), "Fall");
            assert_eq!(title_case("queens bay"), "Queens Bay");
            assert_eq!(title_case(""), "");
        }
    }
}
