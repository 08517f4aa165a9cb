//! The combined report: weather now, next 12 hours, 7-day outlook and the
//! lake summary. The same document is written as `index.html` and sent as
//! the email body.

use crate::{format_update_time, LAKE_PAGE_FILE, NOT_AVAILABLE};
use chrono::DateTime;
use chrono_tz::Tz;
use klm_lake::weather::{describe, CurrentWeather, DailyWeather, HourlyWeather, WeatherReport};
use klm_lake::Observation;
use klm_utils::text::{escape_html, title_case};

pub const HOURLY_ROWS: usize = 12;
pub const DAILY_ROWS: usize = 7;

const COMPASS: [&str; 16] = [
    "N", "NNE", "NE", "ENE", "E", "ESE", "SE", "SSE", "S", "SSW", "SW", "WSW", "W", "WNW", "NW",
    "NNW",
];

const TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8">
  <meta name="viewport" content="width=device-width, initial-scale=1.0">
  <title>Birchdale Weather &amp; Lake Report</title>
  <style>
    body { font-family: 'Segoe UI', Tahoma, Geneva, Verdana, sans-serif; background: #f0f2f8; margin: 0; padding: 20px; color: #333; }
    .container { max-width: 900px; margin: 0 auto; background: white; border-radius: 16px; overflow: hidden; }
    .header { background: #667eea; color: white; padding: 24px; text-align: center; }
    .header h1 { margin: 0 0 8px 0; font-size: 28px; }
    .section { padding: 20px 28px; border-bottom: 1px solid #eee; }
    .section h2 { color: #667eea; font-size: 20px; margin: 0 0 12px 0; }
    .now { font-size: 40px; font-weight: 700; }
    table { width: 100%; border-collapse: collapse; font-size: 14px; }
    th, td { padding: 6px 8px; text-align: left; border-bottom: 1px solid #f0f0f0; }
    th { color: #666; font-weight: 600; }
    img { width: 100%; height: auto; display: block; }
    .footer { text-align: center; padding: 16px; color: #666; font-size: 13px; }
  </style>
</head>
<body>
  <div class="container">
    <div class="header">
      <h1>Birchdale Weather &amp; Lake Report</h1>
      <p>{{updated}}</p>
    </div>
    <div class="section">
      <h2>Current Conditions</h2>
{{current}}
    </div>
    <div class="section">
      <h2>Next 12 Hours</h2>
      <table>
        <tr><th>Time</th><th>Temp</th><th>Conditions</th><th>Precip</th><th>Wind</th></tr>
{{hourly}}
      </table>
    </div>
    <div class="section">
      <h2>7-Day Outlook</h2>
      <table>
        <tr><th>Day</th><th>High / Low</th><th>Conditions</th><th>Precip</th><th>Wind</th></tr>
{{daily}}
      </table>
    </div>
    <div class="section">
      <h2>Kootenay Lake</h2>
      <table>
{{lake}}
      </table>
      <p><a href="{{lake_link}}">Lake levels and history</a></p>
    </div>
    <div class="section">
      <h2>Lake Level Chart</h2>
      <img src="{{chart}}" alt="Kootenay Lake Level Chart">
    </div>
    <div class="footer">Weather: OpenWeather &middot; Lake levels: FortisBC</div>
  </div>
</body>
</html>
"#;

/// Compass point for a wind direction in degrees.
pub fn compass_point(degrees: u16) -> &'static str {
    let index = ((f64::from(degrees % 360) + 11.25) / 22.5) as usize % COMPASS.len();
    COMPASS[index]
}

/// m/s to km/h, rounded.
fn kmh(speed: f64) -> String {
    format!("{:.0} km/h", speed * 3.6)
}

fn percent(pop: f64) -> String {
    format!("{:.0}%", pop * 100.0)
}

fn current_html(weather: &WeatherReport, current: &CurrentWeather) -> String {
    let mut precip = Vec::new();
    if let Some(rain) = current.rain {
        precip.push(format!("rain {:.1} mm/h", rain.one_hour));
    }
    if let Some(snow) = current.snow {
        precip.push(format!("snow {:.1} mm/h", snow.one_hour));
    }
    let gust = current
        .wind_gust
        .map(|g| format!(", gusts {}", kmh(g)))
        .unwrap_or_default();
    let lines = [
        format!("<div class=\"now\">{:.0}&deg;C</div>", current.temp),
        format!(
            "<p>{} &middot; feels like {:.0}&deg;C</p>",
            escape_html(&title_case(describe(&current.weather))),
            current.feels_like
        ),
        format!(
            "<p>Humidity {}% &middot; Wind {} {}{}</p>",
            current.humidity,
            compass_point(current.wind_deg),
            kmh(current.wind_speed),
            gust
        ),
        format!(
            "<p>Precipitation: {}</p>",
            if precip.is_empty() {
                "none".to_string()
            } else {
                precip.join(", ")
            }
        ),
        format!(
            "<p>Observed {}</p>",
            weather.local_time(current.dt).format("%a %b %-d, %-I:%M %p")
        ),
    ];
    lines
        .iter()
        .map(|line| format!("      {line}\n"))
        .collect()
}

fn hourly_row(weather: &WeatherReport, hour: &HourlyWeather) -> String {
    format!(
        "        <tr><td>{}</td><td>{:.0}&deg;C</td><td>{}</td><td>{}</td><td>{}</td></tr>\n",
        weather.local_time(hour.dt).format("%-I %p"),
        hour.temp,
        escape_html(&title_case(describe(&hour.weather))),
        percent(hour.pop),
        kmh(hour.wind_speed)
    )
}

fn daily_row(weather: &WeatherReport, day: &DailyWeather) -> String {
    let mut precip = percent(day.pop);
    if let Some(rain) = day.rain {
        precip.push_str(&format!(", {rain:.1} mm rain"));
    }
    if let Some(snow) = day.snow {
        precip.push_str(&format!(", {snow:.1} mm snow"));
    }
    let conditions = day
        .summary
        .clone()
        .unwrap_or_else(|| title_case(describe(&day.weather)));
    format!(
        "        <tr><td>{}</td><td>{:.0}&deg; / {:.0}&deg;</td><td>{}</td><td>{}</td><td>{}</td></tr>\n",
        weather.local_time(day.dt).format("%a %b %-d"),
        day.temp.max,
        day.temp.min,
        escape_html(&conditions),
        precip,
        kmh(day.wind_speed)
    )
}

fn lake_row(label: &str, value: Option<String>) -> String {
    format!(
        "        <tr><th>{}</th><td>{}</td></tr>\n",
        escape_html(label),
        escape_html(value.as_deref().unwrap_or(NOT_AVAILABLE))
    )
}

/// Lake summary rows. Every row is present; missing values read `N/A`.
fn lake_rows(observation: Option<&Observation>) -> String {
    let queens = observation.and_then(|o| o.queens_bay.as_ref());
    let nelson = observation.and_then(|o| o.nelson.as_ref());
    let forecast = observation.and_then(|o| o.forecast.as_ref());
    let discharge = observation.and_then(|o| o.discharge.as_ref());
    [
        lake_row(
            "Queen's Bay",
            queens.map(|q| format!("{} ft ({} m)", q.feet, q.meters)),
        ),
        lake_row("Queen's Bay updated", queens.map(|q| q.updated.clone())),
        lake_row(
            "Nelson",
            nelson.map(|n| format!("{} ft ({} m)", n.feet, n.meters)),
        ),
        lake_row(
            "Forecast",
            forecast.map(|f| {
                format!(
                    "{} to {} ft at {} by {}",
                    title_case(&f.trend),
                    f.level_feet,
                    f.location,
                    f.date_text
                )
            }),
        ),
        lake_row(
            "Discharge",
            discharge.map(|d| format!("{} cfs at {} ({})", d.cfs, d.location, d.date_text)),
        ),
    ]
    .concat()
}

/// Render the combined report. `chart_src` is the image reference, a file
/// name for the web page or a `cid:` URL in the email.
pub fn render_report(
    weather: &WeatherReport,
    observation: Option<&Observation>,
    chart_src: &str,
    updated: &DateTime<Tz>,
) -> String {
    let hourly: String = weather
        .hourly
        .iter()
        .take(HOURLY_ROWS)
        .map(|h| hourly_row(weather, h))
        .collect();
    let daily: String = weather
        .daily
        .iter()
        .take(DAILY_ROWS)
        .map(|d| daily_row(weather, d))
        .collect();

    TEMPLATE
        .replace("{{updated}}", &escape_html(&format_update_time(updated)))
        .replace("{{lake_link}}", LAKE_PAGE_FILE)
        .replace("{{chart}}", &escape_html(chart_src))
        .replace("{{current}}", &current_html(weather, &weather.current))
        .replace("{{hourly}}", &hourly)
        .replace("{{daily}}", &daily)
        .replace("{{lake}}", &lake_rows(observation))
}
