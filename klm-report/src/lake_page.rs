//! `lake.html`: current readings as cards, the chart and a data-source footer.

use crate::{format_update_time, CHART_FILE, REPORT_FILE};
use chrono::DateTime;
use chrono_tz::Tz;
use klm_lake::Observation;
use klm_utils::text::{escape_html, title_case};

const TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8">
  <meta name="viewport" content="width=device-width, initial-scale=1.0">
  <title>Kootenay Lake Levels - Birchdale</title>
  <style>
    * { margin: 0; padding: 0; box-sizing: border-box; }
    body {
      font-family: 'Segoe UI', Tahoma, Geneva, Verdana, sans-serif;
      background: linear-gradient(135deg, #667eea 0%, #764ba2 100%);
      min-height: 100vh;
      padding: 20px;
    }
    .container {
      max-width: 1200px;
      margin: 0 auto;
      background: white;
      border-radius: 20px;
      box-shadow: 0 20px 60px rgba(0,0,0,0.3);
      overflow: hidden;
    }
    .header {
      background: linear-gradient(135deg, #667eea 0%, #764ba2 100%);
      color: white;
      padding: 30px;
      text-align: center;
    }
    .header h1 { font-size: 32px; margin-bottom: 10px; }
    .header p { opacity: 0.9; font-size: 14px; }
    .back-link {
      display: inline-block;
      margin-top: 15px;
      padding: 10px 20px;
      background: rgba(255,255,255,0.2);
      border-radius: 8px;
      color: white;
      text-decoration: none;
    }
    .lake-content { padding: 30px; }
    .data-cards {
      display: grid;
      grid-template-columns: repeat(auto-fit, minmax(200px, 1fr));
      gap: 20px;
      margin-bottom: 30px;
    }
    .data-card {
      background: linear-gradient(135deg, #667eea 0%, #764ba2 100%);
      color: white;
      padding: 20px;
      border-radius: 12px;
      text-align: center;
    }
    .data-card-label { font-size: 12px; opacity: 0.9; text-transform: uppercase; letter-spacing: 1px; }
    .data-card-value { font-size: 36px; font-weight: 700; margin: 10px 0; }
    .data-card-unit { font-size: 14px; opacity: 0.8; }
    .data-card-subtext { font-size: 11px; opacity: 0.7; margin-top: 5px; }
    .chart-section { background: #f8f9fa; padding: 30px; border-radius: 12px; margin-bottom: 20px; }
    .chart-section h2 { color: #667eea; font-size: 24px; margin-bottom: 20px; text-align: center; }
    .chart-container img { width: 100%; height: auto; display: block; border-radius: 8px; }
    .update-info { text-align: center; padding: 20px; color: #666; font-size: 14px; border-top: 2px solid #eee; }
    @media (max-width: 768px) { .data-cards { grid-template-columns: 1fr; } }
  </style>
</head>
<body>
  <div class="container">
    <div class="header">
      <h1>Kootenay Lake Levels</h1>
      <p>Historical Data &amp; Forecasts</p>
      <a href="{{back_link}}" class="back-link">&larr; Back to Weather</a>
    </div>
    <div class="lake-content">
      <div class="data-cards">
{{cards}}
      </div>
      <div class="chart-section">
        <h2>Historical Lake Level Trend</h2>
        <div class="chart-container">
          <img src="{{chart}}" alt="Kootenay Lake Level Chart">
        </div>
      </div>
      <div class="update-info">
        <p><strong>Data Source:</strong> FortisBC</p>
        <p><strong>Updated:</strong> {{updated}}</p>
      </div>
    </div>
  </div>
</body>
</html>
"#;

/// One data card. Every argument is escaped here.
fn card(label: &str, value: &str, unit: &str, subtexts: &[String]) -> String {
    let mut html = format!(
        "        <div class=\"data-card\">\n          <div class=\"data-card-label\">{}</div>\n          <div class=\"data-card-value\">{}</div>\n          <div class=\"data-card-unit\">{}</div>\n",
        escape_html(label),
        escape_html(value),
        escape_html(unit)
    );
    for subtext in subtexts {
        html.push_str(&format!(
            "          <div class=\"data-card-subtext\">{}</div>\n",
            escape_html(subtext)
        ));
    }
    html.push_str("        </div>\n");
    html
}

/// Cards for each field group that is present, in page order.
fn cards(observation: &Observation) -> String {
    let mut html = String::new();
    if let Some(q) = &observation.queens_bay {
        html.push_str(&card(
            "Queen's Bay",
            &q.feet,
            "feet",
            &[format!("({} m)", q.meters), format!("Updated: {}", q.updated)],
        ));
    }
    if let Some(n) = &observation.nelson {
        html.push_str(&card(
            "Nelson",
            &n.feet,
            "feet",
            &[format!("({} m)", n.meters), format!("Updated: {}", n.updated)],
        ));
    }
    if let Some(f) = &observation.forecast {
        html.push_str(&card(
            "Forecast",
            &f.level_feet,
            "feet",
            &[format!("{} by {}", title_case(&f.trend), f.date_text)],
        ));
    }
    if let Some(d) = &observation.discharge {
        html.push_str(&card(
            "Discharge",
            &d.cfs,
            "cfs",
            &[d.location.clone(), d.date_text.clone()],
        ));
    }
    html
}

/// Render the full lake page. With no observation the page has no cards.
pub fn render_lake_page(observation: Option<&Observation>, updated: &DateTime<Tz>) -> String {
    let cards = observation.map(cards).unwrap_or_default();
    TEMPLATE
        .replace("{{back_link}}", REPORT_FILE)
        .replace("{{chart}}", CHART_FILE)
        .replace("{{updated}}", &escape_html(&format_update_time(updated)))
        .replace("{{cards}}", &cards)
}
