//! OpenWeather "One Call" report: types and client.

use chrono::{DateTime, FixedOffset, Offset, TimeZone, Utc};
use serde::{Deserialize, Serialize};

#[cfg(feature = "api")]
use crate::error::{LakeError, Result};
#[cfg(feature = "api")]
use log::info;
#[cfg(feature = "api")]
use reqwest::Client;

/// One Call 3.0 endpoint.
pub const ONE_CALL_URL: &str = "https://api.openweathermap.org/data/3.0/onecall";

/// Sections of the One Call document the reports never use.
pub const EXCLUDED_SECTIONS: &str = "minutely,alerts";

/// A weather condition entry, e.g. `{"main": "Rain", "description": "light rain"}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    pub main: String,
    pub description: String,
    #[serde(default)]
    pub icon: String,
}

/// Precipitation volume over the last hour, in millimetres.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HourlyVolume {
    #[serde(rename = "1h", default)]
    pub one_hour: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentWeather {
    pub dt: i64,
    pub temp: f64,
    pub feels_like: f64,
    pub humidity: u8,
    pub wind_speed: f64,
    #[serde(default)]
    pub wind_deg: u16,
    #[serde(default)]
    pub wind_gust: Option<f64>,
    #[serde(default)]
    pub weather: Vec<Condition>,
    #[serde(default)]
    pub rain: Option<HourlyVolume>,
    #[serde(default)]
    pub snow: Option<HourlyVolume>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HourlyWeather {
    pub dt: i64,
    pub temp: f64,
    pub wind_speed: f64,
    /// Probability of precipitation, 0.0 - 1.0.
    #[serde(default)]
    pub pop: f64,
    #[serde(default)]
    pub weather: Vec<Condition>,
    #[serde(default)]
    pub rain: Option<HourlyVolume>,
    #[serde(default)]
    pub snow: Option<HourlyVolume>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DailyTemperature {
    pub min: f64,
    pub max: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyWeather {
    pub dt: i64,
    #[serde(default)]
    pub summary: Option<String>,
    pub temp: DailyTemperature,
    pub wind_speed: f64,
    #[serde(default)]
    pub pop: f64,
    /// Daily rain volume in millimetres.
    #[serde(default)]
    pub rain: Option<f64>,
    /// Daily snow volume in millimetres.
    #[serde(default)]
    pub snow: Option<f64>,
    #[serde(default)]
    pub weather: Vec<Condition>,
}

/// The decoded One Call document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherReport {
    pub lat: f64,
    pub lon: f64,
    #[serde(default)]
    pub timezone: String,
    /// Offset of the location from UTC, in seconds.
    #[serde(default)]
    pub timezone_offset: i32,
    pub current: CurrentWeather,
    #[serde(default)]
    pub hourly: Vec<HourlyWeather>,
    #[serde(default)]
    pub daily: Vec<DailyWeather>,
}

impl WeatherReport {
    /// Convert a unix timestamp from the report into the location's local time.
    pub fn local_time(&self, unix: i64) -> DateTime<FixedOffset> {
        let offset = FixedOffset::east_opt(self.timezone_offset).unwrap_or(Utc.fix());
        match Utc.timestamp_opt(unix, 0).single() {
            Some(utc) => utc.with_timezone(&offset),
            None => DateTime::<Utc>::UNIX_EPOCH.with_timezone(&offset),
        }
    }
}

/// First condition description of a section, or `""`.
pub fn describe(conditions: &[Condition]) -> &str {
    conditions
        .first()
        .map(|c| c.description.as_str())
        .unwrap_or("")
}

/// Client for the One Call API.
#[cfg(feature = "api")]
#[derive(Debug, Clone)]
pub struct WeatherClient {
    client: Client,
    api_key: String,
    lat: f64,
    lon: f64,
}

#[cfg(feature = "api")]
impl WeatherClient {
    pub fn new(api_key: Option<&str>, lat: f64, lon: f64) -> Result<Self> {
        let api_key = match api_key {
            Some(key) if !key.trim().is_empty() => key.trim().to_string(),
            _ => return Err(LakeError::MissingApiKey),
        };
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(10))
            .build()?;
        Ok(WeatherClient {
            client,
            api_key,
            lat,
            lon,
        })
    }

    /// Fetch current, hourly and daily weather in metric units.
    pub async fn fetch_report(&self) -> Result<WeatherReport> {
        let lat = self.lat.to_string();
        let lon = self.lon.to_string();
        let response = self
            .client
            .get(ONE_CALL_URL)
            .query(&[
                ("lat", lat.as_str()),
                ("lon", lon.as_str()),
                ("units", "metric"),
                ("exclude", EXCLUDED_SECTIONS),
                ("appid", self.api_key.as_str()),
            ])
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            return Err(LakeError::HttpStatus {
                url: ONE_CALL_URL.to_string(),
                status: status.as_u16(),
            });
        }
        let body = response.text().await?;
        let report: WeatherReport = serde_json::from_str(&body)?;
        info!(
            "Weather report: {} hourly, {} daily entries",
            report.hourly.len(),
            report.daily.len()
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const REPORT_JSON: &str = r#"{
  "lat": 50.0384, "lon": -116.892, "timezone": "America/Vancouver", "timezone_offset": -25200,
  "current": {
    "dt": 1749906000, "sunrise": 1749899000, "temp": 14.2, "feels_like": 13.5,
    "pressure": 1012, "humidity": 71, "wind_speed": 2.1, "wind_deg": 200,
    "weather": [{"id": 500, "main": "Rain", "description": "light rain", "icon": "10d"}],
    "rain": {"1h": 0.35}
  },
  "hourly": [
    {"dt": 1749906000, "temp": 14.2, "wind_speed": 2.1, "pop": 0.4,
     "weather": [{"id": 500, "main": "Rain", "description": "light rain", "icon": "10d"}]},
    {"dt": 1749909600, "temp": 15.0, "wind_speed": 2.4, "pop": 0.1,
     "weather": [{"id": 803, "main": "Clouds", "description": "broken clouds", "icon": "04d"}]}
  ],
  "daily": [
    {"dt": 1749927600, "summary": "Expect a day of partly cloudy with rain",
     "temp": {"day": 18.0, "min": 9.1, "max": 19.6, "night": 11.0, "eve": 16.0, "morn": 10.0},
     "wind_speed": 3.3, "pop": 0.8, "rain": 4.2,
     "weather": [{"id": 500, "main": "Rain", "description": "light rain", "icon": "10d"}]}
  ]
}"#;

    #[test]
    fn test_decode_report() {
        let report: WeatherReport = serde_json::from_str(REPORT_JSON).unwrap();
        assert_eq!(report.current.humidity, 71);
        assert_eq!(report.current.rain.unwrap().one_hour, 0.35);
        assert!(report.current.snow.is_none());
        assert_eq!(report.hourly.len(), 2);
        assert_eq!(describe(&report.hourly[1].weather), "broken clouds");
        assert_eq!(report.daily[0].temp.max, 19.6);
        assert_eq!(report.daily[0].rain, Some(4.2));
        assert_eq!(report.daily[0].snow, None);
    }

    #[test]
    fn test_local_time_uses_offset() {
        let report: WeatherReport = serde_json::from_str(REPORT_JSON).unwrap();
        let local = report.local_time(report.current.dt);
        assert_eq!(local.offset().local_minus_utc(), -25200);
        assert_eq!(local.format("%Y-%m-%d %H:%M").to_string(), "2025-06-14 06:00");
    }

    #[test]
    fn test_describe_empty() {
        assert_eq!(describe(&[]), "");
    }
}
