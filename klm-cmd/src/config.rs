//! Run configuration: command-line flags with environment fallbacks.

use anyhow::anyhow;
use chrono_tz::Tz;
use clap::Args;
use klm_lake::scrape::LAKE_LEVEL_URL;
use std::path::PathBuf;

pub const DEFAULT_SPREADSHEET_ID: &str = "14U9YwogifuDUPS4qBXke2QN49nm9NGCOV3Cm9uQorHk";
pub const DEFAULT_SHEET_NAME: &str = "Lake Level Data";
pub const DEFAULT_CREDENTIALS_FILE: &str = "credentials.json";
pub const DEFAULT_OUTPUT_DIR: &str = "public";
pub const DEFAULT_TIMEZONE: Tz = chrono_tz::America::Vancouver;

/// Birchdale, on the west shore of Kootenay Lake.
pub const DEFAULT_LATITUDE: f64 = 50.038417;
pub const DEFAULT_LONGITUDE: f64 = -116.892033;

#[derive(Args, Debug, Clone)]
pub struct ConfigArgs {
    /// OpenWeather One Call API key
    #[arg(long, env = "OPENWEATHER_API_KEY", hide_env_values = true)]
    pub openweather_api_key: Option<String>,

    /// Spreadsheet holding the lake history
    #[arg(long, env = "LAKE_SPREADSHEET_ID", default_value = DEFAULT_SPREADSHEET_ID)]
    pub spreadsheet_id: String,

    /// Worksheet name inside the spreadsheet
    #[arg(long, env = "LAKE_SHEET_NAME", default_value = DEFAULT_SHEET_NAME)]
    pub sheet_name: String,

    /// Service account key file
    #[arg(long, env = "GOOGLE_CREDENTIALS_FILE", default_value = DEFAULT_CREDENTIALS_FILE)]
    pub credentials_file: PathBuf,

    /// Base64-encoded service account key, used when the key file is missing
    #[arg(long, env = "GOOGLE_CREDENTIALS_JSON", hide_env_values = true)]
    pub credentials_json: Option<String>,

    /// Keep the history in this CSV file instead of the spreadsheet
    #[arg(long, env = "LAKE_HISTORY_CSV")]
    pub history_csv: Option<PathBuf>,

    /// Directory for the chart and HTML pages
    #[arg(long, env = "LAKE_OUTPUT_DIR", default_value = DEFAULT_OUTPUT_DIR)]
    pub output_dir: PathBuf,

    /// TrueType font for chart text
    #[arg(long, env = "LAKE_CHART_FONT")]
    pub chart_font: Option<PathBuf>,

    /// IANA time zone for timestamps shown on pages
    #[arg(long, env = "LAKE_TIMEZONE", default_value = "America/Vancouver")]
    pub timezone: String,

    /// Lake level page
    #[arg(long, env = "LAKE_URL", default_value = LAKE_LEVEL_URL)]
    pub lake_url: String,

    #[arg(long, env = "LAKE_LATITUDE", default_value_t = DEFAULT_LATITUDE, allow_hyphen_values = true)]
    pub latitude: f64,

    #[arg(long, env = "LAKE_LONGITUDE", default_value_t = DEFAULT_LONGITUDE, allow_hyphen_values = true)]
    pub longitude: f64,

    /// Comma-separated report recipients
    #[arg(long, env = "EMAIL_RECIPIENTS")]
    pub email_recipients: Option<String>,

    /// Sender address, defaults to the SMTP username
    #[arg(long, env = "EMAIL_FROM")]
    pub email_from: Option<String>,

    #[arg(long, env = "SMTP_HOST")]
    pub smtp_host: Option<String>,

    #[arg(long, env = "SMTP_USERNAME")]
    pub smtp_username: Option<String>,

    #[arg(long, env = "SMTP_PASSWORD", hide_env_values = true)]
    pub smtp_password: Option<String>,
}

/// Where the history lives.
#[derive(Debug, Clone, PartialEq)]
pub enum HistorySource {
    Csv(PathBuf),
    Sheet {
        spreadsheet_id: String,
        sheet_name: String,
        credentials_file: PathBuf,
        credentials_json: Option<String>,
    },
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MailConfig {
    pub recipients: Vec<String>,
    pub from: Option<String>,
    pub smtp_host: Option<String>,
    pub smtp_username: Option<String>,
    pub smtp_password: Option<String>,
}

/// Built once at start-up and handed to every step.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub weather_api_key: Option<String>,
    pub history: HistorySource,
    pub output_dir: PathBuf,
    pub chart_font: Option<PathBuf>,
    pub timezone: Tz,
    pub lake_url: String,
    pub latitude: f64,
    pub longitude: f64,
    pub mail: MailConfig,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            weather_api_key: None,
            history: HistorySource::Sheet {
                spreadsheet_id: DEFAULT_SPREADSHEET_ID.to_string(),
                sheet_name: DEFAULT_SHEET_NAME.to_string(),
                credentials_file: PathBuf::from(DEFAULT_CREDENTIALS_FILE),
                credentials_json: None,
            },
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            chart_font: None,
            timezone: DEFAULT_TIMEZONE,
            lake_url: LAKE_LEVEL_URL.to_string(),
            latitude: DEFAULT_LATITUDE,
            longitude: DEFAULT_LONGITUDE,
            mail: MailConfig::default(),
        }
    }
}

/// Blank strings from the environment count as unset.
fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Split a comma-separated recipient list, dropping empty entries.
pub fn parse_recipients(list: &str) -> Vec<String> {
    list.split(',')
        .map(str::trim)
        .filter(|r| !r.is_empty())
        .map(str::to_string)
        .collect()
}

impl TryFrom<ConfigArgs> for Config {
    type Error = anyhow::Error;

    fn try_from(args: ConfigArgs) -> anyhow::Result<Self> {
        let timezone: Tz = args
            .timezone
            .trim()
            .parse()
            .map_err(|e| anyhow!("invalid time zone '{}': {e}", args.timezone))?;

        let history = match args.history_csv {
            Some(path) => HistorySource::Csv(path),
            None => HistorySource::Sheet {
                spreadsheet_id: args.spreadsheet_id,
                sheet_name: args.sheet_name,
                credentials_file: args.credentials_file,
                credentials_json: non_blank(args.credentials_json),
            },
        };

        Ok(Config {
            weather_api_key: non_blank(args.openweather_api_key),
            history,
            output_dir: args.output_dir,
            chart_font: args.chart_font,
            timezone,
            lake_url: args.lake_url,
            latitude: args.latitude,
            longitude: args.longitude,
            mail: MailConfig {
                recipients: args
                    .email_recipients
                    .as_deref()
                    .map(parse_recipients)
                    .unwrap_or_default(),
                from: non_blank(args.email_from),
                smtp_host: non_blank(args.smtp_host),
                smtp_username: non_blank(args.smtp_username),
                smtp_password: non_blank(args.smtp_password),
            },
        })
    }
}
