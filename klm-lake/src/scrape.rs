//! Fetching the FortisBC lake level page.

use crate::error::{LakeError, Result};
use crate::extract::extract_observation;
use crate::observation::Observation;
use chrono::NaiveDateTime;
use log::info;
use reqwest::Client;
use std::time::Duration;

/// Public FortisBC page carrying the Kootenay Lake readings.
pub const LAKE_LEVEL_URL: &str = "https://secure.fortisbc.com/lakelevel/lakes.jsp";

/// The page rejects requests without a browser-like user agent.
pub const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

/// Socket timeout for the page fetch.
pub const FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Anything that can hand back the raw lake page.
///
/// The pipeline is written against this trait so a run can be replayed from a
/// saved page.
#[allow(async_fn_in_trait)]
pub trait LakeSource {
    async fn fetch_document(&self) -> Result<String>;
}

/// HTTP client for the lake level page.
#[derive(Debug, Clone)]
pub struct LakeClient {
    client: Client,
    url: String,
}

impl LakeClient {
    pub fn new(url: &str) -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(FETCH_TIMEOUT)
            .build()?;
        Ok(LakeClient {
            client,
            url: url.to_string(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl LakeSource for LakeClient {
    async fn fetch_document(&self) -> Result<String> {
        let response = self.client.get(&self.url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(LakeError::HttpStatus {
                url: self.url.clone(),
                status: status.as_u16(),
            });
        }
        let body = response.text().await?;
        info!("Fetched {} bytes from {}", body.len(), self.url);
        Ok(body)
    }
}

/// A saved copy of the lake page.
#[derive(Debug, Clone)]
pub struct StaticPage(pub String);

impl LakeSource for StaticPage {
    async fn fetch_document(&self) -> Result<String> {
        Ok(self.0.clone())
    }
}

/// Stands in for a source that could not be built; every fetch fails with
/// the reason.
#[derive(Debug, Clone)]
pub struct Unavailable(pub String);

impl LakeSource for Unavailable {
    async fn fetch_document(&self) -> Result<String> {
        Err(LakeError::Unavailable(self.0.clone()))
    }
}

/// Fetch the page and extract an observation stamped with `timestamp`.
pub async fn scrape_observation<S: LakeSource>(
    source: &S,
    timestamp: NaiveDateTime,
) -> Result<Observation> {
    let document = source.fetch_document().await?;
    Ok(extract_observation(&document, timestamp))
}
