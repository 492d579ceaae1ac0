use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use url::Url;

use crate::config::ScraperConfig;
use crate::utils::error::{AppError, Result};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScrapeResult {
    pub status: u16,
    pub html: String,
    pub response_time_ms: u64,
    pub final_url: String, // After redirects
}

/// Source of product page markup.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(&self, url: &Url) -> Result<ScrapeResult>;
}

/// Plain HTTP GET scraper with a browser-like User-Agent.
pub struct WebScraper {
    client: reqwest::Client,
    config: ScraperConfig,
}

impl WebScraper {
    pub fn new(config: ScraperConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&config.user_agent).map_err(|e| {
                AppError::Config(config::ConfigError::Message(format!(
                    "Invalid user agent: {}",
                    e
                )))
            })?,
        );

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(config.request_timeout))
            .build()?;

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &ScraperConfig {
        &self.config
    }

    fn map_request_error(&self, err: reqwest::Error) -> AppError {
        if err.is_timeout() {
            AppError::Timeout {
                seconds: self.config.request_timeout,
            }
        } else {
            AppError::Http(err)
        }
    }
}

#[async_trait]
impl PageFetcher for WebScraper {
    async fn fetch(&self, url: &Url) -> Result<ScrapeResult> {
        let start_time = Instant::now();

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| self.map_request_error(e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::HttpStatus {
                status: status.as_u16(),
            });
        }

        let final_url = response.url().to_string();
        let html = response
            .text()
            .await
            .map_err(|e| self.map_request_error(e))?;

        tracing::debug!(
            status = status.as_u16(),
            bytes = html.len(),
            "Fetched {}",
            final_url
        );

        Ok(ScrapeResult {
            status: status.as_u16(),
            html,
            response_time_ms: start_time.elapsed().as_millis() as u64,
            final_url,
        })
    }
}
