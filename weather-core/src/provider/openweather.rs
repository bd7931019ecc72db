use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, instrument, warn};

use crate::{
    config::{ApiKey, Config},
    error::WeatherError,
    model::{Endpoint, WeatherQuery},
};

use super::UpstreamClient;

#[derive(Debug, Clone)]
pub struct OpenWeatherClient {
    base_url: String,
    http: Client,
}

impl OpenWeatherClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, WeatherError> {
        let http = Client::builder().timeout(timeout).build().map_err(|e| {
            WeatherError::Configuration(format!("Failed to build HTTP client: {e}"))
        })?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, WeatherError> {
        let timeout = Duration::from_secs(config.timeout_secs);
        Self::new(config.base_url.clone(), timeout)
    }

    fn url(&self, endpoint: Endpoint) -> String {
        format!("{}/{}", self.base_url, endpoint.as_str())
    }
}

#[async_trait]
impl UpstreamClient for OpenWeatherClient {
    #[instrument(skip(self, api_key, endpoint), fields(endpoint = %endpoint))]
    async fn fetch(
        &self,
        api_key: &ApiKey,
        endpoint: Endpoint,
        query: &WeatherQuery,
    ) -> Result<Value, WeatherError> {
        let mut params = query.to_params();
        params.push(("appid", api_key.as_str().to_string()));

        let res = self
            .http
            .get(self.url(endpoint))
            .query(&params)
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, "OpenWeather request failed to send");
                WeatherError::upstream_transport(e.without_url().to_string())
            })?;

        let status = res.status();
        let body = res.text().await.map_err(|e| {
            WeatherError::upstream_transport(format!(
                "Failed to read OpenWeather response body: {}",
                e.without_url()
            ))
        })?;

        if !status.is_success() {
            let snippet = truncate_body(&body);
            warn!(status = status.as_u16(), body = %snippet, "OpenWeather returned an error");
            return Err(WeatherError::upstream_status(status.as_u16()));
        }

        debug!(
            status = status.as_u16(),
            bytes = body.len(),
            "OpenWeather responded"
        );

        serde_json::from_str(&body).map_err(|e| WeatherError::Upstream {
            status: Some(status.as_u16()),
            message: format!("Failed to parse upstream response: {e}"),
        })
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
