use async_trait::async_trait;
use serde_json::Value;
use std::fmt::Debug;

use crate::{
    config::ApiKey,
    error::WeatherError,
    model::{Endpoint, WeatherQuery},
};

pub mod openweather;

pub use openweather::OpenWeatherClient;

/// One GET against the weather provider, returning the untyped JSON payload.
#[async_trait]
pub trait UpstreamClient: Send + Sync + Debug {
    async fn fetch(
        &self,
        api_key: &ApiKey,
        endpoint: Endpoint,
        query: &WeatherQuery,
    ) -> Result<Value, WeatherError>;
}
