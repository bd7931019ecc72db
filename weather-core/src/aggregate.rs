//! Fan-out of one provider call per city.
//!
//! Every call is started up front with no concurrency limit. Results always
//! come back in input order, whatever order the calls finish in.

use futures::future::{join_all, try_join_all};
use serde_json::Value;
use tracing::debug;

use crate::{
    config::ApiKey,
    error::WeatherError,
    model::{Endpoint, Location, WeatherQuery},
    provider::UpstreamClient,
};

pub const INVALID_CITIES: &str = "Invalid cities parameter";

/// Fetch every city, failing the whole batch on the first error.
///
/// Outstanding calls are dropped once one of them fails; no partial result is
/// ever returned.
pub async fn fetch_all<C>(
    client: &C,
    api_key: &ApiKey,
    endpoint: Endpoint,
    cities: &[String],
    template: &WeatherQuery,
) -> Result<Vec<Value>, WeatherError>
where
    C: UpstreamClient + ?Sized,
{
    let queries = city_queries(cities, template)?;
    debug!(count = queries.len(), %endpoint, "fanning out");

    let calls = queries.iter().map(|q| client.fetch(api_key, endpoint, q));
    try_join_all(calls).await
}

/// Fetch every city and keep each outcome, successful or not.
pub async fn fetch_all_settled<C>(
    client: &C,
    api_key: &ApiKey,
    endpoint: Endpoint,
    cities: &[String],
    template: &WeatherQuery,
) -> Result<Vec<Result<Value, WeatherError>>, WeatherError>
where
    C: UpstreamClient + ?Sized,
{
    let queries = city_queries(cities, template)?;
    debug!(count = queries.len(), %endpoint, "fanning out (settled)");

    let calls = queries.iter().map(|q| client.fetch(api_key, endpoint, q));
    Ok(join_all(calls).await)
}

fn city_queries(
    cities: &[String],
    template: &WeatherQuery,
) -> Result<Vec<WeatherQuery>, WeatherError> {
    if cities.is_empty() {
        return Err(WeatherError::Validation(INVALID_CITIES.to_string()));
    }

    Ok(cities
        .iter()
        .map(|city| template.relocated(Location::City(city.clone())))
        .collect())
}
