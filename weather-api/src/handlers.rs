//! Per-route orchestration.
//!
//! Every weather handler checks for the API key first, then validates its own
//! input, and only then calls the provider.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Serialize;
use serde_json::{Value, json};
use tracing::debug;
use weather_core::{
    Endpoint, SunTimes, TemperatureStats, Units, WeatherError, WeatherQuery,
    aggregate::{INVALID_CITIES, fetch_all, fetch_all_settled},
    model::Conditions,
    shape,
};

use crate::{error::ApiError, state::AppState};

type ApiResult<T> = Result<Json<T>, ApiError>;

/// Raw query pairs, repeated keys included.
type QueryPairs = Query<Vec<(String, String)>>;

pub async fn current_by_city(
    State(state): State<AppState>,
    Path(city): Path<String>,
) -> ApiResult<Value> {
    let key = state.config.require_api_key()?;
    let payload = state
        .upstream
        .fetch(key, Endpoint::Weather, &WeatherQuery::city(city))
        .await?;
    Ok(Json(payload))
}

pub async fn current_with_units(
    State(state): State<AppState>,
    Path(city): Path<String>,
    Query(params): QueryPairs,
) -> ApiResult<Value> {
    let key = state.config.require_api_key()?;

    let mut query = WeatherQuery::city(city);
    if let Some(units) = first_value(&params, "units") {
        query = query.with_units(Units::try_from(units)?);
    }

    let payload = state.upstream.fetch(key, Endpoint::Weather, &query).await?;
    Ok(Json(payload))
}

pub async fn current_by_zipcode(
    State(state): State<AppState>,
    Path(zipcode): Path<String>,
) -> ApiResult<Value> {
    let key = state.config.require_api_key()?;
    let payload = state
        .upstream
        .fetch(key, Endpoint::Weather, &WeatherQuery::zip(zipcode))
        .await?;
    Ok(Json(payload))
}

pub async fn forecast_by_location(
    State(state): State<AppState>,
    Query(params): QueryPairs,
) -> ApiResult<Value> {
    let key = state.config.require_api_key()?;

    let (Some(lat), Some(lon)) = (coordinate(&params, "lat"), coordinate(&params, "lon")) else {
        return Err(WeatherError::Validation("Invalid location parameters".to_string()).into());
    };

    let query = WeatherQuery::coordinates(lat, lon);
    let payload = state.upstream.fetch(key, Endpoint::Forecast, &query).await?;
    Ok(Json(payload))
}

pub async fn daily_forecast(
    State(state): State<AppState>,
    Path(city): Path<String>,
) -> ApiResult<Value> {
    let key = state.config.require_api_key()?;
    let payload = state
        .upstream
        .fetch(key, Endpoint::ForecastDaily, &WeatherQuery::city(city))
        .await?;
    Ok(Json(payload))
}

pub async fn conditions(
    State(state): State<AppState>,
    Path(city): Path<String>,
) -> ApiResult<Conditions> {
    let key = state.config.require_api_key()?;
    let query = WeatherQuery::city(city)
        .with_units(Units::Metric)
        .with_lang("en");
    let payload = state.upstream.fetch(key, Endpoint::Weather, &query).await?;
    Ok(Json(shape::extract_conditions(&payload)?))
}

pub async fn sun_times(
    State(state): State<AppState>,
    Path(city): Path<String>,
) -> ApiResult<SunTimes> {
    let key = state.config.require_api_key()?;
    let payload = state
        .upstream
        .fetch(key, Endpoint::Weather, &WeatherQuery::city(&city))
        .await?;
    Ok(Json(shape::extract_sun_times(&payload, &city, &chrono::Local)?))
}

pub async fn temperature_stats(
    State(state): State<AppState>,
    Path(city): Path<String>,
) -> ApiResult<TemperatureStats> {
    let key = state.config.require_api_key()?;
    let payload = state
        .upstream
        .fetch(key, Endpoint::Forecast, &WeatherQuery::city(city))
        .await?;
    let series = shape::forecast_series(&payload)?;
    Ok(Json(shape::summarize_temperatures(&series)?))
}

pub async fn forecast_for_cities(
    State(state): State<AppState>,
    Query(params): QueryPairs,
) -> ApiResult<Vec<Value>> {
    for_cities(&state, Endpoint::Forecast, &params).await
}

pub async fn current_for_cities(
    State(state): State<AppState>,
    Query(params): QueryPairs,
) -> ApiResult<Vec<Value>> {
    for_cities(&state, Endpoint::Weather, &params).await
}

async fn for_cities(
    state: &AppState,
    endpoint: Endpoint,
    params: &[(String, String)],
) -> ApiResult<Vec<Value>> {
    let key = state.config.require_api_key()?;
    let cities = cities_param(params)?;
    let template = WeatherQuery::city("");
    debug!(count = cities.len(), %endpoint, "multi-city request");

    if first_value(params, "partial") == Some("true") {
        let settled =
            fetch_all_settled(state.upstream.as_ref(), key, endpoint, &cities, &template).await?;
        let body = settled
            .into_iter()
            .map(|r| r.unwrap_or_else(|e| json!({ "message": e.to_string() })))
            .collect();
        return Ok(Json(body));
    }

    Ok(Json(fetch_all(state.upstream.as_ref(), key, endpoint, &cities, &template).await?))
}

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

/// Liveness check - is the server running?
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

fn first_value<'a>(params: &'a [(String, String)], name: &str) -> Option<&'a str> {
    params
        .iter()
        .find(|(k, _)| k == name)
        .map(|(_, v)| v.as_str())
}

/// A finite number, or nothing.
fn coordinate(params: &[(String, String)], name: &str) -> Option<f64> {
    first_value(params, name)
        .and_then(|v| v.trim().parse::<f64>().ok())
        .filter(|v| v.is_finite())
}

/// `cities` counts as a list only when repeated (`cities=a&cities=b`) or in
/// bracket form (`cities[]=a`, `cities[0]=a`). A single plain value is a
/// scalar and rejected.
///
/// Indexed entries are ordered by index; everything else keeps query order.
fn cities_param(params: &[(String, String)]) -> Result<Vec<String>, WeatherError> {
    let mut bracketed = false;
    let mut cities = Vec::new();
    for (key, value) in params {
        let slot = if key == "cities" {
            None
        } else {
            match bracket_index(key) {
                Some(slot) => {
                    bracketed = true;
                    slot
                }
                None => continue,
            }
        };
        cities.push((slot, value.clone()));
    }

    if cities.is_empty() || (cities.len() == 1 && !bracketed) {
        return Err(WeatherError::Validation(INVALID_CITIES.to_string()));
    }

    cities.sort_by_key(|(slot, _)| *slot);
    Ok(cities.into_iter().map(|(_, city)| city).collect())
}

/// `cities[]` gives `Some(None)`, `cities[3]` gives `Some(Some(3))`.
fn bracket_index(key: &str) -> Option<Option<usize>> {
    let inner = key.strip_prefix("cities[")?.strip_suffix(']')?;
    if inner.is_empty() {
        return Some(None);
    }
    if !inner.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    inner.parse().ok().map(Some)
}
