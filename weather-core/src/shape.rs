//! Narrowing raw provider payloads into the smaller shapes some routes return.
//!
//! Nothing here touches the network. A missing or mistyped field becomes a
//! [`WeatherError::Shaping`] naming the field.

use chrono::{DateTime, TimeZone};
use serde_json::{Number, Value};
use std::fmt::Display;

use crate::{
    error::WeatherError,
    model::{Conditions, ForecastEntry, SunTimes, TemperatureStats},
};

/// Wall-clock format for sunrise/sunset, e.g. `6:04:05 AM`.
pub const TIME_FORMAT: &str = "%-I:%M:%S %p";

pub fn extract_conditions(payload: &Value) -> Result<Conditions, WeatherError> {
    Ok(Conditions {
        humidity: number_at(payload, "main.humidity")?,
        wind_speed: number_at(payload, "wind.speed")?,
        visibility: number_at(payload, "visibility")?,
        clouds: number_at(payload, "clouds.all")?,
    })
}

/// Sunrise and sunset rendered in `tz`.
///
/// The server passes its own local zone, not the city's.
pub fn extract_sun_times<Tz>(
    payload: &Value,
    city: &str,
    tz: &Tz,
) -> Result<SunTimes, WeatherError>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let sunrise = i64_at(payload, "sys.sunrise")?;
    let sunset = i64_at(payload, "sys.sunset")?;

    Ok(SunTimes {
        city: city.to_string(),
        sunrise: format_time(sunrise, tz)?,
        sunset: format_time(sunset, tz)?,
    })
}

pub fn format_time<Tz>(epoch_secs: i64, tz: &Tz) -> Result<String, WeatherError>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let utc = DateTime::from_timestamp(epoch_secs, 0)
        .ok_or_else(|| out_of_range(epoch_secs))?;

    Ok(utc.with_timezone(tz).format(TIME_FORMAT).to_string())
}

/// Decode `list[].main.temp` (and `list[].dt` when present), keeping provider order.
pub fn forecast_series(payload: &Value) -> Result<Vec<ForecastEntry>, WeatherError> {
    let list = field(payload, "list")?
        .as_array()
        .ok_or_else(|| WeatherError::missing_field("list"))?;

    list.iter()
        .enumerate()
        .map(|(i, item)| {
            let temperature = field(item, "main.temp")
                .ok()
                .and_then(Value::as_f64)
                .ok_or_else(|| list_field(i, "main.temp"))?;
            let timestamp = field(item, "dt").ok().and_then(Value::as_i64);

            Ok(ForecastEntry {
                timestamp,
                temperature,
            })
        })
        .collect()
}

/// Extremes and unweighted mean of the series temperatures.
pub fn summarize_temperatures(series: &[ForecastEntry]) -> Result<TemperatureStats, WeatherError> {
    let first = series.first().ok_or(WeatherError::EmptySeries)?;

    let mut stats = TemperatureStats {
        min: first.temperature,
        max: first.temperature,
        avg: 0.0,
    };
    let mut sum = 0.0;
    for entry in series {
        stats.min = stats.min.min(entry.temperature);
        stats.max = stats.max.max(entry.temperature);
        sum += entry.temperature;
    }
    stats.avg = sum / series.len() as f64;

    Ok(stats)
}

fn field<'a>(payload: &'a Value, path: &str) -> Result<&'a Value, WeatherError> {
    let pointer = format!("/{}", path.replace('.', "/"));
    payload
        .pointer(&pointer)
        .filter(|v| !v.is_null())
        .ok_or_else(|| WeatherError::missing_field(path))
}

fn number_at(payload: &Value, path: &str) -> Result<Number, WeatherError> {
    match field(payload, path)? {
        Value::Number(n) => Ok(n.clone()),
        _ => Err(WeatherError::missing_field(path)),
    }
}

fn i64_at(payload: &Value, path: &str) -> Result<i64, WeatherError> {
    field(payload, path)?
        .as_i64()
        .ok_or_else(|| WeatherError::missing_field(path))
}

fn list_field(index: usize, rest: &str) -> WeatherError {
    WeatherError::missing_field(&format!("list[{index}].{rest}"))
}

fn out_of_range(epoch_secs: i64) -> WeatherError {
    WeatherError::Shaping(format!("timestamp {epoch_secs} is out of range"))
}
