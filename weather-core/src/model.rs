use serde::{Deserialize, Serialize};
use serde_json::Number;
use std::{convert::TryFrom, fmt};

use crate::error::WeatherError;

/// Provider resource a query is sent to, relative to the configured base URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    Weather,
    Forecast,
    ForecastDaily,
}

impl Endpoint {
    pub fn as_str(&self) -> &'static str {
        match self {
            Endpoint::Weather => "weather",
            Endpoint::Forecast => "forecast",
            Endpoint::ForecastDaily => "forecast/daily",
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unit system understood by the provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Units {
    Metric,
    Imperial,
    Standard,
}

impl Units {
    pub fn as_str(&self) -> &'static str {
        match self {
            Units::Metric => "metric",
            Units::Imperial => "imperial",
            Units::Standard => "standard",
        }
    }

    pub const fn all() -> &'static [Units] {
        &[Units::Metric, Units::Imperial, Units::Standard]
    }
}

impl fmt::Display for Units {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for Units {
    type Error = WeatherError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_lowercase().as_str() {
            "metric" => Ok(Units::Metric),
            "imperial" => Ok(Units::Imperial),
            "standard" => Ok(Units::Standard),
            _ => Err(WeatherError::Validation(format!(
                "Invalid units '{value}'. Supported units: metric, imperial, standard."
            ))),
        }
    }
}

/// Where the caller wants weather for. Exactly one shape per query.
#[derive(Debug, Clone, PartialEq)]
pub enum Location {
    City(String),
    Coordinates { lat: f64, lon: f64 },
    Zip(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct WeatherQuery {
    pub location: Location,
    pub units: Option<Units>,
    pub lang: Option<String>,
}

impl WeatherQuery {
    pub fn city(city: impl Into<String>) -> Self {
        Self::at(Location::City(city.into()))
    }

    pub fn coordinates(lat: f64, lon: f64) -> Self {
        Self::at(Location::Coordinates { lat, lon })
    }

    pub fn zip(zipcode: impl Into<String>) -> Self {
        Self::at(Location::Zip(zipcode.into()))
    }

    fn at(location: Location) -> Self {
        Self {
            location,
            units: None,
            lang: None,
        }
    }

    pub fn with_units(mut self, units: Units) -> Self {
        self.units = Some(units);
        self
    }

    pub fn with_lang(mut self, lang: impl Into<String>) -> Self {
        self.lang = Some(lang.into());
        self
    }

    /// Same options, different location.
    pub fn relocated(&self, location: Location) -> Self {
        Self {
            location,
            ..self.clone()
        }
    }

    /// Query-string pairs for the provider, without the API key.
    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params = match &self.location {
            Location::City(city) => vec![("q", city.clone())],
            Location::Coordinates { lat, lon } => {
                vec![("lat", lat.to_string()), ("lon", lon.to_string())]
            }
            Location::Zip(zip) => vec![("zip", zip.clone())],
        };

        if let Some(units) = self.units {
            params.push(("units", units.as_str().to_string()));
        }
        if let Some(lang) = &self.lang {
            params.push(("lang", lang.clone()));
        }

        params
    }
}

/// Selected current conditions. Numbers are kept exactly as the provider sent them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Conditions {
    pub humidity: Number,
    pub wind_speed: Number,
    pub visibility: Number,
    pub clouds: Number,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SunTimes {
    pub city: String,
    pub sunrise: String,
    pub sunset: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TemperatureStats {
    pub min: f64,
    pub max: f64,
    pub avg: f64,
}

/// One step of a forecast series, in provider order. Only the temperature
/// is required.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ForecastEntry {
    pub timestamp: Option<i64>,
    pub temperature: f64,
}
