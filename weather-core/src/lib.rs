//! Core library for the weather HTTP facade.
//!
//! This crate defines:
//! - Configuration & the provider API key
//! - The upstream OpenWeatherMap client
//! - Parallel fan-out over several cities
//! - Shaping raw payloads into smaller summaries
//!
//! It is used by `weather-api`, but has no HTTP-server dependencies of its own.

pub mod aggregate;
pub mod config;
pub mod error;
pub mod model;
pub mod provider;
pub mod shape;

pub use config::{ApiKey, Config};
pub use error::WeatherError;
pub use model::{
    Conditions, Endpoint, ForecastEntry, Location, SunTimes, TemperatureStats, Units, WeatherQuery,
};
pub use provider::{OpenWeatherClient, UpstreamClient};
