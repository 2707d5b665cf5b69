//! Weather lookup for Daily Boost
//!
//! Fetches current conditions for a city from the OpenWeatherMap API.

pub mod provider;
pub mod types;

pub use provider::WeatherClient;
pub use types::*;
