use boost_core::NetworkError;
use serde::{Deserialize, Serialize};

/// Icon used when the provider omits one (clear sky, day).
pub const DEFAULT_ICON: &str = "01d";

const ICON_URL_BASE: &str = "https://openweathermap.org/img/wn";

/// Current conditions for one city, ready for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherReport {
    /// City as the user typed it (trimmed)
    pub city: String,
    /// ISO country code, when the provider reports one
    pub country: Option<String>,
    /// Degrees Celsius, rounded half up
    pub temperature: i64,
    pub description: String,
    pub icon: String,
}

impl WeatherReport {
    pub(crate) fn from_api(city: &str, data: ApiWeatherResponse) -> Self {
        let condition = data
            .weather
            .into_iter()
            .flatten()
            .next()
            .and_then(|first| serde_json::from_value::<ApiCondition>(first).ok());
        let (description, icon) = match condition {
            Some(c) => (c.description, c.icon),
            None => (None, None),
        };

        Self {
            city: city.to_string(),
            country: data
                .sys
                .and_then(|s| s.country)
                .filter(|c| !c.is_empty()),
            temperature: round_half_up(data.main.temp),
            description: description.unwrap_or_default(),
            icon: icon
                .filter(|i| !i.is_empty())
                .unwrap_or_else(|| DEFAULT_ICON.to_string()),
        }
    }

    /// "City, CC", or just the city when no country is known.
    pub fn location_label(&self) -> String {
        match &self.country {
            Some(country) => format!("{}, {}", self.city, country),
            None => self.city.clone(),
        }
    }

    pub fn icon_url(&self) -> String {
        format!("{}/{}@2x.png", ICON_URL_BASE, self.icon)
    }
}

/// Round to the nearest integer, ties toward positive infinity.
pub fn round_half_up(value: f64) -> i64 {
    (value + 0.5).floor() as i64
}

/// Subset of the OpenWeatherMap current-weather body that the dashboard reads.
#[derive(Debug, Deserialize)]
pub(crate) struct ApiWeatherResponse {
    pub main: ApiMain,
    /// Decoded lazily: only the first condition is read
    pub weather: Option<Vec<serde_json::Value>>,
    pub sys: Option<ApiSys>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApiMain {
    pub temp: f64,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApiCondition {
    pub description: Option<String>,
    pub icon: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApiSys {
    pub country: Option<String>,
}

/// Weather lookup errors
#[derive(Debug, thiserror::Error)]
pub enum WeatherError {
    #[error("No city given")]
    EmptyCity,
    #[error("Weather API key not configured")]
    MissingApiKey,
    #[error("Weather API returned {status}: {}", .message.as_deref().unwrap_or("no message"))]
    Api { status: u16, message: Option<String> },
    #[error("Network error: {0}")]
    Network(#[from] NetworkError),
    #[error("Parse error: {0}")]
    Parse(String),
}

impl WeatherError {
    /// Text for the weather panel.
    ///
    /// API failures show the provider's own message when it sent one.
    pub fn user_message(&self) -> String {
        match self {
            Self::EmptyCity => "Please enter a city.".to_string(),
            Self::MissingApiKey => format!(
                "Add your OpenWeatherMap API key to config.toml (or {}) to load weather.",
                boost_core::config::WEATHER_API_KEY_ENV
            ),
            Self::Api {
                message: Some(message),
                ..
            } => message.clone(),
            Self::Api { message: None, .. } => "Failed to load weather".to_string(),
            Self::Network(_) | Self::Parse(_) => "Could not load weather.".to_string(),
        }
    }

    /// Whether the request never reached the network.
    pub fn is_local(&self) -> bool {
        matches!(self, Self::EmptyCity | Self::MissingApiKey)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    fn parse(json: serde_json::Value) -> ApiWeatherResponse {
        serde_json::from_value(json).unwrap()
    }

    #[test]
    fn test_round_half_up() {
        assert_eq!(round_half_up(12.4), 12);
        assert_eq!(round_half_up(12.5), 13);
        assert_eq!(round_half_up(-2.5), -2);
        assert_eq!(round_half_up(-2.6), -3);
        assert_eq!(round_half_up(0.0), 0);
    }

    #[test]
    fn test_report_from_full_response() {
        let data = parse(serde_json::json!({
            "main": { "temp": 18.6 },
            "weather": [{ "description": "light rain", "icon": "10d" }],
            "sys": { "country": "GB" }
        }));
        let report = WeatherReport::from_api("London", data);

        assert_eq!(report.temperature, 19);
        assert_eq!(report.description, "light rain");
        assert_eq!(report.icon, "10d");
        assert_eq!(report.location_label(), "London, GB");
        assert_eq!(report.icon_url(), "https://openweathermap.org/img/wn/10d@2x.png");
    }

    #[test]
    fn test_report_defaults_when_fields_missing() {
        let data = parse(serde_json::json!({ "main": { "temp": -0.2 }, "weather": [] }));
        let report = WeatherReport::from_api("Nowhere", data);

        assert_eq!(report.temperature, 0);
        assert_eq!(report.description, "");
        assert_eq!(report.icon, DEFAULT_ICON);
        assert!(report.country.is_none());
        assert_eq!(report.location_label(), "Nowhere");
    }

    #[test]
    fn test_odd_first_condition_uses_defaults() {
        let data = parse(serde_json::json!({
            "main": { "temp": 5.0 },
            "weather": [null, { "description": "ignored", "icon": "02n" }]
        }));
        let report = WeatherReport::from_api("Oslo", data);

        assert_eq!(report.temperature, 5);
        assert_eq!(report.description, "");
        assert_eq!(report.icon, DEFAULT_ICON);
    }

    #[test]
    fn test_odd_later_conditions_are_ignored() {
        let data = parse(serde_json::json!({
            "main": { "temp": 5.0 },
            "weather": [{ "description": "mist", "icon": "50d" }, null, 7]
        }));
        let report = WeatherReport::from_api("Oslo", data);

        assert_eq!(report.description, "mist");
        assert_eq!(report.icon, "50d");
    }

    #[test]
    fn test_missing_temperature_is_parse_failure() {
        let result: Result<ApiWeatherResponse, _> =
            serde_json::from_value(serde_json::json!({ "weather": [] }));
        assert!(result.is_err());
    }

    #[test]
    fn test_user_messages() {
        assert_eq!(WeatherError::EmptyCity.user_message(), "Please enter a city.");
        assert!(WeatherError::MissingApiKey.user_message().contains("API key"));
        assert_eq!(
            WeatherError::Api {
                status: 404,
                message: Some("city not found".into())
            }
            .user_message(),
            "city not found"
        );
        assert_eq!(
            WeatherError::Api {
                status: 500,
                message: None
            }
            .user_message(),
            "Failed to load weather"
        );
        assert_eq!(
            WeatherError::Network(NetworkError::Timeout).user_message(),
            "Could not load weather."
        );
    }

    #[test]
    fn test_is_local() {
        assert!(WeatherError::EmptyCity.is_local());
        assert!(WeatherError::MissingApiKey.is_local());
        assert!(!WeatherError::Parse("x".into()).is_local());
    }
}
