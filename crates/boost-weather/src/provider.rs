//! OpenWeatherMap current-weather client.

use std::time::Duration;

use boost_core::{HttpConfig, NetworkError, ReqwestErrorExt, WeatherConfig};
use reqwest::Client;
use tracing::instrument;

use crate::types::{ApiWeatherResponse, WeatherError, WeatherReport};

const UNITS: &str = "metric";

#[derive(Debug, Clone)]
pub struct WeatherClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl WeatherClient {
    /// Build a client. A blank or `YOUR_…` placeholder key counts as missing.
    ///
    /// # Errors
    /// Returns `NetworkError::ClientBuild` if the HTTP client cannot be created.
    pub fn new(
        base_url: impl Into<String>,
        api_key: Option<String>,
        timeout: Duration,
    ) -> Result<Self, NetworkError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(ReqwestErrorExt::into_network_error)?;

        let api_key = api_key
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty() && !k.starts_with("YOUR_"));

        Ok(Self {
            client,
            base_url: base_url.into(),
            api_key,
        })
    }

    pub fn from_config(weather: &WeatherConfig, http: &HttpConfig) -> Result<Self, NetworkError> {
        Self::new(
            weather.base_url.clone(),
            Some(weather.api_key.clone()),
            Duration::from_secs(http.timeout_secs),
        )
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    /// Fetch current conditions for `city`.
    ///
    /// Blank cities and a missing key are rejected before any request is made.
    ///
    /// # Errors
    /// - `WeatherError::EmptyCity` / `WeatherError::MissingApiKey` without a request
    /// - `WeatherError::Api` for a non-success status, carrying the body's `message`
    /// - `WeatherError::Network` / `WeatherError::Parse` for transport or body failures
    #[instrument(skip(self), level = "debug")]
    pub async fn fetch(&self, city: &str) -> Result<WeatherReport, WeatherError> {
        let city = city.trim();
        if city.is_empty() {
            return Err(WeatherError::EmptyCity);
        }

        let Some(api_key) = self.api_key.as_deref() else {
            return Err(WeatherError::MissingApiKey);
        };

        let response = self
            .client
            .get(&self.base_url)
            .query(&[("q", city), ("units", UNITS), ("appid", api_key)])
            .send()
            .await
            .map_err(|e| WeatherError::Network(e.into_network_error()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| WeatherError::Network(e.into_network_error()))?;

        if !status.is_success() {
            let message = serde_json::from_str::<serde_json::Value>(&body)
                .ok()
                .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(str::to_string))
                .filter(|m| !m.is_empty());
            tracing::debug!("Weather request for {} failed with {}", city, status);
            return Err(WeatherError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let data: ApiWeatherResponse =
            serde_json::from_str(&body).map_err(|e| WeatherError::Parse(e.to_string()))?;

        let report = WeatherReport::from_api(city, data);
        tracing::info!(
            "Weather for {}: {}°C {}",
            report.location_label(),
            report.temperature,
            report.description
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    fn client(key: Option<&str>) -> WeatherClient {
        WeatherClient::new(
            "http://127.0.0.1:9/weather",
            key.map(str::to_string),
            Duration::from_secs(1),
        )
        .unwrap()
    }

    #[test]
    fn test_placeholder_key_counts_as_missing() {
        assert!(!client(Some("YOUR_OPENWEATHER_API_KEY")).has_api_key());
        assert!(!client(Some("  ")).has_api_key());
        assert!(!client(None).has_api_key());
        assert!(client(Some("abc")).has_api_key());
    }

    #[tokio::test]
    async fn test_blank_city_rejected_before_key_check() {
        let err = client(None).fetch("   ").await.unwrap_err();
        assert!(matches!(err, WeatherError::EmptyCity));
    }

    #[tokio::test]
    async fn test_missing_key_rejected_without_request() {
        let err = client(None).fetch("Berlin").await.unwrap_err();
        assert!(matches!(err, WeatherError::MissingApiKey));
    }

    #[test]
    fn test_from_config() {
        let weather = WeatherConfig {
            api_key: "k".into(),
            base_url: "https://example.com/weather".into(),
        };
        let client = WeatherClient::from_config(&weather, &HttpConfig::default()).unwrap();
        assert!(client.has_api_key());
    }
}
