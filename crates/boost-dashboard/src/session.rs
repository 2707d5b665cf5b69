//! Dashboard session: the single owner of task, weather, and quote state.

use std::sync::Arc;

use boost_core::{AppError, Config};
use boost_quotes::{QuoteClient, QuoteOutcome};
use boost_services::{keys, FileStore, KeyValueStore, MemoryStore, Persistence, Task, TaskManager};
use boost_weather::{WeatherClient, WeatherError, WeatherReport};

use crate::render;
use crate::sequence::{RequestSequencer, RequestToken};

/// Shown in the weather panel before any lookup.
pub const WEATHER_IDLE_TEXT: &str = "Enter a city to see the weather.";
/// Shown in the quote panel while a fetch is in flight.
pub const QUOTE_LOADING_TEXT: &str = "Loading quote…";

#[derive(Debug, Clone, PartialEq)]
pub enum WeatherPanel {
    Idle,
    Loading,
    Ready(WeatherReport),
    /// Prompt, configuration reminder, or failure text
    Message(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuotePanel {
    Loading,
    Ready(QuoteOutcome),
}

pub struct Dashboard {
    tasks: TaskManager,
    persistence: Persistence,
    saved_city: Option<String>,
    weather: WeatherPanel,
    quote: QuotePanel,
    weather_client: WeatherClient,
    quote_client: QuoteClient,
    weather_requests: RequestSequencer,
    quote_requests: RequestSequencer,
}

impl Dashboard {
    /// Open the dashboard described by `config`.
    ///
    /// An unusable data directory degrades to in-memory storage rather than failing.
    ///
    /// # Errors
    /// Returns `AppError::Network` if an HTTP client cannot be built.
    pub fn open(config: &Config) -> Result<Self, AppError> {
        let store: Arc<dyn KeyValueStore> = match FileStore::open(&config.data_dir) {
            Ok(store) => Arc::new(store),
            Err(e) => {
                tracing::warn!(
                    "Data directory {} unavailable ({}), changes won't be saved",
                    config.data_dir.display(),
                    e
                );
                Arc::new(MemoryStore::new())
            }
        };

        let weather_client = WeatherClient::from_config(&config.weather, &config.http)?;
        let quote_client = QuoteClient::from_config(&config.quotes, &config.http)?;

        Ok(Self::with_parts(
            Persistence::new(store),
            weather_client,
            quote_client,
        ))
    }

    /// Assemble a dashboard from explicit parts, loading persisted state.
    pub fn with_parts(
        persistence: Persistence,
        weather_client: WeatherClient,
        quote_client: QuoteClient,
    ) -> Self {
        let tasks = TaskManager::load(persistence.clone());
        let saved_city = persistence
            .load(keys::CITY, String::new())
            .trim()
            .to_string();
        let saved_city = (!saved_city.is_empty()).then_some(saved_city);

        Self {
            tasks,
            persistence,
            saved_city,
            weather: WeatherPanel::Idle,
            quote: QuotePanel::Loading,
            weather_client,
            quote_client,
            weather_requests: RequestSequencer::new(),
            quote_requests: RequestSequencer::new(),
        }
    }

    pub fn tasks(&self) -> &TaskManager {
        &self.tasks
    }

    pub fn saved_city(&self) -> Option<&str> {
        self.saved_city.as_deref()
    }

    pub fn weather(&self) -> &WeatherPanel {
        &self.weather
    }

    pub fn quote(&self) -> &QuotePanel {
        &self.quote
    }

    /// Client handle for issuing a weather request outside the session.
    pub fn weather_client(&self) -> WeatherClient {
        self.weather_client.clone()
    }

    /// Client handle for issuing a quote request outside the session.
    pub fn quote_client(&self) -> QuoteClient {
        self.quote_client.clone()
    }

    // Tasks

    pub fn add_task(&mut self, text: &str) -> Option<Task> {
        self.tasks.add(text)
    }

    pub fn toggle_task(&mut self, id: &str, done: bool) -> bool {
        self.tasks.toggle(id, done)
    }

    pub fn delete_task(&mut self, id: &str) -> bool {
        self.tasks.delete(id)
    }

    pub fn clear_completed(&mut self) -> usize {
        self.tasks.clear_completed()
    }

    // Weather

    /// Mark the weather panel loading and issue a token for the new request.
    pub fn begin_weather(&mut self) -> RequestToken {
        self.weather = WeatherPanel::Loading;
        self.weather_requests.issue()
    }

    /// Apply a weather result if `token` is still the latest request.
    ///
    /// On success the city becomes the saved city. Returns whether the result was applied.
    pub fn finish_weather(
        &mut self,
        token: RequestToken,
        result: Result<WeatherReport, WeatherError>,
    ) -> bool {
        if !self.weather_requests.is_latest(token) {
            tracing::debug!("Dropping stale weather result {:?}", token);
            return false;
        }

        self.weather = match result {
            Ok(report) => {
                self.persistence.save(keys::CITY, &report.city);
                self.saved_city = Some(report.city.clone());
                WeatherPanel::Ready(report)
            }
            Err(e) => {
                if !e.is_local() {
                    tracing::info!("Weather lookup failed: {}", e);
                }
                WeatherPanel::Message(e.user_message())
            }
        };
        true
    }

    pub async fn fetch_weather(&mut self, city: &str) -> bool {
        let token = self.begin_weather();
        let result = self.weather_client.fetch(city).await;
        self.finish_weather(token, result)
    }

    // Quotes

    /// Show the loading placeholder and issue a token for the new request.
    pub fn begin_quote(&mut self) -> RequestToken {
        self.quote = QuotePanel::Loading;
        self.quote_requests.issue()
    }

    /// Apply a quote if `token` is still the latest request.
    pub fn finish_quote(&mut self, token: RequestToken, outcome: QuoteOutcome) -> bool {
        if !self.quote_requests.is_latest(token) {
            tracing::debug!("Dropping stale quote {:?}", token);
            return false;
        }
        self.quote = QuotePanel::Ready(outcome);
        true
    }

    pub async fn fetch_quote(&mut self) -> bool {
        let token = self.begin_quote();
        let outcome = self.quote_client.fetch().await;
        self.finish_quote(token, outcome)
    }

    /// Initial load: weather for the saved city (if any) and a quote, fetched together.
    pub async fn startup(&mut self) {
        let weather_request = self
            .saved_city
            .clone()
            .map(|city| (self.begin_weather(), city));
        let quote_token = self.begin_quote();

        let weather_client = self.weather_client.clone();
        let quote_client = self.quote_client.clone();
        let weather_fut = async {
            match &weather_request {
                Some((_, city)) => Some(weather_client.fetch(city).await),
                None => None,
            }
        };

        let (weather, quote) = tokio::join!(weather_fut, quote_client.fetch());

        if let (Some((token, _)), Some(result)) = (weather_request, weather) {
            self.finish_weather(token, result);
        }
        self.finish_quote(quote_token, quote);
    }

    /// Full text dashboard for today.
    pub fn render(&self) -> String {
        render::dashboard(self, chrono::Local::now().date_naive())
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::panic)]
    use super::*;

    use boost_quotes::{Quote, QuoteSource};
    use std::time::Duration;

    fn offline_dashboard(persistence: Persistence, api_key: Option<&str>) -> Dashboard {
        let weather = WeatherClient::new(
            "http://127.0.0.1:1/weather",
            api_key.map(str::to_string),
            Duration::from_secs(1),
        )
        .unwrap();
        let quotes = QuoteClient::new(
            "http://127.0.0.1:1/today",
            "http://127.0.0.1:1/random",
            Duration::from_secs(1),
        )
        .unwrap();
        Dashboard::with_parts(persistence, weather, quotes)
    }

    fn report(city: &str) -> WeatherReport {
        WeatherReport {
            city: city.to_string(),
            country: None,
            temperature: 20,
            description: "clear sky".to_string(),
            icon: "01d".to_string(),
        }
    }

    fn outcome(text: &str) -> QuoteOutcome {
        QuoteOutcome {
            quote: Quote::new(text, "Someone"),
            source: QuoteSource::Primary,
        }
    }

    #[test]
    fn test_loads_saved_city() {
        let persistence = Persistence::in_memory();
        persistence.save(keys::CITY, "Kyoto");
        let dashboard = offline_dashboard(persistence, None);
        assert_eq!(dashboard.saved_city(), Some("Kyoto"));
        assert_eq!(dashboard.weather(), &WeatherPanel::Idle);
    }

    #[test]
    fn test_blank_saved_city_is_none() {
        let persistence = Persistence::in_memory();
        persistence.save(keys::CITY, "  ");
        let dashboard = offline_dashboard(persistence, None);
        assert!(dashboard.saved_city().is_none());
    }

    #[test]
    fn test_stale_weather_result_is_dropped() {
        let persistence = Persistence::in_memory();
        let mut dashboard = offline_dashboard(persistence.clone(), Some("key"));

        let older = dashboard.begin_weather();
        let newer = dashboard.begin_weather();

        assert!(dashboard.finish_weather(newer, Ok(report("Lima"))));
        assert!(!dashboard.finish_weather(older, Ok(report("Quito"))));

        assert_eq!(dashboard.weather(), &WeatherPanel::Ready(report("Lima")));
        assert_eq!(dashboard.saved_city(), Some("Lima"));
        let stored: String = persistence.load(keys::CITY, String::new());
        assert_eq!(stored, "Lima");
    }

    #[test]
    fn test_weather_failure_keeps_saved_city() {
        let persistence = Persistence::in_memory();
        persistence.save(keys::CITY, "Oslo");
        let mut dashboard = offline_dashboard(persistence, Some("key"));

        let token = dashboard.begin_weather();
        assert_eq!(dashboard.weather(), &WeatherPanel::Loading);
        dashboard.finish_weather(
            token,
            Err(WeatherError::Api {
                status: 404,
                message: Some("city not found".into()),
            }),
        );

        assert_eq!(
            dashboard.weather(),
            &WeatherPanel::Message("city not found".into())
        );
        assert_eq!(dashboard.saved_city(), Some("Oslo"));
    }

    #[test]
    fn test_stale_quote_is_dropped() {
        let mut dashboard = offline_dashboard(Persistence::in_memory(), None);
        let older = dashboard.begin_quote();
        let newer = dashboard.begin_quote();

        assert!(!dashboard.finish_quote(older, outcome("old")));
        assert_eq!(dashboard.quote(), &QuotePanel::Loading);

        assert!(dashboard.finish_quote(newer, outcome("new")));
        assert_eq!(dashboard.quote(), &QuotePanel::Ready(outcome("new")));
    }

    #[tokio::test]
    async fn test_empty_city_shows_prompt() {
        let mut dashboard = offline_dashboard(Persistence::in_memory(), Some("key"));
        assert!(dashboard.fetch_weather("   ").await);
        assert_eq!(
            dashboard.weather(),
            &WeatherPanel::Message("Please enter a city.".into())
        );
        assert!(dashboard.saved_city().is_none());
    }

    #[tokio::test]
    async fn test_missing_key_shows_reminder() {
        let mut dashboard = offline_dashboard(Persistence::in_memory(), None);
        dashboard.fetch_weather("Berlin").await;
        match dashboard.weather() {
            WeatherPanel::Message(text) => assert!(text.contains("API key")),
            other => panic!("unexpected panel: {:?}", other),
        }
    }

    #[test]
    fn test_task_operations_delegate() {
        let mut dashboard = offline_dashboard(Persistence::in_memory(), None);
        let task = dashboard.add_task("Read a chapter").unwrap();
        assert!(dashboard.toggle_task(&task.id, true));
        assert_eq!(dashboard.tasks().view().summary, "1/1 completed");
        assert_eq!(dashboard.clear_completed(), 1);
        assert!(!dashboard.delete_task(&task.id));
        assert!(dashboard.tasks().list().is_empty());
    }
}
