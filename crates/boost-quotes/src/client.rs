//! Quote client: primary source, fallback source, then the built-in quote.

use std::time::Duration;

use boost_core::{HttpConfig, NetworkError, QuotesConfig, ReqwestErrorExt};
use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::instrument;

use crate::types::{QuotableQuote, Quote, QuoteError, QuoteOutcome, QuoteSource, ZenQuote};

#[derive(Debug, Clone)]
pub struct QuoteClient {
    client: Client,
    primary_url: String,
    fallback_url: String,
}

impl QuoteClient {
    /// # Errors
    /// Returns `NetworkError::ClientBuild` if the HTTP client cannot be created.
    pub fn new(
        primary_url: impl Into<String>,
        fallback_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, NetworkError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(ReqwestErrorExt::into_network_error)?;

        Ok(Self {
            client,
            primary_url: primary_url.into(),
            fallback_url: fallback_url.into(),
        })
    }

    pub fn from_config(quotes: &QuotesConfig, http: &HttpConfig) -> Result<Self, NetworkError> {
        Self::new(
            quotes.primary_url.clone(),
            quotes.fallback_url.clone(),
            Duration::from_secs(http.timeout_secs),
        )
    }

    /// Fetch a quote. Every failure is absorbed; the built-in quote is the last resort.
    #[instrument(skip(self), level = "debug")]
    pub async fn fetch(&self) -> QuoteOutcome {
        match self.fetch_primary().await {
            Ok(quote) => {
                return QuoteOutcome {
                    quote,
                    source: QuoteSource::Primary,
                }
            }
            Err(e) => tracing::debug!("Primary quote source failed: {}", e),
        }

        match self.fetch_fallback().await {
            Ok(quote) => QuoteOutcome {
                quote,
                source: QuoteSource::Fallback,
            },
            Err(e) => {
                tracing::debug!("Fallback quote source failed: {}", e);
                QuoteOutcome {
                    quote: Quote::built_in(),
                    source: QuoteSource::BuiltIn,
                }
            }
        }
    }

    /// ZenQuotes: an array whose first element carries `q` and `a`.
    ///
    /// # Errors
    /// Fails on a non-success status, a non-array body, an empty array, or empty text.
    pub async fn fetch_primary(&self) -> Result<Quote, QuoteError> {
        // Only the first entry is read; later entries may be anything
        let entries: Vec<serde_json::Value> = self.get_json(&self.primary_url).await?;
        let first = entries
            .into_iter()
            .next()
            .ok_or_else(|| QuoteError::Malformed("empty quote array".to_string()))?;
        let first: ZenQuote =
            serde_json::from_value(first).map_err(|e| QuoteError::Malformed(e.to_string()))?;
        Quote::from_parts(first.q.unwrap_or_default(), first.a)
    }

    /// Quotable: an object with `content` and `author`.
    ///
    /// # Errors
    /// Fails on a non-success status, a malformed body, or empty content.
    pub async fn fetch_fallback(&self) -> Result<Quote, QuoteError> {
        let body: QuotableQuote = self.get_json(&self.fallback_url).await?;
        Quote::from_parts(body.content, body.author)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, QuoteError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| QuoteError::Network(e.into_network_error()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(QuoteError::Status(status.as_u16()));
        }

        let body = response
            .text()
            .await
            .map_err(|e| QuoteError::Network(e.into_network_error()))?;

        serde_json::from_str(&body).map_err(|e| QuoteError::Malformed(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    #[tokio::test]
    async fn test_unreachable_sources_fall_back_to_built_in() {
        let client = QuoteClient::new(
            "http://127.0.0.1:1/today",
            "http://127.0.0.1:1/random",
            Duration::from_secs(2),
        )
        .unwrap();

        let outcome = client.fetch().await;
        assert_eq!(outcome.source, QuoteSource::BuiltIn);
        assert_eq!(outcome.quote, Quote::built_in());
    }

    #[test]
    fn test_from_config() {
        let client =
            QuoteClient::from_config(&QuotesConfig::default(), &HttpConfig::default()).unwrap();
        assert!(client.primary_url.contains("zenquotes"));
        assert!(client.fallback_url.contains("quotable"));
    }
}
