use std::fmt;

use boost_core::NetworkError;
use serde::{Deserialize, Serialize};

/// Text of the built-in quote shown when both providers fail.
pub const FALLBACK_TEXT: &str = "Keep going. Your future self will thank you.";
/// Attribution for quotes without a known author.
pub const FALLBACK_AUTHOR: &str = "Unknown";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quote {
    pub text: String,
    pub author: String,
}

impl Quote {
    pub fn new(text: impl Into<String>, author: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            author: author.into(),
        }
    }

    pub fn built_in() -> Self {
        Self::new(FALLBACK_TEXT, FALLBACK_AUTHOR)
    }

    /// Build from provider fields; a missing or blank author becomes "Unknown".
    pub(crate) fn from_parts(text: String, author: Option<String>) -> Result<Self, QuoteError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(QuoteError::EmptyQuote);
        }
        let author = author
            .map(|a| a.trim().to_string())
            .filter(|a| !a.is_empty())
            .unwrap_or_else(|| FALLBACK_AUTHOR.to_string());
        Ok(Self::new(text, author))
    }

    /// `“text”`
    pub fn quoted_text(&self) -> String {
        format!("\u{201c}{}\u{201d}", self.text)
    }

    /// `— author`
    pub fn attribution(&self) -> String {
        format!("\u{2014} {}", self.author)
    }
}

impl fmt::Display for Quote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\n{}", self.quoted_text(), self.attribution())
    }
}

/// Where a displayed quote came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuoteSource {
    Primary,
    Fallback,
    BuiltIn,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuoteOutcome {
    pub quote: Quote,
    pub source: QuoteSource,
}

/// ZenQuotes entry: `{"q": "...", "a": "...", "h": "..."}`
#[derive(Debug, Deserialize)]
pub(crate) struct ZenQuote {
    #[serde(default)]
    pub q: Option<String>,
    #[serde(default)]
    pub a: Option<String>,
}

/// Quotable body: `{"content": "...", "author": "..."}`
#[derive(Debug, Deserialize)]
pub(crate) struct QuotableQuote {
    pub content: String,
    #[serde(default)]
    pub author: Option<String>,
}

/// Why a single provider attempt was unusable.
#[derive(Debug, thiserror::Error)]
pub enum QuoteError {
    #[error("Network error: {0}")]
    Network(#[from] NetworkError),
    #[error("Quote provider returned status {0}")]
    Status(u16),
    #[error("Malformed quote response: {0}")]
    Malformed(String),
    #[error("Quote response had no text")]
    EmptyQuote,
}
