//! Daily quote for Daily Boost.
//!
//! Tries ZenQuotes, then Quotable, then a built-in quote. Fetching never fails.

pub mod client;
pub mod types;

pub use client::QuoteClient;
pub use types::{Quote, QuoteError, QuoteOutcome, QuoteSource, FALLBACK_AUTHOR, FALLBACK_TEXT};
