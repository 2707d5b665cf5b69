//! Dashboard session for Daily Boost.
//!
//! Composes the task list, weather lookup, and quote fetch into one state
//! object and renders it as text.

pub mod render;
pub mod sequence;
pub mod session;

pub use sequence::{RequestSequencer, RequestToken};
pub use session::{Dashboard, QuotePanel, WeatherPanel, QUOTE_LOADING_TEXT, WEATHER_IDLE_TEXT};
