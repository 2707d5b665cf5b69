//! Plain-text rendering of the dashboard panels.

use boost_services::TaskView;
use chrono::NaiveDate;

use crate::session::{Dashboard, QuotePanel, WeatherPanel, QUOTE_LOADING_TEXT, WEATHER_IDLE_TEXT};

const WEATHER_LOADING_TEXT: &str = "Loading weather…";

/// "Sunday, October 18"
pub fn date_header(today: NaiveDate) -> String {
    today.format("%A, %B %-d").to_string()
}

pub fn tasks(view: &TaskView) -> String {
    let mut out = String::new();
    for line in &view.lines {
        out.push_str("  ");
        out.push_str(&line.to_string());
        out.push('\n');
    }
    out.push_str(&view.summary);
    out
}

pub fn weather(panel: &WeatherPanel) -> String {
    match panel {
        WeatherPanel::Idle => WEATHER_IDLE_TEXT.to_string(),
        WeatherPanel::Loading => WEATHER_LOADING_TEXT.to_string(),
        WeatherPanel::Message(text) => text.clone(),
        WeatherPanel::Ready(report) => {
            let mut out = format!("{}°C", report.temperature);
            if !report.description.is_empty() {
                out.push_str("  ");
                out.push_str(&report.description);
            }
            out.push('\n');
            out.push_str(&report.location_label());
            out.push('\n');
            out.push_str(&report.icon_url());
            out
        }
    }
}

pub fn quote(panel: &QuotePanel) -> String {
    match panel {
        QuotePanel::Loading => QUOTE_LOADING_TEXT.to_string(),
        QuotePanel::Ready(outcome) => outcome.quote.to_string(),
    }
}

pub fn dashboard(dashboard: &Dashboard, today: NaiveDate) -> String {
    let sections = [
        date_header(today),
        section("Tasks", &tasks(&dashboard.tasks().view())),
        section("Weather", &weather(dashboard.weather())),
        section("Quote", &quote(dashboard.quote())),
    ];
    sections.join("\n\n")
}

fn section(title: &str, body: &str) -> String {
    format!("== {} ==\n{}", title, body)
}
