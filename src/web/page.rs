//! Status page template

use askama::Template;
use wx_station_types::{format_value, Reading, WEB_PLACEHOLDER};

/// Seconds between browser reloads of the page
pub const REFRESH_SECS: u32 = 15;

#[derive(Template)]
#[template(path = "status.html")]
struct StatusTemplate<'a> {
    title: &'a str,
    location: &'a str,
    temperature: String,
    humidity: String,
    refresh_secs: u32,
}

/// Renders the status page from a store snapshot
#[derive(Debug, Clone)]
pub struct StatusPage {
    title: String,
    location: String,
}

impl StatusPage {
    pub fn new(title: impl Into<String>, location: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            location: location.into(),
        }
    }

    /// Render the page. Missing values show the placeholder, never a number.
    pub fn render(&self, reading: Option<&Reading>) -> Result<String, askama::Error> {
        StatusTemplate {
            title: &self.title,
            location: &self.location,
            temperature: format_value(reading.and_then(|r| r.temperature), WEB_PLACEHOLDER),
            humidity: format_value(reading.and_then(|r| r.humidity), WEB_PLACEHOLDER),
            refresh_secs: REFRESH_SECS,
        }
        .render()
    }
}
