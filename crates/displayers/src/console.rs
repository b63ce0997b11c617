//! Console display backend - one log line whenever the shown text changes

use log::info;
use wx_station_core::{DisplayError, Displayer, Reading};
use wx_station_types::{format_value, DISPLAY_PLACEHOLDER};

#[derive(Default)]
pub struct ConsoleDisplay {
    last_line: Option<String>,
}

impl ConsoleDisplay {
    pub fn new() -> Self {
        Self::default()
    }

    /// Text for a snapshot, e.g. `T 25.0 °C  H 61.0 %`
    pub fn status_line(reading: Option<&Reading>) -> String {
        format!(
            "T {} °C  H {} %",
            format_value(reading.and_then(|r| r.temperature), DISPLAY_PLACEHOLDER),
            format_value(reading.and_then(|r| r.humidity), DISPLAY_PLACEHOLDER)
        )
    }

    fn show(&mut self, line: String) {
        if self.last_line.as_deref() != Some(line.as_str()) {
            info!("[display] {}", line);
            self.last_line = Some(line);
        }
    }
}

impl Displayer for ConsoleDisplay {
    fn id(&self) -> &str {
        "console"
    }

    fn init(&mut self) -> Result<(), DisplayError> {
        info!("Console display initialized.");
        Ok(())
    }

    fn show_message(&mut self, text: &str) -> Result<(), DisplayError> {
        self.show(text.to_string());
        Ok(())
    }

    fn render(&mut self, reading: Option<&Reading>) -> Result<(), DisplayError> {
        self.show(Self::status_line(reading));
        Ok(())
    }

    fn clear(&mut self) -> Result<(), DisplayError> {
        self.last_line = None;
        Ok(())
    }
}
