//! Displayer trait and related types

use thiserror::Error;
use wx_station_types::Reading;

/// Display failures
#[derive(Debug, Error)]
pub enum DisplayError {
    /// Hardware could not be initialized
    #[error("display unavailable: {0}")]
    Unavailable(String),
    /// A frame could not be pushed out
    #[error("failed to render frame: {0}")]
    Render(#[from] std::io::Error),
}

/// Trait for all displayers
///
/// Displayers own their output device and render whatever snapshot the
/// display consumer hands them. `None` means no reading has been stored yet.
pub trait Displayer: Send {
    /// Unique identifier for this displayer type
    fn id(&self) -> &str;

    /// Bring the hardware up. Called once before the station starts running.
    fn init(&mut self) -> Result<(), DisplayError>;

    /// Show a single centered message (startup splash)
    fn show_message(&mut self, text: &str) -> Result<(), DisplayError>;

    /// Render the status screen for the given snapshot
    fn render(&mut self, reading: Option<&Reading>) -> Result<(), DisplayError>;

    /// Blank the screen
    fn clear(&mut self) -> Result<(), DisplayError>;
}

/// Type-erased displayer for dynamic dispatch
pub type BoxedDisplayer = Box<dyn Displayer>;
