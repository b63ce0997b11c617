//! wx-station-displayers: Status-screen rendering and display backends.

mod console;
mod pbm;
mod raster;
mod screen;

pub use console::ConsoleDisplay;
pub use pbm::PbmDisplay;
pub use raster::MonoRaster;
pub use screen::{compose_message, compose_status};

use chrono_tz::Tz;
use log::info;
use wx_station_core::BoxedDisplayer;
use wx_station_types::DisplayBackend;

/// Create the display described by `backend`; the clock line uses `timezone`
pub fn build_display(backend: &DisplayBackend, timezone: Tz) -> BoxedDisplayer {
    match backend {
        DisplayBackend::Pbm { path } => {
            info!("Using frame-file display at {}", path.display());
            Box::new(PbmDisplay::new(path.clone(), timezone))
        }
        DisplayBackend::Console => {
            info!("Using console display");
            Box::new(ConsoleDisplay::new())
        }
    }
}
