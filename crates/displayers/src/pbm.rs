//! Frame-file display backend
//!
//! Writes every frame as a plain netpbm bitmap. Frames are written to a
//! temporary file and renamed into place, so readers never see half a frame.

use crate::raster::MonoRaster;
use crate::screen::{compose_message, compose_status};
use chrono::Utc;
use chrono_tz::Tz;
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use log::{debug, info};
use std::fs;
use std::path::{Path, PathBuf};
use wx_station_core::{DisplayError, Displayer, Reading, DISPLAY_HEIGHT, DISPLAY_WIDTH};

pub struct PbmDisplay {
    path: PathBuf,
    timezone: Tz,
    raster: MonoRaster,
}

impl PbmDisplay {
    pub fn new(path: impl Into<PathBuf>, timezone: Tz) -> Self {
        Self {
            path: path.into(),
            timezone,
            raster: MonoRaster::new(DISPLAY_WIDTH, DISPLAY_HEIGHT),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn blank(&mut self) {
        self.raster.clear(BinaryColor::Off).unwrap_or_else(|never| match never {});
    }

    fn flush(&self) -> std::io::Result<()> {
        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);
        fs::write(&tmp, self.raster.to_pbm())?;
        fs::rename(&tmp, &self.path)
    }
}

impl Displayer for PbmDisplay {
    fn id(&self) -> &str {
        "pbm"
    }

    fn init(&mut self) -> Result<(), DisplayError> {
        self.blank();
        self.flush().map_err(|e| {
            DisplayError::Unavailable(format!("cannot write {}: {}", self.path.display(), e))
        })?;
        info!("Display initialized successfully ({}).", self.path.display());
        Ok(())
    }

    fn show_message(&mut self, text: &str) -> Result<(), DisplayError> {
        compose_message(&mut self.raster, text).unwrap_or_else(|never| match never {});
        self.flush()?;
        Ok(())
    }

    fn render(&mut self, reading: Option<&Reading>) -> Result<(), DisplayError> {
        let now = Utc::now().with_timezone(&self.timezone);
        compose_status(&mut self.raster, reading, now).unwrap_or_else(|never| match never {});
        self.flush()?;
        Ok(())
    }

    fn clear(&mut self) -> Result<(), DisplayError> {
        self.blank();
        self.flush()?;
        debug!("Display cleared");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("wx-station-{}-{}.pbm", name, std::process::id()))
    }

    #[test]
    fn test_init_writes_blank_frame() {
        let path = frame_path("init");
        let mut display = PbmDisplay::new(&path, Tz::UTC);
        display.init().unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("P1\n128 64\n"));
        assert!(!content.lines().skip(2).any(|l| l.contains('1')));
        fs::remove_file(path).ok();
    }

    #[test]
    fn test_render_then_clear() {
        let path = frame_path("render");
        let mut display = PbmDisplay::new(&path, Tz::UTC);
        display.render(Some(&Reading::new(21.0, 45.0))).unwrap();
        assert!(fs::read_to_string(&path).unwrap().lines().skip(2).any(|l| l.contains('1')));

        display.clear().unwrap();
        assert!(!fs::read_to_string(&path).unwrap().lines().skip(2).any(|l| l.contains('1')));
        fs::remove_file(path).ok();
    }

    #[test]
    fn test_unwritable_path_fails_init() {
        let mut display = PbmDisplay::new("/nonexistent-dir/wx-station/display.pbm", Tz::UTC);
        assert!(matches!(display.init(), Err(DisplayError::Unavailable(_))));
    }
}
