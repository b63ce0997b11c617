//! Configuration management

mod settings;

pub use settings::{StationConfig, CONFIG_VERSION};
