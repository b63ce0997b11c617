//! Station lifecycle states

use serde::{Deserialize, Serialize};
use std::fmt;

/// Coarse lifecycle of the whole station
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum StationState {
    /// Hardware not yet confirmed
    #[default]
    Initializing,
    /// All consumer schedules active
    Running,
    /// Shutdown requested, tasks releasing hardware
    Stopping,
    /// Orderly shutdown finished
    Stopped,
    /// Startup aborted or a fatal fault occurred
    Failed,
}

impl StationState {
    /// Whether `next` is a legal successor of this state
    pub fn can_transition_to(self, next: StationState) -> bool {
        use StationState::*;
        matches!(
            (self, next),
            (Initializing, Running)
                | (Initializing, Failed)
                | (Running, Stopping)
                | (Stopping, Stopped)
                | (Stopping, Failed)
        )
    }
}

impl fmt::Display for StationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StationState::Initializing => "initializing",
            StationState::Running => "running",
            StationState::Stopping => "stopping",
            StationState::Stopped => "stopped",
            StationState::Failed => "failed",
        };
        f.write_str(name)
    }
}
