//! Display consumer - best-effort periodic rendering of the latest reading

use crate::displayer::BoxedDisplayer;
use crate::shutdown::Shutdown;
use crate::store::ReadingStore;
use log::{debug, info, warn};
use std::time::Duration;
use tokio::time::MissedTickBehavior;

/// Refreshes the display from the store on a short fixed period.
///
/// Rendering faults are logged and the loop carries on; the display is
/// never fatal to the station.
pub struct DisplayConsumer {
    display: BoxedDisplayer,
    store: ReadingStore,
    refresh: Duration,
    splash: Vec<String>,
    splash_hold: Duration,
    render_failures: u64,
}

impl DisplayConsumer {
    pub fn new(display: BoxedDisplayer, store: ReadingStore, refresh: Duration) -> Self {
        Self {
            display,
            store,
            refresh,
            splash: Vec::new(),
            splash_hold: Duration::ZERO,
            render_failures: 0,
        }
    }

    /// Show these messages, each for `hold`, before the first refresh
    pub fn with_splash(mut self, messages: Vec<String>, hold: Duration) -> Self {
        self.splash = messages;
        self.splash_hold = hold;
        self
    }

    /// Render the current store contents once
    pub fn refresh_once(&mut self) {
        let snapshot = self.store.read();
        if let Err(e) = self.display.render(snapshot.as_ref()) {
            self.render_failures += 1;
            warn!("Display refresh failed: {}", e);
        }
    }

    /// Run until shutdown, then clear the screen
    pub async fn run(mut self, shutdown: Shutdown) {
        if self.run_splash(&shutdown).await {
            let mut ticker = tokio::time::interval(self.refresh);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

            info!("Refreshing display {} every {:?}", self.display.id(), self.refresh);
            loop {
                tokio::select! {
                    biased;
                    _ = shutdown.triggered() => break,
                    _ = ticker.tick() => self.refresh_once(),
                }
            }
        }

        debug!(
            "Display consumer exiting ({} failed refreshes)",
            self.render_failures
        );
        if let Err(e) = self.display.clear() {
            warn!("Failed to clear display: {}", e);
        }
    }

    /// Returns `false` if shutdown arrived during the splash
    async fn run_splash(&mut self, shutdown: &Shutdown) -> bool {
        let messages = std::mem::take(&mut self.splash);
        for message in &messages {
            if let Err(e) = self.display.show_message(message) {
                warn!("Failed to show splash message {:?}: {}", message, e);
            }
            if !shutdown.sleep(self.splash_hold).await {
                return false;
            }
        }
        true
    }
}
