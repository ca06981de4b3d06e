//! Typed channel between the hero search bar and the listing controller.

#[cfg(test)]
#[path = "events_test.rs"]
mod events_test;

use tokio::sync::broadcast;
use tracing::debug;

const DEFAULT_CAPACITY: usize = 16;

/// Location picked in the hero banner
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeroSearch {
    pub location: String,
}

impl HeroSearch {
    pub fn new(location: impl Into<String>) -> Self {
        Self {
            location: location.into(),
        }
    }
}

/// Publish/subscribe hub for hero searches
#[derive(Debug, Clone)]
pub struct SearchEvents {
    tx: broadcast::Sender<HeroSearch>,
}

impl Default for SearchEvents {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl SearchEvents {
    pub fn new(capacity: usize) -> Self {
        let (tx, _rx) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<HeroSearch> {
        self.tx.subscribe()
    }

    /// Returns how many subscribers will see the event
    pub fn publish(&self, event: HeroSearch) -> usize {
        match self.tx.send(event) {
            Ok(receivers) => receivers,
            Err(broadcast::error::SendError(event)) => {
                debug!("No listeners for hero search {:?}", event.location);
                0
            }
        }
    }
}
