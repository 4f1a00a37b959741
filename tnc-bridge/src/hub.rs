//! Broadcast hub
//!
//! One serialized payload per monitor event flows through here: into the
//! bounded replay history and out to every connected WebSocket client via
//! a broadcast channel. Subscription and history snapshot happen under
//! one lock so a joining client neither misses nor duplicates a message.

use std::sync::{Arc, Mutex};

use tokio::sync::broadcast;

use tnc_monitor::MonitorState;

/// Live messages buffered per client before it counts as lagging
const CHANNEL_CAPACITY: usize = 256;

/// Shared fan-out handle, cheap to clone
#[derive(Clone)]
pub struct Hub {
    tx: broadcast::Sender<String>,
    state: Arc<Mutex<MonitorState>>,
}

impl Hub {
    /// Create a hub whose replay history holds `history_capacity` lines
    pub fn new(history_capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self {
            tx,
            state: Arc::new(Mutex::new(MonitorState::new(history_capacity))),
        }
    }

    /// Record a payload in the history and fan it out to live clients
    pub fn publish(&self, payload: String) {
        let mut state = self.state.lock().expect("monitor state mutex poisoned");
        state.history.push(payload.clone());
        // No receivers is fine; history still replays later.
        let _ = self.tx.send(payload);
    }

    /// History snapshot plus a live receiver, atomically
    pub fn subscribe(&self) -> (Vec<String>, broadcast::Receiver<String>) {
        let state = self.state.lock().expect("monitor state mutex poisoned");
        (state.history.snapshot(), self.tx.subscribe())
    }

    /// Run `f` against the monitor state
    pub fn with_state<R>(&self, f: impl FnOnce(&mut MonitorState) -> R) -> R {
        f(&mut self.state.lock().expect("monitor state mutex poisoned"))
    }
}
