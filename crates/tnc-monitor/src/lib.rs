//! Monitor-side state for the TNC bridge
//!
//! The decoder itself is memoryless; everything that accumulates across
//! lines lives here: the bounded replay history for late-joining clients,
//! the rolling per-minute message-rate histogram, the set of known ports
//! with their latest telemetry snapshot, and the deterministic route
//! coloring the dashboard uses to tell conversations apart.

pub mod color;
pub mod history;
pub mod ports;
pub mod rate;

pub use color::route_color;
pub use history::History;
pub use ports::{PortRegistry, PortStats};
pub use rate::RateHistogram;

use chrono::{DateTime, Utc};
use tnc_protocol::TncTelemetry;

/// Aggregate monitor state, one instance per bridge
pub struct MonitorState {
    /// Replay history of broadcast payloads
    pub history: History,
    /// Per-minute message counts
    pub rate: RateHistogram,
    /// Known ports and their statistics
    pub ports: PortRegistry,
}

impl MonitorState {
    /// Create monitor state with the given history capacity
    pub fn new(history_capacity: usize) -> Self {
        Self {
            history: History::new(history_capacity),
            rate: RateHistogram::default(),
            ports: PortRegistry::default(),
        }
    }

    /// Record a monitor line observed on a port at the given instant
    pub fn observe_line(&mut self, port: Option<u32>, at: DateTime<Utc>) {
        self.rate.record(at);
        if let Some(port) = port {
            self.ports.record_frame(port, at);
        }
    }

    /// Record a telemetry broadcast for a port
    pub fn observe_telemetry(&mut self, port: u32, at: DateTime<Utc>, telemetry: TncTelemetry) {
        self.ports.record_telemetry(port, at, telemetry);
    }
}
