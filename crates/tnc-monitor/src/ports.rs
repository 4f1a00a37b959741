//! Per-port statistics
//!
//! The node multiplexes several radio ports over one monitor stream. The
//! registry learns ports as they appear and keeps a frame counter, the
//! last-seen instant, and the most recent telemetry broadcast for each.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use tnc_protocol::TncTelemetry;

/// Statistics for a single node port
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PortStats {
    /// Monitor lines seen on this port
    pub frames: u64,
    /// Instant of the most recent activity
    pub last_seen: Option<DateTime<Utc>>,
    /// Most recent telemetry broadcast, when the port's TNC sends any
    pub telemetry: Option<TncTelemetry>,
}

/// Registry of every port observed on the monitor stream
#[derive(Debug, Default)]
pub struct PortRegistry {
    ports: BTreeMap<u32, PortStats>,
}

impl PortRegistry {
    /// Count a monitor line on `port`
    pub fn record_frame(&mut self, port: u32, at: DateTime<Utc>) {
        if !self.ports.contains_key(&port) {
            tracing::debug!("learned port {port}");
        }
        let stats = self.ports.entry(port).or_default();
        stats.frames += 1;
        stats.last_seen = Some(at);
    }

    /// Store the latest telemetry snapshot for `port`
    pub fn record_telemetry(&mut self, port: u32, at: DateTime<Utc>, telemetry: TncTelemetry) {
        let stats = self.ports.entry(port).or_default();
        stats.last_seen = Some(at);
        stats.telemetry = Some(telemetry);
    }

    /// Statistics for one port, if it has been seen
    pub fn stats(&self, port: u32) -> Option<&PortStats> {
        self.ports.get(&port)
    }

    /// All known ports in ascending order
    pub fn iter(&self) -> impl Iterator<Item = (u32, &PortStats)> {
        self.ports.iter().map(|(port, stats)| (*port, stats))
    }

    /// Number of known ports
    pub fn len(&self) -> usize {
        self.ports.len()
    }

    /// True before any port has been observed
    pub fn is_empty(&self) -> bool {
        self.ports.is_empty()
    }
}
