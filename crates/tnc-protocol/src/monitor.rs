//! Monitor stream line parsing
//!
//! Every trace the node emits is framed as
//!
//! ```text
//! HH:MM:SSD SRC>DST Port=N MESSAGE
//! ```
//!
//! where `D` is `R` (received) or `T` (transmitted), the route is a pair
//! of uppercase callsigns around a single `>`, and the message is the rest
//! of the chunk (possibly spanning lines). Chunks that do not fit are
//! forwarded raw.

use crate::timestamp::is_hms;

/// Direction flag of a monitor line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LinkDirection {
    /// Frame received over the air (`R`)
    Receive,
    /// Frame transmitted by the node (`T`)
    Transmit,
}

impl LinkDirection {
    fn from_flag(flag: char) -> Option<Self> {
        match flag {
            'R' => Some(Self::Receive),
            'T' => Some(Self::Transmit),
            _ => None,
        }
    }

    /// Wire flag character
    pub fn flag(&self) -> char {
        match self {
            Self::Receive => 'R',
            Self::Transmit => 'T',
        }
    }
}

/// Structured monitor line
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MonitorLine {
    /// Wall-clock `HH:MM:SS` stamp as printed
    pub timestamp: String,
    /// Receive/transmit flag
    pub direction: LinkDirection,
    /// `SRC>DST` route token
    pub route: String,
    /// Port number as printed
    pub port: String,
    /// Message body, everything after the port field
    pub message: String,
}

/// Parse one monitor chunk into its framing fields
pub fn parse_monitor_line(chunk: &str) -> Option<MonitorLine> {
    // Timestamp and direction flag: "16:34:33R".
    let stamp = chunk.get(..8)?;
    if !is_hms(stamp) {
        return None;
    }
    let mut rest = chunk[8..].chars();
    let direction = LinkDirection::from_flag(rest.next()?)?;
    let rest = rest.as_str();
    let rest = rest.strip_prefix(' ')?;

    // Route: "SRC>DST", uppercase callsign charset only.
    let route_end = rest
        .find(|c: char| !(c.is_ascii_uppercase() || c.is_ascii_digit() || c == '-' || c == '>'))
        .unwrap_or(rest.len());
    let route = &rest[..route_end];
    let (src, dst) = route.split_once('>')?;
    if src.is_empty() || dst.is_empty() || dst.contains('>') {
        return None;
    }

    // Port field: " Port=N " with a single space on each side.
    let rest = rest[route_end..].strip_prefix(' ')?;
    let rest = rest.strip_prefix("Port=")?;
    let digits_end = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    if digits_end == 0 {
        return None;
    }
    let port = &rest[..digits_end];
    let message = rest[digits_end..].strip_prefix(' ')?;

    Some(MonitorLine {
        timestamp: stamp.to_string(),
        direction,
        route: route.to_string(),
        port: port.to_string(),
        message: message.to_string(),
    })
}
