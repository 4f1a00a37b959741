//! JSON wire envelopes
//!
//! Everything the bridge broadcasts is one of two messages: a `log` event
//! for a monitor line (structured when the framing parsed, raw otherwise)
//! or a `tnc_data` event carrying a telemetry snapshot. Field names are
//! camelCase on the wire; absent fields are omitted entirely.

use serde::Serialize;
use tnc_monitor::route_color;
use tnc_protocol::{MonitorLine, TncTelemetry};

/// A broadcast message
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Envelope {
    /// Monitor line, structured or raw
    Log(LogEvent),
    /// Telemetry snapshot for one port
    TncData(TelemetryEvent),
}

/// Wire form of a monitor line
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LogEvent {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    /// Direction flag, `R` or `T`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub route: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<String>,
    /// Message body, HTML-escaped for direct rendering
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub route_color: Option<String>,
    /// The whole chunk, set only when the framing did not parse
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw: Option<String>,
}

/// Wire form of a telemetry broadcast
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TelemetryEvent {
    pub port_num: u32,
    pub data: TncTelemetry,
}

impl Envelope {
    /// Structured log event for a parsed monitor line
    pub fn parsed_log(line: &MonitorLine) -> Self {
        Self::Log(LogEvent {
            timestamp: Some(line.timestamp.clone()),
            prefix: Some(line.direction.flag().to_string()),
            route: Some(line.route.clone()),
            port: Some(line.port.clone()),
            message: Some(escape_html(&line.message)),
            route_color: Some(route_color(&line.route)),
            raw: None,
        })
    }

    /// Raw log event for a chunk that did not match the framing
    pub fn raw_log(chunk: &str) -> Self {
        Self::Log(LogEvent {
            raw: Some(chunk.to_string()),
            ..LogEvent::default()
        })
    }

    /// Telemetry event for one port
    pub fn telemetry(port: u32, data: TncTelemetry) -> Self {
        Self::TncData(TelemetryEvent {
            port_num: port,
            data,
        })
    }
}

/// Escape the characters that matter inside HTML text and attributes
fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&#34;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
