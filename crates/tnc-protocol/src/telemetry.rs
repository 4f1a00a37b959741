//! TNC telemetry broadcast parsing
//!
//! NinoTNC-style firmware periodically transmits a UI frame whose payload
//! is a run of `=ID:VALUE` fields, IDs being two hex digits and values hex
//! numbers (two string-valued fields excepted). The broadcast reaches us
//! wrapped in a normal monitor line, e.g.
//!
//! ```text
//! 16:34:33R TNC>USB Port=1 <UI C>:=00:2.76=01:13FAAAAut=02:0010FB70=...
//! ```
//!
//! Unknown field IDs are skipped so newer firmware stays parseable; a
//! malformed ID fails the whole broadcast.

use crate::error::ParseError;

const TELEMETRY_MARKER: &str = " <UI C>:";

/// Decoded telemetry counters
///
/// Millisecond counters keep their raw value next to a pre-formatted
/// human-readable duration (`22h30m`, `8m56s`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct TncTelemetry {
    /// Firmware version string
    pub firmware_version: String,
    /// Factory configuration word
    pub kaup8r: String,
    /// Milliseconds since boot
    pub uptime_millis: u64,
    /// Uptime formatted to minute precision
    pub uptime: String,
    /// Hardware board identifier
    pub board_id: u64,
    /// DIP switch positions
    pub switch_positions: u64,
    /// Active configuration mode
    pub config_mode: u64,
    /// AX.25 packets received
    pub ax25_received_packets: u64,
    /// IL2P packets received and corrected
    pub il2p_correctable_packets: u64,
    /// IL2P packets received beyond correction
    pub il2p_uncorrectable_packets: u64,
    /// Packets transmitted
    pub transmit_packets: u64,
    /// Preamble length in words
    pub preamble_word_count: u64,
    /// Firmware main loop cycles
    pub main_loop_cycle_count: u64,
    /// Milliseconds PTT has been keyed
    pub ptt_on_time_millis: u64,
    /// PTT on-time formatted to second precision
    pub ptt_on_time: String,
    /// Milliseconds carrier detect has been active
    pub dcd_on_time_millis: u64,
    /// DCD on-time formatted to second precision
    pub dcd_on_time: String,
    /// Payload bytes received
    pub received_data_bytes: u64,
    /// Payload bytes transmitted
    pub transmit_data_bytes: u64,
    /// Bytes repaired by forward error correction
    pub fec_bytes_corrected: u64,
}

/// Parse a telemetry broadcast out of a monitor message
///
/// Returns the originating port (from the `Port=N` text before the UI
/// marker, defaulting to 1) and the decoded counters.
pub fn parse_telemetry(line: &str) -> Result<(u32, TncTelemetry), ParseError> {
    let (prefix, payload) = line
        .split_once(TELEMETRY_MARKER)
        .ok_or(ParseError::NotTelemetry)?;

    let mut port = 1u32;
    let port_parts: Vec<&str> = prefix.split('=').collect();
    if port_parts.len() == 2 {
        if let Ok(parsed) = port_parts[1].parse::<u32>() {
            port = parsed;
        }
    }

    let parts: Vec<&str> = payload.split('=').collect();
    if parts.len() < 2 {
        return Err(ParseError::EmptyTelemetry);
    }

    let mut data = TncTelemetry::default();
    for part in &parts[1..] {
        if part.len() < 3 {
            continue;
        }
        let id = part
            .get(..2)
            .and_then(|s| u8::from_str_radix(s, 16).ok())
            .ok_or_else(|| ParseError::InvalidFieldId(part.to_string()))?;

        // Value starts after the ID and colon.
        let value = part.get(3..).unwrap_or("");
        let numeric = || u64::from_str_radix(value, 16).unwrap_or(0);

        match id {
            0x00 => data.firmware_version = value.to_string(),
            0x01 => data.kaup8r = value.to_string(),
            0x02 => {
                data.uptime_millis = numeric();
                data.uptime = format_minutes(data.uptime_millis);
            }
            0x03 => data.board_id = numeric(),
            0x04 => data.switch_positions = numeric(),
            0x06 => data.config_mode = numeric(),
            0x07 => data.ax25_received_packets = numeric(),
            0x08 => data.il2p_correctable_packets = numeric(),
            0x09 => data.il2p_uncorrectable_packets = numeric(),
            0x0A => data.transmit_packets = numeric(),
            0x0B => data.preamble_word_count = numeric(),
            0x0C => data.main_loop_cycle_count = numeric(),
            0x0D => {
                data.ptt_on_time_millis = numeric();
                data.ptt_on_time = format_seconds(data.ptt_on_time_millis);
            }
            0x0E => {
                data.dcd_on_time_millis = numeric();
                data.dcd_on_time = format_seconds(data.dcd_on_time_millis);
            }
            0x0F => data.received_data_bytes = numeric(),
            0x10 => data.transmit_data_bytes = numeric(),
            0x11 => data.fec_bytes_corrected = numeric(),
            other => {
                // Newer firmware may add fields; keep parsing.
                tracing::debug!("unknown telemetry field id 0x{other:02X}");
            }
        }
    }

    Ok((port, data))
}

/// `22h30m` / `18m` style formatting, minute precision
fn format_minutes(millis: u64) -> String {
    let minutes = millis / 60_000;
    let (hours, minutes) = (minutes / 60, minutes % 60);
    if hours > 0 {
        if minutes > 0 {
            format!("{hours}h{minutes}m")
        } else {
            format!("{hours}h")
        }
    } else {
        format!("{minutes}m")
    }
}

/// `8m56s` / `1s` / `0s` style formatting, second precision
fn format_seconds(millis: u64) -> String {
    let seconds = millis / 1_000;
    let hours = seconds / 3_600;
    let minutes = (seconds % 3_600) / 60;
    let seconds = seconds % 60;

    let mut out = String::new();
    if hours > 0 {
        out.push_str(&format!("{hours}h"));
    }
    if minutes > 0 || (hours > 0 && seconds > 0) {
        out.push_str(&format!("{minutes}m"));
    }
    if seconds > 0 || out.is_empty() {
        out.push_str(&format!("{seconds}s"));
    }
    out
}
