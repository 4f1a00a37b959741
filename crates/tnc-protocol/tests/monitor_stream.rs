//! Integration tests for the monitor stream pipeline
//!
//! These tests verify the path a dashboard follows over realistic node
//! output: a raw monitor chunk is framed into a monitor line, the trace
//! is decoded from `route` plus `message`, the timestamp is normalized,
//! and telemetry broadcasts are picked apart.

use chrono::{TimeZone, Utc};
use tnc_protocol::{
    decode, normalize_timestamp_at, parse_monitor_line, parse_telemetry, DecodedFrame,
    FrameCategory, LinkDirection, PollFinal,
};

mod helpers {
    use super::*;

    /// Decode a log event the way the dashboard does: the message alone
    /// when it is a self-contained `SRC > DST` trace, otherwise the route
    /// glued back in front of it.
    pub fn decode_log_event(route: &str, message: &str) -> Option<DecodedFrame> {
        decode(message).or_else(|| decode(&format!("{route} {message}")))
    }
}

#[test]
fn test_received_ui_frame_end_to_end() {
    let chunk = "16:34:33R N0CALL-1>APRS Port=1 <UI pid=F0 Len=50>:!4903.50N/07201.75W-Hello";

    let line = parse_monitor_line(chunk).expect("monitor framing should parse");
    assert_eq!(line.direction, LinkDirection::Receive);
    assert_eq!(line.route, "N0CALL-1>APRS");
    assert_eq!(line.port, "1");

    let frame = helpers::decode_log_event(&line.route, &line.message)
        .expect("trace should decode");
    assert_eq!(frame.frame_type, FrameCategory::UnnumberedInformation);
    assert_eq!(frame.source.call, "N0CALL");
    assert_eq!(frame.source.ssid.as_deref(), Some("1"));
    assert_eq!(frame.destination.call, "APRS");
    assert_eq!(frame.pid.as_deref(), Some("0xF0"));
    assert_eq!(frame.protocol.as_deref(), Some("Text/APRS"));
    assert_eq!(frame.control.ui_len.as_deref(), Some("50"));
    assert_eq!(frame.info, "!4903.50N/07201.75W-Hello");
}

#[test]
fn test_transmitted_i_frame_with_netrom_payload() {
    let chunk = "09:15:00T WF8E-2>WA2M-9 Port=2 <I C P S0 R0> :NET/ROM\n  WF8E-2 to WA2M-9 ttl 7 cct=09D1";

    let line = parse_monitor_line(chunk).unwrap();
    assert_eq!(line.direction, LinkDirection::Transmit);

    let frame = helpers::decode_log_event(&line.route, &line.message).unwrap();
    assert_eq!(frame.frame_type, FrameCategory::Information);
    assert_eq!(frame.control.ns.as_deref(), Some("0"));
    assert_eq!(frame.control.nr.as_deref(), Some("0"));
    assert_eq!(frame.control.poll_final, Some(PollFinal::Poll));
    assert_eq!(frame.protocol.as_deref(), Some("NET/ROM"));
    assert_eq!(frame.pid.as_deref(), Some("L3 (NET/ROM)"));
}

#[test]
fn test_supervisory_frame_has_no_protocol() {
    let line = parse_monitor_line("10:00:00R N0CALL-4>N0CALL-5 Port=3 <RR R F R6>").unwrap();
    let frame = helpers::decode_log_event(&line.route, &line.message).unwrap();

    assert_eq!(frame.frame_type, FrameCategory::ReceiveReady);
    assert!(frame.control.is_response);
    assert_eq!(frame.control.poll_final, Some(PollFinal::Final));
    assert_eq!(frame.control.nr.as_deref(), Some("6"));
    assert_eq!(frame.pid, None);
    assert_eq!(frame.protocol, None);
}

#[test]
fn test_unparseable_message_stays_raw() {
    let line = parse_monitor_line("10:00:00R N0CALL>SWITCH Port=1 link reset").unwrap();
    // "link reset" alone is no trace, but route + message still decodes as
    // a control-less text frame.
    let frame = helpers::decode_log_event(&line.route, &line.message).unwrap();
    assert_eq!(frame.frame_type, FrameCategory::Unknown);
    assert_eq!(frame.protocol.as_deref(), Some("Text"));
    assert_eq!(frame.pid.as_deref(), Some("Text (Assumed)"));

    // A chunk without framing decodes to nothing at any stage.
    assert_eq!(parse_monitor_line("node restarting, stand by"), None);
    assert_eq!(decode("node restarting, stand by"), None);
}

#[test]
fn test_line_timestamp_normalization() {
    let now = Utc.with_ymd_and_hms(2025, 6, 16, 0, 0, 1).unwrap();
    let line = parse_monitor_line("23:59:59R N0CALL>APRS Port=1 <UI C>:late").unwrap();

    let at = normalize_timestamp_at(&line.timestamp, now).unwrap();
    assert_eq!(at, Utc.with_ymd_and_hms(2025, 6, 15, 23, 59, 59).unwrap());
}

#[test]
fn test_telemetry_broadcast_end_to_end() {
    let chunk = "16:34:33R TNC>USB Port=1 <UI C>:=00:2.76=01:13FAAAAut=02:0010FB70=03:00000001=04:00000002=06:00000001=07:00000000=08:00000011=09:00000000=0A:00000022=0B:00000012=0C:02157BDF=0D:0000064B=0E:00000000=0F:00000000=10:000002B6=11:00000000";

    // The broadcast is framed like any other monitor line...
    let line = parse_monitor_line(chunk).unwrap();
    assert_eq!(line.route, "TNC>USB");

    // ...and the full chunk parses as telemetry.
    let (port, data) = parse_telemetry(chunk).unwrap();
    assert_eq!(port, 1);
    assert_eq!(data.firmware_version, "2.76");
    assert_eq!(data.uptime, "18m");
    assert_eq!(data.ptt_on_time, "1s");

    // The same payload also decodes as a plain UI frame for display.
    let frame = helpers::decode_log_event(&line.route, &line.message).unwrap();
    assert_eq!(frame.frame_type, FrameCategory::UnnumberedInformation);
    assert!(frame.control.is_command);
}

#[test]
fn test_digipeated_route_preserves_raw_sides() {
    let line =
        parse_monitor_line("11:22:33R N0CALL-1>N0CALL-2 Port=1 <UI C> :via test").unwrap();
    let frame = helpers::decode_log_event(
        &line.route,
        "N0CALL-1 VIA DIGI1-2 > N0CALL-2,DIGI1 <UI C> :hops",
    )
    .unwrap();

    assert_eq!(frame.source_raw, "N0CALL-1 VIA DIGI1-2");
    assert_eq!(frame.dest_raw, "N0CALL-2,DIGI1");
    assert_eq!(frame.source.call, "N0CALL");
    assert_eq!(frame.destination.ssid.as_deref(), Some("2"));
}
