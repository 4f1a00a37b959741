//! AX.25 trace-line decoding
//!
//! Decodes one human-readable monitor trace of the shape
//!
//! ```text
//! SRC[-SSID] [VIA DIGI[-SSID]] > DST[-SSID][,DIGI...] [<CONTROL>] [:] [PAYLOAD]
//! ```
//!
//! into a [`DecodedFrame`]. The grammar is matched with an explicit
//! tokenizer (split on `>`, then `<...>`, then `:`) rather than one large
//! pattern; a line that does not fit yields `None` and the caller falls
//! back to raw display. The payload may span multiple lines.

use crate::callsign::Callsign;
use crate::control::{classify_control, ControlClassification, FrameCategory};

/// Fully decoded trace line
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DecodedFrame {
    /// Source station (first callsign before any VIA clause)
    pub source: Callsign,
    /// Destination station (first callsign of the destination list)
    pub destination: Callsign,
    /// Raw control-field content, absent when the line carried none
    pub control_raw: Option<String>,
    /// Frame category from the control classification
    pub frame_type: FrameCategory,
    /// Human-readable explanation of the frame category
    pub frame_type_explanation: String,
    /// Full control-field classification
    pub control: ControlClassification,
    /// Layer 3 protocol identifier, when one applies
    pub pid: Option<String>,
    /// Human-readable explanation of the PID
    pub pid_explanation: Option<String>,
    /// Inferred layer 3 protocol name
    pub protocol: Option<String>,
    /// Payload text, trimmed
    pub info: String,
    /// Untouched source side of the line (keeps the VIA digipeater path)
    pub source_raw: String,
    /// Untouched destination side of the line (keeps the digipeater list)
    pub dest_raw: String,
}

/// Decode a trace line into a structured frame
///
/// Returns `None` when the line does not match the trace grammar; this is
/// the expected outcome for non-AX.25 output and not a fault.
pub fn decode(line: &str) -> Option<DecodedFrame> {
    let (head, rest) = line.split_once('>')?;
    let source_raw = parse_source(head)?;

    let rest = rest.trim_start();
    let (dest_raw, mut tail) = parse_destination(rest)?;

    let mut control_raw: Option<String> = None;
    if let Some(after_open) = tail.strip_prefix('<') {
        // Control content must not itself contain `>`; an unterminated or
        // empty bracket belongs to the payload.
        if let Some((content, after)) = after_open.split_once('>') {
            if !content.is_empty() {
                let trimmed = content.trim();
                if !trimmed.is_empty() {
                    control_raw = Some(trimmed.to_string());
                }
                tail = after.trim_start();
            }
        }
    }

    let tail = tail.strip_prefix(':').unwrap_or(tail);
    let info = tail.trim().to_string();

    let source = Callsign::parse(first_source_callsign(&source_raw));
    let destination = Callsign::parse(dest_raw.split(',').next().unwrap_or(""));

    let control = classify_control(control_raw.as_deref());
    let (pid, pid_explanation, protocol) = infer_protocol(&control, control_raw.is_some(), &info);

    Some(DecodedFrame {
        source,
        destination,
        frame_type: control.category,
        frame_type_explanation: control.explanation.clone(),
        control,
        control_raw,
        pid,
        pid_explanation,
        protocol,
        info,
        source_raw,
        dest_raw: dest_raw.to_string(),
    })
}

fn is_call_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-'
}

/// Validate the source side: one callsign, optionally `VIA` and a single
/// digipeater. Returns the trimmed raw text.
fn parse_source(head: &str) -> Option<String> {
    // The grammar is anchored; a line starting with whitespace is not a
    // trace.
    if head.starts_with(char::is_whitespace) {
        return None;
    }
    let raw = head.trim_end();
    let tokens: Vec<&str> = raw.split_whitespace().collect();
    let valid = match tokens.as_slice() {
        [call] => is_callsign_token(call),
        [call, via, digi] => {
            via.eq_ignore_ascii_case("VIA") && is_callsign_token(call) && is_callsign_token(digi)
        }
        _ => false,
    };
    valid.then(|| raw.to_string())
}

fn is_callsign_token(token: &str) -> bool {
    !token.is_empty() && token.chars().all(is_call_char)
}

/// Strip a leading `VIA` clause before structural decoding
fn first_source_callsign(raw: &str) -> &str {
    raw.split_whitespace().next().unwrap_or("")
}

/// Consume the destination list: a callsign followed by the longest run of
/// `,callsign` continuations. Anything after it belongs to the payload.
fn parse_destination(rest: &str) -> Option<(&str, &str)> {
    let first_end = rest
        .find(|c: char| !is_call_char(c))
        .unwrap_or(rest.len());
    if first_end == 0 {
        return None;
    }

    let mut end = first_end;
    loop {
        let tail = &rest[end..];
        let Some(after_comma) = tail.strip_prefix(',') else {
            break;
        };
        let seg_len = after_comma
            .find(|c: char| !is_call_char(c))
            .unwrap_or(after_comma.len());
        if seg_len == 0 {
            break;
        }
        end += 1 + seg_len;
    }

    Some((&rest[..end], rest[end..].trim_start()))
}

/// Case-insensitive `NET.ROM` search (any single character between the
/// halves, matching traces that render the slash differently)
fn contains_net_rom(info: &str) -> bool {
    let upper = info.to_ascii_uppercase();
    let bytes = upper.as_bytes();
    bytes
        .windows(7)
        .any(|w| &w[..3] == b"NET" && &w[4..] == b"ROM")
}

/// Case-insensitive `KW ` payload prefix check
fn starts_with_keyword(info: &str, keyword: &str) -> bool {
    let Some(rest) = info.get(..keyword.len()) else {
        return false;
    };
    rest.eq_ignore_ascii_case(keyword)
        && info[keyword.len()..]
            .chars()
            .next()
            .is_some_and(|c| c.is_whitespace())
}

fn keyword_protocol(info: &str) -> Option<&'static str> {
    if contains_net_rom(info) {
        Some("NET/ROM")
    } else if starts_with_keyword(info, "ARP") {
        Some("ARP")
    } else if starts_with_keyword(info, "IP") {
        Some("IP")
    } else {
        None
    }
}

/// Decode an explicit UI PID byte against the AX.25 assignments
fn lookup_pid(hex: &str) -> (String, &'static str) {
    match hex.to_ascii_uppercase().as_str() {
        "F0" => (
            "Text/APRS".to_string(),
            "No Layer 3 protocol (0xF0); plain text or APRS data.",
        ),
        "CF" => ("NET/ROM".to_string(), "NET/ROM network layer (PID 0xCF)."),
        "CC" => (
            "IP".to_string(),
            "IP datagram (PID 0xCC, or 0x08 when fragmented).",
        ),
        "CD" => (
            "ARP".to_string(),
            "Address Resolution Protocol (PID 0xCD).",
        ),
        "08" => (
            "Fragmented IP".to_string(),
            "Fragment of an IP datagram (PID 0x08).",
        ),
        other => (
            format!("Layer 3 Protocol ID: 0x{other}"),
            "Unrecognized Layer 3 protocol identifier.",
        ),
    }
}

/// Explain a keyword-guessed protocol in terms of the PID it normally rides
fn keyword_explanation(protocol: &str) -> &'static str {
    match protocol {
        "NET/ROM" => "Layer 3 data; NET/ROM is normally carried with PID 0xCF.",
        "IP" => "Layer 3 data; IP uses PID 0xCC / 0x08 (fragmented).",
        "ARP" => "Layer 3 data; ARP uses PID 0xCD.",
        "Text" => "Assumed plain text; AX.25 uses PID 0xF0 for Text/No L3.",
        "Unknown L3" => "Sequenced data with no visible payload; Layer 3 protocol not identified.",
        _ => "Layer 3 protocol guessed from the payload text.",
    }
}

/// Layered PID/protocol inference
///
/// The payload keyword pass is advisory; an explicit UI `pid=` annotation
/// overrides it. Only I frames, UI frames and control-less text lines get
/// a protocol at all; supervisory and unnumbered control frames carry no
/// layer 3 payload by definition.
fn infer_protocol(
    control: &ControlClassification,
    has_control: bool,
    info: &str,
) -> (Option<String>, Option<String>, Option<String>) {
    let guessed = (!info.is_empty())
        .then(|| keyword_protocol(info))
        .flatten();

    if let Some(hex) = &control.ui_pid {
        let (protocol, explanation) = lookup_pid(hex);
        return (
            Some(format!("0x{}", hex.to_ascii_uppercase())),
            Some(explanation.to_string()),
            Some(protocol),
        );
    }

    match control.category {
        FrameCategory::Information => {
            let protocol = guessed
                .map(str::to_string)
                .unwrap_or_else(|| {
                    if info.is_empty() { "Unknown L3" } else { "Text" }.to_string()
                });
            (
                Some(format!("L3 ({protocol})")),
                Some(keyword_explanation(&protocol).to_string()),
                Some(protocol),
            )
        }
        FrameCategory::UnnumberedInformation => match guessed {
            Some(protocol) => (
                Some(format!("UI ({protocol})")),
                Some(keyword_explanation(protocol).to_string()),
                Some(protocol.to_string()),
            ),
            None => (
                Some("0xF0 (Default for UI)".to_string()),
                Some("Typically no Layer 3 protocol; plain text or APRS data.".to_string()),
                Some("Text/APRS".to_string()),
            ),
        },
        _ if !has_control && !info.is_empty() => (
            Some("Text (Assumed)".to_string()),
            Some("No control field present; payload treated as plain text.".to_string()),
            Some("Text".to_string()),
        ),
        _ => (None, None, None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::control::PollFinal;

    #[test]
    fn test_ui_frame_with_aprs_data() {
        let frame = decode("N0CALL-1 > APRS <UI pid=F0 Len=50> :!4903.50N/07201.75W-Hello").unwrap();
        assert_eq!(frame.source.call, "N0CALL");
        assert_eq!(frame.source.ssid.as_deref(), Some("1"));
        assert_eq!(frame.destination.call, "APRS");
        assert_eq!(frame.destination.ssid, None);
        assert_eq!(frame.frame_type, FrameCategory::UnnumberedInformation);
        assert_eq!(frame.pid.as_deref(), Some("0xF0"));
        assert_eq!(frame.protocol.as_deref(), Some("Text/APRS"));
        assert_eq!(frame.info, "!4903.50N/07201.75W-Hello");
    }

    #[test]
    fn test_i_frame_with_netrom_data() {
        let frame = decode("N0CALL-2 > N0CALL-3 <I C S0 R1> :NET/ROM data here").unwrap();
        assert_eq!(frame.source.ssid.as_deref(), Some("2"));
        assert_eq!(frame.destination.ssid.as_deref(), Some("3"));
        assert_eq!(frame.frame_type, FrameCategory::Information);
        assert_eq!(frame.pid.as_deref(), Some("L3 (NET/ROM)"));
        assert_eq!(frame.protocol.as_deref(), Some("NET/ROM"));
        assert_eq!(frame.control.ns.as_deref(), Some("0"));
        assert_eq!(frame.control.nr.as_deref(), Some("1"));
        assert_eq!(frame.info, "NET/ROM data here");
        assert!(frame.pid_explanation.unwrap().contains("0xCF"));
    }

    #[test]
    fn test_supervisory_rr_frame() {
        let frame = decode("N0CALL-4 > N0CALL-5 <RR R F R6>").unwrap();
        assert_eq!(frame.frame_type, FrameCategory::ReceiveReady);
        assert!(frame.control.is_response);
        assert_eq!(frame.control.poll_final, Some(PollFinal::Final));
        assert_eq!(frame.control.nr.as_deref(), Some("6"));
        assert_eq!(frame.info, "");
        assert_eq!(frame.pid, None);
        assert_eq!(frame.protocol, None);
    }

    #[test]
    fn test_sabm_command() {
        let frame = decode("N0CALL-10 > N0CALL-11 <SABM C P>").unwrap();
        assert_eq!(frame.frame_type, FrameCategory::Sabm);
        assert!(frame.control.is_command);
        assert_eq!(frame.control.poll_final, Some(PollFinal::Poll));
        assert_eq!(frame.protocol, None);
    }

    #[test]
    fn test_ua_response() {
        let frame = decode("N0CALL-11 > N0CALL-10 <UA R F>").unwrap();
        assert_eq!(frame.frame_type, FrameCategory::UnnumberedAck);
        assert!(frame.control.is_response);
        assert_eq!(frame.control.poll_final, Some(PollFinal::Final));
    }

    #[test]
    fn test_ui_ip_keyword() {
        let frame = decode("N0CALL-1 > N0CALL-2 <UI R> :IP packet data").unwrap();
        assert_eq!(frame.frame_type, FrameCategory::UnnumberedInformation);
        assert_eq!(frame.protocol.as_deref(), Some("IP"));
        assert_eq!(frame.pid.as_deref(), Some("UI (IP)"));
        assert!(frame.pid_explanation.unwrap().contains("0xCC / 0x08"));
    }

    #[test]
    fn test_text_without_control_field() {
        let frame = decode("N0CALL-7 > N0CALL-8 :Just some text").unwrap();
        assert_eq!(frame.source.call, "N0CALL");
        assert_eq!(frame.destination.call, "N0CALL");
        assert_eq!(frame.frame_type, FrameCategory::Unknown);
        assert!(frame.frame_type_explanation.contains("No AX.25 control field"));
        assert_eq!(frame.protocol.as_deref(), Some("Text"));
        assert_eq!(frame.pid.as_deref(), Some("Text (Assumed)"));
        assert_eq!(frame.info, "Just some text");
    }

    #[test]
    fn test_i_frame_with_generic_text() {
        let frame = decode("N0CALL-1 > N0CALL-2 <I C S4 R5> :here is some text").unwrap();
        assert_eq!(frame.frame_type, FrameCategory::Information);
        assert_eq!(frame.protocol.as_deref(), Some("Text"));
        assert_eq!(frame.pid.as_deref(), Some("L3 (Text)"));
        assert!(frame
            .pid_explanation
            .unwrap()
            .contains("0xF0 for Text/No L3"));
    }

    #[test]
    fn test_i_frame_without_payload() {
        let frame = decode("N0CALL-1 > N0CALL-2 <I C S4 R5>").unwrap();
        assert_eq!(frame.protocol.as_deref(), Some("Unknown L3"));
        assert_eq!(frame.pid.as_deref(), Some("L3 (Unknown L3)"));
    }

    #[test]
    fn test_rejects_non_trace_input() {
        assert_eq!(decode("this is not an ax25 string"), None);
        assert_eq!(decode(""), None);
        assert_eq!(decode("   leading space > DST"), None);
        assert_eq!(decode("TWO WORDS > DST"), None);
        assert_eq!(decode("> DST no source"), None);
    }

    #[test]
    fn test_via_digipeater_path_preserved() {
        let frame = decode("N0CALL-1 VIA DIGI1-2 > N0CALL-2 <UI R> :test").unwrap();
        assert_eq!(frame.source_raw, "N0CALL-1 VIA DIGI1-2");
        assert_eq!(frame.source.call, "N0CALL");
        assert_eq!(frame.source.ssid.as_deref(), Some("1"));
    }

    #[test]
    fn test_destination_digipeater_list_preserved() {
        let frame = decode("N0CALL-1 > N0CALL-2,DIGI1,DIGI2-3 <UI C> :hi").unwrap();
        assert_eq!(frame.dest_raw, "N0CALL-2,DIGI1,DIGI2-3");
        assert_eq!(frame.destination.call, "N0CALL");
        assert_eq!(frame.destination.ssid.as_deref(), Some("2"));
    }

    #[test]
    fn test_multi_line_netrom_connect_request() {
        let info = "NET/ROM\n  WA2M-9 to WF8E-9 ttl 7 cct=0902 <CON REQ> w=3 WA2M-9 at WA2M-9 t/o 120";
        let line = format!("WA2M-1 > WF8E-1 <I C P S0 R0> :{info}");
        let frame = decode(&line).unwrap();
        assert_eq!(frame.frame_type, FrameCategory::Information);
        assert_eq!(frame.protocol.as_deref(), Some("NET/ROM"));
        assert_eq!(frame.pid.as_deref(), Some("L3 (NET/ROM)"));
        assert_eq!(frame.control.ns.as_deref(), Some("0"));
        assert_eq!(frame.control.nr.as_deref(), Some("0"));
        assert_eq!(frame.info, info);
    }

    #[test]
    fn test_multi_line_ui_text_payload() {
        let info = "Terrestrial Amateur Radio Packet Network node MIKE  op is wa2m";
        let line = format!("MIKE > ID <UI C>:\n{info}");
        let frame = decode(&line).unwrap();
        assert_eq!(frame.frame_type, FrameCategory::UnnumberedInformation);
        assert_eq!(frame.protocol.as_deref(), Some("Text/APRS"));
        assert_eq!(frame.pid.as_deref(), Some("0xF0 (Default for UI)"));
        assert!(frame.control.is_command);
        assert_eq!(frame.info, info);
    }

    #[test]
    fn test_multi_line_netrom_info_frame() {
        let info = "NET/ROM\n  WF8E-2 to WA2M-9 ttl 7 cct=09D1  <INFO S0 R0>:\n[BPQChatServer-6.0.21.40]";
        let line = format!("WF8E-2 > WA2M-9 <I C P S0 R0> :{info}");
        let frame = decode(&line).unwrap();
        assert_eq!(frame.source.call, "WF8E");
        assert_eq!(frame.source.ssid.as_deref(), Some("2"));
        assert_eq!(frame.destination.call, "WA2M");
        assert_eq!(frame.destination.ssid.as_deref(), Some("9"));
        assert_eq!(frame.protocol.as_deref(), Some("NET/ROM"));
        assert_eq!(frame.info, info);
    }

    #[test]
    fn test_unterminated_bracket_is_payload() {
        let frame = decode("N0CALL > APRS <UI").unwrap();
        assert_eq!(frame.control_raw, None);
        assert_eq!(frame.info, "<UI");
    }

    #[test]
    fn test_unknown_explicit_pid() {
        let frame = decode("N0CALL > APRS <UI pid=22> :data").unwrap();
        assert_eq!(frame.pid.as_deref(), Some("0x22"));
        assert_eq!(
            frame.protocol.as_deref(),
            Some("Layer 3 Protocol ID: 0x22")
        );
    }

    #[test]
    fn test_explicit_pid_overrides_keyword_guess() {
        let frame = decode("N0CALL > APRS <UI pid=CF> :NET/ROM routing broadcast").unwrap();
        assert_eq!(frame.pid.as_deref(), Some("0xCF"));
        assert_eq!(frame.protocol.as_deref(), Some("NET/ROM"));
    }

    #[test]
    fn test_arp_keyword() {
        let frame = decode("N0CALL > N1CALL <UI C> :ARP who-has 44.0.0.1").unwrap();
        assert_eq!(frame.protocol.as_deref(), Some("ARP"));
        assert_eq!(frame.pid.as_deref(), Some("UI (ARP)"));
    }
}
