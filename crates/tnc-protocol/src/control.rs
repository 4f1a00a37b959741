//! AX.25 control-field classification
//!
//! The monitor trace renders the control field as a space-delimited token
//! string (`I C S2 R3 P`, `RR R F R6`, `UI pid=F0 Len=50`). The first
//! token names the frame category; the rest carry command/response flags,
//! the poll/final bit, sequence numbers and category-specific extras.

use std::fmt;

/// AX.25 frame category, selected by the leading control token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FrameCategory {
    /// Information (I)
    Information,
    /// Unnumbered Information (UI)
    UnnumberedInformation,
    /// Set Asynchronous Balanced Mode (SABM)
    Sabm,
    /// Set Asynchronous Balanced Mode Extended (SABME)
    Sabme,
    /// Disconnect (DISC)
    Disconnect,
    /// Disconnected Mode (DM)
    DisconnectedMode,
    /// Unnumbered Acknowledgment (UA)
    UnnumberedAck,
    /// Frame Reject (FRMR)
    FrameReject,
    /// Receive Ready (RR)
    ReceiveReady,
    /// Receive Not Ready (RNR)
    ReceiveNotReady,
    /// Reject (REJ)
    Reject,
    /// Selective Reject (SREJ)
    SelectiveReject,
    /// Exchange Identification (XID)
    ExchangeId,
    /// Test (TEST)
    Test,
    /// Unrecognized leading token, or no control field at all
    Unknown,
}

impl FrameCategory {
    fn from_token(token: &str) -> Self {
        match token {
            "I" => Self::Information,
            "UI" => Self::UnnumberedInformation,
            "SABM" => Self::Sabm,
            "SABME" => Self::Sabme,
            "DISC" => Self::Disconnect,
            "DM" => Self::DisconnectedMode,
            "UA" => Self::UnnumberedAck,
            "FRMR" => Self::FrameReject,
            "RR" => Self::ReceiveReady,
            "RNR" => Self::ReceiveNotReady,
            "REJ" => Self::Reject,
            "SREJ" => Self::SelectiveReject,
            "XID" => Self::ExchangeId,
            "TEST" => Self::Test,
            _ => Self::Unknown,
        }
    }

    /// Human-readable category name
    pub fn label(&self) -> &'static str {
        match self {
            Self::Information => "Information (I)",
            Self::UnnumberedInformation => "Unnumbered Information (UI)",
            Self::Sabm => "Set Asynchronous Balanced Mode (SABM)",
            Self::Sabme => "Set Asynchronous Balanced Mode Extended (SABME)",
            Self::Disconnect => "Disconnect (DISC)",
            Self::DisconnectedMode => "Disconnected Mode (DM)",
            Self::UnnumberedAck => "Unnumbered Acknowledgment (UA)",
            Self::FrameReject => "Frame Reject (FRMR)",
            Self::ReceiveReady => "Receive Ready (RR)",
            Self::ReceiveNotReady => "Receive Not Ready (RNR)",
            Self::Reject => "Reject (REJ)",
            Self::SelectiveReject => "Selective Reject (SREJ)",
            Self::ExchangeId => "Exchange Identification (XID)",
            Self::Test => "Test (TEST)",
            Self::Unknown => "Unknown",
        }
    }

    fn explanation(&self) -> &'static str {
        match self {
            Self::Information => "Carries Layer 3 data, sequenced and acknowledged.",
            Self::UnnumberedInformation => {
                "Carries Layer 3 data, unsequenced and unacknowledged (e.g., APRS, broadcasts)."
            }
            Self::Sabm => "Command to initiate a data link connection (standard mode).",
            Self::Sabme => {
                "Command to initiate a data link connection (extended mode, for modulo 128 sequence numbers)."
            }
            Self::Disconnect => "Command to terminate a data link connection.",
            Self::DisconnectedMode => "Response indicating the station is logically disconnected.",
            Self::UnnumberedAck => {
                "Response acknowledging receipt and acceptance of SABM, SABME, or DISC commands."
            }
            Self::FrameReject => {
                "Response reporting receipt of an invalid or unimplementable frame."
            }
            Self::ReceiveReady => {
                "Supervisory frame indicating readiness to receive I-frames; acknowledges I-frames up to N(R)-1."
            }
            Self::ReceiveNotReady => {
                "Supervisory frame indicating a temporary inability to receive I-frames; acknowledges I-frames up to N(R)-1."
            }
            Self::Reject => {
                "Supervisory frame requesting retransmission of I-frames starting with N(R)."
            }
            Self::SelectiveReject => {
                "Supervisory frame requesting retransmission of the single I-frame N(R)."
            }
            Self::ExchangeId => {
                "Exchange of station identification and negotiation of operational parameters."
            }
            Self::Test => "Test frame; the addressed station echoes the payload back.",
            Self::Unknown => "",
        }
    }

    /// Supervisory categories whose abbreviation ends in `R` and would
    /// otherwise collide with the response-flag token
    pub fn is_supervisory(&self) -> bool {
        matches!(
            self,
            Self::ReceiveReady | Self::ReceiveNotReady | Self::Reject | Self::SelectiveReject
        )
    }

    /// Categories that carry an N(R) receive sequence number
    fn carries_nr(&self) -> bool {
        matches!(self, Self::Information) || self.is_supervisory()
    }
}

impl fmt::Display for FrameCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Poll or final bit, mutually exclusive in the trace format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PollFinal {
    /// Poll bit set (solicits an immediate response)
    Poll,
    /// Final bit set (signals the solicited response)
    Final,
}

impl fmt::Display for PollFinal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Poll => "Poll",
            Self::Final => "Final",
        })
    }
}

/// Structured interpretation of a control-field token string
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ControlClassification {
    /// Frame category selected by the leading token
    pub category: FrameCategory,
    /// Human-readable explanation of the category (for `Unknown`, the raw
    /// control content)
    pub explanation: String,
    /// `C` flag present after the leading token
    pub is_command: bool,
    /// `R` flag present after the leading token
    pub is_response: bool,
    /// Poll/final bit; `Final` wins when both appear
    pub poll_final: Option<PollFinal>,
    /// N(S) send sequence number from an `S<digits>` token
    pub ns: Option<String>,
    /// N(R) receive sequence number from an `R<digits>` token, only for
    /// categories that carry one
    pub nr: Option<String>,
    /// Joined human-readable summary of the flags above
    pub details: String,
    /// Explicit PID hex from a UI `pid=XX` annotation
    pub ui_pid: Option<String>,
    /// Payload length from a UI `Len=N` annotation
    pub ui_len: Option<String>,
    /// FRMR diagnostic bytes (up to three 1-2 digit hex tokens)
    pub frmr_data: Option<Vec<String>>,
}

impl ControlClassification {
    fn absent() -> Self {
        Self {
            category: FrameCategory::Unknown,
            explanation: "No AX.25 control field present. Assumed to be plain text or similar."
                .to_string(),
            is_command: false,
            is_response: false,
            poll_final: None,
            ns: None,
            nr: None,
            details: String::new(),
            ui_pid: None,
            ui_len: None,
            frmr_data: None,
        }
    }
}

/// Classify a control-field content string
///
/// `None` means the trace line carried no control field; that is not an
/// error and classifies as `Unknown` with a text-frame explanation.
pub fn classify_control(content: Option<&str>) -> ControlClassification {
    let Some(content) = content else {
        return ControlClassification::absent();
    };

    let tokens: Vec<&str> = content.split_whitespace().collect();
    let Some(&main_token) = tokens.first() else {
        return ControlClassification::absent();
    };

    let category = FrameCategory::from_token(main_token);
    let mut explanation = if category == FrameCategory::Unknown {
        format!("Control field: {content}")
    } else {
        category.explanation().to_string()
    };

    // The leading supervisory abbreviations end in R; only tokens after
    // the first count as command/response flags.
    let flags = &tokens[1..];
    let is_command = flags.contains(&"C");
    let is_response = flags.contains(&"R");

    let mut poll_final = None;
    if tokens.contains(&"P") {
        poll_final = Some(PollFinal::Poll);
    }
    if tokens.contains(&"F") {
        poll_final = Some(PollFinal::Final);
    }

    let mut details: Vec<String> = Vec::new();
    if is_command && !is_response && !category.is_supervisory() {
        details.push("Command indication".to_string());
    }
    if is_response && !is_command && !category.is_supervisory() {
        details.push("Response indication".to_string());
    }
    if let Some(pf) = poll_final {
        details.push(format!("{pf} bit set"));
    }

    let mut ns = None;
    for token in &tokens {
        if let Some(digits) = strip_numeric_suffix(token, 'S') {
            ns = Some(digits.to_string());
            details.push(format!("N(S)={digits}"));
        }
    }

    let mut nr = None;
    if category.carries_nr() {
        if let Some(digits) = tokens.iter().find_map(|t| strip_numeric_suffix(t, 'R')) {
            nr = Some(digits.to_string());
            details.push(format!("N(R)={digits}"));
        }
    }

    let mut ui_pid = None;
    let mut ui_len = None;
    if category == FrameCategory::UnnumberedInformation {
        for token in flags {
            if let Some(value) = token.strip_prefix("pid=") {
                if !value.is_empty() && value.chars().all(|c| c.is_ascii_hexdigit()) {
                    ui_pid = Some(value.to_string());
                }
            } else if let Some(value) = token.strip_prefix("Len=") {
                if !value.is_empty() && value.chars().all(|c| c.is_ascii_digit()) {
                    ui_len = Some(value.to_string());
                }
            }
        }
        if let Some(pid) = &ui_pid {
            explanation.push_str(&format!(" PID=0x{pid}."));
        }
        if let Some(len) = &ui_len {
            explanation.push_str(&format!(" Length={len} bytes."));
        }
    }

    let frmr_data = (category == FrameCategory::FrameReject).then(|| {
        let mut bytes = Vec::new();
        for token in flags
            .iter()
            .skip_while(|t| matches!(**t, "C" | "R" | "P" | "F"))
        {
            if bytes.len() == 3 || !is_frmr_byte(token) {
                break;
            }
            bytes.push(token.to_string());
        }
        bytes
    });

    ControlClassification {
        category,
        explanation,
        is_command,
        is_response,
        poll_final,
        ns,
        nr,
        details: details.join(", "),
        ui_pid,
        ui_len,
        frmr_data,
    }
}

/// `S2` -> `2` for the given prefix letter, digits only
fn strip_numeric_suffix<'a>(token: &'a str, prefix: char) -> Option<&'a str> {
    let rest = token.strip_prefix(prefix)?;
    (!rest.is_empty() && rest.chars().all(|c| c.is_ascii_digit())).then_some(rest)
}

fn is_frmr_byte(token: &str) -> bool {
    (1..=2).contains(&token.len()) && token.chars().all(|c| c.is_ascii_hexdigit())
}
