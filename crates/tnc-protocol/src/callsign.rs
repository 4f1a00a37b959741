//! AX.25 callsign parsing
//!
//! A trace callsign is a base station identifier with an optional numeric
//! SSID suffix after a hyphen (`N0CALL-2`). The split is deliberately
//! permissive: amateur callsigns have a known grammar, but monitor traces
//! also carry aliases and node names, so any token is accepted as-is.

use std::fmt;

/// A callsign split into base call and optional SSID
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Callsign {
    /// Base station identifier
    pub call: String,
    /// Secondary station identifier, absent when no hyphen was given
    pub ssid: Option<String>,
}

impl Callsign {
    /// Split a token on its first hyphen
    ///
    /// An empty token yields an empty call with no SSID.
    pub fn parse(token: &str) -> Self {
        match token.split_once('-') {
            Some((call, ssid)) => Self {
                call: call.to_string(),
                ssid: Some(ssid.to_string()),
            },
            None => Self {
                call: token.to_string(),
                ssid: None,
            },
        }
    }
}

impl fmt::Display for Callsign {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.ssid {
            Some(ssid) => write!(f, "{}-{}", self.call, ssid),
            None => write!(f, "{}", self.call),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Callsign;
    use proptest::prelude::*;

    #[test]
    fn test_parse_without_ssid() {
        let cs = Callsign::parse("N0CALL");
        assert_eq!(cs.call, "N0CALL");
        assert_eq!(cs.ssid, None);
    }

    #[test]
    fn test_parse_with_ssid() {
        let cs = Callsign::parse("N0CALL-1");
        assert_eq!(cs.call, "N0CALL");
        assert_eq!(cs.ssid.as_deref(), Some("1"));
    }

    #[test]
    fn test_parse_empty() {
        let cs = Callsign::parse("");
        assert_eq!(cs.call, "");
        assert_eq!(cs.ssid, None);
    }

    #[test]
    fn test_first_hyphen_wins() {
        // Everything after the first hyphen belongs to the SSID field, so
        // reconstruction stays lossless for odd tokens.
        let cs = Callsign::parse("NODE-ALIAS-7");
        assert_eq!(cs.call, "NODE");
        assert_eq!(cs.ssid.as_deref(), Some("ALIAS-7"));
        assert_eq!(cs.to_string(), "NODE-ALIAS-7");
    }

    proptest! {
        #[test]
        fn roundtrip_reconstruction(token in "[A-Z0-9]{1,6}(-[0-9]{1,2})?") {
            let cs = Callsign::parse(&token);
            prop_assert_eq!(cs.to_string(), token);
        }

        #[test]
        fn roundtrip_arbitrary_hyphenation(token in "[A-Z0-9-]{1,12}") {
            let cs = Callsign::parse(&token);
            prop_assert_eq!(cs.to_string(), token);
        }
    }
}
