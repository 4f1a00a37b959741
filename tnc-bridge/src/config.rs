//! CLI arguments and node.ini discovery

use std::net::SocketAddr;

use clap::Parser;

/// BPQ node monitor bridge
#[derive(Parser, Debug)]
#[command(name = "tnc-bridge", version)]
pub struct Args {
    /// Callsign to use as the password for the telnet connection to the node
    #[arg(long)]
    pub call: Option<String>,

    /// Hostname of the node to connect to
    #[arg(long, default_value = "localhost")]
    pub host: String,

    /// Number of ports to monitor
    #[arg(long, default_value_t = 12)]
    pub ports: usize,

    /// Number of lines to store in the replay buffer
    #[arg(long = "buffer-size", default_value_t = 5000)]
    pub buffer_size: usize,

    /// HTTP/WebSocket listen address
    #[arg(long, default_value = "0.0.0.0:8212")]
    pub listen: SocketAddr,

    /// Echo monitor chunks to stdout
    #[arg(long = "console-out")]
    pub console_out: bool,
}

impl Args {
    /// Resolve the node login callsign: the flag wins, then `~/node.ini`
    pub fn resolve_callsign(&self) -> Option<String> {
        self.call.clone().or_else(node_ini_callsign)
    }
}

/// Look up `local-op-callsign:<call>` in the operator's node.ini
fn node_ini_callsign() -> Option<String> {
    let path = dirs::home_dir()?.join("node.ini");
    let contents = std::fs::read_to_string(path).ok()?;
    callsign_from_ini(&contents)
}

fn callsign_from_ini(contents: &str) -> Option<String> {
    contents.lines().find_map(|line| {
        let (key, value) = line.split_once(':')?;
        (key == "local-op-callsign").then(|| value.to_string())
    })
}

#[cfg(test)]
mod tests {
    use super::callsign_from_ini;

    #[test]
    fn test_finds_callsign_line() {
        let ini = "node-alias:MIKE\nlocal-op-callsign:N0CALL\nidle-timeout:900\n";
        assert_eq!(callsign_from_ini(ini).as_deref(), Some("N0CALL"));
    }

    #[test]
    fn test_missing_key() {
        assert_eq!(callsign_from_ini("node-alias:MIKE\n"), None);
        assert_eq!(callsign_from_ini(""), None);
    }

    #[test]
    fn test_key_must_match_exactly() {
        assert_eq!(callsign_from_ini("xlocal-op-callsign:N0CALL\n"), None);
    }
}
