//! Node connection handling
//!
//! Drives the telnet-style monitor session against a BPQ node: connect
//! with exponential backoff, log in, enable monitoring for the configured
//! ports, then consume 0xFE-delimited monitor chunks forever. Any error
//! tears the session down and re-enters the backoff loop.

use std::io;
use std::time::Duration;

use chrono::Utc;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::tcp::OwnedReadHalf;
use tokio::net::TcpStream;
use tokio::time::sleep;
use tracing::{debug, info, warn};

use tnc_protocol::{normalize_timestamp_at, parse_monitor_line, parse_telemetry};

use crate::envelope::Envelope;
use crate::hub::Hub;

/// Telnet monitor port of the node
const NODE_PORT: u16 = 8011;

/// Initial backoff time between reconnection attempts
const INITIAL_BACKOFF: Duration = Duration::from_secs(1);

/// Maximum backoff time between reconnection attempts
const MAX_BACKOFF: Duration = Duration::from_secs(5 * 60);

/// Keepalive interval; the node drops idle connections without it
const KEEPALIVE_INTERVAL: Duration = Duration::from_secs(2 * 60);

/// Monitor chunk delimiter on the wire
const CHUNK_DELIMITER: u8 = 0xFE;

/// Connection settings for the node session
#[derive(Debug, Clone)]
pub struct NodeSettings {
    /// Node hostname
    pub host: String,
    /// Login callsign
    pub callsign: String,
    /// Number of ports to monitor
    pub ports: usize,
    /// Echo cleaned chunks to stdout
    pub console_out: bool,
}

/// Connect-and-monitor loop; never returns
pub async fn run(settings: NodeSettings, hub: Hub) {
    loop {
        let mut stream = connect_with_retry(&settings.host).await;

        if let Err(e) = initialize(&mut stream, &settings).await {
            warn!("failed to initialize connection: {e}");
            sleep(INITIAL_BACKOFF).await;
            continue;
        }

        if let Err(e) = session(stream, &settings, &hub).await {
            warn!("connection error: {e}");
        }

        // Avoid a tight loop when the session dies immediately.
        sleep(Duration::from_secs(1)).await;
    }
}

async fn connect_with_retry(host: &str) -> TcpStream {
    let mut backoff = INITIAL_BACKOFF;
    loop {
        match TcpStream::connect((host, NODE_PORT)).await {
            Ok(stream) => {
                info!("connected to {host}:{NODE_PORT}");
                return stream;
            }
            Err(e) => {
                warn!("connection failed: {e}, retrying in {backoff:?}");
                sleep(backoff).await;
                backoff = (backoff * 2).min(MAX_BACKOFF);
            }
        }
    }
}

/// Log in and enable monitoring
///
/// The node needs a beat between login steps; the pauses mirror what the
/// interactive telnet session tolerates.
async fn initialize(stream: &mut TcpStream, settings: &NodeSettings) -> io::Result<()> {
    sleep(Duration::from_secs(3)).await;

    stream
        .write_all(format!("{}\r", settings.callsign).as_bytes())
        .await?;
    sleep(Duration::from_secs(1)).await;

    stream.write_all(b"p\r").await?;
    stream.write_all(b"BPQTERMTCP\r").await?;
    sleep(Duration::from_secs(1)).await;

    stream
        .write_all(format!("{}\r", monitor_command(settings.ports)).as_bytes())
        .await?;
    sleep(Duration::from_secs(3)).await;

    Ok(())
}

/// Build the monitor-enable command from a port bitmask
fn monitor_command(ports: usize) -> String {
    let mut mask: u64 = 0;
    for i in 0..ports.min(64) {
        mask |= 1 << i;
    }
    format!(r"\\\\{mask:x} 1 1 1 0 0 0 1")
}

/// Run one monitor session until the connection fails
async fn session(stream: TcpStream, settings: &NodeSettings, hub: &Hub) -> io::Result<()> {
    let (read_half, mut write_half) = stream.into_split();

    let keepalive = tokio::spawn(async move {
        loop {
            sleep(KEEPALIVE_INTERVAL).await;
            if let Err(e) = write_half.write_all(&[0]).await {
                warn!("keepalive failed: {e}");
                break;
            }
        }
    });

    let result = monitor_stream(read_half, settings, hub).await;
    keepalive.abort();
    result
}

fn unexpected_eof() -> io::Error {
    io::Error::new(io::ErrorKind::UnexpectedEof, "node closed the connection")
}

/// Read the session phases: banner, port table, then monitor chunks
async fn monitor_stream(
    read_half: OwnedReadHalf,
    settings: &NodeSettings,
    hub: &Hub,
) -> io::Result<()> {
    let mut reader = BufReader::new(read_half);

    // Banner phase: wait for the telnet server greeting.
    loop {
        let mut line = Vec::new();
        if reader.read_until(0x0D, &mut line).await? == 0 {
            return Err(unexpected_eof());
        }
        if line.ends_with(b"Connected to TelnetServer\r") {
            break;
        }
    }

    // Init phase: 0xFF 0xFF <count> '|' followed by one description per port.
    let mut init = Vec::new();
    if reader.read_until(b'|', &mut init).await? == 0 {
        return Err(unexpected_eof());
    }
    if init.len() != 4 || init[..2] != [0xFF, 0xFF] {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            "unexpected init string",
        ));
    }
    let port_count = (init[2] as char)
        .to_digit(10)
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidData, "invalid port count"))?;

    for index in 0..port_count {
        let mut desc = Vec::new();
        if reader.read_until(b'|', &mut desc).await? == 0 {
            return Err(unexpected_eof());
        }
        if desc.last() == Some(&b'|') {
            desc.pop();
        }
        info!("port {index}: {}", String::from_utf8_lossy(&desc));
    }

    // Monitor phase.
    loop {
        let mut chunk = Vec::new();
        if reader.read_until(CHUNK_DELIMITER, &mut chunk).await? == 0 {
            return Err(unexpected_eof());
        }
        process_chunk(&chunk, settings, hub);
    }
}

/// Clean one monitor chunk and publish its envelope(s)
fn process_chunk(raw: &[u8], settings: &NodeSettings, hub: &Hub) {
    let mut bytes = raw;
    if bytes.last() == Some(&CHUNK_DELIMITER) {
        bytes = &bytes[..bytes.len() - 1];
    }
    // Terminal control prefixes vary by node version.
    bytes = if let Some(rest) = bytes.strip_prefix(&[0xFF, 0x1B, 0x11][..]) {
        rest
    } else if let Some(rest) = bytes.strip_prefix(&[0xFF, 0x1B][..]) {
        rest
    } else {
        bytes
    };

    let decoded = String::from_utf8_lossy(bytes);
    let mut text: &str = &decoded;
    if let Some(t) = text.strip_prefix('[') {
        text = t;
    }
    if let Some(t) = text.strip_suffix('\r') {
        text = t;
    }
    let cleaned = text.replace('\r', "\n");

    let now = Utc::now();

    // Telemetry first; the broadcast still flows through as a log line too.
    if let Ok((port, data)) = parse_telemetry(&cleaned) {
        debug!("telemetry on port {port}");
        hub.with_state(|state| state.observe_telemetry(port, now, data.clone()));
        publish(hub, &Envelope::telemetry(port, data));
    }

    let envelope = match parse_monitor_line(&cleaned) {
        Some(line) => {
            let at = normalize_timestamp_at(&line.timestamp, now).unwrap_or(now);
            let port = line.port.parse().ok();
            hub.with_state(|state| state.observe_line(port, at));
            Envelope::parsed_log(&line)
        }
        None => Envelope::raw_log(&cleaned),
    };
    publish(hub, &envelope);

    if settings.console_out {
        println!("{cleaned}");
    }
}

fn publish(hub: &Hub, envelope: &Envelope) {
    match serde_json::to_string(envelope) {
        Ok(json) => hub.publish(json),
        Err(e) => tracing::error!("failed to serialize envelope: {e}"),
    }
}
