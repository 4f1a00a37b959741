//! TNC Monitor Bridge
//!
//! Connects to a BPQ-style node's telnet monitor port, decodes the trace
//! and telemetry stream, and republishes everything as JSON over a
//! WebSocket fan-out with bounded replay history for dashboards.

mod config;
mod envelope;
mod hub;
mod node;
mod server;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = config::Args::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tnc_bridge=info,tnc_protocol=info,tnc_monitor=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let callsign = args
        .resolve_callsign()
        .context("no callsign given and none found in ~/node.ini; pass --call")?;

    tracing::info!("starting TNC monitor bridge");

    let hub = hub::Hub::new(args.buffer_size);

    let server = tokio::spawn(server::serve(args.listen, hub.clone()));

    let settings = node::NodeSettings {
        host: args.host.clone(),
        callsign,
        ports: args.ports,
        console_out: args.console_out,
    };

    tokio::select! {
        _ = node::run(settings, hub) => {}
        result = server => {
            result.context("http server task panicked")?
                .context("http server failed")?;
        }
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("shutting down");
        }
    }

    Ok(())
}
