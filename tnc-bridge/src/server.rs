//! HTTP and WebSocket surface
//!
//! `/ws` upgrades to a WebSocket that first replays the bounded history,
//! then forwards live broadcasts; inbound frames are drained and ignored.
//! `/stats` reports the monitor state as JSON; `/version` the build
//! version as plain text.

use std::net::SocketAddr;

use actix_web::{get, web, App, Error, HttpRequest, HttpResponse, HttpServer, Responder};
use actix_ws::Message;
use futures_util::StreamExt;
use serde::Serialize;
use tokio::sync::broadcast::error::RecvError;
use tracing::{info, warn};

use tnc_monitor::MonitorState;
use tnc_protocol::TncTelemetry;

use crate::hub::Hub;

/// Build version served at /version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Run the HTTP server until it fails or the process shuts down
pub async fn serve(addr: SocketAddr, hub: Hub) -> std::io::Result<()> {
    let hub_data = web::Data::new(hub);

    info!("http server listening on {addr}");
    let server = HttpServer::new(move || {
        App::new()
            .app_data(hub_data.clone())
            .service(index)
            .service(version)
            .service(websocket)
            .service(stats)
    })
    .shutdown_timeout(1)
    .disable_signals()
    .bind(addr)?
    .run();
    server.await
}

#[get("/")]
async fn index() -> impl Responder {
    HttpResponse::Ok()
        .content_type("text/plain; charset=utf-8")
        .body(
            "tnc-bridge monitor stream\n\n\
             GET /ws       WebSocket JSON stream (history replay, then live)\n\
             GET /stats    port and message-rate statistics\n\
             GET /version  build version\n",
        )
}

#[get("/version")]
async fn version() -> impl Responder {
    HttpResponse::Ok()
        .content_type("text/plain; charset=utf-8")
        .body(VERSION)
}

#[get("/ws")]
async fn websocket(
    req: HttpRequest,
    body: web::Payload,
    hub: web::Data<Hub>,
) -> Result<HttpResponse, Error> {
    let (response, mut session, mut msg_stream) = actix_ws::handle(&req, body)?;
    let (history, mut live) = hub.subscribe();

    actix_web::rt::spawn(async move {
        for payload in history {
            if session.text(payload).await.is_err() {
                return;
            }
        }

        loop {
            tokio::select! {
                received = live.recv() => match received {
                    Ok(payload) => {
                        if session.text(payload).await.is_err() {
                            break;
                        }
                    }
                    Err(RecvError::Lagged(missed)) => {
                        warn!("websocket client lagged, dropped {missed} messages");
                    }
                    Err(RecvError::Closed) => break,
                },
                frame = msg_stream.next() => match frame {
                    Some(Ok(Message::Ping(data))) => {
                        if session.pong(&data).await.is_err() {
                            break;
                        }
                    }
                    Some(Ok(Message::Close(_))) | Some(Err(_)) | None => break,
                    Some(Ok(_)) => {} // clients have nothing to tell us
                },
            }
        }

        let _ = session.close(None).await;
    });

    Ok(response)
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct StatsResponse {
    ports: Vec<PortStatsView>,
    messages_per_minute: Vec<MinuteBucket>,
    history_len: usize,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PortStatsView {
    port: u32,
    frames: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    last_seen: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    telemetry: Option<TncTelemetry>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct MinuteBucket {
    minute: String,
    count: u64,
}

impl StatsResponse {
    fn collect(state: &MonitorState) -> Self {
        Self {
            ports: state
                .ports
                .iter()
                .map(|(port, port_stats)| PortStatsView {
                    port,
                    frames: port_stats.frames,
                    last_seen: port_stats.last_seen.map(|t| t.to_rfc3339()),
                    telemetry: port_stats.telemetry.clone(),
                })
                .collect(),
            messages_per_minute: state
                .rate
                .per_minute()
                .map(|(minute, count)| MinuteBucket {
                    minute: minute.to_rfc3339(),
                    count,
                })
                .collect(),
            history_len: state.history.len(),
        }
    }
}

#[get("/stats")]
async fn stats(hub: web::Data<Hub>) -> impl Responder {
    let response = hub.with_state(|state| StatsResponse::collect(state));
    HttpResponse::Ok().json(response)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_stats_response_shape() {
        let mut state = MonitorState::new(10);
        let at = Utc.with_ymd_and_hms(2025, 6, 15, 12, 0, 30).unwrap();
        state.observe_line(Some(1), at);
        state.history.push("payload".to_string());

        let json = serde_json::to_string(&StatsResponse::collect(&state)).unwrap();
        assert!(json.contains(r#""ports":[{"port":1,"frames":1"#));
        assert!(json.contains(r#""messagesPerMinute":[{"minute":"2025-06-15T12:00:00+00:00","count":1}]"#));
        assert!(json.contains(r#""historyLen":1"#));
    }
}
