use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use serde::Deserialize;
use serde_json::{json, Value};
use tokio::net::TcpStream;
use tokio::runtime::Handle;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use tracing::{debug, info, warn};

use crate::platform::ActivityKind;
use crate::types::{PlatformError, StatusError};

type Socket = WebSocketStream<MaybeTlsStream<TcpStream>>;

const OP_DISPATCH: u8 = 0;
const OP_HEARTBEAT: u8 = 1;
const OP_IDENTIFY: u8 = 2;
const OP_PRESENCE_UPDATE: u8 = 3;
const OP_RECONNECT: u8 = 7;
const OP_INVALID_SESSION: u8 = 9;
const OP_HELLO: u8 = 10;

const INITIAL_BACKOFF: Duration = Duration::from_secs(1);
const MAX_BACKOFF: Duration = Duration::from_secs(60);

/// Activity the bot user should show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Presence {
    pub text: String,
    pub kind: ActivityKind,
}

#[derive(Debug, Deserialize)]
struct GatewayEvent {
    op: u8,
    #[serde(default)]
    d: Value,
    #[serde(default)]
    s: Option<u64>,
    #[serde(default)]
    t: Option<String>,
}

/// Background gateway session that keeps the bot presence applied.
///
/// The latest requested presence is kept and re-sent after every (re)connect,
/// so an update made while the session is down is not lost.
pub struct PresenceGateway {
    desired: watch::Sender<Option<Presence>>,
    ready: Arc<AtomicBool>,
    task: JoinHandle<()>,
}

impl PresenceGateway {
    /// Spawns the session task on the current tokio runtime.
    pub fn spawn(token: impl Into<String>, url: impl Into<String>) -> Result<Self, StatusError> {
        let runtime = Handle::try_current().map_err(|_| StatusError::NoRuntime)?;
        let (desired, receiver) = watch::channel(None);
        let ready = Arc::new(AtomicBool::new(false));
        let task = runtime.spawn(run_gateway(
            token.into(),
            url.into(),
            receiver,
            Arc::clone(&ready),
        ));

        Ok(Self {
            desired,
            ready,
            task,
        })
    }

    pub fn is_ready(&self) -> bool {
        self.ready.load(Ordering::Acquire)
    }

    /// Requests a presence. Errors when no live session can apply it right now;
    /// the request is still kept for the next session.
    pub fn update(&self, presence: Presence) -> Result<(), PlatformError> {
        self.desired.send_replace(Some(presence));
        if self.task.is_finished() {
            return Err(PlatformError::Gateway("session task has stopped".to_string()));
        }
        if !self.is_ready() {
            return Err(PlatformError::Gateway(
                "session not ready, presence queued for the next identify".to_string(),
            ));
        }
        Ok(())
    }
}

impl Drop for PresenceGateway {
    fn drop(&mut self) {
        self.task.abort();
    }
}

pub(crate) fn presence_frame(presence: &Presence) -> Value {
    json!({
        "op": OP_PRESENCE_UPDATE,
        "d": {
            "since": null,
            "activities": [{ "name": presence.text, "type": presence.kind.code() }],
            "status": "online",
            "afk": false,
        }
    })
}

pub(crate) fn identify_frame(token: &str) -> Value {
    json!({
        "op": OP_IDENTIFY,
        "d": {
            "token": token,
            "intents": 0,
            "properties": {
                "os": std::env::consts::OS,
                "browser": env!("CARGO_PKG_NAME"),
                "device": env!("CARGO_PKG_NAME"),
            },
        }
    })
}

fn heartbeat_frame(sequence: Option<u64>) -> Value {
    json!({ "op": OP_HEARTBEAT, "d": sequence })
}

async fn run_gateway(
    token: String,
    url: String,
    mut desired: watch::Receiver<Option<Presence>>,
    ready: Arc<AtomicBool>,
) {
    let mut backoff = INITIAL_BACKOFF;
    loop {
        match run_session(&token, &url, &mut desired, &ready).await {
            Ok(()) => debug!("Gateway session asked to reconnect"),
            Err(err) => warn!(error = %err, "Gateway session ended"),
        }
        if ready.swap(false, Ordering::AcqRel) {
            backoff = INITIAL_BACKOFF;
        }
        if desired.has_changed().is_err() {
            return;
        }
        time::sleep(backoff).await;
        backoff = (backoff * 2).min(MAX_BACKOFF);
    }
}

async fn run_session(
    token: &str,
    url: &str,
    desired: &mut watch::Receiver<Option<Presence>>,
    ready: &AtomicBool,
) -> Result<(), PlatformError> {
    let (mut ws, _) = connect_async(url).await.map_err(gateway_error)?;

    let hello = match next_event(&mut ws).await? {
        event if event.op == OP_HELLO => event,
        event => {
            return Err(PlatformError::Gateway(format!(
                "expected hello, got op {}",
                event.op
            )))
        }
    };
    let interval_ms = hello
        .d
        .get("heartbeat_interval")
        .and_then(Value::as_u64)
        .filter(|ms| *ms > 0)
        .ok_or_else(|| PlatformError::Gateway("hello without heartbeat_interval".to_string()))?;
    let period = Duration::from_millis(interval_ms);

    send_frame(&mut ws, identify_frame(token)).await?;

    let mut heartbeat = time::interval_at(Instant::now() + period, period);
    heartbeat.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut sequence = None;

    loop {
        tokio::select! {
            _ = heartbeat.tick() => {
                send_frame(&mut ws, heartbeat_frame(sequence)).await?;
            }
            changed = desired.changed() => {
                if changed.is_err() {
                    let _ = ws.close(None).await;
                    return Ok(());
                }
                let presence = desired.borrow_and_update().clone();
                if let Some(presence) = presence.filter(|_| ready.load(Ordering::Acquire)) {
                    send_frame(&mut ws, presence_frame(&presence)).await?;
                    debug!(text = %presence.text, "Sent presence update");
                }
            }
            event = next_event(&mut ws) => {
                let event = event?;
                if event.s.is_some() {
                    sequence = event.s;
                }
                match event.op {
                    OP_DISPATCH if event.t.as_deref() == Some("READY") => {
                        ready.store(true, Ordering::Release);
                        info!("Gateway session ready");
                        let presence = desired.borrow_and_update().clone();
                        if let Some(presence) = presence {
                            send_frame(&mut ws, presence_frame(&presence)).await?;
                        }
                    }
                    OP_HEARTBEAT => send_frame(&mut ws, heartbeat_frame(sequence)).await?,
                    OP_RECONNECT | OP_INVALID_SESSION => return Ok(()),
                    _ => {}
                }
            }
        }
    }
}

async fn next_event(ws: &mut Socket) -> Result<GatewayEvent, PlatformError> {
    loop {
        match ws.next().await {
            Some(Ok(Message::Text(text))) => {
                return serde_json::from_str(&text)
                    .map_err(|err| PlatformError::Gateway(format!("bad gateway payload: {err}")));
            }
            Some(Ok(Message::Close(frame))) => {
                return Err(PlatformError::Gateway(format!("closed by server: {frame:?}")));
            }
            Some(Ok(_)) => continue,
            Some(Err(err)) => return Err(gateway_error(err)),
            None => return Err(PlatformError::Gateway("connection closed".to_string())),
        }
    }
}

async fn send_frame(ws: &mut Socket, frame: Value) -> Result<(), PlatformError> {
    ws.send(Message::Text(frame.to_string()))
        .await
        .map_err(gateway_error)
}

fn gateway_error(err: tokio_tungstenite::tungstenite::Error) -> PlatformError {
    PlatformError::Gateway(err.to_string())
}
