//! Subscriber loop: SUB socket → envelope check → decode → draw.
//!
//! # Life cycle
//!
//! ```text
//! CONNECTING ──connect + subscribe──► SUBSCRIBED ──(interrupt)──► closed
//!      │                                  │
//!      │                                  └── publisher gone: fatal
//!      └── failure or deadline: fatal, returned to main (no reconnect, no backoff)
//! ```
//!
//! [`ZmqScoreSubscriber::connect`] only returns once the socket is
//! subscribed, so holding one *is* the SUBSCRIBED state.  The transport
//! retries refused connections forever, hence the connect deadline.  It does
//! not re-dial a publisher that went away, so a disconnect is reported as
//! [`SubscriberError::Disconnected`] instead of leaving `recv` hanging.
//!
//! # Cancellation
//! [`run`] races every receive against the `shutdown` future and polls
//! `shutdown` first.  Once it has fired no further message is processed,
//! even one that is already buffered.  The socket stays owned by the caller,
//! which closes it afterwards; dropping it on any other path releases the
//! transport as well.
//!
//! # Per-message failures
//! Envelope ([`FrameError`]) and payload ([`DecodeError`]) problems are
//! logged and the message is skipped.  Only transport and display failures
//! end the loop ([`SubscriberError`]).

pub mod error;
pub mod frames;

pub use error::SubscriberError;
pub use frames::{Envelope, FrameError, ScoreUpdate, SCORES_UPDATE_TOPIC};

use std::future::Future;
use std::time::Duration;

use bytes::Bytes;
use futures::channel::mpsc;
use futures::StreamExt;
use tracing::{debug, info, warn};
use zeromq::{Socket, SocketEvent, SocketRecv, SubSocket};

use crate::config::ConnectionEndpoint;
use crate::proto::{decode_scores, DecodeError};
use crate::scoreboard::{Scoreboard, Surface};

// ── Constants ─────────────────────────────────────────────────────────────────

/// How long [`ZmqScoreSubscriber::connect`] waits for a publisher by default.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

// ── Frame source ──────────────────────────────────────────────────────────────

/// Anything that yields whole multi-part messages, one at a time.
pub trait FrameSource {
    /// Wait for the next message and return its frames in order.
    fn recv_frames(&mut self) -> impl Future<Output = Result<Vec<Bytes>, SubscriberError>>;
}

/// SUB socket subscribed to a single topic.
pub struct ZmqScoreSubscriber {
    socket: SubSocket,
    /// Socket events; `None` once the transport dropped the sender.
    monitor: Option<mpsc::Receiver<SocketEvent>>,
    endpoint: String,
}

impl ZmqScoreSubscriber {
    /// Connect to `endpoint` and subscribe with the envelope's topic filter.
    ///
    /// Gives up after `timeout` if no publisher accepts the connection.
    ///
    /// # Errors
    /// [`SubscriberError::Connect`], [`SubscriberError::ConnectTimeout`],
    /// [`SubscriberError::TopicFilter`] or [`SubscriberError::Subscribe`];
    /// all of them are fatal.
    pub async fn connect(
        endpoint: &ConnectionEndpoint,
        envelope: &Envelope,
        timeout: Duration,
    ) -> Result<Self, SubscriberError> {
        let endpoint = endpoint.to_string();
        info!(endpoint = %endpoint, timeout = ?timeout, "Connecting to score publisher");

        let mut socket = SubSocket::new();
        // Registered before connecting so no disconnect can be missed.
        let monitor = socket.monitor();

        tokio::time::timeout(timeout, socket.connect(&endpoint))
            .await
            .map_err(|_| SubscriberError::ConnectTimeout {
                endpoint: endpoint.clone(),
                waited: timeout,
            })?
            .map_err(|source| SubscriberError::Connect {
                endpoint: endpoint.clone(),
                source,
            })?;

        let topic = envelope.topic();
        let filter = std::str::from_utf8(envelope.filter())
            .map_err(|_| SubscriberError::TopicFilter { topic })?;
        socket
            .subscribe(filter)
            .await
            .map_err(|source| SubscriberError::Subscribe { topic, source })?;

        info!(
            endpoint = %endpoint,
            topic,
            filter = ?envelope.filter(),
            "Subscribed"
        );
        Ok(Self {
            socket,
            monitor: Some(monitor),
            endpoint,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Close the socket and tear down its transport tasks.
    pub async fn close(self) {
        let errors = self.socket.close().await;
        if errors.is_empty() {
            debug!(endpoint = %self.endpoint, "Socket closed");
        } else {
            for e in errors {
                warn!(endpoint = %self.endpoint, error = %e, "Error while closing socket");
            }
        }
    }
}

impl FrameSource for ZmqScoreSubscriber {
    async fn recv_frames(&mut self) -> Result<Vec<Bytes>, SubscriberError> {
        let Self {
            socket,
            monitor,
            endpoint,
        } = self;

        loop {
            let event = tokio::select! {
                message = socket.recv() => {
                    let message = message.map_err(SubscriberError::Receive)?;
                    return Ok(message.into_vec());
                }
                event = async { monitor.as_mut()?.next().await }, if monitor.is_some() => event,
            };

            match event {
                Some(SocketEvent::Disconnected(peer)) => {
                    warn!(endpoint = %endpoint, peer = ?peer, "Publisher disconnected");
                    return Err(SubscriberError::Disconnected {
                        endpoint: endpoint.clone(),
                    });
                }
                Some(other) => debug!(endpoint = %endpoint, event = ?other, "Socket event"),
                None => {
                    debug!(endpoint = %endpoint, "Socket monitor closed");
                    *monitor = None;
                }
            }
        }
    }
}

// ── Loop ──────────────────────────────────────────────────────────────────────

/// Counters reported when the loop stops.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoopStats {
    /// Updates drawn on the board.
    pub rendered: u64,
    /// Messages dropped because of a bad envelope or payload.
    pub skipped: u64,
}

/// A message that could not be turned into a board frame.
#[derive(Debug)]
enum Skip {
    Envelope(FrameError),
    Payload(DecodeError),
}

/// Validate, decode and draw one message.
fn handle_message<S: Surface>(
    frames: Vec<Bytes>,
    envelope: &Envelope,
    board: &mut Scoreboard<S>,
) -> Result<Result<(), Skip>, SubscriberError> {
    let update = match envelope.split(frames) {
        Ok(update) => update,
        Err(e) => return Ok(Err(Skip::Envelope(e))),
    };
    let snapshot = match decode_scores(&update.payload) {
        Ok(snapshot) => snapshot,
        Err(e) => return Ok(Err(Skip::Payload(e))),
    };

    debug!(
        msg_type = update.msg_type,
        slots = snapshot.len(),
        connected = snapshot.connected(),
        "Score update"
    );
    board.draw(&snapshot)?;
    Ok(Ok(()))
}

/// Receive and draw score updates until `shutdown` resolves.
///
/// # Errors
/// Returns the first transport or display failure.  Bad messages are
/// counted in [`LoopStats::skipped`] instead.
pub async fn run<F, S, D>(
    source: &mut F,
    board: &mut Scoreboard<S>,
    envelope: &Envelope,
    shutdown: D,
) -> Result<LoopStats, SubscriberError>
where
    F: FrameSource,
    S: Surface,
    D: Future<Output = ()>,
{
    tokio::pin!(shutdown);
    let mut stats = LoopStats::default();

    loop {
        let frames = tokio::select! {
            biased;
            () = &mut shutdown => {
                info!(
                    rendered = stats.rendered,
                    skipped = stats.skipped,
                    "Interrupt received, leaving subscriber loop"
                );
                return Ok(stats);
            }
            frames = source.recv_frames() => frames?,
        };

        match handle_message(frames, envelope, board)? {
            Ok(()) => stats.rendered += 1,
            Err(Skip::Envelope(e)) => {
                stats.skipped += 1;
                warn!(error = %e, "Dropping message with unexpected envelope");
            }
            Err(Skip::Payload(e)) => {
                stats.skipped += 1;
                warn!(error = %e, "Dropping undecodable score update");
            }
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
