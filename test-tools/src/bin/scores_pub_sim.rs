/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! scores-pub-sim – stands in for the game server's score broadcast.
//!
//! Binds a PUB socket and, every `--interval-ms`, publishes one
//! `[topic][msg type][ScoresMessage]` update.  Players join one by one
//! (slots not yet joined are sent as -1) and gain points at different rates,
//! so the ranking on the viewer keeps changing.
//!
//! ```text
//! scores-pub-sim --bind tcp://127.0.0.1:62763 --players 8
//! space-high-scores --host 127.0.0.1 --port 62763
//! ```

use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing::{debug, info};
use zeromq::{PubSocket, Socket, SocketSend, ZmqMessage};

use space_scoreboard::proto::encode_scores;
use space_scoreboard::snapshot::{ABSENT_SCORE, MAX_PARTICIPANTS};
use space_scoreboard::subscriber::frames::score_update_frames;
use space_scoreboard::subscriber::SCORES_UPDATE_TOPIC;

#[derive(Debug, Parser)]
#[command(name = "scores-pub-sim", about = "Publishes simulated score updates")]
struct Cli {
    /// Address the PUB socket binds to.
    #[arg(short = 'b', long = "bind", default_value = "tcp://127.0.0.1:62763")]
    bind: String,

    /// Number of player slots in every update (at most 26).
    #[arg(short = 'n', long = "players", default_value_t = 8)]
    players: usize,

    /// Milliseconds between updates.
    #[arg(short = 'i', long = "interval-ms", default_value_t = 1000)]
    interval_ms: u64,

    /// Topic to publish on.
    #[arg(short = 't', long = "topic", default_value_t = SCORES_UPDATE_TOPIC)]
    topic: u32,

    /// Message-type discriminator sent in the second frame.
    #[arg(short = 'm', long = "msg-type", default_value_t = 0)]
    msg_type: u32,
}

/// Scores at `tick`: slot `i` joins at tick `2 * i` and then earns
/// `(tick + i) % 3` points per tick.
fn scores_at(tick: u64, players: usize) -> Vec<i32> {
    (0..players as u64)
        .map(|slot| {
            let joined = slot * 2;
            if tick < joined {
                return ABSENT_SCORE;
            }
            let earned: u64 = (joined..=tick).map(|t| (t + slot) % 3).sum();
            i32::try_from(earned).unwrap_or(i32::MAX)
        })
        .collect()
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    if cli.players > MAX_PARTICIPANTS {
        bail!("--players must be at most {MAX_PARTICIPANTS}");
    }

    let mut socket = PubSocket::new();
    socket
        .bind(&cli.bind)
        .await
        .with_context(|| format!("Cannot bind PUB socket to {}", cli.bind))?;
    info!(bind = %cli.bind, topic = cli.topic, players = cli.players, "Publishing score updates");

    let mut interval = tokio::time::interval(Duration::from_millis(cli.interval_ms));
    let mut tick: u64 = 0;

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                info!(sent = tick, "Stopping publisher");
                break;
            }
            _ = interval.tick() => {
                let scores = scores_at(tick, cli.players);
                let frames = score_update_frames(cli.topic, cli.msg_type, encode_scores(&scores));
                let message = ZmqMessage::try_from(frames).map_err(anyhow::Error::msg)?;
                socket.send(message).await.context("Publish failed")?;
                debug!(tick, ?scores, "Update sent");
                tick += 1;
            }
        }
    }

    socket.close().await;
    Ok(())
}
