/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

use std::path::PathBuf;
use std::process;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use tracing::{error, info};

use space_scoreboard::config::HeaderDefinitions;
use space_scoreboard::scoreboard::{Scoreboard, Terminal};
use space_scoreboard::subscriber::{
    self, Envelope, ZmqScoreSubscriber, DEFAULT_CONNECT_TIMEOUT, SCORES_UPDATE_TOPIC,
};

// ── CLI argument definition ───────────────────────────────────────────────────

/// Live high-scores board for the outer-space game.
///
/// Example:
///   space-high-scores --header include/comms.h
///   space-high-scores --host 10.0.0.5 --port 62763 --no-clear
#[derive(Debug, Parser)]
#[command(
    name = "space-high-scores",
    about = "Live scoreboard fed by the game server's pub/sub broadcast",
    long_about = None,
)]
struct Cli {
    /// C header holding the PROTOCOL / SERVER_IP / PORT_PUBSUB definitions.
    #[arg(short = 'H', long = "header", default_value = "include/comms.h")]
    header: PathBuf,

    /// Pub/sub topic carrying score updates.
    #[arg(short = 't', long = "topic", default_value_t = SCORES_UPDATE_TOPIC)]
    topic: u32,

    /// Override the header's PROTOCOL.
    #[arg(long = "protocol")]
    protocol: Option<String>,

    /// Override the header's SERVER_IP.
    #[arg(long = "host")]
    host: Option<String>,

    /// Override the header's PORT_PUBSUB.
    #[arg(short = 'p', long = "port")]
    port: Option<u16>,

    /// Only accept updates carrying this message-type discriminator.
    #[arg(short = 'm', long = "msg-type")]
    msg_type: Option<u32>,

    /// Seconds to wait for the publisher before giving up.
    #[arg(long = "connect-timeout", default_value_t = DEFAULT_CONNECT_TIMEOUT.as_secs())]
    connect_timeout_secs: u64,

    /// Append frames instead of clearing the screen before each one.
    #[arg(long = "no-clear", default_value_t = false)]
    no_clear: bool,
}

// ── Entry point ───────────────────────────────────────────────────────────────

#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Initialise structured logging on stderr so it never lands inside the
    // board.  Level is controlled by the RUST_LOG env-var (e.g. RUST_LOG=debug).
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    info!(
        header    = %cli.header.display(),
        topic     = cli.topic,
        protocol  = ?cli.protocol,
        host      = ?cli.host,
        port      = ?cli.port,
        msg_type  = ?cli.msg_type,
        connect_timeout_secs = cli.connect_timeout_secs,
        no_clear  = cli.no_clear,
        "Configuration"
    );

    if let Err(e) = run(cli).await {
        error!("{:#}", e);
        process::exit(1);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    // ── Resolve endpoint ──────────────────────────────────────────────────────
    let definitions = HeaderDefinitions::load(&cli.header).with_overrides(
        cli.protocol,
        cli.host,
        cli.port,
    );
    let endpoint = definitions
        .endpoint()
        .with_context(|| format!("Unusable pub/sub address '{}'", definitions.compose()))?;

    let mut board = Scoreboard::new(Terminal::stdout(!cli.no_clear));
    board
        .notice("Waiting for score updates...")
        .context("Cannot write to stdout")?;

    // Ctrl-C is honoured from here on, including while still connecting.
    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Cannot listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };
    tokio::pin!(shutdown);

    // ── Connect ───────────────────────────────────────────────────────────────
    let envelope = Envelope::new(cli.topic).with_msg_type(cli.msg_type);
    let connect_timeout = Duration::from_secs(cli.connect_timeout_secs);
    let mut socket = tokio::select! {
        biased;
        () = &mut shutdown => {
            info!(endpoint = %endpoint, "Interrupt received while connecting");
            return Ok(());
        }
        socket = ZmqScoreSubscriber::connect(&endpoint, &envelope, connect_timeout) => socket?,
    };

    // ── Receive until Ctrl-C ──────────────────────────────────────────────────
    let result = subscriber::run(&mut socket, &mut board, &envelope, shutdown).await;

    let endpoint = socket.endpoint().to_string();
    socket.close().await;

    let stats = result?;
    info!(
        endpoint = %endpoint,
        rendered = stats.rendered,
        skipped = stats.skipped,
        "Scoreboard stopped"
    );
    Ok(())
}
