/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Fatal errors of the subscriber loop.
//!
//! Per-message problems (bad envelope, undecodable payload) are not in here:
//! the loop logs them and moves on to the next message.  Everything below
//! stops the viewer.

use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SubscriberError {
    /// The SUB socket could not connect to the publisher.
    #[error("cannot connect to publisher at {endpoint}: {source}")]
    Connect {
        endpoint: String,
        #[source]
        source: zeromq::ZmqError,
    },

    /// No publisher accepted the connection before the deadline.  The
    /// transport keeps retrying on its own, so this is the only way a down
    /// publisher shows up at startup.
    #[error("no publisher reachable at {endpoint} within {waited:?}")]
    ConnectTimeout { endpoint: String, waited: Duration },

    /// The publisher went away.  The socket does not reconnect, so the viewer
    /// would otherwise wait forever on a dead connection.
    #[error("publisher at {endpoint} disconnected")]
    Disconnected { endpoint: String },

    /// The transport only accepts UTF-8 subscription strings.
    #[error("topic {topic} encodes to a subscription filter that is not valid UTF-8")]
    TopicFilter { topic: u32 },

    #[error("cannot subscribe to topic {topic}: {source}")]
    Subscribe {
        topic: u32,
        #[source]
        source: zeromq::ZmqError,
    },

    #[error("receive failed: {0}")]
    Receive(#[source] zeromq::ZmqError),

    /// Writing the board to the display failed (e.g. closed stdout).
    #[error("cannot draw scoreboard: {0}")]
    Render(#[from] std::io::Error),
}
