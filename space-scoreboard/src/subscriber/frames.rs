/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Topic encoding and the 3-frame envelope of a score update.
//!
//! Every message the server publishes on the scores topic is a multi-part
//! message of exactly three frames:
//!
//! ```text
//! [ topic: u32 LE ][ msg type: u32 LE ][ ScoresMessage protobuf ]
//! ```
//!
//! The server writes enums straight from memory, so both header frames are
//! 4-byte little-endian integers.  The subscription filter must be the very
//! same 4 bytes or the bus never delivers anything.

use bytes::Bytes;
use thiserror::Error;

// ── Constants ─────────────────────────────────────────────────────────────────

/// `SCORES_UPDATES_TOPIC` in the server's `PUBSUB_TOPICS` enum.
pub const SCORES_UPDATE_TOPIC: u32 = 2;

pub const FRAMES_PER_UPDATE: usize = 3;

/// Width of the topic and message-type frames.
pub const HEADER_FRAME_LEN: usize = 4;

// ── Topic encoding ────────────────────────────────────────────────────────────

/// Subscription filter bytes for `topic`.
pub fn encode_topic(topic: u32) -> [u8; HEADER_FRAME_LEN] {
    topic.to_le_bytes()
}

/// Inverse of [`encode_topic`]; `None` unless `frame` is exactly 4 bytes.
pub fn decode_topic(frame: &[u8]) -> Option<u32> {
    <[u8; HEADER_FRAME_LEN]>::try_from(frame)
        .ok()
        .map(u32::from_le_bytes)
}

/// Build the frames of one score update, as the publisher sends them.
pub fn score_update_frames(topic: u32, msg_type: u32, payload: impl Into<Bytes>) -> Vec<Bytes> {
    vec![
        Bytes::copy_from_slice(&encode_topic(topic)),
        Bytes::copy_from_slice(&msg_type.to_le_bytes()),
        payload.into(),
    ]
}

// ── Envelope validation ───────────────────────────────────────────────────────

/// Why a received message was not a well-formed score update.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FrameError {
    #[error("expected {expected} frames per update, got {got}")]
    FrameCount { expected: usize, got: usize },

    /// The bus filters by prefix, so a longer topic frame can still slip in.
    #[error("topic frame {got:02x?} does not match subscribed topic {expected}")]
    TopicMismatch { expected: u32, got: Vec<u8> },

    #[error("message type frame is {len} bytes, expected 4")]
    BadDiscriminator { len: usize },

    #[error("message type {got} does not match expected type {expected}")]
    UnexpectedMessageType { expected: u32, got: u32 },
}

/// Payload and discriminator of a validated update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreUpdate {
    pub msg_type: u32,
    pub payload: Bytes,
}

/// Checks received messages against the subscribed topic and, optionally, a
/// known message type.
#[derive(Debug, Clone)]
pub struct Envelope {
    topic: u32,
    filter: [u8; HEADER_FRAME_LEN],
    expected_msg_type: Option<u32>,
}

impl Envelope {
    pub fn new(topic: u32) -> Self {
        Self {
            topic,
            filter: encode_topic(topic),
            expected_msg_type: None,
        }
    }

    /// Also reject updates whose discriminator is not `msg_type`.
    pub fn with_msg_type(mut self, msg_type: Option<u32>) -> Self {
        self.expected_msg_type = msg_type;
        self
    }

    pub fn topic(&self) -> u32 {
        self.topic
    }

    /// Bytes handed to the socket's subscribe option.
    pub fn filter(&self) -> &[u8; HEADER_FRAME_LEN] {
        &self.filter
    }

    /// Validate the envelope of `frames` and hand back the payload.
    ///
    /// # Errors
    /// A [`FrameError`] describing the first check that failed.  The message
    /// should be dropped as a whole; no partial recovery is attempted.
    pub fn split(&self, frames: Vec<Bytes>) -> Result<ScoreUpdate, FrameError> {
        let got = frames.len();
        let Ok([topic, msg_type, payload]) = <[Bytes; FRAMES_PER_UPDATE]>::try_from(frames) else {
            return Err(FrameError::FrameCount {
                expected: FRAMES_PER_UPDATE,
                got,
            });
        };

        if topic[..] != self.filter[..] {
            return Err(FrameError::TopicMismatch {
                expected: self.topic,
                got: topic.to_vec(),
            });
        }

        let msg_type =
            decode_topic(&msg_type).ok_or(FrameError::BadDiscriminator { len: msg_type.len() })?;

        if let Some(expected) = self.expected_msg_type {
            if msg_type != expected {
                return Err(FrameError::UnexpectedMessageType {
                    expected,
                    got: msg_type,
                });
            }
        }

        Ok(ScoreUpdate { msg_type, payload })
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
