/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Protobuf payload of the scores broadcast and its decoder.
//!
//! The schema lives in `proto/scores.proto`.  It is a single message with one
//! repeated field, so the prost type is declared by hand below instead of
//! being generated by a build script (no `protoc` needed at build time).
//!
//! Decoding is all-or-nothing: a buffer either yields a complete
//! [`ScoreSnapshot`] or a [`DecodeError`].  An empty buffer is a valid
//! message with zero scores and is never confused with a failure.

use prost::Message;
use thiserror::Error;

use crate::snapshot::{ScoreSnapshot, MAX_PARTICIPANTS};

/// `message ScoresMessage { repeated int32 scores = 1; }`
///
/// Accepts both packed (proto3 default) and unpacked (proto2 / protobuf-c)
/// encodings of `scores`.
#[derive(Clone, PartialEq, Message)]
pub struct ScoresMessage {
    #[prost(int32, repeated, tag = "1")]
    pub scores: Vec<i32>,
}

/// Why a payload frame could not be turned into a [`ScoreSnapshot`].
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The bytes are not a valid `ScoresMessage` (truncated, wrong wire type…).
    #[error("malformed ScoresMessage payload ({len} bytes): {source}")]
    Malformed {
        len: usize,
        #[source]
        source: prost::DecodeError,
    },

    /// The message decoded but carries more slots than there are letters.
    #[error("payload carries {count} score slots, at most {max} are supported")]
    TooManyParticipants { count: usize, max: usize },
}

/// Decode a payload frame into a [`ScoreSnapshot`].
///
/// # Errors
/// * [`DecodeError::Malformed`] if prost rejects the buffer.
/// * [`DecodeError::TooManyParticipants`] if more than
///   [`MAX_PARTICIPANTS`] slots are present.
pub fn decode_scores(buf: &[u8]) -> Result<ScoreSnapshot, DecodeError> {
    let message = ScoresMessage::decode(buf).map_err(|source| DecodeError::Malformed {
        len: buf.len(),
        source,
    })?;

    ScoreSnapshot::new(message.scores).map_err(|count| DecodeError::TooManyParticipants {
        count,
        max: MAX_PARTICIPANTS,
    })
}

/// Encode `scores` as a `ScoresMessage`, the way the game server packs it.
pub fn encode_scores(scores: &[i32]) -> Vec<u8> {
    ScoresMessage {
        scores: scores.to_vec(),
    }
    .encode_to_vec()
}

// ── Tests ─────────────────────────────────────────────────────────────────────
