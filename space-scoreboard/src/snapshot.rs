/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Score snapshot received from the game server.
//!
//! ```text
//! game-server ──(ScoresMessage bytes)──► ScoreSnapshot ──(rank)──► RankedEntry
//!                                         ↑ one per message          ↑ one per visible row
//!                                         slot-indexed, -1 = absent   derived, never stored
//! ```
//!
//! # Ownership model
//! A snapshot is created by the decoder, borrowed by the renderer for one
//! frame and dropped before the next message is awaited.  Nothing is carried
//! across iterations.

// ── Constants ─────────────────────────────────────────────────────────────────

/// Score value the server broadcasts for a slot with no connected player.
pub const ABSENT_SCORE: i32 = -1;

/// Largest slot count that still maps onto a single letter `'A'..='Z'`.
pub const MAX_PARTICIPANTS: usize = 26;

// ── ScoreSnapshot ─────────────────────────────────────────────────────────────

/// Ordered scores, one per participant slot.
///
/// Slot `0` is participant `A`, slot `1` is `B`, and so on.  The slot count
/// is capped at [`MAX_PARTICIPANTS`]; construction beyond that is refused
/// instead of producing symbols past `'Z'`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ScoreSnapshot {
    scores: Vec<i32>,
}

impl ScoreSnapshot {
    /// Wrap `scores` into a snapshot.
    ///
    /// Returns the rejected slot count as `Err` when there are more than
    /// [`MAX_PARTICIPANTS`] entries.
    pub fn new(scores: Vec<i32>) -> Result<Self, usize> {
        if scores.len() > MAX_PARTICIPANTS {
            return Err(scores.len());
        }
        Ok(Self { scores })
    }

    /// Raw scores in slot order, sentinels included.
    pub fn scores(&self) -> &[i32] {
        &self.scores
    }

    /// Number of slots in the snapshot (connected or not).
    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    /// Number of slots carrying a real score.
    pub fn connected(&self) -> usize {
        self.scores.iter().filter(|&&s| s != ABSENT_SCORE).count()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
