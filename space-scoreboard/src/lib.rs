/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! space-high-scores – live scoreboard for the outer-space game
//!
//! Module layout:
//!
//! ```text
//! lib.rs
//! ├── config/         – pub/sub endpoint from the game's C header
//! ├── snapshot.rs     – ScoreSnapshot (one per received update)
//! ├── proto/          – ScoresMessage protobuf + decoder
//! ├── scoreboard/     – ranking, formatting, display surface
//! └── subscriber/     – SUB socket, 3-frame envelope, receive loop
//! ```

pub mod config;
pub mod proto;
pub mod scoreboard;
pub mod snapshot;
pub mod subscriber;
