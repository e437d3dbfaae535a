/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Errors raised when turning header definitions into a [`ConnectionEndpoint`].
//!
//! A missing or unreadable header is *not* one of them: that case is logged
//! and degrades to empty definitions (see [`HeaderDefinitions::load`]).  The
//! failure only surfaces here, once a required key turns out to be absent.
//!
//! [`ConnectionEndpoint`]: super::ConnectionEndpoint
//! [`HeaderDefinitions::load`]: super::HeaderDefinitions::load

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// A required definition was not found in the header nor given on the
    /// command line.
    #[error("missing '{0}' definition — cannot build the pub/sub endpoint")]
    MissingKey(&'static str),

    /// The port definition is not a valid TCP port number.
    #[error("invalid port '{value}' — expected an integer in 1..=65535")]
    InvalidPort { value: String },
}
