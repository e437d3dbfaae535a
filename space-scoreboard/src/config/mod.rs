//! Pub/sub endpoint resolution from the game's C header.
//!
//! The server publishes on the address spelled out in `include/comms.h`:
//! ```c
//! #define PROTOCOL "tcp"
//! #define SERVER_IP "127.0.0.1"
//! #define PORT_PUBSUB "62763"
//! ```
//!
//! Only lines of exactly three tokens (`#define KEY VALUE`) are looked at;
//! composite definitions such as
//! `#define SERVER_ZMQ_PUBSUB_ADDRESS PROTOCOL "://" SERVER_IP ":" PORT_PUBSUB`
//! are skipped.

pub mod error;

pub use error::ConfigError;

use std::fmt;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use tracing::{debug, info, warn};

// ── Constants ─────────────────────────────────────────────────────────────────

/// Leading token of every line the resolver consumes.
const DIRECTIVE: &str = "#define";

/// Placeholder printed for unresolved slots by [`HeaderDefinitions::compose`].
const UNRESOLVED: &str = "None";

// ── Public data structures ────────────────────────────────────────────────────

/// Fully resolved pub/sub address.
///
/// Only constructed through [`HeaderDefinitions::endpoint`], so all three
/// fields are always present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionEndpoint {
    pub protocol: String,
    pub host: String,
    pub port: u16,
}

impl fmt::Display for ConnectionEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}://{}:{}", self.protocol, self.host, self.port)
    }
}

/// Which endpoint slot a header key feeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Slot {
    Protocol,
    Host,
    Port,
}

impl Slot {
    fn from_key(key: &str) -> Option<Self> {
        match key {
            "PROTOCOL" => Some(Slot::Protocol),
            "SERVER_IP" | "HOST" => Some(Slot::Host),
            "PORT_PUBSUB" | "PORT" => Some(Slot::Port),
            _ => None,
        }
    }
}

// ── HeaderDefinitions ─────────────────────────────────────────────────────────

/// Raw endpoint definitions collected from the header, each slot optional.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderDefinitions {
    pub protocol: Option<String>,
    pub host: Option<String>,
    pub port: Option<String>,
}

impl HeaderDefinitions {
    /// Scan `reader` line by line for `#define KEY VALUE` directives.
    ///
    /// Quote characters are stripped from values.  A key defined twice keeps
    /// its last value.
    ///
    /// # Errors
    /// Returns the underlying I/O error if a line cannot be read.  Slots
    /// collected before the failure are kept in `self`.
    pub fn parse_into<R: BufRead>(&mut self, reader: R) -> std::io::Result<()> {
        for line in reader.lines() {
            let line = line?;
            let tokens: Vec<&str> = line.split_whitespace().collect();
            let [directive, key, value] = tokens.as_slice() else {
                continue;
            };
            if *directive != DIRECTIVE {
                continue;
            }
            let Some(slot) = Slot::from_key(key) else {
                continue;
            };

            let value = value.replace('"', "");
            debug!(key = %key, value = %value, "Header definition");
            match slot {
                Slot::Protocol => self.protocol = Some(value),
                Slot::Host => self.host = Some(value),
                Slot::Port => self.port = Some(value),
            }
        }
        Ok(())
    }

    /// Parse definitions from an in-memory reader.
    pub fn parse<R: BufRead>(reader: R) -> std::io::Result<Self> {
        let mut defs = Self::default();
        defs.parse_into(reader)?;
        Ok(defs)
    }

    /// Read definitions from the header at `path`.
    ///
    /// A missing or unreadable file is logged and yields whatever was
    /// collected before the failure (possibly nothing); it never aborts.
    /// Use [`endpoint`](Self::endpoint) to find out whether the result is
    /// usable.
    pub fn load(path: &Path) -> Self {
        info!("Reading pub/sub definitions from: {}", path.display());

        let mut defs = Self::default();
        let result = File::open(path).and_then(|f| defs.parse_into(BufReader::new(f)));
        if let Err(e) = result {
            warn!(
                path = %path.display(),
                error = %e,
                "Cannot read header, continuing with the definitions collected so far"
            );
        }
        defs
    }

    /// Replace header values with explicitly supplied ones.
    pub fn with_overrides(
        mut self,
        protocol: Option<String>,
        host: Option<String>,
        port: Option<u16>,
    ) -> Self {
        if protocol.is_some() {
            self.protocol = protocol;
        }
        if host.is_some() {
            self.host = host;
        }
        if let Some(port) = port {
            self.port = Some(port.to_string());
        }
        self
    }

    /// `"{protocol}://{host}:{port}"` with `None` in place of any missing
    /// slot.
    ///
    /// Diagnostic only: the result may not be a connectable address.
    pub fn compose(&self) -> String {
        let slot = |v: &Option<String>| v.clone().unwrap_or_else(|| UNRESOLVED.to_string());
        format!(
            "{}://{}:{}",
            slot(&self.protocol),
            slot(&self.host),
            slot(&self.port)
        )
    }

    /// Validate that every slot is present and build the endpoint.
    ///
    /// # Errors
    /// * [`ConfigError::MissingKey`] for the first absent slot.
    /// * [`ConfigError::InvalidPort`] if the port is not a non-zero `u16`.
    pub fn endpoint(&self) -> Result<ConnectionEndpoint, ConfigError> {
        let protocol = self
            .protocol
            .clone()
            .ok_or(ConfigError::MissingKey("PROTOCOL"))?;
        let host = self
            .host
            .clone()
            .ok_or(ConfigError::MissingKey("SERVER_IP"))?;
        let raw_port = self
            .port
            .as_deref()
            .ok_or(ConfigError::MissingKey("PORT_PUBSUB"))?;

        let port = raw_port
            .parse::<u16>()
            .ok()
            .filter(|&p| p != 0)
            .ok_or_else(|| ConfigError::InvalidPort {
                value: raw_port.to_string(),
            })?;

        Ok(ConnectionEndpoint {
            protocol,
            host,
            port,
        })
    }
}

/// Load the header at `path` and build the endpoint from it.
pub fn resolve_endpoint(path: &Path) -> Result<ConnectionEndpoint, ConfigError> {
    HeaderDefinitions::load(path).endpoint()
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    /// Helper: write a header string to a temp file and return it.
    fn header_tempfile(content: &str) -> NamedTempFile {
        let mut f = NamedTempFile::new().unwrap();
        f.write_all(content.as_bytes()).unwrap();
        f
    }

    const COMMS_H: &str = r#"
#ifndef COMMS_H
#define COMMS_H

#include "game_def.h"

#define PROTOCOL "tcp"
#define SERVER_IP "127.0.0.1"

/* REQREP STUFF */
#define PORT_REQREP "62762"
#define SERVER_ZMQ_REQREP_ADDRESS PROTOCOL "://" SERVER_IP ":" PORT_REQREP

/* PUBSUB STUFF */
#define PORT_PUBSUB "62763"
#define SERVER_ZMQ_PUBSUB_ADDRESS PROTOCOL "://" SERVER_IP ":" PORT_PUBSUB
#define SERVER_ZMQ_PUBSUB_BIND_ADDRESS PROTOCOL "://*:" PORT_PUBSUB

#endif // COMMS_H
"#;

    // ── parse ─────────────────────────────────────────────────────────────────

    #[test]
    fn resolves_quoted_and_bare_values() {
        let src = "#define PROTOCOL \"tcp\"\n#define SERVER_IP \"127.0.0.1\"\n#define PORT_PUBSUB 5555\n";
        let defs = HeaderDefinitions::parse(src.as_bytes()).unwrap();
        assert_eq!(defs.compose(), "tcp://127.0.0.1:5555");
        assert_eq!(defs.endpoint().unwrap().to_string(), "tcp://127.0.0.1:5555");
    }

    #[test]
    fn resolves_real_comms_header() {
        let defs = HeaderDefinitions::parse(COMMS_H.as_bytes()).unwrap();
        let ep = defs.endpoint().unwrap();
        assert_eq!(
            ep,
            ConnectionEndpoint {
                protocol: "tcp".into(),
                host: "127.0.0.1".into(),
                port: 62763,
            }
        );
    }

    #[test]
    fn host_and_port_aliases_are_accepted() {
        let src = "  #define PROTOCOL ipc\n#define HOST example.org\n#define PORT 7000\n";
        let defs = HeaderDefinitions::parse(src.as_bytes()).unwrap();
        assert_eq!(defs.compose(), "ipc://example.org:7000");
    }

    #[test]
    fn lines_with_wrong_shape_are_ignored() {
        let src = "#define PROTOCOL\n#undef HOST x\n#define PORT_PUBSUB 1 2\n// #define HOST y\n";
        let defs = HeaderDefinitions::parse(src.as_bytes()).unwrap();
        assert_eq!(defs, HeaderDefinitions::default());
    }

    #[test]
    fn later_definition_wins() {
        let src = "#define PORT 1000\n#define PORT_PUBSUB 2000\n";
        let defs = HeaderDefinitions::parse(src.as_bytes()).unwrap();
        assert_eq!(defs.port.as_deref(), Some("2000"));
    }

    // ── compose / endpoint ────────────────────────────────────────────────────

    #[test]
    fn compose_uses_placeholder_for_missing_slots() {
        let defs = HeaderDefinitions::parse("#define PROTOCOL tcp\n".as_bytes()).unwrap();
        assert_eq!(defs.compose(), "tcp://None:None");
    }

    #[test]
    fn endpoint_reports_first_missing_key() {
        let defs = HeaderDefinitions::parse("#define PROTOCOL tcp\n".as_bytes()).unwrap();
        assert_eq!(defs.endpoint(), Err(ConfigError::MissingKey("SERVER_IP")));
    }

    #[test]
    fn endpoint_rejects_non_numeric_port() {
        let src = "#define PROTOCOL tcp\n#define SERVER_IP h\n#define PORT_PUBSUB abc\n";
        let defs = HeaderDefinitions::parse(src.as_bytes()).unwrap();
        assert_eq!(
            defs.endpoint(),
            Err(ConfigError::InvalidPort {
                value: "abc".into()
            })
        );
    }

    #[test]
    fn endpoint_rejects_port_zero() {
        let src = "#define PROTOCOL tcp\n#define SERVER_IP h\n#define PORT_PUBSUB 0\n";
        let defs = HeaderDefinitions::parse(src.as_bytes()).unwrap();
        assert!(matches!(
            defs.endpoint(),
            Err(ConfigError::InvalidPort { .. })
        ));
    }

    #[test]
    fn overrides_replace_header_values() {
        let defs = HeaderDefinitions::parse(COMMS_H.as_bytes())
            .unwrap()
            .with_overrides(None, Some("10.0.0.2".into()), Some(6000));
        assert_eq!(defs.endpoint().unwrap().to_string(), "tcp://10.0.0.2:6000");
    }

    #[test]
    fn overrides_fill_missing_slots() {
        let defs = HeaderDefinitions::default().with_overrides(
            Some("tcp".into()),
            Some("localhost".into()),
            Some(5555),
        );
        assert_eq!(defs.endpoint().unwrap().to_string(), "tcp://localhost:5555");
    }

    // ── load / resolve_endpoint ───────────────────────────────────────────────

    #[test]
    fn load_reads_header_file() {
        let f = header_tempfile(COMMS_H);
        let ep = resolve_endpoint(f.path()).unwrap();
        assert_eq!(ep.to_string(), "tcp://127.0.0.1:62763");
    }

    #[test]
    fn missing_file_degrades_to_empty_definitions() {
        let defs = HeaderDefinitions::load(Path::new("/nonexistent/include/comms.h"));
        assert_eq!(defs, HeaderDefinitions::default());
        assert_eq!(defs.compose(), "None://None:None");
        assert_eq!(
            resolve_endpoint(Path::new("/nonexistent/include/comms.h")),
            Err(ConfigError::MissingKey("PROTOCOL"))
        );
    }
}
