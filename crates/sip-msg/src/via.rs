// siphon-rs - The Siphon SIP Stack
// Copyright (C) 2025 James Ferris <ferrous.communications@gmail.com>
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The Via header value (`via-parm`, RFC 3261), plus the RFC 3581 `rport`
//! and RFC 3486 `comp` extensions.
//!
//! ```text
//! via-parm      = sent-protocol LWS sent-by *( SEMI via-params )
//! sent-protocol = protocol-name SLASH protocol-version SLASH transport
//! sent-by       = host [ COLON port ]
//! ```
//!
//! LWS is permitted on either side of the slashes, so
//! `SIP / 2.0 / UDP 127.0.0.1:5060` parses the same as
//! `SIP/2.0/UDP 127.0.0.1:5060`.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use smol_str::SmolStr;

use crate::error::{GrammarError, ValueError};
use crate::params::Params;
use crate::reader::Reader;
use crate::value::HeaderValue;

/// The branch cookie every RFC 3261 branch value must start with.
pub const BRANCH_MAGIC_COOKIE: &str = "z9hG4bK";

/// `host [ ":" port ]`, with bracketed IPv6 literals supported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostPort {
    host: SmolStr,
    port: Option<u16>,
}

impl HostPort {
    pub fn new(host: impl Into<SmolStr>, port: Option<u16>) -> Self {
        HostPort {
            host: host.into(),
            port,
        }
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> Option<u16> {
        self.port
    }

    pub fn parse(value: &str) -> Result<Self, GrammarError> {
        let value = value.trim();
        if value.is_empty() {
            return Err(GrammarError::Missing("host"));
        }
        let invalid = || GrammarError::Invalid {
            what: "host-port",
            value: SmolStr::new(value),
        };
        // IPv6 literal: [::1] or [::1]:5060
        if let Some(rest) = value.strip_prefix('[') {
            let end = rest.find(']').ok_or_else(invalid)?;
            let host = &value[..end + 2];
            let port = match &rest[end + 1..] {
                "" => None,
                p => Some(p.strip_prefix(':').ok_or_else(invalid)?.parse().map_err(|_| invalid())?),
            };
            return Ok(HostPort::new(host, port));
        }
        match value.split_once(':') {
            Some((host, port)) if !host.is_empty() => Ok(HostPort::new(
                host,
                Some(port.parse().map_err(|_| invalid())?),
            )),
            Some(_) => Err(invalid()),
            None => Ok(HostPort::new(value, None)),
        }
    }
}

impl fmt::Display for HostPort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.host)?;
        if let Some(port) = self.port {
            write!(f, ":{}", port)?;
        }
        Ok(())
    }
}

/// One Via header value.
#[derive(Debug, Clone, PartialEq)]
pub struct ViaParm {
    protocol_name: SmolStr,
    protocol_version: SmolStr,
    transport: SmolStr,
    sent_by: HostPort,
    params: Params,
}

impl Default for ViaParm {
    fn default() -> Self {
        ViaParm {
            protocol_name: SmolStr::new_static("SIP"),
            protocol_version: SmolStr::new_static("2.0"),
            transport: SmolStr::new_static("UDP"),
            sent_by: HostPort::new("localhost", None),
            params: Params::new(),
        }
    }
}

impl ViaParm {
    pub fn new(transport: &str, sent_by: HostPort) -> Self {
        ViaParm {
            transport: SmolStr::new(transport.to_ascii_uppercase()),
            sent_by,
            ..ViaParm::default()
        }
    }

    /// Creates a new branch parameter value starting with the magic cookie.
    pub fn create_branch() -> String {
        static COUNTER: AtomicU64 = AtomicU64::new(0);
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos())
            .unwrap_or(0);
        let n = COUNTER.fetch_add(1, Ordering::Relaxed);
        format!("{}-{:x}{:x}", BRANCH_MAGIC_COOKIE, nanos, n)
    }

    pub fn protocol_name(&self) -> &str {
        &self.protocol_name
    }

    pub fn protocol_version(&self) -> &str {
        &self.protocol_version
    }

    /// Sent-by transport token, always in upper case (UDP/TCP/TLS/SCTP/...).
    pub fn transport(&self) -> &str {
        &self.transport
    }

    pub fn set_transport(&mut self, transport: &str) -> Result<(), ValueError> {
        if transport.is_empty() {
            return Err(ValueError::new("Via transport", transport));
        }
        self.transport = SmolStr::new(transport.to_ascii_uppercase());
        Ok(())
    }

    pub fn sent_by(&self) -> &HostPort {
        &self.sent_by
    }

    pub fn set_sent_by(&mut self, sent_by: HostPort) {
        self.sent_by = sent_by;
    }

    /// Sent-by port, falling back to the transport default (5061 for TLS,
    /// 5060 otherwise) when none was given explicitly.
    pub fn sent_by_port_or_default(&self) -> u16 {
        self.sent_by.port().unwrap_or(if self.transport == "TLS" {
            5061
        } else {
            5060
        })
    }

    pub fn params(&self) -> &Params {
        &self.params
    }

    pub fn params_mut(&mut self) -> &mut Params {
        &mut self.params
    }

    /// The `branch` transaction identifier, if present.
    pub fn branch(&self) -> Option<&str> {
        self.params.value_of("branch")
    }

    /// Sets the `branch` parameter. `None` removes it; a value must start
    /// with the `z9hG4bK` magic cookie.
    pub fn set_branch(&mut self, branch: Option<&str>) -> Result<(), ValueError> {
        match branch {
            None => self.params.remove("branch"),
            Some(b) if b.starts_with(BRANCH_MAGIC_COOKIE) => self.params.set("branch", Some(b)),
            Some(b) => return Err(ValueError::new("Via branch", b)),
        }
        Ok(())
    }

    pub fn received(&self) -> Option<&str> {
        self.params.value_of("received")
    }

    pub fn set_received(&mut self, received: Option<&str>) {
        match received {
            None => self.params.remove("received"),
            Some(v) => self.params.set("received", Some(v)),
        }
    }

    /// The `rport` response port. `None` when absent, `Some(0)` for the
    /// bare request form (`;rport` without a value).
    pub fn rport(&self) -> Option<u16> {
        let p = self.params.get("rport")?;
        match p.value() {
            None | Some("") => Some(0),
            Some(v) => v.parse().ok(),
        }
    }

    pub fn set_rport(&mut self, rport: Option<u16>) {
        match rport {
            None => self.params.remove("rport"),
            Some(0) => self.params.set("rport", None),
            Some(port) => self.params.set("rport", Some(&port.to_string())),
        }
    }

    pub fn ttl(&self) -> Option<u8> {
        self.params.value_of("ttl")?.parse().ok()
    }

    pub fn set_ttl(&mut self, ttl: Option<u8>) {
        match ttl {
            None => self.params.remove("ttl"),
            Some(t) => self.params.set("ttl", Some(&t.to_string())),
        }
    }

    pub fn maddr(&self) -> Option<&str> {
        self.params.value_of("maddr")
    }

    pub fn set_maddr(&mut self, maddr: Option<&str>) {
        match maddr {
            None => self.params.remove("maddr"),
            Some(v) => self.params.set("maddr", Some(v)),
        }
    }

    pub fn comp(&self) -> Option<&str> {
        self.params.value_of("comp")
    }
}

impl fmt::Display for ViaParm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{}/{} {}{}",
            self.protocol_name, self.protocol_version, self.transport, self.sent_by, self.params
        )
    }
}

impl HeaderValue for ViaParm {
    fn parse(reader: &mut Reader<'_>) -> Result<Self, GrammarError> {
        reader.skip_ws();
        let name = reader.read_to_delimiter(&['/']).trim();
        if name.is_empty() {
            return Err(GrammarError::Missing("Via protocol-name"));
        }
        let protocol_name = SmolStr::new(name);
        if !reader.consume('/') {
            return Err(GrammarError::Missing("Via protocol-version"));
        }
        let version = reader.read_to_delimiter(&['/']).trim();
        if version.is_empty() {
            return Err(GrammarError::Missing("Via protocol-version"));
        }
        let protocol_version = SmolStr::new(version);
        if !reader.consume('/') {
            return Err(GrammarError::Missing("Via transport"));
        }
        let transport = reader
            .read_word()
            .ok_or(GrammarError::Missing("Via transport"))?;
        let sent_by = reader.read_to_delimiter(&[';', ',']).trim().to_string();
        if sent_by.is_empty() {
            return Err(GrammarError::Missing("Via sent-by"));
        }
        let sent_by = HostPort::parse(&sent_by)?;
        let params = Params::parse(reader)?;
        Ok(ViaParm {
            protocol_name,
            protocol_version,
            transport: SmolStr::new(transport.to_ascii_uppercase()),
            sent_by,
            params,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_plain_via() {
        let via = ViaParm::parse_str("SIP/2.0/UDP 127.0.0.1:58716;branch=z9hG4bK-d87543-1").unwrap();
        assert_eq!(via.protocol_name(), "SIP");
        assert_eq!(via.protocol_version(), "2.0");
        assert_eq!(via.transport(), "UDP");
        assert_eq!(via.sent_by().host(), "127.0.0.1");
        assert_eq!(via.sent_by().port(), Some(58716));
        assert_eq!(via.branch(), Some("z9hG4bK-d87543-1"));
    }

    #[test]
    fn whitespace_around_slashes_is_allowed() {
        let via = ViaParm::parse_str("SIP / 2.0 / UDP first.example.com:4000;ttl=16;maddr=224.2.0.1").unwrap();
        assert_eq!(via.transport(), "UDP");
        assert_eq!(via.sent_by().host(), "first.example.com");
        assert_eq!(via.ttl(), Some(16));
        assert_eq!(via.maddr(), Some("224.2.0.1"));
    }

    #[test]
    fn render_normalizes_slash_whitespace() {
        let via = ViaParm::parse_str("SIP / 2.0 / TCP host").unwrap();
        assert_eq!(via.render(), "SIP/2.0/TCP host");
    }

    #[test]
    fn branch_requires_magic_cookie() {
        let mut via = ViaParm::default();
        assert!(via.set_branch(Some("badcookie-1")).is_err());
        assert_eq!(via.branch(), None);
        via.set_branch(Some("z9hG4bK-ok")).unwrap();
        assert_eq!(via.branch(), Some("z9hG4bK-ok"));
    }

    #[test]
    fn created_branches_carry_cookie_and_differ() {
        let a = ViaParm::create_branch();
        let b = ViaParm::create_branch();
        assert!(a.starts_with(BRANCH_MAGIC_COOKIE));
        assert_ne!(a, b);
    }

    #[test]
    fn rport_forms() {
        let via = ViaParm::parse_str("SIP/2.0/UDP host;rport").unwrap();
        assert_eq!(via.rport(), Some(0));
        let via = ViaParm::parse_str("SIP/2.0/UDP host;rport=5061").unwrap();
        assert_eq!(via.rport(), Some(5061));

        let mut via = ViaParm::default();
        via.set_rport(Some(0));
        assert!(via.render().ends_with(";rport"));
    }

    #[test]
    fn default_ports_by_transport() {
        let udp = ViaParm::parse_str("SIP/2.0/UDP host").unwrap();
        assert_eq!(udp.sent_by_port_or_default(), 5060);
        let tls = ViaParm::parse_str("SIP/2.0/TLS host").unwrap();
        assert_eq!(tls.sent_by_port_or_default(), 5061);
    }

    #[test]
    fn ipv6_sent_by() {
        let via = ViaParm::parse_str("SIP/2.0/TCP [2001:db8::9:1]:5060;branch=z9hG4bK-x").unwrap();
        assert_eq!(via.sent_by().host(), "[2001:db8::9:1]");
        assert_eq!(via.sent_by().port(), Some(5060));
        assert_eq!(via.sent_by().to_string(), "[2001:db8::9:1]:5060");
    }
}
