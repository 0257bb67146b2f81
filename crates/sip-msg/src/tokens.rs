// siphon-rs - The Siphon SIP Stack
// Copyright (C) 2025 James Ferris <ferrous.communications@gmail.com>
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Bare-token header values.
//!
//! `Supported`, `Require`, `Proxy-Require`, `Unsupported` (option-tag),
//! `Content-Encoding` (content-coding), `Content-Language` (language-tag)
//! and `Allow-Events` (event-type) all share the same trivial grammar: one
//! token per value, comma-separated on the wire.

use std::fmt;

use smol_str::SmolStr;

use crate::error::GrammarError;
use crate::reader::Reader;
use crate::value::HeaderValue;

/// A single bare token value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenValue(SmolStr);

impl TokenValue {
    pub fn new(token: impl Into<SmolStr>) -> Self {
        TokenValue(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TokenValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl HeaderValue for TokenValue {
    fn parse(reader: &mut Reader<'_>) -> Result<Self, GrammarError> {
        // Event-types allow dotted packages (e.g. "presence.winfo"), which
        // read_word already accepts.
        let token = reader.read_word().ok_or(GrammarError::Missing("token"))?;
        Ok(TokenValue(SmolStr::new(token)))
    }
}

/// A Call-ID value (`word [ "@" word ]`), used by `In-Reply-To` and as the
/// head production of Join/Replaces/Target-Dialog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallId(SmolStr);

impl CallId {
    pub fn new(call_id: impl Into<SmolStr>) -> Self {
        CallId(call_id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CallId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl HeaderValue for CallId {
    fn parse(reader: &mut Reader<'_>) -> Result<Self, GrammarError> {
        reader.skip_ws();
        let word = reader.read_to_delimiter(&[';', ',']).trim();
        if word.is_empty() {
            return Err(GrammarError::Missing("callid"));
        }
        Ok(CallId(SmolStr::new(word)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn call_id_keeps_at_sign() {
        let id = CallId::parse_str("a84b4c76e66710@pc33.atlanta.com").unwrap();
        assert_eq!(id.as_str(), "a84b4c76e66710@pc33.atlanta.com");
    }

    #[test]
    fn call_id_stops_at_semicolon() {
        let mut r = Reader::new("425928@bobster.example.org;to-tag=7743");
        let id = CallId::parse(&mut r).unwrap();
        assert_eq!(id.as_str(), "425928@bobster.example.org");
        assert!(r.starts_with(';'));
    }

    #[test]
    fn dotted_event_type_token() {
        let t = TokenValue::parse_str("presence.winfo").unwrap();
        assert_eq!(t.as_str(), "presence.winfo");
    }
}
