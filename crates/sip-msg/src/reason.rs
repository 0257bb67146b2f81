// siphon-rs - The Siphon SIP Stack
// Copyright (C) 2025 James Ferris <ferrous.communications@gmail.com>
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Reason value grammar (RFC 3326).

use std::fmt;

use smol_str::SmolStr;

use crate::error::{GrammarError, ValueError};
use crate::params::Params;
use crate::reader::Reader;
use crate::value::HeaderValue;

/// One Reason value: `protocol *(SEMI reason-params)` with the `cause`
/// and `text` parameters. The protocol is `SIP`, `Q.850` or a token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReasonValue {
    protocol: SmolStr,
    params: Params,
}

impl ReasonValue {
    pub fn new(protocol: impl Into<SmolStr>) -> Self {
        ReasonValue {
            protocol: protocol.into(),
            params: Params::new(),
        }
    }

    pub fn protocol(&self) -> &str {
        &self.protocol
    }

    pub fn set_protocol(&mut self, protocol: &str) -> Result<(), ValueError> {
        if protocol.is_empty() {
            return Err(ValueError::new("reason protocol", protocol));
        }
        self.protocol = SmolStr::new(protocol);
        Ok(())
    }

    pub fn params(&self) -> &Params {
        &self.params
    }

    pub fn params_mut(&mut self) -> &mut Params {
        &mut self.params
    }

    /// The `cause` parameter, a protocol cause code.
    pub fn cause(&self) -> Option<i32> {
        self.params.value_of("cause")?.parse().ok()
    }

    pub fn set_cause(&mut self, cause: Option<i32>) {
        match cause {
            None => self.params.remove("cause"),
            Some(c) => self.params.set("cause", Some(&c.to_string())),
        }
    }

    pub fn text(&self) -> Option<&str> {
        self.params.value_of("text")
    }

    pub fn set_text(&mut self, text: Option<&str>) {
        match text {
            None => self.params.remove("text"),
            Some(t) => self.params.set("text", Some(t)),
        }
    }
}

impl fmt::Display for ReasonValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.protocol, self.params)
    }
}

impl HeaderValue for ReasonValue {
    fn parse(reader: &mut Reader<'_>) -> Result<Self, GrammarError> {
        reader.skip_ws();
        let protocol = reader
            .read_word()
            .ok_or(GrammarError::Missing("reason protocol"))?;
        let params = Params::parse(reader)?;
        Ok(ReasonValue {
            protocol: SmolStr::new(protocol),
            params,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sip_reason() {
        let r = ReasonValue::parse_str("SIP;cause=200;text=\"Call completed elsewhere\"").unwrap();
        assert_eq!(r.protocol(), "SIP");
        assert_eq!(r.cause(), Some(200));
        assert_eq!(r.text(), Some("Call completed elsewhere"));
        assert_eq!(r.render(), "SIP;cause=200;text=\"Call completed elsewhere\"");
    }

    #[test]
    fn q850_reason() {
        let r = ReasonValue::parse_str("Q.850;cause=16").unwrap();
        assert_eq!(r.protocol(), "Q.850");
        assert_eq!(r.cause(), Some(16));
        assert_eq!(r.text(), None);
    }
}
