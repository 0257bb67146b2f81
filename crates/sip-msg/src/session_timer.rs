// siphon-rs - The Siphon SIP Stack
// Copyright (C) 2025 James Ferris <ferrous.communications@gmail.com>
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Session timer header values (RFC 4028).
//!
//! Session timers let the two ends of a dialog agree on a keep-alive
//! interval: `Session-Expires` carries the negotiated interval and which
//! side refreshes, `Min-SE` the minimum interval a proxy or UAS will
//! accept. RFC 4028 sets the floor for both at 90 seconds; this module
//! stores what is on the wire and leaves policy to the caller.

use std::fmt;

use crate::error::{GrammarError, ValueError};
use crate::params::Params;
use crate::reader::Reader;
use crate::value::HeaderValue;

/// Which side is responsible for sending refresh requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Refresher {
    Uac,
    Uas,
}

impl Refresher {
    pub fn as_str(&self) -> &'static str {
        match self {
            Refresher::Uac => "uac",
            Refresher::Uas => "uas",
        }
    }
}

/// Session-Expires: `delta-seconds *(SEMI se-params)` with the
/// `refresher` parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionExpires {
    expires: u32,
    params: Params,
}

impl SessionExpires {
    pub fn new(expires: u32) -> Result<Self, ValueError> {
        if expires == 0 {
            return Err(ValueError::new("session expires", expires.to_string()));
        }
        Ok(SessionExpires {
            expires,
            params: Params::new(),
        })
    }

    /// The session interval in seconds. Always at least 1.
    pub fn expires(&self) -> u32 {
        self.expires
    }

    pub fn set_expires(&mut self, expires: u32) -> Result<(), ValueError> {
        if expires == 0 {
            return Err(ValueError::new("session expires", expires.to_string()));
        }
        self.expires = expires;
        Ok(())
    }

    pub fn params(&self) -> &Params {
        &self.params
    }

    pub fn params_mut(&mut self) -> &mut Params {
        &mut self.params
    }

    /// The `refresher` parameter. `None` when absent or not `uac`/`uas`.
    pub fn refresher(&self) -> Option<Refresher> {
        match self.params.value_of("refresher")? {
            r if r.eq_ignore_ascii_case("uac") => Some(Refresher::Uac),
            r if r.eq_ignore_ascii_case("uas") => Some(Refresher::Uas),
            _ => None,
        }
    }

    pub fn set_refresher(&mut self, refresher: Option<Refresher>) {
        match refresher {
            None => self.params.remove("refresher"),
            Some(r) => self.params.set("refresher", Some(r.as_str())),
        }
    }
}

impl fmt::Display for SessionExpires {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.expires, self.params)
    }
}

impl HeaderValue for SessionExpires {
    fn parse(reader: &mut Reader<'_>) -> Result<Self, GrammarError> {
        reader.skip_ws();
        let word = reader
            .read_word()
            .ok_or(GrammarError::Missing("session expires"))?;
        let expires: u32 = word.parse().map_err(|_| GrammarError::Invalid {
            what: "session expires",
            value: word.clone().into(),
        })?;
        if expires == 0 {
            return Err(GrammarError::Invalid {
                what: "session expires",
                value: word.into(),
            });
        }
        let params = Params::parse(reader)?;
        Ok(SessionExpires { expires, params })
    }
}

/// Min-SE: `delta-seconds *(SEMI generic-param)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MinSe {
    seconds: u32,
    params: Params,
}

impl MinSe {
    pub fn new(seconds: u32) -> Self {
        MinSe {
            seconds,
            params: Params::new(),
        }
    }

    pub fn seconds(&self) -> u32 {
        self.seconds
    }

    pub fn set_seconds(&mut self, seconds: u32) {
        self.seconds = seconds;
    }

    pub fn params(&self) -> &Params {
        &self.params
    }

    pub fn params_mut(&mut self) -> &mut Params {
        &mut self.params
    }
}

impl fmt::Display for MinSe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.seconds, self.params)
    }
}

impl HeaderValue for MinSe {
    fn parse(reader: &mut Reader<'_>) -> Result<Self, GrammarError> {
        reader.skip_ws();
        let word = reader.read_word().ok_or(GrammarError::Missing("min-se"))?;
        let seconds: u32 = word.parse().map_err(|_| GrammarError::Invalid {
            what: "min-se",
            value: word.into(),
        })?;
        let params = Params::parse(reader)?;
        Ok(MinSe { seconds, params })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_expires_with_refresher() {
        let se = SessionExpires::parse_str("1800;refresher=uas").unwrap();
        assert_eq!(se.expires(), 1800);
        assert_eq!(se.refresher(), Some(Refresher::Uas));
        assert_eq!(se.render(), "1800;refresher=uas");
    }

    #[test]
    fn zero_interval_rejected() {
        assert!(SessionExpires::parse_str("0").is_err());
        assert!(SessionExpires::new(0).is_err());
        let mut se = SessionExpires::new(90).unwrap();
        assert!(se.set_expires(0).is_err());
        assert_eq!(se.expires(), 90);
    }

    #[test]
    fn min_se_plain() {
        let m = MinSe::parse_str("90").unwrap();
        assert_eq!(m.seconds(), 90);
        assert_eq!(m.render(), "90");
    }
}
