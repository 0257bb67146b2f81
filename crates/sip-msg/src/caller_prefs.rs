// siphon-rs - The Siphon SIP Stack
// Copyright (C) 2025 James Ferris <ferrous.communications@gmail.com>
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Caller preferences (RFC 3841): Accept-Contact, Reject-Contact and
//! Request-Disposition value grammars.

use std::fmt;

use smol_str::SmolStr;

use crate::error::{GrammarError, ValueError};
use crate::params::Params;
use crate::reader::Reader;
use crate::value::HeaderValue;

/// One Accept-Contact value: `"*" *(SEMI ac-params)`. The star is
/// mandatory; the feature set lives entirely in the parameters.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AcValue {
    params: Params,
}

impl AcValue {
    pub fn new() -> Self {
        AcValue::default()
    }

    pub fn params(&self) -> &Params {
        &self.params
    }

    pub fn params_mut(&mut self) -> &mut Params {
        &mut self.params
    }
}

impl fmt::Display for AcValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "*{}", self.params)
    }
}

impl HeaderValue for AcValue {
    fn parse(reader: &mut Reader<'_>) -> Result<Self, GrammarError> {
        reader.skip_ws();
        if !reader.consume('*') {
            return Err(GrammarError::Invalid {
                what: "ac-value",
                value: SmolStr::new(reader.rest()),
            });
        }
        let params = Params::parse(reader)?;
        Ok(AcValue { params })
    }
}

/// One Reject-Contact value: `"*" *(SEMI rc-params)`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RcValue {
    params: Params,
}

impl RcValue {
    pub fn new() -> Self {
        RcValue::default()
    }

    pub fn params(&self) -> &Params {
        &self.params
    }

    pub fn params_mut(&mut self) -> &mut Params {
        &mut self.params
    }
}

impl fmt::Display for RcValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "*{}", self.params)
    }
}

impl HeaderValue for RcValue {
    fn parse(reader: &mut Reader<'_>) -> Result<Self, GrammarError> {
        reader.skip_ws();
        if !reader.consume('*') {
            return Err(GrammarError::Invalid {
                what: "rc-value",
                value: SmolStr::new(reader.rest()),
            });
        }
        let params = Params::parse(reader)?;
        Ok(RcValue { params })
    }
}

/// One Request-Disposition directive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Directive {
    Proxy,
    Redirect,
    Cancel,
    NoCancel,
    Fork,
    NoFork,
    Recurse,
    NoRecurse,
    Parallel,
    Sequential,
    Queue,
    NoQueue,
}

impl Directive {
    pub fn as_str(&self) -> &'static str {
        match self {
            Directive::Proxy => "proxy",
            Directive::Redirect => "redirect",
            Directive::Cancel => "cancel",
            Directive::NoCancel => "no-cancel",
            Directive::Fork => "fork",
            Directive::NoFork => "no-fork",
            Directive::Recurse => "recurse",
            Directive::NoRecurse => "no-recurse",
            Directive::Parallel => "parallel",
            Directive::Sequential => "sequential",
            Directive::Queue => "queue",
            Directive::NoQueue => "no-queue",
        }
    }

    pub fn from_token(token: &str) -> Result<Self, ValueError> {
        Ok(match token.to_ascii_lowercase().as_str() {
            "proxy" => Directive::Proxy,
            "redirect" => Directive::Redirect,
            "cancel" => Directive::Cancel,
            "no-cancel" => Directive::NoCancel,
            "fork" => Directive::Fork,
            "no-fork" => Directive::NoFork,
            "recurse" => Directive::Recurse,
            "no-recurse" => Directive::NoRecurse,
            "parallel" => Directive::Parallel,
            "sequential" => Directive::Sequential,
            "queue" => Directive::Queue,
            "no-queue" => Directive::NoQueue,
            _ => return Err(ValueError::new("directive", token)),
        })
    }
}

impl fmt::Display for Directive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl HeaderValue for Directive {
    fn parse(reader: &mut Reader<'_>) -> Result<Self, GrammarError> {
        reader.skip_ws();
        let token = reader.read_word().ok_or(GrammarError::Missing("directive"))?;
        Directive::from_token(&token).map_err(|_| GrammarError::Invalid {
            what: "directive",
            value: SmolStr::new(token),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accept_contact_requires_star() {
        let v = AcValue::parse_str("*;audio;require").unwrap();
        assert!(v.params().contains("audio"));
        assert!(v.params().contains("require"));
        assert_eq!(v.render(), "*;audio;require");
        assert!(AcValue::parse_str("sip:a@b").is_err());
    }

    #[test]
    fn reject_contact_feature_params() {
        let v = RcValue::parse_str("*;actor=\"msg-taker\"").unwrap();
        assert_eq!(v.params().value_of("actor"), Some("msg-taker"));
    }

    #[test]
    fn directive_closed_set() {
        assert_eq!(Directive::parse_str("no-fork").unwrap(), Directive::NoFork);
        assert_eq!(Directive::parse_str("Proxy").unwrap(), Directive::Proxy);
        assert!(Directive::parse_str("teleport").is_err());
        assert_eq!(Directive::NoQueue.render(), "no-queue");
    }
}
