// siphon-rs - The Siphon SIP Stack
// Copyright (C) 2025 James Ferris <ferrous.communications@gmail.com>
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Authentication header values.
//!
//! These use comma-separated `name=value` auth-params rather than the
//! semicolon parameter grammar, so [`Credentials`] and [`Challenge`] keep
//! the part after the scheme token as an opaque string. Computing or
//! verifying digests is out of scope here.

use std::fmt;

use smol_str::SmolStr;

use crate::error::{GrammarError, ValueError};
use crate::reader::{quote_string, unquote, Reader};
use crate::value::HeaderValue;

/// Authorization / Proxy-Authorization: `credentials = ("Digest" LWS
/// digest-response) / other-response`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    method: SmolStr,
    auth_data: SmolStr,
}

impl Credentials {
    pub fn new(method: impl Into<SmolStr>, auth_data: impl Into<SmolStr>) -> Self {
        Credentials {
            method: method.into(),
            auth_data: auth_data.into(),
        }
    }

    /// The authentication scheme, normally `Digest`.
    pub fn method(&self) -> &str {
        &self.method
    }

    pub fn set_method(&mut self, method: &str) -> Result<(), ValueError> {
        if method.is_empty() {
            return Err(ValueError::new("auth method", method));
        }
        self.method = SmolStr::new(method);
        Ok(())
    }

    /// The auth-params, kept verbatim.
    pub fn auth_data(&self) -> &str {
        &self.auth_data
    }

    pub fn set_auth_data(&mut self, auth_data: &str) {
        self.auth_data = SmolStr::new(auth_data);
    }
}

impl fmt::Display for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.method, self.auth_data)
    }
}

impl HeaderValue for Credentials {
    fn parse(reader: &mut Reader<'_>) -> Result<Self, GrammarError> {
        reader.skip_ws();
        let method = reader
            .read_word()
            .ok_or(GrammarError::Missing("auth method"))?;
        let auth_data = reader.read_to_end().trim().to_owned();
        if auth_data.is_empty() {
            return Err(GrammarError::Missing("auth data"));
        }
        Ok(Credentials {
            method: SmolStr::new(method),
            auth_data: SmolStr::new(auth_data),
        })
    }
}

/// WWW-Authenticate / Proxy-Authenticate challenge. Same shape as
/// [`Credentials`]; kept as a distinct type so the header registry can
/// bind them separately.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Challenge {
    method: SmolStr,
    auth_data: SmolStr,
}

impl Challenge {
    pub fn new(method: impl Into<SmolStr>, auth_data: impl Into<SmolStr>) -> Self {
        Challenge {
            method: method.into(),
            auth_data: auth_data.into(),
        }
    }

    pub fn method(&self) -> &str {
        &self.method
    }

    pub fn set_method(&mut self, method: &str) -> Result<(), ValueError> {
        if method.is_empty() {
            return Err(ValueError::new("auth method", method));
        }
        self.method = SmolStr::new(method);
        Ok(())
    }

    pub fn auth_data(&self) -> &str {
        &self.auth_data
    }

    pub fn set_auth_data(&mut self, auth_data: &str) {
        self.auth_data = SmolStr::new(auth_data);
    }
}

impl fmt::Display for Challenge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.method, self.auth_data)
    }
}

impl HeaderValue for Challenge {
    fn parse(reader: &mut Reader<'_>) -> Result<Self, GrammarError> {
        reader.skip_ws();
        let method = reader
            .read_word()
            .ok_or(GrammarError::Missing("auth method"))?;
        let auth_data = reader.read_to_end().trim().to_owned();
        if auth_data.is_empty() {
            return Err(GrammarError::Missing("auth data"));
        }
        Ok(Challenge {
            method: SmolStr::new(method),
            auth_data: SmolStr::new(auth_data),
        })
    }
}

/// Authentication-Info: `ainfo *(COMMA ainfo)` where `ainfo` is one of
/// `nextnonce`, `qop`, `rspauth`, `cnonce` and `nc`. Unknown params are
/// ignored on parse.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AuthenticationInfo {
    next_nonce: Option<SmolStr>,
    qop: Option<SmolStr>,
    rsp_auth: Option<SmolStr>,
    cnonce: Option<SmolStr>,
    // nonce count stays a string to preserve its 8LHEX form.
    nonce_count: Option<SmolStr>,
}

impl AuthenticationInfo {
    pub fn new() -> Self {
        AuthenticationInfo::default()
    }

    pub fn next_nonce(&self) -> Option<&str> {
        self.next_nonce.as_deref()
    }

    pub fn set_next_nonce(&mut self, v: Option<&str>) {
        self.next_nonce = v.map(SmolStr::new);
    }

    pub fn qop(&self) -> Option<&str> {
        self.qop.as_deref()
    }

    pub fn set_qop(&mut self, v: Option<&str>) {
        self.qop = v.map(SmolStr::new);
    }

    pub fn rsp_auth(&self) -> Option<&str> {
        self.rsp_auth.as_deref()
    }

    pub fn set_rsp_auth(&mut self, v: Option<&str>) {
        self.rsp_auth = v.map(SmolStr::new);
    }

    pub fn cnonce(&self) -> Option<&str> {
        self.cnonce.as_deref()
    }

    pub fn set_cnonce(&mut self, v: Option<&str>) {
        self.cnonce = v.map(SmolStr::new);
    }

    pub fn nonce_count(&self) -> Option<&str> {
        self.nonce_count.as_deref()
    }

    pub fn set_nonce_count(&mut self, v: Option<&str>) {
        self.nonce_count = v.map(SmolStr::new);
    }
}

impl fmt::Display for AuthenticationInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        let mut sep = |f: &mut fmt::Formatter<'_>| -> fmt::Result {
            if first {
                first = false;
                Ok(())
            } else {
                f.write_str(",")
            }
        };
        if let Some(v) = &self.next_nonce {
            sep(f)?;
            write!(f, "nextnonce={}", quote_string(v))?;
        }
        if let Some(v) = &self.qop {
            sep(f)?;
            write!(f, "qop={}", v)?;
        }
        if let Some(v) = &self.rsp_auth {
            sep(f)?;
            write!(f, "rspauth={}", quote_string(v))?;
        }
        if let Some(v) = &self.cnonce {
            sep(f)?;
            write!(f, "cnonce={}", quote_string(v))?;
        }
        if let Some(v) = &self.nonce_count {
            sep(f)?;
            write!(f, "nc={}", v)?;
        }
        Ok(())
    }
}

impl HeaderValue for AuthenticationInfo {
    fn parse(reader: &mut Reader<'_>) -> Result<Self, GrammarError> {
        let mut info = AuthenticationInfo::new();
        loop {
            reader.skip_ws();
            if reader.is_empty() {
                break;
            }
            let segment = reader.read_to_delimiter(&[',']).trim();
            reader.consume(',');
            if segment.is_empty() {
                continue;
            }
            let (name, value) = segment
                .split_once('=')
                .ok_or(GrammarError::Invalid {
                    what: "auth info param",
                    value: SmolStr::new(segment),
                })?;
            let value = unquote(value.trim());
            match name.trim().to_ascii_lowercase().as_str() {
                "nextnonce" => info.next_nonce = Some(SmolStr::new(&value)),
                "qop" => info.qop = Some(SmolStr::new(&value)),
                "rspauth" => info.rsp_auth = Some(SmolStr::new(&value)),
                "cnonce" => info.cnonce = Some(SmolStr::new(&value)),
                "nc" => info.nonce_count = Some(SmolStr::new(&value)),
                _ => {}
            }
        }
        Ok(info)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn credentials_keep_auth_data_verbatim() {
        let c = Credentials::parse_str(
            "Digest username=\"bob\", realm=\"biloxi.com\", nonce=\"ea9c8e88\", response=\"6629fae4\"",
        )
        .unwrap();
        assert_eq!(c.method(), "Digest");
        assert_eq!(
            c.auth_data(),
            "username=\"bob\", realm=\"biloxi.com\", nonce=\"ea9c8e88\", response=\"6629fae4\""
        );
    }

    #[test]
    fn challenge_requires_data() {
        let c = Challenge::parse_str("Digest realm=\"atlanta.com\", qop=\"auth\", nonce=\"f84f1ceb\"")
            .unwrap();
        assert_eq!(c.method(), "Digest");
        assert!(Challenge::parse_str("Digest").is_err());
    }

    #[test]
    fn authentication_info_named_fields() {
        let a = AuthenticationInfo::parse_str(
            "nextnonce=\"47364c23432d2e131a5fb210812c\",qop=auth,rspauth=\"abc\",nc=00000001",
        )
        .unwrap();
        assert_eq!(a.next_nonce(), Some("47364c23432d2e131a5fb210812c"));
        assert_eq!(a.qop(), Some("auth"));
        assert_eq!(a.rsp_auth(), Some("abc"));
        assert_eq!(a.nonce_count(), Some("00000001"));
        assert_eq!(
            a.render(),
            "nextnonce=\"47364c23432d2e131a5fb210812c\",qop=auth,rspauth=\"abc\",nc=00000001"
        );
    }
}
