// siphon-rs - The Siphon SIP Stack
// Copyright (C) 2025 James Ferris <ferrous.communications@gmail.com>
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Identity-Info value grammar (RFC 4474).

use std::fmt;

use smol_str::SmolStr;

use crate::error::{GrammarError, ValueError};
use crate::params::Params;
use crate::reader::Reader;
use crate::value::HeaderValue;

/// Identity-Info: `LAQUOT absoluteURI RAQUOT *(SEMI ident-info-params)`
/// with the `alg` parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityInfo {
    uri: SmolStr,
    params: Params,
}

impl IdentityInfo {
    pub fn new(uri: impl Into<SmolStr>) -> Self {
        IdentityInfo {
            uri: uri.into(),
            params: Params::new(),
        }
    }

    /// The URI of the certificate used to sign the request.
    pub fn uri(&self) -> &str {
        &self.uri
    }

    pub fn set_uri(&mut self, uri: &str) -> Result<(), ValueError> {
        if uri.is_empty() {
            return Err(ValueError::new("identity info uri", uri));
        }
        self.uri = SmolStr::new(uri);
        Ok(())
    }

    pub fn params(&self) -> &Params {
        &self.params
    }

    pub fn params_mut(&mut self) -> &mut Params {
        &mut self.params
    }

    /// The signature algorithm, e.g. `rsa-sha1`.
    pub fn alg(&self) -> Option<&str> {
        self.params.value_of("alg")
    }

    pub fn set_alg(&mut self, alg: Option<&str>) {
        match alg {
            None => self.params.remove("alg"),
            Some(a) => self.params.set("alg", Some(a)),
        }
    }
}

impl fmt::Display for IdentityInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}>{}", self.uri, self.params)
    }
}

impl HeaderValue for IdentityInfo {
    fn parse(reader: &mut Reader<'_>) -> Result<Self, GrammarError> {
        let uri = reader
            .read_parenthesized()
            .ok_or(GrammarError::Missing("identity info uri"))?;
        let params = Params::parse(reader)?;
        Ok(IdentityInfo {
            uri: SmolStr::new(uri.trim()),
            params,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uri_and_alg() {
        let i = IdentityInfo::parse_str("<https://atlanta.example.com/atlanta.cer>;alg=rsa-sha1")
            .unwrap();
        assert_eq!(i.uri(), "https://atlanta.example.com/atlanta.cer");
        assert_eq!(i.alg(), Some("rsa-sha1"));
        assert_eq!(
            i.render(),
            "<https://atlanta.example.com/atlanta.cer>;alg=rsa-sha1"
        );
    }

    #[test]
    fn bare_uri_rejected() {
        assert!(IdentityInfo::parse_str("https://example.com/cert.cer").is_err());
    }
}
