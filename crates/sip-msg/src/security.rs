// siphon-rs - The Siphon SIP Stack
// Copyright (C) 2025 James Ferris <ferrous.communications@gmail.com>
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Security agreement value grammar (RFC 3329): Security-Client,
//! Security-Server and Security-Verify.

use std::fmt;

use smol_str::SmolStr;

use crate::error::{GrammarError, ValueError};
use crate::params::{parse_qvalue, Params};
use crate::reader::Reader;
use crate::value::HeaderValue;

/// One security mechanism: `mechanism-name *(SEMI mech-parameters)` with
/// the `q`, `d-alg`, `d-qop` and `d-ver` parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecMechanism {
    mechanism: SmolStr,
    params: Params,
}

impl SecMechanism {
    pub fn new(mechanism: impl Into<SmolStr>) -> Self {
        SecMechanism {
            mechanism: mechanism.into(),
            params: Params::new(),
        }
    }

    /// The mechanism name, e.g. `digest`, `tls` or `ipsec-3gpp`.
    pub fn mechanism(&self) -> &str {
        &self.mechanism
    }

    pub fn set_mechanism(&mut self, mechanism: &str) -> Result<(), ValueError> {
        if mechanism.is_empty() {
            return Err(ValueError::new("security mechanism", mechanism));
        }
        self.mechanism = SmolStr::new(mechanism);
        Ok(())
    }

    pub fn params(&self) -> &Params {
        &self.params
    }

    pub fn params_mut(&mut self) -> &mut Params {
        &mut self.params
    }

    pub fn qvalue(&self) -> Option<f32> {
        parse_qvalue(self.params.value_of("q")?)
    }

    pub fn set_qvalue(&mut self, q: Option<f32>) -> Result<(), ValueError> {
        match q {
            None => self.params.remove("q"),
            Some(q) if (0.0..=1.0).contains(&q) => self.params.set("q", Some(&q.to_string())),
            Some(q) => return Err(ValueError::new("q", q.to_string())),
        }
        Ok(())
    }

    pub fn d_alg(&self) -> Option<&str> {
        self.params.value_of("d-alg")
    }

    pub fn set_d_alg(&mut self, v: Option<&str>) {
        match v {
            None => self.params.remove("d-alg"),
            Some(v) => self.params.set("d-alg", Some(v)),
        }
    }

    pub fn d_qop(&self) -> Option<&str> {
        self.params.value_of("d-qop")
    }

    pub fn set_d_qop(&mut self, v: Option<&str>) {
        match v {
            None => self.params.remove("d-qop"),
            Some(v) => self.params.set("d-qop", Some(v)),
        }
    }

    pub fn d_ver(&self) -> Option<&str> {
        self.params.value_of("d-ver")
    }

    pub fn set_d_ver(&mut self, v: Option<&str>) {
        match v {
            None => self.params.remove("d-ver"),
            Some(v) => self.params.set("d-ver", Some(v)),
        }
    }
}

impl fmt::Display for SecMechanism {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.mechanism, self.params)
    }
}

impl HeaderValue for SecMechanism {
    fn parse(reader: &mut Reader<'_>) -> Result<Self, GrammarError> {
        reader.skip_ws();
        let mechanism = reader
            .read_word()
            .ok_or(GrammarError::Missing("security mechanism"))?;
        let params = Params::parse(reader)?;
        Ok(SecMechanism {
            mechanism: SmolStr::new(mechanism),
            params,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digest_mechanism() {
        let m = SecMechanism::parse_str("digest;q=0.5;d-ver=\"0000000000000000\"").unwrap();
        assert_eq!(m.mechanism(), "digest");
        assert_eq!(m.qvalue(), Some(0.5));
        assert_eq!(m.d_ver(), Some("0000000000000000"));
    }

    #[test]
    fn ipsec_params_pass_through() {
        let m = SecMechanism::parse_str("ipsec-3gpp;alg=hmac-sha-1-96;spi-c=23456789").unwrap();
        assert_eq!(m.params().value_of("alg"), Some("hmac-sha-1-96"));
        assert_eq!(m.params().value_of("spi-c"), Some("23456789"));
    }
}
