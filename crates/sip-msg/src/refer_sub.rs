// siphon-rs - The Siphon SIP Stack
// Copyright (C) 2025 James Ferris <ferrous.communications@gmail.com>
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Refer-Sub value grammar (RFC 4488).

use std::fmt;

use smol_str::SmolStr;

use crate::error::GrammarError;
use crate::params::Params;
use crate::reader::Reader;
use crate::value::HeaderValue;

/// Refer-Sub: `("true" / "false") *(SEMI exten)`. `false` asks the
/// notifier not to create the implicit REFER subscription.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferSub {
    value: bool,
    params: Params,
}

impl ReferSub {
    pub fn new(value: bool) -> Self {
        ReferSub {
            value,
            params: Params::new(),
        }
    }

    pub fn value(&self) -> bool {
        self.value
    }

    pub fn set_value(&mut self, value: bool) {
        self.value = value;
    }

    pub fn params(&self) -> &Params {
        &self.params
    }

    pub fn params_mut(&mut self) -> &mut Params {
        &mut self.params
    }
}

impl fmt::Display for ReferSub {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", if self.value { "true" } else { "false" }, self.params)
    }
}

impl HeaderValue for ReferSub {
    fn parse(reader: &mut Reader<'_>) -> Result<Self, GrammarError> {
        reader.skip_ws();
        let word = reader.read_word().ok_or(GrammarError::Missing("refer-sub"))?;
        let value = match word.to_ascii_lowercase().as_str() {
            "true" => true,
            "false" => false,
            _ => {
                return Err(GrammarError::Invalid {
                    what: "refer-sub",
                    value: SmolStr::new(word),
                })
            }
        };
        let params = Params::parse(reader)?;
        Ok(ReferSub { value, params })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn true_and_false() {
        assert!(ReferSub::parse_str("true").unwrap().value());
        assert!(!ReferSub::parse_str("false").unwrap().value());
        assert!(ReferSub::parse_str("maybe").is_err());
    }

    #[test]
    fn renders_lowercase() {
        assert_eq!(ReferSub::new(false).render(), "false");
    }
}
