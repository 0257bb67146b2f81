// siphon-rs - The Siphon SIP Stack
// Copyright (C) 2025 James Ferris <ferrous.communications@gmail.com>
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Resource-Priority and Accept-Resource-Priority value grammar
//! (RFC 4412).

use std::fmt;

use smol_str::SmolStr;

use crate::error::{GrammarError, ValueError};
use crate::reader::Reader;
use crate::value::HeaderValue;

/// One r-value: `namespace "." r-priority`, e.g. `q735.3` or `ets.0`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RValue {
    namespace: SmolStr,
    priority: SmolStr,
}

impl RValue {
    pub fn new(namespace: impl Into<SmolStr>, priority: impl Into<SmolStr>) -> Self {
        RValue {
            namespace: namespace.into(),
            priority: priority.into(),
        }
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn set_namespace(&mut self, namespace: &str) -> Result<(), ValueError> {
        if namespace.is_empty() || namespace.contains('.') {
            return Err(ValueError::new("priority namespace", namespace));
        }
        self.namespace = SmolStr::new(namespace);
        Ok(())
    }

    pub fn priority(&self) -> &str {
        &self.priority
    }

    pub fn set_priority(&mut self, priority: &str) -> Result<(), ValueError> {
        if priority.is_empty() {
            return Err(ValueError::new("priority level", priority));
        }
        self.priority = SmolStr::new(priority);
        Ok(())
    }
}

impl fmt::Display for RValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.namespace, self.priority)
    }
}

impl HeaderValue for RValue {
    fn parse(reader: &mut Reader<'_>) -> Result<Self, GrammarError> {
        reader.skip_ws();
        let word = reader.read_word().ok_or(GrammarError::Missing("r-value"))?;
        let (namespace, priority) = word.split_once('.').ok_or(GrammarError::Invalid {
            what: "r-value",
            value: SmolStr::new(&word),
        })?;
        if namespace.is_empty() || priority.is_empty() {
            return Err(GrammarError::Invalid {
                what: "r-value",
                value: SmolStr::new(&word),
            });
        }
        Ok(RValue {
            namespace: SmolStr::new(namespace),
            priority: SmolStr::new(priority),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_on_dot() {
        let r = RValue::parse_str("q735.3").unwrap();
        assert_eq!(r.namespace(), "q735");
        assert_eq!(r.priority(), "3");
        assert_eq!(r.render(), "q735.3");
    }

    #[test]
    fn requires_both_halves() {
        assert!(RValue::parse_str("ets").is_err());
        assert!(RValue::parse_str(".0").is_err());
    }
}
