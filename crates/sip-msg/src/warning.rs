// siphon-rs - The Siphon SIP Stack
// Copyright (C) 2025 James Ferris <ferrous.communications@gmail.com>
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Warning value grammar.

use std::fmt;

use smol_str::SmolStr;

use crate::error::{GrammarError, ValueError};
use crate::reader::{quote_string, Reader};
use crate::value::HeaderValue;

/// One Warning value: `warn-code SP warn-agent SP warn-text` where the
/// code is three digits and the text is a quoted string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WarningValue {
    code: u16,
    agent: SmolStr,
    text: SmolStr,
}

impl WarningValue {
    pub fn new(code: u16, agent: impl Into<SmolStr>, text: impl Into<SmolStr>) -> Result<Self, ValueError> {
        if !(100..=999).contains(&code) {
            return Err(ValueError::new("warn code", code.to_string()));
        }
        Ok(WarningValue {
            code,
            agent: agent.into(),
            text: text.into(),
        })
    }

    pub fn code(&self) -> u16 {
        self.code
    }

    pub fn set_code(&mut self, code: u16) -> Result<(), ValueError> {
        if !(100..=999).contains(&code) {
            return Err(ValueError::new("warn code", code.to_string()));
        }
        self.code = code;
        Ok(())
    }

    /// The warn-agent, a hostport or pseudonym.
    pub fn agent(&self) -> &str {
        &self.agent
    }

    pub fn set_agent(&mut self, agent: &str) -> Result<(), ValueError> {
        if agent.is_empty() {
            return Err(ValueError::new("warn agent", agent));
        }
        self.agent = SmolStr::new(agent);
        Ok(())
    }

    /// The warn-text, stored unquoted.
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn set_text(&mut self, text: &str) {
        self.text = SmolStr::new(text);
    }
}

impl fmt::Display for WarningValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.code, self.agent, quote_string(&self.text))
    }
}

impl HeaderValue for WarningValue {
    fn parse(reader: &mut Reader<'_>) -> Result<Self, GrammarError> {
        reader.skip_ws();
        let code_word = reader.read_word().ok_or(GrammarError::Missing("warn code"))?;
        let code: u16 = code_word.parse().map_err(|_| GrammarError::Invalid {
            what: "warn code",
            value: code_word.clone().into(),
        })?;
        if !(100..=999).contains(&code) {
            return Err(GrammarError::Invalid {
                what: "warn code",
                value: code_word.into(),
            });
        }
        reader.skip_ws();
        let agent = reader.read_word().ok_or(GrammarError::Missing("warn agent"))?;
        reader.skip_ws();
        let text = reader.read_word().ok_or(GrammarError::Missing("warn text"))?;
        Ok(WarningValue {
            code,
            agent: SmolStr::new(agent),
            text: SmolStr::new(text),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_warning() {
        let w = WarningValue::parse_str("307 isi.edu \"Session parameter 'foo' not understood\"")
            .unwrap();
        assert_eq!(w.code(), 307);
        assert_eq!(w.agent(), "isi.edu");
        assert_eq!(w.text(), "Session parameter 'foo' not understood");
        assert_eq!(
            w.render(),
            "307 isi.edu \"Session parameter 'foo' not understood\""
        );
    }

    #[test]
    fn code_must_be_three_digits() {
        assert!(WarningValue::parse_str("99 host \"x\"").is_err());
        assert!(WarningValue::new(1000, "a", "b").is_err());
    }
}
