// siphon-rs - The Siphon SIP Stack
// Copyright (C) 2025 James Ferris <ferrous.communications@gmail.com>
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Timestamp value grammar.

use std::fmt;

use crate::error::GrammarError;
use crate::reader::Reader;
use crate::value::HeaderValue;

/// Timestamp: `1*DIGIT ["." *DIGIT] [LWS delay]`. The value echoes the
/// request's timestamp back in the response; `delay` is how long the UAS
/// sat on the request.
#[derive(Debug, Clone, PartialEq)]
pub struct Timestamp {
    time: f64,
    delay: Option<f64>,
}

impl Timestamp {
    pub fn new(time: f64) -> Self {
        Timestamp { time, delay: None }
    }

    pub fn time(&self) -> f64 {
        self.time
    }

    pub fn set_time(&mut self, time: f64) {
        self.time = time;
    }

    pub fn delay(&self) -> Option<f64> {
        self.delay
    }

    pub fn set_delay(&mut self, delay: Option<f64>) {
        self.delay = delay;
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.time)?;
        if let Some(delay) = self.delay {
            write!(f, " {}", delay)?;
        }
        Ok(())
    }
}

impl HeaderValue for Timestamp {
    fn parse(reader: &mut Reader<'_>) -> Result<Self, GrammarError> {
        reader.skip_ws();
        let word = reader
            .read_word()
            .ok_or(GrammarError::Missing("timestamp"))?;
        let time: f64 = word.parse().map_err(|_| GrammarError::Invalid {
            what: "timestamp",
            value: word.into(),
        })?;
        reader.skip_ws();
        let delay = match reader.read_word() {
            None => None,
            Some(word) => Some(word.parse().map_err(|_| GrammarError::Invalid {
                what: "timestamp delay",
                value: word.into(),
            })?),
        };
        Ok(Timestamp { time, delay })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn time_only() {
        let t = Timestamp::parse_str("54").unwrap();
        assert_eq!(t.time(), 54.0);
        assert_eq!(t.delay(), None);
        assert_eq!(t.render(), "54");
    }

    #[test]
    fn time_and_delay() {
        let t = Timestamp::parse_str("54.3 1.5").unwrap();
        assert_eq!(t.time(), 54.3);
        assert_eq!(t.delay(), Some(1.5));
        assert_eq!(t.render(), "54.3 1.5");
    }

    #[test]
    fn garbage_rejected() {
        assert!(Timestamp::parse_str("soon").is_err());
    }
}
