// siphon-rs - The Siphon SIP Stack
// Copyright (C) 2025 James Ferris <ferrous.communications@gmail.com>
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Retry-After value grammar.

use std::fmt;

use smol_str::SmolStr;

use crate::error::{GrammarError, ValueError};
use crate::params::Params;
use crate::reader::Reader;
use crate::value::HeaderValue;

/// Retry-After: `delta-seconds [comment] *(SEMI retry-param)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryAfter {
    seconds: u32,
    comment: Option<SmolStr>,
    params: Params,
}

impl RetryAfter {
    pub fn new(seconds: u32) -> Self {
        RetryAfter {
            seconds,
            comment: None,
            params: Params::new(),
        }
    }

    pub fn seconds(&self) -> u32 {
        self.seconds
    }

    pub fn set_seconds(&mut self, seconds: u32) {
        self.seconds = seconds;
    }

    /// The optional parenthesized comment, without the parentheses.
    pub fn comment(&self) -> Option<&str> {
        self.comment.as_deref()
    }

    pub fn set_comment(&mut self, comment: Option<&str>) -> Result<(), ValueError> {
        match comment {
            None => self.comment = None,
            Some(c) if c.contains(['(', ')']) => {
                return Err(ValueError::new("comment", c));
            }
            Some(c) => self.comment = Some(SmolStr::new(c)),
        }
        Ok(())
    }

    pub fn params(&self) -> &Params {
        &self.params
    }

    pub fn params_mut(&mut self) -> &mut Params {
        &mut self.params
    }

    /// The `duration` parameter in seconds.
    pub fn duration(&self) -> Option<u32> {
        self.params.value_of("duration")?.parse().ok()
    }

    pub fn set_duration(&mut self, duration: Option<u32>) {
        match duration {
            None => self.params.remove("duration"),
            Some(d) => self.params.set("duration", Some(&d.to_string())),
        }
    }
}

impl fmt::Display for RetryAfter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.seconds)?;
        if let Some(comment) = &self.comment {
            write!(f, " ({})", comment)?;
        }
        write!(f, "{}", self.params)
    }
}

impl HeaderValue for RetryAfter {
    fn parse(reader: &mut Reader<'_>) -> Result<Self, GrammarError> {
        reader.skip_ws();
        let word = reader
            .read_word()
            .ok_or(GrammarError::Missing("retry after"))?;
        let seconds: u32 = word.parse().map_err(|_| GrammarError::Invalid {
            what: "retry after",
            value: word.into(),
        })?;
        reader.skip_ws();
        let comment = if reader.starts_with('(') {
            reader.read_parenthesized().map(SmolStr::new)
        } else {
            None
        };
        let params = Params::parse(reader)?;
        Ok(RetryAfter {
            seconds,
            comment,
            params,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_seconds() {
        let r = RetryAfter::parse_str("18000").unwrap();
        assert_eq!(r.seconds(), 18000);
        assert_eq!(r.render(), "18000");
    }

    #[test]
    fn comment_and_duration() {
        let r = RetryAfter::parse_str("120 (I'm in a meeting);duration=3600").unwrap();
        assert_eq!(r.seconds(), 120);
        assert_eq!(r.comment(), Some("I'm in a meeting"));
        assert_eq!(r.duration(), Some(3600));
        assert_eq!(r.render(), "120 (I'm in a meeting);duration=3600");
    }

    #[test]
    fn comment_setter_rejects_parens() {
        let mut r = RetryAfter::new(60);
        assert!(r.set_comment(Some("nested (comment)")).is_err());
        assert_eq!(r.comment(), None);
    }
}
