// siphon-rs - The Siphon SIP Stack
// Copyright (C) 2025 James Ferris <ferrous.communications@gmail.com>
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! CSeq (RFC 3261) and RAck (RFC 3262) header values.

use std::fmt;

use smol_str::SmolStr;

use crate::error::{GrammarError, ValueError};
use crate::method::Method;
use crate::reader::Reader;
use crate::value::HeaderValue;

/// The CSeq header value: `1*DIGIT LWS Method`.
///
/// The sequence number is at least 1; constructing or setting a zero value
/// fails without touching existing state.
///
/// # Examples
///
/// ```
/// use sip_msg::{CSeq, HeaderValue, Method};
///
/// let cseq = CSeq::parse_str("4711 INVITE").unwrap();
/// assert_eq!(cseq.sequence_number(), 4711);
/// assert_eq!(cseq.method(), &Method::Invite);
/// assert_eq!(cseq.render(), "4711 INVITE");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CSeq {
    sequence_number: u32,
    method: Method,
}

impl CSeq {
    pub fn new(sequence_number: u32, method: Method) -> Result<Self, ValueError> {
        if sequence_number == 0 {
            return Err(ValueError::new("CSeq sequence number", "0"));
        }
        Ok(CSeq {
            sequence_number,
            method,
        })
    }

    pub fn sequence_number(&self) -> u32 {
        self.sequence_number
    }

    pub fn set_sequence_number(&mut self, n: u32) -> Result<(), ValueError> {
        if n == 0 {
            return Err(ValueError::new("CSeq sequence number", "0"));
        }
        self.sequence_number = n;
        Ok(())
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn set_method(&mut self, method: Method) {
        self.method = method;
    }
}

impl fmt::Display for CSeq {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.sequence_number, self.method)
    }
}

impl HeaderValue for CSeq {
    fn parse(reader: &mut Reader<'_>) -> Result<Self, GrammarError> {
        let number = reader
            .read_word()
            .ok_or(GrammarError::Missing("CSeq sequence number"))?;
        let sequence_number: u32 = number.parse().map_err(|_| GrammarError::Invalid {
            what: "CSeq sequence number",
            value: SmolStr::new(&number),
        })?;
        if sequence_number == 0 {
            return Err(GrammarError::Invalid {
                what: "CSeq sequence number",
                value: SmolStr::new(&number),
            });
        }
        let method = reader
            .read_word()
            .ok_or(GrammarError::Missing("CSeq method"))?;
        Ok(CSeq {
            sequence_number,
            method: Method::from_token(&method),
        })
    }
}

/// The RAck header value: `response-num LWS CSeq-num LWS Method`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RAck {
    response_number: u32,
    cseq_number: u32,
    method: Method,
}

impl RAck {
    pub fn new(response_number: u32, cseq_number: u32, method: Method) -> Self {
        RAck {
            response_number,
            cseq_number,
            method,
        }
    }

    pub fn response_number(&self) -> u32 {
        self.response_number
    }

    pub fn cseq_number(&self) -> u32 {
        self.cseq_number
    }

    pub fn method(&self) -> &Method {
        &self.method
    }
}

impl fmt::Display for RAck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.response_number, self.cseq_number, self.method)
    }
}

impl HeaderValue for RAck {
    fn parse(reader: &mut Reader<'_>) -> Result<Self, GrammarError> {
        let read_num = |reader: &mut Reader<'_>, what: &'static str| {
            let word = reader.read_word().ok_or(GrammarError::Missing(what))?;
            word.parse::<u32>().map_err(|_| GrammarError::Invalid {
                what,
                value: SmolStr::new(&word),
            })
        };
        let response_number = read_num(reader, "RAck response-num")?;
        let cseq_number = read_num(reader, "RAck CSeq-num")?;
        let method = reader
            .read_word()
            .ok_or(GrammarError::Missing("RAck method"))?;
        Ok(RAck {
            response_number,
            cseq_number,
            method: Method::from_token(&method),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_cseq() {
        let cseq = CSeq::parse_str("314159 INVITE").unwrap();
        assert_eq!(cseq.sequence_number(), 314159);
        assert_eq!(cseq.method(), &Method::Invite);
    }

    #[test]
    fn zero_sequence_number_rejected() {
        assert!(CSeq::parse_str("0 INVITE").is_err());
        assert!(CSeq::new(0, Method::Invite).is_err());

        let mut cseq = CSeq::new(1, Method::Register).unwrap();
        assert!(cseq.set_sequence_number(0).is_err());
        assert_eq!(cseq.sequence_number(), 1);
    }

    #[test]
    fn missing_method_rejected() {
        assert!(CSeq::parse_str("4711").is_err());
    }

    #[test]
    fn rack_round_trip() {
        let rack = RAck::parse_str("776656 1 INVITE").unwrap();
        assert_eq!(rack.response_number(), 776656);
        assert_eq!(rack.cseq_number(), 1);
        assert_eq!(rack.render(), "776656 1 INVITE");
    }
}
