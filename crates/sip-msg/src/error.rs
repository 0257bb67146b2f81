// siphon-rs - The Siphon SIP Stack
// Copyright (C) 2025 James Ferris <ferrous.communications@gmail.com>
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error types for the message model.
//!
//! Wire parse failures and application mutation failures are kept separate:
//! a [`GrammarError`] (wrapped with field context as [`HeaderParseError`])
//! comes back from parsing network input, while [`ValueError`] and
//! [`DuplicateParameter`] are returned by typed setters and leave the
//! object in its pre-call state.

use std::fmt;
use std::io;

use smol_str::SmolStr;

/// A value grammar could not consume its production from the cursor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GrammarError {
    /// A mandatory token of the production is missing.
    Missing(&'static str),
    /// A token is present but malformed for its slot.
    Invalid { what: &'static str, value: SmolStr },
    /// A parameter the grammar requires is absent.
    MissingParameter(&'static str),
}

impl fmt::Display for GrammarError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GrammarError::Missing(what) => write!(f, "{} is missing", what),
            GrammarError::Invalid { what, value } => {
                write!(f, "invalid {}: {:?}", what, value.as_str())
            }
            GrammarError::MissingParameter(name) => {
                write!(f, "mandatory '{}' parameter is missing", name)
            }
        }
    }
}

impl std::error::Error for GrammarError {}

/// One header field failed to parse. Carries the header name and the raw
/// value so callers can log or reject the whole message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderParseError {
    pub name: SmolStr,
    pub value: SmolStr,
    pub source: GrammarError,
}

impl fmt::Display for HeaderParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "invalid {} header value {:?}: {}",
            self.name,
            self.value.as_str(),
            self.source
        )
    }
}

impl std::error::Error for HeaderParseError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.source)
    }
}

/// An application-supplied property value violates a grammar's domain
/// constraint (q-value outside [0,1], zero CSeq number, bad branch cookie).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValueError {
    pub what: &'static str,
    pub value: SmolStr,
}

impl ValueError {
    pub(crate) fn new(what: &'static str, value: impl Into<SmolStr>) -> Self {
        ValueError {
            what,
            value: value.into(),
        }
    }
}

impl fmt::Display for ValueError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid {} value: {:?}", self.what, self.value.as_str())
    }
}

impl std::error::Error for ValueError {}

/// `Params::add` was called with a name already present in the collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateParameter(pub SmolStr);

impl fmt::Display for DuplicateParameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "parameter '{}' already exists", self.0)
    }
}

impl std::error::Error for DuplicateParameter {}

/// Envelope-level parse failure.
#[derive(Debug)]
pub enum MessageError {
    /// A recognized header field had a malformed value.
    Header(HeaderParseError),
    /// The request-line or status-line is malformed.
    InvalidStartLine(SmolStr),
    /// The underlying stream failed.
    Io(io::Error),
}

impl fmt::Display for MessageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MessageError::Header(e) => e.fmt(f),
            MessageError::InvalidStartLine(line) => {
                write!(f, "invalid start line: {:?}", line.as_str())
            }
            MessageError::Io(e) => write!(f, "i/o error while parsing message: {}", e),
        }
    }
}

impl std::error::Error for MessageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            MessageError::Header(e) => Some(e),
            MessageError::Io(e) => Some(e),
            MessageError::InvalidStartLine(_) => None,
        }
    }
}

impl From<HeaderParseError> for MessageError {
    fn from(e: HeaderParseError) -> Self {
        MessageError::Header(e)
    }
}

impl From<io::Error> for MessageError {
    fn from(e: io::Error) -> Self {
        MessageError::Io(e)
    }
}
