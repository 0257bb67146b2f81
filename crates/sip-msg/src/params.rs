// siphon-rs - The Siphon SIP Stack
// Copyright (C) 2025 James Ferris <ferrous.communications@gmail.com>
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Generic `name[=value]` parameters shared by most header value grammars.
//!
//! Nearly every SIP header value ends in `*(SEMI param)`. This module owns
//! the one parser and renderer for that production so the individual
//! grammars only deal with their head token. Lookup is ASCII
//! case-insensitive and insertion order is preserved on render.

use std::fmt;
use std::slice::Iter;

use smol_str::SmolStr;

use crate::error::{DuplicateParameter, GrammarError};
use crate::reader::{is_token, quote_string, unquote, Reader};

/// A single `name[=value]` pair. A `None` value is a flag parameter
/// (`;lr`, `;early-only`); it renders without an equals sign.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Param {
    name: SmolStr,
    value: Option<SmolStr>,
}

impl Param {
    pub fn new(name: impl Into<SmolStr>, value: Option<&str>) -> Self {
        Param {
            name: name.into(),
            value: value.map(SmolStr::new),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }
}

/// Insertion-ordered parameter collection with case-insensitive names.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params(Vec<Param>);

impl Params {
    pub fn new() -> Self {
        Params::default()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> Iter<'_, Param> {
        self.0.iter()
    }

    pub(crate) fn push(&mut self, param: Param) {
        self.0.push(param);
    }

    /// Adds a new parameter. Fails when a parameter with the same name
    /// (ignoring case) already exists; the collection is left unchanged.
    pub fn add(&mut self, name: &str, value: Option<&str>) -> Result<(), DuplicateParameter> {
        if self.contains(name) {
            return Err(DuplicateParameter(SmolStr::new(name)));
        }
        self.0.push(Param::new(name, value));
        Ok(())
    }

    /// Adds or updates the parameter with the given name.
    pub fn set(&mut self, name: &str, value: Option<&str>) {
        match self.0.iter_mut().find(|p| p.name.eq_ignore_ascii_case(name)) {
            Some(p) => p.value = value.map(SmolStr::new),
            None => self.0.push(Param::new(name, value)),
        }
    }

    /// Removes the named parameter. No-op when absent.
    pub fn remove(&mut self, name: &str) {
        self.0.retain(|p| !p.name.eq_ignore_ascii_case(name));
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn get(&self, name: &str) -> Option<&Param> {
        self.0.iter().find(|p| p.name.eq_ignore_ascii_case(name))
    }

    /// Convenience lookup of a parameter's value. Returns `None` both when
    /// the parameter is absent and when it is a flag parameter.
    pub fn value_of(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(|p| p.value())
    }

    /// Parses `*(SEMI name[=value])`, stopping at a top-level comma or end
    /// of input. Quoted parameter values are stored unescaped. The cursor is
    /// left at the comma (or end) for the caller.
    pub fn parse(reader: &mut Reader<'_>) -> Result<Params, GrammarError> {
        let mut params = Params::new();
        loop {
            reader.skip_ws();
            if reader.is_empty() || reader.starts_with(',') {
                return Ok(params);
            }
            if !reader.consume(';') {
                return Err(GrammarError::Invalid {
                    what: "parameter list",
                    value: SmolStr::new(reader.rest()),
                });
            }
            let segment = reader.read_to_delimiter(&[';', ',']).trim();
            if segment.is_empty() {
                continue;
            }
            let (name, value) = match segment.split_once('=') {
                Some((n, v)) => (n.trim(), Some(unquote(v))),
                None => (segment, None),
            };
            if name.is_empty() {
                return Err(GrammarError::Invalid {
                    what: "parameter name",
                    value: SmolStr::new(segment),
                });
            }
            params
                .add(name, value.as_deref())
                .map_err(|DuplicateParameter(n)| GrammarError::Invalid {
                    what: "duplicate parameter",
                    value: n,
                })?;
        }
    }
}

impl fmt::Display for Params {
    /// Renders `;name` for flag/empty parameters and `;name=value`
    /// otherwise, quoting values that are not bare tokens.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for p in &self.0 {
            match p.value() {
                None | Some("") => write!(f, ";{}", p.name())?,
                Some(v) if is_token(v) => write!(f, ";{}={}", p.name(), v)?,
                Some(v) => write!(f, ";{}={}", p.name(), quote_string(v))?,
            }
        }
        Ok(())
    }
}

impl IntoIterator for Params {
    type Item = Param;
    type IntoIter = std::vec::IntoIter<Param>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Params {
    type Item = &'a Param;
    type IntoIter = Iter<'a, Param>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Parses a `qvalue` (`0[.0-3DIGIT]` / `1[.000]`) into a float in [0,1].
pub(crate) fn parse_qvalue(s: &str) -> Option<f32> {
    let q: f32 = s.trim().parse().ok()?;
    if (0.0..=1.0).contains(&q) {
        Some(q)
    } else {
        None
    }
}
