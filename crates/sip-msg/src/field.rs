// siphon-rs - The Siphon SIP Stack
// Copyright (C) 2025 James Ferris <ferrous.communications@gmail.com>
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! One header field: canonical name plus a typed or raw body.
//!
//! The body shape is fixed by the registry binding for the name at
//! construction time and never changes for the lifetime of the field.
//! Rendering is always derived from the typed values, never from a cached
//! raw string.

use smol_str::SmolStr;

use crate::error::{GrammarError, HeaderParseError};
use crate::reader::Reader;
use crate::registry::{self, Binding, ParseFn};
use crate::value::{Value, ValueVariant};

/// The parsed shape of a field's value.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldBody {
    /// Unrecognized header name; the value is kept verbatim.
    Raw(SmolStr),
    /// One production.
    Single(Value),
    /// A comma-separated, order-preserving list of productions. May be
    /// empty.
    Multi(Vec<Value>),
}

/// A named header field.
#[derive(Debug, Clone, PartialEq)]
pub struct HeaderField {
    name: SmolStr,
    body: FieldBody,
}

fn parse_single(parse: ParseFn, text: &str) -> Result<Value, GrammarError> {
    let mut reader = Reader::new(text);
    let value = parse(&mut reader)?;
    reader.skip_ws();
    if !reader.is_empty() {
        return Err(GrammarError::Invalid {
            what: "trailing input",
            value: SmolStr::new(reader.rest()),
        });
    }
    Ok(value)
}

/// Splits on top-level commas by letting the grammar consume up to each
/// one. Commas inside quoted strings or bracketed URIs belong to the
/// production and are never split points. Empty segments are skipped.
fn parse_multi(parse: ParseFn, text: &str) -> Result<Vec<Value>, GrammarError> {
    let mut reader = Reader::new(text);
    let mut values = Vec::new();
    loop {
        reader.skip_ws();
        if reader.is_empty() {
            return Ok(values);
        }
        if reader.consume(',') {
            continue;
        }
        values.push(parse(&mut reader)?);
        reader.skip_ws();
        if !reader.is_empty() && !reader.consume(',') {
            return Err(GrammarError::Invalid {
                what: "value list",
                value: SmolStr::new(reader.rest()),
            });
        }
    }
}

impl HeaderField {
    /// Builds a field from a wire `(name, value)` pair. The name may be a
    /// compact alias and is stored canonically, without the colon.
    /// Recognized names parse per their bound grammar; unknown names are
    /// kept raw, never rejected.
    pub fn parse(name: &str, value: &str) -> Result<Self, HeaderParseError> {
        let name = registry::canonical_name(name);
        let body = Self::parse_body(&name, value).map_err(|source| HeaderParseError {
            name: name.clone(),
            value: SmolStr::new(value),
            source,
        })?;
        Ok(HeaderField { name, body })
    }

    fn parse_body(name: &str, value: &str) -> Result<FieldBody, GrammarError> {
        Ok(match registry::binding(name) {
            None => FieldBody::Raw(SmolStr::new(value.trim())),
            Some(Binding::Single(parse)) => FieldBody::Single(parse_single(parse, value)?),
            Some(Binding::Multi(parse)) => FieldBody::Multi(parse_multi(parse, value)?),
        })
    }

    /// Builds a typed single-value field directly from a value.
    pub fn single(name: &str, value: Value) -> Self {
        HeaderField {
            name: registry::canonical_name(name),
            body: FieldBody::Single(value),
        }
    }

    /// Builds an untyped field keeping `value` verbatim. Meant for names
    /// the registry leaves untyped (Subject, User-Agent, ...).
    pub fn raw(name: &str, value: &str) -> Self {
        HeaderField {
            name: registry::canonical_name(name),
            body: FieldBody::Raw(SmolStr::new(value)),
        }
    }

    /// Builds a typed multi-value field directly from values.
    pub fn multi(name: &str, values: Vec<Value>) -> Self {
        HeaderField {
            name: registry::canonical_name(name),
            body: FieldBody::Multi(values),
        }
    }

    /// The canonical header name, without the trailing colon.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_multi_value(&self) -> bool {
        matches!(self.body, FieldBody::Multi(_))
    }

    pub fn body(&self) -> &FieldBody {
        &self.body
    }

    /// Renders the field's value text, joining list values with ", ".
    pub fn value(&self) -> String {
        match &self.body {
            FieldBody::Raw(raw) => raw.to_string(),
            FieldBody::Single(v) => v.render(),
            FieldBody::Multi(vs) => {
                let rendered: Vec<String> = vs.iter().map(Value::render).collect();
                rendered.join(", ")
            }
        }
    }

    /// Replaces the field's value by reparsing `value` under the field's
    /// existing binding. On failure the field keeps its previous body.
    pub fn set_value(&mut self, value: &str) -> Result<(), HeaderParseError> {
        let body = Self::parse_body(&self.name, value).map_err(|source| HeaderParseError {
            name: self.name.clone(),
            value: SmolStr::new(value),
            source,
        })?;
        self.body = body;
        Ok(())
    }

    /// The single typed value, when this is a single-value field.
    pub fn single_value(&self) -> Option<&Value> {
        match &self.body {
            FieldBody::Single(v) => Some(v),
            _ => None,
        }
    }

    pub fn single_value_mut(&mut self) -> Option<&mut Value> {
        match &mut self.body {
            FieldBody::Single(v) => Some(v),
            _ => None,
        }
    }

    /// The value list. A single-value field is seen as a one-element list;
    /// a raw field as empty.
    pub fn values(&self) -> &[Value] {
        match &self.body {
            FieldBody::Raw(_) => &[],
            FieldBody::Single(v) => std::slice::from_ref(v),
            FieldBody::Multi(vs) => vs,
        }
    }

    /// Mutable access to a multi-value field's list.
    pub fn values_mut(&mut self) -> Option<&mut Vec<Value>> {
        match &mut self.body {
            FieldBody::Multi(vs) => Some(vs),
            _ => None,
        }
    }

    /// Extracts the concrete grammar type from a single-value field. The
    /// registry fixes which variant a name carries, so for a field built
    /// through the registry this is `Some` exactly when `V` matches the
    /// binding.
    pub fn typed<V: ValueVariant>(&self) -> Option<&V> {
        V::value_ref(self.single_value()?)
    }

    pub fn typed_mut<V: ValueVariant>(&mut self) -> Option<&mut V> {
        V::value_mut(self.single_value_mut()?)
    }
}
