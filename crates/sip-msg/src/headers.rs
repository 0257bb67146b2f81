// siphon-rs - The Siphon SIP Stack
// Copyright (C) 2025 James Ferris <ferrous.communications@gmail.com>
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The ordered header field collection.
//!
//! Parsing reads line-oriented input, unfolds RFC 2822 continuation lines
//! and stops just past the blank line ending the header block, leaving the
//! stream cursor on the first body byte. Field order is preserved through
//! every operation except explicit top insertion; name lookup is
//! case-insensitive and accepts compact aliases and trailing colons.

use std::io::BufRead;

use smol_str::SmolStr;

use crate::error::{HeaderParseError, MessageError};
use crate::field::HeaderField;
use crate::registry;

/// An ordered list of header fields.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HeaderFieldCollection {
    fields: Vec<HeaderField>,
}

impl HeaderFieldCollection {
    pub fn new() -> Self {
        HeaderFieldCollection::default()
    }

    /// Reads the header block from `stream`. Continuation lines (leading
    /// space or tab) are concatenated onto the previous logical line before
    /// the split on the first colon. Lines without a colon are skipped.
    /// Stops at the first blank line or end of input.
    pub fn parse<R: BufRead>(stream: &mut R) -> Result<Self, MessageError> {
        let mut collection = HeaderFieldCollection::new();
        let mut logical: Option<String> = None;
        loop {
            let mut line = String::new();
            let n = stream.read_line(&mut line)?;
            let stripped = line.trim_end_matches(['\r', '\n']);
            let at_end = n == 0 || stripped.is_empty();
            if !at_end && line.starts_with([' ', '\t']) {
                if let Some(l) = logical.as_mut() {
                    l.push_str(stripped);
                    continue;
                }
            }
            if let Some(l) = logical.take() {
                if let Some((name, value)) = l.split_once(':') {
                    collection.push(HeaderField::parse(name, value.trim())?);
                }
            }
            if at_end {
                return Ok(collection);
            }
            logical = Some(stripped.to_string());
        }
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, HeaderField> {
        self.fields.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, HeaderField> {
        self.fields.iter_mut()
    }

    fn matches(field: &HeaderField, canonical: &str) -> bool {
        field.name().eq_ignore_ascii_case(canonical)
    }

    /// Parses and appends a field. The name may be a compact alias.
    pub fn add(&mut self, name: &str, value: &str) -> Result<(), HeaderParseError> {
        let field = HeaderField::parse(name, value)?;
        self.fields.push(field);
        Ok(())
    }

    /// Appends an already-built field.
    pub fn push(&mut self, field: HeaderField) {
        self.fields.push(field);
    }

    /// Parses and inserts a field at `index` (clamped to the current
    /// length).
    pub fn insert(&mut self, index: usize, name: &str, value: &str) -> Result<(), HeaderParseError> {
        let field = HeaderField::parse(name, value)?;
        self.insert_field(index, field);
        Ok(())
    }

    pub fn insert_field(&mut self, index: usize, field: HeaderField) {
        let index = index.min(self.fields.len());
        self.fields.insert(index, field);
    }

    /// Replaces the first matching field's value, or appends a new field
    /// when the name is absent.
    pub fn set(&mut self, name: &str, value: &str) -> Result<(), HeaderParseError> {
        let canonical = registry::canonical_name(name);
        match self.fields.iter_mut().find(|f| Self::matches(f, &canonical)) {
            Some(field) => field.set_value(value),
            None => self.add(name, value),
        }
    }

    pub fn remove(&mut self, index: usize) {
        if index < self.fields.len() {
            self.fields.remove(index);
        }
    }

    /// Removes the first field with the given name. No-op when absent.
    pub fn remove_first(&mut self, name: &str) {
        let canonical = registry::canonical_name(name);
        if let Some(i) = self.fields.iter().position(|f| Self::matches(f, &canonical)) {
            self.fields.remove(i);
        }
    }

    /// Removes every field with the given name.
    pub fn remove_all(&mut self, name: &str) {
        let canonical = registry::canonical_name(name);
        self.fields.retain(|f| !Self::matches(f, &canonical));
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get_first(name).is_some()
    }

    /// All fields with the given name, in collection order.
    pub fn get<'a>(&'a self, name: &str) -> impl Iterator<Item = &'a HeaderField> {
        let canonical = registry::canonical_name(name);
        self.fields
            .iter()
            .filter(move |f| Self::matches(f, &canonical))
    }

    pub fn get_first(&self, name: &str) -> Option<&HeaderField> {
        let canonical = registry::canonical_name(name);
        self.fields.iter().find(|f| Self::matches(f, &canonical))
    }

    pub fn get_first_mut(&mut self, name: &str) -> Option<&mut HeaderField> {
        let canonical = registry::canonical_name(name);
        self.fields.iter_mut().find(|f| Self::matches(f, &canonical))
    }

    pub(crate) fn position_of(&self, canonical: &SmolStr) -> Option<usize> {
        self.fields.iter().position(|f| Self::matches(f, canonical))
    }

    pub(crate) fn fields(&self) -> &[HeaderField] {
        &self.fields
    }

    pub(crate) fn fields_mut(&mut self) -> &mut Vec<HeaderField> {
        &mut self.fields
    }

    /// Renders `name: value CRLF` per field in order, with the terminating
    /// blank line.
    pub fn to_header_string(&self) -> String {
        let mut out = String::new();
        for field in &self.fields {
            out.push_str(field.name());
            out.push_str(": ");
            out.push_str(&field.value());
            out.push_str("\r\n");
        }
        out.push_str("\r\n");
        out
    }
}

impl<'a> IntoIterator for &'a HeaderFieldCollection {
    type Item = &'a HeaderField;
    type IntoIter = std::slice::Iter<'a, HeaderField>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cseq::CSeq;
    use std::io::{BufReader, Cursor, Read};

    fn parse(text: &str) -> HeaderFieldCollection {
        HeaderFieldCollection::parse(&mut BufReader::new(Cursor::new(text))).unwrap()
    }

    #[test]
    fn parse_stops_after_blank_line() {
        let text = "CSeq: 1 INVITE\r\nCall-ID: abc@host\r\n\r\nbody bytes";
        let mut stream = BufReader::new(Cursor::new(text));
        let headers = HeaderFieldCollection::parse(&mut stream).unwrap();
        assert_eq!(headers.len(), 2);
        let mut rest = String::new();
        stream.read_to_string(&mut rest).unwrap();
        assert_eq!(rest, "body bytes");
    }

    #[test]
    fn folded_header_is_unfolded() {
        let headers = parse("Subject: I know you're there,\r\n pick up the phone\r\n\r\n");
        let subject = headers.get_first("Subject").unwrap();
        assert_eq!(subject.value(), "I know you're there, pick up the phone");
    }

    #[test]
    fn lookup_is_case_insensitive_and_alias_aware() {
        let headers = parse("v: SIP/2.0/UDP host;branch=z9hG4bK-1\r\n\r\n");
        assert!(headers.contains("VIA"));
        assert!(headers.contains("Via:"));
        assert_eq!(headers.get_first("via").unwrap().name(), "Via");
    }

    #[test]
    fn set_replaces_first_or_appends() {
        let mut headers = parse("CSeq: 1 INVITE\r\n\r\n");
        headers.set("CSeq", "2 INVITE").unwrap();
        assert_eq!(headers.len(), 1);
        assert_eq!(
            headers.get_first("CSeq").unwrap().typed::<CSeq>().unwrap().sequence_number(),
            2
        );
        headers.set("Max-Forwards", "70").unwrap();
        assert_eq!(headers.len(), 2);
    }

    #[test]
    fn remove_first_and_all() {
        let mut headers = parse("Via: SIP/2.0/UDP a\r\nVia: SIP/2.0/UDP b\r\n\r\n");
        headers.remove_first("via");
        assert_eq!(headers.get("Via").count(), 1);
        headers.remove_all("Via");
        assert!(headers.is_empty());
    }

    #[test]
    fn render_has_trailing_blank_line() {
        let headers = parse("CSeq: 4711 INVITE\r\n\r\n");
        assert_eq!(headers.to_header_string(), "CSeq: 4711 INVITE\r\n\r\n");
    }

    #[test]
    fn lines_without_colon_are_skipped() {
        let headers = parse("garbage line\r\nCSeq: 1 OPTIONS\r\n\r\n");
        assert_eq!(headers.len(), 1);
    }

    #[test]
    fn bad_recognized_header_is_a_hard_failure() {
        let mut stream = BufReader::new(Cursor::new("CSeq: zero INVITE\r\n\r\n"));
        assert!(HeaderFieldCollection::parse(&mut stream).is_err());
    }
}
