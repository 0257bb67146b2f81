// siphon-rs - The Siphon SIP Stack
// Copyright (C) 2025 James Ferris <ferrous.communications@gmail.com>
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Grouped views over every occurrence of one header name.
//!
//! A view mutably borrows the collection and answers every operation by
//! scanning for the name at call time, so it can never go stale. The
//! borrow also stops a caller from mutating the collection behind a live
//! view; re-acquire the view after working through another path.

use smol_str::SmolStr;

use crate::field::HeaderField;
use crate::headers::HeaderFieldCollection;
use crate::registry;
use crate::value::Value;

/// A view over a header name that may repeat and carry several
/// comma-separated values per line (Via, Route, Contact, ...). The value
/// order seen through the view is field order, then intra-field order.
pub struct MultiValueGroup<'a> {
    headers: &'a mut HeaderFieldCollection,
    name: SmolStr,
}

impl<'a> MultiValueGroup<'a> {
    pub fn new(headers: &'a mut HeaderFieldCollection, name: &str) -> Self {
        MultiValueGroup {
            headers,
            name: registry::canonical_name(name),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Inserts a new field holding `value` at the top of the collection.
    /// Used for proxy-style "push my Via on top".
    pub fn add_to_top(&mut self, value: Value) {
        let field = HeaderField::multi(&self.name, vec![value]);
        self.headers.insert_field(0, field);
    }

    /// Appends a new field holding `value` at the bottom.
    pub fn add(&mut self, value: Value) {
        let field = HeaderField::multi(&self.name, vec![value]);
        self.headers.push(field);
    }

    /// The group's first value. Fields holding zero values are skipped.
    pub fn topmost_value(&self) -> Option<&Value> {
        self.fields().flat_map(|f| f.values()).next()
    }

    /// Removes the topmost value; when it was its field's last value the
    /// whole field goes too. Value-less fields are left alone.
    pub fn remove_topmost_value(&mut self) {
        let Some(index) = self.headers.fields().iter().position(|f| {
            f.name().eq_ignore_ascii_case(&self.name) && !f.values().is_empty()
        }) else {
            return;
        };
        self.remove_value_at(index, 0);
    }

    /// The group's last value, mirrored from the end.
    pub fn last_value(&self) -> Option<&Value> {
        self.fields().flat_map(|f| f.values()).last()
    }

    /// Removes the group's last value, dropping its field when emptied.
    pub fn remove_last_value(&mut self) {
        let Some(index) = self.headers.fields().iter().rposition(|f| {
            f.name().eq_ignore_ascii_case(&self.name) && !f.values().is_empty()
        }) else {
            return;
        };
        let last = self.headers.fields()[index].values().len() - 1;
        self.remove_value_at(index, last);
    }

    fn remove_value_at(&mut self, field_index: usize, value_index: usize) {
        let fields = self.headers.fields_mut();
        let remove_field = match fields[field_index].values_mut() {
            Some(values) => {
                if value_index < values.len() {
                    values.remove(value_index);
                }
                values.is_empty()
            }
            // A single-value or raw field holds exactly one value.
            None => true,
        };
        if remove_field {
            fields.remove(field_index);
        }
    }

    /// Removes every field of the group.
    pub fn remove_all(&mut self) {
        self.headers.remove_all(&self.name);
    }

    /// All values across all fields, preserving field order and per-field
    /// intra-order.
    pub fn all_values(&self) -> Vec<&Value> {
        self.fields().flat_map(|f| f.values().iter()).collect()
    }

    pub fn count(&self) -> usize {
        self.fields().map(|f| f.values().len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.count() == 0
    }

    fn fields(&self) -> impl Iterator<Item = &HeaderField> {
        let name = self.name.clone();
        self.headers
            .iter()
            .filter(move |f| f.name().eq_ignore_ascii_case(&name))
    }
}

/// A view over a header name that occurs at most a handful of times with
/// one value per line (Authorization, Warning as emitted by some stacks).
pub struct SingleValueGroup<'a> {
    headers: &'a mut HeaderFieldCollection,
    name: SmolStr,
}

impl<'a> SingleValueGroup<'a> {
    pub fn new(headers: &'a mut HeaderFieldCollection, name: &str) -> Self {
        SingleValueGroup {
            headers,
            name: registry::canonical_name(name),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Appends a new field holding `value`.
    pub fn add(&mut self, value: Value) {
        self.headers.push(HeaderField::single(&self.name, value));
    }

    /// Inserts a new field holding `value` at the top of the collection.
    pub fn add_to_top(&mut self, value: Value) {
        self.headers
            .insert_field(0, HeaderField::single(&self.name, value));
    }

    /// The first field's value.
    pub fn first_value(&self) -> Option<&Value> {
        self.fields().next()?.single_value()
    }

    /// Replaces the first field's value, or appends a new field when the
    /// group is empty.
    pub fn set(&mut self, value: Value) {
        match self.headers.position_of(&self.name) {
            Some(index) => {
                self.headers.fields_mut()[index] = HeaderField::single(&self.name, value);
            }
            None => self.add(value),
        }
    }

    /// Removes the first field of the group.
    pub fn remove_first(&mut self) {
        self.headers.remove_first(&self.name);
    }

    /// Removes the group's `index`-th field (0 is the first occurrence).
    /// No-op when out of range.
    pub fn remove(&mut self, index: usize) {
        let position = self
            .headers
            .fields()
            .iter()
            .enumerate()
            .filter(|(_, f)| f.name().eq_ignore_ascii_case(&self.name))
            .map(|(i, _)| i)
            .nth(index);
        if let Some(i) = position {
            self.headers.fields_mut().remove(i);
        }
    }

    /// Removes every field of the group.
    pub fn remove_all(&mut self) {
        self.headers.remove_all(&self.name);
    }

    /// Each field's value, in collection order.
    pub fn all_values(&self) -> Vec<&Value> {
        self.fields().filter_map(HeaderField::single_value).collect()
    }

    pub fn count(&self) -> usize {
        self.fields().count()
    }

    pub fn is_empty(&self) -> bool {
        self.count() == 0
    }

    fn fields(&self) -> impl Iterator<Item = &HeaderField> {
        let name = self.name.clone();
        self.headers
            .iter()
            .filter(move |f| f.name().eq_ignore_ascii_case(&name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::Credentials;
    use crate::value::{HeaderValue, ValueVariant};
    use crate::via::ViaParm;
    use std::io::{BufReader, Cursor};

    fn headers(text: &str) -> HeaderFieldCollection {
        HeaderFieldCollection::parse(&mut BufReader::new(Cursor::new(text))).unwrap()
    }

    #[test]
    fn via_stack_order_and_pop() {
        let mut h = headers(
            "Via: SIP/2.0/UDP a.example.com;branch=z9hG4bK-a\r\n\
             Via: SIP/2.0/UDP b.example.com;branch=z9hG4bK-b, SIP/2.0/UDP c.example.com;branch=z9hG4bK-c\r\n\
             \r\n",
        );
        let mut vias = MultiValueGroup::new(&mut h, "Via");
        assert_eq!(vias.count(), 3);
        let hosts: Vec<String> = vias
            .all_values()
            .iter()
            .map(|v| v.render())
            .collect();
        assert!(hosts[0].contains("a.example.com"));
        assert!(hosts[1].contains("b.example.com"));
        assert!(hosts[2].contains("c.example.com"));

        vias.remove_topmost_value();
        assert_eq!(vias.count(), 2);
        assert!(vias.topmost_value().unwrap().render().contains("b.example.com"));
        // the emptied first field is gone from the raw collection
        assert_eq!(h.get("Via").count(), 1);
    }

    #[test]
    fn remove_topmost_keeps_sibling_values_in_same_field() {
        let mut h = headers(
            "Via: SIP/2.0/UDP a;branch=z9hG4bK-a, SIP/2.0/UDP b;branch=z9hG4bK-b\r\n\r\n",
        );
        let mut vias = MultiValueGroup::new(&mut h, "Via");
        vias.remove_topmost_value();
        assert_eq!(vias.count(), 1);
        assert_eq!(h.get("Via").count(), 1);
    }

    #[test]
    fn remove_last_value_works_from_the_end() {
        let mut h = headers(
            "Via: SIP/2.0/UDP a;branch=z9hG4bK-a\r\nVia: SIP/2.0/UDP b;branch=z9hG4bK-b\r\n\r\n",
        );
        let mut vias = MultiValueGroup::new(&mut h, "Via");
        vias.remove_last_value();
        assert_eq!(vias.count(), 1);
        assert!(vias.topmost_value().unwrap().render().contains('a'));
    }

    #[test]
    fn add_to_top_inserts_at_collection_front() {
        let mut h = headers("CSeq: 1 INVITE\r\nVia: SIP/2.0/UDP old;branch=z9hG4bK-o\r\n\r\n");
        let mut vias = MultiValueGroup::new(&mut h, "v");
        let mut via = ViaParm::new("UDP", crate::via::HostPort::new("proxy.example.com", None));
        via.set_branch(Some("z9hG4bK-new")).unwrap();
        vias.add_to_top(via.into_value());
        assert!(vias.topmost_value().unwrap().render().contains("proxy.example.com"));
        assert_eq!(h.fields()[0].name(), "Via");
    }

    #[test]
    fn value_less_fields_are_skipped() {
        let mut h = headers("Supported:\r\nSupported: 100rel, timer\r\n\r\n");
        let mut sup = MultiValueGroup::new(&mut h, "Supported");
        assert_eq!(sup.count(), 2);
        assert_eq!(sup.topmost_value().unwrap().render(), "100rel");
        assert_eq!(sup.last_value().unwrap().render(), "timer");

        sup.remove_topmost_value();
        assert_eq!(sup.topmost_value().unwrap().render(), "timer");
        sup.remove_last_value();
        assert!(sup.topmost_value().is_none());
        // only the empty field is left, untouched by the removals
        assert_eq!(h.get("Supported").count(), 1);
    }

    #[test]
    fn single_group_indexed_removal() {
        let mut h = headers(
            "Authorization: Digest username=\"bob\", realm=\"x\"\r\n\
             CSeq: 1 INVITE\r\n\
             Authorization: Digest username=\"alice\", realm=\"x\"\r\n\r\n",
        );
        let mut auth = SingleValueGroup::new(&mut h, "Authorization");
        auth.remove(1);
        assert_eq!(auth.count(), 1);
        assert!(auth.first_value().unwrap().render().contains("bob"));
        auth.remove(5);
        assert_eq!(auth.count(), 1);
    }

    #[test]
    fn single_group_set_and_first() {
        let mut h = headers("\r\n");
        let mut auth = SingleValueGroup::new(&mut h, "Authorization");
        assert!(auth.is_empty());
        auth.set(Credentials::parse_str("Digest username=\"bob\", realm=\"x\"").unwrap().into_value());
        assert_eq!(auth.count(), 1);
        auth.set(Credentials::parse_str("Digest username=\"alice\", realm=\"x\"").unwrap().into_value());
        assert_eq!(auth.count(), 1);
        assert!(auth.first_value().unwrap().render().contains("alice"));
    }
}
