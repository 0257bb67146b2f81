// siphon-rs - The Siphon SIP Stack
// Copyright (C) 2025 James Ferris <ferrous.communications@gmail.com>
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The `name-addr` / `addr-spec` production shared by From, To, Contact,
//! Route and the other address-carrying headers.
//!
//! ```text
//! name-addr = [ display-name ] LAQUOT addr-spec RAQUOT
//! addr-spec = SIP-URI / SIPS-URI / absoluteURI
//! ```
//!
//! The URI itself is carried as an opaque string; absolute-URI parsing
//! belongs to a different layer. Rendering always emits the bracketed form,
//! which is safe for any URI and mandatory whenever a display name is
//! present.

use std::fmt;

use smol_str::SmolStr;

use crate::error::{GrammarError, ValueError};
use crate::reader::{is_token, quote_string, Reader};
use crate::value::HeaderValue;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NameAddress {
    display_name: SmolStr,
    uri: SmolStr,
}

impl NameAddress {
    pub fn new(display_name: &str, uri: &str) -> Result<Self, ValueError> {
        if uri.is_empty() {
            return Err(ValueError::new("name-addr uri", uri));
        }
        Ok(NameAddress {
            display_name: SmolStr::new(display_name),
            uri: SmolStr::new(uri),
        })
    }

    /// The display name; empty when none was given.
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn set_display_name(&mut self, display_name: &str) {
        self.display_name = SmolStr::new(display_name);
    }

    pub fn uri(&self) -> &str {
        &self.uri
    }

    pub fn set_uri(&mut self, uri: &str) -> Result<(), ValueError> {
        if uri.is_empty() {
            return Err(ValueError::new("name-addr uri", uri));
        }
        self.uri = SmolStr::new(uri);
        Ok(())
    }

    pub fn is_sip_uri(&self) -> bool {
        let lower = self.uri.to_ascii_lowercase();
        lower.starts_with("sip:") || lower.starts_with("sips:")
    }

    pub fn is_secure_uri(&self) -> bool {
        self.uri.to_ascii_lowercase().starts_with("sips:")
    }

}

impl HeaderValue for NameAddress {
    /// Parses either form. In the bare `addr-spec` form everything up to
    /// the next `<`, `;` or `,` belongs to the URI; with a leading display
    /// name (token run or quoted string) the URI must be bracketed.
    fn parse(reader: &mut Reader<'_>) -> Result<Self, GrammarError> {
        reader.skip_ws();
        if reader.starts_with('<') {
            let uri = reader
                .read_parenthesized()
                .ok_or(GrammarError::Missing("addr-spec"))?;
            return Ok(NameAddress {
                display_name: SmolStr::default(),
                uri: SmolStr::new(uri.trim()),
            });
        }

        // Accumulate words (tokens or one quoted string) until `<`, a
        // delimiter, or end of input, preserving inter-word spacing.
        let mut head = String::new();
        loop {
            head.push_str(reader.skip_ws());
            // IPv6 literal in a bare addr-spec: sip:[2001:db8::1]:5060
            if reader.starts_with('[') {
                head.push_str(reader.read_to_delimiter(&[']']));
                if reader.consume(']') {
                    head.push(']');
                }
                continue;
            }
            match reader.read_word() {
                Some(word) => head.push_str(&word),
                None => break,
            }
        }
        reader.skip_ws();

        if reader.starts_with('<') {
            let uri = reader
                .read_parenthesized()
                .ok_or(GrammarError::Missing("addr-spec"))?;
            Ok(NameAddress {
                display_name: SmolStr::new(head.trim()),
                uri: SmolStr::new(uri.trim()),
            })
        } else {
            // Bare addr-spec: everything accumulated is the URI. Any
            // trailing `;params` are header parameters and stay on the
            // cursor for the caller.
            let uri = head.trim();
            if uri.is_empty() {
                return Err(GrammarError::Missing("addr-spec"));
            }
            Ok(NameAddress {
                display_name: SmolStr::default(),
                uri: SmolStr::new(uri),
            })
        }
    }
}

impl fmt::Display for NameAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.display_name.is_empty() {
            write!(f, "<{}>", self.uri)
        } else if is_token(&self.display_name) {
            write!(f, "{} <{}>", self.display_name, self.uri)
        } else {
            write!(f, "{} <{}>", quote_string(&self.display_name), self.uri)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(s: &str) -> NameAddress {
        let mut r = Reader::new(s);
        NameAddress::parse(&mut r).unwrap()
    }

    #[test]
    fn bracketed_addr_spec() {
        let a = parse("<sip:alice@atlanta.com>");
        assert_eq!(a.display_name(), "");
        assert_eq!(a.uri(), "sip:alice@atlanta.com");
        assert_eq!(a.to_string(), "<sip:alice@atlanta.com>");
    }

    #[test]
    fn token_display_name() {
        let a = parse("Alice <sip:alice@atlanta.com>");
        assert_eq!(a.display_name(), "Alice");
        assert_eq!(a.to_string(), "Alice <sip:alice@atlanta.com>");
    }

    #[test]
    fn multi_token_display_name_gets_quoted_on_render() {
        let a = parse("Alice Smith <sips:alice@atlanta.com>");
        assert_eq!(a.display_name(), "Alice Smith");
        assert!(a.is_secure_uri());
        assert_eq!(a.to_string(), "\"Alice Smith\" <sips:alice@atlanta.com>");
    }

    #[test]
    fn quoted_display_name() {
        let a = parse("\"Mr. Watson\" <sip:watson@worcester.example.com>");
        assert_eq!(a.display_name(), "Mr. Watson");
        assert_eq!(a.uri(), "sip:watson@worcester.example.com");
    }

    #[test]
    fn bare_addr_spec_leaves_header_params() {
        let mut r = Reader::new("sip:alice@atlanta.com;tag=1928301774");
        let a = NameAddress::parse(&mut r).unwrap();
        assert_eq!(a.uri(), "sip:alice@atlanta.com");
        assert!(r.starts_with(';'));
    }

    #[test]
    fn bracketed_uri_keeps_uri_params() {
        let mut r = Reader::new("<sip:proxy.example.com;lr>;custom=1");
        let a = NameAddress::parse(&mut r).unwrap();
        assert_eq!(a.uri(), "sip:proxy.example.com;lr");
        assert!(r.starts_with(';'));
    }

    #[test]
    fn bare_ipv6_addr_spec() {
        let mut r = Reader::new("sip:[2001:db8::1]:5060;maddr=239.255.255.1");
        let a = NameAddress::parse(&mut r).unwrap();
        assert_eq!(a.uri(), "sip:[2001:db8::1]:5060");
        assert!(r.starts_with(';'));
        assert_eq!(a.to_string(), "<sip:[2001:db8::1]:5060>");
    }

    #[test]
    fn empty_uri_rejected() {
        assert!(NameAddress::new("Alice", "").is_err());
        let mut a = NameAddress::new("", "sip:a@b").unwrap();
        assert!(a.set_uri("").is_err());
        assert_eq!(a.uri(), "sip:a@b");
    }
}
