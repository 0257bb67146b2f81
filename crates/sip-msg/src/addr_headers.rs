// siphon-rs - The Siphon SIP Stack
// Copyright (C) 2025 James Ferris <ferrous.communications@gmail.com>
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Header value grammars built on `name-addr`.
//!
//! - [`AddressParam`] — `(name-addr / addr-spec) *(SEMI generic-param)`;
//!   Route, Record-Route, Path, Service-Route, Reply-To, Refer-To.
//! - [`TaggedAddress`] — the same with the `tag` dialog parameter; From/To.
//! - [`ContactParam`] — Contact's `STAR / (contact-param)` with `q` and
//!   `expires`.
//! - [`ReferredBy`] — RFC 3892, `cid` parameter.
//! - [`HiEntry`] — History-Info (RFC 4244), `index` parameter.
//! - [`UriInfo`] — `LAQUOT absoluteURI RAQUOT *(SEMI param)`; Alert-Info,
//!   Error-Info and Call-Info (`purpose` parameter).

use std::fmt;

use smol_str::SmolStr;

use crate::error::{GrammarError, ValueError};
use crate::name_addr::NameAddress;
use crate::params::{parse_qvalue, Params};
use crate::reader::Reader;
use crate::value::HeaderValue;

/// `(name-addr / addr-spec) *(SEMI generic-param)`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AddressParam {
    address: NameAddress,
    params: Params,
}

impl AddressParam {
    pub fn new(address: NameAddress) -> Self {
        AddressParam {
            address,
            params: Params::new(),
        }
    }

    pub fn address(&self) -> &NameAddress {
        &self.address
    }

    pub fn address_mut(&mut self) -> &mut NameAddress {
        &mut self.address
    }

    pub fn params(&self) -> &Params {
        &self.params
    }

    pub fn params_mut(&mut self) -> &mut Params {
        &mut self.params
    }
}

impl fmt::Display for AddressParam {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.address, self.params)
    }
}

impl HeaderValue for AddressParam {
    fn parse(reader: &mut Reader<'_>) -> Result<Self, GrammarError> {
        let address = NameAddress::parse(reader)?;
        let params = Params::parse(reader)?;
        Ok(AddressParam { address, params })
    }
}

/// From / To: `(name-addr / addr-spec) *(SEMI (tag-param / generic-param))`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TaggedAddress {
    address: NameAddress,
    params: Params,
}

impl TaggedAddress {
    pub fn new(address: NameAddress) -> Self {
        TaggedAddress {
            address,
            params: Params::new(),
        }
    }

    pub fn address(&self) -> &NameAddress {
        &self.address
    }

    pub fn address_mut(&mut self) -> &mut NameAddress {
        &mut self.address
    }

    pub fn params(&self) -> &Params {
        &self.params
    }

    pub fn params_mut(&mut self) -> &mut Params {
        &mut self.params
    }

    /// The dialog `tag` parameter, if present.
    pub fn tag(&self) -> Option<&str> {
        self.params.value_of("tag")
    }

    pub fn set_tag(&mut self, tag: Option<&str>) {
        match tag {
            None => self.params.remove("tag"),
            Some(t) => self.params.set("tag", Some(t)),
        }
    }
}

impl fmt::Display for TaggedAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.address, self.params)
    }
}

impl HeaderValue for TaggedAddress {
    fn parse(reader: &mut Reader<'_>) -> Result<Self, GrammarError> {
        let address = NameAddress::parse(reader)?;
        let params = Params::parse(reader)?;
        Ok(TaggedAddress { address, params })
    }
}

/// One Contact header value: `STAR / ((name-addr / addr-spec)
/// *(SEMI contact-params))` with the `q` and `expires` parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactParam {
    // None is the wildcard `Contact: *` used to clear registrations.
    address: Option<NameAddress>,
    params: Params,
}

impl ContactParam {
    pub fn new(address: NameAddress) -> Self {
        ContactParam {
            address: Some(address),
            params: Params::new(),
        }
    }

    /// The wildcard `*` contact.
    pub fn star() -> Self {
        ContactParam {
            address: None,
            params: Params::new(),
        }
    }

    pub fn is_star(&self) -> bool {
        self.address.is_none()
    }

    pub fn address(&self) -> Option<&NameAddress> {
        self.address.as_ref()
    }

    pub fn address_mut(&mut self) -> Option<&mut NameAddress> {
        self.address.as_mut()
    }

    pub fn params(&self) -> &Params {
        &self.params
    }

    pub fn params_mut(&mut self) -> &mut Params {
        &mut self.params
    }

    /// The `q` preference as a float in [0,1]. `None` when absent or
    /// unparsable.
    pub fn qvalue(&self) -> Option<f32> {
        parse_qvalue(self.params.value_of("q")?)
    }

    /// Sets the `q` parameter. Fails (leaving the value unchanged) when the
    /// float is outside [0,1].
    pub fn set_qvalue(&mut self, q: Option<f32>) -> Result<(), ValueError> {
        match q {
            None => self.params.remove("q"),
            Some(q) if (0.0..=1.0).contains(&q) => self.params.set("q", Some(&q.to_string())),
            Some(q) => return Err(ValueError::new("q", q.to_string())),
        }
        Ok(())
    }

    /// The `expires` parameter in seconds.
    pub fn expires(&self) -> Option<u32> {
        self.params.value_of("expires")?.parse().ok()
    }

    pub fn set_expires(&mut self, expires: Option<u32>) {
        match expires {
            None => self.params.remove("expires"),
            Some(e) => self.params.set("expires", Some(&e.to_string())),
        }
    }
}

impl fmt::Display for ContactParam {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.address {
            None => f.write_str("*"),
            Some(address) => write!(f, "{}{}", address, self.params),
        }
    }
}

impl HeaderValue for ContactParam {
    fn parse(reader: &mut Reader<'_>) -> Result<Self, GrammarError> {
        reader.skip_ws();
        if reader.consume('*') {
            return Ok(ContactParam::star());
        }
        let address = NameAddress::parse(reader)?;
        let params = Params::parse(reader)?;
        Ok(ContactParam {
            address: Some(address),
            params,
        })
    }
}

/// Referred-By (RFC 3892): `(name-addr / addr-spec)
/// *(SEMI (referredby-id-param / generic-param))`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ReferredBy {
    address: NameAddress,
    params: Params,
}

impl ReferredBy {
    pub fn new(address: NameAddress) -> Self {
        ReferredBy {
            address,
            params: Params::new(),
        }
    }

    pub fn address(&self) -> &NameAddress {
        &self.address
    }

    pub fn params(&self) -> &Params {
        &self.params
    }

    pub fn params_mut(&mut self) -> &mut Params {
        &mut self.params
    }

    /// The `cid` parameter referencing the signed Referred-By token body.
    pub fn cid(&self) -> Option<&str> {
        self.params.value_of("cid")
    }

    pub fn set_cid(&mut self, cid: Option<&str>) {
        match cid {
            None => self.params.remove("cid"),
            Some(c) => self.params.set("cid", Some(c)),
        }
    }
}

impl fmt::Display for ReferredBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.address, self.params)
    }
}

impl HeaderValue for ReferredBy {
    fn parse(reader: &mut Reader<'_>) -> Result<Self, GrammarError> {
        let address = NameAddress::parse(reader)?;
        let params = Params::parse(reader)?;
        Ok(ReferredBy { address, params })
    }
}

/// One History-Info entry (RFC 4244): `name-addr *(SEMI hi-param)`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct HiEntry {
    address: NameAddress,
    params: Params,
}

impl HiEntry {
    pub fn new(address: NameAddress) -> Self {
        HiEntry {
            address,
            params: Params::new(),
        }
    }

    pub fn address(&self) -> &NameAddress {
        &self.address
    }

    pub fn params(&self) -> &Params {
        &self.params
    }

    pub fn params_mut(&mut self) -> &mut Params {
        &mut self.params
    }

    /// The `index` parameter (`1*DIGIT *("." 1*DIGIT)`).
    pub fn index(&self) -> Option<&str> {
        self.params.value_of("index")
    }

    pub fn set_index(&mut self, index: Option<&str>) {
        match index {
            None => self.params.remove("index"),
            Some(i) => self.params.set("index", Some(i)),
        }
    }
}

impl fmt::Display for HiEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.address, self.params)
    }
}

impl HeaderValue for HiEntry {
    fn parse(reader: &mut Reader<'_>) -> Result<Self, GrammarError> {
        let address = NameAddress::parse(reader)?;
        let params = Params::parse(reader)?;
        Ok(HiEntry { address, params })
    }
}

/// `LAQUOT absoluteURI RAQUOT *(SEMI generic-param)` — Alert-Info,
/// Error-Info and Call-Info share this shape; Call-Info adds `purpose`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UriInfo {
    uri: SmolStr,
    params: Params,
}

impl UriInfo {
    pub fn new(uri: impl Into<SmolStr>) -> Self {
        UriInfo {
            uri: uri.into(),
            params: Params::new(),
        }
    }

    pub fn uri(&self) -> &str {
        &self.uri
    }

    pub fn set_uri(&mut self, uri: &str) -> Result<(), ValueError> {
        if uri.is_empty() {
            return Err(ValueError::new("info uri", uri));
        }
        self.uri = SmolStr::new(uri);
        Ok(())
    }

    pub fn params(&self) -> &Params {
        &self.params
    }

    pub fn params_mut(&mut self) -> &mut Params {
        &mut self.params
    }

    /// Call-Info's `purpose` parameter (`icon`, `info`, `card`, ...).
    pub fn purpose(&self) -> Option<&str> {
        self.params.value_of("purpose")
    }

    pub fn set_purpose(&mut self, purpose: Option<&str>) {
        match purpose {
            None => self.params.remove("purpose"),
            Some(p) => self.params.set("purpose", Some(p)),
        }
    }
}

impl fmt::Display for UriInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}>{}", self.uri, self.params)
    }
}

impl HeaderValue for UriInfo {
    fn parse(reader: &mut Reader<'_>) -> Result<Self, GrammarError> {
        let uri = reader
            .read_parenthesized()
            .ok_or(GrammarError::Missing("info uri"))?;
        let params = Params::parse(reader)?;
        Ok(UriInfo {
            uri: SmolStr::new(uri.trim()),
            params,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_with_tag() {
        let from = TaggedAddress::parse_str("\"A. G. Bell\" <sip:agb@bell-telephone.com> ;tag=a48s")
            .unwrap();
        assert_eq!(from.address().display_name(), "A. G. Bell");
        assert_eq!(from.tag(), Some("a48s"));
        assert_eq!(
            from.render(),
            "\"A. G. Bell\" <sip:agb@bell-telephone.com>;tag=a48s"
        );
    }

    #[test]
    fn bare_from_gets_bracketed_on_render() {
        let from = TaggedAddress::parse_str("sip:+12125551212@server.phone2net.com;tag=887s").unwrap();
        assert_eq!(from.address().uri(), "sip:+12125551212@server.phone2net.com");
        assert_eq!(from.tag(), Some("887s"));
        assert_eq!(
            from.render(),
            "<sip:+12125551212@server.phone2net.com>;tag=887s"
        );
    }

    #[test]
    fn route_keeps_uri_params_inside_brackets() {
        let route = AddressParam::parse_str("<sip:bigbox3.site3.atlanta.com;lr>").unwrap();
        assert_eq!(route.address().uri(), "sip:bigbox3.site3.atlanta.com;lr");
        assert!(route.params().is_empty());
    }

    #[test]
    fn contact_q_and_expires() {
        let c = ContactParam::parse_str("<sips:bob@192.0.2.4>;expires=60;q=0.7").unwrap();
        assert_eq!(c.expires(), Some(60));
        assert_eq!(c.qvalue(), Some(0.7));
        assert_eq!(c.render(), "<sips:bob@192.0.2.4>;expires=60;q=0.7");
    }

    #[test]
    fn contact_star() {
        let c = ContactParam::parse_str("*").unwrap();
        assert!(c.is_star());
        assert_eq!(c.render(), "*");
    }

    #[test]
    fn qvalue_setter_enforces_range() {
        let mut c = ContactParam::new(NameAddress::new("", "sip:a@b").unwrap());
        assert!(c.set_qvalue(Some(1.5)).is_err());
        assert_eq!(c.qvalue(), None);
        c.set_qvalue(Some(0.5)).unwrap();
        assert_eq!(c.params().value_of("q"), Some("0.5"));
    }

    #[test]
    fn referred_by_cid() {
        let r = ReferredBy::parse_str("<sip:referrer@referrer.example>;cid=\"20398823.2UWQFN309shb3@referrer.example\"").unwrap();
        assert_eq!(r.cid(), Some("20398823.2UWQFN309shb3@referrer.example"));
    }

    #[test]
    fn hi_entry_index() {
        let h = HiEntry::parse_str("<sip:bob@example.com>;index=1.1").unwrap();
        assert_eq!(h.index(), Some("1.1"));
    }

    #[test]
    fn call_info_purpose() {
        let i = UriInfo::parse_str("<http://www.example.com/alice/photo.jpg>;purpose=icon").unwrap();
        assert_eq!(i.uri(), "http://www.example.com/alice/photo.jpg");
        assert_eq!(i.purpose(), Some("icon"));
    }
}
