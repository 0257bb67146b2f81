// siphon-rs - The Siphon SIP Stack
// Copyright (C) 2025 James Ferris <ferrous.communications@gmail.com>
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Dialog-referencing header values: Join (RFC 3911), Replaces
//! (RFC 3891) and Target-Dialog (RFC 4538). All three carry a Call-ID
//! plus tag parameters identifying the referenced dialog.

use std::fmt;

use smol_str::SmolStr;

use crate::error::{GrammarError, ValueError};
use crate::params::Params;
use crate::reader::Reader;
use crate::value::HeaderValue;

fn read_call_id(reader: &mut Reader<'_>) -> Result<SmolStr, GrammarError> {
    reader.skip_ws();
    let call_id = reader.read_to_delimiter(&[';', ',']).trim();
    if call_id.is_empty() {
        return Err(GrammarError::Missing("callid"));
    }
    Ok(SmolStr::new(call_id))
}

/// Join: `callid *(SEMI join-param)`. Both `to-tag` and `from-tag` are
/// mandatory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Join {
    call_id: SmolStr,
    params: Params,
}

impl Join {
    pub fn new(call_id: impl Into<SmolStr>, to_tag: &str, from_tag: &str) -> Self {
        let mut params = Params::new();
        params.set("to-tag", Some(to_tag));
        params.set("from-tag", Some(from_tag));
        Join {
            call_id: call_id.into(),
            params,
        }
    }

    pub fn call_id(&self) -> &str {
        &self.call_id
    }

    pub fn set_call_id(&mut self, call_id: &str) -> Result<(), ValueError> {
        if call_id.is_empty() {
            return Err(ValueError::new("callid", call_id));
        }
        self.call_id = SmolStr::new(call_id);
        Ok(())
    }

    pub fn params(&self) -> &Params {
        &self.params
    }

    pub fn params_mut(&mut self) -> &mut Params {
        &mut self.params
    }

    pub fn to_tag(&self) -> &str {
        self.params.value_of("to-tag").unwrap_or_default()
    }

    pub fn set_to_tag(&mut self, to_tag: &str) {
        self.params.set("to-tag", Some(to_tag));
    }

    pub fn from_tag(&self) -> &str {
        self.params.value_of("from-tag").unwrap_or_default()
    }

    pub fn set_from_tag(&mut self, from_tag: &str) {
        self.params.set("from-tag", Some(from_tag));
    }
}

impl fmt::Display for Join {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.call_id, self.params)
    }
}

impl HeaderValue for Join {
    fn parse(reader: &mut Reader<'_>) -> Result<Self, GrammarError> {
        let call_id = read_call_id(reader)?;
        let params = Params::parse(reader)?;
        if params.value_of("to-tag").is_none() {
            return Err(GrammarError::MissingParameter("to-tag"));
        }
        if params.value_of("from-tag").is_none() {
            return Err(GrammarError::MissingParameter("from-tag"));
        }
        Ok(Join { call_id, params })
    }
}

/// Replaces: `callid *(SEMI replaces-param)` with `to-tag`, `from-tag`
/// and the `early-only` flag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Replaces {
    call_id: SmolStr,
    params: Params,
}

impl Replaces {
    pub fn new(call_id: impl Into<SmolStr>) -> Self {
        Replaces {
            call_id: call_id.into(),
            params: Params::new(),
        }
    }

    pub fn call_id(&self) -> &str {
        &self.call_id
    }

    pub fn set_call_id(&mut self, call_id: &str) -> Result<(), ValueError> {
        if call_id.is_empty() {
            return Err(ValueError::new("callid", call_id));
        }
        self.call_id = SmolStr::new(call_id);
        Ok(())
    }

    pub fn params(&self) -> &Params {
        &self.params
    }

    pub fn params_mut(&mut self) -> &mut Params {
        &mut self.params
    }

    pub fn to_tag(&self) -> Option<&str> {
        self.params.value_of("to-tag")
    }

    pub fn set_to_tag(&mut self, to_tag: Option<&str>) {
        match to_tag {
            None => self.params.remove("to-tag"),
            Some(t) => self.params.set("to-tag", Some(t)),
        }
    }

    pub fn from_tag(&self) -> Option<&str> {
        self.params.value_of("from-tag")
    }

    pub fn set_from_tag(&mut self, from_tag: Option<&str>) {
        match from_tag {
            None => self.params.remove("from-tag"),
            Some(t) => self.params.set("from-tag", Some(t)),
        }
    }

    /// The `early-only` flag restricting the match to early dialogs.
    pub fn early_only(&self) -> bool {
        self.params.contains("early-only")
    }

    pub fn set_early_only(&mut self, early_only: bool) {
        if early_only {
            self.params.set("early-only", None);
        } else {
            self.params.remove("early-only");
        }
    }
}

impl fmt::Display for Replaces {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.call_id, self.params)
    }
}

impl HeaderValue for Replaces {
    fn parse(reader: &mut Reader<'_>) -> Result<Self, GrammarError> {
        let call_id = read_call_id(reader)?;
        let params = Params::parse(reader)?;
        Ok(Replaces { call_id, params })
    }
}

/// Target-Dialog: `callid *(SEMI td-param)` with `remote-tag` and
/// `local-tag`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetDialog {
    call_id: SmolStr,
    params: Params,
}

impl TargetDialog {
    pub fn new(call_id: impl Into<SmolStr>) -> Self {
        TargetDialog {
            call_id: call_id.into(),
            params: Params::new(),
        }
    }

    pub fn call_id(&self) -> &str {
        &self.call_id
    }

    pub fn set_call_id(&mut self, call_id: &str) -> Result<(), ValueError> {
        if call_id.is_empty() {
            return Err(ValueError::new("callid", call_id));
        }
        self.call_id = SmolStr::new(call_id);
        Ok(())
    }

    pub fn params(&self) -> &Params {
        &self.params
    }

    pub fn params_mut(&mut self) -> &mut Params {
        &mut self.params
    }

    pub fn remote_tag(&self) -> Option<&str> {
        self.params.value_of("remote-tag")
    }

    pub fn set_remote_tag(&mut self, tag: Option<&str>) {
        match tag {
            None => self.params.remove("remote-tag"),
            Some(t) => self.params.set("remote-tag", Some(t)),
        }
    }

    pub fn local_tag(&self) -> Option<&str> {
        self.params.value_of("local-tag")
    }

    pub fn set_local_tag(&mut self, tag: Option<&str>) {
        match tag {
            None => self.params.remove("local-tag"),
            Some(t) => self.params.set("local-tag", Some(t)),
        }
    }
}

impl fmt::Display for TargetDialog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.call_id, self.params)
    }
}

impl HeaderValue for TargetDialog {
    fn parse(reader: &mut Reader<'_>) -> Result<Self, GrammarError> {
        let call_id = read_call_id(reader)?;
        let params = Params::parse(reader)?;
        Ok(TargetDialog { call_id, params })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn join_requires_both_tags() {
        let j = Join::parse_str("12adf2f34456gs5;to-tag=12345;from-tag=54321").unwrap();
        assert_eq!(j.call_id(), "12adf2f34456gs5");
        assert_eq!(j.to_tag(), "12345");
        assert_eq!(j.from_tag(), "54321");
        assert!(matches!(
            Join::parse_str("12adf2f34456gs5;to-tag=12345"),
            Err(GrammarError::MissingParameter("from-tag"))
        ));
    }

    #[test]
    fn replaces_early_only_flag() {
        let r = Replaces::parse_str("98732@sip.example.com;from-tag=r33th4x0r;to-tag=ff87ff;early-only").unwrap();
        assert_eq!(r.call_id(), "98732@sip.example.com");
        assert!(r.early_only());
        assert_eq!(
            r.render(),
            "98732@sip.example.com;from-tag=r33th4x0r;to-tag=ff87ff;early-only"
        );
    }

    #[test]
    fn target_dialog_tags() {
        let t = TargetDialog::parse_str("fa77as7dad8-sd98ajzz@host.example.com;local-tag=kkaz-;remote-tag=6544").unwrap();
        assert_eq!(t.local_tag(), Some("kkaz-"));
        assert_eq!(t.remote_tag(), Some("6544"));
    }
}
