// siphon-rs - The Siphon SIP Stack
// Copyright (C) 2025 James Ferris <ferrous.communications@gmail.com>
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Accept, Accept-Encoding and Accept-Language value grammars.

use std::fmt;

use smol_str::SmolStr;

use crate::error::{GrammarError, ValueError};
use crate::params::{parse_qvalue, Params};
use crate::reader::Reader;
use crate::value::HeaderValue;

/// One Accept value: `media-range *(SEMI (media-param / accept-param))`.
///
/// Parameters are split on the `q` boundary: everything before `q` belongs
/// to the media range, `q` and everything after it are accept parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AcceptRange {
    media_type: SmolStr,
    media_params: Params,
    accept_params: Params,
}

impl AcceptRange {
    pub fn new(media_type: impl Into<SmolStr>) -> Self {
        AcceptRange {
            media_type: media_type.into(),
            media_params: Params::new(),
            accept_params: Params::new(),
        }
    }

    /// The media range, e.g. `application/sdp` or `text/*`.
    pub fn media_type(&self) -> &str {
        &self.media_type
    }

    pub fn set_media_type(&mut self, media_type: &str) -> Result<(), ValueError> {
        if media_type.is_empty() {
            return Err(ValueError::new("media type", media_type));
        }
        self.media_type = SmolStr::new(media_type);
        Ok(())
    }

    pub fn media_params(&self) -> &Params {
        &self.media_params
    }

    pub fn media_params_mut(&mut self) -> &mut Params {
        &mut self.media_params
    }

    pub fn accept_params(&self) -> &Params {
        &self.accept_params
    }

    pub fn accept_params_mut(&mut self) -> &mut Params {
        &mut self.accept_params
    }

    pub fn qvalue(&self) -> Option<f32> {
        parse_qvalue(self.accept_params.value_of("q")?)
    }

    pub fn set_qvalue(&mut self, q: Option<f32>) -> Result<(), ValueError> {
        match q {
            None => self.accept_params.remove("q"),
            Some(q) if (0.0..=1.0).contains(&q) => {
                self.accept_params.set("q", Some(&q.to_string()))
            }
            Some(q) => return Err(ValueError::new("q", q.to_string())),
        }
        Ok(())
    }
}

impl fmt::Display for AcceptRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}{}",
            self.media_type, self.media_params, self.accept_params
        )
    }
}

impl HeaderValue for AcceptRange {
    fn parse(reader: &mut Reader<'_>) -> Result<Self, GrammarError> {
        reader.skip_ws();
        let media_type = reader
            .read_word()
            .ok_or(GrammarError::Missing("media range"))?;
        let mut media_params = Params::new();
        let mut accept_params = Params::new();
        let mut seen_q = false;
        for param in Params::parse(reader)?.into_iter() {
            if param.name().eq_ignore_ascii_case("q") {
                seen_q = true;
            }
            if seen_q {
                accept_params.push(param);
            } else {
                media_params.push(param);
            }
        }
        Ok(AcceptRange {
            media_type: SmolStr::new(media_type),
            media_params,
            accept_params,
        })
    }
}

/// One Accept-Encoding value: `codings *(SEMI accept-param)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Encoding {
    coding: SmolStr,
    params: Params,
}

impl Encoding {
    pub fn new(coding: impl Into<SmolStr>) -> Self {
        Encoding {
            coding: coding.into(),
            params: Params::new(),
        }
    }

    /// The content coding, e.g. `gzip` or `*`.
    pub fn coding(&self) -> &str {
        &self.coding
    }

    pub fn set_coding(&mut self, coding: &str) -> Result<(), ValueError> {
        if coding.is_empty() {
            return Err(ValueError::new("content coding", coding));
        }
        self.coding = SmolStr::new(coding);
        Ok(())
    }

    pub fn params(&self) -> &Params {
        &self.params
    }

    pub fn params_mut(&mut self) -> &mut Params {
        &mut self.params
    }

    pub fn qvalue(&self) -> Option<f32> {
        parse_qvalue(self.params.value_of("q")?)
    }

    pub fn set_qvalue(&mut self, q: Option<f32>) -> Result<(), ValueError> {
        match q {
            None => self.params.remove("q"),
            Some(q) if (0.0..=1.0).contains(&q) => self.params.set("q", Some(&q.to_string())),
            Some(q) => return Err(ValueError::new("q", q.to_string())),
        }
        Ok(())
    }
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.coding, self.params)
    }
}

impl HeaderValue for Encoding {
    fn parse(reader: &mut Reader<'_>) -> Result<Self, GrammarError> {
        reader.skip_ws();
        if reader.consume('*') {
            let params = Params::parse(reader)?;
            return Ok(Encoding {
                coding: SmolStr::new("*"),
                params,
            });
        }
        let coding = reader
            .read_word()
            .ok_or(GrammarError::Missing("content coding"))?;
        let params = Params::parse(reader)?;
        Ok(Encoding {
            coding: SmolStr::new(coding),
            params,
        })
    }
}

/// One Accept-Language value: `language-range *(SEMI accept-param)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Language {
    range: SmolStr,
    params: Params,
}

impl Language {
    pub fn new(range: impl Into<SmolStr>) -> Self {
        Language {
            range: range.into(),
            params: Params::new(),
        }
    }

    /// The language range, e.g. `en-gb`, `da` or `*`.
    pub fn range(&self) -> &str {
        &self.range
    }

    pub fn set_range(&mut self, range: &str) -> Result<(), ValueError> {
        if range.is_empty() {
            return Err(ValueError::new("language range", range));
        }
        self.range = SmolStr::new(range);
        Ok(())
    }

    pub fn params(&self) -> &Params {
        &self.params
    }

    pub fn params_mut(&mut self) -> &mut Params {
        &mut self.params
    }

    pub fn qvalue(&self) -> Option<f32> {
        parse_qvalue(self.params.value_of("q")?)
    }

    pub fn set_qvalue(&mut self, q: Option<f32>) -> Result<(), ValueError> {
        match q {
            None => self.params.remove("q"),
            Some(q) if (0.0..=1.0).contains(&q) => self.params.set("q", Some(&q.to_string())),
            Some(q) => return Err(ValueError::new("q", q.to_string())),
        }
        Ok(())
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.range, self.params)
    }
}

impl HeaderValue for Language {
    fn parse(reader: &mut Reader<'_>) -> Result<Self, GrammarError> {
        reader.skip_ws();
        if reader.consume('*') {
            let params = Params::parse(reader)?;
            return Ok(Language {
                range: SmolStr::new("*"),
                params,
            });
        }
        let range = reader
            .read_word()
            .ok_or(GrammarError::Missing("language range"))?;
        let params = Params::parse(reader)?;
        Ok(Language {
            range: SmolStr::new(range),
            params,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accept_splits_params_at_q() {
        let a = AcceptRange::parse_str("application/sdp;level=1;q=0.7;custom=x").unwrap();
        assert_eq!(a.media_type(), "application/sdp");
        assert_eq!(a.media_params().value_of("level"), Some("1"));
        assert_eq!(a.accept_params().value_of("q"), Some("0.7"));
        assert_eq!(a.accept_params().value_of("custom"), Some("x"));
        assert_eq!(a.qvalue(), Some(0.7));
        assert_eq!(a.render(), "application/sdp;level=1;q=0.7;custom=x");
    }

    #[test]
    fn accept_without_q_keeps_everything_media() {
        let a = AcceptRange::parse_str("text/*;charset=utf-8").unwrap();
        assert_eq!(a.media_params().value_of("charset"), Some("utf-8"));
        assert!(a.accept_params().is_empty());
        assert_eq!(a.qvalue(), None);
    }

    #[test]
    fn encoding_with_q() {
        let e = Encoding::parse_str("gzip;q=0.8").unwrap();
        assert_eq!(e.coding(), "gzip");
        assert_eq!(e.qvalue(), Some(0.8));
        assert_eq!(e.render(), "gzip;q=0.8");
    }

    #[test]
    fn language_wildcard() {
        let l = Language::parse_str("*").unwrap();
        assert_eq!(l.range(), "*");
        let l = Language::parse_str("en-gb").unwrap();
        assert_eq!(l.range(), "en-gb");
    }
}
