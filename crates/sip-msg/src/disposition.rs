// siphon-rs - The Siphon SIP Stack
// Copyright (C) 2025 James Ferris <ferrous.communications@gmail.com>
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Content-Disposition value grammar.

use std::fmt;

use smol_str::SmolStr;

use crate::error::{GrammarError, ValueError};
use crate::params::Params;
use crate::reader::Reader;
use crate::value::HeaderValue;

/// Content-Disposition: `disp-type *(SEMI disp-param)` with the
/// `handling` parameter (`optional` / `required`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentDisposition {
    disp_type: SmolStr,
    params: Params,
}

impl ContentDisposition {
    pub fn new(disp_type: impl Into<SmolStr>) -> Self {
        ContentDisposition {
            disp_type: disp_type.into(),
            params: Params::new(),
        }
    }

    /// The disposition type, e.g. `session`, `render` or `icon`.
    pub fn disp_type(&self) -> &str {
        &self.disp_type
    }

    pub fn set_disp_type(&mut self, disp_type: &str) -> Result<(), ValueError> {
        if disp_type.is_empty() {
            return Err(ValueError::new("disposition type", disp_type));
        }
        self.disp_type = SmolStr::new(disp_type);
        Ok(())
    }

    pub fn params(&self) -> &Params {
        &self.params
    }

    pub fn params_mut(&mut self) -> &mut Params {
        &mut self.params
    }

    pub fn handling(&self) -> Option<&str> {
        self.params.value_of("handling")
    }

    pub fn set_handling(&mut self, handling: Option<&str>) {
        match handling {
            None => self.params.remove("handling"),
            Some(h) => self.params.set("handling", Some(h)),
        }
    }
}

impl fmt::Display for ContentDisposition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.disp_type, self.params)
    }
}

impl HeaderValue for ContentDisposition {
    fn parse(reader: &mut Reader<'_>) -> Result<Self, GrammarError> {
        reader.skip_ws();
        let disp_type = reader
            .read_word()
            .ok_or(GrammarError::Missing("disposition type"))?;
        let params = Params::parse(reader)?;
        Ok(ContentDisposition {
            disp_type: SmolStr::new(disp_type),
            params,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_handling() {
        let d = ContentDisposition::parse_str("session;handling=optional").unwrap();
        assert_eq!(d.disp_type(), "session");
        assert_eq!(d.handling(), Some("optional"));
        assert_eq!(d.render(), "session;handling=optional");
    }
}
