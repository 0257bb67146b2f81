// siphon-rs - The Siphon SIP Stack
// Copyright (C) 2025 James Ferris <ferrous.communications@gmail.com>
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The common contract for header value grammars and the tagged union the
//! header collection stores.
//!
//! Each concrete grammar implements [`HeaderValue`]: parse one production
//! from a [`Reader`] (leaving the cursor at the first unconsumed comma,
//! semicolon, or end of input) and render the exact inverse. The
//! [`Value`] enum carries every grammar as a variant so the collection can
//! hold already-typed entries; [`ValueVariant`] links a grammar type to its
//! arm. The dispatch registry is the single source of truth for which
//! header name carries which variant, so extracting a concrete type from a
//! field never needs a fallible downcast in practice.

use std::fmt;

use smol_str::SmolStr;

use crate::error::GrammarError;
use crate::reader::Reader;

/// A header value grammar: parse from a cursor, render to canonical text.
pub trait HeaderValue: fmt::Display + Sized {
    /// Parses exactly one production from the cursor. On success the cursor
    /// is positioned at the first unconsumed delimiter.
    fn parse(reader: &mut Reader<'_>) -> Result<Self, GrammarError>;

    /// Parses a complete string, rejecting trailing garbage.
    fn parse_str(value: &str) -> Result<Self, GrammarError> {
        let mut reader = Reader::new(value);
        let parsed = Self::parse(&mut reader)?;
        reader.skip_ws();
        if !reader.is_empty() {
            return Err(GrammarError::Invalid {
                what: "trailing input",
                value: SmolStr::new(reader.rest()),
            });
        }
        Ok(parsed)
    }

    /// Renders the canonical text form.
    fn render(&self) -> String {
        self.to_string()
    }
}

/// Links a grammar type to its [`Value`] arm.
pub trait ValueVariant: HeaderValue {
    fn into_value(self) -> Value;
    fn value_ref(value: &Value) -> Option<&Self>;
    fn value_mut(value: &mut Value) -> Option<&mut Self>;
}

macro_rules! value_variants {
    ($($variant:ident($ty:ty)),* $(,)?) => {
        /// One typed header value. The variant in a field is fixed by the
        /// registry binding for the field's name.
        #[derive(Debug, Clone, PartialEq)]
        pub enum Value {
            $($variant($ty),)*
        }

        impl Value {
            /// Renders the canonical text of the contained value.
            pub fn render(&self) -> String {
                match self {
                    $(Value::$variant(v) => v.render(),)*
                }
            }
        }

        impl fmt::Display for Value {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                match self {
                    $(Value::$variant(v) => v.fmt(f),)*
                }
            }
        }

        $(
            impl ValueVariant for $ty {
                fn into_value(self) -> Value {
                    Value::$variant(self)
                }

                fn value_ref(value: &Value) -> Option<&Self> {
                    match value {
                        Value::$variant(v) => Some(v),
                        _ => None,
                    }
                }

                fn value_mut(value: &mut Value) -> Option<&mut Self> {
                    match value {
                        Value::$variant(v) => Some(v),
                        _ => None,
                    }
                }
            }
        )*
    };
}

value_variants! {
    Method(crate::method::Method),
    Token(crate::tokens::TokenValue),
    CallId(crate::tokens::CallId),
    CSeq(crate::cseq::CSeq),
    RAck(crate::cseq::RAck),
    Via(crate::via::ViaParm),
    Address(crate::addr_headers::AddressParam),
    Tagged(crate::addr_headers::TaggedAddress),
    Contact(crate::addr_headers::ContactParam),
    ReferredBy(crate::addr_headers::ReferredBy),
    UriInfo(crate::addr_headers::UriInfo),
    HiEntry(crate::addr_headers::HiEntry),
    AcceptRange(crate::accept::AcceptRange),
    Encoding(crate::accept::Encoding),
    Language(crate::accept::Language),
    AcValue(crate::caller_prefs::AcValue),
    RcValue(crate::caller_prefs::RcValue),
    Directive(crate::caller_prefs::Directive),
    Credentials(crate::auth::Credentials),
    Challenge(crate::auth::Challenge),
    AuthInfo(crate::auth::AuthenticationInfo),
    Event(crate::event::Event),
    SubscriptionState(crate::event::SubscriptionState),
    Join(crate::dialog::Join),
    Replaces(crate::dialog::Replaces),
    TargetDialog(crate::dialog::TargetDialog),
    SessionExpires(crate::session_timer::SessionExpires),
    MinSe(crate::session_timer::MinSe),
    RetryAfter(crate::retry_after::RetryAfter),
    Timestamp(crate::timestamp::Timestamp),
    Warning(crate::warning::WarningValue),
    Reason(crate::reason::ReasonValue),
    RValue(crate::resource_priority::RValue),
    SecMechanism(crate::security::SecMechanism),
    IdentityInfo(crate::identity::IdentityInfo),
    Disposition(crate::disposition::ContentDisposition),
    ReferSub(crate::refer_sub::ReferSub),
}
