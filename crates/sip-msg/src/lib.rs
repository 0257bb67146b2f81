// siphon-rs - The Siphon SIP Stack
// Copyright (C) 2025 James Ferris <ferrous.communications@gmail.com>
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! SIP message model: header parsing and wire representation.
//!
//! This crate is the header-and-envelope core of the stack:
//! - **Messages**: [`Request`], [`Response`], [`Message`], with
//!   `Content-Length` framing derived from the body buffer
//! - **Headers**: [`HeaderFieldCollection`] with RFC 2822 unfolding,
//!   compact alias expansion (`v:` is `Via:`), and order preservation
//! - **Typed values**: one grammar type per header value production
//!   ([`ViaParm`], [`TaggedAddress`], [`CSeq`], ...), all parsing through
//!   the [`HeaderValue`] trait and stored as [`Value`] variants fixed by
//!   the name registry
//! - **Group views**: [`MultiValueGroup`] and [`SingleValueGroup`] for
//!   proxy-style work on repeating headers (push a Via on top, pop the
//!   topmost, list all in order)
//!
//! Unrecognized header names never fail: they are carried as raw fields
//! and written back out unchanged. Strings use
//! [`SmolStr`](smol_str::SmolStr) and bodies [`Bytes`](bytes::Bytes).
//!
//! # Examples
//!
//! ```
//! # use sip_msg::*;
//! let msg = Message::parse_bytes(b"CSeq: 4711 INVITE\r\n\r\n").unwrap();
//! assert_eq!(msg.cseq().unwrap().sequence_number(), 4711);
//! ```

pub mod accept;
pub mod addr_headers;
pub mod auth;
pub mod caller_prefs;
pub mod cseq;
pub mod dialog;
pub mod disposition;
pub mod error;
pub mod event;
pub mod field;
pub mod group;
pub mod headers;
pub mod identity;
pub mod method;
pub mod msg;
pub mod name_addr;
pub mod params;
pub mod reader;
pub mod reason;
pub mod refer_sub;
pub mod registry;
pub mod resource_priority;
pub mod retry_after;
pub mod security;
pub mod session_timer;
pub mod timestamp;
pub mod tokens;
pub mod value;
pub mod via;
pub mod warning;

pub use accept::{AcceptRange, Encoding, Language};
pub use addr_headers::{AddressParam, ContactParam, HiEntry, ReferredBy, TaggedAddress, UriInfo};
pub use auth::{AuthenticationInfo, Challenge, Credentials};
pub use caller_prefs::{AcValue, Directive, RcValue};
pub use cseq::{CSeq, RAck};
pub use dialog::{Join, Replaces, TargetDialog};
pub use disposition::ContentDisposition;
pub use error::{
    DuplicateParameter, GrammarError, HeaderParseError, MessageError, ValueError,
};
pub use event::{Event, SubscriptionState};
pub use field::{FieldBody, HeaderField};
pub use group::{MultiValueGroup, SingleValueGroup};
pub use headers::HeaderFieldCollection;
pub use identity::IdentityInfo;
pub use method::Method;
pub use msg::{Message, Request, RequestLine, Response, StatusLine, SIP_VERSION};
pub use name_addr::NameAddress;
pub use params::{Param, Params};
pub use reader::Reader;
pub use reason::ReasonValue;
pub use refer_sub::ReferSub;
pub use registry::canonical_name;
pub use resource_priority::RValue;
pub use retry_after::RetryAfter;
pub use security::SecMechanism;
pub use session_timer::{MinSe, Refresher, SessionExpires};
pub use timestamp::Timestamp;
pub use tokens::{CallId, TokenValue};
pub use value::{HeaderValue, Value, ValueVariant};
pub use via::{HostPort, ViaParm, BRANCH_MAGIC_COOKIE};
pub use warning::WarningValue;
