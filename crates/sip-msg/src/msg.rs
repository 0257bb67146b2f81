// siphon-rs - The Siphon SIP Stack
// Copyright (C) 2025 James Ferris <ferrous.communications@gmail.com>
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The message envelope: header collection plus body, and the request and
//! response types wrapping it with a start line.
//!
//! `Content-Length` is derived state. On parse it only sizes the body
//! read (missing or garbled means zero, by design); on write it is always
//! recomputed from the actual body buffer and emitted last, whatever the
//! collection holds.

use std::fmt;
use std::io::{self, BufRead, Cursor, Read, Write};
use std::ops::{Deref, DerefMut};

use bytes::Bytes;
use nom::bytes::complete::{tag, take_while1};
use nom::character::complete::{char, digit1};
use nom::combinator::{map_res, verify};
use nom::IResult;
use smol_str::SmolStr;

use crate::addr_headers::{AddressParam, ReferredBy, TaggedAddress};
use crate::auth::AuthenticationInfo;
use crate::cseq::{CSeq, RAck};
use crate::dialog::{Join, Replaces, TargetDialog};
use crate::disposition::ContentDisposition;
use crate::error::{MessageError, ValueError};
use crate::event::{Event, SubscriptionState};
use crate::field::HeaderField;
use crate::group::{MultiValueGroup, SingleValueGroup};
use crate::headers::HeaderFieldCollection;
use crate::identity::IdentityInfo;
use crate::method::Method;
use crate::refer_sub::ReferSub;
use crate::registry;
use crate::retry_after::RetryAfter;
use crate::session_timer::{MinSe, SessionExpires};
use crate::timestamp::Timestamp;
use crate::tokens::CallId;
use crate::value::ValueVariant;

pub const SIP_VERSION: &str = "SIP/2.0";

macro_rules! single_header {
    ($(#[$meta:meta])* $get:ident, $set:ident, $name:literal, $ty:ty) => {
        $(#[$meta])*
        pub fn $get(&self) -> Option<&$ty> {
            self.headers.get_first($name)?.typed::<$ty>()
        }

        /// Setting `None` removes the header; `Some` upserts it.
        pub fn $set(&mut self, value: Option<$ty>) {
            match value {
                None => self.headers.remove_all($name),
                Some(v) => SingleValueGroup::new(&mut self.headers, $name).set(v.into_value()),
            }
        }
    };
}

macro_rules! group_header {
    ($(#[$meta:meta])* $get:ident, $name:literal) => {
        $(#[$meta])*
        pub fn $get(&mut self) -> MultiValueGroup<'_> {
            MultiValueGroup::new(&mut self.headers, $name)
        }
    };
}

macro_rules! sv_group_header {
    ($(#[$meta:meta])* $get:ident, $name:literal) => {
        $(#[$meta])*
        pub fn $get(&mut self) -> SingleValueGroup<'_> {
            SingleValueGroup::new(&mut self.headers, $name)
        }
    };
}

macro_rules! text_header {
    ($(#[$meta:meta])* $get:ident, $set:ident, $name:literal) => {
        $(#[$meta])*
        pub fn $get(&self) -> Option<String> {
            Some(self.headers.get_first($name)?.value())
        }

        /// Setting `None` removes the header; `Some` upserts it.
        pub fn $set(&mut self, value: Option<&str>) {
            self.set_raw($name, value);
        }
    };
}

macro_rules! u32_header {
    ($(#[$meta:meta])* $get:ident, $set:ident, $name:literal) => {
        $(#[$meta])*
        pub fn $get(&self) -> Option<u32> {
            self.headers.get_first($name)?.value().trim().parse().ok()
        }

        /// Setting `None` removes the header; `Some` upserts it.
        pub fn $set(&mut self, value: Option<u32>) {
            self.set_raw($name, value.map(|v| v.to_string()).as_deref());
        }
    };
}

/// A SIP message: ordered headers and an opaque body.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Message {
    headers: HeaderFieldCollection,
    body: Bytes,
}

impl Message {
    pub fn new() -> Self {
        Message::default()
    }

    /// Reads the header block and then exactly `Content-Length` body
    /// bytes. A missing or unparsable Content-Length reads zero body
    /// bytes; a short stream yields a truncated body, not an error.
    pub fn parse<R: BufRead>(stream: &mut R) -> Result<Self, MessageError> {
        let headers = HeaderFieldCollection::parse(stream)?;
        let content_length = headers
            .get_first("Content-Length")
            .and_then(|f| f.value().trim().parse::<u64>().ok())
            .unwrap_or(0);
        let mut body = Vec::new();
        stream.take(content_length).read_to_end(&mut body)?;
        Ok(Message {
            headers,
            body: Bytes::from(body),
        })
    }

    pub fn parse_bytes(bytes: &[u8]) -> Result<Self, MessageError> {
        Message::parse(&mut Cursor::new(bytes))
    }

    pub fn headers(&self) -> &HeaderFieldCollection {
        &self.headers
    }

    pub fn headers_mut(&mut self) -> &mut HeaderFieldCollection {
        &mut self.headers
    }

    pub fn body(&self) -> &Bytes {
        &self.body
    }

    pub fn set_body(&mut self, body: impl Into<Bytes>) {
        self.body = body.into();
    }

    /// Writes headers and body. Any Content-Length field in the
    /// collection is skipped and a recomputed one is emitted last, so the
    /// framing always matches the body.
    pub fn write_to<W: Write>(&self, out: &mut W) -> io::Result<()> {
        for field in &self.headers {
            if field.name().eq_ignore_ascii_case("Content-Length") {
                continue;
            }
            write!(out, "{}: {}\r\n", field.name(), field.value())?;
        }
        write!(out, "Content-Length: {}\r\n\r\n", self.body.len())?;
        out.write_all(&self.body)
    }

    pub fn to_bytes(&self) -> Bytes {
        let mut out = Vec::new();
        // Vec<u8> writes cannot fail.
        self.write_to(&mut out).unwrap_or_default();
        Bytes::from(out)
    }

    fn set_raw(&mut self, name: &str, value: Option<&str>) {
        match value {
            None => self.headers.remove_all(name),
            Some(v) => {
                let canonical = registry::canonical_name(name);
                let field = HeaderField::raw(&canonical, v);
                match self.headers.position_of(&canonical) {
                    Some(index) => self.headers.fields_mut()[index] = field,
                    None => self.headers.push(field),
                }
            }
        }
    }

    // Typed single-value headers.

    single_header!(authentication_info, set_authentication_info, "Authentication-Info", AuthenticationInfo);
    single_header!(call_id, set_call_id, "Call-ID", CallId);
    single_header!(content_disposition, set_content_disposition, "Content-Disposition", ContentDisposition);
    single_header!(cseq, set_cseq, "CSeq", CSeq);
    single_header!(event, set_event, "Event", Event);
    single_header!(from, set_from, "From", TaggedAddress);
    single_header!(identity_info, set_identity_info, "Identity-Info", IdentityInfo);
    single_header!(join, set_join, "Join", Join);
    single_header!(min_se, set_min_se, "Min-SE", MinSe);
    single_header!(rack, set_rack, "RAck", RAck);
    single_header!(refer_sub, set_refer_sub, "Refer-Sub", ReferSub);
    single_header!(refer_to, set_refer_to, "Refer-To", AddressParam);
    single_header!(referred_by, set_referred_by, "Referred-By", ReferredBy);
    single_header!(replaces, set_replaces, "Replaces", Replaces);
    single_header!(retry_after, set_retry_after, "Retry-After", RetryAfter);
    single_header!(session_expires, set_session_expires, "Session-Expires", SessionExpires);
    single_header!(subscription_state, set_subscription_state, "Subscription-State", SubscriptionState);
    single_header!(target_dialog, set_target_dialog, "Target-Dialog", TargetDialog);
    single_header!(timestamp, set_timestamp, "Timestamp", Timestamp);
    single_header!(to, set_to, "To", TaggedAddress);

    // Repeatable headers with one value per line.

    sv_group_header!(authorization, "Authorization");
    sv_group_header!(proxy_authenticate, "Proxy-Authenticate");
    sv_group_header!(proxy_authorization, "Proxy-Authorization");
    sv_group_header!(www_authenticate, "WWW-Authenticate");

    // Repeatable comma-listable headers.

    group_header!(accept, "Accept");
    group_header!(accept_contact, "Accept-Contact");
    group_header!(accept_encoding, "Accept-Encoding");
    group_header!(accept_language, "Accept-Language");
    group_header!(accept_resource_priority, "Accept-Resource-Priority");
    group_header!(alert_info, "Alert-Info");
    group_header!(allow, "Allow");
    group_header!(allow_events, "Allow-Events");
    group_header!(call_info, "Call-Info");
    group_header!(contact, "Contact");
    group_header!(content_encoding, "Content-Encoding");
    group_header!(content_language, "Content-Language");
    group_header!(error_info, "Error-Info");
    group_header!(history_info, "History-Info");
    group_header!(in_reply_to, "In-Reply-To");
    group_header!(path, "Path");
    group_header!(proxy_require, "Proxy-Require");
    group_header!(reason, "Reason");
    group_header!(record_route, "Record-Route");
    group_header!(reject_contact, "Reject-Contact");
    group_header!(reply_to, "Reply-To");
    group_header!(request_disposition, "Request-Disposition");
    group_header!(require, "Require");
    group_header!(resource_priority, "Resource-Priority");
    group_header!(route, "Route");
    group_header!(security_client, "Security-Client");
    group_header!(security_server, "Security-Server");
    group_header!(security_verify, "Security-Verify");
    group_header!(service_route, "Service-Route");
    group_header!(supported, "Supported");
    group_header!(unsupported, "Unsupported");
    group_header!(
        /// The Via stack. Topmost Via is the most recent hop.
        via, "Via");
    group_header!(warning, "Warning");

    // Untyped text headers.

    text_header!(content_type, set_content_type, "Content-Type");
    text_header!(date, set_date, "Date");
    text_header!(identity, set_identity, "Identity");
    text_header!(mime_version, set_mime_version, "MIME-Version");
    text_header!(organization, set_organization, "Organization");
    text_header!(priority, set_priority, "Priority");
    text_header!(server, set_server, "Server");
    text_header!(subject, set_subject, "Subject");
    text_header!(user_agent, set_user_agent, "User-Agent");

    // Numeric headers.

    u32_header!(expires, set_expires, "Expires");
    u32_header!(max_forwards, set_max_forwards, "Max-Forwards");
    u32_header!(min_expires, set_min_expires, "Min-Expires");
    u32_header!(rseq, set_rseq, "RSeq");
}

/// `Method SP Request-URI SP SIP-Version`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestLine {
    pub method: Method,
    pub uri: SmolStr,
}

impl fmt::Display for RequestLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.method, self.uri, SIP_VERSION)
    }
}

/// `SIP-Version SP Status-Code SP Reason-Phrase`, code in 100..=699.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusLine {
    pub code: u16,
    pub reason: SmolStr,
}

impl fmt::Display for StatusLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", SIP_VERSION, self.code, self.reason)
    }
}

fn request_line(input: &str) -> IResult<&str, RequestLine> {
    let (input, method) = take_while1(|c: char| c != ' ')(input)?;
    let (input, _) = char(' ')(input)?;
    let (input, uri) = take_while1(|c: char| c != ' ')(input)?;
    let (input, _) = char(' ')(input)?;
    let (input, _) = tag(SIP_VERSION)(input)?;
    Ok((
        input,
        RequestLine {
            method: Method::from_token(method),
            uri: SmolStr::new(uri),
        },
    ))
}

fn status_line(input: &str) -> IResult<&str, StatusLine> {
    let (input, _) = tag(SIP_VERSION)(input)?;
    let (input, _) = char(' ')(input)?;
    let (input, code) = verify(map_res(digit1, str::parse::<u16>), |c| {
        (100..=699).contains(c)
    })(input)?;
    let (input, reason) = nom::combinator::rest(input)?;
    Ok((
        input,
        StatusLine {
            code,
            reason: SmolStr::new(reason.trim()),
        },
    ))
}

fn read_start_line<R: BufRead>(stream: &mut R) -> Result<String, MessageError> {
    // Tolerate blank lines before the start line, per RFC 3261 7.5.
    loop {
        let mut line = String::new();
        let n = stream.read_line(&mut line)?;
        let stripped = line.trim_end_matches(['\r', '\n']);
        if n == 0 {
            return Err(MessageError::InvalidStartLine(SmolStr::new("")));
        }
        if !stripped.is_empty() {
            return Ok(stripped.to_string());
        }
    }
}

/// A SIP request: request line plus message.
#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    request_line: RequestLine,
    message: Message,
}

impl Request {
    pub fn new(method: Method, uri: impl Into<SmolStr>) -> Self {
        Request {
            request_line: RequestLine {
                method,
                uri: uri.into(),
            },
            message: Message::new(),
        }
    }

    pub fn parse<R: BufRead>(stream: &mut R) -> Result<Self, MessageError> {
        let line = read_start_line(stream)?;
        let request_line = match request_line(&line) {
            Ok(("", rl)) => rl,
            _ => return Err(MessageError::InvalidStartLine(SmolStr::new(line))),
        };
        Ok(Request {
            request_line,
            message: Message::parse(stream)?,
        })
    }

    pub fn parse_bytes(bytes: &[u8]) -> Result<Self, MessageError> {
        Request::parse(&mut Cursor::new(bytes))
    }

    pub fn request_line(&self) -> &RequestLine {
        &self.request_line
    }

    pub fn method(&self) -> &Method {
        &self.request_line.method
    }

    pub fn uri(&self) -> &str {
        &self.request_line.uri
    }

    pub fn set_uri(&mut self, uri: impl Into<SmolStr>) {
        self.request_line.uri = uri.into();
    }

    pub fn write_to<W: Write>(&self, out: &mut W) -> io::Result<()> {
        write!(out, "{}\r\n", self.request_line)?;
        self.message.write_to(out)
    }

    pub fn to_bytes(&self) -> Bytes {
        let mut out = Vec::new();
        self.write_to(&mut out).unwrap_or_default();
        Bytes::from(out)
    }
}

impl Deref for Request {
    type Target = Message;

    fn deref(&self) -> &Message {
        &self.message
    }
}

impl DerefMut for Request {
    fn deref_mut(&mut self) -> &mut Message {
        &mut self.message
    }
}

/// A SIP response: status line plus message.
#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    status_line: StatusLine,
    message: Message,
}

impl Response {
    /// Builds a response. The status code must be in 100..=699, the same
    /// range the status-line parser accepts.
    pub fn new(code: u16, reason: impl Into<SmolStr>) -> Result<Self, ValueError> {
        if !(100..=699).contains(&code) {
            return Err(ValueError::new("status code", code.to_string()));
        }
        Ok(Response {
            status_line: StatusLine {
                code,
                reason: reason.into(),
            },
            message: Message::new(),
        })
    }

    pub fn set_status_code(&mut self, code: u16) -> Result<(), ValueError> {
        if !(100..=699).contains(&code) {
            return Err(ValueError::new("status code", code.to_string()));
        }
        self.status_line.code = code;
        Ok(())
    }

    pub fn parse<R: BufRead>(stream: &mut R) -> Result<Self, MessageError> {
        let line = read_start_line(stream)?;
        let status_line = match status_line(&line) {
            Ok(("", sl)) => sl,
            _ => return Err(MessageError::InvalidStartLine(SmolStr::new(line))),
        };
        Ok(Response {
            status_line,
            message: Message::parse(stream)?,
        })
    }

    pub fn parse_bytes(bytes: &[u8]) -> Result<Self, MessageError> {
        Response::parse(&mut Cursor::new(bytes))
    }

    pub fn status_line(&self) -> &StatusLine {
        &self.status_line
    }

    pub fn status_code(&self) -> u16 {
        self.status_line.code
    }

    pub fn reason_phrase(&self) -> &str {
        &self.status_line.reason
    }

    pub fn is_provisional(&self) -> bool {
        (100..200).contains(&self.status_line.code)
    }

    pub fn is_final(&self) -> bool {
        !self.is_provisional()
    }

    pub fn write_to<W: Write>(&self, out: &mut W) -> io::Result<()> {
        write!(out, "{}\r\n", self.status_line)?;
        self.message.write_to(out)
    }

    pub fn to_bytes(&self) -> Bytes {
        let mut out = Vec::new();
        self.write_to(&mut out).unwrap_or_default();
        Bytes::from(out)
    }
}

impl Deref for Response {
    type Target = Message;

    fn deref(&self) -> &Message {
        &self.message
    }
}

impl DerefMut for Response {
    fn deref_mut(&mut self) -> &mut Message {
        &mut self.message
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cseq_end_to_end() {
        let msg = Message::parse_bytes(b"CSeq: 4711 INVITE\r\n\r\n").unwrap();
        let cseq = msg.cseq().unwrap();
        assert_eq!(cseq.sequence_number(), 4711);
        assert_eq!(cseq.method(), &Method::Invite);
        let bytes = msg.to_bytes();
        assert_eq!(&bytes[..], b"CSeq: 4711 INVITE\r\nContent-Length: 0\r\n\r\n" as &[u8]);
    }

    #[test]
    fn body_framing_is_recomputed() {
        let mut msg = Message::parse_bytes(b"Content-Length: 9999\r\n\r\n").unwrap();
        assert!(msg.body().is_empty());
        msg.set_body(&b"v=0\r\n"[..]);
        let rendered = String::from_utf8(msg.to_bytes().to_vec()).unwrap();
        assert!(rendered.contains("Content-Length: 5\r\n"));
        assert!(rendered.ends_with("v=0\r\n"));
    }

    #[test]
    fn garbled_content_length_reads_no_body() {
        let msg = Message::parse_bytes(b"Content-Length: soon\r\n\r\nSHOULD NOT BE READ").unwrap();
        assert!(msg.body().is_empty());
    }

    #[test]
    fn body_is_sized_by_content_length() {
        let msg = Message::parse_bytes(b"Content-Length: 4\r\n\r\nabcdefgh").unwrap();
        assert_eq!(&msg.body()[..], b"abcd");
    }

    #[test]
    fn setter_none_removes_and_some_upserts() {
        let mut msg = Message::new();
        msg.set_max_forwards(Some(70));
        assert_eq!(msg.max_forwards(), Some(70));
        msg.set_max_forwards(Some(69));
        assert_eq!(msg.headers().get("Max-Forwards").count(), 1);
        msg.set_max_forwards(None);
        assert!(msg.headers().get_first("Max-Forwards").is_none());
    }

    #[test]
    fn request_parse_and_render() {
        let wire = b"INVITE sip:bob@biloxi.com SIP/2.0\r\n\
            Via: SIP/2.0/UDP pc33.atlanta.com;branch=z9hG4bK776asdhds\r\n\
            Max-Forwards: 70\r\n\
            To: Bob <sip:bob@biloxi.com>\r\n\
            From: Alice <sip:alice@atlanta.com>;tag=1928301774\r\n\
            Call-ID: a84b4c76e66710@pc33.atlanta.com\r\n\
            CSeq: 314159 INVITE\r\n\
            Contact: <sip:alice@pc33.atlanta.com>\r\n\
            Content-Length: 0\r\n\r\n";
        let req = Request::parse_bytes(wire).unwrap();
        assert_eq!(req.method(), &Method::Invite);
        assert_eq!(req.uri(), "sip:bob@biloxi.com");
        assert_eq!(req.cseq().unwrap().sequence_number(), 314159);
        assert_eq!(req.from().unwrap().tag(), Some("1928301774"));
        assert_eq!(req.to().unwrap().address().display_name(), "Bob");
        let rendered = String::from_utf8(req.to_bytes().to_vec()).unwrap();
        assert!(rendered.starts_with("INVITE sip:bob@biloxi.com SIP/2.0\r\n"));
        assert!(rendered.ends_with("Content-Length: 0\r\n\r\n"));
    }

    #[test]
    fn response_parse() {
        let wire = b"SIP/2.0 200 OK\r\nCSeq: 1 REGISTER\r\nContent-Length: 0\r\n\r\n";
        let rsp = Response::parse_bytes(wire).unwrap();
        assert_eq!(rsp.status_code(), 200);
        assert_eq!(rsp.reason_phrase(), "OK");
        assert!(rsp.is_final());
    }

    #[test]
    fn response_status_code_range_enforced() {
        assert!(Response::new(99, "Too Low").is_err());
        assert!(Response::new(700, "Too High").is_err());

        let mut rsp = Response::new(180, "Ringing").unwrap();
        assert!(rsp.set_status_code(1000).is_err());
        assert_eq!(rsp.status_code(), 180);
        rsp.set_status_code(486).unwrap();

        // a constructed response always reparses
        let reparsed = Response::parse_bytes(&rsp.to_bytes()).unwrap();
        assert_eq!(reparsed.status_code(), 486);
        assert_eq!(reparsed.reason_phrase(), "Ringing");
    }

    #[test]
    fn bad_start_line_is_rejected() {
        assert!(matches!(
            Request::parse_bytes(b"NOT A REQUEST\r\n\r\n"),
            Err(MessageError::InvalidStartLine(_))
        ));
        assert!(matches!(
            Response::parse_bytes(b"SIP/2.0 99 Too Low\r\n\r\n"),
            Err(MessageError::InvalidStartLine(_))
        ));
    }
}
