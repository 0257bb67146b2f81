// siphon-rs - The Siphon SIP Stack
// Copyright (C) 2025 James Ferris <ferrous.communications@gmail.com>
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Header name dispatch.
//!
//! Maps a header name, after case folding and compact alias expansion, to
//! the grammar its value carries and whether the value is a comma-separated
//! list. This table is the single source of truth for which [`Value`]
//! variant a field of a given name holds; nothing downstream needs a
//! fallible downcast. Names not in the table stay untyped raw fields and
//! never fail dispatch.

use smol_str::SmolStr;

use crate::accept::{AcceptRange, Encoding, Language};
use crate::addr_headers::{AddressParam, ContactParam, HiEntry, ReferredBy, TaggedAddress, UriInfo};
use crate::auth::{AuthenticationInfo, Challenge, Credentials};
use crate::caller_prefs::{AcValue, Directive, RcValue};
use crate::cseq::{CSeq, RAck};
use crate::dialog::{Join, Replaces, TargetDialog};
use crate::disposition::ContentDisposition;
use crate::error::GrammarError;
use crate::event::{Event, SubscriptionState};
use crate::identity::IdentityInfo;
use crate::method::Method;
use crate::reader::Reader;
use crate::reason::ReasonValue;
use crate::refer_sub::ReferSub;
use crate::resource_priority::RValue;
use crate::retry_after::RetryAfter;
use crate::security::SecMechanism;
use crate::session_timer::{MinSe, SessionExpires};
use crate::timestamp::Timestamp;
use crate::tokens::{CallId, TokenValue};
use crate::value::{Value, ValueVariant};
use crate::via::ViaParm;
use crate::warning::WarningValue;

pub(crate) type ParseFn = fn(&mut Reader<'_>) -> Result<Value, GrammarError>;

/// How a recognized header name binds to its value grammar.
#[derive(Clone, Copy)]
pub(crate) enum Binding {
    /// The whole value is one production.
    Single(ParseFn),
    /// The value is a comma-separated list of productions.
    Multi(ParseFn),
}

fn parse_as<V: ValueVariant>(reader: &mut Reader<'_>) -> Result<Value, GrammarError> {
    V::parse(reader).map(ValueVariant::into_value)
}

/// RFC-defined single-letter header names, expanded before dispatch.
fn expand_alias(name: &str) -> Option<&'static str> {
    let c = name.chars().next()?;
    if name.chars().count() != 1 {
        return None;
    }
    Some(match c.to_ascii_lowercase() {
        'a' => "Accept-Contact",
        'b' => "Referred-By",
        'c' => "Content-Type",
        'd' => "Request-Disposition",
        'e' => "Content-Encoding",
        'f' => "From",
        'i' => "Call-ID",
        'j' => "Reject-Contact",
        'k' => "Supported",
        'l' => "Content-Length",
        'm' => "Contact",
        'n' => "Identity-Info",
        'o' => "Event",
        'r' => "Refer-To",
        's' => "Subject",
        't' => "To",
        'u' => "Allow-Events",
        'v' => "Via",
        'x' => "Session-Expires",
        'y' => "Identity",
        _ => return None,
    })
}

/// Looks up a lowercase header name. Returns the canonical spelling and
/// the grammar binding; `None` binding means the name is known but stays
/// untyped.
fn lookup(lower: &str) -> Option<(&'static str, Option<Binding>)> {
    use Binding::{Multi, Single};
    Some(match lower {
        "accept" => ("Accept", Some(Multi(parse_as::<AcceptRange>))),
        "accept-contact" => ("Accept-Contact", Some(Multi(parse_as::<AcValue>))),
        "accept-encoding" => ("Accept-Encoding", Some(Multi(parse_as::<Encoding>))),
        "accept-language" => ("Accept-Language", Some(Multi(parse_as::<Language>))),
        "accept-resource-priority" => {
            ("Accept-Resource-Priority", Some(Multi(parse_as::<RValue>)))
        }
        "alert-info" => ("Alert-Info", Some(Multi(parse_as::<UriInfo>))),
        "allow" => ("Allow", Some(Multi(parse_as::<Method>))),
        "allow-events" => ("Allow-Events", Some(Multi(parse_as::<TokenValue>))),
        "authentication-info" => {
            ("Authentication-Info", Some(Single(parse_as::<AuthenticationInfo>)))
        }
        "authorization" => ("Authorization", Some(Single(parse_as::<Credentials>))),
        "call-id" => ("Call-ID", Some(Single(parse_as::<CallId>))),
        "call-info" => ("Call-Info", Some(Multi(parse_as::<UriInfo>))),
        "contact" => ("Contact", Some(Multi(parse_as::<ContactParam>))),
        "content-disposition" => {
            ("Content-Disposition", Some(Single(parse_as::<ContentDisposition>)))
        }
        "content-encoding" => ("Content-Encoding", Some(Multi(parse_as::<TokenValue>))),
        "content-language" => ("Content-Language", Some(Multi(parse_as::<TokenValue>))),
        "content-length" => ("Content-Length", None),
        "content-type" => ("Content-Type", None),
        "cseq" => ("CSeq", Some(Single(parse_as::<CSeq>))),
        "date" => ("Date", None),
        "error-info" => ("Error-Info", Some(Multi(parse_as::<UriInfo>))),
        "event" => ("Event", Some(Single(parse_as::<Event>))),
        "expires" => ("Expires", None),
        "from" => ("From", Some(Single(parse_as::<TaggedAddress>))),
        "history-info" => ("History-Info", Some(Multi(parse_as::<HiEntry>))),
        "identity" => ("Identity", None),
        "identity-info" => ("Identity-Info", Some(Single(parse_as::<IdentityInfo>))),
        "in-reply-to" => ("In-Reply-To", Some(Multi(parse_as::<CallId>))),
        "join" => ("Join", Some(Single(parse_as::<Join>))),
        "max-forwards" => ("Max-Forwards", None),
        "mime-version" => ("MIME-Version", None),
        "min-expires" => ("Min-Expires", None),
        "min-se" => ("Min-SE", Some(Single(parse_as::<MinSe>))),
        "organization" => ("Organization", None),
        "path" => ("Path", Some(Multi(parse_as::<AddressParam>))),
        "priority" => ("Priority", None),
        "proxy-authenticate" => ("Proxy-Authenticate", Some(Single(parse_as::<Challenge>))),
        "proxy-authorization" => ("Proxy-Authorization", Some(Single(parse_as::<Credentials>))),
        "proxy-require" => ("Proxy-Require", Some(Multi(parse_as::<TokenValue>))),
        "rack" => ("RAck", Some(Single(parse_as::<RAck>))),
        "reason" => ("Reason", Some(Multi(parse_as::<ReasonValue>))),
        "record-route" => ("Record-Route", Some(Multi(parse_as::<AddressParam>))),
        "refer-sub" => ("Refer-Sub", Some(Single(parse_as::<ReferSub>))),
        "refer-to" => ("Refer-To", Some(Single(parse_as::<AddressParam>))),
        "referred-by" => ("Referred-By", Some(Single(parse_as::<ReferredBy>))),
        "reject-contact" => ("Reject-Contact", Some(Multi(parse_as::<RcValue>))),
        "replaces" => ("Replaces", Some(Single(parse_as::<Replaces>))),
        "reply-to" => ("Reply-To", Some(Multi(parse_as::<AddressParam>))),
        "request-disposition" => ("Request-Disposition", Some(Multi(parse_as::<Directive>))),
        "require" => ("Require", Some(Multi(parse_as::<TokenValue>))),
        "resource-priority" => ("Resource-Priority", Some(Multi(parse_as::<RValue>))),
        "retry-after" => ("Retry-After", Some(Single(parse_as::<RetryAfter>))),
        "route" => ("Route", Some(Multi(parse_as::<AddressParam>))),
        "rseq" => ("RSeq", None),
        "security-client" => ("Security-Client", Some(Multi(parse_as::<SecMechanism>))),
        "security-server" => ("Security-Server", Some(Multi(parse_as::<SecMechanism>))),
        "security-verify" => ("Security-Verify", Some(Multi(parse_as::<SecMechanism>))),
        "server" => ("Server", None),
        "service-route" => ("Service-Route", Some(Multi(parse_as::<AddressParam>))),
        "session-expires" => ("Session-Expires", Some(Single(parse_as::<SessionExpires>))),
        "subject" => ("Subject", None),
        "subscription-state" => {
            ("Subscription-State", Some(Single(parse_as::<SubscriptionState>)))
        }
        "supported" => ("Supported", Some(Multi(parse_as::<TokenValue>))),
        "target-dialog" => ("Target-Dialog", Some(Single(parse_as::<TargetDialog>))),
        "timestamp" => ("Timestamp", Some(Single(parse_as::<Timestamp>))),
        "to" => ("To", Some(Single(parse_as::<TaggedAddress>))),
        "unsupported" => ("Unsupported", Some(Multi(parse_as::<TokenValue>))),
        "user-agent" => ("User-Agent", None),
        "via" => ("Via", Some(Multi(parse_as::<ViaParm>))),
        "warning" => ("Warning", Some(Multi(parse_as::<WarningValue>))),
        "www-authenticate" => ("WWW-Authenticate", Some(Single(parse_as::<Challenge>))),
        _ => return None,
    })
}

/// Resolves a wire header name to its canonical form: compact aliases are
/// expanded and known names get their canonical casing. Unknown names come
/// back trimmed but otherwise as written.
pub fn canonical_name(name: &str) -> SmolStr {
    let name = name.trim().trim_end_matches(':').trim();
    let name = expand_alias(name).unwrap_or(name);
    match lookup(&name.to_ascii_lowercase()) {
        Some((canonical, _)) => SmolStr::new(canonical),
        None => SmolStr::new(name),
    }
}

/// The grammar binding for a header name, if the name is recognized and
/// typed. The name may be an alias or arbitrarily cased.
pub(crate) fn binding(name: &str) -> Option<Binding> {
    let name = name.trim().trim_end_matches(':').trim();
    let name = expand_alias(name).unwrap_or(name);
    lookup(&name.to_ascii_lowercase())?.1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aliases_expand_case_insensitively() {
        assert_eq!(canonical_name("v"), "Via");
        assert_eq!(canonical_name("V"), "Via");
        assert_eq!(canonical_name("m"), "Contact");
        assert_eq!(canonical_name("l"), "Content-Length");
        assert_eq!(canonical_name("i"), "Call-ID");
    }

    #[test]
    fn canonical_casing() {
        assert_eq!(canonical_name("CSEQ"), "CSeq");
        assert_eq!(canonical_name("www-authenticate"), "WWW-Authenticate");
        assert_eq!(canonical_name("min-se"), "Min-SE");
        assert_eq!(canonical_name("rack"), "RAck");
    }

    #[test]
    fn unknown_names_pass_through() {
        assert_eq!(canonical_name("X-Asterisk-HangupCause"), "X-Asterisk-HangupCause");
        assert!(binding("X-Asterisk-HangupCause").is_none());
    }

    #[test]
    fn trailing_colon_ignored() {
        assert_eq!(canonical_name("Via:"), "Via");
        assert_eq!(canonical_name("v:"), "Via");
    }

    #[test]
    fn content_headers_stay_untyped() {
        assert!(binding("Content-Length").is_none());
        assert!(binding("Content-Type").is_none());
        assert!(binding("Content-Disposition").is_some());
    }
}
