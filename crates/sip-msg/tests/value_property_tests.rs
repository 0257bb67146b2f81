// siphon-rs - The Siphon SIP Stack
// Copyright (C) 2025 James Ferris <ferrous.communications@gmail.com>
// SPDX-License-Identifier: Apache-2.0 OR MIT

use proptest::prelude::*;
use sip_msg::{
    CSeq, ContactParam, HeaderValue, Method, NameAddress, Params, Reader, TaggedAddress, ViaParm,
};

fn method_strategy() -> impl Strategy<Value = Method> {
    prop::sample::select(vec![
        Method::Invite,
        Method::Ack,
        Method::Bye,
        Method::Cancel,
        Method::Register,
        Method::Options,
        Method::Subscribe,
        Method::Notify,
    ])
}

proptest! {
    /// CSeq renders and reparses to the same number and method.
    #[test]
    fn cseq_roundtrip(seq in 1u32..=u32::MAX, method in method_strategy()) {
        let cseq = CSeq::new(seq, method).unwrap();
        let reparsed = CSeq::parse_str(&cseq.render()).unwrap();
        prop_assert_eq!(reparsed, cseq);
    }

    /// Via values survive a render/parse cycle with host, port and branch
    /// intact.
    #[test]
    fn via_roundtrip(
        transport in prop::sample::select(vec!["UDP", "TCP", "TLS", "SCTP"]),
        host in "[a-z0-9][a-z0-9.\\-]{0,15}",
        port in proptest::option::of(1024u16..65535),
        branch_suffix in "[a-zA-Z0-9]{1,12}",
    ) {
        let mut via = ViaParm::new(transport, sip_msg::HostPort::new(host.as_str(), port));
        via.set_branch(Some(&format!("z9hG4bK{}", branch_suffix))).unwrap();

        let reparsed = ViaParm::parse_str(&via.render()).unwrap();
        prop_assert_eq!(&reparsed, &via);
        prop_assert_eq!(reparsed.sent_by().port(), port);
        prop_assert_eq!(
            reparsed.branch().unwrap(),
            format!("z9hG4bK{}", branch_suffix)
        );
    }

    /// Name addresses round-trip whatever the display name shape.
    #[test]
    fn name_addr_roundtrip(
        display in prop::sample::select(vec!["", "Alice", "Alice Smith", "A. G. Bell"]),
        user in "[a-z0-9]{1,8}",
        host in "[a-z0-9][a-z0-9.\\-]{0,12}",
    ) {
        let uri = format!("sip:{}@{}", user, host);
        let addr = NameAddress::new(display, &uri).unwrap();
        let reparsed = NameAddress::parse_str(&addr.render()).unwrap();
        prop_assert_eq!(reparsed.display_name(), display);
        prop_assert_eq!(reparsed.uri(), uri.as_str());
    }

    /// Tagged addresses keep their tag through a round trip.
    #[test]
    fn tagged_address_keeps_tag(tag in "[a-zA-Z0-9]{1,16}") {
        let mut from = TaggedAddress::new(NameAddress::new("", "sip:a@b.example").unwrap());
        from.set_tag(Some(&tag));
        let reparsed = TaggedAddress::parse_str(&from.render()).unwrap();
        prop_assert_eq!(reparsed.tag(), Some(tag.as_str()));
    }

    /// Parameter values that are not bare tokens come back intact through
    /// quoting.
    #[test]
    fn param_quoting_roundtrip(value in "[a-zA-Z0-9 .;=@]{1,24}") {
        let value = value.trim();
        prop_assume!(!value.is_empty());
        let mut params = Params::new();
        params.set("text", Some(value));
        let rendered = params.to_string();

        let mut reader = Reader::new(&rendered);
        let reparsed = Params::parse(&mut reader).unwrap();
        prop_assert_eq!(reparsed.value_of("text"), Some(value));
    }

    /// A q value expressed with up to three decimals renders back
    /// verbatim.
    #[test]
    fn qvalue_text_preserved(q in 0u32..=1000) {
        let text = if q == 1000 {
            "1".to_string()
        } else {
            format!("0.{:03}", q).trim_end_matches('0').to_string()
        };
        prop_assume!(text != "0.");
        let contact = ContactParam::parse_str(&format!("<sip:a@b>;q={}", text)).unwrap();
        prop_assert_eq!(contact.render(), format!("<sip:a@b>;q={}", text));
        prop_assert!(contact.qvalue().is_some());
    }

    /// Unknown headers never fail to parse, whatever the value.
    #[test]
    fn unknown_headers_never_fail(value in "[ -~]{0,40}") {
        prop_assume!(!value.contains(':'));
        let field = sip_msg::HeaderField::parse("X-Anything", &value).unwrap();
        prop_assert_eq!(field.value(), value.trim());
    }
}
