// siphon-rs - The Siphon SIP Stack
// Copyright (C) 2025 James Ferris <ferrous.communications@gmail.com>
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Event and Subscription-State value grammars (RFC 3265).

use std::fmt;

use smol_str::SmolStr;

use crate::error::{GrammarError, ValueError};
use crate::params::Params;
use crate::reader::Reader;
use crate::value::HeaderValue;

/// Event header value: `event-type *(SEMI event-param)`. The event type
/// may be dotted, e.g. `refer` or `presence.winfo`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    event_type: SmolStr,
    params: Params,
}

impl Event {
    pub fn new(event_type: impl Into<SmolStr>) -> Self {
        Event {
            event_type: event_type.into(),
            params: Params::new(),
        }
    }

    pub fn event_type(&self) -> &str {
        &self.event_type
    }

    pub fn set_event_type(&mut self, event_type: &str) -> Result<(), ValueError> {
        if event_type.is_empty() {
            return Err(ValueError::new("event type", event_type));
        }
        self.event_type = SmolStr::new(event_type);
        Ok(())
    }

    pub fn params(&self) -> &Params {
        &self.params
    }

    pub fn params_mut(&mut self) -> &mut Params {
        &mut self.params
    }

    /// The `id` parameter distinguishing subscriptions with the same
    /// event type within one dialog.
    pub fn id(&self) -> Option<&str> {
        self.params.value_of("id")
    }

    pub fn set_id(&mut self, id: Option<&str>) {
        match id {
            None => self.params.remove("id"),
            Some(id) => self.params.set("id", Some(id)),
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.event_type, self.params)
    }
}

impl HeaderValue for Event {
    fn parse(reader: &mut Reader<'_>) -> Result<Self, GrammarError> {
        reader.skip_ws();
        let event_type = reader
            .read_word()
            .ok_or(GrammarError::Missing("event type"))?;
        let params = Params::parse(reader)?;
        Ok(Event {
            event_type: SmolStr::new(event_type),
            params,
        })
    }
}

/// Subscription-State: `substate-value *(SEMI subexp-params)` with the
/// `reason`, `expires` and `retry-after` parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubscriptionState {
    state: SmolStr,
    params: Params,
}

impl SubscriptionState {
    pub const ACTIVE: &'static str = "active";
    pub const PENDING: &'static str = "pending";
    pub const TERMINATED: &'static str = "terminated";

    pub fn new(state: impl Into<SmolStr>) -> Self {
        SubscriptionState {
            state: state.into(),
            params: Params::new(),
        }
    }

    pub fn state(&self) -> &str {
        &self.state
    }

    pub fn set_state(&mut self, state: &str) -> Result<(), ValueError> {
        if state.is_empty() {
            return Err(ValueError::new("subscription state", state));
        }
        self.state = SmolStr::new(state);
        Ok(())
    }

    pub fn params(&self) -> &Params {
        &self.params
    }

    pub fn params_mut(&mut self) -> &mut Params {
        &mut self.params
    }

    pub fn reason(&self) -> Option<&str> {
        self.params.value_of("reason")
    }

    pub fn set_reason(&mut self, reason: Option<&str>) {
        match reason {
            None => self.params.remove("reason"),
            Some(r) => self.params.set("reason", Some(r)),
        }
    }

    pub fn expires(&self) -> Option<u32> {
        self.params.value_of("expires")?.parse().ok()
    }

    pub fn set_expires(&mut self, expires: Option<u32>) {
        match expires {
            None => self.params.remove("expires"),
            Some(e) => self.params.set("expires", Some(&e.to_string())),
        }
    }

    pub fn retry_after(&self) -> Option<u32> {
        self.params.value_of("retry-after")?.parse().ok()
    }

    pub fn set_retry_after(&mut self, retry_after: Option<u32>) {
        match retry_after {
            None => self.params.remove("retry-after"),
            Some(r) => self.params.set("retry-after", Some(&r.to_string())),
        }
    }
}

impl fmt::Display for SubscriptionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.state, self.params)
    }
}

impl HeaderValue for SubscriptionState {
    fn parse(reader: &mut Reader<'_>) -> Result<Self, GrammarError> {
        reader.skip_ws();
        let state = reader
            .read_word()
            .ok_or(GrammarError::Missing("subscription state"))?;
        let params = Params::parse(reader)?;
        Ok(SubscriptionState {
            state: SmolStr::new(state),
            params,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_with_id() {
        let e = Event::parse_str("presence.winfo;id=1234").unwrap();
        assert_eq!(e.event_type(), "presence.winfo");
        assert_eq!(e.id(), Some("1234"));
        assert_eq!(e.render(), "presence.winfo;id=1234");
    }

    #[test]
    fn subscription_state_params() {
        let s = SubscriptionState::parse_str("terminated;reason=timeout;retry-after=120").unwrap();
        assert_eq!(s.state(), SubscriptionState::TERMINATED);
        assert_eq!(s.reason(), Some("timeout"));
        assert_eq!(s.retry_after(), Some(120));
        assert_eq!(s.expires(), None);
    }

    #[test]
    fn active_with_expires() {
        let mut s = SubscriptionState::new(SubscriptionState::ACTIVE);
        s.set_expires(Some(600));
        assert_eq!(s.render(), "active;expires=600");
        s.set_expires(None);
        assert_eq!(s.render(), "active");
    }
}
