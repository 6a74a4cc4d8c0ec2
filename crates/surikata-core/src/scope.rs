//! Live viewing scope.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::ids::{EventToken, SessionToken};

/// An (event, session) pair identifying one live viewing context.
///
/// Used directly as a map key. Two scopes are equal only when both tokens
/// match, so `("ab", "c")` and `("a", "bc")` never alias.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scope {
    /// Event the viewers are watching.
    pub event_token: EventToken,
    /// Session within the event.
    pub session_token: SessionToken,
}

impl Scope {
    /// Build a scope from its two tokens.
    pub fn new(event_token: impl Into<EventToken>, session_token: impl Into<SessionToken>) -> Self {
        Self {
            event_token: event_token.into(),
            session_token: session_token.into(),
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.event_token, self.session_token)
    }
}
