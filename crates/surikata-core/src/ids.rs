//! Branded ID newtypes for type safety.
//!
//! Every identifier in Surikata is a distinct newtype wrapper around
//! `String`, so a session token can never be passed where an event token
//! is expected.
//!
//! Server-assigned IDs ([`QuestionId`], [`SpeakerId`], [`EventId`],
//! [`ConnectionId`]) are UUID v7 (time-ordered). Tokens ([`EventToken`],
//! [`SessionToken`]) are short opaque strings produced by
//! [`crate::tokens::generate_token`] or supplied by clients.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Generate a new UUID v7 string (time-ordered).
fn new_v7() -> String {
    Uuid::now_v7().to_string()
}

macro_rules! branded_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create from an existing string value.
            #[must_use]
            pub fn from_string(s: String) -> Self {
                Self(s)
            }

            /// Return the inner string as a slice.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Whether the inner value is empty (not yet assigned).
            #[must_use]
            pub fn is_empty(&self) -> bool {
                self.0.is_empty()
            }

            /// Consume self and return the inner `String`.
            #[must_use]
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl std::ops::Deref for $name {
            type Target = str;
            fn deref(&self) -> &str {
                &self.0
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_owned())
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

macro_rules! generated_id {
    ($($name:ident),+ $(,)?) => {
        $(
            impl $name {
                /// Create a new random ID (UUID v7, time-ordered).
                #[must_use]
                pub fn generate() -> Self {
                    Self(new_v7())
                }
            }
        )+
    };
}

branded_id! {
    /// Unique identifier for a posted question.
    QuestionId
}

branded_id! {
    /// Unique identifier for a speaker profile.
    SpeakerId
}

branded_id! {
    /// Storage identifier for an event document.
    EventId
}

branded_id! {
    /// Identity of one live viewer connection.
    ConnectionId
}

branded_id! {
    /// Public token identifying an event (8 hex chars when server-generated).
    EventToken
}

branded_id! {
    /// Token identifying a session within an event.
    SessionToken
}

generated_id!(QuestionId, SpeakerId, EventId, ConnectionId);

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
