//! Short opaque tokens for events, rooms and sessions.

use std::fmt::Write as _;

use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::event::Event;
use crate::ids::{EventToken, SessionToken};

/// Length of a server-generated event token.
pub const EVENT_TOKEN_LEN: usize = 8;

/// Length of a generated room hash or session token.
pub const SESSION_TOKEN_LEN: usize = 4;

/// Generate a lowercase hex token of `len` characters.
///
/// The token is the hex prefix of a SHA-256 digest over a fresh random
/// UUID. `len` is rounded down to an even number and capped at 64.
pub fn generate_token(len: usize) -> String {
    let digest = Sha256::digest(Uuid::new_v4().as_bytes());
    let bytes = (len / 2).min(digest.len());
    let mut out = String::with_capacity(bytes * 2);
    for byte in &digest[..bytes] {
        let _ = write!(out, "{byte:02x}");
    }
    out
}

/// Generate a fresh event token.
pub fn new_event_token() -> EventToken {
    EventToken::from(generate_token(EVENT_TOKEN_LEN))
}

/// Assign tokens to every room and session of `event` that lacks one.
///
/// Existing values are never overwritten.
pub fn fill_tokens(event: &mut Event) {
    for room in &mut event.rooms {
        if room.name_hash.is_empty() {
            room.name_hash = generate_token(SESSION_TOKEN_LEN);
        }
    }
    for session in &mut event.sessions {
        if session.session_token.is_empty() {
            session.session_token = SessionToken::from(generate_token(SESSION_TOKEN_LEN));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{Room, Session};

    #[test]
    fn token_has_requested_length_and_is_hex() {
        for len in [4, 8, 16] {
            let token = generate_token(len);
            assert_eq!(token.len(), len);
            assert!(token.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
        }
    }

    #[test]
    fn odd_and_oversized_lengths() {
        assert_eq!(generate_token(5).len(), 4);
        assert_eq!(generate_token(200).len(), 64);
        assert!(generate_token(0).is_empty());
    }

    #[test]
    fn tokens_differ() {
        assert_ne!(generate_token(16), generate_token(16));
    }

    #[test]
    fn fill_tokens_keeps_existing_values() {
        let mut event = Event {
            rooms: vec![
                Room { name: "A".into(), name_hash: "keep".into(), ..Room::default() },
                Room { name: "B".into(), ..Room::default() },
            ],
            sessions: vec![
                Session { session_token: SessionToken::from("s1"), ..Session::default() },
                Session::default(),
            ],
            ..Event::default()
        };

        fill_tokens(&mut event);

        assert_eq!(event.rooms[0].name_hash, "keep");
        assert_eq!(event.rooms[1].name_hash.len(), SESSION_TOKEN_LEN);
        assert_eq!(event.sessions[0].session_token.as_str(), "s1");
        assert_eq!(event.sessions[1].session_token.len(), SESSION_TOKEN_LEN);
    }

    #[test]
    fn event_token_length() {
        assert_eq!(new_event_token().len(), EVENT_TOKEN_LEN);
    }
}
