//! Schedule consistency checks run before an event is persisted.
//!
//! Rules are checked in order and the first failure wins:
//!
//! 1. The event must end after it starts.
//! 2. Sessions are visited in ascending start order (stable for ties).
//! 3. For each session: every speaker must be listed on the event, the room
//!    must be declared, the session must not start before the previous
//!    session in that room ended, and it must end after it starts.
//!
//! Room presence is tracked separately from the last occupied time, so a
//! session ending at the epoch is not mistaken for an undeclared room.

use std::collections::{HashMap, HashSet};

use crate::errors::ValidationError;
use crate::event::{Event, Session};

/// Validate the schedule of `event`.
///
/// Pure: the caller's session order is left untouched.
pub fn validate_event(event: &Event) -> Result<(), ValidationError> {
    if event.from_date >= event.to_date {
        return Err(ValidationError::DateNotInSequence);
    }

    // declared room -> end of the latest session seen so far
    let mut room_end: HashMap<&str, Option<i64>> =
        event.rooms.iter().map(|room| (room.name.as_str(), None)).collect();

    let speakers: HashSet<&str> = event.speakers.iter().map(|s| s.as_str()).collect();

    let mut sessions: Vec<&Session> = event.sessions.iter().collect();
    sessions.sort_by_key(|s| s.from);

    for session in sessions {
        if let Some(missing) = session.speaker.iter().find(|s| !speakers.contains(s.as_str())) {
            return Err(ValidationError::SpeakerNotInEvent {
                session: session_label(session),
                speaker: missing.to_string(),
            });
        }

        let Some(last_end) = room_end.get_mut(session.room.as_str()) else {
            return Err(ValidationError::RoomNotInEvent {
                session: session_label(session),
                room: session.room.clone(),
            });
        };

        if last_end.is_some_and(|end| session.from < end) {
            return Err(ValidationError::RoomDoubleBooked {
                session: session_label(session),
                room: session.room.clone(),
            });
        }

        if session.from >= session.to {
            return Err(ValidationError::SessionDateNotInSequence {
                session: session_label(session),
            });
        }

        *last_end = Some(session.to);
    }

    Ok(())
}

/// Token if assigned, otherwise the session name.
fn session_label(session: &Session) -> String {
    if session.session_token.is_empty() {
        session.name.clone()
    } else {
        session.session_token.to_string()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
