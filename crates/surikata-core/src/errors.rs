//! Error types for the core domain.
//!
//! - [`ValidationError`]: schedule consistency failures from
//!   [`crate::validator::validate_event`]

use thiserror::Error;

// ─────────────────────────────────────────────────────────────────────────────
// ValidationError
// ─────────────────────────────────────────────────────────────────────────────

/// Reason an event was rejected before persistence.
///
/// Session and room labels are carried for the message only; callers
/// classify the failure through [`ValidationError::kind`].
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// The event ends at or before its start.
    #[error("event validator: toDate is not after fromDate")]
    DateNotInSequence,

    /// A session lists a speaker missing from the event's speaker list.
    #[error("event validator: session {session} has speaker {speaker} not defined in event")]
    SpeakerNotInEvent {
        /// Offending session.
        session: String,
        /// Unknown speaker id.
        speaker: String,
    },

    /// A session is scheduled in a room the event does not declare.
    #[error("event validator: session {session} has room {room} not defined in event")]
    RoomNotInEvent {
        /// Offending session.
        session: String,
        /// Undeclared room name.
        room: String,
    },

    /// A session starts before the previous session in the same room ended.
    #[error("event validator: session {session} overrides the previous session in same room {room}")]
    RoomDoubleBooked {
        /// Offending session.
        session: String,
        /// Room booked twice.
        room: String,
    },

    /// A session ends at or before its start.
    #[error("event validator: session {session} to is not after from")]
    SessionDateNotInSequence {
        /// Offending session.
        session: String,
    },
}

impl ValidationError {
    /// Stable machine-readable classification.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::DateNotInSequence => "DATE_NOT_IN_SEQUENCE",
            Self::SpeakerNotInEvent { .. } => "SPEAKER_NOT_IN_EVENT",
            Self::RoomNotInEvent { .. } => "ROOM_NOT_IN_EVENT",
            Self::RoomDoubleBooked { .. } => "ROOM_DOUBLE_BOOKED",
            Self::SessionDateNotInSequence { .. } => "SESSION_DATE_NOT_IN_SEQUENCE",
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_are_distinct() {
        let errors = [
            ValidationError::DateNotInSequence,
            ValidationError::SpeakerNotInEvent { session: "s".into(), speaker: "x".into() },
            ValidationError::RoomNotInEvent { session: "s".into(), room: "r".into() },
            ValidationError::RoomDoubleBooked { session: "s".into(), room: "r".into() },
            ValidationError::SessionDateNotInSequence { session: "s".into() },
        ];
        let mut kinds: Vec<_> = errors.iter().map(ValidationError::kind).collect();
        kinds.sort_unstable();
        kinds.dedup();
        assert_eq!(kinds.len(), 5);
    }

    #[test]
    fn double_booking_message_names_room() {
        let err = ValidationError::RoomDoubleBooked { session: "ab12".into(), room: "A".into() };
        assert_eq!(
            err.to_string(),
            "event validator: session ab12 overrides the previous session in same room A"
        );
    }
}
