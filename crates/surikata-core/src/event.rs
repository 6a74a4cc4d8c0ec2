//! Events, their rooms, sessions and speakers.
//!
//! Times are milliseconds since the Unix epoch. Sessions refer to rooms by
//! [`Room::name`] and to speakers by [`Speaker::id`].

use serde::{Deserialize, Serialize};

use crate::ids::{EventId, EventToken, SessionToken, SpeakerId};

/// A conference event with its schedule.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Event {
    /// Storage-assigned identifier.
    pub id: EventId,
    /// Public token viewers use to join.
    pub event_token: EventToken,
    /// Display name.
    pub name: String,
    /// Free-form description.
    pub description: String,
    /// Start of the event.
    pub from_date: i64,
    /// End of the event.
    pub to_date: i64,
    /// Account that created the event.
    pub created_by: String,
    /// Declared rooms.
    pub rooms: Vec<Room>,
    /// Scheduled sessions, in any order.
    pub sessions: Vec<Session>,
    /// Speakers allowed to appear in sessions.
    pub speakers: Vec<SpeakerId>,
}

/// A room sessions can be scheduled into.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Room {
    /// Room name, referenced by [`Session::room`].
    pub name: String,
    /// UI colour.
    pub tint: String,
    /// Short generated token.
    pub name_hash: String,
    /// Free-form description.
    pub description: String,
}

/// One talk slot.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Session {
    /// Name of the room this session takes place in.
    pub room: String,
    /// Title.
    pub name: String,
    /// Speakers presenting.
    pub speaker: Vec<SpeakerId>,
    /// Free-form description.
    pub description: String,
    /// Token viewers use to join this session's Q&A.
    pub session_token: SessionToken,
    /// Start time.
    pub from: i64,
    /// End time.
    pub to: i64,
    /// Whether the session is over.
    pub finished: bool,
    /// Whether a detail page exists.
    pub has_detail: bool,
}

/// Speaker profile.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Speaker {
    /// Storage-assigned identifier.
    pub id: SpeakerId,
    /// Portrait URL.
    pub image_url: String,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Employer or affiliation.
    pub organization: String,
    /// Personal links.
    pub urls: Vec<String>,
    /// Short biography.
    pub bio: String,
}
