//! Storage contracts consumed by the server.
//!
//! [`QuestionSource`] is the narrow read used by live fan-out. The other
//! traits cover the write paths of the RPC layer. Implementations must be
//! shareable across tasks (`Send + Sync`).

use async_trait::async_trait;
use surikata_core::event::{Event, Speaker};
use surikata_core::ids::{EventId, EventToken, QuestionId, SpeakerId};
use surikata_core::question::Question;
use surikata_core::scope::Scope;

use crate::errors::Result;

/// Authoritative current question list for a scope.
#[async_trait]
pub trait QuestionSource: Send + Sync {
    /// Questions in `scope`, oldest first.
    async fn questions_by_scope(&self, scope: &Scope) -> Result<Vec<Question>>;
}

/// Question persistence.
#[async_trait]
pub trait QuestionStorage: QuestionSource {
    /// Store a new question. Fails with `Conflict` if the id is taken.
    async fn insert_question(&self, question: Question) -> Result<Question>;

    /// Fetch one question.
    async fn question_by_id(&self, id: &QuestionId) -> Result<Question>;

    /// Add `delta` to the question's vote counter and return the updated record.
    async fn vote_question(&self, id: &QuestionId, delta: i64) -> Result<Question>;
}

/// Event persistence.
#[async_trait]
pub trait EventStorage: Send + Sync {
    /// Store a new event, assigning its id, event token and any missing room
    /// and session tokens.
    async fn insert_event(&self, event: Event) -> Result<Event>;

    /// Replace an existing event by id, filling missing room and session tokens.
    async fn update_event(&self, event: Event) -> Result<Event>;

    /// Remove an event.
    async fn delete_event(&self, id: &EventId) -> Result<()>;

    /// Look up an event by its public token.
    async fn event_by_token(&self, token: &EventToken) -> Result<Event>;
}

/// Speaker persistence.
#[async_trait]
pub trait SpeakerStorage: Send + Sync {
    /// Store a new speaker, assigning its id.
    async fn insert_speaker(&self, speaker: Speaker) -> Result<Speaker>;

    /// Insert or replace a speaker by id.
    async fn update_speaker(&self, speaker: Speaker) -> Result<Speaker>;

    /// Fetch one speaker.
    async fn speaker_by_id(&self, id: &SpeakerId) -> Result<Speaker>;

    /// Fetch several speakers in the order given. Fails on the first missing id.
    async fn speakers_by_id(&self, ids: &[SpeakerId]) -> Result<Vec<Speaker>>;
}

/// Everything the server needs from a backend.
pub trait DataStorage: QuestionStorage + EventStorage + SpeakerStorage {}

impl<T: QuestionStorage + EventStorage + SpeakerStorage> DataStorage for T {}
