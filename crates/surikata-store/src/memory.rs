//! In-memory [`DataStorage`](crate::DataStorage) backend.
//!
//! All state lives behind one `parking_lot::RwLock`. Locks are never held
//! across an `.await`.

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::RwLock;
use surikata_core::event::{Event, Speaker};
use surikata_core::ids::{EventId, EventToken, QuestionId, SpeakerId};
use surikata_core::question::Question;
use surikata_core::scope::Scope;
use surikata_core::tokens::{fill_tokens, new_event_token};
use tracing::debug;

use crate::errors::{Result, StoreError};
use crate::traits::{EventStorage, QuestionSource, QuestionStorage, SpeakerStorage};

#[derive(Default)]
struct Tables {
    // insertion order is the tie-break for equal create times
    questions: Vec<Question>,
    question_index: HashMap<QuestionId, usize>,
    events: HashMap<EventId, Event>,
    event_tokens: HashMap<EventToken, EventId>,
    speakers: HashMap<SpeakerId, Speaker>,
}

/// Process-local store. Contents are lost on restart.
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl QuestionSource for MemoryStore {
    async fn questions_by_scope(&self, scope: &Scope) -> Result<Vec<Question>> {
        let tables = self.tables.read();
        let mut out: Vec<Question> = tables
            .questions
            .iter()
            .filter(|q| q.event_token == scope.event_token && q.session_token == scope.session_token)
            .cloned()
            .collect();
        out.sort_by_key(|q| q.create_time);
        Ok(out)
    }
}

#[async_trait]
impl QuestionStorage for MemoryStore {
    async fn insert_question(&self, mut question: Question) -> Result<Question> {
        if question.id.is_empty() {
            question.id = QuestionId::generate();
        }
        let mut tables = self.tables.write();
        if tables.question_index.contains_key(&question.id) {
            return Err(StoreError::Conflict { entity: "question", id: question.id.to_string() });
        }
        let slot = tables.questions.len();
        let _ = tables.question_index.insert(question.id.clone(), slot);
        tables.questions.push(question.clone());
        debug!(question_id = %question.id, scope = %question.scope(), "question stored");
        Ok(question)
    }

    async fn question_by_id(&self, id: &QuestionId) -> Result<Question> {
        let tables = self.tables.read();
        tables
            .question_index
            .get(id)
            .map(|&slot| tables.questions[slot].clone())
            .ok_or_else(|| StoreError::not_found("question", id.as_str()))
    }

    async fn vote_question(&self, id: &QuestionId, delta: i64) -> Result<Question> {
        let mut tables = self.tables.write();
        let slot = *tables
            .question_index
            .get(id)
            .ok_or_else(|| StoreError::not_found("question", id.as_str()))?;
        let question = &mut tables.questions[slot];
        question.vote += delta;
        Ok(question.clone())
    }
}

#[async_trait]
impl EventStorage for MemoryStore {
    async fn insert_event(&self, mut event: Event) -> Result<Event> {
        let mut tables = self.tables.write();
        event.id = EventId::generate();
        event.event_token = loop {
            let token = new_event_token();
            if !tables.event_tokens.contains_key(&token) {
                break token;
            }
        };
        fill_tokens(&mut event);
        let _ = tables.event_tokens.insert(event.event_token.clone(), event.id.clone());
        let _ = tables.events.insert(event.id.clone(), event.clone());
        debug!(event_id = %event.id, event_token = %event.event_token, "event stored");
        Ok(event)
    }

    async fn update_event(&self, mut event: Event) -> Result<Event> {
        let mut tables = self.tables.write();
        let Some(existing) = tables.events.get(&event.id) else {
            return Err(StoreError::not_found("event", event.id.as_str()));
        };
        let old_token = existing.event_token.clone();
        if event.event_token.is_empty() {
            event.event_token = old_token.clone();
        } else if event.event_token != old_token {
            if tables.event_tokens.contains_key(&event.event_token) {
                return Err(StoreError::Conflict {
                    entity: "event",
                    id: event.event_token.to_string(),
                });
            }
            let _ = tables.event_tokens.remove(&old_token);
            let _ = tables.event_tokens.insert(event.event_token.clone(), event.id.clone());
        }
        fill_tokens(&mut event);
        let _ = tables.events.insert(event.id.clone(), event.clone());
        Ok(event)
    }

    async fn delete_event(&self, id: &EventId) -> Result<()> {
        let mut tables = self.tables.write();
        let event = tables
            .events
            .remove(id)
            .ok_or_else(|| StoreError::not_found("event", id.as_str()))?;
        let _ = tables.event_tokens.remove(&event.event_token);
        Ok(())
    }

    async fn event_by_token(&self, token: &EventToken) -> Result<Event> {
        let tables = self.tables.read();
        tables
            .event_tokens
            .get(token)
            .and_then(|id| tables.events.get(id))
            .cloned()
            .ok_or_else(|| StoreError::not_found("event", token.as_str()))
    }
}

#[async_trait]
impl SpeakerStorage for MemoryStore {
    async fn insert_speaker(&self, mut speaker: Speaker) -> Result<Speaker> {
        speaker.id = SpeakerId::generate();
        let _ = self.tables.write().speakers.insert(speaker.id.clone(), speaker.clone());
        Ok(speaker)
    }

    async fn update_speaker(&self, mut speaker: Speaker) -> Result<Speaker> {
        if speaker.id.is_empty() {
            speaker.id = SpeakerId::generate();
        }
        let _ = self.tables.write().speakers.insert(speaker.id.clone(), speaker.clone());
        Ok(speaker)
    }

    async fn speaker_by_id(&self, id: &SpeakerId) -> Result<Speaker> {
        self.tables
            .read()
            .speakers
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::not_found("speaker", id.as_str()))
    }

    async fn speakers_by_id(&self, ids: &[SpeakerId]) -> Result<Vec<Speaker>> {
        let tables = self.tables.read();
        ids.iter()
            .map(|id| {
                tables
                    .speakers
                    .get(id)
                    .cloned()
                    .ok_or_else(|| StoreError::not_found("speaker", id.as_str()))
            })
            .collect()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
