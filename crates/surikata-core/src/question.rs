//! Questions and votes.

use serde::{Deserialize, Serialize};

use crate::ids::{EventToken, QuestionId, SessionToken};
use crate::scope::Scope;

/// A question posted by an attendee into one session of an event.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    /// Storage-assigned identifier.
    pub id: QuestionId,
    /// Event the question belongs to.
    pub event_token: EventToken,
    /// Session the question belongs to.
    pub session_token: SessionToken,
    /// Question text.
    pub question: String,
    /// Net vote count. May go negative.
    pub vote: i64,
    /// Creation time in milliseconds since the Unix epoch.
    pub create_time: i64,
}

impl Question {
    /// Create a fresh question with zero votes, stamped with the current time.
    pub fn new(scope: &Scope, text: impl Into<String>) -> Self {
        Self {
            id: QuestionId::generate(),
            event_token: scope.event_token.clone(),
            session_token: scope.session_token.clone(),
            question: text.into(),
            vote: 0,
            create_time: chrono::Utc::now().timestamp_millis(),
        }
    }

    /// Scope this question is visible in.
    pub fn scope(&self) -> Scope {
        Scope {
            event_token: self.event_token.clone(),
            session_token: self.session_token.clone(),
        }
    }
}

/// Direction of a vote on a question.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoteDirection {
    /// Upvote (+1).
    Up,
    /// Retract / downvote (-1).
    Down,
}

impl VoteDirection {
    /// Signed change applied to the vote counter.
    pub fn delta(self) -> i64 {
        match self {
            Self::Up => 1,
            Self::Down => -1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_question_starts_at_zero_votes() {
        let q = Question::new(&Scope::new("ev1", "s1"), "why?");
        assert_eq!(q.vote, 0);
        assert!(q.create_time > 0);
        assert_eq!(q.scope(), Scope::new("ev1", "s1"));
    }

    #[test]
    fn wire_format_is_camel_case() {
        let q = Question::new(&Scope::new("ev1", "s1"), "why?");
        let json = serde_json::to_value(&q).unwrap();
        assert_eq!(json["eventToken"], "ev1");
        assert_eq!(json["sessionToken"], "s1");
        assert_eq!(json["question"], "why?");
        assert!(json["createTime"].is_i64());
    }

    #[test]
    fn vote_direction_parses_lowercase() {
        let up: VoteDirection = serde_json::from_str("\"up\"").unwrap();
        let down: VoteDirection = serde_json::from_str("\"down\"").unwrap();
        assert_eq!(up.delta(), 1);
        assert_eq!(down.delta(), -1);
        assert!(serde_json::from_str::<VoteDirection>("\"sideways\"").is_err());
    }
}
