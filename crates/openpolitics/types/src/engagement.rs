//! Likes, questions, and answers
//!
//! Light engagement around a party: idempotent likes, and an append-only
//! public Q&A ledger (questions may be asked anonymously; answers come
//! from members).

use crate::{AnswerId, PartyId, QuestionId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A like on a party, unique per `(party_id, user_id)` at the store
/// boundary
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PartyLike {
    pub party_id: PartyId,
    pub user_id: UserId,
    pub created_at: DateTime<Utc>,
}

impl PartyLike {
    pub fn new(party_id: PartyId, user_id: UserId) -> Self {
        Self {
            party_id,
            user_id,
            created_at: Utc::now(),
        }
    }
}

/// A public question to a party
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Question {
    pub id: QuestionId,
    pub party_id: PartyId,
    /// `None` for anonymous questions
    pub asked_by: Option<UserId>,
    pub question_text: String,
    pub created_at: DateTime<Utc>,
}

impl Question {
    pub fn new(party_id: PartyId, asked_by: Option<UserId>, question_text: String) -> Self {
        Self {
            id: QuestionId::generate(),
            party_id,
            asked_by,
            question_text,
            created_at: Utc::now(),
        }
    }
}

/// A member's answer to a question
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Answer {
    pub id: AnswerId,
    pub question_id: QuestionId,
    pub answered_by: UserId,
    pub answer_text: String,
    pub created_at: DateTime<Utc>,
}

impl Answer {
    pub fn new(question_id: QuestionId, answered_by: UserId, answer_text: String) -> Self {
        Self {
            id: AnswerId::generate(),
            question_id,
            answered_by,
            answer_text,
            created_at: Utc::now(),
        }
    }
}

/// A question with its answers and response latency
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct QuestionWithAnswers {
    pub question: Question,
    pub answers: Vec<Answer>,
    /// Hours from the question to its first answer, if answered
    pub response_time_hours: Option<f64>,
}

/// Aggregate Q&A responsiveness for a party
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct QaMetrics {
    pub total_questions: u64,
    pub unanswered_questions: u64,
    /// `None` when no question has been answered yet
    pub avg_response_time_hours: Option<f64>,
}
