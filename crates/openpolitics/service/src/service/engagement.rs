//! Likes and public Q&A

use openpolitics_engine::qa;
use openpolitics_types::{
    Answer, CivicError, CivicResult, PartyId, PartyLike, QaMetrics, Question, QuestionId,
    QuestionWithAnswers, UserId,
};
use tracing::{debug, info};

use super::CivicService;
use crate::store::CivicStore;

impl<S: CivicStore> CivicService<S> {
    /// Like a party; returns whether a new like was recorded
    ///
    /// Liking twice is not an error: the duplicate is swallowed and the
    /// count stays where it was.
    pub async fn like_party(&self, party: &PartyId, actor: &UserId) -> CivicResult<bool> {
        self.require_party(party).await?;

        let inserted = self
            .store()
            .insert_like(&PartyLike::new(party.clone(), actor.clone()))
            .await?;
        if inserted {
            info!(party = %party.short(), user = %actor.short(), "party liked");
        } else {
            debug!(party = %party.short(), user = %actor.short(), "duplicate like ignored");
        }
        Ok(inserted)
    }

    /// Remove a like; a missing like is a harmless no-op
    pub async fn unlike_party(&self, party: &PartyId, actor: &UserId) -> CivicResult<()> {
        self.require_party(party).await?;
        self.store().delete_like(party, actor).await?;
        Ok(())
    }

    /// Ask a party a public question, optionally anonymously
    pub async fn ask_question(
        &self,
        party: &PartyId,
        asked_by: Option<UserId>,
        text: impl Into<String>,
    ) -> CivicResult<Question> {
        self.require_party(party).await?;

        let text = text.into();
        if text.trim().is_empty() {
            return Err(CivicError::TextRequired("question text"));
        }

        let question = Question::new(party.clone(), asked_by, text);
        self.store().insert_question(&question).await?;
        info!(party = %party.short(), question = %question.id.short(), "question asked");
        Ok(question)
    }

    /// Answer a question as an active member of the asked party
    pub async fn answer_question(
        &self,
        question: &QuestionId,
        actor: &UserId,
        text: impl Into<String>,
    ) -> CivicResult<Answer> {
        let row = self
            .store()
            .question(question)
            .await?
            .ok_or_else(|| CivicError::QuestionNotFound(question.clone()))?;
        self.require_member(&row.party_id, actor).await?;

        let text = text.into();
        if text.trim().is_empty() {
            return Err(CivicError::TextRequired("answer text"));
        }

        let answer = Answer::new(question.clone(), actor.clone(), text);
        self.store().insert_answer(&answer).await?;
        info!(question = %question.short(), by = %actor.short(), "question answered");
        Ok(answer)
    }

    /// A party's questions, newest first, with answers and latency
    pub async fn party_questions(
        &self,
        party: &PartyId,
    ) -> CivicResult<Vec<QuestionWithAnswers>> {
        self.require_party(party).await?;
        let mut result = Vec::new();
        for question in self.store().questions(party).await? {
            let answers = self.store().answers(&question.id).await?;
            result.push(qa::with_answers(question, answers));
        }
        Ok(result)
    }

    /// Aggregate Q&A responsiveness for a party
    pub async fn qa_metrics(&self, party: &PartyId) -> CivicResult<QaMetrics> {
        Ok(qa::metrics(&self.party_questions(party).await?))
    }
}

#[cfg(test)]
mod tests {
    use super::super::testutil::{join_all, svc};
    use super::*;
    use openpolitics_types::ErrorKind;

    #[tokio::test]
    async fn test_like_is_idempotent() {
        let svc = svc();
        let (party, _) = join_all(&svc, "Issue", 1).await;
        let fan = UserId::new("fan");

        assert!(svc.like_party(&party, &fan).await.unwrap());
        assert!(!svc.like_party(&party, &fan).await.unwrap());
        assert_eq!(svc.store().like_count(&party).await.unwrap(), 1);

        svc.unlike_party(&party, &fan).await.unwrap();
        assert_eq!(svc.store().like_count(&party).await.unwrap(), 0);

        // Unliking again stays a no-op.
        svc.unlike_party(&party, &fan).await.unwrap();
    }

    #[tokio::test]
    async fn test_anonymous_question_and_member_answer() {
        let svc = svc();
        let (party, members) = join_all(&svc, "Issue", 2).await;

        let question = svc
            .ask_question(&party, None, "When is the next meeting?")
            .await
            .unwrap();
        assert!(question.asked_by.is_none());

        let err = svc
            .answer_question(&question.id, &UserId::new("outsider"), "soon")
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Unauthorized);

        svc.answer_question(&question.id, &members[1], "Next Sunday, 10am")
            .await
            .unwrap();

        let listed = svc.party_questions(&party).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].answers.len(), 1);
        assert!(listed[0].response_time_hours.is_some());
    }

    #[tokio::test]
    async fn test_blank_text_is_rejected() {
        let svc = svc();
        let (party, members) = join_all(&svc, "Issue", 1).await;

        let err = svc.ask_question(&party, None, "   ").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ValidationFailed);

        let question = svc.ask_question(&party, None, "why?").await.unwrap();
        let err = svc
            .answer_question(&question.id, &members[0], "")
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ValidationFailed);
    }

    #[tokio::test]
    async fn test_metrics_track_unanswered() {
        let svc = svc();
        let (party, members) = join_all(&svc, "Issue", 1).await;

        let q1 = svc.ask_question(&party, None, "one?").await.unwrap();
        svc.ask_question(&party, Some(members[0].clone()), "two?")
            .await
            .unwrap();
        svc.answer_question(&q1.id, &members[0], "yes").await.unwrap();

        let metrics = svc.qa_metrics(&party).await.unwrap();
        assert_eq!(metrics.total_questions, 2);
        assert_eq!(metrics.unanswered_questions, 1);
        assert!(metrics.avg_response_time_hours.is_some());

        let stats = svc.party_stats(&party).await.unwrap();
        assert_eq!(stats.unanswered_questions, 1);
    }
}
