//! Q&A responsiveness metrics

use openpolitics_types::{Answer, QaMetrics, Question, QuestionWithAnswers};

/// Attach answers to a question, computing first-response latency
pub fn with_answers(question: Question, mut answers: Vec<Answer>) -> QuestionWithAnswers {
    answers.sort_by(|a, b| a.created_at.cmp(&b.created_at));
    let response_time_hours = answers.first().map(|first| {
        (first.created_at - question.created_at).num_milliseconds() as f64 / 3_600_000.0
    });
    QuestionWithAnswers {
        question,
        answers,
        response_time_hours,
    }
}

/// Aggregate metrics over a party's questions
pub fn metrics(questions: &[QuestionWithAnswers]) -> QaMetrics {
    let answered: Vec<f64> = questions
        .iter()
        .filter_map(|q| q.response_time_hours)
        .collect();
    QaMetrics {
        total_questions: questions.len() as u64,
        unanswered_questions: questions.iter().filter(|q| q.answers.is_empty()).count() as u64,
        avg_response_time_hours: if answered.is_empty() {
            None
        } else {
            Some(answered.iter().sum::<f64>() / answered.len() as f64)
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use openpolitics_types::{PartyId, QuestionId, UserId};

    fn question() -> Question {
        let mut q = Question::new(PartyId::new("p1"), None, "why?".into());
        q.created_at = Utc::now() - Duration::hours(4);
        q
    }

    fn answer_for(q: &QuestionId, hours_ago: i64) -> Answer {
        let mut a = Answer::new(q.clone(), UserId::new("member"), "because".into());
        a.created_at = Utc::now() - Duration::hours(hours_ago);
        a
    }

    #[test]
    fn test_first_answer_sets_response_time() {
        let q = question();
        let late = answer_for(&q.id, 1);
        let early = answer_for(&q.id, 3);

        let view = with_answers(q, vec![late, early]);
        let hours = view.response_time_hours.unwrap();
        assert!((hours - 1.0).abs() < 0.1, "got {}", hours);
    }

    #[test]
    fn test_metrics_counts_unanswered() {
        let answered = {
            let q = question();
            let a = answer_for(&q.id, 2);
            with_answers(q, vec![a])
        };
        let unanswered = with_answers(question(), vec![]);

        let m = metrics(&[answered, unanswered]);
        assert_eq!(m.total_questions, 2);
        assert_eq!(m.unanswered_questions, 1);
        assert!(m.avg_response_time_hours.is_some());
    }

    #[test]
    fn test_metrics_with_no_answers() {
        let m = metrics(&[with_answers(question(), vec![])]);
        assert_eq!(m.avg_response_time_hours, None);
    }
}
