//! Scoring of answered exams and quizzes.
//!
//! Library API for front ends that collect responses to a drawn exam. The
//! draw service only produces unanswered draws and does not call it.

use prep_schema::{Domain, ExamQuestion, Question};
use serde::{Deserialize, Serialize};

/// Options a respondent selected for one question.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Response {
    #[serde(rename = "questionId")]
    pub question_id: String,
    pub selected: Vec<usize>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DomainScore {
    pub domain: Domain,
    pub correct: usize,
    pub total: usize,
}

/// A question is answered correctly when exactly its expected options are
/// selected, in any order.
pub fn compare_answers<C>(question: &Question<C>, selected: &[usize]) -> bool {
    let mut expected = question.expected_answers();
    expected.sort_unstable();
    expected.dedup();

    let mut selected = selected.to_vec();
    selected.sort_unstable();
    selected.dedup();

    expected == selected
}

fn is_answered_correctly<C>(question: &Question<C>, responses: &[Response]) -> bool {
    responses
        .iter()
        .find(|r| r.question_id == question.id)
        .is_some_and(|r| compare_answers(question, &r.selected))
}

/// Percentage of `questions` answered correctly. Unanswered questions count
/// as wrong.
pub fn calculate_score<C>(questions: &[Question<C>], responses: &[Response]) -> f64 {
    if questions.is_empty() {
        return 0.0;
    }
    let correct = questions
        .iter()
        .filter(|q| is_answered_correctly(q, responses))
        .count();

    (correct as f64 / questions.len() as f64) * 100.0
}

pub fn check_pass(score: f64, passing_percent: f64) -> bool {
    score >= passing_percent
}

/// Correct answers per domain, in declaration order. Domains absent from the
/// exam are omitted.
pub fn domain_scores(questions: &[ExamQuestion], responses: &[Response]) -> Vec<DomainScore> {
    Domain::ALL
        .into_iter()
        .filter_map(|domain| {
            let in_domain: Vec<&ExamQuestion> =
                questions.iter().filter(|q| q.domain() == domain).collect();
            if in_domain.is_empty() {
                return None;
            }
            let correct = in_domain
                .iter()
                .filter(|q| is_answered_correctly(q, responses))
                .count();
            Some(DomainScore {
                domain,
                correct,
                total: in_domain.len(),
            })
        })
        .collect()
}
