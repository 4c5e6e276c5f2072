//! Static question generator for when AI is unavailable
//!
//! Three baseline questions plus one contextual question picked by a
//! first-match keyword scan over the goal. Plain substring matching:
//! "grow" does not match "growth".

use super::QuestionSource;
use crate::models::QuestionRecord;
use crate::Result;
use async_trait::async_trait;

/// Keyword families in precedence order, with the question each one adds
const CONTEXTUAL: &[(&[&str], (&str, &str, &str))] = &[
    (
        &["dividend", "income", "yield"],
        ("income", "What dividend yield or income level do you target?", "Income requirements"),
    ),
    (
        &["growth", "best", "top"],
        ("growth", "What defines 'good performance' for you?", "Success metrics"),
    ),
    (
        &["budget", "cheap", "price"],
        ("budget", "Any price range or budget considerations?", "Financial constraints"),
    ),
];

const DEFAULT_CONTEXTUAL: (&str, &str, &str) =
    ("timeline", "What's your investment timeline?", "Time horizon");

const BASELINE: &[(&str, &str, &str)] = &[
    ("market", "Which markets interest you most?", "Geographic scope"),
    ("style", "Describe your investment style and risk tolerance?", "Risk profile"),
    ("criteria", "What specific criteria should I focus on?", "Selection criteria"),
];

/// Deterministic, network-free question source
#[derive(Debug, Clone, Copy, Default)]
pub struct FallbackQuestionSource;

impl FallbackQuestionSource {
    pub fn questions_for(&self, goal: &str) -> Vec<QuestionRecord> {
        let lowered = goal.to_lowercase();

        let mut questions: Vec<QuestionRecord> = BASELINE
            .iter()
            .map(|(id, question, purpose)| QuestionRecord::new(id, question, purpose))
            .collect();

        let (id, question, purpose) = contextual_question(&lowered);
        questions.push(QuestionRecord::new(id, question, purpose));

        questions
    }
}

fn contextual_question(lowered: &str) -> (&'static str, &'static str, &'static str) {
    CONTEXTUAL
        .iter()
        .find(|(keywords, _)| keywords.iter().any(|k| lowered.contains(*k)))
        .map(|(_, question)| *question)
        .unwrap_or(DEFAULT_CONTEXTUAL)
}

#[async_trait]
impl QuestionSource for FallbackQuestionSource {
    async fn generate(&self, goal: &str) -> Result<Vec<QuestionRecord>> {
        Ok(self.questions_for(goal))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn last_id(goal: &str) -> String {
        FallbackQuestionSource
            .questions_for(goal)
            .last()
            .map(|q| q.id.clone())
            .unwrap_or_default()
    }

    #[test]
    fn test_always_four_unique_questions() {
        let goals = [
            "",
            "find dividend stocks",
            "best growth picks",
            "cheap stocks under budget",
            "something else entirely",
        ];

        for goal in goals {
            let questions = FallbackQuestionSource.questions_for(goal);
            assert_eq!(questions.len(), 4, "{goal:?}");

            let unique: HashSet<_> = questions.iter().map(|q| q.id.as_str()).collect();
            assert_eq!(unique.len(), 4, "{goal:?}");

            let baseline: Vec<_> = questions[..3].iter().map(|q| q.id.as_str()).collect();
            assert_eq!(baseline, vec!["market", "style", "criteria"]);
        }
    }

    #[test]
    fn test_contextual_keyword_families() {
        assert_eq!(last_id("I want DIVIDEND payers"), "income");
        assert_eq!(last_id("steady income please"), "income");
        assert_eq!(last_id("high yield bonds"), "income");
        assert_eq!(last_id("growth stocks"), "growth");
        assert_eq!(last_id("the best companies"), "growth");
        assert_eq!(last_id("top picks"), "growth");
        assert_eq!(last_id("on a budget"), "budget");
        assert_eq!(last_id("cheap shares"), "budget");
        assert_eq!(last_id("low price stocks"), "budget");
        assert_eq!(last_id("retire comfortably"), "timeline");
    }

    #[test]
    fn test_first_match_wins() {
        assert_eq!(last_id("dividend growth at the best price"), "income");
        assert_eq!(last_id("top stocks at a cheap price"), "growth");
    }

    #[test]
    fn test_substring_not_semantic_matching() {
        // "grow" is not "growth"
        assert_eq!(last_id("grow my portfolio"), "timeline");
        // "stop" contains "top"
        assert_eq!(last_id("a stop-loss strategy"), "growth");
    }

    #[tokio::test]
    async fn test_trait_generation_never_fails() {
        let questions = FallbackQuestionSource.generate("anything").await.unwrap();
        assert_eq!(questions, FallbackQuestionSource.questions_for("anything"));
    }
}
