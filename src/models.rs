//! Core data models for the stock research conversation

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use uuid::Uuid;

//
// ================= Questions =================
//

/// One follow-up question, produced wholesale by a question source
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionRecord {
    pub id: String,
    pub question: String,
    /// Free-text rationale; shown nowhere and never branched on
    pub purpose: String,
}

impl QuestionRecord {
    pub fn new(id: &str, question: &str, purpose: &str) -> Self {
        Self {
            id: id.to_string(),
            question: question.to_string(),
            purpose: purpose.to_string(),
        }
    }
}

//
// ================= Conversation =================
//

/// Last milestone the conversation reached
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    Started,
    GoalCollected,
    QuestionsReady,
    /// Number of questions answered so far (1-based)
    Answered(usize),
    Complete,
}

/// Everything one run knows. Only the sequencer mutates it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationState {
    pub session_id: Uuid,
    pub goal: String,
    /// Index of the next question to ask; never exceeds `questions.len()`
    pub cursor: usize,
    pub answers: HashMap<String, String>,
    pub questions: Vec<QuestionRecord>,
    pub questions_generated: bool,
    pub complete: bool,
    pub step: Step,
    pub log: Vec<String>,
    pub started_at: DateTime<Utc>,
}

impl ConversationState {
    pub fn new() -> Self {
        Self {
            session_id: Uuid::new_v4(),
            goal: String::new(),
            cursor: 0,
            answers: HashMap::new(),
            questions: Vec::new(),
            questions_generated: false,
            complete: false,
            step: Step::Started,
            log: Vec::new(),
            started_at: Utc::now(),
        }
    }

    /// The question the cursor points at, if any remain
    pub fn current_question(&self) -> Option<&QuestionRecord> {
        self.questions.get(self.cursor)
    }

    pub fn has_more_questions(&self) -> bool {
        self.cursor < self.questions.len()
    }

    /// Answer for a question id, or "No answer" when it was never recorded
    pub fn answer_for(&self, question_id: &str) -> &str {
        self.answers
            .get(question_id)
            .map(String::as_str)
            .unwrap_or("No answer")
    }

    pub fn into_outcome(self) -> ConversationOutcome {
        ConversationOutcome {
            session_id: self.session_id,
            goal: self.goal,
            questions: self.questions,
            answers: self.answers,
            complete: self.complete,
            started_at: self.started_at,
            completed_at: Utc::now(),
        }
    }
}

impl Default for ConversationState {
    fn default() -> Self {
        Self::new()
    }
}

//
// ================= Final Result =================
//

/// What a finished run hands back for the next phase
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationOutcome {
    pub session_id: Uuid,
    pub goal: String,
    pub questions: Vec<QuestionRecord>,
    pub answers: HashMap<String, String>,
    pub complete: bool,
    pub started_at: DateTime<Utc>,
    pub completed_at: DateTime<Utc>,
}

impl ConversationOutcome {
    /// Recorded answers in question order, skipping unanswered questions
    pub fn answered(&self) -> impl Iterator<Item = (&QuestionRecord, &str)> {
        self.questions
            .iter()
            .filter_map(|q| self.answers.get(&q.id).map(|a| (q, a.as_str())))
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Step::Started => write!(f, "started"),
            Step::GoalCollected => write!(f, "goal_collected"),
            Step::QuestionsReady => write!(f, "questions_ready"),
            Step::Answered(n) => write!(f, "answered_q{}", n),
            Step::Complete => write!(f, "complete"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state_with_questions() -> ConversationState {
        let mut state = ConversationState::new();
        state.questions = vec![
            QuestionRecord::new("market", "Which markets?", "scope"),
            QuestionRecord::new("style", "Which style?", "risk"),
        ];
        state
    }

    #[test]
    fn test_new_state_is_empty() {
        let state = ConversationState::new();
        assert!(state.goal.is_empty());
        assert_eq!(state.cursor, 0);
        assert!(state.answers.is_empty());
        assert!(!state.questions_generated);
        assert!(!state.complete);
        assert_eq!(state.step, Step::Started);
        assert!(state.current_question().is_none());
    }

    #[test]
    fn test_cursor_helpers() {
        let mut state = state_with_questions();
        assert_eq!(state.current_question().map(|q| q.id.as_str()), Some("market"));
        state.cursor = 2;
        assert!(!state.has_more_questions());
        assert!(state.current_question().is_none());
    }

    #[test]
    fn test_answer_for_defaults_to_no_answer() {
        let mut state = state_with_questions();
        state.answers.insert("market".to_string(), "US stocks".to_string());
        assert_eq!(state.answer_for("market"), "US stocks");
        assert_eq!(state.answer_for("style"), "No answer");
    }

    #[test]
    fn test_outcome_answers_follow_question_order() {
        let mut state = state_with_questions();
        state.answers.insert("style".to_string(), "moderate".to_string());
        state.answers.insert("market".to_string(), "US".to_string());

        let outcome = state.into_outcome();
        let ids: Vec<_> = outcome.answered().map(|(q, _)| q.id.as_str()).collect();
        assert_eq!(ids, vec!["market", "style"]);
    }

    #[test]
    fn test_step_display() {
        assert_eq!(Step::GoalCollected.to_string(), "goal_collected");
        assert_eq!(Step::Answered(3).to_string(), "answered_q3");
        assert_eq!(Step::Complete.to_string(), "complete");
    }
}
