//! Human-readable screens
//!
//! Pure formatting; the sequencer decides when to write them.

use crate::models::{ConversationOutcome, QuestionRecord};
use std::collections::HashMap;

const RULE_WIDTH: usize = 60;
const SUB_RULE_WIDTH: usize = 40;

fn rule(ch: char, width: usize) -> String {
    ch.to_string().repeat(width)
}

pub fn welcome(app_name: &str, welcome_message: &str) -> String {
    format!(
        "\n{rule}\n{app_name}\n{rule}\n{welcome_message}\n{dash}\n💡 Tip: Type 'quit', 'exit', or 'stop' to end the session",
        rule = rule('=', RULE_WIDTH),
        dash = rule('-', RULE_WIDTH),
    )
}

pub fn thinking() -> String {
    "\n🤔 Let me think about what information I need...".to_string()
}

pub fn consulting_ai() -> String {
    "🧠 Consulting Gemini AI for optimal questions...".to_string()
}

pub fn using_fallback() -> String {
    "📋 Using smart fallback questions based on your goal...".to_string()
}

pub fn ai_status(enabled: bool) -> String {
    if enabled {
        "✅ Gemini AI enabled for question generation".to_string()
    } else {
        "⚠️ No valid Gemini API key found (set GEMINI_API_KEY for AI-powered questions)".to_string()
    }
}

/// `index` is zero-based
pub fn question(question: &QuestionRecord, index: usize, total: usize) -> String {
    format!(
        "\n📝 Question {} of {}\n{}\n🎯 {}",
        index + 1,
        total,
        rule('-', SUB_RULE_WIDTH),
        question.question
    )
}

/// Goal plus every question paired with its answer, in question order
pub fn conversation_summary(
    goal: &str,
    questions: &[QuestionRecord],
    answers: &HashMap<String, String>,
) -> String {
    let mut summary = format!("🎯 Goal: {}\n\n📋 Information Collected:\n", goal);
    summary.push_str(&rule('-', SUB_RULE_WIDTH));
    summary.push('\n');

    for (i, q) in questions.iter().enumerate() {
        let answer = answers.get(&q.id).map(String::as_str).unwrap_or("No answer");
        summary.push_str(&format!("{}. {}\n   💭 {}\n\n", i + 1, q.question, answer));
    }

    summary
}

pub fn completion_summary(
    goal: &str,
    questions: &[QuestionRecord],
    answers: &HashMap<String, String>,
) -> String {
    format!(
        "\n{rule}\n✅ INFORMATION GATHERING COMPLETE!\n{rule}\n{summary}🚀 Ready to proceed with intelligent stock analysis!\n{rule}",
        rule = rule('=', RULE_WIDTH),
        summary = conversation_summary(goal, questions, answers),
    )
}

pub fn success() -> String {
    "\n🎉 Dynamic conversation completed successfully!\n📊 All information gathered based on your specific goal.".to_string()
}

/// Report handed to whatever comes next
pub fn final_results(outcome: &ConversationOutcome) -> String {
    let goal = if outcome.goal.is_empty() { "N/A" } else { outcome.goal.as_str() };

    let mut out = format!(
        "\n{rule}\n✅ DYNAMIC CONVERSATION PHASE COMPLETED\n{rule}\nNext: Implement intelligent analysis based on collected information...\n📝 Goal achieved: {goal}\n📋 Questions answered: {count}\n\n🔍 Collected Information for Analysis:",
        rule = rule('=', RULE_WIDTH),
        count = outcome.answers.len(),
    );

    for (q, answer) in outcome.answered() {
        out.push_str(&format!("\n   • {}: {}", q.id, answer));
    }

    out
}

pub fn goodbye() -> String {
    "\n👋 Goodbye! Thanks for using the Dynamic Stock Agent!".to_string()
}

pub fn error(message: &str) -> String {
    format!("\n❌ Error: {}", message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ConversationState;

    fn questions() -> Vec<QuestionRecord> {
        vec![
            QuestionRecord::new("market", "Which markets interest you most?", "scope"),
            QuestionRecord::new("timeline", "What's your investment timeline?", "horizon"),
        ]
    }

    #[test]
    fn test_summary_pairs_questions_with_answers() {
        let mut answers = HashMap::new();
        answers.insert("market".to_string(), "US stocks".to_string());

        let summary = conversation_summary("grow my portfolio", &questions(), &answers);

        assert!(summary.starts_with("🎯 Goal: grow my portfolio"));
        assert!(summary.contains("1. Which markets interest you most?\n   💭 US stocks"));
        assert!(summary.contains("2. What's your investment timeline?\n   💭 No answer"));
    }

    #[test]
    fn test_summary_without_questions() {
        let summary = conversation_summary("quit", &[], &HashMap::new());
        assert!(!summary.contains("💭"));
        assert!(summary.contains("📋 Information Collected:"));
    }

    #[test]
    fn test_question_numbering_is_one_based() {
        let q = &questions()[1];
        let text = question(q, 1, 2);
        assert!(text.contains("📝 Question 2 of 2"));
        assert!(text.ends_with("🎯 What's your investment timeline?"));
    }

    #[test]
    fn test_final_results_lists_answers_in_question_order() {
        let mut state = ConversationState::new();
        state.goal = "find dividend stocks".to_string();
        state.questions = questions();
        state.answers.insert("timeline".to_string(), "5 years".to_string());
        state.answers.insert("market".to_string(), "US".to_string());

        let report = final_results(&state.into_outcome());
        let market = report.find("• market: US").unwrap();
        let timeline = report.find("• timeline: 5 years").unwrap();
        assert!(market < timeline);
        assert!(report.contains("📋 Questions answered: 2"));
    }

    #[test]
    fn test_final_results_without_goal() {
        let report = final_results(&ConversationState::new().into_outcome());
        assert!(report.contains("📝 Goal achieved: N/A"));
        assert!(report.contains("📋 Questions answered: 0"));
    }
}
