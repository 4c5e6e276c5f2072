//! Gemini-backed question source
//!
//! Asks the model for a bare JSON array of `{id, question, purpose}` objects
//! and validates what comes back. Does not retry; the coordinator decides
//! what to do with a failure.

use super::QuestionSource;
use crate::error::AdvisorError;
use crate::gemini::TextGenerator;
use crate::models::QuestionRecord;
use crate::Result;
use async_trait::async_trait;
use std::collections::HashSet;
use std::time::Instant;
use tracing::{info, warn};

const SYSTEM_PROMPT: &str = r#"You are an expert stock analyst. Generate 3-4 essential questions for stock research based on the user's goal.

IMPORTANT: Respond ONLY with valid JSON array. No explanations, no markdown, no extra text.

Format:
[
  {"id": "short_id", "question": "clear question?", "purpose": "brief purpose"},
  {"id": "market", "question": "Which markets interest you?", "purpose": "scope"}
]

Requirements:
- Questions must be specific to the goal
- Use natural, conversational language
- Cover key aspects: market, preferences, criteria, timeline
- Keep questions concise for fast responses"#;

pub struct AiQuestionSource {
    generator: Box<dyn TextGenerator>,
}

impl AiQuestionSource {
    pub fn new(generator: Box<dyn TextGenerator>) -> Self {
        Self { generator }
    }
}

#[async_trait]
impl QuestionSource for AiQuestionSource {
    async fn generate(&self, goal: &str) -> Result<Vec<QuestionRecord>> {
        let started = Instant::now();
        let user_message = format!("User goal: {}", goal);

        let result = self
            .generator
            .generate(SYSTEM_PROMPT, &user_message)
            .await
            .and_then(|reply| parse_questions(&reply));

        let elapsed_ms = started.elapsed().as_millis() as u64;
        match &result {
            Ok(questions) => info!(count = questions.len(), elapsed_ms, "Generated AI-powered questions"),
            Err(e) => warn!(elapsed_ms, "AI generation failed: {}", e),
        }

        result
    }
}

/// Extract the JSON payload from a model reply.
///
/// A ```` ```json ```` fence wins; otherwise the window from the first `[`
/// to the last `]`; otherwise the trimmed text as-is.
pub fn clean_json_response(response: &str) -> &str {
    let response = response.trim();

    if let Some(start) = response.find("```json") {
        let body = &response[start + "```json".len()..];
        let end = body.find("```").unwrap_or(body.len());
        return body[..end].trim();
    }

    match (response.find('['), response.rfind(']')) {
        (Some(start), Some(end)) if start < end => &response[start..=end],
        _ => response,
    }
}

/// Parse and validate a model reply into question records
pub fn parse_questions(response: &str) -> Result<Vec<QuestionRecord>> {
    let json_text = clean_json_response(response);

    let questions: Vec<QuestionRecord> = serde_json::from_str(json_text).map_err(|e| {
        AdvisorError::InvalidResponse(format!("{} | raw={}", e, truncate(response, 80)))
    })?;

    if questions.is_empty() {
        return Err(AdvisorError::InvalidResponse(
            "Generated question list is empty".to_string(),
        ));
    }

    let mut seen = HashSet::new();
    for q in &questions {
        if !seen.insert(q.id.as_str()) {
            return Err(AdvisorError::InvalidResponse(format!(
                "Duplicate question id: {}",
                q.id
            )));
        }
    }

    Ok(questions)
}

fn truncate(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}
