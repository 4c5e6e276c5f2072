//! Conversation sequencer
//!
//! ASK GOAL → GENERATE QUESTIONS → ASK QUESTION ⟲ → COMPLETE
//!
//! A plain state loop over `Node`. Each node runs to completion, mutates the
//! conversation state, and names its successor. Only `AskQuestion` branches.

use crate::config::Config;
use crate::console::{Console, Input};
use crate::display;
use crate::error::AdvisorError;
use crate::models::{ConversationOutcome, ConversationState, Step};
use crate::questions::QuestionGenerator;
use crate::Result;
use tracing::{debug, info, Instrument};

/// Echoed in place of a goal when stdin is exhausted
pub const DEFAULT_GOAL: &str = "Find good stocks to invest in";

/// What a Ctrl-C at a prompt turns into
const INTERRUPT_ANSWER: &str = "quit";

const GOAL_PROMPT: &str = "\n💬 What would you like to do today? ";
const ANSWER_PROMPT: &str = "\n💬 Your answer: ";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Node {
    AskGoal,
    GenerateQuestions,
    AskQuestion,
    Complete,
}

/// Guard after `AskQuestion`: loop while questions remain and nobody quit
pub fn route_after_question(state: &ConversationState) -> Node {
    if !state.complete && state.has_more_questions() {
        Node::AskQuestion
    } else {
        Node::Complete
    }
}

pub struct StockAgent<C: Console> {
    config: Config,
    questions: QuestionGenerator,
    console: C,
}

impl<C: Console> StockAgent<C> {
    pub fn new(config: Config, questions: QuestionGenerator, console: C) -> Self {
        Self {
            config,
            questions,
            console,
        }
    }

    pub fn console(&self) -> &C {
        &self.console
    }

    pub fn console_mut(&mut self) -> &mut C {
        &mut self.console
    }

    /// Run one full conversation from a fresh state
    pub async fn run(&mut self) -> Result<ConversationOutcome> {
        let mut state = ConversationState::new();
        let span = tracing::info_span!("conversation", session_id = %state.session_id);

        async move {
            info!("Conversation started");

            let mut node = Node::AskGoal;
            while let Some(next) = self.advance(node, &mut state).await? {
                node = next;
            }

            info!(
                answered = state.answers.len(),
                total = state.questions.len(),
                "Conversation finished"
            );
            Ok::<_, AdvisorError>(state.into_outcome())
        }
        .instrument(span)
        .await
    }

    /// Execute one node. Returns the next node, or `None` after `Complete`.
    pub async fn advance(
        &mut self,
        node: Node,
        state: &mut ConversationState,
    ) -> Result<Option<Node>> {
        debug!(?node, step = %state.step, "Entering node");

        let next = match node {
            Node::AskGoal => {
                self.ask_goal(state).await?;
                Some(Node::GenerateQuestions)
            }
            Node::GenerateQuestions => {
                self.generate_questions(state).await?;
                Some(Node::AskQuestion)
            }
            Node::AskQuestion => {
                self.ask_question(state).await?;
                Some(route_after_question(state))
            }
            Node::Complete => {
                self.complete(state)?;
                None
            }
        };

        Ok(next)
    }

    // === ASK GOAL ===
    async fn ask_goal(&mut self, state: &mut ConversationState) -> Result<()> {
        self.console
            .write(&display::welcome(&self.config.app_name, &self.config.welcome_message))?;

        let goal = self.read_input(GOAL_PROMPT, DEFAULT_GOAL).await?;

        state.log.push(format!("User goal: {}", goal));
        state.goal = goal;
        state.step = Step::GoalCollected;
        Ok(())
    }

    // === GENERATE QUESTIONS ===
    async fn generate_questions(&mut self, state: &mut ConversationState) -> Result<()> {
        if self.config.is_exit_command(&state.goal) {
            info!("Exit requested before any questions");
            state.questions.clear();
            state.complete = true;
            return Ok(());
        }

        self.console.write(&display::thinking())?;
        if self.questions.is_ai_enabled() {
            self.console.write(&display::consulting_ai())?;
        } else {
            self.console.write(&display::using_fallback())?;
        }

        let questions = self.questions.generate(&state.goal).await;
        info!(count = questions.len(), "Questions ready");

        state.log.push(format!("Generated {} questions", questions.len()));
        state.questions = questions;
        state.questions_generated = true;
        state.cursor = 0;
        state.answers.clear();
        state.step = Step::QuestionsReady;
        Ok(())
    }

    // === ASK QUESTION ===
    async fn ask_question(&mut self, state: &mut ConversationState) -> Result<()> {
        let Some(current) = state.current_question().cloned() else {
            return Ok(());
        };

        self.console
            .write(&display::question(&current, state.cursor, state.questions.len()))?;

        let placeholder = format!("Default answer for {}", current.id);
        let answer = self.read_input(ANSWER_PROMPT, &placeholder).await?;

        if self.config.is_exit_command(&answer) {
            info!(question_id = %current.id, "Exit requested mid-conversation");
            state.complete = true;
            return Ok(());
        }

        state.answers.insert(current.id, answer.clone());
        state.cursor += 1;
        state.log.push(format!("Q{}: {}", state.cursor, answer));
        state.step = Step::Answered(state.cursor);
        Ok(())
    }

    // === COMPLETE ===
    fn complete(&mut self, state: &mut ConversationState) -> Result<()> {
        self.console.write(&display::completion_summary(
            &state.goal,
            &state.questions,
            &state.answers,
        ))?;

        state.complete = true;
        state.log.push("Conversation completed".to_string());
        state.step = Step::Complete;
        Ok(())
    }

    /// One trimmed line from the console. End of input echoes `placeholder`;
    /// Ctrl-C says goodbye and reads as an exit keyword.
    async fn read_input(&mut self, prompt: &str, placeholder: &str) -> Result<String> {
        match self.console.read_line(prompt).await {
            Input::Line(line) => Ok(line.trim().to_string()),
            Input::Eof => {
                self.console.write(placeholder)?;
                Ok(placeholder.to_string())
            }
            Input::Interrupted => {
                self.console.write(&display::goodbye())?;
                Ok(INTERRUPT_ANSWER.to_string())
            }
        }
    }
}
