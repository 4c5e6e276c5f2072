//! Stock Research Advisor
//!
//! A terminal conversation that collects an investment goal and a handful
//! of follow-up answers:
//! - Follow-up questions come from Gemini when a key is configured
//! - A deterministic keyword-based fallback covers everything else
//! - Any AI failure silently degrades to the fallback
//!
//! CONVERSATION:
//! ASK GOAL → GENERATE QUESTIONS → ASK QUESTION ⟲ → COMPLETE

pub mod agent;
pub mod config;
pub mod console;
pub mod display;
pub mod error;
pub mod gemini;
pub mod models;
pub mod questions;

pub use error::Result;

// Re-export common types
pub use agent::StockAgent;
pub use config::Config;
pub use console::{Console, Input, ScriptedConsole, TerminalConsole};
pub use models::*;
pub use questions::{QuestionGenerator, QuestionSource};
