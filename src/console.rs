//! Terminal I/O boundary
//!
//! The sequencer only ever talks to a `Console`. The terminal implementation
//! reads stdin line by line and turns Ctrl-C into `Input::Interrupted`; the
//! scripted one replays canned lines for tests and non-interactive runs.

use crate::Result;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::io::{self, Write};
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tracing::warn;

/// What a single read produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Line(String),
    /// Stream exhausted or unreadable
    Eof,
    /// Ctrl-C while waiting for input
    Interrupted,
}

#[async_trait]
pub trait Console: Send {
    /// Show `prompt` (no newline) and wait for one line
    async fn read_line(&mut self, prompt: &str) -> Input;

    /// Write `text` followed by a newline
    fn write(&mut self, text: &str) -> Result<()>;
}

/// Interactive console on stdin/stdout
pub struct TerminalConsole {
    lines: Lines<BufReader<Stdin>>,
    stdout: io::Stdout,
}

impl TerminalConsole {
    pub fn new() -> Self {
        Self {
            lines: BufReader::new(tokio::io::stdin()).lines(),
            stdout: io::stdout(),
        }
    }

    fn show_prompt(&mut self, prompt: &str) -> io::Result<()> {
        let mut out = self.stdout.lock();
        write!(out, "{}", prompt)?;
        out.flush()
    }
}

impl Default for TerminalConsole {
    fn default() -> Self {
        Self::new()
    }
}

fn line_to_input(line: io::Result<Option<String>>) -> Input {
    match line {
        Ok(Some(line)) => Input::Line(line),
        Ok(None) => Input::Eof,
        Err(e) => {
            warn!("Failed to read from stdin: {}", e);
            Input::Eof
        }
    }
}

#[async_trait]
impl Console for TerminalConsole {
    async fn read_line(&mut self, prompt: &str) -> Input {
        if let Err(e) = self.show_prompt(prompt) {
            warn!("Failed to write prompt: {}", e);
        }

        // next_line is cancel safe, so losing the race to Ctrl-C drops nothing
        let signal = tokio::select! {
            line = self.lines.next_line() => return line_to_input(line),
            signal = tokio::signal::ctrl_c() => signal,
        };

        match signal {
            Ok(()) => {
                // Keep the goodbye text off the prompt line
                let _ = writeln!(self.stdout);
                Input::Interrupted
            }
            Err(e) => {
                warn!("Ctrl-C handler unavailable: {}", e);
                line_to_input(self.lines.next_line().await)
            }
        }
    }

    fn write(&mut self, text: &str) -> Result<()> {
        let mut out = self.stdout.lock();
        writeln!(out, "{}", text)?;
        out.flush()?;
        Ok(())
    }
}

/// Replays a fixed list of inputs, then reports `Eof`. Keeps a transcript.
#[derive(Debug, Default)]
pub struct ScriptedConsole {
    inputs: VecDeque<Input>,
    transcript: Vec<String>,
}

impl ScriptedConsole {
    pub fn new<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            inputs: lines.into_iter().map(|l| Input::Line(l.into())).collect(),
            transcript: Vec::new(),
        }
    }

    /// Queue a Ctrl-C after the lines given so far
    pub fn then_interrupt(mut self) -> Self {
        self.inputs.push_back(Input::Interrupted);
        self
    }

    /// Prompts and written text, in order
    pub fn transcript(&self) -> &[String] {
        &self.transcript
    }

    pub fn output(&self) -> String {
        self.transcript.join("\n")
    }
}

#[async_trait]
impl Console for ScriptedConsole {
    async fn read_line(&mut self, prompt: &str) -> Input {
        self.transcript.push(prompt.to_string());
        self.inputs.pop_front().unwrap_or(Input::Eof)
    }

    fn write(&mut self, text: &str) -> Result<()> {
        self.transcript.push(text.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_scripted_console_replays_then_eof() {
        let mut console = ScriptedConsole::new(["first", "second"]).then_interrupt();

        assert_eq!(console.read_line("> ").await, Input::Line("first".to_string()));
        assert_eq!(console.read_line("> ").await, Input::Line("second".to_string()));
        assert_eq!(console.read_line("> ").await, Input::Interrupted);
        assert_eq!(console.read_line("> ").await, Input::Eof);
        assert_eq!(console.read_line("> ").await, Input::Eof);
    }

    #[test]
    fn test_scripted_console_transcript() {
        let mut console = ScriptedConsole::new(["answer"]);
        console.write("hello").unwrap();
        let input = tokio_test::block_on(console.read_line("prompt: "));

        assert_eq!(input, Input::Line("answer".to_string()));
        assert_eq!(console.transcript(), ["hello", "prompt: "]);
        assert_eq!(console.output(), "hello\nprompt: ");
    }

    #[test]
    fn test_read_errors_become_eof() {
        assert_eq!(line_to_input(Ok(None)), Input::Eof);
        assert_eq!(
            line_to_input(Err(io::Error::new(io::ErrorKind::InvalidData, "bad utf-8"))),
            Input::Eof
        );
        assert_eq!(
            line_to_input(Ok(Some("x".to_string()))),
            Input::Line("x".to_string())
        );
    }
}
