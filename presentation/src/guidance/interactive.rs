//! Interactive guidance for user-moderated dialogues.
//!
//! After every turn the user sees:
//!
//! ```text
//! ============================================================
//!   Round 1/3 - Socrates has spoken
//! ============================================================
//!
//!   <turn text>
//!
//! Next speaker: Confucius
//! Enter guidance, press Enter to let the dialogue continue, or /quit.
//!
//! guide>
//! ```
//!
//! | Input | Effect |
//! |-------|--------|
//! | text | Guidance for the next speaker |
//! | empty, `auto` | Default guidance |
//! | `/quit`, `/q`, end of input | Stop the dialogue |

use crate::output::console::ConsoleFormatter;
use async_trait::async_trait;
use colored::Colorize;
use std::io::{self, BufRead, Write};
use symposium_application::{GuidanceError, GuidanceProvider, GuidanceRequest};

/// What a line of user input means
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuidanceInput {
    Guidance(String),
    Defer,
    Quit,
}

impl GuidanceInput {
    /// Interpret one line; `None` is end of input
    pub fn parse(line: Option<&str>) -> Self {
        let Some(line) = line else {
            return GuidanceInput::Quit;
        };
        match line.trim() {
            "" | "auto" | "/auto" => GuidanceInput::Defer,
            "/quit" | "/q" | "/stop" => GuidanceInput::Quit,
            text => GuidanceInput::Guidance(text.to_string()),
        }
    }
}

/// Terminal-based [`GuidanceProvider`]
pub struct InteractiveGuidance;

impl InteractiveGuidance {
    pub fn new() -> Self {
        Self
    }

    fn display_turn(&self, request: &GuidanceRequest) {
        let rule = "=".repeat(60);
        println!();
        println!("{}", rule.magenta());
        println!(
            "{}",
            format!(
                "  Round {}/{} - {} has spoken",
                request.round_number, request.total_rounds, request.speaker.display_name
            )
            .magenta()
            .bold()
        );
        println!("{}", rule.magenta());
        println!();

        if request.turn.visible_text.is_empty() {
            println!("{}", "  (no visible reply)".dimmed().italic());
        } else {
            println!("{}", ConsoleFormatter::indent(&request.turn.visible_text, "  "));
        }
        println!();

        if request.is_final_turn {
            println!(
                "{}",
                "This was the final turn. Press Enter to finish.".cyan()
            );
        } else {
            println!(
                "{} {}",
                "Next speaker:".cyan().bold(),
                request.next_speaker.display_name
            );
            println!(
                "Enter guidance, press Enter to let the dialogue continue, or {}.",
                "/quit".red()
            );
        }
        println!();
    }

    fn prompt(&self) -> Result<(), GuidanceError> {
        print!("{} ", "guide>".magenta().bold());
        io::stdout()
            .flush()
            .map_err(|e| GuidanceError::Io(format!("Failed to flush stdout: {}", e)))
    }
}

impl Default for InteractiveGuidance {
    fn default() -> Self {
        Self::new()
    }
}

/// Read one line from stdin; `None` at end of input
fn read_line() -> Result<Option<String>, GuidanceError> {
    let mut input = String::new();
    let read = io::stdin()
        .lock()
        .read_line(&mut input)
        .map_err(|e| GuidanceError::Io(format!("Failed to read input: {}", e)))?;
    Ok((read > 0).then_some(input))
}

#[async_trait]
impl GuidanceProvider for InteractiveGuidance {
    async fn request_guidance(&self, request: &GuidanceRequest) -> Result<String, GuidanceError> {
        self.display_turn(request);
        self.prompt()?;

        let line = tokio::task::spawn_blocking(read_line)
            .await
            .map_err(|e| GuidanceError::Io(format!("Input task failed: {}", e)))??;

        match GuidanceInput::parse(line.as_deref()) {
            GuidanceInput::Guidance(text) => Ok(text),
            GuidanceInput::Defer => Ok(String::new()),
            GuidanceInput::Quit => Err(GuidanceError::Cancelled),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_guidance_text() {
        assert_eq!(
            GuidanceInput::parse(Some("  Ask about ritual.\n")),
            GuidanceInput::Guidance("Ask about ritual.".to_string())
        );
    }

    #[test]
    fn test_parse_defer() {
        assert_eq!(GuidanceInput::parse(Some("\n")), GuidanceInput::Defer);
        assert_eq!(GuidanceInput::parse(Some("/auto")), GuidanceInput::Defer);
        assert_eq!(GuidanceInput::parse(Some("auto\n")), GuidanceInput::Defer);
    }

    #[test]
    fn test_parse_quit_and_eof() {
        assert_eq!(GuidanceInput::parse(Some("/quit")), GuidanceInput::Quit);
        assert_eq!(GuidanceInput::parse(Some("/q\n")), GuidanceInput::Quit);
        assert_eq!(GuidanceInput::parse(None), GuidanceInput::Quit);
    }

    #[test]
    fn test_slash_text_that_is_not_a_command_is_guidance() {
        assert_eq!(
            GuidanceInput::parse(Some("/questions about the soul")),
            GuidanceInput::Guidance("/questions about the soul".to_string())
        );
    }
}
