//! Console output formatter for dialogue transcripts

use colored::Colorize;
use symposium_application::{DialogueEnding, DialogueReport};
use symposium_domain::{
    ConversationState, Degradation, GuidanceSource, ModerationMode, SpeakerId, Turn,
};

/// Formats conversation results for console output
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Format the full transcript of a finished (or interrupted) dialogue
    pub fn format(report: &DialogueReport, show_reasoning: bool) -> String {
        let state = &report.state;
        let mut output = String::new();

        output.push_str(&Self::header("Symposium"));
        output.push_str(&format!(
            "\n{} {}\n",
            "Topic:".bold(),
            state.original_topic.trim()
        ));
        output.push_str(&format!(
            "{} {}\n",
            "Speakers:".bold(),
            state
                .speakers
                .iter()
                .map(|s| s.display_name.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        ));
        output.push_str(&format!(
            "{} {} round(s), moderation: {}\n",
            "Format:".bold(),
            state.total_rounds,
            state.moderation_mode
        ));

        let mut current_round = 0;
        for turn in &state.turns {
            if turn.round_number != current_round {
                current_round = turn.round_number;
                output.push_str(&Self::section_header(&format!(
                    "Round {}/{}",
                    current_round, state.total_rounds
                )));
            }
            output.push_str(&Self::format_turn(state, turn, show_reasoning));
        }

        output.push_str(&Self::footer(report));
        output
    }

    /// Format a single turn with its moderator annotations
    pub fn format_turn(state: &ConversationState, turn: &Turn, show_reasoning: bool) -> String {
        let mut output = String::new();

        output.push_str(&format!(
            "\n{} {}\n",
            Self::speaker_name(state, &turn.speaker_id).yellow().bold(),
            format!("#{}", turn.sequence_index + 1).dimmed()
        ));

        if show_reasoning && let Some(reasoning) = &turn.reasoning_text {
            output.push_str(&format!("{}\n", "  (reasoning)".dimmed()));
            output.push_str(&format!("{}\n", Self::indent(reasoning, "  | ").dimmed()));
        }

        if turn.visible_text.is_empty() {
            output.push_str(&format!("{}\n", "  (no visible reply)".dimmed().italic()));
        } else {
            output.push_str(&Self::indent(&turn.visible_text, "  "));
            output.push('\n');
        }

        if let Some(summary) = &turn.moderator_summary {
            output.push_str(&format!("  {} {}\n", "Summary:".cyan(), summary));
        }
        if let Some(guidance) = &turn.moderator_guidance {
            let label = match turn.guidance_source {
                Some(GuidanceSource::User) => "Guidance (you):",
                Some(GuidanceSource::Fallback) => "Guidance (default):",
                _ => "Guidance:",
            };
            output.push_str(&format!("  {} {}\n", label.cyan(), guidance));
        }

        for degradation in &turn.degradations {
            if let Some(note) = Self::degradation_note(*degradation, state.moderation_mode) {
                output.push_str(&format!("  {} {}\n", "!".yellow(), note.yellow()));
            }
        }

        output
    }

    /// Format the final conversation state as JSON
    pub fn format_json(state: &ConversationState) -> String {
        serde_json::to_string_pretty(state).unwrap_or_else(|_| "{}".to_string())
    }

    fn speaker_name(state: &ConversationState, id: &SpeakerId) -> String {
        state
            .speaker(id)
            .map(|s| s.display_name.clone())
            .unwrap_or_else(|| id.to_string())
    }

    fn degradation_note(degradation: Degradation, mode: ModerationMode) -> Option<&'static str> {
        match degradation {
            Degradation::EmptyVisibleText => Some("reply was empty after removing reasoning"),
            Degradation::ModeratorUnavailable => Some("moderator unavailable for this turn"),
            // Fallback guidance is expected whenever the user defers
            Degradation::GuidanceFallback if mode == ModerationMode::UserGuidance => None,
            Degradation::GuidanceFallback => Some("moderator gave no guidance, default used"),
        }
    }

    fn header(title: &str) -> String {
        format!(
            "\n{}\n{}\n{}\n",
            "=".repeat(60).cyan(),
            format!("  {}", title).bold().cyan(),
            "=".repeat(60).cyan()
        )
    }

    fn section_header(title: &str) -> String {
        format!(
            "\n{}\n{}\n",
            format!("-- {} ", title).bold(),
            "-".repeat(40).dimmed()
        )
    }

    fn footer(report: &DialogueReport) -> String {
        let state = &report.state;
        let status = match report.ending {
            DialogueEnding::Completed => format!(
                "{} {} turn(s) over {} round(s)",
                "Completed:".green().bold(),
                state.turns.len(),
                state.total_rounds
            ),
            DialogueEnding::Failed => format!(
                "{} {}",
                "Failed:".red().bold(),
                state.error.as_deref().unwrap_or("unknown error")
            ),
            DialogueEnding::Cancelled => format!(
                "{} after {} of {} turn(s)",
                "Cancelled".yellow().bold(),
                state.turns.len(),
                state.expected_turns()
            ),
        };

        let mut output = format!("\n{}\n{}\n", "=".repeat(60).cyan(), status);
        let degraded = report.degraded_turns();
        if degraded > 0 {
            output.push_str(&format!(
                "{}\n",
                format!("{} turn(s) were degraded", degraded).yellow()
            ));
        }
        output
    }

    /// Indent a multi-line string
    pub fn indent(text: &str, prefix: &str) -> String {
        text.lines()
            .map(|line| format!("{}{}", prefix, line))
            .collect::<Vec<_>>()
            .join("\n")
    }
}
