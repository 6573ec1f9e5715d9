//! Progress reporting for dialogue execution

use colored::Colorize;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use std::sync::Mutex;
use std::time::Duration;
use symposium_application::{DialogueProgressNotifier, RetryOutcome};
use symposium_domain::{ConversationPhase, Speaker, SpeakerId, Turn};

/// Reports progress with one spinner per turn
pub struct ProgressReporter {
    multi: MultiProgress,
    turn_bar: Mutex<Option<(ProgressBar, String)>>,
}

impl ProgressReporter {
    pub fn new() -> Self {
        Self {
            multi: MultiProgress::new(),
            turn_bar: Mutex::new(None),
        }
    }

    fn spinner_style() -> ProgressStyle {
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {prefix:.bold.cyan} {msg} {elapsed:.dim}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
    }

    fn set_message(&self, message: String) {
        if let Ok(guard) = self.turn_bar.lock()
            && let Some((pb, _)) = guard.as_ref()
        {
            pb.set_message(message);
        }
    }

    fn clear(&self) {
        if let Ok(mut guard) = self.turn_bar.lock()
            && let Some((pb, _)) = guard.take()
        {
            pb.finish_and_clear();
        }
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl DialogueProgressNotifier for ProgressReporter {
    fn on_turn_start(&self, speaker: &Speaker, round: u32) {
        self.clear();

        let pb = self.multi.add(ProgressBar::new_spinner());
        pb.set_style(Self::spinner_style());
        pb.set_prefix(format!("Round {}", round));
        pb.set_message(format!("{} is speaking...", speaker.display_name));
        pb.enable_steady_tick(Duration::from_millis(100));

        if let Ok(mut guard) = self.turn_bar.lock() {
            *guard = Some((pb, speaker.display_name.clone()));
        }
    }

    fn on_attempt(&self, persona: &SpeakerId, outcome: &RetryOutcome) {
        if outcome.succeeded {
            return;
        }
        let label = outcome.error.as_ref().map(|e| e.label()).unwrap_or("error");
        let message = if outcome.will_retry() {
            format!(
                "{} attempt {}/{} failed ({}), retrying...",
                persona, outcome.attempt_number, outcome.max_attempts, label
            )
        } else {
            format!("{} failed ({})", persona, label)
        };
        self.set_message(message.yellow().to_string());
    }

    fn on_moderation_start(&self, turn: &Turn) {
        self.set_message(format!(
            "Moderator reviewing turn #{}...",
            turn.sequence_index + 1
        ));
    }

    fn on_turn_recorded(&self, turn: &Turn) {
        if let Ok(mut guard) = self.turn_bar.lock()
            && let Some((pb, name)) = guard.take()
        {
            let mark = if turn.is_degraded() {
                "!".yellow()
            } else {
                "v".green()
            };
            pb.finish_with_message(format!("{} {} (#{})", mark, name, turn.sequence_index + 1));
        }
    }

    fn on_phase_change(&self, phase: ConversationPhase) {
        match phase {
            ConversationPhase::Running => {}
            _ => self.clear(),
        }
    }
}

/// Simple line-based progress for non-terminal output
pub struct SimpleProgress;

impl DialogueProgressNotifier for SimpleProgress {
    fn on_turn_start(&self, speaker: &Speaker, round: u32) {
        eprintln!(
            "{} Round {}: {}",
            "->".cyan(),
            round,
            speaker.display_name.bold()
        );
    }

    fn on_attempt(&self, persona: &SpeakerId, outcome: &RetryOutcome) {
        if let Some(error) = &outcome.error {
            eprintln!(
                "  {} {} attempt {}/{}: {}",
                "x".red(),
                persona,
                outcome.attempt_number,
                outcome.max_attempts,
                error
            );
        }
    }

    fn on_turn_recorded(&self, turn: &Turn) {
        if turn.is_degraded() {
            eprintln!("  {} turn #{} degraded", "!".yellow(), turn.sequence_index + 1);
        } else {
            eprintln!("  {} turn #{}", "v".green(), turn.sequence_index + 1);
        }
    }
}
