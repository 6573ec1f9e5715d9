//! CLI command definitions

use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use symposium_domain::ModerationMode;

/// Output format for the finished conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Formatted transcript
    Text,
    /// Final conversation state as JSON
    Json,
}

fn parse_moderation(s: &str) -> Result<ModerationMode, String> {
    s.parse()
}

/// CLI arguments for symposium
#[derive(Parser, Debug)]
#[command(name = "symposium")]
#[command(author, version, about = "Philosophers in dialogue - AI personas take turns on a topic")]
#[command(long_about = r#"
Symposium stages a dialogue between AI personas (Socrates and Confucius by
default). Each speaker answers the previous one, round after round.

Moderation modes:
  none   Speakers answer each other directly
  ai     A moderator summarizes every turn and guides the next speaker
  user   The dialogue pauses after every turn for your guidance

Configuration files are loaded from (in priority order):
1. SYMPOSIUM_* environment variables
2. --config <path>        Explicit config file
3. ./symposium.toml       Project-level config
4. ~/.config/symposium/config.toml   Global config

Example:
  symposium "What is virtue?"
  symposium --rounds 5 --start confucius --moderation user "Can virtue be taught?"
  symposium --moderation none --output json "What is justice?"
"#)]
pub struct Cli {
    /// The opening topic of the dialogue (prompted for when omitted)
    pub topic: Option<String>,

    /// Number of rounds (each speaker talks once per round)
    #[arg(short, long, value_name = "N")]
    pub rounds: Option<u32>,

    /// Persona that opens the dialogue
    #[arg(short, long, value_name = "ID")]
    pub start: Option<String>,

    /// Moderation mode: none, ai or user
    #[arg(long, value_name = "MODE", value_parser = parse_moderation)]
    pub moderation: Option<ModerationMode>,

    /// Conversation mode, selects the prompt set (e.g. philosophy, bio)
    #[arg(long, value_name = "MODE")]
    pub mode: Option<String>,

    /// Speakers in turn order (can be specified multiple times)
    #[arg(long = "speaker", value_name = "ID")]
    pub speakers: Vec<String>,

    /// Show extracted reasoning blocks in the transcript
    #[arg(long)]
    pub show_reasoning: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub output: OutputFormat,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress progress indicators
    #[arg(short, long)]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,

    /// Also write diagnostic logs to daily files in this directory
    #[arg(long, value_name = "DIR")]
    pub log_dir: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_full_invocation() {
        let cli = Cli::try_parse_from([
            "symposium",
            "--rounds",
            "2",
            "--start",
            "confucius",
            "--moderation",
            "user",
            "--speaker",
            "confucius",
            "--speaker",
            "socrates",
            "--output",
            "json",
            "-vv",
            "What is virtue?",
        ])
        .unwrap();

        assert_eq!(cli.topic.as_deref(), Some("What is virtue?"));
        assert_eq!(cli.rounds, Some(2));
        assert_eq!(cli.start.as_deref(), Some("confucius"));
        assert_eq!(cli.moderation, Some(ModerationMode::UserGuidance));
        assert_eq!(cli.speakers, ["confucius", "socrates"]);
        assert_eq!(cli.output, OutputFormat::Json);
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn test_defaults_leave_config_in_charge() {
        let cli = Cli::try_parse_from(["symposium"]).unwrap();
        assert!(cli.topic.is_none());
        assert!(cli.rounds.is_none());
        assert!(cli.moderation.is_none());
        assert!(cli.speakers.is_empty());
        assert_eq!(cli.output, OutputFormat::Text);
    }

    #[test]
    fn test_unknown_moderation_is_rejected() {
        assert!(Cli::try_parse_from(["symposium", "--moderation", "committee"]).is_err());
    }
}
