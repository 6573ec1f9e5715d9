//! CLI entrypoint for symposium
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, bail};
use clap::Parser;
use std::io::{self, IsTerminal, Write};
use std::path::Path;
use std::sync::Arc;
use symposium_application::{
    AutoGuidance, Capability, ConversationLogger, ConversationSetup, DialogueEnding,
    DialogueProgressNotifier, GuidanceProvider, NoProgress, RetryingInvoker, RunDialogueUseCase,
    SpeakerBinding, TextGenerator,
};
use symposium_domain::{ConfigIssue, ModerationMode, SpeakerId};
use symposium_infrastructure::{
    ConfigLoader, FileConfig, JsonlConversationLogger, OpenAiCompatibleGenerator, PersonaRegistry,
};
use symposium_presentation::{
    Cli, ConsoleFormatter, InteractiveGuidance, OutputFormat, ProgressReporter, SimpleProgress,
};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, Layer};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Exit code for a dialogue stopped by the user
const EXIT_CANCELLED: i32 = 130;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.show_config {
        println!("Configuration sources (highest priority first):");
        for source in ConfigLoader::describe_sources(cli.config.as_deref()) {
            println!("  {}", source);
        }
        return Ok(());
    }

    let log_guard = init_logging(cli.verbose, cli.log_dir.as_deref())?;
    info!("Starting symposium");

    let mut config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_deref())?
    };
    apply_cli_overrides(&mut config, &cli);

    let issues = config.validate();
    report_issues(&issues);
    if issues.iter().any(ConfigIssue::is_error) {
        bail!("Configuration has errors, see above");
    }

    let topic = match &cli.topic {
        Some(topic) => topic.clone(),
        None => prompt_topic()?,
    };

    // === Dependency Injection ===
    let registry = PersonaRegistry::from_config(&config);
    let (moderation, _) = config.conversation.parse_moderation();
    let mode = config.conversation.parse_mode();
    let roster = registry.roster(&config.conversation.speaker_ids())?;

    let generator: Arc<dyn TextGenerator> = Arc::new(
        OpenAiCompatibleGenerator::from_config(&config)
            .context("Failed to set up the generation endpoint")?,
    );

    let bindings = roster
        .into_iter()
        .map(|speaker| {
            let capability = Capability::new(generator.clone(), speaker.id.clone(), mode.clone());
            SpeakerBinding::new(speaker, capability)
        })
        .collect();

    let mut setup = ConversationSetup::new(topic, bindings, config.conversation.rounds)
        .with_moderation_mode(moderation);
    if let Some(start) = config.conversation.starting_speaker_id() {
        setup = setup.with_starting_speaker(start);
    }
    if moderation == ModerationMode::Ai {
        let moderator = SpeakerId::new(config.conversation.moderator.clone());
        setup = setup.with_ai_moderator(Capability::new(generator.clone(), moderator, mode));
    }

    let cancellation = CancellationToken::new();
    spawn_ctrl_c_handler(cancellation.clone());

    let invoker = RetryingInvoker::new(config.retry.to_retry_policy());
    let guidance: Arc<dyn GuidanceProvider> = if moderation == ModerationMode::UserGuidance {
        Arc::new(InteractiveGuidance::new())
    } else {
        Arc::new(AutoGuidance)
    };
    let mut use_case = RunDialogueUseCase::new(invoker)
        .with_guidance(guidance)
        .with_cancellation(cancellation);

    if let Some(dir) = &config.logging.transcript_dir
        && let Some(logger) = JsonlConversationLogger::in_dir(dir)
    {
        info!("Writing transcript to {}", logger.path().display());
        let logger: Arc<dyn ConversationLogger> = Arc::new(logger);
        use_case = use_case.with_conversation_logger(logger);
    }

    let progress: Arc<dyn DialogueProgressNotifier> = if cli.quiet {
        Arc::new(NoProgress)
    } else if io::stderr().is_terminal() {
        Arc::new(ProgressReporter::new())
    } else {
        Arc::new(SimpleProgress)
    };

    let report = use_case.execute_with_progress(setup, progress).await?;

    let output = match cli.output {
        OutputFormat::Text => ConsoleFormatter::format(&report, cli.show_reasoning),
        OutputFormat::Json => ConsoleFormatter::format_json(&report.state),
    };
    println!("{}", output);

    match report.ending {
        DialogueEnding::Completed => {
            drop(log_guard);
            Ok(())
        }
        DialogueEnding::Failed => {
            let speaker = report
                .failed_speaker
                .map(|id| id.to_string())
                .unwrap_or_else(|| "unknown speaker".to_string());
            bail!("Dialogue failed at {}", speaker)
        }
        DialogueEnding::Cancelled => {
            drop(log_guard);
            // A guidance read may still be blocking on stdin
            std::process::exit(EXIT_CANCELLED);
        }
    }
}

/// Console logging from `-v` (overridable with `RUST_LOG`), plus daily log
/// files when `--log-dir` is given
fn init_logging(verbose: u8, log_dir: Option<&Path>) -> Result<Option<WorkerGuard>> {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = || EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let console = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_writer(io::stderr)
        .with_filter(filter());

    let Some(dir) = log_dir else {
        tracing_subscriber::registry().with(console).init();
        return Ok(None);
    };

    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create log directory {}", dir.display()))?;
    let appender = tracing_appender::rolling::daily(dir, "symposium.log");
    let (writer, guard) = tracing_appender::non_blocking(appender);
    let file = tracing_subscriber::fmt::layer()
        .with_ansi(false)
        .with_writer(writer)
        .with_filter(filter());

    tracing_subscriber::registry().with(console).with(file).init();
    Ok(Some(guard))
}

fn apply_cli_overrides(config: &mut FileConfig, cli: &Cli) {
    let conversation = &mut config.conversation;
    if let Some(rounds) = cli.rounds {
        conversation.rounds = rounds;
    }
    if let Some(start) = &cli.start {
        conversation.starting_speaker = Some(start.clone());
    }
    if let Some(moderation) = cli.moderation {
        conversation.moderation = moderation.as_str().to_string();
    }
    if let Some(mode) = &cli.mode {
        conversation.mode = mode.clone();
    }
    if !cli.speakers.is_empty() {
        conversation.speakers = cli.speakers.clone();
    }
}

fn report_issues(issues: &[ConfigIssue]) {
    for issue in issues {
        if issue.is_error() {
            eprintln!("config error: {}", issue);
        } else {
            warn!("config: {}", issue);
        }
    }
}

fn prompt_topic() -> Result<String> {
    print!("Topic: ");
    io::stdout().flush()?;
    let mut topic = String::new();
    if io::stdin().read_line(&mut topic)? == 0 {
        bail!("No topic given");
    }
    Ok(topic)
}

fn spawn_ctrl_c_handler(token: CancellationToken) {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            eprintln!("\nInterrupted, stopping after the current step...");
            token.cancel();
        }
    });
}
