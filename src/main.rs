//! Command line entry point for the adaptive quiz engine
//!
//! Checks single answers against the validators and replays answer logs
//! against a question bank, printing the resulting ratings and next offers.

use adaptive_quiz::bank::QuestionBank;
use adaptive_quiz::config::AppConfig;
use adaptive_quiz::service::QuizService;
use adaptive_quiz::types::{PlayerId, QuestionId, ReportFlags};
use adaptive_quiz::{validate_number, validate_text};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Deserialize;
use serde_json::json;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};

/// Adaptive Quiz - Elo-rated question selection
#[derive(Parser)]
#[command(
    name = "adaptive-quiz",
    version,
    about = "An adaptive quiz engine with Elo-style player and question ratings",
    long_about = "Adaptive Quiz scores answers to text, number, true/false and multiple-choice \
                 questions, updates player and question ratings on a shared Elo scale, and \
                 offers each player the unseen question closest to their virtual rating."
)]
struct Args {
    /// Configuration file path
    #[arg(
        short,
        long,
        value_name = "FILE",
        global = true,
        help = "Path to configuration file (TOML format)"
    )]
    config: Option<PathBuf>,

    /// Log level override
    #[arg(
        short,
        long,
        value_name = "LEVEL",
        global = true,
        help = "Override log level (trace, debug, info, warn, error)"
    )]
    log_level: Option<String>,

    /// Enable debug mode
    #[arg(short, long, global = true, help = "Enable debug mode with verbose logging")]
    debug: bool,

    /// Dry run mode (validate config and exit)
    #[arg(long, help = "Validate configuration and exit without running a command")]
    dry_run: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Check one submitted answer against an expected answer
    Check {
        /// How the answers are compared
        #[arg(short, long, value_enum, default_value_t = AnswerKind::Text)]
        kind: AnswerKind,

        /// Stored correct answer
        expected: String,

        /// Answer as submitted by the player
        submitted: String,
    },

    /// Replay an answer log against a question bank
    Replay {
        /// Question bank (TOML)
        #[arg(short, long, value_name = "FILE")]
        bank: PathBuf,

        /// Answer log (JSON array of events)
        #[arg(long, value_name = "FILE")]
        log: PathBuf,

        /// Print Prometheus metrics after the replay
        #[arg(long)]
        metrics: bool,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum AnswerKind {
    Text,
    Number,
}

/// One entry of a replay log
#[derive(Debug, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
enum ReplayEvent {
    SelectTopics {
        player: PlayerId,
        subject: String,
        #[serde(default)]
        topics: Vec<String>,
    },
    Answer {
        player: PlayerId,
        question: QuestionId,
        answer: String,
    },
    Report {
        player: PlayerId,
        question: QuestionId,
        #[serde(default)]
        flags: ReportFlags,
        #[serde(default)]
        comment: String,
    },
}

impl ReplayEvent {
    fn player(&self) -> &PlayerId {
        match self {
            ReplayEvent::SelectTopics { player, .. }
            | ReplayEvent::Answer { player, .. }
            | ReplayEvent::Report { player, .. } => player,
        }
    }
}

/// Initialize structured logging with the configured level
fn init_logging(log_level: &str) -> Result<()> {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| log_level.into()),
        )
        .with_target(false)
        .with_thread_ids(true)
        .with_line_number(true)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    Ok(())
}

/// Display startup banner with engine settings
fn display_startup_banner(config: &AppConfig) {
    info!("Adaptive Quiz v{}", adaptive_quiz::VERSION);
    info!("   Service: {}", config.service.name);
    info!("   Log level: {}", config.service.log_level);
    info!(
        "   K factors: player {}, question {}",
        config.rating.player_k_factor, config.rating.question_k_factor
    );
    info!("   Rating cap: {}", config.rating.rating_cap);
    info!("   Repeat window: {}", config.selection.repeat_window);
}

/// Load configuration from file or environment and apply CLI overrides
fn load_config(args: &Args) -> Result<AppConfig> {
    let mut config = if let Some(config_path) = &args.config {
        AppConfig::from_file(config_path)?
    } else {
        AppConfig::from_env()?
    };

    // Apply CLI overrides
    if let Some(log_level) = &args.log_level {
        config.service.log_level = log_level.clone();
    }

    if args.debug {
        config.service.log_level = "debug".to_string();
    }

    adaptive_quiz::config::validate_config(&config)?;
    Ok(config)
}

fn run_check(kind: AnswerKind, expected: &str, submitted: &str) {
    let correct = match kind {
        AnswerKind::Text => validate_text(expected, submitted),
        AnswerKind::Number => validate_number(expected, submitted),
    };
    println!("{}", if correct { "correct" } else { "incorrect" });
}

fn run_replay(config: &AppConfig, bank: &Path, log: &Path, print_metrics: bool) -> Result<()> {
    let service = QuizService::in_memory(config)?;
    QuestionBank::from_file(bank)?.load_into(&service)?;

    let contents = std::fs::read_to_string(log)
        .with_context(|| format!("Failed to read answer log {}", log.display()))?;
    let events: Vec<ReplayEvent> = serde_json::from_str(&contents)
        .with_context(|| format!("Failed to parse answer log {}", log.display()))?;

    let mut players = BTreeSet::new();
    for (index, event) in events.iter().enumerate() {
        if players.insert(event.player().clone()) {
            service.register_player(event.player())?;
        }

        let result = match event {
            ReplayEvent::SelectTopics {
                player,
                subject,
                topics,
            } => service.select_topics(player, subject, topics).map(|_| ()),
            ReplayEvent::Answer {
                player,
                question,
                answer,
            } => service.submit_answer(player, *question, answer).map(|_| ()),
            ReplayEvent::Report {
                player,
                question,
                flags,
                comment,
            } => service
                .report_question(player, *question, flags.clone(), comment)
                .map(|_| ()),
        };

        if let Err(e) = result {
            warn!("Skipping log entry #{}: {}", index + 1, e);
        }
    }

    let mut summary = Vec::new();
    for player_id in &players {
        let player = service.player(player_id)?;
        let ratings = service.rating_list(player_id, &[])?;
        let next = match service.next_question(player_id) {
            Ok(offer) => json!({
                "question": offer.question.id,
                "selection": offer.selection.label(),
                "virtualRating": offer.virtual_rating,
                "reportable": offer
                    .recent_questions
                    .iter()
                    .map(|question| question.id)
                    .collect::<Vec<_>>(),
            }),
            Err(e) => json!({ "error": e.to_string() }),
        };

        summary.push(json!({
            "player": player.id,
            "rating": player.rating,
            "topics": ratings,
            "next": next,
        }));
    }

    println!("{}", serde_json::to_string_pretty(&summary)?);

    if print_metrics {
        print!("{}", service.metrics().gather_text()?);
    }

    Ok(())
}

fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    // Load configuration (CLI args can override environment/config file)
    let config = load_config(&args).unwrap_or_else(|e| {
        eprintln!("Configuration error: {}", e);
        std::process::exit(1);
    });

    // Initialize logging early (before any other operations)
    if let Err(e) = init_logging(&config.service.log_level) {
        eprintln!("Failed to initialize logging: {}", e);
        std::process::exit(1);
    }

    display_startup_banner(&config);

    if args.dry_run {
        info!("Configuration validation successful");
        return Ok(());
    }

    match &args.command {
        Some(Command::Check {
            kind,
            expected,
            submitted,
        }) => run_check(*kind, expected, submitted),
        Some(Command::Replay { bank, log, metrics }) => {
            if let Err(e) = run_replay(&config, bank, log, *metrics) {
                error!("Replay failed: {:#}", e);
                std::process::exit(1);
            }
        }
        None => info!("No command given, use --help to list commands"),
    }

    Ok(())
}
