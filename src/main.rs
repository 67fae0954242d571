use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use tracing::{error, info};
use tracing_subscriber::filter::Directive;
use tracing_subscriber::EnvFilter;

use eternal_quest::config::DEFAULT_CONFIG_PATH;
use eternal_quest::{JsonFileStore, QuestConfig, QuestLedger, Shell};

fn main() -> ExitCode {
    let config_path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH));

    // Config is read before logging is up, so a bad file is reported directly
    let config = match QuestConfig::load(&config_path) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load config: {}", e);
            return ExitCode::FAILURE;
        }
    };

    // Initialize logging; stderr keeps the menu on stdout readable
    let filter = match config.log_filter.parse::<Directive>() {
        Ok(directive) => EnvFilter::from_default_env().add_directive(directive),
        Err(e) => {
            eprintln!("Ignoring invalid log_filter '{}': {}", config.log_filter, e);
            EnvFilter::from_default_env()
        }
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    let mut ledger = QuestLedger::new();
    for goal in config.starter_goals {
        ledger.add_goal(goal);
    }

    let store = JsonFileStore::new(&config.save_path);
    info!(
        "Starting with {} goals, saving to {:?} ({} format)",
        ledger.len(),
        store.path(),
        config.save_format.as_str()
    );

    let stdin = io::stdin();
    let mut shell = Shell::new(ledger, &store, config.save_format, stdin.lock(), io::stdout());
    if let Err(e) = shell.run() {
        error!("Console session failed: {}", e);
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
