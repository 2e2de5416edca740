//! Greeter
//!
//! Host program for the rule engine: registers time-of-day greeting rules,
//! runs one pass and reports what fired.

mod error;
mod greetings;
mod settings;

pub use error::GreeterError;
pub use greetings::{fixed_clock, register_greetings, system_clock, Clock, Transcript};
pub use settings::{GreeterSettings, DEFAULT_SETTINGS_FILE};

use rule_engine::RuleEngine;
use std::str::FromStr;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

/// Initialize logging at the given max level ("error" through "trace")
pub fn init_logging(level: &str) -> Result<(), GreeterError> {
    let level = Level::from_str(level).map_err(|e| GreeterError::Logging(e.to_string()))?;
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| GreeterError::Logging(e.to_string()))
}

/// Register the greeting rules, run one pass and return the greetings
pub fn run(settings: &GreeterSettings) -> Result<Vec<String>, GreeterError> {
    let clock = match settings.fixed_time {
        Some(at) => {
            info!("Using fixed clock at {}", at);
            fixed_clock(at)
        }
        None => system_clock(),
    };

    let transcript = Transcript::new();
    let mut engine = RuleEngine::new();
    register_greetings(&mut engine, clock, &transcript);

    engine.execute()?;
    Ok(transcript.lines())
}
