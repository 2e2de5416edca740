//! Greeter Error Types

use rule_engine::RuleError;
use thiserror::Error;

/// Errors raised while setting up or running the greeter
#[derive(Debug, Error)]
pub enum GreeterError {
    /// Settings could not be loaded
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// Rule pass aborted
    #[error("Rule evaluation failed: {0}")]
    Rules(#[from] RuleError),

    /// Subscriber could not be installed
    #[error("Logging setup failed: {0}")]
    Logging(String),
}
