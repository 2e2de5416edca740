//! Rule Evaluation Error Types

use thiserror::Error;

/// Errors that abort an evaluation pass
///
/// `rule` is the registration index of the failing rule. `position` is the
/// index of the failing callable within that rule's condition or action list.
#[derive(Debug, Error)]
pub enum RuleError {
    /// Dynamic priority function failed
    #[error("Priority function of rule #{rule} failed: {source}")]
    Priority {
        rule: usize,
        #[source]
        source: anyhow::Error,
    },

    /// Condition failed to evaluate
    #[error("Condition {position} of rule #{rule} failed: {source}")]
    Condition {
        rule: usize,
        position: usize,
        #[source]
        source: anyhow::Error,
    },

    /// Action failed
    #[error("Action {position} of rule #{rule} failed: {source}")]
    Action {
        rule: usize,
        position: usize,
        #[source]
        source: anyhow::Error,
    },
}

impl RuleError {
    /// Registration index of the rule that failed
    pub fn rule(&self) -> usize {
        match self {
            RuleError::Priority { rule, .. }
            | RuleError::Condition { rule, .. }
            | RuleError::Action { rule, .. } => *rule,
        }
    }
}
