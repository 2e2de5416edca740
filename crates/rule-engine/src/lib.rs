//! Priority-Ordered Rule Engine
//!
//! Rules pair a list of conditions with a list of actions. On every pass the
//! engine resolves each rule's priority (fixed or computed), visits rules in
//! ascending priority order and runs the actions of every rule whose
//! conditions all hold.

mod builder;
mod engine;
mod error;
mod priority;
mod rule;

pub use builder::RuleBuilder;
pub use engine::RuleEngine;
pub use error::RuleError;
pub use priority::{Priority, PriorityFn};
pub use rule::{Action, Condition, Rule};
