//! Fluent Rule Construction

use crate::rule::Rule;

/// Builder producing one [`Rule`]
///
/// Every method takes the builder by value and hands it back, so calls
/// chain. `build` consumes the builder.
#[derive(Debug, Default)]
#[must_use = "a builder does nothing until `build` is called or it is returned to the engine"]
pub struct RuleBuilder {
    rule: Rule,
}

impl RuleBuilder {
    /// Start an empty rule
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a condition
    pub fn when<F>(mut self, condition: F) -> Self
    where
        F: FnMut() -> bool + Send + 'static,
    {
        self.rule.add_condition(condition);
        self
    }

    /// Add another condition. Same as [`RuleBuilder::when`].
    pub fn and<F>(self, condition: F) -> Self
    where
        F: FnMut() -> bool + Send + 'static,
    {
        self.when(condition)
    }

    /// Add a condition that may fail
    pub fn try_when<F>(mut self, condition: F) -> Self
    where
        F: FnMut() -> anyhow::Result<bool> + Send + 'static,
    {
        self.rule.add_fallible_condition(condition);
        self
    }

    /// Add another condition that may fail. Same as [`RuleBuilder::try_when`].
    pub fn try_and<F>(self, condition: F) -> Self
    where
        F: FnMut() -> anyhow::Result<bool> + Send + 'static,
    {
        self.try_when(condition)
    }

    /// Add an action
    pub fn then<F>(mut self, action: F) -> Self
    where
        F: FnMut() + Send + 'static,
    {
        self.rule.add_action(action);
        self
    }

    /// Add an action that may fail
    pub fn try_then<F>(mut self, action: F) -> Self
    where
        F: FnMut() -> anyhow::Result<()> + Send + 'static,
    {
        self.rule.add_fallible_action(action);
        self
    }

    /// Use a fixed priority
    pub fn with_priority(mut self, value: i32) -> Self {
        self.rule.set_fixed_priority(value);
        self
    }

    /// Compute the priority at evaluation time
    pub fn with_dynamic_priority<F>(mut self, f: F) -> Self
    where
        F: FnMut() -> i32 + Send + 'static,
    {
        self.rule.set_priority_function(f);
        self
    }

    /// Compute the priority with a function that may fail
    pub fn try_with_dynamic_priority<F>(mut self, f: F) -> Self
    where
        F: FnMut() -> anyhow::Result<i32> + Send + 'static,
    {
        self.rule.set_fallible_priority_function(f);
        self
    }

    /// Label the rule in log output
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.rule.set_name(name);
        self
    }

    /// Finish and return the rule
    pub fn build(self) -> Rule {
        self.rule
    }
}
