//! Rule Data Model

use crate::priority::Priority;

/// Predicate gating a rule's actions
pub type Condition = Box<dyn FnMut() -> anyhow::Result<bool> + Send>;

/// Side effect run when a rule matches
pub type Action = Box<dyn FnMut() -> anyhow::Result<()> + Send>;

/// A set of conditions and the actions they guard
///
/// Conditions are checked and actions run in insertion order.
#[derive(Default)]
pub struct Rule {
    /// Optional label for log output
    name: Option<String>,
    /// Conditions, all of which must hold
    conditions: Vec<Condition>,
    /// Actions run when the conditions hold
    actions: Vec<Action>,
    /// Ordering key
    priority: Priority,
}

impl Rule {
    /// Create an empty rule with fixed priority 0
    pub fn new() -> Self {
        Self::default()
    }

    /// Label used in log output
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Set the label used in log output
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = Some(name.into());
    }

    /// Use a fixed priority, replacing any priority function
    pub fn set_fixed_priority(&mut self, value: i32) {
        self.priority = Priority::Fixed(value);
    }

    /// Compute the priority with `f` on every read
    pub fn set_priority_function<F>(&mut self, f: F)
    where
        F: FnMut() -> i32 + Send + 'static,
    {
        self.priority = Priority::dynamic(f);
    }

    /// Compute the priority with a function that may fail
    pub fn set_fallible_priority_function<F>(&mut self, f: F)
    where
        F: FnMut() -> anyhow::Result<i32> + Send + 'static,
    {
        self.priority = Priority::fallible(f);
    }

    /// Current priority mode
    pub fn priority(&self) -> &Priority {
        &self.priority
    }

    /// Resolve the priority now
    pub fn current_priority(&mut self) -> anyhow::Result<i32> {
        self.priority.resolve()
    }

    /// Append a condition
    pub fn add_condition<F>(&mut self, mut f: F)
    where
        F: FnMut() -> bool + Send + 'static,
    {
        self.conditions.push(Box::new(move || Ok(f())));
    }

    /// Append a condition that may fail
    pub fn add_fallible_condition<F>(&mut self, f: F)
    where
        F: FnMut() -> anyhow::Result<bool> + Send + 'static,
    {
        self.conditions.push(Box::new(f));
    }

    /// Append an action
    pub fn add_action<F>(&mut self, mut f: F)
    where
        F: FnMut() + Send + 'static,
    {
        self.actions.push(Box::new(move || {
            f();
            Ok(())
        }));
    }

    /// Append an action that may fail
    pub fn add_fallible_action<F>(&mut self, f: F)
    where
        F: FnMut() -> anyhow::Result<()> + Send + 'static,
    {
        self.actions.push(Box::new(f));
    }

    /// Number of conditions
    pub fn condition_count(&self) -> usize {
        self.conditions.len()
    }

    /// Number of actions
    pub fn action_count(&self) -> usize {
        self.actions.len()
    }

    /// Check conditions left to right, stopping at the first `false`.
    ///
    /// An empty condition list holds. On failure the position of the
    /// failing condition is returned with its error.
    pub(crate) fn conditions_hold(&mut self) -> Result<bool, (usize, anyhow::Error)> {
        for (position, condition) in self.conditions.iter_mut().enumerate() {
            match condition() {
                Ok(true) => {}
                Ok(false) => return Ok(false),
                Err(e) => return Err((position, e)),
            }
        }
        Ok(true)
    }

    /// Run every action in order, stopping at the first failure
    pub(crate) fn run_actions(&mut self) -> Result<(), (usize, anyhow::Error)> {
        for (position, action) in self.actions.iter_mut().enumerate() {
            action().map_err(|e| (position, e))?;
        }
        Ok(())
    }
}

impl std::fmt::Debug for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Rule")
            .field("name", &self.name)
            .field("conditions", &self.conditions.len())
            .field("actions", &self.actions.len())
            .field("priority", &self.priority)
            .finish()
    }
}
