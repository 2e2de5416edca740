//! Rule Priority

use std::fmt;

/// Function computing a priority at evaluation time
pub type PriorityFn = Box<dyn FnMut() -> anyhow::Result<i32> + Send>;

/// Priority of a rule (lower values run first)
///
/// Exactly one mode is active. Replacing the variant switches modes, so the
/// last setter wins.
pub enum Priority {
    /// Stored value
    Fixed(i32),
    /// Recomputed on every read
    Dynamic(PriorityFn),
}

impl Priority {
    /// Wrap an infallible priority function
    pub fn dynamic<F>(mut f: F) -> Self
    where
        F: FnMut() -> i32 + Send + 'static,
    {
        Priority::Dynamic(Box::new(move || Ok(f())))
    }

    /// Wrap a priority function that may fail
    pub fn fallible<F>(f: F) -> Self
    where
        F: FnMut() -> anyhow::Result<i32> + Send + 'static,
    {
        Priority::Dynamic(Box::new(f))
    }

    /// Resolve the current value, invoking the function if one is set
    pub fn resolve(&mut self) -> anyhow::Result<i32> {
        match self {
            Priority::Fixed(value) => Ok(*value),
            Priority::Dynamic(f) => f(),
        }
    }

    /// Whether the priority is recomputed on every read
    pub fn is_dynamic(&self) -> bool {
        matches!(self, Priority::Dynamic(_))
    }
}

impl Default for Priority {
    fn default() -> Self {
        Priority::Fixed(0)
    }
}

impl fmt::Debug for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Priority::Fixed(value) => f.debug_tuple("Fixed").field(value).finish(),
            Priority::Dynamic(_) => f.write_str("Dynamic(..)"),
        }
    }
}
