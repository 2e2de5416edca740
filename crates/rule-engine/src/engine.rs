//! Rule Engine Implementation

use crate::builder::RuleBuilder;
use crate::error::RuleError;
use crate::rule::Rule;
use tracing::{debug, trace, warn};

/// Registry of rules evaluated in ascending priority order
///
/// The engine holds no state between passes: every call to
/// [`RuleEngine::execute`] resolves priorities and checks conditions again.
/// It does no internal locking. Callers sharing one engine across threads
/// wrap it in a `Mutex`.
#[derive(Debug, Default)]
pub struct RuleEngine {
    /// Rules in registration order
    rules: Vec<Rule>,
}

impl RuleEngine {
    /// Create an engine with no rules
    pub fn new() -> Self {
        Self::default()
    }

    /// Configure a fresh builder with `configure` and register the result
    pub fn add_rule<F>(&mut self, configure: F) -> &mut Self
    where
        F: FnOnce(RuleBuilder) -> RuleBuilder,
    {
        let rule = configure(RuleBuilder::new()).build();
        self.push_rule(rule)
    }

    /// Register an already built rule
    pub fn push_rule(&mut self, rule: Rule) -> &mut Self {
        debug!(
            index = self.rules.len(),
            name = rule.name().unwrap_or("-"),
            conditions = rule.condition_count(),
            actions = rule.action_count(),
            dynamic_priority = rule.priority().is_dynamic(),
            "Rule registered"
        );
        self.rules.push(rule);
        self
    }

    /// Number of registered rules
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Whether no rules are registered
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Run one evaluation pass.
    ///
    /// Each rule's priority is resolved exactly once, rules are visited in
    /// ascending priority (ties keep registration order), and the actions of
    /// every rule whose conditions all hold run in insertion order. The first
    /// failing callable aborts the pass; actions already run are not undone.
    pub fn execute(&mut self) -> Result<(), RuleError> {
        let mut order = Vec::with_capacity(self.rules.len());
        for (index, rule) in self.rules.iter_mut().enumerate() {
            let priority = rule.current_priority().map_err(|source| {
                warn!(rule = index, error = %source, "Priority function failed");
                RuleError::Priority { rule: index, source }
            })?;
            order.push((priority, index));
        }

        // sort_by_key is stable, equal priorities keep registration order
        order.sort_by_key(|&(priority, _)| priority);

        let mut fired = 0;
        for (priority, index) in order {
            let rule = &mut self.rules[index];
            let matched = rule.conditions_hold().map_err(|(position, source)| {
                warn!(
                    rule = index,
                    name = rule.name().unwrap_or("-"),
                    position,
                    error = %source,
                    "Condition failed"
                );
                RuleError::Condition {
                    rule: index,
                    position,
                    source,
                }
            })?;

            if !matched {
                trace!(
                    rule = index,
                    name = rule.name().unwrap_or("-"),
                    priority,
                    "Conditions not met, skipping"
                );
                continue;
            }

            debug!(rule = index, name = rule.name().unwrap_or("-"), priority, "Firing rule");
            rule.run_actions().map_err(|(position, source)| {
                warn!(
                    rule = index,
                    name = rule.name().unwrap_or("-"),
                    position,
                    error = %source,
                    "Action failed"
                );
                RuleError::Action {
                    rule: index,
                    position,
                    source,
                }
            })?;
            fired += 1;
        }

        debug!("Rule pass complete: {} rules, {} fired", self.rules.len(), fired);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::sync::atomic::{AtomicI32, AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    type Log = Arc<Mutex<Vec<String>>>;

    fn record(log: &Log, entry: &str) -> impl FnMut() + Send + 'static {
        let log = log.clone();
        let entry = entry.to_string();
        move || log.lock().unwrap().push(entry.clone())
    }

    fn entries(log: &Log) -> Vec<String> {
        log.lock().unwrap().clone()
    }

    #[test]
    fn test_end_to_end_ordering() {
        let log = Log::default();
        let mut engine = RuleEngine::new();
        engine
            .add_rule(|b| b.with_priority(2).when(|| true).then(record(&log, "X")))
            .add_rule(|b| b.with_priority(1).when(|| true).then(record(&log, "Y")));

        engine.execute().unwrap();
        assert_eq!(entries(&log), vec!["Y", "X"]);
    }

    #[test]
    fn test_lower_priority_finishes_first() {
        let log = Log::default();
        let mut engine = RuleEngine::new();
        engine
            .add_rule(|b| b.with_priority(10).then(record(&log, "late")))
            .add_rule(|b| {
                b.with_priority(-3)
                    .then(record(&log, "early-1"))
                    .then(record(&log, "early-2"))
            });

        engine.execute().unwrap();
        assert_eq!(entries(&log), vec!["early-1", "early-2", "late"]);
    }

    #[test]
    fn test_ties_keep_registration_order() {
        let log = Log::default();
        let mut engine = RuleEngine::new();
        engine
            .add_rule(|b| b.with_priority(1).when(|| true).then(record(&log, "A")))
            .add_rule(|b| b.with_priority(0).then(record(&log, "first")))
            .add_rule(|b| b.with_priority(1).when(|| true).then(record(&log, "B")))
            .add_rule(|b| b.with_dynamic_priority(|| 1).then(record(&log, "C")));

        engine.execute().unwrap();
        assert_eq!(entries(&log), vec!["first", "A", "B", "C"]);
    }

    #[test]
    fn test_false_condition_short_circuits() {
        let log = Log::default();
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let mut engine = RuleEngine::new();
        engine.add_rule(|b| {
            b.when(|| false)
                .and(move || {
                    counter.fetch_add(1, Ordering::SeqCst);
                    true
                })
                .then(record(&log, "never"))
        });

        engine.execute().unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert!(entries(&log).is_empty());
    }

    #[test]
    fn test_skipped_rule_does_not_stop_pass() {
        let log = Log::default();
        let mut engine = RuleEngine::new();
        engine
            .add_rule(|b| b.with_priority(1).when(|| false).then(record(&log, "skipped")))
            .add_rule(|b| b.with_priority(2).when(|| true).then(record(&log, "ran")));

        engine.execute().unwrap();
        assert_eq!(entries(&log), vec!["ran"]);
    }

    #[test]
    fn test_dynamic_priority_resolved_once_per_pass() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let mut engine = RuleEngine::new();
        engine.add_rule(|b| {
            b.with_dynamic_priority(move || counter.fetch_add(1, Ordering::SeqCst) as i32)
                .when(|| true)
        });

        engine.execute().unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        engine.execute().unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_dynamic_priority_reorders_between_passes() {
        let log = Log::default();
        let level = Arc::new(AtomicI32::new(5));
        let current = level.clone();
        let mut engine = RuleEngine::new();
        engine
            .add_rule(|b| b.with_priority(3).then(record(&log, "fixed")))
            .add_rule(|b| {
                b.with_dynamic_priority(move || current.load(Ordering::SeqCst))
                    .then(record(&log, "dynamic"))
            });

        engine.execute().unwrap();
        assert_eq!(entries(&log), vec!["fixed", "dynamic"]);

        log.lock().unwrap().clear();
        level.store(1, Ordering::SeqCst);
        engine.execute().unwrap();
        assert_eq!(entries(&log), vec!["dynamic", "fixed"]);
    }

    #[test]
    fn test_rule_without_conditions_always_fires() {
        let log = Log::default();
        let mut engine = RuleEngine::new();
        engine.add_rule(|b| b.then(record(&log, "always")));

        engine.execute().unwrap();
        engine.execute().unwrap();
        assert_eq!(entries(&log), vec!["always", "always"]);
    }

    #[test]
    fn test_empty_rule_and_empty_engine() {
        let mut engine = RuleEngine::new();
        assert!(engine.is_empty());
        engine.execute().unwrap();

        engine.add_rule(|b| b);
        assert_eq!(engine.len(), 1);
        engine.execute().unwrap();
    }

    #[test]
    fn test_actions_run_in_insertion_order() {
        let log = Log::default();
        let mut engine = RuleEngine::new();
        engine.add_rule(|b| {
            b.then(record(&log, "a"))
                .then(record(&log, "b"))
                .then(record(&log, "c"))
        });

        engine.execute().unwrap();
        assert_eq!(entries(&log), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_failing_action_aborts_pass() {
        let log = Log::default();
        let mut engine = RuleEngine::new();
        engine
            .add_rule(|b| b.with_priority(1).then(record(&log, "first")))
            .add_rule(|b| {
                b.with_priority(2)
                    .then(record(&log, "second"))
                    .try_then(|| anyhow::bail!("mailbox unavailable"))
            })
            .add_rule(|b| b.with_priority(3).then(record(&log, "third")));

        let err = engine.execute().unwrap_err();
        assert!(matches!(err, RuleError::Action { rule: 1, position: 1, .. }));
        assert_eq!(entries(&log), vec!["first", "second"]);
    }

    #[test]
    fn test_failing_condition_aborts_pass() {
        let log = Log::default();
        let mut engine = RuleEngine::new();
        engine
            .add_rule(|b| b.try_when(|| anyhow::bail!("lookup failed")).then(record(&log, "x")))
            .add_rule(|b| b.with_priority(1).then(record(&log, "y")));

        let err = engine.execute().unwrap_err();
        assert!(matches!(err, RuleError::Condition { rule: 0, position: 0, .. }));
        assert!(entries(&log).is_empty());
    }

    #[test]
    fn test_failing_priority_runs_nothing() {
        let log = Log::default();
        let mut engine = RuleEngine::new();
        engine
            .add_rule(|b| b.then(record(&log, "x")))
            .add_rule(|b| b.try_with_dynamic_priority(|| anyhow::bail!("no clock")));

        let err = engine.execute().unwrap_err();
        assert_eq!(err.rule(), 1);
        assert!(matches!(err, RuleError::Priority { .. }));
        assert!(entries(&log).is_empty());
    }

    #[test]
    fn test_named_rules_fire_and_report_failures() {
        let log = Log::default();
        let mut engine = RuleEngine::new();
        engine
            .add_rule(|b| b.named("skip").when(|| false).then(record(&log, "skip")))
            .add_rule(|b| b.named("ok").with_priority(1).then(record(&log, "ok")))
            .add_rule(|b| {
                b.named("broken")
                    .with_priority(2)
                    .try_then(|| anyhow::bail!("quota exceeded"))
            });

        let err = engine.execute().unwrap_err();
        assert!(matches!(err, RuleError::Action { rule: 2, position: 0, .. }));
        assert_eq!(entries(&log), vec!["ok"]);
    }

    #[test]
    fn test_push_prebuilt_rule() {
        let log = Log::default();
        let mut engine = RuleEngine::new();
        let rule = RuleBuilder::new()
            .named("prebuilt")
            .then(record(&log, "prebuilt"))
            .build();
        engine.push_rule(rule).add_rule(|b| b.with_priority(-1).then(record(&log, "built")));

        engine.execute().unwrap();
        assert_eq!(entries(&log), vec!["built", "prebuilt"]);
    }

    #[test]
    fn test_engine_behind_mutex_across_threads() {
        let log = Log::default();
        let engine = Arc::new(Mutex::new(RuleEngine::new()));

        let handles: Vec<_> = (0..4)
            .map(|i| {
                let engine = engine.clone();
                let action = record(&log, &format!("rule-{i}"));
                std::thread::spawn(move || {
                    engine.lock().unwrap().add_rule(|b| b.then(action));
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        engine.lock().unwrap().execute().unwrap();
        assert_eq!(entries(&log).len(), 4);
    }

    proptest! {
        #[test]
        fn prop_visits_in_stable_ascending_order(priorities in prop::collection::vec(-5i32..5, 0..40)) {
            let log = Arc::new(Mutex::new(Vec::new()));
            let mut engine = RuleEngine::new();
            for (index, &priority) in priorities.iter().enumerate() {
                let log = log.clone();
                engine.add_rule(|b| b.with_priority(priority).then(move || log.lock().unwrap().push(index)));
            }

            engine.execute().unwrap();

            let mut expected: Vec<usize> = (0..priorities.len()).collect();
            expected.sort_by_key(|&i| priorities[i]);
            prop_assert_eq!(log.lock().unwrap().clone(), expected);
        }
    }
}
