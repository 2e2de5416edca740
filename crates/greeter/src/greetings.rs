//! Greeting Rules

use chrono::{Datelike, Local, NaiveDateTime, Timelike, Weekday};
use rule_engine::RuleEngine;
use std::sync::{Arc, Mutex, PoisonError};
use tracing::info;

/// Source of the current local time
pub type Clock = Arc<dyn Fn() -> NaiveDateTime + Send + Sync>;

/// Clock reading the system's local time
pub fn system_clock() -> Clock {
    Arc::new(|| Local::now().naive_local())
}

/// Clock frozen at `at`
pub fn fixed_clock(at: NaiveDateTime) -> Clock {
    Arc::new(move || at)
}

/// Greeting lines produced during a pass, shared with the rule actions
#[derive(Debug, Clone, Default)]
pub struct Transcript {
    lines: Arc<Mutex<Vec<String>>>,
}

impl Transcript {
    /// Create an empty transcript
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a line
    pub fn say(&self, line: &str) {
        info!(greeting = line, "Greeting emitted");
        self.lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(line.to_string());
    }

    /// Copy of the lines so far
    pub fn lines(&self) -> Vec<String> {
        self.lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

fn hour(clock: &Clock) -> u32 {
    clock().hour()
}

/// Register the morning, afternoon, evening and Monday-morning rules
pub fn register_greetings(engine: &mut RuleEngine, clock: Clock, transcript: &Transcript) {
    let (now, out) = (clock.clone(), transcript.clone());
    engine.add_rule(|b| {
        b.named("morning")
            .when(move || hour(&now) < 12)
            .then(move || out.say("Good Morning!"))
            .with_priority(1)
    });

    let (now, ranked, out) = (clock.clone(), clock.clone(), transcript.clone());
    engine.add_rule(|b| {
        b.named("afternoon")
            .when(move || (12..18).contains(&hour(&now)))
            .then(move || out.say("Good Afternoon!"))
            .with_dynamic_priority(move || hour(&ranked) as i32)
    });

    let (now, ranked, out) = (clock.clone(), clock.clone(), transcript.clone());
    engine.add_rule(|b| {
        b.named("evening")
            .when(move || (18..24).contains(&hour(&now)))
            .then(move || out.say("Good Evening!"))
            .with_dynamic_priority(move || hour(&ranked) as i32)
    });

    let (today, now, out) = (clock.clone(), clock, transcript.clone());
    engine.add_rule(|b| {
        b.named("monday-morning")
            .when(move || today().weekday() == Weekday::Mon)
            .and(move || hour(&now) < 12)
            .then(move || out.say("It's Monday morning!"))
            .with_priority(2)
    });
}
