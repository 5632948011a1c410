use std::time::Instant;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TimerKind {
    MetricsTick,
    ClearError,
}

/// A deadline bound to the session generation that armed it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Timer {
    pub kind: TimerKind,
    pub due: Instant,
    pub generation: u64,
}

/// Pending deadlines for the current session.
#[derive(Clone, Debug, Default)]
pub struct TimerSet {
    timers: Vec<Timer>,
}

impl TimerSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a deadline alongside any already pending of the same kind.
    pub fn arm(&mut self, kind: TimerKind, due: Instant, generation: u64) {
        self.timers.push(Timer {
            kind,
            due,
            generation,
        });
    }

    /// Replaces every pending deadline of `kind` with this one.
    pub fn rearm(&mut self, kind: TimerKind, due: Instant, generation: u64) {
        self.cancel(kind);
        self.arm(kind, due, generation);
    }

    pub fn cancel(&mut self, kind: TimerKind) {
        self.timers.retain(|t| t.kind != kind);
    }

    pub fn cancel_all(&mut self) {
        self.timers.clear();
    }

    pub fn is_armed(&self, kind: TimerKind) -> bool {
        self.timers.iter().any(|t| t.kind == kind)
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.timers.iter().map(|t| t.due).min()
    }

    /// Removes and returns every timer due at `now`, earliest first.
    pub fn take_due(&mut self, now: Instant) -> Vec<Timer> {
        let (mut due, pending): (Vec<Timer>, Vec<Timer>) =
            self.timers.drain(..).partition(|t| t.due <= now);
        self.timers = pending;
        due.sort_by_key(|t| t.due);
        due
    }
}
