use std::time::{Duration, Instant};

use rand::SeedableRng;
use rand::rngs::SmallRng;
use tracing::{debug, info, trace};

use crate::session::clock::MetricsClock;
use crate::session::input::{self, KeyOutcome, KeyPress};
use crate::session::phrase::PhraseSource;
use crate::session::state::SessionState;
use crate::session::timer::{TimerKind, TimerSet};

pub const ERROR_FLASH: Duration = Duration::from_millis(300);

#[derive(Clone, Copy, Debug, Default)]
pub struct ControllerOptions {
    /// Fixed seed for phrase selection; entropy when `None`.
    pub seed: Option<u64>,
}

/// Sole owner of the live session. Everything outside reads it through
/// [`SessionController::snapshot`] and changes it through the methods here.
pub struct SessionController {
    source: PhraseSource,
    rng: SmallRng,
    clock: MetricsClock,
    timers: TimerSet,
    state: SessionState,
    next_generation: u64,
}

impl SessionController {
    /// Starts with a fresh session that is not yet engaged.
    pub fn new(source: PhraseSource, options: ControllerOptions, now: Instant) -> Self {
        let mut rng = match options.seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_entropy(),
        };
        let state = SessionState::new(source.select_phrase(&mut rng), false, 0);
        let mut controller = Self {
            source,
            rng,
            clock: MetricsClock,
            timers: TimerSet::new(),
            state,
            next_generation: 1,
        };
        controller.arm_tick(now);
        info!(
            generation = 0,
            phrase_len = controller.state.phrase().len(),
            "session created"
        );
        controller
    }

    pub fn snapshot(&self) -> &SessionState {
        &self.state
    }

    pub fn source(&self) -> &PhraseSource {
        &self.source
    }

    /// Start or resume. Progress is kept.
    pub fn engage(&mut self) {
        if !self.state.engaged() {
            debug!(generation = self.state.generation(), "engaged");
        }
        self.state.set_engaged(true);
    }

    pub fn pause(&mut self) {
        if self.state.engaged() {
            debug!(generation = self.state.generation(), "paused");
        }
        self.state.set_engaged(false);
    }

    /// Replaces the session with a fresh one on a new random phrase. Used for
    /// both restart and next challenge.
    pub fn reset_or_advance(&mut self, now: Instant) {
        self.timers.cancel_all();
        let generation = self.next_generation;
        self.next_generation += 1;
        let phrase = self.source.select_phrase(&mut self.rng);
        self.state = SessionState::new(phrase, true, generation);
        self.arm_tick(now);
        info!(
            generation,
            phrase_len = self.state.phrase().len(),
            "session reset"
        );
    }

    pub fn handle_key(&mut self, key: KeyPress, now: Instant) -> KeyOutcome {
        let outcome = input::handle_key(&mut self.state, key, now);
        let generation = self.state.generation();
        match outcome {
            KeyOutcome::Rejected { expected, actual } => {
                self.timers
                    .arm(TimerKind::ClearError, now + ERROR_FLASH, generation);
                debug!(generation, ?expected, ?actual, "keystroke rejected");
            }
            KeyOutcome::Completed => {
                self.timers.cancel(TimerKind::MetricsTick);
                info!(
                    generation,
                    wpm = self.state.wpm(),
                    mistakes = self.state.mistakes(),
                    elapsed_ms = self.state.elapsed(now).as_millis() as u64,
                    "session completed"
                );
            }
            KeyOutcome::Accepted => trace!(generation, "keystroke accepted"),
            KeyOutcome::Ignored(reason) => trace!(generation, ?reason, "keystroke ignored"),
        }
        outcome
    }

    /// Fires every timer due at `now`. Timers armed for an earlier session are
    /// dropped without touching the current one.
    pub fn poll(&mut self, now: Instant) {
        for timer in self.timers.take_due(now) {
            if timer.generation != self.state.generation() {
                debug!(
                    timer_generation = timer.generation,
                    generation = self.state.generation(),
                    kind = ?timer.kind,
                    "stale timer dropped"
                );
                continue;
            }
            match timer.kind {
                TimerKind::ClearError => self.state.clear_error(),
                TimerKind::MetricsTick => {
                    self.clock.tick(&mut self.state, now);
                    if self.clock.is_active(&self.state) {
                        let mut next = timer.due + self.clock.interval();
                        if next <= now {
                            next = now + self.clock.interval();
                        }
                        self.timers
                            .rearm(TimerKind::MetricsTick, next, timer.generation);
                    }
                }
            }
        }
    }

    /// Earliest pending deadline, for sizing the event loop's wait.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.timers.next_deadline()
    }

    pub fn has_pending(&self, kind: TimerKind) -> bool {
        self.timers.is_armed(kind)
    }

    /// Disarms every timer. The session itself is left as is.
    pub fn teardown(&mut self) {
        self.timers.cancel_all();
        debug!(generation = self.state.generation(), "session torn down");
    }

    fn arm_tick(&mut self, now: Instant) {
        self.timers.rearm(
            TimerKind::MetricsTick,
            now + self.clock.interval(),
            self.state.generation(),
        );
    }
}
