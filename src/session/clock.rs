use std::time::{Duration, Instant};

use crate::session::state::SessionState;

pub const CHARS_PER_WORD: f64 = 5.0;
pub const TICK: Duration = Duration::from_millis(500);

/// Words per minute for `typed_len` correct chars over `elapsed`.
///
/// Zero elapsed time or a non-finite result yields 0.
pub fn compute_wpm(typed_len: usize, elapsed: Duration) -> u32 {
    let minutes = elapsed.as_secs_f64() / 60.0;
    if minutes <= 0.0 {
        return 0;
    }
    let wpm = ((typed_len as f64 / CHARS_PER_WORD) / minutes).round();
    if wpm.is_finite() && wpm >= 0.0 {
        wpm as u32
    } else {
        0
    }
}

/// Periodic speed recomputation, every [`TICK`].
#[derive(Clone, Copy, Debug, Default)]
pub struct MetricsClock;

impl MetricsClock {
    pub fn interval(&self) -> Duration {
        TICK
    }

    /// Whether the tick should keep running for this session.
    pub fn is_active(&self, state: &SessionState) -> bool {
        !state.completed()
    }

    /// One tick. Leaves `wpm` untouched before the first keystroke and after
    /// completion.
    pub fn tick(&self, state: &mut SessionState, now: Instant) {
        let Some(start) = state.started_at() else {
            return;
        };
        if state.completed() {
            return;
        }
        let wpm = compute_wpm(state.typed_len(), now.saturating_duration_since(start));
        state.set_wpm(wpm);
    }
}
