use std::time::{Duration, Instant};

use crate::session::phrase::Phrase;

/// Live state of one typing session.
///
/// Fields are private: outside the `session` module this is a read-only view.
/// All writes go through the input processor, the metrics clock or the
/// controller.
#[derive(Clone, Debug)]
pub struct SessionState {
    phrase: Phrase,
    typed: Vec<char>,
    started_at: Option<Instant>,
    finished_at: Option<Instant>,
    wpm: u32,
    engaged: bool,
    completed: bool,
    error_signal: bool,
    mistakes: usize,
    generation: u64,
}

impl SessionState {
    pub fn new(phrase: Phrase, engaged: bool, generation: u64) -> Self {
        Self {
            phrase,
            typed: Vec::new(),
            started_at: None,
            finished_at: None,
            wpm: 0,
            engaged,
            completed: false,
            error_signal: false,
            mistakes: 0,
            generation,
        }
    }

    pub fn phrase(&self) -> &Phrase {
        &self.phrase
    }

    pub fn typed(&self) -> &[char] {
        &self.typed
    }

    pub fn typed_len(&self) -> usize {
        self.typed.len()
    }

    pub fn typed_string(&self) -> String {
        self.typed.iter().collect()
    }

    pub fn started_at(&self) -> Option<Instant> {
        self.started_at
    }

    pub fn finished_at(&self) -> Option<Instant> {
        self.finished_at
    }

    pub fn wpm(&self) -> u32 {
        self.wpm
    }

    pub fn engaged(&self) -> bool {
        self.engaged
    }

    pub fn completed(&self) -> bool {
        self.completed
    }

    pub fn error_signal(&self) -> bool {
        self.error_signal
    }

    pub fn mistakes(&self) -> usize {
        self.mistakes
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Next character the user has to type, if any.
    pub fn expected(&self) -> Option<char> {
        self.phrase.char_at(self.typed.len())
    }

    pub fn has_started(&self) -> bool {
        self.started_at.is_some()
    }

    /// Fraction of the phrase typed, in [0, 1].
    pub fn progress(&self) -> f64 {
        if self.phrase.is_empty() {
            return 0.0;
        }
        self.typed.len() as f64 / self.phrase.len() as f64
    }

    /// Time since the first keystroke, frozen at completion.
    pub fn elapsed(&self, now: Instant) -> Duration {
        match (self.started_at, self.finished_at) {
            (Some(start), Some(end)) => end.saturating_duration_since(start),
            (Some(start), None) => now.saturating_duration_since(start),
            _ => Duration::ZERO,
        }
    }

    pub(super) fn set_engaged(&mut self, engaged: bool) {
        self.engaged = engaged;
    }

    pub(super) fn mark_started(&mut self, now: Instant) {
        if self.started_at.is_none() && self.typed.is_empty() {
            self.started_at = Some(now);
        }
    }

    /// Appends `ch` if it is the expected char. Completion is decided in the
    /// same step so no caller can observe a full `typed` with `completed`
    /// still false.
    pub(super) fn push_correct(&mut self, ch: char, now: Instant) -> bool {
        if self.completed || self.expected() != Some(ch) {
            return false;
        }
        self.typed.push(ch);
        if self.typed.len() == self.phrase.len() {
            self.completed = true;
            self.finished_at = Some(now);
        }
        true
    }

    pub(super) fn raise_error(&mut self) {
        self.error_signal = true;
        self.mistakes += 1;
    }

    pub(super) fn clear_error(&mut self) {
        self.error_signal = false;
    }

    pub(super) fn set_wpm(&mut self, wpm: u32) {
        self.wpm = wpm;
    }
}
