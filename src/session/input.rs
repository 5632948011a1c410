use std::time::Instant;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::session::state::SessionState;

/// Key identifier as seen by the core.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Key {
    Char(char),
    /// Backspace / Delete. Never performed.
    Delete,
    /// Modifiers, navigation, function keys and everything else.
    Other,
}

/// One key-press signal forwarded by the presentation layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct KeyPress {
    pub key: Key,
    /// Set for the space key so a host with a default scroll action can suppress it.
    pub is_space: bool,
}

impl KeyPress {
    pub fn char(ch: char) -> Self {
        Self {
            key: Key::Char(ch),
            is_space: ch == ' ',
        }
    }

    pub fn delete() -> Self {
        Self {
            key: Key::Delete,
            is_space: false,
        }
    }

    pub fn other() -> Self {
        Self {
            key: Key::Other,
            is_space: false,
        }
    }

    pub fn from_key_event(key: &KeyEvent) -> Self {
        match key.code {
            KeyCode::Backspace | KeyCode::Delete => Self::delete(),
            KeyCode::Char(_)
                if key
                    .modifiers
                    .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
            {
                Self::other()
            }
            KeyCode::Char(ch) => Self::char(ch),
            _ => Self::other(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IgnoreReason {
    NotEngaged,
    Completed,
    CorrectionDisabled,
    NotTyping,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyOutcome {
    Ignored(IgnoreReason),
    Accepted,
    Completed,
    Rejected { expected: char, actual: char },
}

/// Applies one key press to `state` under the hard-mode rules.
///
/// Never fails: anything that is not a valid next character is either
/// ignored or reported as a rejection.
pub fn handle_key(state: &mut SessionState, key: KeyPress, now: Instant) -> KeyOutcome {
    if !state.engaged() {
        return KeyOutcome::Ignored(IgnoreReason::NotEngaged);
    }
    if state.completed() {
        return KeyOutcome::Ignored(IgnoreReason::Completed);
    }

    let ch = match key.key {
        Key::Delete => return KeyOutcome::Ignored(IgnoreReason::CorrectionDisabled),
        Key::Other => return KeyOutcome::Ignored(IgnoreReason::NotTyping),
        Key::Char(ch) => ch,
    };

    // The clock starts on the first attempt, right or wrong.
    if state.typed_len() == 0 && !state.has_started() {
        state.mark_started(now);
    }

    let Some(expected) = state.expected() else {
        return KeyOutcome::Ignored(IgnoreReason::Completed);
    };

    if state.push_correct(ch, now) {
        if state.completed() {
            KeyOutcome::Completed
        } else {
            KeyOutcome::Accepted
        }
    } else {
        state.raise_error();
        KeyOutcome::Rejected {
            expected,
            actual: ch,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use crossterm::event::{KeyEventKind, KeyEventState};

    use super::*;
    use crate::session::phrase::Phrase;

    fn engaged(text: &str) -> SessionState {
        SessionState::new(Phrase::new(text), true, 0)
    }

    fn type_str(state: &mut SessionState, text: &str, now: Instant) {
        for ch in text.chars() {
            handle_key(state, KeyPress::char(ch), now);
        }
    }

    #[test]
    fn test_correct_sequence_completes() {
        let t0 = Instant::now();
        let mut state = engaged("abc");

        assert_eq!(handle_key(&mut state, KeyPress::char('a'), t0), KeyOutcome::Accepted);
        assert_eq!(state.started_at(), Some(t0));
        assert_eq!(state.typed_string(), "a");

        let t1 = t0 + Duration::from_millis(200);
        assert_eq!(handle_key(&mut state, KeyPress::char('b'), t1), KeyOutcome::Accepted);
        assert_eq!(handle_key(&mut state, KeyPress::char('c'), t1), KeyOutcome::Completed);
        assert!(state.completed());
        assert_eq!(state.typed_string(), "abc");
        assert_eq!(state.started_at(), Some(t0));
    }

    #[test]
    fn test_mismatch_keeps_typed_and_raises_signal() {
        let t0 = Instant::now();
        let mut state = engaged("abc");
        handle_key(&mut state, KeyPress::char('a'), t0);

        let outcome = handle_key(&mut state, KeyPress::char('x'), t0);
        assert_eq!(
            outcome,
            KeyOutcome::Rejected {
                expected: 'b',
                actual: 'x'
            }
        );
        assert_eq!(state.typed_string(), "a");
        assert!(state.error_signal());
        assert!(!state.completed());
        assert_eq!(state.mistakes(), 1);
    }

    #[test]
    fn test_not_engaged_ignores_everything() {
        let mut state = SessionState::new(Phrase::new("ab"), false, 0);
        let outcome = handle_key(&mut state, KeyPress::char('a'), Instant::now());
        assert_eq!(outcome, KeyOutcome::Ignored(IgnoreReason::NotEngaged));
        assert_eq!(state.typed_len(), 0);
        assert!(state.started_at().is_none());
    }

    #[test]
    fn test_delete_never_retracts() {
        let t0 = Instant::now();
        let mut state = engaged("ab");
        handle_key(&mut state, KeyPress::char('a'), t0);

        let outcome = handle_key(&mut state, KeyPress::delete(), t0);
        assert_eq!(outcome, KeyOutcome::Ignored(IgnoreReason::CorrectionDisabled));
        assert_eq!(state.typed_string(), "a");
        assert!(!state.error_signal());
    }

    #[test]
    fn test_delete_on_empty_does_not_start_clock() {
        let mut state = engaged("ab");
        handle_key(&mut state, KeyPress::delete(), Instant::now());
        assert!(state.started_at().is_none());
    }

    #[test]
    fn test_first_wrong_attempt_starts_clock() {
        let t0 = Instant::now();
        let mut state = engaged("ab");
        handle_key(&mut state, KeyPress::char('z'), t0);
        assert_eq!(state.started_at(), Some(t0));
        assert_eq!(state.typed_len(), 0);

        // A later correct first char must not move the anchor.
        handle_key(&mut state, KeyPress::char('a'), t0 + Duration::from_secs(1));
        assert_eq!(state.started_at(), Some(t0));
    }

    #[test]
    fn test_nothing_changes_after_completion() {
        let t0 = Instant::now();
        let mut state = engaged("hi");
        type_str(&mut state, "hi", t0);
        assert!(state.completed());

        let outcome = handle_key(&mut state, KeyPress::char('x'), t0 + Duration::from_secs(1));
        assert_eq!(outcome, KeyOutcome::Ignored(IgnoreReason::Completed));
        assert_eq!(state.typed_string(), "hi");
        assert_eq!(state.started_at(), Some(t0));
        assert!(!state.error_signal());
    }

    #[test]
    fn test_non_char_keys_ignored() {
        let mut state = engaged("ab");
        let outcome = handle_key(&mut state, KeyPress::other(), Instant::now());
        assert_eq!(outcome, KeyOutcome::Ignored(IgnoreReason::NotTyping));
        assert!(state.started_at().is_none());
    }

    #[test]
    fn test_typed_stays_prefix_under_noise() {
        let t0 = Instant::now();
        let mut state = engaged("a b.c");
        for ch in "xa?  zb..cq".chars() {
            handle_key(&mut state, KeyPress::char(ch), t0);
            let phrase = state.phrase().chars();
            assert!(state.typed().iter().zip(phrase).all(|(t, p)| t == p));
            assert_eq!(state.completed(), state.typed_len() == phrase.len());
        }
        assert!(state.completed());
    }

    #[test]
    fn test_space_flag_from_char() {
        assert!(KeyPress::char(' ').is_space);
        assert!(!KeyPress::char('a').is_space);
    }

    fn key_event(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent {
            code,
            modifiers,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        }
    }

    #[test]
    fn test_from_key_event_mapping() {
        let shifted = key_event(KeyCode::Char('A'), KeyModifiers::SHIFT);
        assert_eq!(KeyPress::from_key_event(&shifted), KeyPress::char('A'));

        let ctrl = key_event(KeyCode::Char('r'), KeyModifiers::CONTROL);
        assert_eq!(KeyPress::from_key_event(&ctrl).key, Key::Other);

        let bs = key_event(KeyCode::Backspace, KeyModifiers::NONE);
        assert_eq!(KeyPress::from_key_event(&bs).key, Key::Delete);

        let del = key_event(KeyCode::Delete, KeyModifiers::NONE);
        assert_eq!(KeyPress::from_key_event(&del).key, Key::Delete);

        let left = key_event(KeyCode::Left, KeyModifiers::NONE);
        assert_eq!(KeyPress::from_key_event(&left).key, Key::Other);

        let space = key_event(KeyCode::Char(' '), KeyModifiers::NONE);
        assert!(KeyPress::from_key_event(&space).is_space);
    }
}
