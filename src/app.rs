use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::config::Config;
use crate::session::controller::SessionController;
use crate::session::input::{KeyOutcome, KeyPress};
use crate::session::phrase::PhraseSource;
use crate::session::state::SessionState;
use crate::ui::theme::Theme;

/// Upper bound between redraws so the elapsed timer keeps moving.
pub const FRAME_INTERVAL: Duration = Duration::from_millis(100);

/// What a terminal key means to the app before it reaches the core.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    Quit,
    Engage,
    Pause,
    ResetOrAdvance,
    Type(KeyPress),
    None,
}

pub struct App {
    pub config: Config,
    pub theme: Theme,
    pub should_quit: bool,
    controller: SessionController,
}

impl App {
    pub fn new(config: Config, theme: Theme, source: PhraseSource, seed: Option<u64>, now: Instant) -> Self {
        let options = config.controller_options(seed);
        Self {
            controller: SessionController::new(source, options, now),
            config,
            theme,
            should_quit: false,
        }
    }

    pub fn session(&self) -> &SessionState {
        self.controller.snapshot()
    }

    pub fn action_for(&self, key: &KeyEvent) -> Action {
        // Only Press events count; Repeat would inflate input
        if key.kind != KeyEventKind::Press {
            return Action::None;
        }

        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Char('c') | KeyCode::Char('q') if ctrl => Action::Quit,
            KeyCode::Char('r') if ctrl => Action::ResetOrAdvance,
            KeyCode::Tab => Action::ResetOrAdvance,
            KeyCode::Esc => Action::Pause,
            KeyCode::Enter => {
                let session = self.session();
                if !session.engaged() {
                    Action::Engage
                } else if session.completed() {
                    Action::ResetOrAdvance
                } else {
                    Action::Type(KeyPress::from_key_event(key))
                }
            }
            _ => Action::Type(KeyPress::from_key_event(key)),
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent, now: Instant) -> Option<KeyOutcome> {
        match self.action_for(&key) {
            Action::Quit => {
                self.should_quit = true;
                None
            }
            Action::Engage => {
                self.controller.engage();
                None
            }
            Action::Pause => {
                self.controller.pause();
                None
            }
            Action::ResetOrAdvance => {
                self.controller.reset_or_advance(now);
                None
            }
            Action::Type(press) => Some(self.controller.handle_key(press, now)),
            Action::None => None,
        }
    }

    pub fn on_click(&mut self) {
        self.controller.engage();
    }

    pub fn on_tick(&mut self, now: Instant) {
        self.controller.poll(now);
    }

    /// How long the event loop may block before a timer or a redraw is due.
    pub fn wait_timeout(&self, now: Instant) -> Duration {
        match self.controller.next_deadline() {
            Some(deadline) => deadline.saturating_duration_since(now).min(FRAME_INTERVAL),
            None => FRAME_INTERVAL,
        }
    }

    pub fn shutdown(&mut self) {
        self.controller.teardown();
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::KeyEventState;

    use super::*;
    use crate::session::input::IgnoreReason;

    fn press(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent {
            code,
            modifiers,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        }
    }

    fn ch(c: char) -> KeyEvent {
        press(KeyCode::Char(c), KeyModifiers::NONE)
    }

    fn app(phrases: &[&str], now: Instant) -> App {
        App::new(
            Config::default(),
            Theme::default(),
            PhraseSource::new(phrases).unwrap(),
            Some(1),
            now,
        )
    }

    #[test]
    fn test_enter_engages_then_typing_counts() {
        let t0 = Instant::now();
        let mut app = app(&["ab"], t0);
        assert_eq!(
            app.handle_key(ch('a'), t0),
            Some(KeyOutcome::Ignored(IgnoreReason::NotEngaged))
        );
        app.handle_key(press(KeyCode::Enter, KeyModifiers::NONE), t0);
        assert!(app.session().engaged());
        assert_eq!(app.handle_key(ch('a'), t0), Some(KeyOutcome::Accepted));
    }

    #[test]
    fn test_backspace_is_forwarded_and_refused() {
        let t0 = Instant::now();
        let mut app = app(&["ab"], t0);
        app.on_click();
        app.handle_key(ch('a'), t0);
        let outcome = app.handle_key(press(KeyCode::Backspace, KeyModifiers::NONE), t0);
        assert_eq!(
            outcome,
            Some(KeyOutcome::Ignored(IgnoreReason::CorrectionDisabled))
        );
        assert_eq!(app.session().typed_string(), "a");
    }

    #[test]
    fn test_esc_pauses_and_tab_resets() {
        let t0 = Instant::now();
        let mut app = app(&["abc"], t0);
        app.on_click();
        app.handle_key(ch('a'), t0);
        app.handle_key(press(KeyCode::Esc, KeyModifiers::NONE), t0);
        assert!(!app.session().engaged());
        assert_eq!(app.session().typed_len(), 1);

        app.handle_key(press(KeyCode::Tab, KeyModifiers::NONE), t0);
        assert!(app.session().engaged());
        assert_eq!(app.session().typed_len(), 0);
    }

    #[test]
    fn test_enter_after_completion_advances() {
        let t0 = Instant::now();
        let mut app = app(&["a"], t0);
        app.on_click();
        assert_eq!(app.handle_key(ch('a'), t0), Some(KeyOutcome::Completed));
        let generation = app.session().generation();
        app.handle_key(press(KeyCode::Enter, KeyModifiers::NONE), t0);
        assert_eq!(app.session().generation(), generation + 1);
        assert!(!app.session().completed());
    }

    #[test]
    fn test_ctrl_c_quits_and_ctrl_r_resets() {
        let t0 = Instant::now();
        let mut app = app(&["ab"], t0);
        app.handle_key(press(KeyCode::Char('r'), KeyModifiers::CONTROL), t0);
        assert_eq!(app.session().generation(), 1);
        assert!(!app.should_quit);
        app.handle_key(press(KeyCode::Char('c'), KeyModifiers::CONTROL), t0);
        assert!(app.should_quit);
    }

    #[test]
    fn test_release_events_ignored() {
        let t0 = Instant::now();
        let mut app = app(&["ab"], t0);
        app.on_click();
        let mut release = ch('a');
        release.kind = KeyEventKind::Release;
        assert_eq!(app.handle_key(release, t0), None);
        assert_eq!(app.session().typed_len(), 0);
    }

    #[test]
    fn test_wait_timeout_tracks_error_deadline() {
        let t0 = Instant::now();
        let mut app = app(&["ab"], t0);
        assert_eq!(app.wait_timeout(t0), FRAME_INTERVAL);
        app.on_click();
        app.handle_key(ch('x'), t0);
        assert_eq!(
            app.wait_timeout(t0 + Duration::from_millis(250)),
            Duration::from_millis(50)
        );
        app.on_tick(t0 + Duration::from_millis(300));
        assert!(!app.session().error_signal());
    }
}
