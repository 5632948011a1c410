use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread;
use std::time::Duration;

use crossterm::event::{self, Event, KeyEvent, MouseButton, MouseEventKind};

pub enum AppEvent {
    Key(KeyEvent),
    /// Left click anywhere in the terminal.
    Click,
    /// Nothing arrived before the requested timeout.
    Tick,
    Resize(#[allow(dead_code)] u16, #[allow(dead_code)] u16),
}

/// Forwards terminal input from a reader thread. State is only ever touched
/// by whoever drains [`EventHandler::next`].
pub struct EventHandler {
    rx: mpsc::Receiver<AppEvent>,
}

impl EventHandler {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();

        thread::spawn(move || {
            loop {
                let ev = match event::read() {
                    Ok(Event::Key(key)) => AppEvent::Key(key),
                    Ok(Event::Mouse(mouse))
                        if matches!(mouse.kind, MouseEventKind::Down(MouseButton::Left)) =>
                    {
                        AppEvent::Click
                    }
                    Ok(Event::Resize(w, h)) => AppEvent::Resize(w, h),
                    Ok(_) => continue,
                    Err(_) => return,
                };
                if tx.send(ev).is_err() {
                    return;
                }
            }
        });

        Self { rx }
    }

    #[cfg(test)]
    pub fn from_receiver(rx: mpsc::Receiver<AppEvent>) -> Self {
        Self { rx }
    }

    /// Waits up to `timeout` for input; `Tick` when nothing arrived.
    pub fn next(&self, timeout: Duration) -> anyhow::Result<AppEvent> {
        match self.rx.recv_timeout(timeout) {
            Ok(ev) => Ok(ev),
            Err(RecvTimeoutError::Timeout) => Ok(AppEvent::Tick),
            Err(RecvTimeoutError::Disconnected) => {
                anyhow::bail!("terminal event reader stopped")
            }
        }
    }
}

impl Default for EventHandler {
    fn default() -> Self {
        Self::new()
    }
}
