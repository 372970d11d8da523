//! Event handling for the editor.
//!
//! Wraps crossterm events and adds a tick variant for periodic redraws.

use crossterm::event::{
    Event as CrosstermEvent, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers,
    MouseEvent,
};
use futures::StreamExt;
use std::time::Duration;
use tokio::time::interval;

use crate::grid::GridMode;
use crate::persistence::KeyValueStore;
use crate::tui::app::App;

/// Application-level event variants.
#[derive(Debug, Clone, Copy)]
pub enum Event {
    /// A key was pressed.
    Key(KeyEvent),
    /// A mouse event occurred.
    Mouse(MouseEvent),
    /// Terminal was resized.
    Resize(u16, u16),
    /// Periodic tick.
    Tick,
}

/// Merges terminal input events with periodic ticks.
pub struct EventHandler {
    tick_rate: Duration,
}

impl EventHandler {
    /// Creates a handler ticking every `tick_rate`.
    pub fn new(tick_rate: Duration) -> Self {
        Self { tick_rate }
    }

    /// Waits for the next terminal event or tick, whichever comes first.
    pub async fn next(&self, reader: &mut EventStream) -> std::io::Result<Event> {
        let mut tick = interval(self.tick_rate);
        // First tick completes immediately.
        tick.tick().await;

        loop {
            tokio::select! {
                maybe_event = reader.next() => {
                    match maybe_event {
                        Some(Ok(CrosstermEvent::Key(key))) if key.kind != KeyEventKind::Release => {
                            return Ok(Event::Key(key));
                        }
                        Some(Ok(CrosstermEvent::Mouse(mouse))) => return Ok(Event::Mouse(mouse)),
                        Some(Ok(CrosstermEvent::Resize(w, h))) => return Ok(Event::Resize(w, h)),
                        Some(Err(e)) => return Err(e),
                        Some(Ok(_)) => continue,
                        None => return Err(std::io::Error::new(
                            std::io::ErrorKind::UnexpectedEof,
                            "event stream ended",
                        )),
                    }
                }
                _ = tick.tick() => {
                    return Ok(Event::Tick);
                }
            }
        }
    }
}

/// Work the event loop performs after a key press.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Nothing beyond the state change already made.
    None,
    /// Quit the editor.
    Quit,
    /// Reload the schema from disk.
    Reload,
    /// Write the record back to its file.
    SaveRecord,
}

/// Handles a key press against the editor state.
///
/// While a value is being typed, keys go to the input line. Otherwise layout
/// gestures map to layout commands that are applied to the store at once.
pub fn handle_key_event<S: KeyValueStore>(app: &mut App<S>, key: KeyEvent) -> Action {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return Action::Quit;
    }

    if app.input.is_some() {
        handle_input_key(app, key);
        return Action::None;
    }

    let len = app.layout.entries().len();
    match key.code {
        KeyCode::Char('q') => return Action::Quit,
        KeyCode::Char('j') | KeyCode::Down => app.grid.select_next(len),
        KeyCode::Char('k') | KeyCode::Up => app.grid.select_previous(len),
        KeyCode::Char('c') => {
            if app.grid.mode() == GridMode::Config {
                app.grid.exit_config();
            } else if !app.grid.enter_config() {
                app.set_status("Layout is read-only for this role");
            }
        }
        KeyCode::Char(' ') => {
            let selected = app.selected_id();
            if app.grid.drag().is_active() {
                let command = app.grid.drop_on(selected.as_deref(), app.layout.entries());
                app.apply(command);
            } else if let Some(id) = selected {
                app.grid.begin_drag(&id);
            }
        }
        KeyCode::Esc => {
            if app.grid.drag().is_active() {
                app.grid.cancel_drag();
            } else {
                app.grid.exit_config();
            }
        }
        KeyCode::Char('s') => {
            let command = app.grid.toggle_selected_size(app.layout.entries());
            app.apply(command);
        }
        KeyCode::Char('d') => {
            let command = app.grid.done();
            if command.is_some() {
                app.set_status("Layout saved");
            }
            app.apply(command);
        }
        KeyCode::Char('r') => {
            let command = app.grid.reset();
            app.apply(command);
        }
        KeyCode::Enter | KeyCode::Char('e') => app.begin_input(),
        KeyCode::Char('R') => return Action::Reload,
        KeyCode::Char('w') => return Action::SaveRecord,
        _ => {}
    }
    Action::None
}

fn handle_input_key<S: KeyValueStore>(app: &mut App<S>, key: KeyEvent) {
    let Some(input) = app.input.as_mut() else {
        return;
    };
    match key.code {
        KeyCode::Char(c) => input.buffer.push(c),
        KeyCode::Backspace => {
            input.buffer.pop();
        }
        KeyCode::Esc => app.input = None,
        KeyCode::Enter => app.commit_input(),
        _ => {}
    }
}
