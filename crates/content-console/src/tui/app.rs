//! Editor state and main event loop.
//!
//! Manages terminal setup/teardown, the panic hook, schema reloads and the
//! render loop. All layout changes go through the [`LayoutStore`], which
//! persists them before the handler returns.

use crossterm::event::{MouseButton, MouseEvent, MouseEventKind};
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture, EventStream},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::prelude::{CrosstermBackend, Terminal};
use serde_json::{Map, Value};
use std::io::{self, stdout};
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;

use crate::config::schema::DEFAULT_TICK_RATE;
use crate::fetch::{load_schema, FetchError, RequestSequencer, RequestTicket};
use crate::grid::FieldGridState;
use crate::layout::{LayoutCommand, LayoutStore};
use crate::persistence::KeyValueStore;
use crate::schema::{field_keys, FieldDescriptor, FieldType};
use crate::tui::event::{handle_key_event, Action, Event, EventHandler};
use crate::tui::ui::render_editor;

/// How long a status message stays on screen.
const STATUS_MESSAGE_TTL: Duration = Duration::from_secs(3);

type SchemaResult = (RequestTicket, Result<Vec<FieldDescriptor>, FetchError>);

/// Value being typed into the input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValueInput {
    /// Field being edited.
    pub key: String,
    /// Text typed so far.
    pub buffer: String,
}

/// Interactive editor for one model.
#[derive(Debug)]
pub struct App<S> {
    pub(crate) model: String,
    pub(crate) schema_path: PathBuf,
    pub(crate) record_path: Option<PathBuf>,
    pub(crate) fields: Vec<FieldDescriptor>,
    pub(crate) layout: LayoutStore<S>,
    pub(crate) record: Map<String, Value>,
    pub(crate) grid: FieldGridState,
    pub(crate) input: Option<ValueInput>,
    pub(crate) status_message: Option<(String, Instant)>,
    pub(crate) should_quit: bool,
    sequencer: RequestSequencer,
    tick_rate: Duration,
}

impl<S: KeyValueStore> App<S> {
    /// Creates an editor over an opened layout store.
    ///
    /// `editable` is the update permission for `model`.
    pub fn new(
        model: &str,
        schema_path: PathBuf,
        fields: Vec<FieldDescriptor>,
        layout: LayoutStore<S>,
        editable: bool,
    ) -> Self {
        Self {
            model: model.to_string(),
            schema_path,
            record_path: None,
            fields,
            layout,
            record: Map::new(),
            grid: FieldGridState::new(editable),
            input: None,
            status_message: None,
            should_quit: false,
            sequencer: RequestSequencer::new(),
            tick_rate: DEFAULT_TICK_RATE,
        }
    }

    /// Attaches record values, and the file they are saved back to.
    pub fn with_record(mut self, path: Option<PathBuf>, record: Map<String, Value>) -> Self {
        self.record_path = path;
        self.record = record;
        self
    }

    /// Overrides the redraw interval.
    pub fn with_tick_rate(mut self, tick_rate: Duration) -> Self {
        self.tick_rate = tick_rate;
        self
    }

    /// Shows `message` in the status line for a few seconds.
    pub(crate) fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = Some((message.into(), Instant::now() + STATUS_MESSAGE_TTL));
    }

    fn expire_status_message(&mut self) {
        if let Some((_, expires)) = &self.status_message {
            if Instant::now() >= *expires {
                self.status_message = None;
            }
        }
    }

    /// Id of the selected layout entry.
    pub(crate) fn selected_id(&self) -> Option<String> {
        let index = self.grid.selected?;
        self.layout.entries().get(index).map(|e| e.id.clone())
    }

    fn field(&self, key: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.key == key)
    }

    /// Hands a grid intent to the layout store.
    pub(crate) fn apply(&mut self, command: Option<LayoutCommand>) -> bool {
        let Some(command) = command else {
            return false;
        };
        tracing::debug!(model = %self.model, ?command, "applying layout command");
        let changed = self.layout.apply(command);
        self.clamp_selection();
        changed
    }

    fn clamp_selection(&mut self) {
        let len = self.layout.entries().len();
        self.grid.selected = match self.grid.selected {
            Some(_) if len == 0 => None,
            Some(i) => Some(i.min(len - 1)),
            None => None,
        };
    }

    /// Adopts a freshly mapped field list.
    pub(crate) fn apply_fields(&mut self, fields: Vec<FieldDescriptor>) {
        self.layout.set_fields(&field_keys(&fields));
        self.fields = fields;
        self.clamp_selection();
    }

    /// Opens the input line for the selected field.
    pub(crate) fn begin_input(&mut self) {
        if !self.grid.editable() {
            self.set_status("Values are read-only for this role");
            return;
        }
        let Some(key) = self.selected_id() else {
            return;
        };
        let Some(field) = self.field(&key) else {
            return;
        };
        if matches!(
            field.field_type,
            FieldType::Relation { .. } | FieldType::Component
        ) {
            let message = format!("{} fields cannot be edited inline", field.field_type.name());
            self.set_status(message);
            return;
        }
        let buffer = match self.record.get(&key) {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Null) | None => String::new(),
            Some(other) => other.to_string(),
        };
        self.input = Some(ValueInput { key, buffer });
    }

    /// Converts the typed text and stores it in the record.
    ///
    /// Invalid input keeps the input line open.
    pub(crate) fn commit_input(&mut self) {
        let Some(input) = self.input.take() else {
            return;
        };
        let Some(field) = self.field(&input.key) else {
            return;
        };
        match field.field_type.coerce_input(&input.buffer) {
            Some(value) => {
                let message = format!("Updated {}", field.label);
                self.record.insert(input.key, value);
                self.set_status(message);
            }
            None => {
                let message = format!("Not a valid {} value", field.field_type.name());
                self.input = Some(input);
                self.set_status(message);
            }
        }
    }

    /// Writes the record back to the file it was loaded from.
    pub(crate) fn save_record(&mut self) {
        let Some(path) = self.record_path.clone() else {
            self.set_status("No record file to save to (use --record)");
            return;
        };
        let result = serde_json::to_string_pretty(&self.record)
            .map_err(io::Error::other)
            .and_then(|json| std::fs::write(&path, json + "\n"));
        match result {
            Ok(()) => self.set_status(format!("Saved {}", path.display())),
            Err(e) => {
                tracing::warn!(path = %path.display(), "failed to save record: {}", e);
                self.set_status(format!("Save failed: {e}"));
            }
        }
    }

    /// Handles clicks and drags over the grid.
    pub(crate) fn handle_mouse_event(&mut self, mouse: MouseEvent) {
        let hit = self.grid.index_at(mouse.column, mouse.row);
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                let Some(index) = hit else {
                    return;
                };
                self.grid.selected = Some(index);
                if let Some(id) = self.selected_id() {
                    self.grid.begin_drag(&id);
                }
            }
            MouseEventKind::Up(MouseButton::Left) => {
                if !self.grid.drag().is_active() {
                    return;
                }
                let target = hit
                    .and_then(|i| self.layout.entries().get(i))
                    .map(|e| e.id.clone());
                let command = self.grid.drop_on(target.as_deref(), self.layout.entries());
                self.apply(command);
            }
            MouseEventKind::ScrollDown => self.grid.select_next(self.layout.entries().len()),
            MouseEventKind::ScrollUp => self.grid.select_previous(self.layout.entries().len()),
            _ => {}
        }
    }

    fn spawn_reload(&self, tx: &mpsc::Sender<SchemaResult>) {
        let ticket = self.sequencer.begin();
        let path = self.schema_path.clone();
        let tx = tx.clone();
        tokio::spawn(async move {
            let result = load_schema(&path).await;
            let _ = tx.send((ticket, result)).await;
        });
    }

    fn handle_schema_result(&mut self, (ticket, result): SchemaResult) {
        let Some(result) = self.sequencer.accept(ticket, result) else {
            return;
        };
        match result {
            Ok(fields) => {
                let count = fields.len();
                self.apply_fields(fields);
                self.set_status(format!("Schema reloaded ({count} fields)"));
            }
            Err(e) => {
                tracing::warn!("schema reload failed: {}", e);
                self.set_status(format!("Reload failed: {e}"));
            }
        }
    }

    /// Runs the editor until the user quits.
    pub async fn run(&mut self) -> io::Result<()> {
        let original_hook = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |panic_info| {
            let _ = restore_terminal();
            original_hook(panic_info);
        }));

        setup_terminal()?;

        let result = self.event_loop().await;

        restore_terminal()?;
        result
    }

    async fn event_loop(&mut self) -> io::Result<()> {
        let backend = CrosstermBackend::new(stdout());
        let mut terminal = Terminal::new(backend)?;
        let event_handler = EventHandler::new(self.tick_rate);
        let mut reader = EventStream::new();
        let (schema_tx, mut schema_rx) = mpsc::channel::<SchemaResult>(8);

        terminal.draw(|frame| render_editor(frame, self))?;

        loop {
            while let Ok(message) = schema_rx.try_recv() {
                self.handle_schema_result(message);
            }

            match event_handler.next(&mut reader).await? {
                Event::Key(key) => match handle_key_event(self, key) {
                    Action::Quit => {
                        self.should_quit = true;
                        return Ok(());
                    }
                    Action::Reload => {
                        self.set_status("Reloading schema...");
                        self.spawn_reload(&schema_tx);
                    }
                    Action::SaveRecord => self.save_record(),
                    Action::None => {}
                },
                Event::Mouse(mouse) => self.handle_mouse_event(mouse),
                Event::Tick => self.expire_status_message(),
                Event::Resize(_, _) => {}
            }

            terminal.draw(|frame| render_editor(frame, self))?;
        }
    }
}

/// Enables raw mode and switches to the alternate screen.
fn setup_terminal() -> io::Result<()> {
    enable_raw_mode()?;
    execute!(stdout(), EnterAlternateScreen, EnableMouseCapture)?;
    Ok(())
}

/// Restores the terminal to its original state.
fn restore_terminal() -> io::Result<()> {
    disable_raw_mode()?;
    execute!(stdout(), LeaveAlternateScreen, DisableMouseCapture)?;
    Ok(())
}

#[cfg(test)]
mod tests;
