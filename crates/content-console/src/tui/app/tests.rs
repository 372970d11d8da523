use super::*;
use crate::grid::GridMode;
use crate::layout::LayoutEntry;
use crate::persistence::MemoryStore;
use crate::schema::{map_schema, FieldType};
use crate::test_utils::{blog_fields, blog_record, test_terminal};
use crossterm::event::KeyModifiers;
use serde_json::json;

fn make_app(editable: bool) -> App<MemoryStore> {
    let fields = blog_fields();
    let layout = LayoutStore::open(MemoryStore::new(), "test", "blog", &field_keys(&fields));
    App::new("blog", PathBuf::from("blog.json"), fields, layout, editable)
        .with_record(None, blog_record())
}

/// Draws one 60x24 frame so cell rects are known.
fn draw(app: &mut App<MemoryStore>) {
    let mut terminal = test_terminal(60, 24);
    terminal
        .draw(|frame| render_editor(frame, app))
        .expect("draw failed");
}

fn mouse(kind: MouseEventKind, column: u16, row: u16) -> MouseEvent {
    MouseEvent {
        kind,
        column,
        row,
        modifiers: KeyModifiers::NONE,
    }
}

fn ids(app: &App<MemoryStore>) -> Vec<&str> {
    app.layout.entries().iter().map(|e| e.id.as_str()).collect()
}

#[test]
fn test_app_new() {
    let app = make_app(true);
    assert!(!app.should_quit);
    assert_eq!(app.model, "blog");
    assert_eq!(app.grid.mode(), GridMode::View);
    assert!(app.grid.editable());
    assert!(app.input.is_none());
    assert_eq!(app.tick_rate, DEFAULT_TICK_RATE);
    assert_eq!(ids(&app).len(), 6);
}

#[test]
fn test_click_selects_cell_without_drag_in_view_mode() {
    let mut app = make_app(true);
    draw(&mut app);
    app.handle_mouse_event(mouse(MouseEventKind::Down(MouseButton::Left), 35, 8));
    assert_eq!(app.grid.selected, Some(3));
    assert!(!app.grid.drag().is_active());
}

#[test]
fn test_click_outside_cells_keeps_selection() {
    let mut app = make_app(true);
    draw(&mut app);
    app.grid.selected = Some(2);
    app.handle_mouse_event(mouse(MouseEventKind::Down(MouseButton::Left), 45, 2));
    assert_eq!(app.grid.selected, Some(2));
}

#[test]
fn test_mouse_drag_reorders_in_config_mode() {
    let mut app = make_app(true);
    app.grid.enter_config();
    draw(&mut app);

    // "views" sits in the right half of the third grid row.
    app.handle_mouse_event(mouse(MouseEventKind::Down(MouseButton::Left), 35, 8));
    assert_eq!(app.grid.drag().source(), Some("views"));
    app.handle_mouse_event(mouse(MouseEventKind::Up(MouseButton::Left), 5, 2));

    assert_eq!(
        ids(&app),
        vec!["views", "title", "body", "status", "heroSlide", "owner"]
    );
    assert_eq!(app.grid.selected, Some(0));
}

#[test]
fn test_mouse_drop_outside_cells_is_noop() {
    let mut app = make_app(true);
    app.grid.enter_config();
    draw(&mut app);
    app.handle_mouse_event(mouse(MouseEventKind::Down(MouseButton::Left), 5, 2));
    app.handle_mouse_event(mouse(MouseEventKind::Up(MouseButton::Left), 45, 2));
    assert!(!app.grid.drag().is_active());
    assert_eq!(ids(&app)[0], "title");
}

#[test]
fn test_scroll_moves_selection() {
    let mut app = make_app(true);
    app.handle_mouse_event(mouse(MouseEventKind::ScrollDown, 0, 0));
    app.handle_mouse_event(mouse(MouseEventKind::ScrollDown, 0, 0));
    assert_eq!(app.grid.selected, Some(1));
    app.handle_mouse_event(mouse(MouseEventKind::ScrollUp, 0, 0));
    assert_eq!(app.grid.selected, Some(0));
}

#[test]
fn test_apply_fields_reconciles_and_clamps_selection() {
    let mut app = make_app(true);
    app.grid.selected = Some(5);
    let fields = map_schema(&json!({
        "title": {"instance": "String"},
        "summary": {"instance": "String"}
    }));
    app.apply_fields(fields);
    assert_eq!(ids(&app), vec!["title", "summary"]);
    assert_eq!(app.grid.selected, Some(1));
    assert_eq!(app.fields.len(), 2);
}

#[test]
fn test_superseded_schema_result_is_discarded() {
    let mut app = make_app(true);
    let stale = app.sequencer.begin();
    let latest = app.sequencer.begin();

    let only_title = vec![FieldDescriptor::new("title", FieldType::Text)];
    app.handle_schema_result((stale, Ok(only_title)));
    assert_eq!(ids(&app).len(), 6);

    let two = vec![
        FieldDescriptor::new("title", FieldType::Text),
        FieldDescriptor::new("views", FieldType::Number),
    ];
    app.handle_schema_result((latest, Ok(two)));
    assert_eq!(ids(&app), vec!["title", "views"]);
}

#[test]
fn test_failed_reload_keeps_fields() {
    let mut app = make_app(true);
    let ticket = app.sequencer.begin();
    let error = FetchError::NotAnObject {
        path: PathBuf::from("blog.json"),
    };
    app.handle_schema_result((ticket, Err(error)));
    assert_eq!(ids(&app).len(), 6);
    let (message, _) = app.status_message.clone().expect("status set");
    assert!(message.starts_with("Reload failed"));
}

#[tokio::test]
async fn test_spawned_reload_delivers_latest_schema() {
    let dir = tempfile::tempdir().expect("tempdir");
    let schema_path = dir.path().join("blog.json");
    std::fs::write(
        &schema_path,
        r#"{"title":{"instance":"String"},"tags":{"instance":"Array","caster":{"instance":"ObjectId"}}}"#,
    )
    .expect("write schema");

    let mut app = make_app(true);
    app.schema_path = schema_path;
    let (tx, mut rx) = mpsc::channel(4);
    app.spawn_reload(&tx);
    let message = rx.recv().await.expect("reload result");
    app.handle_schema_result(message);

    assert_eq!(ids(&app), vec!["title", "tags"]);
    assert_eq!(
        app.layout.entries(),
        &[LayoutEntry::half("title"), LayoutEntry::half("tags")]
    );
}

#[test]
fn test_save_record_writes_json() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("record.json");
    let mut app = make_app(true).with_record(Some(path.clone()), blog_record());
    app.record.insert("views".into(), json!(7));
    app.save_record();

    let saved: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).expect("read")).expect("parse");
    assert_eq!(saved["views"], json!(7));
    assert_eq!(saved["title"], json!("Hello world"));
}

#[test]
fn test_save_without_record_path_sets_status() {
    let mut app = make_app(true);
    app.save_record();
    let (message, _) = app.status_message.clone().expect("status set");
    assert!(message.contains("--record"));
}

#[test]
fn test_status_message_expires() {
    let mut app = make_app(true);
    app.status_message = Some(("old".into(), Instant::now() - Duration::from_millis(1)));
    app.expire_status_message();
    assert!(app.status_message.is_none());
    app.set_status("fresh");
    app.expire_status_message();
    assert!(app.status_message.is_some());
}
