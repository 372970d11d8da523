//! Interactive terminal editor for one model's form.
//!
//! Built on ratatui and crossterm. The editor shows the field grid, lets the
//! user edit values and, in config mode, reorder and resize fields. Layout
//! changes are persisted through the layout store as they happen.

pub mod app;
pub mod event;
pub mod ui;

pub use app::App;
