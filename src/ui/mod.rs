pub mod command_input;
pub mod renderfns;
pub mod view;
pub mod views;

use crate::app::App;
use ratatui::prelude::*;
use ratatui::widgets::ListState;

/// Main draw function
pub fn draw(frame: &mut Frame, app: &mut App) {
  let chunks = Layout::default()
    .direction(Direction::Vertical)
    .constraints([
      Constraint::Length(1), // Header
      Constraint::Min(1),    // Main content
      Constraint::Length(1), // Footer
    ])
    .split(frame.area());

  let shortcuts = app.shortcuts();
  let liked = app.liked_count();
  renderfns::draw_header(frame, chunks[0], &app.gateway_label(), liked, &shortcuts);

  let breadcrumb = app.view_breadcrumb();
  app.render_current_view(frame, chunks[1]);

  let command = app.command_input();
  let command_line = command.is_active().then(|| command.value());
  renderfns::draw_footer(frame, chunks[2], &breadcrumb, command_line);
  command.render_overlay(frame, chunks[1]);
}

/// Keep a list selection inside `0..len`, selecting the first row once rows exist
pub fn ensure_valid_selection(state: &mut ListState, len: usize) {
  if len == 0 {
    state.select(None);
    return;
  }
  match state.selected() {
    Some(idx) if idx >= len => state.select(Some(len - 1)),
    None => state.select(Some(0)),
    _ => {}
  }
}
