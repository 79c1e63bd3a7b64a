use crate::commands::{self, Command};
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, ListState};

/// Outcome of a key press while command mode is active
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandEvent {
  /// Key consumed, nothing for the parent to do
  Handled,
  /// Command submitted, resolved to its canonical name when it matched
  Submitted(String),
  /// Command cancelled
  Cancelled,
}

/// Command line with autocomplete, opened with `:`
#[derive(Debug, Clone, Default)]
pub struct CommandInput {
  value: String,
  active: bool,
  selected_suggestion: usize,
}

impl CommandInput {
  pub fn is_active(&self) -> bool {
    self.active
  }

  pub fn value(&self) -> &str {
    &self.value
  }

  pub fn activate(&mut self) {
    self.active = true;
    self.reset();
  }

  pub fn suggestions(&self) -> Vec<&'static Command> {
    commands::get_suggestions(&self.value)
  }

  pub fn selected_suggestion(&self) -> usize {
    self.selected_suggestion
  }

  fn reset(&mut self) {
    self.value.clear();
    self.selected_suggestion = 0;
  }

  /// Handle a key while active
  pub fn handle_key(&mut self, key: KeyEvent) -> CommandEvent {
    match key.code {
      KeyCode::Esc => {
        self.active = false;
        self.reset();
        return CommandEvent::Cancelled;
      }
      KeyCode::Enter => {
        self.active = false;
        let cmd = self.resolve_command();
        self.reset();
        return CommandEvent::Submitted(cmd);
      }
      KeyCode::Tab | KeyCode::Down => {
        let count = self.suggestions().len();
        if count > 0 {
          self.selected_suggestion = (self.selected_suggestion + 1) % count;
        }
      }
      KeyCode::BackTab | KeyCode::Up => {
        let count = self.suggestions().len();
        if count > 0 {
          self.selected_suggestion = (self.selected_suggestion + count - 1) % count;
        }
      }
      KeyCode::Backspace => {
        self.value.pop();
        self.selected_suggestion = 0;
      }
      KeyCode::Char(c) => {
        self.value.push(c);
        self.selected_suggestion = 0;
      }
      _ => {}
    }
    CommandEvent::Handled
  }

  /// Selected suggestion wins over raw input
  fn resolve_command(&self) -> String {
    self
      .suggestions()
      .get(self.selected_suggestion)
      .map(|cmd| cmd.name.to_string())
      .unwrap_or_else(|| self.value.trim().to_lowercase())
  }

  /// Render the suggestion overlay if active
  pub fn render_overlay(&self, frame: &mut Frame, area: Rect) {
    if !self.active {
      return;
    }

    let suggestions = self.suggestions();
    if suggestions.is_empty() {
      return;
    }

    let width = (area.width * 60 / 100).clamp(30, 60).min(area.width);
    let height = (suggestions.len().min(8) as u16 + 2).min(area.height);
    let overlay_area = Rect::new(area.x + 1, area.y + 1, width.saturating_sub(1), height);

    frame.render_widget(Clear, overlay_area);

    let items: Vec<ListItem> = suggestions
      .iter()
      .take(8)
      .map(|cmd| {
        ListItem::new(Line::from(vec![
          Span::styled(format!("{:<12}", cmd.name), Style::default().fg(Color::Cyan)),
          Span::styled(cmd.description, Style::default().fg(Color::DarkGray)),
        ]))
      })
      .collect();

    let list = List::new(items)
      .block(
        Block::default()
          .borders(Borders::ALL)
          .border_style(Style::default().fg(Color::Yellow))
          .title(" Command "),
      )
      .highlight_style(Style::default().bg(Color::DarkGray).fg(Color::White));

    let mut state = ListState::default();
    state.select(Some(self.selected_suggestion));
    frame.render_stateful_widget(list, overlay_area, &mut state);
  }
}
