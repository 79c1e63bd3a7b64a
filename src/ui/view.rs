use crossterm::event::KeyEvent;
use ratatui::prelude::*;

use crate::cache::NormalizedCache;

/// A keyboard shortcut hint for display in the header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Shortcut {
  pub key: &'static str,
  pub label: &'static str,
}

impl Shortcut {
  pub const fn new(key: &'static str, label: &'static str) -> Self {
    Self { key, label }
  }
}

/// Actions that a view can request in response to user input
pub enum ViewAction {
  /// No action needed
  None,
  /// Push a new view onto the stack
  Push(Box<dyn View>),
  /// Pop current view from stack (go back)
  Pop,
}

/// Trait for view behavior
///
/// Views never own entity data. They keep query handles and selection state,
/// write completed responses into the cache passed to `tick`, and render from
/// the cache passed to `render`, so a like toggled in one view shows up in
/// every other.
pub trait View {
  /// Handle a key event, returning an action for App to execute
  fn handle_key(&mut self, key: KeyEvent, cache: &mut NormalizedCache) -> ViewAction;

  /// Render the view from the current cache contents
  fn render(&mut self, frame: &mut Frame, area: Rect, cache: &NormalizedCache);

  /// Get the breadcrumb label for this view
  fn breadcrumb_label(&self) -> String;

  /// Called on each tick to merge finished fetches into the cache
  fn tick(&mut self, _cache: &mut NormalizedCache) {}

  /// Keyboard shortcuts to display in the header
  fn shortcuts(&self) -> Vec<Shortcut> {
    vec![Shortcut::new(":", "command"), Shortcut::new("q", "back")]
  }
}
