use crate::cache::NormalizedCache;
use crate::config::Config;
use crate::event::{Event, EventHandler};
use crate::movies::local;
use crate::movies::GatewayClient;
use crate::ui;
use crate::ui::command_input::{CommandEvent, CommandInput};
use crate::ui::view::{Shortcut, View, ViewAction};
use crate::ui::views::{LikedListView, MovieListView, PeopleListView};
use color_eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use crossterm::terminal::{
  disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::ExecutableCommand;
use ratatui::prelude::*;
use std::io::stdout;
use std::time::Duration;
use tracing::{debug, info};

/// Main application state
pub struct App {
  /// Navigation stack - root is always at index 0
  view_stack: Vec<Box<dyn View>>,

  /// Session cache shared by every view
  cache: NormalizedCache,

  gateway: GatewayClient,

  config: Config,

  /// Command line opened with `:`
  command_input: CommandInput,

  should_quit: bool,
}

impl App {
  pub fn new(config: Config, gateway: GatewayClient) -> Self {
    let cache = local::new_cache();
    let root = MovieListView::new(
      gateway.clone(),
      config.client.limit,
      config.client.min_rating,
      &cache,
    );

    Self {
      view_stack: vec![Box::new(root)],
      cache,
      gateway,
      config,
      command_input: CommandInput::default(),
      should_quit: false,
    }
  }

  pub async fn run(&mut self) -> Result<()> {
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;

    let mut events = EventHandler::new(Duration::from_millis(100));
    info!(gateway = %self.gateway.label(), "browser started");

    let result = self.event_loop(&mut terminal, &mut events).await;

    // Restore the terminal even when the loop failed
    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;

    result
  }

  async fn event_loop(
    &mut self,
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    events: &mut EventHandler,
  ) -> Result<()> {
    while !self.should_quit {
      terminal.draw(|frame| ui::draw(frame, self))?;

      match events.next().await {
        Some(Event::Key(key)) => self.handle_key(key),
        Some(Event::Tick) => self.tick(),
        None => break,
      }
    }
    Ok(())
  }

  fn tick(&mut self) {
    // Views below the top keep polling so their fetches still land in the cache
    for view in self.view_stack.iter_mut() {
      view.tick(&mut self.cache);
    }
  }

  pub(crate) fn handle_key(&mut self, key: KeyEvent) {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
      self.should_quit = true;
      return;
    }

    if self.command_input.is_active() {
      if let CommandEvent::Submitted(cmd) = self.command_input.handle_key(key) {
        self.execute_command(&cmd);
      }
      return;
    }

    if key.code == KeyCode::Char(':') {
      self.command_input.activate();
      return;
    }

    let action = match self.view_stack.last_mut() {
      Some(view) => view.handle_key(key, &mut self.cache),
      None => ViewAction::None,
    };

    match action {
      ViewAction::None => {}
      ViewAction::Push(view) => self.view_stack.push(view),
      ViewAction::Pop => {
        if self.view_stack.len() > 1 {
          self.view_stack.pop();
        } else {
          self.should_quit = true;
        }
      }
    }
  }

  /// Replace the root view, dropping everything above it
  fn set_root(&mut self, view: Box<dyn View>) {
    self.view_stack.clear();
    self.view_stack.push(view);
  }

  fn execute_command(&mut self, cmd: &str) {
    debug!(command = cmd, "executing command");
    match cmd {
      "movies" => {
        let view = MovieListView::new(
          self.gateway.clone(),
          self.config.client.limit,
          self.config.client.min_rating,
          &self.cache,
        );
        self.set_root(Box::new(view));
      }
      "people" => {
        let view = PeopleListView::new(&self.gateway, &self.cache);
        self.set_root(Box::new(view));
      }
      "liked" => self.set_root(Box::new(LikedListView::new(self.gateway.clone()))),
      "quit" => self.should_quit = true,
      other => debug!(command = other, "unknown command"),
    }
  }

  pub(crate) fn render_current_view(&mut self, frame: &mut Frame, area: Rect) {
    if let Some(view) = self.view_stack.last_mut() {
      view.render(frame, area, &self.cache);
    }
  }

  pub fn command_input(&self) -> &CommandInput {
    &self.command_input
  }

  pub fn gateway_label(&self) -> String {
    self.gateway.label()
  }

  pub fn liked_count(&self) -> usize {
    ui::views::liked_movies(&self.cache).len()
  }

  pub fn shortcuts(&self) -> Vec<Shortcut> {
    self
      .view_stack
      .last()
      .map(|v| v.shortcuts())
      .unwrap_or_default()
  }

  pub fn view_breadcrumb(&self) -> Vec<String> {
    self
      .view_stack
      .iter()
      .map(|v| v.breadcrumb_label())
      .collect()
  }

  #[cfg(test)]
  pub(crate) fn should_quit(&self) -> bool {
    self.should_quit
  }

  #[cfg(test)]
  pub(crate) fn cache(&self) -> &NormalizedCache {
    &self.cache
  }
}
