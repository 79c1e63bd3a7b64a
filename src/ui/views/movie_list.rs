use crate::cache::{FetchPolicy, NormalizedCache};
use crate::movies::types::{Movie, MovieList};
use crate::movies::{GatewayClient, LocalMutation, MovieQuery};
use crate::ui::ensure_valid_selection;
use crate::ui::view::{Shortcut, View, ViewAction};
use crate::ui::views::{movie_row, LiveQuery, MovieDetailView};
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, List, ListState, Paragraph};

/// View for the movie collection
pub struct MovieListView {
  gateway: GatewayClient,
  live: LiveQuery,
  list_state: ListState,
}

impl MovieListView {
  pub fn new(
    gateway: GatewayClient,
    limit: Option<u32>,
    rating: Option<f64>,
    cache: &NormalizedCache,
  ) -> Self {
    let live = LiveQuery::start(&gateway, MovieQuery::Movies { limit, rating }, cache);

    Self {
      gateway,
      live,
      list_state: ListState::default(),
    }
  }

  fn movies(&self, cache: &NormalizedCache) -> Vec<Movie> {
    self
      .live
      .read::<MovieList>(cache)
      .map(|list| list.movies)
      .unwrap_or_default()
  }

  fn selected(&self, cache: &NormalizedCache) -> Option<Movie> {
    let idx = self.list_state.selected()?;
    self.movies(cache).into_iter().nth(idx)
  }
}

impl View for MovieListView {
  fn handle_key(&mut self, key: KeyEvent, cache: &mut NormalizedCache) -> ViewAction {
    match key.code {
      KeyCode::Char('j') | KeyCode::Down => self.list_state.select_next(),
      KeyCode::Char('k') | KeyCode::Up => self.list_state.select_previous(),
      KeyCode::Char('r') => self.live.run(cache, FetchPolicy::NetworkOnly),
      KeyCode::Char('l') => {
        if let Some(movie) = self.selected(cache) {
          LocalMutation::ToggleLikeMovie {
            id: movie.id,
            is_liked: movie.is_liked,
          }
          .apply(cache);
        }
      }
      KeyCode::Enter => {
        if let Some(movie) = self.selected(cache) {
          return ViewAction::Push(Box::new(MovieDetailView::new(
            movie.id,
            movie.title,
            self.gateway.clone(),
            cache,
          )));
        }
      }
      KeyCode::Char('q') | KeyCode::Esc => return ViewAction::Pop,
      _ => {}
    }
    ViewAction::None
  }

  fn render(&mut self, frame: &mut Frame, area: Rect, cache: &NormalizedCache) {
    let movies = self.movies(cache);
    ensure_valid_selection(&mut self.list_state, movies.len());

    let title = format!(" Movies ({}) {}", movies.len(), self.live.status(cache));
    let block = Block::default()
      .title(title)
      .title_alignment(Alignment::Center)
      .borders(Borders::ALL)
      .border_style(Style::default().fg(Color::Blue));

    if movies.is_empty() {
      let content = if self.live.is_loading() {
        "Loading movies..."
      } else if self.live.error().is_some() {
        "Failed to load movies. Press 'r' to retry."
      } else {
        "No movies found."
      };
      let paragraph = Paragraph::new(content)
        .block(block)
        .style(Style::default().fg(Color::DarkGray));
      frame.render_widget(paragraph, area);
      return;
    }

    let list = List::new(movies.iter().map(movie_row))
      .block(block)
      .highlight_style(
        Style::default()
          .bg(Color::DarkGray)
          .add_modifier(Modifier::BOLD),
      )
      .highlight_symbol("> ");

    frame.render_stateful_widget(list, area, &mut self.list_state);
  }

  fn breadcrumb_label(&self) -> String {
    "Movies".to_string()
  }

  fn tick(&mut self, cache: &mut NormalizedCache) {
    self.live.tick(cache);
  }

  fn shortcuts(&self) -> Vec<Shortcut> {
    vec![
      Shortcut::new("enter", "open"),
      Shortcut::new("l", "like"),
      Shortcut::new("r", "refresh"),
      Shortcut::new(":", "command"),
    ]
  }
}
