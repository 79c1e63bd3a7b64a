use crate::cache::NormalizedCache;
use crate::movies::types::Movie;
use crate::movies::{GatewayClient, LocalMutation};
use crate::ui::ensure_valid_selection;
use crate::ui::view::{Shortcut, View, ViewAction};
use crate::ui::views::{movie_row, MovieDetailView};
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, List, ListState, Paragraph};

/// Liked movies, read straight from the cache with no network request
pub struct LikedListView {
  gateway: GatewayClient,
  list_state: ListState,
}

impl LikedListView {
  pub fn new(gateway: GatewayClient) -> Self {
    Self {
      gateway,
      list_state: ListState::default(),
    }
  }
}

pub(crate) fn liked_movies(cache: &NormalizedCache) -> Vec<Movie> {
  cache
    .entities_of::<Movie>()
    .into_iter()
    .filter(|m| m.is_liked)
    .collect()
}

impl View for LikedListView {
  fn handle_key(&mut self, key: KeyEvent, cache: &mut NormalizedCache) -> ViewAction {
    let selected = self
      .list_state
      .selected()
      .and_then(|idx| liked_movies(cache).into_iter().nth(idx));

    match key.code {
      KeyCode::Char('j') | KeyCode::Down => self.list_state.select_next(),
      KeyCode::Char('k') | KeyCode::Up => self.list_state.select_previous(),
      KeyCode::Char('l') => {
        // Unliking drops the movie from this list
        if let Some(movie) = selected {
          LocalMutation::ToggleLikeMovie {
            id: movie.id,
            is_liked: movie.is_liked,
          }
          .apply(cache);
        }
      }
      KeyCode::Enter => {
        if let Some(movie) = selected {
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
    let movies = liked_movies(cache);
    ensure_valid_selection(&mut self.list_state, movies.len());

    let block = Block::default()
      .title(format!(" Liked ({}) ", movies.len()))
      .title_alignment(Alignment::Center)
      .borders(Borders::ALL)
      .border_style(Style::default().fg(Color::Red));

    if movies.is_empty() {
      let paragraph = Paragraph::new("Nothing liked yet. Press 'l' on a movie.")
        .block(block)
        .style(Style::default().fg(Color::DarkGray));
      frame.render_widget(paragraph, area);
      return;
    }

    let list = List::new(movies.iter().map(movie_row))
      .block(block)
      .highlight_style(Style::default().bg(Color::DarkGray))
      .highlight_symbol("> ");
    frame.render_stateful_widget(list, area, &mut self.list_state);
  }

  fn breadcrumb_label(&self) -> String {
    "Liked".to_string()
  }

  fn shortcuts(&self) -> Vec<Shortcut> {
    vec![
      Shortcut::new("l", "unlike"),
      Shortcut::new("enter", "open"),
      Shortcut::new(":", "command"),
    ]
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::movies::local::{self, toggle_liked};
  use crate::movies::types::movie_key;
  use crate::movies::MovieQuery;
  use serde_json::json;

  #[test]
  fn test_liked_movies_reflects_toggles() {
    let mut cache = local::new_cache();
    cache.write_query(
      &MovieQuery::Movies {
        limit: None,
        rating: None,
      },
      &json!({"movies": [
        {"__typename": "Movie", "id": 5, "title": "Five"},
        {"__typename": "Movie", "id": 6, "title": "Six"}
      ]}),
    );
    assert!(liked_movies(&cache).is_empty());

    toggle_liked(&mut cache, &movie_key(6), false);
    let liked: Vec<i32> = liked_movies(&cache).iter().map(|m| m.id).collect();
    assert_eq!(liked, vec![6]);

    toggle_liked(&mut cache, &movie_key(6), true);
    assert!(liked_movies(&cache).is_empty());
  }
}
