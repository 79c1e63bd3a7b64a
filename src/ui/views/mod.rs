mod liked_list;
mod movie_detail;
mod movie_list;
mod people_list;

pub(crate) use liked_list::liked_movies;
pub use liked_list::LikedListView;
pub use movie_detail::MovieDetailView;
pub use movie_list::MovieListView;
pub use people_list::PeopleListView;

use chrono::Utc;
use ratatui::prelude::*;
use ratatui::widgets::ListItem;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::warn;

use crate::cache::{FetchPolicy, NormalizedCache, QueryKey};
use crate::movies::types::Movie;
use crate::movies::{GatewayClient, MovieQuery};
use crate::query::{Query, QueryState};
use crate::ui::renderfns::{cache_age, liked_marker, rating_color, truncate};

/// A gateway query bound to the cache key its result is stored under.
pub struct LiveQuery {
  key: MovieQuery,
  query: Query<Value>,
}

impl LiveQuery {
  /// Create the query and fetch unless the cache already holds a result.
  pub fn start(gateway: &GatewayClient, key: MovieQuery, cache: &NormalizedCache) -> Self {
    let query = gateway.query(key.request());
    let mut live = Self { key, query };
    live.run(cache, FetchPolicy::CacheFirst);
    live
  }

  pub fn run(&mut self, cache: &NormalizedCache, policy: FetchPolicy) {
    if cache.should_fetch(&self.key, policy) {
      self.query.refetch();
    }
  }

  /// Merge a finished fetch into the cache.
  pub fn tick(&mut self, cache: &mut NormalizedCache) {
    if !self.query.poll() {
      return;
    }
    match self.query.state() {
      QueryState::Success(data) => cache.write_query(&self.key, data),
      QueryState::Error(e) => warn!(query = %self.key.description(), error = %e, "query failed"),
      _ => {}
    }
  }

  pub fn read<T: DeserializeOwned>(&self, cache: &NormalizedCache) -> Option<T> {
    cache.read_query_as(&self.key)
  }

  pub fn is_loading(&self) -> bool {
    self.query.is_loading()
  }

  pub fn error(&self) -> Option<&str> {
    self.query.error()
  }

  /// Suffix for a block title describing fetch progress or cache age.
  pub fn status(&self, cache: &NormalizedCache) -> String {
    if self.is_loading() {
      "(loading...)".to_string()
    } else if let Some(e) = self.error() {
      format!("(error: {})", truncate(e, 40))
    } else if let Some(cached_at) = cache.cached_at(&self.key) {
      format!("(cached {} ago)", cache_age(cached_at, Utc::now()))
    } else {
      String::new()
    }
  }
}

/// One row of a movie list: liked marker, year, rating, title.
pub(crate) fn movie_row(movie: &Movie) -> ListItem<'static> {
  let year = movie
    .year
    .filter(|y| *y > 0)
    .map(|y| y.to_string())
    .unwrap_or_default();

  let line = Line::from(vec![
    Span::styled(
      format!("{} ", liked_marker(movie.is_liked)),
      Style::default().fg(Color::Red),
    ),
    Span::styled(format!("{:<5}", year), Style::default().fg(Color::DarkGray)),
    Span::styled(
      format!("{:>4.1} ", movie.rating),
      Style::default().fg(rating_color(movie.rating)),
    ),
    Span::raw(truncate(&movie.title, 60)),
  ]);
  ListItem::new(line)
}
