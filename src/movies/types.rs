use serde::Deserialize;

use crate::cache::{Cacheable, EntityKey};

pub const MOVIE_TYPENAME: &str = "Movie";

/// Movie as read back from the cache, server fields merged with local ones
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Movie {
  pub id: i32,
  #[serde(default)]
  pub title: String,
  #[serde(default)]
  pub year: Option<i32>,
  #[serde(default)]
  pub rating: f64,
  #[serde(default)]
  pub language: Option<String>,
  #[serde(default)]
  pub genres: Vec<String>,
  #[serde(default)]
  pub summary: Option<String>,
  #[serde(default)]
  pub description_intro: Option<String>,
  #[serde(default)]
  pub medium_cover_image: Option<String>,
  #[serde(rename = "isLiked", default)]
  pub is_liked: bool,
}

impl Movie {
  /// Intro if it has text, otherwise the summary.
  pub fn description(&self) -> Option<&str> {
    [&self.description_intro, &self.summary]
      .into_iter()
      .filter_map(|d| d.as_deref())
      .find(|d| !d.trim().is_empty())
  }
}

/// Person from the static dataset
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Person {
  pub id: String,
  pub name: String,
  pub age: i32,
  pub gender: String,
}

impl Cacheable for Movie {
  fn typename() -> &'static str {
    MOVIE_TYPENAME
  }

}

pub fn movie_key(id: i32) -> EntityKey {
  EntityKey::new(MOVIE_TYPENAME, id.to_string())
}

// ============================================================================
// Query result shapes
// ============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MovieList {
  #[serde(default)]
  pub movies: Vec<Movie>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MovieDetail {
  pub movie: Option<Movie>,
  #[serde(default)]
  pub suggestions: Vec<Movie>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PeopleList {
  #[serde(default)]
  pub people: Vec<Person>,
}
