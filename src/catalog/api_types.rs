//! Serde-deserializable types matching the upstream catalog responses.
//!
//! Every endpoint wraps its payload in `{status, status_message, data}`.

use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct ApiEnvelope<T> {
  #[serde(default)]
  pub status: Option<String>,
  #[serde(default)]
  pub status_message: Option<String>,
  pub data: T,
}

impl<T> ApiEnvelope<T> {
  /// The upstream reports some failures in-band with HTTP 200.
  pub fn is_error(&self) -> bool {
    self.status.as_deref() == Some("error")
  }
}

// ============================================================================
// Movie record - shared by list, details and suggestions
// ============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiMovie {
  #[serde(default)]
  pub id: i32,
  #[serde(default)]
  pub url: String,
  #[serde(default)]
  pub imdb_code: String,
  #[serde(default)]
  pub title: String,
  #[serde(default)]
  pub year: i32,
  #[serde(default)]
  pub rating: f64,
  #[serde(default)]
  pub runtime: i32,
  #[serde(default)]
  pub genres: Vec<String>,
  #[serde(default)]
  pub summary: String,
  #[serde(default)]
  pub description_intro: String,
  #[serde(default)]
  pub language: String,
  #[serde(default)]
  pub medium_cover_image: String,
  #[serde(default)]
  pub large_cover_image: String,
}

// ============================================================================
// list_movies / movie_suggestions response
// ============================================================================

#[derive(Debug, Default, Deserialize)]
pub struct ApiMovieList {
  #[serde(default)]
  pub movie_count: u64,
  #[serde(default)]
  pub movies: Vec<ApiMovie>,
}

// ============================================================================
// movie_details response
// ============================================================================

#[derive(Debug, Default, Deserialize)]
pub struct ApiMovieDetails {
  #[serde(default)]
  pub movie: Option<ApiMovie>,
}

impl ApiMovieDetails {
  /// Unknown ids come back as a movie with id 0 rather than an error.
  pub fn into_found(self) -> Option<ApiMovie> {
    self.movie.filter(|m| m.id != 0)
  }
}
