//! GraphQL documents the client sends and the cache keys they are stored under.

use serde::Serialize;
use serde_json::{json, Value};
use sha2::{Digest, Sha256};

use crate::cache::QueryKey;

/// Every selection set asks for `__typename` and `id` so results normalize.
pub const GET_MOVIES: &str = r#"
query getMovies($limit: Int, $rating: Float) {
  movies(limit: $limit, rating: $rating) {
    __typename
    id
    title
    year
    rating
    genres
    medium_cover_image
  }
}
"#;

pub const GET_MOVIE: &str = r#"
query getMovie($id: Int!) {
  movie(id: $id) {
    __typename
    id
    title
    year
    rating
    language
    genres
    summary
    description_intro
    medium_cover_image
  }
  suggestions(id: $id) {
    __typename
    id
    title
    year
    rating
  }
}
"#;

pub const GET_PEOPLE: &str = r#"
query getPeople {
  people {
    __typename
    id
    name
    age
    gender
  }
}
"#;

/// Body of a GraphQL-over-HTTP request.
#[derive(Debug, Clone, Serialize)]
pub struct GraphQlRequest {
  pub query: &'static str,
  pub variables: Value,
}

/// Root queries issued by the client.
#[derive(Debug, Clone, PartialEq)]
pub enum MovieQuery {
  /// Movie collection, optionally filtered
  Movies {
    limit: Option<u32>,
    rating: Option<f64>,
  },
  /// One movie plus its suggestions
  Detail { id: i32 },
  /// The static people dataset
  People,
}

impl MovieQuery {
  pub fn request(&self) -> GraphQlRequest {
    match self {
      Self::Movies { limit, rating } => GraphQlRequest {
        query: GET_MOVIES,
        variables: json!({ "limit": limit, "rating": rating }),
      },
      Self::Detail { id } => GraphQlRequest {
        query: GET_MOVIE,
        variables: json!({ "id": id }),
      },
      Self::People => GraphQlRequest {
        query: GET_PEOPLE,
        variables: json!({}),
      },
    }
  }
}

impl QueryKey for MovieQuery {
  fn cache_hash(&self) -> String {
    let input = match self {
      Self::Movies { limit, rating } => format!(
        "movies:{}:{}",
        limit.map(|l| l.to_string()).unwrap_or_default(),
        rating.map(|r| r.to_string()).unwrap_or_default()
      ),
      Self::Detail { id } => format!("movie:{}", id),
      Self::People => "people".to_string(),
    };

    // SHA256 hash for stable, fixed-length keys
    let mut hasher = Sha256::new();
    hasher.update(input.as_bytes());
    hex::encode(hasher.finalize())
  }

  fn description(&self) -> String {
    match self {
      Self::Movies { limit, rating } => match (limit, rating) {
        (None, None) => "movies".to_string(),
        (Some(l), None) => format!("movies (limit {})", l),
        (None, Some(r)) => format!("movies (rating >= {})", r),
        (Some(l), Some(r)) => format!("movies (limit {}, rating >= {})", l, r),
      },
      Self::Detail { id } => format!("movie {}", id),
      Self::People => "people".to_string(),
    }
  }
}
