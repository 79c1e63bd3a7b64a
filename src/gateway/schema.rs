//! GraphQL schema that reshapes upstream catalog records.

use async_graphql::{Context, EmptyMutation, EmptySubscription, Object, Schema, SimpleObject};
use std::sync::Arc;
use tracing::warn;

use super::people::{self, PersonRecord};
use crate::catalog::api_types::ApiMovie;
use crate::catalog::Catalog;

pub type MovieSchema = Schema<QueryRoot, EmptyMutation, EmptySubscription>;

/// Shared handle to whatever backs the movie fields.
pub type SharedCatalog = Arc<dyn Catalog>;

#[derive(SimpleObject, Debug, Clone)]
#[graphql(rename_fields = "snake_case")]
pub struct Movie {
  pub id: i32,
  pub url: String,
  pub imdb_code: String,
  pub title: String,
  pub year: i32,
  pub rating: f64,
  pub runtime: i32,
  pub genres: Vec<String>,
  pub summary: String,
  pub description_intro: String,
  pub language: String,
  pub medium_cover_image: String,
  pub large_cover_image: String,
}

impl From<ApiMovie> for Movie {
  fn from(movie: ApiMovie) -> Self {
    Self {
      id: movie.id,
      url: movie.url,
      imdb_code: movie.imdb_code,
      title: movie.title,
      year: movie.year,
      rating: movie.rating,
      runtime: movie.runtime,
      genres: movie.genres,
      summary: movie.summary,
      description_intro: movie.description_intro,
      language: movie.language,
      medium_cover_image: movie.medium_cover_image,
      large_cover_image: movie.large_cover_image,
    }
  }
}

#[derive(SimpleObject, Debug, Clone)]
pub struct Person {
  pub id: String,
  pub name: String,
  pub age: i32,
  pub gender: String,
}

impl From<&PersonRecord> for Person {
  fn from(record: &PersonRecord) -> Self {
    Self {
      id: record.id.to_string(),
      name: record.name.to_string(),
      age: i32::from(record.age),
      gender: record.gender.to_string(),
    }
  }
}

pub struct QueryRoot;

#[Object]
impl QueryRoot {
  /// A single movie, or null when the catalog has no such id.
  async fn movie(&self, ctx: &Context<'_>, id: i32) -> async_graphql::Result<Option<Movie>> {
    let catalog = ctx.data::<SharedCatalog>()?;
    let movie = catalog.movie_details(id).await.map_err(upstream_error)?;
    Ok(movie.map(Movie::from))
  }

  /// Movies filtered by count and minimum rating.
  async fn movies(
    &self,
    ctx: &Context<'_>,
    limit: Option<i32>,
    rating: Option<f64>,
  ) -> async_graphql::Result<Vec<Movie>> {
    let catalog = ctx.data::<SharedCatalog>()?;
    // Negative limits are dropped rather than forwarded
    let limit = limit.and_then(|l| u32::try_from(l).ok());
    let movies = catalog
      .list_movies(limit, rating)
      .await
      .map_err(upstream_error)?;
    Ok(movies.into_iter().map(Movie::from).collect())
  }

  /// Movies related to `id`.
  async fn suggestions(&self, ctx: &Context<'_>, id: i32) -> async_graphql::Result<Vec<Movie>> {
    let catalog = ctx.data::<SharedCatalog>()?;
    let movies = catalog
      .movie_suggestions(id)
      .await
      .map_err(upstream_error)?;
    Ok(movies.into_iter().map(Movie::from).collect())
  }

  async fn people(&self) -> Vec<Person> {
    people::PEOPLE.iter().map(Person::from).collect()
  }

  async fn person(&self, id: String) -> Option<Person> {
    people::get_by_id(&id).map(Person::from)
  }
}

fn upstream_error(err: color_eyre::Report) -> async_graphql::Error {
  warn!(error = %err, "catalog request failed");
  async_graphql::Error::new(err.to_string())
}

pub fn build_schema(catalog: SharedCatalog) -> MovieSchema {
  Schema::build(QueryRoot, EmptyMutation, EmptySubscription)
    .data(catalog)
    .finish()
}

#[cfg(test)]
pub(crate) mod tests {
  use super::*;
  use async_trait::async_trait;
  use color_eyre::{eyre::eyre, Result};
  use serde_json::json;

  /// Catalog answering from a fixed list of movies.
  pub(crate) struct FixtureCatalog {
    pub movies: Vec<ApiMovie>,
  }

  pub(crate) fn fixture_movie(id: i32, title: &str, rating: f64) -> ApiMovie {
    ApiMovie {
      id,
      title: title.to_string(),
      rating,
      year: 2000 + id,
      language: "en".to_string(),
      description_intro: format!("About {}", title),
      ..ApiMovie::default()
    }
  }

  pub(crate) fn fixture_catalog() -> FixtureCatalog {
    FixtureCatalog {
      movies: vec![
        fixture_movie(1, "First", 8.2),
        fixture_movie(2, "Second", 6.9),
        fixture_movie(3, "Third", 7.5),
        fixture_movie(4, "Fourth", 9.0),
      ],
    }
  }

  #[async_trait]
  impl Catalog for FixtureCatalog {
    async fn list_movies(&self, limit: Option<u32>, minimum_rating: Option<f64>) -> Result<Vec<ApiMovie>> {
      let limit = limit.unwrap_or(20) as usize;
      let floor = minimum_rating.unwrap_or(0.0);
      Ok(
        self
          .movies
          .iter()
          .filter(|m| m.rating >= floor)
          .take(limit)
          .cloned()
          .collect(),
      )
    }

    async fn movie_details(&self, movie_id: i32) -> Result<Option<ApiMovie>> {
      Ok(self.movies.iter().find(|m| m.id == movie_id).cloned())
    }

    async fn movie_suggestions(&self, movie_id: i32) -> Result<Vec<ApiMovie>> {
      Ok(
        self
          .movies
          .iter()
          .filter(|m| m.id != movie_id)
          .take(2)
          .cloned()
          .collect(),
      )
    }
  }

  pub(crate) struct DownCatalog;

  #[async_trait]
  impl Catalog for DownCatalog {
    async fn list_movies(&self, _limit: Option<u32>, _rating: Option<f64>) -> Result<Vec<ApiMovie>> {
      Err(eyre!("Failed to reach catalog: connection refused"))
    }

    async fn movie_details(&self, _movie_id: i32) -> Result<Option<ApiMovie>> {
      Err(eyre!("Failed to reach catalog: connection refused"))
    }

    async fn movie_suggestions(&self, _movie_id: i32) -> Result<Vec<ApiMovie>> {
      Err(eyre!("Failed to reach catalog: connection refused"))
    }
  }

  pub(crate) fn fixture_schema() -> MovieSchema {
    build_schema(Arc::new(fixture_catalog()))
  }

  #[tokio::test]
  async fn test_movies_applies_filters() {
    let response = fixture_schema()
      .execute("{ movies(limit: 2, rating: 7.5) { id title rating } }")
      .await;

    assert!(response.errors.is_empty(), "{:?}", response.errors);
    let data = response.data.into_json().unwrap();
    assert_eq!(
      data,
      json!({"movies": [
        {"id": 1, "title": "First", "rating": 8.2},
        {"id": 3, "title": "Third", "rating": 7.5}
      ]})
    );
  }

  #[tokio::test]
  async fn test_movie_fields_keep_snake_case() {
    let response = fixture_schema()
      .execute("{ movie(id: 4) { __typename id description_intro medium_cover_image } }")
      .await;

    let data = response.data.into_json().unwrap();
    assert_eq!(data["movie"]["__typename"], json!("Movie"));
    assert_eq!(data["movie"]["description_intro"], json!("About Fourth"));
    assert_eq!(data["movie"]["medium_cover_image"], json!(""));
  }

  #[tokio::test]
  async fn test_unknown_movie_is_null() {
    let response = fixture_schema().execute("{ movie(id: 99) { id } }").await;

    assert!(response.errors.is_empty());
    assert_eq!(response.data.into_json().unwrap(), json!({"movie": null}));
  }

  #[tokio::test]
  async fn test_suggestions_exclude_the_movie() {
    let response = fixture_schema()
      .execute("{ suggestions(id: 1) { id } }")
      .await;

    assert_eq!(
      response.data.into_json().unwrap(),
      json!({"suggestions": [{"id": 2}, {"id": 3}]})
    );
  }

  #[tokio::test]
  async fn test_negative_limit_uses_default() {
    let response = fixture_schema()
      .execute("{ movies(limit: -1) { id } }")
      .await;

    let data = response.data.into_json().unwrap();
    assert_eq!(data["movies"].as_array().map(Vec::len), Some(4));
  }

  #[tokio::test]
  async fn test_people_and_person() {
    let schema = fixture_schema();

    let response = schema.execute("{ people { id name } }").await;
    let data = response.data.into_json().unwrap();
    assert_eq!(data["people"].as_array().map(Vec::len), Some(5));

    let response = schema
      .execute(r#"{ person(id: "4") { name age gender } }"#)
      .await;
    assert_eq!(
      response.data.into_json().unwrap(),
      json!({"person": {"name": "Billy", "age": 23, "gender": "male"}})
    );

    let response = schema.execute(r#"{ person(id: "42") { name } }"#).await;
    assert_eq!(response.data.into_json().unwrap(), json!({"person": null}));
  }

  #[tokio::test]
  async fn test_upstream_failure_is_a_request_error() {
    let schema = build_schema(Arc::new(DownCatalog));
    let response = schema.execute("{ movies { id } }").await;

    assert_eq!(response.errors.len(), 1);
    assert!(response.errors[0].message.contains("connection refused"));
  }
}
