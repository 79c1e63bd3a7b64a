//! Upstream REST movie catalog.

pub mod api_types;
pub mod client;

use async_trait::async_trait;
use color_eyre::Result;

use api_types::ApiMovie;

pub use client::CatalogClient;

/// Source of movie records for the gateway schema.
#[async_trait]
pub trait Catalog: Send + Sync {
  /// List movies. `None` filters fall back to the upstream defaults.
  async fn list_movies(&self, limit: Option<u32>, minimum_rating: Option<f64>) -> Result<Vec<ApiMovie>>;

  /// Look up one movie; `Ok(None)` when no record matches.
  async fn movie_details(&self, movie_id: i32) -> Result<Option<ApiMovie>>;

  /// Movies related to `movie_id`, in upstream order.
  async fn movie_suggestions(&self, movie_id: i32) -> Result<Vec<ApiMovie>>;
}
