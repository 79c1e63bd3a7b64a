use async_trait::async_trait;
use color_eyre::{eyre::eyre, Result};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;
use url::Url;

use super::api_types::{ApiEnvelope, ApiMovie, ApiMovieDetails, ApiMovieList};
use super::Catalog;
use crate::config::UpstreamConfig;

/// HTTP client for the upstream REST catalog
#[derive(Clone)]
pub struct CatalogClient {
  http: reqwest::Client,
  base: Url,
}

impl CatalogClient {
  pub fn new(config: &UpstreamConfig) -> Result<Self> {
    let base = base_url(&config.url)?;

    let http = reqwest::Client::builder()
      .timeout(Duration::from_secs(config.timeout_secs))
      .user_agent(concat!("movieql/", env!("CARGO_PKG_VERSION")))
      .build()
      .map_err(|e| eyre!("Failed to create HTTP client: {}", e))?;

    Ok(Self { http, base })
  }

  async fn get<T: DeserializeOwned>(&self, endpoint: &str, params: &[(&str, String)]) -> Result<T> {
    let url = self
      .base
      .join(endpoint)
      .map_err(|e| eyre!("Invalid catalog endpoint {}: {}", endpoint, e))?;

    debug!(%url, ?params, "catalog request");

    let envelope: ApiEnvelope<T> = self
      .http
      .get(url)
      .query(params)
      .send()
      .await
      .map_err(|e| eyre!("Failed to reach catalog: {}", e))?
      .error_for_status()
      .map_err(|e| eyre!("Catalog returned an error: {}", e))?
      .json()
      .await
      .map_err(|e| eyre!("Failed to parse catalog response from {}: {}", endpoint, e))?;

    if envelope.is_error() {
      return Err(eyre!(
        "Catalog rejected {}: {}",
        endpoint,
        envelope.status_message.as_deref().unwrap_or("unknown error")
      ));
    }

    Ok(envelope.data)
  }
}

#[async_trait]
impl Catalog for CatalogClient {
  async fn list_movies(&self, limit: Option<u32>, minimum_rating: Option<f64>) -> Result<Vec<ApiMovie>> {
    let response: ApiMovieList = self
      .get("list_movies.json", &list_params(limit, minimum_rating))
      .await?;
    debug!(
      total = response.movie_count,
      returned = response.movies.len(),
      "catalog listing"
    );
    Ok(response.movies)
  }

  async fn movie_details(&self, movie_id: i32) -> Result<Option<ApiMovie>> {
    let response: ApiMovieDetails = self
      .get("movie_details.json", &[("movie_id", movie_id.to_string())])
      .await?;
    Ok(response.into_found())
  }

  async fn movie_suggestions(&self, movie_id: i32) -> Result<Vec<ApiMovie>> {
    let response: ApiMovieList = self
      .get("movie_suggestions.json", &[("movie_id", movie_id.to_string())])
      .await?;
    Ok(response.movies)
  }
}

/// Parse the configured base URL so relative endpoints join under it.
fn base_url(raw: &str) -> Result<Url> {
  let mut raw = raw.trim().to_string();
  if !raw.ends_with('/') {
    raw.push('/');
  }
  Url::parse(&raw).map_err(|e| eyre!("Invalid upstream URL {}: {}", raw, e))
}

/// Omitted filters are left out so the upstream defaults apply.
fn list_params(limit: Option<u32>, minimum_rating: Option<f64>) -> Vec<(&'static str, String)> {
  let mut params = Vec::new();
  if let Some(limit) = limit {
    params.push(("limit", limit.to_string()));
  }
  if let Some(rating) = minimum_rating {
    params.push(("minimum_rating", rating.to_string()));
  }
  params
}
