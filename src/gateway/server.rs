//! HTTP endpoint for the gateway schema.

use async_graphql::http::GraphiQLSource;
use async_graphql_axum::GraphQL;
use axum::response::{Html, IntoResponse};
use axum::routing::get;
use axum::Router;
use color_eyre::{eyre::eyre, Result};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::info;

use super::schema::{build_schema, MovieSchema};
use crate::catalog::CatalogClient;
use crate::config::Config;

/// Build the gateway router around a schema.
pub fn router(schema: MovieSchema) -> Router {
  Router::new()
    .route("/", get(graphiql).post_service(GraphQL::new(schema)))
    .route("/health", get(health))
    .layer(TraceLayer::new_for_http())
}

async fn graphiql() -> impl IntoResponse {
  Html(GraphiQLSource::build().endpoint("/").finish())
}

async fn health() -> &'static str {
  "ok"
}

/// Serve the gateway until the process is stopped.
pub async fn serve(config: &Config) -> Result<()> {
  let catalog = CatalogClient::new(&config.upstream)?;
  let schema = build_schema(Arc::new(catalog));

  let listener = tokio::net::TcpListener::bind(&config.gateway.bind)
    .await
    .map_err(|e| eyre!("Failed to bind {}: {}", config.gateway.bind, e))?;

  info!(
    bind = %config.gateway.bind,
    upstream = %config.upstream.url,
    "gateway listening"
  );

  axum::serve(listener, router(schema))
    .await
    .map_err(|e| eyre!("Gateway server failed: {}", e))?;

  Ok(())
}
