use async_graphql::Variables;
use color_eyre::{eyre::eyre, Result};
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;
use url::Url;

use super::documents::GraphQlRequest;
use crate::gateway::MovieSchema;
use crate::query::Query;

#[derive(Debug, Deserialize)]
struct GraphQlResponse {
  data: Option<Value>,
  #[serde(default)]
  errors: Vec<GraphQlError>,
}

#[derive(Debug, Deserialize)]
struct GraphQlError {
  message: String,
}

/// Client side of the gateway: remote over HTTP or an in-process schema
#[derive(Clone)]
pub enum GatewayClient {
  Remote { http: reqwest::Client, url: Url },
  Embedded(MovieSchema),
}

impl GatewayClient {
  pub fn remote(url: &str) -> Result<Self> {
    let url = Url::parse(url).map_err(|e| eyre!("Invalid gateway URL {}: {}", url, e))?;
    let http = reqwest::Client::builder()
      .user_agent(concat!("movieql/", env!("CARGO_PKG_VERSION")))
      .build()
      .map_err(|e| eyre!("Failed to create HTTP client: {}", e))?;

    Ok(Self::Remote { http, url })
  }

  pub fn embedded(schema: MovieSchema) -> Self {
    Self::Embedded(schema)
  }

  /// Short label for the header bar.
  pub fn label(&self) -> String {
    match self {
      Self::Remote { url, .. } => match (url.host_str(), url.port()) {
        (Some(host), Some(port)) => format!("{}:{}", host, port),
        (Some(host), None) => host.to_string(),
        _ => url.to_string(),
      },
      Self::Embedded(_) => "embedded".to_string(),
    }
  }

  /// Execute a request and return its `data` object.
  ///
  /// GraphQL errors fail the whole request.
  pub async fn execute(&self, request: &GraphQlRequest) -> Result<Value> {
    let response = match self {
      Self::Remote { http, url } => {
        debug!(%url, "gateway request");
        http
          .post(url.clone())
          .json(request)
          .send()
          .await
          .map_err(|e| eyre!("Failed to reach gateway: {}", e))?
          .error_for_status()
          .map_err(|e| eyre!("Gateway returned an error: {}", e))?
          .json::<GraphQlResponse>()
          .await
          .map_err(|e| eyre!("Failed to parse gateway response: {}", e))?
      }
      Self::Embedded(schema) => {
        let gql_request = async_graphql::Request::new(request.query)
          .variables(Variables::from_json(request.variables.clone()));
        let response = schema.execute(gql_request).await;
        GraphQlResponse {
          errors: response
            .errors
            .into_iter()
            .map(|e| GraphQlError { message: e.message })
            .collect(),
          data: Some(
            response
              .data
              .into_json()
              .map_err(|e| eyre!("Failed to convert response data: {}", e))?,
          ),
        }
      }
    };

    into_data(response)
  }

  /// A UI query handle that runs `request` against this gateway.
  pub fn query(&self, request: GraphQlRequest) -> Query<Value> {
    let gateway = self.clone();
    Query::new(move || {
      let gateway = gateway.clone();
      let request = request.clone();
      async move { gateway.execute(&request).await.map_err(|e| e.to_string()) }
    })
  }
}

fn into_data(response: GraphQlResponse) -> Result<Value> {
  if !response.errors.is_empty() {
    let messages: Vec<String> = response.errors.into_iter().map(|e| e.message).collect();
    return Err(eyre!("{}", messages.join("; ")));
  }
  match response.data {
    Some(Value::Null) | None => Err(eyre!("Gateway response had no data")),
    Some(data) => Ok(data),
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::gateway::schema::tests::fixture_schema;
  use crate::movies::documents::MovieQuery;
  use crate::movies::local::{self, LocalMutation};
  use crate::movies::types::{MovieDetail, MovieList};
  use serde_json::json;

  #[test]
  fn test_into_data_errors_win() {
    let response: GraphQlResponse = serde_json::from_value(json!({
      "data": null,
      "errors": [{"message": "boom"}, {"message": "bang"}]
    }))
    .unwrap();
    let err = into_data(response).unwrap_err();
    assert_eq!(err.to_string(), "boom; bang");
  }

  #[test]
  fn test_into_data_requires_data() {
    let response: GraphQlResponse = serde_json::from_value(json!({})).unwrap();
    assert!(into_data(response).is_err());
  }

  #[test]
  fn test_label() {
    let client = GatewayClient::remote("http://127.0.0.1:4000/").unwrap();
    assert_eq!(client.label(), "127.0.0.1:4000");
    assert_eq!(GatewayClient::embedded(fixture_schema()).label(), "embedded");
    assert!(GatewayClient::remote("nope").is_err());
  }

  #[tokio::test]
  async fn test_embedded_movie_then_toggle_then_refetch() {
    let gateway = GatewayClient::embedded(fixture_schema());
    let mut cache = local::new_cache();
    let query = MovieQuery::Detail { id: 1 };

    let data = gateway.execute(&query.request()).await.unwrap();
    cache.write_query(&query, &data);
    let detail: MovieDetail = cache.read_query_as(&query).unwrap();
    let movie = detail.movie.unwrap();
    assert_eq!(movie.title, "First");
    assert!(!movie.is_liked);
    assert_eq!(detail.suggestions.len(), 2);

    let toggled = LocalMutation::ToggleLikeMovie {
      id: movie.id,
      is_liked: movie.is_liked,
    }
    .apply(&mut cache);
    assert_eq!(toggled, Some(true));

    let data = gateway.execute(&query.request()).await.unwrap();
    cache.write_query(&query, &data);
    let detail: MovieDetail = cache.read_query_as(&query).unwrap();
    assert!(detail.movie.unwrap().is_liked);

    LocalMutation::ToggleLikeMovie {
      id: 1,
      is_liked: true,
    }
    .apply(&mut cache);
    assert_eq!(local::is_liked(&cache, 1), Some(false));
  }

  #[tokio::test]
  async fn test_embedded_collection() {
    let gateway = GatewayClient::embedded(fixture_schema());
    let mut cache = local::new_cache();
    let query = MovieQuery::Movies {
      limit: Some(20),
      rating: Some(7.5),
    };

    let data = gateway.execute(&query.request()).await.unwrap();
    cache.write_query(&query, &data);

    let list: MovieList = cache.read_query_as(&query).unwrap();
    let ids: Vec<i32> = list.movies.iter().map(|m| m.id).collect();
    assert_eq!(ids, vec![1, 3, 4]);
    assert!(list.movies.iter().all(|m| !m.is_liked));
  }

  #[tokio::test]
  async fn test_embedded_unknown_movie() {
    let gateway = GatewayClient::embedded(fixture_schema());
    let mut cache = local::new_cache();
    let query = MovieQuery::Detail { id: 99 };

    let data = gateway.execute(&query.request()).await.unwrap();
    cache.write_query(&query, &data);

    let detail: MovieDetail = cache.read_query_as(&query).unwrap();
    assert!(detail.movie.is_none());
    // Suggestions still come back for an unknown id
    assert_eq!(detail.suggestions.len(), 2);
  }
}
