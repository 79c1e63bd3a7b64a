//! Client-owned movie state: the "liked" flag the catalog knows nothing about.
//!
//! The flag lives only in the normalized cache. It is initialized to `false`
//! when a movie is first admitted, survives every re-fetch of that movie, and
//! is flipped in place by [`LocalMutation::ToggleLikeMovie`]. Nothing here
//! reaches the network.

use serde_json::Value;
use tracing::{debug, warn};

use super::types::{movie_key, MOVIE_TYPENAME};
use crate::cache::{EntityKey, FieldPolicy, NormalizedCache, TypePolicies};

pub const LIKED_FIELD: &str = "isLiked";

/// Initial value of the liked flag for a movie seen for the first time.
pub fn resolve_liked(_key: &EntityKey) -> Value {
  Value::Bool(false)
}

/// Field policies for every type the client caches.
pub fn type_policies() -> TypePolicies {
  TypePolicies::new().with_field(MOVIE_TYPENAME, LIKED_FIELD, FieldPolicy::local(resolve_liked))
}

/// Build the client's session cache.
pub fn new_cache() -> NormalizedCache {
  NormalizedCache::new(type_policies())
}

/// Mutations resolved against the cache instead of the gateway.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocalMutation {
  /// Flip a movie's liked flag; `is_liked` is what the caller last rendered
  ToggleLikeMovie { id: i32, is_liked: bool },
}

impl LocalMutation {
  /// Apply to the cache, returning the value written.
  pub fn apply(&self, cache: &mut NormalizedCache) -> Option<bool> {
    match self {
      LocalMutation::ToggleLikeMovie { id, is_liked } => {
        toggle_liked(cache, &movie_key(*id), *is_liked)
      }
    }
  }
}

/// Negate the liked flag stored under `key`.
///
/// The stored value is authoritative; `observed` is only compared against it
/// for diagnostics. Returns `None` when the movie was never cached.
pub fn toggle_liked(cache: &mut NormalizedCache, key: &EntityKey, observed: bool) -> Option<bool> {
  let written = cache.modify(key, LIKED_FIELD, |stored| {
    let current = stored.and_then(Value::as_bool).unwrap_or(false);
    if current != observed {
      debug!(entity = %key, current, observed, "toggle saw a stale liked value");
    }
    Value::Bool(!current)
  });

  match written.as_ref().and_then(Value::as_bool) {
    Some(liked) => {
      debug!(entity = %key, liked, "toggled liked");
      Some(liked)
    }
    None => {
      warn!(entity = %key, "toggle on a movie that is not cached");
      None
    }
  }
}

/// Current liked flag for a cached movie.
#[cfg(test)]
pub fn is_liked(cache: &NormalizedCache, id: i32) -> Option<bool> {
  cache
    .read_field(&movie_key(id), LIKED_FIELD)
    .and_then(Value::as_bool)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::cache::{MergePolicy, QueryKey};
  use crate::movies::documents::MovieQuery;
  use crate::movies::types::{Movie, MovieDetail, MovieList};
  use serde_json::json;

  fn detail_response(title: &str) -> Value {
    json!({
      "movie": {"__typename": "Movie", "id": 1, "title": title, "rating": 8.0},
      "suggestions": [{"__typename": "Movie", "id": 2, "title": "Other", "rating": 7.0}]
    })
  }

  fn list_response() -> Value {
    json!({"movies": [
      {"__typename": "Movie", "id": 1, "title": "One", "rating": 8.0},
      {"__typename": "Movie", "id": 2, "title": "Two", "rating": 7.6},
      {"__typename": "Movie", "id": 3, "title": "Three", "rating": 9.1}
    ]})
  }

  fn read_detail(cache: &NormalizedCache, query: &impl QueryKey) -> Movie {
    cache
      .read_query_as::<_, MovieDetail>(query)
      .and_then(|d| d.movie)
      .expect("movie cached")
  }

  #[test]
  fn test_first_fetch_resolves_false() {
    let mut cache = new_cache();
    let query = MovieQuery::Detail { id: 1 };
    cache.write_query(&query, &detail_response("One"));

    assert!(!read_detail(&cache, &query).is_liked);
    // Suggestions are admitted with their own flag
    assert_eq!(is_liked(&cache, 2), Some(false));
  }

  #[test]
  fn test_toggle_survives_refetch() {
    let mut cache = new_cache();
    let query = MovieQuery::Detail { id: 1 };
    cache.write_query(&query, &detail_response("One"));

    let toggled = LocalMutation::ToggleLikeMovie {
      id: 1,
      is_liked: false,
    }
    .apply(&mut cache);
    assert_eq!(toggled, Some(true));

    for _ in 0..3 {
      cache.write_query(&query, &detail_response("One"));
      assert!(read_detail(&cache, &query).is_liked);
    }

    let toggled = LocalMutation::ToggleLikeMovie {
      id: 1,
      is_liked: true,
    }
    .apply(&mut cache);
    assert_eq!(toggled, Some(false));
    assert!(!read_detail(&cache, &query).is_liked);
  }

  #[test]
  fn test_toggle_twice_is_identity() {
    let mut cache = new_cache();
    cache.write_query(&MovieQuery::Detail { id: 1 }, &detail_response("One"));
    let key = movie_key(1);

    let before = is_liked(&cache, 1);
    toggle_liked(&mut cache, &key, false);
    toggle_liked(&mut cache, &key, true);
    assert_eq!(is_liked(&cache, 1), before);
  }

  #[test]
  fn test_server_fields_follow_latest_fetch() {
    let mut cache = new_cache();
    let query = MovieQuery::Detail { id: 1 };
    cache.write_query(&query, &detail_response("One"));
    toggle_liked(&mut cache, &movie_key(1), false);

    cache.write_query(&query, &detail_response("One (Director's Cut)"));

    let movie = read_detail(&cache, &query);
    assert_eq!(movie.title, "One (Director's Cut)");
    assert!(movie.is_liked);
  }

  #[test]
  fn test_incoming_liked_value_never_overrides_local() {
    let mut cache = new_cache();
    let query = MovieQuery::Detail { id: 1 };
    cache.write_query(&query, &detail_response("One"));
    toggle_liked(&mut cache, &movie_key(1), false);

    // A payload that does carry the field still loses to the stored value
    cache.write_query(
      &query,
      &json!({"movie": {"__typename": "Movie", "id": 1, "title": "One", "isLiked": false}}),
    );
    assert_eq!(is_liked(&cache, 1), Some(true));
    assert_eq!(
      cache.merge_incoming(&movie_key(1), LIKED_FIELD, json!(false)),
      json!(true)
    );
  }

  #[test]
  fn test_caller_value_is_advisory() {
    let mut cache = new_cache();
    cache.write_query(&MovieQuery::Detail { id: 1 }, &detail_response("One"));

    // Caller claims it is already liked; the cache says otherwise
    let toggled = LocalMutation::ToggleLikeMovie {
      id: 1,
      is_liked: true,
    }
    .apply(&mut cache);
    assert_eq!(toggled, Some(true));
  }

  #[test]
  fn test_toggle_uncached_movie_is_noop() {
    let mut cache = new_cache();
    let toggled = LocalMutation::ToggleLikeMovie {
      id: 42,
      is_liked: false,
    }
    .apply(&mut cache);

    assert_eq!(toggled, None);
    assert!(cache.is_empty());
  }

  #[test]
  fn test_collection_entities_are_isolated() {
    let mut cache = new_cache();
    let query = MovieQuery::Movies {
      limit: Some(20),
      rating: Some(7.5),
    };
    cache.write_query(&query, &list_response());

    let list: MovieList = cache.read_query_as(&query).expect("list cached");
    assert!(list.movies.iter().all(|m| !m.is_liked));

    toggle_liked(&mut cache, &movie_key(2), false);

    let list: MovieList = cache.read_query_as(&query).expect("list cached");
    let liked: Vec<(i32, bool)> = list.movies.iter().map(|m| (m.id, m.is_liked)).collect();
    assert_eq!(liked, vec![(1, false), (2, true), (3, false)]);
  }

  #[test]
  fn test_like_shows_in_other_queries() {
    let mut cache = new_cache();
    let list = MovieQuery::Movies {
      limit: Some(20),
      rating: None,
    };
    let detail = MovieQuery::Detail { id: 1 };
    cache.write_query(&list, &list_response());
    cache.write_query(&detail, &detail_response("One"));

    LocalMutation::ToggleLikeMovie {
      id: 1,
      is_liked: false,
    }
    .apply(&mut cache);

    // Re-fetching the list after the like keeps the flag too
    cache.write_query(&list, &list_response());
    let movies: MovieList = cache.read_query_as(&list).expect("list cached");
    assert!(movies.movies[0].is_liked);

    let liked: Vec<i32> = cache
      .entities_of::<Movie>()
      .into_iter()
      .filter(|m| m.is_liked)
      .map(|m| m.id)
      .collect();
    assert_eq!(liked, vec![1]);
  }

  #[test]
  fn test_policy_table_declares_liked_as_local() {
    let policies = type_policies();
    assert_eq!(
      policies.field(MOVIE_TYPENAME, LIKED_FIELD).merge,
      MergePolicy::KeepExisting
    );
    assert_eq!(
      policies.field(MOVIE_TYPENAME, "title").merge,
      MergePolicy::Incoming
    );
  }
}
