//! Core traits and types for the normalized cache.

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::fmt;

/// Field every response object carries to name its GraphQL type.
pub const TYPENAME_FIELD: &str = "__typename";
/// Field holding an entity's identifier within its type.
pub const ID_FIELD: &str = "id";
/// Marker field used in place of an entity inside normalized query results.
pub const REF_FIELD: &str = "__ref";

/// Composite identity of a cached entity: `(typename, id)`.
///
/// Rendered as `Typename:id`, e.g. `Movie:1`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityKey {
  typename: String,
  id: String,
}

impl EntityKey {
  pub fn new(typename: impl Into<String>, id: impl Into<String>) -> Self {
    Self {
      typename: typename.into(),
      id: id.into(),
    }
  }

  pub fn typename(&self) -> &str {
    &self.typename
  }

  /// Identify a response object by its `__typename` and `id` fields.
  ///
  /// Numeric and string ids identify the same entity (`1` and `"1"`).
  pub fn identify(object: &Map<String, Value>) -> Option<Self> {
    let typename = object.get(TYPENAME_FIELD)?.as_str()?;
    let id = match object.get(ID_FIELD)? {
      Value::String(s) => s.clone(),
      Value::Number(n) => n.to_string(),
      _ => return None,
    };
    Some(Self::new(typename, id))
  }

  /// Parse the `Typename:id` form produced by `Display`.
  pub fn parse(s: &str) -> Option<Self> {
    let (typename, id) = s.split_once(':')?;
    if typename.is_empty() || id.is_empty() {
      return None;
    }
    Some(Self::new(typename, id))
  }
}

impl fmt::Display for EntityKey {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}:{}", self.typename, self.id)
  }
}

/// Trait for typed entities that can be read back out of the cache.
pub trait Cacheable: DeserializeOwned {
  /// GraphQL type name the entity is stored under (e.g., "Movie")
  fn typename() -> &'static str;
}

/// Trait for keys identifying a root query and its arguments.
pub trait QueryKey {
  /// Stable, fixed-length hash used as the storage key
  fn cache_hash(&self) -> String;

  /// Human readable description for logs
  fn description(&self) -> String;
}

/// Whether a read may be answered from the cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FetchPolicy {
  /// Serve a cached result if present, otherwise go to the network
  #[default]
  CacheFirst,
  /// Always go to the network; the result is still merged into the cache
  NetworkOnly,
}

impl FetchPolicy {
  /// Decide whether a network request is needed.
  pub fn should_fetch(self, cached: bool) -> bool {
    match self {
      FetchPolicy::CacheFirst => !cached,
      FetchPolicy::NetworkOnly => true,
    }
  }
}
