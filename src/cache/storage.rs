//! In-memory normalized entity store.

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::collections::HashMap;
use tracing::{debug, trace, warn};

use super::policy::TypePolicies;
use super::traits::{Cacheable, EntityKey, FetchPolicy, QueryKey, REF_FIELD};

/// Field values of one cached entity.
pub type Record = Map<String, Value>;

/// A normalized query result.
#[derive(Debug, Clone)]
struct CachedQuery {
  /// Root fields with every identifiable entity replaced by a reference
  data: Value,
  /// When the query result was last written
  cached_at: DateTime<Utc>,
}

/// Session-scoped cache keyed by entity identity rather than query shape.
///
/// The cache is owned by a single thread of control and passed by reference
/// to whatever reads or writes entities. Records are never evicted.
#[derive(Debug, Default)]
pub struct NormalizedCache {
  policies: TypePolicies,
  entities: HashMap<EntityKey, Record>,
  queries: HashMap<String, CachedQuery>,
}

impl NormalizedCache {
  pub fn new(policies: TypePolicies) -> Self {
    Self {
      policies,
      entities: HashMap::new(),
      queries: HashMap::new(),
    }
  }

  /// Number of cached entities.
  #[cfg(test)]
  pub fn len(&self) -> usize {
    self.entities.len()
  }

  #[cfg(test)]
  pub fn is_empty(&self) -> bool {
    self.entities.is_empty()
  }

  pub fn read_field(&self, key: &EntityKey, field: &str) -> Option<&Value> {
    self.entities.get(key)?.get(field)
  }

  /// Decide an incoming value for one field against whatever is stored.
  pub fn merge_incoming(&self, key: &EntityKey, field: &str, incoming: Value) -> Value {
    let existing = self.read_field(key, field);
    self
      .policies
      .field(key.typename(), field)
      .merge_value(existing, incoming)
  }

  /// Write fetched fields for one entity, creating the record if needed.
  ///
  /// Each field goes through its merge policy. Local-only fields still missing
  /// afterwards are initialized by their resolver.
  pub fn write_entity(&mut self, key: &EntityKey, incoming: Record) {
    if !self.entities.contains_key(key) {
      trace!(entity = %key, "admitting entity");
    }

    for (field, value) in incoming {
      let value = self.merge_incoming(key, &field, value);
      self
        .entities
        .entry(key.clone())
        .or_default()
        .insert(field, value);
    }

    self.resolve_local_fields(key);
  }

  fn resolve_local_fields(&mut self, key: &EntityKey) {
    let Some(record) = self.entities.get_mut(key) else {
      return;
    };

    for (field, resolver) in self.policies.local_fields(key.typename()) {
      if !record.contains_key(field) {
        let value = resolver(key);
        trace!(entity = %key, field, %value, "resolved local field");
        record.insert(field.to_string(), value);
      }
    }
  }

  /// Rewrite one field of an existing record.
  ///
  /// `update` receives the stored value (if any) and returns the new one.
  /// Returns the written value, or `None` when the entity is not cached.
  pub fn modify<F>(&mut self, key: &EntityKey, field: &str, update: F) -> Option<Value>
  where
    F: FnOnce(Option<&Value>) -> Value,
  {
    let record = self.entities.get_mut(key)?;
    let value = update(record.get(field));
    record.insert(field.to_string(), value.clone());
    Some(value)
  }

  /// Normalize a query response and store it under the query's hash.
  pub fn write_query<Q: QueryKey>(&mut self, query: &Q, data: &Value) {
    let normalized = self.normalize(data);
    debug!(query = %query.description(), entities = self.entities.len(), "cached query result");

    self.queries.insert(
      query.cache_hash(),
      CachedQuery {
        data: normalized,
        cached_at: Utc::now(),
      },
    );
  }

  pub fn has_query<Q: QueryKey>(&self, query: &Q) -> bool {
    self.queries.contains_key(&query.cache_hash())
  }

  /// When the result for `query` was last written.
  pub fn cached_at<Q: QueryKey>(&self, query: &Q) -> Option<DateTime<Utc>> {
    self.queries.get(&query.cache_hash()).map(|q| q.cached_at)
  }

  /// Whether `query` needs a network request under `policy`.
  pub fn should_fetch<Q: QueryKey>(&self, query: &Q, policy: FetchPolicy) -> bool {
    policy.should_fetch(self.has_query(query))
  }

  /// Read a query result with references resolved to current records.
  pub fn read_query<Q: QueryKey>(&self, query: &Q) -> Option<Value> {
    let cached = self.queries.get(&query.cache_hash())?;
    let mut visiting = Vec::new();
    Some(self.denormalize(&cached.data, &mut visiting))
  }

  /// Read a query result into a typed shape.
  pub fn read_query_as<Q: QueryKey, T: DeserializeOwned>(&self, query: &Q) -> Option<T> {
    let value = self.read_query(query)?;
    serde_json::from_value(value)
      .map_err(|e| warn!(query = %query.description(), error = %e, "cached result has unexpected shape"))
      .ok()
  }

  /// Read one entity into its typed form.
  pub fn read_entity<T: Cacheable>(&self, key: &EntityKey) -> Option<T> {
    let record = self.entities.get(key)?;
    let mut visiting = vec![key.clone()];
    let value = self.denormalize(&Value::Object(record.clone()), &mut visiting);
    serde_json::from_value(value)
      .map_err(|e| warn!(entity = %key, error = %e, "cached entity has unexpected shape"))
      .ok()
  }

  /// All cached entities of type `T`, ordered by key.
  pub fn entities_of<T: Cacheable>(&self) -> Vec<T> {
    let mut keys: Vec<&EntityKey> = self
      .entities
      .keys()
      .filter(|k| k.typename() == T::typename())
      .collect();
    keys.sort();
    keys.into_iter().filter_map(|k| self.read_entity(k)).collect()
  }

  fn normalize(&mut self, value: &Value) -> Value {
    match value {
      Value::Array(items) => Value::Array(items.iter().map(|v| self.normalize(v)).collect()),
      Value::Object(object) => {
        let mut fields = Map::new();
        for (name, v) in object {
          fields.insert(name.clone(), self.normalize(v));
        }

        match EntityKey::identify(&fields) {
          Some(key) => {
            self.write_entity(&key, fields);
            let mut reference = Map::new();
            reference.insert(REF_FIELD.to_string(), Value::String(key.to_string()));
            Value::Object(reference)
          }
          None => Value::Object(fields),
        }
      }
      other => other.clone(),
    }
  }

  fn denormalize(&self, value: &Value, visiting: &mut Vec<EntityKey>) -> Value {
    match value {
      Value::Array(items) => Value::Array(
        items
          .iter()
          .map(|v| self.denormalize(v, visiting))
          .collect(),
      ),
      Value::Object(object) => {
        if let Some(key) = reference_key(object) {
          // A record that (indirectly) contains itself stays a reference
          if visiting.contains(&key) {
            return value.clone();
          }
          let Some(record) = self.entities.get(&key) else {
            return Value::Null;
          };
          visiting.push(key);
          let resolved = self.denormalize_fields(record, visiting);
          visiting.pop();
          return resolved;
        }
        self.denormalize_fields(object, visiting)
      }
      other => other.clone(),
    }
  }

  fn denormalize_fields(&self, object: &Map<String, Value>, visiting: &mut Vec<EntityKey>) -> Value {
    Value::Object(
      object
        .iter()
        .map(|(name, v)| (name.clone(), self.denormalize(v, visiting)))
        .collect(),
    )
  }
}

fn reference_key(object: &Map<String, Value>) -> Option<EntityKey> {
  if object.len() != 1 {
    return None;
  }
  EntityKey::parse(object.get(REF_FIELD)?.as_str()?)
}
