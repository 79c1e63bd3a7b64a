//! Per-field merge policies and defaults for local-only fields.

use serde_json::Value;
use std::collections::HashMap;

use super::traits::EntityKey;

/// Conflict rule applied when a fetched value meets a cached one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MergePolicy {
  /// Server-owned field: the incoming value replaces the cached one
  #[default]
  Incoming,
  /// Client-owned field: a stored value beats any incoming one
  KeepExisting,
}

impl MergePolicy {
  pub fn merge(self, existing: Option<&Value>, incoming: Value) -> Value {
    match (self, existing) {
      (MergePolicy::KeepExisting, Some(existing)) => existing.clone(),
      _ => incoming,
    }
  }
}

/// Resolver producing the initial value of a local-only field.
pub type LocalResolver = fn(&EntityKey) -> Value;

/// Policy for one field of one type.
#[derive(Debug, Clone, Copy, Default)]
pub struct FieldPolicy {
  pub merge: MergePolicy,
  /// Set for fields that never come from the server
  pub local: Option<LocalResolver>,
}

impl FieldPolicy {
  /// A client-owned field initialized by `resolver` and kept across fetches.
  pub const fn local(resolver: LocalResolver) -> Self {
    Self {
      merge: MergePolicy::KeepExisting,
      local: Some(resolver),
    }
  }

  /// Decide the value stored for this field when `incoming` arrives.
  pub fn merge_value(&self, existing: Option<&Value>, incoming: Value) -> Value {
    self.merge.merge(existing, incoming)
  }
}

/// Declared field policies, keyed by typename then field name.
///
/// Fields without a declaration are server-owned.
#[derive(Debug, Clone, Default)]
pub struct TypePolicies {
  types: HashMap<String, HashMap<String, FieldPolicy>>,
}

impl TypePolicies {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with_field(mut self, typename: &str, field: &str, policy: FieldPolicy) -> Self {
    self
      .types
      .entry(typename.to_string())
      .or_default()
      .insert(field.to_string(), policy);
    self
  }

  pub fn field(&self, typename: &str, field: &str) -> FieldPolicy {
    self
      .types
      .get(typename)
      .and_then(|fields| fields.get(field))
      .copied()
      .unwrap_or_default()
  }

  /// Local-only fields declared for `typename` with their resolvers.
  pub fn local_fields<'a>(
    &'a self,
    typename: &str,
  ) -> impl Iterator<Item = (&'a str, LocalResolver)> + 'a {
    self
      .types
      .get(typename)
      .into_iter()
      .flat_map(|fields| fields.iter())
      .filter_map(|(name, policy)| policy.local.map(|resolver| (name.as_str(), resolver)))
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde_json::json;

  fn always_false(_key: &EntityKey) -> Value {
    Value::Bool(false)
  }

  #[test]
  fn test_incoming_policy_replaces_existing() {
    let existing = json!("Old Title");
    assert_eq!(
      MergePolicy::Incoming.merge(Some(&existing), json!("New Title")),
      json!("New Title")
    );
  }

  #[test]
  fn test_keep_existing_policy() {
    let existing = json!(true);
    assert_eq!(
      MergePolicy::KeepExisting.merge(Some(&existing), json!(false)),
      json!(true)
    );
    // Nothing stored yet: the incoming value is accepted
    assert_eq!(
      MergePolicy::KeepExisting.merge(None, json!(false)),
      json!(false)
    );
  }

  #[test]
  fn test_field_policy_merge_value() {
    let stored = json!(true);
    let local = FieldPolicy::local(always_false);
    assert_eq!(local.merge_value(Some(&stored), json!(false)), json!(true));
    assert_eq!(local.merge_value(None, json!(false)), json!(false));

    let server = FieldPolicy::default();
    assert_eq!(server.merge_value(Some(&json!("Old")), json!("New")), json!("New"));
  }

  #[test]
  fn test_undeclared_fields_are_server_owned() {
    let policies = TypePolicies::new().with_field("Movie", "isLiked", FieldPolicy::local(always_false));
    assert_eq!(policies.field("Movie", "title").merge, MergePolicy::Incoming);
    assert_eq!(policies.field("Person", "isLiked").merge, MergePolicy::Incoming);
    assert_eq!(
      policies.field("Movie", "isLiked").merge,
      MergePolicy::KeepExisting
    );
  }

  #[test]
  fn test_local_fields_lists_only_resolved_fields() {
    let policies = TypePolicies::new()
      .with_field("Movie", "isLiked", FieldPolicy::local(always_false))
      .with_field("Movie", "title", FieldPolicy::default());

    let local: Vec<&str> = policies.local_fields("Movie").map(|(name, _)| name).collect();
    assert_eq!(local, vec!["isLiked"]);
    assert_eq!(policies.local_fields("Person").count(), 0);
  }
}
