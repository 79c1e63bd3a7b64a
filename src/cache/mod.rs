//! Normalized client-side cache.
//!
//! This module provides a schema-agnostic entity cache that:
//! - Stores entities once, keyed by `(typename, id)`, however many queries return them
//! - Merges every incoming field through a declared per-field policy
//! - Initializes local-only fields (no server representation) on admission
//! - Keeps normalized query results so reads can be served without a network call

mod policy;
mod storage;
mod traits;

pub use policy::{FieldPolicy, TypePolicies};
#[cfg(test)]
pub use policy::MergePolicy;
pub use storage::NormalizedCache;
pub use traits::{Cacheable, EntityKey, FetchPolicy, QueryKey};
