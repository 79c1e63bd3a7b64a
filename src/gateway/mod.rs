//! GraphQL gateway in front of the upstream catalog.

pub mod people;
pub mod schema;
pub mod server;

pub use schema::{build_schema, MovieSchema};
