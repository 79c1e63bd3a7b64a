//! Client side: gateway requests, cached movie types and local movie state.

pub mod client;
pub mod documents;
pub mod local;
pub mod types;

pub use client::GatewayClient;
pub use documents::MovieQuery;
pub use local::LocalMutation;
