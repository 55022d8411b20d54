//! Shared fixtures for the integration tests

pub mod fixtures;

pub use fixtures::{attributes_seen, observe, two_node_graph};
