//! Relationship graph data model
//!
//! This module implements the minimal graph shape path discovery needs:
//! - Entities with display/classification attributes
//! - Directed edges with an open-ended kind and a strength in [0, 1]
//! - Store seams for fetching edges and entities, plus an in-memory store

pub mod edge;
pub mod entity;
pub mod store;
pub mod types;

// Re-export main types
pub use edge::Edge;
pub use entity::Entity;
pub use store::{
    EdgeStore, EntityStore, GraphError, GraphResult, GraphSnapshot, GraphStatistics, InMemoryGraph,
};
pub use types::{EdgeKind, EntityId, EntityType};
