//! Edge and entity stores
//!
//! The pathfinder never talks to storage. Callers fetch edges and entities
//! through the [`EdgeStore`] / [`EntityStore`] seams and hand plain data to the
//! algorithms. [`InMemoryGraph`] implements both over a loaded snapshot.

use super::edge::Edge;
use super::entity::Entity;
use super::types::EntityId;
use indexmap::IndexMap;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use thiserror::Error;
use tracing::{debug, info};

/// Errors that can occur while loading or reading the graph
#[derive(Error, Debug)]
pub enum GraphError {
    #[error("Invalid edge {from} -> {to}: strength {strength} is outside [0, 1]")]
    InvalidStrength {
        from: EntityId,
        to: EntityId,
        strength: f64,
    },

    #[error("Entity {0} already exists")]
    EntityAlreadyExists(EntityId),

    #[error("Store unavailable: {0}")]
    Unavailable(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed graph snapshot: {0}")]
    Snapshot(#[from] serde_json::Error),
}

pub type GraphResult<T> = Result<T, GraphError>;

/// Source of relationship edges
pub trait EdgeStore {
    /// Every edge in the store, in store order
    fn all_edges(&self) -> GraphResult<Vec<Edge>>;

    /// Edges whose source or target is one of `ids`, in store order, each once
    fn edges_touching(&self, ids: &[EntityId]) -> GraphResult<Vec<Edge>>;
}

/// Source of entity attributes
pub trait EntityStore {
    fn entity(&self, id: &str) -> GraphResult<Option<Entity>>;

    /// Entities flagged as internal owners
    fn internal_owners(&self) -> GraphResult<Vec<Entity>>;

    fn entity_count(&self) -> GraphResult<usize>;
}

/// On-disk / over-the-wire shape of a graph
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GraphSnapshot {
    #[serde(default)]
    pub entities: Vec<Entity>,
    #[serde(default)]
    pub edges: Vec<Edge>,
}

/// Summary counts for status endpoints and the CLI
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GraphStatistics {
    pub entity_count: usize,
    pub edge_count: usize,
    pub internal_owner_count: usize,
    /// Edge count per kind, in order of first appearance
    pub kinds: IndexMap<String, usize>,
}

/// In-memory graph storage
///
/// - entities: EntityId -> Entity (insertion ordered)
/// - edges: append-only edge list
/// - touching: EntityId -> indices of edges where it is source or target
#[derive(Debug, Default)]
pub struct InMemoryGraph {
    entities: IndexMap<EntityId, Entity>,
    edges: Vec<Edge>,
    touching: FxHashMap<EntityId, Vec<usize>>,
}

impl InMemoryGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from entity and edge lists, validating every record
    pub fn from_parts(entities: Vec<Entity>, edges: Vec<Edge>) -> GraphResult<Self> {
        let mut graph = Self::new();
        for entity in entities {
            graph.add_entity(entity)?;
        }
        for edge in edges {
            graph.add_edge(edge)?;
        }
        Ok(graph)
    }

    pub fn from_snapshot(snapshot: GraphSnapshot) -> GraphResult<Self> {
        Self::from_parts(snapshot.entities, snapshot.edges)
    }

    /// Parse a JSON snapshot `{ "entities": [...], "edges": [...] }`
    pub fn load_json<R: Read>(reader: R) -> GraphResult<Self> {
        let snapshot: GraphSnapshot = serde_json::from_reader(reader)?;
        Self::from_snapshot(snapshot)
    }

    pub fn load_json_file(path: impl AsRef<Path>) -> GraphResult<Self> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let graph = Self::load_json(BufReader::new(file))?;
        info!(
            "Loaded graph from {:?}: {} entities, {} edges",
            path,
            graph.entities.len(),
            graph.edges.len()
        );
        Ok(graph)
    }

    pub fn add_entity(&mut self, entity: Entity) -> GraphResult<()> {
        if self.entities.contains_key(&entity.id) {
            return Err(GraphError::EntityAlreadyExists(entity.id));
        }
        self.entities.insert(entity.id.clone(), entity);
        Ok(())
    }

    /// Append a directed edge. Endpoints need no entity record.
    pub fn add_edge(&mut self, edge: Edge) -> GraphResult<()> {
        edge.validate()?;
        let idx = self.edges.len();
        self.touching.entry(edge.source.clone()).or_default().push(idx);
        if edge.target != edge.source {
            self.touching.entry(edge.target.clone()).or_default().push(idx);
        }
        debug!("Added edge {} -[{}]-> {}", edge.source, edge.kind, edge.target);
        self.edges.push(edge);
        Ok(())
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn entities(&self) -> impl Iterator<Item = &Entity> {
        self.entities.values()
    }

    pub fn statistics(&self) -> GraphStatistics {
        let mut kinds = IndexMap::new();
        for edge in &self.edges {
            *kinds.entry(edge.kind.as_str().to_string()).or_insert(0) += 1;
        }
        GraphStatistics {
            entity_count: self.entities.len(),
            edge_count: self.edges.len(),
            internal_owner_count: self.entities.values().filter(|e| e.is_internal_owner).count(),
            kinds,
        }
    }

    pub fn snapshot(&self) -> GraphSnapshot {
        GraphSnapshot {
            entities: self.entities.values().cloned().collect(),
            edges: self.edges.clone(),
        }
    }
}

impl EdgeStore for InMemoryGraph {
    fn all_edges(&self) -> GraphResult<Vec<Edge>> {
        Ok(self.edges.clone())
    }

    fn edges_touching(&self, ids: &[EntityId]) -> GraphResult<Vec<Edge>> {
        let mut indices: Vec<usize> = ids
            .iter()
            .filter_map(|id| self.touching.get(id))
            .flatten()
            .copied()
            .collect();
        indices.sort_unstable();
        indices.dedup();
        Ok(indices.into_iter().map(|i| self.edges[i].clone()).collect())
    }
}

impl EntityStore for InMemoryGraph {
    fn entity(&self, id: &str) -> GraphResult<Option<Entity>> {
        Ok(self.entities.get(id).cloned())
    }

    fn internal_owners(&self) -> GraphResult<Vec<Entity>> {
        Ok(self
            .entities
            .values()
            .filter(|e| e.is_internal_owner)
            .cloned()
            .collect())
    }

    fn entity_count(&self) -> GraphResult<usize> {
        Ok(self.entities.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::EdgeKind;

    fn sample() -> InMemoryGraph {
        InMemoryGraph::from_parts(
            vec![
                Entity::person("alice", "Alice").internal_owner(),
                Entity::person("bob", "Bob"),
                Entity::organization("acme", "Acme").portfolio(),
            ],
            vec![
                Edge::new("alice", "bob", EdgeKind::KNOWS, 0.9),
                Edge::new("bob", "acme", EdgeKind::WORKS_AT, 0.8),
                Edge::new("carol", "dave", EdgeKind::KNOWS, 0.5),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_edges_touching_in_store_order() {
        let graph = sample();
        let edges = graph
            .edges_touching(&[EntityId::new("acme"), EntityId::new("bob")])
            .unwrap();
        assert_eq!(edges.len(), 2);
        assert!(edges[0].starts_from("alice"));
        assert!(edges[1].ends_at("acme"));

        assert!(graph.edges_touching(&[EntityId::new("nobody")]).unwrap().is_empty());
    }

    #[test]
    fn test_entity_lookups() {
        let graph = sample();
        assert_eq!(graph.entity("bob").unwrap().unwrap().name, "Bob");
        assert!(graph.entity("carol").unwrap().is_none());
        assert_eq!(graph.entity_count().unwrap(), 3);

        let owners = graph.internal_owners().unwrap();
        assert_eq!(owners.len(), 1);
        assert_eq!(owners[0].id.as_str(), "alice");
    }

    #[test]
    fn test_rejects_bad_records() {
        let mut graph = sample();
        assert!(matches!(
            graph.add_entity(Entity::person("bob", "Bob again")),
            Err(GraphError::EntityAlreadyExists(_))
        ));
        assert!(matches!(
            graph.add_edge(Edge::new("bob", "alice", EdgeKind::KNOWS, -0.1)),
            Err(GraphError::InvalidStrength { .. })
        ));
        assert_eq!(graph.edges().len(), 3);
    }

    #[test]
    fn test_self_loop_touching_once() {
        let mut graph = InMemoryGraph::new();
        graph.add_edge(Edge::new("x", "x", EdgeKind::KNOWS, 1.0)).unwrap();
        assert_eq!(graph.edges_touching(&[EntityId::new("x")]).unwrap().len(), 1);
    }

    #[test]
    fn test_load_json_and_statistics() {
        let json = r#"{
            "entities": [{"id": "alice", "name": "Alice", "is_internal_owner": true}],
            "edges": [
                {"source": "alice", "target": "acme", "kind": "owner", "strength": 1.0},
                {"source": "acme", "target": "beta", "kind": "portfolio_connection", "strength_score": 0.6},
                {"source": "beta", "target": "gamma", "kind": "portfolio_connection", "strength": 0.4}
            ]
        }"#;
        let graph = InMemoryGraph::load_json(json.as_bytes()).unwrap();

        let stats = graph.statistics();
        assert_eq!(stats.entity_count, 1);
        assert_eq!(stats.edge_count, 3);
        assert_eq!(stats.internal_owner_count, 1);
        assert_eq!(stats.kinds.get("portfolio_connection"), Some(&2));
        assert_eq!(stats.kinds.keys().next().map(String::as_str), Some("owner"));

        assert!(matches!(
            InMemoryGraph::load_json("{ not json".as_bytes()),
            Err(GraphError::Snapshot(_))
        ));
    }
}
